use anyhow::Result;
use chrono::{NaiveDate, Utc};
use owo_colors::OwoColorize;
use reschedule_core::EventTime;

use crate::config::Settings;

pub async fn run(settings: &Settings, filter: Option<String>) -> Result<()> {
    let (_, events) = super::load_upcoming(settings, filter).await?;

    if events.is_empty() {
        println!("{}", no_events_hint(settings).dimmed());
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let mut current_date: Option<String> = None;

    for event in &events {
        let label = date_label(event.start.to_utc().date_naive(), today);

        if current_date.as_ref() != Some(&label) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", label.bold());
            current_date = Some(label);
        }

        println!(
            "  {} {} {}",
            format_time(&event.start),
            event.title(),
            format!("[{}]", event.id).dimmed()
        );
    }

    Ok(())
}

pub fn no_events_hint(settings: &Settings) -> String {
    format!(
        "No upcoming events in the next {} days. Try increasing --days or check the calendar ID ({}).",
        settings.days_ahead, settings.calendar_id
    )
}

/// "Today", "Tomorrow", or e.g. "Wed Feb 25"
fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// "15:00" or "all-day", right-aligned.
fn format_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(_) => format!("{:>7}", "all-day"),
        EventTime::DateTime(dt) => format!("{:>7}", dt.format("%H:%M")),
    }
}
