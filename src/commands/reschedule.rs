use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::Args;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;
use reschedule_core::{
    Assessment, ConflictPolicy, EndChoice, Event, Proposal, TimeWindow, assess, commit,
};
use reschedule_google::GoogleGateway;

use crate::config::Settings;
use crate::render::Render;
use crate::utils::tui::while_waiting;

#[derive(Args, Default)]
pub struct MoveArgs {
    /// ID of the event to move (skips the picker)
    #[arg(short, long)]
    pub event: Option<String>,

    /// New date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// New start time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,

    /// New end: "keep", a time (HH:MM) or a duration ("45m", "1h 30m")
    #[arg(long)]
    pub end: Option<String>,

    /// Commit without prompting; fails if the new time breaks a rule
    #[arg(short, long)]
    pub yes: bool,
}

enum Action {
    Commit,
    Change,
    Quit,
}

pub async fn run(settings: &Settings, filter: Option<String>, args: MoveArgs) -> Result<()> {
    let rules = settings.rules()?;
    let (gateway, events) = super::load_upcoming(settings, filter).await?;

    if events.is_empty() {
        println!("{}", super::events::no_events_hint(settings).dimmed());
        return Ok(());
    }

    let event = select_event(&events, args.event.as_deref())?;
    let current = event.window()?;

    println!("\n  {} {}", "Current:".bold(), event.render());

    let mut proposal = initial_proposal(&args, &current, &rules)?;
    if !args.yes && (args.date.is_none() || args.time.is_none()) {
        proposal = prompt_proposal(proposal, &rules)?;
    }

    loop {
        let candidate = match proposal.window(&current) {
            Ok(window) => window,
            Err(err) if !args.yes => {
                eprintln!("  {}", err.to_string().red());
                proposal = prompt_proposal(proposal, &rules)?;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        println!("\n  {} {}", "New:".bold(), candidate.render());

        let assessment = assess(
            &gateway,
            &settings.calendar_id,
            Some(event.id.as_str()),
            &candidate,
            Utc::now(),
            &rules,
        )
        .await;
        println!("{}", assessment.render());

        let committable = assessment.result.can_commit(settings.conflict_policy);

        if args.yes {
            if !committable {
                anyhow::bail!(
                    "Not rescheduling: {}",
                    blocking_reasons(&assessment, settings.conflict_policy).join("; ")
                );
            }
            let updated = commit_to(settings, &gateway, event, &candidate).await?;
            report(&updated);
            return Ok(());
        }

        match choose_action(committable)? {
            Action::Commit => match commit_to(settings, &gateway, event, &candidate).await {
                Ok(updated) => {
                    report(&updated);
                    return Ok(());
                }
                Err(err) if !err.is_fatal() => {
                    eprintln!("  {}", err.to_string().red());
                    eprintln!("  {}", "Your new time is kept; try again.".dimmed());
                }
                Err(err) => return Err(err.into()),
            },
            Action::Change => proposal = prompt_proposal(proposal, &rules)?,
            Action::Quit => return Ok(()),
        }
    }
}

async fn commit_to(
    settings: &Settings,
    gateway: &GoogleGateway,
    event: &Event,
    candidate: &TimeWindow,
) -> reschedule_core::RescheduleResult<Event> {
    while_waiting(
        "Updating event...",
        commit(
            gateway,
            &settings.calendar_id,
            &event.id,
            candidate,
            &settings.time_zone,
        ),
    )
    .await
}

fn report(updated: &Event) {
    println!("\n  {}", "Event rescheduled".green());
    if let Some(link) = &updated.html_link {
        println!("  {}", link.dimmed());
    }
}

fn blocking_reasons(assessment: &Assessment, policy: ConflictPolicy) -> Vec<String> {
    let mut reasons = assessment.result.messages();
    if assessment.result.conflict && policy == ConflictPolicy::Block {
        reasons.push("Another event occupies that window".to_string());
    }
    reasons
}

fn select_event<'a>(events: &'a [Event], id: Option<&str>) -> Result<&'a Event> {
    if let Some(id) = id {
        return events
            .iter()
            .find(|e| e.id == id)
            .with_context(|| format!("No upcoming event with ID '{}'", id));
    }

    let items: Vec<String> = events.iter().map(Render::render).collect();
    let selection = Select::new()
        .with_prompt("  Which event?")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(&events[selection])
}

fn choose_action(committable: bool) -> Result<Action> {
    let mut actions = Vec::new();
    if committable {
        actions.push(("Reschedule event", Action::Commit));
    }
    actions.push(("Change the new time", Action::Change));
    actions.push(("Quit", Action::Quit));

    let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();
    let selection = Select::new()
        .with_prompt("  What now?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(actions.swap_remove(selection).1)
}

/// Defaults with any values given on the command line applied.
fn initial_proposal(
    args: &MoveArgs,
    current: &TimeWindow,
    rules: &reschedule_core::BusinessRules,
) -> Result<Proposal> {
    let mut proposal = Proposal::defaults(current, rules);

    if let Some(date) = &args.date {
        proposal.date = parse_date(date)?;
    }
    if let Some(time) = &args.time {
        proposal.start_time = parse_time(time)?;
    }
    if let Some(end) = &args.end {
        proposal.end = parse_end(end)?;
    }

    Ok(proposal)
}

/// Ask for date, start and end, offering the current values as defaults.
fn prompt_proposal(
    proposal: Proposal,
    rules: &reschedule_core::BusinessRules,
) -> Result<Proposal> {
    let date = prompt_with_retry(
        "  New date",
        proposal.date.format("%Y-%m-%d").to_string(),
        parse_date,
    )?;
    let start_time = prompt_with_retry(
        "  Start time",
        proposal.start_time.format("%H:%M").to_string(),
        parse_time,
    )?;

    let end_default = match proposal.end {
        EndChoice::KeepDuration => "keep".to_string(),
        EndChoice::At(time) => time.format("%H:%M").to_string(),
        EndChoice::After(duration) => duration
            .to_std()
            .map(|d| humantime::format_duration(d).to_string())
            .unwrap_or_else(|_| "keep".to_string()),
    };
    let end = prompt_with_retry(
        &format!(
            "  End (keep, HH:MM or a duration; e.g. {})",
            reschedule_core::proposal::default_end_time(rules).format("%H:%M")
        ),
        end_default,
        parse_end,
    )?;

    Ok(Proposal {
        date,
        start_time,
        end,
    })
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<T, F>(prompt: &str, default: String, parse: F) -> Result<T>
where
    F: Fn(&str) -> Result<T>,
{
    loop {
        let input: String = Input::new()
            .with_prompt(prompt)
            .default(default.clone())
            .interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", input.trim()))
}

fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .with_context(|| format!("Invalid time '{}', expected HH:MM", input))
}

/// "keep", an end time ("17:30") or a duration ("45m", "1h 30m").
fn parse_end(input: &str) -> Result<EndChoice> {
    let input = input.trim();

    if input.is_empty() || input.eq_ignore_ascii_case("keep") {
        return Ok(EndChoice::KeepDuration);
    }

    if let Ok(time) = parse_time(input) {
        return Ok(EndChoice::At(time));
    }

    let std_duration = humantime::parse_duration(input)
        .with_context(|| format!("Invalid end '{}', expected keep, HH:MM or a duration", input))?;
    let duration = chrono::Duration::from_std(std_duration)
        .with_context(|| format!("Duration '{}' is too long", input))?;

    Ok(EndChoice::After(duration))
}
