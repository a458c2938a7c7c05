//! Terminal rendering for events and validation outcomes.

use chrono::Duration;
use owo_colors::OwoColorize;
use reschedule_core::{Assessment, Event, EventTime, TimeWindow};

/// Colored one-line (or few-line) terminal form of a value.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventTime {
    fn render(&self) -> String {
        match self {
            EventTime::DateTime(dt) => dt.format("%a %b %-d %H:%M").to_string(),
            EventTime::Date(d) => format!("{} (all day)", d.format("%a %b %-d")),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} {}",
            self.title().bold(),
            format!("{} → {}", self.start.render(), self.end.render()).dimmed()
        )
    }
}

impl Render for TimeWindow {
    fn render(&self) -> String {
        format!(
            "{} → {} ({})",
            self.start().format("%Y-%m-%d %H:%M"),
            self.end().format("%Y-%m-%d %H:%M"),
            render_duration(self.duration())
        )
    }
}

impl Render for Assessment {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        if let Some(warning) = &self.conflict_warning {
            lines.push(format!("  {}", warning.to_string().yellow()));
        }

        if self.result.passes_rules() {
            lines.push(format!("  {}", "✓ Meets notice and business-hour rules".green()));
        } else {
            let joined = self.result.messages().join(" • ");
            lines.push(format!("  {}", format!("✗ {}", joined).red()));
        }

        if self.result.conflict {
            lines.push(format!(
                "  {}",
                "⚠ There is a conflicting event in that window.".yellow()
            ));
        }

        lines.join("\n")
    }
}

/// "45 mins", "2h 30m", "1d 2h"
pub fn render_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    if minutes < 60 {
        return format!("{} mins", minutes);
    }
    let (days, hours, mins) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
    match (days, hours, mins) {
        (0, h, 0) => format!("{}h", h),
        (0, h, m) => format!("{}h {}m", h, m),
        (d, 0, 0) => format!("{}d", d),
        (d, h, 0) => format!("{}d {}h", d, h),
        (d, h, m) => format!("{}d {}h {}m", d, h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_compactly() {
        assert_eq!(render_duration(Duration::minutes(45)), "45 mins");
        assert_eq!(render_duration(Duration::minutes(60)), "1h");
        assert_eq!(render_duration(Duration::minutes(150)), "2h 30m");
        assert_eq!(render_duration(Duration::days(1)), "1d");
        assert_eq!(render_duration(Duration::minutes(1440 + 120)), "1d 2h");
        assert_eq!(render_duration(Duration::minutes(1440 + 125)), "1d 2h 5m");
    }

    #[test]
    fn all_day_times_are_labelled() {
        let time = EventTime::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(time.render(), "Fri Mar 1 (all day)");
    }
}
