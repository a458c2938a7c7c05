//! Provider-neutral event types.
//!
//! Gateways convert their API responses into these types; the rest of the
//! program only reads the id, title and start/end of the event being moved.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RescheduleResult;
use crate::window::TimeWindow;

/// Shown in place of a missing event title.
pub const NO_TITLE: &str = "(no title)";

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub summary: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    /// Deep link into the provider's web UI
    pub html_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    /// All-day value
    Date(NaiveDate),
}

impl EventTime {
    /// The instant this time refers to; all-day values start at midnight UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Event {
    pub fn title(&self) -> &str {
        match self.summary.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => NO_TITLE,
        }
    }

    /// The event's current span.
    pub fn window(&self) -> RescheduleResult<TimeWindow> {
        TimeWindow::new(self.start.to_utc(), self.end.to_utc())
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {} → {}", self.title(), self.start, self.end)
    }
}
