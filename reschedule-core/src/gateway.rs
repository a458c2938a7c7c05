//! The remote calendar collaborator.
//!
//! Credential handling lives entirely behind this trait; callers only see
//! events and errors classified by [`crate::error::RemoteCall`].

use std::future::Future;

use chrono::{DateTime, Duration, Utc};

use crate::error::RescheduleResult;
use crate::event::Event;
use crate::window::TimeWindow;

/// What to fetch when populating the event selector.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub window: TimeWindow,
    /// Free-text filter; `None` or empty matches everything.
    pub text_filter: Option<String>,
    pub max_results: usize,
}

impl EventQuery {
    /// Events starting between `now` and `days_ahead` days from now.
    pub fn upcoming(
        now: DateTime<Utc>,
        days_ahead: u32,
        text_filter: Option<String>,
        max_results: usize,
    ) -> RescheduleResult<Self> {
        let window = TimeWindow::starting_at(now, Duration::days(i64::from(days_ahead)))?;
        Ok(EventQuery {
            window,
            text_filter: text_filter.filter(|q| !q.trim().is_empty()),
            max_results,
        })
    }
}

pub trait CalendarGateway {
    /// Single-occurrence events in `query.window`, ordered by start time.
    fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> impl Future<Output = RescheduleResult<Vec<Event>>>;

    /// Whether any event other than `exclude_event_id` falls in `window`.
    fn has_overlap(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        exclude_event_id: Option<&str>,
    ) -> impl Future<Output = RescheduleResult<bool>>;

    /// Move an event, tagging start and end with `time_zone`.
    fn patch_event_time(
        &self,
        calendar_id: &str,
        event_id: &str,
        window: &TimeWindow,
        time_zone: &str,
    ) -> impl Future<Output = RescheduleResult<Event>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn upcoming_spans_days_ahead() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let query = EventQuery::upcoming(now, 14, None, 100).unwrap();
        assert_eq!(query.window.start(), now);
        assert_eq!(query.window.duration(), Duration::days(14));
    }

    #[test]
    fn blank_filter_is_dropped() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let query = EventQuery::upcoming(now, 1, Some("  ".into()), 10).unwrap();
        assert_eq!(query.text_filter, None);
    }

    #[test]
    fn zero_day_lookahead_is_invalid() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(EventQuery::upcoming(now, 0, None, 10).is_err());
    }
}
