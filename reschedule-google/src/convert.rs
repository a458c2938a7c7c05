//! Conversion between Google Calendar API events and reschedule types.

use anyhow::{Result, bail};
use google_calendar::types::EventDateTime;
use reschedule_core::{Event, EventTime, TimeWindow};

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Result<Self>
    where
        Self: Sized;
}

impl FromGoogle for Event {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let Some(start) = event.start.as_ref().and_then(event_time) else {
            bail!("Event {} has no start time", event.id);
        };
        let Some(end) = event.end.as_ref().and_then(event_time) else {
            bail!("Event {} has no end time", event.id);
        };

        Ok(Event {
            id: event.id,
            summary: non_empty(event.summary),
            start,
            end,
            html_link: non_empty(event.html_link),
        })
    }
}

fn event_time(time: &EventDateTime) -> Option<EventTime> {
    match (time.date_time, time.date) {
        (Some(dt), _) => Some(EventTime::DateTime(dt)),
        (None, Some(d)) => Some(EventTime::Date(d)),
        (None, None) => None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

pub fn is_cancelled(event: &google_calendar::types::Event) -> bool {
    event.status == "cancelled"
}

/// `current` as fetched from Google, moved to `window`.
///
/// Every other field is sent back unchanged. The API type serializes its
/// boolean flags unconditionally, so a body built from defaults would reset
/// guest permissions on each move.
pub fn rescheduled(
    current: google_calendar::types::Event,
    window: &TimeWindow,
    time_zone: &str,
) -> google_calendar::types::Event {
    let at = |dt| EventDateTime {
        date: None,
        date_time: Some(dt),
        time_zone: time_zone.to_string(),
    };

    google_calendar::types::Event {
        start: Some(at(window.start())),
        end: Some(at(window.end())),
        ..current
    }
}
