//! Build the candidate window from the form inputs.
//!
//! The picked date and time are combined as UTC instants; the timezone label
//! sent with the patch is not interpreted here.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};

use crate::error::RescheduleResult;
use crate::rules::BusinessRules;
use crate::window::TimeWindow;

/// Days between the current start and the default new date.
pub const DEFAULT_SHIFT_DAYS: i64 = 2;

/// How the end of the candidate window is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndChoice {
    /// Same length as the event being moved.
    KeepDuration,
    /// A time of day on the new date.
    At(NaiveTime),
    /// A fixed length from the new start.
    After(Duration),
}

/// The user's new date, start time and end choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proposal {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end: EndChoice,
}

impl Proposal {
    /// Form defaults: two days after the current start, at the later of the
    /// business-hours start and the current start hour, keeping the duration.
    pub fn defaults(current: &TimeWindow, rules: &BusinessRules) -> Self {
        let current_start = current.start();
        let hour = rules.business_hours_start().max(current_start.hour());

        Proposal {
            date: (current_start + Duration::days(DEFAULT_SHIFT_DAYS)).date_naive(),
            start_time: on_the_hour(hour),
            end: EndChoice::KeepDuration,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.date.and_time(self.start_time).and_utc()
    }

    /// The candidate window for moving an event currently spanning `current`.
    pub fn window(&self, current: &TimeWindow) -> RescheduleResult<TimeWindow> {
        let start = self.start();
        match self.end {
            EndChoice::KeepDuration => TimeWindow::starting_at(start, current.duration()),
            EndChoice::At(time) => TimeWindow::new(start, self.date.and_time(time).and_utc()),
            EndChoice::After(duration) => TimeWindow::starting_at(start, duration),
        }
    }
}

/// Default for the explicit end-time picker.
pub fn default_end_time(rules: &BusinessRules) -> NaiveTime {
    on_the_hour(rules.business_hours_end().min(23))
}

fn on_the_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RescheduleError;
    use chrono::TimeZone;

    fn current(start_hour: u32, minutes: i64) -> TimeWindow {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, start_hour, 30, 0).unwrap();
        TimeWindow::starting_at(start, Duration::minutes(minutes)).unwrap()
    }

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn defaults_shift_two_days_on_the_hour() {
        let proposal = Proposal::defaults(&current(14, 45), &BusinessRules::default());
        assert_eq!(proposal.date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(proposal.start_time, hm(14, 0));
        assert_eq!(proposal.end, EndChoice::KeepDuration);
    }

    #[test]
    fn defaults_clamp_early_start_to_business_hours() {
        let proposal = Proposal::defaults(&current(7, 45), &BusinessRules::default());
        assert_eq!(proposal.start_time, hm(9, 0));
    }

    #[test]
    fn default_end_time_is_business_hours_end() {
        assert_eq!(default_end_time(&BusinessRules::default()), hm(17, 0));
    }

    #[test]
    fn keep_duration_preserves_length() {
        let cur = current(10, 45);
        let proposal = Proposal {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            start_time: hm(13, 15),
            end: EndChoice::KeepDuration,
        };
        let window = proposal.window(&cur).unwrap();
        assert_eq!(window.duration(), cur.duration());
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2024, 1, 5, 13, 15, 0).unwrap()
        );
    }

    #[test]
    fn keep_duration_crosses_midnight() {
        let proposal = Proposal {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            start_time: hm(23, 30),
            end: EndChoice::KeepDuration,
        };
        let window = proposal.window(&current(10, 60)).unwrap();
        assert_eq!(
            window.end(),
            Utc.with_ymd_and_hms(2024, 1, 6, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn explicit_end_before_start_is_invalid() {
        let proposal = Proposal {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            start_time: hm(15, 0),
            end: EndChoice::At(hm(14, 0)),
        };
        let err = proposal.window(&current(10, 60)).unwrap_err();
        assert!(matches!(err, RescheduleError::InvalidWindow(_)));
    }

    #[test]
    fn out_of_range_duration_is_invalid() {
        let proposal = Proposal {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            start_time: hm(15, 0),
            end: EndChoice::After(Duration::days(365 * 1_000_000)),
        };
        let err = proposal.window(&current(10, 60)).unwrap_err();
        assert!(matches!(err, RescheduleError::InvalidWindow(_)));
    }

    #[test]
    fn explicit_duration_sets_end() {
        let proposal = Proposal {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            start_time: hm(15, 0),
            end: EndChoice::After(Duration::minutes(20)),
        };
        let window = proposal.window(&current(10, 60)).unwrap();
        assert_eq!(window.duration(), Duration::minutes(20));
    }
}
