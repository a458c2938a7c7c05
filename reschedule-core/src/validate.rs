//! The rescheduling decision function.
//!
//! `validate` is pure: the caller supplies "now" and the candidate window, so
//! the same inputs always produce the same result. Conflict detection needs the
//! gateway and is layered on top (see [`crate::assess`]).

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

use crate::error::RescheduleResult;
use crate::rules::{BusinessRules, ConflictPolicy};
use crate::window::TimeWindow;

/// A business rule the candidate window breaks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Violation {
    MinimumNotice { hours: f64 },
    OutsideBusinessHours { start: u32, end: u32 },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::MinimumNotice { hours } => {
                write!(f, "Minimum notice of {}h not met", hours)
            }
            Violation::OutsideBusinessHours { start, end } => {
                write!(f, "Start time outside business hours ({}–{})", start, end)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub violations: Vec<Violation>,
    /// Another event overlaps the candidate window. Reported independently of
    /// the violations.
    pub conflict: bool,
}

impl ValidationResult {
    pub fn passes_rules(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn with_conflict(mut self, conflict: bool) -> Self {
        self.conflict = conflict;
        self
    }

    /// Rule violations always block; a conflict only blocks under
    /// [`ConflictPolicy::Block`].
    pub fn can_commit(&self, policy: ConflictPolicy) -> bool {
        self.passes_rules() && !(self.conflict && policy == ConflictPolicy::Block)
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Check a candidate window against the notice and business-hour rules.
///
/// The hour-of-day is read from `candidate.start()` as given; any timezone
/// shift must already be applied by the caller.
pub fn validate(
    candidate: &TimeWindow,
    now: DateTime<Utc>,
    rules: &BusinessRules,
) -> ValidationResult {
    let mut violations = Vec::new();

    if candidate.start() - now < rules.min_notice() {
        violations.push(Violation::MinimumNotice {
            hours: rules.min_notice_hours(),
        });
    }

    if !rules.within_business_hours(candidate.start().hour()) {
        violations.push(Violation::OutsideBusinessHours {
            start: rules.business_hours_start(),
            end: rules.business_hours_end(),
        });
    }

    tracing::debug!(
        start = %candidate.start(),
        end = %candidate.end(),
        violations = violations.len(),
        "validated candidate window"
    );

    ValidationResult {
        violations,
        conflict: false,
    }
}

/// [`validate`] for unchecked inputs.
///
/// Fails with `InvalidWindow` when `end <= start` and with
/// `InvalidConfiguration` for negative notice or an inverted hour range.
pub fn validate_raw(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
    min_notice_hours: f64,
    business_hours_start: u32,
    business_hours_end: u32,
) -> RescheduleResult<ValidationResult> {
    let rules = BusinessRules::new(min_notice_hours, business_hours_start, business_hours_end)?;
    let candidate = TimeWindow::new(start, end)?;
    Ok(validate(&candidate, now, &rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RescheduleError;
    use chrono::TimeZone;

    fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn messages_match_rule_values() {
        assert_eq!(
            Violation::MinimumNotice { hours: 24.0 }.to_string(),
            "Minimum notice of 24h not met"
        );
        assert_eq!(
            Violation::MinimumNotice { hours: 1.5 }.to_string(),
            "Minimum notice of 1.5h not met"
        );
        assert_eq!(
            Violation::OutsideBusinessHours { start: 9, end: 17 }.to_string(),
            "Start time outside business hours (9–17)"
        );
    }

    #[test]
    fn notice_exactly_met_passes() {
        let rules = BusinessRules::default();
        let window = TimeWindow::new(utc(2, 10, 0), utc(2, 11, 0)).unwrap();
        let result = validate(&window, utc(1, 10, 0), &rules);
        assert!(result.passes_rules());
    }

    #[test]
    fn notice_short_by_a_minute_fails() {
        let rules = BusinessRules::default();
        let window = TimeWindow::new(utc(2, 10, 0), utc(2, 11, 0)).unwrap();
        let result = validate(&window, utc(1, 10, 1), &rules);
        assert_eq!(
            result.violations,
            vec![Violation::MinimumNotice { hours: 24.0 }]
        );
    }

    #[test]
    fn both_rules_reported_together() {
        let rules = BusinessRules::default();
        let window = TimeWindow::new(utc(1, 20, 0), utc(1, 21, 0)).unwrap();
        let result = validate(&window, utc(1, 0, 0), &rules);
        assert_eq!(result.violations.len(), 2);
    }

    #[test]
    fn conflict_blocks_only_under_block_policy() {
        let result = ValidationResult::default().with_conflict(true);
        assert!(result.passes_rules());
        assert!(result.can_commit(ConflictPolicy::Warn));
        assert!(!result.can_commit(ConflictPolicy::Block));
    }

    #[test]
    fn violations_block_regardless_of_policy() {
        let result = ValidationResult {
            violations: vec![Violation::OutsideBusinessHours { start: 9, end: 17 }],
            conflict: false,
        };
        assert!(!result.can_commit(ConflictPolicy::Warn));
        assert!(!result.can_commit(ConflictPolicy::Block));
    }

    #[test]
    fn raw_rejects_inverted_window() {
        let err = validate_raw(utc(2, 11, 0), utc(2, 10, 0), utc(1, 0, 0), 24.0, 9, 17)
            .unwrap_err();
        assert!(matches!(err, RescheduleError::InvalidWindow(_)));
    }

    #[test]
    fn raw_rejects_bad_rules() {
        let err = validate_raw(utc(2, 10, 0), utc(2, 11, 0), utc(1, 0, 0), -2.0, 9, 17)
            .unwrap_err();
        assert!(matches!(err, RescheduleError::InvalidConfiguration(_)));

        let err = validate_raw(utc(2, 10, 0), utc(2, 11, 0), utc(1, 0, 0), 24.0, 17, 9)
            .unwrap_err();
        assert!(matches!(err, RescheduleError::InvalidConfiguration(_)));
    }
}
