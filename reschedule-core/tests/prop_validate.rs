//! Property tests: rule outcomes for arbitrary candidates and rules.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use proptest::sample::select;
use reschedule_core::{BusinessRules, TimeWindow, Violation, validate};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Whole-hour notice in 0..=72, business hours start < end <= 23.
fn arb_rules() -> impl Strategy<Value = BusinessRules> {
    (0u32..=72, 0u32..23)
        .prop_flat_map(|(notice, start)| (Just(notice), Just(start), (start + 1)..=23))
        .prop_map(|(notice, start, end)| BusinessRules::new(f64::from(notice), start, end).unwrap())
}

fn window_at(start: DateTime<Utc>, length_minutes: i64) -> TimeWindow {
    TimeWindow::starting_at(start, Duration::minutes(length_minutes)).unwrap()
}

/// Midnight of the first day on which any start time satisfies the notice.
fn first_clear_day(rules: &BusinessRules) -> DateTime<Utc> {
    let days = (rules.min_notice_hours() as i64 + 23) / 24;
    now() + Duration::days(days)
}

/// Rules plus a candidate that meets the notice and starts in business hours.
fn arb_compliant() -> impl Strategy<Value = (BusinessRules, TimeWindow)> {
    arb_rules().prop_flat_map(|rules| {
        let hours = rules.business_hours_start()..rules.business_hours_end();
        (Just(rules), 0i64..10, hours, 0i64..60, 1i64..=240).prop_map(
            |(rules, extra_days, hour, minute, length)| {
                let start = first_clear_day(&rules)
                    + Duration::days(extra_days)
                    + Duration::hours(i64::from(hour))
                    + Duration::minutes(minute);
                (rules, window_at(start, length))
            },
        )
    })
}

/// Rules plus a candidate starting before the notice period has elapsed.
fn arb_short_notice() -> impl Strategy<Value = (BusinessRules, TimeWindow)> {
    arb_rules().prop_flat_map(|rules| {
        let notice_minutes = rules.min_notice_hours() as i64 * 60;
        (Just(rules), -1440i64..notice_minutes, 1i64..=240).prop_map(
            |(rules, offset, length)| (rules, window_at(now() + Duration::minutes(offset), length)),
        )
    })
}

/// Rules plus a candidate whose start hour is outside business hours.
fn arb_off_hours() -> impl Strategy<Value = (BusinessRules, TimeWindow)> {
    arb_rules().prop_flat_map(|rules| {
        let off_hours: Vec<u32> = (0..24)
            .filter(|h| !rules.within_business_hours(*h))
            .collect();
        (Just(rules), 0i64..30, select(off_hours), 1i64..=240).prop_map(
            |(rules, day, hour, length)| {
                let start = now() + Duration::days(day) + Duration::hours(i64::from(hour));
                (rules, window_at(start, length))
            },
        )
    })
}

fn arb_any() -> impl Strategy<Value = (BusinessRules, TimeWindow)> {
    (arb_rules(), -1440i64..43_200, 1i64..=240)
        .prop_map(|(rules, offset, length)| (rules, window_at(now() + Duration::minutes(offset), length)))
}

proptest! {
    #[test]
    fn compliant_candidates_have_no_violations((rules, window) in arb_compliant()) {
        let result = validate(&window, now(), &rules);

        prop_assert!(result.violations.is_empty(), "unexpected {:?}", result.violations);
    }

    #[test]
    fn short_notice_always_reported((rules, window) in arb_short_notice()) {
        let result = validate(&window, now(), &rules);

        let expected = Violation::MinimumNotice { hours: rules.min_notice_hours() };
        prop_assert!(result.violations.contains(&expected));
    }

    #[test]
    fn off_hours_start_always_reported((rules, window) in arb_off_hours()) {
        let result = validate(&window, now(), &rules);

        let expected = Violation::OutsideBusinessHours {
            start: rules.business_hours_start(),
            end: rules.business_hours_end(),
        };
        prop_assert!(result.violations.contains(&expected));
    }

    #[test]
    fn validation_is_deterministic((rules, window) in arb_any()) {
        prop_assert_eq!(validate(&window, now(), &rules), validate(&window, now(), &rules));
    }

    #[test]
    fn at_most_one_violation_per_rule((rules, window) in arb_any()) {
        let result = validate(&window, now(), &rules);

        prop_assert!(result.violations.len() <= 2);
        prop_assert!(!result.conflict);
    }
}
