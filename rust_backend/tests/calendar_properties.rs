//! Property tests for work-calendar invariants.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use shopfloor_rust::algorithms::{DurationAggregator, WorkCalendar};
use shopfloor_rust::models::Timestamp;

/// Minute-resolution timestamps over a few years.
fn timestamp() -> impl Strategy<Value = Timestamp> {
    (0u64..1_500, 0u32..24, 0u32..60).prop_map(|(day, hour, minute)| {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(day);
        Timestamp::new(date.and_hms_opt(hour, minute, 0).unwrap())
    })
}

proptest! {
    #[test]
    fn clamp_moves_non_workdays_to_window_start(ts in timestamp()) {
        let calendar = WorkCalendar::default();
        prop_assume!(!calendar.is_workday(ts));

        let clamped = calendar.clamp_to_window(ts, true);
        prop_assert!(calendar.is_workday(clamped));
        prop_assert_eq!(clamped.time(), calendar.window_start());
        prop_assert!(clamped > ts);
    }

    #[test]
    fn advance_by_zero_is_clamp(ts in timestamp()) {
        let calendar = WorkCalendar::default();
        prop_assert_eq!(
            calendar.advance_working_minutes(ts, 0),
            calendar.clamp_to_window(ts, true)
        );
    }

    #[test]
    fn advance_lands_inside_working_time(ts in timestamp(), minutes in 0i64..20_000) {
        let calendar = WorkCalendar::default();
        let result = calendar.advance_working_minutes(ts, minutes);

        prop_assert!(calendar.is_workday(result));
        prop_assert!(result.time() >= calendar.window_start());
        prop_assert!(result.time() <= calendar.window_end());
        prop_assert!(result.date().weekday().num_days_from_monday() < 5);
    }

    #[test]
    fn advance_is_associative(ts in timestamp(), m1 in 0i64..5_000, m2 in 0i64..5_000) {
        let calendar = WorkCalendar::default();
        let stepwise = calendar.advance_working_minutes(calendar.advance_working_minutes(ts, m1), m2);
        prop_assert_eq!(stepwise, calendar.advance_working_minutes(ts, m1 + m2));
    }

    #[test]
    fn advance_is_monotonic(ts in timestamp(), m1 in 0i64..5_000, extra in 0i64..5_000) {
        let calendar = WorkCalendar::default();
        prop_assert!(
            calendar.advance_working_minutes(ts, m1) <= calendar.advance_working_minutes(ts, m1 + extra)
        );
    }

    #[test]
    fn duration_is_zero_when_start_not_before_end(a in timestamp(), b in timestamp()) {
        let aggregator = DurationAggregator::default();
        let (start, end) = if a >= b { (a, b) } else { (b, a) };
        prop_assert_eq!(aggregator.working_duration(Some(start), Some(end)), 0.0);
        prop_assert_eq!(aggregator.working_duration(None, Some(end)), 0.0);
        prop_assert_eq!(aggregator.working_duration(Some(start), None), 0.0);
    }

    #[test]
    fn duration_measures_advance_within_window(minutes in 0i64..3_000) {
        // From a window start on a Monday, advancing and measuring back agree.
        let calendar = WorkCalendar::default();
        let aggregator = DurationAggregator::new(calendar);
        let start = Timestamp::from_ymd_hm(2024, 3, 11, 7, 30).unwrap();
        let end = calendar.advance_working_minutes(start, minutes);

        prop_assert_eq!(aggregator.working_duration(Some(start), Some(end)), minutes as f64);
    }
}
