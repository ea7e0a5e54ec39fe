// Reporting-period resolver tests
//
// Weeks start on Sunday; month and year bounds follow the calendar, so
// leap years and month lengths need no special handling.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use proptest::prelude::*;

use transport_ops::core::period::week_number;
use transport_ops::core::{resolve_range, ReportingPeriod};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap()
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2100, 1u32..=366).prop_map(|(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal)
            .unwrap_or_else(|| NaiveDate::from_yo_opt(year, 365).unwrap())
    })
}

fn any_period() -> impl Strategy<Value = ReportingPeriod> {
    prop_oneof![
        Just(ReportingPeriod::Week),
        Just(ReportingPeriod::Month),
        Just(ReportingPeriod::Year),
    ]
}

#[test]
fn test_year_range() {
    let range = resolve_range(ReportingPeriod::Year, date(2024, 6, 15));

    assert_eq!(range.start, date(2024, 1, 1).and_time(NaiveTime::MIN));
    assert_eq!(range.end, date(2024, 12, 31).and_time(end_of_day()));
}

#[test]
fn test_february_leap_and_common_years() {
    let leap = resolve_range(ReportingPeriod::Month, date(2024, 2, 10));
    assert_eq!(leap.end_date(), date(2024, 2, 29));

    let common = resolve_range(ReportingPeriod::Month, date(2023, 2, 10));
    assert_eq!(common.end_date(), date(2023, 2, 28));
}

#[test]
fn test_month_ends() {
    let cases = [
        (date(2024, 1, 31), date(2024, 1, 31)),
        (date(2024, 4, 1), date(2024, 4, 30)),
        (date(2024, 12, 25), date(2024, 12, 31)),
        (date(1900, 2, 3), date(1900, 2, 28)),
        (date(2000, 2, 3), date(2000, 2, 29)),
    ];

    for (reference, expected_end) in cases {
        let range = resolve_range(ReportingPeriod::Month, reference);
        assert_eq!(range.start_date(), reference.with_day(1).unwrap());
        assert_eq!(range.end_date(), expected_end, "month of {}", reference);
        assert_eq!(range.end.time(), end_of_day());
    }
}

#[test]
fn test_week_starts_on_sunday() {
    // 2024-06-15 is a Saturday
    let range = resolve_range(ReportingPeriod::Week, date(2024, 6, 15));
    assert_eq!(range.start_date(), date(2024, 6, 9));
    assert_eq!(range.end_date(), date(2024, 6, 15));

    // A Sunday is the first day of its own week
    let range = resolve_range(ReportingPeriod::Week, date(2024, 6, 16));
    assert_eq!(range.start_date(), date(2024, 6, 16));
    assert_eq!(range.end_date(), date(2024, 6, 22));
}

#[test]
fn test_week_crossing_year_boundary() {
    // 2025-01-01 is a Wednesday
    let range = resolve_range(ReportingPeriod::Week, date(2025, 1, 1));
    assert_eq!(range.start_date(), date(2024, 12, 29));
    assert_eq!(range.end_date(), date(2025, 1, 4));
}

#[test]
fn test_range_contains_its_bounds() {
    let range = resolve_range(ReportingPeriod::Month, date(2024, 6, 15));

    assert!(range.contains(date(2024, 6, 1).and_time(NaiveTime::MIN)));
    assert!(range.contains(date(2024, 6, 30).and_time(end_of_day())));
    assert!(!range.contains(date(2024, 7, 1).and_time(NaiveTime::MIN)));
    assert!(range.contains_date(date(2024, 6, 30)));
    assert!(!range.contains_date(date(2024, 5, 31)));
}

#[test]
fn test_week_numbers() {
    assert_eq!(week_number(date(2024, 1, 1)), 1);
    // 2024-01-07 is the first Sunday, opening week 2
    assert_eq!(week_number(date(2024, 1, 6)), 1);
    assert_eq!(week_number(date(2024, 1, 7)), 2);
}

#[test]
fn test_period_tokens() {
    let parsed: ReportingPeriod = serde_json::from_str("\"week\"").unwrap();
    assert_eq!(parsed, ReportingPeriod::Week);
    assert!(serde_json::from_str::<ReportingPeriod>("\"quarter\"").is_err());

    assert_eq!(ReportingPeriod::Month.to_string(), "month");
    assert_eq!(ReportingPeriod::Year.label(), "Año");
}

proptest! {
    #[test]
    fn test_resolution_is_idempotent(period in any_period(), reference in any_date()) {
        prop_assert_eq!(resolve_range(period, reference), resolve_range(period, reference));
    }

    #[test]
    fn test_reference_is_inside_its_range(period in any_period(), reference in any_date()) {
        let range = resolve_range(period, reference);
        prop_assert!(range.contains_date(reference));
        prop_assert_eq!(range.start.time(), NaiveTime::MIN);
        prop_assert_eq!(range.end.time(), end_of_day());
    }

    #[test]
    fn test_weeks_span_seven_days(reference in any_date()) {
        let range = resolve_range(ReportingPeriod::Week, reference);
        prop_assert_eq!(range.start_date().weekday(), Weekday::Sun);
        prop_assert_eq!((range.end_date() - range.start_date()).num_days(), 6);
    }

    #[test]
    fn test_month_end_is_last_day(reference in any_date()) {
        let range = resolve_range(ReportingPeriod::Month, reference);
        let next = range.end_date().succ_opt().unwrap();
        prop_assert_eq!(range.end_date().month(), reference.month());
        prop_assert_eq!(next.day(), 1);
    }
}
