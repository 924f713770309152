//! Tests for service-timezone helpers and time ranges

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{TimeRange, Timezone};
use proptest::prelude::*;

#[test]
fn test_timezone_from_name() {
    let tz = Timezone::from_name("America/Chicago").unwrap();
    assert_eq!(tz.0.name(), "America/Chicago");
    assert_eq!(Timezone::default().0.name(), "America/New_York");
}

#[test]
fn test_start_of_month_in_service_timezone() {
    let tz = Timezone::default();
    let start = tz.start_of_month(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    // EST (UTC-5) on March 1st
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap());
}

#[test]
fn test_empty_range() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let range = TimeRange::new(at, at).unwrap();
    assert!(range.is_empty());
    assert!(!range.contains(at));
    assert_eq!(range.duration(), Duration::zero());
}

proptest! {
    #[test]
    fn prop_start_of_today_precedes_now(secs in 1_500_000_000i64..2_000_000_000i64) {
        let tz = Timezone::default();
        let now = Utc.timestamp_opt(secs, 0).unwrap();
        let start = tz.start_of_day(tz.today(now));
        prop_assert!(start <= now);
        prop_assert!(now - start < Duration::hours(25));
    }
}
