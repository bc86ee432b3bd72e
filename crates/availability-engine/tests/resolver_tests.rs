//! Tests for day-level and window-level resolution.

use availability_engine::blocked::{BlockedPeriod, DEFAULT_BLOCK_REASON};
use availability_engine::resolver::{
    resolve, resolve_window, AvailabilityStatus, CLOSED_REASON, OUTSIDE_HOURS_REASON,
};
use availability_engine::schedule::{DaySchedule, WeeklySchedule};
use availability_engine::TimeRange;
use chrono::{NaiveDate, NaiveTime};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn range(sh: u32, sm: u32, eh: u32, em: u32) -> TimeRange {
    TimeRange::new(t(sh, sm), t(eh, em)).unwrap()
}

fn monday() -> NaiveDate {
    date(2025, 7, 21)
}

fn sunday() -> NaiveDate {
    date(2025, 7, 20)
}

#[test]
fn open_weekday_is_available_with_its_hours() {
    let verdict = resolve(monday(), &WeeklySchedule::business_hours(), &[]);

    assert_eq!(verdict.status, AvailabilityStatus::Available);
    assert_eq!(verdict.open_interval, Some(range(9, 0, 17, 0)));
    assert_eq!(verdict.date, monday());
}

#[test]
fn closed_weekday_without_blocks_is_closed() {
    let verdict = resolve(sunday(), &WeeklySchedule::business_hours(), &[]);

    assert_eq!(verdict.status, AvailabilityStatus::Closed);
    assert_eq!(verdict.reason, CLOSED_REASON);
    assert!(verdict.open_interval.is_none());
}

#[test]
fn all_day_block_beats_open_weekday() {
    let blocked = vec![BlockedPeriod::all_day(date(2025, 7, 20), date(2025, 7, 22))
        .with_reason("Vacation")];

    let verdict = resolve(monday(), &WeeklySchedule::business_hours(), &blocked);

    assert_eq!(verdict.status, AvailabilityStatus::Blocked);
    assert_eq!(verdict.reason, "Vacation");
    assert!(verdict.open_interval.is_none());
}

#[test]
fn all_day_block_beats_closed_weekday() {
    let blocked = vec![BlockedPeriod::all_day(sunday(), sunday())];

    let verdict = resolve(sunday(), &WeeklySchedule::business_hours(), &blocked);

    assert_eq!(verdict.status, AvailabilityStatus::Blocked);
}

#[test]
fn partial_day_block_reports_whole_day_blocked() {
    let blocked = vec![BlockedPeriod::partial(monday(), monday(), range(12, 0, 13, 0))
        .with_reason("Dentist")];

    let verdict = resolve(monday(), &WeeklySchedule::business_hours(), &blocked);

    assert_eq!(verdict.status, AvailabilityStatus::Blocked);
    assert_eq!(verdict.reason, "Dentist");
}

#[test]
fn inactive_block_is_ignored() {
    let blocked = vec![BlockedPeriod::all_day(monday(), monday()).inactive()];

    let verdict = resolve(monday(), &WeeklySchedule::business_hours(), &blocked);

    assert_eq!(verdict.status, AvailabilityStatus::Available);
}

#[test]
fn first_matching_block_supplies_the_reason() {
    let blocked = vec![
        BlockedPeriod::all_day(date(2025, 7, 1), date(2025, 7, 10)).with_reason("Unrelated"),
        BlockedPeriod::all_day(monday(), monday())
            .with_reason("Inactive")
            .inactive(),
        BlockedPeriod::all_day(date(2025, 7, 18), date(2025, 7, 25)).with_reason("First"),
        BlockedPeriod::all_day(monday(), monday()).with_reason("Second"),
    ];

    let verdict = resolve(monday(), &WeeklySchedule::business_hours(), &blocked);

    assert_eq!(verdict.reason, "First");
}

#[test]
fn blank_reason_falls_back_to_generic_text() {
    let blocked = vec![
        BlockedPeriod::all_day(monday(), monday()).with_reason("   "),
        BlockedPeriod::all_day(sunday(), sunday()),
    ];
    let schedule = WeeklySchedule::business_hours();

    assert_eq!(resolve(monday(), &schedule, &blocked).reason, DEFAULT_BLOCK_REASON);
    assert_eq!(resolve(sunday(), &schedule, &blocked).reason, DEFAULT_BLOCK_REASON);
}

#[test]
fn block_range_is_inclusive_on_both_ends() {
    let blocked = vec![BlockedPeriod::all_day(date(2025, 7, 18), date(2025, 7, 21))];
    let schedule = WeeklySchedule::business_hours();

    assert!(resolve(date(2025, 7, 17), &schedule, &blocked).is_available());
    assert!(resolve(date(2025, 7, 18), &schedule, &blocked).is_blocked());
    assert!(resolve(date(2025, 7, 21), &schedule, &blocked).is_blocked());
    assert!(resolve(date(2025, 7, 22), &schedule, &blocked).is_available());
}

#[test]
fn missing_weekday_record_resolves_closed() {
    // Only Tuesday is configured.
    let schedule = WeeklySchedule::from_days(vec![DaySchedule::open(2, range(8, 0, 12, 0))]);

    let verdict = resolve(monday(), &schedule, &[]);

    assert_eq!(verdict.status, AvailabilityStatus::Closed);
    assert!(resolve(date(2025, 7, 22), &schedule, &[]).is_available());
}

#[test]
fn open_day_with_inverted_times_resolves_closed() {
    let schedule = WeeklySchedule::from_days(vec![DaySchedule {
        weekday: 1,
        is_available: true,
        start_time: Some(t(17, 0)),
        end_time: Some(t(9, 0)),
    }]);

    assert!(resolve(monday(), &schedule, &[]).is_closed());
}

#[test]
fn resolve_is_idempotent() {
    let schedule = WeeklySchedule::business_hours();
    let blocked = vec![BlockedPeriod::partial(monday(), monday(), range(10, 0, 11, 0))];

    let first = resolve(monday(), &schedule, &blocked);
    let second = resolve(monday(), &schedule, &blocked);

    assert_eq!(first, second);
}

#[test]
fn window_inside_hours_is_available() {
    let window = range(10, 0, 11, 0);

    let verdict = resolve_window(monday(), window, &WeeklySchedule::business_hours(), &[]);

    assert_eq!(verdict.status, AvailabilityStatus::Available);
    assert_eq!(verdict.open_interval, Some(window));
}

#[test]
fn window_outside_hours_is_closed() {
    let verdict = resolve_window(
        monday(),
        range(16, 30, 17, 30),
        &WeeklySchedule::business_hours(),
        &[],
    );

    assert_eq!(verdict.status, AvailabilityStatus::Closed);
    assert_eq!(verdict.reason, OUTSIDE_HOURS_REASON);
}

#[test]
fn window_clear_of_partial_block_is_available() {
    let blocked = vec![BlockedPeriod::partial(monday(), monday(), range(12, 0, 13, 0))];

    let verdict = resolve_window(
        monday(),
        range(13, 0, 14, 0),
        &WeeklySchedule::business_hours(),
        &blocked,
    );

    assert!(verdict.is_available());
}

#[test]
fn window_hitting_partial_block_is_blocked() {
    let blocked = vec![BlockedPeriod::partial(monday(), monday(), range(12, 0, 13, 0))
        .with_reason("Lunch meeting")];

    let verdict = resolve_window(
        monday(),
        range(11, 30, 12, 30),
        &WeeklySchedule::business_hours(),
        &blocked,
    );

    assert_eq!(verdict.status, AvailabilityStatus::Blocked);
    assert_eq!(verdict.reason, "Lunch meeting");
}

#[test]
fn window_on_closed_day_is_closed() {
    let verdict = resolve_window(
        sunday(),
        range(10, 0, 11, 0),
        &WeeklySchedule::business_hours(),
        &[],
    );

    assert_eq!(verdict.reason, CLOSED_REASON);
}

#[test]
fn verdict_serializes_with_wire_formats() {
    let verdict = resolve(monday(), &WeeklySchedule::business_hours(), &[]);

    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "date": "2025-07-21",
            "status": "available",
            "open_interval": {"start": "09:00", "end": "17:00"},
            "reason": "Available"
        })
    );
}
