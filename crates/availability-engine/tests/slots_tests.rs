//! Tests for bookable slot generation.

use availability_engine::blocked::BlockedPeriod;
use availability_engine::error::EngineError;
use availability_engine::schedule::{DaySchedule, WeeklySchedule};
use availability_engine::slots::{free_intervals, generate_slots, Slot};
use availability_engine::TimeRange;
use chrono::{NaiveDate, NaiveTime, TimeDelta};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn range(sh: u32, sm: u32, eh: u32, em: u32) -> TimeRange {
    TimeRange::new(t(sh, sm), t(eh, em)).unwrap()
}

fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> Slot {
    Slot {
        start: t(sh, sm),
        end: t(eh, em),
    }
}

/// Every weekday open with the same hours.
fn every_day(hours: TimeRange) -> WeeklySchedule {
    WeeklySchedule::from_days((0..7).map(|d| DaySchedule::open(d, hours)))
}

fn monday() -> NaiveDate {
    date(2025, 7, 21)
}

#[test]
fn four_hour_window_tiles_into_four_contiguous_slots() {
    let schedule = every_day(range(9, 0, 13, 0));

    let slots = generate_slots(monday(), &schedule, &[], TimeDelta::hours(1), &[]).unwrap();

    assert_eq!(
        slots,
        vec![
            slot(9, 0, 10, 0),
            slot(10, 0, 11, 0),
            slot(11, 0, 12, 0),
            slot(12, 0, 13, 0),
        ]
    );
    for pair in slots.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "slots must be back-to-back");
    }
    assert_eq!(slots.first().unwrap().start, t(9, 0));
    assert_eq!(slots.last().unwrap().end, t(13, 0));
}

#[test]
fn consumed_interval_splits_the_day() {
    let consumed = vec![range(12, 0, 13, 0)];

    let slots = generate_slots(
        monday(),
        &WeeklySchedule::business_hours(),
        &[],
        TimeDelta::hours(1),
        &consumed,
    )
    .unwrap();

    assert_eq!(slots.len(), 7);
    assert_eq!(slots[2], slot(11, 0, 12, 0));
    assert_eq!(slots[3], slot(13, 0, 14, 0));
    assert!(
        slots.iter().all(|s| !s.as_range().overlaps(&range(12, 0, 13, 0))),
        "no slot may span the consumed hour"
    );
}

#[test]
fn partial_block_is_subtracted_not_the_whole_day() {
    let blocked = vec![BlockedPeriod::partial(monday(), monday(), range(9, 0, 12, 0))];

    let slots = generate_slots(
        monday(),
        &WeeklySchedule::business_hours(),
        &blocked,
        TimeDelta::hours(2),
        &[],
    )
    .unwrap();

    assert_eq!(
        slots,
        vec![slot(12, 0, 14, 0), slot(14, 0, 16, 0)],
        "16:00-17:00 is shorter than the duration and is dropped"
    );
}

#[test]
fn all_day_block_yields_no_slots() {
    let blocked = vec![BlockedPeriod::all_day(monday(), monday())];

    let slots = generate_slots(
        monday(),
        &WeeklySchedule::business_hours(),
        &blocked,
        TimeDelta::minutes(30),
        &[],
    )
    .unwrap();

    assert!(slots.is_empty());
}

#[test]
fn inactive_block_does_not_remove_slots() {
    let blocked = vec![BlockedPeriod::all_day(monday(), monday()).inactive()];

    let slots = generate_slots(
        monday(),
        &WeeklySchedule::business_hours(),
        &blocked,
        TimeDelta::hours(1),
        &[],
    )
    .unwrap();

    assert_eq!(slots.len(), 8);
}

#[test]
fn closed_day_yields_no_slots() {
    let sunday = date(2025, 7, 20);

    let slots = generate_slots(
        sunday,
        &WeeklySchedule::business_hours(),
        &[],
        TimeDelta::hours(1),
        &[],
    )
    .unwrap();

    assert!(slots.is_empty());
}

#[test]
fn block_covering_the_open_interval_yields_no_slots() {
    let blocked = vec![BlockedPeriod::partial(monday(), monday(), range(8, 0, 18, 0))];

    let free = free_intervals(monday(), &WeeklySchedule::business_hours(), &blocked, &[]);

    assert!(free.is_empty());
}

#[test]
fn exact_fit_yields_exactly_one_slot() {
    let schedule = every_day(range(10, 0, 11, 30));

    let slots = generate_slots(monday(), &schedule, &[], TimeDelta::minutes(90), &[]).unwrap();

    assert_eq!(slots, vec![slot(10, 0, 11, 30)]);
}

#[test]
fn remainder_shorter_than_duration_is_dropped() {
    let schedule = every_day(range(9, 0, 10, 45));

    let slots = generate_slots(monday(), &schedule, &[], TimeDelta::minutes(30), &[]).unwrap();

    assert_eq!(slots.len(), 3);
    assert_eq!(slots.last().unwrap().end, t(10, 30));
}

#[test]
fn overlapping_consumed_and_blocked_intervals_merge() {
    let blocked = vec![BlockedPeriod::partial(monday(), monday(), range(10, 0, 11, 30))];
    let consumed = vec![range(11, 0, 12, 0), range(14, 0, 15, 0)];

    let free = free_intervals(
        monday(),
        &WeeklySchedule::business_hours(),
        &blocked,
        &consumed,
    );

    assert_eq!(
        free,
        vec![range(9, 0, 10, 0), range(12, 0, 14, 0), range(15, 0, 17, 0)]
    );
}

#[test]
fn zero_duration_is_rejected() {
    let result = generate_slots(
        monday(),
        &WeeklySchedule::business_hours(),
        &[],
        TimeDelta::zero(),
        &[],
    );

    assert_eq!(result, Err(EngineError::InvalidDuration(0)));
}

#[test]
fn negative_duration_is_rejected_even_on_closed_day() {
    let result = generate_slots(
        date(2025, 7, 20),
        &WeeklySchedule::business_hours(),
        &[],
        TimeDelta::minutes(-30),
        &[],
    );

    assert_eq!(result, Err(EngineError::InvalidDuration(-1800)));
}

#[test]
fn sub_minute_negative_duration_reports_its_seconds() {
    let result = generate_slots(
        monday(),
        &WeeklySchedule::business_hours(),
        &[],
        TimeDelta::seconds(-30),
        &[],
    );

    assert_eq!(result, Err(EngineError::InvalidDuration(-30)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Invalid slot duration: -30s (must be positive)"
    );
}

#[test]
fn every_slot_has_the_requested_length() {
    let consumed = vec![range(9, 40, 10, 10), range(13, 5, 13, 50)];

    let slots = generate_slots(
        monday(),
        &WeeklySchedule::business_hours(),
        &[],
        TimeDelta::minutes(45),
        &consumed,
    )
    .unwrap();

    assert!(!slots.is_empty());
    for s in &slots {
        assert_eq!(s.duration(), TimeDelta::minutes(45));
    }
    let mut sorted = slots.clone();
    sorted.sort();
    assert_eq!(slots, sorted, "slots come out in chronological order");
}
