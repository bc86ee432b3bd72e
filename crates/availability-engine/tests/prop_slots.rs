//! Property-based tests for slot generation.

use availability_engine::blocked::BlockedPeriod;
use availability_engine::schedule::{DaySchedule, WeeklySchedule};
use availability_engine::slots::{free_intervals, generate_slots};
use availability_engine::TimeRange;
use chrono::{NaiveDate, NaiveTime, TimeDelta};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 21).unwrap()
}

/// Minute of day in `0..1440`, as a time.
fn at(minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap()
}

fn arb_time_range() -> impl Strategy<Value = TimeRange> {
    (0u32..1439, 1u32..=720).prop_map(|(start, len)| {
        let end = (start + len).min(1439);
        TimeRange::new(at(start), at(end)).unwrap()
    })
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(30), Just(45), Just(60), Just(90), 1i64..=240]
}

fn arb_consumed() -> impl Strategy<Value = Vec<TimeRange>> {
    prop::collection::vec(arb_time_range(), 0..6)
}

fn arb_partial_blocks() -> impl Strategy<Value = Vec<BlockedPeriod>> {
    prop::collection::vec(
        arb_time_range().prop_map(|hours| BlockedPeriod::partial(monday(), monday(), hours)),
        0..4,
    )
}

fn schedule_with(open: TimeRange) -> WeeklySchedule {
    WeeklySchedule::from_days(vec![DaySchedule::open(1, open)])
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: every slot has exactly the requested length
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_have_requested_length(
        open in arb_time_range(),
        minutes in arb_duration(),
        blocked in arb_partial_blocks(),
        consumed in arb_consumed(),
    ) {
        let duration = TimeDelta::minutes(minutes);
        let slots = generate_slots(monday(), &schedule_with(open), &blocked, duration, &consumed)
            .unwrap();

        for slot in &slots {
            prop_assert_eq!(slot.duration(), duration);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: slots stay inside the open interval and miss every busy range
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_avoid_blocks_and_bookings(
        open in arb_time_range(),
        minutes in arb_duration(),
        blocked in arb_partial_blocks(),
        consumed in arb_consumed(),
    ) {
        let slots = generate_slots(
            monday(),
            &schedule_with(open),
            &blocked,
            TimeDelta::minutes(minutes),
            &consumed,
        )
        .unwrap();

        for slot in &slots {
            let range = slot.as_range();
            prop_assert!(open.contains_range(&range), "{} escapes {}", range, open);
            for busy in &consumed {
                prop_assert!(!range.overlaps(busy), "{} overlaps booking {}", range, busy);
            }
            for period in &blocked {
                let hours = period.time_range().unwrap();
                prop_assert!(!range.overlaps(&hours), "{} overlaps block {}", range, hours);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: slots are ordered and never overlap each other
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_are_sorted_and_disjoint(
        open in arb_time_range(),
        minutes in arb_duration(),
        consumed in arb_consumed(),
    ) {
        let slots = generate_slots(
            monday(),
            &schedule_with(open),
            &[],
            TimeDelta::minutes(minutes),
            &consumed,
        )
        .unwrap();

        for pair in slots.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: each free interval is tiled from its start, leaving less than
// one slot unused
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_time_is_tiled_greedily(
        open in arb_time_range(),
        minutes in arb_duration(),
        consumed in arb_consumed(),
    ) {
        let schedule = schedule_with(open);
        let duration = TimeDelta::minutes(minutes);
        let free = free_intervals(monday(), &schedule, &[], &consumed);
        let slots = generate_slots(monday(), &schedule, &[], duration, &consumed).unwrap();

        let expected: i64 = free
            .iter()
            .map(|r| r.duration().num_minutes() / minutes)
            .sum();
        prop_assert_eq!(slots.len() as i64, expected);
    }
}

// ---------------------------------------------------------------------------
// Property 5: non-positive durations are always rejected
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn non_positive_duration_is_an_error(
        open in arb_time_range(),
        minutes in -240i64..=0,
    ) {
        let result = generate_slots(
            monday(),
            &schedule_with(open),
            &[],
            TimeDelta::minutes(minutes),
            &[],
        );

        prop_assert!(result.is_err());
    }
}
