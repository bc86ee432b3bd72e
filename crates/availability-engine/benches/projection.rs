use availability_engine::blocked::BlockedPeriod;
use availability_engine::calendar::project_month;
use availability_engine::schedule::WeeklySchedule;
use availability_engine::slots::generate_slots;
use availability_engine::TimeRange;
use chrono::{Days, NaiveDate, NaiveTime, TimeDelta};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// A year of scattered blocks: one short all-day block and one lunch block
/// per week.
fn year_of_blocks() -> Vec<BlockedPeriod> {
    let lunch = TimeRange::new(t(12, 0), t(13, 0)).unwrap();
    (0..52u64)
        .flat_map(|week| {
            let monday = date(2025, 1, 6).checked_add_days(Days::new(week * 7)).unwrap();
            let wednesday = monday.checked_add_days(Days::new(2)).unwrap();
            [
                BlockedPeriod::all_day(monday, monday).with_reason("Admin"),
                BlockedPeriod::partial(wednesday, wednesday, lunch),
            ]
        })
        .collect()
}

fn bench_project_month(c: &mut Criterion) {
    let schedule = WeeklySchedule::business_hours();
    let blocked = year_of_blocks();

    c.bench_function("project_month/52_weeks_of_blocks", |b| {
        b.iter(|| project_month(black_box(2025), black_box(10), &schedule, &blocked))
    });
}

fn bench_generate_slots(c: &mut Criterion) {
    let schedule = WeeklySchedule::business_hours();
    let blocked = year_of_blocks();
    let consumed: Vec<TimeRange> = (9..17)
        .step_by(2)
        .map(|h| TimeRange::new(t(h, 0), t(h, 30)).unwrap())
        .collect();

    c.bench_function("generate_slots/15min_with_bookings", |b| {
        b.iter(|| {
            generate_slots(
                black_box(date(2025, 10, 15)),
                &schedule,
                &blocked,
                TimeDelta::minutes(15),
                &consumed,
            )
        })
    });
}

criterion_group!(benches, bench_project_month, bench_generate_slots);
criterion_main!(benches);
