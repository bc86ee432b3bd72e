//! Bookable slot generation.
//!
//! Starts from the weekday's open interval, removes every active partial-day
//! block covering the date and every consumed (already booked) interval, then
//! tiles what is left with back-to-back slots of the requested length. A
//! remainder shorter than one slot is dropped.
//!
//! All arithmetic is on `NaiveTime` / `TimeDelta`, so an interval exactly one
//! slot long yields exactly one slot.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::blocked::{BlockScope, BlockedPeriod};
use crate::error::{EngineError, Result};
use crate::interval::{self, TimeRange};
use crate::resolver::{active_covering, open_interval_for};
use crate::schedule::WeeklySchedule;

/// A fixed-length bookable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    #[serde(with = "crate::wire::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "crate::wire::hhmm")]
    pub end: NaiveTime,
}

impl Slot {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn as_range(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// The intervals of `date` still free after blocks and bookings, in order.
///
/// Empty when the weekday is closed or an all-day block covers the date.
pub fn free_intervals(
    date: NaiveDate,
    schedule: &WeeklySchedule,
    blocked: &[BlockedPeriod],
    consumed: &[TimeRange],
) -> Vec<TimeRange> {
    let Some(open) = open_interval_for(date, schedule) else {
        return Vec::new();
    };

    let mut taken: Vec<TimeRange> = Vec::with_capacity(consumed.len());
    for period in active_covering(date, blocked) {
        match period.scope() {
            BlockScope::WholeDay => return Vec::new(),
            BlockScope::Hours(hours) => taken.push(hours),
        }
    }
    taken.extend_from_slice(consumed);

    interval::free_within(open, &taken)
}

/// Generate the bookable slots of `duration` on `date`.
///
/// # Errors
/// Returns [`EngineError::InvalidDuration`] if `duration` is zero or negative.
/// "No availability" is an empty `Ok`, never an error.
pub fn generate_slots(
    date: NaiveDate,
    schedule: &WeeklySchedule,
    blocked: &[BlockedPeriod],
    duration: TimeDelta,
    consumed: &[TimeRange],
) -> Result<Vec<Slot>> {
    if duration <= TimeDelta::zero() {
        return Err(EngineError::InvalidDuration(duration.num_seconds()));
    }

    let slots: Vec<Slot> = free_intervals(date, schedule, blocked, consumed)
        .into_iter()
        .flat_map(|free| tile(free, duration))
        .collect();

    tracing::debug!(
        %date,
        duration_minutes = duration.num_minutes(),
        count = slots.len(),
        "generated slots"
    );
    Ok(slots)
}

/// Fill `range` with consecutive slots of `duration`, stopping before the end
/// or before the clock would wrap past midnight.
fn tile(range: TimeRange, duration: TimeDelta) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut cursor = range.start;
    loop {
        let (end, wrapped_secs) = cursor.overflowing_add_signed(duration);
        if wrapped_secs != 0 || end > range.end {
            break;
        }
        slots.push(Slot { start: cursor, end });
        cursor = end;
    }
    slots
}
