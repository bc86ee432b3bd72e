//! Day-level availability verdicts.
//!
//! [`resolve`] combines the weekly schedule with blocked periods for a single
//! date. Blocks take priority over the schedule, and any active block covering
//! the date makes the whole date `Blocked`, even one that only removes a few
//! hours. Only the slot generator looks inside a partial block.
//!
//! Everything here is a pure function of its arguments: no clock reads, no
//! caching, so repeated calls with the same inputs give the same verdict.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::blocked::{BlockScope, BlockedPeriod};
use crate::interval::TimeRange;
use crate::schedule::{weekday_index, WeeklySchedule};

pub const AVAILABLE_REASON: &str = "Available";
pub const CLOSED_REASON: &str = "Closed";
pub const OUTSIDE_HOURS_REASON: &str = "Outside working hours";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Blocked,
    Closed,
}

impl AvailabilityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Blocked => "blocked",
            AvailabilityStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolver's answer for one date (or one window on a date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub date: NaiveDate,
    pub status: AvailabilityStatus,
    /// Present only when `status` is `Available`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interval: Option<TimeRange>,
    pub reason: String,
}

impl Verdict {
    fn available(date: NaiveDate, open_interval: TimeRange) -> Self {
        Self {
            date,
            status: AvailabilityStatus::Available,
            open_interval: Some(open_interval),
            reason: AVAILABLE_REASON.to_string(),
        }
    }

    fn blocked(date: NaiveDate, reason: &str) -> Self {
        Self {
            date,
            status: AvailabilityStatus::Blocked,
            open_interval: None,
            reason: reason.to_string(),
        }
    }

    fn closed(date: NaiveDate, reason: &str) -> Self {
        Self {
            date,
            status: AvailabilityStatus::Closed,
            open_interval: None,
            reason: reason.to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == AvailabilityStatus::Available
    }

    pub fn is_blocked(&self) -> bool {
        self.status == AvailabilityStatus::Blocked
    }

    pub fn is_closed(&self) -> bool {
        self.status == AvailabilityStatus::Closed
    }
}

/// Active periods covering `date`, in input order. Inactive periods are skipped
/// here even if the caller already filtered them.
pub(crate) fn active_covering(
    date: NaiveDate,
    blocked: &[BlockedPeriod],
) -> impl Iterator<Item = &BlockedPeriod> {
    blocked.iter().filter(move |p| p.is_active && p.covers(date))
}

/// The weekly working window for `date`, or `None` when the weekday is closed,
/// missing from the schedule, or open with unusable times.
pub(crate) fn open_interval_for(date: NaiveDate, schedule: &WeeklySchedule) -> Option<TimeRange> {
    let weekday = weekday_index(date);
    let Some(day) = schedule.day(weekday) else {
        tracing::debug!(%date, weekday, "no schedule record for weekday; treating as closed");
        return None;
    };
    if !day.is_available {
        return None;
    }
    let open = day.open_interval();
    if open.is_none() {
        tracing::warn!(
            %date,
            weekday,
            start = ?day.start_time,
            end = ?day.end_time,
            "open weekday has missing or inverted times; treating as closed"
        );
    }
    open
}

/// Resolve the availability of a single date.
///
/// 1. The first active blocked period containing `date` wins: `Blocked`, with
///    that period's reason.
/// 2. Otherwise the weekday's schedule decides: `Available` with its open
///    interval, or `Closed`.
pub fn resolve(date: NaiveDate, schedule: &WeeklySchedule, blocked: &[BlockedPeriod]) -> Verdict {
    if let Some(period) = active_covering(date, blocked).next() {
        tracing::debug!(%date, id = ?period.id, "date covered by blocked period");
        return Verdict::blocked(date, period.display_reason());
    }

    match open_interval_for(date, schedule) {
        Some(open) => Verdict::available(date, open),
        None => Verdict::closed(date, CLOSED_REASON),
    }
}

/// Resolve whether a specific window on `date` can be booked.
///
/// Unlike [`resolve`], a partial block only matters here if it intersects the
/// window. A window that pokes outside the working hours is `Closed` with
/// [`OUTSIDE_HOURS_REASON`]. An available verdict carries the window itself as
/// its open interval.
pub fn resolve_window(
    date: NaiveDate,
    window: TimeRange,
    schedule: &WeeklySchedule,
    blocked: &[BlockedPeriod],
) -> Verdict {
    let covering: Vec<&BlockedPeriod> = active_covering(date, blocked).collect();

    if let Some(period) = covering
        .iter()
        .find(|p| p.scope() == BlockScope::WholeDay)
    {
        return Verdict::blocked(date, period.display_reason());
    }

    let Some(open) = open_interval_for(date, schedule) else {
        return Verdict::closed(date, CLOSED_REASON);
    };
    if !open.contains_range(&window) {
        return Verdict::closed(date, OUTSIDE_HOURS_REASON);
    }

    for period in covering {
        if let BlockScope::Hours(hours) = period.scope() {
            if hours.overlaps(&window) {
                return Verdict::blocked(date, period.display_reason());
            }
        }
    }

    Verdict::available(date, window)
}
