//! Wall-clock time ranges and inclusive date ranges.
//!
//! [`TimeRange`] is half-open (`[start, end)`), so two ranges that touch at a
//! boundary do not overlap. [`DateRange`] is inclusive on both ends, matching how
//! blocked periods are entered ("from the 18th to the 20th").

use std::fmt;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::wire;

/// A wall-clock interval within one day. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "crate::wire::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "crate::wire::hhmm")]
    pub end: NaiveTime,
}

impl TimeRange {
    /// Build a range, or `None` if `start >= end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// `a.start < b.end && b.start < a.end`; adjacent ranges do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains_range(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        TimeRange::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Remove `other` from `self`, yielding zero, one or two pieces in order.
    pub fn subtract(&self, other: &TimeRange) -> Vec<TimeRange> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut pieces = Vec::with_capacity(2);
        if let Some(before) = TimeRange::new(self.start, other.start) {
            pieces.push(before);
        }
        if let Some(after) = TimeRange::new(other.end, self.end) {
            pieces.push(after);
        }
        pieces
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            wire::format_time(self.start),
            wire::format_time(self.end)
        )
    }
}

/// Merge overlapping or adjacent ranges, clipped to `window`.
///
/// Returns a sorted, non-overlapping list.
pub fn merge(ranges: &[TimeRange], window: TimeRange) -> Vec<TimeRange> {
    let mut clipped: Vec<TimeRange> = ranges
        .iter()
        .filter_map(|r| r.intersection(&window))
        .collect();

    if clipped.is_empty() {
        return Vec::new();
    }

    clipped.sort();

    let mut merged: Vec<TimeRange> = Vec::with_capacity(clipped.len());
    for range in clipped {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// The parts of `window` not covered by any of `busy`, in chronological order.
pub fn free_within(window: TimeRange, busy: &[TimeRange]) -> Vec<TimeRange> {
    let merged = merge(busy, window);

    let mut free = Vec::new();
    let mut cursor = window.start;

    for taken in &merged {
        if let Some(gap) = TimeRange::new(cursor, taken.start) {
            free.push(gap);
        }
        cursor = cursor.max(taken.end);
    }

    if let Some(tail) = TimeRange::new(cursor, window.end) {
        free.push(tail);
    }

    free
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(alias = "startDate")]
    pub start: NaiveDate,
    #[serde(alias = "endDate")]
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, or `None` if `start > end`. A single day is valid.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        DateRange::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Number of days in the range, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            wire::format_date(self.start),
            wire::format_date(self.end)
        )
    }
}
