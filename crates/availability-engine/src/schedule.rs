//! The provider's recurring weekly schedule.
//!
//! One [`DaySchedule`] per weekday, Sunday = 0 through Saturday = 6. A day that
//! is open carries a start and end time; a closed day carries neither. The
//! editor may pass through interim states that break this (a cleared input, an
//! inverted pair), which is why the times are optional and checked by
//! [`WeeklySchedule::validate`] rather than by construction.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::interval::TimeRange;
use crate::validation::ValidationErrors;

/// Number of weekday records in a complete schedule.
pub const DAYS_PER_WEEK: u8 = 7;

/// Weekday index with Sunday = 0.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// The `09:00-17:00` window seeded whenever a day or block is switched to a
/// timed state.
pub fn default_window() -> TimeRange {
    TimeRange {
        start: hm(9, 0),
        end: hm(17, 0),
    }
}

/// Which end of a time pair a form input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeField {
    Start,
    End,
}

impl TimeField {
    /// The field name used in error paths and on the wire.
    pub fn key(self) -> &'static str {
        match self {
            TimeField::Start => "start_time",
            TimeField::End => "end_time",
        }
    }
}

/// Error path for a field of one weekday, e.g. `days[3].end_time`.
pub fn day_field_path(weekday: u8, field: TimeField) -> String {
    format!("days[{}].{}", weekday, field.key())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(alias = "day_of_week", alias = "dayOfWeek")]
    pub weekday: u8,
    #[serde(alias = "isAvailable")]
    pub is_available: bool,
    #[serde(default, alias = "startTime", with = "crate::wire::hhmm_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, alias = "endTime", with = "crate::wire::hhmm_option")]
    pub end_time: Option<NaiveTime>,
}

impl DaySchedule {
    pub fn closed(weekday: u8) -> Self {
        Self {
            weekday,
            is_available: false,
            start_time: None,
            end_time: None,
        }
    }

    pub fn open(weekday: u8, hours: TimeRange) -> Self {
        Self {
            weekday,
            is_available: true,
            start_time: Some(hours.start),
            end_time: Some(hours.end),
        }
    }

    /// The working window, if the day is open and its times are well formed.
    pub fn open_interval(&self) -> Option<TimeRange> {
        if !self.is_available {
            return None;
        }
        TimeRange::new(self.start_time?, self.end_time?)
    }

    /// Flip availability. Opening seeds the default window so a day is never
    /// open without times; closing clears both times.
    pub fn toggle_availability(&mut self) {
        if self.is_available {
            self.is_available = false;
            self.start_time = None;
            self.end_time = None;
        } else {
            let window = default_window();
            self.is_available = true;
            self.start_time = Some(window.start);
            self.end_time = Some(window.end);
        }
    }

    /// Set one end of the window. Ordering is checked later by `validate`.
    pub fn set_time(&mut self, field: TimeField, value: Option<NaiveTime>) {
        match field {
            TimeField::Start => self.start_time = value,
            TimeField::End => self.end_time = value,
        }
    }

    /// Drop the times of a closed day.
    fn without_stale_hours(mut self) -> Self {
        if !self.is_available {
            self.start_time = None;
            self.end_time = None;
        }
        self
    }

    fn validate_into(&self, errors: &mut ValidationErrors) {
        if !self.is_available {
            if self.start_time.is_some() || self.end_time.is_some() {
                errors.add(
                    day_field_path(self.weekday, TimeField::Start),
                    "Closed days cannot have hours",
                );
            }
            return;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                if start >= end {
                    errors.add(
                        day_field_path(self.weekday, TimeField::End),
                        "End time must be after start time",
                    );
                }
            }
            (start, end) => {
                if start.is_none() {
                    errors.add(
                        day_field_path(self.weekday, TimeField::Start),
                        "Start time is required",
                    );
                }
                if end.is_none() {
                    errors.add(
                        day_field_path(self.weekday, TimeField::End),
                        "End time is required",
                    );
                }
            }
        }
    }
}

/// Validate a set of day records. A closed day is valid only without hours.
pub fn validate_days(days: &[DaySchedule]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for day in days {
        day.validate_into(&mut errors);
    }
    errors
}

/// Seven day records, sorted by weekday, at most one per weekday.
///
/// Records built from a persisted snapshot may be incomplete; lookups for a
/// missing weekday return `None`, which the resolver treats as closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DaySchedule>", into = "Vec<DaySchedule>")]
pub struct WeeklySchedule {
    days: Vec<DaySchedule>,
}

impl WeeklySchedule {
    /// Monday to Friday `09:00-17:00`, weekends closed.
    pub fn business_hours() -> Self {
        let days = (0..DAYS_PER_WEEK)
            .map(|weekday| match weekday {
                1..=5 => DaySchedule::open(weekday, default_window()),
                _ => DaySchedule::closed(weekday),
            })
            .collect();
        Self { days }
    }

    /// Every weekday closed.
    pub fn all_closed() -> Self {
        Self {
            days: (0..DAYS_PER_WEEK).map(DaySchedule::closed).collect(),
        }
    }

    /// Build from records in any order. Out-of-range weekdays are dropped and
    /// the last record wins when a weekday repeats. Closed days lose any
    /// times they carry.
    pub fn from_days(days: impl IntoIterator<Item = DaySchedule>) -> Self {
        let mut slots: [Option<DaySchedule>; DAYS_PER_WEEK as usize] = Default::default();
        for day in days.into_iter().map(DaySchedule::without_stale_hours) {
            match slots.get_mut(day.weekday as usize) {
                Some(slot) => *slot = Some(day),
                None => tracing::warn!(
                    weekday = day.weekday,
                    "dropping schedule record with out-of-range weekday"
                ),
            }
        }
        Self {
            days: slots.into_iter().flatten().collect(),
        }
    }

    /// A copy with every missing weekday filled in as closed.
    pub fn normalized(&self) -> Self {
        let days = (0..DAYS_PER_WEEK)
            .map(|weekday| {
                self.day(weekday)
                    .cloned()
                    .map(DaySchedule::without_stale_hours)
                    .unwrap_or_else(|| DaySchedule::closed(weekday))
            })
            .collect();
        Self { days }
    }

    pub fn is_complete(&self) -> bool {
        self.days.len() == DAYS_PER_WEEK as usize
    }

    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    pub fn day(&self, weekday: u8) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.weekday == weekday)
    }

    pub fn day_mut(&mut self, weekday: u8) -> Option<&mut DaySchedule> {
        self.days.iter_mut().find(|d| d.weekday == weekday)
    }

    pub fn for_date(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.day(weekday_index(date))
    }

    /// Field-scoped errors for every open day with missing or inverted times.
    pub fn validate(&self) -> ValidationErrors {
        validate_days(&self.days)
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::business_hours()
    }
}

impl From<Vec<DaySchedule>> for WeeklySchedule {
    fn from(days: Vec<DaySchedule>) -> Self {
        Self::from_days(days)
    }
}

impl From<WeeklySchedule> for Vec<DaySchedule> {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule.days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_days_sorts_and_keeps_last_duplicate() {
        let schedule = WeeklySchedule::from_days(vec![
            DaySchedule::closed(3),
            DaySchedule::open(1, default_window()),
            DaySchedule::open(3, default_window()),
            DaySchedule::closed(9),
        ]);
        let weekdays: Vec<u8> = schedule.days().iter().map(|d| d.weekday).collect();
        assert_eq!(weekdays, vec![1, 3]);
        assert!(schedule.day(3).unwrap().is_available);
        assert!(!schedule.is_complete());
        assert!(schedule.normalized().is_complete());
    }

    #[test]
    fn hm_builds_wall_clock_time() {
        assert_eq!(hm(9, 30), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }
}
