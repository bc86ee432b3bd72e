//! Blocked periods: date-range exceptions to the weekly schedule.
//!
//! A period covers every date from `start_date` to `end_date` inclusive. An
//! all-day period removes those dates entirely; a partial period removes the
//! same `start_time..end_time` window from each of them. Periods may overlap,
//! and a period may be deactivated instead of deleted.

use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::interval::{DateRange, TimeRange};
use crate::schedule::{default_window, weekday_index, TimeField};
use crate::validation::ValidationErrors;

/// Longest accepted `reason`, in characters.
pub const MAX_REASON_LEN: usize = 255;

/// Reason reported for a blocked date whose period has no reason of its own.
pub const DEFAULT_BLOCK_REASON: &str = "Blocked";

fn default_active() -> bool {
    true
}

/// How much of each covered date a period removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockScope {
    WholeDay,
    Hours(TimeRange),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedPeriod {
    /// Assigned by the persistence collaborator; `None` until created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    #[serde(alias = "endDate")]
    pub end_date: NaiveDate,
    #[serde(default, alias = "allDay")]
    pub all_day: bool,
    #[serde(default, alias = "startTime", with = "crate::wire::hhmm_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, alias = "endTime", with = "crate::wire::hhmm_option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
}

impl BlockedPeriod {
    pub fn all_day(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: None,
            start_date,
            end_date,
            all_day: true,
            start_time: None,
            end_time: None,
            reason: None,
            is_active: true,
        }
    }

    pub fn partial(start_date: NaiveDate, end_date: NaiveDate, hours: TimeRange) -> Self {
        Self {
            id: None,
            start_date,
            end_date,
            all_day: false,
            start_time: Some(hours.start),
            end_time: Some(hours.end),
            reason: None,
            is_active: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn date_range(&self) -> Option<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// A partial period with missing or inverted times cannot say which hours
    /// it removes, so it removes the whole day.
    pub fn scope(&self) -> BlockScope {
        if self.all_day {
            return BlockScope::WholeDay;
        }
        match self.start_time.zip(self.end_time) {
            Some((start, end)) => match TimeRange::new(start, end) {
                Some(hours) => BlockScope::Hours(hours),
                None => {
                    tracing::warn!(
                        id = ?self.id,
                        "partial blocked period has inverted times; blocking whole day"
                    );
                    BlockScope::WholeDay
                }
            },
            None => {
                tracing::warn!(
                    id = ?self.id,
                    "partial blocked period has no times; blocking whole day"
                );
                BlockScope::WholeDay
            }
        }
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        match self.scope() {
            BlockScope::Hours(hours) => Some(hours),
            BlockScope::WholeDay => None,
        }
    }

    /// The reason to show a user; blank reasons fall back to
    /// [`DEFAULT_BLOCK_REASON`].
    pub fn display_reason(&self) -> &str {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_BLOCK_REASON)
    }
}

/// The caller-owned collection of blocked periods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockedPeriodStore {
    periods: Vec<BlockedPeriod>,
}

impl BlockedPeriodStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn as_slice(&self) -> &[BlockedPeriod] {
        &self.periods
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockedPeriod> {
        self.periods.iter()
    }

    pub fn insert(&mut self, period: BlockedPeriod) {
        self.periods.push(period);
    }

    pub fn get(&self, id: &str) -> Option<&BlockedPeriod> {
        self.periods.iter().find(|p| p.id.as_deref() == Some(id))
    }

    /// Hard delete.
    pub fn remove(&mut self, id: &str) -> Option<BlockedPeriod> {
        let index = self.periods.iter().position(|p| p.id.as_deref() == Some(id))?;
        Some(self.periods.remove(index))
    }

    /// Soft delete: the period stays listed but no longer affects resolution.
    /// Returns false if no period has this id.
    pub fn deactivate(&mut self, id: &str) -> bool {
        match self.periods.iter_mut().find(|p| p.id.as_deref() == Some(id)) {
            Some(period) => {
                period.is_active = false;
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &BlockedPeriod> {
        self.periods.iter().filter(|p| p.is_active)
    }

    /// Active periods whose range contains `date`.
    pub fn covering(&self, date: NaiveDate) -> impl Iterator<Item = &BlockedPeriod> {
        self.active().filter(move |p| p.covers(date))
    }

    /// Periods, active or not, that intersect `range`.
    pub fn overlapping(&self, range: &DateRange) -> Vec<&BlockedPeriod> {
        self.periods
            .iter()
            .filter(|p| p.date_range().is_some_and(|r| r.overlaps(range)))
            .collect()
    }

    /// Listing order: by start date, then end date, then start time.
    pub fn sorted_by_start(&self) -> Vec<&BlockedPeriod> {
        let mut sorted: Vec<&BlockedPeriod> = self.periods.iter().collect();
        sorted.sort_by_key(|p| (p.start_date, p.end_date, p.start_time));
        sorted
    }
}

impl From<Vec<BlockedPeriod>> for BlockedPeriodStore {
    fn from(periods: Vec<BlockedPeriod>) -> Self {
        Self { periods }
    }
}

impl FromIterator<BlockedPeriod> for BlockedPeriodStore {
    fn from_iter<I: IntoIterator<Item = BlockedPeriod>>(iter: I) -> Self {
        Self {
            periods: iter.into_iter().collect(),
        }
    }
}

/// One-click blocking shortcuts offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickAction {
    Today,
    Weekend,
    NextWeek,
}

impl FromStr for QuickAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(QuickAction::Today),
            "weekend" => Ok(QuickAction::Weekend),
            "next-week" | "next_week" | "nextweek" => Ok(QuickAction::NextWeek),
            other => Err(format!(
                "Unknown quick action: '{}'. Available: today, weekend, next-week",
                other
            )),
        }
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

/// A blocked period being entered in a form, before it has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedPeriodDraft {
    #[serde(default, alias = "startDate", with = "crate::wire::date_option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, alias = "endDate", with = "crate::wire::date_option")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, alias = "allDay")]
    pub all_day: bool,
    #[serde(default, alias = "startTime", with = "crate::wire::hhmm_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, alias = "endTime", with = "crate::wire::hhmm_option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Default for BlockedPeriodDraft {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            all_day: true,
            start_time: None,
            end_time: None,
            reason: None,
        }
    }
}

impl BlockedPeriodDraft {
    pub fn all_day(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Self::default()
        }
    }

    pub fn partial(start_date: NaiveDate, end_date: NaiveDate, hours: TimeRange) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            all_day: false,
            start_time: Some(hours.start),
            end_time: Some(hours.end),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Build the draft for a quick action, relative to `today`.
    ///
    /// Weekend is the Saturday of the current Sunday-first week and the
    /// Sunday after it; next week is the following Monday through Sunday.
    pub fn quick(action: QuickAction, today: NaiveDate) -> Self {
        match action {
            QuickAction::Today => Self::all_day(today, today).with_reason("Unavailable today"),
            QuickAction::Weekend => {
                let saturday = add_days(today, u64::from(6 - weekday_index(today)));
                Self::all_day(saturday, add_days(saturday, 1)).with_reason("Weekend off")
            }
            QuickAction::NextWeek => {
                let monday = add_days(
                    today,
                    u64::from(7 - today.weekday().num_days_from_monday()),
                );
                Self::all_day(monday, add_days(monday, 6)).with_reason("Unavailable next week")
            }
        }
    }

    /// Switching to all-day clears the times; switching back seeds
    /// `09:00-17:00`.
    pub fn set_all_day(&mut self, all_day: bool) {
        self.all_day = all_day;
        if all_day {
            self.start_time = None;
            self.end_time = None;
        } else {
            let window = default_window();
            self.start_time = Some(window.start);
            self.end_time = Some(window.end);
        }
    }

    pub fn toggle_all_day(&mut self) {
        self.set_all_day(!self.all_day);
    }

    pub fn set_time(&mut self, field: TimeField, value: Option<NaiveTime>) {
        match field {
            TimeField::Start => self.start_time = value,
            TimeField::End => self.end_time = value,
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                if end < start {
                    errors.add("end_date", "End date must be after or equal to start date");
                }
            }
            (start, end) => {
                if start.is_none() {
                    errors.add("start_date", "Start date is required");
                }
                if end.is_none() {
                    errors.add("end_date", "End date is required");
                }
            }
        }

        if !self.all_day {
            match (self.start_time, self.end_time) {
                (Some(start), Some(end)) => {
                    if start >= end {
                        errors.add("end_time", "End time must be after start time");
                    }
                }
                (start, end) => {
                    if start.is_none() {
                        errors.add("start_time", "Start time is required");
                    }
                    if end.is_none() {
                        errors.add("end_time", "End time is required");
                    }
                }
            }
        }

        if let Some(reason) = &self.reason {
            if reason.trim().chars().count() > MAX_REASON_LEN {
                errors.add(
                    "reason",
                    format!("Reason must be at most {} characters", MAX_REASON_LEN),
                );
            }
        }

        errors
    }

    /// Validate and produce the period to hand to the collaborator: no id,
    /// active, times cleared for all-day, blank reason dropped.
    pub fn build(&self) -> Result<BlockedPeriod, ValidationErrors> {
        let errors = self.validate();
        let (start_date, end_date) = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if errors.is_empty() => (start, end),
            _ => return Err(errors),
        };
        let (start_time, end_time) = if self.all_day {
            (None, None)
        } else {
            (self.start_time, self.end_time)
        };
        let reason = self
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(BlockedPeriod {
            id: None,
            start_date,
            end_date,
            all_day: self.all_day,
            start_time,
            end_time,
            reason,
            is_active: true,
        })
    }
}
