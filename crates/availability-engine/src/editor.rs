//! Interaction-layer state for the schedule and blocked-time screens.
//!
//! [`ScheduleEditor`] edits a draft copy of the weekly schedule and only
//! replaces the persisted copy after a successful bulk save.
//! [`BlockedPeriodEditor`] holds one blocked-period form and submits it.
//! Neither notifies the user; they return structured results for the
//! presentation layer to render.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::blocked::{BlockedPeriod, BlockedPeriodDraft, BlockedPeriodStore, QuickAction};
use crate::collaborator::{BlockedPeriodRepository, ScheduleRepository, TransportError};
use crate::conflict::find_overlaps;
use crate::error::EngineError;
use crate::interval::DateRange;
use crate::schedule::{TimeField, WeeklySchedule};
use crate::validation::ValidationErrors;

/// Message recorded on `start_date` when a submitted period repeats an
/// existing active one.
pub const DUPLICATE_PERIOD_MESSAGE: &str = "An identical blocked period already exists";

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Schedule is invalid: {0}")]
    Invalid(ValidationErrors),

    #[error("Failed to save schedule: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Blocked period is invalid: {0}")]
    Invalid(ValidationErrors),

    #[error("Failed to save blocked period: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEditor {
    persisted: WeeklySchedule,
    draft: WeeklySchedule,
}

impl ScheduleEditor {
    /// Start editing from a persisted snapshot. Missing weekdays are filled in
    /// as closed so every day has a row to edit.
    pub fn new(persisted: WeeklySchedule) -> Self {
        let persisted = persisted.normalized();
        Self {
            draft: persisted.clone(),
            persisted,
        }
    }

    /// Load through `repo`; an unconfigured schedule starts from the
    /// business-hours template. Wrap `repo` in
    /// [`Fallback`](crate::collaborator::Fallback) to also survive failed reads.
    pub async fn load<R>(repo: &R) -> Result<Self, TransportError>
    where
        R: ScheduleRepository + ?Sized,
    {
        let schedule = match repo.load_schedule().await? {
            Some(schedule) => schedule,
            None => {
                tracing::debug!("no stored schedule; starting from business hours");
                WeeklySchedule::business_hours()
            }
        };
        Ok(Self::new(schedule))
    }

    pub fn persisted(&self) -> &WeeklySchedule {
        &self.persisted
    }

    pub fn draft(&self) -> &WeeklySchedule {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.persisted
    }

    /// Discard unsaved edits.
    pub fn reset(&mut self) {
        self.draft = self.persisted.clone();
    }

    pub fn toggle_availability(&mut self, weekday: u8) -> Result<(), EngineError> {
        self.draft
            .day_mut(weekday)
            .ok_or(EngineError::InvalidWeekday(weekday))?
            .toggle_availability();
        Ok(())
    }

    pub fn set_time(
        &mut self,
        weekday: u8,
        field: TimeField,
        value: Option<NaiveTime>,
    ) -> Result<(), EngineError> {
        self.draft
            .day_mut(weekday)
            .ok_or(EngineError::InvalidWeekday(weekday))?
            .set_time(field, value);
        Ok(())
    }

    pub fn validate(&self) -> ValidationErrors {
        self.draft.validate()
    }

    /// Validate and replace the stored schedule with the draft.
    ///
    /// Nothing is sent when the draft is invalid. On a transport failure the
    /// persisted snapshot is left as it was and the draft stays dirty.
    pub async fn save<R>(&mut self, repo: &R) -> Result<(), SaveError>
    where
        R: ScheduleRepository + ?Sized,
    {
        self.draft.validate().into_result().map_err(SaveError::Invalid)?;
        repo.replace_schedule(&self.draft).await?;
        self.persisted = self.draft.clone();
        tracing::info!("weekly schedule saved");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockedPeriodEditor {
    draft: BlockedPeriodDraft,
}

impl BlockedPeriodEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_draft(draft: BlockedPeriodDraft) -> Self {
        Self { draft }
    }

    /// Pre-fill the form from a quick action.
    pub fn quick(action: QuickAction, today: NaiveDate) -> Self {
        Self::from_draft(BlockedPeriodDraft::quick(action, today))
    }

    pub fn draft(&self) -> &BlockedPeriodDraft {
        &self.draft
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.draft.start_date = date;
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.draft.end_date = date;
    }

    pub fn set_time(&mut self, field: TimeField, value: Option<NaiveTime>) {
        self.draft.set_time(field, value);
    }

    pub fn set_reason(&mut self, reason: Option<String>) {
        self.draft.reason = reason;
    }

    pub fn toggle_all_day(&mut self) {
        self.draft.toggle_all_day();
    }

    pub fn validate(&self) -> ValidationErrors {
        self.draft.validate()
    }

    /// Validate, check against `existing`, and create through `repo`.
    ///
    /// Overlapping an existing period is allowed; repeating one exactly is
    /// not. On success the form is cleared and the stored record returned.
    pub async fn submit<R>(
        &mut self,
        repo: &R,
        existing: &[BlockedPeriod],
    ) -> Result<BlockedPeriod, SubmitError>
    where
        R: BlockedPeriodRepository + ?Sized,
    {
        let candidate = self.draft.build().map_err(SubmitError::Invalid)?;

        let overlaps = find_overlaps(&candidate, existing);
        if overlaps.iter().any(|o| o.exact_duplicate) {
            let mut errors = ValidationErrors::new();
            errors.add("start_date", DUPLICATE_PERIOD_MESSAGE);
            return Err(SubmitError::Invalid(errors));
        }
        if !overlaps.is_empty() {
            tracing::debug!(
                count = overlaps.len(),
                "new blocked period overlaps existing periods"
            );
        }

        let created = repo.create_blocked_period(&candidate).await?;
        tracing::info!(id = ?created.id, "blocked period created");
        self.draft = BlockedPeriodDraft::default();
        Ok(created)
    }
}

/// Fetch the periods intersecting `range` (all of them when `None`).
pub async fn load_blocked_periods<R>(
    repo: &R,
    range: Option<DateRange>,
) -> Result<BlockedPeriodStore, TransportError>
where
    R: BlockedPeriodRepository + ?Sized,
{
    Ok(repo.list_blocked_periods(range).await?.into())
}

/// Delete remotely, then locally. The local store is only touched once the
/// collaborator confirms.
pub async fn delete_blocked_period<R>(
    repo: &R,
    store: &mut BlockedPeriodStore,
    id: &str,
) -> Result<(), TransportError>
where
    R: BlockedPeriodRepository + ?Sized,
{
    repo.delete_blocked_period(id).await?;
    store.remove(id);
    Ok(())
}
