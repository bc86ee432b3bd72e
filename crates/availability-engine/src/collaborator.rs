//! The persistence boundary.
//!
//! The engine never talks to the network itself. Callers load and save through
//! these traits, implemented by whatever transport the host uses. Reads can be
//! wrapped in [`Fallback`] so a failed request degrades to a default instead of
//! breaking the screen; writes always surface their errors.

use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use crate::blocked::{BlockedPeriod, BlockedPeriodStore};
use crate::interval::DateRange;
use crate::schedule::WeeklySchedule;

/// A failed collaborator call. Always recoverable from the engine's side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// The stored weekly schedule, or `None` if the provider never set one.
    async fn load_schedule(&self) -> Result<Option<WeeklySchedule>, TransportError>;

    /// Replace the whole schedule. There is no per-day update.
    async fn replace_schedule(&self, schedule: &WeeklySchedule) -> Result<(), TransportError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockedPeriodRepository: Send + Sync {
    /// Active and inactive periods, optionally limited to those intersecting
    /// `range`.
    async fn list_blocked_periods(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<BlockedPeriod>, TransportError>;

    /// Persist a validated period and return it with its assigned id.
    async fn create_blocked_period(
        &self,
        period: &BlockedPeriod,
    ) -> Result<BlockedPeriod, TransportError>;

    /// Hard delete.
    async fn delete_blocked_period(&self, id: &str) -> Result<(), TransportError>;
}

/// Decorator that turns failed reads into caller-supplied defaults.
///
/// A failed schedule read yields the fallback template and a failed
/// blocked-period read yields an empty list, each logged at `warn`. Writes
/// are passed through untouched.
#[derive(Debug)]
pub struct Fallback<R> {
    inner: R,
    schedule: WeeklySchedule,
}

impl<R> Fallback<R> {
    /// Fall back to the business-hours template.
    pub fn new(inner: R) -> Self {
        Self::with_schedule(inner, WeeklySchedule::business_hours())
    }

    pub fn with_schedule(inner: R, schedule: WeeklySchedule) -> Self {
        Self { inner, schedule }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<R: ScheduleRepository> ScheduleRepository for Fallback<R> {
    async fn load_schedule(&self) -> Result<Option<WeeklySchedule>, TransportError> {
        match self.inner.load_schedule().await {
            Ok(schedule) => Ok(schedule),
            Err(err) => {
                tracing::warn!(error = %err, "schedule read failed; using fallback template");
                Ok(Some(self.schedule.clone()))
            }
        }
    }

    async fn replace_schedule(&self, schedule: &WeeklySchedule) -> Result<(), TransportError> {
        self.inner.replace_schedule(schedule).await
    }
}

#[async_trait]
impl<R: BlockedPeriodRepository> BlockedPeriodRepository for Fallback<R> {
    async fn list_blocked_periods(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<BlockedPeriod>, TransportError> {
        match self.inner.list_blocked_periods(range).await {
            Ok(periods) => Ok(periods),
            Err(err) => {
                tracing::warn!(error = %err, "blocked-period read failed; using empty list");
                Ok(Vec::new())
            }
        }
    }

    async fn create_blocked_period(
        &self,
        period: &BlockedPeriod,
    ) -> Result<BlockedPeriod, TransportError> {
        self.inner.create_blocked_period(period).await
    }

    async fn delete_blocked_period(&self, id: &str) -> Result<(), TransportError> {
        self.inner.delete_blocked_period(id).await
    }
}

/// A process-local implementation of both repositories. Ids are UUID v4
/// strings.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    schedule: RwLock<Option<WeeklySchedule>>,
    periods: RwLock<BlockedPeriodStore>,
}

fn poisoned<T>(_: T) -> TransportError {
    TransportError::Request("repository lock poisoned".to_string())
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: WeeklySchedule) -> Self {
        Self {
            schedule: RwLock::new(Some(schedule)),
            periods: RwLock::default(),
        }
    }

    pub fn with_periods(self, periods: impl IntoIterator<Item = BlockedPeriod>) -> Self {
        Self {
            schedule: self.schedule,
            periods: RwLock::new(periods.into_iter().collect()),
        }
    }

    pub fn schedule_snapshot(&self) -> Result<Option<WeeklySchedule>, TransportError> {
        Ok(self.schedule.read().map_err(poisoned)?.clone())
    }

    pub fn periods_snapshot(&self) -> Result<BlockedPeriodStore, TransportError> {
        Ok(self.periods.read().map_err(poisoned)?.clone())
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryRepository {
    async fn load_schedule(&self) -> Result<Option<WeeklySchedule>, TransportError> {
        self.schedule_snapshot()
    }

    async fn replace_schedule(&self, schedule: &WeeklySchedule) -> Result<(), TransportError> {
        *self.schedule.write().map_err(poisoned)? = Some(schedule.clone());
        Ok(())
    }
}

#[async_trait]
impl BlockedPeriodRepository for InMemoryRepository {
    async fn list_blocked_periods(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<BlockedPeriod>, TransportError> {
        let store = self.periods.read().map_err(poisoned)?;
        let periods = match range {
            Some(range) => store.overlapping(&range).into_iter().cloned().collect(),
            None => store.as_slice().to_vec(),
        };
        Ok(periods)
    }

    async fn create_blocked_period(
        &self,
        period: &BlockedPeriod,
    ) -> Result<BlockedPeriod, TransportError> {
        let mut created = period.clone();
        created.id = Some(uuid::Uuid::new_v4().to_string());
        created.is_active = true;
        self.periods
            .write()
            .map_err(poisoned)?
            .insert(created.clone());
        Ok(created)
    }

    async fn delete_blocked_period(&self, id: &str) -> Result<(), TransportError> {
        self.periods
            .write()
            .map_err(poisoned)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TransportError::NotFound(format!("blocked period {}", id)))
    }
}
