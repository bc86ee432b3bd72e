//! JSON-file persistence for the CLI.
//!
//! The schedule file holds a JSON array of day records; the blocked file holds
//! a JSON array of blocked periods. Both use the same shapes as the backend
//! API, so exported payloads can be used as-is.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use availability_engine::blocked::{BlockedPeriod, BlockedPeriodStore};
use availability_engine::collaborator::{BlockedPeriodRepository, ScheduleRepository, TransportError};
use availability_engine::interval::DateRange;
use availability_engine::schedule::WeeklySchedule;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Implements both collaborator traits over two optional files. Without a
/// path there is nothing stored: the schedule reads as unset and the blocked
/// list as empty.
#[derive(Debug, Clone, Default)]
pub struct JsonFileRepository {
    schedule_path: Option<PathBuf>,
    blocked_path: Option<PathBuf>,
}

impl JsonFileRepository {
    pub fn new(schedule_path: Option<PathBuf>, blocked_path: Option<PathBuf>) -> Self {
        Self {
            schedule_path,
            blocked_path,
        }
    }

    fn read_periods(&self) -> Result<BlockedPeriodStore, TransportError> {
        let Some(path) = &self.blocked_path else {
            return Ok(BlockedPeriodStore::new());
        };
        match read_json::<Vec<BlockedPeriod>>(path) {
            Ok(periods) => Ok(periods.into()),
            // Creating the first period also creates the file.
            Err(TransportError::NotFound(_)) => Ok(BlockedPeriodStore::new()),
            Err(err) => Err(err),
        }
    }

    fn write_periods(&self, store: &BlockedPeriodStore) -> Result<(), TransportError> {
        let path = self
            .blocked_path
            .as_deref()
            .ok_or_else(|| TransportError::Request("no blocked-periods file given (--blocked)".into()))?;
        write_json(path, store)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TransportError> {
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TransportError::NotFound(path.display().to_string()),
        _ => TransportError::Request(format!("{}: {}", path.display(), e)),
    })?;
    serde_json::from_str(&raw)
        .map_err(|e| TransportError::Malformed(format!("{}: {}", path.display(), e)))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), TransportError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| TransportError::Malformed(e.to_string()))?;
    fs::write(path, json + "\n")
        .map_err(|e| TransportError::Request(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl ScheduleRepository for JsonFileRepository {
    async fn load_schedule(&self) -> Result<Option<WeeklySchedule>, TransportError> {
        let Some(path) = &self.schedule_path else {
            return Ok(None);
        };
        match read_json(path) {
            Ok(schedule) => Ok(Some(schedule)),
            // No file yet reads as unconfigured; unreadable content stays an error.
            Err(TransportError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn replace_schedule(&self, schedule: &WeeklySchedule) -> Result<(), TransportError> {
        let path = self
            .schedule_path
            .as_deref()
            .ok_or_else(|| TransportError::Request("no schedule file given (--schedule)".into()))?;
        write_json(path, schedule)
    }
}

#[async_trait]
impl BlockedPeriodRepository for JsonFileRepository {
    async fn list_blocked_periods(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<BlockedPeriod>, TransportError> {
        let store = self.read_periods()?;
        Ok(match range {
            Some(range) => store.overlapping(&range).into_iter().cloned().collect(),
            None => store.as_slice().to_vec(),
        })
    }

    async fn create_blocked_period(
        &self,
        period: &BlockedPeriod,
    ) -> Result<BlockedPeriod, TransportError> {
        let mut store = self.read_periods()?;
        let mut created = period.clone();
        created.id = Some(uuid::Uuid::new_v4().to_string());
        created.is_active = true;
        store.insert(created.clone());
        self.write_periods(&store)?;
        tracing::debug!(id = ?created.id, "appended blocked period");
        Ok(created)
    }

    async fn delete_blocked_period(&self, id: &str) -> Result<(), TransportError> {
        let mut store = self.read_periods()?;
        store
            .remove(id)
            .ok_or_else(|| TransportError::NotFound(format!("blocked period {}", id)))?;
        self.write_periods(&store)
    }
}
