//! # availability-engine
//!
//! Turns a provider's recurring weekly schedule and a set of blocked date
//! ranges into day verdicts, bookable slots and month grids, and validates the
//! edits that change them.
//!
//! All times are provider-local wall-clock values. The engine is synchronous
//! and side-effect free; the only async surface is the [`collaborator`]
//! boundary that callers use to load and save.
//!
//! ## Modules
//!
//! - [`schedule`] — weekly schedule, day records, schedule validation
//! - [`blocked`] — blocked periods, drafts, quick actions, the period store
//! - [`resolver`] — per-date (and per-window) verdicts
//! - [`slots`] — bookable slot generation
//! - [`calendar`] — month grid projection
//! - [`conflict`] — overlap and duplicate detection between blocked periods
//! - [`editor`] — draft editing, dirty tracking, save/submit
//! - [`collaborator`] — persistence traits, read fallback, in-memory store
//! - [`interval`] — time and date ranges
//! - [`validation`] — field-scoped validation errors
//! - [`wire`] — `HH:MM` / `YYYY-MM-DD` parsing and serde adapters
//! - [`error`] — Error types

pub mod blocked;
pub mod calendar;
pub mod collaborator;
pub mod conflict;
pub mod editor;
pub mod error;
pub mod interval;
pub mod resolver;
pub mod schedule;
pub mod slots;
pub mod validation;
pub mod wire;

pub use blocked::{BlockedPeriod, BlockedPeriodDraft, BlockedPeriodStore, QuickAction};
pub use calendar::{project, project_month, MonthGrid};
pub use collaborator::{
    BlockedPeriodRepository, Fallback, InMemoryRepository, ScheduleRepository, TransportError,
};
pub use conflict::find_overlaps;
pub use editor::{BlockedPeriodEditor, SaveError, ScheduleEditor, SubmitError};
pub use error::EngineError;
pub use interval::{DateRange, TimeRange};
pub use resolver::{resolve, resolve_window, AvailabilityStatus, Verdict};
pub use schedule::{DaySchedule, TimeField, WeeklySchedule};
pub use slots::{generate_slots, Slot};
pub use validation::ValidationErrors;
