//! Error types for availability-engine operations.
//!
//! Field-level validation problems are not errors in this sense: they are
//! returned as [`ValidationErrors`](crate::validation::ValidationErrors) data.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A slot request with a zero or negative duration, in seconds (caller bug).
    #[error("Invalid slot duration: {0}s (must be positive)")]
    InvalidDuration(i64),

    #[error("Invalid time: {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid weekday: {0} (expected 0-6, Sunday = 0)")]
    InvalidWeekday(u8),
}

pub type Result<T> = std::result::Result<T, EngineError>;
