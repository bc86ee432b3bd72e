//! Boundary formats: `HH:MM` wall-clock times and `YYYY-MM-DD` calendar dates.
//!
//! Dates are always built from year/month/day components, never from a
//! timezone-aware timestamp, so a value near midnight cannot shift by a day.
//! Times are written as `HH:MM`; `HH:MM:SS` is accepted on input because some
//! backends echo database `TIME` columns verbatim.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{EngineError, Result};
use crate::interval::TimeRange;

pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an `HH:MM` (or `HH:MM:SS`) 24-hour time.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| EngineError::InvalidTime(s.to_string()))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `HH:MM-HH:MM` range. The end must be strictly after the start.
pub fn parse_time_range(s: &str) -> Result<TimeRange> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| EngineError::InvalidTime(s.to_string()))?;
    let start = parse_time(start)?;
    let end = parse_time(end)?;
    TimeRange::new(start, end).ok_or_else(|| EngineError::InvalidTime(s.to_string()))
}

/// Serde adapter for a required `HH:MM` field.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for an optional `HH:MM` field. `null` and `""` both read as
/// absent, since form payloads send empty strings for cleared inputs.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_some(&super::format_time(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_time(s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Serde adapter for an optional `YYYY-MM-DD` field, with the same empty-string
/// handling as [`hhmm_option`].
pub mod date_option {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&super::format_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_date(s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
