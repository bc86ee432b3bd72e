//! WASM bindings for availability-engine.
//!
//! Exposes day resolution, slot generation, month projection and form
//! validation to the browser dashboard via `wasm-bindgen`. All complex types
//! are passed as JSON strings in the same shapes the backend uses: times as
//! `HH:MM`, dates as `YYYY-MM-DD`, camelCase or snake_case keys on input.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/availability-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_engine_wasm.wasm
//! ```

use availability_engine::blocked::{BlockedPeriod, BlockedPeriodDraft, QuickAction};
use availability_engine::interval::TimeRange;
use availability_engine::schedule::WeeklySchedule;
use availability_engine::validation::ValidationErrors;
use availability_engine::wire::{format_time, parse_date, parse_time};
use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Validation result: `valid` is false iff `errors` is non-empty.
#[derive(Serialize)]
struct ValidationDto {
    valid: bool,
    errors: ValidationErrors,
}

/// A consumed (already booked) interval passed from JavaScript.
#[derive(Deserialize)]
struct ConsumedInput {
    #[serde(with = "availability_engine::wire::hhmm")]
    start: NaiveTime,
    #[serde(with = "availability_engine::wire::hhmm")]
    end: NaiveTime,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_schedule(json: &str) -> Result<WeeklySchedule, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid schedule JSON: {}", e)))
}

/// An absent or empty blocked list means no blocks.
fn parse_blocked(json: Option<String>) -> Result<Vec<BlockedPeriod>, JsValue> {
    match json.as_deref().map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| JsValue::from_str(&format!("Invalid blocked periods JSON: {}", e))),
    }
}

fn parse_consumed(json: Option<String>) -> Result<Vec<TimeRange>, JsValue> {
    let inputs: Vec<ConsumedInput> = match json.as_deref().map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| JsValue::from_str(&format!("Invalid consumed intervals JSON: {}", e)))?,
    };
    inputs
        .into_iter()
        .map(|c| {
            TimeRange::new(c.start, c.end).ok_or_else(|| {
                JsValue::from_str(&format!(
                    "Consumed interval must end after it starts: {}-{}",
                    format_time(c.start),
                    format_time(c.end)
                ))
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Resolve one date to a verdict.
///
/// Returns `{date, status, open_interval?, reason}` where `status` is one of
/// `available`, `blocked`, `closed`.
#[wasm_bindgen(js_name = "resolveDay")]
pub fn resolve_day(
    date: &str,
    schedule_json: &str,
    blocked_json: Option<String>,
) -> Result<String, JsValue> {
    let date = parse_date(date).map_err(js_err)?;
    let schedule = parse_schedule(schedule_json)?;
    let blocked = parse_blocked(blocked_json)?;

    to_json(&availability_engine::resolve(date, &schedule, &blocked))
}

/// Resolve a `from..to` window on one date. Partial-day blocks only block the
/// window if they overlap it.
#[wasm_bindgen(js_name = "resolveWindow")]
pub fn resolve_window(
    date: &str,
    from: &str,
    to: &str,
    schedule_json: &str,
    blocked_json: Option<String>,
) -> Result<String, JsValue> {
    let date = parse_date(date).map_err(js_err)?;
    let start = parse_time(from).map_err(js_err)?;
    let end = parse_time(to).map_err(js_err)?;
    let window = TimeRange::new(start, end)
        .ok_or_else(|| JsValue::from_str("Window end must be after its start"))?;
    let schedule = parse_schedule(schedule_json)?;
    let blocked = parse_blocked(blocked_json)?;

    to_json(&availability_engine::resolve_window(
        date, window, &schedule, &blocked,
    ))
}

/// Generate bookable slots.
///
/// `consumed_json` is an optional array of `{start, end}` booked intervals.
/// Returns an array of `{start, end}`; an empty array means no availability.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(
    date: &str,
    duration_minutes: i32,
    schedule_json: &str,
    blocked_json: Option<String>,
    consumed_json: Option<String>,
) -> Result<String, JsValue> {
    let date = parse_date(date).map_err(js_err)?;
    let schedule = parse_schedule(schedule_json)?;
    let blocked = parse_blocked(blocked_json)?;
    let consumed = parse_consumed(consumed_json)?;

    let slots = availability_engine::generate_slots(
        date,
        &schedule,
        &blocked,
        TimeDelta::minutes(i64::from(duration_minutes)),
        &consumed,
    )
    .map_err(js_err)?;

    to_json(&slots)
}

/// Project a calendar month into a Sunday-first grid.
///
/// Returns `{cells: [...]}` where blank padding cells are `null`.
#[wasm_bindgen(js_name = "projectMonth")]
pub fn project_month(
    year: i32,
    month: u32,
    schedule_json: &str,
    blocked_json: Option<String>,
) -> Result<String, JsValue> {
    let schedule = parse_schedule(schedule_json)?;
    let blocked = parse_blocked(blocked_json)?;

    let grid =
        availability_engine::project_month(year, month, &schedule, &blocked).map_err(js_err)?;
    to_json(&grid)
}

/// Validate a weekly schedule. Returns `{valid, errors}` with errors keyed
/// `days[<weekday>].<field>`.
#[wasm_bindgen(js_name = "validateSchedule")]
pub fn validate_schedule(schedule_json: &str) -> Result<String, JsValue> {
    let errors = parse_schedule(schedule_json)?.validate();
    to_json(&ValidationDto {
        valid: errors.is_empty(),
        errors,
    })
}

/// Validate a blocked-period form. Returns `{valid, errors}` keyed by field.
#[wasm_bindgen(js_name = "validateBlockedPeriod")]
pub fn validate_blocked_period(draft_json: &str) -> Result<String, JsValue> {
    let draft: BlockedPeriodDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid blocked period JSON: {}", e)))?;
    let errors = draft.validate();
    to_json(&ValidationDto {
        valid: errors.is_empty(),
        errors,
    })
}

/// Pre-fill a blocked-period form from a quick action (`today`, `weekend`,
/// `next-week`) relative to `today`.
#[wasm_bindgen(js_name = "quickBlock")]
pub fn quick_block(preset: &str, today: &str) -> Result<String, JsValue> {
    let action: QuickAction = preset.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let today = parse_date(today).map_err(js_err)?;
    to_json(&BlockedPeriodDraft::quick(action, today))
}

/// The business-hours template (Monday to Friday, 09:00-17:00).
#[wasm_bindgen(js_name = "defaultSchedule")]
pub fn default_schedule() -> Result<String, JsValue> {
    to_json(&WeeklySchedule::business_hours())
}
