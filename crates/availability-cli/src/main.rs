//! `availability` CLI: resolve provider availability from JSON files.
//!
//! ## Usage
//!
//! ```sh
//! # Verdict for one date
//! availability --schedule schedule.json --blocked blocked.json resolve --date 2025-07-21
//!
//! # Verdict for a window on that date
//! availability --schedule schedule.json resolve --date 2025-07-21 --from 12:00 --to 13:00
//!
//! # One-hour slots around existing bookings
//! availability --schedule schedule.json slots --date 2025-07-21 \
//!   --duration-minutes 60 --consumed 12:00-13:00
//!
//! # Month grid
//! availability --schedule schedule.json --blocked blocked.json calendar --month 2025-10
//!
//! # Validate a schedule file (exit code 1 when invalid)
//! availability --schedule schedule.json check-schedule
//!
//! # Block the coming weekend and save it
//! availability --blocked blocked.json quick-block --preset weekend --save
//! ```
//!
//! Without `--schedule` the business-hours template is used; a schedule or
//! blocked file that cannot be read falls back the same way, with a warning
//! on stderr.

mod store;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use availability_engine::blocked::{BlockedPeriodStore, QuickAction};
use availability_engine::calendar::{project_month, MonthGrid};
use availability_engine::collaborator::{Fallback, TransportError};
use availability_engine::editor::{
    delete_blocked_period, load_blocked_periods, BlockedPeriodEditor, ScheduleEditor, SubmitError,
};
use availability_engine::interval::{DateRange, TimeRange};
use availability_engine::resolver::{resolve, resolve_window, Verdict, CLOSED_REASON};
use availability_engine::schedule::{TimeField, WeeklySchedule};
use availability_engine::slots::generate_slots;
use availability_engine::wire::{format_date, parse_date, parse_time, parse_time_range};
use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::store::JsonFileRepository;

#[derive(Parser)]
#[command(
    name = "availability",
    version,
    about = "Resolve provider availability from a weekly schedule and blocked periods"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Weekly schedule file (JSON array of day records)
    #[arg(long, global = true)]
    schedule: Option<PathBuf>,

    /// Blocked periods file (JSON array)
    #[arg(long, global = true)]
    blocked: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a date (or a window on it) to available, blocked or closed
    Resolve {
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
        /// Window start (requires --to)
        #[arg(long, value_parser = time_arg, requires = "to")]
        from: Option<NaiveTime>,
        /// Window end (requires --from)
        #[arg(long, value_parser = time_arg, requires = "from")]
        to: Option<NaiveTime>,
    },
    /// List bookable slots on a date
    Slots {
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
        #[arg(long, allow_negative_numbers = true)]
        duration_minutes: i64,
        /// Already-booked intervals, e.g. 12:00-13:00,15:30-16:00
        #[arg(long, value_delimiter = ',', value_parser = range_arg)]
        consumed: Vec<TimeRange>,
    },
    /// Show a month grid (weeks start on Sunday)
    Calendar {
        /// Month as YYYY-MM
        #[arg(long, value_parser = month_arg)]
        month: NaiveDate,
    },
    /// Validate the schedule file; exits with status 1 when invalid
    CheckSchedule,
    /// Open a weekday with the given hours, or close it
    SetDay {
        /// 0 = Sunday ... 6 = Saturday
        #[arg(long)]
        weekday: u8,
        /// Working hours, e.g. 09:00-17:00
        #[arg(
            long,
            value_parser = range_arg,
            conflicts_with = "closed",
            required_unless_present = "closed"
        )]
        hours: Option<TimeRange>,
        #[arg(long)]
        closed: bool,
    },
    /// List blocked periods, optionally only those touching a date range
    Blocked {
        #[arg(long, value_parser = date_arg, requires = "to")]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg, requires = "from")]
        to: Option<NaiveDate>,
    },
    /// Pre-fill a blocked period from a preset: today, weekend, next-week
    QuickBlock {
        #[arg(long)]
        preset: QuickAction,
        /// Reference date (defaults to the local date)
        #[arg(long, value_parser = date_arg)]
        today: Option<NaiveDate>,
        /// Create the period in the blocked file (needs --blocked)
        #[arg(long)]
        save: bool,
    },
    /// Delete a blocked period by id
    Unblock {
        #[arg(long)]
        id: String,
    },
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn time_arg(s: &str) -> Result<NaiveTime, String> {
    parse_time(s).map_err(|e| e.to_string())
}

fn range_arg(s: &str) -> Result<TimeRange, String> {
    parse_time_range(s).map_err(|e| e.to_string())
}

/// `YYYY-MM`, returned as the first day of that month.
fn month_arg(s: &str) -> Result<NaiveDate, String> {
    let invalid = || format!("Invalid month '{}', expected YYYY-MM", s);
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let files = JsonFileRepository::new(cli.schedule.clone(), cli.blocked.clone());
    let json = cli.json;

    match cli.command {
        Commands::Resolve { date, from, to } => {
            let (schedule, blocked) = load_inputs(&files).await?;
            let verdict = match from.zip(to) {
                Some((start, end)) => {
                    let window = TimeRange::new(start, end)
                        .context("Window end (--to) must be after its start (--from)")?;
                    resolve_window(date, window, &schedule, blocked.as_slice())
                }
                None => resolve(date, &schedule, blocked.as_slice()),
            };
            if json {
                print_json(&verdict)?;
            } else {
                println!("{}", describe(&verdict));
            }
        }
        Commands::Slots {
            date,
            duration_minutes,
            consumed,
        } => {
            let (schedule, blocked) = load_inputs(&files).await?;
            let slots = generate_slots(
                date,
                &schedule,
                blocked.as_slice(),
                TimeDelta::minutes(duration_minutes),
                &consumed,
            )
            .context("Failed to generate slots")?;
            if json {
                print_json(&slots)?;
            } else if slots.is_empty() {
                println!("No slots available on {}", format_date(date));
            } else {
                for slot in &slots {
                    println!("{}", slot.as_range());
                }
            }
        }
        Commands::Calendar { month } => {
            let (schedule, blocked) = load_inputs(&files).await?;
            let (year, month) = (month.year(), month.month());
            let grid = project_month(year, month, &schedule, blocked.as_slice())
                .context("Failed to project month")?;
            if json {
                print_json(&grid)?;
            } else {
                print_grid(year, month, &grid);
            }
        }
        Commands::CheckSchedule => {
            let path = cli
                .schedule
                .as_deref()
                .context("check-schedule needs a schedule file (--schedule)")?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let schedule: WeeklySchedule = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse schedule: {}", path.display()))?;
            let errors = schedule.validate();

            if json {
                print_json(&serde_json::json!({
                    "valid": errors.is_empty(),
                    "errors": errors,
                }))?;
            } else if errors.is_empty() {
                println!("Schedule is valid");
            } else {
                for (field, message) in errors.iter() {
                    println!("{}: {}", field, message);
                }
            }
            if !errors.is_empty() {
                process::exit(1);
            }
        }
        Commands::SetDay {
            weekday,
            hours,
            closed,
        } => {
            // No fallback here: this read feeds a whole-schedule write.
            let repo = files;
            let mut editor = ScheduleEditor::load(&repo)
                .await
                .context("Failed to load schedule")?;
            let is_open = editor
                .draft()
                .day(weekday)
                .map(|d| d.is_available)
                .with_context(|| format!("Invalid weekday: {} (expected 0-6)", weekday))?;

            match hours {
                Some(hours) if !closed => {
                    if !is_open {
                        editor.toggle_availability(weekday)?;
                    }
                    editor.set_time(weekday, TimeField::Start, Some(hours.start))?;
                    editor.set_time(weekday, TimeField::End, Some(hours.end))?;
                }
                _ => {
                    if is_open {
                        editor.toggle_availability(weekday)?;
                    }
                }
            }

            if editor.is_dirty() {
                editor.save(&repo).await.context("Failed to save schedule")?;
                println!("Saved");
            } else {
                println!("No changes");
            }
        }
        Commands::Blocked { from, to } => {
            let range = match from.zip(to) {
                Some((start, end)) => Some(
                    DateRange::new(start, end).context("--to must not be before --from")?,
                ),
                None => None,
            };
            let store = load_blocked_periods(&files, range)
                .await
                .context("Failed to read blocked periods")?;
            let sorted = store.sorted_by_start();
            if json {
                print_json(&sorted)?;
            } else if sorted.is_empty() {
                println!("No blocked periods");
            } else {
                for period in sorted {
                    let hours = match period.time_range() {
                        Some(hours) => hours.to_string(),
                        None => "all day".to_string(),
                    };
                    println!(
                        "{}  {}..{}  {}  {}{}",
                        period.id.as_deref().unwrap_or("-"),
                        format_date(period.start_date),
                        format_date(period.end_date),
                        hours,
                        period.display_reason(),
                        if period.is_active { "" } else { " (inactive)" }
                    );
                }
            }
        }
        Commands::QuickBlock {
            preset,
            today,
            save,
        } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let mut editor = BlockedPeriodEditor::quick(preset, today);

            if !save {
                let draft = editor.draft();
                if json {
                    print_json(draft)?;
                } else {
                    println!(
                        "{}..{}  all day  {}",
                        draft.start_date.map(format_date).unwrap_or_default(),
                        draft.end_date.map(format_date).unwrap_or_default(),
                        draft.reason.as_deref().unwrap_or_default()
                    );
                }
                return Ok(());
            }

            if cli.blocked.is_none() {
                anyhow::bail!("quick-block --save needs a blocked-periods file (--blocked)");
            }
            let existing = load_blocked_periods(&files, None)
                .await
                .context("Failed to read blocked periods")?;
            let created = match editor.submit(&files, existing.as_slice()).await {
                Ok(created) => created,
                Err(SubmitError::Invalid(errors)) => {
                    anyhow::bail!("Blocked period rejected: {}", errors)
                }
                Err(SubmitError::Transport(err)) => {
                    return Err(err).context("Failed to save blocked period")
                }
            };
            if json {
                print_json(&created)?;
            } else {
                println!(
                    "Created {} ({}..{})",
                    created.id.as_deref().unwrap_or("-"),
                    format_date(created.start_date),
                    format_date(created.end_date)
                );
            }
        }
        Commands::Unblock { id } => {
            let mut store = load_blocked_periods(&files, None)
                .await
                .context("Failed to read blocked periods")?;
            match delete_blocked_period(&files, &mut store, &id).await {
                Ok(()) => println!("Deleted {}", id),
                Err(TransportError::NotFound(_)) => {
                    anyhow::bail!("No blocked period with id '{}'", id)
                }
                Err(err) => return Err(err).context("Failed to delete blocked period"),
            }
        }
    }

    Ok(())
}

/// Read both inputs for the read-only commands. Failed reads degrade to the
/// business-hours template and an empty blocked list.
async fn load_inputs(files: &JsonFileRepository) -> Result<(WeeklySchedule, BlockedPeriodStore)> {
    let repo = Fallback::new(files.clone());
    let editor = ScheduleEditor::load(&repo)
        .await
        .context("Failed to load schedule")?;
    let blocked = load_blocked_periods(&repo, None)
        .await
        .context("Failed to load blocked periods")?;
    Ok((editor.persisted().clone(), blocked))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe(verdict: &Verdict) -> String {
    let day = format!(
        "{} {}",
        format_date(verdict.date),
        verdict.date.weekday()
    );
    match (&verdict.open_interval, verdict.reason.as_str()) {
        (Some(hours), _) => format!("{} {} {}", day, verdict.status, hours),
        (None, CLOSED_REASON) => format!("{} {}", day, verdict.status),
        (None, reason) => format!("{} {}: {}", day, verdict.status, reason),
    }
}

/// Text month grid. Each cell is the day number followed by a marker:
/// `.` available, `x` blocked, blank closed.
fn print_grid(year: i32, month: u32, grid: &MonthGrid) {
    println!("{:04}-{:02}", year, month);
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");
    for week in grid.weeks() {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(v) => {
                    let marker = if v.is_available() {
                        '.'
                    } else if v.is_blocked() {
                        'x'
                    } else {
                        ' '
                    };
                    format!("{:>3}{}", v.date.day(), marker)
                }
                None => "    ".to_string(),
            })
            .collect();
        println!("{}", row.join("").trim_end());
    }
    println!();
    println!(". available  x blocked");
}
