//! Month grid projection for the calendar view.
//!
//! One verdict per day, laid out in Sunday-first weeks. Leading blank cells put
//! the first day under its weekday column and trailing blanks complete the last
//! row. The grid is rebuilt on every call.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::blocked::BlockedPeriod;
use crate::error::{EngineError, Result};
use crate::resolver::{resolve, Verdict};
use crate::schedule::{weekday_index, WeeklySchedule, DAYS_PER_WEEK};

const WEEK: usize = DAYS_PER_WEEK as usize;

/// Cells in row-major order; `None` is a blank padding cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub cells: Vec<Option<Verdict>>,
}

impl MonthGrid {
    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_none()).count()
    }

    /// Rows of seven cells, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<Verdict>]> {
        self.cells.chunks(WEEK)
    }

    /// The real (non-blank) cells in date order.
    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.cells.iter().flatten()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Verdict> {
        self.verdicts().find(|v| v.date == date)
    }
}

/// Project every date from `month_start` to `month_end` inclusive.
///
/// An inverted range yields an empty grid.
pub fn project(
    month_start: NaiveDate,
    month_end: NaiveDate,
    schedule: &WeeklySchedule,
    blocked: &[BlockedPeriod],
) -> MonthGrid {
    if month_start > month_end {
        return MonthGrid::default();
    }

    let leading = weekday_index(month_start) as usize;
    let days = (month_end - month_start).num_days() as usize + 1;

    let mut cells: Vec<Option<Verdict>> = Vec::with_capacity((leading + days).div_ceil(WEEK) * WEEK);
    cells.extend((0..leading).map(|_| None));
    cells.extend(
        month_start
            .iter_days()
            .take_while(|d| *d <= month_end)
            .map(|d| Some(resolve(d, schedule, blocked))),
    );
    while cells.len() % WEEK != 0 {
        cells.push(None);
    }

    MonthGrid { cells }
}

/// Project a whole calendar month.
///
/// # Errors
/// Returns [`EngineError::InvalidDate`] if `year`/`month` do not name a month.
pub fn project_month(
    year: i32,
    month: u32,
    schedule: &WeeklySchedule,
    blocked: &[BlockedPeriod],
) -> Result<MonthGrid> {
    let invalid = || EngineError::InvalidDate(format!("{:04}-{:02}", year, month));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    Ok(project(first, last, schedule, blocked))
}
