//! Detect blocked periods that overlap a candidate.
//!
//! Compares a new period against existing ones. Two periods overlap when their
//! date ranges intersect and, if both are partial-day, their hours intersect
//! too. Touching hours (`09:00-12:00` next to `12:00-13:00`) are NOT overlaps.
//! Inactive periods are ignored.

use crate::blocked::{BlockScope, BlockedPeriod};

/// An existing period that overlaps the candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    pub existing: BlockedPeriod,
    /// Number of dates both periods cover.
    pub overlap_days: i64,
    /// Same dates and same hours (the reason is not compared).
    pub exact_duplicate: bool,
}

/// Find every active period in `existing` that overlaps `candidate`.
pub fn find_overlaps(candidate: &BlockedPeriod, existing: &[BlockedPeriod]) -> Vec<Overlap> {
    let Some(candidate_dates) = candidate.date_range() else {
        return Vec::new();
    };
    let candidate_scope = candidate.scope();

    let mut overlaps = Vec::new();

    for other in existing.iter().filter(|p| p.is_active) {
        let Some(shared) = other
            .date_range()
            .and_then(|dates| dates.intersection(&candidate_dates))
        else {
            continue;
        };

        let other_scope = other.scope();
        let hours_overlap = match (candidate_scope, other_scope) {
            (BlockScope::Hours(a), BlockScope::Hours(b)) => a.overlaps(&b),
            _ => true,
        };
        if !hours_overlap {
            continue;
        }

        overlaps.push(Overlap {
            existing: other.clone(),
            overlap_days: shared.len_days(),
            exact_duplicate: is_duplicate(candidate, other),
        });
    }

    overlaps
}

/// True when both periods block exactly the same dates and hours.
pub fn is_duplicate(a: &BlockedPeriod, b: &BlockedPeriod) -> bool {
    a.start_date == b.start_date && a.end_date == b.end_date && a.scope() == b.scope()
}
