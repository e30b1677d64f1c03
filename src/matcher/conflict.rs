//! Advisory conflict checks for proposed slot sets.
//!
//! A conflict never blocks a booking; the caller decides whether to
//! warn, re-plan or proceed. Two rules are checked over the dates of a
//! proposal: no date should appear twice, and consecutive sessions
//! should be at least [`MIN_GAP_DAYS`] apart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::TimeSlot;

/// Minimum days between consecutive sessions before spacing is flagged.
pub const MIN_GAP_DAYS: i64 = 2;

/// Categories of proposal conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// A date carries more than one proposed slot.
    DuplicateDate,
    /// Two consecutive proposed dates are closer than the minimum gap.
    MinSpacing,
}

/// A single advisory conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Conflict category.
    pub kind: ConflictKind,
    /// Human-readable description.
    pub message: String,
}

impl Conflict {
    fn duplicate_date(date: NaiveDate, count: usize) -> Self {
        Self {
            kind: ConflictKind::DuplicateDate,
            message: format!("date {date} appears {count} times"),
        }
    }

    fn min_spacing(first: NaiveDate, second: NaiveDate, gap_days: i64) -> Self {
        Self {
            kind: ConflictKind::MinSpacing,
            message: format!(
                "only {gap_days} day(s) between {first} and {second}, minimum is {MIN_GAP_DAYS}"
            ),
        }
    }
}

/// Checks a proposed slot set for duplicate dates and tight spacing.
///
/// Dates are compared after sorting; a duplicated date is reported once
/// with its multiplicity and additionally trips the spacing rule as a
/// zero-day gap. An empty result means the proposal is clean.
pub fn check_conflicts(slots: &[TimeSlot]) -> Vec<Conflict> {
    let mut dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
    dates.sort_unstable();

    let mut conflicts = Vec::new();

    let mut i = 0;
    while i < dates.len() {
        let mut run = 1;
        while i + run < dates.len() && dates[i + run] == dates[i] {
            run += 1;
        }
        if run > 1 {
            conflicts.push(Conflict::duplicate_date(dates[i], run));
        }
        i += run;
    }

    for pair in dates.windows(2) {
        let gap = (pair[1] - pair[0]).num_days();
        if gap < MIN_GAP_DAYS {
            conflicts.push(Conflict::min_spacing(pair[0], pair[1], gap));
        }
    }

    conflicts
}
