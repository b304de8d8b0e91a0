//! Output module for store summaries
//!
//! This module handles:
//! - Loading row counts and participation coverage from the store
//! - Printing them for the `--stats` mode
//! - Summarizing finished sync runs

pub mod stats;

pub use stats::{load_statistics, print_statistics, StoreStatistics};

use crate::storage::RunRecord;
use chrono::{DateTime, Utc};

/// Wall-clock duration of a finished run, in seconds
///
/// Returns `None` for a run that has not finished or whose timestamps do not
/// parse.
pub fn run_duration_seconds(run: &RunRecord) -> Option<u64> {
    let started = run.started_at.parse::<DateTime<Utc>>().ok()?;
    let finished = run.finished_at.as_ref()?.parse::<DateTime<Utc>>().ok()?;
    u64::try_from((finished - started).num_seconds()).ok()
}
