//! Per-run counters and the list of skipped units

use crate::SyncError;
use std::fmt;

/// A unit of work that was skipped, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    /// Human-readable unit, e.g. `fixtures league=39 season=2019`
    pub unit: String,
    /// Failure category (`transport`, `api`, `storage`, ...)
    pub kind: &'static str,
    pub message: String,
    /// HTTP status for API failures
    pub status: Option<u16>,
}

impl UnitFailure {
    pub fn new(unit: impl Into<String>, error: &SyncError) -> Self {
        let status = match error {
            SyncError::Api { status, .. } => Some(*status),
            _ => None,
        };
        Self {
            unit: unit.into(),
            kind: error.kind(),
            message: error.to_string(),
            status,
        }
    }
}

/// Summary of one or more sync passes
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub units_ok: u64,
    pub units_skipped: u64,
    /// Units whose endpoint answered with no records
    pub units_empty: u64,
    pub failures: Vec<UnitFailure>,

    pub leagues_inserted: u64,
    pub seasons_seen: u64,
    pub teams_inserted: u64,
    pub players_inserted: u64,
    pub links_inserted: u64,
    pub matches_inserted: u64,
    pub matches_processed: u64,
    pub participations_inserted: u64,

    /// Individual records dropped as malformed
    pub records_skipped: u64,
    /// Paginated collections that stopped before the last page
    pub truncated_collections: u64,
}

impl SyncReport {
    /// Records a finished unit
    pub fn unit_ok(&mut self) {
        self.units_ok += 1;
    }

    /// Records a skipped unit and logs the reason
    pub fn unit_skipped(&mut self, unit: impl Into<String>, error: &SyncError) {
        let failure = UnitFailure::new(unit, error);
        match error {
            SyncError::Transport(_) => {
                tracing::error!("Skipping {}: {}", failure.unit, failure.message)
            }
            _ => tracing::warn!("Skipping {}: {}", failure.unit, failure.message),
        }
        self.units_skipped += 1;
        self.failures.push(failure);
    }

    /// Folds the counters of `other` into this report
    pub fn merge(&mut self, other: SyncReport) {
        self.units_ok += other.units_ok;
        self.units_skipped += other.units_skipped;
        self.units_empty += other.units_empty;
        self.failures.extend(other.failures);
        self.leagues_inserted += other.leagues_inserted;
        self.seasons_seen += other.seasons_seen;
        self.teams_inserted += other.teams_inserted;
        self.players_inserted += other.players_inserted;
        self.links_inserted += other.links_inserted;
        self.matches_inserted += other.matches_inserted;
        self.matches_processed += other.matches_processed;
        self.participations_inserted += other.participations_inserted;
        self.records_skipped += other.records_skipped;
        self.truncated_collections += other.truncated_collections;
    }

    /// True when every unit completed
    pub fn is_clean(&self) -> bool {
        self.units_skipped == 0
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Units: {} ok, {} skipped, {} empty",
            self.units_ok, self.units_skipped, self.units_empty
        )?;
        writeln!(
            f,
            "Inserted: {} leagues, {} teams, {} players, {} team links, {} matches, {} participations",
            self.leagues_inserted,
            self.teams_inserted,
            self.players_inserted,
            self.links_inserted,
            self.matches_inserted,
            self.participations_inserted
        )?;
        write!(
            f,
            "Records skipped: {}, truncated collections: {}",
            self.records_skipped, self.truncated_collections
        )?;
        for failure in &self.failures {
            write!(f, "\n  - {} [{}]: {}", failure.unit, failure.kind, failure.message)?;
        }
        Ok(())
    }
}
