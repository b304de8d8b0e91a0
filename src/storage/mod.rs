//! Storage module for persisting competition data
//!
//! This module is the persistence gateway for the pipeline:
//! - SQLite database opening and schema bootstrap
//! - Entity-shaped, idempotent insert operations (check-then-insert)
//! - Scoped transactions for multi-row writes
//! - Selection queries used to resume the participation pass
//! - Sync run bookkeeping

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, ENTITY_TABLES};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::SyncError;
use std::path::Path;

/// Opens (or creates) the store at `path`
///
/// This is the only storage failure that aborts a run.
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SyncError> {
    SqliteStorage::new(path)
}

/// A league row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueRow {
    pub id: i64,
    pub name: String,
}

/// A season row; `id` is a surrogate key assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRow {
    pub id: i64,
    pub year_start: i32,
    pub year_end: i32,
}

/// A team row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRow {
    pub id: i64,
    pub name: String,
    pub coach: String,
    pub league_id: i64,
}

/// A player row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub id: i64,
    pub name: String,
    pub position: String,
}

/// A match row; scores are absent for fixtures not yet played
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub date: String,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub season_id: i64,
    pub league_id: i64,
}

/// A player's appearance in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipationRow {
    pub match_id: i64,
    pub player_id: i64,
    pub minutes_played: u32,
    pub goals: u32,
    pub assists: u32,
}

/// Outcome of a player write with its season links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerWrite {
    pub player_inserted: bool,
    pub links_inserted: usize,
}

/// Represents a sync run in the ledger
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub pass: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub units_ok: u64,
    pub units_skipped: u64,
}

/// Status of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
