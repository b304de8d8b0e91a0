//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{
    LeagueRow, MatchRow, ParticipationRow, PlayerRow, PlayerWrite, RunRecord, RunStatus,
    SeasonRow, TeamRow,
};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Every write is keyed by its natural or primary key and follows
/// check-then-insert: a row already present is left untouched and the call
/// reports `false`. Each method commits its own transaction before returning.
pub trait Storage {
    // ===== Leagues and seasons =====

    /// Inserts a league unless its id is already present
    fn insert_league(&mut self, league: &LeagueRow) -> StorageResult<bool>;

    /// Gets a league by id
    fn get_league(&self, league_id: i64) -> StorageResult<Option<LeagueRow>>;

    /// Returns the id of the `(year_start, year_end)` season, creating it if needed
    ///
    /// The boolean is true when the row was created by this call.
    fn get_or_create_season(&mut self, year_start: i32, year_end: i32)
        -> StorageResult<(i64, bool)>;

    /// Finds the season starting in `year_start`
    fn find_season(&self, year_start: i32) -> StorageResult<Option<SeasonRow>>;

    // ===== Teams and players =====

    /// Inserts a team unless its id is already present
    fn insert_team(&mut self, team: &TeamRow) -> StorageResult<bool>;

    /// Gets a team by id
    fn get_team(&self, team_id: i64) -> StorageResult<Option<TeamRow>>;

    /// Inserts a player unless its id is already present
    fn insert_player(&mut self, player: &PlayerRow) -> StorageResult<bool>;

    /// Gets a player by id
    fn get_player(&self, player_id: i64) -> StorageResult<Option<PlayerRow>>;

    /// Records that a player belonged to a team during a season
    fn link_team_player_season(
        &mut self,
        team_id: i64,
        player_id: i64,
        season_id: i64,
    ) -> StorageResult<bool>;

    /// Inserts a player and all of its team links for a season in one transaction
    fn insert_player_with_links(
        &mut self,
        player: &PlayerRow,
        season_id: i64,
        team_ids: &[i64],
    ) -> StorageResult<PlayerWrite>;

    /// Players linked to `team_id` in the season starting in `year_start`
    fn players_for_team_season(&self, team_id: i64, year_start: i32)
        -> StorageResult<Vec<PlayerRow>>;

    // ===== Matches and participation =====

    /// Inserts a match unless its id is already present
    ///
    /// The season and league rows it references must already exist; both are
    /// checked inside the same transaction as the insert.
    fn insert_match(&mut self, record: &MatchRow) -> StorageResult<bool>;

    /// Gets a match by id
    fn get_match(&self, match_id: i64) -> StorageResult<Option<MatchRow>>;

    /// Records a single participation unless `(match_id, player_id)` exists
    fn insert_participation(&mut self, row: &ParticipationRow) -> StorageResult<bool>;

    /// Records a whole lineup in one transaction, returning the rows inserted
    fn insert_participations(&mut self, rows: &[ParticipationRow]) -> StorageResult<usize>;

    /// Matches with no participation rows yet, in id order
    fn matches_without_participation(&self) -> StorageResult<Vec<i64>>;

    // ===== Statistics =====

    /// Counts the rows of one of the entity tables
    fn count_rows(&self, table: &str) -> StorageResult<u64>;

    // ===== Run ledger =====

    /// Opens a new sync run in the `running` state
    fn create_run(&mut self, pass: &str, config_hash: &str) -> StorageResult<i64>;

    /// Closes a run with its final status and unit counters
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        units_ok: u64,
        units_skipped: u64,
    ) -> StorageResult<()>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
