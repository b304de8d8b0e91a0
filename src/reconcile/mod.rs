//! Entity reconciler
//!
//! Turns raw provider records into canonical rows and writes them through the
//! storage gateway. Every operation is idempotent: calling it again with the
//! same input leaves the store unchanged. Rows already present are never
//! overwritten (first write wins), which means a corrected score for a match
//! that is already stored is not applied.

pub mod mapping;

use crate::api::records::{FixtureRecord, LineupRecord, PlayerRecord, TeamRecord};
use crate::storage::{
    LeagueRow, MatchRow, ParticipationRow, PlayerRow, PlayerWrite, Storage, TeamRow,
};
use crate::SyncError;
use serde_json::Value;

/// Sentinel for attributes the provider does not supply
pub const UNKNOWN: &str = "Unknown";

/// Minutes recorded when a lineup proves presence but not playing time
pub const FULL_MATCH_MINUTES: u32 = 90;

/// Whether an upsert created the row or found it already present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    AlreadyPresent,
}

impl UpsertOutcome {
    pub fn inserted(self) -> bool {
        self == Self::Inserted
    }
}

impl From<bool> for UpsertOutcome {
    fn from(inserted: bool) -> Self {
        if inserted {
            Self::Inserted
        } else {
            Self::AlreadyPresent
        }
    }
}

/// Result of reconciling one fixture's team sheets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineupOutcome {
    /// Participation rows created
    pub inserted: usize,
    /// Players listed on the sheets with a usable id
    pub listed: usize,
    /// Sheet entries or team sheets skipped as malformed
    pub skipped: usize,
}

/// Reconciles provider records against the store
pub struct Reconciler<'a, S: Storage> {
    storage: &'a mut S,
}

impl<'a, S: Storage> Reconciler<'a, S> {
    pub fn new(storage: &'a mut S) -> Self {
        Self { storage }
    }

    // ===== Entity operations =====

    pub fn upsert_league(&mut self, id: i64, name: &str) -> Result<UpsertOutcome, SyncError> {
        let row = LeagueRow {
            id,
            name: name.to_string(),
        };
        Ok(self.storage.insert_league(&row)?.into())
    }

    /// Returns the surrogate id of the season, creating it on first use
    pub fn upsert_season(&mut self, year_start: i32, year_end: i32) -> Result<i64, SyncError> {
        let (season_id, created) = self.storage.get_or_create_season(year_start, year_end)?;
        if created {
            tracing::debug!("Created season {}/{} as {}", year_start, year_end, season_id);
        }
        Ok(season_id)
    }

    pub fn upsert_team(
        &mut self,
        id: i64,
        name: &str,
        coach: &str,
        league_id: i64,
    ) -> Result<UpsertOutcome, SyncError> {
        let row = TeamRow {
            id,
            name: name.to_string(),
            coach: coach.to_string(),
            league_id,
        };
        Ok(self.storage.insert_team(&row)?.into())
    }

    pub fn upsert_player(
        &mut self,
        id: i64,
        name: &str,
        position: Option<&str>,
    ) -> Result<UpsertOutcome, SyncError> {
        let row = PlayerRow {
            id,
            name: name.to_string(),
            position: position.unwrap_or(UNKNOWN).to_string(),
        };
        Ok(self.storage.insert_player(&row)?.into())
    }

    pub fn link_team_player_season(
        &mut self,
        team_id: i64,
        player_id: i64,
        season_id: i64,
    ) -> Result<UpsertOutcome, SyncError> {
        Ok(self
            .storage
            .link_team_player_season(team_id, player_id, season_id)?
            .into())
    }

    /// Inserts a match; an existing match keeps its original score
    pub fn upsert_match(&mut self, record: &MatchRow) -> Result<UpsertOutcome, SyncError> {
        let outcome: UpsertOutcome = self.storage.insert_match(record)?.into();
        if !outcome.inserted() {
            tracing::trace!("Match {} already stored, not re-scored", record.id);
        }
        Ok(outcome)
    }

    /// Records a player's appearance
    ///
    /// Missing minutes default to a full match; missing goals and assists
    /// default to zero.
    pub fn record_participation(
        &mut self,
        match_id: i64,
        player_id: i64,
        minutes: Option<u32>,
        goals: Option<u32>,
        assists: Option<u32>,
    ) -> Result<UpsertOutcome, SyncError> {
        let row = participation_row(match_id, player_id, minutes, goals, assists);
        Ok(self.storage.insert_participation(&row)?.into())
    }

    // ===== Record-level operations =====

    /// Reconciles one `/teams` record and returns the team id
    pub fn ingest_team(
        &mut self,
        raw: &Value,
        league_id: i64,
    ) -> Result<(i64, UpsertOutcome), SyncError> {
        let record: TeamRecord = mapping::decode(raw, "team")?;
        let row = mapping::team_row(&record, league_id)?;
        let outcome = self.upsert_team(row.id, &row.name, &row.coach, row.league_id)?;
        Ok((row.id, outcome))
    }

    /// Reconciles one `/players` record for a season
    ///
    /// The player and its links to every team in its statistics are written
    /// in one transaction.
    pub fn ingest_player(&mut self, raw: &Value, season_id: i64) -> Result<PlayerWrite, SyncError> {
        let record: PlayerRecord = mapping::decode(raw, "player")?;
        let mapped = mapping::player_mapping(&record)?;
        let write = self
            .storage
            .insert_player_with_links(&mapped.player, season_id, &mapped.team_ids)?;
        Ok(write)
    }

    /// Reconciles one `/fixtures` record
    pub fn ingest_fixture(
        &mut self,
        raw: &Value,
        season_id: i64,
        league_id: i64,
    ) -> Result<UpsertOutcome, SyncError> {
        let record: FixtureRecord = mapping::decode(raw, "fixture")?;
        let row = mapping::match_row(&record, season_id, league_id)?;
        self.upsert_match(&row)
    }

    /// Reconciles the `/fixtures/lineups` response of one match
    ///
    /// Every listed starter and substitute gets a participation row with the
    /// full-match defaults. All rows for the match are written in one
    /// transaction.
    pub fn ingest_lineups(
        &mut self,
        match_id: i64,
        raw: &[Value],
    ) -> Result<LineupOutcome, SyncError> {
        let mut outcome = LineupOutcome::default();
        let mut lineups = Vec::with_capacity(raw.len());

        for entry in raw {
            match mapping::decode::<LineupRecord>(entry, "lineup") {
                Ok(lineup) => lineups.push(lineup),
                Err(e) => {
                    tracing::warn!("Skipping team sheet for match {}: {}", match_id, e);
                    outcome.skipped += 1;
                }
            }
        }

        let (player_ids, skipped) = mapping::lineup_player_ids(match_id, &lineups);
        outcome.skipped += skipped;
        outcome.listed = player_ids.len();

        let rows: Vec<ParticipationRow> = player_ids
            .into_iter()
            .map(|player_id| participation_row(match_id, player_id, None, None, None))
            .collect();

        outcome.inserted = self.storage.insert_participations(&rows)?;
        Ok(outcome)
    }
}

fn participation_row(
    match_id: i64,
    player_id: i64,
    minutes: Option<u32>,
    goals: Option<u32>,
    assists: Option<u32>,
) -> ParticipationRow {
    ParticipationRow {
        match_id,
        player_id,
        minutes_played: minutes.unwrap_or(FULL_MATCH_MINUTES),
        goals: goals.unwrap_or(0),
        assists: assists.unwrap_or(0),
    }
}
