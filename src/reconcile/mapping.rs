//! Mapping of raw provider records onto canonical rows
//!
//! Pure functions: no storage access. Anything that prevents a record from
//! becoming a valid row is reported as an integrity gap for that record.

use crate::api::records::{FixtureRecord, LineupRecord, PlayerRecord, TeamRecord};
use crate::reconcile::UNKNOWN;
use crate::storage::{MatchRow, PlayerRow, TeamRow};
use crate::SyncError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes one raw record into its typed shape
pub fn decode<T: DeserializeOwned>(raw: &Value, what: &str) -> Result<T, SyncError> {
    T::deserialize(raw)
        .map_err(|e| SyncError::IntegrityGap(format!("malformed {} record: {}", what, e)))
}

fn gap(message: String) -> SyncError {
    SyncError::IntegrityGap(message)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Maps a `/teams` record onto a team row in `league_id`
///
/// The endpoint carries no coach, so the coach is the `Unknown` sentinel.
pub fn team_row(record: &TeamRecord, league_id: i64) -> Result<TeamRow, SyncError> {
    let id = record
        .team
        .id
        .ok_or_else(|| gap("team record without id".to_string()))?;
    let name = non_empty(record.team.name.as_deref())
        .ok_or_else(|| gap(format!("team {} has no name", id)))?;

    Ok(TeamRow {
        id,
        name: name.to_string(),
        coach: UNKNOWN.to_string(),
        league_id,
    })
}

/// A player row plus every team it played for in the fetch window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerMapping {
    pub player: PlayerRow,
    pub team_ids: Vec<i64>,
}

/// Maps a `/players` record
///
/// The first statistics entry's position is taken as authoritative. Every
/// distinct team across all entries is kept, in first-seen order, so a
/// player who moved mid-season links to each club.
pub fn player_mapping(record: &PlayerRecord) -> Result<PlayerMapping, SyncError> {
    let id = record
        .player
        .id
        .ok_or_else(|| gap("player record without id".to_string()))?;
    let name = non_empty(record.player.name.as_deref())
        .ok_or_else(|| gap(format!("player {} has no name", id)))?;

    let statistics = record.statistics.as_deref().unwrap_or(&[]);

    let position = statistics
        .first()
        .and_then(|entry| entry.games.as_ref())
        .and_then(|games| non_empty(games.position.as_deref()))
        .unwrap_or(UNKNOWN);

    let mut team_ids = Vec::new();
    for entry in statistics {
        match entry.team.as_ref().and_then(|team| team.id) {
            Some(team_id) if !team_ids.contains(&team_id) => team_ids.push(team_id),
            Some(_) => {}
            None => tracing::warn!("Player {} has a statistics entry without a team id", id),
        }
    }

    Ok(PlayerMapping {
        player: PlayerRow {
            id,
            name: name.to_string(),
            position: position.to_string(),
        },
        team_ids,
    })
}

/// Maps a `/fixtures` record onto a match row
pub fn match_row(
    record: &FixtureRecord,
    season_id: i64,
    league_id: i64,
) -> Result<MatchRow, SyncError> {
    let id = record
        .fixture
        .id
        .ok_or_else(|| gap("fixture record without id".to_string()))?;
    let home_team_id = record
        .teams
        .home
        .id
        .ok_or_else(|| gap(format!("fixture {} has no home team id", id)))?;
    let away_team_id = record
        .teams
        .away
        .id
        .ok_or_else(|| gap(format!("fixture {} has no away team id", id)))?;

    if home_team_id == away_team_id {
        return Err(gap(format!(
            "fixture {} lists team {} as both home and away",
            id, home_team_id
        )));
    }

    let date = non_empty(record.fixture.date.as_deref())
        .ok_or_else(|| gap(format!("fixture {} has no date", id)))?;
    let goals = record.goals.clone().unwrap_or_default();

    Ok(MatchRow {
        id,
        home_team_id,
        away_team_id,
        date: date.to_string(),
        home_score: goals.home,
        away_score: goals.away,
        season_id,
        league_id,
    })
}

/// Player ids listed on the team sheets, starters then substitutes
///
/// Entries without a player id are logged and counted, not returned.
pub fn lineup_player_ids(match_id: i64, lineups: &[LineupRecord]) -> (Vec<i64>, usize) {
    let mut ids = Vec::new();
    let mut skipped = 0;

    for lineup in lineups {
        for slot in lineup.slots() {
            match slot.player.as_ref().and_then(|p| p.id) {
                Some(id) if id > 0 => ids.push(id),
                _ => {
                    tracing::warn!(
                        "Player ID missing in match {}, {}. Skipping player entry.",
                        match_id,
                        lineup.team_label()
                    );
                    skipped += 1;
                }
            }
        }
    }

    (ids, skipped)
}
