//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.
//! One connection is held for the lifetime of a run; every trait write runs
//! inside its own transaction.

use crate::storage::schema::{initialize_schema, ENTITY_TABLES};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    LeagueRow, MatchRow, ParticipationRow, PlayerRow, PlayerWrite, RunRecord, RunStatus,
    SeasonRow, TeamRow,
};
use crate::SyncError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the SQLite database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SyncError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SyncError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> Result<Self, SyncError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Read-only access to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ===== Statement helpers shared by single writes and scoped transactions =====

fn league_exists(conn: &Connection, league_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM League WHERE League_ID = ?1",
        params![league_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

fn season_exists(conn: &Connection, season_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM Season WHERE Season_ID = ?1",
        params![season_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

fn insert_player_row(conn: &Connection, player: &PlayerRow) -> rusqlite::Result<bool> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT Player_ID FROM Player WHERE Player_ID = ?1",
            params![player.id],
            |row| row.get(0),
        )
        .optional()?;

    if existing.is_some() {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO Player (Player_ID, Player_Name, Position) VALUES (?1, ?2, ?3)",
        params![player.id, player.name, player.position],
    )?;
    Ok(true)
}

fn insert_link_row(
    conn: &Connection,
    team_id: i64,
    player_id: i64,
    season_id: i64,
) -> rusqlite::Result<bool> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT Team_Player_Season_ID FROM Team_Player_Season
             WHERE Team_ID = ?1 AND Player_ID = ?2 AND Season_ID = ?3",
            params![team_id, player_id, season_id],
            |row| row.get(0),
        )
        .optional()?;

    if existing.is_some() {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO Team_Player_Season (Team_ID, Player_ID, Season_ID) VALUES (?1, ?2, ?3)",
        params![team_id, player_id, season_id],
    )?;
    Ok(true)
}

fn insert_participation_row(conn: &Connection, row: &ParticipationRow) -> rusqlite::Result<bool> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT Player_Match_ID FROM Player_Match_Participation
             WHERE Match_ID = ?1 AND Player_ID = ?2",
            params![row.match_id, row.player_id],
            |r| r.get(0),
        )
        .optional()?;

    if existing.is_some() {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO Player_Match_Participation
         (Match_ID, Player_ID, Minutes_Played, Goals, Assists) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            row.match_id,
            row.player_id,
            row.minutes_played,
            row.goals,
            row.assists
        ],
    )?;
    Ok(true)
}

fn season_end(year_start: i32) -> StorageResult<i32> {
    year_start.checked_add(1).ok_or_else(|| {
        StorageError::ConstraintViolation(format!("season start {} is out of range", year_start))
    })
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerRow> {
    Ok(PlayerRow {
        id: row.get(0)?,
        name: row.get(1)?,
        position: row
            .get::<_, Option<String>>(2)?
            .unwrap_or_else(|| "Unknown".to_string()),
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        pass: row.get(1)?,
        started_at: row.get(2)?,
        finished_at: row.get(3)?,
        config_hash: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?)
            .unwrap_or(RunStatus::Running),
        units_ok: row.get::<_, i64>(6)? as u64,
        units_skipped: row.get::<_, i64>(7)? as u64,
    })
}

impl Storage for SqliteStorage {
    // ===== Leagues and seasons =====

    fn insert_league(&mut self, league: &LeagueRow) -> StorageResult<bool> {
        if league.name.trim().is_empty() {
            return Err(StorageError::ConstraintViolation(format!(
                "league {} has an empty name",
                league.id
            )));
        }

        let tx = self.conn.transaction()?;
        if league_exists(&tx, league.id)? {
            return Ok(false);
        }
        tx.execute(
            "INSERT INTO League (League_ID, League_Name) VALUES (?1, ?2)",
            params![league.id, league.name],
        )?;
        tx.commit()?;
        Ok(true)
    }

    fn get_league(&self, league_id: i64) -> StorageResult<Option<LeagueRow>> {
        let league = self
            .conn
            .query_row(
                "SELECT League_ID, League_Name FROM League WHERE League_ID = ?1",
                params![league_id],
                |row| {
                    Ok(LeagueRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(league)
    }

    fn get_or_create_season(
        &mut self,
        year_start: i32,
        year_end: i32,
    ) -> StorageResult<(i64, bool)> {
        if year_start.checked_add(1) != Some(year_end) {
            return Err(StorageError::ConstraintViolation(format!(
                "season {}/{} does not span consecutive years",
                year_start, year_end
            )));
        }

        let tx = self.conn.transaction()?;
        let existing: Option<i64> = tx
            .query_row(
                "SELECT Season_ID FROM Season WHERE Year_Start = ?1 AND Year_End = ?2",
                params![year_start, year_end],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok((id, false));
        }

        tx.execute(
            "INSERT INTO Season (Year_Start, Year_End) VALUES (?1, ?2)",
            params![year_start, year_end],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok((id, true))
    }

    fn find_season(&self, year_start: i32) -> StorageResult<Option<SeasonRow>> {
        let year_end = season_end(year_start)?;
        let season = self
            .conn
            .query_row(
                "SELECT Season_ID, Year_Start, Year_End FROM Season
                 WHERE Year_Start = ?1 AND Year_End = ?2",
                params![year_start, year_end],
                |row| {
                    Ok(SeasonRow {
                        id: row.get(0)?,
                        year_start: row.get(1)?,
                        year_end: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(season)
    }

    // ===== Teams and players =====

    fn insert_team(&mut self, team: &TeamRow) -> StorageResult<bool> {
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT Team_ID FROM Team WHERE Team_ID = ?1",
                params![team.id],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Ok(false);
        }

        if !league_exists(&tx, team.league_id)? {
            return Err(StorageError::ConstraintViolation(format!(
                "team {} references unknown league {}",
                team.id, team.league_id
            )));
        }

        tx.execute(
            "INSERT INTO Team (Team_ID, Team_Name, Coach, League_ID) VALUES (?1, ?2, ?3, ?4)",
            params![team.id, team.name, team.coach, team.league_id],
        )?;
        tx.commit()?;
        Ok(true)
    }

    fn get_team(&self, team_id: i64) -> StorageResult<Option<TeamRow>> {
        let team = self
            .conn
            .query_row(
                "SELECT Team_ID, Team_Name, Coach, League_ID FROM Team WHERE Team_ID = ?1",
                params![team_id],
                |row| {
                    Ok(TeamRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        coach: row
                            .get::<_, Option<String>>(2)?
                            .unwrap_or_else(|| "Unknown".to_string()),
                        league_id: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(team)
    }

    fn insert_player(&mut self, player: &PlayerRow) -> StorageResult<bool> {
        let tx = self.conn.transaction()?;
        let inserted = insert_player_row(&tx, player)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn get_player(&self, player_id: i64) -> StorageResult<Option<PlayerRow>> {
        let player = self
            .conn
            .query_row(
                "SELECT Player_ID, Player_Name, Position FROM Player WHERE Player_ID = ?1",
                params![player_id],
                player_from_row,
            )
            .optional()?;
        Ok(player)
    }

    fn link_team_player_season(
        &mut self,
        team_id: i64,
        player_id: i64,
        season_id: i64,
    ) -> StorageResult<bool> {
        let tx = self.conn.transaction()?;
        let inserted = insert_link_row(&tx, team_id, player_id, season_id)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn insert_player_with_links(
        &mut self,
        player: &PlayerRow,
        season_id: i64,
        team_ids: &[i64],
    ) -> StorageResult<PlayerWrite> {
        let tx = self.conn.transaction()?;

        if !season_exists(&tx, season_id)? {
            return Err(StorageError::ConstraintViolation(format!(
                "player {} references unknown season {}",
                player.id, season_id
            )));
        }

        let mut write = PlayerWrite {
            player_inserted: insert_player_row(&tx, player)?,
            links_inserted: 0,
        };

        for &team_id in team_ids {
            if insert_link_row(&tx, team_id, player.id, season_id)? {
                write.links_inserted += 1;
            }
        }

        tx.commit()?;
        Ok(write)
    }

    fn players_for_team_season(
        &self,
        team_id: i64,
        year_start: i32,
    ) -> StorageResult<Vec<PlayerRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.Player_ID, p.Player_Name, p.Position
             FROM Team_Player_Season tps
             JOIN Player p ON p.Player_ID = tps.Player_ID
             JOIN Season s ON s.Season_ID = tps.Season_ID
             WHERE tps.Team_ID = ?1 AND s.Year_Start = ?2
             ORDER BY p.Player_ID",
        )?;

        let players = stmt
            .query_map(params![team_id, year_start], player_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(players)
    }

    // ===== Matches and participation =====

    fn insert_match(&mut self, record: &MatchRow) -> StorageResult<bool> {
        if record.home_team_id == record.away_team_id {
            return Err(StorageError::ConstraintViolation(format!(
                "match {} has team {} on both sides",
                record.id, record.home_team_id
            )));
        }

        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT Match_ID FROM Match WHERE Match_ID = ?1",
                params![record.id],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Ok(false);
        }

        if !season_exists(&tx, record.season_id)? {
            return Err(StorageError::ConstraintViolation(format!(
                "match {} references unknown season {}",
                record.id, record.season_id
            )));
        }
        if !league_exists(&tx, record.league_id)? {
            return Err(StorageError::ConstraintViolation(format!(
                "match {} references unknown league {}",
                record.id, record.league_id
            )));
        }

        tx.execute(
            "INSERT INTO Match (Match_ID, Home_Team_ID, Away_Team_ID, Date, Home_Score,
             Away_Score, Season_ID, League_ID) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.home_team_id,
                record.away_team_id,
                record.date,
                record.home_score,
                record.away_score,
                record.season_id,
                record.league_id
            ],
        )?;
        tx.commit()?;
        Ok(true)
    }

    fn get_match(&self, match_id: i64) -> StorageResult<Option<MatchRow>> {
        let record = self
            .conn
            .query_row(
                "SELECT Match_ID, Home_Team_ID, Away_Team_ID, Date, Home_Score, Away_Score,
                 Season_ID, League_ID FROM Match WHERE Match_ID = ?1",
                params![match_id],
                |row| {
                    Ok(MatchRow {
                        id: row.get(0)?,
                        home_team_id: row.get(1)?,
                        away_team_id: row.get(2)?,
                        date: row.get(3)?,
                        home_score: row.get(4)?,
                        away_score: row.get(5)?,
                        season_id: row.get(6)?,
                        league_id: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn insert_participation(&mut self, row: &ParticipationRow) -> StorageResult<bool> {
        let tx = self.conn.transaction()?;
        let inserted = insert_participation_row(&tx, row)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn insert_participations(&mut self, rows: &[ParticipationRow]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        for row in rows {
            if insert_participation_row(&tx, row)? {
                inserted += 1;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn matches_without_participation(&self) -> StorageResult<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT Match_ID FROM Match
             WHERE Match_ID NOT IN (SELECT DISTINCT Match_ID FROM Player_Match_Participation)
             ORDER BY Match_ID",
        )?;

        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    // ===== Statistics =====

    fn count_rows(&self, table: &str) -> StorageResult<u64> {
        // Table names cannot be bound as parameters, so only known names are accepted
        let table = ENTITY_TABLES
            .iter()
            .find(|known| **known == table)
            .ok_or_else(|| StorageError::ConstraintViolation(format!("unknown table {}", table)))?;

        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    // ===== Run ledger =====

    fn create_run(&mut self, pass: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO sync_runs (pass, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![pass, now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        units_ok: u64,
        units_skipped: u64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE sync_runs SET status = ?1, finished_at = ?2, units_ok = ?3, units_skipped = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                units_ok as i64,
                units_skipped as i64,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, pass, started_at, finished_at, config_hash, status, units_ok,
                 units_skipped FROM sync_runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_with_context() -> (SqliteStorage, i64) {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage
            .insert_league(&LeagueRow {
                id: 39,
                name: "Premier League".to_string(),
            })
            .unwrap();
        let (season_id, _) = storage.get_or_create_season(2019, 2020).unwrap();
        (storage, season_id)
    }

    fn player(id: i64, name: &str) -> PlayerRow {
        PlayerRow {
            id,
            name: name.to_string(),
            position: "Midfielder".to_string(),
        }
    }

    fn sample_match(id: i64, season_id: i64) -> MatchRow {
        MatchRow {
            id,
            home_team_id: 50,
            away_team_id: 33,
            date: "2019-08-10T14:00:00+00:00".to_string(),
            home_score: Some(2),
            away_score: Some(1),
            season_id,
            league_id: 39,
        }
    }

    #[test]
    fn test_create_in_memory() {
        assert!(SqliteStorage::open_in_memory().is_ok());
    }

    #[test]
    fn test_insert_league_first_write_wins() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let first = LeagueRow {
            id: 39,
            name: "Premier League".to_string(),
        };
        let renamed = LeagueRow {
            id: 39,
            name: "EPL".to_string(),
        };

        assert!(storage.insert_league(&first).unwrap());
        assert!(!storage.insert_league(&renamed).unwrap());
        assert_eq!(storage.get_league(39).unwrap(), Some(first));
    }

    #[test]
    fn test_insert_league_rejects_empty_name() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let result = storage.insert_league(&LeagueRow {
            id: 1,
            name: " ".to_string(),
        });
        assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));
    }

    #[test]
    fn test_season_get_or_create_is_stable() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let (id1, created1) = storage.get_or_create_season(2019, 2020).unwrap();
        let (id2, created2) = storage.get_or_create_season(2019, 2020).unwrap();

        assert!(created1);
        assert!(!created2);
        assert_eq!(id1, id2);
        assert_eq!(storage.find_season(2019).unwrap().unwrap().id, id1);
        assert!(storage.find_season(2020).unwrap().is_none());
        assert_eq!(storage.count_rows("Season").unwrap(), 1);
    }

    #[test]
    fn test_season_must_span_consecutive_years() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.get_or_create_season(2019, 2021).is_err());
    }

    #[test]
    fn test_season_at_year_limit_is_rejected() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(matches!(
            storage.get_or_create_season(i32::MAX, i32::MAX),
            Err(StorageError::ConstraintViolation(_))
        ));
        assert!(matches!(
            storage.find_season(i32::MAX),
            Err(StorageError::ConstraintViolation(_))
        ));
        assert_eq!(storage.count_rows("Season").unwrap(), 0);
    }

    #[test]
    fn test_team_requires_league() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let team = TeamRow {
            id: 50,
            name: "Manchester City".to_string(),
            coach: "Unknown".to_string(),
            league_id: 39,
        };
        assert!(storage.insert_team(&team).is_err());

        storage
            .insert_league(&LeagueRow {
                id: 39,
                name: "Premier League".to_string(),
            })
            .unwrap();
        assert!(storage.insert_team(&team).unwrap());
        assert!(!storage.insert_team(&team).unwrap());
        assert_eq!(storage.get_team(50).unwrap(), Some(team));
    }

    #[test]
    fn test_player_with_links_is_idempotent() {
        let (mut storage, season_id) = storage_with_context();
        let p = player(276, "Neymar");

        let first = storage
            .insert_player_with_links(&p, season_id, &[85, 529])
            .unwrap();
        assert!(first.player_inserted);
        assert_eq!(first.links_inserted, 2);

        let second = storage
            .insert_player_with_links(&p, season_id, &[85, 529])
            .unwrap();
        assert_eq!(second, PlayerWrite::default());
        assert_eq!(storage.count_rows("Team_Player_Season").unwrap(), 2);
    }

    #[test]
    fn test_player_links_roll_back_on_unknown_season() {
        let (mut storage, _) = storage_with_context();
        let result = storage.insert_player_with_links(&player(1, "Nobody"), 999, &[50]);

        assert!(result.is_err());
        assert!(storage.get_player(1).unwrap().is_none());
        assert_eq!(storage.count_rows("Team_Player_Season").unwrap(), 0);
    }

    #[test]
    fn test_players_for_team_season() {
        let (mut storage, season_id) = storage_with_context();
        storage
            .insert_player_with_links(&player(2, "B"), season_id, &[50])
            .unwrap();
        storage
            .insert_player_with_links(&player(1, "A"), season_id, &[50, 33])
            .unwrap();
        storage
            .insert_player_with_links(&player(3, "C"), season_id, &[33])
            .unwrap();

        let ids: Vec<i64> = storage
            .players_for_team_season(50, 2019)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(storage.players_for_team_season(50, 2020).unwrap().is_empty());
    }

    #[test]
    fn test_match_is_never_rescored() {
        let (mut storage, season_id) = storage_with_context();
        let original = sample_match(157001, season_id);
        let corrected = MatchRow {
            home_score: Some(3),
            ..original.clone()
        };

        assert!(storage.insert_match(&original).unwrap());
        assert!(!storage.insert_match(&corrected).unwrap());
        assert_eq!(storage.get_match(157001).unwrap(), Some(original));
    }

    #[test]
    fn test_match_requires_season_and_league() {
        let (mut storage, season_id) = storage_with_context();

        let bad_season = sample_match(1, season_id + 100);
        assert!(storage.insert_match(&bad_season).is_err());

        let bad_league = MatchRow {
            league_id: 140,
            ..sample_match(2, season_id)
        };
        assert!(storage.insert_match(&bad_league).is_err());

        assert_eq!(storage.count_rows("Match").unwrap(), 0);
    }

    #[test]
    fn test_match_rejects_same_team_on_both_sides() {
        let (mut storage, season_id) = storage_with_context();
        let record = MatchRow {
            away_team_id: 50,
            ..sample_match(3, season_id)
        };
        assert!(matches!(
            storage.insert_match(&record),
            Err(StorageError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn test_participation_and_selection() {
        let (mut storage, season_id) = storage_with_context();
        storage.insert_match(&sample_match(10, season_id)).unwrap();
        storage.insert_match(&sample_match(11, season_id)).unwrap();

        assert_eq!(storage.matches_without_participation().unwrap(), vec![10, 11]);

        let rows = [
            ParticipationRow {
                match_id: 10,
                player_id: 1,
                minutes_played: 90,
                goals: 0,
                assists: 0,
            },
            ParticipationRow {
                match_id: 10,
                player_id: 2,
                minutes_played: 90,
                goals: 0,
                assists: 0,
            },
        ];
        assert_eq!(storage.insert_participations(&rows).unwrap(), 2);
        assert_eq!(storage.insert_participations(&rows).unwrap(), 0);
        assert!(!storage.insert_participation(&rows[0]).unwrap());

        assert_eq!(storage.matches_without_participation().unwrap(), vec![11]);
        assert_eq!(storage.count_rows("Player_Match_Participation").unwrap(), 2);
    }

    #[test]
    fn test_count_rows_rejects_unknown_table() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.count_rows("sqlite_master; DROP TABLE League").is_err());
    }

    #[test]
    fn test_run_ledger() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.get_latest_run().unwrap().is_none());

        let run_id = storage.create_run("catalog", "abc123").unwrap();
        let run = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(run.id, run_id);
        assert_eq!(run.status, RunStatus::Running);
        assert!(run.finished_at.is_none());

        storage
            .finish_run(run_id, RunStatus::Completed, 12, 3)
            .unwrap();
        let run = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.pass, "catalog");
        assert_eq!((run.units_ok, run.units_skipped), (12, 3));
        assert!(run.finished_at.is_some());

        assert!(matches!(
            storage.finish_run(999, RunStatus::Failed, 0, 0),
            Err(StorageError::RunNotFound(999))
        ));
    }
}
