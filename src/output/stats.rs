//! Statistics read back from the store
//!
//! This module provides functionality for extracting and displaying
//! store statistics from the storage layer.

use crate::storage::{RunRecord, Storage, ENTITY_TABLES};
use crate::SyncError;

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Row count per entity table, in schema order
    pub table_counts: Vec<(&'static str, u64)>,

    /// Matches with no participation rows yet
    pub pending_participation: u64,

    /// The most recent sync run, if any
    pub last_run: Option<RunRecord>,
}

impl StoreStatistics {
    /// Row count for `table`, or zero when the table is not an entity table
    pub fn count(&self, table: &str) -> u64 {
        self.table_counts
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStatistics, SyncError> {
    let mut table_counts = Vec::with_capacity(ENTITY_TABLES.len());
    for table in ENTITY_TABLES {
        table_counts.push((table, storage.count_rows(table)?));
    }

    let pending_participation = storage.matches_without_participation()?.len() as u64;
    let last_run = storage.get_latest_run()?;

    Ok(StoreStatistics {
        table_counts,
        pending_participation,
        last_run,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Rows by table:");
    for (table, count) in &stats.table_counts {
        println!("  {:<28} {}", table, count);
    }
    println!();

    let matches = stats.count("Match");
    let covered = matches.saturating_sub(stats.pending_participation);
    let coverage = if matches > 0 {
        (covered as f64 / matches as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Participation coverage: {:.1}% ({} / {} matches, {} pending)",
        coverage, covered, matches, stats.pending_participation
    );

    if let Some(run) = &stats.last_run {
        println!();
        println!("Last run:");
        println!("  #{} {} ({})", run.id, run.pass, run.status.to_db_string());
        println!("  Started:  {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!(
            "  Units:    {} ok, {} skipped",
            run.units_ok, run.units_skipped
        );
        println!("  Scope:    {}", run.config_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LeagueRow, MatchRow, ParticipationRow, SqliteStorage};

    #[test]
    fn test_load_statistics_empty_store() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.table_counts.len(), ENTITY_TABLES.len());
        assert!(stats.table_counts.iter().all(|(_, count)| *count == 0));
        assert_eq!(stats.pending_participation, 0);
        assert!(stats.last_run.is_none());
    }

    #[test]
    fn test_load_statistics_counts_pending_matches() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage
            .insert_league(&LeagueRow {
                id: 39,
                name: "Premier League".to_string(),
            })
            .unwrap();
        let (season_id, _) = storage.get_or_create_season(2019, 2020).unwrap();
        for (id, home, away) in [(1, 40, 38), (2, 50, 48)] {
            storage
                .insert_match(&MatchRow {
                    id,
                    home_team_id: home,
                    away_team_id: away,
                    date: "2019-08-10".to_string(),
                    home_score: None,
                    away_score: None,
                    season_id,
                    league_id: 39,
                })
                .unwrap();
        }
        storage
            .insert_participation(&ParticipationRow {
                match_id: 1,
                player_id: 306,
                minutes_played: 90,
                goals: 0,
                assists: 0,
            })
            .unwrap();
        storage.create_run("catalog", "abc").unwrap();

        let stats = load_statistics(&storage).unwrap();
        assert_eq!(stats.count("Match"), 2);
        assert_eq!(stats.count("Player_Match_Participation"), 1);
        assert_eq!(stats.count("Nope"), 0);
        assert_eq!(stats.pending_participation, 1);
        assert_eq!(stats.last_run.unwrap().pass, "catalog");
    }
}
