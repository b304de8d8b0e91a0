//! Integration tests for the participation pass

mod common;

use common::{create_test_config, envelope, lineup_json, mount_json};
use serde_json::json;
use touchline::config::{Config, LeagueEntry};
use touchline::storage::{LeagueRow, MatchRow, ParticipationRow, SqliteStorage, Storage};
use touchline::sync::Orchestrator;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Store holding league 39, season 2019/2020 and the given matches
fn seeded_storage(match_ids: &[i64]) -> SqliteStorage {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    storage
        .insert_league(&LeagueRow {
            id: 39,
            name: "Premier League".to_string(),
        })
        .unwrap();
    let (season_id, _) = storage.get_or_create_season(2019, 2020).unwrap();
    for &id in match_ids {
        storage
            .insert_match(&MatchRow {
                id,
                home_team_id: 50,
                away_team_id: 40,
                date: "2019-08-10T14:00:00+00:00".to_string(),
                home_score: Some(1),
                away_score: Some(0),
                season_id,
                league_id: 39,
            })
            .unwrap();
    }
    storage
}

fn config_for(server: &MockServer) -> Config {
    create_test_config(
        &server.uri(),
        vec![LeagueEntry::new("Premier League", 39)],
        vec![2019],
        ":memory:",
    )
}

fn participation_count(storage: &SqliteStorage, match_id: i64) -> i64 {
    storage
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM Player_Match_Participation WHERE Match_ID = ?1",
            [match_id],
            |row| row.get(0),
        )
        .unwrap()
}

#[tokio::test]
async fn test_records_starters_and_substitutes() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/fixtures/lineups",
        &[("fixture", "1001")],
        envelope(vec![
            lineup_json(50, &[1, 2, 3], &[4]),
            lineup_json(40, &[11, 12], &[13, 14]),
        ]),
        Some(1),
    )
    .await;

    let config = config_for(&server);
    let mut orchestrator = Orchestrator::new(&config, seeded_storage(&[1001])).unwrap();
    let report = orchestrator.run_participation().await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.matches_processed, 1);
    assert_eq!(report.participations_inserted, 8);

    let storage = orchestrator.storage();
    assert_eq!(participation_count(storage, 1001), 8);
    assert!(storage.matches_without_participation().unwrap().is_empty());

    let (minutes, goals, assists): (i64, i64, i64) = storage
        .connection()
        .query_row(
            "SELECT Minutes_Played, Goals, Assists FROM Player_Match_Participation
             WHERE Match_ID = 1001 AND Player_ID = 13",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!((minutes, goals, assists), (90, 0, 0));

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.pass, "participation");
}

#[tokio::test]
async fn test_populated_match_is_not_refetched() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/fixtures/lineups",
        &[("fixture", "1001")],
        envelope(vec![lineup_json(50, &[1], &[])]),
        Some(0),
    )
    .await;
    mount_json(
        &server,
        "/fixtures/lineups",
        &[("fixture", "1002")],
        envelope(vec![lineup_json(50, &[1, 2], &[]), lineup_json(40, &[3], &[])]),
        Some(1),
    )
    .await;

    let mut storage = seeded_storage(&[1001, 1002]);
    storage
        .insert_participation(&ParticipationRow {
            match_id: 1001,
            player_id: 1,
            minutes_played: 90,
            goals: 1,
            assists: 0,
        })
        .unwrap();

    let config = config_for(&server);
    let mut orchestrator = Orchestrator::new(&config, storage).unwrap();
    let report = orchestrator.run_participation().await.unwrap();

    assert_eq!(orchestrator.requests_sent(), 1);
    assert_eq!(report.matches_processed, 1);
    assert_eq!(participation_count(orchestrator.storage(), 1001), 1);
    assert_eq!(participation_count(orchestrator.storage(), 1002), 3);
}

#[tokio::test]
async fn test_rerun_resumes_after_failure() {
    let server = MockServer::start().await;

    mount_json(
        &server,
        "/fixtures/lineups",
        &[("fixture", "1001")],
        envelope(vec![lineup_json(50, &[1, 2], &[])]),
        Some(1),
    )
    .await;
    // First attempt for 1002 fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/fixtures/lineups"))
        .and(query_param("fixture", "1002"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "/fixtures/lineups",
        &[("fixture", "1002")],
        envelope(vec![lineup_json(40, &[7], &[8])]),
        Some(1),
    )
    .await;

    let config = config_for(&server);
    let mut orchestrator = Orchestrator::new(&config, seeded_storage(&[1001, 1002])).unwrap();

    let first = orchestrator.run_participation().await.unwrap();
    assert_eq!(first.matches_processed, 1);
    assert_eq!(first.units_skipped, 1);
    assert_eq!(first.failures[0].unit, "lineups match=1002");
    assert_eq!(
        orchestrator.storage().matches_without_participation().unwrap(),
        vec![1002]
    );

    let second = orchestrator.run_participation().await.unwrap();
    assert!(second.is_clean());
    assert_eq!(second.matches_processed, 1);
    assert!(orchestrator
        .storage()
        .matches_without_participation()
        .unwrap()
        .is_empty());
    assert_eq!(orchestrator.requests_sent(), 3);
}

#[tokio::test]
async fn test_empty_lineups_leave_match_pending() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/fixtures/lineups",
        &[("fixture", "1001")],
        envelope(vec![]),
        Some(1),
    )
    .await;

    let config = config_for(&server);
    let mut orchestrator = Orchestrator::new(&config, seeded_storage(&[1001])).unwrap();
    let report = orchestrator.run_participation().await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.units_empty, 1);
    assert_eq!(
        orchestrator.storage().matches_without_participation().unwrap(),
        vec![1001]
    );
}

#[tokio::test]
async fn test_malformed_sheet_entries_are_skipped() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/fixtures/lineups",
        &[("fixture", "1001")],
        envelope(vec![json!({
            "team": {"id": 50, "name": "Man City"},
            "startXI": [
                {"player": {"id": 1, "name": "A"}},
                {"player": {"id": null, "name": "Unregistered"}},
                {"player": {"id": 2, "name": "B"}}
            ],
            "substitutes": [{"player": {"name": "No id"}}]
        })]),
        Some(1),
    )
    .await;

    let config = config_for(&server);
    let mut orchestrator = Orchestrator::new(&config, seeded_storage(&[1001])).unwrap();
    let report = orchestrator.run_participation().await.unwrap();

    assert_eq!(report.participations_inserted, 2);
    assert_eq!(report.records_skipped, 2);
    assert_eq!(participation_count(orchestrator.storage(), 1001), 2);
}
