//! Shared fixtures for the integration tests
//!
//! Builds configs that point at a wiremock server and canned provider
//! payloads in the shape the football API returns.

#![allow(dead_code)]

use serde_json::{json, Value};
use touchline::config::{ApiConfig, Config, LeagueEntry, PacingConfig, StoreConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a config aimed at `base_url` with no pacing delays
pub fn create_test_config(
    base_url: &str,
    leagues: Vec<LeagueEntry>,
    seasons: Vec<i32>,
    db_path: &str,
) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            host: "api-football-v1.p.rapidapi.com".to_string(),
            key: "test-key".to_string(),
            request_timeout_secs: 5,
            min_request_interval_ms: 0,
        },
        pacing: PacingConfig::none(),
        store: StoreConfig {
            database_path: db_path.to_string(),
        },
        leagues,
        seasons,
    }
}

/// Wraps records in the provider envelope
pub fn envelope(records: Vec<Value>) -> Value {
    json!({
        "get": "test",
        "errors": [],
        "results": records.len(),
        "response": records,
    })
}

/// Wraps records in the provider envelope with paging metadata
pub fn page(records: Vec<Value>, current: u32, total: u32) -> Value {
    let mut body = envelope(records);
    body["paging"] = json!({"current": current, "total": total});
    body
}

pub fn team_json(id: i64, name: &str) -> Value {
    json!({
        "team": {"id": id, "name": name, "country": "England"},
        "venue": {"id": id * 10, "name": "Stadium"}
    })
}

/// A `/players` record with one statistics entry per team
pub fn player_json(id: i64, name: &str, position: &str, team_ids: &[i64]) -> Value {
    let statistics: Vec<Value> = team_ids
        .iter()
        .map(|team_id| {
            json!({
                "team": {"id": team_id, "name": format!("Team {}", team_id)},
                "games": {"appearences": 10, "position": position}
            })
        })
        .collect();
    json!({
        "player": {"id": id, "name": name, "age": 25},
        "statistics": statistics
    })
}

pub fn fixture_json(id: i64, home: i64, away: i64, goals: Option<(i64, i64)>) -> Value {
    let goals = match goals {
        Some((home, away)) => json!({"home": home, "away": away}),
        None => json!({"home": null, "away": null}),
    };
    json!({
        "fixture": {"id": id, "date": "2019-08-10T14:00:00+00:00", "referee": null},
        "teams": {
            "home": {"id": home, "name": format!("Team {}", home)},
            "away": {"id": away, "name": format!("Team {}", away)}
        },
        "goals": goals
    })
}

/// One team sheet with the given starters and substitutes
pub fn lineup_json(team_id: i64, starters: &[i64], substitutes: &[i64]) -> Value {
    let slots = |ids: &[i64]| -> Vec<Value> {
        ids.iter()
            .map(|id| json!({"player": {"id": id, "name": format!("Player {}", id)}}))
            .collect()
    };
    json!({
        "team": {"id": team_id, "name": format!("Team {}", team_id)},
        "formation": "4-3-3",
        "startXI": slots(starters),
        "substitutes": slots(substitutes)
    })
}

/// Mounts a 200 JSON response for `endpoint` with the given query
pub async fn mount_json(
    server: &MockServer,
    endpoint: &str,
    query: &[(&str, &str)],
    body: Value,
    expected_calls: Option<u64>,
) {
    let mut mock = Mock::given(method("GET")).and(path(endpoint));
    for (name, value) in query {
        mock = mock.and(query_param(*name, *value));
    }
    let mut mock = mock.respond_with(ResponseTemplate::new(200).set_body_json(body));
    if let Some(calls) = expected_calls {
        mock = mock.expect(calls);
    }
    mock.mount(server).await;
}

/// Mounts an error status for `endpoint` with the given query
pub async fn mount_status(server: &MockServer, endpoint: &str, query: &[(&str, &str)], status: u16) {
    let mut mock = Mock::given(method("GET")).and(path(endpoint));
    for (name, value) in query {
        mock = mock.and(query_param(*name, *value));
    }
    mock.respond_with(ResponseTemplate::new(status).set_body_string("upstream failure"))
        .mount(server)
        .await;
}
