use serde::Deserialize;

/// Main configuration structure for Touchline
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub pacing: PacingConfig,
    pub store: StoreConfig,
    pub leagues: Vec<LeagueEntry>,
    /// Season start years to ingest (2019 means the 2019/2020 season)
    pub seasons: Vec<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            pacing: PacingConfig::default(),
            store: StoreConfig::default(),
            leagues: default_leagues(),
            seasons: (2019..=2023).collect(),
        }
    }
}

impl Config {
    /// Looks up the configured display name for a league id
    pub fn league_name(&self, league_id: i64) -> Option<&str> {
        self.leagues
            .iter()
            .find(|entry| entry.id == league_id)
            .map(|entry| entry.name.as_str())
    }
}

/// Provider connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the endpoint paths are appended to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Value sent in the `X-RapidAPI-Host` header
    pub host: String,

    /// Value sent in the `X-RapidAPI-Key` header
    pub key: String,

    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Minimum time between two outbound requests (milliseconds)
    #[serde(rename = "min-request-interval-ms")]
    pub min_request_interval_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-football-v1.p.rapidapi.com/v3".to_string(),
            host: "api-football-v1.p.rapidapi.com".to_string(),
            key: String::new(),
            request_timeout_secs: 30,
            min_request_interval_ms: 150,
        }
    }
}

/// Fixed sleeps between units of work, on top of the client's own pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    #[serde(rename = "player-delay-ms")]
    pub player_delay_ms: u64,

    #[serde(rename = "fixture-delay-ms")]
    pub fixture_delay_ms: u64,

    #[serde(rename = "match-delay-ms")]
    pub match_delay_ms: u64,

    #[serde(rename = "season-delay-ms")]
    pub season_delay_ms: u64,

    /// Hard cap on pages requested for one paginated collection
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            player_delay_ms: 100,
            fixture_delay_ms: 200,
            match_delay_ms: 200,
            season_delay_ms: 1000,
            max_pages: 100,
        }
    }
}

impl PacingConfig {
    /// Pacing with every sleep disabled
    pub fn none() -> Self {
        Self {
            player_delay_ms: 0,
            fixture_delay_ms: 0,
            match_delay_ms: 0,
            season_delay_ms: 0,
            ..Self::default()
        }
    }
}

/// Relational store location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: "soccer_management.db".to_string(),
        }
    }
}

/// A league in ingestion scope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeagueEntry {
    pub name: String,
    pub id: i64,
}

impl LeagueEntry {
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// The top five European leagues
fn default_leagues() -> Vec<LeagueEntry> {
    vec![
        LeagueEntry::new("Premier League", 39),
        LeagueEntry::new("La Liga", 140),
        LeagueEntry::new("Serie A", 135),
        LeagueEntry::new("Bundesliga", 78),
        LeagueEntry::new("Ligue 1", 61),
    ]
}
