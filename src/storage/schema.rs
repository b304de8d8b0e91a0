//! Database schema definitions
//!
//! Table and column names match the store the query frontend reads, so an
//! existing database is accepted unchanged.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS League (
    League_ID INTEGER PRIMARY KEY,
    League_Name TEXT NOT NULL CHECK (length(League_Name) > 0)
);

CREATE TABLE IF NOT EXISTS Season (
    Season_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    Year_Start INTEGER NOT NULL,
    Year_End INTEGER NOT NULL,
    UNIQUE(Year_Start, Year_End)
);

CREATE TABLE IF NOT EXISTS Team (
    Team_ID INTEGER PRIMARY KEY,
    Team_Name TEXT NOT NULL,
    Coach TEXT,
    League_ID INTEGER NOT NULL REFERENCES League(League_ID)
);

CREATE TABLE IF NOT EXISTS Player (
    Player_ID INTEGER PRIMARY KEY,
    Player_Name TEXT NOT NULL,
    Position TEXT
);

-- Team ids are not constrained: fixtures reference clubs outside the ingested leagues
CREATE TABLE IF NOT EXISTS Match (
    Match_ID INTEGER PRIMARY KEY,
    Home_Team_ID INTEGER NOT NULL,
    Away_Team_ID INTEGER NOT NULL,
    Date TEXT NOT NULL,
    Home_Score INTEGER,
    Away_Score INTEGER,
    Season_ID INTEGER NOT NULL REFERENCES Season(Season_ID),
    League_ID INTEGER NOT NULL REFERENCES League(League_ID),
    CHECK (Home_Team_ID <> Away_Team_ID)
);

CREATE INDEX IF NOT EXISTS idx_match_season ON Match(Season_ID);
CREATE INDEX IF NOT EXISTS idx_match_league ON Match(League_ID);

CREATE TABLE IF NOT EXISTS Team_Player_Season (
    Team_Player_Season_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    Team_ID INTEGER NOT NULL,
    Player_ID INTEGER NOT NULL REFERENCES Player(Player_ID),
    Season_ID INTEGER NOT NULL REFERENCES Season(Season_ID),
    UNIQUE(Team_ID, Player_ID, Season_ID)
);

CREATE INDEX IF NOT EXISTS idx_tps_team_season ON Team_Player_Season(Team_ID, Season_ID);

CREATE TABLE IF NOT EXISTS Player_Match_Participation (
    Player_Match_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    Match_ID INTEGER NOT NULL REFERENCES Match(Match_ID),
    Player_ID INTEGER NOT NULL,
    Minutes_Played INTEGER NOT NULL DEFAULT 90,
    Goals INTEGER NOT NULL DEFAULT 0,
    Assists INTEGER NOT NULL DEFAULT 0,
    UNIQUE(Match_ID, Player_ID)
);

CREATE INDEX IF NOT EXISTS idx_pmp_match ON Player_Match_Participation(Match_ID);

-- Audit trail of pipeline invocations
CREATE TABLE IF NOT EXISTS sync_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pass TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    units_ok INTEGER NOT NULL DEFAULT 0,
    units_skipped INTEGER NOT NULL DEFAULT 0
);
"#;

/// The seven entity tables, referenced tables first
pub const ENTITY_TABLES: [&str; 7] = [
    "League",
    "Season",
    "Team",
    "Player",
    "Match",
    "Team_Player_Season",
    "Player_Match_Participation",
];

/// Initializes the database schema
///
/// Every statement is `IF NOT EXISTS`, so running this against an existing
/// store is a no-op.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
