//! Raw record shapes returned by the provider
//!
//! Only the fields the pipeline reads are declared; everything else in the
//! payload is ignored. Fields the provider is known to send as `null` are
//! optional so that a sparse record still decodes and the reconciler can
//! decide what is missing.

use serde::Deserialize;

/// One element of the `/teams` response
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRecord {
    pub team: TeamInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfo {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// One element of the `/players` response
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    pub player: PlayerInfo,
    #[serde(default)]
    pub statistics: Option<Vec<PlayerStatistics>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerInfo {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Per-team statistics block; a player has one per team played for
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerStatistics {
    #[serde(default)]
    pub team: Option<TeamInfo>,
    #[serde(default)]
    pub games: Option<GamesInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GamesInfo {
    #[serde(default)]
    pub position: Option<String>,
}

/// One element of the `/fixtures` response
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRecord {
    pub fixture: FixtureInfo,
    pub teams: FixtureTeams,
    #[serde(default)]
    pub goals: Option<Goals>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureInfo {
    pub id: Option<i64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureTeams {
    pub home: TeamInfo,
    pub away: TeamInfo,
}

/// Final score; both sides are null for fixtures not yet played
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Goals {
    pub home: Option<i64>,
    pub away: Option<i64>,
}

/// One team's sheet in the `/fixtures/lineups` response
#[derive(Debug, Clone, Deserialize)]
pub struct LineupRecord {
    #[serde(default)]
    pub team: Option<TeamInfo>,
    #[serde(rename = "startXI", default)]
    pub start_xi: Option<Vec<LineupSlot>>,
    #[serde(default)]
    pub substitutes: Option<Vec<LineupSlot>>,
}

impl LineupRecord {
    /// Starters followed by substitutes
    pub fn slots(&self) -> impl Iterator<Item = &LineupSlot> {
        self.start_xi
            .iter()
            .flatten()
            .chain(self.substitutes.iter().flatten())
    }

    /// Team name for log messages
    pub fn team_label(&self) -> String {
        match &self.team {
            Some(TeamInfo {
                name: Some(name), ..
            }) => name.clone(),
            Some(TeamInfo { id: Some(id), .. }) => format!("team {}", id),
            _ => "unknown team".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupSlot {
    #[serde(default)]
    pub player: Option<LineupPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupPlayer {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}
