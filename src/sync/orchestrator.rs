//! Catalog pass: leagues, seasons, fixtures, teams and players
//!
//! For each configured league and season year the pass fetches the fixtures,
//! then the teams, then the players of every team. A unit that fails is
//! logged and recorded in the report; the loop moves on to the next unit.
//! Re-running the pass is the retry mechanism.

use crate::api::{ApiClient, Paginator, FIXTURES_ENDPOINT, PLAYERS_ENDPOINT, TEAMS_ENDPOINT};
use crate::config::{compute_scope_hash, Config, LeagueEntry};
use crate::reconcile::Reconciler;
use crate::storage::{RunStatus, Storage};
use crate::sync::report::SyncReport;
use crate::SyncError;
use serde_json::Value;
use std::time::Duration;

/// Name recorded in the run ledger for the catalog pass
pub const CATALOG_PASS: &str = "catalog";

/// Drives both ingestion passes against one store
///
/// Owns the store handle and the paced API client for the whole run.
pub struct Orchestrator<'a, S: Storage> {
    pub(super) config: &'a Config,
    pub(super) storage: S,
    pub(super) client: ApiClient,
}

impl<'a, S: Storage> Orchestrator<'a, S> {
    /// Creates an orchestrator; no request is sent until a pass runs
    pub fn new(config: &'a Config, storage: S) -> Result<Self, SyncError> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self {
            config,
            storage,
            client,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Requests sent so far by this orchestrator
    pub fn requests_sent(&self) -> u64 {
        self.client.requests_sent()
    }

    /// Runs the catalog pass then the participation pass
    pub async fn run_all(&mut self) -> Result<SyncReport, SyncError> {
        let mut report = self.run_catalog().await?;
        report.merge(self.run_participation().await?);
        Ok(report)
    }

    /// Runs the catalog pass over every configured league and season
    pub async fn run_catalog(&mut self) -> Result<SyncReport, SyncError> {
        let config = self.config;
        let run_id = self
            .storage
            .create_run(CATALOG_PASS, &compute_scope_hash(config))?;
        tracing::info!(
            "Starting catalog run {}: {} leagues x {} seasons",
            run_id,
            config.leagues.len(),
            config.seasons.len()
        );

        let mut report = SyncReport::default();

        for league in &config.leagues {
            for &season in &config.seasons {
                self.sync_league_season(league, season, &mut report).await;
                pause(config.pacing.season_delay_ms).await;
            }
        }

        self.storage.finish_run(
            run_id,
            RunStatus::Completed,
            report.units_ok,
            report.units_skipped,
        )?;
        tracing::info!(
            "Catalog run {} finished: {} units ok, {} skipped, {} requests",
            run_id,
            report.units_ok,
            report.units_skipped,
            self.client.requests_sent()
        );

        Ok(report)
    }

    async fn sync_league_season(
        &mut self,
        league: &LeagueEntry,
        season: i32,
        report: &mut SyncReport,
    ) {
        tracing::info!("Syncing {} ({}) season {}", league.name, league.id, season);

        let season_id = match self.register_league_season(league, season, report) {
            Ok(season_id) => season_id,
            Err(e) => {
                report.unit_skipped(format!("league={} season={}", league.id, season), &e);
                return;
            }
        };

        self.sync_fixtures(league.id, season, season_id, report).await;

        let team_ids = self.sync_teams(league.id, season, report).await;
        for team_id in team_ids {
            self.sync_players(team_id, season, season_id, report).await;
        }
    }

    fn register_league_season(
        &mut self,
        league: &LeagueEntry,
        season: i32,
        report: &mut SyncReport,
    ) -> Result<i64, SyncError> {
        let name = league_display_name(self.config, league.id);
        let mut reconciler = Reconciler::new(&mut self.storage);
        if reconciler.upsert_league(league.id, &name)?.inserted() {
            tracing::info!("Inserted league {} ({})", name, league.id);
            report.leagues_inserted += 1;
        }
        let season_id = reconciler.upsert_season(season, season.saturating_add(1))?;
        report.seasons_seen += 1;
        Ok(season_id)
    }

    async fn sync_fixtures(
        &mut self,
        league_id: i64,
        season: i32,
        season_id: i64,
        report: &mut SyncReport,
    ) {
        let unit = format!("fixtures league={} season={}", league_id, season);
        let params = [("league", league_id.to_string()), ("season", season.to_string())];

        let records = match self.fetch_single(FIXTURES_ENDPOINT, &params).await {
            Ok(records) => records,
            Err(e) => return report.unit_skipped(unit, &e),
        };
        if records.is_empty() {
            tracing::info!("No fixtures for league {} season {}", league_id, season);
            report.units_empty += 1;
            return;
        }

        let delay = self.config.pacing.fixture_delay_ms;
        for raw in &records {
            let result =
                Reconciler::new(&mut self.storage).ingest_fixture(raw, season_id, league_id);
            match result {
                Ok(outcome) if outcome.inserted() => report.matches_inserted += 1,
                Ok(_) => {}
                Err(e) => record_skipped(report, "fixture", &e),
            }
            pause(delay).await;
        }

        tracing::info!(
            "Processed {} fixtures for league {} season {}",
            records.len(),
            league_id,
            season
        );
        report.unit_ok();
    }

    async fn sync_teams(
        &mut self,
        league_id: i64,
        season: i32,
        report: &mut SyncReport,
    ) -> Vec<i64> {
        let unit = format!("teams league={} season={}", league_id, season);
        let params = [("league", league_id.to_string()), ("season", season.to_string())];

        let records = match self.fetch_single(TEAMS_ENDPOINT, &params).await {
            Ok(records) => records,
            Err(e) => {
                report.unit_skipped(unit, &e);
                return Vec::new();
            }
        };
        if records.is_empty() {
            tracing::info!("No teams for league {} season {}", league_id, season);
            report.units_empty += 1;
            return Vec::new();
        }

        let mut team_ids = Vec::with_capacity(records.len());
        let mut reconciler = Reconciler::new(&mut self.storage);
        for raw in &records {
            match reconciler.ingest_team(raw, league_id) {
                Ok((team_id, outcome)) => {
                    if outcome.inserted() {
                        report.teams_inserted += 1;
                    }
                    if !team_ids.contains(&team_id) {
                        team_ids.push(team_id);
                    }
                }
                Err(e) => record_skipped(report, "team", &e),
            }
        }

        tracing::info!(
            "Processed {} teams for league {} season {}",
            team_ids.len(),
            league_id,
            season
        );
        report.unit_ok();
        team_ids
    }

    async fn sync_players(
        &mut self,
        team_id: i64,
        season: i32,
        season_id: i64,
        report: &mut SyncReport,
    ) {
        let unit = format!("players team={} season={}", team_id, season);
        let params = [("team", team_id.to_string()), ("season", season.to_string())];

        let collection = {
            let mut paginator = Paginator::new(&mut self.client, self.config.pacing.max_pages);
            match paginator.collect_all(PLAYERS_ENDPOINT, &params).await {
                Ok(collection) => collection,
                Err(e) => return report.unit_skipped(unit, &e),
            }
        };

        if !collection.complete {
            report.truncated_collections += 1;
        }
        if collection.records.is_empty() {
            tracing::info!("No players for team {} season {}", team_id, season);
            report.units_empty += 1;
            return;
        }

        let delay = self.config.pacing.player_delay_ms;
        for raw in &collection.records {
            match Reconciler::new(&mut self.storage).ingest_player(raw, season_id) {
                Ok(write) => {
                    if write.player_inserted {
                        report.players_inserted += 1;
                    }
                    report.links_inserted += write.links_inserted as u64;
                }
                Err(e) => record_skipped(report, "player", &e),
            }
            pause(delay).await;
        }

        tracing::debug!(
            "Processed {} players for team {} season {} over {} pages",
            collection.records.len(),
            team_id,
            season,
            collection.pages_requested
        );
        report.unit_ok();
    }

    /// Fetches a single-request endpoint and returns its `response` array
    ///
    /// A non-2xx status or errors reported inside a 2xx body fail the
    /// call; only a clean answer can be an empty result.
    pub(super) async fn fetch_single(
        &mut self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Value>, SyncError> {
        let response = self
            .client
            .fetch(endpoint, params)
            .await?
            .into_checked(endpoint)?;
        Ok(response.into_records())
    }
}

/// Display name of a league, falling back to `League_<id>`
pub fn league_display_name(config: &Config, league_id: i64) -> String {
    config
        .league_name(league_id)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("League_{}", league_id))
}

pub(super) fn record_skipped(report: &mut SyncReport, what: &str, error: &SyncError) {
    tracing::warn!("Skipping {} record: {}", what, error);
    report.records_skipped += 1;
}

pub(super) async fn pause(millis: u64) {
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}
