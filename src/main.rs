//! Touchline main entry point
//!
//! This is the command-line interface for the Touchline ingestion pipeline.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use touchline::config::{compute_scope_hash, load_config, Config};
use touchline::output::{load_statistics, print_statistics, run_duration_seconds};
use touchline::storage::{open_storage, Storage};
use touchline::sync::{league_display_name, Orchestrator};
use tracing_subscriber::EnvFilter;

/// Touchline: football competition data ingestion
///
/// Pulls leagues, seasons, teams, players, fixtures and lineups from the
/// football data API into a normalized SQLite store. Every write is an
/// idempotent upsert, so re-running is always safe and resumes where a
/// previous run stopped.
#[derive(Parser, Debug)]
#[command(name = "touchline")]
#[command(version)]
#[command(about = "Football competition data ingestion", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run only the catalog pass (fixtures, teams, players)
    #[arg(long, conflicts_with_all = ["participation_only", "stats", "dry_run"])]
    catalog_only: bool,

    /// Run only the participation pass (lineups of matches not yet covered)
    #[arg(long, conflicts_with_all = ["catalog_only", "stats", "dry_run"])]
    participation_only: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run"])]
    stats: bool,

    /// Validate config and show the ingestion scope without any requests
    #[arg(long, conflicts_with_all = ["stats"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults and environment"),
    }
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::info!(
        "Configuration loaded (scope: {})",
        compute_scope_hash(&config)
    );

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }
    if cli.stats {
        return handle_stats(&config);
    }

    handle_sync(&config, cli.catalog_only, cli.participation_only).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("touchline=info,warn"),
            1 => EnvFilter::new("touchline=debug,info"),
            2 => EnvFilter::new("touchline=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be ingested
fn handle_dry_run(config: &Config) {
    println!("=== Touchline Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Host: {}", config.api.host);
    println!("  Request timeout: {}s", config.api.request_timeout_secs);
    println!(
        "  Minimum request interval: {}ms",
        config.api.min_request_interval_ms
    );

    println!("\nPacing:");
    println!("  Per player: {}ms", config.pacing.player_delay_ms);
    println!("  Per fixture: {}ms", config.pacing.fixture_delay_ms);
    println!("  Per match: {}ms", config.pacing.match_delay_ms);
    println!("  Per season: {}ms", config.pacing.season_delay_ms);
    println!("  Max pages per collection: {}", config.pacing.max_pages);

    println!("\nStore:");
    println!("  Database: {}", config.store.database_path);

    println!("\nLeagues ({}):", config.leagues.len());
    for league in &config.leagues {
        println!("  - {} ({})", league_display_name(config, league.id), league.id);
    }

    let seasons: Vec<String> = config
        .seasons
        .iter()
        .map(|year| format!("{}/{}", year, year + 1))
        .collect();
    println!("\nSeasons ({}): {}", seasons.len(), seasons.join(", "));

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would sync {} league seasons",
        config.leagues.len() * config.seasons.len()
    );
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.store.database_path);

    let storage = open_storage(Path::new(&config.store.database_path))
        .with_context(|| format!("failed to open store {}", config.store.database_path))?;
    let stats = load_statistics(&storage).context("failed to read store statistics")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the sync passes
async fn handle_sync(
    config: &Config,
    catalog_only: bool,
    participation_only: bool,
) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.store.database_path))
        .with_context(|| format!("failed to open store {}", config.store.database_path))?;
    tracing::info!("Store opened: {}", config.store.database_path);

    let mut orchestrator =
        Orchestrator::new(config, storage).context("failed to build the API client")?;

    let report = if catalog_only {
        orchestrator.run_catalog().await
    } else if participation_only {
        orchestrator.run_participation().await
    } else {
        orchestrator.run_all().await
    }
    .context("sync run aborted")?;

    if let Some(run) = orchestrator.storage().get_latest_run()? {
        if let Some(seconds) = run_duration_seconds(&run) {
            tracing::info!("Last pass ({}) took {}s", run.pass, seconds);
        }
    }
    tracing::info!("Requests sent: {}", orchestrator.requests_sent());

    println!("{}", report);
    if !report.is_clean() {
        tracing::warn!(
            "{} units were skipped; re-run to retry them",
            report.units_skipped
        );
    }

    Ok(())
}
