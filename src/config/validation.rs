use crate::config::types::{ApiConfig, Config, LeagueEntry, PacingConfig, StoreConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_pacing_config(&config.pacing)?;
    validate_store_config(&config.store)?;
    validate_leagues(&config.leagues)?;
    validate_seasons(&config.seasons)?;
    Ok(())
}

/// Validates provider connection settings
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.key.trim().is_empty() {
        return Err(ConfigError::MissingSetting(
            "API key (RAPIDAPI_KEY or [api] key)".to_string(),
        ));
    }

    if config.host.trim().is_empty() {
        return Err(ConfigError::MissingSetting(
            "API host (RAPIDAPI_HOST or [api] host)".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.min_request_interval_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "min-request-interval-ms must be <= 60000, got {}",
            config.min_request_interval_ms
        )));
    }

    Ok(())
}

fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::MissingSetting(
            "database path (DB_FILE or [store] database-path)".to_string(),
        ));
    }
    Ok(())
}

/// Validates the league scope: non-empty, unique ids, named
fn validate_leagues(leagues: &[LeagueEntry]) -> Result<(), ConfigError> {
    if leagues.is_empty() {
        return Err(ConfigError::Validation(
            "at least one league must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for league in leagues {
        if league.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "league {} has an empty name",
                league.id
            )));
        }

        if league.id <= 0 {
            return Err(ConfigError::Validation(format!(
                "league '{}' has invalid id {}",
                league.name, league.id
            )));
        }

        if !seen.insert(league.id) {
            return Err(ConfigError::Validation(format!(
                "league id {} is configured more than once",
                league.id
            )));
        }
    }

    Ok(())
}

fn validate_seasons(seasons: &[i32]) -> Result<(), ConfigError> {
    if seasons.is_empty() {
        return Err(ConfigError::Validation(
            "at least one season must be configured".to_string(),
        ));
    }

    for &year in seasons {
        if !(1900..=2100).contains(&year) {
            return Err(ConfigError::Validation(format!(
                "season start year {} is out of range",
                year
            )));
        }
    }

    Ok(())
}
