use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable holding the SQLite database path
pub const ENV_DB_FILE: &str = "DB_FILE";
/// Environment variable holding the provider API key
pub const ENV_API_KEY: &str = "RAPIDAPI_KEY";
/// Environment variable holding the provider API host
pub const ENV_API_HOST: &str = "RAPIDAPI_HOST";
/// Environment variable overriding the provider base URL
pub const ENV_API_BASE_URL: &str = "RAPIDAPI_BASE_URL";

/// Builds the effective configuration
///
/// Layers are applied in order: in-code defaults, the optional TOML file,
/// then the process environment (a `.env` file in the working directory is
/// loaded first when present). The result is validated before it is returned.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use touchline::config::load_config;
///
/// let config = load_config(Some(Path::new("touchline.toml"))).unwrap();
/// println!("Leagues in scope: {}", config.leagues.len());
/// ```
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let _ = dotenv::dotenv();

    let mut config = match path {
        Some(path) => parse_config_file(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    validate(&config)?;

    Ok(config)
}

/// Reads and parses a TOML configuration file without validating it
pub fn parse_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Overlays environment-provided settings onto `config`
///
/// `lookup` resolves a variable name to its value; empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(path) = get(ENV_DB_FILE) {
        config.store.database_path = path;
    }
    if let Some(key) = get(ENV_API_KEY) {
        config.api.key = key;
    }
    if let Some(host) = get(ENV_API_HOST) {
        config.api.host = host;
    }
    if let Some(base_url) = get(ENV_API_BASE_URL) {
        config.api.base_url = base_url;
    }
}

/// Computes a SHA-256 fingerprint of the ingestion scope
///
/// Covers the base URL, leagues and seasons. Secrets and pacing are left out
/// so that rotating a key does not change the fingerprint.
pub fn compute_scope_hash(config: &Config) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config.api.base_url.as_bytes());
    for league in &config.leagues {
        hasher.update(format!("|league:{}={}", league.id, league.name).as_bytes());
    }
    for season in &config.seasons {
        hasher.update(format!("|season:{}", season).as_bytes());
    }
    hex::encode(hasher.finalize())
}
