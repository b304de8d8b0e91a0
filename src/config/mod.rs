//! Configuration module for Touchline
//!
//! This module builds the single `Config` value used for a process: in-code
//! defaults, an optional TOML file and environment overrides, validated once
//! at startup.
//!
//! # Example
//!
//! ```no_run
//! use touchline::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Store: {}", config.store.database_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, LeagueEntry, PacingConfig, StoreConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_scope_hash, load_config, parse_config_file, ENV_API_BASE_URL,
    ENV_API_HOST, ENV_API_KEY, ENV_DB_FILE,
};
pub use validation::validate;
