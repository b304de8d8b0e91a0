//! Touchline: football competition data ingestion
//!
//! This crate pulls leagues, seasons, teams, players, fixtures and lineups from a
//! paginated, rate-limited football data API and reconciles them into a
//! normalized SQLite store using idempotent, first-write-wins upserts.

pub mod api;
pub mod config;
pub mod output;
pub mod reconcile;
pub mod storage;
pub mod sync;

use thiserror::Error;

/// Main error type for Touchline operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] api::TransportError),

    #[error("API returned status {status} for {endpoint}")]
    Api { endpoint: String, status: u16 },

    #[error("API reported errors for {endpoint}: {errors}")]
    Provider { endpoint: String, errors: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Data integrity gap: {0}")]
    IntegrityGap(String),
}

impl SyncError {
    /// Short label used when reporting skipped units
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Transport(_) => "transport",
            Self::Api { .. } => "api",
            Self::Provider { .. } => "provider",
            Self::Storage(_) | Self::Database(_) => "storage",
            Self::IntegrityGap(_) => "integrity",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

/// Result type alias for Touchline operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use storage::{SqliteStorage, Storage};
pub use sync::{Orchestrator, SyncReport};
