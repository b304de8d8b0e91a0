//! API module for the football data provider
//!
//! This module contains everything that talks to the provider:
//! - The paced HTTP client and its transport error taxonomy
//! - The paginator for multi-page collection endpoints
//! - Typed shapes of the raw records

mod client;
mod pacer;
mod paginator;
pub mod records;

pub use client::{
    build_http_client, ApiClient, ApiResponse, Paging, TransportError, HOST_HEADER, KEY_HEADER,
};
pub use pacer::Pacer;
pub use paginator::{PageCollection, Paginator};

/// Endpoint listing the teams of a league season
pub const TEAMS_ENDPOINT: &str = "/teams";
/// Paginated endpoint listing the players of a team season
pub const PLAYERS_ENDPOINT: &str = "/players";
/// Endpoint listing the fixtures of a league season
pub const FIXTURES_ENDPOINT: &str = "/fixtures";
/// Endpoint listing both team sheets of a fixture
pub const LINEUPS_ENDPOINT: &str = "/fixtures/lineups";
