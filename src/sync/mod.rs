//! Ingestion orchestration
//!
//! Two independent passes share one [`Orchestrator`]:
//! - the catalog pass (leagues, seasons, fixtures, teams, players)
//! - the participation pass (lineups for matches not yet covered)

mod orchestrator;
mod participation;
mod report;

pub use orchestrator::{league_display_name, Orchestrator, CATALOG_PASS};
pub use participation::PARTICIPATION_PASS;
pub use report::{SyncReport, UnitFailure};
