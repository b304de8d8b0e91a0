//! Participation pass
//!
//! Selects every stored match without a participation row and records the
//! players listed on its team sheets. The selection is re-evaluated on every
//! run, so an interrupted pass resumes at match granularity.

use crate::api::LINEUPS_ENDPOINT;
use crate::config::compute_scope_hash;
use crate::reconcile::Reconciler;
use crate::storage::{RunStatus, Storage};
use crate::sync::orchestrator::{pause, Orchestrator};
use crate::sync::report::SyncReport;
use crate::SyncError;

/// Name recorded in the run ledger for the participation pass
pub const PARTICIPATION_PASS: &str = "participation";

impl<'a, S: Storage> Orchestrator<'a, S> {
    /// Runs the participation pass over every match still missing lineups
    pub async fn run_participation(&mut self) -> Result<SyncReport, SyncError> {
        let run_id = self
            .storage
            .create_run(PARTICIPATION_PASS, &compute_scope_hash(self.config))?;

        let pending = match self.storage.matches_without_participation() {
            Ok(pending) => pending,
            Err(e) => {
                self.storage.finish_run(run_id, RunStatus::Failed, 0, 0)?;
                return Err(e.into());
            }
        };
        tracing::info!(
            "Starting participation run {}: {} matches without lineups",
            run_id,
            pending.len()
        );

        let mut report = SyncReport::default();
        let delay = self.config.pacing.match_delay_ms;

        for (index, match_id) in pending.iter().copied().enumerate() {
            self.sync_lineups(match_id, &mut report).await;
            pause(delay).await;

            if (index + 1) % 50 == 0 {
                tracing::info!(
                    "Progress: {}/{} matches, {} participations recorded",
                    index + 1,
                    pending.len(),
                    report.participations_inserted
                );
            }
        }

        self.storage.finish_run(
            run_id,
            RunStatus::Completed,
            report.units_ok,
            report.units_skipped,
        )?;
        tracing::info!(
            "Participation run {} finished: {} matches processed, {} skipped, {} empty",
            run_id,
            report.matches_processed,
            report.units_skipped,
            report.units_empty
        );

        Ok(report)
    }

    async fn sync_lineups(&mut self, match_id: i64, report: &mut SyncReport) {
        let unit = format!("lineups match={}", match_id);
        let params = [("fixture", match_id.to_string())];

        let records = match self.fetch_single(LINEUPS_ENDPOINT, &params).await {
            Ok(records) => records,
            Err(e) => return report.unit_skipped(unit, &e),
        };
        if records.is_empty() {
            tracing::warn!("No lineup data for match {}", match_id);
            report.units_empty += 1;
            return;
        }

        match Reconciler::new(&mut self.storage).ingest_lineups(match_id, &records) {
            Ok(outcome) => {
                tracing::debug!(
                    "Match {}: {} listed, {} recorded, {} skipped",
                    match_id,
                    outcome.listed,
                    outcome.inserted,
                    outcome.skipped
                );
                report.participations_inserted += outcome.inserted as u64;
                report.records_skipped += outcome.skipped as u64;
                report.matches_processed += 1;
                report.unit_ok();
            }
            Err(e) => report.unit_skipped(unit, &e),
        }
    }
}
