use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use spade_api::{SpadeApi, trim_cid};
use spade_observability as observability;
use tokio_util::sync::CancellationToken;

use crate::periodic_tasks::{PendingProposalsDeps, runner::run_with_shutdown};

/// Logs what the deal engine has proposed to this provider and recent
/// proposal failures.
pub(crate) struct PendingProposalsTask {
    spade_api: Arc<dyn SpadeApi>,
    interval: Duration,
}

impl PendingProposalsTask {
    pub(crate) fn new(deps: PendingProposalsDeps, interval: Duration) -> Self {
        Self {
            spade_api: deps.spade_api,
            interval,
        }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown("pending_proposals", shutdown, || self.execute()).await;
    }

    #[tracing::instrument(name = "periodic_tasks.pending_proposals", skip(self))]
    pub(super) async fn execute(&self) -> Duration {
        let started = Instant::now();

        let status = match self.spade_api.list_pending().await {
            Ok(envelope) => {
                let report = envelope.response;
                observability::record_pending_proposals(
                    report.pending_proposals.len(),
                    report.recent_failures.len(),
                );
                tracing::info!(
                    pending = report.pending_proposals.len(),
                    recent_failures = report.recent_failures.len(),
                    "Pending deal proposals"
                );
                for proposal in &report.pending_proposals {
                    tracing::debug!(
                        proposal_id = %proposal.proposal_id,
                        piece_cid = %trim_cid(&proposal.piece_cid),
                        hours_remaining = proposal.hours_remaining,
                        start_epoch = proposal.start_epoch,
                        "Pending proposal"
                    );
                }
                for failure in &report.recent_failures {
                    tracing::warn!(
                        proposal_id = %failure.proposal_id,
                        piece_cid = %trim_cid(&failure.piece_cid),
                        at = %failure.error_timestamp,
                        error = %failure.error,
                        "Recent proposal failure"
                    );
                }
                "ok"
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to list pending proposals");
                "error"
            }
        };
        observability::record_task_run("pending_proposals", status, started.elapsed());

        self.interval
    }
}
