use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use spade_api::{ReservationError, ReservationOrchestrator, SpadeApiErrorKind, trim_cid};
use spade_observability as observability;
use tokio_util::sync::CancellationToken;

use crate::periodic_tasks::{ReservationConfig, ReserveDealsDeps, runner::run_with_shutdown};

pub(crate) struct ReserveDealsTask {
    orchestrator: Arc<ReservationOrchestrator>,
    config: ReservationConfig,
}

impl ReserveDealsTask {
    pub(crate) fn new(deps: ReserveDealsDeps, config: ReservationConfig) -> Self {
        Self {
            orchestrator: deps.orchestrator,
            config,
        }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown("reserve_deals", shutdown, || self.execute()).await;
    }

    #[tracing::instrument(name = "periodic_tasks.reserve_deals", skip(self))]
    pub(super) async fn execute(&self) -> Duration {
        let interval = Duration::from_secs(self.config.interval_secs);

        if !self.config.enabled {
            tracing::debug!("Deal reservation disabled by configuration");
            return interval;
        }

        let started = Instant::now();
        let status = match self.orchestrator.reserve_next().await {
            Ok(Some(piece_cid)) => {
                tracing::info!(piece_cid = %trim_cid(&piece_cid), "Reserved piece");
                "reserved"
            }
            Ok(None) => "idle",
            Err(ReservationError::NoUntriedPiece { eligible }) => {
                tracing::info!(eligible, "No eligible pieces are valid to be requested");
                "exhausted"
            }
            Err(error) => {
                let unauthorized = error.api_error().map(|e| e.kind())
                    == Some(SpadeApiErrorKind::Unauthorized);
                if unauthorized {
                    tracing::error!(error = %error, "Deal engine refused our credential");
                } else {
                    tracing::warn!(error = %error, "Reservation attempt failed");
                }
                "error"
            }
        };
        observability::record_task_run("reserve_deals", status, started.elapsed());

        interval
    }
}
