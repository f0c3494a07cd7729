mod config;
mod deps;
mod runner;
pub(crate) mod tasks;

use std::time::Duration;

pub(crate) use config::ReservationConfig;
pub(crate) use deps::{PendingProposalsDeps, PeriodicTasksDeps, ReserveDealsDeps};
use tasks::{pending_proposals::PendingProposalsTask, reserve_deals::ReserveDealsTask};
use tokio_util::sync::CancellationToken;

/// Spawn all periodic tasks and wait for them to complete.
///
/// Each task runs in its own tokio task with an independent loop. Under
/// normal operation, tasks only exit during shutdown.
pub(crate) async fn run(
    deps: PeriodicTasksDeps,
    config: ReservationConfig,
    shutdown: CancellationToken,
) {
    let mut set = tokio::task::JoinSet::new();

    if config.pending_proposals_interval_secs > 0 {
        let interval = Duration::from_secs(config.pending_proposals_interval_secs);
        let task = PendingProposalsTask::new(deps.pending_proposals, interval);
        set.spawn(task.run(shutdown.clone()));
    }

    let task = ReserveDealsTask::new(deps.reserve_deals, config);
    set.spawn(task.run(shutdown));

    while let Some(result) = set.join_next().await {
        match result {
            Ok(()) => {}
            Err(e) if e.is_panic() => {
                tracing::error!("Periodic task panicked: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Periodic task failed: {:?}", e);
            }
        }
    }
}
