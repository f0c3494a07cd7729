use std::sync::Arc;

use spade_api::{AuthTokenBuilder, ReservationOrchestrator, SpadeApi, SpadeHttpGateway};
use spade_chain::{ChainFacade, LotusChain, LotusConfig};

use crate::{
    config::{self, Config},
    error::StartupError,
    logger,
    periodic_tasks::{PendingProposalsDeps, PeriodicTasksDeps, ReserveDealsDeps},
};

pub(crate) struct CoreBootstrap {
    pub(crate) config: Config,
    pub(crate) periodic_tasks_deps: PeriodicTasksDeps,
}

/// Load configuration, connect to Lotus and verify the deal engine accepts
/// our credential. Every failure here is a [`StartupError`].
pub(crate) async fn build_core() -> Result<CoreBootstrap, StartupError> {
    let config = config::initialize_configuration()?;
    logger::initialize(&config.logger, &config.telemetry);

    let chain = connect_chain(&config.lotus).await?;

    let gateway = SpadeHttpGateway::new(config.spade.clone(), AuthTokenBuilder::new(chain))
        .map_err(StartupError::Gateway)?;
    let spade_api: Arc<dyn SpadeApi> = Arc::new(gateway);
    check_deal_engine(spade_api.as_ref()).await?;

    let orchestrator = Arc::new(ReservationOrchestrator::new(
        Arc::clone(&spade_api),
        config.spade.eligible_cache_ttl(),
    ));

    let periodic_tasks_deps = PeriodicTasksDeps {
        reserve_deals: ReserveDealsDeps { orchestrator },
        pending_proposals: PendingProposalsDeps { spade_api },
    };

    Ok(CoreBootstrap {
        config,
        periodic_tasks_deps,
    })
}

async fn connect_chain(config: &LotusConfig) -> Result<Arc<dyn ChainFacade>, StartupError> {
    let chain = LotusChain::connect(config).await?;
    tracing::info!(
        provider = %chain.provider_address(),
        worker = %chain.worker_address(),
        "Lotus chain facade ready"
    );
    Ok(Arc::new(chain))
}

async fn check_deal_engine(spade_api: &dyn SpadeApi) -> Result<(), StartupError> {
    let envelope = spade_api
        .list_pending()
        .await
        .map_err(StartupError::DealEngineUnreachable)?;

    tracing::info!(
        state_epoch = envelope.response_state_epoch,
        pending = envelope.response.pending_proposals.len(),
        recent_failures = envelope.response.recent_failures.len(),
        "Deal engine reachable, credential accepted"
    );
    Ok(())
}
