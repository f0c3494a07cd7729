use std::sync::Arc;

use spade_api::{ReservationOrchestrator, SpadeApi};

#[derive(Clone)]
pub(crate) struct ReserveDealsDeps {
    pub(crate) orchestrator: Arc<ReservationOrchestrator>,
}

#[derive(Clone)]
pub(crate) struct PendingProposalsDeps {
    pub(crate) spade_api: Arc<dyn SpadeApi>,
}

#[derive(Clone)]
pub(crate) struct PeriodicTasksDeps {
    pub(crate) reserve_deals: ReserveDealsDeps,
    pub(crate) pending_proposals: PendingProposalsDeps,
}
