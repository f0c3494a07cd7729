pub(crate) mod pending_proposals;
pub(crate) mod reserve_deals;
