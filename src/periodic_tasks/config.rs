use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReservationConfig {
    /// Whether to request deals at all. When disabled the client only
    /// authenticates and reports pending proposals.
    pub enabled: bool,
    /// Seconds between reservation attempts.
    pub interval_secs: u64,
    /// Seconds between pending proposal reports; 0 disables the report.
    pub pending_proposals_interval_secs: u64,
}
