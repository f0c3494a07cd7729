use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_chain_rpc_call(node: &str, method: &str, status: &str, duration: Duration) {
    counter!(
        "spade_client_chain_rpc_total",
        "node" => node.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "spade_client_chain_rpc_duration_seconds",
        "node" => node.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_chain_sync_lag(reported_behind: u64, actual_behind: u64) {
    metrics::gauge!("spade_client_chain_reported_behind_epochs").set(reported_behind as f64);
    metrics::gauge!("spade_client_chain_actual_behind_epochs").set(actual_behind as f64);
}
