use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_spade_request(endpoint: &str, status: &str, duration: Duration) {
    counter!(
        "spade_client_api_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "spade_client_api_request_duration_seconds",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

/// `code` is a known rejection slug or `"unknown"`, never the raw remote value.
pub fn record_spade_rejection(endpoint: &str, code: &str) {
    counter!(
        "spade_client_api_rejections_total",
        "endpoint" => endpoint.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
}
