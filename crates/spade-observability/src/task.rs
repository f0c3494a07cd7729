use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_task_run(task: &str, status: &str, duration: Duration) {
    counter!(
        "spade_client_task_runs_total",
        "task" => task.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "spade_client_task_duration_seconds",
        "task" => task.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_pending_proposals(pending: usize, recent_failures: usize) {
    metrics::gauge!("spade_client_pending_proposals").set(pending as f64);
    metrics::gauge!("spade_client_recent_proposal_failures").set(recent_failures as f64);
}
