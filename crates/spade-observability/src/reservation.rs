use metrics::{counter, gauge};

pub fn record_eligible_pieces(total: usize, untried: usize) {
    gauge!("spade_client_eligible_pieces").set(total as f64);
    gauge!("spade_client_eligible_untried_pieces").set(untried as f64);
}

pub fn record_eligible_listing(source: &str) {
    counter!(
        "spade_client_eligible_listing_total",
        "source" => source.to_string()
    )
    .increment(1);
}

pub fn record_reservation_outcome(outcome: &str) {
    counter!(
        "spade_client_reservation_outcome_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_tracked_pieces(count: usize) {
    gauge!("spade_client_tracked_pieces").set(count as f64);
}
