//! Prometheus metrics for monitoring matchmaking server health.
//!
//! Metrics are exported on a dedicated listener (configured via
//! `METRICS_BIND`) in Prometheus text format. The recorders below are
//! called from the API handlers.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize the Prometheus metrics exporter.
///
/// Metrics become available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))
}

/// Increment the players-joined counter.
pub fn player_joined() {
    metrics::counter!("mm_players_joined_total").increment(1);
}

/// Set the registered-players gauge.
pub fn registered_players(count: usize) {
    metrics::gauge!("mm_registered_players").set(count as f64);
}

/// Increment the tournaments-started counter.
pub fn tournament_started(participants: usize) {
    metrics::counter!("mm_tournaments_started_total").increment(1);
    metrics::histogram!("mm_tournament_participants").record(participants as f64);
}

/// Increment the tournaments-reset counter.
pub fn tournament_reset() {
    metrics::counter!("mm_tournaments_reset_total").increment(1);
}

/// Record a reported match result, labeled by what it did to the bracket.
pub fn result_recorded(outcome: &str) {
    metrics::counter!("mm_results_recorded_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Increment the match-requests counter.
pub fn match_proposed() {
    metrics::counter!("mm_match_requests_total").increment(1);
}
