//! Metrics collection and exposition.
//!
//! # Metrics
//! - `requests_total` (counter): handled requests by response status
//! - `probe_attempts_total` (counter): outbound probe attempts by outcome
//! - `circuit_transitions_total` (counter): breaker transitions by from/to
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic increments)
//! - Prometheus exposition on a separate listener, config-gated

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::CircuitState;

/// Install the Prometheus recorder and start the scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a handled request by response status.
pub fn record_request(status: u16) {
    counter!("requests_total", "status" => status.to_string()).increment(1);
}

/// Count an outbound probe attempt ("ok", "rejected" or "transport_error").
pub fn record_probe_attempt(outcome: &'static str) {
    counter!("probe_attempts_total", "outcome" => outcome).increment(1);
}

/// Count a circuit breaker state transition.
pub fn record_circuit_transition(from: CircuitState, to: CircuitState) {
    counter!(
        "circuit_transitions_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}
