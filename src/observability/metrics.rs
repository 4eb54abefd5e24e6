//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed calls by partner, status
//! - `relay_request_duration_seconds` (histogram): relay latency by partner
//! - `relay_upstream_failures_total` (counter): transport failures by partner, kind
//! - `relay_token_events_total` (counter): login/refresh outcomes
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Prometheus exporter is opt-in via config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed relay call.
pub fn record_request(partner: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "partner" => partner,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "partner" => partner)
        .record(start.elapsed().as_secs_f64());
}

/// Record an outbound call that never produced a response.
pub fn record_upstream_failure(partner: &'static str, kind: &'static str) {
    metrics::counter!(
        "relay_upstream_failures_total",
        "partner" => partner,
        "kind" => kind
    )
    .increment(1);
}

/// Record a credential lifecycle event (login, refresh, refresh_failed, ...).
pub fn record_token_event(event: &'static str) {
    metrics::counter!("relay_token_events_total", "event" => event).increment(1);
}
