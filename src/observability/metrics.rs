//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forward_auth_decisions_total` (counter): decisions by outcome
//! - `forward_auth_whois_duration_seconds` (histogram): identity lookup latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one finished forward-auth decision.
pub fn record_decision(outcome: &'static str) {
    metrics::counter!("forward_auth_decisions_total", "outcome" => outcome).increment(1);
}

/// Record the latency of one identity lookup.
pub fn record_whois(start: Instant, success: bool) {
    let result = if success { "ok" } else { "error" };
    metrics::histogram!("forward_auth_whois_duration_seconds", "result" => result)
        .record(start.elapsed().as_secs_f64());
}
