//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_upstream_requests_total` (counter): upstream calls by provider, status
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency by provider
//! - `gateway_verifications_total` (counter): verification outcomes
//!
//! Without an installed recorder every call below is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::provider::Provider;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished upstream call. `status` 0 means transport failure.
pub fn record_upstream(provider: Provider, status: u16, start: Instant) {
    ::metrics::counter!(
        "gateway_upstream_requests_total",
        "provider" => provider.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_upstream_duration_seconds", "provider" => provider.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_verification(outcome: &'static str) {
    ::metrics::counter!("gateway_verifications_total", "outcome" => outcome).increment(1);
}
