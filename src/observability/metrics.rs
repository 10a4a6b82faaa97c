//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_lookups_total` (counter): lookups by outcome
//!   (`success`, `upstream_error`, `shed`)
//! - `gateway_permit_wait_seconds` (histogram): time spent queued for a permit
//! - `gateway_upstream_duration_seconds` (histogram): provider call time
//! - `gateway_permits_shed_total` (counter): lookups rejected by the wait limit
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_lookup(outcome: &'static str) {
    counter!("gateway_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_permit_wait(started: Instant) {
    histogram!("gateway_permit_wait_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_upstream_duration(started: Instant) {
    histogram!("gateway_upstream_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_permit_shed() {
    counter!("gateway_permits_shed_total").increment(1);
}
