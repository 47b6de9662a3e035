//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_routes_registered` (gauge): routes bound at startup
//! - `gateway_snapshot_diagnostics_total` (counter): problems found loading a route snapshot
//! - `gateway_requests_total` (counter): requests by route, status
//! - `gateway_request_duration_seconds` (histogram): handler latency by route
//!
//! # Design Decisions
//! - Labels are route id and status code; paths are not used as labels
//! - Recording is a no-op until `init_metrics` installs the exporter

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_routes_registered(count: usize) {
    gauge!("gateway_routes_registered").set(count as f64);
}

pub fn record_snapshot_diagnostics(count: usize) {
    counter!("gateway_snapshot_diagnostics_total").increment(count as u64);
}

pub fn record_request(route_id: &str, status: u16, start_time: Instant) {
    let route = route_id.to_string();
    counter!(
        "gateway_requests_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start_time.elapsed().as_secs_f64());
}
