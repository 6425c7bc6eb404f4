//! Metrics collection and exposition.
//!
//! # Metrics
//! - `slb_requests_total` (counter): requests by method, status, backend
//! - `slb_request_duration_seconds` (histogram): end-to-end latency
//! - `slb_backend_health` (gauge): 1=reachable, 0=unreachable per backend
//! - `slb_config_reloads_total` (counter): routing table publishes

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
///
/// Recording works without this; events simply go nowhere.
pub fn init(address: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(address).install() {
        Ok(()) => tracing::info!(address = %address, "prometheus exporter listening"),
        Err(error) => tracing::error!(error = %error, "failed to install prometheus exporter"),
    }
}

/// Record one completed (or explicitly failed) request.
pub fn record_request(method: &str, status: u16, backend: &str, started: Instant) {
    counter!(
        "slb_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
    histogram!(
        "slb_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record a backend reachability transition.
pub fn record_backend_health(backend: &str, reachable: bool) {
    gauge!("slb_backend_health", "backend" => backend.to_string())
        .set(if reachable { 1.0 } else { 0.0 });
}

/// Record a routing table publish.
pub fn record_reload() {
    counter!("slb_config_reloads_total").increment(1);
}
