//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rpc_server_starts_total` (counter): successful bootstraps, by transport
//! - `rpc_server_start_failures_total` (counter): aborted start attempts, by reason
//! - `rpc_server_stops_total` (counter): transports taken offline
//! - `rpc_server_config_errors_total` (counter): override files that failed to load
//! - `rpc_server_running` (gauge): 1 while a transport is live
//! - `rpc_requests_total` (counter): RPC requests by service, status
//! - `rpc_request_duration_seconds` (histogram): RPC latency by service

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

pub fn record_start(transport: &str) {
    metrics::counter!("rpc_server_starts_total", "transport" => transport.to_string()).increment(1);
    metrics::gauge!("rpc_server_running").set(1.0);
}

pub fn record_start_failure(reason: &'static str) {
    metrics::counter!("rpc_server_start_failures_total", "reason" => reason).increment(1);
}

pub fn record_stop() {
    metrics::counter!("rpc_server_stops_total").increment(1);
    metrics::gauge!("rpc_server_running").set(0.0);
}

pub fn record_config_error() {
    metrics::counter!("rpc_server_config_errors_total").increment(1);
}

/// Record one RPC request handled by a transport.
pub fn record_rpc(service: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "rpc_requests_total",
        "service" => service.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("rpc_request_duration_seconds", "service" => service.to_string())
        .record(start_time.elapsed().as_secs_f64());
}
