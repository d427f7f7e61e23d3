//! Metrics collection and exposition.
//!
//! # Metrics
//! - `registry_http_requests_total` (counter): gateway requests by method, status
//! - `registry_http_request_duration_seconds` (histogram): gateway latency
//! - `registry_contract_calls_total` (counter): state-changing calls by method, outcome
//! - `registry_uploads_total` (counter): IPFS pins by outcome
//! - `registry_upload_cache_hits_total` (counter): uploads answered from the cache
//! - `registry_rpc_healthy` (gauge): 1=RPC reachable, 0=unreachable

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "registry_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("registry_http_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_contract_call(method: &'static str, ok: bool) {
    let outcome = if ok { "success" } else { "failure" };
    ::metrics::counter!("registry_contract_calls_total", "method" => method, "outcome" => outcome)
        .increment(1);
}

pub fn record_upload(outcome: &'static str) {
    ::metrics::counter!("registry_uploads_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_hit() {
    ::metrics::counter!("registry_upload_cache_hits_total").increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    ::metrics::gauge!("registry_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}
