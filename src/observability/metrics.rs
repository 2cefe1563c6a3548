//! Metrics collection and exposition.
//!
//! # Metrics
//! - `passive_balancer_requests_total` (counter): requests by endpoint
//! - `passive_balancer_timeouts_total` (counter): deadline expirations by endpoint
//! - `passive_balancer_rejected_total` (counter): producers refused while terminating
//! - `passive_balancer_queue_length` (gauge): messages currently queued
//!
//! Without an installed recorder every call below is a no-op.

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_TOTAL: &str = "passive_balancer_requests_total";
pub const TIMEOUTS_TOTAL: &str = "passive_balancer_timeouts_total";
pub const REJECTED_TOTAL: &str = "passive_balancer_rejected_total";
pub const QUEUE_LENGTH: &str = "passive_balancer_queue_length";

static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the Prometheus recorder, once per process.
///
/// Returns the handle used to render the exposition text, or `None` if
/// another recorder was already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                tracing::info!("Prometheus recorder installed");
                Some(handle)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Prometheus recorder");
                None
            }
        })
        .clone()
}

pub fn record_request(endpoint: &'static str) {
    metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
}

pub fn record_timeout(endpoint: &'static str) {
    metrics::counter!(TIMEOUTS_TOTAL, "endpoint" => endpoint).increment(1);
}

pub fn record_rejected(endpoint: &'static str) {
    metrics::counter!(REJECTED_TOTAL, "endpoint" => endpoint).increment(1);
}

pub fn set_queue_length(len: usize) {
    metrics::gauge!(QUEUE_LENGTH).set(len as f64);
}
