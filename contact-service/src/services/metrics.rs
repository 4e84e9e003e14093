//! Metrics collection for contact-service.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Final outcome of one handler invocation, labelled by HTTP status.
pub fn record_submission(status: u16) {
    counter!("contact_submissions_total", "status" => status.to_string()).increment(1);
}

pub fn record_persistence(status: &'static str) {
    counter!("contact_persistence_total", "status" => status).increment(1);
}

pub fn record_relay(provider: &'static str, status: &'static str) {
    counter!("contact_relay_total", "provider" => provider, "status" => status).increment(1);
}
