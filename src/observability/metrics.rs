//! # Metrics Collection
//!
//! Installs the Prometheus exporter and describes the metrics the service emits.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use metrics::{counter, describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// Install the Prometheus exporter on its own listener.
///
/// A no-op when metrics are disabled. Without an installed recorder every
/// `counter!`/`histogram!` call is discarded.
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(());
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .install()
        .map_err(|e| Error::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    describe_metrics();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}

fn describe_metrics() {
    describe_counter!("http_requests_total", Unit::Count, "HTTP requests by method, path, status");
    describe_histogram!(
        "http_request_duration_seconds",
        Unit::Seconds,
        "HTTP request latency by method and path"
    );
    describe_counter!(
        "http_failures_total",
        Unit::Count,
        "Failures converted into error envelopes, by status"
    );
    describe_counter!(
        "registry_requests_total",
        Unit::Count,
        "Service registry calls by operation and outcome"
    );
}

/// Count a failure rendered by the error boundary
pub fn record_failure(status: u16) {
    counter!("http_failures_total", "status" => status.to_string()).increment(1);
}

/// Count a registry call outcome
pub fn record_registry_request(operation: &'static str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    counter!("registry_requests_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_metrics_is_noop() {
        let config = ObservabilityConfig { enable_metrics: false, ..Default::default() };
        assert!(init_metrics(&config).is_ok());
    }

    #[test]
    fn test_recording_without_recorder_does_not_panic() {
        record_failure(500);
        record_registry_request("register", true);
    }
}
