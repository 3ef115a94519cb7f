//! # Structured Logging
//!
//! Provides subscriber setup and span macros using the tracing ecosystem.
//!
//! The filter starts from the configured `log_level` and is overridden by `RUST_LOG`
//! when set. JSON output is meant for log shippers; the default is the compact
//! human-readable formatter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{Error, Result};

/// Create a tracing span for request tracking.
///
/// ```rust,ignore
/// let span = request_span!("GET", "/articles");
/// let span = request_span!("PUT", "/articles/507f1f77bcf86cd799439011", author = "u1");
/// ```
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            status = tracing::field::Empty
        )
    };
    ($method:expr, $path:expr, $($field:tt)*) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            status = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Create a tracing span for registry operations
#[macro_export]
macro_rules! registry_span {
    ($operation:expr, $app:expr) => {
        tracing::info_span!(
            "registry_operation",
            operation = %$operation,
            app = %$app,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
    ($operation:expr, $app:expr, $($field:tt)*) => {
        tracing::info_span!(
            "registry_operation",
            operation = %$operation,
            app = %$app,
            operation_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Build the filter from `RUST_LOG`, falling back to the configured level
fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            Error::config(format!("Invalid log level '{}': {}", config.log_level, e))
        }),
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logging {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| Error::config(format!("Failed to install tracing subscriber: {}", e)))
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        server_address = %config.server.bind_address(),
        registry_enabled = %config.registry.enabled,
        registry_url = %config.registry.service_url,
        registry_app = %config.registry.app_name,
        metrics_enabled = %config.observability.enable_metrics,
        json_logging = %config.observability.json_logging,
        "inkpost configuration"
    );
}
