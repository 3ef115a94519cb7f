//! # Configuration Settings
//!
//! Defines the configuration structure for the inkpost service.

use crate::errors::{Error, Result};
use crate::validation::validate_request;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,

    /// Service registry configuration
    #[validate(nested)]
    pub registry: RegistryConfig,
}

impl AppConfig {
    /// Validate the entire configuration.
    ///
    /// Sections are checked one at a time so the error names the offending field.
    pub fn validate(&self) -> Result<()> {
        validate_request(&self.server)?;
        validate_request(&self.observability)?;
        validate_request(&self.registry)?;

        self.validate_custom()?;

        Ok(())
    }

    /// Cross-field checks the derive rules cannot express
    fn validate_custom(&self) -> Result<()> {
        if self.observability.enable_metrics && self.server.port == self.observability.metrics_port
        {
            return Err(Error::validation("Server and metrics ports cannot be the same"));
        }

        if self.registry.enabled
            && !self.registry.service_url.starts_with("http://")
            && !self.registry.service_url.starts_with("https://")
        {
            return Err(Error::validation("Registry URL must start with 'http://' or 'https://'"));
        }

        if self.registry.retry_initial_backoff_ms > self.registry.retry_max_backoff_ms {
            return Err(Error::validation(
                "Registry initial backoff cannot exceed the maximum backoff",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Enable permissive CORS
    pub enable_cors: bool,

    /// Serve the OpenAPI document and Swagger UI
    pub enable_docs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 3000, enable_cors: true, enable_docs: true }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Observability configuration for logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Service name attached to logs and metrics
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error) or a full `EnvFilter` directive
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Enable the Prometheus exporter
    pub enable_metrics: bool,

    /// Prometheus exporter port (0 = disabled)
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "inkpost".to_string(),
            log_level: "info".to_string(),
            json_logging: false,
            enable_metrics: false,
            metrics_port: 9090,
        }
    }
}

impl ObservabilityConfig {
    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if !self.enable_metrics || self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }
}

/// Service registry (Eureka-compatible) client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegistryConfig {
    /// Enable the registry client
    pub enabled: bool,

    /// Registry base URL, e.g. `http://localhost:8761/eureka`
    #[validate(length(min = 1, message = "Registry URL cannot be empty"))]
    pub service_url: String,

    /// Application name registered with the registry
    #[validate(length(min = 1, max = 64, message = "App name must be 1-64 characters"))]
    pub app_name: String,

    /// Host name advertised to the registry
    #[validate(length(min = 1, message = "Host name cannot be empty"))]
    pub host_name: String,

    /// Port advertised to the registry
    #[validate(range(min = 1, message = "Host port must be between 1 and 65535"))]
    pub host_port: u16,

    /// IP address advertised to the registry
    #[validate(length(min = 1, message = "IP address cannot be empty"))]
    pub ip_addr: String,

    /// Path of the health endpoint advertised as status and health-check URL
    #[validate(length(min = 1, message = "Health path cannot be empty"))]
    pub health_path: String,

    /// Register this instance on start
    pub register_with_registry: bool,

    /// Periodically fetch the registry into a local cache
    pub fetch_registry: bool,

    /// Heartbeat interval in seconds
    #[validate(range(min = 1, max = 300, message = "Heartbeat interval must be 1-300 seconds"))]
    pub heartbeat_interval_seconds: u64,

    /// Registry fetch interval in seconds
    #[validate(range(min = 1, max = 3600, message = "Fetch interval must be 1-3600 seconds"))]
    pub registry_fetch_interval_seconds: u64,

    /// Maximum registration attempts (None = retry until stopped)
    pub max_retries: Option<u32>,

    /// First retry delay in milliseconds
    #[validate(range(min = 1, message = "Initial backoff must be positive"))]
    pub retry_initial_backoff_ms: u64,

    /// Upper bound for retry delay in milliseconds
    #[validate(range(min = 1, message = "Maximum backoff must be positive"))]
    pub retry_max_backoff_ms: u64,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 120, message = "Request timeout must be 1-120 seconds"))]
    pub request_timeout_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_url: "http://localhost:8761/eureka".to_string(),
            app_name: "BLOG".to_string(),
            host_name: "localhost".to_string(),
            host_port: 3000,
            ip_addr: "127.0.0.1".to_string(),
            health_path: "/health".to_string(),
            register_with_registry: true,
            fetch_registry: true,
            heartbeat_interval_seconds: 30,
            registry_fetch_interval_seconds: 30,
            max_retries: None,
            retry_initial_backoff_ms: 500,
            retry_max_backoff_ms: 30_000,
            request_timeout_seconds: 10,
        }
    }
}

impl RegistryConfig {
    /// Heartbeat interval as Duration
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds)
    }

    /// Registry fetch interval as Duration
    pub fn registry_fetch_interval(&self) -> Duration {
        Duration::from_secs(self.registry_fetch_interval_seconds)
    }

    /// Request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Backoff before the given (zero-based) retry attempt, doubling up to the cap
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.min(32));
        let delay = self.retry_initial_backoff_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.retry_max_backoff_ms))
    }

    /// Registry base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.service_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_bind_address() {
        let config = ServerConfig { host: "127.0.0.1".to_string(), port: 8080, ..Default::default() };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_observability_config_metrics_address() {
        let config =
            ObservabilityConfig { enable_metrics: true, metrics_port: 9100, ..Default::default() };
        assert_eq!(config.metrics_bind_address(), Some("0.0.0.0:9100".to_string()));

        let disabled = ObservabilityConfig { enable_metrics: false, ..Default::default() };
        assert_eq!(disabled.metrics_bind_address(), None);

        let zero_port =
            ObservabilityConfig { enable_metrics: true, metrics_port: 0, ..Default::default() };
        assert_eq!(zero_port.metrics_bind_address(), None);
    }

    #[test]
    fn test_registry_backoff_doubles_and_caps() {
        let config = RegistryConfig {
            retry_initial_backoff_ms: 100,
            retry_max_backoff_ms: 1_000,
            ..Default::default()
        };
        assert_eq!(config.retry_backoff(0), Duration::from_millis(100));
        assert_eq!(config.retry_backoff(1), Duration::from_millis(200));
        assert_eq!(config.retry_backoff(3), Duration::from_millis(800));
        assert_eq!(config.retry_backoff(4), Duration::from_millis(1_000));
        assert_eq!(config.retry_backoff(u32::MAX), Duration::from_millis(1_000));
    }

    #[test]
    fn test_registry_base_url_trims_trailing_slash() {
        let config = RegistryConfig {
            service_url: "http://registry:8761/eureka/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://registry:8761/eureka");
    }

    #[test]
    fn test_config_validation_errors() {
        let mut config = AppConfig::default();
        config.observability.enable_metrics = true;
        config.observability.metrics_port = config.server.port;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.registry.enabled = true;
        config.registry.service_url = "ftp://registry".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.registry.retry_initial_backoff_ms = 5_000;
        config.registry.retry_max_backoff_ms = 1_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_names_offending_field() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        let error = config.validate().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Validation error: Validation failed: port: Port must be between 1 and 65535"
        );
    }

    #[test]
    fn test_config_validation_ranges() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.registry.heartbeat_interval_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.registry.app_name = String::new();
        assert!(config.validate().is_err());
    }
}
