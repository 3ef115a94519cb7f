//! # Configuration Management
//!
//! Layered configuration for the inkpost service: built-in defaults, an optional
//! configuration file, then `INKPOST__*` environment variables
//! (e.g. `INKPOST__SERVER__PORT=8080`, `INKPOST__REGISTRY__ENABLED=true`).

pub mod settings;

pub use settings::{AppConfig, ObservabilityConfig, RegistryConfig, ServerConfig};

use std::path::Path;

use crate::errors::Result;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "INKPOST";

impl AppConfig {
    /// Load configuration from defaults and environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration from defaults, an optional file, and environment variables.
    ///
    /// The file format is inferred from its extension (TOML, YAML, JSON).
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let loaded: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }
}
