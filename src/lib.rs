//! # Inkpost
//!
//! Article-management microservice. Inbound article data passes a field
//! validator before it reaches storage, and every request runs inside an error
//! boundary that reports failures as `{ "error": <message> }` with a status
//! code.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum) → Error Boundary → Article handlers → Validator → ArticleRepository
//!                                                    ↓
//!                                  Service registry client (Eureka)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use inkpost::{api::{start_api_server, shutdown_signal, ApiState}, AppConfig, Result};
//! use inkpost::storage::InMemoryArticleRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let state = ApiState::new(Arc::new(InMemoryArticleRepository::new()));
//!     start_api_server(config.server, state, shutdown_signal()).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod registry;
pub mod storage;
pub mod validation;

pub use config::AppConfig;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "inkpost");
    }
}
