//! # REST API
//!
//! Axum router for the article endpoints, wrapped in the error boundary that
//! turns every failure into a JSON error envelope.

pub mod boundary;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod server;

pub use boundary::{error_boundary, guard};
pub use error::{ApiError, ErrorBody, ErrorEnvelope, Failure};
pub use extractors::Author;
pub use routes::{build_router, ApiState};
pub use server::{shutdown_signal, start_api_server};
