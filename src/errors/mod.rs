//! # Error Handling
//!
//! This module provides error handling for the inkpost service.
//! Domain and infrastructure failures are expressed as [`Error`]; the HTTP layer
//! maps them onto `ApiError` at the edge.

pub mod types;

pub use types::{Error, Result};
