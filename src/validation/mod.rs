//! # Validation Module
//!
//! Field-level admission checks for inbound article data.
//!
//! Two layers:
//! 1. Shared custom rules (`validate_*`) used from `validator` derive attributes
//! 2. Validated request structures in [`requests`] combining those rules with
//!    `required` and `length` checks
//!
//! The boolean predicates handlers call live in [`article`].

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use validator::{Validate, ValidationError};

use crate::errors::{Error, Result};

pub mod article;
pub mod requests;

pub use article::{create, get_by_users, image, update, UserFilter};
pub use requests::*;

lazy_static! {
    /// Document-store object identifiers: exactly 24 hex characters
    static ref OBJECT_ID_REGEX: Regex = Regex::new(r"^[0-9a-fA-F]{24}$").unwrap();
}

/// Present and not only whitespace
pub fn is_not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// 24-character hexadecimal identifier
pub fn is_object_id(value: &str) -> bool {
    OBJECT_ID_REGEX.is_match(value)
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Reject empty or whitespace-only strings
pub fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if !is_not_blank(value) {
        return Err(rule("blank", "must not be empty"));
    }
    Ok(())
}

/// Reject anything that is not a 24-character hex identifier
pub fn validate_object_id(value: &str) -> std::result::Result<(), ValidationError> {
    if !is_object_id(value) {
        return Err(rule("invalid_object_id", "must be a 24-character hex identifier"));
    }
    Ok(())
}

/// Optional category: when given it must be non-empty and an identifier
pub fn validate_category(value: &str) -> std::result::Result<(), ValidationError> {
    validate_not_blank(value)?;
    validate_object_id(value)
}

/// Comma-separated user identifiers
pub fn validate_user_list(value: &str) -> std::result::Result<(), ValidationError> {
    validate_not_blank(value)?;
    // Splitting a non-empty string always yields at least one segment; kept as the
    // documented contract of the users filter.
    if value.split(',').count() == 0 {
        return Err(rule("empty_user_list", "must list at least one user"));
    }
    Ok(())
}

/// Validate any structure that implements Validate trait
pub fn validate_request<T: Validate>(request: &T) -> Result<()> {
    request.validate().map_err(Error::from)
}
