//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::ApiError;

/// Header carrying the caller's user id, set by the upstream gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller, taken from [`USER_ID_HEADER`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author(pub String);

impl<S> FromRequestParts<S> for Author
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Author(value.to_string()))
            .ok_or_else(|| ApiError::unauthorized("Missing user identity"))
    }
}
