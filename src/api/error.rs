//! Request failures and the JSON error envelope they render to.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::errors::Error;

/// Message used when a failure carries none
pub const DEFAULT_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    ServiceUnavailable(String),
    Internal(Option<String>),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden<S: Into<String>>(msg: S) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn service_unavailable<S: Into<String>>(msg: S) -> Self {
        ApiError::ServiceUnavailable(msg.into())
    }

    /// Unhandled failure without a message
    pub fn internal() -> Self {
        ApiError::Internal(None)
    }
}

/// Wire body of a failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Invalid article data")]
    pub error: String,
}

/// Status plus body sent for a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ErrorEnvelope {
    /// Build an envelope, defaulting to 500 and [`DEFAULT_ERROR_MESSAGE`].
    ///
    /// An empty message counts as absent.
    pub fn new(status: Option<StatusCode>, message: Option<&str>) -> Self {
        let message = message.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_ERROR_MESSAGE);
        Self {
            status: status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: ErrorBody { error: message.to_string() },
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Untyped failure as seen by the error boundary.
///
/// Attached to every rendered error response as an extension so the boundary
/// can log and count it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failure {
    pub status: Option<StatusCode>,
    pub message: Option<String>,
}

impl Failure {
    pub fn new(status: Option<StatusCode>, message: Option<String>) -> Self {
        Self { status, message }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status, self.message.as_deref())
    }
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        let status = Some(err.status_code());
        let message = match err {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::ServiceUnavailable(msg) => Some(msg),
            ApiError::Internal(msg) => msg,
        };
        Failure { status, message }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response = self.envelope().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Failure::from(self).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let message = match &err {
            Error::Validation { message, .. } | Error::Conflict { message, .. } => message.clone(),
            _ => err.to_string(),
        };
        match err.status_code() {
            400 => ApiError::BadRequest(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            503 => ApiError::ServiceUnavailable(message),
            _ => ApiError::Internal(Some(message)),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::from(Error::from(errors))
    }
}
