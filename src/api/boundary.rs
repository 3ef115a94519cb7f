//! # Error Boundary
//!
//! Outermost request layer. Whatever happens below it, the client receives
//! either the normal response or a JSON `{ "error": ... }` envelope with a
//! status code. Failures are logged and counted here and nowhere else.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use axum::{
    body::to_bytes,
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use tracing::{error, warn};

use super::error::{ApiError, Failure};
use crate::observability::metrics::record_failure;

/// Upper bound when reading a framework error body to reuse as message
const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Run `continuation`; render its failure or panic as an error envelope.
///
/// Successful results pass through untouched.
pub async fn guard<F, T>(continuation: F) -> Response
where
    F: Future<Output = Result<T, ApiError>>,
    T: IntoResponse,
{
    match AssertUnwindSafe(continuation).catch_unwind().await {
        Ok(Ok(value)) => value.into_response(),
        Ok(Err(err)) => render(Failure::from(err)),
        Err(payload) => {
            error!(panic = %panic_message(payload.as_ref()), "Request continuation panicked");
            render(Failure::default())
        }
    }
}

/// Axum middleware form of [`guard`] for the whole router.
///
/// Error responses that were not produced through [`ApiError`], such as
/// extractor rejections or a 405 from the router, are rewritten into the
/// envelope as well.
pub async fn error_boundary(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            error!(
                %method,
                %path,
                panic = %panic_message(payload.as_ref()),
                "Request handler panicked"
            );
            return render(Failure::default());
        }
    };

    settle(response).await
}

async fn settle(mut response: Response) -> Response {
    if let Some(failure) = response.extensions_mut().remove::<Failure>() {
        report(&failure);
        return response;
    }

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (_, body) = response.into_parts();
    let message = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };
    let message = if message.is_empty() {
        status.canonical_reason().map(str::to_string)
    } else {
        Some(message)
    };

    render(Failure::new(Some(status), message))
}

/// Log and count a failure, then render its envelope without the tag
fn render(failure: Failure) -> Response {
    report(&failure);
    failure.envelope().into_response()
}

fn report(failure: &Failure) {
    let envelope = failure.envelope();
    let status = envelope.status;
    if status.is_server_error() {
        error!(status = status.as_u16(), error = %envelope.body.error, "Request failed");
    } else {
        warn!(status = status.as_u16(), error = %envelope.body.error, "Request rejected");
    }
    record_failure(status.as_u16());
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Fallback for unmatched routes
pub async fn not_found_fallback() -> ApiError {
    ApiError::not_found("Resource not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tracing_test::traced_test;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn guard_passes_success_through() {
        let response = guard(async { Ok::<_, ApiError>((StatusCode::CREATED, "made")) }).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(!logs_contain("Request rejected"));
        assert!(!logs_contain("Request failed"));
    }

    #[tokio::test]
    #[traced_test]
    async fn guard_renders_status_and_message() {
        let response =
            guard(async { Err::<(), _>(ApiError::not_found("Article not found")) }).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<Failure>().is_none());
        assert_eq!(body_json(response).await["error"], "Article not found");
        assert!(logs_contain("Request rejected"));
    }

    #[tokio::test]
    #[traced_test]
    async fn guard_defaults_missing_message() {
        let response = guard(async { Err::<(), _>(ApiError::internal()) }).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal Server Error");
        assert!(logs_contain("Request failed"));
    }

    #[tokio::test]
    #[traced_test]
    async fn guard_contains_panics() {
        let response = guard(async {
            if true {
                panic!("kaboom");
            }
            Ok::<_, ApiError>(())
        })
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal Server Error");
        assert!(logs_contain("kaboom"));
    }

    #[test]
    fn panic_payloads_are_readable() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
