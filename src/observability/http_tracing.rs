//! # HTTP Request Tracing Middleware
//!
//! Axum middleware that opens an `http_request` span per request and records
//! request counters and latency histograms through the `metrics` facade.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use std::time::Instant;
use tracing::Instrument;

/// Metrics path label for requests no route matched
pub const UNMATCHED_PATH_LABEL: &str = "unmatched";

/// Axum middleware that wraps each request in a tracing span.
///
/// The span carries method, path, a generated request id and, once the
/// response is ready, the status code. Metrics are labelled with the matched
/// route template, never the raw path.
pub async fn trace_http_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let path_label = metrics_path_label(&request);
    let start = Instant::now();

    let span = crate::request_span!(method, path);
    let response = next.run(request).instrument(span.clone()).await;

    let status_code = response.status().as_u16();
    let elapsed = start.elapsed();
    span.record("status", status_code);

    span.in_scope(|| {
        tracing::debug!(
            status_code = status_code,
            elapsed_ms = elapsed.as_millis() as u64,
            "HTTP request completed"
        );
    });

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path_label.clone(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path_label
    )
    .record(elapsed.as_secs_f64());

    response
}

/// Route template such as `/articles/{id}`, or [`UNMATCHED_PATH_LABEL`]
fn metrics_path_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_PATH_LABEL.to_owned())
}
