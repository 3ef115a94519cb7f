//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use inkpost::{
    api::{build_router, ApiState},
    config::ServerConfig,
    storage::InMemoryArticleRepository,
};
use serde_json::Value;
use tower::ServiceExt;

pub const CATEGORY_ID: &str = "507f1f77bcf86cd799439011";
pub const VALID_BODY: &str = "This body is long enough.";

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryArticleRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryArticleRepository::new());
        let router = build_router(ApiState::new(repository.clone()), &ServerConfig::default());
        Self { router, repository }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    /// Create an article as `user` and return its id
    pub async fn create_article(&self, user: &str, title: &str) -> String {
        let (status, json) = self
            .request(
                Method::POST,
                "/articles",
                Some(user),
                Some(serde_json::json!({
                    "title": title,
                    "body": VALID_BODY,
                    "image": "img.png"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {json}");
        json["id"].as_str().unwrap().to_string()
    }
}
