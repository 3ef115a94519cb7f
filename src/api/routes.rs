use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::observability::trace_http_requests;
use crate::storage::ArticleRepository;

use super::{
    boundary::{error_boundary, not_found_fallback},
    docs,
    handlers::{
        create_article_handler, delete_article_handler, get_article_handler, health_handler,
        list_articles_handler, replace_image_handler, update_article_handler,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub articles: Arc<dyn ArticleRepository>,
}

impl ApiState {
    pub fn new(articles: Arc<dyn ArticleRepository>) -> Self {
        Self { articles }
    }
}

/// Assemble the HTTP surface.
///
/// Request tracing wraps the error boundary, so logged and counted statuses
/// are the ones clients see.
pub fn build_router(state: ApiState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/articles", post(create_article_handler).get(list_articles_handler))
        .route(
            "/articles/{id}",
            get(get_article_handler).put(update_article_handler).delete(delete_article_handler),
        )
        .route("/articles/{id}/image", put(replace_image_handler))
        .with_state(state);

    let mut router = if config.enable_docs { api.merge(docs::docs_router()) } else { api };
    router = router.fallback(not_found_fallback);

    if config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(middleware::from_fn(error_boundary))
        .layer(middleware::from_fn(trace_http_requests))
}
