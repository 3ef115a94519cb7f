//! Article API handlers
//!
//! Every mutation is gated by the article validator before the repository is
//! touched. A rejected request becomes a 400 through the error boundary.

pub mod types;

pub use types::{ArticlesQuery, CreateArticleBody, ImageBody, UpdateArticleBody};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use crate::{
    api::{error::ApiError, extractors::Author, routes::ApiState},
    domain::{Article, NewArticle, ObjectId},
    validation::{self, UserFilter},
};

const INVALID_ARTICLE: &str = "Invalid article data";
const INVALID_USERS: &str = "Invalid users filter";
const INVALID_ID: &str = "Invalid article id";
const INVALID_IMAGE: &str = "Invalid image";

fn parse_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse(id).map_err(|_| ApiError::bad_request(INVALID_ID))
}

async fn load(state: &ApiState, id: &ObjectId) -> Result<Article, ApiError> {
    state
        .articles
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Article '{}' not found", id)))
}

fn ensure_author(article: &Article, author: &Author) -> Result<(), ApiError> {
    if !article.is_authored_by(&author.0) {
        return Err(ApiError::forbidden("Only the author can modify this article"));
    }
    Ok(())
}

/// Create an article
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleBody,
    responses(
        (status = 201, description = "Article created", body = Article),
        (status = 400, description = "Invalid article data", body = crate::api::error::ErrorBody),
        (status = 401, description = "Missing user identity", body = crate::api::error::ErrorBody)
    ),
    params(("X-User-Id" = String, Header, description = "Caller user id")),
    tag = "articles"
)]
#[instrument(skip(state, payload), fields(user_id = %author.0))]
pub async fn create_article_handler(
    State(state): State<ApiState>,
    author: Author,
    Json(payload): Json<CreateArticleBody>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let admitted = validation::create(
        payload.title.as_deref(),
        payload.body.as_deref(),
        payload.image.as_deref(),
        payload.category.as_deref(),
    );
    let (Some(title), Some(body), Some(image), true) =
        (payload.title, payload.body, payload.image, admitted)
    else {
        return Err(ApiError::bad_request(INVALID_ARTICLE));
    };

    let article = Article::create(NewArticle {
        author: author.0,
        title,
        body,
        image,
        category: payload.category,
    });
    let article = state.articles.insert(article).await?;

    info!(article_id = %article.id, "Article created");
    Ok((StatusCode::CREATED, Json(article)))
}

/// List articles written by the given users
#[utoipa::path(
    get,
    path = "/articles",
    params(ArticlesQuery),
    responses(
        (status = 200, description = "Articles by those users, newest first", body = [Article]),
        (status = 400, description = "Invalid users filter", body = crate::api::error::ErrorBody)
    ),
    tag = "articles"
)]
#[instrument(skip(state, query), fields(users = ?query.users))]
pub async fn list_articles_handler(
    State(state): State<ApiState>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let filter = UserFilter::parse(query.users.as_deref())
        .ok_or_else(|| ApiError::bad_request(INVALID_USERS))?;

    let articles = state.articles.list_by_authors(filter.users()).await?;
    Ok(Json(articles))
}

/// Get a single article
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = Article),
        (status = 400, description = "Invalid article id", body = crate::api::error::ErrorBody),
        (status = 404, description = "Article not found", body = crate::api::error::ErrorBody)
    ),
    tag = "articles"
)]
#[instrument(skip(state))]
pub async fn get_article_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(load(&state, &id).await?))
}

/// Update an article
#[utoipa::path(
    put,
    path = "/articles/{id}",
    request_body = UpdateArticleBody,
    params(
        ("id" = String, Path, description = "Article id"),
        ("X-User-Id" = String, Header, description = "Caller user id")
    ),
    responses(
        (status = 200, description = "Article updated", body = Article),
        (status = 400, description = "Invalid article data", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller is not the author", body = crate::api::error::ErrorBody),
        (status = 404, description = "Article not found", body = crate::api::error::ErrorBody)
    ),
    tag = "articles"
)]
#[instrument(skip(state, payload), fields(user_id = %author.0))]
pub async fn update_article_handler(
    State(state): State<ApiState>,
    author: Author,
    Path(id): Path<String>,
    Json(payload): Json<UpdateArticleBody>,
) -> Result<Json<Article>, ApiError> {
    let admitted = validation::update(
        Some(id.as_str()),
        payload.title.as_deref(),
        payload.body.as_deref(),
        payload.category.as_deref(),
    ) && validation::image(payload.image.as_deref());
    let (Some(title), Some(body), true) = (payload.title, payload.body, admitted) else {
        return Err(ApiError::bad_request(INVALID_ARTICLE));
    };
    let id = parse_id(&id)?;

    let mut article = load(&state, &id).await?;
    ensure_author(&article, &author)?;

    article.revise(title, body, payload.image, payload.category);
    let article = state.articles.replace(article).await?;

    info!(article_id = %article.id, "Article updated");
    Ok(Json(article))
}

/// Replace an article image
#[utoipa::path(
    put,
    path = "/articles/{id}/image",
    request_body = ImageBody,
    params(
        ("id" = String, Path, description = "Article id"),
        ("X-User-Id" = String, Header, description = "Caller user id")
    ),
    responses(
        (status = 200, description = "Image replaced", body = Article),
        (status = 400, description = "Invalid article id or image", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller is not the author", body = crate::api::error::ErrorBody),
        (status = 404, description = "Article not found", body = crate::api::error::ErrorBody)
    ),
    tag = "articles"
)]
#[instrument(skip(state, payload), fields(user_id = %author.0))]
pub async fn replace_image_handler(
    State(state): State<ApiState>,
    author: Author,
    Path(id): Path<String>,
    Json(payload): Json<ImageBody>,
) -> Result<Json<Article>, ApiError> {
    let id = parse_id(&id)?;
    let image = payload
        .image
        .filter(|image| validation::image(Some(image)))
        .ok_or_else(|| ApiError::bad_request(INVALID_IMAGE))?;

    let mut article = load(&state, &id).await?;
    ensure_author(&article, &author)?;

    article.replace_image(image);
    let article = state.articles.replace(article).await?;
    Ok(Json(article))
}

/// Delete an article
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(
        ("id" = String, Path, description = "Article id"),
        ("X-User-Id" = String, Header, description = "Caller user id")
    ),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 400, description = "Invalid article id", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller is not the author", body = crate::api::error::ErrorBody),
        (status = 404, description = "Article not found", body = crate::api::error::ErrorBody)
    ),
    tag = "articles"
)]
#[instrument(skip(state), fields(user_id = %author.0))]
pub async fn delete_article_handler(
    State(state): State<ApiState>,
    author: Author,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    let article = load(&state, &id).await?;
    ensure_author(&article, &author)?;
    state.articles.delete(&id).await?;

    info!(article_id = %id, "Article deleted");
    Ok(StatusCode::NO_CONTENT)
}
