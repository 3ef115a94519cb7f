//! HTTP-level tests for the article endpoints.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, CATEGORY_ID, VALID_BODY};

#[tokio::test]
async fn create_article_returns_created_article() {
    let app = TestApp::new();

    let (status, json) = app
        .request(
            Method::POST,
            "/articles",
            Some("u1"),
            Some(json!({
                "title": "Valid Title",
                "body": VALID_BODY,
                "image": "img.png",
                "category": CATEGORY_ID
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["author"], "u1");
    assert_eq!(json["title"], "Valid Title");
    assert_eq!(json["category"], CATEGORY_ID);
    assert_eq!(json["id"].as_str().unwrap().len(), 24);
    assert_eq!(app.repository.len(), 1);
}

#[tokio::test]
async fn create_rejects_invalid_article() {
    let app = TestApp::new();

    let (status, json) = app
        .request(
            Method::POST,
            "/articles",
            Some("u1"),
            Some(json!({ "title": "Hi", "body": "short", "image": "img.png" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid article data" }));
    assert!(app.repository.is_empty());
}

#[tokio::test]
async fn create_rejects_empty_or_malformed_category() {
    let app = TestApp::new();

    for category in ["", "tech"] {
        let (status, json) = app
            .request(
                Method::POST,
                "/articles",
                Some("u1"),
                Some(json!({
                    "title": "Valid Title",
                    "body": VALID_BODY,
                    "image": "img.png",
                    "category": category
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "category {category:?}");
        assert_eq!(json["error"], "Invalid article data");
    }
}

#[tokio::test]
async fn null_category_and_image_count_as_absent() {
    let app = TestApp::new();

    let (status, json) = app
        .request(
            Method::POST,
            "/articles",
            Some("u1"),
            Some(json!({
                "title": "Valid Title",
                "body": VALID_BODY,
                "image": "img.png",
                "category": null
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["category"], json!(null));
    let id = json["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .request(
            Method::PUT,
            &format!("/articles/{id}"),
            Some("u1"),
            Some(json!({
                "title": "Updated Title",
                "body": VALID_BODY,
                "image": null,
                "category": null
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["image"], "img.png");

    let (status, json) = app
        .request(
            Method::POST,
            "/articles",
            Some("u1"),
            Some(json!({ "title": "Valid Title", "body": VALID_BODY, "image": null })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid article data");
}

#[tokio::test]
async fn create_requires_user_identity() {
    let app = TestApp::new();

    let (status, json) = app
        .request(
            Method::POST,
            "/articles",
            None,
            Some(json!({ "title": "Valid Title", "body": VALID_BODY, "image": "img.png" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Missing user identity");
}

#[tokio::test]
async fn list_by_users_returns_matching_articles() {
    let app = TestApp::new();
    app.create_article("u1", "First Article").await;
    app.create_article("u2", "Second Article").await;
    app.create_article("u3", "Third Article").await;

    let (status, json) = app.request(Method::GET, "/articles?users=u1,u2", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let authors: Vec<&str> =
        json.as_array().unwrap().iter().map(|a| a["author"].as_str().unwrap()).collect();
    assert_eq!(authors.len(), 2);
    assert!(authors.contains(&"u1"));
    assert!(authors.contains(&"u2"));
}

#[tokio::test]
async fn list_rejects_missing_or_empty_users() {
    let app = TestApp::new();

    for uri in ["/articles", "/articles?users="] {
        let (status, json) = app.request(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(json, json!({ "error": "Invalid users filter" }));
    }
}

#[tokio::test]
async fn get_article_by_id() {
    let app = TestApp::new();
    let id = app.create_article("u1", "Valid Title").await;

    let (status, json) = app.request(Method::GET, &format!("/articles/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], id.as_str());

    let (status, json) = app.request(Method::GET, "/articles/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid article id");

    let (status, json) =
        app.request(Method::GET, &format!("/articles/{CATEGORY_ID}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn update_article_keeps_image_when_omitted() {
    let app = TestApp::new();
    let id = app.create_article("u1", "Valid Title").await;

    let (status, json) = app
        .request(
            Method::PUT,
            &format!("/articles/{id}"),
            Some("u1"),
            Some(json!({ "title": "Updated Title", "body": "An updated body text." })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Updated Title");
    assert_eq!(json["image"], "img.png");
}

#[tokio::test]
async fn update_rejects_bad_id_and_empty_image() {
    let app = TestApp::new();
    let id = app.create_article("u1", "Valid Title").await;

    let (status, json) = app
        .request(
            Method::PUT,
            "/articles/abc",
            Some("u1"),
            Some(json!({ "title": "Valid Title", "body": VALID_BODY })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid article data");

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/articles/{id}"),
            Some("u1"),
            Some(json!({ "title": "Valid Title", "body": VALID_BODY, "image": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_author_may_modify() {
    let app = TestApp::new();
    let id = app.create_article("u1", "Valid Title").await;

    let (status, json) = app
        .request(
            Method::PUT,
            &format!("/articles/{id}"),
            Some("intruder"),
            Some(json!({ "title": "Hijacked Title", "body": VALID_BODY })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Only the author can modify this article");

    let (status, _) =
        app.request(Method::DELETE, &format!("/articles/{id}"), Some("intruder"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.repository.len(), 1);
}

#[tokio::test]
async fn replace_image() {
    let app = TestApp::new();
    let id = app.create_article("u1", "Valid Title").await;
    let uri = format!("/articles/{id}/image");

    let (status, json) = app
        .request(Method::PUT, &uri, Some("u1"), Some(json!({ "image": "http://x/y.png" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["image"], "http://x/y.png");

    for body in [json!({ "image": "" }), json!({})] {
        let (status, json) = app.request(Method::PUT, &uri, Some("u1"), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid image");
    }
}

#[tokio::test]
async fn delete_article() {
    let app = TestApp::new();
    let id = app.create_article("u1", "Valid Title").await;

    let (status, body) =
        app.request(Method::DELETE, &format!("/articles/{id}"), Some("u1"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert!(app.repository.is_empty());

    let (status, _) =
        app.request(Method::DELETE, &format!("/articles/{id}"), Some("u1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_docs_are_served() {
    let app = TestApp::new();

    let (status, json) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));

    let (status, json) = app.request(Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/articles"].is_object());
}
