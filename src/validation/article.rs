//! Admission predicates for article requests.
//!
//! Each predicate is pure and answers a single admit/reject question; callers
//! report a rejection as a 400 failure. No list of violated constraints is
//! returned.

use validator::Validate;

use super::requests::{
    ValidatedCreateArticleRequest, ValidatedImageRequest, ValidatedUpdateArticleRequest,
    ValidatedUserFilter,
};

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

/// `users` is a non-empty, comma-separated list of user identifiers
pub fn get_by_users(users: Option<&str>) -> bool {
    ValidatedUserFilter { users: owned(users) }.validate().is_ok()
}

/// Admit a new article.
///
/// Title 3-100 characters, body at least 10, image non-empty, category absent or
/// a valid identifier. Title, body and image must not be blank.
pub fn create(
    title: Option<&str>,
    body: Option<&str>,
    image: Option<&str>,
    category: Option<&str>,
) -> bool {
    ValidatedCreateArticleRequest {
        title: owned(title),
        body: owned(body),
        image: owned(image),
        category: owned(category),
    }
    .validate()
    .is_ok()
}

/// Admit an article update. Same rules as [`create`] plus a valid `id`; the image
/// is not looked at.
pub fn update(
    id: Option<&str>,
    title: Option<&str>,
    body: Option<&str>,
    category: Option<&str>,
) -> bool {
    ValidatedUpdateArticleRequest {
        id: owned(id),
        title: owned(title),
        body: owned(body),
        category: owned(category),
    }
    .validate()
    .is_ok()
}

/// An image is either absent or non-empty
pub fn image(image: Option<&str>) -> bool {
    ValidatedImageRequest { image: owned(image) }.validate().is_ok()
}

/// Parsed users filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    users: Vec<String>,
}

impl UserFilter {
    /// Parse a raw `users` value; `None` when [`get_by_users`] rejects it.
    ///
    /// Segments are trimmed and empty ones dropped.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        if !get_by_users(raw) {
            return None;
        }
        let users = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        Some(Self { users })
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }
}
