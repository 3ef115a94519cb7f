//! Article-related validated request structures.
//!
//! Every field is optional so an absent value can be told apart from an empty one.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{
    validate_category, validate_not_blank, validate_object_id, validate_user_list,
};

/// Validated input for creating an article
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ValidatedCreateArticleRequest {
    #[validate(
        required(message = "is required"),
        custom(function = "validate_not_blank"),
        length(min = 3, max = 100, message = "must be 3-100 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "is required"),
        custom(function = "validate_not_blank"),
        length(min = 10, message = "must be at least 10 characters")
    )]
    pub body: Option<String>,

    #[validate(required(message = "is required"), custom(function = "validate_not_blank"))]
    pub image: Option<String>,

    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
}

/// Validated input for updating an article. The image is not part of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ValidatedUpdateArticleRequest {
    #[validate(required(message = "is required"), custom(function = "validate_object_id"))]
    pub id: Option<String>,

    #[validate(
        required(message = "is required"),
        custom(function = "validate_not_blank"),
        length(min = 3, max = 100, message = "must be 3-100 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "is required"),
        custom(function = "validate_not_blank"),
        length(min = 10, message = "must be at least 10 characters")
    )]
    pub body: Option<String>,

    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
}

/// Validated users filter for listing articles
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ValidatedUserFilter {
    #[validate(required(message = "is required"), custom(function = "validate_user_list"))]
    pub users: Option<String>,
}

/// Validated image reference; absent is accepted
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ValidatedImageRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub image: Option<String>,
}
