//! Article API request types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request body for creating an article.
///
/// Every field is optional on the wire; admission is decided by the article
/// validator, not by deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateArticleBody {
    #[schema(example = "Valid Title")]
    pub title: Option<String>,

    #[schema(example = "This body is long enough.")]
    pub body: Option<String>,

    /// Image reference or URL
    #[schema(example = "img.png")]
    pub image: Option<String>,

    /// Category identifier (24 hex characters)
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub category: Option<String>,
}

/// Request body for updating an article. The image is kept when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateArticleBody {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Request body for replacing an article image
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ImageBody {
    #[schema(example = "http://cdn.example.com/cover.png")]
    pub image: Option<String>,
}

/// Query parameters for listing articles
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticlesQuery {
    /// Comma-separated user ids
    #[param(example = "u1,u2")]
    pub users: Option<String>,
}
