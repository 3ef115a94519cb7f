//! Article aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ObjectId;

/// A published article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article identifier (24 hex characters)
    #[schema(value_type = String, example = "507f1f77bcf86cd799439011")]
    pub id: ObjectId,

    /// User id of the author
    pub author: String,

    pub title: String,

    pub body: String,

    /// Image reference or URL
    pub image: String,

    /// Optional category identifier
    pub category: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an article, already admitted by validation
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub author: String,
    pub title: String,
    pub body: String,
    pub image: String,
    pub category: Option<String>,
}

impl Article {
    /// Build a new article with a fresh identifier
    pub fn create(new: NewArticle) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::generate(),
            author: new.author,
            title: new.title,
            body: new.body,
            image: new.image,
            category: new.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user` wrote this article
    pub fn is_authored_by(&self, user: &str) -> bool {
        self.author == user
    }

    /// Replace the editable fields and bump `updated_at`.
    ///
    /// The image is only replaced when a new one is given.
    pub fn revise(
        &mut self,
        title: String,
        body: String,
        image: Option<String>,
        category: Option<String>,
    ) {
        self.title = title;
        self.body = body;
        if let Some(image) = image {
            self.image = image;
        }
        self.category = category;
        self.updated_at = Utc::now();
    }

    /// Replace only the image
    pub fn replace_image(&mut self, image: String) {
        self.image = image;
        self.updated_at = Utc::now();
    }
}
