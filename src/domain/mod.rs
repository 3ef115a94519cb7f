//! Domain types for the article service.

pub mod article;
pub mod object_id;

pub use article::{Article, NewArticle};
pub use object_id::ObjectId;
