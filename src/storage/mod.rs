//! # Storage
//!
//! Article persistence behind the [`ArticleRepository`] trait. The service ships
//! an in-memory implementation; a document store can be plugged in behind the
//! same seam.

pub mod article;

pub use article::{ArticleRepository, InMemoryArticleRepository};
