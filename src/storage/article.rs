//! Article repository

use std::cmp::Reverse;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::instrument;

use crate::domain::{Article, ObjectId};
use crate::errors::{Error, Result};

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Store a new article
    async fn insert(&self, article: Article) -> Result<Article>;

    /// Get an article by id
    async fn get(&self, id: &ObjectId) -> Result<Option<Article>>;

    /// Articles written by any of `authors`, newest first
    async fn list_by_authors(&self, authors: &[String]) -> Result<Vec<Article>>;

    /// Overwrite an existing article
    async fn replace(&self, article: Article) -> Result<Article>;

    /// Remove an article
    async fn delete(&self, id: &ObjectId) -> Result<()>;
}

/// Process-local repository backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryArticleRepository {
    articles: DashMap<ObjectId, Article>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    #[instrument(skip(self, article), fields(article_id = %article.id), name = "store_insert_article")]
    async fn insert(&self, article: Article) -> Result<Article> {
        use dashmap::mapref::entry::Entry;

        match self.articles.entry(article.id.clone()) {
            Entry::Occupied(_) => Err(Error::conflict(
                format!("Article '{}' already exists", article.id),
                "article",
            )),
            Entry::Vacant(slot) => {
                slot.insert(article.clone());
                Ok(article)
            }
        }
    }

    async fn get(&self, id: &ObjectId) -> Result<Option<Article>> {
        Ok(self.articles.get(id).map(|entry| entry.value().clone()))
    }

    #[instrument(skip(self), name = "store_list_articles")]
    async fn list_by_authors(&self, authors: &[String]) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self
            .articles
            .iter()
            .filter(|entry| authors.iter().any(|author| entry.value().is_authored_by(author)))
            .map(|entry| entry.value().clone())
            .collect();
        articles.sort_by_key(|article| Reverse((article.created_at, article.id.clone())));
        Ok(articles)
    }

    #[instrument(skip(self, article), fields(article_id = %article.id), name = "store_replace_article")]
    async fn replace(&self, article: Article) -> Result<Article> {
        match self.articles.get_mut(&article.id) {
            Some(mut entry) => {
                *entry = article.clone();
                Ok(article)
            }
            None => Err(Error::not_found("article", article.id.as_str())),
        }
    }

    #[instrument(skip(self), fields(article_id = %id), name = "store_delete_article")]
    async fn delete(&self, id: &ObjectId) -> Result<()> {
        self.articles
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("article", id.as_str()))
    }
}
