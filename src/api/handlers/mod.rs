pub mod articles;
pub mod health;

pub use articles::{
    create_article_handler, delete_article_handler, get_article_handler, list_articles_handler,
    replace_image_handler, update_article_handler, ArticlesQuery, CreateArticleBody, ImageBody,
    UpdateArticleBody,
};
pub use health::{health_handler, HealthResponse};
