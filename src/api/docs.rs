use axum::Router;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::extractors::USER_ID_HEADER;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::articles::create_article_handler,
        crate::api::handlers::articles::list_articles_handler,
        crate::api::handlers::articles::get_article_handler,
        crate::api::handlers::articles::update_article_handler,
        crate::api::handlers::articles::replace_image_handler,
        crate::api::handlers::articles::delete_article_handler
    ),
    components(
        schemas(
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::articles::CreateArticleBody,
            crate::api::handlers::articles::UpdateArticleBody,
            crate::api::handlers::articles::ImageBody,
            crate::api::error::ErrorBody,
            crate::domain::Article
        )
    ),
    tags(
        (name = "articles", description = "Article management"),
        (name = "health", description = "Liveness probe used by the service registry")
    ),
    modifiers(&UserIdentityAddon)
)]
pub struct ApiDoc;

struct UserIdentityAddon;

impl Modify for UserIdentityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "userId",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(USER_ID_HEADER))),
        );
    }
}

pub fn docs_router() -> Router {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_article_routes() {
        let openapi = ApiDoc::openapi();
        let paths: Vec<&str> = openapi.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/articles"));
        assert!(paths.contains(&"/articles/{id}"));
        assert!(paths.contains(&"/articles/{id}/image"));
        assert!(paths.contains(&"/health"));
    }

    #[test]
    fn openapi_has_error_and_article_schemas() {
        let openapi = ApiDoc::openapi();
        let schemas = &openapi.components.as_ref().expect("components").schemas;

        assert!(schemas.contains_key("ErrorBody"));
        assert!(schemas.contains_key("Article"));
        assert!(schemas.contains_key("CreateArticleBody"));
    }

    #[test]
    fn openapi_declares_user_identity_scheme() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key("userId"));
    }
}
