//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the shared schemas. Swagger
//! UI serves the generated document in debug builds under `/docs`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Card, Error, ErrorCode, User};
use crate::inbound::http::auth::{SigninRequest, SignupRequest};
use crate::inbound::http::cards::CreateCardRequest;
use crate::inbound::http::users::{UpdateAvatarRequest, UpdateProfileRequest};

/// Enrich the generated document with the token cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "TokenCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "jwt",
                "Signed access token issued by POST /signin.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mesto backend API",
        description = "Photo-sharing REST API: cookie-authenticated users, \
                       profiles, and shared image cards."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::signin,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::user_by_id,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::update_avatar,
        crate::inbound::http::cards::list_cards,
        crate::inbound::http::cards::create_card,
        crate::inbound::http::cards::delete_card,
        crate::inbound::http::cards::like_card,
        crate::inbound::http::cards::unlike_card,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Card,
        Error,
        ErrorCode,
        SignupRequest,
        SigninRequest,
        UpdateProfileRequest,
        UpdateAvatarRequest,
        CreateCardRequest,
    )),
    tags(
        (name = "auth", description = "Registration and session endpoints"),
        (name = "users", description = "Profile operations"),
        (name = "cards", description = "Shared image cards"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn document_builds_and_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/signup",
            "/signin",
            "/logout",
            "/users/me",
            "/users/{id}",
            "/users/me/avatar",
            "/cards",
            "/cards/{id}",
            "/cards/{id}/likes",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(expected), "missing path: {expected}");
        }
    }

    #[test]
    fn token_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("TokenCookie"));
    }
}
