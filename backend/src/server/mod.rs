//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, HttpServer, http::header, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{AccountService, ApiResult, CardService, Error, TokenSigner};
use crate::inbound::http::auth::{logout, signin, signup};
use crate::inbound::http::cards::{create_card, delete_card, like_card, list_cards, unlike_card};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::session::CookieSettings;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{current_user, update_avatar, update_profile, user_by_id};
use crate::middleware::trace::Trace;
use crate::outbound::persistence::{
    DieselCardRepository, DieselUserRepository, MemoryCardRepository, MemoryUserRepository,
};

/// Assemble handler state from the configuration, choosing PostgreSQL or
/// in-memory adapters depending on whether a pool is attached.
pub fn build_state(config: &ServerConfig) -> HttpState {
    let tokens = Arc::new(TokenSigner::new(&config.secret, config.token_ttl));
    let cookies = CookieSettings::new(
        config.cookie_secure,
        config.same_site,
        cookie_max_age(config.token_ttl),
    );

    match &config.db_pool {
        Some(pool) => {
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let cards = Arc::new(DieselCardRepository::new(pool.clone()));
            HttpState::new(
                Arc::new(AccountService::new(users.clone())),
                Arc::new(CardService::new(cards, users)),
                tokens,
                cookies,
            )
        }
        None => {
            let users = Arc::new(MemoryUserRepository::default());
            let cards = Arc::new(MemoryCardRepository::default());
            HttpState::new(
                Arc::new(AccountService::new(users.clone())),
                Arc::new(CardService::new(cards, users)),
                tokens,
                cookies,
            )
        }
    }
}

fn cookie_max_age(ttl: chrono::Duration) -> actix_web::cookie::time::Duration {
    actix_web::cookie::time::Duration::seconds(ttl.num_seconds())
}

async fn unmatched() -> ApiResult<HttpResponse> {
    Err(Error::not_found("requested endpoint does not exist"))
}

/// Build the application with the full route table.
///
/// Exposed so integration tests can drive the exact production routing;
/// CORS is layered on in [`create_server`] because it is per-deployment
/// configuration.
pub fn build_app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
> {
    let mut app = App::new()
        .app_data(state)
        .app_data(health_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(signup)
        .service(signin)
        .service(logout)
        .service(current_user)
        .service(update_profile)
        .service(update_avatar)
        .service(user_by_id)
        .service(list_cards)
        .service(create_card)
        .service(delete_card)
        .service(like_card)
        .service(unlike_card)
        .service(ready)
        .service(live)
        .default_service(web::route().to(unmatched));

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}

fn cors_from(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600);
    for origin in origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

/// Construct an Actix HTTP server from the configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let state = web::Data::new(build_state(&config));
    let allowed_origins = config.allowed_origins.clone();
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(state.clone(), server_health_state.clone()).wrap(cors_from(&allowed_origins))
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
