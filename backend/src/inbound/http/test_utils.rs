//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::Duration;
use serde_json::json;

use crate::domain::{AccountService, CardService, TokenSigner};
use crate::outbound::persistence::{MemoryCardRepository, MemoryUserRepository};

use super::session::{AUTH_COOKIE, CookieSettings};
use super::state::HttpState;

/// Minimum bcrypt cost, to keep handler tests fast.
const TEST_HASH_COST: u32 = 4;

/// Build handler state over fresh in-memory stores.
pub fn test_state() -> web::Data<HttpState> {
    let users = Arc::new(MemoryUserRepository::default());
    let cards = Arc::new(MemoryCardRepository::default());

    let accounts = Arc::new(AccountService::new(users.clone()).with_hash_cost(TEST_HASH_COST));
    let card_service = Arc::new(CardService::new(cards, users));
    let tokens = Arc::new(TokenSigner::new(b"test-signing-secret", Duration::days(7)));
    let cookies = CookieSettings::new(false, SameSite::Lax, time::Duration::days(7));

    web::Data::new(HttpState::new(accounts, card_service, tokens, cookies))
}

/// Build an app exposing the full route table over the given state.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
> {
    crate::server::build_app(state, web::Data::new(super::health::HealthState::new()))
}

/// Register `email` and sign in, returning the issued `jwt` cookie.
pub async fn signup_and_signin<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let signup = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert!(signup.status().is_success(), "signup failed for {email}");

    let signin = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert!(signin.status().is_success(), "signin failed for {email}");

    signin
        .response()
        .cookies()
        .find(|cookie| cookie.name() == AUTH_COOKIE)
        .map(|cookie| cookie.into_owned())
        .unwrap_or_else(|| panic!("jwt cookie missing for {email}"))
}
