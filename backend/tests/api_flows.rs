//! End-to-end flows over the real app factory, backed by in-memory stores.

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::{Value, json};

use mesto_backend::inbound::http::health::HealthState;
use mesto_backend::server::{ServerConfig, build_app, build_state};

fn config() -> ServerConfig {
    ServerConfig::new(b"integration-secret".to_vec(), ([127, 0, 0, 1], 0).into())
        .with_cookie_secure(false)
}

async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let state = web::Data::new(build_state(&config()));
    test::init_service(build_app(state, web::Data::new(HealthState::new()))).await
}

async fn register_and_login<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
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
    assert_eq!(signup.status(), StatusCode::CREATED);

    let signin = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(signin.status(), StatusCode::OK);

    signin
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "jwt")
        .map(|cookie| cookie.into_owned())
        .unwrap_or_else(|| panic!("jwt cookie missing for {email}"))
}

async fn json_body(res: ServiceResponse) -> Value {
    serde_json::from_slice(&test::read_body(res).await).expect("json body")
}

#[actix_web::test]
async fn publish_like_and_owner_delete_flow() {
    let app = app().await;

    let cookie_a = register_and_login(&app, "a@x.com", "pw1").await;
    let cookie_b = register_and_login(&app, "b@x.com", "pw2").await;

    let me_a = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/me")
            .cookie(cookie_a.clone())
            .to_request(),
    )
    .await;
    let me_a = json_body(me_a).await;
    let id_a = me_a["id"].as_str().expect("user id").to_owned();

    let me_b = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/me")
            .cookie(cookie_b.clone())
            .to_request(),
    )
    .await;
    let me_b = json_body(me_b).await;
    let id_b = me_b["id"].as_str().expect("user id").to_owned();

    // User a publishes a card; it belongs to a and starts unliked.
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cards")
            .cookie(cookie_a.clone())
            .set_json(json!({ "name": "Peaks", "link": "http://x/y.png" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let card = json_body(created).await;
    assert_eq!(card["owner"], Value::from(id_a.clone()));
    assert_eq!(card["likes"], json!([]));
    let card_id = card["id"].as_str().expect("card id").to_owned();

    // User b likes it.
    let liked = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/cards/{card_id}/likes"))
            .cookie(cookie_b.clone())
            .to_request(),
    )
    .await;
    assert_eq!(liked.status(), StatusCode::OK);
    let liked = json_body(liked).await;
    assert_eq!(liked["likes"], json!([id_b]));

    // Only the owner can delete it.
    let forbidden = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/cards/{card_id}"))
            .cookie(cookie_b)
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/cards/{card_id}"))
            .cookie(cookie_a.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    // Repeat delete: the card is gone.
    let missing = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/cards/{card_id}"))
            .cookie(cookie_a)
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn protected_routes_disclose_nothing_without_a_cookie() {
    let app = app().await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/users/me").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert!(body.get("email").is_none());

    let res = test::call_service(&app, test::TestRequest::get().uri("/cards").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn second_registration_with_a_used_email_conflicts() {
    let app = app().await;
    register_and_login(&app, "a@x.com", "pw1").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "email": "a@x.com", "password": "other" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn unmatched_routes_return_the_json_not_found_envelope() {
    let app = app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/no/such/route").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = json_body(res).await;
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn logout_clears_the_cookie_and_tokens_keep_working_until_expiry() {
    let app = app().await;
    let cookie = register_and_login(&app, "a@x.com", "pw1").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res
        .response()
        .cookies()
        .find(|c| c.name() == "jwt")
        .expect("jwt cookie present");
    assert_eq!(cleared.value(), "");

    // Stateless tokens: the old token itself still verifies until expiry.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
