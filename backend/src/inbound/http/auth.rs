//! Authentication endpoints: signup, signin, logout.
//!
//! `POST /signup` and `POST /signin` are the only routes outside the
//! protected group. Signin answers with a `Set-Cookie` carrying the signed
//! token; logout overwrites that cookie with an immediately expiring one,
//! since stateless tokens have no server-side revocation list.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    ApiResult, Credentials, CredentialsValidationError, Error, ProfileAbout, ProfileName,
    Registration, User, WebUrl,
};

use super::session::{CurrentUser, auth_cookie, expired_auth_cookie};
use super::state::HttpState;
use super::validation::{FieldName, field_error};

/// Request body for `POST /signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SignupRequest {
    /// Login identifier; must be unique.
    pub email: String,
    /// Plaintext password; hashed before storage, never persisted or logged.
    pub password: String,
    /// Optional display name (2–30 characters).
    pub name: Option<String>,
    /// Optional bio (2–30 characters).
    pub about: Option<String>,
    /// Optional avatar address.
    pub avatar: Option<String>,
}

/// Request body for `POST /signin`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SigninRequest {
    /// Login identifier.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

pub(crate) fn map_credentials_error(err: &CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::Email(inner) => {
            field_error(FieldName::new("email"), inner.to_string())
        }
        CredentialsValidationError::EmptyPassword => {
            field_error(FieldName::new("password"), err.to_string())
        }
    }
}

fn parse_registration(payload: SignupRequest) -> ApiResult<Registration> {
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| map_credentials_error(&err))?;

    let name = payload
        .name
        .map(|raw| {
            ProfileName::new(raw).map_err(|err| field_error(FieldName::new("name"), err.to_string()))
        })
        .transpose()?;
    let about = payload
        .about
        .map(|raw| {
            ProfileAbout::new(raw)
                .map_err(|err| field_error(FieldName::new("about"), err.to_string()))
        })
        .transpose()?;
    let avatar = payload
        .avatar
        .map(|raw| {
            WebUrl::new(raw).map_err(|err| field_error(FieldName::new("avatar"), err.to_string()))
        })
        .transpose()?;

    Ok(Registration {
        credentials,
        name,
        about,
        avatar,
    })
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_registration(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and receive the `jwt` cookie.
#[utoipa::path(
    post,
    path = "/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Login success", body = User,
            headers(("Set-Cookie" = String, description = "HTTP-only `jwt` cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect email or password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signin",
    security([])
)]
#[post("/signin")]
pub async fn signin(
    state: web::Data<HttpState>,
    payload: web::Json<SigninRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| map_credentials_error(&err))?;

    let user = state.accounts.login(&credentials).await?;
    let token = state.tokens.issue(user.id())?;

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(token, &state.cookies))
        .json(user))
}

/// Discard the session by expiring the `jwt` cookie.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Cookie cleared"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(expired_auth_cookie(&state.cookies))
        .json(json!({ "message": "signed out" })))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::inbound::http::session::AUTH_COOKIE;
    use crate::inbound::http::test_utils::{signup_and_signin, test_app, test_state};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[actix_web::test]
    async fn signup_returns_the_created_user_without_credentials() {
        let app = actix_test::init_service(test_app(test_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signup")
                .set_json(json!({
                    "email": "a@x.com",
                    "password": "pw1",
                    "name": "Ada Lovelace"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("json body");
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["name"], "Ada Lovelace");
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
    }

    #[rstest]
    #[case(json!({ "email": "not-an-email", "password": "pw1" }), "email")]
    #[case(json!({ "email": "a@x.com", "password": "" }), "password")]
    #[case(json!({ "email": "a@x.com", "password": "pw1", "name": "x" }), "name")]
    #[case(json!({ "email": "a@x.com", "password": "pw1", "about": "x" }), "about")]
    #[case(json!({ "email": "a@x.com", "password": "pw1", "avatar": "nope" }), "avatar")]
    #[actix_web::test]
    async fn signup_validation_failures_name_the_offending_field(
        #[case] payload: Value,
        #[case] field: &str,
    ) {
        let app = actix_test::init_service(test_app(test_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signup")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("json body");
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn duplicate_signup_conflicts() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let payload = json!({ "email": "a@x.com", "password": "pw1" });

        let first = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signup")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signup")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn signin_sets_the_jwt_cookie() {
        let state = test_state();
        let app = actix_test::init_service(test_app(state)).await;

        let cookie = signup_and_signin(&app, "a@x.com", "pw1").await;
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert!(!cookie.value().is_empty());
    }

    #[actix_web::test]
    async fn signin_with_wrong_password_is_unauthorised() {
        let app = actix_test::init_service(test_app(test_state())).await;

        let signup_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signup")
                .set_json(json!({ "email": "a@x.com", "password": "pw1" }))
                .to_request(),
        )
        .await;
        assert!(signup_res.status().is_success());

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signin")
                .set_json(json!({ "email": "a@x.com", "password": "wrong" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("json body");
        assert_eq!(body["message"], "incorrect email or password");
    }

    #[actix_web::test]
    async fn logout_expires_the_cookie() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let cookie = signup_and_signin(&app, "a@x.com", "pw1").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let cleared = res
            .response()
            .cookies()
            .find(|c| c.name() == AUTH_COOKIE)
            .expect("jwt cookie present");
        assert_eq!(cleared.value(), "");
        assert_eq!(
            cleared.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );
    }

    #[actix_web::test]
    async fn logout_without_a_token_is_unauthorised() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/logout").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_json_bodies_map_to_the_error_envelope() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signup")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("json body");
        assert_eq!(body["code"], "invalid_request");
    }
}
