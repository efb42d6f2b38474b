//! Access-token cookie handling and the authenticated-caller extractor.
//!
//! The token travels in an HTTP-only cookie named `jwt`. Protected handlers
//! declare a [`CurrentUser`] argument; extraction verifies the cookie before
//! the handler body runs, so a failed verification short-circuits into a 401
//! response and no downstream code executes.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::{Error, UserId};

use super::state::HttpState;

/// Name of the cookie carrying the access token.
pub const AUTH_COOKIE: &str = "jwt";

/// Attributes applied to the `jwt` cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    secure: bool,
    same_site: SameSite,
    max_age: time::Duration,
}

impl CookieSettings {
    /// Construct cookie settings.
    pub fn new(secure: bool, same_site: SameSite, max_age: time::Duration) -> Self {
        Self {
            secure,
            same_site,
            max_age,
        }
    }

    fn build(&self, value: String, max_age: time::Duration) -> Cookie<'static> {
        Cookie::build(AUTH_COOKIE, value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(max_age)
            .finish()
    }
}

/// Cookie carrying a freshly issued token.
pub fn auth_cookie(token: String, settings: &CookieSettings) -> Cookie<'static> {
    settings.build(token, settings.max_age)
}

/// Cookie overwriting the stored token with an immediately expiring value.
pub fn expired_auth_cookie(settings: &CookieSettings) -> Cookie<'static> {
    settings.build(String::new(), time::Duration::ZERO)
}

/// Authenticated caller identity derived from the `jwt` cookie.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(UserId);

impl CurrentUser {
    /// The verified user id.
    pub fn id(&self) -> UserId {
        self.0
    }
}

fn extract_user(req: &HttpRequest) -> Result<CurrentUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    let cookie = req
        .cookie(AUTH_COOKIE)
        .ok_or_else(|| Error::unauthorized("authorisation required"))?;
    let user_id = state.tokens.verify(cookie.value())?;
    Ok(CurrentUser(user_id))
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}
