//! User profile endpoints.
//!
//! Profile mutations never take an id parameter: they always apply to the
//! authenticated caller's own record.

use actix_web::{HttpResponse, get, patch, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ApiResult, Error, ProfileAbout, ProfileName, User, WebUrl};

use super::session::CurrentUser;
use super::state::HttpState;
use super::validation::{FieldName, field_error, parse_user_id};

/// Request body for `PATCH /users/me`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    /// New display name (2–30 characters).
    pub name: Option<String>,
    /// New bio (2–30 characters).
    pub about: Option<String>,
}

/// Request body for `PATCH /users/me/avatar`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateAvatarRequest {
    /// New avatar address.
    pub avatar: String,
}

/// The authenticated caller's own profile.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<User>> {
    state.accounts.user_by_id(user.id()).await.map(web::Json)
}

/// A user's public profile by id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "userById"
)]
#[get("/users/{id}")]
pub async fn user_by_id(
    state: web::Data<HttpState>,
    _caller: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    state.accounts.user_by_id(id).await.map(web::Json)
}

/// Update the caller's name and/or bio.
#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/users/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<User>> {
    let payload = payload.into_inner();
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

    state
        .accounts
        .update_profile(user.id(), name, about)
        .await
        .map(web::Json)
}

/// Update the caller's avatar.
#[utoipa::path(
    patch,
    path = "/users/me/avatar",
    request_body = UpdateAvatarRequest,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateAvatar"
)]
#[patch("/users/me/avatar")]
pub async fn update_avatar(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<UpdateAvatarRequest>,
) -> ApiResult<web::Json<User>> {
    let avatar = WebUrl::new(&payload.avatar)
        .map_err(|err| field_error(FieldName::new("avatar"), err.to_string()))?;
    state
        .accounts
        .update_avatar(user.id(), avatar)
        .await
        .map(web::Json)
}
