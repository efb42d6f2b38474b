//! Card endpoints: listing, publishing, deletion, and the like toggle.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{ApiResult, Card, CardName, Error, WebUrl};

use super::session::CurrentUser;
use super::state::HttpState;
use super::validation::{FieldName, field_error, parse_card_id};

/// Request body for `POST /cards`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateCardRequest {
    /// Card caption (2–30 characters).
    pub name: String,
    /// Image address.
    pub link: String,
}

/// All cards, shared across users, in creation order.
#[utoipa::path(
    get,
    path = "/cards",
    responses(
        (status = 200, description = "Cards", body = [Card]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["cards"],
    operation_id = "listCards"
)]
#[get("/cards")]
pub async fn list_cards(
    state: web::Data<HttpState>,
    _caller: CurrentUser,
) -> ApiResult<web::Json<Vec<Card>>> {
    state.cards.list().await.map(web::Json)
}

/// Publish a new card owned by the caller.
#[utoipa::path(
    post,
    path = "/cards",
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card created", body = Card),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["cards"],
    operation_id = "createCard"
)]
#[post("/cards")]
pub async fn create_card(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    payload: web::Json<CreateCardRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let name = CardName::new(payload.name)
        .map_err(|err| field_error(FieldName::new("name"), err.to_string()))?;
    let link = WebUrl::new(&payload.link)
        .map_err(|err| field_error(FieldName::new("link"), err.to_string()))?;

    let card = state.cards.publish(caller.id(), name, link).await?;
    Ok(HttpResponse::Created().json(card))
}

/// Delete a card; owner only.
#[utoipa::path(
    delete,
    path = "/cards/{id}",
    params(("id" = String, Path, description = "Card identifier")),
    responses(
        (status = 200, description = "Card deleted"),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the card", body = Error),
        (status = 404, description = "Unknown card", body = Error)
    ),
    tags = ["cards"],
    operation_id = "deleteCard"
)]
#[delete("/cards/{id}")]
pub async fn delete_card(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_card_id(&path.into_inner(), FieldName::new("id"))?;
    state.cards.remove(id, caller.id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "card deleted" })))
}

/// Add the caller's like to a card. Idempotent.
#[utoipa::path(
    put,
    path = "/cards/{id}/likes",
    params(("id" = String, Path, description = "Card identifier")),
    responses(
        (status = 200, description = "Updated card", body = Card),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown card", body = Error)
    ),
    tags = ["cards"],
    operation_id = "likeCard"
)]
#[put("/cards/{id}/likes")]
pub async fn like_card(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Card>> {
    let id = parse_card_id(&path.into_inner(), FieldName::new("id"))?;
    state.cards.like(id, caller.id()).await.map(web::Json)
}

/// Remove the caller's like from a card. Idempotent.
#[utoipa::path(
    delete,
    path = "/cards/{id}/likes",
    params(("id" = String, Path, description = "Card identifier")),
    responses(
        (status = 200, description = "Updated card", body = Card),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown card", body = Error)
    ),
    tags = ["cards"],
    operation_id = "unlikeCard"
)]
#[delete("/cards/{id}/likes")]
pub async fn unlike_card(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Card>> {
    let id = parse_card_id(&path.into_inner(), FieldName::new("id"))?;
    state.cards.unlike(id, caller.id()).await.map(web::Json)
}
