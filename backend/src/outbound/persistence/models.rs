//! Internal Diesel row structs and row-to-domain conversions.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion back into domain types re-runs
//! the value-type validators: a row that no longer satisfies the domain
//! invariants is reported as a store error instead of leaking bad data.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::card::{Card, CardName};
use crate::domain::ports::{CardStoreError, CredentialRecord, UserStoreError};
use crate::domain::user::{Email, ProfileAbout, ProfileName, User, UserId};
use crate::domain::web_url::WebUrl;
use crate::domain::{CardId, PasswordHash};

use super::schema::{card_likes, cards, users};

/// Row struct for reading from the users table.
///
/// `created_at` is deliberately not selected: it is an audit column with no
/// domain counterpart.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub about: String,
    pub avatar_url: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub about: &'a str,
    pub avatar_url: &'a str,
}

/// Row struct for reading from the cards table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CardRow {
    pub id: Uuid,
    pub name: String,
    pub link: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new card records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub(crate) struct NewCardRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub link: &'a str,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Like-set membership row; read and written as-is.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = card_likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CardLikeRow {
    pub card_id: Uuid,
    pub user_id: Uuid,
}

fn invalid_user_row(error: impl std::fmt::Display) -> UserStoreError {
    UserStoreError::query(format!("stored user record is invalid: {error}"))
}

/// Convert a users row into the API-facing [`User`].
pub(crate) fn user_from_row(row: &UserRow) -> Result<User, UserStoreError> {
    let email = Email::new(&row.email).map_err(invalid_user_row)?;
    let name = ProfileName::new(row.name.as_str()).map_err(invalid_user_row)?;
    let about = ProfileAbout::new(row.about.as_str()).map_err(invalid_user_row)?;
    let avatar = WebUrl::new(&row.avatar_url).map_err(invalid_user_row)?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        name,
        about,
        avatar,
    ))
}

/// Convert a users row into a [`CredentialRecord`] for login checks.
pub(crate) fn credential_record_from_row(row: UserRow) -> Result<CredentialRecord, UserStoreError> {
    let user = user_from_row(&row)?;
    Ok(CredentialRecord {
        user,
        password_hash: PasswordHash::from_digest(row.password_hash),
    })
}

/// Convert a cards row plus its like rows into a [`Card`].
pub(crate) fn card_from_row(row: CardRow, likes: Vec<Uuid>) -> Result<Card, CardStoreError> {
    let name = CardName::new(row.name)
        .map_err(|err| CardStoreError::query(format!("stored card record is invalid: {err}")))?;
    let link = WebUrl::new(&row.link)
        .map_err(|err| CardStoreError::query(format!("stored card record is invalid: {err}")))?;
    let likes: BTreeSet<UserId> = likes.into_iter().map(UserId::from_uuid).collect();
    Ok(Card::from_parts(
        CardId::from_uuid(row.id),
        name,
        link,
        UserId::from_uuid(row.owner_id),
        likes,
        row.created_at,
    ))
}
