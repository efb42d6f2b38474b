//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Email uniqueness rides on the `UNIQUE` column: a concurrent duplicate
//! registration surfaces as a unique violation, which this adapter maps to
//! [`UserStoreError::DuplicateEmail`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{CredentialRecord, UserRepository, UserStoreError};
use crate::domain::user::{Email, ProfileAbout, ProfileName, User, UserId};
use crate::domain::web_url::WebUrl;

use super::models::{NewUserRow, UserRow, credential_record_from_row, user_from_row};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserStoreError {
    UserStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> UserStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            // The only unique constraint on users is the email column.
            UserStoreError::DuplicateEmail
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection error")
        }
        _ => UserStoreError::query("database error"),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &CredentialRecord) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user = &record.user;
        let row = NewUserRow {
            id: user.id().as_uuid(),
            email: user.email().as_str(),
            password_hash: record.password_hash.as_str(),
            name: user.name().as_ref(),
            about: user.about().as_ref(),
            avatar_url: user.avatar().as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<CredentialRecord>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(credential_record_from_row).transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        name: &ProfileName,
        about: &ProfileAbout,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set((
                users::name.eq(name.as_ref()),
                users::about.eq(about.as_ref()),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_avatar(
        &self,
        id: UserId,
        avatar: &WebUrl,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set(users::avatar_url.eq(avatar.as_str()))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(user_from_row).transpose()
    }
}
