//! PostgreSQL-backed `CardRepository` implementation using Diesel.
//!
//! Like toggles are single statements (`INSERT … ON CONFLICT DO NOTHING` and
//! a keyed `DELETE`), so concurrent likes from different users cannot lose
//! updates. The card is re-read afterwards to return the current like set.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::card::{Card, CardId};
use crate::domain::ports::{CardRepository, CardStoreError};
use crate::domain::user::UserId;

use super::models::{CardLikeRow, CardRow, NewCardRow, card_from_row};
use super::pool::{DbPool, PoolError};
use super::schema::{card_likes, cards};

/// Diesel-backed implementation of the `CardRepository` port.
#[derive(Clone)]
pub struct DieselCardRepository {
    pool: DbPool,
}

impl DieselCardRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_card(
        &self,
        conn: &mut diesel_async::pooled_connection::bb8::PooledConnection<
            '_,
            diesel_async::AsyncPgConnection,
        >,
        id: CardId,
    ) -> Result<Option<Card>, CardStoreError> {
        let row: Option<CardRow> = cards::table
            .find(id.as_uuid())
            .select(CardRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let likes: Vec<Uuid> = card_likes::table
            .filter(card_likes::card_id.eq(id.as_uuid()))
            .select(card_likes::user_id)
            .load(conn)
            .await
            .map_err(map_diesel_error)?;

        card_from_row(row, likes).map(Some)
    }
}

fn map_pool_error(error: PoolError) -> CardStoreError {
    CardStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> CardStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CardStoreError::connection("database connection error")
        }
        _ => CardStoreError::query("database error"),
    }
}

fn is_foreign_key_violation(error: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

#[async_trait]
impl CardRepository for DieselCardRepository {
    async fn insert(&self, card: &Card) -> Result<(), CardStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCardRow {
            id: card.id().as_uuid(),
            name: card.name().as_ref(),
            link: card.link().as_str(),
            owner_id: card.owner().as_uuid(),
            created_at: card.created_at(),
        };

        diesel::insert_into(cards::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Card>, CardStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CardRow> = cards::table
            .order(cards::created_at.asc())
            .select(CardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let like_rows: Vec<CardLikeRow> = card_likes::table
            .filter(card_likes::card_id.eq_any(ids))
            .select(CardLikeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut likes_by_card: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for like in like_rows {
            likes_by_card.entry(like.card_id).or_default().push(like.user_id);
        }

        rows.into_iter()
            .map(|row| {
                let likes = likes_by_card.remove(&row.id).unwrap_or_default();
                card_from_row(row, likes)
            })
            .collect()
    }

    async fn find_by_id(&self, id: CardId) -> Result<Option<Card>, CardStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        self.load_card(&mut conn, id).await
    }

    async fn delete(&self, id: CardId) -> Result<bool, CardStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Like rows go with the card via ON DELETE CASCADE.
        let deleted = diesel::delete(cards::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn add_like(&self, id: CardId, user: UserId) -> Result<Option<Card>, CardStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = CardLikeRow {
            card_id: id.as_uuid(),
            user_id: user.as_uuid(),
        };
        let inserted = diesel::insert_into(card_likes::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await;

        match inserted {
            Ok(_) => {}
            // The card vanished between routing and the insert.
            Err(err) if is_foreign_key_violation(&err) => return Ok(None),
            Err(err) => return Err(map_diesel_error(err)),
        }

        self.load_card(&mut conn, id).await
    }

    async fn remove_like(&self, id: CardId, user: UserId) -> Result<Option<Card>, CardStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            card_likes::table
                .filter(card_likes::card_id.eq(id.as_uuid()))
                .filter(card_likes::user_id.eq(user.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        self.load_card(&mut conn, id).await
    }
}
