//! Idempotent schema bootstrap executed at startup.
//!
//! Each statement is `IF NOT EXISTS`-guarded so repeated startups are safe.
//! The statements must stay in step with the definitions in `schema`.

use diesel::sql_query;
use diesel_async::RunQueryDsl;

use super::pool::{DbPool, PoolError};

/// Errors raised while preparing the database schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    /// The pool could not provide a connection.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// A schema statement failed to execute.
    #[error("schema statement failed: {message}")]
    Statement { message: String },
}

const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email VARCHAR(254) NOT NULL UNIQUE,
        password_hash VARCHAR(100) NOT NULL,
        name VARCHAR(30) NOT NULL,
        about VARCHAR(30) NOT NULL,
        avatar_url VARCHAR(2048) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS cards (
        id UUID PRIMARY KEY,
        name VARCHAR(30) NOT NULL,
        link VARCHAR(2048) NOT NULL,
        owner_id UUID NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS card_likes (
        card_id UUID NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        PRIMARY KEY (card_id, user_id)
    )",
];

/// Create the tables this service needs if they are not present yet.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), BootstrapError> {
    let mut conn = pool.get().await?;
    for statement in SCHEMA_STATEMENTS {
        sql_query(*statement)
            .execute(&mut conn)
            .await
            .map_err(|err| BootstrapError::Statement {
                message: err.to_string(),
            })?;
    }
    tracing::debug!("database schema is in place");
    Ok(())
}
