//! Port abstraction for card-store adapters and their errors.

use async_trait::async_trait;

use crate::domain::card::{Card, CardId};
use crate::domain::user::UserId;

/// Persistence errors raised by card-store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardStoreError {
    /// Store connection could not be established.
    #[error("card store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("card store query failed: {message}")]
    Query { message: String },
}

impl CardStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for card persistence.
///
/// Like-set mutations are atomic per card: two users liking the same card
/// concurrently must both end up in the set. Adapters provide this either
/// through single-statement SQL upserts or a write lock over the card map.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Persist a freshly published card.
    async fn insert(&self, card: &Card) -> Result<(), CardStoreError>;

    /// All cards in creation order.
    async fn list(&self) -> Result<Vec<Card>, CardStoreError>;

    /// Fetch a card by identifier.
    async fn find_by_id(&self, id: CardId) -> Result<Option<Card>, CardStoreError>;

    /// Remove a card. Returns whether a card was actually deleted.
    async fn delete(&self, id: CardId) -> Result<bool, CardStoreError>;

    /// Atomically add `user` to the card's like set; adding a present id is a
    /// no-op. Returns the updated card, or `None` when the id is unknown.
    async fn add_like(&self, id: CardId, user: UserId) -> Result<Option<Card>, CardStoreError>;

    /// Atomically remove `user` from the card's like set; removing an absent
    /// id is a no-op. Returns the updated card, or `None` when the id is
    /// unknown.
    async fn remove_like(&self, id: CardId, user: UserId) -> Result<Option<Card>, CardStoreError>;
}
