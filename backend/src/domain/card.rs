//! Card data model.
//!
//! A card is an image shared by one user and likeable by all users. The like
//! set is membership-only; adding a present id or removing an absent one is a
//! no-op by construction.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;
use super::web_url::WebUrl;

/// Minimum length for a card name.
pub const CARD_NAME_MIN: usize = 2;
/// Maximum length for a card name.
pub const CARD_NAME_MAX: usize = 30;

/// Validation errors returned by the card value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    /// The identifier does not parse as a UUID.
    InvalidId,
    /// `name` is outside the allowed length range.
    NameLength { min: usize, max: usize },
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "card id must be a valid UUID"),
            Self::NameLength { min, max } => {
                write!(f, "name must be between {min} and {max} characters")
            }
        }
    }
}

impl std::error::Error for CardValidationError {}

/// Stable card identifier stored as a UUID.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
pub struct CardId(Uuid);

impl CardId {
    /// Generate a new random [`CardId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a [`CardId`] from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, CardValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| CardValidationError::InvalidId)
    }

    /// Wrap an already-validated UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Card caption (2–30 characters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardName(String);

impl CardName {
    /// Validate and construct a [`CardName`] from owned input.
    pub fn new(raw: impl Into<String>) -> Result<Self, CardValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if !(CARD_NAME_MIN..=CARD_NAME_MAX).contains(&length) {
            return Err(CardValidationError::NameLength {
                min: CARD_NAME_MIN,
                max: CARD_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CardName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CardName> for String {
    fn from(value: CardName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CardName {
    type Error = CardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A published image card.
///
/// ## Invariants
/// - `owner` is set once at creation and never changes.
/// - `likes` is a set of user ids; no duplicates, no ordering guarantees
///   beyond the deterministic serialization order of the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    id: CardId,
    #[schema(value_type = String, example = "Peaks")]
    name: CardName,
    #[schema(value_type = String, example = "https://example.com/peaks.png")]
    link: WebUrl,
    owner: UserId,
    #[schema(value_type = Vec<String>)]
    likes: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
}

impl Card {
    /// Build a freshly published card with an empty like set.
    pub fn new(
        id: CardId,
        name: CardName,
        link: WebUrl,
        owner: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            link,
            owner,
            likes: BTreeSet::new(),
            created_at,
        }
    }

    /// Reassemble a card from stored parts.
    pub fn from_parts(
        id: CardId,
        name: CardName,
        link: WebUrl,
        owner: UserId,
        likes: BTreeSet<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            link,
            owner,
            likes,
            created_at,
        }
    }

    /// Stable card identifier.
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Card caption.
    pub fn name(&self) -> &CardName {
        &self.name
    }

    /// Image address.
    pub fn link(&self) -> &WebUrl {
        &self.link
    }

    /// The publishing user; holds exclusive delete rights.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Users who have liked this card.
    pub fn likes(&self) -> &BTreeSet<UserId> {
        &self.likes
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `user` holds delete rights over this card.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Add `user` to the like set. Returns `false` when already present.
    pub fn add_like(&mut self, user: UserId) -> bool {
        self.likes.insert(user)
    }

    /// Remove `user` from the like set. Returns `false` when absent.
    pub fn remove_like(&mut self, user: UserId) -> bool {
        self.likes.remove(&user)
    }
}
