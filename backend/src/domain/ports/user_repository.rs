//! Port abstraction for credential-store adapters and their errors.
//!
//! The credential store is the only place a password hash exists. Adapters
//! enforce email uniqueness at their own boundary so concurrent registrations
//! cannot race past a service-level check.

use async_trait::async_trait;

use crate::domain::password::PasswordHash;
use crate::domain::user::{Email, ProfileAbout, ProfileName, User, UserId};
use crate::domain::web_url::WebUrl;

/// Persistence errors raised by credential-store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    /// Store connection could not be established.
    #[error("user store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query { message: String },
    /// The email is already registered to another user.
    #[error("email is already registered")]
    DuplicateEmail,
}

impl UserStoreError {
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

/// A user record together with its credential digest.
///
/// Never crosses the inbound boundary; HTTP responses serialize [`User`]
/// only.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// The user as exposed through the API.
    pub user: User,
    /// bcrypt digest checked during login.
    pub password_hash: PasswordHash,
}

/// Port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Fails with [`UserStoreError::DuplicateEmail`] when
    /// the email is already taken.
    async fn insert(&self, record: &CredentialRecord) -> Result<(), UserStoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError>;

    /// Fetch the credential record for a login attempt.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<CredentialRecord>, UserStoreError>;

    /// Replace the profile fields of an existing user, returning the updated
    /// user or `None` when the id is unknown.
    async fn update_profile(
        &self,
        id: UserId,
        name: &ProfileName,
        about: &ProfileAbout,
    ) -> Result<Option<User>, UserStoreError>;

    /// Replace the avatar of an existing user, returning the updated user or
    /// `None` when the id is unknown.
    async fn update_avatar(
        &self,
        id: UserId,
        avatar: &WebUrl,
    ) -> Result<Option<User>, UserStoreError>;
}
