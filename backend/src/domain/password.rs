//! Password hashing behind a small seam.
//!
//! bcrypt digests are self-describing (algorithm, cost, and salt travel in
//! the digest string), so verification needs nothing beyond the stored value.
//! Plaintext never leaves the functions in this module.

use std::fmt;

/// Default bcrypt cost used for new registrations.
pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Errors raised while hashing or verifying a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Hashing the plaintext failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// The stored digest could not be processed.
    #[error("password verification failed: {message}")]
    Verify { message: String },
}

/// An opaque bcrypt digest.
///
/// Deliberately implements neither `Serialize` nor `Display`; the digest must
/// never appear in responses or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest loaded from a store.
    pub fn from_digest(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The digest in its storable textual form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(…)")
    }
}

/// Hash `plaintext` with the given bcrypt cost.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<PasswordHash, PasswordHashError> {
    bcrypt::hash(plaintext, cost)
        .map(PasswordHash)
        .map_err(|err| PasswordHashError::Hash {
            message: err.to_string(),
        })
}

/// Check `plaintext` against a stored digest.
pub fn verify_password(plaintext: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
    bcrypt::verify(plaintext, hash.as_str()).map_err(|err| PasswordHashError::Verify {
        message: err.to_string(),
    })
}
