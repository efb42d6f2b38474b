//! Authentication primitives: login credentials and registration payloads.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service. Plaintext
//! passwords are held in [`Zeroizing`] wrappers and wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, ProfileAbout, ProfileName, UserValidationError};
use super::web_url::WebUrl;

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// The email is missing or malformed.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` satisfies the [`Email`] invariants.
/// - `password` is non-empty but otherwise kept exactly as provided, to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: Email,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email suitable for credential lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload: credentials plus optional profile fields.
///
/// Missing profile fields are filled with the documented defaults by the
/// account service, not here, so this type reflects exactly what the caller
/// sent.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Login credentials for the new account.
    pub credentials: Credentials,
    /// Optional display name.
    pub name: Option<ProfileName>,
    /// Optional bio.
    pub about: Option<ProfileAbout>,
    /// Optional avatar address.
    pub avatar: Option<WebUrl>,
}

impl Registration {
    /// Registration with credentials only; profile fields default later.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            name: None,
            about: None,
            avatar: None,
        }
    }
}
