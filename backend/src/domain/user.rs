//! User data model.
//!
//! Profile fields are validated value types so a [`User`] can only be built
//! from data that already satisfies the length and format constraints the API
//! promises. Credential material (the password hash) deliberately lives
//! outside this type; see the `ports` module.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::web_url::WebUrl;

/// Profile name used when registration omits one.
pub const DEFAULT_NAME: &str = "Jacques-Yves Cousteau";
/// Profile description used when registration omits one.
pub const DEFAULT_ABOUT: &str = "Explorer";
/// Avatar used when registration omits one.
pub const DEFAULT_AVATAR: &str =
    "https://pictures.s3.yandex.net/resources/jacques-cousteau_1604399756.png";

/// Minimum length for `name` and `about`.
pub const PROFILE_FIELD_MIN: usize = 2;
/// Maximum length for `name` and `about`.
pub const PROFILE_FIELD_MAX: usize = 30;

/// Validation errors returned by the user value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier does not parse as a UUID.
    InvalidId,
    /// The email was missing or blank once trimmed.
    EmptyEmail,
    /// The email does not have a plausible `local@domain.tld` shape.
    InvalidEmail,
    /// `name` is outside the allowed length range.
    NameLength { min: usize, max: usize },
    /// `about` is outside the allowed length range.
    AboutLength { min: usize, max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::NameLength { min, max } => {
                write!(f, "name must be between {min} and {max} characters")
            }
            Self::AboutLength { min, max } => {
                write!(f, "about must be between {min} and {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// `Ord` so like-sets have a deterministic serialization order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a [`UserId`] from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Structural check only; deliverability is not this layer's problem.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login identifier, trimmed and lowercased at construction.
///
/// ## Invariants
/// - Matches a `local@domain.tld` shape.
/// - Stored lowercase so uniqueness checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`] from borrowed input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    /// The normalized address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn profile_field_length(raw: &str) -> Option<usize> {
    let length = raw.chars().count();
    (PROFILE_FIELD_MIN..=PROFILE_FIELD_MAX)
        .contains(&length)
        .then_some(length)
}

/// Display name shown on a profile (2–30 characters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileName(String);

impl ProfileName {
    /// Validate and construct a [`ProfileName`] from owned input.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if profile_field_length(trimmed).is_none() {
            return Err(UserValidationError::NameLength {
                min: PROFILE_FIELD_MIN,
                max: PROFILE_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ProfileName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ProfileName> for String {
    fn from(value: ProfileName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProfileName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Short bio shown on a profile (2–30 characters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileAbout(String);

impl ProfileAbout {
    /// Validate and construct a [`ProfileAbout`] from owned input.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if profile_field_length(trimmed).is_none() {
            return Err(UserValidationError::AboutLength {
                min: PROFILE_FIELD_MIN,
                max: PROFILE_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ProfileAbout {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProfileAbout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ProfileAbout> for String {
    fn from(value: ProfileAbout) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProfileAbout {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user as exposed through the API.
///
/// The password hash is intentionally not part of this type, so serializing a
/// [`User`] can never leak credential material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    #[schema(value_type = String, example = "explorer@sea.example")]
    email: Email,
    #[schema(value_type = String, example = "Jacques-Yves Cousteau")]
    name: ProfileName,
    #[schema(value_type = String, example = "Explorer")]
    about: ProfileAbout,
    #[schema(value_type = String, example = "https://example.com/avatar.png")]
    avatar: WebUrl,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(
        id: UserId,
        email: Email,
        name: ProfileName,
        about: ProfileAbout,
        avatar: WebUrl,
    ) -> Self {
        Self {
            id,
            email,
            name,
            about,
            avatar,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login identifier.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &ProfileName {
        &self.name
    }

    /// Short bio.
    pub fn about(&self) -> &ProfileAbout {
        &self.about
    }

    /// Avatar image address.
    pub fn avatar(&self) -> &WebUrl {
        &self.avatar
    }

    /// Copy of this user with replaced profile fields.
    #[must_use]
    pub fn with_profile(mut self, name: ProfileName, about: ProfileAbout) -> Self {
        self.name = name;
        self.about = about;
        self
    }

    /// Copy of this user with a replaced avatar.
    #[must_use]
    pub fn with_avatar(mut self, avatar: WebUrl) -> Self {
        self.avatar = avatar;
        self
    }
}
