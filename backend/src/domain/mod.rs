//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the use-case services over them, and the ports those services
//! depend on. Types are immutable once constructed; invariants and
//! serialisation contracts live in each type's Rustdoc.

pub mod account_service;
pub mod auth;
pub mod card;
pub mod card_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod token;
pub mod user;
pub mod web_url;

pub use self::account_service::AccountService;
pub use self::auth::{Credentials, CredentialsValidationError, Registration};
pub use self::card::{Card, CardId, CardName, CardValidationError};
pub use self::card_service::CardService;
pub use self::error::{Error, ErrorCode};
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::token::{Claims, TokenSigner};
pub use self::user::{Email, ProfileAbout, ProfileName, User, UserId, UserValidationError};
pub use self::web_url::{WebUrl, WebUrlValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use mesto_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
