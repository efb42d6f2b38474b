//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data`, so they depend only on
//! the domain services and the token signer and stay testable without I/O.

use std::sync::Arc;

use crate::domain::{AccountService, CardService, TokenSigner};

use super::session::CookieSettings;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and profile use-cases.
    pub accounts: Arc<AccountService>,
    /// Card use-cases with ownership enforcement.
    pub cards: Arc<CardService>,
    /// Issues and verifies the access tokens carried in the `jwt` cookie.
    pub tokens: Arc<TokenSigner>,
    /// Attributes applied to the `jwt` cookie.
    pub cookies: CookieSettings,
}

impl HttpState {
    /// Construct state from its parts.
    pub fn new(
        accounts: Arc<AccountService>,
        cards: Arc<CardService>,
        tokens: Arc<TokenSigner>,
        cookies: CookieSettings,
    ) -> Self {
        Self {
            accounts,
            cards,
            tokens,
            cookies,
        }
    }
}
