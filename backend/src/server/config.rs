//! HTTP server configuration object.
//!
//! All process-wide state (signing secret, database pool, cookie policy) is
//! carried explicitly through this object instead of ambient globals.

use std::net::SocketAddr;

use actix_web::cookie::SameSite;
use chrono::Duration;
use zeroize::Zeroizing;

use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Duration,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration from the signing secret and bind address.
    ///
    /// Defaults: 7-day tokens, `Secure` cookies, `SameSite=Lax`, no CORS
    /// origins, in-memory stores.
    #[must_use]
    pub fn new(secret: Vec<u8>, bind_addr: SocketAddr) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            token_ttl: Duration::days(7),
            cookie_secure: true,
            same_site: SameSite::Lax,
            allowed_origins: Vec::new(),
            bind_addr,
            db_pool: None,
        }
    }

    /// Override the token lifetime (and with it the cookie max-age).
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Toggle the `Secure` attribute on the `jwt` cookie.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Override the cookie `SameSite` policy.
    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Set the CORS origin allow-list.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// Attach a database connection pool for the PostgreSQL adapters.
    ///
    /// Without a pool the server falls back to the in-memory stores, which
    /// is what development and tests run on.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_production_leaning() {
        let config = ServerConfig::new(b"secret".to_vec(), ([0, 0, 0, 0], 3000).into());

        assert_eq!(config.token_ttl, Duration::days(7));
        assert!(config.cookie_secure);
        assert!(config.allowed_origins.is_empty());
        assert!(config.db_pool.is_none());
        assert_eq!(config.bind_addr().port(), 3000);
    }

    #[rstest]
    fn builders_override_each_knob() {
        let config = ServerConfig::new(b"secret".to_vec(), ([127, 0, 0, 1], 0).into())
            .with_token_ttl(Duration::hours(1))
            .with_cookie_secure(false)
            .with_same_site(SameSite::Strict)
            .with_allowed_origins(vec!["https://mesto.example".to_owned()]);

        assert_eq!(config.token_ttl, Duration::hours(1));
        assert!(!config.cookie_secure);
        assert_eq!(config.allowed_origins, vec!["https://mesto.example"]);
    }
}
