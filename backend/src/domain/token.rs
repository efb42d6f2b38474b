//! Stateless access tokens binding a session to exactly one user id.
//!
//! Tokens are HS256 JWTs carrying `sub`, `iat`, and `exp`. Verification is a
//! pure function of the token and the process-wide signing secret; callers
//! that mutate state on behalf of the subject must additionally confirm the
//! user still exists. There is no server-side revocation list; logout relies
//! on the client discarding its cookie and on token expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::error::Error;
use super::user::UserId;

/// Claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id in canonical string form.
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and verifies signed access tokens.
///
/// The signing secret is read once at startup and immutable afterwards.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    /// Build a signer from the shared secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Token lifetime used for freshly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for `user`.
    pub fn issue(&self, user: UserId) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign access token: {err}")))
    }

    /// Verify signature and expiry, returning the embedded user id.
    ///
    /// Every failure collapses into the same `Unauthorized` error so callers
    /// cannot distinguish a forged token from an expired one.
    pub fn verify(&self, token: &str) -> Result<UserId, Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| unauthorized())?;
        UserId::parse(&data.claims.sub).map_err(|_| unauthorized())
    }
}

fn unauthorized() -> Error {
    Error::unauthorized("authorisation required")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    const SECRET: &[u8] = b"test-signing-secret";

    fn signer() -> TokenSigner {
        TokenSigner::new(SECRET, Duration::days(7))
    }

    #[rstest]
    fn issue_then_verify_resolves_the_issuing_user() {
        let signer = signer();
        let user = UserId::random();

        let token = signer.issue(user).expect("token issued");
        let verified = signer.verify(&token).expect("token verifies");
        assert_eq!(verified, user);
    }

    #[rstest]
    fn expired_tokens_are_rejected() {
        // A negative lifetime issues a token already past its expiry window,
        // beyond the verifier's default leeway.
        let expired = TokenSigner::new(SECRET, Duration::hours(-2));
        let token = expired.issue(UserId::random()).expect("token issued");

        let err = signer().verify(&token).expect_err("expired token must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_rejected() {
        let foreign = TokenSigner::new(b"some-other-secret", Duration::days(7));
        let token = foreign.issue(UserId::random()).expect("token issued");

        let err = signer().verify(&token).expect_err("forged token must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("")]
    #[case("garbage")]
    #[case("aaaa.bbbb.cccc")]
    fn malformed_tokens_are_rejected(#[case] token: &str) {
        let err = signer().verify(token).expect_err("malformed token must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
