//! Validated absolute web address shared by avatars and card images.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Validation errors returned by [`WebUrl::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebUrlValidationError {
    /// The value was missing or blank once trimmed.
    Empty,
    /// The value does not parse as an absolute URL.
    Malformed,
    /// The URL uses a scheme other than `http` or `https`.
    UnsupportedScheme,
}

impl fmt::Display for WebUrlValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "url must not be empty"),
            Self::Malformed => write!(f, "url must be a well-formed absolute URL"),
            Self::UnsupportedScheme => write!(f, "url must use the http or https scheme"),
        }
    }
}

impl std::error::Error for WebUrlValidationError {}

/// An absolute `http(s)` URL, stored in its original textual form.
///
/// ## Invariants
/// - Parses as an absolute URL with a host.
/// - Scheme is `http` or `https`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WebUrl(String);

impl WebUrl {
    /// Validate and construct a [`WebUrl`] from borrowed input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, WebUrlValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WebUrlValidationError::Empty);
        }

        let parsed = Url::parse(trimmed).map_err(|_| WebUrlValidationError::Malformed)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WebUrlValidationError::UnsupportedScheme);
        }
        if parsed.host_str().is_none() {
            return Err(WebUrlValidationError::Malformed);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// The URL in its original textual form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for WebUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WebUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<WebUrl> for String {
    fn from(value: WebUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for WebUrl {
    type Error = WebUrlValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://example.com/cat.png")]
    #[case("https://pictures.s3.yandex.net/resources/jacques-cousteau_1604399756.png")]
    #[case("  https://example.com/with?query=1  ")]
    fn accepts_http_and_https_urls(#[case] raw: &str) {
        let url = WebUrl::new(raw).expect("valid url");
        assert_eq!(url.as_str(), raw.trim());
    }

    #[rstest]
    #[case("", WebUrlValidationError::Empty)]
    #[case("   ", WebUrlValidationError::Empty)]
    #[case("not a url", WebUrlValidationError::Malformed)]
    #[case("/relative/path.png", WebUrlValidationError::Malformed)]
    #[case("ftp://example.com/cat.png", WebUrlValidationError::UnsupportedScheme)]
    #[case("javascript:alert(1)", WebUrlValidationError::UnsupportedScheme)]
    fn rejects_invalid_urls(#[case] raw: &str, #[case] expected: WebUrlValidationError) {
        let err = WebUrl::new(raw).expect_err("invalid url must fail");
        assert_eq!(err, expected);
    }
}
