use std::fmt;

use url::Url;

/// Explicit session context for backend calls: base URL plus bearer token.
///
/// Injected into clients rather than read from ambient storage, so the
/// surrounding shell owns authentication and can swap sessions atomically.
#[derive(Clone)]
pub struct Session {
    base_url: Url,
    token: String,
}

impl Session {
    #[must_use]
    pub fn new(base_url: Url, token: impl Into<String>) -> Self {
        Self {
            base_url,
            token: token.into(),
        }
    }

    /// Parse the base URL and build a session.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` for an invalid base URL.
    pub fn parse(base_url: &str, token: impl Into<String>) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(base_url)?, token))
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The token stays out of logs.
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let session = Session::parse("https://api.example.com/", "t").unwrap();
        assert_eq!(
            session.endpoint("/api/playlists/abc"),
            "https://api.example.com/api/playlists/abc"
        );
        assert_eq!(
            session.endpoint("api/test/abc"),
            "https://api.example.com/api/test/abc"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let session = Session::parse("https://api.example.com", "secret").unwrap();
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
