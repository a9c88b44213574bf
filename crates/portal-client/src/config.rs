//! Portal API client configuration.
//!
//! The portal is a single origin serving both pages and JSON endpoints.
//! Authentication is the session cookie the login flow established; this
//! crate only forwards it.

use url::Url;
use zeroize::Zeroizing;

/// Default origin for a locally running portal backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Configuration for connecting to the portal backend.
///
/// Custom `Debug` implementation redacts the session cookie.
#[derive(Clone)]
pub struct PortalApiConfig {
    /// Portal origin. Always ends in `/` so endpoint paths can be appended.
    pub base_url: Url,
    /// Raw `Cookie` header value, e.g. `session=eyJ1c2VyX2lkIjo…`.
    pub session_cookie: Option<Zeroizing<String>>,
    /// Transport timeout. `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for PortalApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl PortalApiConfig {
    /// Build a configuration for an explicit origin and no session.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            session_cookie: None,
            timeout_secs: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORTAL_BASE_URL` (default: `http://127.0.0.1:5000`)
    /// - `PORTAL_SESSION_COOKIE` (optional)
    /// - `PORTAL_TIMEOUT_SECS` (optional; unset means no timeout)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("PORTAL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = match std::env::var("PORTAL_TIMEOUT_SECS") {
            Ok(s) => Some(
                s.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(s.clone()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            base_url: parse_base_url("PORTAL_BASE_URL", &raw)?,
            session_cookie: std::env::var("PORTAL_SESSION_COOKIE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(Zeroizing::new),
            timeout_secs,
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("localhost", &format!("http://127.0.0.1:{port}"))?,
            session_cookie: Some(Zeroizing::new("session=test-session".to_string())),
            timeout_secs: Some(5),
        })
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(Zeroizing::new(cookie.into()));
        self
    }
}

/// Parse an origin and make sure its path ends with `/`.
pub fn parse_base_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            var.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("PORTAL_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
    #[error("PORTAL_SESSION_COOKIE contains characters not allowed in a Cookie header")]
    InvalidCookie,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = PortalApiConfig::local_mock(9000).unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.timeout_secs, Some(5));
        assert!(cfg.session_cookie.is_some());
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = parse_base_url("t", "https://bank.example/portal").unwrap();
        assert_eq!(url.as_str(), "https://bank.example/portal/");
        assert_eq!(
            url.join("api/transfer").unwrap().as_str(),
            "https://bank.example/portal/api/transfer"
        );
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(parse_base_url("t", "not a url").is_err());
        assert!(parse_base_url("t", "mailto:ops@bank.example").is_err());
    }

    #[test]
    fn debug_redacts_session_cookie() {
        let cfg = PortalApiConfig::new("http://localhost:5000")
            .unwrap()
            .with_session_cookie("session=super-secret");
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn new_has_no_timeout_by_default() {
        let cfg = PortalApiConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(cfg.timeout_secs, None);
        assert!(cfg.session_cookie.is_none());
    }
}
