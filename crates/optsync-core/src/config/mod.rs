//! Client configuration for reaching an option store.
//!
//! The CLI resolves these values from flags, environment and profiles; this
//! module only owns normalisation and validation.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option, remove_trailing_slash};

/// Where the option store lives and how to authenticate against it.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    access_token: Option<String>,
    request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Build a config for `base_url` (e.g. `https://console.example.com/api`).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            access_token: None,
            request_timeout: None,
        })
    }

    /// Attach a bearer token; blank tokens are ignored.
    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = normalize_text_option(token);
        self
    }

    /// Override the transport's default timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Join an API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Validate and normalise an option store base URL.
pub fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidConfiguration(
            "base URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidConfiguration(
            "base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(remove_trailing_slash(trimmed))
}
