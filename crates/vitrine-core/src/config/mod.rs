//! Client configuration for the admin API.
//!
//! Resolved from explicit values or environment variables by the embedding
//! surface (CLI, desktop). Secret credentials are carried here but never
//! logged; `Debug` redacts the token.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Request timeout applied to every admin API call.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Connection settings for one tenant of the admin API.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the admin API, e.g. `https://api.example.com`
    pub api_base_url: String,
    /// Tenant scope every query key and request is bound to
    pub tenant_id: String,
    /// Bearer token for authenticated calls, when required
    #[serde(default)]
    pub api_token: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("tenant_id", &self.tenant_id)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Build a validated config from raw values.
    ///
    /// The base URL must carry an `http://`/`https://` scheme; a trailing
    /// slash is stripped so joined paths stay canonical.
    pub fn new(api_base_url: impl Into<String>, tenant_id: impl Into<String>) -> Result<Self> {
        let api_base_url = normalize_base_url(&api_base_url.into())?;
        let tenant_id = normalize_text(&tenant_id.into()).ok_or_else(|| {
            Error::InvalidConfiguration("tenant id must not be empty".to_string())
        })?;
        Ok(Self {
            api_base_url,
            tenant_id,
            api_token: None,
            timeout_secs: None,
        })
    }

    /// Attach a bearer token for authenticated calls.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = normalize_text(&token.into());
        self
    }

    /// Effective request timeout.
    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
    }
}

/// Trimmed, non-empty text or `None`.
fn normalize_text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let url = normalize_text(raw).ok_or_else(|| {
        Error::InvalidConfiguration("api base url must not be empty".to_string())
    })?;
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidConfiguration(
            "api base url must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_values() {
        assert!(ClientConfig::new("", "tenant-1").is_err());
        assert!(ClientConfig::new("api.example.com", "tenant-1").is_err());
        assert!(ClientConfig::new("https://api.example.com", "  ").is_err());
    }

    #[test]
    fn new_strips_trailing_slash() {
        let config = ClientConfig::new("https://api.example.com/", "tenant-1").unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::new("https://api.example.com", "tenant-1")
            .unwrap()
            .with_token("secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn with_token_drops_blank_tokens() {
        let config = ClientConfig::new("https://api.example.com", "tenant-1")
            .unwrap()
            .with_token("   ");
        assert_eq!(config.api_token, None);
    }
}
