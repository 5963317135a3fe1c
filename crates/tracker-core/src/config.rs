//! Configuration types for the tracker provider
//!
//! This module defines the settings used to construct an API client.

use serde::{Deserialize, Serialize};

/// Environment variable holding the API access token
pub const TOKEN_ENV_VAR: &str = "PVTL_TRACKER_TOKEN";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV_VAR: &str = "TRACKER_BASE_URL";

/// Environment variable overriding the HTTP timeout (seconds)
pub const TIMEOUT_ENV_VAR: &str = "TRACKER_TIMEOUT_SECS";

/// Settings for talking to the tracker API
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API access token
    /// ⚠️ NEVER log this value
    pub access_token: String,

    /// API base URL; relative request paths are joined onto it.
    /// `None` leaves the choice to the API client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// HTTP timeout per request (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Custom Debug implementation that hides the access token
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration for the default API endpoint
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Point the client at another endpoint (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.access_token.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "Access token is required. Set it via: export {TOKEN_ENV_VAR}=your_token"
            )));
        }

        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "Base URL must use HTTP or HTTPS scheme. Got: {}",
                    base_url
                )));
            }

            // Url::join drops the last path segment without it
            if !base_url.ends_with('/') {
                return Err(crate::Error::config(format!(
                    "Base URL must end with '/'. Got: {}",
                    base_url
                )));
            }
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "Timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}
