//! KDSM client configuration.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default base URL of the service API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Configuration for the KDSM client.
///
/// The configuration is immutable once handed to a client. No request
/// timeout is exposed: the transport default applies.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct KdsmConfig {
    /// API key sent in the `x-api-key` header
    #[cfg_attr(
        feature = "config",
        arg(long = "kdsm-api-key", env = "KDSM_API_KEY", hide_env_values = true)
    )]
    pub api_key: String,

    /// Base URL of the service API
    #[cfg_attr(
        feature = "config",
        arg(long = "kdsm-base-url", env = "KDSM_BASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "kdsm-user-agent", env = "KDSM_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl fmt::Debug for KdsmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdsmConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl KdsmConfig {
    /// Creates a configuration for the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            user_agent: None,
        }
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("kdsm-client/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Returns the full URL of an endpoint below the base URL.
    ///
    /// A trailing `/` on the base URL is ignored.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Validates the configuration.
    ///
    /// Only the base URL is checked; the API key is opaque to the client.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            Error::configuration()
                .with_message(format!("invalid base URL: {}", self.base_url))
                .with_source(e)
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration()
                .with_message(format!("unsupported base URL scheme: {}", url.scheme())));
        }

        Ok(())
    }
}
