//! Reqwest-based HTTP client for the KDSM service.

use std::sync::Arc;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use super::KdsmConfig;
use crate::error::{Error, Result};
use crate::request::{DecryptRequest, EncryptRequest};
use crate::response::{DecryptResult, EncryptResult};
use crate::{CipherProvider, CipherService};

/// Tracing target for client operations.
pub const TRACING_TARGET: &str = "kdsm_client::client";

/// Name of the header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Inner client that holds the HTTP client, configuration and header set.
struct KdsmClientInner {
    http: Client,
    config: KdsmConfig,
    headers: HeaderMap,
}

/// Client for the KDSM encrypt/decrypt API.
///
/// Cloning is cheap and clones share the same connection and configuration.
/// Each call performs exactly one HTTP request and is independent of any
/// other call, so a single client can be used from many tasks at once.
///
/// # Examples
///
/// ```rust,ignore
/// use kdsm_client::{KdsmClient, KdsmConfig};
///
/// let client = KdsmClient::new(KdsmConfig::new("kdsm_..."))?;
/// let result = client.encrypt("Op Stuff!!!", None).await?;
/// println!("{:?}", result.encrypted_message());
/// ```
#[derive(Clone)]
pub struct KdsmClient {
    inner: Arc<KdsmClientInner>,
}

impl std::fmt::Debug for KdsmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KdsmClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl KdsmClient {
    /// Creates a new client with the given configuration.
    ///
    /// No request is made here.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is not an http(s) URL,
    /// if the API key cannot be carried in an HTTP header, or if the HTTP
    /// client cannot be created.
    pub fn new(config: KdsmConfig) -> Result<Self> {
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            user_agent = %user_agent,
            "Creating KDSM client"
        );

        config.validate()?;
        let headers = Self::default_headers(&config.api_key)?;

        let http = Client::builder()
            .user_agent(&user_agent)
            .build()
            .map_err(|e| {
                Error::configuration()
                    .with_message("failed to create HTTP client")
                    .with_source(e)
            })?;

        let inner = KdsmClientInner {
            http,
            config,
            headers,
        };
        let client = Self {
            inner: Arc::new(inner),
        };

        tracing::info!(
            target: TRACING_TARGET,
            base_url = %client.config().base_url,
            "KDSM client created successfully"
        );

        Ok(client)
    }

    /// Creates a new client for the default base URL.
    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(KdsmConfig::new(api_key))
    }

    /// Builds the header set sent with every request.
    fn default_headers(api_key: &str) -> Result<HeaderMap> {
        let mut api_key = HeaderValue::from_str(api_key).map_err(|e| {
            Error::configuration()
                .with_message("API key contains characters not allowed in an HTTP header")
                .with_source(e)
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);
        Ok(headers)
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &KdsmConfig {
        &self.inner.config
    }

    /// Gets the headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Converts this client into a [`CipherService`] for use with dependency injection.
    pub fn into_service(self) -> CipherService {
        CipherService::new(self)
    }

    /// Encrypts `message` with `key`, or with a key chosen by the service.
    ///
    /// An empty `key` counts as no key and is not sent.
    pub async fn encrypt(
        &self,
        message: impl Into<String>,
        key: Option<&str>,
    ) -> Result<EncryptResult> {
        let mut request = EncryptRequest::new(message);
        if let Some(key) = key {
            request = request.with_key(key);
        }

        CipherProvider::encrypt(self, &request).await
    }

    /// Decrypts `encrypted_message` with the key it was encrypted with.
    pub async fn decrypt(
        &self,
        encrypted_message: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<DecryptResult> {
        let request = DecryptRequest::new(encrypted_message, key);
        CipherProvider::decrypt(self, &request).await
    }
}
