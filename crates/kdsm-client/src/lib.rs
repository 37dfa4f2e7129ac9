#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod connect;
mod error;
mod provider;
mod service;

pub mod request;
pub mod response;

pub use connect::{API_KEY_HEADER, DEFAULT_BASE_URL, KdsmClient, KdsmConfig, TRACING_TARGET};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use request::{DecryptRequest, EncryptRequest, Operation};
pub use response::{DecryptResult, EncryptResult, Envelope};
pub use service::CipherService;

/// Core trait for encrypt/decrypt operations.
///
/// [`KdsmClient`] implements it over HTTP; wrap any implementation in a
/// [`CipherService`] to share it across tasks.
#[async_trait::async_trait]
pub trait CipherProvider: Send + Sync {
    /// Encrypts the request message and returns the service's result mapping.
    async fn encrypt(&self, request: &EncryptRequest) -> Result<EncryptResult>;

    /// Decrypts the request ciphertext and returns the service's result mapping.
    async fn decrypt(&self, request: &DecryptRequest) -> Result<DecryptResult>;
}
