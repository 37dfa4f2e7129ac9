//! Cipher service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::CipherProvider;
use crate::error::Result;
use crate::request::{DecryptRequest, EncryptRequest, Operation};
use crate::response::{DecryptResult, EncryptResult};

/// Tracing target for service operations.
pub const TRACING_TARGET: &str = "kdsm_client::service";

/// Cipher service wrapper with observability.
///
/// This wrapper adds structured logging to any [`CipherProvider`]
/// implementation. The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct CipherService {
    inner: Arc<dyn CipherProvider>,
}

impl fmt::Debug for CipherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherService").finish_non_exhaustive()
    }
}

impl CipherService {
    /// Create a new cipher service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: CipherProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Encrypts a message through the wrapped provider.
    pub async fn encrypt(&self, request: &EncryptRequest) -> Result<EncryptResult> {
        let started_at = Instant::now();
        let result = self.inner.encrypt(request).await;
        log_outcome(Operation::Encrypt, started_at, result.as_ref().err());
        result
    }

    /// Decrypts a message through the wrapped provider.
    pub async fn decrypt(&self, request: &DecryptRequest) -> Result<DecryptResult> {
        let started_at = Instant::now();
        let result = self.inner.decrypt(request).await;
        log_outcome(Operation::Decrypt, started_at, result.as_ref().err());
        result
    }
}

fn log_outcome(operation: Operation, started_at: Instant, error: Option<&crate::Error>) {
    let elapsed = started_at.elapsed();

    match error {
        None => {
            tracing::debug!(
                target: TRACING_TARGET,
                operation = %operation,
                elapsed_ms = elapsed.as_millis(),
                "Cipher operation succeeded"
            );
        }
        Some(error) => {
            tracing::error!(
                target: TRACING_TARGET,
                operation = %operation,
                kind = error.kind_str(),
                error = %error,
                elapsed_ms = elapsed.as_millis(),
                "Cipher operation failed"
            );
        }
    }
}
