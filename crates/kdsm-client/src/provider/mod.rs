//! Cipher provider implementation.
//!
//! This module implements the [`CipherProvider`] trait for [`KdsmClient`]:
//! one POST per call, status check first, then envelope unwrapping.

use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::CipherProvider;
use crate::connect::{KdsmClient, TRACING_TARGET};
use crate::error::{Error, Result};
use crate::request::{DecryptRequest, EncryptRequest, Operation};
use crate::response::{DecryptResult, EncryptResult, Envelope};

impl KdsmClient {
    /// Posts `body` to the endpoint of `operation` and returns the `data` mapping.
    async fn exchange<B>(&self, operation: Operation, body: &B) -> Result<Map<String, Value>>
    where
        B: Serialize + Sync + ?Sized,
    {
        let started_at = Instant::now();
        let url = self.config().endpoint(operation.path());

        tracing::debug!(
            target: TRACING_TARGET,
            operation = %operation,
            url = %url,
            "Sending request"
        );

        let result = self.send(operation, &url, body).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(data) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    operation = %operation,
                    fields = data.len(),
                    elapsed_ms = elapsed.as_millis(),
                    "Request completed"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    operation = %operation,
                    kind = error.kind_str(),
                    status_code = ?error.status,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Request failed"
                );
            }
        }

        result
    }

    async fn send<B>(&self, operation: Operation, url: &str, body: &B) -> Result<Map<String, Value>>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .http()
            .post(url)
            .headers(self.headers().clone())
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(operation, e))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        let envelope = Envelope::from_slice(&body)?;
        if let Some(rate_limit) = &envelope.rate_limit_status {
            tracing::debug!(
                target: TRACING_TARGET,
                operation = %operation,
                rate_limit = %rate_limit,
                "Rate limit status"
            );
        }

        envelope.into_data(operation)
    }
}

/// Converts a transport failure into a network error naming the operation.
fn transport_error(operation: Operation, error: reqwest::Error) -> Error {
    let error = Error::from(error);
    let message = match error.message() {
        Some(cause) => format!("network error during {}: {cause}", operation.activity()),
        None => format!("network error during {}", operation.activity()),
    };

    error.with_message(message)
}

/// Builds the error for a non-2xx response.
///
/// The service usually explains rejections in an envelope; its reason is
/// kept when the body parses, but the error stays a network error.
fn status_error(status: u16, body: &[u8]) -> Error {
    let reason = Envelope::from_slice(body).ok().and_then(|e| e.error);
    let message = match reason {
        Some(reason) => format!("HTTP {status}: {reason}"),
        None => format!("HTTP {status}"),
    };

    Error::network_error().with_status(status).with_message(message)
}

#[async_trait::async_trait]
impl CipherProvider for KdsmClient {
    async fn encrypt(&self, request: &EncryptRequest) -> Result<EncryptResult> {
        self.exchange(Operation::Encrypt, request)
            .await
            .map(EncryptResult::from)
    }

    async fn decrypt(&self, request: &DecryptRequest) -> Result<DecryptResult> {
        self.exchange(Operation::Decrypt, request)
            .await
            .map(DecryptResult::from)
    }
}
