//! Response envelope and operation results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::request::Operation;

/// The `{success, data, error}` wrapper returned by every service endpoint.
///
/// Fields are read leniently from any well-formed JSON body: `success` is
/// tested for truthiness (a missing flag reads as `false`), an `error` that is
/// not a string is ignored, and a successful envelope without `data` yields an
/// empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Whether the service completed the operation.
    pub success: bool,
    /// Operation output on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure reason on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Quota information attached by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_status: Option<Value>,
}

impl Envelope {
    /// Parses an envelope from a raw response body.
    ///
    /// Only a body that is not JSON at all is rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from(value))
    }

    /// Unwraps the `data` mapping, or turns a failed envelope into a service error.
    pub fn into_data(self, operation: Operation) -> Result<Map<String, Value>> {
        if !self.success {
            let message = self
                .error
                .unwrap_or_else(|| operation.fallback_error().to_owned());
            return Err(Error::service_error().with_message(message));
        }

        match self.data {
            None => Ok(Map::new()),
            Some(Value::Object(data)) => Ok(data),
            Some(other) => Err(Error::protocol_error().with_message(format!(
                "response data is {}, expected an object",
                value_kind(&other)
            ))),
        }
    }
}

impl From<Value> for Envelope {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };

        let success = fields.get("success").is_some_and(is_truthy);
        let error = fields
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Self {
            success,
            data: fields.remove("data").filter(|v| !v.is_null()),
            error,
            rate_limit_status: fields.remove("rateLimitStatus").filter(|v| !v.is_null()),
        }
    }
}

/// Truthiness of a JSON value: `null`, `false`, zero and empty values are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Output of an encrypt call.
///
/// This is the service's `data` object passed through unchanged; the
/// accessors read the fields the service is known to return without
/// requiring them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptResult(Map<String, Value>);

impl EncryptResult {
    /// Returns the ciphertext.
    pub fn encrypted_message(&self) -> Option<&str> {
        self.0.get("encryptedMessage").and_then(Value::as_str)
    }

    /// Returns the key the message was encrypted with.
    pub fn key(&self) -> Option<&str> {
        self.0.get("key").and_then(Value::as_str)
    }

    /// Returns whether the service generated the key.
    pub fn key_generated(&self) -> Option<bool> {
        self.0.get("keyGenerated").and_then(Value::as_bool)
    }

    /// Returns the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the result and returns the underlying mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for EncryptResult {
    fn from(data: Map<String, Value>) -> Self {
        Self(data)
    }
}

/// Output of a decrypt call, passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecryptResult(Map<String, Value>);

impl DecryptResult {
    /// Returns the recovered plaintext.
    pub fn decrypted_message(&self) -> Option<&str> {
        self.0.get("decryptedMessage").and_then(Value::as_str)
    }

    /// Returns the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the result and returns the underlying mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for DecryptResult {
    fn from(data: Map<String, Value>) -> Self {
        Self(data)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    fn envelope(value: Value) -> Envelope {
        Envelope::from_slice(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_success_returns_data() {
        let data = envelope(json!({
            "success": true,
            "data": { "encryptedMessage": "XJ2==", "key": "k1" },
        }))
        .into_data(Operation::Encrypt)
        .unwrap();

        let result = EncryptResult::from(data);
        assert_eq!(result.encrypted_message(), Some("XJ2=="));
        assert_eq!(result.key(), Some("k1"));
        assert_eq!(result.key_generated(), None);
    }

    #[test]
    fn test_success_without_data_is_empty() {
        let data = envelope(json!({ "success": true }))
            .into_data(Operation::Decrypt)
            .unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_failure_uses_server_message() {
        let error = envelope(json!({ "success": false, "error": "bad key" }))
            .into_data(Operation::Decrypt)
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::ServiceError);
        assert_eq!(error.message(), Some("bad key"));
    }

    #[test]
    fn test_failure_without_message_uses_fallback() {
        let error = envelope(json!({ "success": false }))
            .into_data(Operation::Encrypt)
            .unwrap_err();
        assert_eq!(error.message(), Some("unknown error during encryption"));

        let error = envelope(json!({}))
            .into_data(Operation::Decrypt)
            .unwrap_err();
        assert_eq!(error.message(), Some("unknown error during decryption"));
    }

    #[test]
    fn test_rate_limit_status_is_accepted() {
        let envelope = envelope(json!({
            "success": true,
            "data": { "decryptedMessage": "hi" },
            "rateLimitStatus": { "tier": "free", "remaining": 9 },
        }));
        assert!(envelope.rate_limit_status.is_some());

        let result = DecryptResult::from(envelope.into_data(Operation::Decrypt).unwrap());
        assert_eq!(result.decrypted_message(), Some("hi"));
        assert_eq!(result.as_map().len(), 1);
    }

    #[test]
    fn test_non_json_body_is_protocol_error() {
        let error = Envelope::from_slice(b"<html>oops</html>").unwrap_err();
        assert_eq!(error.kind, ErrorKind::ProtocolError);
        assert_eq!(error.message(), Some("invalid JSON response from server"));
    }

    #[test]
    fn test_non_string_error_uses_fallback() {
        let error = envelope(json!({ "success": false, "error": 42 }))
            .into_data(Operation::Encrypt)
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServiceError);
        assert_eq!(error.message(), Some("unknown error during encryption"));

        let error = envelope(json!({ "success": false, "error": { "code": "E1" } }))
            .into_data(Operation::Decrypt)
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServiceError);
        assert_eq!(error.message(), Some("unknown error during decryption"));
    }

    #[test]
    fn test_success_flag_truthiness() {
        let data = envelope(json!({ "success": 1, "data": { "key": "k1" } }))
            .into_data(Operation::Encrypt)
            .unwrap();
        assert_eq!(data.get("key"), Some(&json!("k1")));

        assert!(envelope(json!({ "success": "yes" })).success);
        assert!(!envelope(json!({ "success": 0 })).success);
        assert!(!envelope(json!({ "success": "" })).success);
        assert!(!envelope(json!({ "success": null })).success);
    }

    #[test]
    fn test_non_object_data_is_reported() {
        let error = envelope(json!({ "success": true, "data": ["a"] }))
            .into_data(Operation::Encrypt)
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ProtocolError);
        assert_eq!(error.message(), Some("response data is an array, expected an object"));
    }

    #[test]
    fn test_non_object_body_is_failed_envelope() {
        let error = envelope(json!(["not", "an", "envelope"]))
            .into_data(Operation::Decrypt)
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServiceError);
        assert_eq!(error.message(), Some("unknown error during decryption"));
    }
}
