//! Request bodies sent to the KDSM service.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

/// The two operations exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// `POST {base_url}/encrypt`
    Encrypt,
    /// `POST {base_url}/decrypt`
    Decrypt,
}

impl Operation {
    /// Returns the endpoint path relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }

    /// Returns the noun used for this operation in error messages.
    pub fn activity(&self) -> &'static str {
        match self {
            Self::Encrypt => "encryption",
            Self::Decrypt => "decryption",
        }
    }

    /// Returns the message reported when the service fails without saying why.
    pub fn fallback_error(&self) -> &'static str {
        match self {
            Self::Encrypt => "unknown error during encryption",
            Self::Decrypt => "unknown error during decryption",
        }
    }
}

/// Body of an encrypt request.
///
/// The `key` field is left out of the JSON entirely when it is absent or
/// empty, in which case the service generates a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    /// Plaintext to encrypt.
    pub message: String,
    /// Key to encrypt with.
    #[serde(default, skip_serializing_if = "is_absent")]
    pub key: Option<String>,
}

impl EncryptRequest {
    /// Creates a request that lets the service pick the key.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: None,
        }
    }

    /// Sets the key to encrypt with. An empty key is treated as no key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.key = (!key.is_empty()).then_some(key);
        self
    }
}

fn is_absent(key: &Option<String>) -> bool {
    key.as_deref().is_none_or(str::is_empty)
}

/// Body of a decrypt request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    /// Ciphertext previously returned by an encrypt call.
    pub encrypted_message: String,
    /// Key the ciphertext was produced with.
    pub key: String,
}

impl DecryptRequest {
    /// Creates a new decrypt request.
    pub fn new(encrypted_message: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            encrypted_message: encrypted_message.into(),
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_encrypt_request_without_key() {
        let request = EncryptRequest::new("Op Stuff!!!");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "message": "Op Stuff!!!" }));
    }

    #[test]
    fn test_encrypt_request_with_key() {
        let request = EncryptRequest::new("hello").with_key("k1");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "message": "hello", "key": "k1" }));
    }

    #[test]
    fn test_encrypt_request_empty_key_is_omitted() {
        let request = EncryptRequest::new("hello").with_key("");
        assert!(request.key.is_none());

        let request = EncryptRequest {
            message: "hello".to_string(),
            key: Some(String::new()),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("key").is_none());
    }

    #[test]
    fn test_decrypt_request_field_names() {
        let request = DecryptRequest::new("XJ2==", "k1");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "encryptedMessage": "XJ2==", "key": "k1" }));
    }

    #[test]
    fn test_operation_paths() {
        assert_eq!(Operation::Encrypt.path(), "encrypt");
        assert_eq!(Operation::Decrypt.path(), "decrypt");
        assert_eq!(Operation::Decrypt.to_string(), "decrypt");
        assert_eq!(Operation::Decrypt.activity(), "decryption");
        assert!(Operation::Encrypt.fallback_error().contains("encryption"));
    }
}
