//! Structured error handling for KDSM client operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while talking to the KDSM service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The request could not be delivered, or the service answered with a
    /// non-success HTTP status.
    NetworkError,
    /// The response body was not JSON, or its `data` was not an object.
    ProtocolError,
    /// The service reported `success: false`.
    ServiceError,
    /// The client configuration is unusable.
    Configuration,
}

/// Structured error type with classification and the HTTP status, if any.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// HTTP status code of the response, when one was received.
    pub status: Option<u16>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            source: None,
        }
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new protocol error.
    pub fn protocol_error() -> Self {
        Self::new(ErrorKind::ProtocolError)
    }

    /// Creates a new service error.
    pub fn service_error() -> Self {
        Self::new(ErrorKind::ServiceError)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the HTTP status code of the failed response.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the error message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        let status = error.status().map(|s| s.as_u16());
        let description = describe_chain(&error);
        let message = if error.is_timeout() {
            format!("request timed out: {description}")
        } else if error.is_connect() {
            format!("connection failed: {description}")
        } else {
            description
        };

        let error = Self::network_error().with_message(message).with_source(error);
        match status {
            Some(status) => error.with_status(status),
            None => error,
        }
    }
}

/// Renders an error followed by each distinct message in its source chain.
///
/// Transport errors only describe the failed request at the top level; the
/// actual cause (refused connection, DNS failure, ...) sits further down.
fn describe_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut description = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !description.contains(&cause_message) {
            description.push_str(": ");
            description.push_str(&cause_message);
        }
        source = cause.source();
    }

    description
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::protocol_error()
            .with_message("invalid JSON response from server")
            .with_source(error)
    }
}
