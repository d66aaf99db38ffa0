//! Error types for the CMS client.

use thiserror::Error;

/// Result type for CMS client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// A failure talking to the CMS API, normalized to a human-readable message.
///
/// Callers only ever see one of these; raw transport errors never escape
/// the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS)
    #[error("{message}")]
    Network { message: String },

    /// Non-2xx response. `message` is the body's `message` field when present,
    /// otherwise the operation's fallback text.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape
    #[error("{message}")]
    Decode { message: String },

    /// Payload could not be turned into a form body
    #[error("{message}")]
    Encode { message: String },
}

impl ApiError {
    /// The message to show the user.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network { message }
            | ApiError::Api { message, .. }
            | ApiError::Decode { message }
            | ApiError::Encode { message } => message,
        }
    }

    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Error raised by a transport before any HTTP status is known.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Errors reading or writing the persisted credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Configuration errors (missing or invalid environment)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
