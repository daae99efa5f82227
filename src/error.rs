//! Error type shared by every SnooNotes operation

use thiserror::Error;

/// Errors that can occur when talking to SnooNotes
#[derive(Debug, Error)]
pub enum SnooNotesError {
    /// No credential was ever stored for this user
    #[error("unknown user {username}: call auth first")]
    NoSuchUser { username: String },

    /// Authentication or token refresh failed
    #[error("authentication failed for {username}: {reason}")]
    Auth { username: String, reason: String },

    /// Network failure or a non-2xx response
    #[error("{operation} request failed: {message}")]
    Transport {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// Response body was not the JSON we expected
    #[error("{operation} returned malformed JSON: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A request payload could not be serialized
    #[error("{operation} could not encode request body: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The service has nothing for the query
    #[error("{what} not found")]
    NotFound { what: String },

    /// The caller passed an argument the service cannot answer
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SnooNotesError {
    pub(crate) fn transport(operation: &'static str, err: impl std::fmt::Display) -> Self {
        SnooNotesError::Transport {
            operation,
            status: None,
            message: err.to_string(),
        }
    }

    pub(crate) fn status(operation: &'static str, status: u16) -> Self {
        SnooNotesError::Transport {
            operation,
            status: Some(status),
            message: format!("http request returned status [{status}]"),
        }
    }

    pub(crate) fn decode(operation: &'static str, source: serde_json::Error) -> Self {
        SnooNotesError::Decode { operation, source }
    }

    pub(crate) fn encode(operation: &'static str, source: serde_json::Error) -> Self {
        SnooNotesError::Encode { operation, source }
    }

    /// HTTP status code, when the failure came from a response
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SnooNotesError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SnooNotesError>;
