//! Client error types.
//!
//! Every variant renders to the message a caller shows the user: a request
//! that never got an answer reads "No response from server", an HTTP error
//! carries the backend's `message` (or "Error <status>"), and anything else
//! uses its own description.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was sent but no response arrived (connect failure, timeout).
    #[error("No response from server")]
    NoResponse(#[source] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend-provided message, or `Error <status>`.
        message: String,
    },

    /// Response body could not be decoded into the expected shape.
    #[error("{0}")]
    Decode(#[source] reqwest::Error),

    /// Any other HTTP client failure.
    #[error("{0}")]
    Http(#[source] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed, including a rejected token refresh.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing stored tokens failed.
    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Decode(e)
        } else if e.is_timeout() || e.is_connect() || e.is_request() {
            Error::NoResponse(e)
        } else {
            Error::Http(e)
        }
    }
}

impl Error {
    /// Build an API error from a status and an optional backend message.
    pub fn api(status: u16, message: Option<String>) -> Self {
        Error::Api {
            status,
            message: message.unwrap_or_else(|| format!("Error {}", status)),
        }
    }

    /// The normalized, user-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server never answered.
    pub fn is_no_response(&self) -> bool {
        matches!(self, Error::NoResponse(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_)) || matches!(self, Error::Api { status: 401, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body from the server. Only `message` is consumed.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
