//! Error types for broker operations.

use std::sync::Arc;

/// Error type for broker operations.
///
/// Cloneable so that every caller joined to one in-flight request receives
/// the same failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The backend call failed.
    #[error(transparent)]
    Client(Arc<parley_client::Error>),
}

impl From<parley_client::Error> for Error {
    fn from(e: parley_client::Error) -> Self {
        Error::Client(Arc::new(e))
    }
}

impl Error {
    /// The normalized, user-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The underlying client error.
    pub fn client_error(&self) -> &parley_client::Error {
        match self {
            Error::Client(e) => e,
        }
    }
}

/// Result type for broker operations.
pub type Result<T> = std::result::Result<T, Error>;
