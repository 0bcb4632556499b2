//! Storage error types.

use thiserror::Error;

/// Asset store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The HTTP exchange with the provider failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider's error message.
        message: String,
    },

    /// The provider's response could not be decoded.
    #[error("unexpected provider response: {0}")]
    Decode(String),

    /// Reading the staged file failed.
    #[error("staged file unreadable: {0}")]
    Io(#[from] std::io::Error),

    /// Store configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Create a rejected error.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
