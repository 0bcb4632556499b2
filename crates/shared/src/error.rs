//! Application-wide error types.

use thiserror::Error;

/// Client-facing error taxonomy.
///
/// The payload of each variant is the message shown to the caller. Causes
/// are logged where the error is raised and never carried here.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request origin is not on the allow-list.
    #[error("Origin not allowed: {0}")]
    ForbiddenOrigin(String),

    /// No file part under the expected field.
    #[error("{0}")]
    MissingFile(String),

    /// Request body exceeds the configured limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Forwarding to the asset store failed.
    #[error("{0}")]
    UploadFailed(String),

    /// Listing the asset store failed.
    #[error("{0}")]
    FetchFailed(String),

    /// Invalid startup configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ForbiddenOrigin(_) => 403,
            Self::MissingFile(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::UploadFailed(_) | Self::FetchFailed(_) | Self::Configuration(_) => 500,
        }
    }

    /// Returns the error code used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ForbiddenOrigin(_) => "FORBIDDEN_ORIGIN",
            Self::MissingFile(_) => "MISSING_FILE",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::UploadFailed(_) => "UPLOAD_FAILED",
            Self::FetchFailed(_) => "FETCH_FAILED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether the caller gets a JSON `{error}` body.
    ///
    /// Origin rejections are answered with an empty body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        !matches!(self, Self::ForbiddenOrigin(_))
    }
}
