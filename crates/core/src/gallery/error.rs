//! Gallery error types.

use thiserror::Error;

use crate::storage::StoreError;

/// Gallery operation errors.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The request carried no file under the expected field.
    #[error("no file uploaded")]
    MissingFile,

    /// A payload could not be staged to local disk.
    #[error("staging failed: {0}")]
    Staging(#[from] std::io::Error),

    /// The asset store rejected or failed an upload.
    #[error("upload failed: {0}")]
    UploadFailed(#[source] StoreError),

    /// The asset store listing failed.
    #[error("fetch failed: {0}")]
    FetchFailed(#[source] StoreError),
}
