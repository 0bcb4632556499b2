//! Upload gateway operations.
//!
//! This module provides the logic behind the HTTP surface:
//! - Forwarding staged uploads to the asset store, singly or as a batch
//! - Listing the assets under the gateway's folder

mod error;
mod service;
mod types;

pub use error::GalleryError;
pub use service::GalleryService;
pub use types::UploadRequest;
