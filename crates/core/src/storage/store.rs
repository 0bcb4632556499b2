//! The remote asset store seam.

use async_trait::async_trait;
use serde::Serialize;

use super::error::StoreError;
use super::staging::StagedFile;

/// Delivery type the gateway uploads and lists under.
pub const DELIVERY_TYPE: &str = "upload";

/// One stored image, as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    /// Publicly resolvable address.
    pub url: String,
    /// Stable identifier within the store.
    pub public_id: String,
}

/// Remote store that durably keeps uploaded images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store one staged file under `folder`.
    async fn store(&self, file: &StagedFile, folder: &str) -> Result<Asset, StoreError>;

    /// List every asset under `folder` with the given delivery type.
    ///
    /// Returns the store's first page, in the store's order.
    async fn list(&self, folder: &str, delivery_type: &str) -> Result<Vec<Asset>, StoreError>;
}
