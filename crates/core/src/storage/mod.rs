//! Remote asset storage for uploaded photos.
//!
//! The gateway keeps no copy of any asset. Everything durable lives in the
//! remote store behind [`AssetStore`]; the only local files are the
//! request-scoped temp files produced by [`Stager`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  stage   ┌──────────────┐  store/list  ┌──────────────────┐
//! │  multipart   │ ───────▶ │  StagedFile  │ ───────────▶ │    AssetStore    │
//! │  request     │          │  (temp file) │              │ (CloudinaryStore)│
//! └──────────────┘          └──────────────┘              └──────────────────┘
//!                            dropped after the store settles
//! ```

mod cloudinary;
mod error;
mod staging;
mod store;

pub use cloudinary::CloudinaryStore;
pub use error::StoreError;
pub use staging::{StagedFile, Stager};
pub use store::{Asset, AssetStore, DELIVERY_TYPE};

#[cfg(test)]
pub use store::MockAssetStore;
