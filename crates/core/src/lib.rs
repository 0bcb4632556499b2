//! Core logic for Pictor, an upload gateway in front of a remote asset store.
//!
//! This crate has no web framework dependency. HTTP handlers in `pictor-api`
//! call into it.
//!
//! # Modules
//!
//! - `storage` - The remote store seam, the Cloudinary client, temp-file staging
//! - `gallery` - Upload and listing operations over a fixed logical folder

pub mod gallery;
pub mod storage;
