//! Shared configuration and errors for Pictor.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Application configuration, loaded once at startup
//! - Client-facing error taxonomy with HTTP status mapping

pub mod config;
pub mod error;

pub use self::config::{
    AppConfig, CloudinaryConfig, CorsConfig, GalleryConfig, ServerConfig, SignatureAlgorithm,
    UploadMode,
};
pub use error::AppError;
