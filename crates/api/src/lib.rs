//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The upload, listing and welcome routes
//! - The origin guard and CORS policy
//! - Mapping of gallery errors onto the client-facing contract

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn_with_state};
use pictor_core::gallery::GalleryService;
use pictor_core::storage::{AssetStore, Stager};
use pictor_shared::{AppConfig, AppError, UploadMode};
use tower_http::trace::TraceLayer;

use crate::middleware::origin::{OriginAllowList, origin_guard};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload and listing operations.
    pub gallery: Arc<GalleryService>,
    /// Writes incoming files to request-scoped temp files.
    pub stager: Arc<Stager>,
    /// Origins allowed to call the gateway.
    pub origins: Arc<OriginAllowList>,
    /// Single or batch uploads.
    pub upload_mode: UploadMode,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Builds the state from configuration and an asset store.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin allow-list is invalid.
    pub fn new(config: &AppConfig, store: Arc<dyn AssetStore>) -> Result<Self, AppError> {
        let origins = OriginAllowList::new(&config.cors.allowed_origins)?;

        Ok(Self {
            gallery: Arc::new(GalleryService::new(store, config.gallery.folder.clone())),
            stager: Arc::new(Stager::new(config.gallery.temp_dir.clone())),
            origins: Arc::new(origins),
            upload_mode: config.gallery.upload_mode,
            max_upload_bytes: config.gallery.max_upload_bytes,
        })
    }
}

/// Creates the main application router.
///
/// Layer order, outermost first: tracing, origin guard, CORS, body limit.
pub fn create_router(state: AppState) -> Router {
    let cors = state.origins.cors_layer();

    Router::new()
        .merge(routes::api_routes())
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(cors)
        .layer(from_fn_with_state(state.clone(), origin_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
