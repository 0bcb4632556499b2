//! Asset listing endpoint.

use axum::{Json, Router, extract::State, routing::get};
use pictor_core::storage::Asset;
use pictor_shared::AppError;
use serde::Serialize;
use tracing::error;

use crate::{AppState, error::ApiError};

/// Response for `GET /photos`.
#[derive(Debug, Serialize)]
pub struct PhotosResponse {
    /// Assets under the gallery folder, in store order.
    pub photos: Vec<Asset>,
}

/// GET `/photos`
/// List every asset under the gallery folder.
async fn list_photos(State(state): State<AppState>) -> Result<Json<PhotosResponse>, ApiError> {
    let photos = state.gallery.list().await.map_err(|e| {
        error!(error = %e, folder = state.gallery.folder(), "Error fetching photos");
        ApiError(AppError::FetchFailed("Failed to fetch photos".to_string()))
    })?;

    Ok(Json(PhotosResponse { photos }))
}

/// Creates the listing routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/photos", get(list_photos))
}
