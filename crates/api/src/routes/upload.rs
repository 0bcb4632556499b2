//! Upload endpoint.
//!
//! Accepts `multipart/form-data`. In single mode the file comes in a part
//! named `photo`; in batch mode every part named `photos` (or `photos[]`)
//! is a file. Parts without a file name are ignored, and so are parts with
//! an empty file name and no content.

use axum::{
    Json, Router,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::post,
};
use pictor_core::gallery::{GalleryError, UploadRequest};
use pictor_core::storage::Stager;
use pictor_shared::{AppError, UploadMode};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::{AppState, error::ApiError};

/// Response for a successful upload.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadResponse {
    /// One file stored.
    Single {
        /// Confirmation text.
        message: &'static str,
        /// Delivery URL of the stored asset.
        url: String,
    },
    /// Every file of a batch stored.
    Batch {
        /// Confirmation text.
        message: &'static str,
        /// Delivery URLs in request order.
        urls: Vec<String>,
    },
}

/// POST `/upload`
/// Stage the submitted files and forward them to the asset store.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mode = state.upload_mode;

    let multipart = multipart.map_err(|rejection| {
        debug!(reason = %rejection, "Upload without multipart body");
        missing_file(mode)
    })?;

    let request = collect_files(multipart, mode, &state.stager).await?;
    let count = request.len();

    let assets = state
        .gallery
        .upload(request)
        .await
        .map_err(|e| upload_error(&e, mode))?;

    info!(count, mode = mode.noun(), "Upload completed");

    let mut urls: Vec<String> = assets.into_iter().map(|asset| asset.url).collect();
    let response = match mode {
        UploadMode::Single => UploadResponse::Single {
            message: "Photo uploaded successfully!",
            url: urls.pop().unwrap_or_default(),
        },
        UploadMode::Batch => UploadResponse::Batch {
            message: "Photos uploaded successfully!",
            urls,
        },
    };

    Ok(Json(response))
}

/// Read every file part the mode accepts and stage it to disk.
///
/// Staged files are owned by the returned request, so any early return
/// removes what was already written.
async fn collect_files(
    mut multipart: Multipart,
    mode: UploadMode,
    stager: &Stager,
) -> Result<UploadRequest, ApiError> {
    let mut request = UploadRequest::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, mode))?
    {
        let Some(name) = field.name() else {
            continue;
        };
        if !mode.accepts_field(name) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if mode == UploadMode::Single && !request.is_empty() {
            debug!(file_name = %file_name, "Ignoring extra photo part");
            continue;
        }

        let data = field.bytes().await.map_err(|e| multipart_error(&e, mode))?;

        // A file input left empty arrives as a nameless, empty part.
        if file_name.is_empty() && data.is_empty() {
            debug!("Ignoring empty file part");
            continue;
        }

        let staged = stager
            .stage(data, Some(&file_name))
            .await
            .map_err(|e| upload_error(&GalleryError::Staging(e), mode))?;
        request.push(staged);
    }

    Ok(request)
}

fn missing_file(mode: UploadMode) -> ApiError {
    ApiError(AppError::MissingFile(format!("No {} uploaded", mode.noun())))
}

fn multipart_error(err: &MultipartError, mode: UploadMode) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        debug!(error = %err, "Upload exceeds body limit");
        return ApiError(AppError::PayloadTooLarge("File too large".to_string()));
    }

    debug!(error = %err, "Malformed multipart body");
    missing_file(mode)
}

fn upload_error(err: &GalleryError, mode: UploadMode) -> ApiError {
    if matches!(err, GalleryError::MissingFile) {
        return missing_file(mode);
    }

    error!(error = %err, "Error during {} upload", mode.noun());
    ApiError(AppError::UploadFailed(format!(
        "Failed to upload {}",
        mode.noun()
    )))
}

/// Creates the upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload))
}
