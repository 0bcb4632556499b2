//! HTTP rendering of application errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pictor_shared::AppError;
use serde_json::json;

/// Wrapper giving [`AppError`] an HTTP representation.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if !self.0.has_body() {
            return status.into_response();
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
