//! Welcome and health check endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Plain-text greeting served at `/`.
pub const WELCOME_MESSAGE: &str = "Welcome to the Cloudinary Photo App Backend!";

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates welcome and health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
}
