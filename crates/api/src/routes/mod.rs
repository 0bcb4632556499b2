//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod photos;
pub mod upload;

/// Creates the router with all gateway routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(upload::routes())
        .merge(photos::routes())
}
