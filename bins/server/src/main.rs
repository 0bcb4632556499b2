//! Pictor upload gateway
//!
//! Main entry point for the image upload and listing backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pictor_api::{AppState, create_router};
use pictor_core::storage::CloudinaryStore;
use pictor_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pictor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Create asset store client
    let store = CloudinaryStore::from_config(config.cloudinary.clone())?;
    info!(
        cloud_name = %store.cloud_name(),
        signature_algorithm = config.cloudinary.signature_algorithm.as_str(),
        "Cloudinary store configured"
    );

    // Create application state
    let state = AppState::new(&config, Arc::new(store))?;
    info!(
        folder = %config.gallery.folder,
        upload_mode = config.gallery.upload_mode.noun(),
        max_upload_bytes = config.gallery.max_upload_bytes,
        allowed_origins = state.origins.len(),
        "Gallery configured"
    );

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
