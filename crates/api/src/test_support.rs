//! Shared fixtures for route tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use pictor_core::storage::{Asset, AssetStore, StagedFile, StoreError};
use pictor_shared::{
    AppConfig, CloudinaryConfig, CorsConfig, GalleryConfig, ServerConfig, SignatureAlgorithm,
    UploadMode,
};
use std::sync::Arc;

use crate::{AppState, create_router};

pub const BOUNDARY: &str = "pictor-test-boundary";

/// In-memory asset store recording what the gateway sent it.
#[derive(Default)]
pub struct FakeStore {
    assets: Mutex<Vec<Asset>>,
    staged: Mutex<Vec<(PathBuf, bool)>>,
    store_calls: AtomicUsize,
    list_calls: AtomicUsize,
    failing: Vec<String>,
    delays: HashMap<String, Duration>,
    listing_fails: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject uploads of `file_name`.
    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.failing.push(file_name.to_string());
        self
    }

    /// Hold the upload of `file_name` for `millis` before answering.
    pub fn delaying(mut self, file_name: &str, millis: u64) -> Self {
        self.delays
            .insert(file_name.to_string(), Duration::from_millis(millis));
        self
    }

    /// Fail every listing.
    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// Seed assets already present in the store.
    pub fn with_assets(self, assets: Vec<Asset>) -> Self {
        *self.assets.lock().unwrap() = assets;
        self
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Assets accepted so far, in completion order.
    pub fn stored(&self) -> Vec<Asset> {
        self.assets.lock().unwrap().clone()
    }

    /// Temp paths handed to `store`, with whether each existed during the call.
    pub fn staged(&self) -> Vec<(PathBuf, bool)> {
        self.staged.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for FakeStore {
    async fn store(&self, file: &StagedFile, folder: &str) -> Result<Asset, StoreError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        self.staged
            .lock()
            .unwrap()
            .push((file.path().to_path_buf(), file.path().exists()));

        if let Some(delay) = self.delays.get(file.file_name()) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.iter().any(|name| name == file.file_name()) {
            return Err(StoreError::rejected(400, "Invalid image file"));
        }

        let asset = Asset {
            url: format!("https://res.example/{folder}/{}", file.file_name()),
            public_id: format!("{folder}/{}", file.file_name()),
        };
        self.assets.lock().unwrap().push(asset.clone());
        Ok(asset)
    }

    async fn list(&self, folder: &str, _delivery_type: &str) -> Result<Vec<Asset>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.listing_fails {
            return Err(StoreError::rejected(500, "General Error"));
        }

        let prefix = format!("{folder}/");
        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|asset| asset.public_id.starts_with(&prefix))
            .cloned()
            .collect())
    }
}

pub fn test_config(mode: UploadMode) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        cloudinary: CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base_url: "http://127.0.0.1:9".to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        },
        gallery: GalleryConfig {
            upload_mode: mode,
            ..GalleryConfig::default()
        },
        cors: CorsConfig::default(),
    }
}

pub fn test_app_with(store: Arc<FakeStore>, config: &AppConfig) -> Router {
    let state = AppState::new(config, store).expect("valid test config");
    create_router(state)
}

pub fn test_app(store: Arc<FakeStore>, mode: UploadMode) -> Router {
    test_app_with(store, &test_config(mode))
}

/// Encode `(field, file_name, content)` parts as multipart/form-data.
///
/// Parts without a file name are sent as plain text fields.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(
    parts: &[(&str, Option<&str>, &[u8])],
    origin: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
