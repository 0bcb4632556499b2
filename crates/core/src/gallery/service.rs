//! Gallery service implementation.

use std::sync::Arc;

use futures::future::join_all;

use super::error::GalleryError;
use super::types::UploadRequest;
use crate::storage::{Asset, AssetStore, DELIVERY_TYPE, StagedFile};

/// Forwards uploads to the asset store and lists what it holds.
///
/// Stateless between requests: every result comes from the current request
/// and a live store call.
pub struct GalleryService {
    store: Arc<dyn AssetStore>,
    folder: String,
}

impl GalleryService {
    /// Create a new gallery service scoped to `folder`.
    #[must_use]
    pub fn new(store: Arc<dyn AssetStore>, folder: impl Into<String>) -> Self {
        Self {
            store,
            folder: folder.into(),
        }
    }

    /// Logical folder this service uploads into and lists.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Upload every staged file in the request.
    ///
    /// A single file is awaited directly. Several files are dispatched
    /// concurrently and the call returns only after every upload has settled.
    /// Assets come back in request order. If any upload fails the whole call
    /// fails; files the store already accepted stay stored.
    ///
    /// The request's temp files are removed before this returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request holds no files
    /// - Any store call fails
    pub async fn upload(&self, request: UploadRequest) -> Result<Vec<Asset>, GalleryError> {
        if request.is_empty() {
            return Err(GalleryError::MissingFile);
        }

        let files = request.into_files();

        if let [file] = files.as_slice() {
            let asset = self.store_one(file).await?;
            return Ok(vec![asset]);
        }

        let results = join_all(files.iter().map(|file| self.store_one(file))).await;

        let total = results.len();
        let mut assets = Vec::with_capacity(total);
        let mut first_error = None;
        for result in results {
            match result {
                Ok(asset) => assets.push(asset),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(_) => {}
            }
        }

        if let Some(err) = first_error {
            tracing::warn!(
                folder = %self.folder,
                total,
                stored = assets.len(),
                "Batch upload failed; stored assets are left in place"
            );
            return Err(err);
        }

        tracing::info!(folder = %self.folder, count = total, "Batch uploaded");
        Ok(assets)
    }

    /// List every asset under the service's folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self) -> Result<Vec<Asset>, GalleryError> {
        self.store
            .list(&self.folder, DELIVERY_TYPE)
            .await
            .map_err(GalleryError::FetchFailed)
    }

    async fn store_one(&self, file: &StagedFile) -> Result<Asset, GalleryError> {
        match self.store.store(file, &self.folder).await {
            Ok(asset) => {
                tracing::info!(
                    file_name = file.file_name(),
                    public_id = %asset.public_id,
                    "Asset stored"
                );
                Ok(asset)
            }
            Err(e) => {
                tracing::error!(error = %e, file_name = file.file_name(), "Failed to store asset");
                Err(GalleryError::UploadFailed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MockAssetStore, Stager, StoreError};
    use bytes::Bytes;
    use std::path::PathBuf;

    fn asset_for(file_name: &str) -> Asset {
        Asset {
            url: format!("https://res.example/photos_app/{file_name}"),
            public_id: format!("photos_app/{file_name}"),
        }
    }

    async fn request_with(names: &[&str]) -> UploadRequest {
        let stager = Stager::default();
        let mut request = UploadRequest::new();
        for &name in names {
            let staged = stager
                .stage(Bytes::from_static(b"img"), Some(name))
                .await
                .expect("should stage");
            request.push(staged);
        }
        request
    }

    fn paths_of(request: &UploadRequest) -> Vec<PathBuf> {
        request.paths().map(PathBuf::from).collect()
    }

    #[tokio::test]
    async fn test_upload_without_files_is_missing_file() {
        let mut store = MockAssetStore::new();
        store.expect_store().never();
        let service = GalleryService::new(Arc::new(store), "photos_app");

        let err = service
            .upload(UploadRequest::new())
            .await
            .expect_err("empty request should fail");

        assert!(matches!(err, GalleryError::MissingFile));
    }

    #[tokio::test]
    async fn test_upload_single_file() {
        let mut store = MockAssetStore::new();
        store
            .expect_store()
            .withf(|file, folder| file.file_name() == "cat.jpg" && folder == "photos_app")
            .times(1)
            .returning(|file, _| Ok(asset_for(file.file_name())));
        let service = GalleryService::new(Arc::new(store), "photos_app");
        let request = request_with(&["cat.jpg"]).await;
        let paths = paths_of(&request);

        let assets = service.upload(request).await.expect("upload should succeed");

        assert_eq!(assets, vec![asset_for("cat.jpg")]);
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[tokio::test]
    async fn test_upload_batch_preserves_order() {
        let mut store = MockAssetStore::new();
        store
            .expect_store()
            .times(3)
            .returning(|file, _| Ok(asset_for(file.file_name())));
        let service = GalleryService::new(Arc::new(store), "photos_app");
        let request = request_with(&["c.jpg", "a.jpg", "b.jpg"]).await;

        let assets = service.upload(request).await.expect("upload should succeed");

        let ids: Vec<_> = assets.iter().map(|a| a.public_id.as_str()).collect();
        assert_eq!(ids, ["photos_app/c.jpg", "photos_app/a.jpg", "photos_app/b.jpg"]);
    }

    #[tokio::test]
    async fn test_upload_batch_fails_whole_request_on_one_failure() {
        let mut store = MockAssetStore::new();
        // Every file is still attempted; the barrier waits for all of them.
        store.expect_store().times(3).returning(|file, _| {
            if file.file_name() == "corrupt.jpg" {
                Err(StoreError::rejected(400, "Invalid image file"))
            } else {
                Ok(asset_for(file.file_name()))
            }
        });
        let service = GalleryService::new(Arc::new(store), "photos_app");
        let request = request_with(&["a.jpg", "corrupt.jpg", "b.jpg"]).await;
        let paths = paths_of(&request);

        let err = service
            .upload(request)
            .await
            .expect_err("batch with a failure should fail");

        assert!(matches!(
            err,
            GalleryError::UploadFailed(StoreError::Rejected { status: 400, .. })
        ));
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[tokio::test]
    async fn test_list_scopes_to_folder_and_delivery_type() {
        let mut store = MockAssetStore::new();
        store
            .expect_list()
            .withf(|folder, delivery_type| folder == "photos_app" && delivery_type == "upload")
            .times(1)
            .returning(|_, _| Ok(vec![asset_for("b.jpg"), asset_for("a.jpg")]));
        let service = GalleryService::new(Arc::new(store), "photos_app");

        let assets = service.list().await.expect("listing should succeed");

        assert_eq!(assets, vec![asset_for("b.jpg"), asset_for("a.jpg")]);
    }

    #[tokio::test]
    async fn test_list_failure_is_fetch_failed() {
        let mut store = MockAssetStore::new();
        store
            .expect_list()
            .returning(|_, _| Err(StoreError::rejected(420, "Rate Limited")));
        let service = GalleryService::new(Arc::new(store), "photos_app");

        let err = service.list().await.expect_err("listing should fail");

        assert!(matches!(err, GalleryError::FetchFailed(_)));
    }
}
