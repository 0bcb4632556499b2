//! Cloudinary-backed asset store.

use async_trait::async_trait;
use chrono::Utc;
use pictor_shared::{CloudinaryConfig, SignatureAlgorithm};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha1::{Digest, Sha1};
use sha2::Sha256;

use super::error::StoreError;
use super::staging::StagedFile;
use super::store::{Asset, AssetStore};

/// Asset as returned by the upload and admin APIs.
#[derive(Debug, Deserialize)]
struct RemoteAsset {
    secure_url: String,
    public_id: String,
}

impl From<RemoteAsset> for Asset {
    fn from(remote: RemoteAsset) -> Self {
        Self {
            url: remote.secure_url,
            public_id: remote.public_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    resources: Vec<RemoteAsset>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Asset store talking to the Cloudinary REST API.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    /// Create a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is blank or the HTTP client cannot be built.
    pub fn from_config(config: CloudinaryConfig) -> Result<Self, StoreError> {
        for (name, value) in [
            ("cloud_name", &config.cloud_name),
            ("api_key", &config.api_key),
            ("api_secret", &config.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::configuration(format!("{name} is empty")));
            }
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("pictor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Cloud (account) name.
    #[must_use]
    pub fn cloud_name(&self) -> &str {
        &self.config.cloud_name
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/v1_1/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name,
            path
        )
    }
}

#[async_trait]
impl AssetStore for CloudinaryStore {
    async fn store(&self, file: &StagedFile, folder: &str) -> Result<Asset, StoreError> {
        let data = tokio::fs::read(file.path()).await?;
        let timestamp = Utc::now().timestamp().to_string();
        let algorithm = self.config.signature_algorithm;
        let signature = sign(
            &[("folder", folder), ("timestamp", &timestamp)],
            &self.config.api_secret,
            algorithm,
        );

        let mut form = Form::new()
            .part("file", Part::bytes(data).file_name(file.file_name().to_string()))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);
        if algorithm != SignatureAlgorithm::Sha1 {
            form = form.text("signature_algorithm", algorithm.as_str());
        }

        tracing::debug!(
            file_name = file.file_name(),
            size = file.size(),
            folder,
            "Uploading to Cloudinary"
        );

        let response = self
            .client
            .post(self.endpoint("image/upload"))
            .multipart(form)
            .send()
            .await?;

        let asset: RemoteAsset = decode(response).await?;
        Ok(asset.into())
    }

    async fn list(&self, folder: &str, delivery_type: &str) -> Result<Vec<Asset>, StoreError> {
        let response = self
            .client
            .get(self.endpoint(&format!("resources/image/{delivery_type}")))
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .query(&[("prefix", folder)])
            .send()
            .await?;

        let list: ResourceList = decode(response).await?;
        Ok(list.resources.into_iter().map(Asset::from).collect())
    }
}

/// Decode a provider response, turning error statuses into [`StoreError::Rejected`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        return Err(StoreError::rejected(status.as_u16(), message));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

/// Compute a request signature.
///
/// Parameters are sorted by name, joined as `k=v&k=v`, and hashed with the
/// API secret appended. Empty values are not signed.
pub(crate) fn sign(params: &[(&str, &str)], secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut signed: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let mut payload = signed
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    payload.push_str(secret);

    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}
