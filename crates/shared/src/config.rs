//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Cloudinary credentials and endpoint.
    pub cloudinary: CloudinaryConfig,
    /// Upload gateway behaviour.
    #[serde(default)]
    pub gallery: GalleryConfig,
    /// Cross-origin policy.
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Digest used to sign upload requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    /// SHA-1, the provider's default.
    #[default]
    Sha1,
    /// SHA-256.
    Sha256,
}

impl SignatureAlgorithm {
    /// Value sent as `signature_algorithm`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }
}

/// Cloudinary configuration.
#[derive(Clone, Deserialize)]
pub struct CloudinaryConfig {
    /// Account (cloud) name.
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret, used for signing and basic auth.
    pub api_secret: String,
    /// API root, overridable for tests and regional endpoints.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Digest for upload signatures.
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

fn default_api_base_url() -> String {
    "https://api.cloudinary.com".to_string()
}

/// Whether `/upload` takes one file or a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    /// One file under the `photo` field.
    #[default]
    Single,
    /// Any number of files under the `photos` field.
    Batch,
}

impl UploadMode {
    /// Multipart field carrying the file(s).
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Single => "photo",
            Self::Batch => "photos",
        }
    }

    /// Returns true if a multipart part named `name` carries files for this mode.
    ///
    /// Batch mode also accepts the bracketed array form (`photos[]`).
    #[must_use]
    pub fn accepts_field(self, name: &str) -> bool {
        match self {
            Self::Single => name == "photo",
            Self::Batch => name == "photos" || name == "photos[]",
        }
    }

    /// Noun used in client-facing messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        self.field_name()
    }
}

/// Upload gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    /// Logical folder all assets live under.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Single or batch uploads.
    #[serde(default)]
    pub upload_mode: UploadMode,
    /// Maximum request body size for uploads, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Directory for staged uploads. Falls back to the OS temp dir.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            upload_mode: UploadMode::default(),
            max_upload_bytes: default_max_upload_bytes(),
            temp_dir: None,
        }
    }
}

fn default_folder() -> String {
    "photos_app".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Exact origins allowed to call the gateway.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5500".to_string(),
        "https://coderarpan.github.io".to_string(),
        "https://photos-wqb3.onrender.com".to_string(),
    ]
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// `PICTOR__*` variables, then the unprefixed `CLOUD_NAME`, `API_KEY`,
    /// `API_SECRET` and `PORT` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("PICTOR")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .set_override_option("cloudinary.cloud_name", std::env::var("CLOUD_NAME").ok())?
            .set_override_option("cloudinary.api_key", std::env::var("API_KEY").ok())?
            .set_override_option("cloudinary.api_secret", std::env::var("API_SECRET").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        config.try_deserialize()
    }
}
