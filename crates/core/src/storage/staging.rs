//! Request-scoped temp files for incoming uploads.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;

/// File name used when the client sends none.
const FALLBACK_FILE_NAME: &str = "upload";

/// Writes upload payloads to temp files.
#[derive(Debug, Clone, Default)]
pub struct Stager {
    dir: Option<PathBuf>,
}

impl Stager {
    /// Create a stager writing into `dir`, or the OS temp dir when `None`.
    #[must_use]
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Stage one upload payload on disk.
    ///
    /// The returned handle owns the file; dropping it deletes the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be created or written.
    pub async fn stage(&self, data: Bytes, file_name: Option<&str>) -> io::Result<StagedFile> {
        let dir = self.dir.clone();
        let size = data.len() as u64;

        let temp = tokio::task::spawn_blocking(move || -> io::Result<NamedTempFile> {
            let mut builder = tempfile::Builder::new();
            builder.prefix("pictor-upload-");
            let mut temp = match dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            };
            temp.write_all(&data)?;
            temp.flush()?;
            Ok(temp)
        })
        .await
        .map_err(io::Error::other)??;

        let file_name = file_name
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILE_NAME)
            .to_string();

        tracing::debug!(
            path = %temp.path().display(),
            file_name = %file_name,
            size,
            "Staged upload"
        );

        Ok(StagedFile {
            temp,
            file_name,
            size,
        })
    }
}

/// An upload staged on local disk for the lifetime of one request.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    file_name: String,
    size: u64,
}

impl StagedFile {
    /// Location of the temp file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Client-supplied file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }
}
