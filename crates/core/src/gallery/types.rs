//! Gallery request types.

use std::path::Path;

use crate::storage::StagedFile;

/// Files staged from one upload request, in arrival order.
///
/// Owns the temp files: consuming or dropping the request removes them.
#[derive(Debug, Default)]
pub struct UploadRequest {
    files: Vec<StagedFile>,
}

impl UploadRequest {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a staged file.
    pub fn push(&mut self, file: StagedFile) {
        self.files.push(file);
    }

    /// Number of staged files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if nothing was staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Temp file locations, in arrival order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(StagedFile::path)
    }

    pub(crate) fn into_files(self) -> Vec<StagedFile> {
        self.files
    }
}
