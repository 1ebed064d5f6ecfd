//! File access during graph building.
//!
//! All file reads go through the [`FileProvider`] trait so that the graph
//! builder and staleness detector are independent of the filesystem:
//! [`DiskProvider`] reads and hashes real files with bounded retry on
//! transient errors, while [`MemoryProvider`] backs tests and
//! macro-topology simulations with an in-memory tree.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use drift_common::ContentHash;

/// The identity and content of one successfully read file.
#[derive(Debug, Clone)]
pub struct FileContent {
    /// The canonical path the file was found at.
    pub path: PathBuf,
    /// Content hash of `bytes`.
    pub hash: ContentHash,
    /// The raw file bytes.
    pub bytes: Vec<u8>,
}

impl FileContent {
    /// Creates a `FileContent`, computing the content hash from the bytes.
    pub fn new(path: PathBuf, bytes: Vec<u8>) -> Self {
        let hash = ContentHash::of_content(&bytes);
        Self { path, hash, bytes }
    }
}

/// A file read that failed even after the bounded retries were exhausted.
///
/// A missing file is not an error (`Ok(None)` from the provider); this is
/// reserved for genuine I/O failure, which the staleness detector maps to
/// a conservative `Stale` verdict.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {} after {attempts} attempts: {source}", path.display())]
pub struct ProviderError {
    /// The path that could not be read.
    pub path: PathBuf,
    /// How many read attempts were made.
    pub attempts: u32,
    /// The last underlying I/O error.
    pub source: io::Error,
}

/// Source of file content during graph traversal.
///
/// Reads are side-effect-free and idempotent; implementations must be
/// safe to share read-only across parallel per-unit builds.
pub trait FileProvider: Sync {
    /// Reads the file at `path`.
    ///
    /// `Ok(Some(..))` carries the canonical path, content hash, and bytes;
    /// `Ok(None)` means the file does not exist; `Err` means the read
    /// failed after retries and the caller must treat the unit as stale.
    fn read_file(&self, path: &Path) -> Result<Option<FileContent>, ProviderError>;
}

/// Reads files from the real filesystem.
#[derive(Debug, Clone)]
pub struct DiskProvider {
    /// Number of retries after the first failed attempt.
    max_retries: u32,
}

impl Default for DiskProvider {
    fn default() -> Self {
        Self { max_retries: 2 }
    }
}

impl DiskProvider {
    /// Creates a provider that retries transient failures `max_retries`
    /// times before giving up.
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }
}

impl FileProvider for DiskProvider {
    fn read_file(&self, path: &Path) -> Result<Option<FileContent>, ProviderError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match std::fs::read(path) {
                Ok(bytes) => {
                    // Canonicalization can fail on exotic mounts; the
                    // literal path is still a usable identity then.
                    let canonical =
                        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
                    return Ok(Some(FileContent::new(canonical, bytes)));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) if attempts <= self.max_retries => {
                    tracing::debug!(path = %path.display(), attempt = attempts, error = %e, "retrying read");
                }
                Err(e) => {
                    return Err(ProviderError {
                        path: path.to_path_buf(),
                        attempts,
                        source: e,
                    })
                }
            }
        }
    }
}

/// An in-memory file tree for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryProvider {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    /// Removes a file.
    pub fn remove(&mut self, path: &Path) {
        self.files.remove(path);
    }
}

impl FileProvider for MemoryProvider {
    fn read_file(&self, path: &Path) -> Result<Option<FileContent>, ProviderError> {
        Ok(self
            .files
            .get(path)
            .map(|bytes| FileContent::new(path.to_path_buf(), bytes.clone())))
    }
}
