//! Keyed blob stores.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::StoreError;

/// A flat namespace of independently written string blobs.
pub trait BlobStore {
    /// Reads a blob. `Ok(None)` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces a blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per blob in a directory.
///
/// Writes go to a temporary sibling first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl BlobStore for FsBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.blob_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(key, bytes = contents.len(), "Blob read");
                Ok(Some(contents))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(key, "Blob missing");
                Ok(None)
            }
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        let path = self.blob_path(key);
        let tmp = path.with_extension("json.tmp");
        let io_error = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, contents).map_err(io_error)?;
        fs::rename(&tmp, &path).map_err(io_error)?;
        debug!(key, bytes = contents.len(), "Blob written");
        Ok(())
    }
}

/// Blobs held in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys written so far, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = blobs.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}
