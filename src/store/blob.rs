use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{LogisticsError, Result};

/// Narrow persistence port: named text blobs, read and replaced wholesale.
pub trait BlobStore {
    /// Returns `None` when no blob has been written under `key`. A blob that is
    /// not valid text comes back empty so it reads as no data.
    fn get_blob(&self, key: &str) -> Result<Option<String>>;

    fn set_blob(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each blob as `<key>.json` inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| LogisticsError::StorageUnavailable {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        match fs::read(&path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Ok(Some(text)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "blob is not valid UTF-8, ignoring it");
                    Ok(Some(String::new()))
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no blob on disk yet");
                Ok(None)
            }
            Err(source) => Err(LogisticsError::StorageUnavailable {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_blob(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.blob_path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let to_storage_error = |source| LogisticsError::StorageUnavailable {
            key: key.to_string(),
            source,
        };

        fs::write(&tmp, value).map_err(to_storage_error)?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(to_storage_error(source));
        }
        debug!(path = %path.display(), bytes = value.len(), "blob written");
        Ok(())
    }
}

/// In-memory blobs, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob, e.g. to simulate data written by an older build.
    pub fn with_blob(mut self, key: &str, value: &str) -> Self {
        self.blobs.insert(key.to_string(), value.to_string());
        self
    }
}

impl BlobStore for MemoryBlobStore {
    fn get_blob(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set_blob(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
