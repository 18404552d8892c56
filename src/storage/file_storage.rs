use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use tempfile::NamedTempFile;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::FallbackStore;
use crate::storage::types::StoreKey;

/// Durable store keeping one `<key>.json` file per key under `base_path`.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a crash never leaves a half-written snapshot behind.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|source| {
            error!("Failed to create storage dir {}: {}", base_path.display(), source);
            StorageError::WriteFailed {
                path: base_path.clone(),
                source,
            }
        })?;
        info!("FileStore initialized at {}", base_path.display());
        Ok(Self { base_path })
    }

    fn key_path(&self, key: StoreKey) -> PathBuf {
        self.base_path.join(format!("{}.json", key.as_str()))
    }
}

impl FallbackStore for FileStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Read {} byte(s) from {}", text.len(), path.display());
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => {
                error!("Read failed {}: {}", path.display(), source);
                Err(StorageError::ReadFailed { path, source })
            }
        }
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        let write_failed = |source: std::io::Error| {
            error!("Write failed {}: {}", path.display(), source);
            StorageError::WriteFailed {
                path: path.clone(),
                source,
            }
        };
        let mut tmp = NamedTempFile::new_in(&self.base_path).map_err(write_failed)?;
        tmp.write_all(value.as_bytes()).map_err(write_failed)?;
        tmp.as_file().sync_all().map_err(write_failed)?;
        tmp.persist(&path).map_err(|e| write_failed(e.error))?;
        debug!("Wrote {} byte(s) to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<(), StorageError> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => {
                error!("Remove failed {}: {}", path.display(), source);
                Err(StorageError::WriteFailed { path, source })
            }
        }
    }
}
