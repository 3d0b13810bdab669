//! File-backed byte store.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::ByteStore;
use crate::error::StoreError;

/// Extension given to blob files.
const BLOB_EXTENSION: &str = "sbx";

/// Byte store keeping one file per key under a root directory.
///
/// Writes are atomic: the payload goes to a temp file that is synced and then
/// renamed over the target, so a crash or power loss mid-write never leaves a
/// half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at the given directory, creating it if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{BLOB_EXTENSION}", sanitize_key(key)))
    }
}

/// Map an opaque key onto a safe file name.
///
/// Keys carry no hierarchy, so path separators and anything else outside a
/// conservative character set collapse to underscores.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl ByteStore for FileStore {
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.blob_path(key);
        let temp_path = path.with_extension(format!("{BLOB_EXTENSION}.tmp"));

        let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(bytes).map_err(|e| StoreError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;

        file.sync_all().map_err(|e| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &path).map_err(|e| StoreError::AtomicWriteFailed {
            temp_path,
            target_path: path,
            source: e,
        })
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.blob_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io {
                operation: "read",
                path,
                source: e,
            }),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.blob_path(key).exists())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.blob_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io {
                operation: "delete",
                path,
                source: e,
            }),
        }
    }
}
