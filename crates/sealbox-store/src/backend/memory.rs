//! In-memory byte store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::ByteStore;
use crate::error::StoreError;

/// Byte store backed by a process-local map.
///
/// The reference backend for tests and for callers that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("memory store poisoned").len()
    }

    /// Whether the store holds no payloads.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteStore for MemoryStore {
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.blobs
            .write()
            .expect("memory store poisoned")
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .blobs
            .read()
            .expect("memory store poisoned")
            .get(key)
            .cloned())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .blobs
            .read()
            .expect("memory store poisoned")
            .contains_key(key))
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .blobs
            .write()
            .expect("memory store poisoned")
            .remove(key)
            .is_some())
    }
}
