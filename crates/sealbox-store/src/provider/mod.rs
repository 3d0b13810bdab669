//! Provider layers.
//!
//! A provider pipeline is built by composition: a [`StoreProvider`] adapts a
//! byte store to the [`RawProvider`] boundary, and each transform layer
//! ([`EncryptedProvider`], [`ValidatedProvider`]) wraps the provider directly
//! inside it, transforming bytes on the way down and reversing the transform
//! on the way up. No layer knows about any other layer, so any ordered stack
//! is assemblable. The typed [`PersistenceProvider`] sits on top and owns
//! encoding, version framing, and migration.

mod encrypted;
mod typed;
mod validated;

pub use encrypted::EncryptedProvider;
pub use typed::{MAGIC_BYTES, PersistenceProvider};
pub use validated::ValidatedProvider;

use std::sync::Arc;

use crate::backend::ByteStore;
use crate::error::{ProviderError, Result};

/// The layer-transform boundary.
///
/// A decorating provider implements exactly these operations over an inner
/// provider to inject one byte transform; typed save/load never needs
/// re-implementing.
pub trait RawProvider: Send + Sync {
    /// Transform and persist raw bytes under a key.
    fn save_raw(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Fetch and reverse-transform the raw bytes for a key.
    ///
    /// `None` means the key is absent, distinct from an empty-but-present
    /// payload.
    fn load_raw(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Whether a payload exists for the key.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Delete the payload for a key. Returns whether anything was removed.
    fn delete(&self, key: &str) -> Result<bool>;
}

/// Base provider: passes bytes straight through to a byte store.
#[derive(Clone)]
pub struct StoreProvider {
    store: Arc<dyn ByteStore>,
}

impl StoreProvider {
    /// Wrap a byte store.
    pub fn new(store: Arc<dyn ByteStore>) -> Self {
        Self { store }
    }
}

impl RawProvider for StoreProvider {
    fn save_raw(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.store
            .write(key, &bytes)
            .map_err(|source| ProviderError::Backend {
                key: key.to_string(),
                source,
            })
    }

    fn load_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store
            .read(key)
            .map_err(|source| ProviderError::Backend {
                key: key.to_string(),
                source,
            })
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.store
            .exists(key)
            .map_err(|source| ProviderError::Backend {
                key: key.to_string(),
                source,
            })
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.store
            .delete(key)
            .map_err(|source| ProviderError::Backend {
                key: key.to_string(),
                source,
            })
    }
}
