//! Byte stores, layered providers, and the typed persistence pipeline.
//!
//! Data flow on save: typed value -> codec encode -> version frame -> layer
//! transforms (encrypt, stamp) -> byte store write. Load reverses the stack
//! and, when the stored schema version is older than the provider requires,
//! runs the payload through the migration manager before decoding.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sealbox_codec::JsonCodec;
//! use sealbox_crypto::{AesCbcEncryptor, Sha256Validator};
//! use sealbox_store::{
//!     EncryptedProvider, FileStore, PersistenceProvider, StoreProvider, ValidatedProvider,
//! };
//!
//! let store = Arc::new(FileStore::open("saves")?);
//! let base = Arc::new(StoreProvider::new(store));
//! // Stamp the ciphertext: corruption is caught before any decrypt runs.
//! let validated = Arc::new(ValidatedProvider::new(
//!     base,
//!     Arc::new(Sha256Validator::new()),
//! ));
//! let encrypted = Arc::new(EncryptedProvider::new(
//!     validated,
//!     Arc::new(AesCbcEncryptor::from_passphrase("passphrase", None)),
//! ));
//! let provider = PersistenceProvider::new(JsonCodec::new(), encrypted);
//!
//! provider.save("profile", &profile)?;
//! let restored: Profile = provider.load("profile")?;
//! ```
//!
//! Concurrency: one save or load runs to completion with no long-lived
//! locks; calls on different keys never interfere; ordering of concurrent
//! writes to the same key is the caller's concern.

mod backend;
mod error;
mod provider;

pub use backend::{ByteStore, FileStore, MemoryStore};
pub use error::{ProviderError, Result, StoreError};
pub use provider::{
    EncryptedProvider, MAGIC_BYTES, PersistenceProvider, RawProvider, StoreProvider,
    ValidatedProvider,
};
