//! One step of a schema evolution.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BoxError, MigrateError, Result};

type TransformFn = Arc<dyn Fn(&[u8]) -> std::result::Result<Vec<u8>, BoxError> + Send + Sync>;

/// A pure transform carrying an encoded payload from one schema version to a
/// later one.
///
/// Migrators are erased over the encoded representation: the chain walker
/// never sees typed values, only bytes. [`Migrator::typed`] adapts a typed
/// transform into this erased form at construction time.
#[derive(Clone)]
pub struct Migrator {
    from_version: u32,
    to_version: u32,
    transform: TransformFn,
}

impl Migrator {
    /// Create a migrator over raw encoded payloads.
    ///
    /// Fails if `from_version >= to_version`; migration only moves forward.
    pub fn new<F>(from_version: u32, to_version: u32, transform: F) -> Result<Self>
    where
        F: Fn(&[u8]) -> std::result::Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        if from_version >= to_version {
            return Err(MigrateError::InvalidMigrator {
                from: from_version,
                to: to_version,
            });
        }
        Ok(Self {
            from_version,
            to_version,
            transform: Arc::new(transform),
        })
    }

    /// Create a migrator from a typed transform over JSON-encoded payloads.
    ///
    /// The payload is decoded as `Old`, transformed, and re-encoded as `New`.
    /// Decode and encode failures surface as the step's own error.
    pub fn typed<Old, New, F>(from_version: u32, to_version: u32, transform: F) -> Result<Self>
    where
        Old: DeserializeOwned,
        New: Serialize,
        F: Fn(Old) -> New + Send + Sync + 'static,
    {
        Self::new(from_version, to_version, move |bytes: &[u8]| {
            let old: Old = serde_json::from_slice(bytes).map_err(|e| Box::new(e) as BoxError)?;
            let new = transform(old);
            serde_json::to_vec(&new).map_err(|e| Box::new(e) as BoxError)
        })
    }

    /// Version this migrator consumes.
    pub fn from_version(&self) -> u32 {
        self.from_version
    }

    /// Version this migrator produces.
    pub fn to_version(&self) -> u32 {
        self.to_version
    }

    /// Apply the transform to an encoded payload.
    pub(crate) fn apply(&self, payload: &[u8]) -> std::result::Result<Vec<u8>, BoxError> {
        (self.transform)(payload)
    }
}

impl std::fmt::Debug for Migrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("from_version", &self.from_version)
            .field("to_version", &self.to_version)
            .finish_non_exhaustive()
    }
}
