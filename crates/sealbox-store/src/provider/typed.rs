//! Typed persistence provider: encode, frame, migrate, decode.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use sealbox_codec::Codec;
use sealbox_migrate::{MigrateError, MigrationManager};

use super::RawProvider;
use crate::error::{ProviderError, Result};

/// Magic bytes at the start of every framed blob.
///
/// Format: "SBX" + format byte (0x01 for v1).
pub const MAGIC_BYTES: [u8; 4] = [b'S', b'B', b'X', 0x01];

/// Framed header size: magic plus a little-endian u32 schema version.
const HEADER_BYTES: usize = MAGIC_BYTES.len() + 4;

/// Typed save/load over a layered raw provider.
///
/// On save the value is encoded, framed with the provider's schema version,
/// and pushed through the layer stack. On load the frame's stored version
/// decides whether the payload runs through the migration manager before
/// decoding. The version header sits inside the layer transforms, so an
/// encryption layer covers it.
///
/// Migrations are keyed by `std::any::type_name` of the loaded type; register
/// steps with [`MigrationManager::register_for`] using the same type.
#[derive(Clone)]
pub struct PersistenceProvider<C> {
    codec: C,
    raw: Arc<dyn RawProvider>,
    migrations: Option<Arc<MigrationManager>>,
    schema_version: u32,
}

impl<C: Codec> PersistenceProvider<C> {
    /// Create a provider at schema version 1 with no migrations.
    pub fn new(codec: C, raw: Arc<dyn RawProvider>) -> Self {
        Self {
            codec,
            raw,
            migrations: None,
            schema_version: 1,
        }
    }

    /// Set the schema version stamped into saved blobs and required on load.
    #[must_use]
    pub fn with_schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    /// Attach a migration manager consulted when a loaded blob is older than
    /// the provider's schema version.
    #[must_use]
    pub fn with_migrations(mut self, migrations: Arc<MigrationManager>) -> Self {
        self.migrations = Some(migrations);
        self
    }

    /// The schema version this provider writes and requires.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Encode and persist a value under a key.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let payload = self
            .codec
            .encode(value)
            .map_err(|source| ProviderError::Codec {
                key: key.to_string(),
                source,
            })?;

        let mut framed = Vec::with_capacity(HEADER_BYTES + payload.len());
        framed.extend_from_slice(&MAGIC_BYTES);
        framed.extend_from_slice(&self.schema_version.to_le_bytes());
        framed.extend_from_slice(&payload);

        self.raw.save_raw(key, framed)?;
        tracing::info!(key, version = self.schema_version, "saved blob");
        Ok(())
    }

    /// Load and decode the value for a key.
    ///
    /// An absent key, or an empty-but-present payload, yields the type's
    /// default value rather than an error; zero bytes are "nothing to
    /// decode", not a decode target.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(bytes) = self.raw.load_raw(key)? else {
            return Ok(T::default());
        };
        if bytes.is_empty() {
            return Ok(T::default());
        }

        let (found, payload) = parse_frame(key, &bytes)?;

        if found > self.schema_version {
            return Err(ProviderError::UnsupportedVersion {
                key: key.to_string(),
                found,
                current: self.schema_version,
            });
        }

        let payload = if found < self.schema_version {
            self.migrate_payload::<T>(key, payload.to_vec(), found)?
        } else {
            payload.to_vec()
        };

        let value = self
            .codec
            .decode(&payload)
            .map_err(|source| ProviderError::Codec {
                key: key.to_string(),
                source,
            })?;
        tracing::info!(key, version = found, "loaded blob");
        Ok(value)
    }

    /// Whether a blob exists for the key.
    pub fn exists(&self, key: &str) -> Result<bool> {
        self.raw.exists(key)
    }

    /// Delete the blob for a key. Returns whether anything was removed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        self.raw.delete(key)
    }

    /// Persist raw bytes through the layer stack, bypassing the codec and
    /// version framing.
    pub fn save_raw(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.raw.save_raw(key, bytes)
    }

    /// Fetch raw bytes through the layer stack. `None` means the key is
    /// absent, distinct from an empty-but-present payload.
    pub fn load_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.raw.load_raw(key)
    }

    fn migrate_payload<T>(&self, key: &str, payload: Vec<u8>, found: u32) -> Result<Vec<u8>> {
        let type_id = std::any::type_name::<T>();
        let Some(migrations) = self.migrations.as_ref() else {
            // No manager configured: an old blob has no path forward.
            return Err(ProviderError::Migration {
                key: key.to_string(),
                source: MigrateError::ChainBroken {
                    type_id: type_id.to_string(),
                    at_version: found,
                    target_version: self.schema_version,
                },
            });
        };

        migrations
            .migrate(type_id, payload, found, self.schema_version)
            .map_err(|source| ProviderError::Migration {
                key: key.to_string(),
                source,
            })
    }
}

impl<C: Codec + Clone + 'static> PersistenceProvider<C> {
    /// Async twin of [`PersistenceProvider::save`].
    ///
    /// The in-memory transforms stay synchronous CPU work; the operation is
    /// handed to the blocking pool so the caller suspends only on the store
    /// I/O completing.
    pub async fn save_async<T>(&self, key: impl Into<String>, value: T) -> Result<()>
    where
        T: Serialize + Send + 'static,
    {
        let provider = self.clone();
        let key = key.into();
        let task_key = key.clone();
        tokio::task::spawn_blocking(move || provider.save(&key, &value))
            .await
            .map_err(|source| ProviderError::Task {
                key: task_key,
                source,
            })?
    }

    /// Async twin of [`PersistenceProvider::load`].
    pub async fn load_async<T>(&self, key: impl Into<String>) -> Result<T>
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        let provider = self.clone();
        let key = key.into();
        let task_key = key.clone();
        tokio::task::spawn_blocking(move || provider.load(&key))
            .await
            .map_err(|source| ProviderError::Task {
                key: task_key,
                source,
            })?
    }

    /// Async twin of [`PersistenceProvider::exists`].
    pub async fn exists_async(&self, key: impl Into<String>) -> Result<bool> {
        let provider = self.clone();
        let key = key.into();
        let task_key = key.clone();
        tokio::task::spawn_blocking(move || provider.exists(&key))
            .await
            .map_err(|source| ProviderError::Task {
                key: task_key,
                source,
            })?
    }

    /// Async twin of [`PersistenceProvider::delete`].
    pub async fn delete_async(&self, key: impl Into<String>) -> Result<bool> {
        let provider = self.clone();
        let key = key.into();
        let task_key = key.clone();
        tokio::task::spawn_blocking(move || provider.delete(&key))
            .await
            .map_err(|source| ProviderError::Task {
                key: task_key,
                source,
            })?
    }

    /// Async twin of [`PersistenceProvider::save_raw`].
    pub async fn save_raw_async(&self, key: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        let provider = self.clone();
        let key = key.into();
        let task_key = key.clone();
        tokio::task::spawn_blocking(move || provider.save_raw(&key, bytes))
            .await
            .map_err(|source| ProviderError::Task {
                key: task_key,
                source,
            })?
    }

    /// Async twin of [`PersistenceProvider::load_raw`].
    pub async fn load_raw_async(&self, key: impl Into<String>) -> Result<Option<Vec<u8>>> {
        let provider = self.clone();
        let key = key.into();
        let task_key = key.clone();
        tokio::task::spawn_blocking(move || provider.load_raw(&key))
            .await
            .map_err(|source| ProviderError::Task {
                key: task_key,
                source,
            })?
    }
}

/// Split a framed blob into its stored schema version and codec payload.
fn parse_frame<'a>(key: &str, bytes: &'a [u8]) -> Result<(u32, &'a [u8])> {
    if bytes.len() < HEADER_BYTES {
        return Err(ProviderError::InvalidFormat {
            key: key.to_string(),
            reason: "blob too small for header".to_string(),
        });
    }
    if bytes[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(ProviderError::InvalidFormat {
            key: key.to_string(),
            reason: "invalid magic bytes".to_string(),
        });
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    Ok((version, &bytes[HEADER_BYTES..]))
}
