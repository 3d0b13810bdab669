//! Encryption layer.

use std::sync::Arc;

use sealbox_crypto::Encryptor;

use super::RawProvider;
use crate::error::{ProviderError, Result};

/// Provider layer that encrypts payloads before handing them inward and
/// decrypts on the way back out.
///
/// Failures while encrypting or decrypting propagate wrapped with the failing
/// key; a payload that cannot be decrypted is never passed along as garbage.
#[derive(Clone)]
pub struct EncryptedProvider {
    inner: Arc<dyn RawProvider>,
    encryptor: Arc<dyn Encryptor>,
}

impl EncryptedProvider {
    /// Layer an encryptor over an inner provider.
    pub fn new(inner: Arc<dyn RawProvider>, encryptor: Arc<dyn Encryptor>) -> Self {
        Self { inner, encryptor }
    }
}

impl RawProvider for EncryptedProvider {
    fn save_raw(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let ciphertext = self
            .encryptor
            .encrypt(&bytes)
            .map_err(|source| ProviderError::Crypto {
                key: key.to_string(),
                source,
            })?;
        tracing::debug!(key, plaintext_len = bytes.len(), "encrypted payload");
        self.inner.save_raw(key, ciphertext)
    }

    fn load_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.inner.load_raw(key)? {
            None => Ok(None),
            Some(ciphertext) => self
                .encryptor
                .decrypt(&ciphertext)
                .map(Some)
                .map_err(|source| ProviderError::Crypto {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.inner.delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ByteStore, MemoryStore};
    use crate::provider::StoreProvider;
    use sealbox_crypto::AesCbcEncryptor;

    fn encrypted_over_memory() -> (Arc<MemoryStore>, EncryptedProvider) {
        let store = Arc::new(MemoryStore::new());
        let base = Arc::new(StoreProvider::new(store.clone()));
        let encryptor = Arc::new(AesCbcEncryptor::from_passphrase("pw", Some(b"salt")));
        (store, EncryptedProvider::new(base, encryptor))
    }

    #[test]
    fn test_round_trip() {
        let (_, provider) = encrypted_over_memory();
        provider.save_raw("slot", b"plaintext".to_vec()).unwrap();
        assert_eq!(
            provider.load_raw("slot").unwrap(),
            Some(b"plaintext".to_vec())
        );
    }

    #[test]
    fn test_stored_bytes_are_ciphertext() {
        let (store, provider) = encrypted_over_memory();
        provider.save_raw("slot", b"plaintext".to_vec()).unwrap();

        let stored = store.read("slot").unwrap().unwrap();
        assert_ne!(stored, b"plaintext");
    }

    #[test]
    fn test_absent_key_stays_absent() {
        let (_, provider) = encrypted_over_memory();
        assert_eq!(provider.load_raw("missing").unwrap(), None);
    }

    #[test]
    fn test_corrupted_ciphertext_surfaces_crypto_failure() {
        let (store, provider) = encrypted_over_memory();
        provider.save_raw("slot", b"plaintext".to_vec()).unwrap();

        let mut stored = store.read("slot").unwrap().unwrap();
        let last = stored.len() - 1;
        stored[last] ^= 0x01;
        store.write("slot", &stored).unwrap();

        let result = provider.load_raw("slot");
        match result {
            Err(ProviderError::Crypto { key, .. }) => assert_eq!(key, "slot"),
            other => panic!("expected Crypto, got {other:?}"),
        }
    }
}
