//! Integrity-stamp layer.

use std::sync::Arc;

use sealbox_crypto::Validator;

use super::RawProvider;
use crate::error::{ProviderError, Result};

/// Stamp frame: `stamp_len (u16 LE) || stamp || payload`.
const STAMP_LEN_BYTES: usize = 2;

/// Provider layer that stamps payloads on save and verifies on load.
///
/// A mismatch surfaces as [`ProviderError::Integrity`], distinct from crypto
/// failures, so callers can tell tampering from a wrong passphrase.
#[derive(Clone)]
pub struct ValidatedProvider {
    inner: Arc<dyn RawProvider>,
    validator: Arc<dyn Validator>,
}

impl ValidatedProvider {
    /// Layer a validator over an inner provider.
    pub fn new(inner: Arc<dyn RawProvider>, validator: Arc<dyn Validator>) -> Self {
        Self { inner, validator }
    }
}

impl RawProvider for ValidatedProvider {
    fn save_raw(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let stamp = self.validator.compute_stamp(&bytes);
        debug_assert!(stamp.len() <= u16::MAX as usize);

        let mut framed = Vec::with_capacity(STAMP_LEN_BYTES + stamp.len() + bytes.len());
        framed.extend_from_slice(&(stamp.len() as u16).to_le_bytes());
        framed.extend_from_slice(&stamp);
        framed.extend_from_slice(&bytes);

        tracing::debug!(key, stamp_len = stamp.len(), "stamped payload");
        self.inner.save_raw(key, framed)
    }

    fn load_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(framed) = self.inner.load_raw(key)? else {
            return Ok(None);
        };

        // Empty-but-present payloads mean "nothing to decode"; let the layer
        // above make that call.
        if framed.is_empty() {
            return Ok(Some(framed));
        }

        if framed.len() < STAMP_LEN_BYTES {
            return Err(ProviderError::Integrity {
                key: key.to_string(),
            });
        }
        let stamp_len = u16::from_le_bytes([framed[0], framed[1]]) as usize;
        if framed.len() < STAMP_LEN_BYTES + stamp_len {
            return Err(ProviderError::Integrity {
                key: key.to_string(),
            });
        }

        let stamp = &framed[STAMP_LEN_BYTES..STAMP_LEN_BYTES + stamp_len];
        let payload = &framed[STAMP_LEN_BYTES + stamp_len..];

        if !self.validator.verify(payload, stamp) {
            return Err(ProviderError::Integrity {
                key: key.to_string(),
            });
        }

        Ok(Some(payload.to_vec()))
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.inner.delete(key)
    }
}
