//! Symmetric key material and passphrase-based derivation.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::error::{CryptoError, Result};

/// Key size in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Initialization vector size in bytes (one AES block).
pub const IV_SIZE: usize = 16;

/// PBKDF2 iteration count used for passphrase derivation.
///
/// Fixed: changing it silently would make existing blobs undecryptable,
/// since the same passphrase+salt must always reproduce the same material.
pub const KDF_ITERATIONS: u32 = 10_000;

/// Salt used when the caller does not supply one.
const BUILTIN_SALT: &[u8] = b"sealbox.kdf.v1";

/// Secret key and initialization vector for the symmetric cipher.
///
/// Derived once at construction and reused for every record the owning
/// encryptor touches. Reusing one IV across many records under the same key
/// leaks repeated-plaintext patterns; callers that persist many independently
/// encrypted records under one passphrase should derive distinct material per
/// record (for example by salting with the storage key).
#[derive(Clone)]
pub struct KeyMaterial {
    pub(crate) key: [u8; KEY_SIZE],
    pub(crate) iv: [u8; IV_SIZE],
}

impl KeyMaterial {
    /// Derive key material from a passphrase and optional salt.
    ///
    /// Deterministic: the same passphrase and salt always yield the same key
    /// and IV, via PBKDF2-HMAC-SHA256 at [`KDF_ITERATIONS`] rounds.
    pub fn derive(passphrase: &str, salt: Option<&[u8]>) -> Self {
        let salt = salt.unwrap_or(BUILTIN_SALT);

        let mut buf = [0u8; KEY_SIZE + IV_SIZE];
        pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, KDF_ITERATIONS, &mut buf);

        let mut key = [0u8; KEY_SIZE];
        let mut iv = [0u8; IV_SIZE];
        key.copy_from_slice(&buf[..KEY_SIZE]);
        iv.copy_from_slice(&buf[KEY_SIZE..]);

        Self { key, iv }
    }

    /// Build key material from pre-derived raw bytes.
    ///
    /// Fails immediately if either slice does not have the exact required
    /// length; a truncated key is a configuration error, not something to
    /// discover on the first decrypt.
    pub fn from_raw(key: &[u8], iv: &[u8]) -> Result<Self> {
        if key.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: key.len(),
            });
        }
        if iv.len() != IV_SIZE {
            return Err(CryptoError::InvalidIvLength {
                expected: IV_SIZE,
                actual: iv.len(),
            });
        }

        let mut key_buf = [0u8; KEY_SIZE];
        let mut iv_buf = [0u8; IV_SIZE];
        key_buf.copy_from_slice(key);
        iv_buf.copy_from_slice(iv);

        Ok(Self {
            key: key_buf,
            iv: iv_buf,
        })
    }
}

impl std::fmt::Debug for KeyMaterial {
    // Never print the actual secret bytes.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[redacted]")
            .field("iv", &"[redacted]")
            .finish()
    }
}
