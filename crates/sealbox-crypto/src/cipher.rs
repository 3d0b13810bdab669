//! Reversible byte-transform encryptors.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{CryptoError, Result};
use crate::key::KeyMaterial;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Reversible byte-sequence transform for confidentiality.
///
/// `decrypt(encrypt(x)) == x` must hold for every byte sequence `x`,
/// including the empty one. Implementations are stateless across calls given
/// fixed key material.
pub trait Encryptor: Send + Sync {
    /// Encrypt a plaintext payload.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt a ciphertext payload.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Identity encryptor: plaintext in, plaintext out.
///
/// An explicit opt-out for callers that want the provider pipeline without
/// confidentiality, not a safe default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEncryptor;

impl NoopEncryptor {
    /// Create a new no-op encryptor.
    pub fn new() -> Self {
        Self
    }
}

impl Encryptor for NoopEncryptor {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Ok(ciphertext.to_vec())
    }
}

/// AES-256-CBC encryptor with PKCS#7 padding.
///
/// Key material is fixed for the encryptor's lifetime, so every record
/// written through one instance shares the same IV. See [`KeyMaterial`] for
/// the implications and the per-record-salt escape hatch.
#[derive(Debug, Clone)]
pub struct AesCbcEncryptor {
    material: KeyMaterial,
}

impl AesCbcEncryptor {
    /// Build an encryptor from a passphrase and optional salt.
    ///
    /// Derivation is deterministic; see [`KeyMaterial::derive`].
    pub fn from_passphrase(passphrase: &str, salt: Option<&[u8]>) -> Self {
        Self {
            material: KeyMaterial::derive(passphrase, salt),
        }
    }

    /// Build an encryptor from pre-derived raw key and IV bytes.
    ///
    /// Fails fast on length mismatch; see [`KeyMaterial::from_raw`].
    pub fn from_raw(key: &[u8], iv: &[u8]) -> Result<Self> {
        Ok(Self {
            material: KeyMaterial::from_raw(key, iv)?,
        })
    }

    /// Build an encryptor around existing key material.
    pub fn with_material(material: KeyMaterial) -> Self {
        Self { material }
    }
}

impl Encryptor for AesCbcEncryptor {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        // Empty payloads short-circuit the cipher entirely.
        if plaintext.is_empty() {
            return Ok(Vec::new());
        }

        let cipher = Aes256CbcEnc::new(&self.material.key.into(), &self.material.iv.into());
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() {
            return Ok(Vec::new());
        }

        let cipher = Aes256CbcDec::new(&self.material.key.into(), &self.material.iv.into());
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::Decrypt)
    }
}
