//! Encryption and integrity-stamp layers for sealbox blobs.
//!
//! Two independent byte-transform families live here:
//!
//! - [`Encryptor`]: reversible confidentiality transforms. [`NoopEncryptor`]
//!   and AES-256-CBC via [`AesCbcEncryptor`], with key material derived from
//!   a passphrase (PBKDF2-HMAC-SHA256) or supplied raw.
//! - [`Validator`]: integrity stamps. [`NoopValidator`], CRC32 for
//!   accidental corruption, SHA-256 for adversarial tampering. Verification
//!   always compares in constant time.
//!
//! Both plug into the store crate's provider layers; neither knows about
//! storage or serialization.

mod cipher;
mod error;
mod integrity;
mod key;

pub use cipher::{AesCbcEncryptor, Encryptor, NoopEncryptor};
pub use error::{CryptoError, Result};
pub use integrity::{
    Crc32Validator, NoopValidator, Sha256Validator, Validator, constant_time_compare,
};
pub use key::{IV_SIZE, KDF_ITERATIONS, KEY_SIZE, KeyMaterial};
