//! Crypto error types.

use thiserror::Error;

/// Error from key-material construction or a cipher operation.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CryptoError {
    /// Raw key had the wrong length. Raised at construction, never deferred
    /// to the first encrypt call.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Raw initialization vector had the wrong length.
    #[error("invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    /// Encryption failed.
    #[error("encryption failure")]
    Encrypt,

    /// Decryption failed: wrong key material, corrupted ciphertext, or a
    /// padding mismatch. Deliberately carries no detail that would let a
    /// caller distinguish padding errors from key errors.
    #[error("decryption failure")]
    Decrypt,
}

/// Result type alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
