//! Store and provider error types.
//!
//! Every pipeline failure is wrapped with the identity of the key it
//! happened for; a silently-corrupted save is worse than a loud failure, so
//! nothing here is ever swallowed.

use std::path::PathBuf;

use thiserror::Error;

use sealbox_codec::CodecError;
use sealbox_crypto::CryptoError;
use sealbox_migrate::MigrateError;

/// Error from a byte-store backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete write to {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error from a provider pipeline operation, tagged with the failing key.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// Blob payload is not in the expected format.
    #[error("Invalid blob format for key '{key}': {reason}")]
    InvalidFormat { key: String, reason: String },

    /// Blob was written by a newer schema than this provider supports.
    #[error("Blob for key '{key}' has schema version {found}, provider supports up to {current}")]
    UnsupportedVersion { key: String, found: u32, current: u32 },

    /// Encoding or decoding through the codec failed.
    #[error("Codec failure for key '{key}'")]
    Codec {
        key: String,
        #[source]
        source: CodecError,
    },

    /// Encryption or decryption failed.
    #[error("Crypto failure for key '{key}'")]
    Crypto {
        key: String,
        #[source]
        source: CryptoError,
    },

    /// Integrity stamp did not match the payload: tampering or corruption.
    ///
    /// Deliberately distinct from [`ProviderError::Crypto`] so callers can
    /// branch on tamper detection without string-matching messages.
    #[error("Integrity check failed for key '{key}'")]
    Integrity { key: String },

    /// Schema migration failed while loading.
    #[error("Migration failure for key '{key}'")]
    Migration {
        key: String,
        #[source]
        source: MigrateError,
    },

    /// The byte-store backend failed.
    #[error("Storage failure for key '{key}'")]
    Backend {
        key: String,
        #[source]
        source: StoreError,
    },

    /// A background task running an async twin failed to complete.
    #[error("Background task for key '{key}' failed")]
    Task {
        key: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ProviderError {
    /// The key the failing operation was addressed to.
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidFormat { key, .. }
            | Self::UnsupportedVersion { key, .. }
            | Self::Codec { key, .. }
            | Self::Crypto { key, .. }
            | Self::Integrity { key }
            | Self::Migration { key, .. }
            | Self::Backend { key, .. }
            | Self::Task { key, .. } => key,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFormat { key, .. } => {
                format!("The saved data for '{key}' is not in a recognized format.")
            }
            Self::UnsupportedVersion { key, found, current } => {
                format!(
                    "The saved data for '{key}' was written by a newer version \
                    (schema {found}, this build supports up to {current})."
                )
            }
            Self::Codec { key, .. } => {
                format!("The saved data for '{key}' could not be read. It may be corrupted.")
            }
            Self::Crypto { key, .. } => {
                format!(
                    "The saved data for '{key}' could not be decrypted. \
                    The passphrase may be wrong or the data corrupted."
                )
            }
            Self::Integrity { key } => {
                format!("The saved data for '{key}' failed its integrity check.")
            }
            Self::Migration { key, .. } => {
                format!("The saved data for '{key}' could not be upgraded to the current format.")
            }
            Self::Backend { key, .. } => {
                format!("The storage backend failed while accessing '{key}'.")
            }
            Self::Task { key, .. } => {
                format!("A background operation on '{key}' did not complete.")
            }
        }
    }
}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
