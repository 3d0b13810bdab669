//! Codec error types.

use thiserror::Error;

/// Error from encoding or decoding a payload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The value could not be encoded.
    #[error("Failed to encode value")]
    Encode {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The payload could not be decoded back into a value.
    #[error("Failed to decode payload")]
    Decode {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
