//! Typed value <-> byte sequence codec contract.
//!
//! The persistence pipeline treats serialization as an external collaborator:
//! anything that can turn a typed value into bytes and back, losslessly, can
//! drive a provider. This crate defines that contract plus a JSON-backed
//! reference implementation used by the default wiring and the test suites.
//!
//! Codecs must round-trip: `decode(encode(v)) == v` for every supported `T`.

mod error;

pub use error::{CodecError, Result};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Bidirectional typed-value <-> byte-sequence codec.
///
/// Implementations must be stateless across calls; a single codec instance is
/// shared by every save and load that runs through one provider.
pub trait Codec: Send + Sync {
    /// Encode a value into a byte payload.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode a byte payload back into a value.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;

    /// Encode a value into a text payload.
    fn encode_text<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Decode a text payload back into a value.
    fn decode_text<T: DeserializeOwned>(&self, text: &str) -> Result<T>;
}

/// JSON codec backed by `serde_json`.
///
/// Human-readable and schema-tolerant, which keeps stored blobs inspectable
/// once decrypted. Binary codecs plug in through the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode {
            source: Box::new(e),
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
            source: Box::new(e),
        })
    }

    fn encode_text<T: Serialize>(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| CodecError::Encode {
            source: Box::new(e),
        })
    }

    fn decode_text<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|e| CodecError::Decode {
            source: Box::new(e),
        })
    }
}
