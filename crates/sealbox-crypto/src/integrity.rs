//! Integrity stamps: checksum and digest validators.

use sha2::{Digest, Sha256};

/// Computes and verifies an integrity stamp over a byte sequence.
///
/// A stamp is bound to exactly one payload; verification recomputes the stamp
/// and compares in constant time.
pub trait Validator: Send + Sync {
    /// Compute the stamp for a payload. Empty input yields an empty stamp.
    fn compute_stamp(&self, bytes: &[u8]) -> Vec<u8>;

    /// Check a payload against a previously computed stamp.
    fn verify(&self, bytes: &[u8], stamp: &[u8]) -> bool {
        constant_time_compare(&self.compute_stamp(bytes), stamp)
    }
}

/// Validator that stamps nothing and accepts everything.
///
/// An explicit opt-out of integrity checking, not a safe default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

impl NoopValidator {
    /// Create a new no-op validator.
    pub fn new() -> Self {
        Self
    }
}

impl Validator for NoopValidator {
    fn compute_stamp(&self, _bytes: &[u8]) -> Vec<u8> {
        Vec::new()
    }

    fn verify(&self, _bytes: &[u8], _stamp: &[u8]) -> bool {
        true
    }
}

/// CRC32 checksum validator.
///
/// Fast and small (4-byte stamp). Detects accidental corruption only; a
/// deliberate tamperer can trivially recompute the checksum. Use
/// [`Sha256Validator`] when tampering is in the threat model.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32Validator;

impl Crc32Validator {
    /// Create a new CRC32 validator.
    pub fn new() -> Self {
        Self
    }
}

impl Validator for Crc32Validator {
    fn compute_stamp(&self, bytes: &[u8]) -> Vec<u8> {
        if bytes.is_empty() {
            return Vec::new();
        }
        crc32fast::hash(bytes).to_le_bytes().to_vec()
    }
}

/// SHA-256 digest validator.
///
/// Cryptographic strength (32-byte stamp): detects adversarial tampering at
/// more CPU cost than [`Crc32Validator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Validator;

impl Sha256Validator {
    /// Create a new SHA-256 validator.
    pub fn new() -> Self {
        Self
    }
}

impl Validator for Sha256Validator {
    fn compute_stamp(&self, bytes: &[u8]) -> Vec<u8> {
        if bytes.is_empty() {
            return Vec::new();
        }
        Sha256::digest(bytes).to_vec()
    }
}

/// Compare two byte slices in constant time.
///
/// Walks every byte and accumulates differences instead of returning on the
/// first mismatch, so the comparison cost does not depend on where the slices
/// diverge.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_round_trip() {
        let validator = Crc32Validator::new();
        let payload = b"stable payload";

        let stamp = validator.compute_stamp(payload);
        assert_eq!(stamp.len(), 4);
        assert!(validator.verify(payload, &stamp));
    }

    #[test]
    fn test_sha256_round_trip() {
        let validator = Sha256Validator::new();
        let payload = b"stable payload";

        let stamp = validator.compute_stamp(payload);
        assert_eq!(stamp.len(), 32);
        assert!(validator.verify(payload, &stamp));
    }

    #[test]
    fn test_sha256_known_vector() {
        let validator = Sha256Validator::new();
        let stamp = validator.compute_stamp(b"Hello, World!");
        assert_eq!(
            hex::encode(stamp),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_empty_input_yields_empty_stamp() {
        assert!(Crc32Validator::new().compute_stamp(&[]).is_empty());
        assert!(Sha256Validator::new().compute_stamp(&[]).is_empty());
        assert!(Crc32Validator::new().verify(&[], &[]));
    }

    #[test]
    fn test_noop_accepts_anything() {
        let validator = NoopValidator::new();
        assert!(validator.compute_stamp(b"whatever").is_empty());
        assert!(validator.verify(b"whatever", b"not even a stamp"));
    }

    #[test]
    fn test_single_bit_flip_detected() {
        let crc = Crc32Validator::new();
        let sha = Sha256Validator::new();
        let payload = b"sensitive bytes".to_vec();
        let crc_stamp = crc.compute_stamp(&payload);
        let sha_stamp = sha.compute_stamp(&payload);

        for bit in 0..payload.len() * 8 {
            let mut corrupted = payload.clone();
            corrupted[bit / 8] ^= 1 << (bit % 8);
            assert!(!crc.verify(&corrupted, &crc_stamp), "crc missed bit {bit}");
            assert!(!sha.verify(&corrupted, &sha_stamp), "sha missed bit {bit}");
        }
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abd"));
        assert!(!constant_time_compare(b"abc", b"ab"));
        assert!(constant_time_compare(&[], &[]));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_stamp_is_deterministic(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
                let validator = Sha256Validator::new();
                let a = validator.compute_stamp(&payload);
                let b = validator.compute_stamp(&payload);
                prop_assert_eq!(a, b);
            }
        }
    }
}
