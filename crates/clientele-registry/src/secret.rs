//! Client secret hashing.
//!
//! The registry never stores or compares plaintext secrets. Everything
//! downstream sees only the digest, rendered in the canonical hex form.

use crate::canonicalize::canonical_hex;
use sha2::{Digest, Sha256};

/// One-way, deterministic secret digest.
pub trait SecretHasher: Send + Sync {
    /// Hashes a plaintext secret.
    fn hash(&self, plaintext: &str) -> Vec<u8>;
}

/// SHA-256 secret hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl SecretHasher for Sha256Hasher {
    fn hash(&self, plaintext: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hasher.finalize().to_vec()
    }
}

/// Hashes `plaintext` and renders the digest as canonical hex.
///
/// ```rust
/// use clientele_registry::secret::{hash_hex, Sha256Hasher};
///
/// assert_eq!(
///     hash_hex(&Sha256Hasher, "abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn hash_hex<H: SecretHasher + ?Sized>(hasher: &H, plaintext: &str) -> String {
    canonical_hex(&hasher.hash(plaintext))
}
