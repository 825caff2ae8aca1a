//! # Hashing Utilities
//!
//! The ledger uses exactly two hash functions:
//!
//! - **Blake2b-256**: message ids, transaction ids, addresses (the hash of a
//!   public key) and, most importantly, the essence hash that every input's
//!   key signs.
//! - **SHA-512**: internal to Ed25519 (key expansion, nonce derivation and
//!   the challenge scalar). Nothing outside [`crate::crypto::ed25519`] should
//!   need it.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use sha2::Sha512;

/// Blake2b with a 32-byte digest.
pub type Blake2b256 = Blake2b<U32>;

/// Length of a Blake2b-256 digest.
pub const BLAKE2B_256_LENGTH: usize = 32;

/// Compute the Blake2b-256 hash of the input data.
///
/// # Example
///
/// ```
/// use tangle_protocol::crypto::blake2b_256;
///
/// let hash = blake2b_256(b"tangle");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn blake2b_256(data: &[u8]) -> [u8; BLAKE2B_256_LENGTH] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-512 over the concatenation of `parts` without building the
/// concatenated buffer.
pub fn sha512(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
