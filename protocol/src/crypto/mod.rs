//! # Cryptographic Primitives
//!
//! Everything security-related in the client flows through here: the
//! Blake2b-256 hash that names messages, transactions and addresses, and an
//! Ed25519 implementation built up from the curve arithmetic in
//! [`edwards`].
//!
//! - **Ed25519** for signatures. Strict RFC 8032 verification plus the
//!   ZIP-215 variant for consensus-compatible checks.
//! - **Blake2b-256** for ids, addresses and the essence hash.
//! - **SHA-512** inside Ed25519 only.
//!
//! ## A note on constant time
//!
//! Key derivation and signing use the constant-time base-point
//! multiplication and branchless table lookups. Whether the compiled code
//! stays branch-free is up to the compiler; this crate cannot guarantee it
//! on its own. Verification handles public data only and uses a faster
//! variable-time path.

pub mod ed25519;
pub mod edwards;
pub mod hash;
pub mod keys;

// Re-export the things callers actually reach for.
pub use ed25519::{key_pair_from_seed, sign, verify, verify_zip215, CryptoError};
pub use hash::{blake2b_256, sha512};
pub use keys::KeyPair;
