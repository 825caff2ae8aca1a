//! # Key Management
//!
//! Ed25519 key pairs for spending ledger outputs.
//!
//! A key pair owns exactly one address: the Blake2b-256 hash of its public
//! key. Outputs locked to that address can only be consumed by a
//! transaction carrying a signature unlock block made with this key.
//!
//! ## Security considerations
//!
//! - Key generation pulls from the OS RNG (`rand_core::OsRng`).
//! - `KeyPair` does not implement `Serialize`. Exporting a private key
//!   should be a deliberate act (`private_key` is public for that reason,
//!   not so it ends up in a JSON response).
//! - `Debug` prints the public key only.

use rand_core::{OsRng, RngCore};
use std::fmt;

use super::ed25519::{self, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH};
use super::hash::blake2b_256;
use crate::binary::address::Address;

/// An Ed25519 key pair.
///
/// # Examples
///
/// ```
/// use tangle_protocol::crypto::keys::KeyPair;
///
/// let kp = KeyPair::from_seed(&[7u8; 32]);
/// let sig = kp.sign(b"spend output 0");
/// assert!(kp.verify(b"spend output 0", &sig));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public_key: [u8; PUBLIC_KEY_LENGTH],
    /// `seed ‖ public_key`.
    pub private_key: [u8; PRIVATE_KEY_LENGTH],
}

impl KeyPair {
    /// Generate a fresh key pair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        let mut seed = [0u8; SEED_LENGTH];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Derive a key pair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        ed25519::derive_key_pair(seed)
    }

    /// The 32-byte seed this key pair was derived from.
    pub fn seed(&self) -> [u8; SEED_LENGTH] {
        let mut seed = [0u8; SEED_LENGTH];
        seed.copy_from_slice(&self.private_key[..SEED_LENGTH]);
        seed
    }

    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        ed25519::sign_with_key(&self.private_key, message)
    }

    /// Strict verification against this key pair's public key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        ed25519::verify(&self.public_key, message, signature)
    }

    /// The Ed25519 address owned by this key pair.
    pub fn address(&self) -> Address {
        Address::Ed25519(blake2b_256(&self.public_key))
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_seed_is_deterministic() {
        let a = KeyPair::from_seed(&[1u8; 32]);
        let b = KeyPair::from_seed(&[1u8; 32]);
        assert_eq!(a, b);
        assert_eq!(a.seed(), [1u8; 32]);
        assert_eq!(&a.private_key[32..], &a.public_key[..]);
    }

    #[test]
    fn generated_keys_differ() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        assert_ne!(a.public_key, b.public_key);
    }

    #[test]
    fn address_is_hash_of_public_key() {
        let kp = KeyPair::from_seed(&[2u8; 32]);
        match kp.address() {
            Address::Ed25519(hash) => assert_eq!(hash, blake2b_256(&kp.public_key)),
        }
    }

    #[test]
    fn debug_hides_private_key() {
        let kp = KeyPair::from_seed(&[3u8; 32]);
        let printed = format!("{:?}", kp);
        assert!(printed.contains(&kp.public_key_hex()));
        assert!(!printed.contains(&hex::encode(kp.seed())));
    }

    #[test]
    fn sign_matches_free_function() {
        let kp = KeyPair::from_seed(&[4u8; 32]);
        let sig = kp.sign(b"payload");
        assert_eq!(ed25519::sign(&kp.private_key, b"payload").unwrap(), sig);
        assert!(kp.verify(b"payload", &sig));
        assert!(!kp.verify(b"other payload", &sig));
    }
}
