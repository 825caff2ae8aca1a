//! # Ed25519 Signatures
//!
//! RFC 8032 key derivation, signing and verification on top of the
//! [`edwards`](super::edwards) arithmetic, plus the ZIP-215 verification
//! rules.
//!
//! ## Two verifiers
//!
//! - [`verify`] is strict: the public key must be a canonical encoding,
//!   `s` must be reduced, and the recomputed R must match the signature's R
//!   byte for byte.
//! - [`verify_zip215`] is the consensus-friendly variant. It accepts
//!   non-canonical point encodings and compares R up to the cofactor, so
//!   every implementation agrees on the same set of valid signatures. Every
//!   signature [`verify`] accepts, it accepts too.
//!
//! Invalid signatures are never errors: both verifiers return `false`.
//! Errors are reserved for malformed key material handed to
//! [`key_pair_from_seed`] and [`sign`].

use thiserror::Error;

use super::edwards::{ExtendedPoint, ProjectivePoint, Scalar};
use super::hash::sha512;
use super::keys::KeyPair;

pub const SEED_LENGTH: usize = 32;
pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const PRIVATE_KEY_LENGTH: usize = 64;
pub const SIGNATURE_LENGTH: usize = 64;

/// Errors raised before any curve arithmetic runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The seed was not exactly 32 bytes.
    #[error("seed length is incorrect: expected {SEED_LENGTH} bytes, got {actual}")]
    SeedLength { actual: usize },

    /// The private key was not exactly 64 bytes (seed ‖ public key).
    #[error("private key length is incorrect: expected {PRIVATE_KEY_LENGTH} bytes, got {actual}")]
    KeyLength { actual: usize },
}

/// Clamps the low half of an expanded secret into an Ed25519 scalar.
fn clamp(digest: &[u8; 64]) -> [u8; 32] {
    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(&digest[..32]);
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
    scalar
}

/// Derives a key pair from a 32-byte seed.
///
/// The private key is `seed ‖ public_key`.
pub fn key_pair_from_seed(seed: &[u8]) -> Result<KeyPair, CryptoError> {
    let seed: &[u8; SEED_LENGTH] = seed
        .try_into()
        .map_err(|_| CryptoError::SeedLength { actual: seed.len() })?;
    Ok(derive_key_pair(seed))
}

pub(crate) fn derive_key_pair(seed: &[u8; SEED_LENGTH]) -> KeyPair {
    let digest = sha512(&[seed]);
    let public_key = ExtendedPoint::scalar_mult_base(&clamp(&digest)).to_bytes();

    let mut private_key = [0u8; PRIVATE_KEY_LENGTH];
    private_key[..32].copy_from_slice(seed);
    private_key[32..].copy_from_slice(&public_key);

    KeyPair {
        public_key,
        private_key,
    }
}

/// Signs `message` with a 64-byte private key.
pub fn sign(private_key: &[u8], message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], CryptoError> {
    let private_key: &[u8; PRIVATE_KEY_LENGTH] =
        private_key.try_into().map_err(|_| CryptoError::KeyLength {
            actual: private_key.len(),
        })?;
    Ok(sign_with_key(private_key, message))
}

pub(crate) fn sign_with_key(
    private_key: &[u8; PRIVATE_KEY_LENGTH],
    message: &[u8],
) -> [u8; SIGNATURE_LENGTH] {
    let (seed, public_key) = private_key.split_at(32);

    let digest = sha512(&[seed]);
    let secret = Scalar::from_bytes(clamp(&digest));

    let nonce = Scalar::reduce(&sha512(&[&digest[32..], message]));
    let encoded_r = ExtendedPoint::scalar_mult_base(nonce.as_bytes()).to_bytes();

    let k = Scalar::reduce(&sha512(&[&encoded_r, public_key, message]));
    let s = Scalar::mul_add(&k, &secret, &nonce);

    let mut signature = [0u8; SIGNATURE_LENGTH];
    signature[..32].copy_from_slice(&encoded_r);
    signature[32..].copy_from_slice(s.as_bytes());
    signature
}

/// Splits a signature into `(R, s)` after the cheap structural checks
/// shared by both verifiers.
fn split_signature(public_key: &[u8], signature: &[u8]) -> Option<([u8; 32], Scalar)> {
    if public_key.len() != PUBLIC_KEY_LENGTH || signature.len() != SIGNATURE_LENGTH {
        return None;
    }
    if signature[63] & 0xe0 != 0 {
        return None;
    }

    let mut r = [0u8; 32];
    r.copy_from_slice(&signature[..32]);
    let mut s = [0u8; 32];
    s.copy_from_slice(&signature[32..]);

    // RFC 8032 5.1.7: s must lie in [0, l) to rule out malleability.
    let s = Scalar::from_bytes(s);
    if !s.is_canonical() {
        return None;
    }
    Some((r, s))
}

/// Strict RFC 8032 verification.
///
/// Returns `false` for malformed lengths, a set top-three bits in the last
/// signature byte, a non-reduced `s`, a public key that does not decode,
/// or a signature that simply does not match.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Some((r, s)) = split_signature(public_key, signature) else {
        return false;
    };

    let mut key = [0u8; 32];
    key.copy_from_slice(public_key);
    let Some(a) = ExtendedPoint::from_canonical_bytes(&key) else {
        return false;
    };

    let k = Scalar::reduce(&sha512(&[&r, public_key, message]));
    let check = ProjectivePoint::double_scalar_mult_vartime(&k, &a.negate(), &s);
    check.to_bytes() == r
}

/// ZIP-215 verification: permissive point decoding, cofactored equation.
pub fn verify_zip215(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Some((r_bytes, s)) = split_signature(public_key, signature) else {
        return false;
    };

    let mut key = [0u8; 32];
    key.copy_from_slice(public_key);
    let Some(a) = ExtendedPoint::from_bytes(&key) else {
        return false;
    };
    let Some(r) = ExtendedPoint::from_bytes(&r_bytes) else {
        return false;
    };

    let k = Scalar::reduce(&sha512(&[&r_bytes, public_key, message]));
    let check = ProjectivePoint::double_scalar_mult_vartime(&k, &a.negate(), &s).to_extended();
    check.cofactor_equal(&r)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc_key() -> KeyPair {
        // RFC 8032 7.1, TEST 1.
        let seed =
            hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
                .unwrap();
        key_pair_from_seed(&seed).unwrap()
    }

    #[test]
    fn rfc8032_test_1() {
        let kp = rfc_key();
        assert_eq!(
            hex::encode(kp.public_key),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );

        let sig = sign(&kp.private_key, b"").unwrap();
        assert_eq!(
            hex::encode(sig),
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
             5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        );
        assert!(verify(&kp.public_key, b"", &sig));
        assert!(verify_zip215(&kp.public_key, b"", &sig));
    }

    #[test]
    fn seed_length_is_checked() {
        match key_pair_from_seed(&[0u8; 31]) {
            Err(CryptoError::SeedLength { actual: 31 }) => {}
            other => panic!("expected SeedLength, got {:?}", other),
        }
        assert!(key_pair_from_seed(&[0u8; 33]).is_err());
    }

    #[test]
    fn private_key_length_is_checked() {
        match sign(&[0u8; 32], b"msg") {
            Err(CryptoError::KeyLength { actual: 32 }) => {}
            other => panic!("expected KeyLength, got {:?}", other),
        }
    }

    #[test]
    fn malformed_inputs_do_not_verify() {
        let kp = rfc_key();
        let sig = sign(&kp.private_key, b"hello").unwrap();

        assert!(!verify(&kp.public_key[..31], b"hello", &sig));
        assert!(!verify(&kp.public_key, b"hello", &sig[..63]));

        let mut high_bits = sig;
        high_bits[63] |= 0x80;
        assert!(!verify(&kp.public_key, b"hello", &high_bits));
        assert!(!verify_zip215(&kp.public_key, b"hello", &high_bits));
    }

    #[test]
    fn unreduced_s_is_rejected() {
        let kp = rfc_key();
        let mut sig = sign(&kp.private_key, b"hello").unwrap();

        // s + l still satisfies the group equation, but is not reduced.
        let l: [u8; 32] = [
            0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
            0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10,
        ];
        let mut carry = 0u16;
        for i in 0..32 {
            let sum = sig[32 + i] as u16 + l[i] as u16 + carry;
            sig[32 + i] = sum as u8;
            carry = sum >> 8;
        }
        assert_eq!(sig[63] & 0xe0, 0);

        assert!(!verify(&kp.public_key, b"hello", &sig));
        assert!(!verify_zip215(&kp.public_key, b"hello", &sig));
    }

    #[test]
    fn tampering_breaks_verification() {
        let kp = rfc_key();
        let msg = b"tamper with me".to_vec();
        let sig = sign(&kp.private_key, &msg).unwrap();
        assert!(verify(&kp.public_key, &msg, &sig));

        let mut bad_msg = msg.clone();
        bad_msg[0] ^= 1;
        assert!(!verify(&kp.public_key, &bad_msg, &sig));

        let mut bad_sig = sig;
        bad_sig[5] ^= 0x10;
        assert!(!verify(&kp.public_key, &msg, &bad_sig));

        let mut bad_key = kp.public_key;
        bad_key[0] ^= 1;
        assert!(!verify(&bad_key, &msg, &sig));
    }
}
