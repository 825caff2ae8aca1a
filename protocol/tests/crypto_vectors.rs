//! Ed25519 against known vectors and generated inputs.
//!
//! The generated cases run the full curve stack (field, group, scalar) for
//! every seed, so they double as a regression net for the arithmetic.

use proptest::prelude::*;

use tangle_protocol::crypto::{key_pair_from_seed, sign, verify, verify_zip215, CryptoError};
use tangle_protocol::crypto::edwards::scalar::Scalar;

// ---------------------------------------------------------------------------
// Known vectors
// ---------------------------------------------------------------------------

#[test]
fn seed_of_aa_bytes_derives_known_public_key() {
    let pair = key_pair_from_seed(&[0xaa; 32]).unwrap();
    assert_eq!(
        hex::encode(pair.public_key),
        "e734ea6c2b6257de72355e472aa05a4c487e6b463c029ed306df2f01b5636b58"
    );
    assert_eq!(&pair.private_key[..32], &[0xaa; 32]);
    assert_eq!(&pair.private_key[32..], &pair.public_key);
}

#[test]
fn hundred_bytes_of_0x64_sign_to_known_prefix() {
    let pair = key_pair_from_seed(&[0xaa; 32]).unwrap();
    let message = [0x64u8; 100];
    let signature = sign(&pair.private_key, &message).unwrap();

    assert!(hex::encode(signature).starts_with("359aa3bd52531f40f5fa85a9c8d16f7f"));
    assert!(verify(&pair.public_key, &message, &signature));
    assert!(verify_zip215(&pair.public_key, &message, &signature));
}

#[test]
fn wrong_lengths_fail_fast() {
    match key_pair_from_seed(&[0u8; 31]) {
        Err(CryptoError::SeedLength { actual: 31 }) => {}
        other => panic!("expected SeedLength, got {:?}", other),
    }
    match sign(&[0u8; 63], b"m") {
        Err(CryptoError::KeyLength { actual: 63 }) => {}
        other => panic!("expected KeyLength, got {:?}", other),
    }
    assert!(!verify(&[0u8; 31], b"m", &[0u8; 64]));
    assert!(!verify(&[0u8; 32], b"m", &[0u8; 63]));
}

/// Adds the group order to `s`, giving an equivalent but unreduced scalar.
fn add_group_order(s: &[u8]) -> [u8; 32] {
    const L: [u8; 32] = [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
        0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x10,
    ];
    let mut out = [0u8; 32];
    let mut carry = 0u16;
    for i in 0..32 {
        let sum = s[i] as u16 + L[i] as u16 + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }
    out
}

#[test]
fn unreduced_s_is_rejected_by_both_verifiers() {
    let pair = key_pair_from_seed(&[7; 32]).unwrap();
    let mut signature = sign(&pair.private_key, b"malleable").unwrap();
    let bumped = add_group_order(&signature[32..]);
    assert!(!Scalar::from_bytes(bumped).is_canonical());
    signature[32..].copy_from_slice(&bumped);

    assert!(!verify(&pair.public_key, b"malleable", &signature));
    assert!(!verify_zip215(&pair.public_key, b"malleable", &signature));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sign_then_verify(seed in any::<[u8; 32]>(), message in prop::collection::vec(any::<u8>(), 0..256)) {
        let pair = key_pair_from_seed(&seed).unwrap();
        let signature = sign(&pair.private_key, &message).unwrap();
        prop_assert!(verify(&pair.public_key, &message, &signature));
        prop_assert!(verify_zip215(&pair.public_key, &message, &signature));
    }

    #[test]
    fn any_flipped_bit_breaks_verification(
        seed in any::<[u8; 32]>(),
        message in prop::collection::vec(any::<u8>(), 1..64),
        target in 0usize..3,
        bit in any::<prop::sample::Index>(),
    ) {
        let pair = key_pair_from_seed(&seed).unwrap();
        let mut message = message;
        let mut signature = sign(&pair.private_key, &message).unwrap();
        let mut public_key = pair.public_key;

        match target {
            0 => {
                let i = bit.index(message.len() * 8);
                message[i / 8] ^= 1 << (i % 8);
            }
            1 => {
                let i = bit.index(512);
                signature[i / 8] ^= 1 << (i % 8);
            }
            _ => {
                let i = bit.index(256);
                public_key[i / 8] ^= 1 << (i % 8);
            }
        }
        prop_assert!(!verify(&public_key, &message, &signature));
    }
}
