//! Signatures carried by unlock blocks.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::serde_hex;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH, ED25519_SIGNATURE_TYPE};
use crate::crypto::ed25519;

/// An Ed25519 signature together with the public key that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519Signature {
    #[serde(with = "serde_hex")]
    pub public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
    #[serde(with = "serde_hex")]
    pub signature: [u8; ED25519_SIGNATURE_LENGTH],
}

impl Ed25519Signature {
    /// Strict RFC 8032 verification of `message` against the embedded key.
    pub fn verify(&self, message: &[u8]) -> bool {
        ed25519::verify(&self.public_key, message, &self.signature)
    }

    /// The address owned by the embedded public key.
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signature {
    Ed25519(Ed25519Signature),
}

impl Signature {
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Signature::Ed25519(sig) => sig.verify(message),
        }
    }

    pub fn public_key(&self) -> &[u8; ED25519_PUBLIC_KEY_LENGTH] {
        match self {
            Signature::Ed25519(sig) => &sig.public_key,
        }
    }
}

impl Packable for Signature {
    const ENTITY: &'static str = "signature";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        match self {
            Signature::Ed25519(sig) => {
                stream.write_byte("signature.type", ED25519_SIGNATURE_TYPE);
                stream.write_fixed("signature.publicKey", &sig.public_key);
                stream.write_fixed("signature.signature", &sig.signature);
            }
        }
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        match stream.read_byte("signature.type", false)? {
            ED25519_SIGNATURE_TYPE => {
                stream.read_byte("signature.type", true)?;
                Ok(Signature::Ed25519(Ed25519Signature {
                    public_key: stream.read_fixed_array("signature.publicKey", true)?,
                    signature: stream.read_fixed_array("signature.signature", true)?,
                }))
            }
            other => Err(CodecError::UnrecognizedType {
                entity: Self::ENTITY,
                tag: other as u32,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    #[test]
    fn layout_is_tag_key_signature() {
        let sig = Signature::Ed25519(Ed25519Signature {
            public_key: [1; 32],
            signature: [2; 64],
        });
        let bytes = sig.to_bytes().unwrap();
        assert_eq!(bytes.len(), 1 + 32 + 64);
        assert_eq!(bytes[0], ED25519_SIGNATURE_TYPE);
        assert_eq!(Signature::from_bytes(&bytes).unwrap(), sig);
    }

    #[test]
    fn verifies_against_embedded_key() {
        let pair = KeyPair::from_seed(&[5u8; 32]);
        let sig = Ed25519Signature {
            public_key: pair.public_key,
            signature: pair.sign(b"essence"),
        };
        assert!(sig.verify(b"essence"));
        assert!(!sig.verify(b"other"));
        assert_eq!(sig.address(), pair.address());
    }

    #[test]
    fn unknown_signature_type() {
        match Signature::from_bytes(&[1u8; 97]) {
            Err(CodecError::UnrecognizedType { entity: "signature", tag: 1 }) => {}
            other => panic!("expected UnrecognizedType, got {:?}", other),
        }
    }
}
