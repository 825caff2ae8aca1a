//! Addresses: who an output is locked to.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::serde_hex;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{ED25519_ADDRESS_LENGTH, ED25519_ADDRESS_TYPE};
use crate::crypto::hash::blake2b_256;

/// Only the Ed25519 variant exists today: the Blake2b-256 hash of a public
/// key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Address {
    Ed25519(#[serde(with = "serde_hex")] [u8; ED25519_ADDRESS_LENGTH]),
}

impl Address {
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Address::Ed25519(blake2b_256(public_key))
    }

    pub fn address_type(&self) -> u8 {
        match self {
            Address::Ed25519(_) => ED25519_ADDRESS_TYPE,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Address::Ed25519(hash) => hash,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.as_bytes()))
    }
}

impl Packable for Address {
    const ENTITY: &'static str = "address";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        match self {
            Address::Ed25519(hash) => {
                stream.write_byte("address.type", ED25519_ADDRESS_TYPE);
                stream.write_fixed("address.ed25519", hash);
            }
        }
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_byte("address.type", false)?;
        match tag {
            ED25519_ADDRESS_TYPE => {
                stream.read_byte("address.type", true)?;
                Ok(Address::Ed25519(
                    stream.read_fixed_array("address.ed25519", true)?,
                ))
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

    #[test]
    fn layout_is_tag_then_hash() {
        let address = Address::Ed25519([0x11; 32]);
        let bytes = address.to_bytes().unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 0);
        assert_eq!(Address::from_bytes(&bytes).unwrap(), address);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut bytes = vec![9u8];
        bytes.extend_from_slice(&[0u8; 32]);
        match Address::from_bytes(&bytes) {
            Err(CodecError::UnrecognizedType { tag: 9, .. }) => {}
            other => panic!("expected UnrecognizedType, got {:?}", other),
        }
    }

    #[test]
    fn json_is_hex() {
        let address = Address::Ed25519([0xab; 32]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("{{\"ed25519\":\"{}\"}}", "ab".repeat(32)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
