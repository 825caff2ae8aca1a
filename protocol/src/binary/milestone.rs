//! Milestone payload: a coordinator checkpoint, optionally carrying a
//! migration receipt.

use serde::{Deserialize, Serialize};

use super::message::{pack_parents, unpack_parents, MessageId};
use super::payload::{pack_payload_frame, unpack_payload_frame_with};
use super::receipt::ReceiptPayload;
use super::serde_hex;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{
    ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH, MERKLE_PROOF_LENGTH,
    MILESTONE_PAYLOAD_TYPE, RECEIPT_PAYLOAD_TYPE,
};
use crate::crypto::hash::blake2b_256;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestonePayload {
    pub index: u32,
    pub timestamp: u64,
    #[serde(with = "serde_hex::list")]
    pub parents: Vec<MessageId>,
    #[serde(with = "serde_hex")]
    pub inclusion_merkle_proof: [u8; MERKLE_PROOF_LENGTH],
    pub next_pow_score: u32,
    pub next_pow_score_milestone_index: u32,
    #[serde(with = "serde_hex::list")]
    pub public_keys: Vec<[u8; ED25519_PUBLIC_KEY_LENGTH]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ReceiptPayload>,
    #[serde(with = "serde_hex::list")]
    pub signatures: Vec<[u8; ED25519_SIGNATURE_LENGTH]>,
}

impl MilestonePayload {
    /// Blake2b-256 of the serialized milestone.
    pub fn id(&self) -> Result<[u8; 32], CodecError> {
        Ok(blake2b_256(&self.to_bytes()?))
    }
}

fn pack_byte_count(
    stream: &mut WriteStream,
    field: &'static str,
    count: usize,
) -> Result<(), CodecError> {
    let count = u8::try_from(count).map_err(|_| CodecError::TooMany {
        field,
        count,
        max: u8::MAX as usize,
    })?;
    stream.write_byte(field, count);
    Ok(())
}

impl Packable for MilestonePayload {
    const ENTITY: &'static str = "milestone payload";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_u32("milestone.type", MILESTONE_PAYLOAD_TYPE);
        stream.write_u32("milestone.index", self.index);
        stream.write_u64("milestone.timestamp", self.timestamp);
        pack_parents(stream, Self::ENTITY, &self.parents)?;
        stream.write_fixed("milestone.inclusionMerkleProof", &self.inclusion_merkle_proof);
        stream.write_u32("milestone.nextPoWScore", self.next_pow_score);
        stream.write_u32(
            "milestone.nextPoWScoreMilestoneIndex",
            self.next_pow_score_milestone_index,
        );

        pack_byte_count(stream, "milestone.publicKeysCount", self.public_keys.len())?;
        for key in &self.public_keys {
            stream.write_fixed("milestone.publicKey", key);
        }
        pack_payload_frame(stream, "milestone.receiptLength", self.receipt.as_ref())?;
        pack_byte_count(stream, "milestone.signaturesCount", self.signatures.len())?;
        for signature in &self.signatures {
            stream.write_fixed("milestone.signature", signature);
        }
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_u32("milestone.type", true)?;
        if tag != MILESTONE_PAYLOAD_TYPE {
            return Err(CodecError::TypeMismatch {
                entity: Self::ENTITY,
                expected: MILESTONE_PAYLOAD_TYPE,
                actual: tag,
            });
        }
        let index = stream.read_u32("milestone.index", true)?;
        let timestamp = stream.read_u64("milestone.timestamp", true)?;
        let parents = unpack_parents(stream, Self::ENTITY)?;
        let inclusion_merkle_proof = stream.read_fixed_array("milestone.inclusionMerkleProof", true)?;
        let next_pow_score = stream.read_u32("milestone.nextPoWScore", true)?;
        let next_pow_score_milestone_index =
            stream.read_u32("milestone.nextPoWScoreMilestoneIndex", true)?;

        let count = stream.read_byte("milestone.publicKeysCount", true)?;
        let public_keys = (0..count)
            .map(|_| stream.read_fixed_array("milestone.publicKey", true))
            .collect::<Result<Vec<_>, _>>()?;

        let receipt =
            unpack_payload_frame_with(stream, "milestone.receiptLength", |payload_type, stream| {
                if payload_type != RECEIPT_PAYLOAD_TYPE {
                    return Err(CodecError::IllegalPayload {
                        context: Self::ENTITY,
                        payload_type,
                    });
                }
                ReceiptPayload::unpack(stream)
            })?;

        let count = stream.read_byte("milestone.signaturesCount", true)?;
        let signatures = (0..count)
            .map(|_| stream.read_fixed_array("milestone.signature", true))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            index,
            timestamp,
            parents,
            inclusion_merkle_proof,
            next_pow_score,
            next_pow_score_milestone_index,
            public_keys,
            receipt,
            signatures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::indexation::IndexationPayload;

    fn milestone() -> MilestonePayload {
        MilestonePayload {
            index: 12,
            timestamp: 1_600_000_000,
            parents: vec![[1; 32], [2; 32]],
            inclusion_merkle_proof: [3; 32],
            next_pow_score: 4000,
            next_pow_score_milestone_index: 20,
            public_keys: vec![[4; 32], [5; 32]],
            receipt: None,
            signatures: vec![[6; 64], [7; 64]],
        }
    }

    #[test]
    fn round_trip_without_receipt() {
        let ms = milestone();
        let bytes = ms.to_bytes().unwrap();
        // type + index + timestamp + count + 2 parents + proof + scores
        // + keys + empty frame + signatures
        assert_eq!(bytes.len(), 4 + 4 + 8 + 1 + 64 + 32 + 8 + 1 + 64 + 4 + 1 + 128);
        assert_eq!(MilestonePayload::from_bytes(&bytes).unwrap(), ms);
    }

    #[test]
    fn unsorted_parents_are_rejected() {
        let mut ms = milestone();
        ms.parents.reverse();
        match ms.to_bytes() {
            Err(CodecError::ParentsNotSorted { entity: "milestone payload" }) => {}
            other => panic!("expected ParentsNotSorted, got {:?}", other),
        }
    }

    #[test]
    fn only_receipts_may_be_embedded() {
        let ms = milestone();
        let mut stream = WriteStream::new();
        stream.write_u32("type", MILESTONE_PAYLOAD_TYPE);
        stream.write_u32("index", ms.index);
        stream.write_u64("timestamp", ms.timestamp);
        pack_parents(&mut stream, "test", &ms.parents).unwrap();
        stream.write_fixed("proof", &ms.inclusion_merkle_proof);
        stream.write_u32("score", 0);
        stream.write_u32("scoreIndex", 0);
        stream.write_byte("keys", 0);
        let indexation = IndexationPayload::new("ms", vec![]).unwrap();
        pack_payload_frame(&mut stream, "receipt", Some(&indexation)).unwrap();
        stream.write_byte("signatures", 0);

        match MilestonePayload::from_bytes(stream.final_bytes()) {
            Err(CodecError::IllegalPayload { payload_type: 2, .. }) => {}
            other => panic!("expected IllegalPayload, got {:?}", other),
        }
    }

    /// Milestone header up to and including the public keys.
    fn header(stream: &mut WriteStream, ms: &MilestonePayload) {
        stream.write_u32("type", MILESTONE_PAYLOAD_TYPE);
        stream.write_u32("index", ms.index);
        stream.write_u64("timestamp", ms.timestamp);
        pack_parents(stream, "test", &ms.parents).unwrap();
        stream.write_fixed("proof", &ms.inclusion_merkle_proof);
        stream.write_u32("score", 0);
        stream.write_u32("scoreIndex", 0);
        stream.write_byte("keys", 0);
    }

    #[test]
    fn nested_milestone_is_rejected_by_its_tag() {
        let ms = milestone();
        let mut stream = WriteStream::new();
        header(&mut stream, &ms);
        pack_payload_frame(&mut stream, "receipt", Some(&ms)).unwrap();
        stream.write_byte("signatures", 0);

        match MilestonePayload::from_bytes(stream.final_bytes()) {
            Err(CodecError::IllegalPayload {
                context: "milestone payload",
                payload_type: 1,
            }) => {}
            other => panic!("expected IllegalPayload, got {:?}", other),
        }
    }

    #[test]
    fn garbage_behind_a_foreign_tag_is_never_parsed() {
        // A frame claiming a transaction payload whose body is not even a
        // valid essence: the tag alone decides.
        let ms = milestone();
        let mut stream = WriteStream::new();
        header(&mut stream, &ms);
        stream.write_u32("receipt", 8);
        stream.write_u32("payload.type", 0);
        stream.write_u32("junk", 0xffff_ffff);
        stream.write_byte("signatures", 0);

        match MilestonePayload::from_bytes(stream.final_bytes()) {
            Err(CodecError::IllegalPayload { payload_type: 0, .. }) => {}
            other => panic!("expected IllegalPayload, got {:?}", other),
        }
    }
}
