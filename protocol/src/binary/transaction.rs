//! Transaction payload: an essence plus one unlock block per input.

use serde::{Deserialize, Serialize};

use super::essence::TransactionEssence;
use super::unlock_block::UnlockBlock;
use crate::codec::{pack_count, unpack_count, CodecError, Packable, ReadStream, WriteStream};
use crate::config::{MAX_INPUT_COUNT, TRANSACTION_ESSENCE_TYPE, TRANSACTION_ID_LENGTH, TRANSACTION_PAYLOAD_TYPE};
use crate::crypto::hash::blake2b_256;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub essence: TransactionEssence,
    pub unlock_blocks: Vec<UnlockBlock>,
}

impl TransactionPayload {
    /// Blake2b-256 of the serialized payload. Output ids of this
    /// transaction are derived from it.
    pub fn id(&self) -> Result<[u8; TRANSACTION_ID_LENGTH], CodecError> {
        Ok(blake2b_256(&self.to_bytes()?))
    }
}

impl Packable for TransactionPayload {
    const ENTITY: &'static str = "transaction payload";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_u32("transaction.type", TRANSACTION_PAYLOAD_TYPE);
        self.essence.pack(stream)?;
        pack_count(
            stream,
            "transaction.unlockBlocksCount",
            self.unlock_blocks.len(),
            MAX_INPUT_COUNT,
        )?;
        for block in &self.unlock_blocks {
            block.pack(stream)?;
        }
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_u32("transaction.type", true)?;
        if tag != TRANSACTION_PAYLOAD_TYPE {
            return Err(CodecError::TypeMismatch {
                entity: Self::ENTITY,
                expected: TRANSACTION_PAYLOAD_TYPE,
                actual: tag,
            });
        }

        let essence_type = stream.read_byte("transaction.essenceType", false)?;
        if essence_type != TRANSACTION_ESSENCE_TYPE {
            return Err(CodecError::UnrecognizedType {
                entity: TransactionEssence::ENTITY,
                tag: essence_type as u32,
            });
        }
        let essence = TransactionEssence::unpack(stream)?;

        let count = unpack_count(stream, "transaction.unlockBlocksCount", MAX_INPUT_COUNT)?;
        let unlock_blocks = (0..count)
            .map(|_| UnlockBlock::unpack(stream))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            essence,
            unlock_blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::address::Address;
    use crate::binary::input::UtxoInput;
    use crate::binary::output::Output;

    #[test]
    fn empty_transaction_layout() {
        let tx = TransactionPayload {
            essence: TransactionEssence::default(),
            unlock_blocks: vec![],
        };
        assert_eq!(tx.to_hex().unwrap(), "000000000000000000000000000000");
    }

    #[test]
    fn round_trip_with_reference_block() {
        let tx = TransactionPayload {
            essence: TransactionEssence {
                inputs: vec![UtxoInput::new([1; 32], 0).into(), UtxoInput::new([1; 32], 1).into()],
                outputs: vec![Output::single(Address::Ed25519([2; 32]), 50)],
                payload: None,
            },
            unlock_blocks: vec![UnlockBlock::Reference(0), UnlockBlock::Reference(0)],
        };
        let bytes = tx.to_bytes().unwrap();
        assert_eq!(TransactionPayload::from_bytes(&bytes).unwrap(), tx);
        assert_eq!(tx.id().unwrap(), blake2b_256(&bytes));
    }

    #[test]
    fn unknown_essence_type_is_peeked() {
        match TransactionPayload::from_hex("0000000001") {
            Err(CodecError::UnrecognizedType { tag: 1, .. }) => {}
            other => panic!("expected UnrecognizedType, got {:?}", other),
        }
    }
}
