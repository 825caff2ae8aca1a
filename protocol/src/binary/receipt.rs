//! Receipt payload: funds migrated from the legacy network, carried inside a
//! milestone.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::payload::{pack_payload_frame, unpack_payload_frame_with};
use super::serde_hex;
use super::treasury::TreasuryTransactionPayload;
use crate::codec::{pack_count, unpack_count, CodecError, Packable, ReadStream, WriteStream};
use crate::config::{
    MAX_FUNDS_COUNT, RECEIPT_PAYLOAD_TYPE, TAIL_TRANSACTION_HASH_LENGTH,
    TREASURY_TRANSACTION_PAYLOAD_TYPE,
};

/// One migrated deposit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MigratedFunds {
    #[serde(with = "serde_hex")]
    pub tail_transaction_hash: [u8; TAIL_TRANSACTION_HASH_LENGTH],
    pub address: Address,
    pub deposit: u64,
}

impl Packable for MigratedFunds {
    const ENTITY: &'static str = "migrated funds";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_fixed("migratedFunds.tailTransactionHash", &self.tail_transaction_hash);
        self.address.pack(stream)?;
        stream.write_u64("migratedFunds.deposit", self.deposit);
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            tail_transaction_hash: stream
                .read_fixed_array("migratedFunds.tailTransactionHash", true)?,
            address: Address::unpack(stream)?,
            deposit: stream.read_u64("migratedFunds.deposit", true)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptPayload {
    pub migrated_at: u32,
    /// Set on the last receipt for `migrated_at`.
    #[serde(rename = "final")]
    pub is_final: bool,
    pub funds: Vec<MigratedFunds>,
    /// Always present on the wire.
    pub transaction: TreasuryTransactionPayload,
}

impl Packable for ReceiptPayload {
    const ENTITY: &'static str = "receipt payload";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_u32("receipt.type", RECEIPT_PAYLOAD_TYPE);
        stream.write_u32("receipt.migratedAt", self.migrated_at);
        stream.write_bool("receipt.final", self.is_final);
        pack_count(stream, "receipt.fundsCount", self.funds.len(), MAX_FUNDS_COUNT)?;
        for funds in &self.funds {
            funds.pack(stream)?;
        }
        pack_payload_frame(stream, "receipt.transactionLength", Some(&self.transaction))
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_u32("receipt.type", true)?;
        if tag != RECEIPT_PAYLOAD_TYPE {
            return Err(CodecError::TypeMismatch {
                entity: Self::ENTITY,
                expected: RECEIPT_PAYLOAD_TYPE,
                actual: tag,
            });
        }
        let migrated_at = stream.read_u32("receipt.migratedAt", true)?;
        let is_final = stream.read_bool("receipt.final", true)?;
        let count = unpack_count(stream, "receipt.fundsCount", MAX_FUNDS_COUNT)?;
        let funds = (0..count)
            .map(|_| MigratedFunds::unpack(stream))
            .collect::<Result<Vec<_>, _>>()?;

        let transaction =
            unpack_payload_frame_with(stream, "receipt.transactionLength", |payload_type, stream| {
                if payload_type != TREASURY_TRANSACTION_PAYLOAD_TYPE {
                    return Err(CodecError::IllegalPayload {
                        context: Self::ENTITY,
                        payload_type,
                    });
                }
                TreasuryTransactionPayload::unpack(stream)
            })?
            .ok_or(CodecError::MissingPayload {
                context: Self::ENTITY,
            })?;

        Ok(Self {
            migrated_at,
            is_final,
            funds,
            transaction,
        })
    }
}
