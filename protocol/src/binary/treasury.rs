//! Treasury transaction payload: moves the treasury from one milestone to
//! the next.

use serde::{Deserialize, Serialize};

use super::input::TreasuryInput;
use super::output::TreasuryOutput;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::TREASURY_TRANSACTION_PAYLOAD_TYPE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreasuryTransactionPayload {
    pub input: TreasuryInput,
    pub output: TreasuryOutput,
}

impl Packable for TreasuryTransactionPayload {
    const ENTITY: &'static str = "treasury transaction payload";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_u32("treasuryTransaction.type", TREASURY_TRANSACTION_PAYLOAD_TYPE);
        self.input.pack(stream)?;
        self.output.pack(stream)
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_u32("treasuryTransaction.type", true)?;
        if tag != TREASURY_TRANSACTION_PAYLOAD_TYPE {
            return Err(CodecError::TypeMismatch {
                entity: Self::ENTITY,
                expected: TREASURY_TRANSACTION_PAYLOAD_TYPE,
                actual: tag,
            });
        }
        Ok(Self {
            input: TreasuryInput::unpack(stream)?,
            output: TreasuryOutput::unpack(stream)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let payload = TreasuryTransactionPayload {
            input: TreasuryInput {
                milestone_id: [0x0f; 32],
            },
            output: TreasuryOutput { amount: 1000 },
        };
        let hex = payload.to_hex().unwrap();
        assert_eq!(
            hex,
            format!("0400000001{}02e803000000000000", "0f".repeat(32))
        );
        assert_eq!(TreasuryTransactionPayload::from_hex(&hex).unwrap(), payload);
    }

    #[test]
    fn wrong_payload_type() {
        match TreasuryTransactionPayload::from_hex("02000000") {
            Err(CodecError::TypeMismatch { expected: 4, actual: 2, .. }) => {}
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }
}
