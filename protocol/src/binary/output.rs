//! Outputs: amounts locked to an address (or to the treasury).

use serde::{Deserialize, Serialize};

use super::address::Address;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{
    SIG_LOCKED_DUST_ALLOWANCE_OUTPUT_TYPE, SIG_LOCKED_SINGLE_OUTPUT_TYPE, TREASURY_OUTPUT_TYPE,
};

/// A signature-locked output: spendable by whoever signs for `address`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SigLockedOutput {
    pub address: Address,
    pub amount: u64,
}

/// The treasury balance carried by a treasury transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreasuryOutput {
    pub amount: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    SigLockedSingle(SigLockedOutput),
    SigLockedDustAllowance(SigLockedOutput),
    Treasury(TreasuryOutput),
}

impl Output {
    pub fn single(address: Address, amount: u64) -> Self {
        Output::SigLockedSingle(SigLockedOutput { address, amount })
    }

    pub fn output_type(&self) -> u8 {
        match self {
            Output::SigLockedSingle(_) => SIG_LOCKED_SINGLE_OUTPUT_TYPE,
            Output::SigLockedDustAllowance(_) => SIG_LOCKED_DUST_ALLOWANCE_OUTPUT_TYPE,
            Output::Treasury(_) => TREASURY_OUTPUT_TYPE,
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            Output::SigLockedSingle(o) | Output::SigLockedDustAllowance(o) => o.amount,
            Output::Treasury(o) => o.amount,
        }
    }

    /// The locking address; `None` for treasury outputs.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Output::SigLockedSingle(o) | Output::SigLockedDustAllowance(o) => Some(&o.address),
            Output::Treasury(_) => None,
        }
    }
}

fn pack_sig_locked(
    stream: &mut WriteStream,
    tag: u8,
    output: &SigLockedOutput,
) -> Result<(), CodecError> {
    stream.write_byte("output.type", tag);
    output.address.pack(stream)?;
    stream.write_u64("output.amount", output.amount);
    Ok(())
}

fn unpack_sig_locked(stream: &mut ReadStream<'_>) -> Result<SigLockedOutput, CodecError> {
    stream.read_byte("output.type", true)?;
    let address = Address::unpack(stream)?;
    let amount = stream.read_u64("output.amount", true)?;
    Ok(SigLockedOutput { address, amount })
}

impl Packable for TreasuryOutput {
    const ENTITY: &'static str = "treasury output";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_byte("treasuryOutput.type", TREASURY_OUTPUT_TYPE);
        stream.write_u64("treasuryOutput.amount", self.amount);
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_byte("treasuryOutput.type", true)?;
        if tag != TREASURY_OUTPUT_TYPE {
            return Err(CodecError::TypeMismatch {
                entity: Self::ENTITY,
                expected: TREASURY_OUTPUT_TYPE as u32,
                actual: tag as u32,
            });
        }
        Ok(Self {
            amount: stream.read_u64("treasuryOutput.amount", true)?,
        })
    }
}

impl Packable for Output {
    const ENTITY: &'static str = "output";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        match self {
            Output::SigLockedSingle(o) => pack_sig_locked(stream, SIG_LOCKED_SINGLE_OUTPUT_TYPE, o),
            Output::SigLockedDustAllowance(o) => {
                pack_sig_locked(stream, SIG_LOCKED_DUST_ALLOWANCE_OUTPUT_TYPE, o)
            }
            Output::Treasury(o) => o.pack(stream),
        }
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        match stream.read_byte("output.type", false)? {
            SIG_LOCKED_SINGLE_OUTPUT_TYPE => Ok(Output::SigLockedSingle(unpack_sig_locked(stream)?)),
            SIG_LOCKED_DUST_ALLOWANCE_OUTPUT_TYPE => {
                Ok(Output::SigLockedDustAllowance(unpack_sig_locked(stream)?))
            }
            TREASURY_OUTPUT_TYPE => Ok(Output::Treasury(TreasuryOutput::unpack(stream)?)),
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
    fn single_output_layout() {
        let output = Output::single(Address::Ed25519([0x44; 32]), 1_000_000);
        let hex = output.to_hex().unwrap();
        assert_eq!(hex, format!("0000{}40420f0000000000", "44".repeat(32)));
        assert_eq!(Output::from_hex(&hex).unwrap(), output);
    }

    #[test]
    fn dust_allowance_keeps_its_tag() {
        let output = Output::SigLockedDustAllowance(SigLockedOutput {
            address: Address::Ed25519([1; 32]),
            amount: 1,
        });
        let bytes = output.to_bytes().unwrap();
        assert_eq!(bytes[0], SIG_LOCKED_DUST_ALLOWANCE_OUTPUT_TYPE);
        assert_eq!(Output::from_bytes(&bytes).unwrap(), output);
    }

    #[test]
    fn treasury_output_has_no_address() {
        let output = Output::Treasury(TreasuryOutput { amount: 5 });
        assert!(output.address().is_none());
        assert_eq!(output.amount(), 5);
        assert_eq!(output.to_hex().unwrap(), "020500000000000000");
    }

    #[test]
    fn unknown_output_type() {
        match Output::from_bytes(&[3, 0, 0]) {
            Err(CodecError::UnrecognizedType { entity: "output", tag: 3 }) => {}
            other => panic!("expected UnrecognizedType, got {:?}", other),
        }
    }
}
