//! Inputs: references to the outputs a transaction consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::serde_hex;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{
    MILESTONE_ID_LENGTH, OUTPUT_ID_LENGTH, TRANSACTION_ID_LENGTH, TREASURY_INPUT_TYPE,
    UTXO_INPUT_TYPE,
};

// ---------------------------------------------------------------------------
// Output ids
// ---------------------------------------------------------------------------

/// Names one output of one transaction: `transaction_id ‖ u16 LE index`,
/// rendered as 68 hex characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId {
    pub transaction_id: [u8; TRANSACTION_ID_LENGTH],
    pub index: u16,
}

impl OutputId {
    pub fn new(transaction_id: [u8; TRANSACTION_ID_LENGTH], index: u16) -> Self {
        Self {
            transaction_id,
            index,
        }
    }

    pub fn to_bytes(&self) -> [u8; OUTPUT_ID_LENGTH] {
        let mut out = [0u8; OUTPUT_ID_LENGTH];
        out[..TRANSACTION_ID_LENGTH].copy_from_slice(&self.transaction_id);
        out[TRANSACTION_ID_LENGTH..].copy_from_slice(&self.index.to_le_bytes());
        out
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for OutputId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; OUTPUT_ID_LENGTH];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| CodecError::InvalidHex {
            field: "output id",
            reason: e.to_string(),
        })?;
        let mut transaction_id = [0u8; TRANSACTION_ID_LENGTH];
        transaction_id.copy_from_slice(&bytes[..TRANSACTION_ID_LENGTH]);
        let index = u16::from_le_bytes([bytes[TRANSACTION_ID_LENGTH], bytes[TRANSACTION_ID_LENGTH + 1]]);
        Ok(Self::new(transaction_id, index))
    }
}

// ---------------------------------------------------------------------------
// Input variants
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoInput {
    #[serde(with = "serde_hex")]
    pub transaction_id: [u8; TRANSACTION_ID_LENGTH],
    pub transaction_output_index: u16,
}

impl UtxoInput {
    pub fn new(transaction_id: [u8; TRANSACTION_ID_LENGTH], transaction_output_index: u16) -> Self {
        Self {
            transaction_id,
            transaction_output_index,
        }
    }

    /// The id of the output this input consumes.
    pub fn output_id(&self) -> OutputId {
        OutputId::new(self.transaction_id, self.transaction_output_index)
    }
}

impl From<OutputId> for UtxoInput {
    fn from(id: OutputId) -> Self {
        Self::new(id.transaction_id, id.index)
    }
}

/// Consumes the treasury left by a milestone; only valid inside a treasury
/// transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreasuryInput {
    #[serde(with = "serde_hex")]
    pub milestone_id: [u8; MILESTONE_ID_LENGTH],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Utxo(UtxoInput),
    Treasury(TreasuryInput),
}

impl Input {
    pub fn input_type(&self) -> u8 {
        match self {
            Input::Utxo(_) => UTXO_INPUT_TYPE,
            Input::Treasury(_) => TREASURY_INPUT_TYPE,
        }
    }
}

impl From<UtxoInput> for Input {
    fn from(input: UtxoInput) -> Self {
        Input::Utxo(input)
    }
}

// ---------------------------------------------------------------------------
// Codecs
// ---------------------------------------------------------------------------

impl Packable for UtxoInput {
    const ENTITY: &'static str = "utxo input";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_byte("utxoInput.type", UTXO_INPUT_TYPE);
        stream.write_fixed("utxoInput.transactionId", &self.transaction_id);
        stream.write_u16("utxoInput.transactionOutputIndex", self.transaction_output_index);
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_byte("utxoInput.type", true)?;
        if tag != UTXO_INPUT_TYPE {
            return Err(CodecError::TypeMismatch {
                entity: Self::ENTITY,
                expected: UTXO_INPUT_TYPE as u32,
                actual: tag as u32,
            });
        }
        Ok(Self {
            transaction_id: stream.read_fixed_array("utxoInput.transactionId", true)?,
            transaction_output_index: stream.read_u16("utxoInput.transactionOutputIndex", true)?,
        })
    }
}

impl Packable for TreasuryInput {
    const ENTITY: &'static str = "treasury input";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_byte("treasuryInput.type", TREASURY_INPUT_TYPE);
        stream.write_fixed("treasuryInput.milestoneId", &self.milestone_id);
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_byte("treasuryInput.type", true)?;
        if tag != TREASURY_INPUT_TYPE {
            return Err(CodecError::TypeMismatch {
                entity: Self::ENTITY,
                expected: TREASURY_INPUT_TYPE as u32,
                actual: tag as u32,
            });
        }
        Ok(Self {
            milestone_id: stream.read_fixed_array("treasuryInput.milestoneId", true)?,
        })
    }
}

impl Packable for Input {
    const ENTITY: &'static str = "input";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        match self {
            Input::Utxo(input) => input.pack(stream),
            Input::Treasury(input) => input.pack(stream),
        }
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        match stream.read_byte("input.type", false)? {
            UTXO_INPUT_TYPE => Ok(Input::Utxo(UtxoInput::unpack(stream)?)),
            TREASURY_INPUT_TYPE => Ok(Input::Treasury(TreasuryInput::unpack(stream)?)),
            other => Err(CodecError::UnrecognizedType {
                entity: Self::ENTITY,
                tag: other as u32,
            }),
        }
    }
}
