//! The transaction essence: the signed part of a transaction.

use serde::{Deserialize, Serialize};

use super::input::Input;
use super::output::Output;
use super::indexation::IndexationPayload;
use super::payload::{pack_payload_frame, unpack_payload_frame_with, Payload};
use crate::codec::{pack_count, unpack_count, CodecError, Packable, ReadStream, WriteStream};
use crate::config::{
    INDEXATION_PAYLOAD_TYPE, MAX_INPUT_COUNT, MAX_OUTPUT_COUNT, TRANSACTION_ESSENCE_TYPE,
};
use crate::crypto::hash::blake2b_256;

/// Inputs, outputs and an optional indexation payload.
///
/// The type admits every input, output and payload variant so that decoded
/// bytes can be reported precisely; packing and unpacking both reject
/// treasury inputs, treasury outputs and non-indexation payloads with
/// [`CodecError::IllegalEssenceMember`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEssence {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl TransactionEssence {
    /// Blake2b-256 of the serialized essence: the value every unlock block
    /// signs.
    pub fn hash(&self) -> Result<[u8; 32], CodecError> {
        Ok(blake2b_256(&self.to_bytes()?))
    }

    fn check_members(&self) -> Result<(), CodecError> {
        if let Some(input) = self.inputs.iter().find(|i| !matches!(i, Input::Utxo(_))) {
            return Err(CodecError::IllegalEssenceMember {
                member: format!("input type {}", input.input_type()),
            });
        }
        if let Some(output) = self
            .outputs
            .iter()
            .find(|o| matches!(o, Output::Treasury(_)))
        {
            return Err(CodecError::IllegalEssenceMember {
                member: format!("output type {}", output.output_type()),
            });
        }
        match &self.payload {
            None | Some(Payload::Indexation(_)) => Ok(()),
            Some(other) => Err(CodecError::IllegalEssenceMember {
                member: format!("payload type {}", other.payload_type()),
            }),
        }
    }
}

impl Packable for TransactionEssence {
    const ENTITY: &'static str = "transaction essence";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        self.check_members()?;
        stream.write_byte("essence.type", TRANSACTION_ESSENCE_TYPE);

        pack_count(stream, "essence.inputCount", self.inputs.len(), MAX_INPUT_COUNT)?;
        for input in &self.inputs {
            input.pack(stream)?;
        }
        pack_count(stream, "essence.outputCount", self.outputs.len(), MAX_OUTPUT_COUNT)?;
        for output in &self.outputs {
            output.pack(stream)?;
        }
        pack_payload_frame(stream, "essence.payloadLength", self.payload.as_ref())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_byte("essence.type", true)?;
        if tag != TRANSACTION_ESSENCE_TYPE {
            return Err(CodecError::UnrecognizedType {
                entity: Self::ENTITY,
                tag: tag as u32,
            });
        }

        let count = unpack_count(stream, "essence.inputCount", MAX_INPUT_COUNT)?;
        let inputs = (0..count)
            .map(|_| Input::unpack(stream))
            .collect::<Result<Vec<_>, _>>()?;
        let count = unpack_count(stream, "essence.outputCount", MAX_OUTPUT_COUNT)?;
        let outputs = (0..count)
            .map(|_| Output::unpack(stream))
            .collect::<Result<Vec<_>, _>>()?;
        let payload =
            unpack_payload_frame_with(stream, "essence.payloadLength", |payload_type, stream| {
                if payload_type != INDEXATION_PAYLOAD_TYPE {
                    return Err(CodecError::IllegalEssenceMember {
                        member: format!("payload type {payload_type}"),
                    });
                }
                Ok(Payload::Indexation(IndexationPayload::unpack(stream)?))
            })?;

        let essence = Self {
            inputs,
            outputs,
            payload,
        };
        essence.check_members()?;
        Ok(essence)
    }
}
