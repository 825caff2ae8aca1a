//! The payload union and the length-prefixed frame every payload travels in.

use serde::{Deserialize, Serialize};

use super::indexation::IndexationPayload;
use super::milestone::MilestonePayload;
use super::receipt::ReceiptPayload;
use super::transaction::TransactionPayload;
use super::treasury::TreasuryTransactionPayload;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{
    INDEXATION_PAYLOAD_TYPE, MILESTONE_PAYLOAD_TYPE, RECEIPT_PAYLOAD_TYPE,
    TRANSACTION_PAYLOAD_TYPE, TREASURY_TRANSACTION_PAYLOAD_TYPE,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Transaction(Box<TransactionPayload>),
    Milestone(Box<MilestonePayload>),
    Indexation(IndexationPayload),
    Receipt(Box<ReceiptPayload>),
    TreasuryTransaction(TreasuryTransactionPayload),
}

impl Payload {
    pub fn payload_type(&self) -> u32 {
        match self {
            Payload::Transaction(_) => TRANSACTION_PAYLOAD_TYPE,
            Payload::Milestone(_) => MILESTONE_PAYLOAD_TYPE,
            Payload::Indexation(_) => INDEXATION_PAYLOAD_TYPE,
            Payload::Receipt(_) => RECEIPT_PAYLOAD_TYPE,
            Payload::TreasuryTransaction(_) => TREASURY_TRANSACTION_PAYLOAD_TYPE,
        }
    }
}

impl From<TransactionPayload> for Payload {
    fn from(payload: TransactionPayload) -> Self {
        Payload::Transaction(Box::new(payload))
    }
}

impl From<IndexationPayload> for Payload {
    fn from(payload: IndexationPayload) -> Self {
        Payload::Indexation(payload)
    }
}

impl Packable for Payload {
    const ENTITY: &'static str = "payload";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        match self {
            Payload::Transaction(p) => p.pack(stream),
            Payload::Milestone(p) => p.pack(stream),
            Payload::Indexation(p) => p.pack(stream),
            Payload::Receipt(p) => p.pack(stream),
            Payload::TreasuryTransaction(p) => p.pack(stream),
        }
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        match stream.read_u32("payload.type", false)? {
            TRANSACTION_PAYLOAD_TYPE => Ok(TransactionPayload::unpack(stream)?.into()),
            MILESTONE_PAYLOAD_TYPE => Ok(Payload::Milestone(Box::new(MilestonePayload::unpack(
                stream,
            )?))),
            INDEXATION_PAYLOAD_TYPE => Ok(Payload::Indexation(IndexationPayload::unpack(stream)?)),
            RECEIPT_PAYLOAD_TYPE => Ok(Payload::Receipt(Box::new(ReceiptPayload::unpack(stream)?))),
            TREASURY_TRANSACTION_PAYLOAD_TYPE => Ok(Payload::TreasuryTransaction(
                TreasuryTransactionPayload::unpack(stream)?,
            )),
            other => Err(CodecError::UnrecognizedType {
                entity: Self::ENTITY,
                tag: other,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// Writes `payload` behind a u32 length prefix. An absent payload is a zero
/// length.
///
/// The prefix is reserved first and backpatched once the payload has been
/// written, so nested payloads never need a sizing pass.
pub(crate) fn pack_payload_frame<P: Packable>(
    stream: &mut WriteStream,
    field: &'static str,
    payload: Option<&P>,
) -> Result<(), CodecError> {
    let Some(payload) = payload else {
        stream.write_u32(field, 0);
        return Ok(());
    };

    let start = stream.write_index();
    stream.write_u32(field, 0);
    payload.pack(stream)?;
    let end = stream.write_index();

    let length = end - start - 4;
    let length = u32::try_from(length).map_err(|_| CodecError::InvalidLength {
        field,
        length,
        min: 0,
        max: u32::MAX as usize,
    })?;
    stream.set_write_index(start)?;
    stream.write_u32(field, length);
    stream.set_write_index(end)
}

/// Reads a payload frame written by [`pack_payload_frame`]. The payload must
/// consume exactly the declared length.
pub(crate) fn unpack_payload_frame<P: Packable>(
    stream: &mut ReadStream<'_>,
    field: &'static str,
) -> Result<Option<P>, CodecError> {
    unpack_payload_frame_with(stream, field, |_, stream| P::unpack(stream))
}

/// Reads a payload frame whose contents are restricted to specific payload
/// types.
///
/// The u32 payload tag is peeked and handed to `decode` before anything
/// inside the frame is parsed, so `decode` can reject an unexpected type
/// without descending into it. Nested frames therefore never recurse
/// through the generic [`Payload`] decoder.
pub(crate) fn unpack_payload_frame_with<T>(
    stream: &mut ReadStream<'_>,
    field: &'static str,
    decode: impl FnOnce(u32, &mut ReadStream<'_>) -> Result<T, CodecError>,
) -> Result<Option<T>, CodecError> {
    let length = stream.read_u32(field, true)? as usize;
    if length == 0 {
        return Ok(None);
    }
    if length > stream.unused() {
        return Err(CodecError::LengthExceedsRemaining {
            field,
            length,
            remaining: stream.unused(),
        });
    }

    let start = stream.read_index();
    let payload_type = stream.read_u32("payload.type", false)?;
    let payload = decode(payload_type, stream)?;
    let consumed = stream.read_index() - start;
    if consumed != length {
        return Err(CodecError::InvalidLength {
            field,
            length: consumed,
            min: length,
            max: length,
        });
    }
    Ok(Some(payload))
}
