//! Messages: the vertices of the tangle.

use serde::{Deserialize, Serialize};

use super::payload::{pack_payload_frame, unpack_payload_frame, Payload};
use super::serde_hex;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{MAX_MESSAGE_LENGTH, MAX_PARENT_COUNT, MESSAGE_ID_LENGTH, MIN_PARENT_COUNT};
use crate::crypto::hash::blake2b_256;

pub type MessageId = [u8; MESSAGE_ID_LENGTH];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub network_id: u64,
    /// 1 to 8 message ids, unique and sorted ascending.
    #[serde(with = "serde_hex::list")]
    pub parents: Vec<MessageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    pub nonce: u64,
}

impl Message {
    /// Blake2b-256 of the serialized message.
    pub fn id(&self) -> Result<MessageId, CodecError> {
        Ok(blake2b_256(&self.to_bytes()?))
    }

    fn check_payload(&self) -> Result<(), CodecError> {
        check_top_level_payload(self.payload.as_ref())
    }
}

fn check_top_level_payload(payload: Option<&Payload>) -> Result<(), CodecError> {
    match payload {
        Some(p @ (Payload::Receipt(_) | Payload::TreasuryTransaction(_))) => {
            Err(CodecError::IllegalPayload {
                context: Message::ENTITY,
                payload_type: p.payload_type(),
            })
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Parents
// ---------------------------------------------------------------------------

/// Parent lists share one rule set wherever they appear: between one and
/// eight ids, strictly ascending (which also makes them unique).
pub(crate) fn check_parents(entity: &'static str, parents: &[MessageId]) -> Result<(), CodecError> {
    if parents.len() < MIN_PARENT_COUNT {
        return Err(CodecError::TooFew {
            field: "parents",
            count: parents.len(),
            min: MIN_PARENT_COUNT,
        });
    }
    if parents.len() > MAX_PARENT_COUNT {
        return Err(CodecError::TooMany {
            field: "parents",
            count: parents.len(),
            max: MAX_PARENT_COUNT,
        });
    }
    let mut sorted = parents.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != parents.len() {
        return Err(CodecError::ParentsNotUnique { entity });
    }
    if sorted != parents {
        return Err(CodecError::ParentsNotSorted { entity });
    }
    Ok(())
}

pub(crate) fn pack_parents(
    stream: &mut WriteStream,
    entity: &'static str,
    parents: &[MessageId],
) -> Result<(), CodecError> {
    check_parents(entity, parents)?;
    stream.write_byte("parentsCount", parents.len() as u8);
    for parent in parents {
        stream.write_fixed("parentMessageId", parent);
    }
    Ok(())
}

pub(crate) fn unpack_parents(
    stream: &mut ReadStream<'_>,
    entity: &'static str,
) -> Result<Vec<MessageId>, CodecError> {
    let count = stream.read_byte("parentsCount", true)? as usize;
    let parents = (0..count)
        .map(|_| stream.read_fixed_array("parentMessageId", true))
        .collect::<Result<Vec<_>, _>>()?;
    check_parents(entity, &parents)?;
    Ok(parents)
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

impl Packable for Message {
    const ENTITY: &'static str = "message";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        self.check_payload()?;
        let start = stream.write_index();
        stream.write_u64("message.networkId", self.network_id);
        pack_parents(stream, Self::ENTITY, &self.parents)?;
        pack_payload_frame(stream, "message.payloadLength", self.payload.as_ref())?;
        stream.write_u64("message.nonce", self.nonce);

        let length = stream.write_index() - start;
        if length > MAX_MESSAGE_LENGTH {
            return Err(CodecError::MessageTooLarge {
                length,
                max: MAX_MESSAGE_LENGTH,
            });
        }
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        if stream.unused() > MAX_MESSAGE_LENGTH {
            return Err(CodecError::MessageTooLarge {
                length: stream.unused(),
                max: MAX_MESSAGE_LENGTH,
            });
        }
        let network_id = stream.read_u64("message.networkId", true)?;
        let parents = unpack_parents(stream, Self::ENTITY)?;
        let payload = unpack_payload_frame::<Payload>(stream, "message.payloadLength")?;
        check_top_level_payload(payload.as_ref())?;
        let nonce = stream.read_u64("message.nonce", true)?;

        Ok(Self {
            network_id,
            parents,
            payload,
            nonce,
        })
    }
}
