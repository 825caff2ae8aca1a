//! Unlock blocks: one per input, either a signature or a pointer to an
//! earlier signature in the same transaction.

use serde::{Deserialize, Serialize};

use super::signature::Signature;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{REFERENCE_UNLOCK_BLOCK_TYPE, SIGNATURE_UNLOCK_BLOCK_TYPE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockBlock {
    Signature(Signature),
    /// Index of an earlier signature block in the same list.
    Reference(u16),
}

impl UnlockBlock {
    pub fn unlock_type(&self) -> u8 {
        match self {
            UnlockBlock::Signature(_) => SIGNATURE_UNLOCK_BLOCK_TYPE,
            UnlockBlock::Reference(_) => REFERENCE_UNLOCK_BLOCK_TYPE,
        }
    }
}

impl Packable for UnlockBlock {
    const ENTITY: &'static str = "unlock block";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        stream.write_byte("unlockBlock.type", self.unlock_type());
        match self {
            UnlockBlock::Signature(signature) => signature.pack(stream),
            UnlockBlock::Reference(index) => {
                stream.write_u16("referenceUnlockBlock.reference", *index);
                Ok(())
            }
        }
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        match stream.read_byte("unlockBlock.type", true)? {
            SIGNATURE_UNLOCK_BLOCK_TYPE => Ok(UnlockBlock::Signature(Signature::unpack(stream)?)),
            REFERENCE_UNLOCK_BLOCK_TYPE => Ok(UnlockBlock::Reference(
                stream.read_u16("referenceUnlockBlock.reference", true)?,
            )),
            other => Err(CodecError::UnrecognizedType {
                entity: Self::ENTITY,
                tag: other as u32,
            }),
        }
    }
}
