//! Indexation payload: arbitrary data filed under a short UTF-8 key.

use serde::{Deserialize, Serialize};

use super::serde_hex;
use crate::codec::{CodecError, Packable, ReadStream, WriteStream};
use crate::config::{
    INDEXATION_PAYLOAD_TYPE, MAX_INDEXATION_KEY_LENGTH, MIN_INDEXATION_KEY_LENGTH,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexationPayload {
    pub index: String,
    #[serde(with = "serde_hex::bytes", default)]
    pub data: Vec<u8>,
}

impl IndexationPayload {
    /// Builds a payload, checking the key length up front.
    pub fn new(index: impl Into<String>, data: Vec<u8>) -> Result<Self, CodecError> {
        let payload = Self {
            index: index.into(),
            data,
        };
        check_index(&payload.index)?;
        Ok(payload)
    }
}

fn check_index(index: &str) -> Result<(), CodecError> {
    let length = index.len();
    if !(MIN_INDEXATION_KEY_LENGTH..=MAX_INDEXATION_KEY_LENGTH).contains(&length) {
        return Err(CodecError::InvalidLength {
            field: "indexation.index",
            length,
            min: MIN_INDEXATION_KEY_LENGTH,
            max: MAX_INDEXATION_KEY_LENGTH,
        });
    }
    Ok(())
}

impl Packable for IndexationPayload {
    const ENTITY: &'static str = "indexation payload";

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError> {
        check_index(&self.index)?;
        stream.write_u32("indexation.type", INDEXATION_PAYLOAD_TYPE);
        stream.write_string("indexation.index", &self.index)?;
        let length = u32::try_from(self.data.len()).map_err(|_| CodecError::InvalidLength {
            field: "indexation.data",
            length: self.data.len(),
            min: 0,
            max: u32::MAX as usize,
        })?;
        stream.write_u32("indexation.dataLength", length);
        stream.write_fixed("indexation.data", &self.data);
        Ok(())
    }

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError> {
        let tag = stream.read_u32("indexation.type", true)?;
        if tag != INDEXATION_PAYLOAD_TYPE {
            return Err(CodecError::TypeMismatch {
                entity: Self::ENTITY,
                expected: INDEXATION_PAYLOAD_TYPE,
                actual: tag,
            });
        }
        let index = stream.read_string("indexation.index", true)?;
        check_index(&index)?;
        let length = stream.read_u32("indexation.dataLength", true)? as usize;
        let data = stream.read_fixed("indexation.data", length, true)?.to_vec();
        Ok(Self { index, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foo_bar_layout() {
        let payload = IndexationPayload::new("foo", b"bar".to_vec()).unwrap();
        let hex = payload.to_hex().unwrap();
        assert_eq!(hex, "020000000300666f6f03000000626172");

        let back = IndexationPayload::from_hex(&hex).unwrap();
        assert_eq!(back.index, "foo");
        assert_eq!(back.data, b"bar");
    }

    #[test]
    fn empty_data_still_has_length() {
        let payload = IndexationPayload::new("k", Vec::new()).unwrap();
        assert_eq!(payload.to_hex().unwrap(), "0200000001006b00000000");
    }

    #[test]
    fn key_bounds() {
        match IndexationPayload::new("", vec![1]) {
            Err(CodecError::InvalidLength { length: 0, .. }) => {}
            other => panic!("expected InvalidLength, got {:?}", other),
        }
        assert!(IndexationPayload::new("x".repeat(64), vec![]).is_ok());
        match IndexationPayload::new("x".repeat(65), vec![]) {
            Err(CodecError::InvalidLength { length: 65, .. }) => {}
            other => panic!("expected InvalidLength, got {:?}", other),
        }
    }

    #[test]
    fn oversized_key_is_rejected_on_decode() {
        let mut bytes = vec![2, 0, 0, 0, 65, 0];
        bytes.extend_from_slice(&[b'a'; 65]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        match IndexationPayload::from_bytes(&bytes) {
            Err(CodecError::InvalidLength { field: "indexation.index", .. }) => {}
            other => panic!("expected InvalidLength, got {:?}", other),
        }
    }

    #[test]
    fn non_utf8_key_is_rejected() {
        let bytes = hex::decode("020000000100ff00000000").unwrap();
        match IndexationPayload::from_bytes(&bytes) {
            Err(CodecError::InvalidUtf8 { .. }) => {}
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }
}
