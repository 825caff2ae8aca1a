//! # Byte Stream Codec
//!
//! Cursor-based readers and writers over byte buffers, and the
//! [`Packable`] contract every ledger object implements on top of them.
//!
//! ```text
//! codec/
//! ├── read_stream.rs    ReadStream: borrowed buffer + cursor, peek or advance
//! ├── write_stream.rs   WriteStream: chunk-grown buffer + seekable cursor
//! └── error.rs          CodecError
//! ```
//!
//! All integers are little-endian and fixed width. Streams are owned by a
//! single caller for their whole life and threaded through decoders by
//! `&mut`; nothing here is shared.

pub mod error;
pub mod read_stream;
pub mod write_stream;

pub use error::CodecError;
pub use read_stream::ReadStream;
pub use write_stream::WriteStream;

/// A value with a bit-exact binary layout.
///
/// Implementations must satisfy `unpack(pack(x)) == x` for every value that
/// upholds its type's invariants, and `pack(unpack(bytes)) == bytes` for
/// every valid byte string.
pub trait Packable: Sized {
    /// Human-readable entity name, used in trailing-data errors.
    const ENTITY: &'static str;

    fn pack(&self, stream: &mut WriteStream) -> Result<(), CodecError>;

    fn unpack(stream: &mut ReadStream<'_>) -> Result<Self, CodecError>;

    /// Serialize into a fresh buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut stream = WriteStream::new();
        self.pack(&mut stream)?;
        Ok(stream.into_bytes())
    }

    fn to_hex(&self) -> Result<String, CodecError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Deserialize a complete value; leftover bytes are an error.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut stream = ReadStream::new(bytes);
        let value = Self::unpack(&mut stream)?;
        if stream.unused() != 0 {
            return Err(CodecError::TrailingData {
                entity: Self::ENTITY,
                remaining: stream.unused(),
            });
        }
        Ok(value)
    }

    fn from_hex(value: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(value).map_err(|e| CodecError::InvalidHex {
            field: Self::ENTITY,
            reason: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }
}

/// Writes a u16 element count after checking it against `max`.
pub(crate) fn pack_count(
    stream: &mut WriteStream,
    field: &'static str,
    count: usize,
    max: usize,
) -> Result<(), CodecError> {
    if count > max {
        return Err(CodecError::TooMany { field, count, max });
    }
    stream.write_u16(field, count as u16);
    Ok(())
}

/// Reads a u16 element count and checks it against `max`.
pub(crate) fn unpack_count(
    stream: &mut ReadStream<'_>,
    field: &'static str,
    max: usize,
) -> Result<usize, CodecError> {
    let count = stream.read_u16(field, true)? as usize;
    if count > max {
        return Err(CodecError::TooMany { field, count, max });
    }
    Ok(count)
}
