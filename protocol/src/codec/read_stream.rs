//! Bounds-checked cursor over an immutable byte buffer.

use super::error::CodecError;

/// Reads little-endian fields from a borrowed buffer.
///
/// Every reader takes the field name (used in errors) and an `advance`
/// flag: `false` peeks without moving the cursor, which is how decoders
/// look at a type tag before dispatching.
#[derive(Debug, Clone)]
pub struct ReadStream<'a> {
    storage: &'a [u8],
    read_index: usize,
}

impl<'a> ReadStream<'a> {
    pub fn new(storage: &'a [u8]) -> Self {
        Self {
            storage,
            read_index: 0,
        }
    }

    /// Total length of the underlying buffer.
    pub fn length(&self) -> usize {
        self.storage.len()
    }

    pub fn has_remaining(&self, remaining: usize) -> bool {
        self.read_index + remaining <= self.storage.len()
    }

    /// Bytes not yet consumed.
    pub fn unused(&self) -> usize {
        self.storage.len().saturating_sub(self.read_index)
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    pub fn set_read_index(&mut self, read_index: usize) -> Result<(), CodecError> {
        if read_index > self.storage.len() {
            return Err(CodecError::SeekOutOfRange {
                index: read_index,
                length: self.storage.len(),
            });
        }
        self.read_index = read_index;
        Ok(())
    }

    /// Borrow `length` bytes.
    pub fn read_fixed(
        &mut self,
        field: &'static str,
        length: usize,
        advance: bool,
    ) -> Result<&'a [u8], CodecError> {
        if !self.has_remaining(length) {
            return Err(CodecError::Underflow {
                field,
                needed: length,
                available: self.unused(),
            });
        }
        let start = self.read_index;
        if advance {
            self.read_index += length;
        }
        Ok(&self.storage[start..start + length])
    }

    /// Copy `N` bytes into an array.
    pub fn read_fixed_array<const N: usize>(
        &mut self,
        field: &'static str,
        advance: bool,
    ) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_fixed(field, N, advance)?);
        Ok(out)
    }

    /// Read `length` bytes rendered as lowercase hex.
    pub fn read_fixed_hex(
        &mut self,
        field: &'static str,
        length: usize,
        advance: bool,
    ) -> Result<String, CodecError> {
        Ok(hex::encode(self.read_fixed(field, length, advance)?))
    }

    pub fn read_byte(&mut self, field: &'static str, advance: bool) -> Result<u8, CodecError> {
        Ok(self.read_fixed_array::<1>(field, advance)?[0])
    }

    pub fn read_u16(&mut self, field: &'static str, advance: bool) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_fixed_array(field, advance)?))
    }

    pub fn read_u32(&mut self, field: &'static str, advance: bool) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_fixed_array(field, advance)?))
    }

    pub fn read_u64(&mut self, field: &'static str, advance: bool) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_fixed_array(field, advance)?))
    }

    /// Only 0 and 1 are booleans; anything else would not survive a
    /// re-encode.
    pub fn read_bool(&mut self, field: &'static str, advance: bool) -> Result<bool, CodecError> {
        match self.read_byte(field, advance)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(CodecError::InvalidBool { field, value }),
        }
    }

    /// A u16 length prefix followed by that many bytes of UTF-8.
    ///
    /// When `advance` is false the cursor is left at the length prefix.
    pub fn read_string(&mut self, field: &'static str, advance: bool) -> Result<String, CodecError> {
        let start = self.read_index;
        let length = self.read_u16(field, true)? as usize;
        let bytes = match self.read_fixed(field, length, true) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.read_index = start;
                return Err(e);
            }
        };
        if !advance {
            self.read_index = start;
        }
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8 { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_integers() {
        let bytes = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
        ];
        let mut r = ReadStream::new(&bytes);
        assert_eq!(r.read_byte("b", true).unwrap(), 0x01);
        assert_eq!(r.read_u16("h", true).unwrap(), 0x0302);
        assert_eq!(r.read_u32("w", true).unwrap(), 0x07060504);
        assert_eq!(r.read_u64("q", true).unwrap(), 0x0f0e0d0c0b0a0908);
        assert_eq!(r.unused(), 0);
    }

    #[test]
    fn high_byte_of_u32_is_kept() {
        let mut r = ReadStream::new(&[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(r.read_u32("w", true).unwrap(), u32::MAX);
    }

    #[test]
    fn peek_does_not_advance() {
        let bytes = [7u8, 8];
        let mut r = ReadStream::new(&bytes);
        assert_eq!(r.read_byte("tag", false).unwrap(), 7);
        assert_eq!(r.read_index(), 0);
        assert_eq!(r.read_byte("tag", true).unwrap(), 7);
        assert_eq!(r.read_index(), 1);
    }

    #[test]
    fn underflow_names_the_field() {
        let mut r = ReadStream::new(&[1, 2, 3]);
        match r.read_u32("amount", true) {
            Err(CodecError::Underflow {
                field: "amount",
                needed: 4,
                available: 3,
            }) => {}
            other => panic!("expected Underflow, got {:?}", other),
        }
        // A failed read leaves the cursor untouched.
        assert_eq!(r.read_index(), 0);
    }

    #[test]
    fn reads_strings_and_hex() {
        let bytes = [3, 0, b'f', b'o', b'o', 0xab, 0xcd];
        let mut r = ReadStream::new(&bytes);
        assert_eq!(r.read_string("index", false).unwrap(), "foo");
        assert_eq!(r.read_index(), 0);
        assert_eq!(r.read_string("index", true).unwrap(), "foo");
        assert_eq!(r.read_fixed_hex("tail", 2, true).unwrap(), "abcd");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let bytes = [2, 0, 0xc3, 0x28];
        let mut r = ReadStream::new(&bytes);
        match r.read_string("index", true) {
            Err(CodecError::InvalidUtf8 { field: "index" }) => {}
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }

    #[test]
    fn booleans_are_zero_or_one() {
        let bytes = [0u8, 1, 2];
        let mut r = ReadStream::new(&bytes);
        assert!(!r.read_bool("flag", true).unwrap());
        assert!(r.read_bool("flag", true).unwrap());
        match r.read_bool("flag", true) {
            Err(CodecError::InvalidBool { field: "flag", value: 2 }) => {}
            other => panic!("expected InvalidBool, got {:?}", other),
        }
    }

    #[test]
    fn seeking_past_the_end_fails() {
        let mut r = ReadStream::new(&[0u8; 4]);
        assert!(r.set_read_index(4).is_ok());
        assert!(r.set_read_index(5).is_err());
    }
}
