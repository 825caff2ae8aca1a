//! Growable write cursor with seek support for length backpatching.

use super::error::CodecError;

/// Storage grows in whole chunks of this many bytes.
const CHUNK_SIZE: usize = 4096;

/// Writes little-endian fields into an owned, chunk-grown buffer.
///
/// The cursor can be moved back with [`set_write_index`](Self::set_write_index),
/// which is how payload frames are written: reserve four bytes, write the
/// payload, seek back, write the measured length, seek forward again.
#[derive(Debug, Clone)]
pub struct WriteStream {
    storage: Vec<u8>,
    write_index: usize,
    high_water: usize,
}

impl Default for WriteStream {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteStream {
    pub fn new() -> Self {
        Self {
            storage: vec![0; CHUNK_SIZE],
            write_index: 0,
            high_water: 0,
        }
    }

    /// Allocated capacity of the buffer, not the number of bytes written.
    pub fn length(&self) -> usize {
        self.storage.len()
    }

    pub fn unused(&self) -> usize {
        self.storage.len() - self.write_index
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    pub fn set_write_index(&mut self, write_index: usize) -> Result<(), CodecError> {
        if write_index > self.storage.len() {
            return Err(CodecError::SeekOutOfRange {
                index: write_index,
                length: self.storage.len(),
            });
        }
        self.write_index = write_index;
        Ok(())
    }

    /// Everything written so far, up to the furthest point the cursor has
    /// reached.
    pub fn final_bytes(&self) -> &[u8] {
        &self.storage[..self.high_water.max(self.write_index)]
    }

    pub fn final_hex(&self) -> String {
        hex::encode(self.final_bytes())
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        let end = self.high_water.max(self.write_index);
        self.storage.truncate(end);
        self.storage
    }

    fn expand(&mut self, additional: usize) {
        let needed = self.write_index + additional;
        if needed > self.storage.len() {
            let chunks = additional.div_ceil(CHUNK_SIZE);
            self.storage.resize(self.storage.len() + chunks * CHUNK_SIZE, 0);
        }
    }

    pub fn write_fixed(&mut self, _field: &'static str, bytes: &[u8]) {
        self.expand(bytes.len());
        self.storage[self.write_index..self.write_index + bytes.len()].copy_from_slice(bytes);
        self.write_index += bytes.len();
        self.high_water = self.high_water.max(self.write_index);
    }

    /// Write `length` bytes given as hex.
    pub fn write_fixed_hex(
        &mut self,
        field: &'static str,
        length: usize,
        value: &str,
    ) -> Result<(), CodecError> {
        if value.len() != length * 2 {
            return Err(CodecError::InvalidLength {
                field,
                length: value.len() / 2,
                min: length,
                max: length,
            });
        }
        let bytes = hex::decode(value).map_err(|e| CodecError::InvalidHex {
            field,
            reason: e.to_string(),
        })?;
        self.write_fixed(field, &bytes);
        Ok(())
    }

    pub fn write_byte(&mut self, field: &'static str, value: u8) {
        self.write_fixed(field, &[value]);
    }

    pub fn write_u16(&mut self, field: &'static str, value: u16) {
        self.write_fixed(field, &value.to_le_bytes());
    }

    pub fn write_u32(&mut self, field: &'static str, value: u32) {
        self.write_fixed(field, &value.to_le_bytes());
    }

    pub fn write_u64(&mut self, field: &'static str, value: u64) {
        self.write_fixed(field, &value.to_le_bytes());
    }

    pub fn write_bool(&mut self, field: &'static str, value: bool) {
        self.write_byte(field, value as u8);
    }

    /// A u16 length prefix followed by the UTF-8 bytes.
    pub fn write_string(&mut self, field: &'static str, value: &str) -> Result<(), CodecError> {
        let length = u16::try_from(value.len()).map_err(|_| CodecError::InvalidLength {
            field,
            length: value.len(),
            min: 0,
            max: u16::MAX as usize,
        })?;
        self.write_u16(field, length);
        self.write_fixed(field, value.as_bytes());
        Ok(())
    }
}
