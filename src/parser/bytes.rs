//! Little-endian integer reads over raw chunk bytes.

use crate::utils::error::DecodeError;

/// Read a little-endian `u32` at `offset`
///
/// # Errors
/// * `DecodeError::OutOfBounds` - fewer than 4 bytes remain at `offset`
pub fn read_u32(buffer: &[u8], offset: usize) -> Result<u32, DecodeError> {
    let bytes = slice_at(buffer, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a little-endian `u16` at `offset`
///
/// # Errors
/// * `DecodeError::OutOfBounds` - fewer than 2 bytes remain at `offset`
pub fn read_u16(buffer: &[u8], offset: usize) -> Result<u16, DecodeError> {
    let bytes = slice_at(buffer, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn slice_at(buffer: &[u8], offset: usize, width: usize) -> Result<&[u8], DecodeError> {
    offset
        .checked_add(width)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(DecodeError::OutOfBounds {
            offset,
            width,
            len: buffer.len(),
        })
}

/// Sequential reader used by the chunk decoders
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Start reading at `offset` (e.g. just past a chunk tag)
    pub fn at(buffer: &'a [u8], offset: usize) -> Self {
        Self { buffer, offset }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let value = read_u32(self.buffer, self.offset)?;
        self.offset += 4;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let value = read_u16(self.buffer, self.offset)?;
        self.offset += 2;
        Ok(value)
    }

    /// Borrow the next `len` bytes
    ///
    /// # Errors
    /// * `DecodeError::Truncated` - the payload runs past the buffer end
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self
            .offset
            .checked_add(len)
            .and_then(|end| self.buffer.get(self.offset..end))
            .ok_or(DecodeError::Truncated {
                offset: self.offset,
                needed: len,
                len: self.buffer.len(),
            })?;
        self.offset += len;
        Ok(bytes)
    }

    /// Make sure a whole fixed-size block is present before decoding it
    pub fn require(&self, len: usize) -> Result<(), DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: len,
                len: self.buffer.len(),
            });
        }
        Ok(())
    }

    pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.read_bytes(len).map(|_| ())
    }
}
