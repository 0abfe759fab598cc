//! Bounds-checked read head over AML bytecode.
//!
//! A [`Cursor`] never copies: bounded children created with
//! [`Cursor::bounded`] alias the same backing slice and are limited to the
//! bytes of one PkgLength-delimited block.

use crate::error::AmlError;

/// A saved cursor position, restored with [`Cursor::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Read head over an immutable byte range.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of this cursor's range.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` once every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the next byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consumes one byte, or returns `None` at the end of the range.
    pub fn try_next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Consumes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::EndOfStream`] if the range is exhausted.
    pub fn next_byte(&mut self) -> Result<u8, AmlError> {
        self.try_next_byte().ok_or(AmlError::EndOfStream)
    }

    /// Consumes a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::EndOfStream`] if fewer than 2 bytes remain.
    pub fn next_word(&mut self) -> Result<u16, AmlError> {
        let lo = self.next_byte()?;
        let hi = self.next_byte()?;
        Ok(u16::from(lo) | (u16::from(hi) << 8))
    }

    /// Consumes a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::EndOfStream`] if fewer than 4 bytes remain.
    pub fn next_dword(&mut self) -> Result<u32, AmlError> {
        let lo = self.next_word()?;
        let hi = self.next_word()?;
        Ok(u32::from(lo) | (u32::from(hi) << 16))
    }

    /// Consumes a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::EndOfStream`] if fewer than 8 bytes remain.
    pub fn next_qword(&mut self) -> Result<u64, AmlError> {
        let lo = self.next_dword()?;
        let hi = self.next_dword()?;
        Ok(u64::from(lo) | (u64::from(hi) << 32))
    }

    /// Carves a child cursor over the next `length` bytes and advances past
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::InvalidLength`] if fewer than `length` bytes remain.
    pub fn bounded(&mut self, length: usize) -> Result<Cursor<'a>, AmlError> {
        if length > self.remaining() {
            return Err(AmlError::InvalidLength);
        }
        let child = Cursor::new(&self.data[self.pos..self.pos + length]);
        self.pos += length;
        Ok(child)
    }

    /// Consumes and returns every remaining byte.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos.min(self.data.len())..];
        self.pos = self.data.len();
        rest
    }

    /// Snapshots the current position.
    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Restores a position previously returned by [`Cursor::mark`].
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0.min(self.data.len());
    }

    /// Decodes a PkgLength at the cursor.
    ///
    /// The returned value includes the 1-4 bytes of the encoding itself.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::EndOfStream`] if the encoding is truncated, or
    /// [`AmlError::InvalidData`] if a multi-byte lead has bits 4-5 set.
    pub fn pkg_length(&mut self) -> Result<usize, AmlError> {
        let lead = self.next_byte()?;
        let byte_count = lead >> 6;

        if byte_count == 0 {
            return Ok(usize::from(lead & 0x3F));
        }
        if lead & 0x30 != 0 {
            return Err(AmlError::InvalidData("PkgLength lead byte has bits 4-5 set"));
        }

        let mut length = usize::from(lead & 0x0F);
        for i in 0..usize::from(byte_count) {
            let byte = self.next_byte()?;
            length |= usize::from(byte) << (4 + i * 8);
        }
        Ok(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_reads_are_little_endian() {
        let data = [
            0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23,
            0x01,
        ];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.next_byte(), Ok(0x01));
        assert_eq!(cursor.next_word(), Ok(0x1234));
        assert_eq!(cursor.next_dword(), Ok(0x1234_5678));
        assert_eq!(cursor.next_qword(), Ok(0x0123_4567_89AB_CDEF));
        assert!(cursor.is_empty());
        assert_eq!(cursor.next_byte(), Err(AmlError::EndOfStream));
    }

    #[test]
    fn truncated_read_reports_end_of_stream() {
        let mut cursor = Cursor::new(&[0xAA, 0xBB, 0xCC]);
        assert_eq!(cursor.next_dword(), Err(AmlError::EndOfStream));
    }

    #[test]
    fn bounded_child_aliases_and_advances_parent() {
        let data = [1, 2, 3, 4, 5];
        let mut parent = Cursor::new(&data);
        parent.next_byte().unwrap();
        let mut child = parent.bounded(3).unwrap();
        assert_eq!(parent.position(), 4);
        assert_eq!(child.remaining(), 3);
        assert_eq!(child.rest(), &[2, 3, 4]);
        assert!(child.is_empty());
        assert_eq!(parent.next_byte(), Ok(5));
    }

    #[test]
    fn bounded_rejects_overlong_length() {
        let mut cursor = Cursor::new(&[1, 2]);
        assert_eq!(cursor.bounded(3).unwrap_err(), AmlError::InvalidLength);
        // A zero-length block (e.g. an empty `Else {}`) is fine.
        assert!(cursor.bounded(0).unwrap().is_empty());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn mark_and_reset_restore_position() {
        let mut cursor = Cursor::new(&[1, 2, 3]);
        let mark = cursor.mark();
        cursor.next_word().unwrap();
        cursor.reset(mark);
        assert_eq!(cursor.peek(), Some(1));
    }

    #[test]
    fn single_byte_pkg_length() {
        for lead in 0u8..=0x3F {
            let data = [lead];
            let mut cursor = Cursor::new(&data);
            assert_eq!(cursor.pkg_length(), Ok(usize::from(lead & 0x3F)));
        }
    }

    #[test]
    fn multi_byte_pkg_length() {
        let mut cursor = Cursor::new(&[0b0100_1111, 0x01]);
        assert_eq!(cursor.pkg_length(), Ok(0x1F));

        let mut cursor = Cursor::new(&[0b1000_0010, 0x34, 0x12]);
        assert_eq!(cursor.pkg_length(), Ok(0x0001_2342));

        let mut cursor = Cursor::new(&[0b1100_0001, 0xFF, 0xFF, 0xFF]);
        assert_eq!(cursor.pkg_length(), Ok(0x0FFF_FFF1));
    }

    #[test]
    fn pkg_length_rejects_reserved_bits_and_truncation() {
        let mut cursor = Cursor::new(&[0b0101_0000, 0x01]);
        assert!(matches!(cursor.pkg_length(), Err(AmlError::InvalidData(_))));

        let mut cursor = Cursor::new(&[0b1000_0000, 0x01]);
        assert_eq!(cursor.pkg_length(), Err(AmlError::EndOfStream));
    }
}
