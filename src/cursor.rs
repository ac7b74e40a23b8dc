//! Position-tracking view over an immutable byte buffer.
//!
//! [`ByteCursor`] is the substrate every decoder in this crate reads through.
//! Reads never fail hard: running out of bytes yields a short (or empty) slice
//! or `None`, and the position never moves past the end of the buffer. The only
//! error is an explicit [`ByteCursor::seek`] outside `[0, len]`.

use byteorder::{ByteOrder, LittleEndian};
use memchr::memmem;

/// Errors raised by explicit cursor positioning
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// Seek target lies outside the buffer
    #[error("Invalid offset {offset} for buffer of {len} bytes")]
    InvalidOffset {
        /// Requested offset
        offset: usize,
        /// Buffer length
        len: usize,
    },
}

/// A saved cursor position, restorable without a bounds check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Offset captured by this checkpoint
    pub fn offset(&self) -> usize {
        self.0
    }
}

/// Seekable cursor over a borrowed byte buffer.
///
/// Invariant: `tell() <= len()` at all times.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The whole underlying buffer
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Current absolute offset
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Reposition to an absolute offset in `[0, len]`
    pub fn seek(&mut self, offset: usize) -> Result<(), CursorError> {
        if offset > self.bytes.len() {
            return Err(CursorError::InvalidOffset {
                offset,
                len: self.bytes.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Move to the end of the buffer
    pub fn seek_to_end(&mut self) {
        self.pos = self.bytes.len();
    }

    /// Save the current position
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    /// Return to a saved position
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        // A checkpoint taken on a longer buffer must still respect pos <= len
        self.pos = checkpoint.0.min(self.bytes.len());
    }

    /// Bytes between the cursor and the end of the buffer
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Whether the cursor sits at the end of the buffer
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Read one byte, or `None` at end of buffer
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    /// Read up to `n` bytes; the slice is shorter than `n` near the end
    pub fn read_bytes(&mut self, n: usize) -> &'a [u8] {
        let end = self.pos.saturating_add(n).min(self.bytes.len());
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        slice
    }

    /// Look at exactly `n` bytes without moving, or `None` if fewer remain
    pub fn peek_bytes(&self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        self.bytes.get(self.pos..end)
    }

    /// Peek a little-endian `u32` without moving
    pub fn peek_u32_le(&self) -> Option<u32> {
        self.peek_bytes(4).map(LittleEndian::read_u32)
    }

    /// Read exactly `n` bytes or nothing.
    ///
    /// On a short buffer the cursor moves to the end and `None` is returned.
    pub fn read_exact(&mut self, n: usize) -> Option<&'a [u8]> {
        match self.peek_bytes(n) {
            Some(slice) => {
                self.pos += n;
                Some(slice)
            }
            None => {
                self.seek_to_end();
                None
            }
        }
    }

    /// Absolute offset of the next `byte` at or after the cursor
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr::memchr(byte, self.remaining()).map(|i| self.pos + i)
    }

    /// Absolute offset of the next `needle` at or after the cursor
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(self.remaining(), needle).map(|i| self.pos + i)
    }

    /// Like [`find`](Self::find) but only matches lying entirely before `limit`
    pub fn find_before(&self, needle: &[u8], limit: usize) -> Option<usize> {
        let limit = limit.min(self.bytes.len());
        if limit <= self.pos {
            return None;
        }
        memmem::find(&self.bytes[self.pos..limit], needle).map(|i| self.pos + i)
    }
}

impl<'a> From<&'a [u8]> for ByteCursor<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteCursor::new(bytes)
    }
}
