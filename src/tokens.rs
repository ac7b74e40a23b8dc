//! Primitive token readers built on [`ByteCursor`].
//!
//! Every reader returns `Option`: `None` means the value is absent (delimiter not
//! found, buffer truncated, caller passed an unusable argument). Absence is never
//! an error at this level.
//!
//! Cursor position rules:
//! - success: just past the consumed bytes (including any delimiter)
//! - ran out of bytes: end of buffer
//! - unusable argument (zero prefix width, empty delimiter): unchanged
//!
//! Text is decoded as ISO-8859-1, so every byte maps to exactly one `char` and
//! content round-trips byte for byte.

use byteorder::{ByteOrder, LittleEndian};

use crate::cursor::ByteCursor;

/// Conventional string terminator in SoftMax Pro exports
pub const NUL: u8 = 0x00;

/// Widest length prefix representable as a `u64`
pub const MAX_PREFIX_WIDTH: usize = 8;

/// Decoded value payload
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// Text field
    Text(String),
    /// Floating-point field
    Float(f64),
    /// Integer field
    Integer(i64),
}

/// A decoded value together with the offset it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Absolute offset of the first byte of the encoded value
    pub offset: usize,
    /// Decoded value
    pub value: TokenValue,
}

impl Token {
    /// Text token
    pub fn text(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            value: TokenValue::Text(text.into()),
        }
    }

    /// Float token
    pub fn float(offset: usize, value: f64) -> Self {
        Self {
            offset,
            value: TokenValue::Float(value),
        }
    }

    /// Integer token
    pub fn integer(offset: usize, value: i64) -> Self {
        Self {
            offset,
            value: TokenValue::Integer(value),
        }
    }

    /// Text payload, if this is a text token
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            TokenValue::Float(v) => Some(v),
            TokenValue::Integer(v) => Some(v as f64),
            TokenValue::Text(_) => None,
        }
    }

    /// Integer payload
    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            TokenValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Consume the token and return its text payload
    pub fn into_text(self) -> Option<String> {
        match self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Decode ISO-8859-1 bytes
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode text as ISO-8859-1; characters outside the range become `?`
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Read text up to (excluding) `delimiter`.
///
/// Leaves the cursor just past the delimiter. If the delimiter does not occur
/// before the end of the buffer, returns `None` with the cursor at the end.
pub fn read_until_byte_delimiter(cursor: &mut ByteCursor<'_>, delimiter: u8) -> Option<Token> {
    let start = cursor.tell();
    match cursor.find_byte(delimiter) {
        Some(at) => {
            let body = cursor.read_bytes(at - start);
            cursor.read_byte();
            Some(Token::text(start, decode_latin1(body)))
        }
        None => {
            cursor.seek_to_end();
            None
        }
    }
}

/// Read text up to (excluding) the first occurrence of a multi-byte delimiter.
///
/// A one-byte `delimiter` behaves exactly like [`read_until_byte_delimiter`].
/// An empty delimiter returns `None` and leaves the cursor unchanged.
pub fn read_until_string_delimiter(
    cursor: &mut ByteCursor<'_>,
    delimiter: &[u8],
) -> Option<Token> {
    if delimiter.is_empty() {
        return None;
    }
    let start = cursor.tell();
    match cursor.find(delimiter) {
        Some(at) => {
            let body = cursor.read_bytes(at - start);
            cursor.read_bytes(delimiter.len());
            Some(Token::text(start, decode_latin1(body)))
        }
        None => {
            cursor.seek_to_end();
            None
        }
    }
}

/// Read a string preceded by a little-endian unsigned length of `prefix_width` bytes.
///
/// `prefix_width` of 0, or wider than [`MAX_PREFIX_WIDTH`], is unusable: `None`
/// and the cursor does not move. A truncated prefix or body yields `None` with
/// the cursor at the end of the buffer.
pub fn read_with_length_prefix(cursor: &mut ByteCursor<'_>, prefix_width: usize) -> Option<Token> {
    if prefix_width == 0 || prefix_width > MAX_PREFIX_WIDTH {
        return None;
    }
    let start = cursor.tell();
    let prefix = cursor.read_exact(prefix_width)?;
    let len = LittleEndian::read_uint(prefix, prefix_width);
    let len = match usize::try_from(len) {
        Ok(len) => len,
        Err(_) => {
            cursor.seek_to_end();
            return None;
        }
    };
    let body = cursor.read_exact(len)?;
    Some(Token::text(start, decode_latin1(body)))
}

/// Consume a little-endian `u32` if its value is one of `candidates`.
///
/// Otherwise (value not listed, fewer than four bytes left) the cursor is
/// left untouched. Returns whether the number was skipped.
pub fn skip_if_number(cursor: &mut ByteCursor<'_>, candidates: &[u32]) -> bool {
    match cursor.peek_u32_le() {
        Some(value) if candidates.contains(&value) => {
            cursor.read_bytes(4);
            true
        }
        _ => false,
    }
}

/// Read a little-endian `u32` as an integer token
pub fn read_u32(cursor: &mut ByteCursor<'_>) -> Option<Token> {
    let start = cursor.tell();
    let bytes = cursor.read_exact(4)?;
    Some(Token::integer(start, i64::from(LittleEndian::read_u32(bytes))))
}

/// Read a little-endian IEEE-754 double as a float token
pub fn read_f64(cursor: &mut ByteCursor<'_>) -> Option<Token> {
    let start = cursor.tell();
    let bytes = cursor.read_exact(8)?;
    Some(Token::float(start, LittleEndian::read_f64(bytes)))
}
