//! The ASCII hexadecimal codec.

use crate::bounded::check_buf_len;
use crate::error::{AsciiHexError, Result, bail};
use crate::trivia::is_white_space_character;

/// ASCII hexadecimal encoding of binary data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsciiHex;

impl AsciiHex {
    /// Decode an ASCII-hex-encoded stream.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        decode(data, -1)
    }

    /// Decode at least the first `max_len` bytes of an ASCII-hex-encoded stream.
    pub fn decode_length(&self, data: &[u8], max_len: i64) -> Result<Vec<u8>> {
        decode(data, max_len)
    }

    /// Encode data as uppercase hex digits, terminated by `>`.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(encode(data))
    }
}

fn decode(data: &[u8], max_len: i64) -> Result<Vec<u8>> {
    let mut decoded = Vec::with_capacity(data.len() / 2);
    let mut high = None;

    // We are lenient and don't require a `>` in the stream.
    for &b in data {
        if high.is_none() && !check_buf_len(decoded.len(), max_len) {
            return Ok(decoded);
        }

        let nibble = match b {
            b'>' => break,
            b'0'..=b'9' => b - b'0',
            b'A'..=b'F' => b - b'A' + 10,
            b'a'..=b'f' => b - b'a' + 10,
            b if is_white_space_character(b) => continue,
            b => bail!(AsciiHexError::InvalidCharacter(b)),
        };

        match high.take() {
            Some(high) => decoded.push((high << 4) | nibble),
            None => high = Some(nibble),
        }
    }

    // In case the number of digits is odd, pad with 0.
    if let Some(high) = high {
        decoded.push(high << 4);
    }

    Ok(decoded)
}

fn encode(data: &[u8]) -> Vec<u8> {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    let mut encoded = Vec::with_capacity(data.len() * 2 + 1);

    for &b in data {
        encoded.push(DIGITS[(b >> 4) as usize]);
        encoded.push(DIGITS[(b & 0x0f) as usize]);
    }

    encoded.push(b'>');
    encoded
}
