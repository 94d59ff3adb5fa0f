//! The ASCII85 codec.

use crate::bounded::check_buf_len;
use crate::error::{Ascii85Error, Result, bail};
use crate::trivia::is_white_space_character;

/// ASCII base-85 encoding of binary data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascii85;

impl Ascii85 {
    /// Decode an ASCII85-encoded stream.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        decode(data, -1)
    }

    /// Decode at least the first `max_len` bytes of an ASCII85-encoded stream.
    pub fn decode_length(&self, data: &[u8], max_len: i64) -> Result<Vec<u8>> {
        decode(data, max_len)
    }

    /// Encode data as ASCII85, terminated by `~>`.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(encode(data))
    }
}

fn decode(data: &[u8], max_len: i64) -> Result<Vec<u8>> {
    let body = strip_markers(data)?;
    let mut decoded = Vec::with_capacity(body.len() / 5 * 4 + 4);

    let mut group = [0_u8; 5];
    let mut group_len = 0;

    for &b in body.iter().filter(|&&b| !is_white_space_character(b)) {
        if group_len == 0 && !check_buf_len(decoded.len(), max_len) {
            ltrace!("stopping ascii85 decode after {} bytes", decoded.len());
            return Ok(decoded);
        }

        match b {
            b'z' if group_len == 0 => decoded.extend_from_slice(&[0; 4]),
            b'z' => bail!(Ascii85Error::MisplacedZ),
            b'!'..=b'u' => {
                group[group_len] = b - b'!';
                group_len += 1;

                if group_len == 5 {
                    decoded.extend_from_slice(&word_85(group)?);
                    group_len = 0;
                }
            }
            _ => bail!(Ascii85Error::InvalidCharacter(b)),
        }
    }

    match group_len {
        0 => {}
        1 => bail!(Ascii85Error::IncompleteGroup),
        n => {
            // Pad the group with the highest digit, then drop the padding bytes.
            group[n..].fill(84);
            decoded.extend_from_slice(&word_85(group)?[..n - 1]);
        }
    }

    Ok(decoded)
}

/// Return the encoded digits between the optional `<~` and the `~>` marker.
fn strip_markers(data: &[u8]) -> Result<&[u8]> {
    let start = data
        .iter()
        .position(|&b| !is_white_space_character(b))
        .unwrap_or(data.len());
    let data = &data[start..];
    let data = data.strip_prefix(b"<~").unwrap_or(data);

    // A `~` that isn't followed by `>` stays in the data and is rejected
    // as an invalid character while decoding.
    let eod = memchr::memchr_iter(b'~', data).find(|&i| {
        data[i + 1..]
            .iter()
            .find(|&&b| !is_white_space_character(b))
            == Some(&b'>')
    });

    let Some(end) = eod else {
        bail!(Ascii85Error::MissingEod);
    };

    Ok(&data[..end])
}

fn word_85(digits: [u8; 5]) -> Result<[u8; 4]> {
    let value = digits
        .iter()
        .fold(0_u64, |acc, &d| acc * 85 + d as u64);

    // 85^5 > 256^4, so the value might not fit in a u32.
    let word = u32::try_from(value).map_err(|_| Ascii85Error::Overflow)?;

    Ok(word.to_be_bytes())
}

fn encode(data: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(data.len().div_ceil(4) * 5 + 2);
    let mut chunks = data.chunks_exact(4);

    for chunk in chunks.by_ref() {
        let word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);

        if word == 0 {
            encoded.push(b'z');
        } else {
            encoded.extend_from_slice(&digits_85(word));
        }
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut padded = [0; 4];
        padded[..tail.len()].copy_from_slice(tail);
        let digits = digits_85(u32::from_be_bytes(padded));
        encoded.extend_from_slice(&digits[..tail.len() + 1]);
    }

    encoded.extend_from_slice(b"~>");
    encoded
}

fn digits_85(mut word: u32) -> [u8; 5] {
    let mut digits = [0; 5];

    for digit in digits.iter_mut().rev() {
        *digit = (word % 85) as u8 + b'!';
        word /= 85;
    }

    digits
}
