//! The run-length codec.

use crate::bounded::check_buf_len;
use crate::error::{Result, RunLengthError};
use crate::reader::Reader;

const EOD: u8 = 128;
const MAX_RUN: usize = 128;

/// Byte-oriented run-length encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLength;

impl RunLength {
    /// Decode a run-length-encoded stream.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        decode(data, -1)
    }

    /// Decode at least the first `max_len` bytes of a run-length-encoded stream.
    pub fn decode_length(&self, data: &[u8], max_len: i64) -> Result<Vec<u8>> {
        decode(data, max_len)
    }

    /// Run-length-encode data, terminated by the end-of-data byte.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(encode(data))
    }
}

fn decode(data: &[u8], max_len: i64) -> Result<Vec<u8>> {
    let mut reader = Reader::new(data);
    let mut decoded = vec![];

    while check_buf_len(decoded.len(), max_len) {
        // We are lenient and don't require the end-of-data byte.
        let Some(length) = reader.read_byte() else {
            break;
        };

        match length {
            EOD => break,
            0..=127 => {
                let literals = reader
                    .read_bytes(length as usize + 1)
                    .ok_or(RunLengthError::UnexpectedEof)?;
                decoded.extend_from_slice(literals);
            }
            _ => {
                let byte = reader.read_byte().ok_or(RunLengthError::UnexpectedEof)?;
                decoded.resize(decoded.len() + 257 - length as usize, byte);
            }
        }
    }

    Ok(decoded)
}

fn encode(data: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(data.len() + data.len() / MAX_RUN + 2);
    let mut literal_start = 0;
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == byte)
            .count();

        if run >= 2 {
            push_literals(&mut encoded, &data[literal_start..i]);
            encoded.push((257 - run) as u8);
            encoded.push(byte);
            i += run;
            literal_start = i;
        } else {
            i += 1;
        }
    }

    push_literals(&mut encoded, &data[literal_start..]);
    encoded.push(EOD);

    encoded
}

fn push_literals(encoded: &mut Vec<u8>, literals: &[u8]) {
    for chunk in literals.chunks(MAX_RUN) {
        encoded.push((chunk.len() - 1) as u8);
        encoded.extend_from_slice(chunk);
    }
}
