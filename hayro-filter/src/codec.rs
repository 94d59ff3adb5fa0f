//! The codecs of the natively implemented filters.

use crate::error::Result;
use crate::{Ascii85, AsciiHex, Filter, Flate, Lzw, RunLength};

/// An encoder and decoder for one of the natively implemented filters.
///
/// Codecs hold no state between calls, so a single codec can be used for any
/// number of streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codec {
    /// The ASCII85 codec.
    Ascii85(Ascii85),
    /// The ASCII hex codec.
    AsciiHex(AsciiHex),
    /// The run-length codec.
    RunLength(RunLength),
    /// The LZW codec.
    Lzw(Lzw),
    /// The Flate codec.
    Flate(Flate),
}

impl Codec {
    /// The filter implemented by the codec.
    pub fn filter(&self) -> Filter {
        match self {
            Self::Ascii85(_) => Filter::Ascii85Decode,
            Self::AsciiHex(_) => Filter::AsciiHexDecode,
            Self::RunLength(_) => Filter::RunLengthDecode,
            Self::Lzw(_) => Filter::LzwDecode,
            Self::Flate(_) => Filter::FlateDecode,
        }
    }

    /// Encode data.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Ascii85(c) => c.encode(data),
            Self::AsciiHex(c) => c.encode(data),
            Self::RunLength(c) => c.encode(data),
            Self::Lzw(c) => c.encode(data),
            Self::Flate(c) => c.encode(data),
        }
    }

    /// Decode data.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode_length(data, -1)
    }

    /// Decode only the start of the data.
    ///
    /// A negative `max_len` decodes everything. Otherwise decoding stops once
    /// `max_len` bytes are available and the result is cut to `max_len` bytes,
    /// so it is a prefix of what [`Codec::decode`] returns.
    pub fn decode_length(&self, data: &[u8], max_len: i64) -> Result<Vec<u8>> {
        let decoded = match self {
            Self::Ascii85(c) => c.decode_length(data, max_len),
            Self::AsciiHex(c) => c.decode_length(data, max_len),
            Self::RunLength(c) => c.decode_length(data, max_len),
            Self::Lzw(c) => c.decode_length(data, max_len),
            Self::Flate(c) => c.decode_length(data, max_len),
        }?;

        Ok(crate::bounded::truncate(decoded, max_len))
    }
}

impl From<Ascii85> for Codec {
    fn from(codec: Ascii85) -> Self {
        Self::Ascii85(codec)
    }
}

impl From<AsciiHex> for Codec {
    fn from(codec: AsciiHex) -> Self {
        Self::AsciiHex(codec)
    }
}

impl From<RunLength> for Codec {
    fn from(codec: RunLength) -> Self {
        Self::RunLength(codec)
    }
}

impl From<Lzw> for Codec {
    fn from(codec: Lzw) -> Self {
        Self::Lzw(codec)
    }
}

impl From<Flate> for Codec {
    fn from(codec: Flate) -> Self {
        Self::Flate(codec)
    }
}
