/*!
Decoders and encoders for the standard filters of PDF streams.

`hayro-filter` implements the filters that PDF uses to compress and encode the
data of stream objects: `ASCII85Decode`, `ASCIIHexDecode`, `RunLengthDecode`,
`LZWDecode` and `FlateDecode`, including the TIFF and PNG predictors that LZW
and Flate streams can carry in their `DecodeParms`. The image filters
`CCITTFaxDecode`, `JBIG2Decode`, `DCTDecode` and `JPXDecode` are recognized,
but their data is left encoded for a dedicated image decoder.

# Example
```rust
use hayro_filter::{DecodeParms, new_filter};

let parms = DecodeParms::new()
    .with("Predictor", 12)
    .with("Columns", 4);
let flate = new_filter("FlateDecode", Some(parms)).unwrap();

let data = [1, 2, 3, 4, 5, 6, 7, 8];
let encoded = flate.encode(&data).unwrap();
assert_eq!(flate.decode(&encoded).unwrap(), data);
```

Streams with several filters can be decoded with a [`Pipeline`].

# Features
- `logging` (enabled by default): log decoder settings and recoverable
  problems via the `log` crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

#[macro_use]
mod log;

mod ascii_85;
mod ascii_hex;
mod bit;
mod bounded;
mod codec;
pub mod error;
mod filter;
mod flate;
mod lzw;
pub mod params;
mod pipeline;
pub mod predictor;
mod reader;
mod run_length;
mod trivia;

pub use ascii_85::Ascii85;
pub use ascii_hex::AsciiHex;
pub use bounded::check_buf_len;
pub use codec::Codec;
pub use error::{ERR_UNSUPPORTED_FILTER, FilterError, Result};
pub use filter::{
    ASCII_HEX_DECODE, ASCII85_DECODE, CCITT_FAX_DECODE, DCT_DECODE, FLATE_DECODE, Filter,
    JBIG2_DECODE, JPX_DECODE, LZW_DECODE, RUN_LENGTH_DECODE,
};
pub use flate::Flate;
pub use lzw::Lzw;
pub use params::{DecodeParms, PngFilter, Predictor, RowGeometry};
pub use pipeline::{
    FilterResult, Pipeline, PipelineEntry, decode_pipeline, decode_pipeline_length,
    encode_pipeline,
};
pub use run_length::RunLength;

/// The names of all filters this crate can encode and decode, in a fixed
/// order.
pub fn list() -> Vec<&'static str> {
    Filter::natives().map(Filter::name).collect()
}

/// Whether the filter with the given name takes a `DecodeParms` dictionary.
///
/// Unknown names don't.
pub fn supports_decode_parms(name: &str) -> bool {
    Filter::from_name(name).is_ok_and(Filter::supports_decode_parms)
}

/// Create the codec of the filter with the given name.
///
/// Returns [`FilterError::UnsupportedFilter`] for unknown names and for image
/// filters. The parameters are only validated once data is decoded or
/// encoded.
pub fn new_filter(name: &str, parms: Option<DecodeParms>) -> Result<Codec> {
    Filter::from_name(name)?.codec(parms)
}
