//! The Flate codec, zlib/deflate compression with an optional predictor.

use crate::error::{FlateError, Result};
use crate::params::{DecodeParms, Predictor, RowGeometry};
use crate::{bounded, predictor};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

const COMPRESSION_LEVEL: u32 = 6;
const CHUNK: usize = 16 * 1024;

/// zlib/deflate compression, optionally combined with a TIFF or PNG predictor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flate {
    parms: Option<DecodeParms>,
}

impl Flate {
    /// Create a new Flate codec with the given decode parameters.
    pub fn new(parms: Option<DecodeParms>) -> Self {
        Self { parms }
    }

    /// The decode parameters of the codec.
    pub fn parms(&self) -> Option<&DecodeParms> {
        self.parms.as_ref()
    }

    /// Resolve the row geometry of the predictor, applying defaults for
    /// absent entries.
    pub fn parameters(&self) -> Result<RowGeometry> {
        RowGeometry::from_parms(self.parms.as_ref())
    }

    /// Decompress a Flate-compressed stream and undo its predictor.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode_length(data, -1)
    }

    /// Decode at least the first `max_len` bytes of a Flate-compressed stream.
    pub fn decode_length(&self, data: &[u8], max_len: i64) -> Result<Vec<u8>> {
        let (predictor, geometry) = self.settings()?;
        ldebug!(
            "flate decode: predictor {}, {:?}",
            predictor.value(),
            geometry
        );

        let row_len = geometry.row_length();
        let limit = usize::try_from(max_len).ok().map(|max_len| {
            if predictor.is_png() {
                max_len.div_ceil(row_len) * (row_len + 1)
            } else {
                max_len
            }
        });

        let (mut inflated, finished) = inflate(data, limit)?;

        if !finished && predictor.is_png() {
            // Only hand whole rows to the predictor.
            let rows = inflated.len() / (row_len + 1);
            inflated.truncate(rows * (row_len + 1));
        }

        let decoded = predictor::decode(inflated, predictor, &geometry)?;

        Ok(bounded::truncate(decoded, max_len))
    }

    /// Apply the predictor to data and compress it.
    ///
    /// PNG predictors require the data to consist of whole rows.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let (predictor, geometry) = self.settings()?;
        let predicted = predictor::encode(data, predictor, &geometry)?;

        deflate(&predicted)
    }

    fn settings(&self) -> Result<(Predictor, RowGeometry)> {
        let predictor = self
            .parms
            .as_ref()
            .map_or(Ok(Predictor::No), DecodeParms::predictor)?;
        // The geometry only matters to a predictor.
        let geometry = match predictor {
            Predictor::No => RowGeometry::default(),
            _ => self.parameters()?,
        };

        Ok((predictor, geometry))
    }
}

/// Whether the data starts with a valid zlib header using deflate.
fn has_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => {
            *cmf & 0x0f == 8 && ((u16::from(*cmf) << 8) | u16::from(*flg)).is_multiple_of(31)
        }
        _ => false,
    }
}

/// Inflate data, stopping once `limit` bytes were produced.
///
/// Also returns whether the end of the deflate stream was reached.
fn inflate(data: &[u8], limit: Option<usize>) -> Result<(Vec<u8>, bool)> {
    let zlib = has_zlib_header(data);

    if !zlib {
        lwarn!("flate stream has no valid zlib header, trying raw deflate");
    }

    let mut decompress = Decompress::new(zlib);
    let mut out = Vec::with_capacity((data.len() * 4).clamp(CHUNK, 64 * CHUNK));

    loop {
        if limit.is_some_and(|limit| out.len() >= limit) {
            ltrace!("stopping flate decode after {} bytes", out.len());
            return Ok((out, false));
        }

        if out.len() == out.capacity() {
            out.reserve(CHUNK);
        }

        let consumed = decompress.total_in() as usize;
        let produced = decompress.total_out();
        let input = data.get(consumed..).unwrap_or_default();

        let status = decompress
            .decompress_vec(input, &mut out, FlushDecompress::None)
            .map_err(|_| FlateError::Corrupt)?;

        match status {
            Status::StreamEnd => return Ok((out, true)),
            Status::Ok | Status::BufError => {
                let stalled = decompress.total_in() as usize == consumed
                    && decompress.total_out() == produced;

                if stalled {
                    return Err(FlateError::UnexpectedEof.into());
                }
            }
        }
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut e = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(COMPRESSION_LEVEL),
    );
    e.write_all(data).map_err(|_| FlateError::CompressionFailed)?;

    e.finish().map_err(|_| FlateError::CompressionFailed.into())
}
