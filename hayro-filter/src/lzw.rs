//! The LZW codec, with the code width and table conventions of PDF and TIFF.

use crate::bit::{BitReader, BitWriter};
use crate::bounded::{check_buf_len, truncate};
use crate::error::{LzwError, ParameterError, Result, bail};
use crate::params::{DecodeParms, Predictor, RowGeometry};
use crate::predictor;
use rustc_hash::FxHashMap;

const CLEAR_TABLE: u16 = 256;
const EOD: u16 = 257;
const INITIAL_SIZE: usize = 258;
const MAX_ENTRIES: usize = 4096;

/// Lempel-Ziv-Welch compression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lzw {
    parms: Option<DecodeParms>,
}

impl Lzw {
    /// Create a new LZW codec with the given decode parameters.
    pub fn new(parms: Option<DecodeParms>) -> Self {
        Self { parms }
    }

    /// The decode parameters of the codec.
    pub fn parms(&self) -> Option<&DecodeParms> {
        self.parms.as_ref()
    }

    /// Decode an LZW-compressed stream and undo its predictor.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode_length(data, -1)
    }

    /// Decode at least the first `max_len` bytes of an LZW-compressed stream.
    pub fn decode_length(&self, data: &[u8], max_len: i64) -> Result<Vec<u8>> {
        let (early_change, predictor, geometry) = self.settings()?;
        ldebug!(
            "lzw decode: early change {}, predictor {}, {:?}",
            early_change,
            predictor.value(),
            geometry
        );

        let decoded = decode_impl(data, early_change, max_len)?;
        let decoded = predictor::decode(decoded, predictor, &geometry)?;

        Ok(truncate(decoded, max_len))
    }

    /// Compress data with LZW.
    ///
    /// The data is compressed as is, a predictor in the parameters is not
    /// applied.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let early_change = self.parms.as_ref().is_none_or(|p| p.early_change());

        Ok(encode_impl(data, early_change))
    }

    fn settings(&self) -> Result<(bool, Predictor, RowGeometry)> {
        let Some(parms) = &self.parms else {
            return Ok((true, Predictor::No, RowGeometry::default()));
        };

        let predictor = parms.predictor()?;
        if predictor.is_png() {
            bail!(ParameterError::UnsupportedPredictor(predictor.value()));
        }

        let geometry = match predictor {
            Predictor::No => RowGeometry::default(),
            _ => RowGeometry::from_parms(Some(parms))?,
        };

        Ok((parms.early_change(), predictor, geometry))
    }
}

fn decode_impl(data: &[u8], early_change: bool, max_len: i64) -> Result<Vec<u8>> {
    let mut table = Table::new(early_change);
    let mut reader = BitReader::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    let mut prev = None;

    loop {
        if !check_buf_len(decoded.len(), max_len) {
            ltrace!("stopping lzw decode after {} bytes", decoded.len());
            return Ok(decoded);
        }

        let Some(code) = reader.read(table.code_length()) else {
            bail!(LzwError::UnexpectedEof);
        };

        match code {
            CLEAR_TABLE => {
                table.clear();
                prev = None;
            }
            EOD => return Ok(decoded),
            code if (code as usize) < table.len() => {
                table.write(code, &mut decoded);

                if let Some(prev) = prev {
                    let first = table.first_byte(code);
                    table.register(prev, first);
                }

                prev = Some(code);
            }
            // The code is the one about to be defined, which is only possible
            // if it starts with the previous string.
            code if code as usize == table.len() => {
                let Some(prev_code) = prev else {
                    bail!(LzwError::InvalidCode(code));
                };

                let first = table.first_byte(prev_code);
                table.register(prev_code, first);
                table.write(code, &mut decoded);
                prev = Some(code);
            }
            code => bail!(LzwError::InvalidCode(code)),
        }
    }
}

/// The string table of the decoder.
///
/// Each entry is stored as the code of its prefix and its last byte.
struct Table {
    early_change: bool,
    prefixes: Vec<u16>,
    suffixes: Vec<u8>,
    lengths: Vec<u16>,
}

impl Table {
    fn new(early_change: bool) -> Self {
        let mut table = Self {
            early_change,
            prefixes: Vec::with_capacity(MAX_ENTRIES),
            suffixes: Vec::with_capacity(MAX_ENTRIES),
            lengths: Vec::with_capacity(MAX_ENTRIES),
        };

        for byte in 0..=255 {
            table.prefixes.push(0);
            table.suffixes.push(byte);
            table.lengths.push(1);
        }

        // Clear table and EOD don't have any data.
        for _ in 0..2 {
            table.prefixes.push(0);
            table.suffixes.push(0);
            table.lengths.push(0);
        }

        table
    }

    fn len(&self) -> usize {
        self.suffixes.len()
    }

    fn clear(&mut self) {
        self.prefixes.truncate(INITIAL_SIZE);
        self.suffixes.truncate(INITIAL_SIZE);
        self.lengths.truncate(INITIAL_SIZE);
    }

    /// Add the string of `prev` followed by `byte`. A full table stays as is.
    fn register(&mut self, prev: u16, byte: u8) {
        if self.len() >= MAX_ENTRIES {
            return;
        }

        let length = self.lengths[prev as usize] + 1;
        self.prefixes.push(prev);
        self.suffixes.push(byte);
        self.lengths.push(length);
    }

    fn first_byte(&self, code: u16) -> u8 {
        let mut code = code as usize;

        while self.lengths[code] > 1 {
            code = self.prefixes[code] as usize;
        }

        self.suffixes[code]
    }

    /// Append the string of `code` to `out`.
    fn write(&self, code: u16, out: &mut Vec<u8>) {
        let start = out.len();
        let length = self.lengths[code as usize] as usize;
        out.resize(start + length, 0);

        let mut code = code as usize;
        for slot in out[start..].iter_mut().rev() {
            *slot = self.suffixes[code];
            code = self.prefixes[code] as usize;
        }
    }

    fn code_length(&self) -> u8 {
        code_length(self.len(), self.early_change)
    }
}

/// The width of the next code, given the number of entries in the table.
fn code_length(entries: usize, early_change: bool) -> u8 {
    const TEN: usize = 512;
    const ELEVEN: usize = 1024;
    const TWELVE: usize = 2048;

    let adjusted = entries + usize::from(early_change);

    if adjusted >= TWELVE {
        12
    } else if adjusted >= ELEVEN {
        11
    } else if adjusted >= TEN {
        10
    } else {
        9
    }
}

fn encode_impl(data: &[u8], early_change: bool) -> Vec<u8> {
    let mut encoder = Encoder::new(data.len(), early_change);
    encoder.emit(CLEAR_TABLE);

    let mut bytes = data.iter().copied();
    let Some(first) = bytes.next() else {
        encoder.emit(EOD);
        return encoder.writer.finish();
    };

    let mut cur = first as u16;

    for byte in bytes {
        if let Some(&code) = encoder.dict.get(&(cur, byte)) {
            cur = code;
            continue;
        }

        encoder.emit(cur);
        encoder.define(cur, byte);
        cur = byte as u16;
    }

    encoder.emit(cur);
    encoder.emit(EOD);

    encoder.writer.finish()
}

struct Encoder {
    writer: BitWriter,
    dict: FxHashMap<(u16, u8), u16>,
    early_change: bool,
    next_code: usize,
    /// The size of the table of a decoder that has read all codes so far.
    decoder_len: usize,
    /// Whether the last code was a clear code.
    after_clear: bool,
}

impl Encoder {
    fn new(len: usize, early_change: bool) -> Self {
        Self {
            writer: BitWriter::with_capacity(len / 2 + 4),
            dict: FxHashMap::default(),
            early_change,
            next_code: INITIAL_SIZE,
            decoder_len: INITIAL_SIZE,
            after_clear: false,
        }
    }

    fn emit(&mut self, code: u16) {
        self.writer
            .write(code, code_length(self.decoder_len, self.early_change));

        match code {
            CLEAR_TABLE => {
                self.decoder_len = INITIAL_SIZE;
                self.after_clear = true;
            }
            EOD => {}
            // The decoder defines no entry for the first code after a clear.
            _ if self.after_clear => self.after_clear = false,
            _ => self.decoder_len = (self.decoder_len + 1).min(MAX_ENTRIES),
        }
    }

    fn define(&mut self, prefix: u16, byte: u8) {
        self.dict.insert((prefix, byte), self.next_code as u16);
        self.next_code += 1;

        if self.next_code == MAX_ENTRIES {
            self.emit(CLEAR_TABLE);
            self.dict.clear();
            self.next_code = INITIAL_SIZE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::params::{COLORS, COLUMNS, EARLY_CHANGE, PREDICTOR};

    const SIMPLE: [u8; 9] = [0x80, 0x0B, 0x60, 0x50, 0x22, 0x0C, 0x0C, 0x85, 0x01];
    const SIMPLE_DECODED: [u8; 10] = [45, 45, 45, 45, 45, 65, 45, 45, 45, 66];

    #[test]
    fn simple_lzw() {
        let decoded = Lzw::default().decode(&SIMPLE).unwrap();
        assert_eq!(decoded, SIMPLE_DECODED);
    }

    #[test]
    fn simple_encode() {
        assert_eq!(Lzw::default().encode(&SIMPLE_DECODED).unwrap(), SIMPLE);
    }

    #[test]
    fn empty() {
        let encoded = Lzw::default().encode(&[]).unwrap();
        // Clear and EOD, 9 bits each.
        assert_eq!(encoded, [0x80, 0x40, 0x40]);
        assert!(Lzw::default().decode(&encoded).unwrap().is_empty());
    }

    #[test]
    fn code_widths() {
        assert_eq!(code_length(258, true), 9);
        assert_eq!(code_length(510, true), 9);
        assert_eq!(code_length(511, true), 10);
        assert_eq!(code_length(511, false), 9);
        assert_eq!(code_length(512, false), 10);
        assert_eq!(code_length(1023, true), 11);
        assert_eq!(code_length(2047, true), 12);
        assert_eq!(code_length(4096, false), 12);
    }

    #[test]
    fn long_input_fills_table() {
        // Enough distinct strings to fill the table several times.
        let data: Vec<u8> = (0..200_000_u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();

        for early_change in [0, 1] {
            let lzw = Lzw::new(Some(DecodeParms::from([(EARLY_CHANGE, early_change)])));
            let encoded = lzw.encode(&data).unwrap();
            assert_eq!(lzw.decode(&encoded).unwrap(), data);
        }
    }

    #[test]
    fn early_change_must_match() {
        let data: Vec<u8> = (0..5000_u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();
        let late = Lzw::new(Some(DecodeParms::from([(EARLY_CHANGE, 0)])));
        let encoded = late.encode(&data).unwrap();

        assert_eq!(late.decode(&encoded).unwrap(), data);
        assert_ne!(Lzw::default().decode(&encoded).ok(), Some(data));
    }

    #[test]
    fn missing_eod() {
        let mut writer = BitWriter::default();
        writer.write(CLEAR_TABLE, 9);
        writer.write(b'h' as u16, 9);
        writer.write(b'i' as u16, 9);

        assert_eq!(
            Lzw::default().decode(&writer.finish()),
            Err(FilterError::Lzw(LzwError::UnexpectedEof))
        );
    }

    #[test]
    fn invalid_code() {
        // Clear, then code 300 right away.
        let mut writer = BitWriter::default();
        writer.write(CLEAR_TABLE, 9);
        writer.write(300, 9);

        assert_eq!(
            Lzw::default().decode(&writer.finish()),
            Err(FilterError::Lzw(LzwError::InvalidCode(300)))
        );

        // The next free code without a previous code.
        let mut writer = BitWriter::default();
        writer.write(CLEAR_TABLE, 9);
        writer.write(258, 9);

        assert_eq!(
            Lzw::default().decode(&writer.finish()),
            Err(FilterError::Lzw(LzwError::InvalidCode(258)))
        );
    }

    #[test]
    fn png_predictor_is_unsupported() {
        let lzw = Lzw::new(Some(DecodeParms::from([(PREDICTOR, 12), (COLUMNS, 4)])));

        assert_eq!(
            lzw.decode(&SIMPLE),
            Err(FilterError::Parameter(ParameterError::UnsupportedPredictor(12)))
        );
        assert!(
            lzw.decode(&SIMPLE)
                .unwrap_err()
                .to_string()
                .contains("unsupported predictor")
        );
    }

    #[test]
    fn undefined_predictor() {
        let lzw = Lzw::new(Some(DecodeParms::from([(PREDICTOR, 7)])));

        assert_eq!(
            lzw.decode(&SIMPLE),
            Err(FilterError::Parameter(ParameterError::UndefinedPredictor(7)))
        );
    }

    #[test]
    fn geometry_is_ignored_without_predictor() {
        let lzw = Lzw::new(Some(DecodeParms::from([(COLORS, 0), (COLUMNS, -3)])));
        assert_eq!(lzw.decode(&SIMPLE).unwrap(), SIMPLE_DECODED);

        let tiff = Lzw::new(Some(DecodeParms::from([(PREDICTOR, 2), (COLORS, 0)])));
        assert_eq!(
            tiff.decode(&SIMPLE),
            Err(FilterError::Parameter(ParameterError::InvalidColors(0)))
        );
    }

    #[test]
    fn tiff_predictor() {
        let parms = DecodeParms::from([(PREDICTOR, 2), (COLUMNS, 5)]);
        let lzw = Lzw::new(Some(parms));
        let encoded = lzw.encode(&[10, 5, 3, 2, 1, 7, 1, 1, 1, 1]).unwrap();

        assert_eq!(
            lzw.decode(&encoded).unwrap(),
            [10, 15, 18, 20, 21, 7, 8, 9, 10, 11]
        );
    }

    #[test]
    fn bounded() {
        let data: Vec<u8> = (0..10_000_u32).map(|i| (i % 97) as u8).collect();
        let lzw = Lzw::default();
        let encoded = lzw.encode(&data).unwrap();

        assert_eq!(lzw.decode_length(&encoded, 100).unwrap(), &data[..100]);
        assert!(lzw.decode_length(&encoded, 0).unwrap().is_empty());
        assert_eq!(lzw.decode_length(&encoded, -1).unwrap(), data);
    }
}
