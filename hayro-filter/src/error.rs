//! Error types for encoding and decoding PDF streams.

use core::fmt;

/// The main error type of all filter operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// The filter name is unknown or the filter has no native codec.
    UnsupportedFilter,
    /// Errors related to the decode parameters of a filter.
    Parameter(ParameterError),
    /// Errors related to the predictor post-processing.
    Predictor(PredictorError),
    /// Errors related to ASCII85 data.
    Ascii85(Ascii85Error),
    /// Errors related to ASCII hex data.
    AsciiHex(AsciiHexError),
    /// Errors related to run-length data.
    RunLength(RunLengthError),
    /// Errors related to LZW data.
    Lzw(LzwError),
    /// Errors related to zlib/deflate data.
    Flate(FlateError),
}

/// Errors related to the decode parameters of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// `Colors` was zero or negative.
    InvalidColors(i32),
    /// `BitsPerComponent` was not one of 1, 2, 4, 8 or 16.
    InvalidBitsPerComponent(i32),
    /// `Columns` was zero or negative.
    InvalidColumns(i32),
    /// `Predictor` is not a value defined for LZW and Flate streams.
    UndefinedPredictor(i32),
    /// A PNG predictor was requested for an LZW stream.
    UnsupportedPredictor(i32),
}

/// Errors related to the predictor post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorError {
    /// A PNG row started with an unknown filter type.
    InvalidRowFilter(u8),
    /// The data does not end on a row boundary.
    IncompleteRow,
    /// A row, its output buffer and the previous row do not fit together.
    RowLengthMismatch,
}

/// Errors related to ASCII85 data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ascii85Error {
    /// The `~>` marker is missing.
    MissingEod,
    /// A byte outside of the ASCII85 alphabet was found.
    InvalidCharacter(u8),
    /// A `z` appeared in the middle of a group.
    MisplacedZ,
    /// The final group consists of a single character.
    IncompleteGroup,
    /// A group decodes to a value larger than 2^32 - 1.
    Overflow,
}

/// Errors related to ASCII hex data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsciiHexError {
    /// A byte that is neither a hex digit, white space nor `>` was found.
    InvalidCharacter(u8),
}

/// Errors related to run-length data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLengthError {
    /// The data ended in the middle of a run.
    UnexpectedEof,
}

/// Errors related to LZW data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzwError {
    /// A code that is not in the code table was read.
    InvalidCode(u16),
    /// The data ended before the end-of-data code.
    UnexpectedEof,
}

/// Errors related to zlib/deflate data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlateError {
    /// The compressed data is corrupt.
    Corrupt,
    /// The compressed data ended before the end of the deflate stream.
    UnexpectedEof,
    /// Compressing the data failed.
    CompressionFailed,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFilter => write!(f, "unsupported filter"),
            Self::Parameter(e) => write!(f, "{e}"),
            Self::Predictor(e) => write!(f, "{e}"),
            Self::Ascii85(e) => write!(f, "{e}"),
            Self::AsciiHex(e) => write!(f, "{e}"),
            Self::RunLength(e) => write!(f, "{e}"),
            Self::Lzw(e) => write!(f, "{e}"),
            Self::Flate(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColors(c) => write!(f, "Colors must be > 0, got {c}"),
            Self::InvalidBitsPerComponent(b) => {
                write!(f, "BitsPerComponent must be 1, 2, 4, 8 or 16, got {b}")
            }
            Self::InvalidColumns(c) => write!(f, "Columns must be > 0, got {c}"),
            Self::UndefinedPredictor(p) => write!(f, "undefined Predictor {p}"),
            Self::UnsupportedPredictor(p) => {
                write!(f, "unsupported predictor {p} for LZWDecode")
            }
        }
    }
}

impl fmt::Display for PredictorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRowFilter(t) => write!(f, "invalid PNG row filter type {t}"),
            Self::IncompleteRow => write!(f, "predictor data does not end on a row boundary"),
            Self::RowLengthMismatch => write!(f, "predictor row buffers have mismatched lengths"),
        }
    }
}

impl fmt::Display for Ascii85Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEod => write!(f, "ascii85: missing eod marker"),
            Self::InvalidCharacter(b) => write!(f, "ascii85: invalid character 0x{b:02x}"),
            Self::MisplacedZ => write!(f, "ascii85: 'z' inside a group"),
            Self::IncompleteGroup => write!(f, "ascii85: final group has a single character"),
            Self::Overflow => write!(f, "ascii85: group value exceeds 32 bits"),
        }
    }
}

impl fmt::Display for AsciiHexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter(b) => write!(f, "asciihex: invalid character 0x{b:02x}"),
        }
    }
}

impl fmt::Display for RunLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "run-length: data ended in the middle of a run"),
        }
    }
}

impl fmt::Display for LzwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCode(c) => write!(f, "lzw: invalid code {c}"),
            Self::UnexpectedEof => write!(f, "lzw: unexpected end of data"),
        }
    }
}

impl fmt::Display for FlateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupt => write!(f, "flate: corrupt deflate stream"),
            Self::UnexpectedEof => write!(f, "flate: unexpected end of data"),
            Self::CompressionFailed => write!(f, "flate: compression failed"),
        }
    }
}

impl core::error::Error for FilterError {}
impl core::error::Error for ParameterError {}
impl core::error::Error for PredictorError {}
impl core::error::Error for Ascii85Error {}
impl core::error::Error for AsciiHexError {}
impl core::error::Error for RunLengthError {}
impl core::error::Error for LzwError {}
impl core::error::Error for FlateError {}

impl From<ParameterError> for FilterError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

impl From<PredictorError> for FilterError {
    fn from(e: PredictorError) -> Self {
        Self::Predictor(e)
    }
}

impl From<Ascii85Error> for FilterError {
    fn from(e: Ascii85Error) -> Self {
        Self::Ascii85(e)
    }
}

impl From<AsciiHexError> for FilterError {
    fn from(e: AsciiHexError) -> Self {
        Self::AsciiHex(e)
    }
}

impl From<RunLengthError> for FilterError {
    fn from(e: RunLengthError) -> Self {
        Self::RunLength(e)
    }
}

impl From<LzwError> for FilterError {
    fn from(e: LzwError) -> Self {
        Self::Lzw(e)
    }
}

impl From<FlateError> for FilterError {
    fn from(e: FlateError) -> Self {
        Self::Flate(e)
    }
}

/// Result type for filter operations.
pub type Result<T> = core::result::Result<T, FilterError>;

/// The error returned for filter names without a native codec.
pub const ERR_UNSUPPORTED_FILTER: FilterError = FilterError::UnsupportedFilter;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

macro_rules! err {
    ($err:expr) => {
        Err($err.into())
    };
}

pub(crate) use bail;
pub(crate) use err;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_messages_name_the_key() {
        let colors = FilterError::from(ParameterError::InvalidColors(0)).to_string();
        assert!(colors.contains("Colors"));

        let bpc = FilterError::from(ParameterError::InvalidBitsPerComponent(7)).to_string();
        assert!(bpc.contains("BitsPerComponent"));

        let undefined = FilterError::from(ParameterError::UndefinedPredictor(99)).to_string();
        assert!(undefined.contains("undefined") && undefined.contains("Predictor"));

        let unsupported = FilterError::from(ParameterError::UnsupportedPredictor(12)).to_string();
        assert!(unsupported.contains("unsupported predictor"));
    }

    #[test]
    fn unsupported_filter_is_comparable() {
        assert_eq!(ERR_UNSUPPORTED_FILTER, FilterError::UnsupportedFilter);
        assert!(!ERR_UNSUPPORTED_FILTER.to_string().is_empty());
    }
}
