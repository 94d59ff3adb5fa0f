//! Filter names and the registry shared by the factory and the metadata
//! queries.

use crate::codec::Codec;
use crate::error::{FilterError, Result, err};
use crate::params::DecodeParms;
use crate::{Ascii85, AsciiHex, Flate, Lzw, RunLength};
use core::fmt;

/// The name of the ASCII85 filter.
pub const ASCII85_DECODE: &str = "ASCII85Decode";
/// The name of the ASCII hex filter.
pub const ASCII_HEX_DECODE: &str = "ASCIIHexDecode";
/// The name of the run-length filter.
pub const RUN_LENGTH_DECODE: &str = "RunLengthDecode";
/// The name of the LZW filter.
pub const LZW_DECODE: &str = "LZWDecode";
/// The name of the Flate filter.
pub const FLATE_DECODE: &str = "FlateDecode";
/// The name of the CCITT fax filter.
pub const CCITT_FAX_DECODE: &str = "CCITTFaxDecode";
/// The name of the JBIG2 filter.
pub const JBIG2_DECODE: &str = "JBIG2Decode";
/// The name of the DCT (JPEG) filter.
pub const DCT_DECODE: &str = "DCTDecode";
/// The name of the JPX (JPEG 2000) filter.
pub const JPX_DECODE: &str = "JPXDecode";

/// A standard PDF stream filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// `ASCII85Decode`.
    Ascii85Decode,
    /// `ASCIIHexDecode`.
    AsciiHexDecode,
    /// `RunLengthDecode`.
    RunLengthDecode,
    /// `LZWDecode`.
    LzwDecode,
    /// `FlateDecode`.
    FlateDecode,
    /// `CCITTFaxDecode`, passed through to an image decoder.
    CcittFaxDecode,
    /// `JBIG2Decode`, passed through to an image decoder.
    Jbig2Decode,
    /// `DCTDecode`, passed through to an image decoder.
    DctDecode,
    /// `JPXDecode`, passed through to an image decoder.
    JpxDecode,
}

struct Registration {
    filter: Filter,
    name: &'static str,
    native: bool,
    decode_parms: bool,
}

const fn register(
    filter: Filter,
    name: &'static str,
    native: bool,
    decode_parms: bool,
) -> Registration {
    Registration {
        filter,
        name,
        native,
        decode_parms,
    }
}

// Must be in the order of the variants of `Filter`.
const REGISTRY: [Registration; 9] = [
    register(Filter::Ascii85Decode, ASCII85_DECODE, true, false),
    register(Filter::AsciiHexDecode, ASCII_HEX_DECODE, true, false),
    register(Filter::RunLengthDecode, RUN_LENGTH_DECODE, true, false),
    register(Filter::LzwDecode, LZW_DECODE, true, true),
    register(Filter::FlateDecode, FLATE_DECODE, true, true),
    register(Filter::CcittFaxDecode, CCITT_FAX_DECODE, false, true),
    register(Filter::Jbig2Decode, JBIG2_DECODE, false, false),
    register(Filter::DctDecode, DCT_DECODE, false, false),
    register(Filter::JpxDecode, JPX_DECODE, false, false),
];

impl Filter {
    /// All filters, natively implemented ones first.
    pub const ALL: [Self; 9] = [
        Self::Ascii85Decode,
        Self::AsciiHexDecode,
        Self::RunLengthDecode,
        Self::LzwDecode,
        Self::FlateDecode,
        Self::CcittFaxDecode,
        Self::Jbig2Decode,
        Self::DctDecode,
        Self::JpxDecode,
    ];

    fn registration(self) -> &'static Registration {
        &REGISTRY[self as usize]
    }

    /// The name of the filter, as used in the `Filter` entry of a stream.
    pub fn name(self) -> &'static str {
        self.registration().name
    }

    /// Look up a filter by its full name.
    pub fn from_name(name: &str) -> Result<Self> {
        REGISTRY
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.filter)
            .ok_or(FilterError::UnsupportedFilter)
    }

    /// Look up a filter by the abbreviated name used in inline images.
    pub fn from_abbreviation(name: &str) -> Result<Self> {
        match name {
            "A85" => Ok(Self::Ascii85Decode),
            "AHx" => Ok(Self::AsciiHexDecode),
            "RL" => Ok(Self::RunLengthDecode),
            "LZW" => Ok(Self::LzwDecode),
            "Fl" => Ok(Self::FlateDecode),
            "CCF" => Ok(Self::CcittFaxDecode),
            "DCT" => Ok(Self::DctDecode),
            _ => err!(FilterError::UnsupportedFilter),
        }
    }

    /// Whether this crate can encode and decode the filter.
    ///
    /// The other filters are image codecs whose data is left as is.
    pub fn is_native(self) -> bool {
        self.registration().native
    }

    /// Whether the filter takes a `DecodeParms` dictionary.
    pub fn supports_decode_parms(self) -> bool {
        self.registration().decode_parms
    }

    /// Create the codec of the filter.
    ///
    /// The parameters are only validated once data is decoded or encoded.
    pub fn codec(self, parms: Option<DecodeParms>) -> Result<Codec> {
        match self {
            Self::Ascii85Decode => Ok(Codec::Ascii85(Ascii85)),
            Self::AsciiHexDecode => Ok(Codec::AsciiHex(AsciiHex)),
            Self::RunLengthDecode => Ok(Codec::RunLength(RunLength)),
            Self::LzwDecode => Ok(Codec::Lzw(Lzw::new(parms))),
            Self::FlateDecode => Ok(Codec::Flate(Flate::new(parms))),
            Self::CcittFaxDecode | Self::Jbig2Decode | Self::DctDecode | Self::JpxDecode => {
                err!(FilterError::UnsupportedFilter)
            }
        }
    }

    pub(crate) fn natives() -> impl Iterator<Item = Self> {
        REGISTRY.iter().filter(|r| r.native).map(|r| r.filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for Filter {
    type Error = FilterError;

    fn try_from(value: &str) -> Result<Self> {
        Self::from_name(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_matches_variants() {
        for (i, filter) in Filter::ALL.iter().enumerate() {
            assert_eq!(REGISTRY[i].filter, *filter);
            assert_eq!(*filter as usize, i);
        }
    }

    #[test]
    fn names() {
        for filter in Filter::ALL {
            assert_eq!(Filter::from_name(filter.name()), Ok(filter));
            assert_eq!(filter.to_string(), filter.name());
        }

        assert_eq!(Filter::from_name("Crypt"), Err(FilterError::UnsupportedFilter));
        assert_eq!(Filter::from_name("flatedecode"), Err(FilterError::UnsupportedFilter));
        assert_eq!(Filter::from_name("Fl"), Err(FilterError::UnsupportedFilter));
        assert_eq!(Filter::try_from("LZWDecode"), Ok(Filter::LzwDecode));
    }

    #[test]
    fn abbreviations() {
        assert_eq!(Filter::from_abbreviation("Fl"), Ok(Filter::FlateDecode));
        assert_eq!(Filter::from_abbreviation("AHx"), Ok(Filter::AsciiHexDecode));
        assert!(Filter::from_abbreviation("FlateDecode").is_err());
    }

    #[test]
    fn opaque_filters_have_no_codec() {
        for filter in Filter::ALL {
            assert_eq!(filter.codec(None).is_ok(), filter.is_native());
        }
    }

    #[test]
    fn decode_parms_support() {
        let with_parms: Vec<_> = Filter::ALL
            .into_iter()
            .filter(|f| f.supports_decode_parms())
            .collect();

        assert_eq!(
            with_parms,
            [Filter::LzwDecode, Filter::FlateDecode, Filter::CcittFaxDecode]
        );
    }
}
