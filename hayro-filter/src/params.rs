//! Decode parameters of LZW and Flate streams.

use crate::error::{ParameterError, Result, bail};
use rustc_hash::FxHashMap;

/// The `Predictor` key.
pub const PREDICTOR: &str = "Predictor";
/// The `Colors` key.
pub const COLORS: &str = "Colors";
/// The `BitsPerComponent` key.
pub const BITS_PER_COMPONENT: &str = "BitsPerComponent";
/// The `Columns` key.
pub const COLUMNS: &str = "Columns";
/// The `EarlyChange` key.
pub const EARLY_CHANGE: &str = "EarlyChange";

/// The integer entries of a `DecodeParms` dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeParms {
    entries: FxHashMap<String, i32>,
}

impl DecodeParms {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the map with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: i32) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: i32) -> Option<i32> {
        self.entries.insert(key.into(), value)
    }

    /// Get the value of `key`.
    pub fn get(&self, key: &str) -> Option<i32> {
        self.entries.get(key).copied()
    }

    /// Whether the map contains `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub(crate) fn predictor(&self) -> Result<Predictor> {
        self.get(PREDICTOR).map_or(Ok(Predictor::No), Predictor::from_value)
    }

    pub(crate) fn early_change(&self) -> bool {
        self.get(EARLY_CHANGE).is_none_or(|e| e != 0)
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for DecodeParms {
    fn from_iter<T: IntoIterator<Item = (K, i32)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, i32); N]> for DecodeParms {
    fn from(entries: [(K, i32); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// The type of a row of PNG-predicted data, stored in its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PngFilter {
    /// The row is stored as is.
    None = 0,
    /// Each byte is stored relative to the byte one pixel to the left.
    Sub = 1,
    /// Each byte is stored relative to the byte above.
    Up = 2,
    /// Each byte is stored relative to the mean of left and above.
    Average = 3,
    /// Each byte is stored relative to the Paeth predictor.
    Paeth = 4,
}

impl PngFilter {
    /// All row types, in tag order.
    pub const ALL: [Self; 5] = [Self::None, Self::Sub, Self::Up, Self::Average, Self::Paeth];

    /// The tag byte of the row type.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Look up the row type of a tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }
}

/// The value of the `Predictor` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predictor {
    /// 1: no prediction.
    No,
    /// 2: TIFF predictor 2, horizontal differencing.
    Tiff,
    /// 10: PNG, every row tagged `None`.
    PngNone,
    /// 11: PNG, every row tagged `Sub`.
    PngSub,
    /// 12: PNG, every row tagged `Up`.
    PngUp,
    /// 13: PNG, every row tagged `Average`.
    PngAverage,
    /// 14: PNG, every row tagged `Paeth`.
    PngPaeth,
    /// 15: PNG, row tags chosen per row.
    PngOptimum,
}

impl Predictor {
    /// Parse the integer value of a `Predictor` entry.
    pub fn from_value(value: i32) -> Result<Self> {
        Ok(match value {
            1 => Self::No,
            2 => Self::Tiff,
            10 => Self::PngNone,
            11 => Self::PngSub,
            12 => Self::PngUp,
            13 => Self::PngAverage,
            14 => Self::PngPaeth,
            15 => Self::PngOptimum,
            _ => bail!(ParameterError::UndefinedPredictor(value)),
        })
    }

    /// The integer value of the predictor.
    pub fn value(self) -> i32 {
        match self {
            Self::No => 1,
            Self::Tiff => 2,
            Self::PngNone => 10,
            Self::PngSub => 11,
            Self::PngUp => 12,
            Self::PngAverage => 13,
            Self::PngPaeth => 14,
            Self::PngOptimum => 15,
        }
    }

    /// Whether rows carry a PNG filter type tag.
    pub fn is_png(self) -> bool {
        self.value() >= 10
    }

    /// The row type an encoder uses for every row, if fixed.
    pub(crate) fn png_filter(self) -> Option<PngFilter> {
        match self {
            Self::PngNone => Some(PngFilter::None),
            Self::PngSub => Some(PngFilter::Sub),
            Self::PngUp => Some(PngFilter::Up),
            Self::PngAverage => Some(PngFilter::Average),
            Self::PngPaeth => Some(PngFilter::Paeth),
            _ => None,
        }
    }
}

/// The layout of the rows a predictor operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowGeometry {
    /// Number of interleaved color components per sample.
    pub colors: usize,
    /// Number of bits used to represent each color component.
    pub bits_per_component: usize,
    /// Number of samples per row.
    pub columns: usize,
}

impl Default for RowGeometry {
    fn default() -> Self {
        Self {
            colors: 1,
            bits_per_component: 8,
            columns: 1,
        }
    }
}

impl RowGeometry {
    /// Resolve and validate the geometry from a parameter map.
    pub fn from_parms(parms: Option<&DecodeParms>) -> Result<Self> {
        let Some(parms) = parms else {
            return Ok(Self::default());
        };

        let colors = parms.get(COLORS).unwrap_or(1);
        if colors <= 0 {
            bail!(ParameterError::InvalidColors(colors));
        }

        let bits_per_component = parms.get(BITS_PER_COMPONENT).unwrap_or(8);
        if !matches!(bits_per_component, 1 | 2 | 4 | 8 | 16) {
            bail!(ParameterError::InvalidBitsPerComponent(bits_per_component));
        }

        let columns = parms.get(COLUMNS).unwrap_or(1);
        if columns <= 0 {
            bail!(ParameterError::InvalidColumns(columns));
        }

        Ok(Self {
            colors: colors as usize,
            bits_per_component: bits_per_component as usize,
            columns: columns as usize,
        })
    }

    /// The number of bytes of a whole pixel, at least 1.
    pub fn bytes_per_pixel(&self) -> usize {
        (self.colors * self.bits_per_component).div_ceil(8).max(1)
    }

    /// The number of bytes of a row, excluding any PNG tag byte.
    pub fn row_length(&self) -> usize {
        self.columns * self.bytes_per_pixel()
    }
}
