//! Chains of filters, as given by the `Filter` array of a stream.

use crate::Filter;
use crate::error::Result;
use crate::params::DecodeParms;
use smallvec::SmallVec;

/// One stage of a filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEntry {
    /// The filter of the stage.
    pub filter: Filter,
    /// The decode parameters of the stage.
    pub parms: Option<DecodeParms>,
}

impl PipelineEntry {
    /// Create a new stage.
    pub fn new(filter: Filter, parms: Option<DecodeParms>) -> Self {
        Self { filter, parms }
    }

    /// Create a new stage from a filter name.
    pub fn from_name(name: &str, parms: Option<DecodeParms>) -> Result<Self> {
        Ok(Self::new(Filter::from_name(name)?, parms))
    }
}

impl From<Filter> for PipelineEntry {
    fn from(filter: Filter) -> Self {
        Self::new(filter, None)
    }
}

/// The result of decoding a filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// The decoded data.
    ///
    /// If `image_filter` is set, this is still encoded with that filter (and
    /// all stages after it).
    pub data: Vec<u8>,
    /// The image filter at which decoding stopped, if any.
    pub image_filter: Option<PipelineEntry>,
}

impl FilterResult {
    fn from_data(data: Vec<u8>) -> Self {
        Self {
            data,
            image_filter: None,
        }
    }
}

/// An ordered chain of filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    entries: SmallVec<[PipelineEntry; 2]>,
}

impl Pipeline {
    /// Create an empty chain, which leaves data as is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn push(&mut self, entry: impl Into<PipelineEntry>) {
        self.entries.push(entry.into());
    }

    /// Return the chain with a stage appended.
    pub fn with(mut self, filter: Filter, parms: Option<DecodeParms>) -> Self {
        self.push(PipelineEntry::new(filter, parms));
        self
    }

    /// The stages, in the order they are decoded.
    pub fn entries(&self) -> &[PipelineEntry] {
        &self.entries
    }

    /// See [`decode_pipeline`].
    pub fn decode(&self, data: &[u8]) -> Result<FilterResult> {
        decode_pipeline(&self.entries, data)
    }

    /// See [`decode_pipeline_length`].
    pub fn decode_length(&self, data: &[u8], max_len: i64) -> Result<FilterResult> {
        decode_pipeline_length(&self.entries, data, max_len)
    }

    /// See [`encode_pipeline`].
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        encode_pipeline(&self.entries, data)
    }
}

impl<T: Into<PipelineEntry>> FromIterator<T> for Pipeline {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decode data with a chain of filters, in the listed order.
///
/// Decoding stops at the first image filter (see [`Filter::is_native`]). Its
/// stage is reported in the result together with the still encoded data, so
/// that it can be handed to an image decoder.
pub fn decode_pipeline(entries: &[PipelineEntry], data: &[u8]) -> Result<FilterResult> {
    decode_pipeline_length(entries, data, -1)
}

/// Decode only the start of data with a chain of filters.
///
/// All stages but the last one are decoded completely. The last stage is
/// decoded as with [`Codec::decode_length`](crate::Codec::decode_length).
/// If the chain contains an image filter, the data before it is decoded
/// completely.
pub fn decode_pipeline_length(
    entries: &[PipelineEntry],
    data: &[u8],
    max_len: i64,
) -> Result<FilterResult> {
    let mut data = data.to_vec();

    for (i, entry) in entries.iter().enumerate() {
        if !entry.filter.is_native() {
            ldebug!(
                "stopping at image filter {}, {} stages left",
                entry.filter,
                entries.len() - i
            );

            return Ok(FilterResult {
                data,
                image_filter: Some(entry.clone()),
            });
        }

        let codec = entry.filter.codec(entry.parms.clone())?;
        let is_last = i + 1 == entries.len();

        ltrace!("decoding stage {} ({}), {} bytes", i, entry.filter, data.len());

        data = if is_last {
            codec.decode_length(&data, max_len)?
        } else {
            codec.decode(&data)?
        };
    }

    Ok(FilterResult::from_data(data))
}

/// Encode data with a chain of filters, such that [`decode_pipeline`] with the
/// same chain restores it.
///
/// The encoders run in reverse order. Image filters cannot be encoded.
pub fn encode_pipeline(entries: &[PipelineEntry], data: &[u8]) -> Result<Vec<u8>> {
    let mut data = data.to_vec();

    for entry in entries.iter().rev() {
        let codec = entry.filter.codec(entry.parms.clone())?;
        ltrace!("encoding stage {}, {} bytes", entry.filter, data.len());
        data = codec.encode(&data)?;
    }

    Ok(data)
}
