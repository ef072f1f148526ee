//! VDIF payload decoding and encoding.
//!
//! A [Payload] owns the raw little-endian 32-bit words of a frame payload together
//! with the [PayloadLayout] needed to interpret them. Decoding produces a fresh
//! [Samples] array indexed `[sample, channel]`; encoding quantizes such an array
//! back into words.
//!
//! # Example
//! ```
//! use baseband::payload::{Payload, PayloadLayout, Samples};
//! use ndarray::Array2;
//!
//! let layout = PayloadLayout::builder().bits_per_sample(2).channel_count(4).build();
//! let payload = Payload::new(vec![0xe4e4_e4e4; 2], layout).unwrap();
//!
//! let samples = payload.decode().unwrap();
//! assert_eq!(samples.shape(), (8, 4));
//!
//! let encoded = Payload::encode(&samples, &layout).unwrap();
//! assert_eq!(encoded, payload);
//! ```
pub mod levels;
pub mod mark5b;
mod registry;
pub mod vdif;

use std::io::{Read, Write};

use ndarray::Array2;
use num_complex::Complex32;
use serde::{Deserialize, Serialize};
use tracing::trace;
use typed_builder::TypedBuilder;

use crate::prelude::*;
pub use registry::{CodecRegistry, DecodeFn, EncodeFn, FormatVariant, SampleCodec};

/// Size of a payload word in bytes.
pub const WORD_SIZE: usize = 4;

/// Parameters needed to interpret payload words.
#[derive(TypedBuilder, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLayout {
    /// Bits per sample, or per real and imaginary component for complex data.
    #[builder(default = 2)]
    pub bits_per_sample: u32,
    #[builder(default = 1)]
    pub channel_count: usize,
    #[builder(default = false)]
    pub complex: bool,
    #[builder(default)]
    #[serde(default)]
    pub variant: FormatVariant,
}

impl Default for PayloadLayout {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PayloadLayout {
    /// Number of bits occupied by one complete sample, i.e., all channels and
    /// components, or `None` if that does not fit in a `usize`.
    #[must_use]
    pub fn sample_bits(&self) -> Option<usize> {
        let components = if self.complex { 2 } else { 1 };
        usize::try_from(self.bits_per_sample)
            .ok()?
            .checked_mul(self.channel_count)?
            .checked_mul(components)
    }

    /// Number of complete samples in `byte_size` bytes.
    ///
    /// # Errors
    /// [Error::PayloadSize] if the bytes do not hold a whole number of samples. The
    /// error unit is 0 when the layout has no usable sample size.
    pub fn samples_in(&self, byte_size: usize) -> Result<usize> {
        let bits = byte_size.saturating_mul(8);
        match self.sample_bits() {
            Some(unit) if unit > 0 && bits % unit == 0 => Ok(bits / unit),
            unit => Err(Error::PayloadSize {
                bits,
                unit: unit.unwrap_or(0),
            }),
        }
    }

    /// Resolve the decoder/encoder pair for this layout.
    ///
    /// # Errors
    /// [Error::IncompatibleFormat] for complex data with a variant that cannot hold
    /// it, or [Error::UnsupportedDepth] if `registry` has no codec for the layout.
    pub fn codec(&self, registry: &CodecRegistry) -> Result<SampleCodec> {
        if self.complex && !self.variant.supports_complex() {
            return Err(Error::IncompatibleFormat(format!(
                "{:?} payload cannot be complex",
                self.variant
            )));
        }
        registry.get(self.variant, self.bits_per_sample)
    }
}

/// Header information needed to read or build a payload.
pub trait PayloadHeader {
    fn bits_per_sample(&self) -> u32;
    fn channel_count(&self) -> usize;
    fn complex(&self) -> bool;
    /// Payload size in bytes.
    fn payload_size(&self) -> usize;

    /// Bit layout of the payload. VDIF headers should return
    /// `FormatVariant::from_edv(edv)`.
    fn format_variant(&self) -> FormatVariant {
        FormatVariant::Vdif
    }

    fn layout(&self) -> PayloadLayout {
        PayloadLayout {
            bits_per_sample: self.bits_per_sample(),
            channel_count: self.channel_count(),
            complex: self.complex(),
            variant: self.format_variant(),
        }
    }
}

/// Decoded samples indexed `[sample, channel]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Real(Array2<f32>),
    Complex(Array2<Complex32>),
}

impl Samples {
    #[must_use]
    pub fn is_complex(&self) -> bool {
        matches!(self, Samples::Complex(_))
    }

    /// Number of samples and channels.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Samples::Real(a) => a.dim(),
            Samples::Complex(a) => a.dim(),
        }
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.shape().1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shape().0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_real(&self) -> Option<&Array2<f32>> {
        match self {
            Samples::Real(a) => Some(a),
            Samples::Complex(_) => None,
        }
    }

    #[must_use]
    pub fn as_complex(&self) -> Option<&Array2<Complex32>> {
        match self {
            Samples::Complex(a) => Some(a),
            Samples::Real(_) => None,
        }
    }

    /// Values in payload order: channel fastest, real before imaginary.
    fn to_levels(&self) -> Vec<f32> {
        match self {
            Samples::Real(a) => a.iter().copied().collect(),
            Samples::Complex(a) => a.iter().flat_map(|c| [c.re, c.im]).collect(),
        }
    }

    fn from_levels(levels: Vec<f32>, layout: &PayloadLayout) -> Result<Self> {
        let channels = layout.channel_count;
        let bits = levels.len() * layout.bits_per_sample as usize;
        let unit = layout.sample_bits().unwrap_or(0);
        let bad_shape = |_| Error::PayloadSize { bits, unit };
        if layout.complex {
            let values: Vec<Complex32> = levels
                .chunks_exact(2)
                .map(|c| Complex32::new(c[0], c[1]))
                .collect();
            let rows = values.len() / channels.max(1);
            Ok(Samples::Complex(
                Array2::from_shape_vec((rows, channels), values).map_err(bad_shape)?,
            ))
        } else {
            let rows = levels.len() / channels.max(1);
            Ok(Samples::Real(
                Array2::from_shape_vec((rows, channels), levels).map_err(bad_shape)?,
            ))
        }
    }
}

impl From<Array2<f32>> for Samples {
    fn from(a: Array2<f32>) -> Self {
        Samples::Real(a)
    }
}

impl From<Array2<Complex32>> for Samples {
    fn from(a: Array2<Complex32>) -> Self {
        Samples::Complex(a)
    }
}

/// Decode packed payload bytes using the default codecs.
///
/// # Errors
/// [Error::PayloadSize] if `bytes` is not a whole number of samples,
/// [Error::UnsupportedDepth] or [Error::IncompatibleFormat] if the layout cannot
/// be decoded.
pub fn decode(bytes: &[u8], layout: &PayloadLayout) -> Result<Samples> {
    decode_with_registry(bytes, layout, CodecRegistry::global())
}

/// Like [decode] but resolving the codec from `registry`.
///
/// # Errors
/// See [decode].
pub fn decode_with_registry(
    bytes: &[u8],
    layout: &PayloadLayout,
    registry: &CodecRegistry,
) -> Result<Samples> {
    let codec = layout.codec(registry)?;
    decode_with(bytes, layout, codec)
}

fn decode_with(bytes: &[u8], layout: &PayloadLayout, codec: SampleCodec) -> Result<Samples> {
    layout.samples_in(bytes.len())?;
    Samples::from_levels((codec.decode)(bytes), layout)
}

/// Raw payload words and the layout needed to interpret them.
#[derive(Debug, Clone)]
pub struct Payload {
    words: Vec<u32>,
    layout: PayloadLayout,
    codec: SampleCodec,
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.layout == other.layout && self.words == other.words
    }
}

impl Payload {
    /// Create a payload from little-endian words using the default codecs.
    ///
    /// # Errors
    /// [Error::UnsupportedDepth] or [Error::IncompatibleFormat] if the layout has no
    /// codec, [Error::PayloadSize] if the words are not a whole number of samples.
    pub fn new(words: Vec<u32>, layout: PayloadLayout) -> Result<Self> {
        Self::with_registry(words, layout, CodecRegistry::global())
    }

    /// Like [Payload::new] but resolving the codec from `registry`.
    ///
    /// # Errors
    /// See [Payload::new].
    pub fn with_registry(
        words: Vec<u32>,
        layout: PayloadLayout,
        registry: &CodecRegistry,
    ) -> Result<Self> {
        let codec = layout.codec(registry)?;
        let samples = layout.samples_in(words.len() * WORD_SIZE)?;
        trace!(
            words = words.len(),
            samples,
            bits_per_sample = layout.bits_per_sample,
            channels = layout.channel_count,
            complex = layout.complex,
            variant = ?layout.variant,
            "payload"
        );
        Ok(Payload {
            words,
            layout,
            codec,
        })
    }

    /// Create a payload whose layout comes from `header`.
    ///
    /// # Errors
    /// [Error::DescriptorMismatch] if the words do not have the header's payload
    /// size, otherwise as [Payload::new].
    pub fn from_header(words: Vec<u32>, header: &dyn PayloadHeader) -> Result<Self> {
        Self::from_header_with_registry(words, header, CodecRegistry::global())
    }

    /// Like [Payload::from_header] but resolving the codec from `registry`.
    ///
    /// # Errors
    /// See [Payload::from_header].
    pub fn from_header_with_registry(
        words: Vec<u32>,
        header: &dyn PayloadHeader,
        registry: &CodecRegistry,
    ) -> Result<Self> {
        let size = words.len() * WORD_SIZE;
        if size != header.payload_size() {
            return Err(Error::DescriptorMismatch(format!(
                "header is for {} payload bytes but words hold {size}",
                header.payload_size()
            )));
        }
        Self::with_registry(words, header.layout(), registry)
    }

    /// Read a payload of the size given by `header` from `reader`.
    ///
    /// # Errors
    /// [Error::TruncatedPayload] if fewer bytes than the payload size are available,
    /// [Error::Io] on read failures, otherwise as [Payload::from_header].
    pub fn from_reader<R: Read>(reader: &mut R, header: &dyn PayloadHeader) -> Result<Self> {
        Self::from_reader_with_registry(reader, header, CodecRegistry::global())
    }

    /// Like [Payload::from_reader] but resolving the codec from `registry`.
    ///
    /// # Errors
    /// See [Payload::from_reader].
    pub fn from_reader_with_registry<R: Read>(
        reader: &mut R,
        header: &dyn PayloadHeader,
        registry: &CodecRegistry,
    ) -> Result<Self> {
        let expected = header.payload_size();
        let mut buf = Vec::with_capacity(expected);
        reader.take(expected as u64).read_to_end(&mut buf)?;
        if buf.len() < expected {
            return Err(Error::TruncatedPayload {
                expected,
                actual: buf.len(),
            });
        }
        if expected % WORD_SIZE != 0 {
            return Err(Error::PayloadSize {
                bits: expected * 8,
                unit: WORD_SIZE * 8,
            });
        }
        Self::from_header_with_registry(words_from_bytes(&buf), header, registry)
    }

    /// Encode `samples` using the default codecs.
    ///
    /// # Errors
    /// [Error::ComplexityMismatch] or [Error::ChannelMismatch] if `layout` does not
    /// describe `samples`, [Error::PayloadSize] if the samples do not fill a whole
    /// number of words, [Error::UnsupportedDepth] or [Error::IncompatibleFormat] if
    /// the layout has no codec.
    pub fn encode(samples: &Samples, layout: &PayloadLayout) -> Result<Self> {
        Self::encode_with_registry(samples, layout, CodecRegistry::global())
    }

    /// Like [Payload::encode] but resolving the codec from `registry`.
    ///
    /// # Errors
    /// See [Payload::encode].
    pub fn encode_with_registry(
        samples: &Samples,
        layout: &PayloadLayout,
        registry: &CodecRegistry,
    ) -> Result<Self> {
        if samples.is_complex() != layout.complex {
            return Err(Error::ComplexityMismatch {
                expected: layout.complex,
                actual: samples.is_complex(),
            });
        }
        if samples.channel_count() != layout.channel_count {
            return Err(Error::ChannelMismatch {
                expected: layout.channel_count,
                actual: samples.channel_count(),
            });
        }
        let codec = layout.codec(registry)?;
        let unit = WORD_SIZE * 8;
        match layout.sample_bits().and_then(|b| b.checked_mul(samples.len())) {
            Some(bits) if bits % unit == 0 => {}
            bits => {
                return Err(Error::PayloadSize {
                    bits: bits.unwrap_or(usize::MAX),
                    unit,
                });
            }
        }
        let bytes = (codec.encode)(&samples.to_levels());
        Self::with_registry(words_from_bytes(&bytes), *layout, registry)
    }

    /// Encode `samples`, taking the layout from `header` when given.
    ///
    /// Without a header the channel count and complexity come from `samples` and
    /// the encoding from `bits_per_sample` and `variant`.
    ///
    /// # Errors
    /// [Error::DescriptorMismatch] if `header` disagrees with `samples` in channel
    /// count, complexity or resulting payload size, otherwise as [Payload::encode].
    pub fn from_samples(
        samples: &Samples,
        header: Option<&dyn PayloadHeader>,
        bits_per_sample: u32,
        variant: FormatVariant,
    ) -> Result<Self> {
        Self::from_samples_with_registry(
            samples,
            header,
            bits_per_sample,
            variant,
            CodecRegistry::global(),
        )
    }

    /// Like [Payload::from_samples] but resolving the codec from `registry`.
    ///
    /// # Errors
    /// See [Payload::from_samples].
    pub fn from_samples_with_registry(
        samples: &Samples,
        header: Option<&dyn PayloadHeader>,
        bits_per_sample: u32,
        variant: FormatVariant,
        registry: &CodecRegistry,
    ) -> Result<Self> {
        let (channel_count, complex) = (samples.channel_count(), samples.is_complex());
        let layout = match header {
            Some(header) => {
                if header.channel_count() != channel_count {
                    return Err(Error::DescriptorMismatch(format!(
                        "header is for {} channels but data has {channel_count}",
                        header.channel_count()
                    )));
                }
                if header.complex() != complex {
                    return Err(Error::DescriptorMismatch(format!(
                        "header is for {} data but data is {}",
                        kind(header.complex()),
                        kind(complex)
                    )));
                }
                header.layout()
            }
            None => PayloadLayout {
                bits_per_sample,
                channel_count,
                complex,
                variant,
            },
        };
        let payload = Self::encode_with_registry(samples, &layout, registry)?;
        if let Some(header) = header {
            if payload.byte_size() != header.payload_size() {
                return Err(Error::DescriptorMismatch(format!(
                    "header is for {} payload bytes but data encodes to {}",
                    header.payload_size(),
                    payload.byte_size()
                )));
            }
        }
        Ok(payload)
    }

    /// Decode the words into a new sample array.
    ///
    /// # Errors
    /// [Error::PayloadSize] if the words are not a whole number of samples.
    pub fn decode(&self) -> Result<Samples> {
        decode_with(&self.to_bytes(), &self.layout, self.codec)
    }

    /// Write the words little-endian to `writer`.
    ///
    /// # Errors
    /// [Error::Io] if writing fails.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Payload bytes in stream order.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    #[must_use]
    pub fn into_words(self) -> Vec<u32> {
        self.words
    }

    #[must_use]
    pub fn layout(&self) -> &PayloadLayout {
        &self.layout
    }

    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.words.len() * WORD_SIZE
    }

    /// Number of complete samples, i.e., rows of the decoded array.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        // construction guarantees a whole number of samples
        self.layout.samples_in(self.byte_size()).unwrap_or(0)
    }

    /// Shape of the decoded array.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.sample_count(), self.layout.channel_count)
    }
}

fn kind(complex: bool) -> &'static str {
    if complex {
        "complex"
    } else {
        "real"
    }
}

fn words_from_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(WORD_SIZE)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect()
}
