use crate::payload::FormatVariant;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Payload bits are not a whole number of `unit`, the size of a sample when
    /// decoding or of a word when encoding.
    #[error("{bits} payload bits is not a multiple of {unit}")]
    PayloadSize { bits: usize, unit: usize },

    #[error("no {variant:?} codec registered for {bits_per_sample} bits per sample")]
    UnsupportedDepth {
        bits_per_sample: u32,
        variant: FormatVariant,
    },

    #[error("layout is for {expected} channels but samples have {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("layout has complex={expected} but samples have complex={actual}")]
    ComplexityMismatch { expected: bool, actual: bool },

    #[error("incompatible format: {0}")]
    IncompatibleFormat(String),

    #[error("could not read full payload: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("header does not describe data: {0}")]
    DescriptorMismatch(String),

    /// `index` is the flat index of the failing element for batch decodes.
    #[error("invalid BCD encoded value {value}={value:#x}")]
    InvalidBcd { value: u64, index: Option<usize> },

    #[error("first header has frame number {frame_number}, expected 0")]
    UnexpectedStart { frame_number: u64 },

    #[error("CRC polynomial must be non-zero")]
    InvalidPolynomial,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
