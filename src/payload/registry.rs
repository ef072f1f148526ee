use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::{mark5b, vdif};
use crate::prelude::*;

/// Decode packed bytes into a flat sequence of levels.
pub type DecodeFn = fn(&[u8]) -> Vec<f32>;
/// Encode a flat sequence of levels into packed bytes.
pub type EncodeFn = fn(&[f32]) -> Vec<u8>;

/// Bit layout used for packing samples.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVariant {
    #[default]
    Vdif,
    /// Mark 5B payload carried in VDIF frames.
    Mark5B,
}

impl FormatVariant {
    /// VDIF extended data version marking a Mark 5B payload.
    pub const MARK5B_EDV: u8 = 0xab;

    #[must_use]
    pub fn from_edv(edv: u8) -> Self {
        if edv == Self::MARK5B_EDV {
            FormatVariant::Mark5B
        } else {
            FormatVariant::Vdif
        }
    }

    /// Whether complex samples can be stored with this layout.
    #[must_use]
    pub fn supports_complex(&self) -> bool {
        matches!(self, FormatVariant::Vdif)
    }
}

/// A decoder/encoder pair for one bit depth.
#[derive(Debug, Clone, Copy)]
pub struct SampleCodec {
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

/// Codecs keyed by format variant and bits per sample.
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<(FormatVariant, u32), SampleCodec>,
}

impl CodecRegistry {
    /// Registry with the VDIF (1, 2, 4, 8 bit) and Mark 5B (1, 2 bit) codecs.
    #[must_use]
    pub fn with_defaults() -> Self {
        let defaults: [(FormatVariant, u32, DecodeFn, EncodeFn); 6] = [
            (FormatVariant::Vdif, 1, vdif::decode_1bit, vdif::encode_1bit),
            (FormatVariant::Vdif, 2, vdif::decode_2bit, vdif::encode_2bit),
            (FormatVariant::Vdif, 4, vdif::decode_4bit, vdif::encode_4bit),
            (FormatVariant::Vdif, 8, vdif::decode_8bit, vdif::encode_8bit),
            (FormatVariant::Mark5B, 1, mark5b::decode_1bit, mark5b::encode_1bit),
            (FormatVariant::Mark5B, 2, mark5b::decode_2bit, mark5b::encode_2bit),
        ];
        let mut registry = Self::default();
        for (variant, bits, decode, encode) in defaults {
            registry.register(variant, bits, SampleCodec { decode, encode });
        }
        registry
    }

    /// Shared default registry.
    pub fn global() -> &'static CodecRegistry {
        static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();
        REGISTRY.get_or_init(CodecRegistry::with_defaults)
    }

    /// Add or replace the codec for `bits_per_sample` under `variant`.
    ///
    /// Bit depths must divide 8 since codecs work on whole bytes.
    pub fn register(&mut self, variant: FormatVariant, bits_per_sample: u32, codec: SampleCodec) {
        self.codecs.insert((variant, bits_per_sample), codec);
    }

    /// # Errors
    /// [Error::UnsupportedDepth] if nothing is registered for the pair.
    pub fn get(&self, variant: FormatVariant, bits_per_sample: u32) -> Result<SampleCodec> {
        self.codecs
            .get(&(variant, bits_per_sample))
            .copied()
            .ok_or(Error::UnsupportedDepth {
                bits_per_sample,
                variant,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let registry = CodecRegistry::global();
        for bits in [1, 2, 4, 8] {
            registry.get(FormatVariant::Vdif, bits).unwrap();
        }
        for bits in [1, 2] {
            registry.get(FormatVariant::Mark5B, bits).unwrap();
        }
    }

    #[test]
    fn unsupported_depth() {
        let registry = CodecRegistry::global();
        for (variant, bits) in [
            (FormatVariant::Vdif, 3),
            (FormatVariant::Vdif, 16),
            (FormatVariant::Mark5B, 4),
            (FormatVariant::Mark5B, 8),
        ] {
            let zult = registry.get(variant, bits);
            assert!(
                matches!(zult, Err(Error::UnsupportedDepth { bits_per_sample, .. }) if bits_per_sample == bits),
                "expected unsupported depth for {variant:?} {bits}",
            );
        }
    }

    #[test]
    fn register_replaces_codec() {
        fn zeros(bytes: &[u8]) -> Vec<f32> {
            vec![0.0; bytes.len() * 4]
        }
        let mut registry = CodecRegistry::with_defaults();
        registry.register(
            FormatVariant::Vdif,
            2,
            SampleCodec {
                decode: zeros,
                encode: vdif::encode_2bit,
            },
        );
        let codec = registry.get(FormatVariant::Vdif, 2).unwrap();
        assert_eq!((codec.decode)(&[0xff]), vec![0.0; 4]);
    }

    #[test]
    fn from_edv() {
        assert_eq!(FormatVariant::from_edv(0xab), FormatVariant::Mark5B);
        assert_eq!(FormatVariant::from_edv(0), FormatVariant::Vdif);
        assert_eq!(FormatVariant::from_edv(3), FormatVariant::Vdif);
    }
}
