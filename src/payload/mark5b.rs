//! Mark 5B sample tables and codecs, used for VDIF frames with EDV `0xab`.
//!
//! 1-bit data is a plain sign bit. 2-bit data stores each sample as a sign bit
//! followed by a magnitude bit. Sign 1 is positive; the magnitude bit selects
//! the outer level for positive samples and the inner level for negative ones,
//! so the all-zero pattern is the most negative level and the complement of a
//! pattern decodes to the negated level. Only 1 and 2 bits per sample are defined.
use std::sync::OnceLock;

use super::levels::{decode_lut, pack, quantize, LEVELS_1BIT, LEVELS_2BIT};

#[derive(Debug, Clone, PartialEq)]
pub struct Luts {
    pub lut1bit: [[f32; 8]; 256],
    pub lut2bit: [[f32; 4]; 256],
}

/// Map a 2-bit sign/magnitude pattern (sign in bit 0) to an index into
/// [LEVELS_2BIT].
#[inline]
fn level_index(pattern: u8) -> usize {
    let sign = pattern & 1;
    let mag = (pattern >> 1) & 1;
    (2 * sign + mag) as usize
}

/// Inverse of [level_index].
#[inline]
fn pattern(level_index: u8) -> u8 {
    let sign = (level_index >> 1) & 1;
    let mag = level_index & 1;
    sign | (mag << 1)
}

#[must_use]
pub fn init_luts() -> Luts {
    let mut lut1bit = [[0f32; 8]; 256];
    let mut lut2bit = [[0f32; 4]; 256];
    for b in 0..256usize {
        for (i, level) in lut1bit[b].iter_mut().enumerate() {
            *level = LEVELS_1BIT[(b >> i) & 1];
        }
        for (i, level) in lut2bit[b].iter_mut().enumerate() {
            *level = LEVELS_2BIT[level_index(((b >> (2 * i)) & 3) as u8)];
        }
    }
    Luts { lut1bit, lut2bit }
}

pub fn luts() -> &'static Luts {
    static LUTS: OnceLock<Luts> = OnceLock::new();
    LUTS.get_or_init(init_luts)
}

pub fn decode_1bit(bytes: &[u8]) -> Vec<f32> {
    decode_lut(bytes, &luts().lut1bit)
}

pub fn encode_1bit(values: &[f32]) -> Vec<u8> {
    pack(values, 1, |v| quantize(v, &LEVELS_1BIT))
}

pub fn decode_2bit(bytes: &[u8]) -> Vec<f32> {
    decode_lut(bytes, &luts().lut2bit)
}

pub fn encode_2bit(values: &[f32]) -> Vec<u8> {
    pack(values, 2, |v| pattern(quantize(v, &LEVELS_2BIT)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::levels::OPTIMAL_2BIT_HIGH;

    #[test]
    fn sign_magnitude_levels() {
        // (sign, magnitude) pairs: 00 -> -high, 01 -> -1, 10 -> +1, 11 -> +high
        let patterns = [0b00u8, 0b10, 0b01, 0b11];
        let expected = [-OPTIMAL_2BIT_HIGH, -1.0, 1.0, OPTIMAL_2BIT_HIGH];
        for (p, e) in patterns.iter().zip(expected) {
            assert_eq!(LEVELS_2BIT[level_index(*p)], e, "pattern {p:#04b}");
        }
    }

    #[test]
    fn pattern_inverts_level_index() {
        for idx in 0..4u8 {
            assert_eq!(level_index(pattern(idx)), idx as usize);
        }
    }

    #[test]
    fn differs_from_vdif_layout() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_ne!(decode_2bit(&bytes), crate::payload::vdif::decode_2bit(&bytes));
        assert_eq!(decode_1bit(&bytes), crate::payload::vdif::decode_1bit(&bytes));
    }

    #[test]
    fn every_byte_survives_decode_encode() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(encode_1bit(&decode_1bit(&bytes)), bytes);
        assert_eq!(encode_2bit(&decode_2bit(&bytes)), bytes);
    }

    #[test]
    fn known_bytes() {
        let luts = luts();
        assert_eq!(luts.lut2bit[0x00], [-OPTIMAL_2BIT_HIGH; 4]);
        assert_eq!(luts.lut2bit[0xff], [OPTIMAL_2BIT_HIGH; 4]);
        assert_eq!(luts.lut2bit[0xaa], [-1.0; 4]);
        assert_eq!(luts.lut2bit[0x55], [1.0; 4]);
        // sample 0 in bits 0-1, sample 3 in bits 6-7
        assert_eq!(
            luts.lut2bit[0b11_01_10_00],
            [-OPTIMAL_2BIT_HIGH, -1.0, 1.0, OPTIMAL_2BIT_HIGH]
        );
    }

    #[test]
    fn complement_negates() {
        let luts = luts();
        for b in 0..256usize {
            for i in 0..4 {
                assert_eq!(luts.lut2bit[b][i], -luts.lut2bit[255 - b][i], "byte {b:#04x}");
            }
            for i in 0..8 {
                assert_eq!(luts.lut1bit[b][i], -luts.lut1bit[255 - b][i], "byte {b:#04x}");
            }
        }
    }

    #[test]
    fn flipping_sign_bits_changes_sign() {
        let luts = luts();
        for b in 0..256usize {
            let flipped = b ^ 0b0101_0101;
            for i in 0..4 {
                assert_eq!(
                    luts.lut2bit[b][i].signum(),
                    -luts.lut2bit[flipped][i].signum()
                );
            }
        }
    }
}
