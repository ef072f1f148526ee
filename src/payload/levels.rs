//! Sample levels and quantization shared by the payload codecs.
//!
//! All formats use offset-binary codes: the all-zero pattern is the most negative
//! level and the all-one pattern the most positive. Every level set is symmetric
//! about zero, so the bitwise complement of a code decodes to the negated level.
/// Optimal high level for a 2-bit Gaussian signal with thresholds at ~1 sigma.
pub const OPTIMAL_2BIT_HIGH: f32 = 3.316_505;

/// Decode levels for 1-bit samples, indexed by code.
pub const LEVELS_1BIT: [f32; 2] = [-1.0, 1.0];

/// Decode levels for 2-bit samples, indexed by code.
pub const LEVELS_2BIT: [f32; 4] = [-OPTIMAL_2BIT_HIGH, -1.0, 1.0, OPTIMAL_2BIT_HIGH];

/// Decode levels for 4-bit samples, indexed by code.
#[rustfmt::skip]
pub const LEVELS_4BIT: [f32; 16] = [
    -7.5, -6.5, -5.5, -4.5, -3.5, -2.5, -1.5, -0.5,
     0.5,  1.5,  2.5,  3.5,  4.5,  5.5,  6.5,  7.5,
];

/// Offset applied to 8-bit codes, which are decoded arithmetically.
pub const OFFSET_8BIT: f32 = 127.5;

/// Decoded level for an 8-bit code.
#[inline]
#[must_use]
pub fn decode_8bit(code: u8) -> f32 {
    f32::from(code) - OFFSET_8BIT
}

/// Nearest 8-bit code for `value`; ties go up and out-of-range values saturate.
#[inline]
#[must_use]
pub fn encode_8bit(value: f32) -> u8 {
    // `as` saturates and maps NaN to zero
    (value + OFFSET_8BIT + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Nearest code in `levels` for `value`.
///
/// `levels` must be sorted ascending. A value exactly between two levels goes to
/// the higher one, values beyond either end saturate, and NaN maps to code 0.
#[inline]
#[must_use]
pub fn quantize(value: f32, levels: &[f32]) -> u8 {
    let mut code = 0u8;
    for pair in levels.windows(2) {
        if value >= (pair[0] + pair[1]) * 0.5 {
            code += 1;
        } else {
            break;
        }
    }
    code
}

/// Expand every byte into its `K` levels using a 256 entry lookup table.
pub(crate) fn decode_lut<const K: usize>(bytes: &[u8], lut: &[[f32; K]; 256]) -> Vec<f32> {
    let mut out = vec![0f32; bytes.len() * K];
    for (levels, b) in out.chunks_exact_mut(K).zip(bytes) {
        levels.copy_from_slice(&lut[*b as usize]);
    }
    out
}

/// Pack `8 / bits` codes per byte, first code in the least significant bits.
///
/// A trailing partial group is padded with code 0.
pub(crate) fn pack(values: &[f32], bits: u32, encode: impl Fn(f32) -> u8) -> Vec<u8> {
    let per_byte = (8 / bits) as usize;
    values
        .chunks(per_byte)
        .map(|group| {
            group
                .iter()
                .enumerate()
                .fold(0u8, |b, (i, v)| b | (encode(*v) << (i as u32 * bits)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_symmetric() {
        for levels in [&LEVELS_1BIT[..], &LEVELS_2BIT[..], &LEVELS_4BIT[..]] {
            let n = levels.len();
            for (code, level) in levels.iter().enumerate() {
                assert_eq!(*level, -levels[n - 1 - code], "code {code} of {levels:?}");
            }
        }
        for code in 0..=255u8 {
            assert_eq!(decode_8bit(code), -decode_8bit(!code));
        }
    }

    #[test]
    fn wide_levels_are_unscaled_codes() {
        // unit spacing centred on zero, not normalised to the signal sigma
        for (code, level) in LEVELS_4BIT.iter().enumerate() {
            assert_eq!(*level, code as f32 - 7.5);
        }
        assert_eq!(decode_8bit(0), -127.5);
        assert_eq!(decode_8bit(128), 0.5);
        assert_eq!(decode_8bit(255), 127.5);
    }

    #[test]
    fn quantize_picks_nearest_level() {
        assert_eq!(quantize(-0.2, &LEVELS_1BIT), 0);
        assert_eq!(quantize(0.0, &LEVELS_1BIT), 1);
        assert_eq!(quantize(-2.0, &LEVELS_2BIT), 1);
        assert_eq!(quantize(-2.5, &LEVELS_2BIT), 0);
        assert_eq!(quantize(0.3, &LEVELS_2BIT), 2);
        assert_eq!(quantize(2.5, &LEVELS_2BIT), 3);
        assert_eq!(quantize(0.4, &LEVELS_4BIT), 8);
        assert_eq!(quantize(-7.4, &LEVELS_4BIT), 0);
    }

    #[test]
    fn quantize_ties_round_up() {
        assert_eq!(quantize(0.0, &LEVELS_2BIT), 2);
        assert_eq!(quantize(0.0, &LEVELS_4BIT), 8);
        assert_eq!(quantize(-7.0, &LEVELS_4BIT), 1);
        assert_eq!(encode_8bit(0.0), 128);
    }

    #[test]
    fn quantize_saturates() {
        assert_eq!(quantize(1e9, &LEVELS_2BIT), 3);
        assert_eq!(quantize(-1e9, &LEVELS_2BIT), 0);
        assert_eq!(quantize(f32::INFINITY, &LEVELS_4BIT), 15);
        assert_eq!(quantize(f32::NAN, &LEVELS_4BIT), 0);
        assert_eq!(encode_8bit(1000.0), 255);
        assert_eq!(encode_8bit(-1000.0), 0);
        assert_eq!(encode_8bit(f32::NAN), 0);
    }

    #[test]
    fn decode_lut_keeps_byte_order() {
        let mut lut = [[0f32; 2]; 256];
        for (b, entry) in lut.iter_mut().enumerate() {
            *entry = [b as f32, -(b as f32)];
        }
        // larger than a typical VDIF payload
        let bytes: Vec<u8> = (0..20_000).map(|i| (i % 251) as u8).collect();
        let zult = decode_lut(&bytes, &lut);
        assert_eq!(zult.len(), bytes.len() * 2);
        for (levels, b) in zult.chunks_exact(2).zip(&bytes) {
            assert_eq!(levels, &lut[*b as usize]);
        }
        assert!(decode_lut(&[], &lut).is_empty());
    }

    #[test]
    fn encode_8bit_inverts_decode() {
        for code in 0..=255u8 {
            assert_eq!(encode_8bit(decode_8bit(code)), code);
        }
    }
}
