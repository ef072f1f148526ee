//! VDIF sample tables and codecs.
//!
//! Section 10 of the VDIF specification states samples are offset-binary, such
//! that all 0 bits is the lowest level and all 1 bits the highest. For 2-bit
//! sampling the order is therefore 00, 01, 10, 11. Within a byte the first sample
//! occupies the least significant bits.
use std::sync::OnceLock;

use super::levels::{
    decode_8bit as level_8bit, decode_lut, encode_8bit as code_8bit, pack, quantize,
    LEVELS_1BIT, LEVELS_2BIT, LEVELS_4BIT,
};

/// Levels as a function of input byte, for each table-based bit depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Luts {
    pub lut1bit: [[f32; 8]; 256],
    pub lut2bit: [[f32; 4]; 256],
    pub lut4bit: [[f32; 2]; 256],
}

fn build_lut<const K: usize>(bits: u32, levels: &[f32]) -> [[f32; K]; 256] {
    let mask = (1u32 << bits) - 1;
    let mut lut = [[0f32; K]; 256];
    for (b, entry) in lut.iter_mut().enumerate() {
        for (i, level) in entry.iter_mut().enumerate() {
            *level = levels[((b as u32 >> (i as u32 * bits)) & mask) as usize];
        }
    }
    lut
}

/// Build the lookup tables. Prefer [luts], which builds them only once.
#[must_use]
pub fn init_luts() -> Luts {
    Luts {
        lut1bit: build_lut(1, &LEVELS_1BIT),
        lut2bit: build_lut(2, &LEVELS_2BIT),
        lut4bit: build_lut(4, &LEVELS_4BIT),
    }
}

/// Process-wide lookup tables, built on first use.
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
    pack(values, 2, |v| quantize(v, &LEVELS_2BIT))
}

pub fn decode_4bit(bytes: &[u8]) -> Vec<f32> {
    decode_lut(bytes, &luts().lut4bit)
}

pub fn encode_4bit(values: &[f32]) -> Vec<u8> {
    pack(values, 4, |v| quantize(v, &LEVELS_4BIT))
}

pub fn decode_8bit(bytes: &[u8]) -> Vec<f32> {
    bytes.iter().map(|b| level_8bit(*b)).collect()
}

pub fn encode_8bit(values: &[f32]) -> Vec<u8> {
    values.iter().map(|v| code_8bit(*v)).collect()
}
