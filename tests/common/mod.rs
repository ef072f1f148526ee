#![allow(dead_code)]
use std::io::{Read, Write};

use baseband::{FormatVariant, FrameHeader, PayloadHeader, Result};
use rand::Rng;

/// Minimal fixed-size frame header used to build test streams.
#[derive(Debug, Clone, PartialEq)]
pub struct TestHeader {
    pub frame_nr: u32,
    pub seconds: u32,
    pub bps: u8,
    pub nchan: u8,
    pub complex: bool,
    pub edv: u8,
    pub payload_size: u32,
}

impl TestHeader {
    pub const LEN: usize = 16;

    pub fn write(&self, w: &mut impl Write) -> std::io::Result<()> {
        w.write_all(&self.frame_nr.to_le_bytes())?;
        w.write_all(&self.seconds.to_le_bytes())?;
        w.write_all(&[self.bps, self.nchan, u8::from(self.complex), self.edv])?;
        w.write_all(&self.payload_size.to_le_bytes())
    }

    pub fn read(r: &mut impl Read) -> Result<Self> {
        let mut buf = [0u8; Self::LEN];
        r.read_exact(&mut buf)?;
        let word = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
        Ok(TestHeader {
            frame_nr: word(0),
            seconds: word(4),
            bps: buf[8],
            nchan: buf[9],
            complex: buf[10] == 1,
            edv: buf[11],
            payload_size: word(12),
        })
    }
}

impl PayloadHeader for TestHeader {
    fn bits_per_sample(&self) -> u32 {
        u32::from(self.bps)
    }
    fn channel_count(&self) -> usize {
        usize::from(self.nchan)
    }
    fn complex(&self) -> bool {
        self.complex
    }
    fn payload_size(&self) -> usize {
        self.payload_size as usize
    }
    fn format_variant(&self) -> FormatVariant {
        FormatVariant::from_edv(self.edv)
    }
}

impl FrameHeader for TestHeader {
    fn frame_number(&self) -> u64 {
        u64::from(self.frame_nr)
    }
    fn seconds(&self) -> i64 {
        i64::from(self.seconds)
    }
    fn payload_size(&self) -> usize {
        self.payload_size as usize
    }
}

/// `n` values drawn uniformly from `levels`.
pub fn random_levels(levels: &[f32], n: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| levels[rng.gen_range(0..levels.len())]).collect()
}
