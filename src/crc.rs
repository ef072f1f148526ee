//! Cyclic Redundancy Check for bit streams.
//!
//! Reference: <https://en.wikipedia.org/wiki/Cyclic_redundancy_check>
//!
//! A stream is a sequence of [Track] elements, each element holding one bit of
//! every track. A single stream uses `bool` elements; parallel streams, e.g., the
//! 64 tracks of a Mark 4 header, use unsigned integer words where bit `k` of
//! every word belongs to track `k`. All tracks are divided by the same polynomial
//! at once.
use std::ops::BitXor;

use crate::prelude::*;

/// Element of a bit stream holding one bit for each of its tracks.
pub trait Track: Copy + BitXor<Output = Self> + PartialEq {
    const ZERO: Self;
}

impl Track for bool {
    const ZERO: Self = false;
}

macro_rules! impl_track {
    ($($t:ty),*) => {
        $(impl Track for $t {
            const ZERO: Self = 0;
        })*
    };
}

impl_track!(u8, u16, u32, u64, u128);

/// CRC engine for a fixed binary polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crc {
    polynomial: u64,
    /// Polynomial coefficients, highest power first.
    coefficients: Vec<bool>,
}

impl Crc {
    /// Mark 4 header CRC, x^12 + x^11 + x^3 + x^2 + x + 1.
    pub const MARK4: u64 = 0x180f;
    /// CRC-16 used by Mark 5B and VDIF/Mark 5B headers, x^16 + x^15 + x^2 + 1.
    pub const CRC16: u64 = 0x18005;

    /// Create an engine for the binary encoded divisor `polynomial`.
    ///
    /// # Errors
    /// [Error::InvalidPolynomial] if `polynomial` is zero.
    pub fn new(polynomial: u64) -> Result<Self> {
        if polynomial == 0 {
            return Err(Error::InvalidPolynomial);
        }
        let len = 64 - polynomial.leading_zeros();
        let coefficients = (0..len).rev().map(|k| (polynomial >> k) & 1 == 1).collect();
        Ok(Crc {
            polynomial,
            coefficients,
        })
    }

    #[must_use]
    pub fn polynomial(&self) -> u64 {
        self.polynomial
    }

    /// Degree of the polynomial, which is the number of CRC elements.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Calculate the CRC for `stream`.
    ///
    /// The result has [Crc::degree] elements of the same type as the stream, such
    /// that appending it to `stream` gives a stream that passes [Crc::check].
    #[must_use]
    pub fn compute<T: Track>(&self, stream: &[T]) -> Vec<T> {
        let mut buf = Vec::with_capacity(stream.len() + self.degree());
        buf.extend_from_slice(stream);
        buf.resize(stream.len() + self.degree(), T::ZERO);
        self.divide(buf)
    }

    /// Check that the CRC at the end of `stream` is correct, i.e., that the
    /// remainder of the whole stream is zero for every track.
    #[must_use]
    pub fn check<T: Track>(&self, stream: &[T]) -> bool {
        self.divide(stream.to_vec()).iter().all(|x| *x == T::ZERO)
    }

    /// Polynomial long division of `buf` in place, returning the remainder.
    fn divide<T: Track>(&self, mut buf: Vec<T>) -> Vec<T> {
        let degree = self.degree();
        for i in 0..buf.len().saturating_sub(degree) {
            let lead = buf[i];
            if lead == T::ZERO {
                continue;
            }
            for (x, c) in buf[i..=i + degree].iter_mut().zip(&self.coefficients) {
                if *c {
                    *x = *x ^ lead;
                }
            }
        }
        let start = buf.len().saturating_sub(degree);
        buf.split_off(start)
    }
}
