//! Binary coded decimal conversion.
//!
//! A BCD value stores one decimal digit in each 4-bit nibble, so that the hex
//! representation of the value reads as its decimal representation, e.g.,
//! `0x1234` encodes 1234. Scalars go through the [Bcd] trait; slices and
//! `ndarray` arrays have separate batch functions that report which element
//! failed.
use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::prelude::*;

/// Unsigned integers that can hold BCD values.
pub trait Bcd: Copy + Sized {
    /// Decode from BCD.
    ///
    /// # Errors
    /// [Error::InvalidBcd] if any nibble is greater than 9.
    fn bcd_decode(self) -> Result<Self>;

    /// Encode to BCD. Digits that do not fit in the type are dropped.
    #[must_use]
    fn bcd_encode(self) -> Self;
}

macro_rules! impl_bcd {
    ($($t:ty),*) => {
        $(impl Bcd for $t {
            fn bcd_decode(self) -> Result<Self> {
                let mut bcd = self;
                let mut factor: $t = 1;
                let mut result: $t = 0;
                while bcd > 0 {
                    let digit = bcd & 0xf;
                    if digit > 9 {
                        return Err(Error::InvalidBcd {
                            value: u64::from(self),
                            index: None,
                        });
                    }
                    result = result.wrapping_add(digit.wrapping_mul(factor));
                    factor = factor.wrapping_mul(10);
                    bcd >>= 4;
                }
                Ok(result)
            }

            fn bcd_encode(self) -> Self {
                let mut value = self;
                let mut shift = 0u32;
                let mut result: $t = 0;
                while value > 0 && shift < <$t>::BITS {
                    result |= (value % 10) << shift;
                    value /= 10;
                    shift += 4;
                }
                result
            }
        })*
    };
}

impl_bcd!(u8, u16, u32, u64);

/// Decode a single BCD value.
///
/// # Errors
/// [Error::InvalidBcd] if any nibble is greater than 9.
pub fn decode<T: Bcd>(value: T) -> Result<T> {
    value.bcd_decode()
}

/// Encode a single value as BCD.
#[must_use]
pub fn encode<T: Bcd>(value: T) -> T {
    value.bcd_encode()
}

fn with_index(err: Error, idx: usize) -> Error {
    match err {
        Error::InvalidBcd { value, .. } => Error::InvalidBcd {
            value,
            index: Some(idx),
        },
        err => err,
    }
}

/// Decode every element of `values`.
///
/// # Errors
/// [Error::InvalidBcd] for the first invalid element, with its index.
pub fn decode_batch<T: Bcd>(values: &[T]) -> Result<Vec<T>> {
    values
        .iter()
        .enumerate()
        .map(|(idx, v)| v.bcd_decode().map_err(|err| with_index(err, idx)))
        .collect()
}

#[must_use]
pub fn encode_batch<T: Bcd>(values: &[T]) -> Vec<T> {
    values.iter().map(|v| v.bcd_encode()).collect()
}

/// Decode every element of an array, preserving its shape.
///
/// # Errors
/// [Error::InvalidBcd] for the first invalid element in logical order, with its
/// flat index.
pub fn decode_array<T, S, D>(values: &ArrayBase<S, D>) -> Result<Array<T, D>>
where
    T: Bcd,
    S: Data<Elem = T>,
    D: Dimension,
{
    let decoded = decode_batch(&values.iter().copied().collect::<Vec<T>>())?;
    Ok(Array::from_shape_vec(values.raw_dim(), decoded)
        .expect("decoded element count to match input shape"))
}

/// Encode every element of an array, preserving its shape.
#[must_use]
pub fn encode_array<T, S, D>(values: &ArrayBase<S, D>) -> Array<T, D>
where
    T: Bcd,
    S: Data<Elem = T>,
    D: Dimension,
{
    values.map(|v| v.bcd_encode())
}
