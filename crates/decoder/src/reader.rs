//! Fixed-offset little-endian field reader

use crate::error::{DecodeError, Result};

/// Reads named fields at absolute offsets
///
/// Every read is bounds-checked; nothing here can panic on short input.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    buf: &'a [u8],
}

impl<'a> FieldReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn bytes<const N: usize>(&self, offset: usize, field: &'static str) -> Result<[u8; N]> {
        offset
            .checked_add(N)
            .and_then(|end| self.buf.get(offset..end))
            .and_then(|slice| slice.try_into().ok())
            .ok_or(DecodeError::OutOfBounds {
                field,
                offset,
                len: self.buf.len(),
            })
    }

    #[inline]
    pub fn u8(&self, offset: usize, field: &'static str) -> Result<u8> {
        self.bytes::<1>(offset, field).map(|b| b[0])
    }

    #[inline]
    pub fn i8(&self, offset: usize, field: &'static str) -> Result<i8> {
        self.bytes::<1>(offset, field).map(i8::from_le_bytes)
    }

    #[inline]
    pub fn u16_le(&self, offset: usize, field: &'static str) -> Result<u16> {
        self.bytes::<2>(offset, field).map(u16::from_le_bytes)
    }

    #[inline]
    pub fn f32_le(&self, offset: usize, field: &'static str) -> Result<f32> {
        self.bytes::<4>(offset, field).map(f32::from_le_bytes)
    }

    /// `f32` that must be finite
    pub fn finite_f32(&self, offset: usize, field: &'static str) -> Result<f32> {
        let value = self.f32_le(offset, field)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DecodeError::InvalidValue {
                field,
                offset,
                reason: format!("non-finite float {value}"),
            })
        }
    }
}

/// Clamp a pedal input to [0, 1] and round to 2 decimals
pub(crate) fn pedal(value: f32) -> f32 {
    (value.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Round to 1 decimal
pub(crate) fn one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
