//! Signed S31.32 fixed-point numbers.
//!
//! [`Fixed31_32`] stores a real number as a 64-bit 2's complement integer
//! with 32 fractional bits. It is the numeric type of every hardware curve
//! point and matrix coefficient.
//!
//! # Conversions
//!
//! | Constructor | Input | Meaning |
//! |-------------|-------|---------|
//! | [`Fixed31_32::from_int`] | `i32` | whole number |
//! | [`Fixed31_32::from_fraction`] | `i64 / i64` | rounded quotient |
//! | [`Fixed31_32::from_s3132`] | `u64` | sign-magnitude S31.32 (DRM CTM) |
//! | [`Fixed31_32::from_f64`] | `f64` | nearest representable value |

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Number of fractional bits.
pub const FRACTIONAL_BITS: u32 = 32;

const SIGN_BIT: u64 = 1 << 63;

/// A signed S31.32 fixed-point number (2's complement).
///
/// # Example
///
/// ```rust
/// use kms_math::Fixed31_32;
///
/// let half = Fixed31_32::from_fraction(1, 2);
/// assert_eq!(half.to_f64(), 0.5);
/// assert_eq!(Fixed31_32::from_int(3).raw(), 3 << 32);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed31_32 {
    value: i64,
}

impl Fixed31_32 {
    /// Zero.
    pub const ZERO: Self = Self { value: 0 };

    /// One.
    pub const ONE: Self = Self {
        value: 1 << FRACTIONAL_BITS,
    };

    /// Wraps a raw 2's complement S31.32 value.
    #[inline]
    pub const fn from_raw(value: i64) -> Self {
        Self { value }
    }

    /// Returns the raw 2's complement S31.32 value.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.value
    }

    /// Converts a whole number.
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Self {
            value: (v as i64) << FRACTIONAL_BITS,
        }
    }

    /// Converts `numerator / denominator`, rounding to nearest.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero.
    pub fn from_fraction(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "fixed-point fraction with zero denominator");

        let negative = (numerator < 0) != (denominator < 0);
        let n = numerator.unsigned_abs() as u128;
        let d = denominator.unsigned_abs() as u128;
        let magnitude = ((n << FRACTIONAL_BITS) + d / 2) / d;
        let magnitude = magnitude.min(i64::MAX as u128) as i64;

        Self {
            value: if negative { -magnitude } else { magnitude },
        }
    }

    /// Converts a sign-magnitude S31.32 value.
    ///
    /// Bit 63 carries the sign and bits 0..63 the magnitude. The result is
    /// the same number in 2's complement, so `-0.5` in sign-magnitude
    /// (`0x8000_0000_8000_0000`) becomes `-0.5` here, not a large positive
    /// number.
    ///
    /// ```rust
    /// use kms_math::Fixed31_32;
    ///
    /// let minus_half = Fixed31_32::from_s3132(0x8000_0000_8000_0000);
    /// assert_eq!(minus_half.to_f64(), -0.5);
    /// ```
    #[inline]
    pub const fn from_s3132(x: u64) -> Self {
        let magnitude = (x & !SIGN_BIT) as i64;
        Self {
            value: if x & SIGN_BIT != 0 { -magnitude } else { magnitude },
        }
    }

    /// Encodes as S31.32 sign-magnitude, the inverse of [`from_s3132`](Self::from_s3132).
    #[inline]
    pub const fn to_s3132(self) -> u64 {
        if self.value < 0 {
            self.value.unsigned_abs() | SIGN_BIT
        } else {
            self.value as u64
        }
    }

    /// Converts a float to the nearest representable value.
    #[inline]
    pub fn from_f64(v: f64) -> Self {
        Self {
            value: (v * (1u64 << FRACTIONAL_BITS) as f64).round() as i64,
        }
    }

    /// Converts a float to the nearest representable value.
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Self::from_f64(v as f64)
    }

    /// Returns the value as a float.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.value as f64 / (1u64 << FRACTIONAL_BITS) as f64
    }

    /// Returns the value as a float.
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Returns true for values below zero.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.value < 0
    }
}

impl Neg for Fixed31_32 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self { value: -self.value }
    }
}

impl Add for Fixed31_32 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value.saturating_add(rhs.value),
        }
    }
}

impl Sub for Fixed31_32 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value.saturating_sub(rhs.value),
        }
    }
}

impl fmt::Display for Fixed31_32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.to_f64())
    }
}
