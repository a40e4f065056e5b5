//! Userspace LUT entries and linearity detection.

use crate::MAX_DRM_LUT_VALUE;

/// One entry of a userspace color LUT.
///
/// Each channel spans the full 16-bit range `[0, 0xFFFF]`. The layout
/// matches `struct drm_color_lut` minus its reserved word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DrmColorLut {
    /// Red channel
    pub red: u16,
    /// Green channel
    pub green: u16,
    /// Blue channel
    pub blue: u16,
}

impl DrmColorLut {
    /// Creates an entry with independent channels.
    #[inline]
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// Creates a neutral entry with all channels equal.
    #[inline]
    pub const fn gray(v: u16) -> Self {
        Self::new(v, v, v)
    }
}

/// Reduces a 16-bit channel value to `bit_precision` bits.
///
/// Below 16 bits the value is rounded to nearest before the shift and
/// clamped to the largest representable code. At 16 bits it is returned
/// unchanged.
///
/// ```rust
/// use kms_lut::extract;
///
/// assert_eq!(extract(0xFFFF, 12), 0xFFF);
/// assert_eq!(extract(0x8000, 12), 0x800);
/// assert_eq!(extract(0x1234, 16), 0x1234);
/// ```
#[inline]
pub fn extract(user_input: u16, bit_precision: u32) -> u32 {
    debug_assert!((1..=16).contains(&bit_precision));
    let max = MAX_DRM_LUT_VALUE >> (16 - bit_precision);
    let mut val = user_input as u32;

    if bit_precision < 16 {
        val += 1 << (16 - bit_precision - 1);
        val >>= 16 - bit_precision;
    }

    val.min(max)
}

/// Checks whether a LUT is an identity mapping, i.e. acts like bypass.
///
/// A LUT is linear when every entry is neutral (`red == green == blue`)
/// and lies within +/-1 of `i * 0xFFFF / (len - 1)`.
///
/// Tables with fewer than two entries have no ramp; callers reject those
/// sizes before asking.
///
/// ```rust
/// use kms_lut::{identity_ramp, is_lut_linear};
///
/// let mut lut = identity_ramp(256);
/// assert!(is_lut_linear(&lut));
///
/// lut[10].red += 2;
/// assert!(!is_lut_linear(&lut));
/// ```
pub fn is_lut_linear(lut: &[DrmColorLut]) -> bool {
    if lut.len() < 2 {
        return false;
    }
    let last = (lut.len() - 1) as u64;

    lut.iter().enumerate().all(|(i, e)| {
        if e.red != e.green || e.green != e.blue {
            return false;
        }
        let expected = i as u64 * MAX_DRM_LUT_VALUE as u64 / last;
        let delta = e.red as i64 - expected as i64;
        (-1..=1).contains(&delta)
    })
}

/// Builds the exact identity ramp with `size` entries.
pub fn identity_ramp(size: usize) -> Vec<DrmColorLut> {
    if size < 2 {
        return vec![DrmColorLut::default(); size];
    }
    let last = (size - 1) as u64;
    (0..size as u64)
        .map(|i| DrmColorLut::gray((i * MAX_DRM_LUT_VALUE as u64 / last) as u16))
        .collect()
}

/// Builds a neutral power-law ramp `(i / (size - 1))^exponent`.
pub fn gamma_ramp(size: usize, exponent: f64) -> Vec<DrmColorLut> {
    if size < 2 {
        return vec![DrmColorLut::default(); size];
    }
    let last = (size - 1) as f64;
    (0..size)
        .map(|i| {
            let v = (i as f64 / last).powf(exponent) * MAX_DRM_LUT_VALUE as f64;
            DrmColorLut::gray(v.round().clamp(0.0, MAX_DRM_LUT_VALUE as f64) as u16)
        })
        .collect()
}
