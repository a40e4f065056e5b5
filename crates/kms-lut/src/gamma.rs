//! Hardware 1D gamma tables.
//!
//! A [`GammaTable`] is the user ramp handed to the curve fitter. Its
//! numeric domain depends on where the ramp came from:
//!
//! - legacy ramps hold whole numbers `0..=0xFFFF`
//! - full-precision ramps hold fractions of [`MAX_DRM_LUT_VALUE`] in `[0, 1]`
//!
//! The two domains are never mixed within one table.

use kms_math::Fixed31_32;

use crate::{extract, DrmColorLut, MAX_DRM_LUT_VALUE};

/// How the curve fitter should interpret a gamma table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GammaKind {
    /// Legacy 256-entry ramp with whole-number entries.
    Rgb256,
    /// Custom ramp applied on top of a degamma curve.
    Custom,
    /// Custom ramp applied on top of a regamma (1D color space) curve.
    CsTfm1d,
}

/// A per-channel gamma ramp in hardware fixed point.
#[derive(Debug, Clone, PartialEq)]
pub struct GammaTable {
    /// Interpretation of the entries
    pub kind: GammaKind,
    /// Red channel entries
    pub red: Vec<Fixed31_32>,
    /// Green channel entries
    pub green: Vec<Fixed31_32>,
    /// Blue channel entries
    pub blue: Vec<Fixed31_32>,
}

impl GammaTable {
    /// Converts a userspace LUT.
    ///
    /// With `legacy` set the 16-bit values are stored as whole numbers;
    /// otherwise they're stored as fractions of [`MAX_DRM_LUT_VALUE`].
    /// Legacy tables are tagged [`GammaKind::Rgb256`], full tables start
    /// as [`GammaKind::Custom`] and are retagged by the curve builder.
    ///
    /// ```rust
    /// use kms_lut::{DrmColorLut, GammaTable};
    ///
    /// let lut = [DrmColorLut::gray(0), DrmColorLut::gray(0xFFFF)];
    /// let legacy = GammaTable::from_drm(&lut, true);
    /// assert_eq!(legacy.red[1].to_f64(), 65535.0);
    ///
    /// let full = GammaTable::from_drm(&lut, false);
    /// assert_eq!(full.red[1].to_f64(), 1.0);
    /// ```
    pub fn from_drm(lut: &[DrmColorLut], legacy: bool) -> Self {
        let convert: fn(u32) -> Fixed31_32 = if legacy {
            |v| Fixed31_32::from_int(v as i32)
        } else {
            |v| Fixed31_32::from_fraction(v as i64, MAX_DRM_LUT_VALUE as i64)
        };

        let channel = |pick: fn(&DrmColorLut) -> u16| -> Vec<Fixed31_32> {
            lut.iter().map(|e| convert(extract(pick(e), 16))).collect()
        };

        Self {
            kind: if legacy { GammaKind::Rgb256 } else { GammaKind::Custom },
            red: channel(|e| e.red),
            green: channel(|e| e.green),
            blue: channel(|e| e.blue),
        }
    }

    /// Returns a copy of this table with a different kind tag.
    pub fn with_kind(mut self, kind: GammaKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the number of entries per channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.red.len()
    }

    /// Returns true if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }

    /// Returns the ramp normalized to `[0, 1]` as floats, per channel.
    ///
    /// Legacy whole-number entries are divided by [`MAX_DRM_LUT_VALUE`].
    pub fn normalized(&self) -> [Vec<f32>; 3] {
        let scale = match self.kind {
            GammaKind::Rgb256 => MAX_DRM_LUT_VALUE as f64,
            GammaKind::Custom | GammaKind::CsTfm1d => 1.0,
        };
        let norm = |ch: &[Fixed31_32]| -> Vec<f32> {
            ch.iter().map(|v| (v.to_f64() / scale) as f32).collect()
        };
        [norm(&self.red), norm(&self.green), norm(&self.blue)]
    }
}
