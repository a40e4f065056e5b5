//! # kms-lut
//!
//! Codec between the DRM color-management encodings and the hardware
//! descriptor encodings.
//!
//! # Types
//!
//! - [`DrmColorLut`] - one userspace LUT entry (16-bit R, G, B)
//! - [`GammaTable`] - hardware 1D gamma ramp in [`Fixed31_32`](kms_math::Fixed31_32)
//! - [`DrmColorCtm`] / [`ColorMatrix`] - 3x3 sign-magnitude CTM and the 3x4
//!   2's complement gamut remap matrix
//! - [`Lut3dTable`] - 17x17x17 3D LUT split into four tetrahedral sub-tables
//!
//! # Cardinalities
//!
//! | Slot | Accepted sizes |
//! |------|----------------|
//! | degamma | [`MAX_COLOR_LUT_ENTRIES`] |
//! | gamma / regamma | [`MAX_COLOR_LUT_ENTRIES`] or [`MAX_COLOR_LEGACY_LUT_ENTRIES`] |
//! | shaper | [`MAX_COLOR_LUT_ENTRIES`] |
//! | 3D LUT | [`MAX_COLOR_3DLUT_ENTRIES`] |
//!
//! # Usage
//!
//! ```rust
//! use kms_lut::{identity_ramp, is_lut_linear, GammaTable, MAX_COLOR_LUT_ENTRIES};
//!
//! let ramp = identity_ramp(MAX_COLOR_LUT_ENTRIES);
//! assert!(is_lut_linear(&ramp));
//!
//! let table = GammaTable::from_drm(&ramp, false);
//! assert_eq!(table.len(), MAX_COLOR_LUT_ENTRIES);
//! ```
//!
//! # Used By
//!
//! - `kms-transfer` - curve fitting input
//! - `kms-color` - pipeline configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ctm;
mod drm;
mod error;
mod gamma;
mod lut3d;

pub use ctm::{ColorMatrix, DrmColorCtm};
pub use drm::{extract, gamma_ramp, identity_ramp, is_lut_linear, DrmColorLut};
pub use error::{LutError, LutResult};
pub use gamma::{GammaKind, GammaTable};
pub use lut3d::{DcRgb, Lut3dTable, LUT3D_BIT_DEPTH, LUT3D_SUBTABLE_SIZE};

/// Maximum value of a DRM LUT channel.
pub const MAX_DRM_LUT_VALUE: u32 = 0xFFFF;

/// Entry count of a full-precision (atomic) 1D LUT.
pub const MAX_COLOR_LUT_ENTRIES: usize = 4096;

/// Entry count of a legacy gamma LUT.
pub const MAX_COLOR_LEGACY_LUT_ENTRIES: usize = 256;

/// Entry count of a 17x17x17 3D LUT.
pub const MAX_COLOR_3DLUT_ENTRIES: usize = 17 * 17 * 17;
