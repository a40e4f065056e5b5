//! # kms-math
//!
//! Numeric primitives shared by the display color crates.
//!
//! - [`Fixed31_32`] - signed S31.32 fixed-point number in 2's complement,
//!   the representation used by hardware curve and matrix descriptors
//! - Ramp interpolation helpers ([`lerp`], [`sample_ramp`])
//!
//! # Encodings
//!
//! Userspace hands over two different fixed-point encodings:
//!
//! ```text
//! LUT entries   u16 in [0, 0xFFFF]         -> from_int / from_fraction
//! CTM entries   S31.32 sign-magnitude u64  -> from_s3132
//! ```
//!
//! Hardware descriptors always hold [`Fixed31_32`].
//!
//! # Used By
//!
//! - `kms-lut` - LUT and matrix codec
//! - `kms-transfer` - sampled curve points
//! - `kms-color` - HDR multiplier conversion

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod fixed;
mod interp;

pub use fixed::*;
pub use interp::*;
