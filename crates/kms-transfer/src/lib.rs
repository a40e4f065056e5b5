//! # kms-transfer
//!
//! Transfer functions for display color pipelines.
//!
//! - [`resolve`] maps a userspace [`DrmTransferFunction`] selector to a
//!   hardware [`PredefinedTf`] curve
//! - [`CurveFitter`] is the seam to the curve sampler that turns a base
//!   curve plus an optional user ramp into hardware points
//! - [`ReferenceFitter`] implements it over the curves below
//!
//! # Supported Curves
//!
//! | Curve | Module | Use |
//! |-------|--------|-----|
//! | sRGB | [`srgb`] | desktop content, legacy gamma base |
//! | BT.709 | [`bt709`] | video, 4:2:0 surfaces |
//! | PQ | [`pq`] | HDR10 |
//! | HLG | [`hlg`] | HDR broadcast |
//! | Gamma 2.2 / 2.4 / 2.6 | [`gamma`] | pure power laws |
//!
//! # Usage
//!
//! ```rust
//! use kms_transfer::{resolve, CurveFitter, DrmTransferFunction, FitRequest, ReferenceFitter};
//!
//! let tf = resolve(DrmTransferFunction::Srgb);
//! let fitter = ReferenceFitter::new();
//! let curve = fitter.fit_degamma(&FitRequest::predefined(tf)).unwrap();
//! assert!(!curve.is_empty());
//! ```
//!
//! # Used By
//!
//! - `kms-color` - curve builder

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bt709;
pub mod gamma;
pub mod hlg;
pub mod pq;
pub mod srgb;

mod fit;
mod tf;

pub use fit::{
    CurveFitter, FitError, FitRequest, FitResult, FitScratch, ReferenceFitter, SampledCurve,
};
pub use tf::{resolve, DrmTransferFunction, PredefinedTf};
