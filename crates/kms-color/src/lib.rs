//! # kms-color
//!
//! Maps DRM color management properties onto the fixed color blocks of a
//! display controller.
//!
//! Userspace describes color per CRTC (degamma LUT, CTM, shaper LUT, 3D
//! LUT, gamma LUT, regamma transfer function) and per plane (degamma LUT,
//! degamma transfer function, HDR multiplier). The hardware has its own
//! blocks and encodings:
//!
//! ```text
//! plane:  input curve -> hdr mult ---+
//!                                    v
//! stream:              gamut remap -> shaper -> 3D LUT -> regamma
//! ```
//!
//! # Usage
//!
//! ```rust
//! use kms_color::{ColorManager, CrtcColorProps, DeviceCaps, OutputMode, StreamColorState};
//! use kms_lut::{identity_ramp, MAX_COLOR_LEGACY_LUT_ENTRIES};
//!
//! let manager = ColorManager::new(DeviceCaps::default());
//! let mut stream = StreamColorState::default();
//!
//! let props = CrtcColorProps {
//!     gamma_lut: Some(identity_ramp(MAX_COLOR_LEGACY_LUT_ENTRIES)),
//!     ..Default::default()
//! };
//! let mode = manager.configure_output(&props, &mut stream)?;
//! assert_eq!(mode, OutputMode::Legacy);
//! # Ok::<(), kms_color::ColorError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`curve`] | Transfer-function descriptors and their builders |
//! | [`pool`] | Shared shaper/3D LUT instances |
//! | [`arbiter`] | Pair ownership per output |
//!
//! # Dependencies
//!
//! - `kms-lut` - DRM/hardware encodings
//! - `kms-transfer` - curves and the fitter seam
//! - `serde_yaml` - device capability files
//! - `tracing` - diagnostics
//!
//! # Used By
//!
//! - `kms-cli` - commit simulation tool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod arbiter;
pub mod curve;
pub mod pool;

mod config;
mod error;
mod manager;
mod output;
mod plane;

pub use arbiter::{reconcile, ShaperLut3d, Transition};
pub use config::DeviceCaps;
pub use curve::{TfType, TransferFunc, SDR_REF_WHITE_LEVEL};
pub use error::{ColorError, ColorResult, ErrorClass, LutSlot};
pub use manager::ColorManager;
pub use output::{Classification, CrtcColorProps, OutputMode, StreamColorState};
pub use plane::{
    InputCurveSource, PlaneColorProps, PlaneColorState, SurfacePixelFormat, HDR_MULT_DEFAULT,
};
pub use pool::{Lut3dLease, Lut3dPool};
