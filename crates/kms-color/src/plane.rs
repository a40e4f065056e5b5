//! Layer (plane) stage configuration.
//!
//! Each plane has one input curve slot ahead of blending. The first rule
//! that applies decides what goes there:
//!
//! | # | Condition | Input curve |
//! |---|-----------|-------------|
//! | 1 | plane degamma LUT not an identity | plane `degamma_tf` + LUT, sampled |
//! | 2 | plane `degamma_tf` not `Default` | predefined plane `degamma_tf` |
//! | 3 | output has an active degamma | format base curve (legacy) or linear, + CRTC LUT |
//! | 4 | output runs legacy gamma | predefined format base curve |
//! | 5 | otherwise | bypass |
//!
//! The format base curve is sRGB, or BT.709 for 4:2:0 YCbCr surfaces.
//! Rules 3 and 4 read the state left by
//! [`ColorManager::configure_output`], so the output must be configured
//! first in a commit.

use kms_lut::{is_lut_linear, DrmColorLut, MAX_COLOR_LUT_ENTRIES};
use kms_math::Fixed31_32;
use kms_transfer::{resolve, DrmTransferFunction, PredefinedTf};
use tracing::trace;

use crate::curve::{build_input_curve, build_predefined_input_curve, TransferFunc};
use crate::manager::{active_lut, check_size};
use crate::output::StreamColorState;
use crate::{ColorManager, ColorResult, LutSlot};

/// Default HDR multiplier: 1.0 in S31.32.
pub const HDR_MULT_DEFAULT: u64 = 1 << 32;

/// Pixel format of a plane's surface, as far as color handling cares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SurfacePixelFormat {
    /// 8-bit ARGB
    #[default]
    Argb8888,
    /// 8-bit ABGR
    Abgr8888,
    /// 10-bit ARGB
    Argb2101010,
    /// Half-float ARGB
    Argb16161616F,
    /// 4:2:0 YCbCr video
    Video420YCbCr,
    /// 4:2:0 YCrCb video
    Video420YCrCb,
}

impl SurfacePixelFormat {
    /// Base curve assumed for content of this format.
    ///
    /// There's no BT.601 curve, so 4:2:0 video uses BT.709.
    pub fn base_transfer_function(self) -> PredefinedTf {
        match self {
            Self::Video420YCbCr | Self::Video420YCrCb => PredefinedTf::Bt709,
            _ => PredefinedTf::Srgb,
        }
    }

    /// Parses a lowercase format name such as `"argb8888"` or `"nv12"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "argb8888" | "xrgb8888" => Self::Argb8888,
            "abgr8888" | "xbgr8888" => Self::Abgr8888,
            "argb2101010" | "xrgb2101010" => Self::Argb2101010,
            "argb16161616f" | "fp16" => Self::Argb16161616F,
            "ycbcr420" | "nv12" => Self::Video420YCbCr,
            "ycrcb420" | "nv21" => Self::Video420YCrCb,
            _ => return None,
        })
    }
}

/// Color properties of a plane, as committed by userspace.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneColorProps {
    /// Surface format
    pub format: SurfacePixelFormat,
    /// Plane degamma LUT
    pub degamma_lut: Option<Vec<DrmColorLut>>,
    /// Plane degamma transfer function
    pub degamma_tf: DrmTransferFunction,
    /// HDR multiplier, S31.32 sign-magnitude
    pub hdr_mult: u64,
}

impl Default for PlaneColorProps {
    fn default() -> Self {
        Self {
            format: SurfacePixelFormat::default(),
            degamma_lut: None,
            degamma_tf: DrmTransferFunction::Default,
            hdr_mult: HDR_MULT_DEFAULT,
        }
    }
}

/// Which rule produced a plane's input curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputCurveSource {
    /// Plane degamma LUT
    PlaneLut,
    /// Plane degamma transfer function
    PlaneTf,
    /// CRTC degamma LUT
    CrtcDegamma,
    /// Implicit degamma for legacy gamma
    LegacySrgb,
    /// Nothing to apply
    #[default]
    Bypass,
}

/// Programmed color state of a plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneColorState {
    /// Input (degamma) block
    pub in_transfer_func: TransferFunc,
    /// HDR multiplier
    pub hdr_mult: Fixed31_32,
    /// Rule behind `in_transfer_func`
    pub source: InputCurveSource,
}

impl Default for PlaneColorState {
    fn default() -> Self {
        Self {
            in_transfer_func: TransferFunc::bypass(),
            hdr_mult: Fixed31_32::ONE,
            source: InputCurveSource::Bypass,
        }
    }
}

impl ColorManager {
    /// Configures a plane's input curve and HDR multiplier.
    ///
    /// `stream` is the output state produced by
    /// [`configure_output`](Self::configure_output) in the same commit. On
    /// error `state` is left as it was.
    pub fn configure_plane(
        &self,
        stream: &StreamColorState,
        props: &PlaneColorProps,
        state: &mut PlaneColorState,
    ) -> ColorResult<InputCurveSource> {
        let lut = active_lut(&props.degamma_lut);
        if let Some(lut) = lut {
            check_size(LutSlot::PlaneDegamma, lut, &[MAX_COLOR_LUT_ENTRIES])?;
        }

        let base = props.format.base_transfer_function();
        let (func, source) = self.input_curve(stream, lut, props.degamma_tf, base)?;
        trace!(?source, tf = %func.tf, format = ?props.format, "plane::configure_plane");

        state.in_transfer_func = func;
        state.hdr_mult = Fixed31_32::from_s3132(props.hdr_mult);
        state.source = source;
        Ok(source)
    }

    fn input_curve(
        &self,
        stream: &StreamColorState,
        lut: Option<&[DrmColorLut]>,
        degamma_tf: DrmTransferFunction,
        base: PredefinedTf,
    ) -> ColorResult<(TransferFunc, InputCurveSource)> {
        let fitter = self.fitter();

        if let Some(lut) = lut.filter(|l| !is_lut_linear(l)) {
            let func = build_input_curve(fitter, lut, resolve(degamma_tf))?;
            return Ok((func, InputCurveSource::PlaneLut));
        }

        if degamma_tf != DrmTransferFunction::Default {
            let func = build_predefined_input_curve(fitter, resolve(degamma_tf), true)?;
            return Ok((func, InputCurveSource::PlaneTf));
        }

        if let Some(crtc_lut) = stream.degamma_lut() {
            // Legacy gamma needs linear input, so the base curve goes first
            let tf = if stream.cm_is_degamma_srgb() {
                base
            } else {
                PredefinedTf::Linear
            };
            let func = build_input_curve(fitter, crtc_lut, tf)?;
            return Ok((func, InputCurveSource::CrtcDegamma));
        }

        if stream.cm_is_degamma_srgb() {
            let func = build_predefined_input_curve(fitter, base, base != PredefinedTf::Srgb)?;
            return Ok((func, InputCurveSource::LegacySrgb));
        }

        Ok((TransferFunc::bypass(), InputCurveSource::Bypass))
    }
}
