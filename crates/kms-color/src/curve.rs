//! Hardware curve descriptors and how they're built.
//!
//! A [`TransferFunc`] is what a color block is programmed with: bypass, a
//! predefined curve, or a curve sampled at distributed points. Descriptors
//! are rebuilt from scratch on every update, nothing carries over from a
//! previous configuration.
//!
//! | Builder | Fit | Gamma kind | Used for |
//! |---------|-----|------------|----------|
//! | [`build_legacy_output_curve`] | regamma | `Rgb256` | 256-entry gamma |
//! | [`build_atomic_output_curve`] | regamma (degamma if linear) | `CsTfm1d`/`Custom` | regamma |
//! | [`build_input_curve`] | degamma | `Custom` | plane and CRTC degamma |
//! | [`build_shaper_curve`] | degamma | `Custom` | shaper ahead of the 3D LUT |
//! | [`build_predefined_input_curve`] | degamma, optional | - | predefined plane curves |

use kms_lut::{DrmColorLut, GammaKind, GammaTable, MAX_COLOR_LEGACY_LUT_ENTRIES};
use kms_transfer::{CurveFitter, FitRequest, FitScratch, PredefinedTf, SampledCurve};
use tracing::trace;

use crate::manager::check_size;
use crate::{ColorError, ColorResult, LutSlot};

/// Reference white level for SDR content, in nits.
pub const SDR_REF_WHITE_LEVEL: u32 = 80;

/// How a color block applies its curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TfType {
    /// Block passes data through
    #[default]
    Bypass,
    /// Hardware generates the named curve
    Predefined,
    /// Curve given as sampled points
    DistributedPoints,
}

/// A hardware transfer-function descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferFunc {
    /// How the curve is applied
    pub tf_type: TfType,
    /// Base curve
    pub tf: PredefinedTf,
    /// Sampled points, for `DistributedPoints` and fitted predefined curves
    pub points: Option<SampledCurve>,
    /// SDR reference white, in nits
    pub sdr_ref_white_level: Option<u32>,
}

impl TransferFunc {
    /// A bypassed block.
    pub fn bypass() -> Self {
        Self::default()
    }

    /// A predefined curve without points.
    pub fn predefined(tf: PredefinedTf) -> Self {
        Self {
            tf_type: TfType::Predefined,
            tf,
            points: None,
            sdr_ref_white_level: None,
        }
    }

    fn distributed(tf: PredefinedTf, points: SampledCurve) -> Self {
        Self {
            tf_type: TfType::DistributedPoints,
            tf,
            points: Some(points),
            sdr_ref_white_level: None,
        }
    }

    /// Returns true if the block is bypassed.
    #[inline]
    pub fn is_bypass(&self) -> bool {
        self.tf_type == TfType::Bypass
    }
}

/// Builds the output curve for a legacy 256-entry gamma LUT.
///
/// The ramp rides on top of an sRGB regamma. Any other size is rejected
/// before the fitter is called.
pub fn build_legacy_output_curve(
    fitter: &dyn CurveFitter,
    lut: &[DrmColorLut],
    has_rom: bool,
) -> ColorResult<TransferFunc> {
    check_size(LutSlot::Gamma, lut, &[MAX_COLOR_LEGACY_LUT_ENTRIES])?;
    let ramp = GammaTable::from_drm(lut, true);
    let request = FitRequest {
        tf: PredefinedTf::Srgb,
        ramp: Some(&ramp),
        map_user_ramp: true,
        can_rom: has_rom,
    };
    trace!(entries = lut.len(), has_rom, "curve::build_legacy_output_curve");

    let mut scratch = FitScratch::new();
    let points = fitter
        .fit_regamma(&request, &mut scratch)
        .map_err(ColorError::compute("legacy regamma"))?;
    Ok(TransferFunc::distributed(PredefinedTf::Srgb, points))
}

/// Builds the output curve for an atomic regamma configuration.
///
/// `lut` is the active regamma LUT, `None` when absent or linear. With a
/// linear base the LUT is fitted as a degamma curve; otherwise the base is
/// fitted as a regamma with the LUT mapped on top. Only a missing LUT on
/// a linear base yields a bypass.
pub fn build_atomic_output_curve(
    fitter: &dyn CurveFitter,
    lut: Option<&[DrmColorLut]>,
    tf: PredefinedTf,
    has_rom: bool,
) -> ColorResult<TransferFunc> {
    if lut.is_none() && tf == PredefinedTf::Linear {
        return Ok(TransferFunc::bypass());
    }
    trace!(tf = %tf, lut = ?lut.map(<[_]>::len), "curve::build_atomic_output_curve");

    let points = if tf == PredefinedTf::Linear {
        let ramp = lut.map(|l| GammaTable::from_drm(l, false).with_kind(GammaKind::Custom));
        let request = FitRequest {
            tf,
            ramp: ramp.as_ref(),
            map_user_ramp: ramp.is_some(),
            can_rom: false,
        };
        fitter
            .fit_degamma(&request)
            .map_err(ColorError::compute("regamma"))?
    } else {
        let ramp = lut.map(|l| GammaTable::from_drm(l, false).with_kind(GammaKind::CsTfm1d));
        let request = FitRequest {
            tf,
            ramp: ramp.as_ref(),
            map_user_ramp: ramp.is_some(),
            can_rom: has_rom,
        };
        let mut scratch = FitScratch::new();
        fitter
            .fit_regamma(&request, &mut scratch)
            .map_err(ColorError::compute("regamma"))?
    };

    let mut func = TransferFunc::distributed(tf, points);
    func.sdr_ref_white_level = Some(SDR_REF_WHITE_LEVEL);
    Ok(func)
}

/// Builds a degamma curve: `tf` decoded, then `lut` mapped on top.
pub fn build_input_curve(
    fitter: &dyn CurveFitter,
    lut: &[DrmColorLut],
    tf: PredefinedTf,
) -> ColorResult<TransferFunc> {
    let ramp = GammaTable::from_drm(lut, false).with_kind(GammaKind::Custom);
    trace!(tf = %tf, entries = lut.len(), "curve::build_input_curve");

    let points = fitter
        .fit_degamma(&FitRequest::with_ramp(tf, &ramp))
        .map_err(ColorError::compute("degamma"))?;
    Ok(TransferFunc::distributed(tf, points))
}

/// Builds the shaper curve placed ahead of the 3D LUT.
///
/// Without a LUT the shaper is a linear bypass.
pub fn build_shaper_curve(
    fitter: &dyn CurveFitter,
    lut: Option<&[DrmColorLut]>,
) -> ColorResult<TransferFunc> {
    let Some(lut) = lut else {
        return Ok(TransferFunc::bypass());
    };
    let ramp = GammaTable::from_drm(lut, false).with_kind(GammaKind::Custom);
    let points = fitter
        .fit_degamma(&FitRequest::with_ramp(PredefinedTf::Linear, &ramp))
        .map_err(ColorError::compute("shaper"))?;
    Ok(TransferFunc::distributed(PredefinedTf::Linear, points))
}

/// Builds a predefined input curve, sampling it when `sample` is set.
pub fn build_predefined_input_curve(
    fitter: &dyn CurveFitter,
    tf: PredefinedTf,
    sample: bool,
) -> ColorResult<TransferFunc> {
    let mut func = TransferFunc::predefined(tf);
    if sample {
        func.points = Some(
            fitter
                .fit_degamma(&FitRequest::predefined(tf))
                .map_err(ColorError::compute("predefined degamma"))?,
        );
    }
    Ok(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kms_lut::{gamma_ramp, identity_ramp, MAX_COLOR_LUT_ENTRIES};
    use kms_transfer::ReferenceFitter;

    #[test]
    fn test_legacy_output_curve() {
        let fitter = ReferenceFitter::new();
        let lut = identity_ramp(MAX_COLOR_LEGACY_LUT_ENTRIES);
        let func = build_legacy_output_curve(&fitter, &lut, false).unwrap();
        assert_eq!(func.tf_type, TfType::DistributedPoints);
        assert_eq!(func.tf, PredefinedTf::Srgb);
        assert_eq!(func.sdr_ref_white_level, None);
        assert_eq!(func.points.unwrap().len(), fitter.x_points().len());
    }

    #[test]
    fn test_legacy_output_curve_needs_256_entries() {
        let fitter = ReferenceFitter::new();
        for size in [MAX_COLOR_LUT_ENTRIES, MAX_COLOR_LEGACY_LUT_ENTRIES - 1] {
            let lut = identity_ramp(size);
            match build_legacy_output_curve(&fitter, &lut, false) {
                Err(ColorError::InvalidSize { slot, got, .. }) => {
                    assert_eq!(slot, LutSlot::Gamma);
                    assert_eq!(got, size);
                }
                other => panic!("size {}: {:?}", size, other),
            }
        }
    }

    #[test]
    fn test_atomic_output_bypass_only_when_linear_and_empty() {
        let fitter = ReferenceFitter::new();
        let func = build_atomic_output_curve(&fitter, None, PredefinedTf::Linear, false).unwrap();
        assert!(func.is_bypass());

        let func = build_atomic_output_curve(&fitter, None, PredefinedTf::Pq, false).unwrap();
        assert_eq!(func.tf_type, TfType::DistributedPoints);
        assert_eq!(func.tf, PredefinedTf::Pq);
        assert_eq!(func.sdr_ref_white_level, Some(SDR_REF_WHITE_LEVEL));
    }

    #[test]
    fn test_atomic_output_linear_base_uses_ramp() {
        let fitter = ReferenceFitter::new();
        let lut = gamma_ramp(MAX_COLOR_LUT_ENTRIES, 2.0);
        let func =
            build_atomic_output_curve(&fitter, Some(&lut), PredefinedTf::Linear, false).unwrap();
        let points = func.points.unwrap();
        let mid = fitter.x_points().iter().position(|&x| x >= 0.5).unwrap();
        assert_relative_eq!(points.points[mid][1].to_f32(), 0.25, epsilon = 1e-3);
    }

    #[test]
    fn test_shaper_curve() {
        let fitter = ReferenceFitter::new();
        assert!(build_shaper_curve(&fitter, None).unwrap().is_bypass());

        let lut = identity_ramp(MAX_COLOR_LUT_ENTRIES);
        let func = build_shaper_curve(&fitter, Some(&lut)).unwrap();
        assert_eq!(func.tf_type, TfType::DistributedPoints);
        assert_eq!(func.tf, PredefinedTf::Linear);
    }

    #[test]
    fn test_input_and_predefined_curves() {
        let fitter = ReferenceFitter::new();
        let lut = identity_ramp(MAX_COLOR_LUT_ENTRIES);
        let func = build_input_curve(&fitter, &lut, PredefinedTf::Bt709).unwrap();
        assert_eq!(func.tf, PredefinedTf::Bt709);
        assert!(func.points.is_some());

        let plain = build_predefined_input_curve(&fitter, PredefinedTf::Srgb, false).unwrap();
        assert_eq!(plain, TransferFunc::predefined(PredefinedTf::Srgb));
        let sampled = build_predefined_input_curve(&fitter, PredefinedTf::Pq, true).unwrap();
        assert_eq!(sampled.tf_type, TfType::Predefined);
        assert!(sampled.points.is_some());
    }
}
