//! Output (CRTC) stage configuration.
//!
//! Maps the CRTC color properties onto the stream's blocks:
//!
//! ```text
//! CRTC degamma -> CTM (gamut remap) -> [shaper -> 3D LUT] -> regamma
//! ```
//!
//! The configuration path is picked once per update from the
//! [`Classification`] of the request, see [`OutputMode`]. All curves and
//! tables are computed before the stream state is touched; a failed update
//! leaves the previous configuration in place.

use kms_lut::{
    is_lut_linear, ColorMatrix, DrmColorCtm, DrmColorLut, Lut3dTable, MAX_COLOR_LEGACY_LUT_ENTRIES,
};
use kms_transfer::{resolve, DrmTransferFunction, PredefinedTf};
use tracing::{debug, trace};

use crate::arbiter::{reconcile, ShaperLut3d};
use crate::curve::{
    build_atomic_output_curve, build_legacy_output_curve, build_shaper_curve, TransferFunc,
};
use crate::manager::active_lut;
use crate::{ColorError, ColorManager, ColorResult, LutSlot};

/// Color properties of a CRTC, as committed by userspace.
///
/// `None` and empty LUTs both mean "not set".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrtcColorProps {
    /// Degamma LUT
    pub degamma_lut: Option<Vec<DrmColorLut>>,
    /// Gamma (regamma) LUT; 256 entries selects legacy gamma
    pub gamma_lut: Option<Vec<DrmColorLut>>,
    /// Shaper LUT ahead of the 3D LUT
    pub shaper_lut: Option<Vec<DrmColorLut>>,
    /// 17x17x17 3D LUT
    pub lut3d: Option<Vec<DrmColorLut>>,
    /// Color transformation matrix
    pub ctm: Option<DrmColorCtm>,
    /// Regamma transfer function
    pub regamma_tf: DrmTransferFunction,
}

/// Facts about a CRTC request that decide its configuration path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Degamma LUT present and not an identity
    pub has_degamma: bool,
    /// Gamma LUT present and not an identity
    pub has_regamma: bool,
    /// Gamma LUT has the legacy size
    pub is_legacy: bool,
    /// Shaper LUT present
    pub has_shaper: bool,
    /// 3D LUT present
    pub has_lut3d: bool,
    /// Resolved regamma transfer function
    pub tf: PredefinedTf,
}

impl Classification {
    /// Classifies a CRTC request.
    pub fn of(props: &CrtcColorProps) -> Self {
        let degamma = active_lut(&props.degamma_lut);
        let gamma = active_lut(&props.gamma_lut);
        Self {
            has_degamma: degamma.is_some_and(|l| !is_lut_linear(l)),
            has_regamma: gamma.is_some_and(|l| !is_lut_linear(l)),
            is_legacy: gamma.is_some_and(|l| l.len() == MAX_COLOR_LEGACY_LUT_ENTRIES),
            has_shaper: active_lut(&props.shaper_lut).is_some(),
            has_lut3d: active_lut(&props.lut3d).is_some(),
            tf: resolve(props.regamma_tf),
        }
    }
}

/// Configuration path of an output update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// 256-entry gamma on an sRGB base; shaper/3D LUT left as they are
    Legacy,
    /// Atomic regamma, no shaper or 3D LUT
    #[default]
    AtomicNoSpecialBlocks,
    /// Atomic regamma with a shaper + 3D LUT pair
    AtomicWithShaperAndLut3d,
}

impl OutputMode {
    /// Picks the path for a classified request.
    pub fn select(class: &Classification) -> Self {
        if class.is_legacy {
            Self::Legacy
        } else if class.has_lut3d {
            Self::AtomicWithShaperAndLut3d
        } else {
            Self::AtomicNoSpecialBlocks
        }
    }
}

/// Programmed color state of an output stream.
#[derive(Debug, Default)]
pub struct StreamColorState {
    /// Regamma block
    pub out_transfer_func: TransferFunc,
    /// Gamut remap (CTM) block
    pub gamut_remap_matrix: ColorMatrix,
    /// Output CSC adjustment; the CTM never goes there
    pub csc_adjustment_enabled: bool,
    /// Held shaper + 3D LUT pair
    pub shaper_lut3d: Option<ShaperLut3d>,
    mode: OutputMode,
    degamma: Option<Vec<DrmColorLut>>,
    is_degamma_srgb: bool,
}

impl StreamColorState {
    /// Path taken by the last successful update.
    #[inline]
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// The CRTC degamma is active and must be applied by layers.
    #[inline]
    pub fn cm_has_degamma(&self) -> bool {
        self.degamma.is_some()
    }

    /// Legacy gamma is active, so layers need an sRGB-style degamma.
    #[inline]
    pub fn cm_is_degamma_srgb(&self) -> bool {
        self.is_degamma_srgb
    }

    /// The active CRTC degamma LUT.
    #[inline]
    pub fn degamma_lut(&self) -> Option<&[DrmColorLut]> {
        self.degamma.as_deref()
    }
}

/// What an update does with the shaper + 3D LUT pair.
enum PairPlan {
    Keep,
    Release,
    Program { shaper: TransferFunc, lut3d: Lut3dTable },
}

impl ColorManager {
    /// Configures an output's color blocks from CRTC properties.
    ///
    /// Returns the path taken. On error `stream` is left as it was and a
    /// pair acquired during this call goes back to the pool.
    pub fn configure_output(
        &self,
        props: &CrtcColorProps,
        stream: &mut StreamColorState,
    ) -> ColorResult<OutputMode> {
        self.verify_lut_sizes(props)?;
        self.verify_lut3d_sizes(props)?;

        let class = Classification::of(props);
        let mode = OutputMode::select(&class);
        trace!(?mode, ?class, "output::configure_output");

        let (out_transfer_func, plan) = match mode {
            OutputMode::Legacy => (self.legacy_output_curve(props)?, PairPlan::Keep),
            OutputMode::AtomicNoSpecialBlocks => {
                (self.atomic_output_curve(props, &class)?, PairPlan::Release)
            }
            OutputMode::AtomicWithShaperAndLut3d => {
                let regamma = self.atomic_output_curve(props, &class)?;
                (regamma, self.shaper_lut3d_plan(props)?)
            }
        };

        match plan {
            PairPlan::Keep => {}
            PairPlan::Release => {
                reconcile(self.pool(), false, &mut stream.shaper_lut3d)?;
            }
            PairPlan::Program { shaper, lut3d } => {
                reconcile(self.pool(), true, &mut stream.shaper_lut3d).inspect_err(|_| {
                    debug!("failed to set shaper and 3D LUT");
                })?;
                if let Some(pair) = stream.shaper_lut3d.as_mut() {
                    pair.shaper = shaper;
                    pair.lut3d = lut3d;
                }
            }
        }

        stream.out_transfer_func = out_transfer_func;
        stream.gamut_remap_matrix = props
            .ctm
            .as_ref()
            .map(ColorMatrix::from_ctm)
            .unwrap_or_default();
        stream.csc_adjustment_enabled = false;
        stream.degamma = active_lut(&props.degamma_lut)
            .filter(|_| class.has_degamma)
            .map(<[_]>::to_vec);
        stream.is_degamma_srgb = mode == OutputMode::Legacy;
        stream.mode = mode;
        Ok(mode)
    }

    fn legacy_output_curve(&self, props: &CrtcColorProps) -> ColorResult<TransferFunc> {
        let lut = active_lut(&props.gamma_lut).unwrap_or_default();
        build_legacy_output_curve(self.fitter(), lut, self.caps().has_rom)
    }

    fn atomic_output_curve(
        &self,
        props: &CrtcColorProps,
        class: &Classification,
    ) -> ColorResult<TransferFunc> {
        // An identity LUT is programmed as no LUT at all
        let lut = active_lut(&props.gamma_lut).filter(|_| class.has_regamma);
        build_atomic_output_curve(self.fitter(), lut, class.tf, self.caps().has_rom)
    }

    fn shaper_lut3d_plan(&self, props: &CrtcColorProps) -> ColorResult<PairPlan> {
        let shaper = build_shaper_curve(self.fitter(), active_lut(&props.shaper_lut))?;
        let lut = active_lut(&props.lut3d).unwrap_or_default();
        let lut3d = Lut3dTable::from_drm(lut).map_err(|e| {
            debug!(error = %e, "3D LUT rejected");
            ColorError::InvalidSize {
                slot: LutSlot::Lut3d,
                expected: kms_lut::MAX_COLOR_3DLUT_ENTRIES.to_string(),
                got: lut.len(),
            }
        })?;
        Ok(PairPlan::Program { shaper, lut3d })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::TfType;
    use crate::DeviceCaps;
    use kms_lut::{gamma_ramp, identity_ramp, MAX_COLOR_3DLUT_ENTRIES, MAX_COLOR_LUT_ENTRIES};

    fn cube() -> Vec<DrmColorLut> {
        vec![DrmColorLut::gray(0x8000); MAX_COLOR_3DLUT_ENTRIES]
    }

    #[test]
    fn test_mode_selection() {
        let mut props = CrtcColorProps::default();
        assert_eq!(
            OutputMode::select(&Classification::of(&props)),
            OutputMode::AtomicNoSpecialBlocks
        );

        props.lut3d = Some(cube());
        assert_eq!(
            OutputMode::select(&Classification::of(&props)),
            OutputMode::AtomicWithShaperAndLut3d
        );

        // Legacy wins even with a 3D LUT and an identity ramp
        props.gamma_lut = Some(identity_ramp(MAX_COLOR_LEGACY_LUT_ENTRIES));
        let class = Classification::of(&props);
        assert!(!class.has_regamma);
        assert_eq!(OutputMode::select(&class), OutputMode::Legacy);
    }

    #[test]
    fn test_empty_request_bypasses_everything() {
        let manager = ColorManager::new(DeviceCaps::default());
        let mut stream = StreamColorState::default();
        let mode = manager
            .configure_output(&CrtcColorProps::default(), &mut stream)
            .unwrap();
        assert_eq!(mode, OutputMode::AtomicNoSpecialBlocks);
        assert!(stream.out_transfer_func.is_bypass());
        assert!(!stream.gamut_remap_matrix.enable_remap);
        assert!(!stream.cm_has_degamma());
        assert!(!stream.cm_is_degamma_srgb());
        assert!(stream.shaper_lut3d.is_none());
    }

    #[test]
    fn test_legacy_sets_srgb_degamma_flag() {
        let manager = ColorManager::new(DeviceCaps::default());
        let mut stream = StreamColorState::default();
        let props = CrtcColorProps {
            gamma_lut: Some(identity_ramp(MAX_COLOR_LEGACY_LUT_ENTRIES)),
            ..Default::default()
        };
        manager.configure_output(&props, &mut stream).unwrap();
        assert_eq!(stream.mode(), OutputMode::Legacy);
        assert!(stream.cm_is_degamma_srgb());
        assert_eq!(stream.out_transfer_func.tf_type, TfType::DistributedPoints);
        assert_eq!(stream.out_transfer_func.tf, PredefinedTf::Srgb);
    }

    #[test]
    fn test_identity_degamma_is_inactive() {
        let manager = ColorManager::new(DeviceCaps::default());
        let mut stream = StreamColorState::default();
        let mut props = CrtcColorProps {
            degamma_lut: Some(identity_ramp(MAX_COLOR_LUT_ENTRIES)),
            ..Default::default()
        };
        manager.configure_output(&props, &mut stream).unwrap();
        assert!(!stream.cm_has_degamma());

        props.degamma_lut = Some(gamma_ramp(MAX_COLOR_LUT_ENTRIES, 2.2));
        manager.configure_output(&props, &mut stream).unwrap();
        assert!(stream.cm_has_degamma());
        assert_eq!(stream.degamma_lut().map(<[_]>::len), Some(MAX_COLOR_LUT_ENTRIES));
    }

    #[test]
    fn test_ctm_enables_remap() {
        let manager = ColorManager::new(DeviceCaps::default());
        let mut stream = StreamColorState::default();
        let mut props = CrtcColorProps {
            ctm: Some(DrmColorCtm::IDENTITY),
            ..Default::default()
        };
        manager.configure_output(&props, &mut stream).unwrap();
        assert!(stream.gamut_remap_matrix.enable_remap);
        assert!(!stream.csc_adjustment_enabled);

        props.ctm = None;
        manager.configure_output(&props, &mut stream).unwrap();
        assert!(!stream.gamut_remap_matrix.enable_remap);
    }

    #[test]
    fn test_lut3d_programs_pair() {
        let manager = ColorManager::new(DeviceCaps::new(1));
        let mut stream = StreamColorState::default();
        let props = CrtcColorProps {
            shaper_lut: Some(identity_ramp(MAX_COLOR_LUT_ENTRIES)),
            lut3d: Some(cube()),
            ..Default::default()
        };
        manager.configure_output(&props, &mut stream).unwrap();
        let pair = stream.shaper_lut3d.as_ref().unwrap();
        assert!(pair.lut3d.initialized);
        assert_eq!(pair.lut3d.lut0[0].red, 0x800);
        assert_eq!(pair.shaper.tf_type, TfType::DistributedPoints);
        assert_eq!(manager.pool().free(), 0);

        manager
            .configure_output(&CrtcColorProps::default(), &mut stream)
            .unwrap();
        assert!(stream.shaper_lut3d.is_none());
        assert_eq!(manager.pool().free(), 1);
    }
}
