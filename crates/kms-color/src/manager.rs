//! Entry point tying capabilities, the 3D LUT pool and the curve fitter.

use std::fmt;
use std::sync::Arc;

use kms_lut::{
    DrmColorLut, MAX_COLOR_3DLUT_ENTRIES, MAX_COLOR_LEGACY_LUT_ENTRIES, MAX_COLOR_LUT_ENTRIES,
};
use kms_transfer::{CurveFitter, ReferenceFitter};
use tracing::debug;

use crate::output::{CrtcColorProps, StreamColorState};
use crate::plane::{PlaneColorProps, PlaneColorState};
use crate::pool::Lut3dPool;
use crate::{ColorError, ColorResult, DeviceCaps, LutSlot};

/// Configures output and layer color blocks of one device.
///
/// Cheap to share between threads; per-output state lives in the
/// [`StreamColorState`] passed to each call.
pub struct ColorManager {
    caps: DeviceCaps,
    pool: Arc<Lut3dPool>,
    fitter: Arc<dyn CurveFitter + Send + Sync>,
}

impl fmt::Debug for ColorManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorManager")
            .field("caps", &self.caps)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl ColorManager {
    /// Creates a manager using the [`ReferenceFitter`].
    pub fn new(caps: DeviceCaps) -> Self {
        Self::with_fitter(caps, Arc::new(ReferenceFitter::new()))
    }

    /// Creates a manager with a custom curve fitter.
    pub fn with_fitter(caps: DeviceCaps, fitter: Arc<dyn CurveFitter + Send + Sync>) -> Self {
        Self {
            pool: Lut3dPool::new(caps.num_3dluts as usize),
            caps,
            fitter,
        }
    }

    /// Device capabilities.
    #[inline]
    pub fn caps(&self) -> &DeviceCaps {
        &self.caps
    }

    /// Shared shaper/3D LUT pool.
    #[inline]
    pub fn pool(&self) -> &Arc<Lut3dPool> {
        &self.pool
    }

    pub(crate) fn fitter(&self) -> &dyn CurveFitter {
        self.fitter.as_ref()
    }

    /// Checks the 1D CRTC LUT sizes.
    ///
    /// Degamma must have [`MAX_COLOR_LUT_ENTRIES`] entries; gamma either
    /// that or [`MAX_COLOR_LEGACY_LUT_ENTRIES`]. Absent LUTs always pass.
    pub fn verify_lut_sizes(&self, props: &CrtcColorProps) -> ColorResult<()> {
        if let Some(lut) = active_lut(&props.degamma_lut) {
            check_size(LutSlot::Degamma, lut, &[MAX_COLOR_LUT_ENTRIES])?;
        }
        if let Some(lut) = active_lut(&props.gamma_lut) {
            check_size(
                LutSlot::Gamma,
                lut,
                &[MAX_COLOR_LUT_ENTRIES, MAX_COLOR_LEGACY_LUT_ENTRIES],
            )?;
        }
        Ok(())
    }

    /// Checks the shaper and 3D LUT sizes against the device capabilities.
    ///
    /// On devices without 3D LUTs the expected size is 0, so any supplied
    /// shaper or 3D LUT is rejected.
    pub fn verify_lut3d_sizes(&self, props: &CrtcColorProps) -> ColorResult<()> {
        if let Some(lut) = active_lut(&props.shaper_lut) {
            check_size(
                LutSlot::Shaper,
                lut,
                &[self.caps.lut3d_size(MAX_COLOR_LUT_ENTRIES)],
            )?;
        }
        if let Some(lut) = active_lut(&props.lut3d) {
            check_size(
                LutSlot::Lut3d,
                lut,
                &[self.caps.lut3d_size(MAX_COLOR_3DLUT_ENTRIES)],
            )?;
        }
        Ok(())
    }

    /// Configures an output, then each of its layers in order.
    ///
    /// Stops at the first failure. Layers before it keep their new
    /// configuration, the failing one and those after it keep the old one.
    pub fn configure_commit(
        &self,
        crtc: &CrtcColorProps,
        stream: &mut StreamColorState,
        planes: &mut [(PlaneColorProps, PlaneColorState)],
    ) -> ColorResult<()> {
        self.configure_output(crtc, stream)?;
        for (props, state) in planes.iter_mut() {
            self.configure_plane(stream, props, state)?;
        }
        Ok(())
    }
}

/// A LUT blob, treating an empty one as absent.
pub(crate) fn active_lut(lut: &Option<Vec<DrmColorLut>>) -> Option<&[DrmColorLut]> {
    lut.as_deref().filter(|l| !l.is_empty())
}

pub(crate) fn check_size(
    slot: LutSlot,
    lut: &[DrmColorLut],
    accepted: &[usize],
) -> ColorResult<()> {
    if accepted.contains(&lut.len()) {
        return Ok(());
    }
    let expected = accepted
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    debug!(%slot, expected = %expected, got = lut.len(), "invalid LUT size");
    Err(ColorError::InvalidSize {
        slot,
        expected,
        got: lut.len(),
    })
}
