//! Curve fitting: turning a curve request into hardware sampled points.
//!
//! The pipeline configurator never evaluates curves itself. It describes
//! what it wants in a [`FitRequest`] and hands it to a [`CurveFitter`],
//! which returns a [`SampledCurve`] or fails.
//!
//! Two fitting modes exist:
//!
//! - **regamma** - encode linear light with the base curve, then map the
//!   result through the user ramp
//! - **degamma** - decode with the base curve, then map through the user
//!   ramp
//!
//! [`ReferenceFitter`] is a straightforward implementation over the curves
//! in this crate, sampled on a fixed hardware x-point distribution.

use kms_lut::GammaTable;
use kms_math::{sample_ramp, Fixed31_32};
use thiserror::Error;

use crate::PredefinedTf;

/// Result type for curve fitting.
pub type FitResult<T> = Result<T, FitError>;

/// Errors reported by a curve fitter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FitError {
    /// Working memory for the curve couldn't be allocated.
    #[error("failed to allocate {points} curve points")]
    Allocation {
        /// Points requested
        points: usize,
    },

    /// A user ramp was requested but none (or an empty one) was given.
    #[error("user ramp mapping requested without ramp data")]
    EmptyRamp,
}

/// Parameters of one fit.
#[derive(Debug, Clone, Copy)]
pub struct FitRequest<'a> {
    /// Base curve
    pub tf: PredefinedTf,
    /// User ramp, if any
    pub ramp: Option<&'a GammaTable>,
    /// Apply `ramp` on top of the base curve
    pub map_user_ramp: bool,
    /// Hardware has ROM curves for predefined descriptors
    pub can_rom: bool,
}

impl<'a> FitRequest<'a> {
    /// A fit of `tf` alone, no user ramp.
    pub fn predefined(tf: PredefinedTf) -> Self {
        Self {
            tf,
            ramp: None,
            map_user_ramp: false,
            can_rom: false,
        }
    }

    /// A fit of `tf` with `ramp` mapped on top.
    pub fn with_ramp(tf: PredefinedTf, ramp: &'a GammaTable) -> Self {
        Self {
            tf,
            ramp: Some(ramp),
            map_user_ramp: true,
            can_rom: false,
        }
    }
}

/// Per-call scratch state for regamma fits.
///
/// Must start out unused ([`FitScratch::UNUSED`]) for every fit; it's
/// never carried from one fit to the next.
#[derive(Debug)]
pub struct FitScratch {
    /// Index of the prepared ramp, or [`FitScratch::UNUSED`]
    pub buffer_index: i32,
    /// Normalized user ramp, one vector per channel
    pub rgb_user: [Vec<f32>; 3],
}

impl FitScratch {
    /// Sentinel for a scratch buffer that holds nothing.
    pub const UNUSED: i32 = -1;

    /// A fresh, unused scratch buffer.
    pub fn new() -> Self {
        Self {
            buffer_index: Self::UNUSED,
            rgb_user: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Returns true if nothing has been prepared yet.
    #[inline]
    pub fn is_unused(&self) -> bool {
        self.buffer_index == Self::UNUSED
    }
}

impl Default for FitScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// A curve sampled at the fitter's hardware x-points.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    /// Output per x-point, as (R, G, B)
    pub points: Vec<[Fixed31_32; 3]>,
}

impl SampledCurve {
    /// Number of sampled points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the curve has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Fits hardware-representable curves.
pub trait CurveFitter {
    /// Fits a regamma (encoding) curve.
    fn fit_regamma(
        &self,
        request: &FitRequest<'_>,
        scratch: &mut FitScratch,
    ) -> FitResult<SampledCurve>;

    /// Fits a degamma (decoding) curve.
    fn fit_degamma(&self, request: &FitRequest<'_>) -> FitResult<SampledCurve>;
}

/// Number of exponentially sized regions below 1.0.
const NUM_REGIONS: i32 = 10;

/// Points per region.
const POINTS_PER_REGION: usize = 32;

/// Curve fitter over the reference curves of this crate.
///
/// Points are distributed per power-of-two region of the input, from
/// `2^-10` up to `1.0`, plus the end points 0 and 1, so dark values get as
/// many points as bright ones.
#[derive(Debug, Clone)]
pub struct ReferenceFitter {
    x_points: Vec<f32>,
}

impl ReferenceFitter {
    /// Creates a fitter and sets up its x-point distribution.
    pub fn new() -> Self {
        let mut x_points = Vec::with_capacity(NUM_REGIONS as usize * POINTS_PER_REGION + 2);
        x_points.push(0.0);
        for region in -NUM_REGIONS..0 {
            let start = 2f32.powi(region);
            let step = start / POINTS_PER_REGION as f32;
            x_points.extend((0..POINTS_PER_REGION).map(|k| start + step * k as f32));
        }
        x_points.push(1.0);
        Self { x_points }
    }

    /// The hardware x-point distribution.
    pub fn x_points(&self) -> &[f32] {
        &self.x_points
    }

    fn sample(
        &self,
        base: impl Fn(f32) -> f32,
        ramp: Option<&[Vec<f32>; 3]>,
    ) -> FitResult<SampledCurve> {
        let mut points = Vec::new();
        points
            .try_reserve_exact(self.x_points.len())
            .map_err(|_| FitError::Allocation {
                points: self.x_points.len(),
            })?;

        for &x in &self.x_points {
            let y = base(x);
            let rgb = match ramp {
                Some(ch) => [
                    sample_ramp(&ch[0], y),
                    sample_ramp(&ch[1], y),
                    sample_ramp(&ch[2], y),
                ],
                None => [y; 3],
            };
            points.push(rgb.map(Fixed31_32::from_f32));
        }

        Ok(SampledCurve { points })
    }
}

impl Default for ReferenceFitter {
    fn default() -> Self {
        Self::new()
    }
}

fn user_ramp<'a>(request: &FitRequest<'a>) -> FitResult<Option<&'a GammaTable>> {
    if !request.map_user_ramp {
        return Ok(None);
    }
    match request.ramp {
        Some(ramp) if !ramp.is_empty() => Ok(Some(ramp)),
        _ => Err(FitError::EmptyRamp),
    }
}

impl CurveFitter for ReferenceFitter {
    fn fit_regamma(
        &self,
        request: &FitRequest<'_>,
        scratch: &mut FitScratch,
    ) -> FitResult<SampledCurve> {
        let ramp = user_ramp(request)?;
        if let Some(ramp) = ramp {
            if scratch.is_unused() {
                scratch.rgb_user = ramp.normalized();
                scratch.buffer_index = 0;
            }
        }
        // ROM curves only back predefined descriptors, never sampled ones.
        let tf = request.tf;
        self.sample(|x| tf.inverse_eotf(x), ramp.map(|_| &scratch.rgb_user))
    }

    fn fit_degamma(&self, request: &FitRequest<'_>) -> FitResult<SampledCurve> {
        let normalized = user_ramp(request)?.map(GammaTable::normalized);
        let tf = request.tf;
        self.sample(|x| tf.eotf(x), normalized.as_ref())
    }
}
