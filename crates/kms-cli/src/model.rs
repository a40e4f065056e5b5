//! YAML commit description.
//!
//! ```yaml
//! crtc:
//!   degamma: { gamma: { size: 4096, exponent: 2.2 } }
//!   gamma: { identity: 256 }
//!   ctm: [[1, 0, 0], [0, 1, 0], [0, 0, 1]]
//!   regamma_tf: pq
//!   shaper: { identity: 4096 }
//!   lut3d: { cube: 17 }
//! planes:
//!   - format: nv12
//!     degamma_tf: bt709
//!     hdr_mult: 1.0
//! ```
//!
//! A LUT is given by exactly one of `identity: N`, `gamma: {size, exponent}`,
//! `cube: N` (N^3 identity 3D LUT) or `entries: [[r, g, b], ...]`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use kms_color::{CrtcColorProps, PlaneColorProps, SurfacePixelFormat, HDR_MULT_DEFAULT};
use kms_lut::{gamma_ramp, identity_ramp, DrmColorCtm, DrmColorLut, MAX_DRM_LUT_VALUE};
use kms_math::Fixed31_32;
use kms_transfer::DrmTransferFunction;
use serde::Deserialize;

/// One commit: an output and the planes on it.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Commit {
    pub crtc: CrtcDesc,
    pub planes: Vec<PlaneDesc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrtcDesc {
    pub degamma: Option<LutDesc>,
    pub gamma: Option<LutDesc>,
    pub shaper: Option<LutDesc>,
    pub lut3d: Option<LutDesc>,
    pub ctm: Option<[[f64; 3]; 3]>,
    pub regamma_tf: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaneDesc {
    pub format: Option<String>,
    pub degamma: Option<LutDesc>,
    pub degamma_tf: Option<String>,
    pub hdr_mult: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LutDesc {
    pub identity: Option<usize>,
    pub gamma: Option<GammaDesc>,
    pub cube: Option<usize>,
    pub entries: Option<Vec<[u16; 3]>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GammaDesc {
    pub size: usize,
    pub exponent: f64,
}

impl Commit {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid commit description")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    pub fn crtc_props(&self) -> Result<CrtcColorProps> {
        let c = &self.crtc;
        Ok(CrtcColorProps {
            degamma_lut: build_opt(&c.degamma).context("crtc.degamma")?,
            gamma_lut: build_opt(&c.gamma).context("crtc.gamma")?,
            shaper_lut: build_opt(&c.shaper).context("crtc.shaper")?,
            lut3d: build_opt(&c.lut3d).context("crtc.lut3d")?,
            ctm: c
                .ctm
                .map(DrmColorCtm::from_rows)
                .transpose()
                .context("crtc.ctm")?,
            regamma_tf: parse_tf(c.regamma_tf.as_deref())?,
        })
    }

    pub fn plane_props(&self) -> Result<Vec<PlaneColorProps>> {
        self.planes
            .iter()
            .enumerate()
            .map(|(i, p)| p.props().with_context(|| format!("planes[{}]", i)))
            .collect()
    }
}

impl PlaneDesc {
    fn props(&self) -> Result<PlaneColorProps> {
        let format = match self.format.as_deref() {
            Some(name) => SurfacePixelFormat::from_name(name)
                .with_context(|| format!("Unknown surface format: {}", name))?,
            None => SurfacePixelFormat::default(),
        };
        let hdr_mult = match self.hdr_mult {
            Some(v) if !v.is_finite() || v.abs() >= (1u64 << 31) as f64 => {
                bail!("hdr_mult {} is outside S31.32", v)
            }
            Some(v) => Fixed31_32::from_f64(v).to_s3132(),
            None => HDR_MULT_DEFAULT,
        };
        Ok(PlaneColorProps {
            format,
            degamma_lut: build_opt(&self.degamma).context("degamma")?,
            degamma_tf: parse_tf(self.degamma_tf.as_deref())?,
            hdr_mult,
        })
    }
}

impl LutDesc {
    /// Expands the description into LUT entries.
    pub fn build(&self) -> Result<Vec<DrmColorLut>> {
        let given = [
            self.identity.is_some(),
            self.gamma.is_some(),
            self.cube.is_some(),
            self.entries.is_some(),
        ];
        if given.iter().filter(|g| **g).count() != 1 {
            bail!("A LUT needs exactly one of identity, gamma, cube or entries");
        }

        if let Some(size) = self.identity {
            return Ok(identity_ramp(size));
        }
        if let Some(g) = &self.gamma {
            if !g.exponent.is_finite() || g.exponent <= 0.0 {
                bail!("Gamma exponent must be positive, got {}", g.exponent);
            }
            return Ok(gamma_ramp(g.size, g.exponent));
        }
        if let Some(n) = self.cube {
            return identity_cube(n);
        }
        Ok(self
            .entries
            .iter()
            .flatten()
            .map(|&[r, g, b]| DrmColorLut::new(r, g, b))
            .collect())
    }
}

fn build_opt(desc: &Option<LutDesc>) -> Result<Option<Vec<DrmColorLut>>> {
    desc.as_ref().map(LutDesc::build).transpose()
}

fn parse_tf(name: Option<&str>) -> Result<DrmTransferFunction> {
    match name {
        Some(name) => DrmTransferFunction::from_name(name)
            .with_context(|| format!("Unknown transfer function: {}", name)),
        None => Ok(DrmTransferFunction::Default),
    }
}

/// N^3 identity 3D LUT, red slowest.
fn identity_cube(n: usize) -> Result<Vec<DrmColorLut>> {
    if n < 2 {
        bail!("A cube needs at least 2 points per axis, got {}", n);
    }
    let last = (n - 1) as u64;
    let level = |i: usize| (i as u64 * MAX_DRM_LUT_VALUE as u64 / last) as u16;
    let mut lut = Vec::with_capacity(n * n * n);
    for r in 0..n {
        for g in 0..n {
            for b in 0..n {
                lut.push(DrmColorLut::new(level(r), level(g), level(b)));
            }
        }
    }
    Ok(lut)
}
