//! Device capabilities.
//!
//! Capabilities come from a YAML file, can be overridden from the
//! environment, and default to a device without 3D LUTs.
//!
//! # YAML
//!
//! ```yaml
//! num_3dluts: 1
//! has_rom: false
//! ```
//!
//! # Environment Variables
//!
//! - `KMS_COLOR_NUM_3DLUTS` - number of post-blend 3D LUT instances
//! - `KMS_COLOR_HAS_ROM` - ROM curves available ("1" or "true")

use std::env;
use std::path::Path;

use serde::Deserialize;

use crate::{ColorError, ColorResult};

/// Color capabilities of the display device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceCaps {
    /// Number of shaper + 3D LUT instances; 0 disables the feature.
    pub num_3dluts: u32,
    /// Predefined curves can come from ROM (older ASICs).
    pub has_rom: bool,
}

impl DeviceCaps {
    /// Creates capabilities with `num_3dluts` 3D LUT instances.
    pub fn new(num_3dluts: u32) -> Self {
        Self {
            num_3dluts,
            has_rom: false,
        }
    }

    /// Loads capabilities from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> ColorResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads capabilities from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> ColorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Applies `KMS_COLOR_*` environment overrides.
    pub fn with_env_overrides(self) -> ColorResult<Self> {
        self.with_overrides(
            env::var("KMS_COLOR_NUM_3DLUTS").ok().as_deref(),
            env::var("KMS_COLOR_HAS_ROM").ok().as_deref(),
        )
    }

    fn with_overrides(
        mut self,
        num_3dluts: Option<&str>,
        has_rom: Option<&str>,
    ) -> ColorResult<Self> {
        if let Some(v) = num_3dluts {
            self.num_3dluts = v.trim().parse().map_err(|_| {
                ColorError::Config(format!("KMS_COLOR_NUM_3DLUTS is not a count: {:?}", v))
            })?;
        }
        if let Some(v) = has_rom {
            self.has_rom = v == "1" || v.eq_ignore_ascii_case("true");
        }
        Ok(self)
    }

    /// Expected size of a 3D-path LUT: `full` with 3D LUT support, else 0.
    #[inline]
    pub fn lut3d_size(&self, full: usize) -> usize {
        if self.num_3dluts > 0 { full } else { 0 }
    }
}
