//! Transfer-function selectors and their hardware curve identifiers.
//!
//! Userspace picks a curve with a [`DrmTransferFunction`] property value;
//! the display hardware knows a fixed set of [`PredefinedTf`] curves.
//! [`resolve`] is the total mapping between the two: unknown and default
//! selectors resolve to [`PredefinedTf::Linear`].

use crate::{bt709, gamma, hlg, pq, srgb};

/// Transfer-function selector exposed on planes and CRTCs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DrmTransferFunction {
    /// No explicit selection
    #[default]
    Default,
    /// sRGB piecewise curve
    Srgb,
    /// BT.709 curve
    Bt709,
    /// SMPTE ST 2084
    Pq,
    /// Identity
    Linear,
    /// Identity with unity scaling
    Unity,
    /// Hybrid Log-Gamma
    Hlg,
    /// Pure gamma 2.2
    Gamma22,
    /// Pure gamma 2.4
    Gamma24,
    /// Pure gamma 2.6
    Gamma26,
}

impl DrmTransferFunction {
    /// Decodes a raw property value. Unknown values decode to `Default`.
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => Self::Srgb,
            2 => Self::Bt709,
            3 => Self::Pq,
            4 => Self::Linear,
            5 => Self::Unity,
            6 => Self::Hlg,
            7 => Self::Gamma22,
            8 => Self::Gamma24,
            9 => Self::Gamma26,
            _ => Self::Default,
        }
    }

    /// Parses a lowercase name such as `"srgb"` or `"gamma22"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "default" => Self::Default,
            "srgb" => Self::Srgb,
            "bt709" => Self::Bt709,
            "pq" => Self::Pq,
            "linear" => Self::Linear,
            "unity" => Self::Unity,
            "hlg" => Self::Hlg,
            "gamma22" => Self::Gamma22,
            "gamma24" => Self::Gamma24,
            "gamma26" => Self::Gamma26,
            _ => return None,
        })
    }
}

/// Predefined curves the hardware color blocks can represent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PredefinedTf {
    /// sRGB
    Srgb,
    /// BT.709
    Bt709,
    /// PQ
    Pq,
    /// Identity
    #[default]
    Linear,
    /// Identity with unity scaling
    Unity,
    /// HLG
    Hlg,
    /// Gamma 2.2
    Gamma22,
    /// Gamma 2.4
    Gamma24,
    /// Gamma 2.6
    Gamma26,
}

/// Maps a userspace selector to a hardware curve. Never fails.
///
/// ```rust
/// use kms_transfer::{resolve, DrmTransferFunction, PredefinedTf};
///
/// assert_eq!(resolve(DrmTransferFunction::Pq), PredefinedTf::Pq);
/// assert_eq!(resolve(DrmTransferFunction::Default), PredefinedTf::Linear);
/// ```
pub fn resolve(tf: DrmTransferFunction) -> PredefinedTf {
    match tf {
        DrmTransferFunction::Default | DrmTransferFunction::Linear => PredefinedTf::Linear,
        DrmTransferFunction::Srgb => PredefinedTf::Srgb,
        DrmTransferFunction::Bt709 => PredefinedTf::Bt709,
        DrmTransferFunction::Pq => PredefinedTf::Pq,
        DrmTransferFunction::Unity => PredefinedTf::Unity,
        DrmTransferFunction::Hlg => PredefinedTf::Hlg,
        DrmTransferFunction::Gamma22 => PredefinedTf::Gamma22,
        DrmTransferFunction::Gamma24 => PredefinedTf::Gamma24,
        DrmTransferFunction::Gamma26 => PredefinedTf::Gamma26,
    }
}

impl PredefinedTf {
    /// Decodes an encoded value to linear (degamma direction).
    pub fn eotf(self, v: f32) -> f32 {
        match self {
            Self::Srgb => srgb::eotf(v),
            Self::Bt709 => bt709::eotf(v),
            Self::Pq => pq::eotf(v),
            Self::Hlg => hlg::eotf(v),
            Self::Gamma22 => gamma::eotf(v, 2.2),
            Self::Gamma24 => gamma::eotf(v, 2.4),
            Self::Gamma26 => gamma::eotf(v, 2.6),
            Self::Linear | Self::Unity => v,
        }
    }

    /// Encodes a linear value (regamma direction).
    pub fn inverse_eotf(self, l: f32) -> f32 {
        match self {
            Self::Srgb => srgb::oetf(l),
            Self::Bt709 => bt709::oetf(l),
            Self::Pq => pq::oetf(l),
            Self::Hlg => hlg::oetf(l),
            Self::Gamma22 => gamma::oetf(l, 2.2),
            Self::Gamma24 => gamma::oetf(l, 2.4),
            Self::Gamma26 => gamma::oetf(l, 2.6),
            Self::Linear | Self::Unity => l,
        }
    }

    /// Short lowercase name, as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::Bt709 => "bt709",
            Self::Pq => "pq",
            Self::Linear => "linear",
            Self::Unity => "unity",
            Self::Hlg => "hlg",
            Self::Gamma22 => "gamma22",
            Self::Gamma24 => "gamma24",
            Self::Gamma26 => "gamma26",
        }
    }
}

impl std::fmt::Display for PredefinedTf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
