//! Error types for color pipeline configuration.
//!
//! Every failure is reported synchronously and nothing is retried here; a
//! caller that gets an error rejects the whole commit.

use std::fmt;

use kms_transfer::FitError;
use thiserror::Error;

/// Result type for color pipeline operations.
pub type ColorResult<T> = Result<T, ColorError>;

/// The LUT property a size check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LutSlot {
    /// CRTC degamma LUT
    Degamma,
    /// CRTC gamma (regamma) LUT
    Gamma,
    /// CRTC shaper LUT
    Shaper,
    /// CRTC 3D LUT
    Lut3d,
    /// Plane degamma LUT
    PlaneDegamma,
}

impl fmt::Display for LutSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Degamma => "degamma",
            Self::Gamma => "gamma",
            Self::Shaper => "shaper",
            Self::Lut3d => "3D",
            Self::PlaneDegamma => "plane degamma",
        })
    }
}

/// Caller-facing error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Bad input; fix the request (EINVAL).
    InvalidArgument,
    /// Curve computation ran out of resources (ENOMEM).
    OutOfMemory,
    /// Request the device state shouldn't have allowed.
    UnexpectedState,
}

/// Color pipeline configuration error.
#[derive(Debug, Error)]
pub enum ColorError {
    /// A LUT's entry count doesn't match what its slot accepts.
    #[error("invalid {slot} LUT size: expected {expected}, got {got}")]
    InvalidSize {
        /// Offending slot
        slot: LutSlot,
        /// Accepted size(s)
        expected: String,
        /// Supplied size
        got: usize,
    },

    /// The curve fitter couldn't produce a curve.
    #[error("failed to compute {stage} curve: {source}")]
    ComputeFailure {
        /// Curve being built
        stage: &'static str,
        /// Fitter error
        #[source]
        source: FitError,
    },

    /// No free shaper/3D LUT instance in the pool.
    #[error("no free shaper/3D LUT instance (capacity {capacity})")]
    ResourceExhausted {
        /// Pool capacity
        capacity: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ColorError {
    /// Returns the caller-facing class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ComputeFailure { .. } => ErrorClass::OutOfMemory,
            Self::ResourceExhausted { .. } => ErrorClass::UnexpectedState,
            Self::InvalidSize { .. } | Self::Config(_) | Self::Io(_) | Self::Yaml(_) => {
                ErrorClass::InvalidArgument
            }
        }
    }

    pub(crate) fn compute(stage: &'static str) -> impl FnOnce(FitError) -> Self {
        move |source| {
            tracing::warn!(stage, error = %source, "curve fit failed");
            Self::ComputeFailure { stage, source }
        }
    }
}
