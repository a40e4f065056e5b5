//! LUT codec error types.

use thiserror::Error;

/// Result type for LUT codec operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while converting LUTs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LutError {
    /// LUT entry count doesn't match the supported cardinality.
    #[error("invalid LUT size: expected {expected}, got {got}")]
    InvalidSize {
        /// Supported entry count
        expected: usize,
        /// Supplied entry count
        got: usize,
    },

    /// A value can't be represented in the target encoding.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}
