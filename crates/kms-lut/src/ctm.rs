//! Color transformation matrices.
//!
//! Userspace supplies a 3x3 matrix of S31.32 sign-magnitude numbers. The
//! gamut remap block wants a 3x4 matrix in 2's complement, with the fourth
//! (offset) column of every row zeroed:
//!
//! ```text
//! | c0 c1 c2 |      | c0 c1 c2 0 |
//! | c3 c4 c5 |  ->  | c3 c4 c5 0 |
//! | c6 c7 c8 |      | c6 c7 c8 0 |
//! ```

use kms_math::Fixed31_32;

use crate::{LutError, LutResult};

/// A userspace color transformation matrix (row-major, S31.32 sign-magnitude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrmColorCtm {
    /// Coefficients in row-major order
    pub matrix: [u64; 9],
}

impl DrmColorCtm {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        matrix: [1 << 32, 0, 0, 0, 1 << 32, 0, 0, 0, 1 << 32],
    };

    /// Encodes float rows into sign-magnitude S31.32.
    ///
    /// Fails if a coefficient isn't finite or its magnitude doesn't fit
    /// in 31 integer bits.
    ///
    /// ```rust
    /// use kms_lut::DrmColorCtm;
    ///
    /// let ctm = DrmColorCtm::from_rows([
    ///     [1.0, 0.0, 0.0],
    ///     [0.0, 1.0, 0.0],
    ///     [0.0, 0.0, 1.0],
    /// ]).unwrap();
    /// assert_eq!(ctm, DrmColorCtm::IDENTITY);
    /// ```
    pub fn from_rows(rows: [[f64; 3]; 3]) -> LutResult<Self> {
        let mut matrix = [0u64; 9];
        for (i, slot) in matrix.iter_mut().enumerate() {
            let v = rows[i / 3][i % 3];
            if !v.is_finite() || v.abs() >= (1u64 << 31) as f64 {
                return Err(LutError::InvalidValue(format!(
                    "CTM coefficient [{}][{}] = {} is outside S31.32",
                    i / 3,
                    i % 3,
                    v
                )));
            }
            let magnitude = (v.abs() * (1u64 << 32) as f64).round() as u64;
            *slot = if v.is_sign_negative() && magnitude != 0 {
                magnitude | (1 << 63)
            } else {
                magnitude
            };
        }
        Ok(Self { matrix })
    }
}

/// A 3x4 gamut remap matrix and its enable flag.
///
/// When `enable_remap` is false the coefficients are ignored by hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMatrix {
    /// Row-major 3x4 coefficients; indices 3, 7 and 11 are always zero
    pub matrix: [Fixed31_32; 12],
    /// Whether the gamut remap block applies the matrix
    pub enable_remap: bool,
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::disabled()
    }
}

impl ColorMatrix {
    /// A bypassed matrix stage.
    pub const fn disabled() -> Self {
        Self {
            matrix: [Fixed31_32::ZERO; 12],
            enable_remap: false,
        }
    }

    /// Converts a userspace CTM into an enabled gamut remap matrix.
    ///
    /// Sign-magnitude coefficients are translated to 2's complement, not
    /// reinterpreted.
    ///
    /// ```rust
    /// use kms_lut::{ColorMatrix, DrmColorCtm};
    ///
    /// let m = ColorMatrix::from_ctm(&DrmColorCtm::IDENTITY);
    /// assert!(m.enable_remap);
    /// assert_eq!(m.get(1, 1).to_f64(), 1.0);
    /// assert_eq!(m.get(1, 3).to_f64(), 0.0);
    /// ```
    pub fn from_ctm(ctm: &DrmColorCtm) -> Self {
        let mut matrix = [Fixed31_32::ZERO; 12];
        for (i, slot) in matrix.iter_mut().enumerate() {
            // Offset column stays zero
            if i % 4 == 3 {
                continue;
            }
            *slot = Fixed31_32::from_s3132(ctm.matrix[i - i / 4]);
        }
        Self {
            matrix,
            enable_remap: true,
        }
    }

    /// Returns the coefficient at (`row`, `col`), `col` in `0..4`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Fixed31_32 {
        self.matrix[row * 4 + col]
    }
}
