//! Hardware 3D LUT layout.
//!
//! The post-blend 3D LUT block takes a 17x17x17 cube in four interleaved
//! sub-tables for tetrahedral interpolation. Entry `i` of the flat userspace
//! table goes to sub-table `i % 4` at position `i / 4`. Since 4913 isn't
//! divisible by four, `lut0` carries one extra entry:
//!
//! ```text
//! lut0: 1229 entries   (0, 4, 8, ..., 4912)
//! lut1: 1228 entries   (1, 5, 9, ..., 4909)
//! lut2: 1228 entries   (2, 6, 10, ..., 4910)
//! lut3: 1228 entries   (3, 7, 11, ..., 4911)
//! ```

use crate::{extract, DrmColorLut, LutError, LutResult, MAX_COLOR_3DLUT_ENTRIES};

/// Channel bit depth programmed into the 3D LUT.
pub const LUT3D_BIT_DEPTH: u32 = 12;

/// Size of sub-tables 1..=3; sub-table 0 holds one more.
pub const LUT3D_SUBTABLE_SIZE: usize = MAX_COLOR_3DLUT_ENTRIES / 4;

/// One 3D LUT entry at hardware precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DcRgb {
    /// Red channel
    pub red: u32,
    /// Green channel
    pub green: u32,
    /// Blue channel
    pub blue: u32,
}

impl DcRgb {
    fn from_drm(e: &DrmColorLut, bits: u32) -> Self {
        Self {
            red: extract(e.red, bits),
            green: extract(e.green, bits),
            blue: extract(e.blue, bits),
        }
    }
}

/// A 17x17x17 3D LUT split for tetrahedral interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut3dTable {
    /// Entries `0, 4, 8, ...`
    pub lut0: Vec<DcRgb>,
    /// Entries `1, 5, 9, ...`
    pub lut1: Vec<DcRgb>,
    /// Entries `2, 6, 10, ...`
    pub lut2: Vec<DcRgb>,
    /// Entries `3, 7, 11, ...`
    pub lut3: Vec<DcRgb>,
    /// 9x9x9 mode; always false for 17-point cubes
    pub use_tetrahedral_9: bool,
    /// 12-bit entries instead of 10-bit
    pub use_12bits: bool,
    /// Table holds programmed data
    pub initialized: bool,
}

impl Default for Lut3dTable {
    fn default() -> Self {
        Self {
            lut0: Vec::new(),
            lut1: Vec::new(),
            lut2: Vec::new(),
            lut3: Vec::new(),
            use_tetrahedral_9: false,
            use_12bits: true,
            initialized: false,
        }
    }
}

impl Lut3dTable {
    /// Splits a flat userspace 3D LUT into hardware sub-tables.
    ///
    /// Only 17x17x17 cubes ([`MAX_COLOR_3DLUT_ENTRIES`] entries) are
    /// supported; channels are reduced to [`LUT3D_BIT_DEPTH`] bits.
    ///
    /// ```rust
    /// use kms_lut::{DrmColorLut, Lut3dTable, MAX_COLOR_3DLUT_ENTRIES};
    ///
    /// let lut = vec![DrmColorLut::gray(0xFFFF); MAX_COLOR_3DLUT_ENTRIES];
    /// let table = Lut3dTable::from_drm(&lut).unwrap();
    /// assert_eq!(table.lut0.len(), 1229);
    /// assert_eq!(table.lut3.len(), 1228);
    /// assert_eq!(table.lut0[0].red, 0xFFF);
    /// ```
    pub fn from_drm(lut: &[DrmColorLut]) -> LutResult<Self> {
        if lut.len() != MAX_COLOR_3DLUT_ENTRIES {
            return Err(LutError::InvalidSize {
                expected: MAX_COLOR_3DLUT_ENTRIES,
                got: lut.len(),
            });
        }

        let mut table = Self {
            lut0: Vec::with_capacity(LUT3D_SUBTABLE_SIZE + 1),
            lut1: Vec::with_capacity(LUT3D_SUBTABLE_SIZE),
            lut2: Vec::with_capacity(LUT3D_SUBTABLE_SIZE),
            lut3: Vec::with_capacity(LUT3D_SUBTABLE_SIZE),
            use_tetrahedral_9: false,
            use_12bits: true,
            initialized: true,
        };

        for (i, entry) in lut.iter().enumerate() {
            let rgb = DcRgb::from_drm(entry, LUT3D_BIT_DEPTH);
            match i % 4 {
                0 => table.lut0.push(rgb),
                1 => table.lut1.push(rgb),
                2 => table.lut2.push(rgb),
                _ => table.lut3.push(rgb),
            }
        }

        Ok(table)
    }

    /// Iterates the entries back in flat (interleaved) order.
    pub fn iter_flat(&self) -> impl Iterator<Item = &DcRgb> + '_ {
        let subs = [&self.lut0, &self.lut1, &self.lut2, &self.lut3];
        let total = subs.iter().map(|s| s.len()).sum::<usize>();
        (0..total).filter_map(move |i| subs[i % 4].get(i / 4))
    }
}
