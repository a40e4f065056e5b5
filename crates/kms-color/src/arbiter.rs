//! Ownership of the shaper + 3D LUT pair held by an output.
//!
//! An output holds at most one pair. [`reconcile`] moves it between
//! holding and not holding, so "holds a shaper" and "holds a 3D LUT" can
//! never disagree: both live in one [`ShaperLut3d`] value.

use std::sync::Arc;

use kms_lut::Lut3dTable;
use tracing::debug;

use crate::curve::TransferFunc;
use crate::pool::{Lut3dLease, Lut3dPool};
use crate::{ColorError, ColorResult};

/// A shaper curve and 3D LUT held together from the pool.
#[derive(Debug)]
pub struct ShaperLut3d {
    /// Shaper programmed ahead of the 3D LUT
    pub shaper: TransferFunc,
    /// 3D LUT contents
    pub lut3d: Lut3dTable,
    lease: Lut3dLease,
}

impl ShaperLut3d {
    fn new(lease: Lut3dLease) -> Self {
        Self {
            shaper: TransferFunc::bypass(),
            lut3d: Lut3dTable::default(),
            lease,
        }
    }

    /// The pool instance backing this pair.
    pub fn lease(&self) -> &Lut3dLease {
        &self.lease
    }
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A pair was taken from the pool
    Acquired,
    /// The held pair went back to the pool
    Released,
    /// Nothing changed
    Unchanged,
}

/// Brings `slot` in line with `want`.
///
/// Acquires a pair when one is wanted and none is held, releases the held
/// pair when none is wanted, and does nothing otherwise. Fails only when a
/// pair is wanted and the pool is empty, leaving `slot` empty.
pub fn reconcile(
    pool: &Arc<Lut3dPool>,
    want: bool,
    slot: &mut Option<ShaperLut3d>,
) -> ColorResult<Transition> {
    match (want, slot.is_some()) {
        (true, false) => {
            let lease = pool.try_acquire().ok_or_else(|| {
                debug!(capacity = pool.capacity(), "no free shaper/3D LUT instance");
                ColorError::ResourceExhausted {
                    capacity: pool.capacity(),
                }
            })?;
            let pair = slot.insert(ShaperLut3d::new(lease));
            let pool = pair.lease().pool();
            debug!(free = pool.free(), capacity = pool.capacity(), "shaper/3D LUT acquired");
            Ok(Transition::Acquired)
        }
        (false, true) => {
            *slot = None;
            debug!(free = pool.free(), capacity = pool.capacity(), "shaper/3D LUT released");
            Ok(Transition::Released)
        }
        _ => Ok(Transition::Unchanged),
    }
}
