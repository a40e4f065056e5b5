//! Shared pool of shaper + 3D LUT hardware instances.
//!
//! The device has a fixed number of post-blend 3D LUT blocks, each paired
//! with a shaper. Outputs take one with [`Lut3dPool::try_acquire`] and give
//! it back by dropping the [`Lut3dLease`]. The free count is a single atomic,
//! so outputs updated from different threads never oversubscribe the pool.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::trace;

/// Capacity-bounded pool of shaper + 3D LUT instances.
#[derive(Debug)]
pub struct Lut3dPool {
    capacity: usize,
    free: AtomicUsize,
}

impl Lut3dPool {
    /// Creates a pool with `capacity` free instances.
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            capacity,
            free: AtomicUsize::new(capacity),
        })
    }

    /// Takes a free instance, or returns `None` if all are in use.
    pub fn try_acquire(self: &Arc<Self>) -> Option<Lut3dLease> {
        self.free
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |free| free.checked_sub(1))
            .ok()
            .map(|prev| {
                trace!(free = prev - 1, capacity = self.capacity, "pool::acquire");
                Lut3dLease {
                    pool: Arc::clone(self),
                }
            })
    }

    /// Total number of instances.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instances not currently leased.
    #[inline]
    pub fn free(&self) -> usize {
        self.free.load(Ordering::Acquire)
    }

    fn release(&self) {
        let prev = self.free.fetch_add(1, Ordering::AcqRel);
        assert!(
            prev < self.capacity,
            "3D LUT pool over-released ({} free of {})",
            prev + 1,
            self.capacity
        );
        trace!(free = prev + 1, capacity = self.capacity, "pool::release");
    }
}

/// Exclusive hold on one pool instance; returned to the pool on drop.
#[derive(Debug)]
pub struct Lut3dLease {
    pool: Arc<Lut3dPool>,
}

impl Lut3dLease {
    /// The pool this lease came from.
    pub fn pool(&self) -> &Arc<Lut3dPool> {
        &self.pool
    }
}

impl Drop for Lut3dLease {
    fn drop(&mut self) {
        self.pool.release();
    }
}
