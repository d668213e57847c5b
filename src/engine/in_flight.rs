// src/engine/in_flight.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of cycles currently running.
///
/// Cloning shares the counter.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one cycle as started. The count drops again when the guard is
    /// dropped, including when the cycle panics.
    pub fn enter(&self) -> InFlightGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(Arc::clone(&self.0))
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_idle(&self) -> bool {
        self.count() == 0
    }
}

#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
