//! # Shared Simulation Handle
//!
//! For hosts that step the simulation on one thread and read it on others.
//!
//! ```text
//!  sim thread                 render / audio threads
//!  ──────────                 ──────────────────────
//!  lock ── update(dt) ── unlock
//!                             lock ── snapshot() ── unlock
//!  lock ── update(dt) ── unlock
//! ```
//!
//! Every update runs inside one critical section, so a reader sees the
//! state before or after a frame, never in between.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::SimulationResult;
use crate::simulation::{FrameSnapshot, Simulation};

/// Cloneable, thread-safe handle to one [`Simulation`].
#[derive(Debug, Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    /// Wraps a simulation.
    #[must_use]
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    /// Steps the simulation by `dt` seconds under the lock.
    ///
    /// # Errors
    ///
    /// Propagates [`Simulation::update`] errors.
    pub fn update(&self, dt: f32) -> SimulationResult<()> {
        self.inner.lock().update(dt)
    }

    /// Copies out the current frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        self.inner.lock().snapshot()
    }

    /// Runs `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Simulation) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Exclusive access until the guard drops.
    pub fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.inner.lock()
    }
}
