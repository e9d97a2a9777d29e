//! # Continuous Emitter Registry
//!
//! Time-driven repeating particle sources at movable anchors.
//!
//! Emitters fire on their first update, then every `interval`. The registry
//! only decides *when* and *where*; the particle system performs the burst.
//! A burst that spawns nothing because the pool is saturated still resets
//! the countdown.

use std::collections::BTreeMap;
use std::sync::Arc;

use tempest_shared::{Vec2, MS_PER_SECOND};
use tracing::debug;

use crate::descriptor::EffectDescriptor;
use crate::error::{ParticleError, ParticleResult};

/// Handle to a registered continuous emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(u32);

impl EmitterId {
    /// Raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A repeating particle source.
#[derive(Debug, Clone)]
pub struct ContinuousEmitter {
    /// Handle
    pub id: EmitterId,
    /// Current anchor
    pub position: Vec2,
    /// Template emitted each cycle
    pub effect: Arc<EffectDescriptor>,
    /// Seconds between bursts
    pub interval: f32,
    /// Seconds until the next burst
    pub countdown: f32,
    /// Whether the emitter is firing
    pub active: bool,
}

/// A burst that is due this tick.
#[derive(Debug, Clone)]
pub struct DueBurst {
    /// Emitter that fired
    pub emitter: EmitterId,
    /// Where to emit
    pub position: Vec2,
    /// What to emit
    pub effect: Arc<EffectDescriptor>,
}

/// Owns every continuous emitter.
#[derive(Debug, Default)]
pub struct EmitterRegistry {
    emitters: BTreeMap<EmitterId, ContinuousEmitter>,
    next_id: u32,
}

impl EmitterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an emitter firing every `interval_ms` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::InvalidConfig`] for a non-positive or
    /// non-finite interval.
    pub fn start(
        &mut self,
        position: Vec2,
        effect: Arc<EffectDescriptor>,
        interval_ms: f32,
    ) -> ParticleResult<EmitterId> {
        if !(interval_ms.is_finite() && interval_ms > 0.0) {
            return Err(ParticleError::InvalidConfig(format!(
                "emitter interval must be positive, got {interval_ms}"
            )));
        }

        self.next_id += 1;
        let id = EmitterId(self.next_id);
        debug!(emitter = id.0, effect = effect.name, interval_ms, "continuous emitter started");
        self.emitters.insert(
            id,
            ContinuousEmitter {
                id,
                position,
                effect,
                interval: interval_ms / MS_PER_SECOND,
                countdown: 0.0,
                active: true,
            },
        );
        Ok(id)
    }

    /// Moves an emitter's anchor. Unknown ids are ignored.
    pub fn update_position(&mut self, id: EmitterId, position: Vec2) {
        if let Some(emitter) = self.emitters.get_mut(&id) {
            emitter.position = position;
        }
    }

    /// Removes an emitter. Returns `false` if it was not registered.
    pub fn stop(&mut self, id: EmitterId) -> bool {
        let removed = self.emitters.remove(&id).is_some();
        if removed {
            debug!(emitter = id.0, "continuous emitter stopped");
        }
        removed
    }

    /// Looks up an emitter.
    #[must_use]
    pub fn get(&self, id: EmitterId) -> Option<&ContinuousEmitter> {
        self.emitters.get(&id)
    }

    /// Number of registered emitters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    /// Whether no emitters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Counts down every active emitter and collects the bursts that are due.
    pub fn advance(&mut self, dt: f32, due: &mut Vec<DueBurst>) {
        for emitter in self.emitters.values_mut().filter(|e| e.active) {
            emitter.countdown -= dt;
            if emitter.countdown <= 0.0 {
                due.push(DueBurst {
                    emitter: emitter.id,
                    position: emitter.position,
                    effect: Arc::clone(&emitter.effect),
                });
                emitter.countdown = emitter.interval;
            }
        }
    }

    /// Removes every emitter.
    pub fn clear(&mut self) {
        self.emitters.clear();
    }
}
