//! # Simulation Context
//!
//! Owns the particle system and the hazard field and steps them together.
//!
//! ```text
//! update(dt seconds):
//! ┌──────────────────────────────────────────────────────────┐
//! │ 1. HAZARDS   expire, move area emitters, interaction     │
//! │              scans (dt in ms, real-time rules on Clock)  │
//! │ 2. PARTICLES age, forces, collisions, chains, emitters   │
//! │ 3. FRAME     counter and elapsed time                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each context is independent: no global particle system, no shared clock.

use tempest_hazards::{
    DamageTarget, EventReceiver, Hazard, HazardField, HazardId, HazardStats, HazardType,
    NearbyHazards, StatsOverride,
};
use tempest_particles::{
    ChainEffect, Effect, ParticleLink, ParticleSnapshot, ParticleStats, ParticleSystem,
};
use tempest_shared::{Clock, SystemClock, Vec2, MS_PER_SECOND};
use tracing::trace;

use crate::config::SimulationConfig;
use crate::error::SimulationResult;

/// Overlay data for one hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardSnapshot {
    /// Handle
    pub id: HazardId,
    /// Centre of the damage area
    pub position: Vec2,
    /// Type fixed at creation
    pub hazard_type: HazardType,
    /// Current stats
    pub stats: HazardStats,
    /// Area effect identity
    pub effect: Effect,
}

impl From<&Hazard> for HazardSnapshot {
    fn from(hazard: &Hazard) -> Self {
        Self {
            id: hazard.id(),
            position: hazard.position(),
            hazard_type: hazard.hazard_type(),
            stats: *hazard.stats(),
            effect: hazard.particle_effect(),
        }
    }
}

/// Everything a renderer needs for one frame, taken at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSnapshot {
    /// Frames stepped so far
    pub frame: u64,
    /// Live particles
    pub particles: Vec<ParticleSnapshot>,
    /// Chain-link segments
    pub links: Vec<ParticleLink>,
    /// Branch-tree polylines
    pub chains: Vec<ChainEffect>,
    /// Active hazards
    pub hazards: Vec<HazardSnapshot>,
    /// Particle statistics of the last frame
    pub stats: ParticleStats,
}

/// Particle system and hazard field stepped as one unit.
#[derive(Debug)]
pub struct Simulation {
    particles: ParticleSystem,
    hazards: HazardField,
    frame: u64,
    elapsed: f32,
}

impl Simulation {
    /// Creates a context on the wall clock.
    ///
    /// # Errors
    ///
    /// Returns a validation error from either subsystem.
    pub fn new(config: &SimulationConfig) -> SimulationResult<Self> {
        Self::with_clock(config, SystemClock::new())
    }

    /// Creates a context whose real-time rules read `clock`.
    ///
    /// # Errors
    ///
    /// Returns a validation error from either subsystem.
    pub fn with_clock(config: &SimulationConfig, clock: impl Clock + 'static) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self {
            particles: ParticleSystem::new(&config.particles)?,
            hazards: HazardField::new(&config.hazards, clock)?,
            frame: 0,
            elapsed: 0.0,
        })
    }

    // =========================================================================
    // FRAME
    // =========================================================================

    /// Advances hazards, then particles, by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Propagates an emitter rejected by the particle system.
    pub fn update(&mut self, dt: f32) -> SimulationResult<()> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.hazards.update(dt * MS_PER_SECOND, &mut self.particles)?;
        self.particles.update(dt);
        self.frame += 1;
        self.elapsed += dt;
        trace!(
            frame = self.frame,
            particles = self.particles.active_count(),
            emitters = self.particles.emitter_count(),
            "frame stepped"
        );
        Ok(())
    }

    /// Copies out the renderable state of the current frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            particles: self.particles.particles(),
            links: self.particles.particle_links(),
            chains: self.particles.chain_effects(),
            hazards: self.hazards.active().map(HazardSnapshot::from).collect(),
            stats: self.particles.stats(),
        }
    }

    /// Frames stepped so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds so far.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    // =========================================================================
    // PARTICLES
    // =========================================================================

    /// One-shot burst of a catalog effect. Returns the number spawned.
    pub fn emit(&mut self, effect: Effect, position: Vec2) -> usize {
        self.particles.emit(effect, position)
    }

    /// The particle system.
    #[must_use]
    pub const fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// The particle system, for direct emitter control.
    pub fn particles_mut(&mut self) -> &mut ParticleSystem {
        &mut self.particles
    }

    // =========================================================================
    // HAZARDS
    // =========================================================================

    /// The hazard field.
    #[must_use]
    pub const fn hazards(&self) -> &HazardField {
        &self.hazards
    }

    /// Spawns a hazard with its base emitter.
    ///
    /// # Errors
    ///
    /// Propagates an emitter rejected by the particle system.
    pub fn spawn_hazard(
        &mut self,
        position: Vec2,
        hazard_type: HazardType,
        overrides: &StatsOverride,
    ) -> SimulationResult<HazardId> {
        Ok(self
            .hazards
            .spawn(&mut self.particles, position, hazard_type, overrides)?)
    }

    /// Fuses `other` into `survivor`. Returns whether they combined.
    ///
    /// # Errors
    ///
    /// Returns an error for a foreign handle.
    pub fn combine(&mut self, survivor: HazardId, other: HazardId) -> SimulationResult<bool> {
        Ok(self.hazards.try_combine(survivor, other, &mut self.particles)?)
    }

    /// Moves a hazard.
    ///
    /// # Errors
    ///
    /// Returns an error for a foreign handle.
    pub fn move_hazard(&mut self, id: HazardId, position: Vec2) -> SimulationResult<()> {
        Ok(self.hazards.set_position(id, position)?)
    }

    /// Deactivates a hazard and its absorbed partner.
    ///
    /// # Errors
    ///
    /// Returns an error for a foreign handle.
    pub fn deactivate_hazard(&mut self, id: HazardId) -> SimulationResult<()> {
        Ok(self.hazards.deactivate(id, &mut self.particles)?)
    }

    /// Reactivates a hazard with its base emitter.
    ///
    /// # Errors
    ///
    /// Returns an error for a foreign handle.
    pub fn activate_hazard(&mut self, id: HazardId) -> SimulationResult<()> {
        Ok(self.hazards.activate(id, &mut self.particles)?)
    }

    /// Damages `target` if the hazard allows it. Returns whether it hit.
    pub fn apply_damage<T: DamageTarget + ?Sized>(&mut self, id: HazardId, target: &mut T) -> bool {
        self.hazards.apply_damage(id, &mut self.particles, target)
    }

    /// Whether `point` is inside an active hazard.
    #[must_use]
    pub fn check_collision(&self, id: HazardId, point: Vec2) -> bool {
        self.hazards.check_collision(id, point)
    }

    /// Installs the spatial query that enables interactions.
    pub fn set_nearby_query(&mut self, query: impl NearbyHazards + 'static) {
        self.hazards.set_nearby_query(query);
    }

    /// A receiver for hazard events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.hazards.subscribe()
    }
}
