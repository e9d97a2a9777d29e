//! # Particle Simulator
//!
//! [`ParticleSystem`] owns the pool, the continuous emitters and the random
//! source, and advances everything in one `update(dt)` call per frame.
//!
//! ## Tick order
//!
//! 1. Snapshot every live particle's start-of-tick position and velocity
//! 2. Form, break and tension chain links against the snapshot
//! 3. Per particle: age and expire, integrate drift, gravity, turbulence and
//!    field forces, resolve collisions and wall bounces, update rotation,
//!    scale, opacity and colour, apply spring and flocking forces, advance
//!    branching
//! 4. Spawn collision sparks and branch children queued during step 3
//! 5. Fire due continuous emitters
//!
//! Interactions between particles (links, collisions, flocking, parent pull)
//! read the snapshot from step 1, never positions already moved this tick.

use std::f32::consts::TAU;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempest_shared::{ease_in_out_quad, Rgb, Vec2, MS_PER_SECOND};
use tracing::{debug, trace, warn};

use crate::catalog::Effect;
use crate::chains::{self, branch_noise, branch_velocity, parent_pull, roll_branch};
use crate::collision::{bounce_off_walls, resolve_contact, Bounds};
use crate::config::ParticleConfig;
use crate::descriptor::EffectDescriptor;
use crate::emitter::{ContinuousEmitter, DueBurst, EmitterId, EmitterRegistry};
use crate::error::ParticleResult;
use crate::forces::{field_force, flocking_force, turbulence, Neighbour};
use crate::particle::{Particle, ParticleId};
use crate::pattern::{initial_velocity, EmissionContext};
use crate::pool::ParticlePool;
use crate::snapshot::{ChainEffect, ParticleInstance, ParticleLink, ParticleSnapshot, ParticleStats};

/// Degrees per second of spin at the start of a particle's life.
pub const SPIN_DEGREES_PER_SECOND: f32 = 180.0;

/// Relative amplitude of the scale pulse.
pub const PULSE_AMPLITUDE: f32 = 0.2;

#[derive(Debug, Clone)]
struct PendingBranch {
    parent: ParticleId,
    position: Vec2,
    velocity: Vec2,
    level: usize,
    effect: Arc<EffectDescriptor>,
}

#[derive(Debug, Clone, Copy, Default)]
struct FrameCounters {
    spawned: u32,
    released: u32,
    dropped: u32,
}

/// The particle simulation context.
///
/// Explicitly constructed and owned; several systems can run side by side
/// without sharing state.
#[derive(Debug)]
pub struct ParticleSystem {
    pool: ParticlePool,
    emitters: EmitterRegistry,
    rng: ChaCha8Rng,
    bounds: Bounds,
    /// Seconds a particle must wait between collisions.
    collision_cooldown: f32,
    /// Simulation seconds since construction.
    elapsed: f32,
    spark: Arc<EffectDescriptor>,

    counters: FrameCounters,
    last_frame: FrameCounters,

    // Per-tick scratch, reused across frames
    snapshot: Vec<Neighbour>,
    flockers: Vec<Neighbour>,
    previous_positions: Vec<Option<Vec2>>,
    pending_sparks: Vec<Vec2>,
    pending_branches: Vec<PendingBranch>,
    due: Vec<DueBurst>,
    instances: Vec<ParticleInstance>,
}

impl ParticleSystem {
    /// Creates a system from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::InvalidConfig`](crate::ParticleError::InvalidConfig)
    /// when the configuration is rejected by [`ParticleConfig::validate`].
    pub fn new(config: &ParticleConfig) -> ParticleResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &ParticleConfig) -> Self {
        Self {
            pool: ParticlePool::new(config.pool_size, config.max_active),
            emitters: EmitterRegistry::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            bounds: Bounds {
                width: config.screen_width,
                height: config.screen_height,
            },
            collision_cooldown: config.collision_cooldown_ms / MS_PER_SECOND,
            elapsed: 0.0,
            spark: Effect::COLLISION_SPARK.descriptor(),
            counters: FrameCounters::default(),
            last_frame: FrameCounters::default(),
            snapshot: Vec::with_capacity(config.max_active),
            flockers: Vec::new(),
            previous_positions: vec![None; config.pool_size],
            pending_sparks: Vec::new(),
            pending_branches: Vec::new(),
            due: Vec::new(),
            instances: Vec::with_capacity(config.max_active),
        }
    }

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Emits one burst of `effect` at `position`.
    ///
    /// The burst is clamped to the remaining capacity; the excess is dropped.
    /// Returns the number of particles actually spawned.
    pub fn emit_particles(&mut self, position: Vec2, effect: &Arc<EffectDescriptor>) -> usize {
        let requested = effect.particle_count as usize;
        let count = requested.min(self.pool.remaining());
        let dropped = requested - count;
        if dropped > 0 {
            self.counters.dropped += dropped as u32;
            debug!(effect = effect.name, requested, dropped, "particle pool saturated");
        }

        let mut spawned = 0;
        for index in 0..count {
            let Some(id) = self.pool.acquire() else { break };
            let ctx = EmissionContext {
                index,
                total: count,
                elapsed: self.elapsed,
            };
            let velocity = initial_velocity(effect, ctx, &mut self.rng);
            self.init_particle(id, position, velocity, effect);
            spawned += 1;
        }
        spawned
    }

    /// Emits one burst of a catalog effect. Returns the number spawned.
    pub fn emit(&mut self, effect: Effect, position: Vec2) -> usize {
        self.emit_particles(position, &effect.descriptor())
    }

    /// Registers a continuous emitter firing every `interval_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::InvalidConfig`](crate::ParticleError::InvalidConfig)
    /// for a non-positive interval.
    pub fn start_continuous_emitter(
        &mut self,
        position: Vec2,
        effect: Arc<EffectDescriptor>,
        interval_ms: f32,
    ) -> ParticleResult<EmitterId> {
        self.emitters.start(position, effect, interval_ms)
    }

    /// Moves a continuous emitter. Unknown ids are ignored.
    pub fn update_emitter_position(&mut self, id: EmitterId, position: Vec2) {
        self.emitters.update_position(id, position);
    }

    /// Stops a continuous emitter. Returns `false` for an unknown id.
    pub fn stop_continuous_emitter(&mut self, id: EmitterId) -> bool {
        self.emitters.stop(id)
    }

    /// Sets the area used for wall bounces. Zero disables bounces.
    pub fn set_screen_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Bounds {
            width: width.max(0.0),
            height: height.max(0.0),
        };
    }

    /// Changes the active cap. Values above the pool size are clamped.
    /// Returns the cap applied.
    pub fn set_max_particles(&mut self, max_active: usize) -> usize {
        let applied = self.pool.set_max_active(max_active);
        if applied != max_active {
            warn!(requested = max_active, applied, "max particles clamped to pool size");
        }
        applied
    }

    /// Releases every particle and stops every emitter.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.emitters.clear();
        self.pending_sparks.clear();
        self.pending_branches.clear();
        self.counters = FrameCounters::default();
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Advances the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        self.capture_snapshot();
        chains::update_links(&mut self.pool, &self.snapshot);

        for i in 0..self.snapshot.len() {
            let id = self.snapshot[i].id;
            self.step_particle(id, dt);
        }

        self.flush_pending();

        let mut due = std::mem::take(&mut self.due);
        self.emitters.advance(dt, &mut due);
        for burst in due.drain(..) {
            self.emit_particles(burst.position, &burst.effect);
        }
        self.due = due;

        self.last_frame = std::mem::take(&mut self.counters);
        trace!(
            active = self.pool.active_count(),
            spawned = self.last_frame.spawned,
            released = self.last_frame.released,
            dropped = self.last_frame.dropped,
            emitters = self.emitters.len(),
            "particle tick"
        );
    }

    fn capture_snapshot(&mut self) {
        self.snapshot.clear();
        self.flockers.clear();
        self.previous_positions.fill(None);

        for (id, p) in self.pool.iter() {
            let entry = Neighbour {
                id,
                position: p.position,
                velocity: p.velocity,
                size: p.effect.size,
            };
            self.snapshot.push(entry);
            self.previous_positions[id.index()] = Some(p.position);
            if p.effect.flocking.is_some() {
                self.flockers.push(entry);
            }
        }
    }

    fn step_particle(&mut self, id: ParticleId, dt: f32) {
        let expired = match self.pool.get_mut(id) {
            Some(p) => {
                p.age += dt;
                p.age >= p.lifetime
            }
            None => return,
        };
        if expired {
            self.pool.release(id);
            self.counters.released += 1;
            return;
        }

        let Some(p) = self.pool.get_mut(id) else { return };
        let effect = Arc::clone(&p.effect);
        let progress = p.age / p.lifetime;
        let eased = ease_in_out_quad(progress);
        let previous = p.position;
        let me = Neighbour {
            id,
            position: previous,
            velocity: p.velocity,
            size: effect.size,
        };

        // Integration
        let drift = p.velocity * (1.0 - eased) + Vec2::new(0.0, effect.gravity * eased);
        p.position += drift * dt
            + turbulence(p.turbulence_offset, progress, dt)
            + field_force(&effect, previous, dt);

        // Collisions
        let since_last = p.last_collision.map(|t| self.elapsed - t);
        if let Some(hit) = resolve_contact(
            &me,
            &self.snapshot,
            effect.damping(),
            since_last,
            self.collision_cooldown,
        ) {
            p.velocity = hit.velocity;
            p.last_collision = Some(self.elapsed);
            p.collision_count += 1;
            if hit.is_significant() {
                self.pending_sparks.push(hit.contact);
            }
        }
        if effect.bounce_off_walls {
            bounce_off_walls(&mut p.position, &mut p.velocity, effect.size, self.bounds, effect.damping());
        }

        // Visual state
        p.rotation = (p.rotation + dt * SPIN_DEGREES_PER_SECOND * (1.0 - eased)).rem_euclid(360.0);
        let mut scale = effect.size * (1.0 - eased);
        if effect.pulse_scale {
            scale *= 1.0 + PULSE_AMPLITUDE * (2.0 * TAU * progress).sin();
        }
        p.scale = scale.max(0.0);
        p.opacity = (1.0 - progress).clamp(0.0, 1.0);
        if effect.color_transition {
            p.color = p.start_color.lerp(p.target_color, progress);
        }

        // Chain-link springs
        p.position += p.chain_force * dt;
        p.chain_force = Vec2::ZERO;

        // Flocking
        if let Some(flocking) = effect.flocking {
            p.flocking_force = flocking_force(&flocking, &me, &self.flockers, dt);
            p.position += p.flocking_force;
        }

        // Branching
        if let Some(branching) = effect.branching {
            p.segment_progress += dt;
            if roll_branch(&branching, p.branch_level, p.branch_children.len(), dt, &mut self.rng) {
                self.pending_branches.push(PendingBranch {
                    parent: id,
                    position: p.position,
                    velocity: branch_velocity(branching.kind, effect.speed, p.age, &mut self.rng),
                    level: p.branch_level + 1,
                    effect: Arc::clone(&effect),
                });
            }
            p.velocity += branch_noise(branching.noise_scale, effect.speed, dt, &mut self.rng);

            let parent_position = p
                .branch_parent
                .and_then(|parent| self.previous_positions.get(parent.index()).copied().flatten());
            if let Some(parent_position) = parent_position {
                p.position += parent_pull(p.position, parent_position, branching.segment_length);
            }
        }
    }

    fn flush_pending(&mut self) {
        let sparks = std::mem::take(&mut self.pending_sparks);
        for contact in &sparks {
            let spark = Arc::clone(&self.spark);
            self.emit_particles(*contact, &spark);
        }
        self.pending_sparks = sparks;
        self.pending_sparks.clear();

        let branches = std::mem::take(&mut self.pending_branches);
        for branch in &branches {
            if !self.pool.is_active(branch.parent) {
                continue;
            }
            let Some(child) = self.pool.acquire() else {
                self.counters.dropped += 1;
                continue;
            };
            self.init_particle(child, branch.position, branch.velocity, &branch.effect);
            if let Some(c) = self.pool.get_mut(child) {
                c.branch_parent = Some(branch.parent);
                c.branch_level = branch.level;
            }
            if let Some(parent) = self.pool.get_mut(branch.parent) {
                parent.branch_children.push(child);
            }
        }
        self.pending_branches = branches;
        self.pending_branches.clear();
    }

    fn init_particle(
        &mut self,
        id: ParticleId,
        position: Vec2,
        velocity: Vec2,
        effect: &Arc<EffectDescriptor>,
    ) {
        let color = pick_color(&effect.colors, &mut self.rng);
        let target_color = if effect.color_transition {
            pick_color(&effect.colors, &mut self.rng)
        } else {
            color
        };
        let turbulence_offset = effect.turbulence.map_or(Vec2::ZERO, |amount| {
            Vec2::new(
                (self.rng.gen::<f32>() - 0.5) * amount,
                (self.rng.gen::<f32>() - 0.5) * amount,
            )
        });
        let rotation = self.rng.gen::<f32>() * 360.0;

        if let Some(p) = self.pool.get_mut(id) {
            p.position = position;
            p.velocity = velocity;
            p.age = 0.0;
            p.lifetime = effect.lifetime_secs();
            p.effect = Arc::clone(effect);
            p.rotation = rotation;
            p.scale = effect.size;
            p.opacity = 1.0;
            p.color = color;
            p.start_color = color;
            p.target_color = target_color;
            p.shape = effect.shape;
            p.turbulence_offset = turbulence_offset;
            self.counters.spawned += 1;
        }
    }

    // =========================================================================
    // OUTBOUND
    // =========================================================================

    /// Renderable state of every live particle, in slot order.
    #[must_use]
    pub fn particles(&self) -> Vec<ParticleSnapshot> {
        self.pool.iter().map(ParticleSnapshot::from).collect()
    }

    /// One segment per chain link, each pair reported once.
    #[must_use]
    pub fn particle_links(&self) -> Vec<ParticleLink> {
        let mut links = Vec::new();
        for (id, p) in self.pool.iter() {
            for &other_id in p.links.iter().filter(|other| **other > id) {
                let Some(other) = self.pool.get(other_id) else { continue };
                let Some(behavior) = p.effect.chain_links.or(other.effect.chain_links) else {
                    continue;
                };
                links.push(ParticleLink {
                    from: p.position,
                    to: other.position,
                    color: behavior.link_color,
                    width: behavior.link_width,
                    opacity: behavior.link_opacity,
                });
            }
        }
        links
    }

    /// One polyline per branch tree root, points in depth-first pre-order.
    #[must_use]
    pub fn chain_effects(&self) -> Vec<ChainEffect> {
        let mut chains = Vec::new();
        let mut stack = Vec::new();

        for (root_id, root) in self.pool.iter() {
            let Some(branching) = root.effect.branching else { continue };
            if root.branch_parent.is_some() {
                continue;
            }

            let mut points = Vec::new();
            stack.clear();
            stack.push(root_id);
            while let Some(id) = stack.pop() {
                let Some(p) = self.pool.get(id) else { continue };
                points.push(p.position);
                stack.extend(p.branch_children.iter().rev().copied());
            }

            chains.push(ChainEffect {
                points,
                color: branching.color,
                thickness: branching.thickness,
                glow_color: branching.glow_color,
                glow_intensity: branching.glow_intensity,
            });
        }
        chains
    }

    /// Packs live particles into the GPU instance buffer.
    pub fn pack_instances(&mut self) -> &[ParticleInstance] {
        self.instances.clear();
        for (id, p) in self.pool.iter() {
            self.instances.push(ParticleInstance::from(&ParticleSnapshot::from((id, p))));
        }
        &self.instances
    }

    /// The instance buffer as raw bytes, ready for upload.
    pub fn instance_bytes(&mut self) -> &[u8] {
        bytemuck::cast_slice(self.pack_instances())
    }

    /// Statistics for the last completed frame plus current totals.
    #[must_use]
    pub fn stats(&self) -> ParticleStats {
        ParticleStats {
            pool_size: self.pool.capacity() as u32,
            max_active: self.pool.max_active() as u32,
            active: self.pool.active_count() as u32,
            spawned_this_frame: self.last_frame.spawned,
            released_this_frame: self.last_frame.released,
            dropped_this_frame: self.last_frame.dropped,
            active_emitters: self.emitters.len() as u32,
        }
    }

    /// Number of live particles.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    /// The particle in slot `id`, if live.
    #[must_use]
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.pool.get(id)
    }

    /// Read access to the pool.
    #[must_use]
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// A registered continuous emitter.
    #[must_use]
    pub fn emitter(&self, id: EmitterId) -> Option<&ContinuousEmitter> {
        self.emitters.get(id)
    }

    /// Number of registered continuous emitters.
    #[must_use]
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Simulation seconds since construction.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::build(&ParticleConfig::default())
    }
}

fn pick_color<R: Rng + ?Sized>(palette: &[Rgb], rng: &mut R) -> Rgb {
    if palette.is_empty() {
        return Rgb::WHITE;
    }
    palette[rng.gen_range(0..palette.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BranchKind, BranchingBehavior, EmissionOptions, EmissionPattern};

    fn system(max_active: usize) -> ParticleSystem {
        ParticleSystem::new(&ParticleConfig {
            max_active,
            pool_size: max_active * 2,
            ..Default::default()
        })
        .unwrap()
    }

    fn simple(count: u32, lifetime_ms: f32) -> Arc<EffectDescriptor> {
        Arc::new(EffectDescriptor::new("SIMPLE", count, lifetime_ms, 100.0, 1.0, &[0xff0000], TAU, 0.0))
    }

    #[test]
    fn test_emit_clamps_to_cap() {
        let mut sys = system(10);
        assert_eq!(sys.emit_particles(Vec2::ZERO, &simple(8, 1000.0)), 8);
        assert_eq!(sys.emit_particles(Vec2::ZERO, &simple(8, 1000.0)), 2);
        assert_eq!(sys.active_count(), 10);
        sys.update(0.0);
        assert_eq!(sys.stats().dropped_this_frame, 6);
        assert_eq!(sys.stats().spawned_this_frame, 10);
    }

    #[test]
    fn test_particles_expire_at_lifetime() {
        let mut sys = system(10);
        sys.emit_particles(Vec2::ZERO, &simple(3, 100.0));
        sys.update(0.05);
        assert_eq!(sys.active_count(), 3);
        sys.update(0.06);
        assert_eq!(sys.active_count(), 0);
        assert_eq!(sys.stats().released_this_frame, 3);
    }

    #[test]
    fn test_fade_and_shrink() {
        let mut sys = system(10);
        sys.emit_particles(Vec2::ZERO, &simple(1, 1000.0));
        sys.update(0.5);
        let p = sys.particles()[0];
        assert!((p.opacity - 0.5).abs() < 1e-4);
        // eased(0.5) = 0.5
        assert!((p.scale - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_gravity_pulls_down_over_life() {
        let mut sys = system(10);
        let effect = Arc::new(EffectDescriptor::new("DROP", 1, 2000.0, 0.0, 1.0, &[0xffffff], 0.0, 100.0));
        sys.emit_particles(Vec2::ZERO, &effect);
        for _ in 0..10 {
            sys.update(0.1);
        }
        assert!(sys.particles()[0].position.y > 0.0);
    }

    #[test]
    fn test_color_transition_reaches_target() {
        let mut sys = system(10);
        let effect = Arc::new(
            EffectDescriptor::new("FADE", 1, 1000.0, 0.0, 1.0, &[0x000000, 0xffffff], 0.0, 0.0)
                .with_color_transition(),
        );
        sys.emit_particles(Vec2::ZERO, &effect);
        sys.update(0.999);
        let id = sys.pool().active_ids()[0];
        let p = sys.particle(id).unwrap();
        assert_eq!(p.color, p.start_color.lerp(p.target_color, p.progress()));
    }

    #[test]
    fn test_continuous_emitter_keeps_counting_when_saturated() {
        let mut sys = system(5);
        let id = sys
            .start_continuous_emitter(Vec2::ZERO, simple(5, 10_000.0), 100.0)
            .unwrap();
        sys.update(0.016);
        assert_eq!(sys.active_count(), 5);

        // Saturated: fires, spawns nothing, countdown resets
        sys.update(0.1);
        assert_eq!(sys.stats().dropped_this_frame, 5);
        let countdown = sys.emitter(id).unwrap().countdown;
        assert!((countdown - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_soft_contact_separates_without_sparks() {
        let mut sys = system(50);
        let effect = Arc::new(
            EffectDescriptor::new("SOFT", 2, 1000.0, 0.0, 1.0, &[0xffffff], 0.0, 0.0)
                .with_collisions(0.5),
        );
        sys.emit_particles(Vec2::ZERO, &effect);
        sys.update(0.01);
        let ids = sys.pool().active_ids();
        assert!(ids.iter().all(|id| sys.particle(*id).unwrap().collision_count == 1));
        assert_eq!(sys.active_count(), 2);
    }

    #[test]
    fn test_hard_contact_throws_sparks() {
        let mut sys = system(50);
        let effect = Arc::new(
            EffectDescriptor::new("HARD", 2, 1000.0, 0.0, 3.0, &[0xffffff], 0.0, 0.0)
                .with_collisions(1.0),
        );
        sys.emit_particles(Vec2::ZERO, &effect);
        sys.update(0.01);
        // Both particles resolve a 300 units/s contact, each throws one spark burst
        assert_eq!(sys.active_count(), 2 + 2 * 5);
    }

    #[test]
    fn test_collision_cooldown_uses_simulation_time() {
        let mut sys = system(50);
        let effect = Arc::new(
            EffectDescriptor::new("SOFT", 2, 10_000.0, 0.0, 1.0, &[0xffffff], 0.0, 0.0)
                .with_collisions(0.01),
        );
        sys.emit_particles(Vec2::ZERO, &effect);
        sys.update(0.01);
        sys.update(0.01);
        let id = sys.pool().active_ids()[0];
        assert_eq!(sys.particle(id).unwrap().collision_count, 1);
    }

    #[test]
    fn test_wall_bounce_keeps_particles_inside() {
        let mut sys = system(20);
        sys.set_screen_bounds(100.0, 100.0);
        let effect = Arc::new(
            EffectDescriptor::new("WALL", 10, 5000.0, 500.0, 1.0, &[0xffffff], TAU, 0.0).with_wall_bounce(),
        );
        sys.emit_particles(Vec2::new(50.0, 50.0), &effect);
        for _ in 0..30 {
            sys.update(0.05);
        }
        for p in sys.particles() {
            assert!(p.position.x >= 5.0 - 1e-3 && p.position.x <= 95.0 + 1e-3);
            assert!(p.position.y >= 5.0 - 1e-3 && p.position.y <= 95.0 + 1e-3);
        }
    }

    #[test]
    fn test_branching_builds_tree() {
        let mut sys = system(100);
        let mut branching = BranchingBehavior::new(BranchKind::Lightning);
        branching.branch_probability = 1000.0;
        let effect = Arc::new(
            EffectDescriptor::new("TREE", 1, 5000.0, 50.0, 1.0, &[0xffffff], 0.0, 0.0).with_branching(branching),
        );
        sys.emit_particles(Vec2::ZERO, &effect);
        sys.update(0.1);
        assert_eq!(sys.active_count(), 2);

        let chains = sys.chain_effects();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].points.len(), 2);

        for _ in 0..10 {
            sys.update(0.1);
        }
        for (_, p) in sys.pool().iter() {
            assert!(p.branch_level <= 3);
            assert!(p.branch_children.len() <= 3);
        }
    }

    #[test]
    fn test_release_of_parent_orphans_children() {
        let mut sys = system(100);
        let mut branching = BranchingBehavior::new(BranchKind::Web);
        branching.branch_probability = 1000.0;
        branching.max_branches = 1;
        let parent_effect = Arc::new(
            EffectDescriptor::new("SHORT", 1, 150.0, 0.0, 1.0, &[0xffffff], 0.0, 0.0).with_branching(branching),
        );
        sys.emit_particles(Vec2::ZERO, &parent_effect);
        sys.update(0.1);
        assert_eq!(sys.active_count(), 2);
        // parent expires at 0.15s, child (same lifetime) spawned at 0.1s lives on
        sys.update(0.1);
        for (_, p) in sys.pool().iter() {
            if let Some(parent) = p.branch_parent {
                assert!(sys.particle(parent).is_some());
            }
        }
    }

    #[test]
    fn test_chain_links_reported_once() {
        let mut sys = system(50);
        sys.emit(Effect::ARC_TETHER, Vec2::new(100.0, 100.0));
        sys.update(0.0);
        let links = sys.particle_links();
        assert!(!links.is_empty());
        let total_link_ends: usize = sys.pool().iter().map(|(_, p)| p.links.len()).sum();
        assert_eq!(links.len() * 2, total_link_ends);
    }

    #[test]
    fn test_spiral_uses_elapsed_time() {
        let mut sys = system(50);
        let effect = Arc::new(
            EffectDescriptor::new("SPIRAL", 1, 1000.0, 100.0, 1.0, &[0xffffff], 0.0, 0.0)
                .with_pattern(EmissionPattern::Spiral, EmissionOptions { spiral_tightness: Some(1.0), ..Default::default() }),
        );
        sys.update(0.5);
        sys.emit_particles(Vec2::ZERO, &effect);
        let id = sys.pool().active_ids()[0];
        assert!((sys.particle(id).unwrap().velocity.angle() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_set_max_particles_clamps() {
        let mut sys = system(10);
        assert_eq!(sys.set_max_particles(1_000_000), 20);
        assert_eq!(sys.set_max_particles(3), 3);
        assert_eq!(sys.emit_particles(Vec2::ZERO, &simple(10, 1000.0)), 3);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut sys = system(10);
        sys.emit_particles(Vec2::ZERO, &simple(5, 1000.0));
        sys.start_continuous_emitter(Vec2::ZERO, simple(1, 1000.0), 50.0).unwrap();
        sys.clear();
        assert_eq!(sys.active_count(), 0);
        assert_eq!(sys.emitter_count(), 0);
    }

    #[test]
    fn test_instance_bytes_len() {
        let mut sys = system(10);
        sys.emit_particles(Vec2::ZERO, &simple(4, 1000.0));
        assert_eq!(sys.instance_bytes().len(), 4 * ParticleInstance::SIZE);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut sys = system(100);
            sys.emit(Effect::THUNDER_STORM, Vec2::new(200.0, 200.0));
            for _ in 0..20 {
                sys.update(0.016);
            }
            sys.particles().iter().map(|p| p.position).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
