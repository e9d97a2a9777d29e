//! # Force Fields
//!
//! Per-tick displacement contributions that do not depend on other
//! particles' state (attraction, repulsion, turbulence), plus boids-style
//! flocking, which reads the previous tick's neighbour snapshot.
//!
//! Every function returns a displacement already scaled by `dt`.

use std::f32::consts::TAU;

use tempest_shared::Vec2;

use crate::descriptor::{EffectDescriptor, FlockingBehavior};
use crate::particle::ParticleId;

/// Scale applied to attraction and repulsion strengths.
pub const FIELD_STRENGTH_SCALE: f32 = 1000.0;

/// Upper bound on the magnitude of a single field force.
pub const MAX_FIELD_FORCE: f32 = 5000.0;

/// Frame rate at which turbulence moves a particle by its full offset once
/// per frame. Descriptor amplitudes are tuned against this rate.
pub const TURBULENCE_REFERENCE_RATE: f32 = 60.0;

/// Read-only view of a particle as it was at the start of the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    /// Slot of the particle
    pub id: ParticleId,
    /// Position at the start of the tick
    pub position: Vec2,
    /// Launch velocity at the start of the tick
    pub velocity: Vec2,
    /// Descriptor size
    pub size: f32,
}

fn inverse_square(delta: Vec2, strength: f32) -> Vec2 {
    let distance = delta.length().max(1.0);
    let magnitude = (strength * FIELD_STRENGTH_SCALE / (distance * distance)).min(MAX_FIELD_FORCE);
    delta.normalize_or_zero() * magnitude
}

/// Attraction toward the descriptor's attraction point and repulsion from
/// each repulsion point in range.
#[must_use]
pub fn field_force(effect: &EffectDescriptor, position: Vec2, dt: f32) -> Vec2 {
    let mut force = Vec2::ZERO;

    if let Some(point) = effect.attraction {
        force += inverse_square(point.position - position, point.strength);
    }

    for point in &effect.repulsion {
        let away = position - point.position;
        if away.length() < point.radius {
            force += inverse_square(away, point.strength);
        }
    }

    force * dt
}

/// Sinusoidal wander driven by life progress.
///
/// At [`TURBULENCE_REFERENCE_RATE`] a frame moves the particle by the full
/// sinusoidal offset. Other frame rates cover the same distance per second.
#[inline]
#[must_use]
pub fn turbulence(offset: Vec2, progress: f32, dt: f32) -> Vec2 {
    let phase = TAU * progress;
    Vec2::new(phase.sin() * offset.x, phase.cos() * offset.y) * (dt * TURBULENCE_REFERENCE_RATE)
}

/// Separation, alignment and cohesion against the neighbour snapshot.
#[must_use]
pub fn flocking_force(
    behavior: &FlockingBehavior,
    me: &Neighbour,
    neighbours: &[Neighbour],
    dt: f32,
) -> Vec2 {
    let mut separation = Vec2::ZERO;
    let mut alignment = Vec2::ZERO;
    let mut cohesion = Vec2::ZERO;
    let (mut separation_count, mut alignment_count, mut cohesion_count) = (0u32, 0u32, 0u32);

    for other in neighbours.iter().filter(|n| n.id != me.id) {
        let delta = other.position - me.position;
        let distance = delta.length();

        if distance < behavior.separation_radius && distance > f32::EPSILON {
            separation -= delta * (1.0 / distance);
            separation_count += 1;
        }
        if distance < behavior.alignment_radius {
            alignment += other.velocity;
            alignment_count += 1;
        }
        if distance < behavior.cohesion_radius {
            cohesion += other.position;
            cohesion_count += 1;
        }
    }

    let mut total = Vec2::ZERO;
    if separation_count > 0 {
        total += separation * (behavior.separation_force / separation_count as f32);
    }
    if alignment_count > 0 {
        let average = alignment * (1.0 / alignment_count as f32);
        total += (average - me.velocity) * behavior.alignment_force;
    }
    if cohesion_count > 0 {
        let centre = cohesion * (1.0 / cohesion_count as f32);
        total += (centre - me.position) * behavior.cohesion_force;
    }

    total.clamp_length(behavior.max_speed) * dt
}
