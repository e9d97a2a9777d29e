//! # Chain Links and Branching
//!
//! Two distinct particle structures:
//!
//! - **Chain links**: an undirected spring graph. Nearby particles link up to
//!   `max_links` each, springs pull linked pairs toward the rest length, and
//!   links snap when stretched past `link_distance * break_distance`.
//! - **Branching**: a tree. Particles spawn children at random, each child
//!   launched according to the branch kind and softly held within
//!   `segment_length` of its parent.
//!
//! Both structures are stored as pool slot indices.

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;
use tempest_shared::Vec2;

use crate::descriptor::{BranchKind, BranchingBehavior, ChainLinkBehavior};
use crate::forces::Neighbour;
use crate::particle::ParticleId;
use crate::pool::ParticlePool;

/// Fraction of the excess distance a child closes toward its parent per tick.
pub const PARENT_PULL_STIFFNESS: f32 = 0.5;

// =============================================================================
// CHAIN LINKS
// =============================================================================

/// Spring force on `a` from a link to `b`. `b` receives the negation.
#[must_use]
pub fn spring_force(a: Vec2, b: Vec2, behavior: &ChainLinkBehavior) -> Vec2 {
    let delta = b - a;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return Vec2::ZERO;
    }
    delta * ((distance - behavior.link_distance) * behavior.elasticity / distance)
}

/// Forms, breaks and tensions chain links for one tick.
///
/// Reads positions from the start-of-tick snapshot and accumulates spring
/// forces into each particle's `chain_force`. Pairs are visited once.
pub fn update_links(pool: &mut ParticlePool, snapshot: &[Neighbour]) {
    for (i, a) in snapshot.iter().enumerate() {
        for b in &snapshot[i + 1..] {
            let behavior = match chain_behavior(pool, a.id, b.id) {
                Some(behavior) => behavior,
                None => continue,
            };

            let distance = a.position.distance(b.position);
            let linked = pool.are_linked(a.id, b.id);

            if linked && distance > behavior.link_distance * behavior.break_distance {
                pool.unlink(a.id, b.id);
                continue;
            }

            let can_link = !linked
                && distance <= behavior.link_distance
                && link_count(pool, a.id) < behavior.max_links
                && link_count(pool, b.id) < behavior.max_links;
            if can_link {
                pool.link(a.id, b.id);
            }

            if pool.are_linked(a.id, b.id) {
                let force = spring_force(a.position, b.position, &behavior);
                if let Some(p) = pool.get_mut(a.id) {
                    p.chain_force += force;
                }
                if let Some(p) = pool.get_mut(b.id) {
                    p.chain_force -= force;
                }
            }
        }
    }
}

fn chain_behavior(pool: &ParticlePool, a: ParticleId, b: ParticleId) -> Option<ChainLinkBehavior> {
    let of = |id| pool.get(id).and_then(|p| p.effect.chain_links);
    of(a).or_else(|| of(b))
}

fn link_count(pool: &ParticlePool, id: ParticleId) -> usize {
    pool.get(id).map_or(usize::MAX, |p| p.links.len())
}

// =============================================================================
// BRANCHING
// =============================================================================

/// Whether a particle at `level` with `children` may branch this tick.
#[must_use]
pub fn roll_branch<R: Rng + ?Sized>(
    behavior: &BranchingBehavior,
    level: usize,
    children: usize,
    dt: f32,
    rng: &mut R,
) -> bool {
    level < behavior.max_branches
        && children < behavior.max_branches
        && rng.gen::<f32>() < behavior.branch_probability * dt
}

/// Launch velocity of a new child, by branch kind. `age` is the parent's age
/// in seconds.
#[must_use]
pub fn branch_velocity<R: Rng + ?Sized>(kind: BranchKind, speed: f32, age: f32, rng: &mut R) -> Vec2 {
    match kind {
        BranchKind::Lightning => {
            let angle = (rng.gen::<f32>() - 0.5) * FRAC_PI_2;
            Vec2::from_angle(angle, speed)
        }
        BranchKind::Web => Vec2::from_angle(rng.gen::<f32>() * TAU, speed * 0.5),
        BranchKind::Tentacles => Vec2::new((age * 5.0).cos() * 20.0, speed * 0.7),
        BranchKind::Energy => Vec2::from_angle(age * 3.0, 30.0),
    }
}

/// Random velocity kick applied to branching particles each tick.
#[must_use]
pub fn branch_noise<R: Rng + ?Sized>(noise_scale: f32, speed: f32, dt: f32, rng: &mut R) -> Vec2 {
    if noise_scale <= 0.0 {
        return Vec2::ZERO;
    }
    let amplitude = noise_scale * speed;
    Vec2::new(
        (rng.gen::<f32>() - 0.5) * amplitude,
        (rng.gen::<f32>() - 0.5) * amplitude,
    ) * dt
}

/// Displacement pulling a child back toward its parent when the segment is
/// overstretched.
#[must_use]
pub fn parent_pull(child: Vec2, parent: Vec2, segment_length: f32) -> Vec2 {
    let delta = parent - child;
    let distance = delta.length();
    if distance <= segment_length || distance <= f32::EPSILON {
        return Vec2::ZERO;
    }
    delta * ((distance - segment_length) / distance * PARENT_PULL_STIFFNESS)
}
