//! # Collision Resolution
//!
//! Pairwise particle contacts and screen-edge bounces.
//!
//! Contacts are tested against the neighbour snapshot taken at the start of
//! the tick, so the result does not depend on iteration order. Every live
//! particle takes part, with its descriptor's damping or
//! [`DEFAULT_COLLISION_DAMPING`](crate::descriptor::DEFAULT_COLLISION_DAMPING).
//!
//! A contact throws sparks when the response's summed axis speeds
//! (`|vx| + |vy|`) exceed [`SPARK_SPEED_THRESHOLD`].

use tempest_shared::Vec2;

use crate::forces::Neighbour;

/// Contact distance is `(size_a + size_b) * CONTACT_SCALE`.
pub const CONTACT_SCALE: f32 = 5.0;

/// Time over which a contact response separates the pair, in seconds.
pub const SEPARATION_TIME: f32 = 0.1;

/// Summed axis speed above which a contact throws sparks.
pub const SPARK_SPEED_THRESHOLD: f32 = 100.0;

/// Result of a resolved contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    /// Replacement velocity for the colliding particle
    pub velocity: Vec2,
    /// Midpoint between the two particles
    pub contact: Vec2,
}

impl CollisionHit {
    /// Whether the contact is hard enough to throw sparks.
    #[inline]
    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.velocity.x.abs() + self.velocity.y.abs() > SPARK_SPEED_THRESHOLD
    }
}

/// Finds the first neighbour in contact with `me` and computes the response.
///
/// `since_last` is the simulation time since this particle's previous
/// contact, or `None` if it has never collided.
#[must_use]
pub fn resolve_contact(
    me: &Neighbour,
    neighbours: &[Neighbour],
    damping: f32,
    since_last: Option<f32>,
    cooldown: f32,
) -> Option<CollisionHit> {
    if since_last.is_some_and(|t| t < cooldown) {
        return None;
    }

    neighbours.iter().filter(|n| n.id != me.id).find_map(|other| {
        let delta = other.position - me.position;
        let distance = delta.length();
        let contact_distance = (me.size + other.size) * CONTACT_SCALE;
        if distance >= contact_distance {
            return None;
        }

        let normal = if distance > f32::EPSILON {
            delta * (1.0 / distance)
        } else {
            Vec2::new(1.0, 0.0)
        };
        let target = other.position - normal * contact_distance;
        let velocity = (target - me.position) * (damping / SEPARATION_TIME);

        Some(CollisionHit {
            velocity,
            contact: me.position.midpoint(other.position),
        })
    })
}

/// Screen rectangle particles bounce inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Width in screen units
    pub width: f32,
    /// Height in screen units
    pub height: f32,
}

impl Bounds {
    /// Whether bounds have been configured.
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Clamps a particle inside the bounds, reflecting and damping the offending
/// velocity component. Returns `true` if a wall was hit.
pub fn bounce_off_walls(
    position: &mut Vec2,
    velocity: &mut Vec2,
    size: f32,
    bounds: Bounds,
    damping: f32,
) -> bool {
    if !bounds.is_set() {
        return false;
    }
    let margin = size * CONTACT_SCALE;
    let mut hit = false;

    if position.x < margin {
        position.x = margin;
        velocity.x = velocity.x.abs() * damping;
        hit = true;
    } else if position.x > bounds.width - margin {
        position.x = bounds.width - margin;
        velocity.x = -velocity.x.abs() * damping;
        hit = true;
    }

    if position.y < margin {
        position.y = margin;
        velocity.y = velocity.y.abs() * damping;
        hit = true;
    } else if position.y > bounds.height - margin {
        position.y = bounds.height - margin;
        velocity.y = -velocity.y.abs() * damping;
        hit = true;
    }

    hit
}
