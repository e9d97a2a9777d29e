//! # Emission Pattern Generator
//!
//! Maps a particle's position within a burst to its launch velocity.
//!
//! Every pattern is a pure function of `(index, total, descriptor, elapsed)`.
//! Only `Burst` and the unpatterned fallback draw from the random source.

use std::f32::consts::TAU;

use rand::Rng;
use tempest_shared::Vec2;

use crate::descriptor::{EffectDescriptor, EmissionPattern};

/// Maximum angular jitter applied by the burst pattern, in radians.
pub const BURST_JITTER: f32 = 0.25;

/// Where a particle sits within the burst being emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionContext {
    /// Index within the burst
    pub index: usize,
    /// Particles actually spawned by the burst
    pub total: usize,
    /// Simulation seconds elapsed, drives spiral rotation
    pub elapsed: f32,
}

impl EmissionContext {
    /// Fraction of the burst before this particle, in `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.index as f32 / self.total as f32
        }
    }

    /// Evenly spaced radial angle for this particle.
    #[inline]
    #[must_use]
    pub fn base_angle(&self) -> f32 {
        self.ratio() * TAU
    }
}

/// Computes the launch velocity of one particle.
#[must_use]
pub fn initial_velocity<R: Rng + ?Sized>(
    effect: &EffectDescriptor,
    ctx: EmissionContext,
    rng: &mut R,
) -> Vec2 {
    let speed = effect.speed;
    let options = &effect.emission_options;
    let base = ctx.base_angle();

    match effect.pattern {
        Some(EmissionPattern::Circle) => Vec2::from_angle(base, speed),
        Some(EmissionPattern::Spiral) => {
            let angle = base + options.spiral_tightness() * ctx.elapsed;
            Vec2::from_angle(angle, speed * (1.0 + ctx.ratio()))
        }
        Some(EmissionPattern::Burst) => {
            let angle = base + rng.gen_range(-BURST_JITTER..=BURST_JITTER);
            Vec2::from_angle(angle, speed * (1.0 + rng.gen::<f32>()))
        }
        Some(EmissionPattern::Wave) => Vec2::new(
            speed,
            (base * options.frequency()).sin() * options.wave_amplitude(),
        ),
        Some(EmissionPattern::Vortex) => {
            let distance = options.radius() * ctx.ratio();
            let angle = base + distance * options.vortex_strength();
            Vec2::from_angle(angle, speed)
        }
        None => {
            let half = effect.spread * 0.5;
            let angle = if half > 0.0 { rng.gen_range(-half..=half) } else { 0.0 };
            Vec2::from_angle(angle, speed * rng.gen_range(0.5..=1.0))
        }
    }
}
