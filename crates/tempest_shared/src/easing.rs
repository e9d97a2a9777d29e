//! Analytic easing curves.
//!
//! Particle scale, opacity and deceleration are evaluated directly from
//! normalised progress each tick instead of being scheduled as tweens.

/// Linear interpolation between two floats
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Quadratic ease-in-out on `[0, 1]`.
#[inline]
#[must_use]
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}
