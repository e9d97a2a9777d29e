//! # TEMPEST Shared
//!
//! Common numeric types used by the particle simulator and the hazard engine.
//!
//! ## Contents
//!
//! - [`Vec2`] - 2D screen-space vector (y grows downward)
//! - [`Rgb`] - 8-bit colour with hex parsing and interpolation
//! - [`easing`] - analytic easing curves evaluated from progress
//! - [`Clock`] - injected monotonic millisecond clock for real-time rules
//!
//! Nothing in this crate allocates after construction.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod color;
pub mod constants;
pub mod easing;
pub mod math;

pub use clock::{Clock, ManualClock, SystemClock};
pub use color::Rgb;
pub use constants::{
    DEFAULT_MAX_ACTIVE_PARTICLES, DEFAULT_PARTICLE_POOL_SIZE, MS_PER_SECOND,
};
pub use easing::{ease_in_out_quad, lerp};
pub use math::Vec2;
