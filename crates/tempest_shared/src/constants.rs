//! # Engine Constants
//!
//! Defaults baked into the engine. Runtime overrides go through the
//! configuration types of the owning crates.

// =============================================================================
// PARTICLE BUDGET
// =============================================================================

/// Default cap on simultaneously active particles.
pub const DEFAULT_MAX_ACTIVE_PARTICLES: usize = 500;

/// Default number of pre-allocated particle slots.
pub const DEFAULT_PARTICLE_POOL_SIZE: usize = 1000;

// =============================================================================
// TIME
// =============================================================================

/// Milliseconds per second.
pub const MS_PER_SECOND: f32 = 1000.0;
