//! # TEMPEST Particles
//!
//! Pooled 2D particle simulation driven by a fixed catalog of named effects.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      ParticleSystem                        │
//! ├──────────────┬───────────────┬─────────────────────────────┤
//! │ ParticlePool │ EmitterRegistry│ ChaCha8Rng (seeded)        │
//! ├──────────────┴───────────────┴─────────────────────────────┤
//! │ pattern → forces → collision → chains (links + branching)  │
//! ├────────────────────────────────────────────────────────────┤
//! │ snapshots: particles, links, chain effects, GPU instances  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Live particles never exceed the active cap; excess spawns are dropped
//! - A particle is released on the tick its age reaches its lifetime
//! - Released slots are detached from every link and branch reference
//! - A given seed and input sequence reproduce a run exactly
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut particles = ParticleSystem::new(&ParticleConfig::default())?;
//! particles.emit(Effect::ENERGY_BLAST, Vec2::new(320.0, 240.0));
//! particles.update(1.0 / 60.0);
//! for p in particles.particles() {
//!     draw(p.position, p.scale, p.color, p.opacity);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod chains;
pub mod collision;
pub mod config;
pub mod descriptor;
pub mod emitter;
pub mod error;
pub mod forces;
pub mod particle;
pub mod pattern;
pub mod pool;
pub mod snapshot;
pub mod system;

pub use catalog::{lookup, Effect};
pub use config::ParticleConfig;
pub use descriptor::{
    AttractionPoint, BranchKind, BranchingBehavior, ChainLinkBehavior, EffectDescriptor,
    EmissionOptions, EmissionPattern, FlockingBehavior, ParticleShape, RepulsionPoint,
};
pub use emitter::{ContinuousEmitter, EmitterId};
pub use error::{ParticleError, ParticleResult};
pub use particle::{Particle, ParticleId};
pub use pattern::{initial_velocity, EmissionContext};
pub use pool::ParticlePool;
pub use snapshot::{ChainEffect, ParticleInstance, ParticleLink, ParticleSnapshot, ParticleStats};
pub use system::ParticleSystem;
