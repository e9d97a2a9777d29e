//! # TEMPEST Hazards
//!
//! Environmental hazards layered on the particle simulator: rate-limited
//! area damage, one-time fusion of two hazards, and visual interactions
//! between fused hazards that sit close together.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       HazardField                        │
//! │  Vec<Hazard> arena · Box<dyn Clock> · EventFeed          │
//! ├───────────────┬──────────────────┬───────────────────────┤
//! │ combination   │ interaction      │ seams                 │
//! │ (type pairs)  │ (effect pairs,   │ NearbyHazards,        │
//! │               │  effect triples) │ DamageTarget          │
//! └───────┬───────┴────────┬─────────┴───────────────────────┘
//!         │ start/stop/move emitters, one-shot bursts
//!         v
//!   tempest_particles::ParticleSystem
//! ```
//!
//! The field never owns the particle system. Every call that touches
//! emitters takes it explicitly, so one simulation context can host any
//! number of isolated fields.
//!
//! ## Example
//!
//! ```rust,ignore
//! let clock = ManualClock::new(0);
//! let mut field = HazardField::new(&HazardConfig::default(), clock.clone())?;
//! let a = field.spawn(&mut particles, Vec2::new(0.0, 0.0), HazardType::Fire, &StatsOverride::default())?;
//! let b = field.spawn(&mut particles, Vec2::new(80.0, 0.0), HazardType::Fire, &StatsOverride::default())?;
//! assert!(field.try_combine(a, b, &mut particles)?);
//! field.update(16.0, &mut particles)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod combination;
pub mod config;
pub mod error;
pub mod events;
pub mod field;
pub mod hazard;
pub mod interaction;
pub mod kind;
pub mod query;
pub mod target;

pub use combination::{find_combination, Combination};
pub use config::HazardConfig;
pub use error::{HazardError, HazardResult};
pub use events::{EventFeed, EventReceiver, HazardEvent};
pub use field::HazardField;
pub use hazard::{Hazard, HazardEmitters, HazardId};
pub use interaction::{interaction_effect, interaction_strength, three_way_effect};
pub use kind::{HazardStats, HazardType, StatsOverride};
pub use query::{NearbyHazards, RadiusQuery};
pub use target::DamageTarget;
