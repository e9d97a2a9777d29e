//! # TEMPEST
//!
//! Explicitly constructed simulation context for the particle VFX simulator
//! and the hazard engine, plus TOML configuration and scripted scenarios.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ SharedSimulation  (Arc<Mutex<_>>, optional)              │
//! ├──────────────────────────────────────────────────────────┤
//! │ Simulation                                               │
//! │   HazardField ──emitters──> ParticleSystem               │
//! │   update(dt): hazards, then particles                    │
//! ├──────────────────────────────────────────────────────────┤
//! │ SimulationConfig (TOML)      Scenario (TOML script)      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = SimulationConfig::load("tempest.toml")?;
//! let mut sim = Simulation::new(&config)?;
//! let report = Scenario::load("scenarios/three_way.toml")?.run(&mut sim)?;
//! println!("{report}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod scenario;
pub mod shared;
pub mod simulation;

pub use config::SimulationConfig;
pub use error::{SimulationError, SimulationResult};
pub use scenario::{Action, HazardSpec, Scenario, ScenarioReport, ScheduledAction};
pub use shared::SharedSimulation;
pub use simulation::{FrameSnapshot, HazardSnapshot, Simulation};
