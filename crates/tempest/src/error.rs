//! # Simulation Error Types
//!
//! Everything here is configuration time: reading files, parsing TOML,
//! resolving effect names and hazard references. A running frame never
//! fails on normal input.

use std::io;

use tempest_hazards::HazardError;
use tempest_particles::ParticleError;
use thiserror::Error;

/// Errors raised while building or scripting a simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// A config or scenario file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A config or scenario file is not valid TOML for its schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Particle configuration or effect lookup failed.
    #[error(transparent)]
    Particle(#[from] ParticleError),

    /// Hazard configuration or handle failed.
    #[error(transparent)]
    Hazard(#[from] HazardError),

    /// A scripted action names a hazard the scenario never declares.
    #[error("scenario action at frame {frame} references hazard {index}, but only {declared} are declared")]
    UnknownHazard {
        /// Frame of the offending action
        frame: u64,
        /// Referenced hazard index
        index: usize,
        /// Number of declared hazards
        declared: usize,
    },

    /// A scenario value outside its valid range.
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
}

/// Result type for simulation setup.
pub type SimulationResult<T> = Result<T, SimulationError>;
