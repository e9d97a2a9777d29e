//! # Simulation Configuration
//!
//! One TOML document with a table per subsystem. Every field is optional.
//!
//! ```toml
//! [particles]
//! max_active = 500
//! pool_size = 1000
//! seed = 42
//!
//! [hazards]
//! spatial_query = true
//! interaction_radius = 250.0
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempest_hazards::HazardConfig;
use tempest_particles::ParticleConfig;

use crate::error::{SimulationError, SimulationResult};

/// Configuration of a [`Simulation`](crate::Simulation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Particle system tunables
    pub particles: ParticleConfig,
    /// Hazard engine tunables
    pub hazards: HazardConfig,
}

impl SimulationConfig {
    /// Reads and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an I/O, TOML or validation error.
    pub fn load<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Checks every subsystem's configuration.
    ///
    /// # Errors
    ///
    /// Returns the first subsystem error found.
    pub fn validate(&self) -> SimulationResult<()> {
        self.particles.validate()?;
        self.hazards.validate()?;
        Ok(())
    }
}

impl FromStr for SimulationConfig {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
