//! Particle system configuration.

use serde::{Deserialize, Serialize};
use tempest_shared::{DEFAULT_MAX_ACTIVE_PARTICLES, DEFAULT_PARTICLE_POOL_SIZE};

use crate::error::{ParticleError, ParticleResult};

/// Tunables for a [`ParticleSystem`](crate::ParticleSystem).
///
/// Every field has a default, so a partial TOML table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Cap on live particles
    pub max_active: usize,
    /// Preallocated slot count
    pub pool_size: usize,
    /// Seed for every random draw in the simulator
    pub seed: u64,
    /// Minimum time between two collisions of the same particle
    pub collision_cooldown_ms: f32,
    /// Bounce area width, 0 disables wall bounces
    pub screen_width: f32,
    /// Bounce area height, 0 disables wall bounces
    pub screen_height: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_active: DEFAULT_MAX_ACTIVE_PARTICLES,
            pool_size: DEFAULT_PARTICLE_POOL_SIZE,
            seed: 0x7e57_ca5e,
            collision_cooldown_ms: 100.0,
            screen_width: 0.0,
            screen_height: 0.0,
        }
    }
}

impl ParticleConfig {
    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::InvalidConfig`] for an empty pool, a cap
    /// above the pool size, a negative cooldown or negative bounds.
    pub fn validate(&self) -> ParticleResult<()> {
        if self.pool_size == 0 {
            return Err(ParticleError::InvalidConfig("pool_size must be non-zero".into()));
        }
        if self.max_active > self.pool_size {
            return Err(ParticleError::InvalidConfig(format!(
                "max_active {} exceeds pool_size {}",
                self.max_active, self.pool_size
            )));
        }
        if !(self.collision_cooldown_ms.is_finite() && self.collision_cooldown_ms >= 0.0) {
            return Err(ParticleError::InvalidConfig(
                "collision_cooldown_ms must be non-negative".into(),
            ));
        }
        if self.screen_width < 0.0 || self.screen_height < 0.0 {
            return Err(ParticleError::InvalidConfig("screen bounds must be non-negative".into()));
        }
        Ok(())
    }
}
