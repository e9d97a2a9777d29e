//! Hazard engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{HazardError, HazardResult};

/// Tunables for a [`HazardField`](crate::HazardField).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    /// Radius of the built-in [`RadiusQuery`](crate::RadiusQuery)
    pub interaction_radius: f32,
    /// Install the built-in radius query at construction
    pub spatial_query: bool,
    /// Undelivered events each subscriber keeps before new ones are dropped
    pub event_capacity: usize,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            interaction_radius: 250.0,
            spatial_query: false,
            event_capacity: 256,
        }
    }
}

impl HazardConfig {
    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::InvalidConfig`] for a non-positive interaction
    /// radius or a zero event capacity.
    pub fn validate(&self) -> HazardResult<()> {
        if !(self.interaction_radius.is_finite() && self.interaction_radius > 0.0) {
            return Err(HazardError::InvalidConfig(
                "interaction_radius must be positive".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(HazardError::InvalidConfig("event_capacity must be non-zero".into()));
        }
        Ok(())
    }
}
