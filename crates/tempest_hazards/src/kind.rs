//! # Hazard Types and Stats
//!
//! Four fixed hazard types, each with default stats and a pair of catalog
//! effects: one for the area itself and one for the burst shown on a target
//! that takes damage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempest_particles::Effect;

use crate::error::HazardError;

/// Fixed set of hazard types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardType {
    /// Burning ground
    Fire,
    /// Charged field
    Electric,
    /// Poison cloud
    Toxic,
    /// Spike trap
    Spike,
}

impl HazardType {
    /// Every hazard type.
    pub const ALL: [Self; 4] = [Self::Fire, Self::Electric, Self::Toxic, Self::Spike];

    /// Lowercase name used in scenario files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Electric => "electric",
            Self::Toxic => "toxic",
            Self::Spike => "spike",
        }
    }

    /// Stock damage per tick.
    #[must_use]
    pub const fn default_damage(self) -> f32 {
        match self {
            Self::Fire => 15.0,
            Self::Electric => 20.0,
            Self::Toxic => 10.0,
            Self::Spike => 25.0,
        }
    }

    /// Stock damage radius.
    #[must_use]
    pub const fn default_radius(self) -> f32 {
        match self {
            Self::Fire => 100.0,
            Self::Electric => 120.0,
            Self::Toxic => 150.0,
            Self::Spike => 80.0,
        }
    }

    /// Stock minimum time between two hits, in milliseconds.
    #[must_use]
    pub const fn default_tick_rate_ms(self) -> u64 {
        match self {
            Self::Fire => 500,
            Self::Electric => 400,
            Self::Toxic => 1000,
            Self::Spike => 200,
        }
    }

    /// Continuous effect of an uncombined hazard.
    #[must_use]
    pub const fn base_effect(self) -> Effect {
        match self {
            Self::Fire => Effect::FIRE_PIT,
            Self::Electric => Effect::ELECTRIC_FIELD,
            Self::Toxic => Effect::TOXIC_ZONE,
            Self::Spike => Effect::SPIKE_TRAP,
        }
    }

    /// Burst shown on a target hit by an uncombined hazard.
    #[must_use]
    pub const fn damage_effect(self) -> Effect {
        match self {
            Self::Fire => Effect::FIRE_DAMAGE,
            Self::Electric => Effect::ELECTRIC_DAMAGE,
            Self::Toxic => Effect::TOXIC_DAMAGE,
            Self::Spike => Effect::SPIKE_DAMAGE,
        }
    }
}

impl FromStr for HazardType {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| HazardError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Live stats of a hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardStats {
    /// Damage per hit
    pub damage: f32,
    /// Damage radius
    pub radius: f32,
    /// Minimum milliseconds between two hits
    pub tick_rate_ms: u64,
    /// Lifespan in milliseconds, `None` for permanent hazards
    pub duration_ms: Option<u64>,
    /// Whether the hazard is live
    pub active: bool,
    /// Type of the partner absorbed by combination
    pub combined_with: Option<HazardType>,
}

impl HazardStats {
    /// Stock stats for `hazard_type` with `overrides` applied.
    ///
    /// Zero or negative overrides fall back to the stock value.
    #[must_use]
    pub fn for_type(hazard_type: HazardType, overrides: &StatsOverride) -> Self {
        Self {
            damage: overrides
                .damage
                .filter(|d| *d > 0.0)
                .unwrap_or(hazard_type.default_damage()),
            radius: overrides
                .radius
                .filter(|r| *r > 0.0)
                .unwrap_or(hazard_type.default_radius()),
            tick_rate_ms: overrides
                .tick_rate_ms
                .filter(|t| *t > 0)
                .unwrap_or(hazard_type.default_tick_rate_ms()),
            duration_ms: overrides.duration_ms.filter(|d| *d > 0),
            active: true,
            combined_with: None,
        }
    }
}

/// Optional replacements for stock stats, as read from scenario files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsOverride {
    /// Damage per hit
    pub damage: Option<f32>,
    /// Damage radius
    pub radius: Option<f32>,
    /// Milliseconds between hits
    pub tick_rate_ms: Option<u64>,
    /// Lifespan in milliseconds
    pub duration_ms: Option<u64>,
}
