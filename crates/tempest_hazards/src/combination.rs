//! # Combination Table
//!
//! Two hazards fuse into one when their types form an entry of this table.
//! Keys are unordered: `fire + toxic` and `toxic + fire` are the same entry.

use tempest_particles::Effect;

use crate::kind::HazardType::{self, Electric, Fire, Spike, Toxic};

/// Interval of base and combination emitters, in milliseconds.
pub const AREA_EMITTER_INTERVAL_MS: f32 = 100.0;

/// Stats and effect of a fused hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combination {
    /// Continuous effect and damage burst of the fused hazard
    pub effect: Effect,
    /// Damage per hit
    pub damage: f32,
    /// Damage radius
    pub radius: f32,
    /// Minimum milliseconds between two hits
    pub tick_rate_ms: u64,
}

const fn entry(
    a: HazardType,
    b: HazardType,
    effect: Effect,
    damage: f32,
    radius: f32,
    tick_rate_ms: u64,
) -> (HazardType, HazardType, Combination) {
    (
        a,
        b,
        Combination {
            effect,
            damage,
            radius,
            tick_rate_ms,
        },
    )
}

/// Every valid fusion.
pub const COMBINATIONS: [(HazardType, HazardType, Combination); 10] = [
    entry(Fire, Electric, Effect::STORM_SURGE, 35.0, 150.0, 300),
    entry(Fire, Toxic, Effect::MAGMA_ERUPTION, 25.0, 180.0, 500),
    entry(Electric, Toxic, Effect::QUANTUM_RIFT, 30.0, 200.0, 400),
    entry(Fire, Spike, Effect::VOID_RUPTURE, 40.0, 130.0, 250),
    entry(Electric, Spike, Effect::CRYO_STORM, 45.0, 100.0, 200),
    entry(Toxic, Spike, Effect::NATURE_GROWTH, 35.0, 160.0, 350),
    entry(Fire, Fire, Effect::PHOENIX_WINGS, 50.0, 140.0, 250),
    entry(Electric, Electric, Effect::THUNDER_STORM, 55.0, 170.0, 200),
    entry(Toxic, Toxic, Effect::VOID_VORTEX, 45.0, 190.0, 300),
    entry(Spike, Spike, Effect::MYSTIC_PORTALS, 60.0, 120.0, 150),
];

/// Looks up the fusion of two types, in either order.
#[must_use]
pub fn find_combination(a: HazardType, b: HazardType) -> Option<&'static Combination> {
    COMBINATIONS
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, combination)| combination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_symmetric() {
        for a in HazardType::ALL {
            for b in HazardType::ALL {
                assert_eq!(find_combination(a, b), find_combination(b, a));
                assert!(find_combination(a, b).is_some());
            }
        }
    }

    #[test]
    fn test_phoenix_wings_profile() {
        let combo = find_combination(Fire, Fire).unwrap();
        assert_eq!(combo.effect, Effect::PHOENIX_WINGS);
        assert!((combo.damage - 50.0).abs() < f32::EPSILON);
        assert!((combo.radius - 140.0).abs() < f32::EPSILON);
        assert_eq!(combo.tick_rate_ms, 250);
    }

    #[test]
    fn test_mixed_pair() {
        let combo = find_combination(Spike, Electric).unwrap();
        assert_eq!(combo.effect, Effect::CRYO_STORM);
        assert_eq!(combo.tick_rate_ms, 200);
    }
}
