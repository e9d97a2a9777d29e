//! # Interaction Tables
//!
//! Combined hazards near each other spawn transient interaction emitters.
//! Both tables are keyed by combination effect identity, never by raw type.
//!
//! ## Pairwise
//!
//! Two combined hazards between [`MIN_INTERACTION_DISTANCE`] and
//! [`MAX_INTERACTION_DISTANCE`] apart emit a scaled effect at their midpoint.
//! Strength falls linearly from 1 at the near edge to 0 at the far edge.
//!
//! ## Three-way
//!
//! A combined hazard with two combined neighbours whose sorted effect triple
//! is in [`THREE_WAY_INTERACTIONS`] emits an amplified vortex at the
//! centroid and permanently strengthens all three participants. Triples not
//! in the table produce nothing.

use tempest_particles::{Effect, EffectDescriptor, EmissionOptions, EmissionPattern};

/// Closest distance at which two hazards interact (exclusive).
pub const MIN_INTERACTION_DISTANCE: f32 = 50.0;
/// Farthest distance at which two hazards interact (exclusive).
pub const MAX_INTERACTION_DISTANCE: f32 = 200.0;
/// Minimum time between two pairwise scans of one hazard.
pub const PAIRWISE_SCAN_INTERVAL_MS: u64 = 1000;
/// Minimum time between two three-way triggers of one hazard.
pub const THREE_WAY_COOLDOWN_MS: u64 = 1500;
/// Interval of pairwise interaction emitters.
pub const PAIRWISE_EMITTER_INTERVAL_MS: f32 = 200.0;
/// Interval of three-way interaction emitters.
pub const THREE_WAY_EMITTER_INTERVAL_MS: f32 = 150.0;
/// Permanent damage multiplier for three-way participants.
pub const THREE_WAY_DAMAGE_MULTIPLIER: f32 = 1.5;
/// Permanent radius multiplier for three-way participants.
pub const THREE_WAY_RADIUS_MULTIPLIER: f32 = 1.2;

/// Turbulence given to scaled effects that have none.
const FALLBACK_TURBULENCE: f32 = 30.0;

// =============================================================================
// TABLES
// =============================================================================

/// Pairwise interactions. Lookups try both orders.
pub const PAIRWISE_INTERACTIONS: [(Effect, Effect, Effect); 15] = [
    (Effect::STORM_SURGE, Effect::MAGMA_ERUPTION, Effect::CELESTIAL_DANCE),
    (Effect::STORM_SURGE, Effect::QUANTUM_RIFT, Effect::SPIRIT_STORM),
    (Effect::STORM_SURGE, Effect::VOID_RUPTURE, Effect::ENERGY_SPIRAL),
    (Effect::STORM_SURGE, Effect::NATURE_GROWTH, Effect::SPIRIT_WISPS),
    (Effect::STORM_SURGE, Effect::PHOENIX_WINGS, Effect::THUNDER_STORM),
    (Effect::MAGMA_ERUPTION, Effect::QUANTUM_RIFT, Effect::VOID_TENTACLES),
    (Effect::MAGMA_ERUPTION, Effect::VOID_RUPTURE, Effect::PHOENIX_WINGS),
    (Effect::MAGMA_ERUPTION, Effect::NATURE_GROWTH, Effect::VOID_VORTEX),
    (Effect::MAGMA_ERUPTION, Effect::MYSTIC_PORTALS, Effect::ENERGY_SWARM),
    (Effect::QUANTUM_RIFT, Effect::VOID_RUPTURE, Effect::ENERGY_WEB),
    (Effect::QUANTUM_RIFT, Effect::NATURE_GROWTH, Effect::MYSTIC_PORTALS),
    (Effect::QUANTUM_RIFT, Effect::PHOENIX_WINGS, Effect::LIGHTNING_STRIKE_CHAIN),
    (Effect::VOID_RUPTURE, Effect::NATURE_GROWTH, Effect::VOID_TENTACLES),
    (Effect::VOID_RUPTURE, Effect::MYSTIC_PORTALS, Effect::VOID_VORTEX),
    (Effect::NATURE_GROWTH, Effect::MYSTIC_PORTALS, Effect::ENERGY_WEB),
];

/// Three-way interactions, keyed by the unordered effect triple.
pub const THREE_WAY_INTERACTIONS: [([Effect; 3], Effect); 5] = [
    (
        [Effect::STORM_SURGE, Effect::MAGMA_ERUPTION, Effect::QUANTUM_RIFT],
        Effect::CELESTIAL_DANCE,
    ),
    (
        [Effect::MAGMA_ERUPTION, Effect::VOID_RUPTURE, Effect::QUANTUM_RIFT],
        Effect::VOID_VORTEX,
    ),
    (
        [Effect::NATURE_GROWTH, Effect::STORM_SURGE, Effect::VOID_RUPTURE],
        Effect::SPIRIT_STORM,
    ),
    (
        [Effect::PHOENIX_WINGS, Effect::STORM_SURGE, Effect::VOID_RUPTURE],
        Effect::ENERGY_SPIRAL,
    ),
    (
        [Effect::MAGMA_ERUPTION, Effect::MYSTIC_PORTALS, Effect::VOID_RUPTURE],
        Effect::VOID_TENTACLES,
    ),
];

/// Interaction effect between two combination effects, in either order.
#[must_use]
pub fn interaction_effect(a: Effect, b: Effect) -> Option<Effect> {
    PAIRWISE_INTERACTIONS
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, effect)| *effect)
}

/// Three-way effect of an unordered triple of combination effects.
#[must_use]
pub fn three_way_effect(mut triple: [Effect; 3]) -> Option<Effect> {
    triple.sort_unstable();
    THREE_WAY_INTERACTIONS.iter().find_map(|(key, effect)| {
        let mut key = *key;
        key.sort_unstable();
        (key == triple).then_some(*effect)
    })
}

/// Pairwise strength at `distance`: 1 at 50, 0 at 200, linear between.
#[must_use]
pub fn interaction_strength(distance: f32) -> f32 {
    ((MAX_INTERACTION_DISTANCE - distance) / (MAX_INTERACTION_DISTANCE - MIN_INTERACTION_DISTANCE))
        .clamp(0.0, 1.0)
}

/// Whether two hazards `distance` apart are in pairwise range.
#[inline]
#[must_use]
pub fn in_interaction_range(distance: f32) -> bool {
    distance > MIN_INTERACTION_DISTANCE && distance < MAX_INTERACTION_DISTANCE
}

// =============================================================================
// EFFECT SHAPING
// =============================================================================

/// Pairwise emission: count and speed scale with `strength`, size keeps at
/// least half, and effects without turbulence gain some.
#[must_use]
pub fn scaled_interaction(base: &EffectDescriptor, strength: f32) -> EffectDescriptor {
    let mut effect = base.clone();
    effect.particle_count = (base.particle_count as f32 * strength).floor() as u32;
    effect.speed = base.speed * strength;
    effect.size = base.size * (0.5 + strength * 0.5);
    if effect.turbulence.filter(|t| t.abs() > f32::EPSILON).is_none() {
        effect.turbulence = Some(FALLBACK_TURBULENCE * strength);
    }
    effect
}

/// Three-way emission: a denser, longer, faster vortex sized to the triple's
/// spread around its centroid.
#[must_use]
pub fn amplified_three_way(base: &EffectDescriptor, average_distance: f32) -> EffectDescriptor {
    let mut effect = base.clone();
    effect.particle_count = (base.particle_count as f32 * 1.5).floor() as u32;
    effect.lifetime_ms = base.lifetime_ms * 1.2;
    effect.speed = base.speed * 1.3;
    effect.size = base.size * 1.2;
    effect.pattern = Some(EmissionPattern::Vortex);
    effect.emission_options = EmissionOptions {
        radius: Some(average_distance),
        vortex_strength: Some(2.5),
        ..EmissionOptions::default()
    };
    let turbulence = base.turbulence.filter(|t| t.abs() > f32::EPSILON).unwrap_or(FALLBACK_TURBULENCE);
    effect.turbulence = Some(turbulence * 1.5);
    if let Some(flocking) = effect.flocking.as_mut() {
        flocking.max_speed *= 1.3;
        flocking.cohesion_force *= 1.5;
    }
    if let Some(branching) = effect.branching.as_mut() {
        branching.max_branches += 2;
        branching.glow_intensity *= 1.5;
    }
    effect
}
