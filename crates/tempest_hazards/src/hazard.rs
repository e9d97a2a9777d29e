//! A single environmental hazard as stored in a [`HazardField`](crate::HazardField).

use std::fmt;

use tempest_particles::{Effect, EmitterId};
use tempest_shared::Vec2;

use crate::combination::find_combination;
use crate::kind::{HazardStats, HazardType};

/// Handle to a hazard. Indexes the owning field and is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HazardId(pub(crate) u32);

impl HazardId {
    /// Raw index into the owning field.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for HazardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Emitters a hazard owns in the particle system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HazardEmitters {
    /// Area effect of an uncombined hazard
    pub base: Option<EmitterId>,
    /// Area effect after combination
    pub combination: Option<EmitterId>,
    /// Last pairwise interaction
    pub interaction: Option<EmitterId>,
    /// Last three-way interaction
    pub three_way: Option<EmitterId>,
}

impl HazardEmitters {
    /// Emitter that follows the hazard's position.
    #[must_use]
    pub const fn anchored(&self) -> Option<EmitterId> {
        match self.combination {
            Some(id) => Some(id),
            None => self.base,
        }
    }

    /// Takes every owned emitter, leaving none.
    pub fn take_all(&mut self) -> [Option<EmitterId>; 4] {
        [
            self.base.take(),
            self.combination.take(),
            self.interaction.take(),
            self.three_way.take(),
        ]
    }
}

/// Area effect with rate-limited damage and combination state.
#[derive(Debug, Clone)]
pub struct Hazard {
    pub(crate) id: HazardId,
    pub(crate) position: Vec2,
    pub(crate) hazard_type: HazardType,
    pub(crate) stats: HazardStats,
    /// Clock time of creation or last activation
    pub(crate) created_at_ms: u64,
    pub(crate) last_damage_ms: Option<u64>,
    pub(crate) emitters: HazardEmitters,
    /// Hazard absorbed by combination, until deactivation
    pub(crate) partner: Option<HazardId>,
    /// Result of the last nearby query
    pub(crate) nearby: Vec<HazardId>,
    pub(crate) last_scan_ms: Option<u64>,
    pub(crate) last_three_way_ms: Option<u64>,
}

impl Hazard {
    pub(crate) fn new(
        id: HazardId,
        position: Vec2,
        hazard_type: HazardType,
        stats: HazardStats,
        now_ms: u64,
    ) -> Self {
        Self {
            id,
            position,
            hazard_type,
            stats,
            created_at_ms: now_ms,
            last_damage_ms: None,
            emitters: HazardEmitters::default(),
            partner: None,
            nearby: Vec::new(),
            last_scan_ms: None,
            last_three_way_ms: None,
        }
    }

    /// Handle of this hazard.
    #[must_use]
    pub const fn id(&self) -> HazardId {
        self.id
    }

    /// Centre of the damage area.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Type fixed at creation.
    #[must_use]
    pub const fn hazard_type(&self) -> HazardType {
        self.hazard_type
    }

    /// Current stats.
    #[must_use]
    pub const fn stats(&self) -> &HazardStats {
        &self.stats
    }

    /// Whether the hazard is live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.stats.active
    }

    /// Whether the hazard has absorbed a partner. Stays set after
    /// deactivation.
    #[must_use]
    pub const fn is_combined(&self) -> bool {
        self.stats.combined_with.is_some()
    }

    /// Type of the absorbed partner.
    #[must_use]
    pub const fn combined_type(&self) -> Option<HazardType> {
        self.stats.combined_with
    }

    /// Emitters currently owned.
    #[must_use]
    pub const fn emitters(&self) -> &HazardEmitters {
        &self.emitters
    }

    /// Hazards returned by the last nearby query.
    #[must_use]
    pub fn nearby(&self) -> &[HazardId] {
        &self.nearby
    }

    /// Combination effect, if combined.
    #[must_use]
    pub fn combination_effect(&self) -> Option<Effect> {
        self.stats
            .combined_with
            .and_then(|other| find_combination(self.hazard_type, other))
            .map(|combination| combination.effect)
    }

    /// Identity used by interaction tables and the area emitter.
    #[must_use]
    pub fn particle_effect(&self) -> Effect {
        self.combination_effect()
            .unwrap_or_else(|| self.hazard_type.base_effect())
    }

    /// Burst shown on a damaged target.
    #[must_use]
    pub fn damage_effect(&self) -> Effect {
        self.combination_effect()
            .unwrap_or_else(|| self.hazard_type.damage_effect())
    }

    /// Whether `point` lies inside the damage radius. Always `false` when
    /// inactive.
    #[must_use]
    pub fn check_collision(&self, point: Vec2) -> bool {
        self.stats.active && self.position.distance(point) <= self.stats.radius
    }
}
