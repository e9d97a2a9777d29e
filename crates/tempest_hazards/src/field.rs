//! # Hazard Field
//!
//! Arena that owns every hazard and drives their lifecycle against an
//! explicitly passed [`ParticleSystem`].
//!
//! ## Lifecycle
//!
//! ```text
//!   spawn ──> Active ──try_combine──> Active + Combined
//!               │                          │
//!               └──────> Deactivated <─────┘
//!                            │   (cascades to the absorbed partner)
//!                         activate
//!                            │
//!                            v
//!                   Active, base emitter only
//! ```
//!
//! Real-time rules (damage tick rate, duration, interaction throttles) read
//! the injected [`Clock`]. Interactions need a [`NearbyHazards`] query and
//! are inert without one.

use std::fmt;
use std::sync::Arc;

use tempest_particles::{Effect, EmitterId, ParticleSystem};
use tempest_shared::{Clock, SystemClock, Vec2};
use tracing::{debug, info, trace};

use crate::combination::{find_combination, AREA_EMITTER_INTERVAL_MS};
use crate::config::HazardConfig;
use crate::error::{HazardError, HazardResult};
use crate::events::{EventFeed, EventReceiver, HazardEvent};
use crate::hazard::{Hazard, HazardId};
use crate::interaction::{
    amplified_three_way, in_interaction_range, interaction_effect, interaction_strength,
    scaled_interaction, three_way_effect, PAIRWISE_EMITTER_INTERVAL_MS,
    PAIRWISE_SCAN_INTERVAL_MS, THREE_WAY_COOLDOWN_MS, THREE_WAY_DAMAGE_MULTIPLIER,
    THREE_WAY_EMITTER_INTERVAL_MS, THREE_WAY_RADIUS_MULTIPLIER,
};
use crate::kind::{HazardStats, HazardType, StatsOverride};
use crate::query::{NearbyHazards, RadiusQuery};
use crate::target::DamageTarget;

/// Owner of every hazard in a simulation.
pub struct HazardField {
    hazards: Vec<Hazard>,
    clock: Box<dyn Clock>,
    query: Option<Box<dyn NearbyHazards>>,
    events: EventFeed,
}

impl fmt::Debug for HazardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HazardField")
            .field("hazards", &self.hazards.len())
            .field("now_ms", &self.clock.now_ms())
            .field("has_query", &self.query.is_some())
            .finish_non_exhaustive()
    }
}

impl HazardField {
    /// Creates an empty field reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::InvalidConfig`] when the configuration is
    /// rejected by [`HazardConfig::validate`].
    pub fn new(config: &HazardConfig, clock: impl Clock + 'static) -> HazardResult<Self> {
        config.validate()?;
        let mut field = Self {
            hazards: Vec::new(),
            clock: Box::new(clock),
            query: None,
            events: EventFeed::new(config.event_capacity),
        };
        if config.spatial_query {
            field.set_nearby_query(RadiusQuery::new(config.interaction_radius));
        }
        Ok(field)
    }

    /// Creates an empty field on the wall clock.
    ///
    /// # Errors
    ///
    /// See [`HazardField::new`].
    pub fn with_system_clock(config: &HazardConfig) -> HazardResult<Self> {
        Self::new(config, SystemClock::new())
    }

    // =========================================================================
    // SEAMS
    // =========================================================================

    /// Installs the spatial query that enables interactions.
    pub fn set_nearby_query(&mut self, query: impl NearbyHazards + 'static) {
        self.query = Some(Box::new(query));
    }

    /// Removes the spatial query; interactions stop firing.
    pub fn clear_nearby_query(&mut self) {
        self.query = None;
    }

    /// Whether a spatial query is installed.
    #[must_use]
    pub fn has_nearby_query(&self) -> bool {
        self.query.is_some()
    }

    /// A receiver for hazard events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Current clock reading in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    fn slot(&self, id: HazardId) -> HazardResult<usize> {
        let index = id.index();
        if index < self.hazards.len() {
            Ok(index)
        } else {
            Err(HazardError::UnknownHazard(id))
        }
    }

    /// Looks up a hazard.
    #[must_use]
    pub fn get(&self, id: HazardId) -> Option<&Hazard> {
        self.hazards.get(id.index())
    }

    /// Looks up a hazard, failing on a foreign handle.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::UnknownHazard`] for an id not issued by this
    /// field.
    pub fn hazard(&self, id: HazardId) -> HazardResult<&Hazard> {
        self.get(id).ok_or(HazardError::UnknownHazard(id))
    }

    /// Every hazard ever spawned, active or not, in spawn order.
    #[must_use]
    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    /// Iterates over live hazards.
    pub fn active(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter().filter(|h| h.is_active())
    }

    /// Number of hazards ever spawned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    /// Whether no hazard was spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Creates a hazard and starts its base emitter.
    ///
    /// # Errors
    ///
    /// Propagates an emitter rejected by the particle system.
    pub fn spawn(
        &mut self,
        particles: &mut ParticleSystem,
        position: Vec2,
        hazard_type: HazardType,
        overrides: &StatsOverride,
    ) -> HazardResult<HazardId> {
        let id = HazardId(self.hazards.len() as u32);
        let stats = HazardStats::for_type(hazard_type, overrides);
        let emitter = particles.start_continuous_emitter(
            position,
            hazard_type.base_effect().descriptor(),
            AREA_EMITTER_INTERVAL_MS,
        )?;

        let mut hazard = Hazard::new(id, position, hazard_type, stats, self.clock.now_ms());
        hazard.emitters.base = Some(emitter);
        debug!(hazard = %id, %hazard_type, x = position.x, y = position.y, "hazard spawned");
        self.hazards.push(hazard);
        Ok(id)
    }

    /// Moves a hazard. Its area emitter follows on the next update.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::UnknownHazard`] for a foreign handle.
    pub fn set_position(&mut self, id: HazardId, position: Vec2) -> HazardResult<()> {
        let index = self.slot(id)?;
        self.hazards[index].position = position;
        Ok(())
    }

    /// Whether `point` is inside an active hazard's radius.
    #[must_use]
    pub fn check_collision(&self, id: HazardId, point: Vec2) -> bool {
        self.get(id).is_some_and(|h| h.check_collision(point))
    }

    /// Damages `target` if it is inside the radius and the tick rate allows.
    ///
    /// On a hit the damage burst is emitted at the target. Returns whether
    /// damage was applied; inactive hazards, foreign handles, misses and
    /// rate-limited calls return `false`.
    pub fn apply_damage<T: DamageTarget + ?Sized>(
        &mut self,
        id: HazardId,
        particles: &mut ParticleSystem,
        target: &mut T,
    ) -> bool {
        let now = self.clock.now_ms();
        let Some(hazard) = self.hazards.get_mut(id.index()) else {
            return false;
        };
        if !hazard.is_active() {
            return false;
        }
        let tick_rate = hazard.stats.tick_rate_ms;
        if hazard
            .last_damage_ms
            .is_some_and(|last| now.saturating_sub(last) < tick_rate)
        {
            return false;
        }

        let position = target.position();
        if !hazard.check_collision(position) {
            return false;
        }

        let amount = hazard.stats.damage;
        target.take_damage(amount);
        hazard.last_damage_ms = Some(now);
        particles.emit(hazard.damage_effect(), position);

        trace!(hazard = %id, amount, "hazard damage applied");
        self.events.publish(HazardEvent::DamageApplied {
            hazard: id,
            amount,
            position,
        });
        true
    }

    /// Fuses `other` into `survivor`.
    ///
    /// Succeeds only when both are active, neither has combined before and
    /// their types form a combination. The survivor takes the combination
    /// stats, moves to the midpoint and swaps its base emitter for the
    /// combination emitter; `other` is deactivated. Returns `false` without
    /// changing anything otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::UnknownHazard`] for a foreign handle.
    pub fn try_combine(
        &mut self,
        survivor: HazardId,
        other: HazardId,
        particles: &mut ParticleSystem,
    ) -> HazardResult<bool> {
        let s = self.slot(survivor)?;
        let o = self.slot(other)?;
        if s == o {
            return Ok(false);
        }

        let (a, b) = (&self.hazards[s], &self.hazards[o]);
        if !a.is_active() || !b.is_active() || a.is_combined() || b.is_combined() {
            return Ok(false);
        }
        let Some(combination) = find_combination(a.hazard_type, b.hazard_type) else {
            return Ok(false);
        };
        let midpoint = a.position.midpoint(b.position);
        let other_type = b.hazard_type;

        let emitter = particles.start_continuous_emitter(
            midpoint,
            combination.effect.descriptor(),
            AREA_EMITTER_INTERVAL_MS,
        )?;
        let bases = [
            self.hazards[s].emitters.base.take(),
            self.hazards[o].emitters.base.take(),
        ];
        for base in bases.into_iter().flatten() {
            particles.stop_continuous_emitter(base);
        }

        let fused = &mut self.hazards[s];
        fused.stats.damage = combination.damage;
        fused.stats.radius = combination.radius;
        fused.stats.tick_rate_ms = combination.tick_rate_ms;
        fused.stats.combined_with = Some(other_type);
        fused.position = midpoint;
        fused.emitters.combination = Some(emitter);
        fused.partner = Some(other);

        info!(
            survivor = %survivor,
            absorbed = %other,
            effect = %combination.effect,
            "hazards combined"
        );
        self.events.publish(HazardEvent::Combined {
            survivor,
            absorbed: other,
            effect: combination.effect,
            position: midpoint,
        });
        self.release(other, particles);
        Ok(true)
    }

    /// Deactivates a hazard: stops every emitter it owns, cascades to the
    /// partner it absorbed and forgets its neighbours. The combination
    /// record is kept, so the hazard can never combine again.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::UnknownHazard`] for a foreign handle.
    pub fn deactivate(&mut self, id: HazardId, particles: &mut ParticleSystem) -> HazardResult<()> {
        self.slot(id)?;
        self.release(id, particles);
        Ok(())
    }

    /// Reactivates a hazard with its base emitter only. A prior combination
    /// is not restored. Restarts the duration window. Active hazards are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::UnknownHazard`] for a foreign handle, or
    /// propagates an emitter rejected by the particle system.
    pub fn activate(&mut self, id: HazardId, particles: &mut ParticleSystem) -> HazardResult<()> {
        let index = self.slot(id)?;
        let hazard = &self.hazards[index];
        if hazard.is_active() {
            return Ok(());
        }
        let emitter = particles.start_continuous_emitter(
            hazard.position,
            hazard.hazard_type.base_effect().descriptor(),
            AREA_EMITTER_INTERVAL_MS,
        )?;

        let now = self.clock.now_ms();
        let hazard = &mut self.hazards[index];
        hazard.stats.active = true;
        hazard.created_at_ms = now;
        hazard.emitters.base = Some(emitter);

        info!(hazard = %id, "hazard activated");
        self.events.publish(HazardEvent::Activated { hazard: id });
        Ok(())
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Advances every hazard: expires temporary ones, keeps area emitters on
    /// their hazard and runs interaction scans when a query is installed.
    ///
    /// # Errors
    ///
    /// Propagates an emitter rejected by the particle system.
    pub fn update(&mut self, delta_ms: f32, particles: &mut ParticleSystem) -> HazardResult<()> {
        let now = self.clock.now_ms();
        trace!(delta_ms, now, hazards = self.hazards.len(), "hazard tick");
        for index in 0..self.hazards.len() {
            self.update_hazard(index, now, particles)?;
        }
        Ok(())
    }

    fn update_hazard(
        &mut self,
        index: usize,
        now: u64,
        particles: &mut ParticleSystem,
    ) -> HazardResult<()> {
        let hazard = &self.hazards[index];
        if !hazard.is_active() {
            return Ok(());
        }
        let id = hazard.id;
        let expired = hazard
            .stats
            .duration_ms
            .is_some_and(|duration| now.saturating_sub(hazard.created_at_ms) >= duration);
        if expired {
            debug!(hazard = %id, "hazard expired");
            self.release(id, particles);
            self.events.publish(HazardEvent::Expired { hazard: id });
            return Ok(());
        }

        if let Some(emitter) = hazard.emitters.anchored() {
            particles.update_emitter_position(emitter, hazard.position);
        }
        if self.query.is_some() {
            self.scan(index, now, particles)?;
        }
        Ok(())
    }

    fn release(&mut self, id: HazardId, particles: &mut ParticleSystem) {
        let mut next = Some(id);
        while let Some(current) = next {
            let hazard = &mut self.hazards[current.index()];
            let was_active = hazard.stats.active;
            hazard.stats.active = false;
            for emitter in hazard.emitters.take_all().into_iter().flatten() {
                particles.stop_continuous_emitter(emitter);
            }
            hazard.nearby.clear();
            next = hazard.partner.take();

            if was_active {
                info!(hazard = %current, "hazard deactivated");
                self.events.publish(HazardEvent::Deactivated { hazard: current });
            }
        }
    }

    // =========================================================================
    // INTERACTIONS
    // =========================================================================

    fn scan(&mut self, index: usize, now: u64, particles: &mut ParticleSystem) -> HazardResult<()> {
        let hazard = &self.hazards[index];
        if hazard
            .last_scan_ms
            .is_some_and(|last| now.saturating_sub(last) < PAIRWISE_SCAN_INTERVAL_MS)
        {
            return Ok(());
        }
        let Some(query) = self.query.as_ref() else {
            return Ok(());
        };

        let id = hazard.id;
        let mut nearby: Vec<HazardId> = Vec::new();
        for other in query.query(&self.hazards, id) {
            if other != id && other.index() < self.hazards.len() && !nearby.contains(&other) {
                nearby.push(other);
            }
        }

        let hazard = &mut self.hazards[index];
        hazard.last_scan_ms = Some(now);
        hazard.nearby.clone_from(&nearby);

        self.check_three_way(index, &nearby, now, particles)?;
        for other in nearby {
            self.check_pairwise(index, other, particles)?;
        }
        Ok(())
    }

    fn check_pairwise(
        &mut self,
        index: usize,
        other: HazardId,
        particles: &mut ParticleSystem,
    ) -> HazardResult<()> {
        let me = &self.hazards[index];
        let them = &self.hazards[other.index()];
        if !me.is_active() || !them.is_active() || !me.is_combined() || !them.is_combined() {
            return Ok(());
        }
        let distance = me.position.distance(them.position);
        if !in_interaction_range(distance) {
            return Ok(());
        }
        let Some(effect) = interaction_effect(me.particle_effect(), them.particle_effect()) else {
            return Ok(());
        };

        let id = me.id;
        let strength = interaction_strength(distance);
        let midpoint = me.position.midpoint(them.position);
        let descriptor = Arc::new(scaled_interaction(&effect.descriptor(), strength));

        let me = &mut self.hazards[index];
        if let Some(previous) = me.emitters.interaction.take() {
            particles.stop_continuous_emitter(previous);
        }
        let emitter =
            particles.start_continuous_emitter(midpoint, descriptor, PAIRWISE_EMITTER_INTERVAL_MS)?;
        me.emitters.interaction = Some(emitter);

        debug!(hazard = %id, other = %other, %effect, strength, "pairwise interaction");
        self.events.publish(HazardEvent::Interaction {
            hazard: id,
            other,
            effect,
            strength,
            position: midpoint,
        });
        Ok(())
    }

    fn check_three_way(
        &mut self,
        index: usize,
        nearby: &[HazardId],
        now: u64,
        particles: &mut ParticleSystem,
    ) -> HazardResult<()> {
        let me = &self.hazards[index];
        if !me.is_combined() {
            return Ok(());
        }
        if me
            .last_three_way_ms
            .is_some_and(|last| now.saturating_sub(last) < THREE_WAY_COOLDOWN_MS)
        {
            return Ok(());
        }

        let partners: Vec<&Hazard> = nearby
            .iter()
            .map(|id| &self.hazards[id.index()])
            .filter(|h| h.is_active() && h.is_combined())
            .collect();
        if partners.len() < 2 {
            return Ok(());
        }

        let mine = me.particle_effect();
        let found = partners.iter().enumerate().find_map(|(i, a)| {
            partners[i + 1..].iter().find_map(|b| {
                three_way_effect([mine, a.particle_effect(), b.particle_effect()])
                    .map(|effect| ([me.id, a.id, b.id], effect))
            })
        });
        match found {
            Some((triple, effect)) => self.trigger_three_way(triple, effect, now, particles),
            None => Ok(()),
        }
    }

    fn trigger_three_way(
        &mut self,
        triple: [HazardId; 3],
        effect: Effect,
        now: u64,
        particles: &mut ParticleSystem,
    ) -> HazardResult<()> {
        let positions = triple.map(|id| self.hazards[id.index()].position);
        let centroid = Vec2::centroid(&positions);
        let spread = positions.iter().map(|p| p.distance(centroid)).sum::<f32>() / 3.0;
        let descriptor = Arc::new(amplified_three_way(&effect.descriptor(), spread));

        let owner = &mut self.hazards[triple[0].index()];
        if let Some(previous) = owner.emitters.three_way.take() {
            particles.stop_continuous_emitter(previous);
        }
        let emitter: EmitterId =
            particles.start_continuous_emitter(centroid, descriptor, THREE_WAY_EMITTER_INTERVAL_MS)?;
        owner.emitters.three_way = Some(emitter);
        owner.last_three_way_ms = Some(now);

        for id in triple {
            let stats = &mut self.hazards[id.index()].stats;
            stats.damage *= THREE_WAY_DAMAGE_MULTIPLIER;
            stats.radius *= THREE_WAY_RADIUS_MULTIPLIER;
        }

        info!(
            hazards = ?triple,
            %effect,
            x = centroid.x,
            y = centroid.y,
            "three-way interaction"
        );
        self.events.publish(HazardEvent::ThreeWayInteraction {
            hazards: triple,
            effect,
            position: centroid,
        });
        Ok(())
    }
}
