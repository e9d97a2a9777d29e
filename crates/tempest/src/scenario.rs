//! # Scripted Scenarios
//!
//! A scenario declares hazards, a frame count and a list of actions keyed by
//! frame. Names and hazard references are resolved when the file is loaded,
//! so a scenario that loads always runs.
//!
//! ```toml
//! frames = 120
//! dt = 0.016
//! nearby_radius = 250.0
//!
//! [[hazards]]
//! type = "fire"
//! x = 100.0
//! y = 100.0
//! damage = 30.0
//!
//! [[actions]]
//! frame = 10
//! kind = "combine"
//! survivor = 0
//! other = 1
//! ```
//!
//! ## Frame Order
//!
//! ```text
//! for frame in 0..frames:
//!     run actions scheduled for this frame (file order)
//!     simulation.update(dt)
//!     advance the manual clock by dt (run_simulated only)
//!     drain hazard events, track peak particle count
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tempest_hazards::{DamageTarget, HazardEvent, HazardId, HazardType, RadiusQuery, StatsOverride};
use tempest_particles::Effect;
use tempest_shared::{Clock, ManualClock, Vec2};
use tracing::{debug, info};

use crate::error::{SimulationError, SimulationResult};
use crate::simulation::Simulation;

const DEFAULT_DT: f32 = 1.0 / 60.0;

// =============================================================================
// FILE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawScenario {
    frames: u64,
    #[serde(default = "default_dt")]
    dt: f32,
    #[serde(default)]
    nearby_radius: Option<f32>,
    #[serde(default)]
    hazards: Vec<HazardSpec>,
    #[serde(default)]
    actions: Vec<RawAction>,
}

const fn default_dt() -> f32 {
    DEFAULT_DT
}

/// A hazard placed before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HazardSpec {
    /// Spawn position x
    pub x: f32,
    /// Spawn position y
    pub y: f32,
    /// Hazard type
    #[serde(rename = "type")]
    pub kind: HazardType,
    /// Stat overrides, written inline next to the position
    #[serde(flatten)]
    pub stats: StatsOverride,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawAction {
    Emit { frame: u64, effect: String, x: f32, y: f32 },
    Combine { frame: u64, survivor: usize, other: usize },
    Move { frame: u64, hazard: usize, x: f32, y: f32 },
    Deactivate { frame: u64, hazard: usize },
    Activate { frame: u64, hazard: usize },
    Strike { frame: u64, hazard: usize, x: f32, y: f32 },
}

// =============================================================================
// RESOLVED FORM
// =============================================================================

/// One scripted step. Hazards are indices into [`Scenario::hazards`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// One-shot burst of a catalog effect
    Emit {
        /// Effect to emit
        effect: Effect,
        /// Burst origin
        position: Vec2,
    },
    /// Fuse `other` into `survivor`
    Combine {
        /// Hazard that keeps running
        survivor: usize,
        /// Hazard that is absorbed
        other: usize,
    },
    /// Move a hazard
    Move {
        /// Hazard index
        hazard: usize,
        /// New centre
        position: Vec2,
    },
    /// Deactivate a hazard
    Deactivate {
        /// Hazard index
        hazard: usize,
    },
    /// Reactivate a hazard
    Activate {
        /// Hazard index
        hazard: usize,
    },
    /// Offer a damage target at `position` to a hazard
    Strike {
        /// Hazard index
        hazard: usize,
        /// Target position
        position: Vec2,
    },
}

/// An action and the frame it runs before.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledAction {
    /// Frame index, starting at 0
    pub frame: u64,
    /// What to do
    pub action: Action,
}

/// A validated, ready-to-run scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Frames to step
    pub frames: u64,
    /// Seconds per frame
    pub dt: f32,
    /// Installs a radius query with this radius when set
    pub nearby_radius: Option<f32>,
    /// Hazards spawned before the first frame, in order
    pub hazards: Vec<HazardSpec>,
    /// Actions sorted by frame, file order within a frame
    pub actions: Vec<ScheduledAction>,
}

impl Scenario {
    /// Reads and resolves a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or TOML error, an unknown effect name, an action that
    /// references an undeclared hazard, or an invalid `dt`.
    pub fn load<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    fn resolve(raw: RawScenario) -> SimulationResult<Self> {
        if !(raw.dt.is_finite() && raw.dt > 0.0) {
            return Err(SimulationError::InvalidScenario(format!(
                "dt must be positive, got {}",
                raw.dt
            )));
        }
        if let Some(radius) = raw.nearby_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(SimulationError::InvalidScenario(format!(
                    "nearby_radius must be positive, got {radius}"
                )));
            }
        }

        let declared = raw.hazards.len();
        let check = |frame: u64, index: usize| {
            if index < declared {
                Ok(index)
            } else {
                Err(SimulationError::UnknownHazard { frame, index, declared })
            }
        };

        let mut actions = raw
            .actions
            .into_iter()
            .map(|action| -> SimulationResult<ScheduledAction> {
                let scheduled = match action {
                    RawAction::Emit { frame, effect, x, y } => ScheduledAction {
                        frame,
                        action: Action::Emit {
                            effect: Effect::lookup(&effect)?,
                            position: Vec2::new(x, y),
                        },
                    },
                    RawAction::Combine { frame, survivor, other } => ScheduledAction {
                        frame,
                        action: Action::Combine {
                            survivor: check(frame, survivor)?,
                            other: check(frame, other)?,
                        },
                    },
                    RawAction::Move { frame, hazard, x, y } => ScheduledAction {
                        frame,
                        action: Action::Move {
                            hazard: check(frame, hazard)?,
                            position: Vec2::new(x, y),
                        },
                    },
                    RawAction::Deactivate { frame, hazard } => ScheduledAction {
                        frame,
                        action: Action::Deactivate { hazard: check(frame, hazard)? },
                    },
                    RawAction::Activate { frame, hazard } => ScheduledAction {
                        frame,
                        action: Action::Activate { hazard: check(frame, hazard)? },
                    },
                    RawAction::Strike { frame, hazard, x, y } => ScheduledAction {
                        frame,
                        action: Action::Strike {
                            hazard: check(frame, hazard)?,
                            position: Vec2::new(x, y),
                        },
                    },
                };
                Ok(scheduled)
            })
            .collect::<SimulationResult<Vec<_>>>()?;
        actions.sort_by_key(|a| a.frame);

        Ok(Self {
            frames: raw.frames,
            dt: raw.dt,
            nearby_radius: raw.nearby_radius,
            hazards: raw.hazards,
            actions,
        })
    }

    // =========================================================================
    // EXECUTION
    // =========================================================================

    /// Spawns the declared hazards into `sim` and steps it `frames` times.
    ///
    /// Real-time rules (tick rates, scan throttles, lifespans) follow
    /// whatever clock `sim` was built with.
    ///
    /// # Errors
    ///
    /// Propagates an emitter or handle error from the simulation.
    pub fn run(&self, sim: &mut Simulation) -> SimulationResult<ScenarioReport> {
        self.execute(sim, None)
    }

    /// Like [`run`](Self::run), but moves `clock` forward by `dt` after every
    /// frame so real-time rules follow simulated time. `sim` must have been
    /// built on `clock`.
    ///
    /// # Errors
    ///
    /// Propagates an emitter or handle error from the simulation.
    pub fn run_simulated(
        &self,
        sim: &mut Simulation,
        clock: &ManualClock,
    ) -> SimulationResult<ScenarioReport> {
        self.execute(sim, Some(clock))
    }

    fn execute(
        &self,
        sim: &mut Simulation,
        clock: Option<&ManualClock>,
    ) -> SimulationResult<ScenarioReport> {
        let events = sim.subscribe();
        if let Some(radius) = self.nearby_radius {
            sim.set_nearby_query(RadiusQuery::new(radius));
        }

        let ids = self
            .hazards
            .iter()
            .map(|spec| sim.spawn_hazard(Vec2::new(spec.x, spec.y), spec.kind, &spec.stats))
            .collect::<SimulationResult<Vec<HazardId>>>()?;
        info!(
            hazards = ids.len(),
            frames = self.frames,
            actions = self.actions.len(),
            "scenario started"
        );

        let start_ms = clock.map_or(0, |c| c.now_ms());
        let mut simulated_ms = 0.0_f64;
        let mut report = ScenarioReport::default();
        let mut pending = self.actions.iter().peekable();
        for frame in 0..self.frames {
            while let Some(scheduled) = pending.next_if(|a| a.frame == frame) {
                Self::apply(sim, &ids, scheduled.action, &mut report)?;
            }
            sim.update(self.dt)?;
            if let Some(clock) = clock {
                simulated_ms += f64::from(self.dt) * 1000.0;
                clock.set(start_ms + simulated_ms as u64);
            }
            report.frames += 1;
            report.peak_particles = report.peak_particles.max(sim.particles().active_count());
            report.events.extend(events.try_iter());
        }
        if pending.peek().is_some() {
            debug!(skipped = pending.count(), "actions scheduled past the last frame");
        }

        report.final_particles = sim.particles().active_count();
        report.final_emitters = sim.particles().emitter_count();
        report.active_hazards = sim.hazards().active().count();
        info!(
            frames = report.frames,
            peak = report.peak_particles,
            events = report.events.len(),
            "scenario finished"
        );
        Ok(report)
    }

    fn apply(
        sim: &mut Simulation,
        ids: &[HazardId],
        action: Action,
        report: &mut ScenarioReport,
    ) -> SimulationResult<()> {
        let handle = |index: usize| {
            ids.get(index).copied().ok_or_else(|| {
                SimulationError::InvalidScenario(format!("hazard index {index} was never spawned"))
            })
        };
        match action {
            Action::Emit { effect, position } => {
                sim.emit(effect, position);
            }
            Action::Combine { survivor, other } => {
                if sim.combine(handle(survivor)?, handle(other)?)? {
                    report.combinations += 1;
                }
            }
            Action::Move { hazard, position } => sim.move_hazard(handle(hazard)?, position)?,
            Action::Deactivate { hazard } => sim.deactivate_hazard(handle(hazard)?)?,
            Action::Activate { hazard } => sim.activate_hazard(handle(hazard)?)?,
            Action::Strike { hazard, position } => {
                let mut target = StrikeTarget { position, received: 0.0 };
                if sim.apply_damage(handle(hazard)?, &mut target) {
                    report.hits += 1;
                    report.damage_dealt += target.received;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Scenario {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: RawScenario = toml::from_str(s)?;
        Self::resolve(raw)
    }
}

/// Stand-in combat target for strike actions.
struct StrikeTarget {
    position: Vec2,
    received: f32,
}

impl DamageTarget for StrikeTarget {
    fn take_damage(&mut self, amount: f32) {
        self.received += amount;
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// What happened during a scenario run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioReport {
    /// Frames stepped
    pub frames: u64,
    /// Highest live particle count seen after a frame
    pub peak_particles: usize,
    /// Live particles after the last frame
    pub final_particles: usize,
    /// Continuous emitters after the last frame
    pub final_emitters: usize,
    /// Active hazards after the last frame
    pub active_hazards: usize,
    /// Successful combine actions
    pub combinations: usize,
    /// Strike actions that landed
    pub hits: usize,
    /// Total damage from strike actions
    pub damage_dealt: f32,
    /// Hazard events in publication order
    pub events: Vec<HazardEvent>,
}

impl ScenarioReport {
    /// Events matching `predicate`.
    pub fn count_events(&self, predicate: impl Fn(&HazardEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames:          {}", self.frames)?;
        writeln!(f, "peak particles:  {}", self.peak_particles)?;
        writeln!(f, "final particles: {}", self.final_particles)?;
        writeln!(f, "final emitters:  {}", self.final_emitters)?;
        writeln!(f, "active hazards:  {}", self.active_hazards)?;
        writeln!(f, "combinations:    {}", self.combinations)?;
        writeln!(f, "hits:            {} ({:.1} damage)", self.hits, self.damage_dealt)?;
        write!(f, "events:          {}", self.events.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_scenario() {
        let scenario: Scenario = "frames = 10".parse().unwrap();
        assert_eq!(scenario.frames, 10);
        assert!((scenario.dt - DEFAULT_DT).abs() < f32::EPSILON);
        assert!(scenario.hazards.is_empty());
        assert!(scenario.actions.is_empty());
    }

    #[test]
    fn test_inline_stat_overrides() {
        let scenario: Scenario = r#"
            frames = 1
            [[hazards]]
            type = "toxic"
            x = 10.0
            y = 20.0
            damage = 99.0
            tick_rate_ms = 50
        "#
        .parse()
        .unwrap();
        let spec = scenario.hazards[0];
        assert_eq!(spec.kind, HazardType::Toxic);
        assert_eq!(spec.stats.damage, Some(99.0));
        assert_eq!(spec.stats.tick_rate_ms, Some(50));
        assert_eq!(spec.stats.radius, None);
    }

    #[test]
    fn test_actions_sorted_by_frame() {
        let scenario: Scenario = r#"
            frames = 5
            [[actions]]
            frame = 3
            kind = "emit"
            effect = "ENERGY_BLAST"
            x = 0.0
            y = 0.0
            [[actions]]
            frame = 1
            kind = "emit"
            effect = "JUMP_DUST"
            x = 0.0
            y = 0.0
        "#
        .parse()
        .unwrap();
        let frames: Vec<u64> = scenario.actions.iter().map(|a| a.frame).collect();
        assert_eq!(frames, vec![1, 3]);
    }

    #[test]
    fn test_unknown_effect_name() {
        let err = r#"
            frames = 1
            [[actions]]
            frame = 0
            kind = "emit"
            effect = "NOT_AN_EFFECT"
            x = 0.0
            y = 0.0
        "#
        .parse::<Scenario>()
        .unwrap_err();
        assert!(matches!(err, SimulationError::Particle(_)));
    }

    #[test]
    fn test_undeclared_hazard_reference() {
        let err = r#"
            frames = 1
            [[hazards]]
            type = "fire"
            x = 0.0
            y = 0.0
            [[actions]]
            frame = 4
            kind = "deactivate"
            hazard = 1
        "#
        .parse::<Scenario>()
        .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::UnknownHazard { frame: 4, index: 1, declared: 1 }
        ));
    }

    #[test]
    fn test_non_positive_dt() {
        let err = "frames = 1\ndt = 0.0".parse::<Scenario>().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidScenario(_)));
    }

    #[test]
    fn test_unknown_hazard_type() {
        let err = "frames = 1\n[[hazards]]\ntype = \"lava\"\nx = 0.0\ny = 0.0"
            .parse::<Scenario>()
            .unwrap_err();
        assert!(matches!(err, SimulationError::Toml(_)));
    }
}
