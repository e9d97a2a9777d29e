//! End-to-end scenario runs against the shipped scenario files.

use std::path::PathBuf;

use tempest::{Scenario, ScenarioReport, Simulation, SimulationConfig};
use tempest_hazards::{HazardEvent, HazardId};
use tempest_particles::Effect;
use tempest_shared::ManualClock;

fn scenario(name: &str) -> Scenario {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "scenarios", name].iter().collect();
    Scenario::load(path).unwrap()
}

fn run_simulated(name: &str) -> (ScenarioReport, Simulation) {
    let clock = ManualClock::new(0);
    let mut sim = Simulation::with_clock(&SimulationConfig::default(), clock.clone()).unwrap();
    let report = scenario(name).run_simulated(&mut sim, &clock).unwrap();
    (report, sim)
}

#[test]
fn shipped_scenarios_load() {
    let dir: PathBuf = [env!("CARGO_MANIFEST_DIR"), "scenarios"].iter().collect();
    let mut loaded = 0;
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            Scenario::load(&path).unwrap();
            loaded += 1;
        }
    }
    assert!(loaded >= 2);
}

// =============================================================================
// THREE-WAY
// =============================================================================

#[test]
fn three_way_scenario_fuses_and_interacts() {
    let (report, sim) = run_simulated("three_way.toml");

    assert_eq!(report.frames, 180);
    assert_eq!(report.combinations, 3);
    assert_eq!(report.active_hazards, 3);
    assert_eq!(report.count_events(|e| matches!(e, HazardEvent::Combined { .. })), 3);

    let three_way: Vec<&HazardEvent> = report
        .events
        .iter()
        .filter(|e| matches!(e, HazardEvent::ThreeWayInteraction { .. }))
        .collect();
    assert!(three_way.len() >= 3);
    for event in three_way {
        let HazardEvent::ThreeWayInteraction { effect, .. } = event else { unreachable!() };
        assert_eq!(*effect, Effect::CELESTIAL_DANCE);
    }
    assert!(report.count_events(|e| matches!(e, HazardEvent::Interaction { .. })) >= 1);

    // Amplified storm surge lands one hit above its stock damage
    assert_eq!(report.hits, 1);
    assert!(report.damage_dealt > 35.0);

    assert!(report.peak_particles > 0);
    assert!(report.peak_particles <= 500);
    assert_eq!(report.final_particles, sim.particles().active_count());
}

#[test]
fn three_way_scenario_on_wall_clock() {
    let mut sim = Simulation::new(&SimulationConfig::default()).unwrap();
    let report = scenario("three_way.toml").run(&mut sim).unwrap();

    assert_eq!(report.combinations, 3);
    // The first scan of every survivor runs on the first frame
    assert!(report.count_events(|e| matches!(e, HazardEvent::ThreeWayInteraction { .. })) >= 1);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn lifecycle_scenario_follows_simulated_time() {
    let (report, sim) = run_simulated("lifecycle.toml");

    assert_eq!(report.combinations, 1);
    // Second strike lands inside the PHOENIX_WINGS tick rate
    assert_eq!(report.hits, 1);
    assert!((report.damage_dealt - 50.0).abs() < f32::EPSILON);

    let expired: Vec<HazardId> = report
        .events
        .iter()
        .filter_map(|e| match e {
            HazardEvent::Expired { hazard } => Some(*hazard),
            _ => None,
        })
        .collect();
    assert_eq!(expired.len(), 1);

    assert_eq!(report.count_events(|e| matches!(e, HazardEvent::Deactivated { .. })), 3);
    assert_eq!(report.count_events(|e| matches!(e, HazardEvent::Activated { .. })), 1);

    // Only the reactivated fusion survives, back on its base emitter
    assert_eq!(report.active_hazards, 1);
    assert_eq!(report.final_emitters, 1);
    let survivor = sim.hazards().active().next().unwrap();
    assert!(survivor.is_combined());
    assert_eq!(survivor.particle_effect(), Effect::PHOENIX_WINGS);
}

#[test]
fn seeded_runs_repeat_exactly() {
    let (first, a) = run_simulated("three_way.toml");
    let (second, b) = run_simulated("three_way.toml");
    assert_eq!(first, second);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn workspace_config_loads_and_enables_spatial_query() {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "..", "..", "tempest.toml"].iter().collect();
    let config = SimulationConfig::load(path).unwrap();
    assert_eq!(config.particles.seed, 42);

    let sim = Simulation::with_clock(&config, ManualClock::new(0)).unwrap();
    assert!(sim.hazards().has_nearby_query());
}
