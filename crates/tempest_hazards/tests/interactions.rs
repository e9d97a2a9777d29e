//! Pairwise and three-way interactions between combined hazards.

use tempest_hazards::{
    Hazard, HazardConfig, HazardEvent, HazardField, HazardId, HazardType, RadiusQuery,
    StatsOverride,
};
use tempest_particles::{EmissionPattern, ParticleSystem};
use tempest_shared::{ManualClock, Vec2};

const FRAME_MS: f32 = 16.0;

fn setup() -> (HazardField, ParticleSystem, ManualClock) {
    let clock = ManualClock::new(50_000);
    let field = HazardField::new(&HazardConfig::default(), clock.clone()).unwrap();
    (field, ParticleSystem::default(), clock)
}

/// Spawns two hazards at `at` and fuses them, returning the survivor.
fn fused(
    field: &mut HazardField,
    particles: &mut ParticleSystem,
    at: Vec2,
    first: HazardType,
    second: HazardType,
) -> HazardId {
    let a = field.spawn(particles, at, first, &StatsOverride::default()).unwrap();
    let b = field.spawn(particles, at, second, &StatsOverride::default()).unwrap();
    assert!(field.try_combine(a, b, particles).unwrap());
    a
}

// =============================================================================
// PAIRWISE
// =============================================================================

#[test]
fn pairwise_emitter_is_scaled_by_distance() {
    let (mut field, mut particles, _) = setup();
    let storm = fused(&mut field, &mut particles, Vec2::ZERO, HazardType::Fire, HazardType::Electric);
    let magma = fused(&mut field, &mut particles, Vec2::new(125.0, 0.0), HazardType::Fire, HazardType::Toxic);
    field.set_nearby_query(RadiusQuery::new(250.0));

    field.update(FRAME_MS, &mut particles).unwrap();

    let emitter_id = field.hazard(storm).unwrap().emitters().interaction.unwrap();
    let emitter = particles.emitter(emitter_id).unwrap();
    assert_eq!(emitter.effect.name, "CELESTIAL_DANCE");
    assert_eq!(emitter.effect.particle_count, 14);
    assert_eq!(emitter.position, Vec2::new(62.5, 0.0));
    assert!((emitter.interval - 0.2).abs() < 1e-6);

    assert!(field.hazard(magma).unwrap().emitters().interaction.is_some());
}

#[test]
fn pairwise_requires_distance_strictly_inside_range() {
    for distance in [40.0, 50.0, 200.0, 240.0] {
        let (mut field, mut particles, _) = setup();
        let storm = fused(&mut field, &mut particles, Vec2::ZERO, HazardType::Fire, HazardType::Electric);
        fused(&mut field, &mut particles, Vec2::new(distance, 0.0), HazardType::Fire, HazardType::Toxic);
        field.set_nearby_query(RadiusQuery::new(250.0));

        field.update(FRAME_MS, &mut particles).unwrap();
        assert!(
            field.hazard(storm).unwrap().emitters().interaction.is_none(),
            "distance {distance}"
        );
    }
}

#[test]
fn uncombined_neighbours_do_not_interact() {
    let (mut field, mut particles, _) = setup();
    let storm = fused(&mut field, &mut particles, Vec2::ZERO, HazardType::Fire, HazardType::Electric);
    field
        .spawn(&mut particles, Vec2::new(100.0, 0.0), HazardType::Toxic, &StatsOverride::default())
        .unwrap();
    field.set_nearby_query(RadiusQuery::new(250.0));

    field.update(FRAME_MS, &mut particles).unwrap();
    assert!(field.hazard(storm).unwrap().emitters().interaction.is_none());
}

#[test]
fn pairwise_scan_is_throttled() {
    let (mut field, mut particles, clock) = setup();
    let storm = fused(&mut field, &mut particles, Vec2::ZERO, HazardType::Fire, HazardType::Electric);
    fused(&mut field, &mut particles, Vec2::new(100.0, 0.0), HazardType::Fire, HazardType::Toxic);
    field.set_nearby_query(RadiusQuery::new(250.0));

    field.update(FRAME_MS, &mut particles).unwrap();
    let first = field.hazard(storm).unwrap().emitters().interaction.unwrap();

    clock.advance(999);
    field.update(FRAME_MS, &mut particles).unwrap();
    assert_eq!(field.hazard(storm).unwrap().emitters().interaction, Some(first));

    clock.advance(1);
    field.update(FRAME_MS, &mut particles).unwrap();
    let second = field.hazard(storm).unwrap().emitters().interaction.unwrap();
    assert_ne!(first, second);
    assert!(particles.emitter(first).is_none());
}

#[test]
fn without_query_nothing_interacts() {
    let (mut field, mut particles, clock) = setup();
    let storm = fused(&mut field, &mut particles, Vec2::ZERO, HazardType::Fire, HazardType::Electric);
    let magma = fused(&mut field, &mut particles, Vec2::new(100.0, 0.0), HazardType::Fire, HazardType::Toxic);
    let rift = fused(&mut field, &mut particles, Vec2::new(50.0, 80.0), HazardType::Electric, HazardType::Toxic);
    assert!(!field.has_nearby_query());

    for _ in 0..10 {
        clock.advance(2_000);
        field.update(FRAME_MS, &mut particles).unwrap();
    }
    for id in [storm, magma, rift] {
        let hazard = field.hazard(id).unwrap();
        assert!(hazard.emitters().interaction.is_none());
        assert!(hazard.emitters().three_way.is_none());
        assert!(hazard.nearby().is_empty());
    }
}

// =============================================================================
// THREE-WAY
// =============================================================================

struct Triangle {
    storm: HazardId,
    magma: HazardId,
    rift: HazardId,
}

/// STORM_SURGE, MAGMA_ERUPTION and QUANTUM_RIFT pairwise in range. Only the
/// storm hazard sees neighbours.
fn triangle(field: &mut HazardField, particles: &mut ParticleSystem, neighbours: usize) -> Triangle {
    let storm = fused(field, particles, Vec2::ZERO, HazardType::Fire, HazardType::Electric);
    let magma = fused(field, particles, Vec2::new(100.0, 0.0), HazardType::Fire, HazardType::Toxic);
    let rift = fused(field, particles, Vec2::new(50.0, 80.0), HazardType::Electric, HazardType::Toxic);
    let visible: Vec<HazardId> = [magma, rift].into_iter().take(neighbours).collect();
    field.set_nearby_query(move |_: &[Hazard], origin: HazardId| {
        if origin == storm {
            visible.clone()
        } else {
            Vec::new()
        }
    });
    Triangle { storm, magma, rift }
}

#[test]
fn three_way_amplifies_participants() {
    let (mut field, mut particles, _) = setup();
    let t = triangle(&mut field, &mut particles, 2);
    let events = field.subscribe();

    field.update(FRAME_MS, &mut particles).unwrap();

    let storm = field.hazard(t.storm).unwrap();
    let emitter_id = storm.emitters().three_way.unwrap();
    let emitter = particles.emitter(emitter_id).unwrap();
    assert_eq!(emitter.effect.name, "CELESTIAL_DANCE");
    assert_eq!(emitter.effect.pattern, Some(EmissionPattern::Vortex));
    assert_eq!(emitter.effect.particle_count, 42);
    assert!((emitter.position.x - 50.0).abs() < 1e-4);
    assert!((emitter.position.y - 80.0 / 3.0).abs() < 1e-4);

    assert!((storm.stats().damage - 35.0 * 1.5).abs() < 1e-4);
    assert!((storm.stats().radius - 150.0 * 1.2).abs() < 1e-4);
    let magma = field.hazard(t.magma).unwrap();
    assert!((magma.stats().damage - 25.0 * 1.5).abs() < 1e-4);
    let rift = field.hazard(t.rift).unwrap();
    assert!((rift.stats().radius - 200.0 * 1.2).abs() < 1e-4);

    assert!(events.try_iter().any(|e| matches!(
        e,
        HazardEvent::ThreeWayInteraction { hazards, .. } if hazards[0] == t.storm
    )));
}

#[test]
fn three_way_needs_two_combined_neighbours() {
    let (mut field, mut particles, clock) = setup();
    let t = triangle(&mut field, &mut particles, 1);

    for _ in 0..3 {
        field.update(FRAME_MS, &mut particles).unwrap();
        clock.advance(2_000);
    }
    let storm = field.hazard(t.storm).unwrap();
    assert!(storm.emitters().three_way.is_none());
    assert!((storm.stats().damage - 35.0).abs() < f32::EPSILON);
}

#[test]
fn three_way_respects_cooldown() {
    let (mut field, mut particles, clock) = setup();
    let t = triangle(&mut field, &mut particles, 2);

    field.update(FRAME_MS, &mut particles).unwrap();
    let first = field.hazard(t.storm).unwrap().emitters().three_way.unwrap();
    let damage = field.hazard(t.storm).unwrap().stats().damage;

    clock.advance(1_000);
    field.update(FRAME_MS, &mut particles).unwrap();
    clock.advance(400);
    field.update(FRAME_MS, &mut particles).unwrap();
    assert_eq!(field.hazard(t.storm).unwrap().emitters().three_way, Some(first));
    assert!((field.hazard(t.storm).unwrap().stats().damage - damage).abs() < f32::EPSILON);

    clock.advance(600);
    field.update(FRAME_MS, &mut particles).unwrap();
    let second = field.hazard(t.storm).unwrap().emitters().three_way.unwrap();
    assert_ne!(first, second);
    assert!(particles.emitter(first).is_none());
    assert!((field.hazard(t.storm).unwrap().stats().damage - damage * 1.5).abs() < 1e-3);
}

#[test]
fn unlisted_triple_does_nothing() {
    let (mut field, mut particles, _) = setup();
    let cryo = fused(&mut field, &mut particles, Vec2::ZERO, HazardType::Electric, HazardType::Spike);
    fused(&mut field, &mut particles, Vec2::new(100.0, 0.0), HazardType::Spike, HazardType::Spike);
    fused(&mut field, &mut particles, Vec2::new(50.0, 80.0), HazardType::Electric, HazardType::Electric);
    field.set_nearby_query(RadiusQuery::new(250.0));

    field.update(FRAME_MS, &mut particles).unwrap();
    assert!(field.hazard(cryo).unwrap().emitters().three_way.is_none());
}
