//! Public-API invariants of the particle simulator.

use std::f32::consts::TAU;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempest_particles::{
    initial_velocity, EffectDescriptor, Effect, EmissionContext, EmissionOptions, EmissionPattern,
    ParticleConfig, ParticleSystem,
};
use tempest_shared::Vec2;

fn system(max_active: usize, pool_size: usize) -> ParticleSystem {
    ParticleSystem::new(&ParticleConfig {
        max_active,
        pool_size,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn active_count_never_exceeds_cap() {
    let mut sys = system(120, 240);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    sys.start_continuous_emitter(Vec2::new(10.0, 10.0), Effect::FINISHER_SHOCKWAVE.descriptor(), 30.0)
        .unwrap();

    for _ in 0..300 {
        let effect = Effect::ALL[rng.gen_range(0..Effect::ALL.len())];
        let at = Vec2::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        sys.emit(effect, at);
        assert!(sys.active_count() <= 120);

        sys.update(rng.gen_range(0.0..0.05));
        assert!(sys.active_count() <= 120);
        assert_eq!(sys.stats().active as usize, sys.active_count());
    }
}

#[test]
fn lowering_cap_blocks_new_spawns() {
    let mut sys = system(100, 200);
    sys.emit(Effect::FINISHER_SHOCKWAVE, Vec2::ZERO);
    assert_eq!(sys.active_count(), 60);

    sys.set_max_particles(10);
    assert_eq!(sys.emit(Effect::ATTACK_IMPACT, Vec2::ZERO), 0);
}

#[test]
fn catalog_bursts_collide_without_opting_in() {
    let mut sys = system(100, 200);
    let impact = Effect::ATTACK_IMPACT.descriptor();
    let pit = Effect::FIRE_PIT.descriptor();
    assert!(impact.collision_damping.is_none() && pit.collision_damping.is_none());

    let origin = Vec2::new(400.0, 300.0);
    sys.emit(Effect::ATTACK_IMPACT, origin);
    sys.emit(Effect::FIRE_PIT, origin);
    sys.update(0.016);

    // Every particle started on the same point, so each resolves one contact.
    // At the default damping no response is hard enough to throw sparks.
    assert_eq!(sys.active_count(), 25);
    for (_, p) in sys.pool().iter() {
        assert_eq!(p.collision_count, 1);
        assert!(p.velocity.x < 0.0);
        assert!(p.velocity.y.abs() < 1e-4);
    }
}

#[test]
fn progress_stays_below_one_for_live_particles() {
    let mut sys = system(500, 1000);
    sys.emit(Effect::LEVEL_UP, Vec2::new(100.0, 100.0));
    sys.emit(Effect::CELESTIAL_DANCE, Vec2::new(300.0, 100.0));
    sys.emit(Effect::DEBRIS_SCATTER, Vec2::new(200.0, 200.0));

    for _ in 0..400 {
        sys.update(1.0 / 60.0);
        for (_, p) in sys.pool().iter() {
            let progress = p.age / p.lifetime;
            assert!((0.0..1.0).contains(&progress), "progress {progress}");
        }
    }
}

#[test]
fn burst_is_fully_released_after_its_lifetime() {
    let mut sys = system(100, 100);
    sys.emit(Effect::DASH_TRAIL, Vec2::ZERO);
    assert_eq!(sys.active_count(), 5);

    // 300 ms lifetime
    sys.update(0.299);
    assert_eq!(sys.active_count(), 5);
    sys.update(0.002);
    assert_eq!(sys.active_count(), 0);
}

#[test]
fn circle_pattern_quarters() {
    let effect = EffectDescriptor::new("RING", 4, 1000.0, 120.0, 1.0, &[0xffffff], TAU, 0.0)
        .with_pattern(EmissionPattern::Circle, EmissionOptions::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let velocities: Vec<Vec2> = (0..4)
        .map(|index| initial_velocity(&effect, EmissionContext { index, total: 4, elapsed: 0.0 }, &mut rng))
        .collect();

    for (i, v) in velocities.iter().enumerate() {
        assert!((v.length() - 120.0).abs() < 1e-3);
        let expected = (i as f32) * TAU / 4.0;
        let direction = Vec2::from_angle(expected, 1.0);
        assert!((v.normalize_or_zero().dot(direction) - 1.0).abs() < 1e-4);
    }
}

#[test]
fn clamped_burst_spreads_pattern_over_spawned_count() {
    let effect = Arc::new(
        EffectDescriptor::new("RING", 8, 1000.0, 100.0, 1.0, &[0xffffff], TAU, 0.0)
            .with_pattern(EmissionPattern::Circle, EmissionOptions::default()),
    );
    let mut sys = system(4, 8);
    assert_eq!(sys.emit_particles(Vec2::ZERO, &effect), 4);

    let mut angles: Vec<f32> = sys
        .pool()
        .iter()
        .map(|(_, p)| p.velocity.angle().rem_euclid(TAU))
        .collect();
    angles.sort_by(f32::total_cmp);
    for pair in angles.windows(2) {
        assert!((pair[1] - pair[0] - TAU / 4.0).abs() < 1e-3);
    }
}

#[test]
fn branch_tree_render_data_has_defaults_and_order() {
    let mut sys = system(200, 400);
    sys.emit(Effect::LIGHTNING_STRIKE_CHAIN, Vec2::new(50.0, 50.0));
    for _ in 0..120 {
        sys.update(1.0 / 60.0);
    }
    for chain in sys.chain_effects() {
        assert!(!chain.points.is_empty());
        assert!(chain.thickness > 0.0);
    }
}

#[test]
fn released_slots_are_never_referenced() {
    let mut sys = system(300, 300);
    for _ in 0..5 {
        sys.emit(Effect::VOID_RUPTURE, Vec2::new(400.0, 300.0));
        sys.emit(Effect::ARC_TETHER, Vec2::new(420.0, 300.0));
    }
    for _ in 0..300 {
        sys.update(1.0 / 30.0);
        for (_, p) in sys.pool().iter() {
            for link in &p.links {
                assert!(sys.particle(*link).is_some());
            }
            if let Some(parent) = p.branch_parent {
                assert!(sys.particle(parent).is_some());
            }
            for child in &p.branch_children {
                assert!(sys.particle(*child).is_some());
            }
        }
    }
}
