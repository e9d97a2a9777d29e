//! Combination, damage and deactivation through the public API.

use tempest_hazards::{
    DamageTarget, HazardConfig, HazardEvent, HazardField, HazardId, HazardType, StatsOverride,
};
use tempest_particles::ParticleSystem;
use tempest_shared::{ManualClock, Vec2};

struct Dummy {
    health: f32,
    at: Vec2,
}

impl DamageTarget for Dummy {
    fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    fn position(&self) -> Vec2 {
        self.at
    }
}

fn setup() -> (HazardField, ParticleSystem, ManualClock) {
    let clock = ManualClock::new(1_000);
    let field = HazardField::new(&HazardConfig::default(), clock.clone()).unwrap();
    (field, ParticleSystem::default(), clock)
}

fn spawn(field: &mut HazardField, particles: &mut ParticleSystem, at: Vec2, kind: HazardType) -> HazardId {
    field.spawn(particles, at, kind, &StatsOverride::default()).unwrap()
}

#[test]
fn two_fires_become_phoenix_wings_at_midpoint() {
    let (mut field, mut particles, _) = setup();
    let a = spawn(&mut field, &mut particles, Vec2::new(10.0, 20.0), HazardType::Fire);
    let b = spawn(&mut field, &mut particles, Vec2::new(110.0, 60.0), HazardType::Fire);

    assert!(field.try_combine(a, b, &mut particles).unwrap());

    let fused = field.hazard(a).unwrap();
    let stats = fused.stats();
    assert!((stats.damage - 50.0).abs() < f32::EPSILON);
    assert!((stats.radius - 140.0).abs() < f32::EPSILON);
    assert_eq!(stats.tick_rate_ms, 250);
    assert_eq!(fused.position(), Vec2::new(60.0, 40.0));
    assert!(fused.is_combined());
    assert_eq!(fused.combined_type(), Some(HazardType::Fire));

    let absorbed = field.hazard(b).unwrap();
    assert!(!absorbed.is_active());
    assert!(absorbed.emitters().base.is_none());
}

#[test]
fn a_hazard_combines_at_most_once() {
    let (mut field, mut particles, _) = setup();
    let a = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Fire);
    let b = spawn(&mut field, &mut particles, Vec2::new(50.0, 0.0), HazardType::Electric);
    let c = spawn(&mut field, &mut particles, Vec2::new(90.0, 0.0), HazardType::Toxic);

    assert!(field.try_combine(a, b, &mut particles).unwrap());
    let before = *field.hazard(a).unwrap().stats();

    assert!(!field.try_combine(a, b, &mut particles).unwrap());
    assert!(!field.try_combine(a, c, &mut particles).unwrap());
    assert!(!field.try_combine(c, a, &mut particles).unwrap());
    assert!(!field.try_combine(c, b, &mut particles).unwrap());

    assert_eq!(*field.hazard(a).unwrap().stats(), before);
    assert!(field.hazard(c).unwrap().is_active());
    assert!(!field.hazard(c).unwrap().is_combined());
}

#[test]
fn damage_is_rate_limited_by_tick_rate() {
    let (mut field, mut particles, clock) = setup();
    let fire = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Fire);
    let mut target = Dummy {
        health: 100.0,
        at: Vec2::new(30.0, 40.0),
    };

    assert!(field.apply_damage(fire, &mut particles, &mut target));
    clock.advance(100);
    assert!(!field.apply_damage(fire, &mut particles, &mut target));
    assert!((target.health - 85.0).abs() < f32::EPSILON);

    clock.advance(400);
    assert!(field.apply_damage(fire, &mut particles, &mut target));
    assert!((target.health - 70.0).abs() < f32::EPSILON);
}

#[test]
fn damage_emits_burst_at_target() {
    let (mut field, mut particles, _) = setup();
    let spike = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Spike);
    let mut target = Dummy {
        health: 100.0,
        at: Vec2::new(10.0, 0.0),
    };
    let events = field.subscribe();

    assert!(field.apply_damage(spike, &mut particles, &mut target));
    assert!(particles.active_count() > 0);
    assert!(particles.particles().iter().all(|p| p.position == Vec2::new(10.0, 0.0)));
    assert_eq!(
        events.try_recv().unwrap(),
        HazardEvent::DamageApplied {
            hazard: spike,
            amount: 25.0,
            position: Vec2::new(10.0, 0.0),
        }
    );
}

#[test]
fn targets_outside_radius_or_inactive_hazards_take_nothing() {
    let (mut field, mut particles, _) = setup();
    let toxic = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Toxic);
    let mut far = Dummy {
        health: 100.0,
        at: Vec2::new(151.0, 0.0),
    };
    assert!(!field.apply_damage(toxic, &mut particles, &mut far));

    let mut near = Dummy {
        health: 100.0,
        at: Vec2::new(150.0, 0.0),
    };
    field.deactivate(toxic, &mut particles).unwrap();
    assert!(!field.check_collision(toxic, near.at));
    assert!(!field.apply_damage(toxic, &mut particles, &mut near));
    assert!((near.health - 100.0).abs() < f32::EPSILON);
}

#[test]
fn deactivate_releases_emitters_but_keeps_combination() {
    let (mut field, mut particles, _) = setup();
    let a = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Spike);
    let b = spawn(&mut field, &mut particles, Vec2::new(20.0, 0.0), HazardType::Spike);
    assert!(field.try_combine(a, b, &mut particles).unwrap());
    assert_eq!(particles.emitter_count(), 1);

    let events = field.subscribe();
    field.deactivate(a, &mut particles).unwrap();

    let hazard = field.hazard(a).unwrap();
    assert!(!hazard.is_active());
    assert_eq!(hazard.combined_type(), Some(HazardType::Spike));
    let emitters = hazard.emitters();
    assert!(emitters.base.is_none());
    assert!(emitters.combination.is_none());
    assert!(emitters.interaction.is_none());
    assert!(emitters.three_way.is_none());
    assert!(hazard.nearby().is_empty());
    assert_eq!(particles.emitter_count(), 0);

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received, vec![HazardEvent::Deactivated { hazard: a }]);

    let c = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Spike);
    field.activate(a, &mut particles).unwrap();
    assert!(!field.try_combine(a, c, &mut particles).unwrap());
}

#[test]
fn combine_publishes_events_in_order() {
    let (mut field, mut particles, _) = setup();
    let a = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Electric);
    let b = spawn(&mut field, &mut particles, Vec2::new(0.0, 40.0), HazardType::Toxic);
    let events = field.subscribe();

    assert!(field.try_combine(a, b, &mut particles).unwrap());
    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert!(matches!(
        received[0],
        HazardEvent::Combined { survivor, absorbed, .. } if survivor == a && absorbed == b
    ));
    assert_eq!(received[1], HazardEvent::Deactivated { hazard: b });
}

#[test]
fn every_subscriber_receives_each_event() {
    let (mut field, mut particles, _) = setup();
    let a = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Electric);
    let b = spawn(&mut field, &mut particles, Vec2::new(0.0, 40.0), HazardType::Toxic);
    let audio = field.subscribe();
    let overlay = field.subscribe();

    assert!(field.try_combine(a, b, &mut particles).unwrap());
    let heard: Vec<_> = audio.try_iter().collect();
    let shown: Vec<_> = overlay.try_iter().collect();
    assert_eq!(heard.len(), 2);
    assert_eq!(heard, shown);
}

#[test]
fn late_subscriber_sees_only_new_events() {
    let (mut field, mut particles, _) = setup();
    let spike = spawn(&mut field, &mut particles, Vec2::ZERO, HazardType::Spike);

    // Far more lifecycle events than the default queue holds, with nobody listening
    for _ in 0..200 {
        field.deactivate(spike, &mut particles).unwrap();
        field.activate(spike, &mut particles).unwrap();
    }

    let events = field.subscribe();
    field.deactivate(spike, &mut particles).unwrap();
    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received, vec![HazardEvent::Deactivated { hazard: spike }]);
}
