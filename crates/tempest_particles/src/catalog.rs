//! # Effect Catalog
//!
//! The fixed, process-wide set of named effect descriptors. Entries are
//! additions-only constant data: gameplay code refers to them through the
//! [`Effect`] enum, and configuration files refer to them by name.
//!
//! ## Groups
//!
//! - Combat feedback: `ATTACK_IMPACT` through `FINISHER_SHOCKWAVE`
//! - Hazard base and damage effects: `FIRE_PIT` through `SPIKE_DAMAGE`
//! - Hazard combinations and interactions: `STEAM_CLOUD` through `CELESTIAL_DANCE`
//! - Engine effects: `COLLISION_SPARK`, `ARC_TETHER`, `DEBRIS_SCATTER`

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use tempest_shared::Rgb;

use crate::descriptor::{
    BranchKind, BranchingBehavior, ChainLinkBehavior, EffectDescriptor, EmissionOptions,
    EmissionPattern, FlockingBehavior, ParticleShape,
};
use crate::error::{ParticleError, ParticleResult};

// =============================================================================
// BUILDERS
// =============================================================================

fn fx(
    count: u32,
    lifetime_ms: f32,
    speed: f32,
    size: f32,
    palette: &[u32],
    spread: f32,
    gravity: f32,
) -> EffectDescriptor {
    EffectDescriptor::new("", count, lifetime_ms, speed, size, palette, spread, gravity)
}

#[allow(clippy::too_many_arguments)]
const fn flock(
    separation_radius: f32,
    separation_force: f32,
    alignment_radius: f32,
    alignment_force: f32,
    cohesion_radius: f32,
    cohesion_force: f32,
    max_speed: f32,
) -> FlockingBehavior {
    FlockingBehavior {
        separation_radius,
        separation_force,
        alignment_radius,
        alignment_force,
        cohesion_radius,
        cohesion_force,
        max_speed,
    }
}

#[allow(clippy::too_many_arguments)]
const fn branch(
    kind: BranchKind,
    branch_probability: f32,
    max_branches: usize,
    segment_length: f32,
    noise_scale: f32,
    thickness: f32,
    color: u32,
    glow_color: u32,
    glow_intensity: f32,
) -> BranchingBehavior {
    BranchingBehavior {
        kind,
        branch_probability,
        max_branches,
        segment_length,
        noise_scale,
        thickness,
        color: Rgb::from_hex(color),
        glow_color: Rgb::from_hex(glow_color),
        glow_intensity,
    }
}

fn options() -> EmissionOptions {
    EmissionOptions::default()
}

// =============================================================================
// CATALOG
// =============================================================================

macro_rules! catalog {
    ($( $variant:ident => $build:expr; )*) => {
        /// Identity of a catalog entry.
        ///
        /// Ordering follows declaration order and is only used to build
        /// order-independent lookup keys.
        #[allow(non_camel_case_types, missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Effect {
            $( $variant, )*
        }

        impl Effect {
            /// Every catalog entry, in declaration order.
            pub const ALL: &'static [Effect] = &[$( Effect::$variant, )*];

            /// Catalog name, e.g. `"PHOENIX_WINGS"`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Effect::$variant => stringify!($variant), )*
                }
            }

            fn build(self) -> EffectDescriptor {
                let mut descriptor = match self {
                    $( Effect::$variant => $build, )*
                };
                descriptor.name = self.name();
                descriptor
            }
        }
    };
}

catalog! {
    // Combat feedback
    ATTACK_IMPACT => fx(10, 500.0, 200.0, 1.0, &[0xff0000, 0xff6666, 0xffcccc], PI, 300.0);
    DASH_TRAIL => fx(5, 300.0, 50.0, 0.8, &[0x66ccff, 0x99ddff, 0xcceeff], PI / 4.0, 0.0);
    JUMP_DUST => fx(8, 400.0, 100.0, 0.6, &[0xcccccc, 0xdddddd, 0xeeeeee], PI / 2.0, 100.0);
    ENERGY_BLAST => fx(15, 600.0, 250.0, 1.2, &[0xffff00, 0xffcc00, 0xff9900], TAU, 0.0);
    ENEMY_DAMAGE => fx(6, 400.0, 150.0, 0.7, &[0xff4444, 0xff8888, 0xffcccc], PI / 3.0, 200.0);
    ENEMY_DEATH => fx(20, 800.0, 300.0, 1.0, &[0xff0000, 0xff4444, 0xff8888, 0xffffff], TAU, 100.0);
    LEVEL_UP => fx(30, 1200.0, 400.0, 1.5, &[0xffff00, 0x00ff00, 0x00ffff, 0xffffff], TAU, -50.0);
    POWER_UP => fx(12, 600.0, 200.0, 1.0, &[0xff00ff, 0xff66ff, 0xffccff], TAU, -100.0);
    LANDING_IMPACT => fx(12, 500.0, 150.0, 0.8, &[0xbbbbbb, 0xcccccc, 0xdddddd], PI, 50.0);
    HEALTH_PICKUP => fx(8, 600.0, 150.0, 1.0, &[0x00ff00, 0x66ff66, 0xccffcc], TAU, -50.0);
    ENERGY_PICKUP => fx(8, 600.0, 150.0, 1.0, &[0x0088ff, 0x66aaff, 0xcceeff], TAU, -50.0);
    COMBO_HIT_1 => fx(8, 400.0, 180.0, 0.8, &[0xff6600, 0xff8844, 0xffaa88], PI * 0.8, 200.0);
    COMBO_HIT_2 => fx(12, 500.0, 220.0, 1.0, &[0xff3300, 0xff6644, 0xff9988, 0xffcccc], PI, 150.0);
    COMBO_HIT_3 => fx(
        15, 600.0, 250.0, 1.2,
        &[0xff0000, 0xff4444, 0xff8888, 0xffcccc, 0xffffff],
        PI * 1.2, 100.0,
    );
    COMBO_FINISHER => fx(
        25, 800.0, 300.0, 1.5,
        &[0xff0000, 0xff3300, 0xff6600, 0xff9900, 0xffcc00, 0xffff00, 0xffffff],
        TAU, 50.0,
    );
    COMBO_BREAK => fx(20, 1000.0, 200.0, 1.0, &[0x666666, 0x888888, 0xaaaaaa, 0xcccccc], TAU, 100.0);
    FINISHER_CHARGE => fx(
        30, 1000.0, 100.0, 1.2,
        &[0xff0000, 0xff3300, 0xff6600, 0xff9900, 0xffcc00, 0xffff00, 0xffffff],
        TAU, -150.0,
    );
    FINISHER_IMPACT => fx(
        40, 1200.0, 400.0, 1.8,
        &[0xff0000, 0xff3300, 0xff6600, 0xff9900, 0xffcc00, 0xffff00, 0xffffff, 0xff00ff],
        TAU, -50.0,
    );
    FINISHER_SHOCKWAVE => fx(
        60, 800.0, 500.0, 1.5,
        &[0xff0000, 0xff3300, 0xff6600, 0xff9900, 0xffcc00, 0xffff00, 0xffffff],
        TAU, 0.0,
    );

    // Hazard base and damage effects
    FIRE_PIT => fx(15, 1000.0, 150.0, 1.2, &[0xff0000, 0xff6600, 0xffcc00, 0xffff00], PI / 2.0, -200.0);
    FIRE_DAMAGE => fx(20, 600.0, 200.0, 1.0, &[0xff3300, 0xff6600, 0xff9900, 0xffcc00], TAU, -100.0);
    ELECTRIC_FIELD => fx(10, 400.0, 300.0, 0.8, &[0x00ffff, 0x66ffff, 0x99ffff, 0xffffff], TAU, 0.0);
    ELECTRIC_DAMAGE => fx(15, 500.0, 250.0, 1.0, &[0x00ccff, 0x33ddff, 0x66eeff, 0xffffff], TAU, 0.0);
    TOXIC_ZONE => fx(12, 1500.0, 100.0, 1.3, &[0x00ff00, 0x33ff33, 0x66ff66, 0x99ff99], TAU, -50.0);
    TOXIC_DAMAGE => fx(18, 700.0, 180.0, 1.1, &[0x00cc00, 0x33dd33, 0x66ee66, 0xffffff], TAU, -80.0);
    SPIKE_TRAP => fx(8, 400.0, 200.0, 0.9, &[0x888888, 0xaaaaaa, 0xcccccc, 0xffffff], PI / 3.0, 150.0)
        .with_shape(ParticleShape::Diamond);
    SPIKE_DAMAGE => fx(12, 500.0, 220.0, 1.0, &[0x666666, 0x888888, 0xaaaaaa, 0xff0000], PI / 2.0, 200.0)
        .with_shape(ParticleShape::Diamond);

    // Hazard combinations and interactions
    STEAM_CLOUD => fx(25, 1200.0, 120.0, 1.4, &[0xffffff, 0xdddddd, 0xbbbbbb, 0x999999], TAU, -100.0);
    PLASMA_FIELD => fx(30, 800.0, 350.0, 1.3, &[0xff00ff, 0xff66ff, 0xff99ff, 0xffffff], TAU, -50.0);
    ACID_POOL => fx(20, 1000.0, 150.0, 1.2, &[0x88ff00, 0xaaff33, 0xccff66, 0xffffff], PI, 50.0);
    LIGHTNING_STRIKE => fx(35, 600.0, 400.0, 1.5, &[0x00ffff, 0x66ffff, 0xffffff, 0xffff00], PI / 4.0, 0.0);
    INFERNO => fx(40, 1500.0, 300.0, 1.6, &[0xff0000, 0xff6600, 0xffcc00, 0xffffff], TAU, -250.0);
    TOXIC_STORM => fx(45, 1000.0, 350.0, 1.4, &[0x00ff00, 0x66ff66, 0xffff00, 0xffffff], TAU, -150.0);
    CRYO_STORM => fx(35, 1800.0, 280.0, 1.4, &[0x00ccff, 0x66ddff, 0x99eeff, 0xffffff], TAU, -50.0)
        .with_flocking(flock(40.0, 2.2, 60.0, 1.8, 100.0, 1.4, 320.0))
        .with_branching(branch(BranchKind::Web, 0.35, 5, 30.0, 0.4, 2.5, 0x66ddff, 0xffffff, 0.9))
        .with_pattern(EmissionPattern::Burst, options())
        .with_turbulence(40.0);
    MAGMA_ERUPTION => fx(
        40, 2200.0, 300.0, 1.6,
        &[0xff3300, 0xff6600, 0xff9900, 0xffcc00, 0xffffff],
        PI * 1.5, -200.0,
    )
        .with_flocking(flock(35.0, 2.0, 55.0, 1.6, 90.0, 1.2, 350.0))
        .with_branching(branch(BranchKind::Energy, 0.4, 4, 35.0, 0.6, 3.0, 0xff6600, 0xffff00, 1.0))
        .with_pattern(
            EmissionPattern::Vortex,
            EmissionOptions { radius: Some(70.0), vortex_strength: Some(1.8), ..options() },
        );
    QUANTUM_RIFT => fx(32, 2500.0, 260.0, 1.5, &[0x9933ff, 0xcc66ff, 0xff99ff, 0xffffff], TAU, -30.0)
        .with_flocking(flock(45.0, 1.8, 70.0, 1.5, 110.0, 1.1, 290.0))
        .with_branching(branch(BranchKind::Tentacles, 0.3, 6, 40.0, 0.5, 2.8, 0xcc66ff, 0xffffff, 0.85))
        .with_pattern(
            EmissionPattern::Spiral,
            EmissionOptions { radius: Some(80.0), spiral_tightness: Some(0.4), ..options() },
        )
        .with_color_transition();
    STORM_SURGE => fx(38, 2000.0, 320.0, 1.4, &[0x0066ff, 0x00ccff, 0xffffff, 0x66ffff], TAU, -100.0)
        .with_flocking(flock(35.0, 2.4, 65.0, 1.9, 95.0, 1.5, 380.0))
        .with_branching(branch(BranchKind::Lightning, 0.45, 5, 30.0, 0.7, 2.5, 0x00ccff, 0xffffff, 0.95))
        .with_pattern(
            EmissionPattern::Wave,
            EmissionOptions { wave_amplitude: Some(70.0), frequency: Some(2.5), ..options() },
        )
        .with_turbulence(60.0);
    VOID_RUPTURE => fx(
        42, 2400.0, 290.0, 1.5,
        &[0x660066, 0x990099, 0xcc00cc, 0xff00ff, 0xffffff],
        TAU, -40.0,
    )
        .with_flocking(flock(40.0, 2.1, 75.0, 1.7, 115.0, 1.3, 310.0))
        .with_branching(branch(BranchKind::Tentacles, 0.35, 7, 35.0, 0.8, 3.0, 0xcc00cc, 0xff00ff, 0.9))
        .with_pattern(
            EmissionPattern::Vortex,
            EmissionOptions { radius: Some(90.0), vortex_strength: Some(2.2), ..options() },
        )
        .with_color_transition()
        .with_pulse();
    ENERGY_SWARM => fx(30, 1500.0, 200.0, 1.2, &[0xffff00, 0xffcc00, 0xff9900, 0xffffff], TAU, -50.0)
        .with_flocking(flock(30.0, 2.0, 50.0, 1.5, 100.0, 1.0, 300.0));
    SPIRIT_WISPS => fx(20, 2000.0, 150.0, 1.5, &[0x00ffff, 0x66ffff, 0x99ffff, 0xffffff], TAU, -30.0)
        .with_flocking(flock(40.0, 1.5, 80.0, 1.0, 120.0, 0.8, 200.0));
    LIGHTNING_STRIKE_CHAIN => fx(1, 800.0, 500.0, 1.5, &[0x00ffff, 0x66ffff, 0xffffff], PI / 4.0, 0.0)
        .with_branching(branch(BranchKind::Lightning, 0.3, 4, 25.0, 0.8, 3.0, 0x00ffff, 0xffffff, 0.8));
    ENERGY_WEB => fx(1, 2000.0, 150.0, 1.0, &[0xff00ff, 0xff66ff, 0xffffff], TAU, 0.0)
        .with_branching(branch(BranchKind::Web, 0.4, 6, 40.0, 0.3, 2.0, 0xff00ff, 0xff99ff, 0.6));
    VOID_TENTACLES => fx(3, 1500.0, 200.0, 1.2, &[0x660066, 0x990099, 0xcc00cc], PI / 2.0, 100.0)
        .with_branching(branch(BranchKind::Tentacles, 0.2, 3, 35.0, 0.6, 4.0, 0x990099, 0xff00ff, 0.7));
    ENERGY_SPIRAL => fx(1, 1200.0, 300.0, 1.3, &[0xffff00, 0xff9900, 0xff0000], TAU, -50.0)
        .with_branching(branch(BranchKind::Energy, 0.25, 5, 30.0, 0.4, 3.0, 0xffcc00, 0xffffff, 0.9))
        .with_pattern(
            EmissionPattern::Spiral,
            EmissionOptions { radius: Some(60.0), spiral_tightness: Some(0.5), ..options() },
        );
    SPIRIT_STORM => fx(15, 2000.0, 250.0, 1.4, &[0x00ffff, 0x66ffff, 0xffffff], TAU, -40.0)
        .with_flocking(flock(35.0, 1.8, 60.0, 1.2, 100.0, 0.9, 250.0))
        .with_branching(branch(BranchKind::Lightning, 0.2, 2, 30.0, 0.5, 2.0, 0x00ffff, 0xffffff, 0.7))
        .with_pattern(EmissionPattern::Burst, options());
    PHOENIX_WINGS => fx(
        25, 2000.0, 200.0, 1.4,
        &[0xff3300, 0xff6600, 0xff9900, 0xffcc00, 0xffffff],
        PI * 0.5, -30.0,
    )
        .with_flocking(flock(25.0, 1.8, 45.0, 1.3, 80.0, 0.9, 280.0))
        .with_branching(branch(BranchKind::Energy, 0.3, 3, 35.0, 0.4, 3.0, 0xff6600, 0xffff00, 0.8));
    FROST_NOVA => fx(20, 1800.0, 280.0, 1.3, &[0x00ccff, 0x66ddff, 0x99eeff, 0xffffff], TAU, 0.0)
        .with_flocking(flock(30.0, 2.2, 55.0, 1.6, 90.0, 1.2, 320.0))
        .with_branching(branch(BranchKind::Web, 0.35, 4, 30.0, 0.3, 2.0, 0x66ddff, 0xffffff, 0.9))
        .with_shape(ParticleShape::Star);
    VOID_VORTEX => fx(30, 2500.0, 220.0, 1.5, &[0x660066, 0x990099, 0xcc00cc, 0xff00ff], TAU, -20.0)
        .with_flocking(flock(35.0, 1.5, 70.0, 1.8, 110.0, 1.4, 260.0))
        .with_branching(branch(BranchKind::Tentacles, 0.25, 5, 40.0, 0.7, 3.0, 0xcc00cc, 0xff00ff, 0.7))
        .with_pattern(
            EmissionPattern::Vortex,
            EmissionOptions { radius: Some(80.0), vortex_strength: Some(2.0), ..options() },
        );
    NATURE_GROWTH => fx(18, 3000.0, 150.0, 1.2, &[0x00cc00, 0x33dd33, 0x66ee66, 0x99ff99], PI * 0.7, -10.0)
        .with_flocking(flock(40.0, 1.2, 65.0, 0.9, 95.0, 0.7, 180.0))
        .with_branching(branch(BranchKind::Web, 0.4, 6, 45.0, 0.5, 2.0, 0x33dd33, 0x99ff99, 0.6))
        .with_pattern(
            EmissionPattern::Spiral,
            EmissionOptions { radius: Some(60.0), spiral_tightness: Some(0.3), ..options() },
        );
    THUNDER_STORM => fx(35, 1600.0, 300.0, 1.4, &[0x0066ff, 0x00ccff, 0xffffff, 0xffff00], PI * 1.5, 50.0)
        .with_flocking(flock(30.0, 2.5, 50.0, 2.0, 85.0, 1.5, 350.0))
        .with_branching(branch(BranchKind::Lightning, 0.45, 4, 25.0, 0.9, 3.0, 0x00ccff, 0xffffff, 1.0))
        .with_pattern(EmissionPattern::Burst, options())
        .with_turbulence(50.0);
    MYSTIC_PORTALS => fx(22, 2200.0, 240.0, 1.3, &[0x9933ff, 0xcc66ff, 0xff99ff, 0xffffff], TAU, -15.0)
        .with_flocking(flock(35.0, 1.7, 60.0, 1.4, 100.0, 1.1, 270.0))
        .with_branching(branch(BranchKind::Energy, 0.3, 3, 35.0, 0.6, 2.5, 0xcc66ff, 0xffffff, 0.85))
        .with_pattern(
            EmissionPattern::Circle,
            EmissionOptions { radius: Some(70.0), ..options() },
        )
        .with_color_transition();
    CELESTIAL_DANCE => fx(28, 2800.0, 260.0, 1.6, &[0xffcc00, 0xff9900, 0xff6600, 0xffffff], TAU, -25.0)
        .with_flocking(flock(45.0, 1.6, 75.0, 1.3, 120.0, 1.0, 290.0))
        .with_branching(branch(BranchKind::Energy, 0.35, 4, 40.0, 0.5, 3.0, 0xffcc00, 0xffffff, 0.9))
        .with_pattern(
            EmissionPattern::Wave,
            EmissionOptions { wave_amplitude: Some(60.0), frequency: Some(3.0), ..options() },
        )
        .with_pulse()
        .with_shape(ParticleShape::Star);

    // Engine effects
    COLLISION_SPARK => fx(5, 300.0, 100.0, 0.5, &[0xffffff, 0xffff00], TAU, 0.0)
        .with_color_transition()
        .with_pulse();
    ARC_TETHER => fx(12, 1500.0, 80.0, 1.0, &[0x66ccff, 0x99ddff, 0xffffff], TAU, 0.0)
        .with_chain_links(ChainLinkBehavior {
            max_links: 3,
            link_distance: 60.0,
            link_width: 1.5,
            link_color: Rgb::from_hex(0x66ccff),
            link_opacity: 0.6,
            elasticity: 0.3,
            break_distance: 2.0,
        })
        .with_pattern(EmissionPattern::Circle, options());
    DEBRIS_SCATTER => fx(14, 1400.0, 260.0, 1.0, &[0x777777, 0x999999, 0xbbbbbb], PI, 400.0)
        .with_collisions(0.6)
        .with_wall_bounce()
        .with_shape(ParticleShape::Square);
}

fn table() -> &'static [Arc<EffectDescriptor>] {
    static TABLE: OnceLock<Vec<Arc<EffectDescriptor>>> = OnceLock::new();
    TABLE.get_or_init(|| Effect::ALL.iter().map(|e| Arc::new(e.build())).collect())
}

impl Effect {
    /// The shared descriptor for this entry.
    #[must_use]
    pub fn descriptor(self) -> Arc<EffectDescriptor> {
        Arc::clone(&table()[self as usize])
    }

    /// Resolves a catalog name to its identity.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::UnknownEffect`] when no entry has that name.
    pub fn lookup(name: &str) -> ParticleResult<Self> {
        name.parse()
    }
}

impl FromStr for Effect {
    type Err = ParticleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| ParticleError::UnknownEffect(s.to_string()))
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves a catalog name straight to its descriptor.
///
/// # Errors
///
/// Returns [`ParticleError::UnknownEffect`] for a name outside the catalog.
pub fn lookup(name: &str) -> ParticleResult<Arc<EffectDescriptor>> {
    Effect::lookup(name).map(Effect::descriptor)
}
