//! # Effect Descriptors
//!
//! An [`EffectDescriptor`] is the immutable template behind every burst and
//! every continuous emission: how many particles, how long they live, how they
//! move, and which optional behaviour modules apply to them.
//!
//! Descriptors are shared through `Arc` so that thousands of live particles
//! can point at the same template without copying it.

use std::f32::consts::TAU;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tempest_shared::{Rgb, Vec2, MS_PER_SECOND};

use crate::error::{ParticleError, ParticleResult};

/// Collision and wall-bounce damping for descriptors that do not set one.
pub const DEFAULT_COLLISION_DAMPING: f32 = 0.8;

/// Render shape of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    /// Round sprite
    #[default]
    Circle,
    /// Square sprite
    Square,
    /// Five-point star
    Star,
    /// Rotated square
    Diamond,
}

impl ParticleShape {
    /// Stable index used in packed GPU instances.
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Circle => 0,
            Self::Square => 1,
            Self::Star => 2,
            Self::Diamond => 3,
        }
    }
}

/// Point that pulls particles toward it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractionPoint {
    /// Screen position
    pub position: Vec2,
    /// Pull strength
    pub strength: f32,
}

/// Point that pushes particles within `radius` away from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulsionPoint {
    /// Screen position
    pub position: Vec2,
    /// Influence radius
    pub radius: f32,
    /// Push strength
    pub strength: f32,
}

/// Procedural layout of initial velocities within one burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionPattern {
    /// Radial with jittered angle and randomised magnitude
    Burst,
    /// Angle offset grows with radial distance
    Vortex,
    /// Angle rotates with elapsed time, magnitude grows with index
    Spiral,
    /// Constant forward speed with a sinusoidal lateral term
    Wave,
    /// Even radial spacing at constant speed
    Circle,
}

/// Tuning for emission patterns. Unset fields fall back to the defaults
/// exposed by the accessor methods.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmissionOptions {
    /// Vortex radius
    pub radius: Option<f32>,
    /// Wave frequency
    pub frequency: Option<f32>,
    /// Wave lateral amplitude
    pub wave_amplitude: Option<f32>,
    /// Spiral rotation per second of elapsed time
    pub spiral_tightness: Option<f32>,
    /// Vortex angular offset per unit of radial distance
    pub vortex_strength: Option<f32>,
}

impl EmissionOptions {
    /// Vortex radius, default 50.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius.unwrap_or(50.0)
    }

    /// Wave frequency, default 2.
    #[must_use]
    pub fn frequency(&self) -> f32 {
        self.frequency.unwrap_or(2.0)
    }

    /// Wave amplitude, default 50.
    #[must_use]
    pub fn wave_amplitude(&self) -> f32 {
        self.wave_amplitude.unwrap_or(50.0)
    }

    /// Spiral tightness, default 0.2.
    #[must_use]
    pub fn spiral_tightness(&self) -> f32 {
        self.spiral_tightness.unwrap_or(0.2)
    }

    /// Vortex strength, default 1.
    #[must_use]
    pub fn vortex_strength(&self) -> f32 {
        self.vortex_strength.unwrap_or(1.0)
    }
}

/// Spring-linked particle graph settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainLinkBehavior {
    /// Maximum links per particle
    pub max_links: usize,
    /// Rest length; particles closer than this may link
    pub link_distance: f32,
    /// Rendered line width
    pub link_width: f32,
    /// Rendered line colour
    pub link_color: Rgb,
    /// Rendered line opacity
    pub link_opacity: f32,
    /// Spring constant
    pub elasticity: f32,
    /// Links break beyond `link_distance * break_distance`
    pub break_distance: f32,
}

/// Boids-style steering settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockingBehavior {
    /// Neighbours closer than this push away
    pub separation_radius: f32,
    /// Separation weight
    pub separation_force: f32,
    /// Neighbours closer than this contribute to velocity matching
    pub alignment_radius: f32,
    /// Alignment weight
    pub alignment_force: f32,
    /// Neighbours closer than this contribute to the centroid pull
    pub cohesion_radius: f32,
    /// Cohesion weight
    pub cohesion_force: f32,
    /// Clamp on the summed steering force
    pub max_speed: f32,
}

/// Flavour of a branching chain, selecting how children are launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    /// Narrow random jitter around the horizontal
    Lightning,
    /// Slow drift in any direction
    Web,
    /// Phase-based lateral wiggle
    Tentacles,
    /// Rotating spiral
    Energy,
}

/// Tree-branching chain settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchingBehavior {
    /// Chain flavour
    pub kind: BranchKind,
    /// Expected branches per second
    pub branch_probability: f32,
    /// Maximum children per particle and maximum tree depth
    pub max_branches: usize,
    /// Children further than this from their parent are pulled back
    pub segment_length: f32,
    /// Random velocity kick, relative to particle speed
    pub noise_scale: f32,
    /// Rendered segment thickness
    pub thickness: f32,
    /// Rendered segment colour
    pub color: Rgb,
    /// Rendered glow colour
    pub glow_color: Rgb,
    /// Rendered glow intensity
    pub glow_intensity: f32,
}

impl BranchingBehavior {
    /// Branching with the stock defaults for the given kind.
    #[must_use]
    pub const fn new(kind: BranchKind) -> Self {
        Self {
            kind,
            branch_probability: 0.2,
            max_branches: 3,
            segment_length: 30.0,
            noise_scale: 0.5,
            thickness: 2.0,
            color: Rgb::WHITE,
            glow_color: Rgb::WHITE,
            glow_intensity: 0.5,
        }
    }
}

/// Immutable named template for a burst or continuous emission.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDescriptor {
    /// Catalog name
    pub name: &'static str,
    /// Particles per burst
    pub particle_count: u32,
    /// Particle lifetime in milliseconds
    pub lifetime_ms: f32,
    /// Initial speed in units per second
    pub speed: f32,
    /// Base size
    pub size: f32,
    /// Palette; each particle picks one at spawn
    pub colors: Vec<Rgb>,
    /// Angular spread in radians for unpatterned emission
    pub spread: f32,
    /// Vertical acceleration, positive is down
    pub gravity: f32,
    /// Render shape
    pub shape: ParticleShape,
    /// Interpolate toward a second palette colour over life
    pub color_transition: bool,
    /// Sine pulse on scale
    pub pulse_scale: bool,
    /// Turbulence amplitude
    pub turbulence: Option<f32>,
    /// Optional attraction point
    pub attraction: Option<AttractionPoint>,
    /// Repulsion points
    pub repulsion: Vec<RepulsionPoint>,
    /// Collision damping, [`DEFAULT_COLLISION_DAMPING`] when unset
    pub collision_damping: Option<f32>,
    /// Clamp to screen bounds and reflect velocity
    pub bounce_off_walls: bool,
    /// Procedural emission pattern
    pub pattern: Option<EmissionPattern>,
    /// Pattern tuning
    pub emission_options: EmissionOptions,
    /// Spring-linked graph behaviour
    pub chain_links: Option<ChainLinkBehavior>,
    /// Flocking behaviour
    pub flocking: Option<FlockingBehavior>,
    /// Branching chain behaviour
    pub branching: Option<BranchingBehavior>,
}

impl EffectDescriptor {
    /// Creates a descriptor with the required parameters and no modules.
    ///
    /// `palette` holds packed `0xRRGGBB` colours.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'static str,
        particle_count: u32,
        lifetime_ms: f32,
        speed: f32,
        size: f32,
        palette: &[u32],
        spread: f32,
        gravity: f32,
    ) -> Self {
        Self {
            name,
            particle_count,
            lifetime_ms,
            speed,
            size,
            colors: palette.iter().copied().map(Rgb::from_hex).collect(),
            spread,
            gravity,
            shape: ParticleShape::Circle,
            color_transition: false,
            pulse_scale: false,
            turbulence: None,
            attraction: None,
            repulsion: Vec::new(),
            collision_damping: None,
            bounce_off_walls: false,
            pattern: None,
            emission_options: EmissionOptions::default(),
            chain_links: None,
            flocking: None,
            branching: None,
        }
    }

    /// Sets the render shape.
    #[must_use]
    pub fn with_shape(mut self, shape: ParticleShape) -> Self {
        self.shape = shape;
        self
    }

    /// Enables colour transition.
    #[must_use]
    pub fn with_color_transition(mut self) -> Self {
        self.color_transition = true;
        self
    }

    /// Enables the scale pulse.
    #[must_use]
    pub fn with_pulse(mut self) -> Self {
        self.pulse_scale = true;
        self
    }

    /// Sets turbulence amplitude.
    #[must_use]
    pub fn with_turbulence(mut self, turbulence: f32) -> Self {
        self.turbulence = Some(turbulence);
        self
    }

    /// Sets the attraction point.
    #[must_use]
    pub fn with_attraction(mut self, position: Vec2, strength: f32) -> Self {
        self.attraction = Some(AttractionPoint { position, strength });
        self
    }

    /// Adds a repulsion point.
    #[must_use]
    pub fn with_repulsion(mut self, position: Vec2, radius: f32, strength: f32) -> Self {
        self.repulsion.push(RepulsionPoint { position, radius, strength });
        self
    }

    /// Overrides the collision damping.
    #[must_use]
    pub fn with_collisions(mut self, damping: f32) -> Self {
        self.collision_damping = Some(damping);
        self
    }

    /// Enables wall bounces.
    #[must_use]
    pub fn with_wall_bounce(mut self) -> Self {
        self.bounce_off_walls = true;
        self
    }

    /// Sets the emission pattern and its options.
    #[must_use]
    pub fn with_pattern(mut self, pattern: EmissionPattern, options: EmissionOptions) -> Self {
        self.pattern = Some(pattern);
        self.emission_options = options;
        self
    }

    /// Sets chain-link behaviour.
    #[must_use]
    pub fn with_chain_links(mut self, links: ChainLinkBehavior) -> Self {
        self.chain_links = Some(links);
        self
    }

    /// Sets flocking behaviour.
    #[must_use]
    pub fn with_flocking(mut self, flocking: FlockingBehavior) -> Self {
        self.flocking = Some(flocking);
        self
    }

    /// Sets branching behaviour.
    #[must_use]
    pub fn with_branching(mut self, branching: BranchingBehavior) -> Self {
        self.branching = Some(branching);
        self
    }

    /// Lifetime converted to seconds, the simulator's time unit.
    #[inline]
    #[must_use]
    pub fn lifetime_secs(&self) -> f32 {
        self.lifetime_ms / MS_PER_SECOND
    }

    /// Damping applied to collisions and wall bounces.
    #[inline]
    #[must_use]
    pub fn damping(&self) -> f32 {
        self.collision_damping.unwrap_or(DEFAULT_COLLISION_DAMPING)
    }

    /// Checks that the descriptor can be simulated.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::MalformedEffect`] for an empty palette, a
    /// non-positive lifetime or non-finite kinematics.
    pub fn validate(&self) -> ParticleResult<()> {
        let malformed = |reason: &str| ParticleError::MalformedEffect {
            name: self.name.to_string(),
            reason: reason.to_string(),
        };
        if self.colors.is_empty() {
            return Err(malformed("empty colour palette"));
        }
        if !(self.lifetime_ms.is_finite() && self.lifetime_ms > 0.0) {
            return Err(malformed("lifetime must be positive"));
        }
        if !(self.speed.is_finite() && self.size.is_finite() && self.gravity.is_finite()) {
            return Err(malformed("non-finite kinematics"));
        }
        if !(0.0..=TAU + f32::EPSILON).contains(&self.spread) {
            return Err(malformed("spread outside [0, 2PI]"));
        }
        Ok(())
    }
}

/// Descriptor held by free pool slots. Never emitted.
pub(crate) fn inert() -> Arc<EffectDescriptor> {
    static INERT: OnceLock<Arc<EffectDescriptor>> = OnceLock::new();
    Arc::clone(INERT.get_or_init(|| {
        Arc::new(EffectDescriptor::new("INERT", 0, 1.0, 0.0, 0.0, &[0xffffff], 0.0, 0.0))
    }))
}
