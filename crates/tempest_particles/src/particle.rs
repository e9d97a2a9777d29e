//! Particle state held in pool slots.

use std::sync::Arc;

use tempest_shared::{Rgb, Vec2};

use crate::descriptor::{inert, EffectDescriptor, ParticleShape};

/// Index of a pool slot. Stable for the lifetime of the particle occupying it
/// and reused after release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub(crate) u32);

impl ParticleId {
    /// Raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single simulated particle.
///
/// Graph and tree references (`links`, `branch_parent`, `branch_children`)
/// are slot indices. The pool clears them on release so a reused slot is
/// never reachable through a stale reference.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Slot occupied
    pub(crate) active: bool,
    /// Screen position
    pub position: Vec2,
    /// Launch velocity, decays with eased progress
    pub velocity: Vec2,
    /// Seconds alive
    pub age: f32,
    /// Seconds to live
    pub lifetime: f32,
    /// Template this particle was spawned from
    pub effect: Arc<EffectDescriptor>,
    /// Rotation in degrees
    pub rotation: f32,
    /// Current render scale
    pub scale: f32,
    /// Current opacity
    pub opacity: f32,
    /// Current colour
    pub color: Rgb,
    /// Colour at spawn
    pub start_color: Rgb,
    /// Colour at end of life
    pub target_color: Rgb,
    /// Render shape
    pub shape: ParticleShape,
    /// Per-particle turbulence amplitude
    pub turbulence_offset: Vec2,
    /// Simulation time of the last collision, in seconds
    pub last_collision: Option<f32>,
    /// Collisions resolved so far
    pub collision_count: u32,
    /// Chain-link neighbours
    pub links: Vec<ParticleId>,
    /// Spring force accumulated this tick
    pub chain_force: Vec2,
    /// Steering force computed this tick
    pub flocking_force: Vec2,
    /// Parent in the branch tree
    pub branch_parent: Option<ParticleId>,
    /// Children in the branch tree
    pub branch_children: Vec<ParticleId>,
    /// Depth in the branch tree, 0 for roots
    pub branch_level: usize,
    /// Seconds spent as part of a branching chain
    pub segment_progress: f32,
}

impl Particle {
    /// A free slot.
    #[must_use]
    pub(crate) fn blank() -> Self {
        Self {
            active: false,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            age: 0.0,
            lifetime: 0.0,
            effect: inert(),
            rotation: 0.0,
            scale: 0.0,
            opacity: 0.0,
            color: Rgb::WHITE,
            start_color: Rgb::WHITE,
            target_color: Rgb::WHITE,
            shape: ParticleShape::Circle,
            turbulence_offset: Vec2::ZERO,
            last_collision: None,
            collision_count: 0,
            links: Vec::new(),
            chain_force: Vec2::ZERO,
            flocking_force: Vec2::ZERO,
            branch_parent: None,
            branch_children: Vec::new(),
            branch_level: 0,
            segment_progress: 0.0,
        }
    }

    /// Returns the slot to its free state, keeping vector allocations.
    pub(crate) fn reset(&mut self) {
        self.active = false;
        self.position = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.age = 0.0;
        self.lifetime = 0.0;
        self.effect = inert();
        self.rotation = 0.0;
        self.scale = 0.0;
        self.opacity = 0.0;
        self.color = Rgb::WHITE;
        self.start_color = Rgb::WHITE;
        self.target_color = Rgb::WHITE;
        self.shape = ParticleShape::Circle;
        self.turbulence_offset = Vec2::ZERO;
        self.last_collision = None;
        self.collision_count = 0;
        self.links.clear();
        self.chain_force = Vec2::ZERO;
        self.flocking_force = Vec2::ZERO;
        self.branch_parent = None;
        self.branch_children.clear();
        self.branch_level = 0;
        self.segment_progress = 0.0;
    }

    /// Whether the slot holds a live particle.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Normalised age in `[0, 1)` for a live particle.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.lifetime > 0.0 {
            self.age / self.lifetime
        } else {
            1.0
        }
    }
}
