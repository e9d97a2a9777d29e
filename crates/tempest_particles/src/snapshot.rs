//! # Render Snapshots
//!
//! Immutable per-frame outputs for the renderer: one entry per live
//! particle, chain-link line segments, branch-tree polylines, a packed GPU
//! instance buffer and frame statistics.

use bytemuck::{Pod, Zeroable};
use tempest_shared::{Rgb, Vec2};

use crate::descriptor::ParticleShape;
use crate::particle::{Particle, ParticleId};

/// Renderable state of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSnapshot {
    /// Slot
    pub id: ParticleId,
    /// Screen position
    pub position: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
    /// Render scale
    pub scale: f32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Current colour
    pub color: Rgb,
    /// Sprite shape
    pub shape: ParticleShape,
}

impl From<(ParticleId, &Particle)> for ParticleSnapshot {
    fn from((id, p): (ParticleId, &Particle)) -> Self {
        Self {
            id,
            position: p.position,
            rotation: p.rotation,
            scale: p.scale,
            opacity: p.opacity,
            color: p.color,
            shape: p.shape,
        }
    }
}

/// A chain-link segment between two linked particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleLink {
    /// First endpoint
    pub from: Vec2,
    /// Second endpoint
    pub to: Vec2,
    /// Line colour
    pub color: Rgb,
    /// Line width
    pub width: f32,
    /// Line opacity
    pub opacity: f32,
}

/// A branch tree flattened to a polyline in depth-first pre-order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEffect {
    /// Root first, then each subtree
    pub points: Vec<Vec2>,
    /// Segment colour
    pub color: Rgb,
    /// Segment thickness
    pub thickness: f32,
    /// Glow colour
    pub glow_color: Rgb,
    /// Glow intensity
    pub glow_intensity: f32,
}

/// GPU instance for one particle sprite.
///
/// Layout (48 bytes, 16-byte aligned rows):
/// - `position_scale`: x, y, scale, opacity
/// - `color`: normalised rgba
/// - `rotation`, `shape`, two padding words
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// x, y, scale, opacity
    pub position_scale: [f32; 4],
    /// Normalised rgba
    pub color: [f32; 4],
    /// Rotation in radians
    pub rotation: f32,
    /// [`ParticleShape::index`]
    pub shape: u32,
    /// Padding
    pub _pad: [u32; 2],
}

impl ParticleInstance {
    /// Size of an instance in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl From<&ParticleSnapshot> for ParticleInstance {
    fn from(s: &ParticleSnapshot) -> Self {
        Self {
            position_scale: [s.position.x, s.position.y, s.scale, s.opacity],
            color: s.color.to_rgba(s.opacity),
            rotation: s.rotation.to_radians(),
            shape: s.shape.index(),
            _pad: [0; 2],
        }
    }
}

/// Statistics for the last frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleStats {
    /// Total slots
    pub pool_size: u32,
    /// Active cap
    pub max_active: u32,
    /// Live particles
    pub active: u32,
    /// Particles spawned this frame
    pub spawned_this_frame: u32,
    /// Particles that expired this frame
    pub released_this_frame: u32,
    /// Spawn requests dropped at the cap this frame
    pub dropped_this_frame: u32,
    /// Registered continuous emitters
    pub active_emitters: u32,
}
