//! # Particle Pool
//!
//! Fixed-capacity slot store for particles that churn every frame.
//!
//! All slots are allocated up front; acquiring and releasing a particle is a
//! free-list push or pop. Two limits apply: the physical slot count
//! (`capacity`) and the active cap (`max_active`), which may be lowered at
//! runtime without reallocating.

use crate::particle::{Particle, ParticleId};

/// A pool of particle slots.
///
/// # Thread Safety
///
/// Not thread-safe. The owning system is driven from one `update` call.
#[derive(Debug)]
pub struct ParticlePool {
    /// Slot storage.
    slots: Box<[Particle]>,
    /// Free list of slot indices, lowest index on top.
    free_list: Vec<u32>,
    /// Number of active slots.
    active_count: usize,
    /// Active cap, never above capacity.
    max_active: usize,
}

impl ParticlePool {
    /// Creates a pool with `capacity` slots and an active cap of
    /// `max_active`, clamped to the capacity.
    #[must_use]
    pub fn new(capacity: usize, max_active: usize) -> Self {
        let slots: Vec<Particle> = (0..capacity).map(|_| Particle::blank()).collect();
        let free_list: Vec<u32> = (0..capacity as u32).rev().collect();

        Self {
            slots: slots.into_boxed_slice(),
            free_list,
            active_count: 0,
            max_active: max_active.min(capacity),
        }
    }

    /// Total slot count.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current active cap.
    #[inline]
    #[must_use]
    pub const fn max_active(&self) -> usize {
        self.max_active
    }

    /// Number of live particles.
    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// How many more particles may be acquired right now.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.max_active.saturating_sub(self.active_count)
    }

    /// Changes the active cap. Returns the cap actually applied, which is
    /// clamped to the capacity. Live particles above a lowered cap are kept
    /// until they expire.
    pub fn set_max_active(&mut self, max_active: usize) -> usize {
        self.max_active = max_active.min(self.capacity());
        self.max_active
    }

    /// Takes a free slot and marks it active. Returns `None` once the active
    /// cap is reached.
    pub fn acquire(&mut self) -> Option<ParticleId> {
        if self.active_count >= self.max_active {
            return None;
        }
        let index = self.free_list.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.reset();
        slot.active = true;
        self.active_count += 1;
        Some(ParticleId(index))
    }

    /// Returns a slot to the free list, detaching it from the link graph and
    /// the branch tree first. Returns `false` if the slot was not active.
    pub fn release(&mut self, id: ParticleId) -> bool {
        if !self.is_active(id) {
            return false;
        }

        let links = std::mem::take(&mut self.slots[id.index()].links);
        for other in &links {
            if let Some(p) = self.slots.get_mut(other.index()) {
                p.links.retain(|l| *l != id);
            }
        }

        if let Some(parent) = self.slots[id.index()].branch_parent.take() {
            if let Some(p) = self.slots.get_mut(parent.index()) {
                p.branch_children.retain(|c| *c != id);
            }
        }
        let children = std::mem::take(&mut self.slots[id.index()].branch_children);
        for child in &children {
            if let Some(c) = self.slots.get_mut(child.index()) {
                if c.branch_parent == Some(id) {
                    c.branch_parent = None;
                }
            }
        }

        self.slots[id.index()].reset();
        self.free_list.push(id.0);
        self.active_count -= 1;
        true
    }

    /// Whether `id` refers to a live particle.
    #[inline]
    #[must_use]
    pub fn is_active(&self, id: ParticleId) -> bool {
        self.slots.get(id.index()).is_some_and(Particle::is_active)
    }

    /// Live particle at `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.slots.get(id.index()).filter(|p| p.active)
    }

    /// Mutable live particle at `id`.
    #[inline]
    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.slots.get_mut(id.index()).filter(|p| p.active)
    }

    /// Connects two live particles in the link graph. Returns `false` if
    /// either is free, they are the same slot, or they are already linked.
    pub fn link(&mut self, a: ParticleId, b: ParticleId) -> bool {
        if a == b || !self.is_active(a) || !self.is_active(b) || self.are_linked(a, b) {
            return false;
        }
        self.slots[a.index()].links.push(b);
        self.slots[b.index()].links.push(a);
        true
    }

    /// Removes a link in both directions.
    pub fn unlink(&mut self, a: ParticleId, b: ParticleId) {
        if let Some(p) = self.slots.get_mut(a.index()) {
            p.links.retain(|l| *l != b);
        }
        if let Some(p) = self.slots.get_mut(b.index()) {
            p.links.retain(|l| *l != a);
        }
    }

    /// Whether `a` lists `b` as a link.
    #[must_use]
    pub fn are_linked(&self, a: ParticleId, b: ParticleId) -> bool {
        self.get(a).is_some_and(|p| p.links.contains(&b))
    }

    /// Ids of all live particles in slot order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<ParticleId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Iterates over live particles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active)
            .map(|(index, p)| (ParticleId(index as u32), p))
    }

    /// Releases every particle.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.reset();
        }
        self.free_list.clear();
        self.free_list.extend((0..self.slots.len() as u32).rev());
        self.active_count = 0;
    }
}
