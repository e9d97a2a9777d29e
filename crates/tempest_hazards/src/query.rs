//! # Spatial Query Seam
//!
//! Interactions only run when the field has a [`NearbyHazards`]
//! implementation. The world layer supplies one backed by its own spatial
//! index; [`RadiusQuery`] is a linear scan for small fields and tests.

use crate::hazard::{Hazard, HazardId};

/// Finds the hazards near one hazard.
pub trait NearbyHazards: Send {
    /// Hazards near `origin`. The result may include `origin` itself and
    /// inactive hazards; the engine filters both.
    fn query(&self, hazards: &[Hazard], origin: HazardId) -> Vec<HazardId>;
}

impl<F> NearbyHazards for F
where
    F: Fn(&[Hazard], HazardId) -> Vec<HazardId> + Send,
{
    fn query(&self, hazards: &[Hazard], origin: HazardId) -> Vec<HazardId> {
        self(hazards, origin)
    }
}

/// Every other active hazard within `radius` of the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    /// Search radius
    pub radius: f32,
}

impl RadiusQuery {
    /// Creates a query with the given radius.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl NearbyHazards for RadiusQuery {
    fn query(&self, hazards: &[Hazard], origin: HazardId) -> Vec<HazardId> {
        let Some(center) = hazards.get(origin.index()).map(Hazard::position) else {
            return Vec::new();
        };
        hazards
            .iter()
            .filter(|h| h.id() != origin && h.is_active())
            .filter(|h| h.position().distance(center) <= self.radius)
            .map(Hazard::id)
            .collect()
    }
}
