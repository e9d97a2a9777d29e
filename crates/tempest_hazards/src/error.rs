//! # Hazard Error Types
//!
//! Failed combines, rate-limited damage and a missing spatial query are normal
//! flow. Errors are reserved for caller mistakes and configuration.

use tempest_particles::ParticleError;
use thiserror::Error;

use crate::hazard::HazardId;

/// Errors raised by the hazard engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HazardError {
    /// A handle that does not belong to this field.
    #[error("unknown hazard {0}")]
    UnknownHazard(HazardId),

    /// A hazard type name that does not exist.
    #[error("unknown hazard type: {0}")]
    UnknownType(String),

    /// Invalid engine configuration.
    #[error("invalid hazard configuration: {0}")]
    InvalidConfig(String),

    /// The particle system rejected an emitter.
    #[error(transparent)]
    Particle(#[from] ParticleError),
}

/// Result type for hazard operations.
pub type HazardResult<T> = Result<T, HazardError>;
