//! # Particle Error Types
//!
//! Only configuration can fail. Saturation, unknown emitter ids and empty
//! spawns are normal flow and never surface as errors.

use thiserror::Error;

/// Errors raised while configuring the particle system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticleError {
    /// An effect name that is not in the catalog.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// An effect descriptor that cannot be simulated.
    #[error("malformed effect {name}: {reason}")]
    MalformedEffect {
        /// Name of the offending descriptor.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid system configuration.
    #[error("invalid particle configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for particle configuration.
pub type ParticleResult<T> = Result<T, ParticleError>;
