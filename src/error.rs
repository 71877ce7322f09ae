//! Error types
//!
//! Nothing in here can come out of `Simulation::step`: the step is total over
//! every world state reachable through the public API.

use thiserror::Error;

/// Why a body could not be added to the world
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    /// Population cap reached. Recoverable: drop or retry after a clear.
    #[error("population cap of {cap} bodies reached")]
    CapacityExceeded { cap: usize },

    #[error("spawn position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f64, y: f64 },

    #[error("body velocity ({x}, {y}) is not finite")]
    NonFiniteVelocity { x: f64, y: f64 },

    /// Restitution outside [0, 1] or friction outside (0, 1]
    #[error("body material (restitution {restitution}, friction {friction}) is out of range")]
    InvalidMaterial { restitution: f64, friction: f64 },

    /// Radius is non-positive, non-finite, or too large to fit the viewport
    #[error("body radius {radius} does not fit the world")]
    InvalidBody { radius: f64 },
}

/// Construction-time configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::InvalidConfiguration(msg.into())
    }
}
