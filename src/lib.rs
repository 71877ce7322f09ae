//! Ball Pit - tap-to-spawn rigid-circle sandbox
//!
//! Core modules:
//! - `sim`: Simulation core (bodies, integration, boundary and pairwise collisions)
//! - `settings`: Data-driven simulation configuration
//! - `error`: Error types surfaced by the public API

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SpawnError};
pub use settings::SimConfig;

/// Simulation constants
pub mod consts {
    /// Nominal frame length in milliseconds (60 Hz). Velocities are expressed per nominal frame.
    pub const NOMINAL_FRAME_MS: f64 = 16.67;
    /// Cap on the per-step time scale, so slow frames or tab resumes can't blow up the sim
    pub const MAX_DT_FACTOR: f64 = 2.0;

    /// Population cap (bounds the O(n²) pair pass to 1,225 checks)
    pub const MAX_BODIES: usize = 50;

    /// Demo viewport
    pub const VIEWPORT_WIDTH: f64 = 600.0;
    pub const VIEWPORT_HEIGHT: f64 = 400.0;

    /// Downward gravity, pixels per nominal frame²
    pub const GRAVITY_Y: f64 = 0.5;

    /// Spawned radius range [min, max)
    pub const SPAWN_RADIUS_MIN: f64 = 10.0;
    pub const SPAWN_RADIUS_MAX: f64 = 25.0;
    /// Spawned velocity components lie in [-SPAWN_SPEED, SPAWN_SPEED)
    pub const SPAWN_SPEED: f64 = 5.0;

    /// Mass is radius / MASS_DIVISOR
    pub const MASS_DIVISOR: f64 = 5.0;

    /// Default material
    pub const RESTITUTION: f64 = 0.8;
    pub const FRICTION: f64 = 0.99;
}

/// Convert a measured frame length to a time scale relative to the nominal frame.
///
/// Clamped to `[0, max_factor]`. Non-finite input maps to the nearest end of
/// the range (NaN counts as zero).
#[inline]
pub fn dt_factor(elapsed_ms: f64, nominal_frame_ms: f64, max_factor: f64) -> f64 {
    let factor = elapsed_ms / nominal_frame_ms;
    if factor.is_nan() {
        return 0.0;
    }
    factor.max(0.0).min(max_factor)
}
