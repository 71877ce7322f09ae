//! Simulation configuration
//!
//! Loaded from JSON (or left at defaults) and validated once, before any
//! world is built. Nothing here is consulted again at step time except
//! through the values copied into the world and spawner.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Material;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
    /// Gravity vector, pixels per nominal frame²
    pub gravity: DVec2,
    /// Whether gravity starts enabled
    pub gravity_enabled: bool,
    /// Population cap
    pub max_bodies: usize,

    // === Spawning ===
    /// Smallest spawned radius (inclusive)
    pub radius_min: f64,
    /// Largest spawned radius (exclusive)
    pub radius_max: f64,
    /// Half-range of each spawned velocity component
    pub spawn_speed: f64,
    /// Material given to every spawned body
    pub material: Material,
    /// RNG seed; `None` lets the driver pick one
    pub seed: Option<u64>,

    // === Timing ===
    /// Frame length that corresponds to `dt_factor == 1`
    pub nominal_frame_ms: f64,
    /// Upper bound on `dt_factor`
    pub max_dt_factor: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            gravity: DVec2::new(0.0, GRAVITY_Y),
            gravity_enabled: true,
            max_bodies: MAX_BODIES,

            radius_min: SPAWN_RADIUS_MIN,
            radius_max: SPAWN_RADIUS_MAX,
            spawn_speed: SPAWN_SPEED,
            material: Material::default(),
            seed: None,

            nominal_frame_ms: NOMINAL_FRAME_MS,
            max_dt_factor: MAX_DT_FACTOR,
        }
    }
}

impl SimConfig {
    /// Config with the given viewport size, everything else default
    pub fn with_bounds(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject anything that could make a step ill-defined
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_bounds(self.width, self.height)?;
        validate_gravity(self.gravity)?;

        if self.max_bodies == 0 {
            return Err(ConfigError::invalid("max_bodies must be at least 1"));
        }

        if !self.radius_min.is_finite() || !self.radius_max.is_finite() {
            return Err(ConfigError::invalid("radius range must be finite"));
        }
        if self.radius_min <= 0.0 || self.radius_min >= self.radius_max {
            return Err(ConfigError::invalid(format!(
                "radius range [{}, {}) must satisfy 0 < min < max",
                self.radius_min, self.radius_max
            )));
        }
        // Largest body still has to fit between opposite walls
        if self.radius_max * 2.0 > self.width.min(self.height) {
            return Err(ConfigError::invalid(format!(
                "radius_max {} does not fit a {}x{} viewport",
                self.radius_max, self.width, self.height
            )));
        }

        if !self.spawn_speed.is_finite() || self.spawn_speed < 0.0 {
            return Err(ConfigError::invalid("spawn_speed must be finite and >= 0"));
        }

        self.material.validate()?;

        if !self.nominal_frame_ms.is_finite() || self.nominal_frame_ms <= 0.0 {
            return Err(ConfigError::invalid("nominal_frame_ms must be finite and > 0"));
        }
        if !self.max_dt_factor.is_finite() || self.max_dt_factor <= 0.0 {
            return Err(ConfigError::invalid("max_dt_factor must be finite and > 0"));
        }

        Ok(())
    }
}

pub(crate) fn validate_bounds(width: f64, height: f64) -> Result<(), ConfigError> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(ConfigError::invalid(format!(
            "bounds {width}x{height} must be finite and positive"
        )));
    }
    Ok(())
}

pub(crate) fn validate_gravity(gravity: DVec2) -> Result<(), ConfigError> {
    if !gravity.is_finite() {
        return Err(ConfigError::invalid(format!("gravity {gravity} must be finite")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_bodies, 50);
        assert_eq!(config.gravity, DVec2::new(0.0, 0.5));
    }

    #[test]
    fn test_rejects_bad_bounds() {
        for (w, h) in [(0.0, 400.0), (600.0, -1.0), (f64::NAN, 400.0), (f64::INFINITY, 400.0)] {
            let config = SimConfig::with_bounds(w, h);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidConfiguration(_))),
                "{w}x{h} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_bad_radius_range() {
        let config = SimConfig {
            radius_min: 30.0,
            radius_max: 20.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Fits in 600 wide but not 40 tall
        let config = SimConfig {
            height: 40.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_gravity() {
        let config = SimConfig {
            gravity: DVec2::new(0.0, f64::NAN),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_material() {
        let config = SimConfig {
            material: Material {
                restitution: 1.5,
                friction: 0.99,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = SimConfig::from_json(r#"{ "width": 100.0, "height": 100.0, "seed": 7 }"#)
            .expect("valid config");
        assert_eq!(config.width, 100.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_bodies, MAX_BODIES);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SimConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{ "width": -3.0 }"#),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig {
            seed: Some(42),
            ..Default::default()
        };
        let json = config.to_json().expect("serializes");
        assert_eq!(SimConfig::from_json(&json).expect("parses"), config);
    }
}
