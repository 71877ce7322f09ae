//! Body data model
//!
//! A body is a circular point mass: no rotation, no identity beyond its slot
//! in the world's body list.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Bounce and damping coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Fraction of normal speed kept after a bounce, in [0, 1]
    pub restitution: f64,
    /// Per-step velocity multiplier, in (0, 1]
    pub friction: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: RESTITUTION,
            friction: FRICTION,
        }
    }
}

impl Material {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::invalid(format!(
                "restitution {} must lie in [0, 1]",
                self.restitution
            )));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(ConfigError::invalid(format!(
                "friction {} must lie in (0, 1]",
                self.friction
            )));
        }
        Ok(())
    }
}

/// Display colour. Physics never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Hue in degrees, [0, 360)
    pub hue: f64,
}

impl Color {
    pub const SATURATION: u8 = 70;
    pub const LIGHTNESS: u8 = 60;

    pub fn from_hue(hue: f64) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
        }
    }

    /// CSS colour string for a canvas fill style
    pub fn css(&self) -> String {
        format!(
            "hsl({:.0}, {}%, {}%)",
            self.hue,
            Self::SATURATION,
            Self::LIGHTNESS
        )
    }
}

/// Index of a body in the world's body list. Invalidated by `World::clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A simulated circle
///
/// Deserializes through `BodyRepr`, so a stored `mass` is ignored and
/// re-derived from the radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BodyRepr")]
pub struct Body {
    /// Center, viewport pixels
    pub pos: DVec2,
    /// Pixels per nominal frame
    pub vel: DVec2,
    radius: f64,
    mass: f64,
    material: Material,
    color: Color,
}

/// Serialized shape of a body, minus the derived mass
#[derive(Deserialize)]
struct BodyRepr {
    pos: DVec2,
    vel: DVec2,
    radius: f64,
    material: Material,
    color: Color,
}

impl From<BodyRepr> for Body {
    fn from(repr: BodyRepr) -> Self {
        Body::new(repr.pos, repr.vel, repr.radius, repr.color).with_material(repr.material)
    }
}

impl Body {
    /// New body with the default material. Mass is derived from the radius.
    pub fn new(pos: DVec2, vel: DVec2, radius: f64, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass: radius / MASS_DIVISOR,
            material: Material::default(),
            color,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn restitution(&self) -> f64 {
        self.material.restitution
    }

    #[inline]
    pub fn friction(&self) -> f64 {
        self.material.friction
    }

    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// ½mv², for diagnostics
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_is_derived_from_radius() {
        let body = Body::new(DVec2::ZERO, DVec2::ZERO, 12.5, Color::from_hue(0.0));
        assert_eq!(body.mass(), 2.5);
        assert_eq!(body.restitution(), 0.8);
        assert_eq!(body.friction(), 0.99);
    }

    #[test]
    fn test_deserialize_rederives_mass() {
        let json = r#"{
            "pos": [40.0, 50.0],
            "vel": [0.0, 0.0],
            "radius": 10.0,
            "mass": 0.0,
            "material": { "restitution": 0.8, "friction": 0.99 },
            "color": { "hue": 120.0 }
        }"#;
        let body: Body = serde_json::from_str(json).unwrap();
        assert_eq!(body.mass(), 2.0);
        assert_eq!(body.radius(), 10.0);
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::from_hue(200.4).css(), "hsl(200, 70%, 60%)");
        // Wraps into [0, 360)
        assert_eq!(Color::from_hue(-30.0).hue, 330.0);
    }

    #[test]
    fn test_material_validation() {
        assert!(Material::default().validate().is_ok());
        let bad = Material {
            restitution: 0.5,
            friction: 0.0,
        };
        assert!(bad.validate().is_err());
        let bad = Material {
            restitution: f64::NAN,
            friction: 0.9,
        };
        assert!(bad.validate().is_err());
    }
}
