//! World state: the body list plus global parameters
//!
//! Bodies are only ever appended (through `insert`) or dropped all at once
//! (through `clear`), so indices stay stable for the lifetime of a frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyHandle};
use crate::error::{ConfigError, SpawnError};
use crate::settings::{SimConfig, validate_bounds, validate_gravity};

/// Complete simulation state
///
/// Deserialization rebuilds the world through `World::new` and `insert`, so a
/// stored world is held to the same checks as a live one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WorldRepr")]
pub struct World {
    /// Insertion order; physics iterates in this order
    bodies: Vec<Body>,
    gravity: DVec2,
    gravity_enabled: bool,
    width: f64,
    height: f64,
    max_bodies: usize,
}

/// Serialized shape of a world, before validation
#[derive(Deserialize)]
struct WorldRepr {
    bodies: Vec<Body>,
    gravity: DVec2,
    gravity_enabled: bool,
    width: f64,
    height: f64,
    max_bodies: usize,
}

impl TryFrom<WorldRepr> for World {
    type Error = ConfigError;

    fn try_from(repr: WorldRepr) -> Result<Self, Self::Error> {
        if repr.max_bodies == 0 {
            return Err(ConfigError::invalid("max_bodies must be at least 1"));
        }
        let mut world = World::new(repr.width, repr.height, repr.gravity)?;
        world.gravity_enabled = repr.gravity_enabled;
        world.max_bodies = repr.max_bodies;
        for body in repr.bodies {
            world
                .insert(body)
                .map_err(|e| ConfigError::invalid(format!("stored body rejected: {e}")))?;
        }
        Ok(world)
    }
}

impl World {
    /// Create an empty world. Fails fast on non-finite or non-positive bounds
    /// and non-finite gravity.
    pub fn new(width: f64, height: f64, gravity: DVec2) -> Result<Self, ConfigError> {
        validate_bounds(width, height)?;
        validate_gravity(gravity)?;
        Ok(Self {
            bodies: Vec::with_capacity(crate::consts::MAX_BODIES),
            gravity,
            gravity_enabled: true,
            width,
            height,
            max_bodies: crate::consts::MAX_BODIES,
        })
    }

    /// Create an empty world from a validated config
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = Self::new(config.width, config.height, config.gravity)?;
        world.gravity_enabled = config.gravity_enabled;
        world.max_bodies = config.max_bodies;
        world.bodies = Vec::with_capacity(config.max_bodies);
        Ok(world)
    }

    /// Append a body. Rejects it at the population cap, on non-finite state,
    /// on an out-of-range material, or if it could never satisfy the boundary
    /// invariant.
    pub fn insert(&mut self, body: Body) -> Result<BodyHandle, SpawnError> {
        if self.is_full() {
            return Err(SpawnError::CapacityExceeded {
                cap: self.max_bodies,
            });
        }
        if !body.pos.is_finite() {
            return Err(SpawnError::NonFinitePosition {
                x: body.pos.x,
                y: body.pos.y,
            });
        }
        if !body.vel.is_finite() {
            return Err(SpawnError::NonFiniteVelocity {
                x: body.vel.x,
                y: body.vel.y,
            });
        }
        let material = body.material();
        if material.validate().is_err() {
            return Err(SpawnError::InvalidMaterial {
                restitution: material.restitution,
                friction: material.friction,
            });
        }
        let r = body.radius();
        if !r.is_finite() || r <= 0.0 || r * 2.0 > self.width.min(self.height) {
            return Err(SpawnError::InvalidBody { radius: r });
        }

        self.bodies.push(body);
        Ok(BodyHandle(self.bodies.len() - 1))
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Read-only view for renderers
    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[inline]
    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    /// Status display count
    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.bodies.len() >= self.max_bodies
    }

    #[inline]
    pub fn max_bodies(&self) -> usize {
        self.max_bodies
    }

    #[inline]
    pub fn gravity(&self) -> DVec2 {
        self.gravity
    }

    #[inline]
    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    /// Flip gravity, returning the new setting
    pub fn toggle_gravity(&mut self) -> bool {
        self.gravity_enabled = !self.gravity_enabled;
        self.gravity_enabled
    }

    /// (width, height)
    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Total kinetic energy, for diagnostics
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// True if every body lies within the walls, allowing `eps` of slack
    pub fn contains_all(&self, eps: f64) -> bool {
        self.bodies.iter().all(|b| {
            let r = b.radius();
            b.pos.x >= r - eps
                && b.pos.x <= self.width - r + eps
                && b.pos.y >= r - eps
                && b.pos.y <= self.height - r + eps
        })
    }
}
