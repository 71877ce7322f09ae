//! Body spawning
//!
//! All randomness goes through the spawner's own RNG, so a seeded spawner
//! produces the same bodies every run.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Body, BodyHandle, Color, Material};
use super::world::World;
use crate::consts::*;
use crate::error::SpawnError;
use crate::settings::SimConfig;

/// Ranges and material for spawned bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub radius_min: f64,
    pub radius_max: f64,
    /// Each velocity component is drawn from [-spawn_speed, spawn_speed)
    pub spawn_speed: f64,
    pub material: Material,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            radius_min: SPAWN_RADIUS_MIN,
            radius_max: SPAWN_RADIUS_MAX,
            spawn_speed: SPAWN_SPEED,
            material: Material::default(),
        }
    }
}

impl From<&SimConfig> for SpawnParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            radius_min: config.radius_min,
            radius_max: config.radius_max,
            spawn_speed: config.spawn_speed,
            material: config.material,
        }
    }
}

/// Builds randomized bodies and appends them to a world
#[derive(Debug, Clone)]
pub struct Spawner<R = Pcg32> {
    rng: R,
    params: SpawnParams,
}

impl Spawner<Pcg32> {
    /// Spawner driven by a PCG stream seeded from `seed`
    pub fn seeded(seed: u64, params: SpawnParams) -> Self {
        Self::new(Pcg32::seed_from_u64(seed), params)
    }
}

impl<R: Rng> Spawner<R> {
    pub fn new(rng: R, params: SpawnParams) -> Self {
        Self { rng, params }
    }

    pub fn params(&self) -> &SpawnParams {
        &self.params
    }

    /// Draw a body centered at (x, y) without touching any world.
    ///
    /// Draw order is radius, vx, vy, hue.
    pub fn make_body(&mut self, x: f64, y: f64) -> Body {
        let p = &self.params;
        let radius = self.rng.random_range(p.radius_min..p.radius_max);
        let half_width = p.spawn_speed;
        let vx = (self.rng.random::<f64>() - 0.5) * 2.0 * half_width;
        let vy = (self.rng.random::<f64>() - 0.5) * 2.0 * half_width;
        let hue = self.rng.random::<f64>() * 360.0;

        Body::new(
            DVec2::new(x, y),
            DVec2::new(vx, vy),
            radius,
            Color::from_hue(hue),
        )
        .with_material(p.material)
    }

    /// Spawn a body at (x, y). At the cap this fails without consuming
    /// randomness and leaves the world unchanged.
    pub fn spawn_at(&mut self, world: &mut World, x: f64, y: f64) -> Result<BodyHandle, SpawnError> {
        if world.is_full() {
            return Err(SpawnError::CapacityExceeded {
                cap: world.max_bodies(),
            });
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(SpawnError::NonFinitePosition { x, y });
        }

        let body = self.make_body(x, y);
        log::debug!(
            "Spawned body r={:.1} at ({:.0}, {:.0}) v=({:.2}, {:.2})",
            body.radius(),
            x,
            y,
            body.vel.x,
            body.vel.y
        );
        world.insert(body)
    }
}
