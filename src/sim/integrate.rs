//! Explicit integration step
//!
//! Order per body: gravity, then damping, then position. Moving damping
//! after the position update changes the trajectory.

use super::world::World;

/// Advance every body by `dt_factor` nominal frames
pub fn integrate(world: &mut World, dt_factor: f64) {
    let gravity = if world.gravity_enabled() {
        Some(world.gravity())
    } else {
        None
    };

    for body in world.bodies_mut() {
        if let Some(g) = gravity {
            body.vel += g * dt_factor;
        }
        body.vel *= body.friction();
        body.pos += body.vel * dt_factor;
    }
}
