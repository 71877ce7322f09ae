//! Viewport wall response
//!
//! Hard clamp plus reflection, each axis on its own, so a corner hit
//! bounces on both axes in the same step. No sweep: a body fast enough to
//! pass a wall inside one step is simply clamped back.

use super::world::World;

/// Clamp every body inside the walls and reflect the velocity component that hit
pub fn resolve_boundaries(world: &mut World) {
    let (width, height) = world.bounds();

    for body in world.bodies_mut() {
        let r = body.radius();
        let e = body.restitution();

        if body.pos.x - r < 0.0 {
            body.pos.x = r;
            body.vel.x = -body.vel.x * e;
        } else if body.pos.x + r > width {
            body.pos.x = width - r;
            body.vel.x = -body.vel.x * e;
        }

        if body.pos.y - r < 0.0 {
            body.pos.y = r;
            body.vel.y = -body.vel.y * e;
        } else if body.pos.y + r > height {
            body.pos.y = height - r;
            body.vel.y = -body.vel.y * e;
        }
    }
}

/// Position-only clamp, used after collision correction so the containment
/// invariant holds at the end of every step. Velocities are left alone.
pub fn clamp_positions(world: &mut World) {
    let (width, height) = world.bounds();

    for body in world.bodies_mut() {
        // World::insert keeps NaN out; max/min would silently hide one
        debug_assert!(body.pos.is_finite(), "non-finite body position {}", body.pos);
        let r = body.radius();
        // max/min instead of f64::clamp: never panics even if r > width / 2
        body.pos.x = body.pos.x.max(r).min(width - r);
        body.pos.y = body.pos.y.max(r).min(height - r);
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::sim::{Body, Color};

    fn world_with(pos: DVec2, vel: DVec2) -> World {
        let mut world = World::new(100.0, 100.0, DVec2::new(0.0, 0.5)).unwrap();
        world
            .insert(Body::new(pos, vel, 10.0, Color::from_hue(0.0)))
            .unwrap();
        world
    }

    #[test]
    fn test_floor_bounce() {
        let mut world = world_with(DVec2::new(50.0, 95.0), DVec2::new(0.0, 5.0));
        resolve_boundaries(&mut world);

        let body = &world.bodies()[0];
        assert_eq!(body.pos.y, 90.0);
        assert_eq!(body.vel.y, -5.0 * 0.8);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_corner_bounces_both_axes() {
        let mut world = world_with(DVec2::new(3.0, 2.0), DVec2::new(-4.0, -6.0));
        resolve_boundaries(&mut world);

        let body = &world.bodies()[0];
        assert_eq!(body.pos, DVec2::new(10.0, 10.0));
        assert_eq!(body.vel, DVec2::new(4.0 * 0.8, 6.0 * 0.8));
    }

    #[test]
    fn test_inside_untouched() {
        let mut world = world_with(DVec2::new(50.0, 50.0), DVec2::new(1.0, -1.0));
        resolve_boundaries(&mut world);

        let body = &world.bodies()[0];
        assert_eq!(body.pos, DVec2::new(50.0, 50.0));
        assert_eq!(body.vel, DVec2::new(1.0, -1.0));
    }

    #[test]
    fn test_exactly_touching_is_not_a_hit() {
        let mut world = world_with(DVec2::new(90.0, 10.0), DVec2::new(1.0, -1.0));
        resolve_boundaries(&mut world);
        assert_eq!(world.bodies()[0].vel, DVec2::new(1.0, -1.0));
    }

    #[test]
    fn test_clamp_positions_keeps_velocity() {
        let mut world = world_with(DVec2::new(-5.0, 120.0), DVec2::new(-2.0, 3.0));
        clamp_positions(&mut world);

        let body = &world.bodies()[0];
        assert_eq!(body.pos, DVec2::new(10.0, 90.0));
        assert_eq!(body.vel, DVec2::new(-2.0, 3.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-finite body position")]
    fn test_clamp_positions_surfaces_nan() {
        let mut world = world_with(DVec2::new(50.0, 50.0), DVec2::ZERO);
        world.bodies_mut()[0].pos.x = f64::NAN;
        clamp_positions(&mut world);
    }
}
