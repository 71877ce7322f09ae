//! Circle-circle collision detection and response
//!
//! Every unordered pair (i, j), i < j, is visited once per step in ascending
//! order. A pair is corrected in place before the next pair is tested, so an
//! earlier resolution can create or remove a later overlap. With three or
//! more bodies piled together this leaves some residual penetration; that
//! single-pass behavior is intended and trajectories depend on it.

use glam::DVec2;

use super::body::Body;
use super::world::World;

/// Normal used when two centers coincide exactly
pub const FALLBACK_NORMAL: DVec2 = DVec2::X;

/// Overlap between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal from the first body toward the second
    pub normal: DVec2,
    /// Penetration depth, > 0
    pub overlap: f64,
    /// Centers coincided and `normal` is the fallback
    pub degenerate: bool,
}

/// What happened to one overlapping pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Bodies were approaching; positions corrected and impulse applied
    Impulse,
    /// Bodies were already separating; positions corrected only
    Separating,
}

/// Per-pass counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    pub pair_checks: usize,
    pub contacts: usize,
    pub separating: usize,
    pub degenerate: usize,
}

/// Test two circles for overlap. Touching (distance == r_a + r_b) is not overlap.
pub fn circle_contact(pos_a: DVec2, radius_a: f64, pos_b: DVec2, radius_b: f64) -> Option<Contact> {
    let delta = pos_b - pos_a;
    let radius_sum = radius_a + radius_b;
    let dist = delta.length();

    if dist >= radius_sum {
        return None;
    }

    if dist > 0.0 {
        Some(Contact {
            normal: delta / dist,
            overlap: radius_sum - dist,
            degenerate: false,
        })
    } else {
        Some(Contact {
            normal: FALLBACK_NORMAL,
            overlap: radius_sum,
            degenerate: true,
        })
    }
}

/// Push two overlapping bodies apart and exchange momentum along the normal
///
/// Correction is split inversely by mass: `a` moves back by
/// `overlap * m_b / (m_a + m_b)`, `b` forward by `overlap * m_a / (m_a + m_b)`.
/// The impulse uses the smaller restitution of the pair and leaves the
/// tangential velocity untouched.
pub fn resolve_pair(a: &mut Body, b: &mut Body, contact: &Contact) -> Response {
    let n = contact.normal;
    let (m_a, m_b) = (a.mass(), b.mass());
    let total = m_a + m_b;

    a.pos -= n * (contact.overlap * m_b / total);
    b.pos += n * (contact.overlap * m_a / total);

    let rel = (b.vel - a.vel).dot(n);
    if rel > 0.0 {
        return Response::Separating;
    }

    let e = a.restitution().min(b.restitution());
    let impulse = (1.0 + e) * rel / total;

    a.vel += n * (impulse * m_b);
    b.vel -= n * (impulse * m_a);

    Response::Impulse
}

/// Single ascending pass over every pair
pub fn resolve_collisions(world: &mut World) -> CollisionStats {
    let bodies = world.bodies_mut();
    let n = bodies.len();
    let mut stats = CollisionStats::default();

    for i in 0..n {
        // Split so we can hold &mut to i and to every j > i at once
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];

        for b in tail.iter_mut() {
            stats.pair_checks += 1;

            let Some(contact) = circle_contact(a.pos, a.radius(), b.pos, b.radius()) else {
                continue;
            };

            stats.contacts += 1;
            if contact.degenerate {
                stats.degenerate += 1;
            }
            if resolve_pair(a, b, &contact) == Response::Separating {
                stats.separating += 1;
            }
        }
    }

    stats
}
