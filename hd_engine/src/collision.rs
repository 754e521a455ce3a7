//! Pure collision-time predictors and collision-response (impulse) functions.
//!
//! Predictors never mutate state: they take positions/velocities/radii as
//! given and return either a strictly positive time-to-contact or `None`.
//! Responses take the state *at* the moment of contact and return the
//! post-collision velocities.

use crate::math_core;
use crate::obstacle::{Obstacle, Orientation};
use crate::prelude::*;
use crate::Vec2;

/// Time until two disks (given relative to "now") next touch, or `None` if
/// they are not on a collision course.
pub fn predict_disk_disk(
    pos_a: Vec2,
    vel_a: Vec2,
    radius_a: f64,
    pos_b: Vec2,
    vel_b: Vec2,
    radius_b: f64,
) -> Option<f64> {
    let delta_r = pos_b - pos_a;
    let delta_v = vel_b - vel_a;
    let sigma = radius_a + radius_b;

    let approach = delta_v.dot(delta_r);
    if approach >= -APPROACH_EPS {
        // Receding or parallel: no contact.
        return None;
    }

    let vv = delta_v.dot(delta_v);
    let rr = delta_r.dot(delta_r);
    let (_, t_enter) = math_core::solve_quadratic(vv, 2.0 * approach, rr - sigma * sigma)?;

    // solve_quadratic already rejects a ~ 0 and negative discriminants, but we
    // re-derive the discriminant check against our own epsilon for clarity.
    let discriminant = approach * approach - vv * (rr - sigma * sigma);
    if vv.abs() < f64::EPSILON || discriminant < DISCRIMINANT_EPS {
        return None;
    }

    if t_enter < CONTACT_TIME_EPS {
        return None;
    }
    Some(t_enter)
}

/// Time until a disk touches an axis-aligned segment obstacle.
pub fn predict_disk_segment(
    pos: Vec2,
    vel: Vec2,
    radius: f64,
    orientation: Orientation,
    a: Vec2,
    b: Vec2,
) -> Option<f64> {
    let (u, v_u, w, v_w, k, aw, bw) = match orientation {
        Orientation::Horizontal => (pos.y, vel.y, pos.x, vel.x, a.y, a.x, b.x),
        Orientation::Vertical => (pos.x, vel.x, pos.y, vel.y, a.x, a.y, b.y),
    };

    let approaching_below = u < k && v_u > 0.0;
    let approaching_above = u > k && v_u < 0.0;
    if !approaching_below && !approaching_above {
        return None;
    }
    let offset = if approaching_below { -radius } else { radius };

    let t = (k + offset - u) / v_u;
    if t < 0.0 {
        return None;
    }

    let w_prime = w + v_w * t;
    let lo = aw.min(bw) - radius;
    let hi = aw.max(bw) + radius;
    if w_prime >= lo && w_prime <= hi {
        Some(t)
    } else {
        None
    }
}

/// Time until a disk touches a point obstacle (concave corner), modelled as a
/// stationary, zero-radius "ghost" particle.
pub fn predict_disk_vertex(pos: Vec2, vel: Vec2, radius: f64, vertex: Vec2) -> Option<f64> {
    predict_disk_disk(pos, vel, radius, vertex, Vec2::ZERO, 0.0)
}

/// Dispatches prediction against any obstacle kind.
pub fn predict_disk_obstacle(pos: Vec2, vel: Vec2, radius: f64, obstacle: &Obstacle) -> Option<f64> {
    match obstacle {
        Obstacle::Segment {
            orientation, a, b, ..
        } => predict_disk_segment(pos, vel, radius, *orientation, *a, *b),
        Obstacle::Vertex { position, .. } => predict_disk_vertex(pos, vel, radius, *position),
    }
}

/// Elastic equal-mass impulse exchange for a disk-disk contact. Positions
/// must already be at the moment of contact (`|pos_b - pos_a|` equal to the
/// sum of the two radii, up to floating-point drift). Returns
/// `(new_vel_a, new_vel_b)`.
pub fn resolve_disk_disk(pos_a: Vec2, vel_a: Vec2, pos_b: Vec2, vel_b: Vec2) -> (Vec2, Vec2) {
    let delta_r = pos_b - pos_a;
    let delta_v = vel_b - vel_a;

    let impulse = delta_r * (delta_v.dot(delta_r) / delta_r.dot(delta_r));

    (vel_a + impulse, vel_b - impulse)
}

/// Reflects the velocity component normal to an axis-aligned segment.
pub fn resolve_disk_segment(vel: Vec2, orientation: Orientation) -> Vec2 {
    match orientation {
        Orientation::Horizontal => Vec2::new(vel.x, -vel.y),
        Orientation::Vertical => Vec2::new(-vel.x, vel.y),
    }
}

/// Mirrors the velocity across the disk-to-vertex unit normal.
pub fn resolve_disk_vertex(pos: Vec2, vel: Vec2, vertex: Vec2) -> Vec2 {
    let normal_unnormalized = pos - vertex;
    let len = normal_unnormalized.length();
    debug_assert!(len > 0.0);
    let n = normal_unnormalized * (1.0 / len);
    vel - n * (2.0 * vel.dot(n))
}
