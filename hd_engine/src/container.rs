//! Assembles the Segment/Vertex obstacle list for a closed, axis-aligned
//! polygon container — in particular the "two square chambers joined by a
//! rectangular slit" shape this engine targets.

use crate::obstacle::{Obstacle, Orientation};
use crate::Vec2;

/// Builds the Segment/Vertex list for an arbitrary closed, axis-aligned
/// polygon given in order (either winding). Vertices are inserted at every
/// concave (reflex, interior angle > 180 degrees) corner; convex corners are
/// left implicit at the junction of two Segments.
pub fn build_polygon_obstacles(points: &[Vec2]) -> Vec<Obstacle> {
    assert!(points.len() >= 3, "a polygon needs at least 3 vertices");
    let points = ensure_ccw(points);
    let n = points.len();

    let mut obstacles = Vec::new();
    let mut next_id = 0u64;

    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let orientation = if (a.y - b.y).abs() < 1e-12 {
            Orientation::Horizontal
        } else if (a.x - b.x).abs() < 1e-12 {
            Orientation::Vertical
        } else {
            panic!("container edges must be axis-aligned");
        };
        obstacles.push(Obstacle::Segment {
            orientation,
            a,
            b,
            id: next_id,
        });
        next_id += 1;
    }

    for i in 0..n {
        if is_reflex(&points, i) {
            obstacles.push(Obstacle::Vertex {
                position: points[i],
                id: next_id,
            });
            next_id += 1;
        }
    }

    obstacles
}

fn signed_area(points: &[Vec2]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

fn ensure_ccw(points: &[Vec2]) -> Vec<Vec2> {
    if signed_area(points) < 0.0 {
        let mut reversed = points.to_vec();
        reversed.reverse();
        reversed
    } else {
        points.to_vec()
    }
}

/// True iff the polygon's interior angle at `points[i]` exceeds 180 degrees,
/// for a counter-clockwise-wound polygon.
fn is_reflex(points: &[Vec2], i: usize) -> bool {
    let n = points.len();
    let prev = points[(i + n - 1) % n];
    let curr = points[i];
    let next = points[(i + 1) % n];
    let edge_in = curr - prev;
    let edge_out = next - curr;
    let cross = edge_in.x * edge_out.y - edge_in.y * edge_out.x;
    cross < 0.0
}

/// Outline of two `l`-by-`l` square chambers sharing a height-`slit_height`,
/// length-`slit_length` horizontal corridor, centered vertically. Traversed
/// once, counter-clockwise, starting at the left chamber's bottom-left corner.
pub fn two_chamber_outline(l: f64, slit_length: f64, slit_height: f64) -> Vec<Vec2> {
    assert!(slit_height > 0.0 && slit_height < l);
    assert!(slit_length > 0.0);
    let lo = (l - slit_height) / 2.0;
    let hi = (l + slit_height) / 2.0;

    vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(l, 0.0),
        Vec2::new(l, lo),
        Vec2::new(l + slit_length, lo),
        Vec2::new(l + slit_length, 0.0),
        Vec2::new(2.0 * l + slit_length, 0.0),
        Vec2::new(2.0 * l + slit_length, l),
        Vec2::new(l + slit_length, l),
        Vec2::new(l + slit_length, hi),
        Vec2::new(l, hi),
        Vec2::new(l, l),
        Vec2::new(0.0, l),
    ]
}

/// Convenience constructor for the engine's canonical two-chamber container.
pub fn build_two_chamber_container(l: f64, slit_length: f64, slit_height: f64) -> Vec<Obstacle> {
    build_polygon_obstacles(&two_chamber_outline(l, slit_length, slit_height))
}
