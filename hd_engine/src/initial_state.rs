use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::obstacle::{Obstacle, Orientation};
use crate::particle::Particle;
use crate::prelude::GEOMETRY_EPS;
use crate::Vec2;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ParticleSpec {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub r: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrientationSpec {
    Horizontal,
    Vertical,
}

impl From<OrientationSpec> for Orientation {
    fn from(o: OrientationSpec) -> Self {
        match o {
            OrientationSpec::Horizontal => Orientation::Horizontal,
            OrientationSpec::Vertical => Orientation::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObstacleSpec {
    Segment {
        orientation: OrientationSpec,
        ax: f64,
        ay: f64,
        bx: f64,
        by: f64,
    },
    Vertex {
        x: f64,
        y: f64,
    },
}

/// The external wire format for the initial simulation state (§6).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct InitialState {
    pub steps: u64,
    pub l: f64,
    pub particles: Vec<ParticleSpec>,
    pub obstacles: Vec<ObstacleSpec>,
}

impl InitialState {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(|e| SimError::InvalidInitialState(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::InvalidInitialState(e.to_string()))
    }

    /// Builds and validates the engine's native particle/obstacle
    /// representation from this wire format. This is the only place
    /// `InvalidInitialState` is raised for a geometry problem.
    pub fn build(&self) -> Result<(Vec<Particle>, Vec<Obstacle>), SimError> {
        if self.l <= 0.0 {
            return Err(SimError::InvalidInitialState("l must be positive".into()));
        }

        let mut particles = Vec::with_capacity(self.particles.len());
        for (i, spec) in self.particles.iter().enumerate() {
            if spec.r <= 0.0 {
                return Err(SimError::InvalidInitialState(format!(
                    "particle {i} has non-positive radius {}",
                    spec.r
                )));
            }
            particles.push(Particle::new(
                i as u64,
                Vec2::new(spec.x, spec.y),
                Vec2::new(spec.vx, spec.vy),
                spec.r,
            ));
        }

        let mut obstacles = Vec::with_capacity(self.obstacles.len());
        for (i, spec) in self.obstacles.iter().enumerate() {
            let obstacle = match *spec {
                ObstacleSpec::Segment {
                    orientation,
                    ax,
                    ay,
                    bx,
                    by,
                } => Obstacle::Segment {
                    orientation: orientation.into(),
                    a: Vec2::new(ax, ay),
                    b: Vec2::new(bx, by),
                    id: i as u64,
                },
                ObstacleSpec::Vertex { x, y } => Obstacle::Vertex {
                    position: Vec2::new(x, y),
                    id: i as u64,
                },
            };
            obstacles.push(obstacle);
        }

        validate_closed_polygon(&obstacles)?;
        validate_non_overlapping(&particles)?;
        validate_contained(&particles, &obstacles)?;

        Ok((particles, obstacles))
    }
}

fn validate_non_overlapping(particles: &[Particle]) -> Result<(), SimError> {
    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let a = &particles[i];
            let b = &particles[j];
            let distance = (b.position - a.position).length();
            let min_distance = a.radius() + b.radius() - GEOMETRY_EPS;
            if distance < min_distance {
                return Err(SimError::InvalidInitialState(format!(
                    "particles {i} and {j} overlap: distance {distance} < {min_distance}"
                )));
            }
        }
    }
    Ok(())
}

/// Rejects an obstacle list that isn't a single closed, axis-aligned
/// polygon: every `Segment` must be axis-aligned for its declared
/// `orientation`, and every endpoint must be shared by exactly two
/// segments (the hallmark of a closed boundary with no gaps or branches).
fn validate_closed_polygon(obstacles: &[Obstacle]) -> Result<(), SimError> {
    let segments: Vec<(Orientation, Vec2, Vec2)> = obstacles
        .iter()
        .filter_map(|o| match o {
            Obstacle::Segment { orientation, a, b, .. } => Some((*orientation, *a, *b)),
            Obstacle::Vertex { .. } => None,
        })
        .collect();

    if segments.is_empty() {
        return Err(SimError::InvalidInitialState(
            "obstacle list has no wall segments; a closed polygon needs at least 3".into(),
        ));
    }

    for (orientation, a, b) in &segments {
        let axis_aligned = match orientation {
            Orientation::Horizontal => (a.y - b.y).abs() < GEOMETRY_EPS,
            Orientation::Vertical => (a.x - b.x).abs() < GEOMETRY_EPS,
        };
        if !axis_aligned {
            return Err(SimError::InvalidInitialState(format!(
                "malformed polygon: segment ({}, {})-({}, {}) is not axis-aligned for its declared orientation",
                a.x, a.y, b.x, b.y
            )));
        }
    }

    let endpoints: Vec<Vec2> = segments.iter().flat_map(|(_, a, b)| [*a, *b]).collect();
    for &p in &endpoints {
        let shared_by = endpoints
            .iter()
            .filter(|&&q| (q - p).length() < GEOMETRY_EPS)
            .count();
        if shared_by != 2 {
            return Err(SimError::InvalidInitialState(format!(
                "malformed polygon: endpoint ({}, {}) is shared by {shared_by} segment(s), expected 2",
                p.x, p.y
            )));
        }
    }

    Ok(())
}

/// Whether `point` lies strictly inside the closed polygon described by
/// `obstacles`' wall segments, via a standard horizontal-ray crossing count.
fn point_in_polygon(point: Vec2, obstacles: &[Obstacle]) -> bool {
    let mut inside = false;
    for obstacle in obstacles {
        if let Obstacle::Segment { a, b, .. } = obstacle {
            if (a.y > point.y) != (b.y > point.y) {
                let x_intersect = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_intersect {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < f64::EPSILON {
        return (point - a).length();
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (point - (a + ab * t)).length()
}

/// Rejects any particle not strictly inside the container polygon, offset
/// by its own radius: the center must be interior, and clear of every wall
/// segment and vertex by at least `radius`.
fn validate_contained(particles: &[Particle], obstacles: &[Obstacle]) -> Result<(), SimError> {
    for (i, p) in particles.iter().enumerate() {
        if !point_in_polygon(p.position, obstacles) {
            return Err(SimError::InvalidInitialState(format!(
                "particle {i} at ({}, {}) lies outside the container polygon",
                p.position.x, p.position.y
            )));
        }
        for obstacle in obstacles {
            let distance = match obstacle {
                Obstacle::Segment { a, b, .. } => distance_to_segment(p.position, *a, *b),
                Obstacle::Vertex { position, .. } => (p.position - *position).length(),
            };
            if distance < p.radius() - GEOMETRY_EPS {
                return Err(SimError::InvalidInitialState(format!(
                    "particle {i} at ({}, {}) overlaps the container boundary",
                    p.position.x, p.position.y
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_box(l: f64) -> Vec<ObstacleSpec> {
        vec![
            ObstacleSpec::Segment { orientation: OrientationSpec::Horizontal, ax: 0.0, ay: 0.0, bx: l, by: 0.0 },
            ObstacleSpec::Segment { orientation: OrientationSpec::Vertical, ax: l, ay: 0.0, bx: l, by: l },
            ObstacleSpec::Segment { orientation: OrientationSpec::Horizontal, ax: l, ay: l, bx: 0.0, by: l },
            ObstacleSpec::Segment { orientation: OrientationSpec::Vertical, ax: 0.0, ay: l, bx: 0.0, by: 0.0 },
        ]
    }

    fn sample() -> InitialState {
        InitialState {
            steps: 10,
            l: 10.0,
            particles: vec![
                ParticleSpec { x: 1.0, y: 1.0, vx: 1.0, vy: 0.0, r: 0.5 },
                ParticleSpec { x: 5.0, y: 5.0, vx: -1.0, vy: 0.0, r: 0.5 },
            ],
            obstacles: closed_box(10.0),
        }
    }

    #[test]
    fn test_roundtrip_json() {
        let state = sample();
        let json = state.to_json_pretty().unwrap();
        let parsed = InitialState::from_json(&json).unwrap();
        assert_eq!(state, parsed);
    }

    #[test]
    fn test_build_valid_state() {
        let (particles, obstacles) = sample().build().unwrap();
        assert_eq!(particles.len(), 2);
        assert_eq!(obstacles.len(), 4);
    }

    #[test]
    fn test_build_rejects_overlap() {
        let mut state = sample();
        state.particles[1] = ParticleSpec { x: 1.2, y: 1.0, vx: 0.0, vy: 0.0, r: 0.5 };
        assert!(matches!(
            state.build(),
            Err(SimError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_build_rejects_non_positive_radius() {
        let mut state = sample();
        state.particles[0].r = 0.0;
        assert!(matches!(
            state.build(),
            Err(SimError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_build_rejects_non_positive_l() {
        let mut state = sample();
        state.l = 0.0;
        assert!(matches!(
            state.build(),
            Err(SimError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_build_rejects_particle_outside_polygon() {
        let mut state = sample();
        state.particles[0] = ParticleSpec { x: -1.0, y: -1.0, vx: 0.0, vy: 0.0, r: 0.5 };
        assert!(matches!(
            state.build(),
            Err(SimError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_build_rejects_particle_touching_boundary() {
        let mut state = sample();
        // Center 0.1 from the left wall with radius 0.5 overlaps the wall.
        state.particles[0] = ParticleSpec { x: 0.1, y: 5.0, vx: 0.0, vy: 0.0, r: 0.5 };
        assert!(matches!(
            state.build(),
            Err(SimError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_build_rejects_open_polygon() {
        let mut state = sample();
        // Drop the last wall: the boundary no longer closes.
        state.obstacles.pop();
        assert!(matches!(
            state.build(),
            Err(SimError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_build_rejects_non_axis_aligned_segment() {
        let mut state = sample();
        state.obstacles[0] = ObstacleSpec::Segment {
            orientation: OrientationSpec::Horizontal,
            ax: 0.0,
            ay: 0.0,
            bx: 10.0,
            by: 3.0,
        };
        assert!(matches!(
            state.build(),
            Err(SimError::InvalidInitialState(_))
        ));
    }
}
