use crate::prelude::ObstacleId;
use crate::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A static collision target. The ordered list of obstacles describes a
/// closed polygon; `Vertex` obstacles mark every concave corner (interior
/// angle > 180 degrees), where the straight-segment predictor alone would
/// under- or over-shoot the true boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Segment {
        orientation: Orientation,
        a: Vec2,
        b: Vec2,
        id: ObstacleId,
    },
    Vertex {
        position: Vec2,
        id: ObstacleId,
    },
}

impl Obstacle {
    pub fn id(&self) -> ObstacleId {
        match self {
            Obstacle::Segment { id, .. } => *id,
            Obstacle::Vertex { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_id() {
        let seg = Obstacle::Segment {
            orientation: Orientation::Horizontal,
            a: Vec2::ZERO,
            b: Vec2::new(1.0, 0.0),
            id: 7,
        };
        assert_eq!(seg.id(), 7);

        let vert = Obstacle::Vertex {
            position: Vec2::ZERO,
            id: 3,
        };
        assert_eq!(vert.id(), 3);
    }
}
