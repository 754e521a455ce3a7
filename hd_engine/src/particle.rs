use crate::prelude::ParticleId;
use crate::Vec2;

/// A hard disk. `collision_count` is the invalidation token referenced by
/// queued `Event`s: it is bumped on every collision the particle takes part
/// in, never reset, never touched for any other reason.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    id: ParticleId,
    pub position: Vec2,
    pub velocity: Vec2,
    radius: f64,
    collision_count: u64,
}

impl Particle {
    pub fn new(id: ParticleId, position: Vec2, velocity: Vec2, radius: f64) -> Self {
        debug_assert!(radius > 0.0);
        Particle {
            id,
            position,
            velocity,
            radius,
            collision_count: 0,
        }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    /// Advance the particle in a straight line for `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Record that this particle just took part in a collision, invalidating
    /// every queued `Event` that still carries its previous token.
    pub fn bump_collision_count(&mut self) {
        self.collision_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut p = Particle::new(0, Vec2::new(0.0, 0.0), Vec2::new(1.0, 2.0), 0.5);
        p.advance(2.0);
        assert_eq!(p.position, Vec2::new(2.0, 4.0));
    }

    #[test]
    fn test_bump_collision_count() {
        let mut p = Particle::new(0, Vec2::ZERO, Vec2::ZERO, 1.0);
        assert_eq!(p.collision_count(), 0);
        p.bump_collision_count();
        p.bump_collision_count();
        assert_eq!(p.collision_count(), 2);
    }
}
