use crate::math_core;
use crate::{Particle, Vec2};

/// Macroscopic observables computed from a particle slice. Unit mass is
/// assumed throughout (the simulator models equal-mass disks only), so
/// kinetic energy reduces to `1/2 * v^2` per particle.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub num_particles: usize,
    pub total_energy: f64,
    pub total_momentum: Vec2,
}

impl Statistics {
    pub fn build(particles: &[Particle]) -> Self {
        let total_energy = particles
            .iter()
            .map(|p| math_core::kinetic_energy(1.0, p.velocity.length()))
            .sum();
        let total_momentum = particles
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.velocity);

        Statistics {
            num_particles: particles.len(),
            total_energy,
            total_momentum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build() {
        let particles = vec![
            Particle::new(0, Vec2::ZERO, Vec2::new(3.0, 4.0), 1.0),
            Particle::new(1, Vec2::ZERO, Vec2::new(-1.0, 0.0), 1.0),
        ];
        let stats = Statistics::build(&particles);
        assert_eq!(stats.num_particles, 2);
        // 1/2*5^2 + 1/2*1^2 = 12.5 + 0.5
        assert!(math_core::approx_eq(stats.total_energy, 13.0, 1e-9));
        assert_eq!(stats.total_momentum, Vec2::new(2.0, 4.0));
    }
}
