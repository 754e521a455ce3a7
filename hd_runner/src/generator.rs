//! Deterministic, seeded construction of an initial scene for the
//! two-chamber container, used when the CLI is not given a prepared
//! `--input` file.

use hd_engine::container::build_two_chamber_container;
use hd_engine::{Obstacle, Particle, SimError, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SLIT_FRACTION: f64 = 0.2;
const RADIUS_FRACTION: f64 = 0.02;
const SPEED_RANGE: f64 = 2.0;
const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Seeds `particle_count` non-overlapping disks into the left chamber of a
/// fresh two-chamber container of side `l`, with uniformly random
/// velocities. The same `(l, particle_count, seed)` always reproduces the
/// same scene: no unseeded randomness is consulted.
pub fn generate_scene(
    l: f64,
    particle_count: usize,
    seed: u64,
) -> Result<(Vec<Particle>, Vec<Obstacle>), SimError> {
    let slit = l * SLIT_FRACTION;
    let obstacles = build_two_chamber_container(l, slit, slit);
    let radius = l * RADIUS_FRACTION;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut particles: Vec<Particle> = Vec::with_capacity(particle_count);

    for id in 0..particle_count as u64 {
        let mut attempts = 0;
        loop {
            attempts += 1;
            if attempts > MAX_PLACEMENT_ATTEMPTS {
                return Err(SimError::InvalidInitialState(format!(
                    "could not place particle {id} without overlap after {MAX_PLACEMENT_ATTEMPTS} attempts; \
                     try a larger container or fewer particles"
                )));
            }
            let position = Vec2::new(
                rng.gen_range(radius..(l - radius)),
                rng.gen_range(radius..(l - radius)),
            );
            let overlaps = particles
                .iter()
                .any(|p: &Particle| (p.position - position).length() < p.radius() + radius);
            if overlaps {
                continue;
            }
            let velocity = Vec2::new(
                rng.gen_range(-SPEED_RANGE..SPEED_RANGE),
                rng.gen_range(-SPEED_RANGE..SPEED_RANGE),
            );
            particles.push(Particle::new(id, position, velocity, radius));
            break;
        }
    }

    Ok((particles, obstacles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_scene_is_deterministic() {
        let (a, _) = generate_scene(10.0, 20, 42).unwrap();
        let (b, _) = generate_scene(10.0, 20, 42).unwrap();
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!(pa.position, pb.position);
            assert_eq!(pa.velocity, pb.velocity);
        }
    }

    #[test]
    fn test_generate_scene_particles_do_not_overlap() {
        let (particles, _) = generate_scene(10.0, 30, 7).unwrap();
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                let d = (particles[j].position - particles[i].position).length();
                assert!(d >= particles[i].radius() + particles[j].radius());
            }
        }
    }

    #[test]
    fn test_generate_scene_reports_overcrowding() {
        let result = generate_scene(1.0, 10_000, 1);
        assert!(matches!(result, Err(SimError::InvalidInitialState(_))));
    }
}
