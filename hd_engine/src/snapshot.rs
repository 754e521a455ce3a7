use crate::event::Target;
use crate::obstacle::Obstacle;
use crate::particle::Particle;
use crate::prelude::ParticleId;

/// What kind of contact produced the event, for the textual event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Particle,
    Wall,
    Vertex,
}

/// A human-and-machine-readable summary of one processed event.
#[derive(Debug, Clone, Copy)]
pub struct EventSummary {
    pub kind: EventKind,
    pub time: f64,
    pub subject: ParticleId,
    /// Particle id for `EventKind::Particle`, obstacle id otherwise.
    pub target: u64,
}

impl EventSummary {
    pub fn from_target(time: f64, subject: ParticleId, target: Target, obstacles: &[Obstacle]) -> Self {
        match target {
            Target::Particle(id) => EventSummary {
                kind: EventKind::Particle,
                time,
                subject,
                target: id,
            },
            Target::Obstacle(id) => {
                let kind = match obstacles.iter().find(|o| o.id() == id) {
                    Some(Obstacle::Vertex { .. }) => EventKind::Vertex,
                    _ => EventKind::Wall,
                };
                EventSummary {
                    kind,
                    time,
                    subject,
                    target: id,
                }
            }
        }
    }
}

/// Abstract capability the scheduler publishes snapshots to. The core never
/// knows whether snapshots land on disk, in memory, or on a channel; it only
/// guarantees strict step ordering and that the particle slice handed to
/// `write_step` is a frozen, safe-to-retain copy.
pub trait SnapshotSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write_setup(&mut self, particle_count: usize, l: f64, obstacles: &[Obstacle]) -> Result<(), Self::Error>;

    fn write_step(
        &mut self,
        step_index: u64,
        tau: f64,
        event: EventSummary,
        particles: &[Particle],
    ) -> Result<(), Self::Error>;
}

/// In-memory sink used by tests and by callers that want the trajectory
/// without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub setup: Option<(usize, f64, Vec<Obstacle>)>,
    pub steps: Vec<(u64, f64, EventSummary, Vec<Particle>)>,
}

impl SnapshotSink for MemorySink {
    type Error = std::convert::Infallible;

    fn write_setup(&mut self, particle_count: usize, l: f64, obstacles: &[Obstacle]) -> Result<(), Self::Error> {
        self.setup = Some((particle_count, l, obstacles.to_vec()));
        Ok(())
    }

    fn write_step(
        &mut self,
        step_index: u64,
        tau: f64,
        event: EventSummary,
        particles: &[Particle],
    ) -> Result<(), Self::Error> {
        self.steps.push((step_index, tau, event, particles.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    #[test]
    fn test_memory_sink_records_in_order() {
        let mut sink = MemorySink::default();
        sink.write_setup(2, 10.0, &[]).unwrap();
        let p = vec![crate::Particle::new(0, Vec2::ZERO, Vec2::ZERO, 1.0)];
        sink.write_step(
            0,
            1.0,
            EventSummary {
                kind: EventKind::Wall,
                time: 1.0,
                subject: 0,
                target: 3,
            },
            &p,
        )
        .unwrap();
        sink.write_step(
            1,
            2.0,
            EventSummary {
                kind: EventKind::Particle,
                time: 2.0,
                subject: 0,
                target: 1,
            },
            &p,
        )
        .unwrap();

        assert_eq!(sink.setup.unwrap().0, 2);
        assert_eq!(sink.steps.len(), 2);
        assert_eq!(sink.steps[0].0, 0);
        assert_eq!(sink.steps[1].0, 1);
    }
}
