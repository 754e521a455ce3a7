use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::collision;
use crate::error::SimError;
use crate::event::{Event, Target};
use crate::obstacle::Obstacle;
use crate::particle::Particle;
use crate::prelude::*;
use crate::snapshot::{EventSummary, SnapshotSink};
use tracing::{debug, warn};

/// The event-driven trajectory iterator. Owns the particles, the obstacles,
/// and the min-heap of future events exclusively; nothing outside this type
/// mutates simulated state.
pub struct Scheduler {
    particles: Vec<Particle>,
    obstacles: Vec<Obstacle>,
    queue: BinaryHeap<Reverse<Event>>,
    tau: f64,
    step_index: u64,
    consecutive_near_zero_events: u32,
    last_emitted: Option<(u64, f64, EventSummary, Vec<Particle>)>,
    stale_popped: u64,
    window_pops: u32,
    window_stale_pops: u32,
}

/// Outcome of a single `advance()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    /// An event was popped, resolved, and published to the sink.
    Processed,
    /// The cancellation signal was set; nothing was mutated or published.
    Cancelled,
}

impl Scheduler {
    pub fn new(particles: Vec<Particle>, obstacles: Vec<Obstacle>) -> Self {
        let mut scheduler = Scheduler {
            particles,
            obstacles,
            queue: BinaryHeap::new(),
            tau: 0.0,
            step_index: 0,
            consecutive_near_zero_events: 0,
            last_emitted: None,
            stale_popped: 0,
            window_pops: 0,
            window_stale_pops: 0,
        };
        scheduler.seed_initial_events();
        scheduler
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// The `(step_index, tau, event, particles)` of the last snapshot this
    /// scheduler successfully handed to a sink, if any. Consulted by callers
    /// after a `SimError::NumericalStall` to dump the last trustworthy state
    /// for forensics, since the scheduler itself does not unwind state on
    /// that error.
    pub fn last_emitted(&self) -> Option<&(u64, f64, EventSummary, Vec<Particle>)> {
        self.last_emitted.as_ref()
    }

    /// Lifetime count of heap pops discarded as stale (time-ordering or
    /// invalidation-token mismatch). Observability only; never consulted by
    /// `advance()` to change behavior.
    pub fn stale_popped(&self) -> u64 {
        self.stale_popped
    }

    /// Records one heap pop's staleness against the rolling window, logging
    /// a diagnostic and resetting the window if the stale ratio crosses
    /// `STALE_POP_RATIO_THRESHOLD`. Never rebuilds the heap: a high ratio
    /// means lazy invalidation is accumulating dead entries faster than
    /// they're drained, which is worth knowing about but not itself fatal.
    fn note_pop(&mut self, stale: bool) {
        self.window_pops += 1;
        if stale {
            self.stale_popped += 1;
            self.window_stale_pops += 1;
        }
        if self.window_pops >= STALE_POP_WINDOW {
            let ratio = f64::from(self.window_stale_pops) / f64::from(self.window_pops);
            if ratio > STALE_POP_RATIO_THRESHOLD {
                debug!(
                    step = self.step_index,
                    stale = self.window_stale_pops,
                    total = self.window_pops,
                    ratio,
                    "high stale-pop ratio in event queue"
                );
            }
            self.window_pops = 0;
            self.window_stale_pops = 0;
        }
    }

    fn seed_initial_events(&mut self) {
        for i in 0..self.particles.len() {
            for j in (i + 1)..self.particles.len() {
                if let Some(event) = self.predict_particle_vs_particle(i, j) {
                    self.queue.push(Reverse(event));
                }
            }
            for obstacle_idx in 0..self.obstacles.len() {
                if let Some(event) = self.predict_particle_vs_obstacle(i, obstacle_idx) {
                    self.queue.push(Reverse(event));
                }
            }
        }
    }

    fn predict_particle_vs_particle(&self, i: usize, j: usize) -> Option<Event> {
        let a = &self.particles[i];
        let b = &self.particles[j];
        let t = collision::predict_disk_disk(
            a.position,
            a.velocity,
            a.radius(),
            b.position,
            b.velocity,
            b.radius(),
        )?;
        Some(Event {
            time: self.tau + t,
            subject: a.id(),
            target: Target::Particle(b.id()),
            subject_token: a.collision_count(),
            target_token: b.collision_count(),
        })
    }

    fn predict_particle_vs_obstacle(&self, i: usize, obstacle_idx: usize) -> Option<Event> {
        let p = &self.particles[i];
        let obstacle = &self.obstacles[obstacle_idx];
        let t = collision::predict_disk_obstacle(p.position, p.velocity, p.radius(), obstacle)?;
        Some(Event {
            time: self.tau + t,
            subject: p.id(),
            target: Target::Obstacle(obstacle.id()),
            subject_token: p.collision_count(),
            target_token: 0,
        })
    }

    fn particle_index(&self, id: ParticleId) -> usize {
        self.particles
            .iter()
            .position(|p| p.id() == id)
            .expect("event referenced an unknown particle id")
    }

    fn obstacle_index(&self, id: ObstacleId) -> usize {
        self.obstacles
            .iter()
            .position(|o| o.id() == id)
            .expect("event referenced an unknown obstacle id")
    }

    fn is_stale(&self, event: &Event) -> bool {
        let subject = &self.particles[self.particle_index(event.subject)];
        if subject.collision_count() != event.subject_token {
            return true;
        }
        if let Target::Particle(target_id) = event.target {
            let target = &self.particles[self.particle_index(target_id)];
            if target.collision_count() != event.target_token {
                return true;
            }
        }
        false
    }

    /// Advances the trajectory by exactly one processed event, or returns
    /// `Advanced::Cancelled` without mutating anything if `cancelled()`
    /// reports true. `sink` receives the resulting snapshot in step order.
    pub fn advance<S: SnapshotSink>(
        &mut self,
        sink: &mut S,
        cancelled: &mut dyn FnMut() -> bool,
    ) -> Result<Advanced, SimError> {
        if cancelled() {
            return Ok(Advanced::Cancelled);
        }

        let event = loop {
            let Reverse(candidate) = self.queue.pop().ok_or_else(|| {
                warn!(step = self.step_index, "event heap exhausted");
                SimError::HeapExhausted {
                    step_index: self.step_index,
                }
            })?;
            let stale = candidate.time < self.tau || self.is_stale(&candidate);
            self.note_pop(stale);
            if stale {
                continue;
            }
            break candidate;
        };

        let dt = event.time - self.tau;
        if dt < STALL_TIME_EPS {
            self.consecutive_near_zero_events += 1;
            if self.consecutive_near_zero_events > STALL_WINDOW {
                warn!(step = self.step_index, tau = self.tau, "numerical stall detected");
                return Err(SimError::NumericalStall {
                    step_index: self.step_index,
                    tau: self.tau,
                });
            }
        } else {
            self.consecutive_near_zero_events = 0;
        }

        for particle in &mut self.particles {
            particle.advance(dt);
        }
        self.tau = event.time;

        let mut touched = vec![self.particle_index(event.subject)];
        match event.target {
            Target::Particle(target_id) => {
                let i = self.particle_index(event.subject);
                let j = self.particle_index(target_id);
                let (a, b) = (self.particles[i], self.particles[j]);
                let (new_va, new_vb) =
                    collision::resolve_disk_disk(a.position, a.velocity, b.position, b.velocity);
                self.particles[i].velocity = new_va;
                self.particles[j].velocity = new_vb;
                self.particles[i].bump_collision_count();
                self.particles[j].bump_collision_count();
                touched.push(j);
            }
            Target::Obstacle(obstacle_id) => {
                let i = self.particle_index(event.subject);
                let obstacle_idx = self.obstacle_index(obstacle_id);
                let p = self.particles[i];
                let new_velocity = match self.obstacles[obstacle_idx] {
                    Obstacle::Segment { orientation, .. } => {
                        collision::resolve_disk_segment(p.velocity, orientation)
                    }
                    Obstacle::Vertex { position, .. } => {
                        collision::resolve_disk_vertex(p.position, p.velocity, position)
                    }
                };
                self.particles[i].velocity = new_velocity;
                self.particles[i].bump_collision_count();
            }
        }

        let summary = EventSummary::from_target(event.time, event.subject, event.target, &self.obstacles);

        for &i in &touched {
            for j in 0..self.particles.len() {
                if j == i {
                    continue;
                }
                if let Some(new_event) = self.predict_particle_vs_particle(i.min(j), i.max(j)) {
                    self.queue.push(Reverse(new_event));
                }
            }
            for obstacle_idx in 0..self.obstacles.len() {
                if let Some(new_event) = self.predict_particle_vs_obstacle(i, obstacle_idx) {
                    self.queue.push(Reverse(new_event));
                }
            }
        }

        sink.write_step(self.step_index, self.tau, summary, &self.particles)
            .map_err(|e| SimError::SinkFailure(e.to_string()))?;
        debug!(step = self.step_index, tau = self.tau, kind = ?summary.kind, "event processed");
        self.last_emitted = Some((self.step_index, self.tau, summary, self.particles.clone()));
        self.step_index += 1;

        Ok(Advanced::Processed)
    }

    /// Runs the scheduler for up to `event_count` processed events, stopping
    /// early (cleanly) if `cancelled()` reports true. `l` is recorded in the
    /// sink's setup record only; the scheduler itself never consults it, since
    /// the container's geometry already lives entirely in `obstacles`.
    pub fn run<S: SnapshotSink>(
        &mut self,
        event_count: u64,
        l: f64,
        sink: &mut S,
        mut cancelled: impl FnMut() -> bool,
    ) -> Result<u64, SimError> {
        sink.write_setup(self.particles.len(), l, &self.obstacles)
            .map_err(|e| SimError::SinkFailure(e.to_string()))?;

        let mut processed = 0;
        while processed < event_count {
            match self.advance(sink, &mut cancelled)? {
                Advanced::Processed => processed += 1,
                Advanced::Cancelled => break,
            }
        }
        Ok(processed)
    }
}
