//! The textual on-disk snapshot sink: `setup.txt`, `steps/<i>.txt`, and a
//! running `events.txt`, kept for compatibility with downstream tooling that
//! already consumes this layout.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use hd_engine::{EventKind, EventSummary, Obstacle, Particle, SnapshotSink};

pub struct FileSnapshotSink {
    out_dir: PathBuf,
    steps_dir: PathBuf,
    events: BufWriter<File>,
}

impl FileSnapshotSink {
    pub fn new(out_dir: &Path) -> std::io::Result<Self> {
        let steps_dir = out_dir.join("steps");
        fs::create_dir_all(&steps_dir)?;
        let events = BufWriter::new(File::create(out_dir.join("events.txt"))?);
        Ok(FileSnapshotSink {
            out_dir: out_dir.to_path_buf(),
            steps_dir,
            events,
        })
    }
}

fn event_kind_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Particle => "PARTICLE",
        EventKind::Wall => "WALL",
        EventKind::Vertex => "VERTEX",
    }
}

impl SnapshotSink for FileSnapshotSink {
    type Error = std::io::Error;

    fn write_setup(&mut self, particle_count: usize, l: f64, obstacles: &[Obstacle]) -> std::io::Result<()> {
        let mut setup = BufWriter::new(File::create(self.out_dir.join("setup.txt"))?);
        writeln!(setup, "{} {}", particle_count, l)?;
        for obstacle in obstacles {
            if let Obstacle::Segment { a, b, .. } = obstacle {
                writeln!(setup, "{} {} {} {}", a.x, a.y, b.x, b.y)?;
            }
        }
        setup.flush()
    }

    fn write_step(
        &mut self,
        step_index: u64,
        tau: f64,
        event: EventSummary,
        particles: &[Particle],
    ) -> std::io::Result<()> {
        let mut step_file = BufWriter::new(File::create(self.steps_dir.join(format!("{step_index}.txt")))?);
        for p in particles {
            writeln!(
                step_file,
                "{:.14} {:.14} {:.14} {:.14} {:.14}",
                p.position.x, p.position.y, p.velocity.x, p.velocity.y, p.radius()
            )?;
        }
        step_file.flush()?;

        writeln!(
            self.events,
            "{} {} {} {}",
            tau,
            event_kind_label(event.kind),
            event.subject,
            event.target
        )?;
        self.events.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hd_engine::{Orientation, Particle, Scheduler, Vec2};
    use std::fs;

    fn run_into(dir: &Path) {
        let obstacles = vec![
            Obstacle::Segment { orientation: Orientation::Horizontal, a: Vec2::new(0.0, 0.0), b: Vec2::new(5.0, 0.0), id: 0 },
            Obstacle::Segment { orientation: Orientation::Vertical, a: Vec2::new(5.0, 0.0), b: Vec2::new(5.0, 5.0), id: 1 },
            Obstacle::Segment { orientation: Orientation::Horizontal, a: Vec2::new(5.0, 5.0), b: Vec2::new(0.0, 5.0), id: 2 },
            Obstacle::Segment { orientation: Orientation::Vertical, a: Vec2::new(0.0, 5.0), b: Vec2::new(0.0, 0.0), id: 3 },
        ];
        let particles = vec![
            Particle::new(0, Vec2::new(1.0, 1.0), Vec2::new(1.3, 0.7), 0.2),
            Particle::new(1, Vec2::new(4.0, 3.0), Vec2::new(-0.9, 0.4), 0.2),
            Particle::new(2, Vec2::new(2.5, 4.0), Vec2::new(0.2, -1.1), 0.2),
        ];
        let mut scheduler = Scheduler::new(particles, obstacles);
        let mut sink = FileSnapshotSink::new(dir).unwrap();
        scheduler.run(25, 5.0, &mut sink, || false).unwrap();
    }

    #[test]
    fn test_two_runs_produce_byte_identical_output() {
        let base = std::env::temp_dir().join("hd_runner_sink_determinism_test");
        let dir_a = base.join("a");
        let dir_b = base.join("b");
        let _ = fs::remove_dir_all(&dir_a);
        let _ = fs::remove_dir_all(&dir_b);

        run_into(&dir_a);
        run_into(&dir_b);

        assert_eq!(
            fs::read(dir_a.join("setup.txt")).unwrap(),
            fs::read(dir_b.join("setup.txt")).unwrap()
        );
        assert_eq!(
            fs::read(dir_a.join("events.txt")).unwrap(),
            fs::read(dir_b.join("events.txt")).unwrap()
        );
        for i in 0..25 {
            assert_eq!(
                fs::read(dir_a.join("steps").join(format!("{i}.txt"))).unwrap(),
                fs::read(dir_b.join("steps").join(format!("{i}.txt"))).unwrap()
            );
        }

        let _ = fs::remove_dir_all(&dir_a);
        let _ = fs::remove_dir_all(&dir_b);
    }
}
