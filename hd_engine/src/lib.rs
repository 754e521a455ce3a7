pub mod collision;
pub mod container;
pub mod error;
pub mod event;
pub mod initial_state;
pub mod math_core;
pub mod obstacle;
pub mod particle;
pub mod prelude;
pub mod scheduler;
pub mod snapshot;
pub mod statistics;
pub mod vec2;

pub use error::SimError;
pub use event::{Event, Target};
pub use initial_state::{InitialState, ObstacleSpec, OrientationSpec, ParticleSpec};
pub use obstacle::{Obstacle, Orientation};
pub use particle::Particle;
pub use scheduler::{Advanced, Scheduler};
pub use snapshot::{EventKind, EventSummary, MemorySink, SnapshotSink};
pub use statistics::Statistics;
pub use vec2::Vec2;
