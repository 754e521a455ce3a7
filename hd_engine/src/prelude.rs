//! Numerical guardband constants shared by the predictors and the scheduler.
//!
//! These exist solely to reject degenerate/touching cases that are already in
//! contact; they are not tunable physics parameters.

/// Guardband for the disk-disk approach test (`Δv·Δr >= -eps` means "not approaching").
pub const APPROACH_EPS: f64 = 1e-14;
/// Guardband on the disk-disk discriminant below which we call it a miss.
pub const DISCRIMINANT_EPS: f64 = 1e-14;
/// Minimum accepted time-to-contact; smaller roots are treated as "already touching".
pub const CONTACT_TIME_EPS: f64 = 1e-14;

/// Non-overlap / containment slack used by validation and invariant checks.
pub const GEOMETRY_EPS: f64 = 1e-10;

/// Number of consecutive near-zero-duration events that trigger `SimError::NumericalStall`.
pub const STALL_WINDOW: u32 = 16;
/// Two event times closer than this are considered identical for stall detection.
pub const STALL_TIME_EPS: f64 = 1e-12;

/// Rolling window size (in heap pops) over which the stale-pop ratio is measured.
pub const STALE_POP_WINDOW: u32 = 256;
/// Stale-to-total pop ratio over a window above which the scheduler logs a diagnostic.
pub const STALE_POP_RATIO_THRESHOLD: f64 = 0.5;

pub type ParticleId = u64;
pub type ObstacleId = u64;
