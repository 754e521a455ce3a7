use thiserror::Error;

/// The simulator's error taxonomy. None of these are retriable: the
/// simulation is deterministic given its input, so a transient failure does
/// not exist — every variant here is fatal to the run that raised it.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid initial state: {0}")]
    InvalidInitialState(String),

    #[error("event heap exhausted at step {step_index} with events still pending")]
    HeapExhausted { step_index: u64 },

    #[error("numerical stall detected at step {step_index}, tau={tau}")]
    NumericalStall { step_index: u64, tau: f64 },

    #[error("snapshot sink failed: {0}")]
    SinkFailure(String),
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::SinkFailure(err.to_string())
    }
}
