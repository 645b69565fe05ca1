use qn_core::{ConfigError, ProcessId, ResourceId, SimTime};
use thiserror::Error;

/// A broken engine invariant.
///
/// None of these can be caused by a validated `ScenarioConfig`; seeing one
/// means a process or the engine itself misbehaved.  They are never
/// recovered from: the run that raised one is abandoned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("delay must be a non-negative number, got {0}")]
    InvalidDelay(f64),

    #[error("run horizon must be a finite non-negative number, got {0}")]
    InvalidHorizon(f64),

    #[error("event at {at} scheduled before the last executed event at {last}")]
    TimeTravel { at: SimTime, last: SimTime },

    #[error("simulation clock has been torn down")]
    ClockTornDown,

    #[error("{resource} has {holders} holders, exceeding capacity {capacity}")]
    CapacityExceeded {
        resource: ResourceId,
        holders:  usize,
        capacity: usize,
    },

    #[error("{pid} already holds or waits for {resource}")]
    DuplicateRequest { pid: ProcessId, resource: ResourceId },

    #[error("{pid} is waiting for {resource} and cannot be scheduled")]
    Blocked { pid: ProcessId, resource: ResourceId },

    #[error("{pid} released {resource} without holding it")]
    NotHolder { pid: ProcessId, resource: ResourceId },

    #[error("unknown or finished process {0}")]
    UnknownProcess(ProcessId),

    #[error("unknown resource {0}")]
    UnknownResource(ResourceId),

    #[error("invalid parameter inside a running process: {0}")]
    Parameter(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;
