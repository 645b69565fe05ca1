//! Configuration error type.
//!
//! Everything in here is detected before a run starts.  Broken engine
//! invariants live in `qn-engine` as `EngineError`; the two are deliberately
//! separate types because they propagate differently (per scenario vs.
//! fail-fast).

use thiserror::Error;

/// A scenario parameter that cannot produce a meaningful run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("capacity must be at least 1, got {0}")]
    CapacityTooSmall(usize),

    #[error("{what} must be a positive number, got {value}")]
    NonPositiveMean { what: &'static str, value: f64 },

    #[error("horizon must be a finite non-negative number, got {0}")]
    InvalidHorizon(f64),

    #[error("scenario label must not be empty")]
    EmptyLabel,
}

/// Shorthand result type for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;
