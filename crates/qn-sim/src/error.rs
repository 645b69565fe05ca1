use qn_core::ConfigError;
use qn_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("simulation invariant violated: {0}")]
    Invariant(#[from] EngineError),

    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
