use thiserror::Error;

/// Errors raised by the simulation core and its export collaborators.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    #[error("no unique minimal rotation between antiparallel vectors")]
    AntiparallelVectors,

    #[error("mixer matrix is singular (check thrust/drag coefficients and arm length)")]
    SingularMixer,

    #[error("state diverged (non-finite value) at t={time:.4}s")]
    Diverged { time: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
