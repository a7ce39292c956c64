use crate::sample::Metric;
use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("config error: {0}")]
    Config(String),

    #[error("system error: {0}")]
    System(String),

    /// A single metric could not be read this tick.
    #[error("metric '{0}' is unavailable")]
    Unavailable(Metric),

    #[error("no process with PID {0}")]
    ProcessNotFound(u32),

    #[error("cannot terminate process {pid}: {reason}")]
    Terminate { pid: u32, reason: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = VigilError> = std::result::Result<T, E>;
