//! Error types for the driver.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriverError {
    /// Malformed state specification.
    #[error("Invalid state: {0}")]
    Validation(String),

    /// Option value that does not evaluate to the expected type.
    #[error("Cannot evaluate {key} = '{value}': {reason}")]
    Expression {
        key: String,
        value: String,
        reason: String,
    },

    /// Incompatible flags, bad parameter source, bad rank/size or unknown backend.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File that cannot be read or created.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Circuit text rejected by the reader.
    #[error("Parse error: {0}")]
    Parse(#[from] qrun_qasm::ParseError),

    /// Engine failure.
    #[error("Simulation failed: {0}")]
    Simulation(#[from] qrun_hal::HalError),

    /// Result record that cannot be serialized or written.
    #[error("Cannot persist result: {0}")]
    Persistence(String),
}

impl DriverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
