//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur at the simulation boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Initial or final state specification the engine cannot use.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Circuit exceeds what the engine can hold in memory.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// State norm drifted beyond tolerance during evolution.
    #[error("State is not normalized: |norm - 1| = {deviation:e} exceeds atol = {atol:e}")]
    Normalization { deviation: f64, atol: f64 },

    /// Options could not be decoded from the run configuration.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Worker pool could not be built.
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
