//! Error types for the simulator.

use loadsim_types::ParseComplexityError;
use thiserror::Error;

/// Invalid configuration, detected before any operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The admission gate needs at least one permit.
    #[error("max operations per second must be at least 1")]
    ZeroRate,

    /// At least one worker must drive the loop.
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// Complexity name did not match a known tier.
    #[error("unknown complexity: {0}")]
    UnknownComplexity(String),

    /// Rate limit mode name did not match a known mode.
    #[error("unknown rate limit mode: {0} (expected concurrency or per-second)")]
    UnknownRateLimitMode(String),
}

impl From<ParseComplexityError> for ConfigError {
    fn from(err: ParseComplexityError) -> Self {
        ConfigError::UnknownComplexity(err.0)
    }
}

/// Errors that end a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The admission gate was closed while a worker waited on it.
    #[error("rate limiter closed")]
    LimiterClosed,

    /// A worker task panicked or was cancelled.
    #[error("worker failed: {0}")]
    WorkerFailed(String),
}
