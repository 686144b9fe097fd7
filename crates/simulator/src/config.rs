//! Configuration types for a load run.

use crate::error::ConfigError;
use loadsim_types::Complexity;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Admission limit used when the caller does not set one.
pub const DEFAULT_MAX_OPS_PER_SEC: u32 = 1_000_000;

/// Run length of [`LoadConfig::random_default`].
pub const DEFAULT_RUN_SECS: u64 = 5;

/// How the admission gate interprets `max_ops_per_sec`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RateLimitMode {
    /// Cap on simultaneously in-flight operations (a semaphore).
    #[default]
    Concurrency,

    /// Token bucket refilled at `max_ops_per_sec` tokens per second.
    PerSecond,
}

impl fmt::Display for RateLimitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitMode::Concurrency => f.write_str("concurrency"),
            RateLimitMode::PerSecond => f.write_str("per-second"),
        }
    }
}

impl FromStr for RateLimitMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "concurrency" | "concurrent" => Ok(RateLimitMode::Concurrency),
            "per-second" | "persecond" | "token-bucket" => Ok(RateLimitMode::PerSecond),
            _ => Err(ConfigError::UnknownRateLimitMode(s.to_string())),
        }
    }
}

/// Configuration for a simulation run.
#[derive(Clone, Debug)]
pub struct LoadConfig {
    /// How long to keep issuing operations.
    pub duration: Duration,

    /// Which tier of operations to draw from.
    pub complexity: Complexity,

    /// Admission gate capacity. Must be at least 1.
    pub max_ops_per_sec: u32,

    /// How the admission gate interprets `max_ops_per_sec`.
    pub rate_limit_mode: RateLimitMode,

    /// Number of concurrent workers sharing the gate.
    /// 1 keeps execution strictly sequential.
    pub workers: usize,

    /// Seed for operand and operation selection. `None` draws from entropy.
    pub seed: Option<u64>,

    /// Stop after this many records even if the deadline has not passed.
    pub max_operations: Option<u64>,
}

impl LoadConfig {
    /// Create a configuration that runs for `seconds_to_run` seconds.
    pub fn new(seconds_to_run: u64, complexity: Complexity) -> Self {
        Self {
            duration: Duration::from_secs(seconds_to_run),
            complexity,
            max_ops_per_sec: DEFAULT_MAX_OPS_PER_SEC,
            rate_limit_mode: RateLimitMode::default(),
            workers: 1,
            seed: None,
            max_operations: None,
        }
    }

    /// A short run at a randomly chosen complexity.
    pub fn random_default<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let complexity = Complexity::ALL
            .choose(rng)
            .copied()
            .unwrap_or_default();
        Self::new(DEFAULT_RUN_SECS, complexity)
    }

    /// Set the admission gate capacity.
    pub fn with_max_ops_per_sec(mut self, max_ops_per_sec: u32) -> Self {
        self.max_ops_per_sec = max_ops_per_sec;
        self
    }

    /// Set the rate limit mode.
    pub fn with_rate_limit_mode(mut self, mode: RateLimitMode) -> Self {
        self.rate_limit_mode = mode;
        self
    }

    /// Set the number of concurrent workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap the number of operations recorded.
    pub fn with_max_operations(mut self, max_operations: u64) -> Self {
        self.max_operations = Some(max_operations);
        self
    }

    /// Deadline for a run that starts at `start`.
    pub fn deadline_from(&self, start: Instant) -> Instant {
        start + self.duration
    }

    /// Check every field for values the simulator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_ops_per_sec == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self::new(10, Complexity::Easy).with_max_ops_per_sec(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_uses_library_defaults() {
        let config = LoadConfig::new(3, Complexity::Medium);
        assert_eq!(config.duration, Duration::from_secs(3));
        assert_eq!(config.complexity, Complexity::Medium);
        assert_eq!(config.max_ops_per_sec, DEFAULT_MAX_OPS_PER_SEC);
        assert_eq!(config.rate_limit_mode, RateLimitMode::Concurrency);
        assert_eq!(config.workers, 1);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_matches_cli_defaults() {
        let config = LoadConfig::default();
        assert_eq!(config.duration, Duration::from_secs(10));
        assert_eq!(config.complexity, Complexity::Easy);
        assert_eq!(config.max_ops_per_sec, 5);
    }

    #[test]
    fn test_zero_rate_rejected() {
        let config = LoadConfig::new(1, Complexity::Easy).with_max_ops_per_sec(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroRate));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = LoadConfig::new(1, Complexity::Easy).with_workers(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn test_zero_duration_is_valid() {
        let config = LoadConfig::new(0, Complexity::Complicated);
        assert!(config.validate().is_ok());
        let start = Instant::now();
        assert_eq!(config.deadline_from(start), start);
    }

    #[test]
    fn test_random_default() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = LoadConfig::random_default(&mut rng);
        assert_eq!(config.duration, Duration::from_secs(DEFAULT_RUN_SECS));
        assert!(Complexity::ALL.contains(&config.complexity));
    }

    #[test]
    fn test_rate_limit_mode_parse() {
        assert_eq!(
            "concurrency".parse::<RateLimitMode>().unwrap(),
            RateLimitMode::Concurrency
        );
        assert_eq!(
            "Per-Second".parse::<RateLimitMode>().unwrap(),
            RateLimitMode::PerSecond
        );
        assert_eq!(
            "bursty".parse::<RateLimitMode>(),
            Err(ConfigError::UnknownRateLimitMode("bursty".to_string()))
        );
    }
}
