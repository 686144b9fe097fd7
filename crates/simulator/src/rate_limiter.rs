//! Admission gate for operation executions.
//!
//! In the default [`RateLimitMode::Concurrency`] mode the gate is a counting
//! semaphore: `max_ops_per_sec` bounds how many operations are in flight at
//! once, not how many complete per wall-clock second. With a single
//! sequential worker it never blocks.
//!
//! [`RateLimitMode::PerSecond`] swaps in a token bucket that refills at
//! `max_ops_per_sec` tokens per second with a burst of the same size.

use crate::config::RateLimitMode;
use crate::error::SimulationError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Token bucket state.
#[derive(Debug)]
struct TokenBucket {
    /// Current number of tokens available.
    tokens: f64,
    /// Maximum tokens (bucket capacity).
    capacity: f64,
    /// Tokens added per second.
    refill_rate: f64,
    /// Last time we updated the bucket.
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: u32, refill_rate: u32) -> Self {
        Self {
            tokens: capacity as f64,
            capacity: capacity as f64,
            refill_rate: refill_rate as f64,
            last_update: Instant::now(),
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_update = now;
    }

    /// Try to consume one token.
    ///
    /// Returns `Ok(())` on success, otherwise how long until a token is due.
    fn try_consume(&mut self) -> Result<(), Duration> {
        self.refill(Instant::now());

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - self.tokens;
            Err(Duration::from_secs_f64(missing / self.refill_rate))
        }
    }
}

enum Gate {
    Concurrency(Arc<Semaphore>),
    PerSecond(Mutex<TokenBucket>),
}

/// Shared admission gate. Cloning yields a handle to the same gate.
#[derive(Clone)]
pub struct RateLimiter {
    gate: Arc<Gate>,
}

/// Proof of admission. Dropping it releases the slot.
#[must_use = "dropping the permit releases it immediately"]
pub struct Permit {
    _slot: Option<OwnedSemaphorePermit>,
}

impl RateLimiter {
    /// Create a gate with `capacity` permits (or tokens per second).
    ///
    /// A capacity of zero is rejected earlier by `LoadConfig::validate`.
    pub fn new(capacity: u32, mode: RateLimitMode) -> Self {
        let gate = match mode {
            RateLimitMode::Concurrency => {
                Gate::Concurrency(Arc::new(Semaphore::new(capacity as usize)))
            }
            RateLimitMode::PerSecond => Gate::PerSecond(Mutex::new(TokenBucket::new(
                capacity,
                capacity.max(1),
            ))),
        };
        Self {
            gate: Arc::new(gate),
        }
    }

    pub fn mode(&self) -> RateLimitMode {
        match *self.gate {
            Gate::Concurrency(_) => RateLimitMode::Concurrency,
            Gate::PerSecond(_) => RateLimitMode::PerSecond,
        }
    }

    /// Wait until a slot is available.
    ///
    /// Only the calling task is suspended while waiting. The semaphore is
    /// never closed by this crate, so `LimiterClosed` only surfaces if tokio
    /// reports the gate as closed.
    pub async fn acquire(&self) -> Result<Permit, SimulationError> {
        match &*self.gate {
            Gate::Concurrency(semaphore) => {
                let slot = semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| SimulationError::LimiterClosed)?;
                Ok(Permit { _slot: Some(slot) })
            }
            Gate::PerSecond(bucket) => loop {
                // Lock is released before sleeping.
                let wait = match bucket.lock().try_consume() {
                    Ok(()) => return Ok(Permit { _slot: None }),
                    Err(wait) => wait,
                };
                tokio::time::sleep(wait).await;
            },
        }
    }

    /// Return a permit, waking one waiter if any.
    pub fn release(&self, permit: Permit) {
        drop(permit);
    }

    /// Permits currently free. Always 0 in per-second mode with an empty bucket.
    pub fn available(&self) -> usize {
        match &*self.gate {
            Gate::Concurrency(semaphore) => semaphore.available_permits(),
            Gate::PerSecond(bucket) => {
                let mut bucket = bucket.lock();
                bucket.refill(Instant::now());
                bucket.tokens.floor() as usize
            }
        }
    }
}
