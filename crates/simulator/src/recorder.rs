//! Start/end tracing around each operation execution.
//!
//! [`OperationLogger::start`] logs the start and returns a guard; dropping the
//! guard logs completion, so the end trace is emitted even if the wrapped code
//! unwinds. Logging goes through `tracing` and never fails the operation.

use loadsim_types::Operation;
use std::time::{Duration, Instant};
use tracing::info;

/// Target for per-operation traces, so they can be filtered separately.
pub const OPS_TARGET: &str = "loadsim_simulator::ops";

/// Emits per-operation start/end traces.
#[derive(Clone, Copy, Debug)]
pub struct OperationLogger {
    enabled: bool,
}

impl OperationLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A logger that emits nothing.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Log the start of `operation` and return a guard that logs its end.
    ///
    /// `y` is only traced for binary operations.
    pub fn start(&self, operation: Operation, x: f64, y: f64) -> OperationSpan {
        if self.enabled {
            if operation.arity() == 2 {
                info!(target: OPS_TARGET, operation = %operation, x, y, "Operation {} started", operation);
            } else {
                info!(target: OPS_TARGET, operation = %operation, x, "Operation {} started", operation);
            }
        }
        OperationSpan {
            operation,
            enabled: self.enabled,
            started: Instant::now(),
        }
    }
}

impl Default for OperationLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Guard covering one operation execution.
#[must_use = "the end trace is emitted when the span is dropped"]
pub struct OperationSpan {
    operation: Operation,
    enabled: bool,
    started: Instant,
}

impl OperationSpan {
    /// Time since the span was opened.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        if self.enabled {
            info!(target: OPS_TARGET, operation = %self.operation, "Operation {} completed", self.operation);
        }
    }
}
