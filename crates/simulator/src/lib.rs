//! Load Simulator
//!
//! Generates a synthetic load of simple math operations for a bounded
//! duration, gated by an admission limit, and records every operation's
//! inputs and result.
//!
//! # Architecture
//!
//! - **Selection**: [`OperationSelector`] draws an operation from the
//!   configured [`Complexity`] tier and two operands
//! - **Admission**: [`RateLimiter`] caps in-flight operations (or, opt-in,
//!   operations per second)
//! - **Execution**: [`Simulator`] runs the time-boxed loop, capturing numeric
//!   errors into the record instead of aborting
//! - **Tracing**: [`OperationLogger`] emits start/end traces per operation
//!
//! # Example
//!
//! ```ignore
//! use loadsim_simulator::{Complexity, LoadConfig, Simulator};
//!
//! let config = LoadConfig::new(2, Complexity::Easy).with_max_ops_per_sec(5);
//! let simulator = Simulator::new(config)?;
//! let run = simulator.run_with_report().await?;
//!
//! println!("{} operations", run.records.len());
//! run.report.print();
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod rate_limiter;
pub mod recorder;
pub mod runner;
pub mod selector;

pub use config::{LoadConfig, RateLimitMode, DEFAULT_MAX_OPS_PER_SEC};
pub use error::{ConfigError, SimulationError};
pub use metrics::{MetricsCollector, SimulationReport};
pub use rate_limiter::{Permit, RateLimiter};
pub use recorder::{OperationLogger, OperationSpan};
pub use runner::{SimulationRun, Simulator};
pub use selector::OperationSelector;

pub use loadsim_types::{
    Complexity, NumericError, Operation, OperationList, OperationOutcome, OperationRecord,
};
