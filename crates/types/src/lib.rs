//! Core types for the load simulator.
//!
//! This crate holds the data model shared by the simulator and its CLI:
//!
//! - [`Complexity`]: the tier that decides which two operations are eligible
//! - [`Operation`]: the fixed table of arithmetic/trigonometric functions
//! - [`OperationRecord`]: one executed operation with its inputs and outcome
//!
//! Everything here is synchronous and free of I/O.

mod complexity;
mod operation;
mod record;

pub use complexity::{Complexity, ParseComplexityError};
pub use operation::{NumericError, Operation};
pub use record::{OperationList, OperationOutcome, OperationRecord};
