//! Records of executed operations.

use crate::{NumericError, Operation};
use serde::{Deserialize, Serialize};

/// Outcome of one operation execution.
///
/// Numeric failures are captured here instead of aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationOutcome {
    /// The operation produced a finite value.
    Completed(f64),
    /// The operation failed with a numeric error.
    Failed { error: NumericError },
}

impl OperationOutcome {
    /// The computed value, if the operation succeeded.
    pub fn value(&self) -> Option<f64> {
        match self {
            OperationOutcome::Completed(v) => Some(*v),
            OperationOutcome::Failed { .. } => None,
        }
    }

    /// The captured error, if the operation failed.
    pub fn error(&self) -> Option<NumericError> {
        match self {
            OperationOutcome::Completed(_) => None,
            OperationOutcome::Failed { error } => Some(*error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OperationOutcome::Failed { .. })
    }
}

impl From<Result<f64, NumericError>> for OperationOutcome {
    fn from(result: Result<f64, NumericError>) -> Self {
        match result {
            Ok(v) => OperationOutcome::Completed(v),
            Err(error) => OperationOutcome::Failed { error },
        }
    }
}

/// One executed operation: its inputs and outcome.
///
/// Created once per execution and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub operation: Operation,
    pub x: f64,
    pub y: f64,
    pub result: OperationOutcome,
}

impl OperationRecord {
    /// Execute `operation` on `(x, y)` and capture the outcome.
    pub fn execute(operation: Operation, x: f64, y: f64) -> Self {
        Self {
            operation,
            x,
            y,
            result: operation.apply(x, y).into(),
        }
    }
}

/// Serializable wrapper around a run's records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationList {
    pub operations: Vec<OperationRecord>,
}

impl From<Vec<OperationRecord>> for OperationList {
    fn from(operations: Vec<OperationRecord>) -> Self {
        Self { operations }
    }
}
