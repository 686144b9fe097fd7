//! The fixed operation table.
//!
//! Every operation is a plain function over `f64`. Binary operations use both
//! operands; unary operations ignore `y`, which is still drawn so that every
//! record has the same shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Numeric failure raised while executing a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericError {
    /// Division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Result does not fit in a finite `f64`.
    #[error("numeric overflow")]
    Overflow,
}

/// A mathematical operation the simulator can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Exp,
    Sin,
}

impl Operation {
    /// Every operation in the table.
    pub const ALL: [Operation; 6] = [
        Operation::Add,
        Operation::Sub,
        Operation::Mul,
        Operation::Div,
        Operation::Exp,
        Operation::Sin,
    ];

    /// Short name used in logs and records.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
            Operation::Div => "div",
            Operation::Exp => "exp",
            Operation::Sin => "sin",
        }
    }

    /// Number of operands the function consumes.
    pub const fn arity(self) -> usize {
        match self {
            Operation::Add | Operation::Sub | Operation::Mul | Operation::Div => 2,
            Operation::Exp | Operation::Sin => 1,
        }
    }

    /// Execute the operation.
    ///
    /// `y` is ignored for unary operations.
    ///
    /// # Errors
    ///
    /// - [`NumericError::DivisionByZero`] for `div` with `y == 0`
    /// - [`NumericError::Overflow`] when the result is not finite (e.g. `exp(1e6)`)
    pub fn apply(self, x: f64, y: f64) -> Result<f64, NumericError> {
        let result = match self {
            Operation::Add => x + y,
            Operation::Sub => x - y,
            Operation::Mul => x * y,
            Operation::Div => {
                if y == 0.0 {
                    return Err(NumericError::DivisionByZero);
                }
                x / y
            }
            Operation::Exp => x.exp(),
            Operation::Sin => x.sin(),
        };

        if result.is_infinite() {
            return Err(NumericError::Overflow);
        }
        Ok(result)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
