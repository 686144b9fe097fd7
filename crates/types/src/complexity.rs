//! Complexity tiers.

use crate::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Complexity tier of the generated load.
///
/// Each tier maps to exactly two operations; the selector draws uniformly
/// between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Addition and subtraction.
    #[default]
    Easy,
    /// Multiplication and division.
    Medium,
    /// Exponential and sine.
    Complicated,
}

impl Complexity {
    /// All tiers, in ascending order.
    pub const ALL: [Complexity; 3] = [
        Complexity::Easy,
        Complexity::Medium,
        Complexity::Complicated,
    ];

    /// The two operations eligible for this tier.
    pub const fn operations(self) -> [Operation; 2] {
        match self {
            Complexity::Easy => [Operation::Add, Operation::Sub],
            Complexity::Medium => [Operation::Mul, Operation::Div],
            Complexity::Complicated => [Operation::Exp, Operation::Sin],
        }
    }

    /// Whether `operation` belongs to this tier.
    pub fn contains(self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }

    /// Lowercase name, as accepted on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Complexity::Easy => "easy",
            Complexity::Medium => "medium",
            Complexity::Complicated => "complicated",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known complexity tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown complexity '{0}' (expected easy, medium or complicated)")]
pub struct ParseComplexityError(pub String);

impl FromStr for Complexity {
    type Err = ParseComplexityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Complexity::Easy),
            "medium" => Ok(Complexity::Medium),
            "complicated" => Ok(Complexity::Complicated),
            _ => Err(ParseComplexityError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_operations() {
        assert_eq!(
            Complexity::Easy.operations(),
            [Operation::Add, Operation::Sub]
        );
        assert_eq!(
            Complexity::Medium.operations(),
            [Operation::Mul, Operation::Div]
        );
        assert_eq!(
            Complexity::Complicated.operations(),
            [Operation::Exp, Operation::Sin]
        );
    }

    #[test]
    fn test_tiers_are_disjoint() {
        for (i, a) in Complexity::ALL.iter().enumerate() {
            for b in &Complexity::ALL[i + 1..] {
                for op in a.operations() {
                    assert!(!b.contains(op), "{op} is in both {a} and {b}");
                }
            }
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("EASY".parse::<Complexity>().unwrap(), Complexity::Easy);
        assert_eq!("Medium".parse::<Complexity>().unwrap(), Complexity::Medium);
        assert_eq!(
            " complicated ".parse::<Complexity>().unwrap(),
            Complexity::Complicated
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "hard".parse::<Complexity>().unwrap_err();
        assert_eq!(err, ParseComplexityError("hard".to_string()));
        assert!(err.to_string().contains("hard"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for tier in Complexity::ALL {
            assert_eq!(tier.to_string().parse::<Complexity>().unwrap(), tier);
        }
    }
}
