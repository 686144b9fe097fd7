//! Random selection of operations and operands.

use loadsim_types::{Complexity, Operation};
use rand::Rng;

/// Smallest operand the selector draws.
pub const OPERAND_MIN: f64 = 1.0;

/// Largest operand the selector draws.
pub const OPERAND_MAX: f64 = 1_000_000.0;

/// Picks the next unit of work for a complexity tier.
///
/// Selection only consumes randomness, so a seeded RNG yields the same
/// sequence every time.
#[derive(Clone, Copy, Debug)]
pub struct OperationSelector {
    complexity: Complexity,
}

impl OperationSelector {
    /// Create a selector for the given tier.
    pub fn new(complexity: Complexity) -> Self {
        Self { complexity }
    }

    /// Draw an operation and two operands.
    ///
    /// The operation is uniform over the tier's two operations. `x` and `y`
    /// are independent and uniform over `[OPERAND_MIN, OPERAND_MAX]`; `y` is
    /// drawn even for unary operations.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> (Operation, f64, f64) {
        let candidates = self.complexity.operations();
        let operation = candidates[rng.gen_range(0..candidates.len())];
        let x = rng.gen_range(OPERAND_MIN..=OPERAND_MAX);
        let y = rng.gen_range(OPERAND_MIN..=OPERAND_MAX);
        (operation, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    #[test]
    fn test_selects_only_tier_operations() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for complexity in Complexity::ALL {
            let selector = OperationSelector::new(complexity);
            for _ in 0..500 {
                let (op, _, _) = selector.select(&mut rng);
                assert!(complexity.contains(op), "{op} not in {complexity}");
            }
        }
    }

    #[test]
    fn test_operands_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let selector = OperationSelector::new(Complexity::Complicated);
        for _ in 0..1_000 {
            let (_, x, y) = selector.select(&mut rng);
            assert!((OPERAND_MIN..=OPERAND_MAX).contains(&x));
            assert!((OPERAND_MIN..=OPERAND_MAX).contains(&y));
        }
    }

    #[test]
    fn test_both_operations_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let selector = OperationSelector::new(Complexity::Medium);
        let mut counts: HashMap<Operation, usize> = HashMap::new();
        for _ in 0..2_000 {
            let (op, _, _) = selector.select(&mut rng);
            *counts.entry(op).or_default() += 1;
        }

        // Uniform over two choices: each should land well within 40-60%.
        for op in Complexity::Medium.operations() {
            let n = counts.get(&op).copied().unwrap_or(0);
            assert!((800..=1_200).contains(&n), "{op} drawn {n} times");
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let selector = OperationSelector::new(Complexity::Easy);
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(selector.select(&mut a), selector.select(&mut b));
        }
    }
}
