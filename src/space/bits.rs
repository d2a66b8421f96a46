//! Fixed-length bit strings.

use std::hash::{Hash, Hasher};

use rand::Rng;
use rustc_hash::FxHasher;

use super::SearchSpace;
use crate::error::{Result, SearchError};

/// Bit strings of a fixed length, each bit set with probability 0.5 at
/// initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitSpace {
    bits: usize,
}

impl BitSpace {
    pub fn new(bits: usize) -> Result<Self> {
        if bits == 0 {
            return Err(SearchError::EmptySpace);
        }
        Ok(Self { bits })
    }
}

impl SearchSpace for BitSpace {
    type Solution = Vec<bool>;

    fn dimension(&self) -> usize {
        self.bits
    }

    fn random_solution<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
        (0..self.bits).map(|_| rng.random_bool(0.5)).collect()
    }

    fn is_valid(&self, solution: &Vec<bool>) -> bool {
        solution.len() == self.bits
    }

    fn fingerprint(&self, solution: &Vec<bool>) -> u64 {
        let mut hasher = FxHasher::default();
        solution.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_random_bits_are_balanced() {
        let space = BitSpace::new(4000).unwrap();
        let mut rng = create_rng(42);
        let bits = space.random_solution(&mut rng);
        let ones = bits.iter().filter(|&&b| b).count();
        assert!(space.is_valid(&bits));
        assert!((1800..2200).contains(&ones), "got {ones} ones out of 4000");
    }

    #[test]
    fn test_rejects_zero_length() {
        assert_eq!(BitSpace::new(0), Err(SearchError::EmptySpace));
    }

    #[test]
    fn test_length_validity() {
        let space = BitSpace::new(3).unwrap();
        assert!(space.is_valid(&vec![true, false, true]));
        assert!(!space.is_valid(&vec![true, false]));
    }
}
