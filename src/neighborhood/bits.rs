//! Bit-string operators.

use rand::Rng;

use super::{Move, Neighborhood};
use crate::error::{Result, SearchError};

/// Flips exactly one uniformly chosen bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitFlip;

impl Neighborhood<Vec<bool>> for BitFlip {
    type Attribute = usize;

    fn propose<R: Rng>(&self, bits: &Vec<bool>, rng: &mut R) -> Move<Vec<bool>, usize> {
        let pos = rng.random_range(0..bits.len());
        let mut child = bits.clone();
        child[pos] = !child[pos];
        Move::new(child, vec![pos])
    }
}

/// Flips each bit independently with probability `rate`.
///
/// If no bit was flipped, one random bit is flipped so the output always
/// differs from the input.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointMutation {
    rate: f64,
}

impl PointMutation {
    /// Creates the operator. `rate` must lie in `(0, 1]`.
    pub fn new(rate: f64) -> Result<Self> {
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(SearchError::parameter(
                "rate",
                format!("must be in (0, 1], got {rate}"),
            ));
        }
        Ok(Self { rate })
    }

    /// The customary `1 / n` rate for strings of length `n`.
    pub fn for_length(bits: usize) -> Result<Self> {
        if bits == 0 {
            return Err(SearchError::EmptySpace);
        }
        Self::new(1.0 / bits as f64)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Neighborhood<Vec<bool>> for PointMutation {
    type Attribute = usize;

    fn propose<R: Rng>(&self, bits: &Vec<bool>, rng: &mut R) -> Move<Vec<bool>, usize> {
        let mut child = bits.clone();
        let mut flipped = Vec::new();
        for (i, bit) in child.iter_mut().enumerate() {
            if rng.random_bool(self.rate) {
                *bit = !*bit;
                flipped.push(i);
            }
        }
        if flipped.is_empty() {
            let pos = rng.random_range(0..child.len());
            child[pos] = !child[pos];
            flipped.push(pos);
        }
        Move::new(child, flipped)
    }
}
