//! One-max bit counting.

use super::Objective;
use crate::candidate::Sense;

/// Counts set bits. Maximized; the optimum is the all-ones string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneMax {
    bits: usize,
}

impl OneMax {
    pub fn new(bits: usize) -> Self {
        Self { bits }
    }
}

impl Objective<Vec<bool>> for OneMax {
    fn evaluate(&self, solution: &Vec<bool>) -> f64 {
        solution.iter().filter(|&&b| b).count() as f64
    }

    fn sense(&self) -> Sense {
        Sense::Maximize
    }

    fn optimum(&self) -> Option<f64> {
        Some(self.bits as f64)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.bits)
    }
}
