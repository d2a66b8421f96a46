//! Solution representations.
//!
//! A [`SearchSpace`] knows how to draw a uniformly random valid solution,
//! how to check validity, and how to fingerprint a solution for revisit
//! detection. Three encodings are provided:
//!
//! - [`RealSpace`]: bounded real vectors
//! - [`PermutationSpace`]: permutations of `0..n` read as closed tours
//! - [`BitSpace`]: fixed-length bit strings
//!
//! Spaces are immutable once built and validated at construction.

mod bits;
mod permutation;
mod real;

pub use bits::BitSpace;
pub use permutation::{tour_edges, Edge, PermutationSpace};
pub use real::{Bounds, RealSpace};

use rand::Rng;

/// Defines the representation of candidate solutions.
pub trait SearchSpace: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send + Sync + std::fmt::Debug;

    /// Number of dimensions (vector length, permutation size, bit count).
    fn dimension(&self) -> usize;

    /// Draws a uniformly random valid solution.
    fn random_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Validity predicate of the domain.
    fn is_valid(&self, solution: &Self::Solution) -> bool;

    /// Hash identifying equivalent solutions.
    ///
    /// Two solutions the domain considers the same (e.g. a tour and its
    /// rotation) must map to the same value.
    fn fingerprint(&self, solution: &Self::Solution) -> u64;
}
