//! Neighborhood and perturbation operators.
//!
//! A [`Neighborhood`] produces a new solution from an existing one. Every
//! operator guarantees that its output differs from the input and stays
//! valid for its domain (bijection for permutations, fixed length for bit
//! strings, within bounds for real vectors). Operators hold no hidden state
//! between calls; everything they need lives in the operator value or is
//! passed in.
//!
//! Each proposal carries the *attributes* that identify the move (e.g. the
//! edges broken by a 2-opt reversal), which tabu memory records and checks.
//!
//! # Operators
//!
//! | Domain       | Operator            | Attributes             |
//! |--------------|---------------------|------------------------|
//! | permutation  | [`TwoOpt`]          | 2 broken edges         |
//! | permutation  | [`DoubleBridge`]    | 4 broken edges         |
//! | bit string   | [`BitFlip`]         | flipped index          |
//! | bit string   | [`PointMutation`]   | flipped indices        |
//! | real vector  | [`BoundedStep`]     | none                   |
//! | real vector  | [`UniformSample`]   | none                   |

mod bits;
mod permutation;
mod real;

pub use bits::{BitFlip, PointMutation};
pub use permutation::{DoubleBridge, TwoOpt};
pub use real::{BoundedStep, UniformSample};

use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;

/// A proposed move: the resulting solution and the attributes identifying it.
#[derive(Debug, Clone, PartialEq)]
pub struct Move<S, A> {
    /// Solution after applying the move.
    pub solution: S,
    /// Move attributes for tabu tracking. May be empty.
    pub attributes: Vec<A>,
}

impl<S, A> Move<S, A> {
    pub fn new(solution: S, attributes: Vec<A>) -> Self {
        Self {
            solution,
            attributes,
        }
    }
}

/// Produces neighbors of a solution.
pub trait Neighborhood<S>: Send + Sync {
    /// Identifies a move for tabu memory.
    type Attribute: Clone + Eq + Hash + Debug + Send + Sync;

    /// Generates a neighbor together with its move attributes.
    fn propose<R: Rng>(&self, solution: &S, rng: &mut R) -> Move<S, Self::Attribute>;

    /// Generates a neighbor, discarding the move attributes.
    fn perturb<R: Rng>(&self, solution: &S, rng: &mut R) -> S {
        self.propose(solution, rng).solution
    }

    /// Smallest problem size for which the operator is well defined.
    fn min_dimension(&self) -> usize {
        1
    }

    /// Problem size the operator was built for, if it is fixed.
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Initial step size, for operators whose move length can be adapted.
    fn step_size(&self) -> Option<f64> {
        None
    }

    /// Generates a neighbor using `step` instead of the configured step size.
    ///
    /// Operators without a step size ignore `step`.
    fn propose_with_step<R: Rng>(
        &self,
        solution: &S,
        step: f64,
        rng: &mut R,
    ) -> Move<S, Self::Attribute> {
        let _ = step;
        self.propose(solution, rng)
    }
}
