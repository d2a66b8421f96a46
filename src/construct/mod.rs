//! Initial-solution construction.
//!
//! A search starts from whatever its [`Construction`] builds. The default,
//! [`RandomConstruction`], draws uniformly from the space.
//! [`GreedyRandomizedTour`] builds tours from a restricted candidate list;
//! used as both construction and neighborhood, with a descent improver
//! attached, it turns the driver into GRASP.
//!
//! # References
//!
//! Feo & Resende (1995), "Greedy Randomized Adaptive Search Procedures"

mod greedy;

pub use greedy::GreedyRandomizedTour;

use rand::Rng;

use crate::space::SearchSpace;

/// Builds initial solutions.
pub trait Construction<Sp: SearchSpace>: Send + Sync {
    fn construct<R: Rng>(&self, space: &Sp, rng: &mut R) -> Sp::Solution;

    /// Problem size the construction was built for, if it is fixed.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Uniform draw from the space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomConstruction;

impl<Sp: SearchSpace> Construction<Sp> for RandomConstruction {
    fn construct<R: Rng>(&self, space: &Sp, rng: &mut R) -> Sp::Solution {
        space.random_solution(rng)
    }
}
