//! Objective functions.
//!
//! An [`Objective`] maps a solution to a scalar. Evaluation must be pure:
//! the same solution always yields the same value. Each objective fixes its
//! own [`Sense`]; the engine never negates costs behind the caller's back.
//!
//! Provided objectives:
//!
//! - [`TestFunction`]: real-valued benchmark menu (sphere, Ackley, ...)
//! - [`Tour`]: closed-tour Euclidean length over 2-D cities
//! - [`OneMax`]: number of set bits

mod functions;
mod onemax;
mod tour;

pub use functions::TestFunction;
pub use onemax::OneMax;
pub use tour::{Point, Tour};

use crate::candidate::Sense;

/// Scalar evaluation of a solution.
pub trait Objective<S: ?Sized>: Send + Sync {
    /// Computes the cost (or fitness, depending on [`sense`](Objective::sense)).
    fn evaluate(&self, solution: &S) -> f64;

    /// Optimization direction. Defaults to minimization.
    fn sense(&self) -> Sense {
        Sense::Minimize
    }

    /// Known optimal value, if any. Enables optimum early-exit.
    fn optimum(&self) -> Option<f64> {
        None
    }

    /// Problem size the objective was built for, if it is fixed.
    fn dimension(&self) -> Option<usize> {
        None
    }
}
