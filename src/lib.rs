//! Generalized stochastic local-search engine.
//!
//! Simulated annealing, tabu search, iterated local search, GRASP, guided
//! local search, hill climbing, adaptive random search and simple elitist
//! evolution share one loop: perturb, evaluate, accept or reject, keep the
//! best. This crate implements that loop once and makes each concern
//! pluggable:
//!
//! - **Representation** ([`space`]): real vectors, permutations, bit strings.
//! - **Objective** ([`objective`]): scalar cost with a fixed optimization
//!   sense; benchmark functions, tour length, one-max.
//! - **Neighborhood** ([`neighborhood`]): 2-opt, double-bridge, bit flips,
//!   bounded steps.
//! - **Acceptance** ([`acceptance`]): greedy, annealed, tabu-filtered with
//!   aspiration, elitist.
//! - **Construction** ([`construct`]): uniform or greedy randomized initial
//!   solutions.
//! - **Improvement** ([`improve`]): optional local descent applied to every
//!   proposal, plain or penalty-guided.
//! - **Driver** ([`search`]): the loop itself, termination, observers.
//!
//! Runs are reproducible: all randomness flows from one seeded generator.
//! Non-finite objective values are treated as rejections, never as errors.
//!
//! # Example
//!
//! ```
//! use u_localsearch::neighborhood::TwoOpt;
//! use u_localsearch::objective::Tour;
//! use u_localsearch::search::{NoopObserver, SearchConfig, SearchProblem, SearchRunner};
//! use u_localsearch::space::{PermutationSpace, SearchSpace};
//!
//! let tour = Tour::berlin52();
//! let space = PermutationSpace::new(tour.len()).unwrap();
//! let problem = SearchProblem::new(space, tour, TwoOpt).unwrap();
//!
//! let config = SearchConfig::simulated_annealing(2000, 1e5, 0.98).with_seed(42);
//! let result = SearchRunner::run(&problem, &config, NoopObserver).unwrap();
//! assert!(problem.space().is_valid(&result.best));
//! assert!(result.best_cost < result.cost_history[0]);
//! ```

pub mod acceptance;
pub mod candidate;
pub mod construct;
pub mod error;
pub mod improve;
pub mod neighborhood;
pub mod objective;
pub mod random;
pub mod search;
pub mod space;

pub use error::{Result, SearchError};
