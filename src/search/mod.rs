//! The search driver.
//!
//! A [`SearchProblem`] bundles the representation, the objective, the
//! neighborhood and an optional improver. [`SearchRunner`] runs it under a
//! [`SearchConfig`] and reports progress to a [`SearchObserver`].
//!
//! # Algorithm presets
//!
//! | Preset                                       | Neighborhood (typical) | Acceptance |
//! |----------------------------------------------|------------------------|------------|
//! | [`SearchConfig::random_search`]              | `UniformSample`        | greedy     |
//! | [`SearchConfig::adaptive_random_search`]     | `BoundedStep`, adapted | greedy     |
//! | [`SearchConfig::hill_climbing`]              | `BitFlip`              | greedy     |
//! | [`SearchConfig::simulated_annealing`]        | `TwoOpt`, `BoundedStep`| annealing  |
//! | [`SearchConfig::tabu_search`]                | `TwoOpt`               | tabu       |
//! | [`SearchConfig::reactive_tabu_search`]       | `TwoOpt`               | tabu       |
//! | [`SearchConfig::iterated_local_search`]      | `DoubleBridge` + descent | greedy   |
//! | [`SearchConfig::grasp`]                      | `GreedyRandomizedTour` + descent | greedy |
//! | [`SearchConfig::guided_local_search`]        | `TwoOpt` + `GuidedDescent` | elitist |
//! | [`SearchConfig::evolution`]                  | `PointMutation`        | elitist    |
//!
//! # References
//!
//! - Brownlee (2011), "Clever Algorithms: Nature-Inspired Programming Recipes"
//! - Hoos & Stützle (2004), "Stochastic Local Search: Foundations and Applications"

mod batch;
mod config;
mod observer;
mod problem;
mod runner;
mod step;

pub use batch::run_batch;
pub use config::SearchConfig;
pub use observer::{
    IterationRecord, NoopObserver, ProgressWriter, SearchObserver, Summary, TraceRecorder,
    TracingObserver,
};
pub use problem::SearchProblem;
pub use runner::{SearchResult, SearchRunner, StopReason};
pub use step::StepControl;
