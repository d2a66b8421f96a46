//! Search driver configuration.

use crate::acceptance::{
    AcceptancePolicy, AnnealingConfig, CoolingSchedule, ElitistConfig, ReactiveConfig, TabuConfig,
};
use super::step::StepControl;
use crate::error::{Result, SearchError};

/// Configuration parameters for the search driver.
///
/// # Examples
///
/// ```
/// use u_localsearch::search::SearchConfig;
///
/// let config = SearchConfig::simulated_annealing(2000, 1e5, 0.98)
///     .with_seed(42)
///     .with_stop_at_optimum(true);
/// assert_eq!(config.max_iterations, 2000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Iteration budget. Must be positive.
    pub max_iterations: usize,

    /// Proposals generated from the current solution per iteration
    /// (candidate list size). Ignored in population mode.
    pub candidates_per_iteration: usize,

    /// Number of solutions carried between iterations. Values above 1
    /// switch to population mode, which requires the elitist policy.
    pub population_size: usize,

    /// Parents guaranteed to survive each generation (population mode).
    pub elite_count: usize,

    /// How proposals are accepted.
    pub acceptance: AcceptancePolicy,

    /// Stop as soon as the objective's published optimum is reached.
    pub stop_at_optimum: bool,

    /// Stop after this many iterations without a new best. `0` disables.
    pub max_no_improve: usize,

    /// Adapt the neighborhood's step size during the run. Adds one larger
    /// step to every pool; needs a neighborhood with a step size.
    pub step_control: Option<StepControl>,

    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            candidates_per_iteration: 1,
            population_size: 1,
            elite_count: 0,
            acceptance: AcceptancePolicy::Greedy,
            stop_at_optimum: false,
            max_no_improve: 0,
            step_control: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Sample, keep the best. Pair with
    /// [`UniformSample`](crate::neighborhood::UniformSample).
    pub fn random_search(max_iterations: usize) -> Self {
        Self::default().with_max_iterations(max_iterations)
    }

    /// Random search with an adapted step size. Pair with
    /// [`BoundedStep`](crate::neighborhood::BoundedStep).
    pub fn adaptive_random_search(max_iterations: usize) -> Self {
        Self::default()
            .with_max_iterations(max_iterations)
            .with_step_control(StepControl::default())
    }

    /// Greedy single-neighbor climbing with optimum early-exit.
    pub fn hill_climbing(max_iterations: usize) -> Self {
        Self::default()
            .with_max_iterations(max_iterations)
            .with_stop_at_optimum(true)
    }

    /// Metropolis acceptance with geometric cooling.
    pub fn simulated_annealing(max_iterations: usize, initial_temperature: f64, alpha: f64) -> Self {
        Self::default()
            .with_max_iterations(max_iterations)
            .with_acceptance(AcceptancePolicy::Annealing(
                AnnealingConfig::default()
                    .with_initial_temperature(initial_temperature)
                    .with_cooling(CoolingSchedule::Geometric { alpha }),
            ))
    }

    /// Best admissible of `candidates` proposals, fixed tenure.
    pub fn tabu_search(max_iterations: usize, tabu_tenure: usize, candidates: usize) -> Self {
        Self::default()
            .with_max_iterations(max_iterations)
            .with_candidates_per_iteration(candidates)
            .with_acceptance(AcceptancePolicy::Tabu(
                TabuConfig::default().with_tabu_tenure(tabu_tenure),
            ))
    }

    /// Tabu search whose tenure starts at 1 and adapts to revisits.
    pub fn reactive_tabu_search(max_iterations: usize, candidates: usize) -> Self {
        Self::default()
            .with_max_iterations(max_iterations)
            .with_candidates_per_iteration(candidates)
            .with_acceptance(AcceptancePolicy::Tabu(
                TabuConfig::default()
                    .with_tabu_tenure(1)
                    .with_reactive(ReactiveConfig::default()),
            ))
    }

    /// Kick, descend, keep if no worse. The problem needs an improver
    /// attached (see [`SearchProblem::with_improver`](super::SearchProblem::with_improver)).
    pub fn iterated_local_search(max_iterations: usize) -> Self {
        Self::default().with_max_iterations(max_iterations)
    }

    /// Construct, descend, keep the best. Use
    /// [`GreedyRandomizedTour`](crate::construct::GreedyRandomizedTour) as
    /// both construction and neighborhood, with a descent improver.
    pub fn grasp(max_iterations: usize) -> Self {
        Self::default().with_max_iterations(max_iterations)
    }

    /// Always continue from the last penalised local optimum. The problem
    /// needs a [`GuidedDescent`](crate::improve::GuidedDescent) improver.
    pub fn guided_local_search(max_iterations: usize) -> Self {
        Self::default()
            .with_max_iterations(max_iterations)
            .with_acceptance(AcceptancePolicy::Elitist(ElitistConfig::default()))
    }

    /// Population of `population_size` with `elite_count` elites.
    pub fn evolution(max_iterations: usize, population_size: usize, elite_count: usize) -> Self {
        Self::default()
            .with_max_iterations(max_iterations)
            .with_population(population_size, elite_count)
            .with_acceptance(AcceptancePolicy::Elitist(ElitistConfig::default()))
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_candidates_per_iteration(mut self, n: usize) -> Self {
        self.candidates_per_iteration = n;
        self
    }

    pub fn with_population(mut self, population_size: usize, elite_count: usize) -> Self {
        self.population_size = population_size;
        self.elite_count = elite_count;
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_stop_at_optimum(mut self, stop: bool) -> Self {
        self.stop_at_optimum = stop;
        self
    }

    /// Sets maximum iterations without improvement.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn with_step_control(mut self, control: StepControl) -> Self {
        self.step_control = Some(control);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn is_population(&self) -> bool {
        self.population_size > 1
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(SearchError::InvalidIterations);
        }
        if self.candidates_per_iteration == 0 {
            return Err(SearchError::parameter(
                "candidates_per_iteration",
                "must be positive",
            ));
        }
        if self.population_size == 0 {
            return Err(SearchError::parameter("population_size", "must be positive"));
        }
        if self.is_population() {
            if !matches!(self.acceptance, AcceptancePolicy::Elitist(_)) {
                return Err(SearchError::parameter(
                    "acceptance",
                    format!(
                        "population mode requires the elitist policy, got {}",
                        self.acceptance.name()
                    ),
                ));
            }
            if self.elite_count >= self.population_size {
                return Err(SearchError::parameter(
                    "elite_count",
                    format!(
                        "must be less than population_size ({}), got {}",
                        self.population_size, self.elite_count
                    ),
                ));
            }
        }
        if let Some(control) = &self.step_control {
            if self.is_population() {
                return Err(SearchError::parameter(
                    "step_control",
                    "not available in population mode",
                ));
            }
            control.validate()?;
        }
        self.acceptance.validate()
    }
}
