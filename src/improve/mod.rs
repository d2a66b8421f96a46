//! Local improvement applied to every proposal before it is judged.
//!
//! With [`StochasticDescent`] attached, the driver becomes iterated local
//! search: the neighborhood acts as the kick (e.g. a double-bridge) and the
//! improver descends from the kicked tour with a finer operator (e.g. 2-opt).
//!
//! [`GuidedDescent`] descends an augmented cost instead and penalises the
//! features of every local optimum it reaches (guided local search). Its
//! penalties live in the improver's per-run [`Memory`](Improver::Memory),
//! so concurrent runs over one problem never share them.
//!
//! # References
//!
//! - Lourenço, Martin & Stützle (2003), "Iterated Local Search"
//! - Voudouris & Tsang (2003), "Guided Local Search"

mod guided;

pub use guided::{FeatureCosts, GuidedConfig, GuidedDescent, Penalties};

use rand::Rng;

use crate::candidate::Candidate;
use crate::error::{Result, SearchError};
use crate::neighborhood::Neighborhood;
use crate::objective::Objective;

/// Refines an evaluated candidate.
pub trait Improver<S>: Send + Sync {
    /// State carried across calls within one run.
    type Memory: Send;

    /// Fresh memory for a new run.
    fn memory(&self) -> Self::Memory;

    /// Refines `start`.
    fn improve<O, R>(
        &self,
        start: Candidate<S>,
        objective: &O,
        memory: &mut Self::Memory,
        rng: &mut R,
    ) -> Candidate<S>
    where
        O: Objective<S> + ?Sized,
        R: Rng;

    /// Smallest problem size the improver supports.
    fn min_dimension(&self) -> usize {
        1
    }

    /// Problem size the improver was built for, if it is fixed.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Identity improver: proposals are judged as generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoImprovement;

impl<S> Improver<S> for NoImprovement {
    type Memory = ();

    fn memory(&self) {}

    fn improve<O, R>(
        &self,
        start: Candidate<S>,
        _objective: &O,
        _memory: &mut (),
        _rng: &mut R,
    ) -> Candidate<S>
    where
        O: Objective<S> + ?Sized,
        R: Rng,
    {
        start
    }
}

/// Configuration for [`StochasticDescent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalSearchConfig {
    /// Consecutive non-improving samples before the descent stops.
    pub max_no_improve: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self { max_no_improve: 50 }
    }
}

impl LocalSearchConfig {
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_no_improve == 0 {
            return Err(SearchError::parameter("max_no_improve", "must be positive"));
        }
        Ok(())
    }
}

/// Randomized first-improvement descent.
///
/// Samples one neighbor at a time and moves to it only on strict
/// improvement; stops after `max_no_improve` consecutive failures.
#[derive(Debug, Clone)]
pub struct StochasticDescent<N> {
    neighborhood: N,
    config: LocalSearchConfig,
}

impl<N> StochasticDescent<N> {
    pub fn new(neighborhood: N, config: LocalSearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            neighborhood,
            config,
        })
    }

    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }
}

impl<S, N> Improver<S> for StochasticDescent<N>
where
    N: Neighborhood<S>,
{
    type Memory = ();

    fn memory(&self) {}

    /// Returns a candidate no worse than `start`.
    fn improve<O, R>(
        &self,
        start: Candidate<S>,
        objective: &O,
        _memory: &mut (),
        rng: &mut R,
    ) -> Candidate<S>
    where
        O: Objective<S> + ?Sized,
        R: Rng,
    {
        let sense = objective.sense();
        let mut current = start;
        let mut failures = 0;
        while failures < self.config.max_no_improve {
            let neighbor = self.neighborhood.perturb(current.solution(), rng);
            let candidate = Candidate::evaluate(neighbor, objective);
            if sense.improves(candidate.cost(), current.cost()) {
                current = candidate;
                failures = 0;
            } else {
                failures += 1;
            }
        }
        current
    }

    fn min_dimension(&self) -> usize {
        self.neighborhood.min_dimension()
    }

    fn dimension(&self) -> Option<usize> {
        self.neighborhood.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::{BitFlip, BoundedStep, TwoOpt};
    use crate::objective::{OneMax, Tour};
    use crate::random::create_rng;
    use crate::space::{PermutationSpace, RealSpace, SearchSpace};

    #[test]
    fn test_config_validation() {
        assert!(LocalSearchConfig::default().validate().is_ok());
        let config = LocalSearchConfig::default().with_max_no_improve(0);
        assert!(StochasticDescent::new(TwoOpt, config).is_err());
    }

    #[test]
    fn test_no_improvement_is_identity() {
        let objective = OneMax::new(8);
        let mut bits = vec![false; 8];
        bits[0] = true;
        bits[2] = true;
        let start = Candidate::evaluate(bits, &objective);
        let mut rng = create_rng(0);
        let out = NoImprovement.improve(start.clone(), &objective, &mut (), &mut rng);
        assert_eq!(out, start);
    }

    #[test]
    fn test_descent_never_worsens_tour() {
        let tour = Tour::berlin52().prefix(20).unwrap();
        let space = PermutationSpace::new(20).unwrap();
        let descent = StochasticDescent::new(TwoOpt, LocalSearchConfig::default()).unwrap();
        let mut rng = create_rng(42);

        for _ in 0..5 {
            let start = Candidate::evaluate(space.random_solution(&mut rng), &tour);
            let start_cost = start.cost();
            let out = descent.improve(start, &tour, &mut (), &mut rng);
            assert!(out.cost() <= start_cost, "{} > {}", out.cost(), start_cost);
            assert!(space.is_valid(out.solution()));
        }
    }

    #[test]
    fn test_descent_climbs_onemax() {
        let objective = OneMax::new(32);
        let descent = StochasticDescent::new(
            BitFlip,
            LocalSearchConfig::default().with_max_no_improve(500),
        )
        .unwrap();
        let mut rng = create_rng(7);
        let start = Candidate::evaluate(vec![false; 32], &objective);
        let out = descent.improve(start, &objective, &mut (), &mut rng);
        assert_eq!(out.cost(), 32.0, "descent should reach the all-ones string");
    }

    #[test]
    fn test_min_dimension_follows_operator() {
        let descent = StochasticDescent::new(TwoOpt, LocalSearchConfig::default()).unwrap();
        assert_eq!(Improver::<Vec<usize>>::min_dimension(&descent), 4);
    }

    #[test]
    fn test_dimension_follows_operator() {
        let space = RealSpace::uniform(3, -1.0, 1.0).unwrap();
        let step = BoundedStep::new(&space, 0.1).unwrap();
        let descent = StochasticDescent::new(step, LocalSearchConfig::default()).unwrap();
        assert_eq!(Improver::<Vec<f64>>::dimension(&descent), Some(3));
        let descent = StochasticDescent::new(TwoOpt, LocalSearchConfig::default()).unwrap();
        assert_eq!(Improver::<Vec<usize>>::dimension(&descent), None);
    }
}
