//! Guided local search: descent on a penalty-augmented cost.

use std::hash::Hash;

use rand::Rng;
use rustc_hash::FxHashMap;

use super::Improver;
use crate::candidate::{Candidate, Sense};
use crate::error::{Result, SearchError};
use crate::neighborhood::Neighborhood;
use crate::objective::{Objective, Tour};
use crate::space::{tour_edges, Edge};

/// Decomposes a solution into features, each with its cost contribution.
pub trait FeatureCosts<S>: Send + Sync {
    type Feature: Clone + Eq + Hash + Send;

    fn features(&self, solution: &S) -> Vec<(Self::Feature, f64)>;
}

/// Tour features are its edges, weighted by their length.
impl FeatureCosts<Vec<usize>> for Tour {
    type Feature = Edge;

    fn features(&self, perm: &Vec<usize>) -> Vec<(Edge, f64)> {
        tour_edges(perm)
            .map(|edge| {
                let (a, b) = edge.ends();
                (edge, self.distance(a, b))
            })
            .collect()
    }
}

/// Penalty counts per feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Penalties<F: Eq + Hash> {
    counts: FxHashMap<F, u32>,
}

impl<F: Eq + Hash> Default for Penalties<F> {
    fn default() -> Self {
        Self {
            counts: FxHashMap::default(),
        }
    }
}

impl<F: Eq + Hash> Penalties<F> {
    pub fn get(&self, feature: &F) -> u32 {
        self.counts.get(feature).copied().unwrap_or(0)
    }

    /// Number of features with a non-zero penalty.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn total<'a>(&self, features: impl IntoIterator<Item = &'a F>) -> f64
    where
        F: 'a,
    {
        features.into_iter().map(|f| self.get(f) as f64).sum()
    }
}

/// Configuration for [`GuidedDescent`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuidedConfig {
    /// Weight of one penalty unit in the augmented cost.
    pub lambda: f64,
    /// Consecutive non-improving samples before the descent stops.
    pub max_no_improve: usize,
}

impl Default for GuidedConfig {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            max_no_improve: 20,
        }
    }
}

impl GuidedConfig {
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets `lambda = alpha * local_optimum_cost / feature_count`, the usual
    /// scaling to the average feature cost of a local optimum.
    pub fn with_scaled_lambda(
        mut self,
        alpha: f64,
        local_optimum_cost: f64,
        feature_count: usize,
    ) -> Self {
        self.lambda = alpha * local_optimum_cost / feature_count.max(1) as f64;
        self
    }

    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.lambda.is_finite() && self.lambda >= 0.0) {
            return Err(SearchError::parameter(
                "lambda",
                format!("must be non-negative and finite, got {}", self.lambda),
            ));
        }
        if self.max_no_improve == 0 {
            return Err(SearchError::parameter("max_no_improve", "must be positive"));
        }
        Ok(())
    }
}

/// Stochastic descent on `cost + lambda * penalties`, followed by a penalty
/// update on the local optimum it stops at.
///
/// Features of the local optimum with maximal utility
/// `cost / (1 + penalty)` gain one penalty unit, pushing later descents away
/// from them. The returned candidate carries its true cost, which may be
/// worse than `start`'s.
///
/// # Examples
///
/// ```
/// use u_localsearch::improve::{GuidedConfig, GuidedDescent};
/// use u_localsearch::neighborhood::TwoOpt;
/// use u_localsearch::objective::Tour;
///
/// let tour = Tour::berlin52();
/// let config = GuidedConfig::default().with_scaled_lambda(0.3, 12_000.0, tour.len());
/// let guided = GuidedDescent::new(TwoOpt, tour, config).unwrap();
/// assert!((guided.config().lambda - 69.23).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct GuidedDescent<N, F> {
    neighborhood: N,
    features: F,
    config: GuidedConfig,
}

impl<N, F> GuidedDescent<N, F> {
    pub fn new(neighborhood: N, features: F, config: GuidedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            neighborhood,
            features,
            config,
        })
    }

    pub fn config(&self) -> &GuidedConfig {
        &self.config
    }
}

impl<N, F> GuidedDescent<N, F> {
    fn augmented<S>(
        &self,
        candidate: &Candidate<S>,
        penalties: &Penalties<<F as FeatureCosts<S>>::Feature>,
        sense: Sense,
    ) -> f64
    where
        F: FeatureCosts<S>,
    {
        let features = self.features.features(candidate.solution());
        let penalty = self.config.lambda * penalties.total(features.iter().map(|(f, _)| f));
        match sense {
            Sense::Minimize => candidate.cost() + penalty,
            Sense::Maximize => candidate.cost() - penalty,
        }
    }
}

impl<S, N, F> Improver<S> for GuidedDescent<N, F>
where
    N: Neighborhood<S>,
    F: FeatureCosts<S>,
{
    type Memory = Penalties<F::Feature>;

    fn memory(&self) -> Self::Memory {
        Penalties::default()
    }

    fn improve<O, R>(
        &self,
        start: Candidate<S>,
        objective: &O,
        penalties: &mut Self::Memory,
        rng: &mut R,
    ) -> Candidate<S>
    where
        O: Objective<S> + ?Sized,
        R: Rng,
    {
        let sense = objective.sense();
        let mut current_augmented = self.augmented(&start, penalties, sense);
        let mut current = start;
        let mut failures = 0;
        while failures < self.config.max_no_improve {
            let neighbor = self.neighborhood.perturb(current.solution(), rng);
            let candidate = Candidate::evaluate(neighbor, objective);
            let augmented = self.augmented(&candidate, penalties, sense);
            if sense.improves(augmented, current_augmented) {
                current = candidate;
                current_augmented = augmented;
                failures = 0;
            } else {
                failures += 1;
            }
        }

        let utilities: Vec<(F::Feature, f64)> = self
            .features
            .features(current.solution())
            .into_iter()
            .map(|(feature, cost)| {
                let utility = cost / (1.0 + penalties.get(&feature) as f64);
                (feature, utility)
            })
            .collect();
        let max = utilities
            .iter()
            .map(|(_, u)| *u)
            .fold(f64::NEG_INFINITY, f64::max);
        for (feature, utility) in utilities {
            if (utility - max).abs() < 1e-10 {
                *penalties.counts.entry(feature).or_insert(0) += 1;
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
    use crate::neighborhood::TwoOpt;
    use crate::objective::Point;
    use crate::random::create_rng;
    use crate::space::{PermutationSpace, SearchSpace};

    fn rectangle() -> Tour {
        Tour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 1.0),
            Point::new(0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(GuidedConfig::default().validate().is_ok());
        assert!(GuidedConfig::default().with_lambda(-1.0).validate().is_err());
        assert!(GuidedConfig::default().with_lambda(f64::NAN).validate().is_err());
        let config = GuidedConfig::default().with_max_no_improve(0);
        assert!(GuidedDescent::new(TwoOpt, rectangle(), config).is_err());
    }

    #[test]
    fn test_scaled_lambda() {
        let config = GuidedConfig::default().with_scaled_lambda(0.5, 100.0, 10);
        assert_eq!(config.lambda, 5.0);
    }

    #[test]
    fn test_tour_features_are_edges() {
        let features = rectangle().features(&vec![0, 1, 2, 3]);
        assert_eq!(features.len(), 4);
        assert_eq!(features[0], (Edge::new(0, 1), 4.0));
        assert_eq!(features[3], (Edge::new(3, 0), 1.0));
    }

    #[test]
    fn test_longest_edges_are_penalised() {
        let tour = rectangle();
        let guided = GuidedDescent::new(TwoOpt, tour.clone(), GuidedConfig::default()).unwrap();
        let mut penalties = Improver::<Vec<usize>>::memory(&guided);
        let mut rng = create_rng(1);

        // The perimeter tour is optimal; both long sides have top utility.
        let start = Candidate::evaluate(vec![0, 1, 2, 3], &tour);
        let out = guided.improve(start, &tour, &mut penalties, &mut rng);
        assert_eq!(out.cost(), 10.0);
        assert_eq!(penalties.get(&Edge::new(0, 1)), 1);
        assert_eq!(penalties.get(&Edge::new(2, 3)), 1);
        assert_eq!(penalties.get(&Edge::new(1, 2)), 0);
        assert_eq!(penalties.len(), 2);
    }

    #[test]
    fn test_penalties_accumulate_across_calls() {
        let tour = Tour::berlin52().prefix(12).unwrap();
        let space = PermutationSpace::new(12).unwrap();
        let config = GuidedConfig::default().with_lambda(50.0);
        let guided = GuidedDescent::new(TwoOpt, tour.clone(), config).unwrap();
        let mut penalties = Improver::<Vec<usize>>::memory(&guided);
        let mut rng = create_rng(7);

        let mut current = Candidate::evaluate(space.random_solution(&mut rng), &tour);
        let mut total = 0;
        for _ in 0..10 {
            current = guided.improve(current, &tour, &mut penalties, &mut rng);
            assert!(space.is_valid(current.solution()));
            assert!((tour.evaluate(current.solution()) - current.cost()).abs() < 1e-9);
            let now: u32 = penalties.counts.values().sum();
            assert!(now > total, "every call penalises at least one feature");
            total = now;
        }
    }

    #[test]
    fn test_memory_starts_empty() {
        let guided = GuidedDescent::new(TwoOpt, rectangle(), GuidedConfig::default()).unwrap();
        assert!(Improver::<Vec<usize>>::memory(&guided).is_empty());
        assert_eq!(Improver::<Vec<usize>>::min_dimension(&guided), 4);
    }
}
