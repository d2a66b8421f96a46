//! Independent restarts over a list of seeds.

use super::config::SearchConfig;
use super::observer::NoopObserver;
use super::problem::SearchProblem;
use super::runner::{SearchResult, SearchRunner};
use crate::construct::Construction;
use crate::error::Result;
use crate::improve::Improver;
use crate::neighborhood::Neighborhood;
use crate::objective::Objective;
use crate::space::SearchSpace;

/// Runs one search per seed and returns the results in seed order.
///
/// With the `parallel` feature the runs are spread over the rayon thread
/// pool; without it they run one after another. Each run is seeded
/// independently, so both variants produce identical results.
///
/// # Examples
///
/// ```
/// use u_localsearch::neighborhood::UniformSample;
/// use u_localsearch::objective::TestFunction;
/// use u_localsearch::search::{run_batch, SearchConfig, SearchProblem};
/// use u_localsearch::space::RealSpace;
///
/// let space = RealSpace::uniform(2, -5.0, 5.0).unwrap();
/// let sample = UniformSample::new(&space);
/// let problem = SearchProblem::new(space, TestFunction::Sphere, sample).unwrap();
/// let results = run_batch(&problem, &SearchConfig::random_search(50), &[1, 2, 3]).unwrap();
/// assert_eq!(results.len(), 3);
/// assert_eq!(results[1].seed, 2);
/// ```
pub fn run_batch<Sp, O, N, I, C>(
    problem: &SearchProblem<Sp, O, N, I, C>,
    config: &SearchConfig,
    seeds: &[u64],
) -> Result<Vec<SearchResult<Sp::Solution>>>
where
    Sp: SearchSpace,
    O: Objective<Sp::Solution>,
    N: Neighborhood<Sp::Solution>,
    I: Improver<Sp::Solution>,
    C: Construction<Sp>,
{
    config.validate()?;

    let run = |&seed: &u64| {
        let seeded = config.clone().with_seed(seed);
        SearchRunner::run(problem, &seeded, NoopObserver)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        seeds.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(run).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::BitFlip;
    use crate::objective::OneMax;
    use crate::space::BitSpace;

    fn problem() -> SearchProblem<BitSpace, OneMax, BitFlip> {
        SearchProblem::new(BitSpace::new(24).unwrap(), OneMax::new(24), BitFlip).unwrap()
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let problem = problem();
        let config = SearchConfig::hill_climbing(200);
        let seeds = [5, 1, 9, 1];
        let results = run_batch(&problem, &config, &seeds).unwrap();

        assert_eq!(results.len(), seeds.len());
        for (result, &seed) in results.iter().zip(&seeds) {
            assert_eq!(result.seed, seed);
            let single =
                SearchRunner::run(&problem, &config.clone().with_seed(seed), NoopObserver)
                    .unwrap();
            assert_eq!(*result, single);
        }
        assert_eq!(results[1], results[3]);
    }

    #[test]
    fn test_batch_rejects_invalid_config() {
        let config = SearchConfig::default().with_max_iterations(0);
        assert!(run_batch(&problem(), &config, &[1]).is_err());
    }

    #[test]
    fn test_empty_batch() {
        let results = run_batch(&problem(), &SearchConfig::default(), &[]).unwrap();
        assert!(results.is_empty());
    }
}
