//! Greedy randomized tour construction.

use rand::Rng;

use super::Construction;
use crate::error::{Result, SearchError};
use crate::neighborhood::{Move, Neighborhood};
use crate::objective::Tour;
use crate::space::{Edge, PermutationSpace};

/// Nearest-neighbour tour building with a restricted candidate list.
///
/// From a random start city, each step collects the unvisited cities whose
/// distance to the last city is at most `min + alpha * (max - min)` and
/// picks one of them uniformly. `alpha = 0` is pure nearest neighbour (ties
/// broken at random), `alpha = 1` a uniformly random tour.
///
/// As a [`Neighborhood`] it ignores the current tour and builds a fresh one.
///
/// # Examples
///
/// ```
/// use u_localsearch::construct::GreedyRandomizedTour;
/// use u_localsearch::objective::Tour;
/// use u_localsearch::random::create_rng;
/// use u_localsearch::space::{PermutationSpace, SearchSpace};
///
/// let builder = GreedyRandomizedTour::new(Tour::berlin52(), 0.3).unwrap();
/// let perm = builder.build(&mut create_rng(42));
/// assert!(PermutationSpace::new(52).unwrap().is_valid(&perm));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyRandomizedTour {
    tour: Tour,
    alpha: f64,
}

impl GreedyRandomizedTour {
    /// `alpha` must lie in `[0, 1]`.
    pub fn new(tour: Tour, alpha: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(SearchError::parameter(
                "alpha",
                format!("must be in [0, 1], got {alpha}"),
            ));
        }
        Ok(Self { tour, alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn build<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let n = self.tour.len();
        let mut visited = vec![false; n];
        let mut perm = Vec::with_capacity(n);
        let mut last = rng.random_range(0..n);
        visited[last] = true;
        perm.push(last);

        let mut rcl = Vec::with_capacity(n);
        while perm.len() < n {
            let (min, max) = (0..n)
                .filter(|&c| !visited[c])
                .map(|c| self.tour.distance(last, c))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                    (lo.min(d), hi.max(d))
                });
            let threshold = min + self.alpha * (max - min);

            rcl.clear();
            rcl.extend((0..n).filter(|&c| !visited[c] && self.tour.distance(last, c) <= threshold));
            let next = rcl[rng.random_range(0..rcl.len())];
            visited[next] = true;
            perm.push(next);
            last = next;
        }
        perm
    }
}

impl Construction<PermutationSpace> for GreedyRandomizedTour {
    fn construct<R: Rng>(&self, _space: &PermutationSpace, rng: &mut R) -> Vec<usize> {
        self.build(rng)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.tour.len())
    }
}

impl Neighborhood<Vec<usize>> for GreedyRandomizedTour {
    type Attribute = Edge;

    fn propose<R: Rng>(&self, _perm: &Vec<usize>, rng: &mut R) -> Move<Vec<usize>, Edge> {
        Move::new(self.build(rng), Vec::new())
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.tour.len())
    }
}
