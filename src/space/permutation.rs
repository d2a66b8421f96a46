//! Permutation space read as closed tours.

use std::hash::Hasher;

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHasher;

use super::SearchSpace;
use crate::error::{Result, SearchError};

/// Undirected edge between two elements, stored with the smaller end first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge(usize, usize);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    pub fn ends(&self) -> (usize, usize) {
        (self.0, self.1)
    }
}

/// Edges of the closed tour described by `perm`, including the edge from
/// the last element back to the first.
pub fn tour_edges(perm: &[usize]) -> impl Iterator<Item = Edge> + '_ {
    let n = perm.len();
    (0..n).map(move |i| Edge::new(perm[i], perm[(i + 1) % n]))
}

/// Permutations of `0..n`.
///
/// # Examples
///
/// ```
/// use u_localsearch::space::{PermutationSpace, SearchSpace};
///
/// let space = PermutationSpace::new(5).unwrap();
/// assert!(space.is_valid(&vec![4, 2, 0, 1, 3]));
/// assert!(!space.is_valid(&vec![4, 2, 0, 0, 3]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermutationSpace {
    size: usize,
}

impl PermutationSpace {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SearchError::EmptySpace);
        }
        Ok(Self { size })
    }
}

impl SearchSpace for PermutationSpace {
    type Solution = Vec<usize>;

    fn dimension(&self) -> usize {
        self.size
    }

    fn random_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..self.size).collect();
        perm.shuffle(rng);
        perm
    }

    fn is_valid(&self, solution: &Vec<usize>) -> bool {
        if solution.len() != self.size {
            return false;
        }
        let mut seen = vec![false; self.size];
        for &v in solution {
            if v >= self.size || seen[v] {
                return false;
            }
            seen[v] = true;
        }
        true
    }

    /// Hash of the sorted undirected edge set, so rotations and reversals
    /// of the same tour share a fingerprint.
    fn fingerprint(&self, solution: &Vec<usize>) -> u64 {
        let mut edges: Vec<Edge> = tour_edges(solution).collect();
        edges.sort_unstable();
        let mut hasher = FxHasher::default();
        for e in edges {
            hasher.write_usize(e.0);
            hasher.write_usize(e.1);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    #[test]
    fn test_edge_is_undirected() {
        assert_eq!(Edge::new(3, 1), Edge::new(1, 3));
        assert_eq!(Edge::new(3, 1).ends(), (1, 3));
    }

    #[test]
    fn test_tour_edges_closes_the_loop() {
        let edges: Vec<Edge> = tour_edges(&[0, 2, 1]).collect();
        assert_eq!(edges, vec![Edge::new(0, 2), Edge::new(2, 1), Edge::new(1, 0)]);
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(PermutationSpace::new(0), Err(SearchError::EmptySpace));
    }

    #[test]
    fn test_validity() {
        let space = PermutationSpace::new(4).unwrap();
        assert!(space.is_valid(&vec![3, 1, 0, 2]));
        assert!(!space.is_valid(&vec![3, 1, 0]));
        assert!(!space.is_valid(&vec![3, 1, 0, 4]));
        assert!(!space.is_valid(&vec![3, 1, 1, 2]));
    }

    #[test]
    fn test_fingerprint_rotation_and_reversal() {
        let space = PermutationSpace::new(5).unwrap();
        let tour = vec![0, 1, 2, 3, 4];
        let rotated = vec![2, 3, 4, 0, 1];
        let reversed = vec![4, 3, 2, 1, 0];
        let other = vec![0, 2, 1, 3, 4];

        assert_eq!(space.fingerprint(&tour), space.fingerprint(&rotated));
        assert_eq!(space.fingerprint(&tour), space.fingerprint(&reversed));
        assert_ne!(space.fingerprint(&tour), space.fingerprint(&other));
    }

    #[test]
    fn test_random_solution_is_seeded_and_shuffled() {
        let space = PermutationSpace::new(50).unwrap();
        let a = space.random_solution(&mut create_rng(42));
        let b = space.random_solution(&mut create_rng(42));
        assert_eq!(a, b);
        assert_ne!(a, (0..50).collect::<Vec<_>>());

        // Every element must be able to land in the last slot.
        let small = PermutationSpace::new(4).unwrap();
        let mut rng = create_rng(1);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[small.random_solution(&mut rng)[3]] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    proptest! {
        #[test]
        fn prop_random_solution_is_permutation(seed in any::<u64>(), n in 1usize..64) {
            let space = PermutationSpace::new(n).unwrap();
            let mut rng = create_rng(seed);
            prop_assert!(space.is_valid(&space.random_solution(&mut rng)));
        }
    }
}
