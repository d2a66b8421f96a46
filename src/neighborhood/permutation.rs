//! Tour operators over permutations.
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems" (2-opt)
//! - Martin, Otto & Felten (1991), "Large-Step Markov Chains for the
//!   Traveling Salesman Problem" (double-bridge)

use rand::Rng;

use super::{Move, Neighborhood};
use crate::space::Edge;

/// Stochastic 2-opt: reverse the tour segment between two cut points.
///
/// The second cut point is drawn excluding the first and both of its
/// circular neighbours, so the reversed segment always holds at least two
/// cities and the move always changes the tour. Requires at least 4 cities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoOpt;

impl TwoOpt {
    /// Reverses `perm[lo..hi]` and reports the two edges broken by the move.
    ///
    /// # Panics
    /// Panics unless `lo + 2 <= hi < perm.len()`.
    pub fn apply(perm: &[usize], lo: usize, hi: usize) -> Move<Vec<usize>, Edge> {
        let n = perm.len();
        assert!(lo + 2 <= hi && hi < n, "invalid 2-opt cut points ({lo}, {hi}) for n = {n}");

        let broken = vec![
            Edge::new(perm[(lo + n - 1) % n], perm[lo]),
            Edge::new(perm[hi - 1], perm[hi]),
        ];
        let mut child = perm.to_vec();
        child[lo..hi].reverse();
        Move::new(child, broken)
    }
}

impl Neighborhood<Vec<usize>> for TwoOpt {
    type Attribute = Edge;

    fn propose<R: Rng>(&self, perm: &Vec<usize>, rng: &mut R) -> Move<Vec<usize>, Edge> {
        let n = perm.len();
        assert!(n >= 4, "2-opt needs at least 4 cities, got {n}");

        let c1 = rng.random_range(0..n);
        let prev = (c1 + n - 1) % n;
        let next = (c1 + 1) % n;
        let mut c2 = rng.random_range(0..n);
        while c2 == c1 || c2 == prev || c2 == next {
            c2 = rng.random_range(0..n);
        }

        let (lo, hi) = if c1 < c2 { (c1, c2) } else { (c2, c1) };
        Self::apply(perm, lo, hi)
    }

    fn min_dimension(&self) -> usize {
        4
    }
}

/// Double-bridge kick: split the tour into `A B C D` and reconnect it as
/// `A D C B`.
///
/// A 4-opt move that 2-opt descent cannot easily undo, used as the
/// perturbation step of iterated local search. Requires at least 8 cities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleBridge;

impl Neighborhood<Vec<usize>> for DoubleBridge {
    type Attribute = Edge;

    fn propose<R: Rng>(&self, perm: &Vec<usize>, rng: &mut R) -> Move<Vec<usize>, Edge> {
        let n = perm.len();
        assert!(n >= 8, "double-bridge needs at least 8 cities, got {n}");

        let quarter = n / 4;
        let pos1 = 1 + rng.random_range(0..quarter);
        let pos2 = pos1 + 1 + rng.random_range(0..quarter);
        let pos3 = pos2 + 1 + rng.random_range(0..quarter);

        let mut child = Vec::with_capacity(n);
        child.extend_from_slice(&perm[..pos1]);
        child.extend_from_slice(&perm[pos3..]);
        child.extend_from_slice(&perm[pos2..pos3]);
        child.extend_from_slice(&perm[pos1..pos2]);

        let broken = vec![
            Edge::new(perm[pos1 - 1], perm[pos1]),
            Edge::new(perm[pos2 - 1], perm[pos2]),
            Edge::new(perm[pos3 - 1], perm[pos3]),
            Edge::new(perm[n - 1], perm[0]),
        ];
        Move::new(child, broken)
    }

    fn min_dimension(&self) -> usize {
        8
    }
}
