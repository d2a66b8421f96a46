//! Population replacement for elitist acceptance.

use crate::candidate::{Candidate, Sense};

/// Configuration for population-mode survivor selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElitistConfig {
    /// Per-lineage replacement: each offspring competes only with its own
    /// parent. When `false`, the best `elite_count` parents survive and the
    /// remaining slots go to the offspring.
    pub niching: bool,
}

impl ElitistConfig {
    pub fn with_niching(mut self, niching: bool) -> Self {
        self.niching = niching;
        self
    }
}

/// Builds the next population from `parents` and their `offspring`.
///
/// `offspring[i]` must descend from `parents[i]`. The result has as many
/// members as `parents`.
///
/// Without niching the `elite_count` best parents are carried over, then
/// finite offspring fill the free slots best-first, then the remaining
/// parents, then non-finite offspring. With niching each offspring replaces
/// its parent iff it is no worse.
pub fn select_survivors<S>(
    parents: Vec<Candidate<S>>,
    offspring: Vec<Candidate<S>>,
    elite_count: usize,
    sense: Sense,
    niching: bool,
) -> Vec<Candidate<S>> {
    debug_assert_eq!(parents.len(), offspring.len());

    if niching {
        return parents
            .into_iter()
            .zip(offspring)
            .map(|(parent, child)| {
                if sense.no_worse(child.cost(), parent.cost()) {
                    child
                } else {
                    parent
                }
            })
            .collect();
    }

    let size = parents.len();
    let elite_count = elite_count.min(size);

    let mut parents = parents;
    parents.sort_by(|a, b| sense.compare(a.cost(), b.cost()));
    let rest = parents.split_off(elite_count);
    let mut next = parents;

    let (mut finite, mut non_finite): (Vec<_>, Vec<_>) =
        offspring.into_iter().partition(Candidate::is_finite);
    finite.sort_by(|a, b| sense.compare(a.cost(), b.cost()));

    next.extend(finite.drain(..).take(size - next.len()));
    if next.len() < size {
        next.extend(rest.into_iter().take(size - next.len()));
    }
    if next.len() < size {
        next.extend(non_finite.drain(..).take(size - next.len()));
    }
    next
}
