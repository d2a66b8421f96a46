//! Acceptance criteria.
//!
//! Acceptance decides whether the search moves from the current solution to
//! a newly evaluated one. The policy is chosen through the
//! [`AcceptancePolicy`] configuration enum; at run time it becomes an
//! [`Acceptor`], a small state machine that owns whatever auxiliary state
//! the policy needs (temperature, tabu memory).
//!
//! | Policy      | Moves to the best pool entry when...                          |
//! |-------------|---------------------------------------------------------------|
//! | `Greedy`    | it is no worse than the current solution                      |
//! | `Annealing` | it is no worse, or with probability `exp(-Δ / T)`             |
//! | `Tabu`      | it is the best non-tabu entry, or tabu but a new global best  |
//! | `Elitist`   | always (the global best is kept separately)                   |
//!
//! Non-finite costs are rejections under every policy.

mod annealing;
mod elitist;
mod tabu;

pub use annealing::{Annealing, AnnealingConfig, CoolingSchedule};
pub use elitist::{select_survivors, ElitistConfig};
pub use tabu::{ReactiveConfig, TabuAcceptor, TabuConfig, TabuList};

use std::hash::Hash;

use rand::Rng;

use crate::candidate::Sense;
use crate::error::Result;

/// Acceptance policy configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcceptancePolicy {
    /// Accept iff no worse than the current solution.
    #[default]
    Greedy,
    /// Metropolis criterion with a cooling temperature.
    Annealing(AnnealingConfig),
    /// Tabu-filtered best-admissible move with aspiration.
    Tabu(TabuConfig),
    /// Always move to the best candidate (best-per-niche in population mode).
    Elitist(ElitistConfig),
}

impl AcceptancePolicy {
    pub fn validate(&self) -> Result<()> {
        match self {
            AcceptancePolicy::Annealing(config) => config.validate(),
            AcceptancePolicy::Tabu(config) => config.validate(),
            AcceptancePolicy::Greedy | AcceptancePolicy::Elitist(_) => Ok(()),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AcceptancePolicy::Greedy => "greedy",
            AcceptancePolicy::Annealing(_) => "annealing",
            AcceptancePolicy::Tabu(c) if c.reactive.is_some() => "reactive-tabu",
            AcceptancePolicy::Tabu(_) => "tabu",
            AcceptancePolicy::Elitist(_) => "elitist",
        }
    }
}

/// One evaluated proposal as seen by the acceptor.
#[derive(Debug, Clone, Copy)]
pub struct PoolEntry<'a, A> {
    pub cost: f64,
    pub attributes: &'a [A],
}

/// Everything an acceptor may look at for one decision.
#[derive(Debug, Clone, Copy)]
pub struct Decision<'a, A> {
    /// Proposals ordered best-first, non-finite costs last.
    pub pool: &'a [PoolEntry<'a, A>],
    pub current_cost: f64,
    pub best_cost: f64,
    pub sense: Sense,
    pub iteration: usize,
}

/// Outcome of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Move to the pool entry at this index.
    Accept(usize),
    /// Keep the current solution.
    Reject,
}

/// Runtime state of an acceptance policy.
#[derive(Debug, Clone)]
pub enum Acceptor<A> {
    Greedy,
    Annealing(Annealing),
    Tabu(TabuAcceptor<A>),
    Elitist,
}

impl<A: Clone + Eq + Hash> Acceptor<A> {
    /// Builds the state machine for a validated policy.
    ///
    /// `dimension` is the problem size (used by reactive tabu search) and
    /// `budget` the iteration budget (used by linear cooling).
    pub fn new(policy: &AcceptancePolicy, dimension: usize, budget: usize) -> Self {
        match policy {
            AcceptancePolicy::Greedy => Acceptor::Greedy,
            AcceptancePolicy::Annealing(config) => {
                Acceptor::Annealing(Annealing::new(config.clone(), budget))
            }
            AcceptancePolicy::Tabu(config) => {
                Acceptor::Tabu(TabuAcceptor::new(config.clone(), dimension))
            }
            AcceptancePolicy::Elitist(_) => Acceptor::Elitist,
        }
    }

    /// Decides whether to move, and to which pool entry.
    pub fn decide<R: Rng>(&mut self, decision: &Decision<'_, A>, rng: &mut R) -> Verdict {
        match self {
            Acceptor::Greedy => {
                match decision.pool.first() {
                    Some(entry) if decision.sense.no_worse(entry.cost, decision.current_cost) => {
                        Verdict::Accept(0)
                    }
                    _ => Verdict::Reject,
                }
            }
            Acceptor::Annealing(state) => state.decide(decision, rng),
            Acceptor::Tabu(state) => state.decide(decision),
            Acceptor::Elitist => match decision.pool.first() {
                Some(entry) if entry.cost.is_finite() => Verdict::Accept(0),
                _ => Verdict::Reject,
            },
        }
    }

    /// Whether [`observe_current`](Acceptor::observe_current) needs real fingerprints.
    pub fn needs_fingerprint(&self) -> bool {
        matches!(self, Acceptor::Tabu(state) if state.is_reactive())
    }

    /// Reports the solution the search is standing on at the start of an
    /// iteration.
    pub fn observe_current(&mut self, fingerprint: u64, iteration: usize) {
        if let Acceptor::Tabu(state) = self {
            state.observe(fingerprint, iteration);
        }
    }

    /// Records an accepted move.
    pub fn after_move(&mut self, attributes: &[A], iteration: usize) {
        if let Acceptor::Tabu(state) = self {
            state.record(attributes, iteration);
        }
    }

    /// Advances per-iteration state (cooling, tabu expiry).
    pub fn end_iteration(&mut self, iteration: usize) {
        match self {
            Acceptor::Annealing(state) => state.cool(),
            Acceptor::Tabu(state) => state.expire(iteration),
            Acceptor::Greedy | Acceptor::Elitist => {}
        }
    }

    /// Current temperature, for annealing.
    pub fn temperature(&self) -> Option<f64> {
        match self {
            Acceptor::Annealing(state) => Some(state.temperature()),
            _ => None,
        }
    }

    /// Current tabu tenure, for tabu search.
    pub fn tenure(&self) -> Option<usize> {
        match self {
            Acceptor::Tabu(state) => Some(state.tenure()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn entries(costs: &[f64]) -> Vec<PoolEntry<'static, u32>> {
        costs
            .iter()
            .map(|&cost| PoolEntry {
                cost,
                attributes: &[],
            })
            .collect()
    }

    fn decision<'a>(pool: &'a [PoolEntry<'a, u32>], current: f64, sense: Sense) -> Decision<'a, u32> {
        Decision {
            pool,
            current_cost: current,
            best_cost: current,
            sense,
            iteration: 0,
        }
    }

    #[test]
    fn test_greedy_accepts_equal_and_better() {
        let mut rng = create_rng(0);
        let mut acc: Acceptor<u32> = Acceptor::new(&AcceptancePolicy::Greedy, 10, 100);

        let pool = entries(&[5.0]);
        assert_eq!(acc.decide(&decision(&pool, 5.0, Sense::Minimize), &mut rng), Verdict::Accept(0));
        assert_eq!(acc.decide(&decision(&pool, 4.0, Sense::Minimize), &mut rng), Verdict::Reject);
        assert_eq!(acc.decide(&decision(&pool, 6.0, Sense::Maximize), &mut rng), Verdict::Reject);
        assert_eq!(acc.decide(&decision(&pool, 4.0, Sense::Maximize), &mut rng), Verdict::Accept(0));
    }

    #[test]
    fn test_non_finite_is_rejected_by_every_policy() {
        let mut rng = create_rng(0);
        let pool = entries(&[f64::NAN]);
        let policies = [
            AcceptancePolicy::Greedy,
            AcceptancePolicy::Annealing(AnnealingConfig::default()),
            AcceptancePolicy::Tabu(TabuConfig::default()),
            AcceptancePolicy::Elitist(ElitistConfig::default()),
        ];
        for policy in &policies {
            let mut acc: Acceptor<u32> = Acceptor::new(policy, 10, 100);
            let verdict = acc.decide(&decision(&pool, f64::INFINITY, Sense::Minimize), &mut rng);
            assert_eq!(verdict, Verdict::Reject, "{} accepted NaN", policy.name());
        }
    }

    #[test]
    fn test_elitist_always_moves() {
        let mut rng = create_rng(0);
        let mut acc: Acceptor<u32> =
            Acceptor::new(&AcceptancePolicy::Elitist(ElitistConfig::default()), 10, 100);
        let pool = entries(&[100.0, 200.0]);
        assert_eq!(acc.decide(&decision(&pool, 1.0, Sense::Minimize), &mut rng), Verdict::Accept(0));
    }

    #[test]
    fn test_empty_pool_rejects() {
        let mut rng = create_rng(0);
        let mut acc: Acceptor<u32> = Acceptor::new(&AcceptancePolicy::Greedy, 10, 100);
        assert_eq!(acc.decide(&decision(&[], 1.0, Sense::Minimize), &mut rng), Verdict::Reject);
    }

    #[test]
    fn test_policy_names() {
        let reactive = TabuConfig::default().with_reactive(ReactiveConfig::default());
        assert_eq!(AcceptancePolicy::Tabu(reactive).name(), "reactive-tabu");
        assert_eq!(AcceptancePolicy::default().name(), "greedy");
    }

    #[test]
    fn test_auxiliary_state_accessors() {
        let acc: Acceptor<u32> =
            Acceptor::new(&AcceptancePolicy::Annealing(AnnealingConfig::default()), 10, 100);
        assert!(acc.temperature().is_some());
        assert!(acc.tenure().is_none());
        assert!(!acc.needs_fingerprint());

        let acc: Acceptor<u32> = Acceptor::new(
            &AcceptancePolicy::Tabu(TabuConfig::default().with_reactive(ReactiveConfig::default())),
            10,
            100,
        );
        assert!(acc.needs_fingerprint());
        assert!(acc.tenure().is_some());
    }
}
