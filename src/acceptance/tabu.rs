//! Tabu memory and tabu-filtered acceptance.
//!
//! Each accepted move forbids its attributes (for a 2-opt move, the two
//! edges it broke) for `tenure` iterations. A candidate is tabu if any of
//! its attributes is forbidden. The acceptor moves to the best admissible
//! candidate even when it is worse than the current one; a tabu candidate
//! becomes admissible only if it would set a new global best (aspiration).
//!
//! The reactive variant adapts the tenure from the search trajectory:
//! revisiting a solution within a short window lengthens the tenure, a
//! stretch without revisits shortens it.
//!
//! # References
//!
//! - Glover (1989), "Tabu Search - Part I"
//! - Battiti & Tecchiolli (1994), "The Reactive Tabu Search"

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use super::{Decision, Verdict};
use crate::error::{Result, SearchError};

/// Configuration for tabu acceptance.
///
/// # Examples
///
/// ```
/// use u_localsearch::acceptance::{ReactiveConfig, TabuConfig};
///
/// let config = TabuConfig::default()
///     .with_tabu_tenure(7)
///     .with_aspiration(true)
///     .with_reactive(ReactiveConfig::default());
/// assert_eq!(config.tabu_tenure, 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// How many iterations an attribute stays forbidden. For the reactive
    /// variant this is the starting tenure.
    pub tabu_tenure: usize,
    /// Whether to use aspiration criterion (override tabu if the move
    /// produces a new global best).
    pub aspiration: bool,
    /// Maximum number of remembered attributes; the oldest is evicted
    /// first. `0` means bounded only by expiry.
    pub capacity: usize,
    /// Adaptive tenure. `None` keeps the tenure fixed.
    pub reactive: Option<ReactiveConfig>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            tabu_tenure: 7,
            aspiration: true,
            capacity: 0,
            reactive: None,
        }
    }
}

impl TabuConfig {
    /// Sets the tabu tenure (number of iterations a move remains tabu).
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Enables or disables aspiration criterion.
    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    /// Bounds the number of remembered attributes.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Switches to the reactive variant.
    pub fn with_reactive(mut self, reactive: ReactiveConfig) -> Self {
        self.reactive = Some(reactive);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tabu_tenure == 0 {
            return Err(SearchError::parameter("tabu_tenure", "must be positive"));
        }
        if let Some(reactive) = &self.reactive {
            reactive.validate()?;
        }
        Ok(())
    }
}

/// Tenure adaptation for reactive tabu search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactiveConfig {
    /// Tenure multiplier applied on a revisit. Must exceed 1.
    pub increase: f64,
    /// Tenure multiplier applied after a quiet stretch. Must lie in (0, 1).
    pub decrease: f64,
    /// A revisit counts as a cycle only if it happens within this many
    /// iterations. `None` uses `2 * (dimension - 1)`.
    pub cycle_window: Option<usize>,
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            increase: 1.3,
            decrease: 0.9,
            cycle_window: None,
        }
    }
}

impl ReactiveConfig {
    pub fn with_increase(mut self, factor: f64) -> Self {
        self.increase = factor;
        self
    }

    pub fn with_decrease(mut self, factor: f64) -> Self {
        self.decrease = factor;
        self
    }

    pub fn with_cycle_window(mut self, window: usize) -> Self {
        self.cycle_window = Some(window);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.increase > 1.0 && self.increase.is_finite()) {
            return Err(SearchError::parameter(
                "reactive.increase",
                format!("must be greater than 1, got {}", self.increase),
            ));
        }
        if !(self.decrease > 0.0 && self.decrease < 1.0) {
            return Err(SearchError::parameter(
                "reactive.decrease",
                format!("must be in (0, 1), got {}", self.decrease),
            ));
        }
        if self.cycle_window == Some(0) {
            return Err(SearchError::parameter(
                "reactive.cycle_window",
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Short-term memory of forbidden move attributes.
///
/// Each entry records the iteration at which the attribute becomes
/// admissible again. Lookups ignore expired entries, so purging can be
/// deferred.
#[derive(Debug, Clone)]
pub struct TabuList<A> {
    admissible_at: FxHashMap<A, usize>,
    order: VecDeque<A>,
    capacity: usize,
}

impl<A: Clone + Eq + Hash> TabuList<A> {
    /// `capacity == 0` disables the size bound.
    pub fn new(capacity: usize) -> Self {
        Self {
            admissible_at: FxHashMap::default(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Forbids `attribute` during iterations `iteration + 1 ..= iteration + tenure`.
    pub fn forbid(&mut self, attribute: A, iteration: usize, tenure: usize) {
        let until = iteration + tenure + 1;
        if self.admissible_at.insert(attribute.clone(), until).is_none() {
            self.order.push_back(attribute);
        }
        if self.capacity > 0 {
            while self.admissible_at.len() > self.capacity {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.admissible_at.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
    }

    pub fn is_tabu(&self, attribute: &A, iteration: usize) -> bool {
        self.admissible_at
            .get(attribute)
            .is_some_and(|&until| iteration < until)
    }

    /// Drops every entry that is admissible at `iteration`.
    pub fn expire(&mut self, iteration: usize) {
        self.admissible_at.retain(|_, until| *until > iteration);
        let live = &self.admissible_at;
        self.order.retain(|a| live.contains_key(a));
    }

    pub fn len(&self) -> usize {
        self.admissible_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admissible_at.is_empty()
    }

    pub fn clear(&mut self) {
        self.admissible_at.clear();
        self.order.clear();
    }
}

/// Tenure controller for the reactive variant.
#[derive(Debug, Clone)]
struct Reaction {
    config: ReactiveConfig,
    period: f64,
    max_period: f64,
    window: usize,
    avg_interval: f64,
    last_change: usize,
    last_fingerprint: Option<u64>,
    visits: FxHashMap<u64, usize>,
}

impl Reaction {
    fn new(config: ReactiveConfig, initial: usize, dimension: usize) -> Self {
        let max_period = dimension.saturating_sub(2).max(1) as f64;
        let window = config
            .cycle_window
            .unwrap_or(2 * dimension.saturating_sub(1))
            .max(1);
        Self {
            config,
            period: (initial as f64).min(max_period),
            max_period,
            window,
            avg_interval: 1.0,
            last_change: 0,
            last_fingerprint: None,
            visits: FxHashMap::default(),
        }
    }

    fn tenure(&self) -> usize {
        (self.period.round() as usize).max(1)
    }

    fn observe(&mut self, fingerprint: u64, iteration: usize) {
        // Standing still after a rejected iteration is not a revisit.
        if self.last_fingerprint == Some(fingerprint) {
            return;
        }
        self.last_fingerprint = Some(fingerprint);

        if let Some(previous) = self.visits.insert(fingerprint, iteration) {
            let interval = iteration - previous;
            if interval < self.window {
                self.avg_interval = 0.1 * interval as f64 + 0.9 * self.avg_interval;
                self.period = (self.period * self.config.increase).min(self.max_period);
                self.last_change = iteration;
            }
        }
        // Visits older than the window can no longer count as cycles.
        if iteration % self.window == 0 {
            let window = self.window;
            self.visits.retain(|_, seen| iteration - *seen < window);
        }
        if (iteration - self.last_change) as f64 > self.avg_interval {
            self.period = (self.period * self.config.decrease).max(1.0);
            self.last_change = iteration;
        }
    }

    fn escape(&mut self, iteration: usize) {
        self.period = self.max_period;
        self.last_change = iteration;
    }
}

/// Runtime state of tabu acceptance.
#[derive(Debug, Clone)]
pub struct TabuAcceptor<A> {
    config: TabuConfig,
    list: TabuList<A>,
    reaction: Option<Reaction>,
}

impl<A: Clone + Eq + Hash> TabuAcceptor<A> {
    /// `dimension` bounds the reactive tenure.
    pub fn new(config: TabuConfig, dimension: usize) -> Self {
        let reaction = config
            .reactive
            .clone()
            .map(|r| Reaction::new(r, config.tabu_tenure, dimension));
        Self {
            list: TabuList::new(config.capacity),
            config,
            reaction,
        }
    }

    pub fn is_reactive(&self) -> bool {
        self.reaction.is_some()
    }

    /// Tenure applied to the next recorded move.
    pub fn tenure(&self) -> usize {
        match &self.reaction {
            Some(reaction) => reaction.tenure(),
            None => self.config.tabu_tenure,
        }
    }

    pub fn list(&self) -> &TabuList<A> {
        &self.list
    }

    /// Picks the best admissible pool entry. Rejects when nothing is
    /// admissible.
    pub(crate) fn decide(&mut self, decision: &Decision<'_, A>) -> Verdict {
        let iteration = decision.iteration;
        let mut chosen = None;
        let mut non_tabu = 0usize;

        for (index, entry) in decision.pool.iter().enumerate() {
            if !entry.cost.is_finite() {
                continue;
            }
            let tabu = entry
                .attributes
                .iter()
                .any(|a| self.list.is_tabu(a, iteration));
            let admissible = if tabu {
                self.config.aspiration && decision.sense.improves(entry.cost, decision.best_cost)
            } else {
                non_tabu += 1;
                true
            };
            if admissible && chosen.is_none() {
                chosen = Some(index);
            }
        }

        if non_tabu < 2 {
            if let Some(reaction) = &mut self.reaction {
                reaction.escape(iteration);
            }
        }

        match chosen {
            Some(index) => Verdict::Accept(index),
            None => Verdict::Reject,
        }
    }

    pub(crate) fn observe(&mut self, fingerprint: u64, iteration: usize) {
        if let Some(reaction) = &mut self.reaction {
            reaction.observe(fingerprint, iteration);
        }
    }

    /// Forbids the attributes of an accepted move.
    pub(crate) fn record(&mut self, attributes: &[A], iteration: usize) {
        let tenure = self.tenure();
        for attribute in attributes {
            self.list.forbid(attribute.clone(), iteration, tenure);
        }
    }

    pub(crate) fn expire(&mut self, iteration: usize) {
        self.list.expire(iteration + 1);
    }
}
