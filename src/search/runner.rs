//! Search execution loop.
//!
//! [`SearchRunner`] drives one search to completion:
//!
//! 1. Construct an initial solution (population), improve it, and make it
//!    both current and best. Non-finite initial draws are retried.
//! 2. Each iteration:
//!    a. Trajectory mode: propose `candidates_per_iteration` neighbors of
//!       the current solution (plus one larger step under step control),
//!       improve and evaluate them, order them best-first and let the
//!       acceptor pick one (or none).
//!    b. Population mode: every member proposes one offspring; survivors
//!       are selected elitist-style.
//!    c. Update the best solution on strict improvement, advance the
//!       acceptor state, report the iteration to the observer.
//! 3. Stop on budget, optimum, stagnation or cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use super::config::SearchConfig;
use super::observer::{IterationRecord, SearchObserver, Summary};
use super::problem::SearchProblem;
use super::step::StepSize;
use crate::acceptance::{
    select_survivors, AcceptancePolicy, Acceptor, Decision, PoolEntry, Verdict,
};
use crate::candidate::{Candidate, Sense};
use crate::construct::Construction;
use crate::error::{Result, SearchError};
use crate::improve::Improver;
use crate::neighborhood::Neighborhood;
use crate::objective::Objective;
use crate::random::{create_rng, fresh_seed, SearchRng};
use crate::space::SearchSpace;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The iteration budget was used up.
    MaxIterations,
    /// The best cost reached the objective's published optimum.
    OptimumReached,
    /// `max_no_improve` iterations passed without a new best.
    Stagnation,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of a search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<S> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Iteration at which the best solution was found (0 = initial).
    pub best_iteration: usize,

    /// Number of accepted moves (population mode: offspring that survived).
    pub accepted_moves: usize,

    /// Number of accepted moves that strictly improved on their origin.
    pub improving_moves: usize,

    /// Proposals discarded because their cost was not finite.
    pub rejected_non_finite: usize,

    /// Why the search stopped.
    pub stop_reason: StopReason,

    /// Seed the run used; rerunning with it reproduces the result.
    pub seed: u64,

    /// Best cost before the first iteration and after every iteration.
    pub cost_history: Vec<f64>,
}

/// Executes a search.
///
/// # Usage
///
/// ```
/// use u_localsearch::neighborhood::BitFlip;
/// use u_localsearch::objective::OneMax;
/// use u_localsearch::search::{NoopObserver, SearchConfig, SearchProblem, SearchRunner};
/// use u_localsearch::space::BitSpace;
///
/// let problem = SearchProblem::new(BitSpace::new(64).unwrap(), OneMax::new(64), BitFlip).unwrap();
/// let config = SearchConfig::hill_climbing(1000).with_seed(42);
/// let result = SearchRunner::run(&problem, &config, NoopObserver).unwrap();
/// assert_eq!(result.best_cost, 64.0);
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs the search.
    ///
    /// Fails only if the configuration is invalid, or asks for step control
    /// over a neighborhood without a step size; nothing can fail once the
    /// first iteration starts.
    pub fn run<Sp, O, N, I, C, Ob>(
        problem: &SearchProblem<Sp, O, N, I, C>,
        config: &SearchConfig,
        observer: Ob,
    ) -> Result<SearchResult<Sp::Solution>>
    where
        Sp: SearchSpace,
        O: Objective<Sp::Solution>,
        N: Neighborhood<Sp::Solution>,
        I: Improver<Sp::Solution>,
        C: Construction<Sp>,
        Ob: SearchObserver,
    {
        Self::run_with_cancel(problem, config, observer, None)
    }

    /// Runs the search with an optional cancellation token, checked once
    /// per iteration.
    pub fn run_with_cancel<Sp, O, N, I, C, Ob>(
        problem: &SearchProblem<Sp, O, N, I, C>,
        config: &SearchConfig,
        mut observer: Ob,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult<Sp::Solution>>
    where
        Sp: SearchSpace,
        O: Objective<Sp::Solution>,
        N: Neighborhood<Sp::Solution>,
        I: Improver<Sp::Solution>,
        C: Construction<Sp>,
        Ob: SearchObserver,
    {
        config.validate()?;
        if config.step_control.is_some() && problem.neighborhood().step_size().is_none() {
            return Err(SearchError::parameter(
                "step_control",
                "the neighborhood has no adaptable step size",
            ));
        }

        let seed = config.seed.unwrap_or_else(fresh_seed);
        let mut rng = create_rng(seed);
        debug!(
            policy = config.acceptance.name(),
            seed,
            dimension = problem.space().dimension(),
            max_iterations = config.max_iterations,
            population_size = config.population_size,
            "search started"
        );

        let mut run = Run {
            problem,
            config,
            sense: problem.objective().sense(),
            optimum: problem.objective().optimum(),
            cancel: cancel.as_deref(),
            observer: &mut observer,
            rng: &mut rng,
        };
        let (progress, iterations, stop_reason) = if config.is_population() {
            run.population()
        } else {
            run.trajectory()
        };

        let result = progress.into_result(iterations, stop_reason, seed);
        observer.on_finish(&Summary {
            best: &result.best,
            best_cost: result.best_cost,
            iterations,
            stop_reason,
        });
        debug!(
            best_cost = result.best_cost,
            iterations,
            best_iteration = result.best_iteration,
            accepted_moves = result.accepted_moves,
            stop_reason = ?stop_reason,
            "search finished"
        );
        Ok(result)
    }
}

/// Best-so-far bookkeeping shared by both modes.
struct Progress<S> {
    best: Candidate<S>,
    best_iteration: usize,
    accepted_moves: usize,
    improving_moves: usize,
    rejected_non_finite: usize,
    cost_history: Vec<f64>,
}

impl<S: Clone> Progress<S> {
    fn new(initial: &Candidate<S>) -> Self {
        Self {
            best: initial.clone(),
            best_iteration: 0,
            accepted_moves: 0,
            improving_moves: 0,
            rejected_non_finite: 0,
            cost_history: vec![initial.cost()],
        }
    }

    /// Replaces the best on strict improvement.
    fn offer(&mut self, candidate: &Candidate<S>, iteration: usize, sense: Sense) {
        if sense.improves(candidate.cost(), self.best.cost()) {
            self.best = candidate.clone();
            self.best_iteration = iteration;
            trace!(iteration, best_cost = candidate.cost(), "new best");
        }
    }

    fn early_stop(
        &self,
        config: &SearchConfig,
        optimum: Option<f64>,
        sense: Sense,
        iteration: usize,
    ) -> Option<StopReason> {
        if config.stop_at_optimum {
            if let Some(optimum) = optimum {
                if sense.no_worse(self.best.cost(), optimum) {
                    return Some(StopReason::OptimumReached);
                }
            }
        }
        if config.max_no_improve > 0 && iteration - self.best_iteration >= config.max_no_improve {
            return Some(StopReason::Stagnation);
        }
        None
    }

    fn into_result(self, iterations: usize, stop_reason: StopReason, seed: u64) -> SearchResult<S> {
        let (best, best_cost) = self.best.into_parts();
        SearchResult {
            best,
            best_cost,
            iterations,
            best_iteration: self.best_iteration,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            rejected_non_finite: self.rejected_non_finite,
            stop_reason,
            seed,
            cost_history: self.cost_history,
        }
    }
}

type Finished<S> = (Progress<S>, usize, StopReason);

/// An improved proposal, its move attributes and the step it was made with.
type Proposal<S, A> = (Candidate<S>, Vec<A>, Option<f64>);

/// Initial constructions tried before a non-finite one is kept.
const INITIAL_DRAWS: usize = 100;

/// Borrowed state of one run.
struct Run<'a, Sp, O, N, I, C, Ob> {
    problem: &'a SearchProblem<Sp, O, N, I, C>,
    config: &'a SearchConfig,
    sense: Sense,
    optimum: Option<f64>,
    cancel: Option<&'a AtomicBool>,
    observer: &'a mut Ob,
    rng: &'a mut SearchRng,
}

impl<Sp, O, N, I, C, Ob> Run<'_, Sp, O, N, I, C, Ob>
where
    Sp: SearchSpace,
    O: Objective<Sp::Solution>,
    N: Neighborhood<Sp::Solution>,
    I: Improver<Sp::Solution>,
    C: Construction<Sp>,
    Ob: SearchObserver,
{
    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Constructed initial solution, improved. Returns how many non-finite
    /// draws were discarded on the way; after `INITIAL_DRAWS` attempts the
    /// last draw is kept whatever its cost.
    fn initial(&mut self, memory: &mut I::Memory) -> (Candidate<Sp::Solution>, usize) {
        let problem = self.problem;
        let objective = problem.objective();
        let mut discarded = 0;
        loop {
            let solution = problem.construction().construct(problem.space(), self.rng);
            let candidate = Candidate::evaluate(solution, objective);
            let candidate = problem.improver().improve(candidate, objective, memory, self.rng);
            if candidate.is_finite() || discarded + 1 >= INITIAL_DRAWS {
                return (candidate, discarded);
            }
            discarded += 1;
        }
    }

    /// Improved proposal from `origin`, made with `step` when given.
    fn propose(
        &mut self,
        origin: &Sp::Solution,
        step: Option<f64>,
        memory: &mut I::Memory,
    ) -> Proposal<Sp::Solution, N::Attribute> {
        let problem = self.problem;
        let objective = problem.objective();
        let neighborhood = problem.neighborhood();
        let mv = match step {
            Some(step) => neighborhood.propose_with_step(origin, step, self.rng),
            None => neighborhood.propose(origin, self.rng),
        };
        let candidate = Candidate::evaluate(mv.solution, objective);
        let candidate = problem.improver().improve(candidate, objective, memory, self.rng);
        (candidate, mv.attributes, step)
    }

    fn trajectory(&mut self) -> Finished<Sp::Solution> {
        let config = self.config;
        let sense = self.sense;
        let problem = self.problem;
        let space = problem.space();
        let mut acceptor: Acceptor<N::Attribute> =
            Acceptor::new(&config.acceptance, space.dimension(), config.max_iterations);
        let mut step_size = config
            .step_control
            .zip(problem.neighborhood().step_size())
            .map(|(control, initial)| StepSize::new(control, initial));
        let mut memory = problem.improver().memory();

        let (mut current, discarded) = self.initial(&mut memory);
        let mut progress = Progress::new(&current);
        progress.rejected_non_finite += discarded;
        self.observer.on_start(current.cost());
        if let Some(reason) = progress.early_stop(config, self.optimum, sense, 0) {
            return (progress, 0, reason);
        }

        for iteration in 1..=config.max_iterations {
            if self.cancelled() {
                return (progress, iteration - 1, StopReason::Cancelled);
            }
            if acceptor.needs_fingerprint() {
                acceptor.observe_current(space.fingerprint(current.solution()), iteration);
            }

            // The large step goes first so that it wins ties after the stable sort.
            let mut pool = Vec::with_capacity(config.candidates_per_iteration + 1);
            if let Some(step) = &step_size {
                let large = step.large_step(iteration);
                pool.push(self.propose(current.solution(), Some(large), &mut memory));
            }
            let regular = step_size.as_ref().map(StepSize::current);
            for _ in 0..config.candidates_per_iteration {
                pool.push(self.propose(current.solution(), regular, &mut memory));
            }
            pool.sort_by(|a, b| sense.compare(a.0.cost(), b.0.cost()));
            progress.rejected_non_finite += pool.iter().filter(|p| !p.0.is_finite()).count();

            let verdict = {
                let entries: Vec<PoolEntry<'_, N::Attribute>> = pool
                    .iter()
                    .map(|(candidate, attributes, _)| PoolEntry {
                        cost: candidate.cost(),
                        attributes,
                    })
                    .collect();
                let decision = Decision {
                    pool: &entries,
                    current_cost: current.cost(),
                    best_cost: progress.best.cost(),
                    sense,
                    iteration,
                };
                acceptor.decide(&decision, self.rng)
            };

            let accepted = match verdict {
                Verdict::Accept(index) => {
                    let (candidate, attributes, used) = pool.swap_remove(index);
                    if let (Some(step), Some(used)) = (step_size.as_mut(), used) {
                        step.accepted(used);
                    }
                    acceptor.after_move(&attributes, iteration);
                    progress.accepted_moves += 1;
                    if sense.improves(candidate.cost(), current.cost()) {
                        progress.improving_moves += 1;
                    }
                    current = candidate;
                    progress.offer(&current, iteration, sense);
                    true
                }
                Verdict::Reject => {
                    if let Some(step) = step_size.as_mut() {
                        step.rejected();
                    }
                    false
                }
            };
            acceptor.end_iteration(iteration);

            progress.cost_history.push(progress.best.cost());
            self.observer.on_iteration(&IterationRecord {
                iteration,
                current_cost: current.cost(),
                best_cost: progress.best.cost(),
                accepted,
                temperature: acceptor.temperature(),
                tenure: acceptor.tenure(),
                step_size: step_size.as_ref().map(StepSize::current),
            });

            if let Some(reason) = progress.early_stop(config, self.optimum, sense, iteration) {
                return (progress, iteration, reason);
            }
        }
        (progress, config.max_iterations, StopReason::MaxIterations)
    }

    fn population(&mut self) -> Finished<Sp::Solution> {
        let config = self.config;
        let sense = self.sense;
        let size = config.population_size;
        let niching = match &config.acceptance {
            AcceptancePolicy::Elitist(elitist) => elitist.niching,
            _ => false,
        };

        let mut memory = self.problem.improver().memory();

        let mut discarded = 0;
        let mut population = Vec::with_capacity(size);
        for _ in 0..size {
            let (member, rejected) = self.initial(&mut memory);
            discarded += rejected;
            population.push(member);
        }
        population.sort_by(|a, b| sense.compare(a.cost(), b.cost()));
        let mut progress = Progress::new(&population[0]);
        progress.rejected_non_finite += discarded;
        self.observer.on_start(population[0].cost());
        if let Some(reason) = progress.early_stop(config, self.optimum, sense, 0) {
            return (progress, 0, reason);
        }

        for iteration in 1..=config.max_iterations {
            if self.cancelled() {
                return (progress, iteration - 1, StopReason::Cancelled);
            }

            let offspring: Vec<_> = population
                .iter()
                .map(|parent| self.propose(parent.solution(), None, &mut memory).0)
                .collect();

            let finite = offspring.iter().filter(|c| c.is_finite()).count();
            progress.rejected_non_finite += size - finite;
            progress.improving_moves += population
                .iter()
                .zip(&offspring)
                .filter(|(parent, child)| sense.improves(child.cost(), parent.cost()))
                .count();
            progress.accepted_moves += if niching {
                population
                    .iter()
                    .zip(&offspring)
                    .filter(|(parent, child)| sense.no_worse(child.cost(), parent.cost()))
                    .count()
            } else {
                finite.min(size - config.elite_count)
            };
            for child in &offspring {
                progress.offer(child, iteration, sense);
            }

            population = select_survivors(population, offspring, config.elite_count, sense, niching);
            let leader = population
                .iter()
                .map(Candidate::cost)
                .min_by(|a, b| sense.compare(*a, *b))
                .unwrap_or_else(|| sense.worst());

            progress.cost_history.push(progress.best.cost());
            self.observer.on_iteration(&IterationRecord {
                iteration,
                current_cost: leader,
                best_cost: progress.best.cost(),
                accepted: finite > 0,
                temperature: None,
                tenure: None,
                step_size: None,
            });

            if let Some(reason) = progress.early_stop(config, self.optimum, sense, iteration) {
                return (progress, iteration, reason);
            }
        }
        (progress, config.max_iterations, StopReason::MaxIterations)
    }
}
