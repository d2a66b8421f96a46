//! Evaluated solutions and the optimization direction.

use std::cmp::Ordering;

use crate::objective::Objective;

/// Optimization direction, fixed per objective.
///
/// All comparisons treat non-finite costs (NaN, ±infinity) as maximally bad:
/// a non-finite value never improves on anything, and any finite value
/// improves on a non-finite one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    /// Lower cost is better.
    #[default]
    Minimize,
    /// Higher cost is better (fitness).
    Maximize,
}

impl Sense {
    /// Returns `true` iff `candidate` is strictly better than `incumbent`.
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        if !candidate.is_finite() {
            return false;
        }
        if !incumbent.is_finite() {
            return true;
        }
        match self {
            Sense::Minimize => candidate < incumbent,
            Sense::Maximize => candidate > incumbent,
        }
    }

    /// Returns `true` iff `candidate` is at least as good as `incumbent`.
    pub fn no_worse(self, candidate: f64, incumbent: f64) -> bool {
        if !candidate.is_finite() {
            return false;
        }
        if !incumbent.is_finite() {
            return true;
        }
        match self {
            Sense::Minimize => candidate <= incumbent,
            Sense::Maximize => candidate >= incumbent,
        }
    }

    /// Signed improvement of moving from `from` to `to`. Positive is better.
    pub fn gain(self, from: f64, to: f64) -> f64 {
        match self {
            Sense::Minimize => from - to,
            Sense::Maximize => to - from,
        }
    }

    /// The worst finite-or-infinite value in this direction.
    pub fn worst(self) -> f64 {
        match self {
            Sense::Minimize => f64::INFINITY,
            Sense::Maximize => f64::NEG_INFINITY,
        }
    }

    /// Best-first ordering. Non-finite values sort last.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_finite(), b.is_finite()) {
            (true, true) => match self {
                Sense::Minimize => a.total_cmp(&b),
                Sense::Maximize => b.total_cmp(&a),
            },
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    }
}

/// One solution together with its evaluated cost.
///
/// The fields are private: a candidate can only be created by evaluating a
/// solution, and mutation goes through [`Candidate::modify`], which
/// re-evaluates before returning. A stale cost is therefore unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<S> {
    solution: S,
    cost: f64,
}

impl<S> Candidate<S> {
    /// Evaluates `solution` and wraps it.
    pub fn evaluate<O>(solution: S, objective: &O) -> Self
    where
        O: Objective<S> + ?Sized,
    {
        let cost = objective.evaluate(&solution);
        Self { solution, cost }
    }

    /// Mutates the solution in place and recomputes its cost.
    pub fn modify<O, F>(&mut self, objective: &O, f: F)
    where
        O: Objective<S> + ?Sized,
        F: FnOnce(&mut S),
    {
        f(&mut self.solution);
        self.cost = objective.evaluate(&self.solution);
    }

    pub fn solution(&self) -> &S {
        &self.solution
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether the cost is usable for comparison.
    pub fn is_finite(&self) -> bool {
        self.cost.is_finite()
    }

    pub fn into_solution(self) -> S {
        self.solution
    }

    pub fn into_parts(self) -> (S, f64) {
        (self.solution, self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::TestFunction;

    #[test]
    fn test_sense_minimize() {
        let s = Sense::Minimize;
        assert!(s.improves(1.0, 2.0));
        assert!(!s.improves(2.0, 2.0));
        assert!(s.no_worse(2.0, 2.0));
        assert!(!s.no_worse(3.0, 2.0));
        assert!((s.gain(5.0, 3.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sense_maximize() {
        let s = Sense::Maximize;
        assert!(s.improves(3.0, 2.0));
        assert!(!s.improves(1.0, 2.0));
        assert!(s.no_worse(2.0, 2.0));
        assert!((s.gain(3.0, 5.0) - 2.0).abs() < 1e-12);
        assert_eq!(s.worst(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_non_finite_is_never_better() {
        for s in [Sense::Minimize, Sense::Maximize] {
            assert!(!s.improves(f64::NAN, 1.0));
            assert!(!s.improves(f64::INFINITY, 1.0));
            assert!(!s.improves(f64::NEG_INFINITY, 1.0));
            assert!(!s.no_worse(f64::NAN, f64::NAN));
            assert!(s.improves(1.0, f64::NAN));
        }
    }

    #[test]
    fn test_compare_sorts_non_finite_last() {
        let mut costs = vec![3.0, f64::NAN, 1.0, f64::INFINITY, 2.0];
        costs.sort_by(|a, b| Sense::Minimize.compare(*a, *b));
        assert_eq!(&costs[..3], &[1.0, 2.0, 3.0]);
        assert!(costs[3..].iter().all(|c| !c.is_finite()));

        let mut costs = vec![3.0, f64::NAN, 1.0, 2.0];
        costs.sort_by(|a, b| Sense::Maximize.compare(*a, *b));
        assert_eq!(&costs[..3], &[3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_candidate_modify_recomputes_cost() {
        let f = TestFunction::Sphere;
        let mut c = Candidate::evaluate(vec![1.0, 2.0], &f);
        assert!((c.cost() - 5.0).abs() < 1e-12);

        c.modify(&f, |x| x[1] = 0.0);
        assert!((c.cost() - 1.0).abs() < 1e-12);
        assert_eq!(c.solution(), &vec![1.0, 0.0]);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let f = TestFunction::Ackley;
        let c = Candidate::evaluate(vec![0.3, -1.2, 2.5], &f);
        let again = Candidate::evaluate(c.solution().clone(), &f);
        assert_eq!(c.cost().to_bits(), again.cost().to_bits());
    }
}
