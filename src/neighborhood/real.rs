//! Real-vector operators.

use rand::Rng;

use super::{Move, Neighborhood};
use crate::error::{Result, SearchError};
use crate::space::{Bounds, RealSpace};

/// Uniform step inside a box around the current point.
///
/// Each component is drawn from `[x_i - step, x_i + step]` intersected with
/// its bounds, so the result is always within the space.
///
/// # References
///
/// Schumer & Steiglitz (1968), "Adaptive Step Size Random Search"
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedStep {
    bounds: Vec<Bounds>,
    step_size: f64,
}

impl BoundedStep {
    /// `step_size` must be positive and finite.
    pub fn new(space: &RealSpace, step_size: f64) -> Result<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(SearchError::parameter(
                "step_size",
                format!("must be positive, got {step_size}"),
            ));
        }
        Ok(Self {
            bounds: space.bounds().to_vec(),
            step_size,
        })
    }

    /// Step size as a fraction of the first dimension's width.
    pub fn relative(space: &RealSpace, factor: f64) -> Result<Self> {
        let width = space.bounds()[0].width();
        Self::new(space, width * factor)
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }
}

impl BoundedStep {
    fn step_from<R: Rng>(&self, x: &[f64], step: f64, rng: &mut R) -> Vec<f64> {
        for _ in 0..MAX_DRAWS {
            let child: Vec<f64> = x
                .iter()
                .zip(&self.bounds)
                .map(|(&xi, b)| {
                    let xi = b.clamp(xi);
                    let lo = b.min.max(xi - step);
                    let hi = b.max.min(xi + step);
                    Bounds::new(lo, hi).sample(rng)
                })
                .collect();
            if child.as_slice() != x {
                return child;
            }
        }
        nudge(x, &self.bounds, rng)
    }
}

impl Neighborhood<Vec<f64>> for BoundedStep {
    type Attribute = ();

    fn propose<R: Rng>(&self, x: &Vec<f64>, rng: &mut R) -> Move<Vec<f64>, ()> {
        Move::new(self.step_from(x, self.step_size, rng), Vec::new())
    }

    fn propose_with_step<R: Rng>(
        &self,
        x: &Vec<f64>,
        step: f64,
        rng: &mut R,
    ) -> Move<Vec<f64>, ()> {
        Move::new(self.step_from(x, step, rng), Vec::new())
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.bounds.len())
    }

    fn step_size(&self) -> Option<f64> {
        Some(self.step_size)
    }
}

/// Independent uniform draw over the whole space (pure random search).
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSample {
    bounds: Vec<Bounds>,
}

impl UniformSample {
    pub fn new(space: &RealSpace) -> Self {
        Self {
            bounds: space.bounds().to_vec(),
        }
    }
}

impl Neighborhood<Vec<f64>> for UniformSample {
    type Attribute = ();

    fn propose<R: Rng>(&self, x: &Vec<f64>, rng: &mut R) -> Move<Vec<f64>, ()> {
        for _ in 0..MAX_DRAWS {
            let child: Vec<f64> = self.bounds.iter().map(|b| b.sample(rng)).collect();
            if &child != x {
                return Move::new(child, Vec::new());
            }
        }
        Move::new(nudge(x, &self.bounds, rng), Vec::new())
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.bounds.len())
    }
}

/// Redraws before falling back to [`nudge`].
const MAX_DRAWS: usize = 32;

/// Moves one random coordinate of `x` to the adjacent representable value
/// inside its bounds.
///
/// Used when a step is too small to change any coordinate at its float
/// spacing (e.g. step 1.0 around 1e19).
fn nudge<R: Rng>(x: &[f64], bounds: &[Bounds], rng: &mut R) -> Vec<f64> {
    let mut child: Vec<f64> = x.iter().zip(bounds).map(|(&xi, b)| b.clamp(xi)).collect();
    if child.is_empty() {
        return child;
    }
    let i = rng.random_range(0..child.len());
    let b = bounds[i];
    let xi = child[i];
    let target = if (xi < b.max && rng.random_bool(0.5)) || xi <= b.min {
        b.max
    } else {
        b.min
    };
    child[i] = adjacent(xi, target);
    child
}

/// The representable value next to `x` in the direction of `target`.
fn adjacent(x: f64, target: f64) -> f64 {
    if x == target || x.is_nan() {
        return x;
    }
    if x == 0.0 {
        let tiny = f64::from_bits(1);
        return if target > 0.0 { tiny } else { -tiny };
    }
    let bits = x.to_bits();
    let away_from_zero = (target > x) == (x > 0.0);
    f64::from_bits(if away_from_zero { bits + 1 } else { bits - 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::space::SearchSpace;
    use proptest::prelude::*;

    #[test]
    fn test_step_size_validation() {
        let space = RealSpace::uniform(2, -1.0, 1.0).unwrap();
        assert!(BoundedStep::new(&space, 0.0).is_err());
        assert!(BoundedStep::new(&space, -0.1).is_err());
        assert!(BoundedStep::new(&space, f64::INFINITY).is_err());
        assert!((BoundedStep::relative(&space, 0.05).unwrap().step_size() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_step_stays_local() {
        let space = RealSpace::uniform(3, -5.0, 5.0).unwrap();
        let op = BoundedStep::new(&space, 0.5).unwrap();
        let mut rng = create_rng(42);
        let x = vec![1.0, -2.0, 3.0];
        for _ in 0..100 {
            let child = op.perturb(&x, &mut rng);
            for (a, b) in child.iter().zip(&x) {
                assert!((a - b).abs() <= 0.5 + 1e-12);
            }
        }
    }

    #[test]
    fn test_step_at_the_boundary() {
        let space = RealSpace::uniform(1, 0.0, 1.0).unwrap();
        let op = BoundedStep::new(&space, 2.0).unwrap();
        let mut rng = create_rng(0);
        let x = vec![1.0];
        for _ in 0..50 {
            assert!(space.is_valid(&op.perturb(&x, &mut rng)));
        }
    }

    #[test]
    fn test_step_below_float_spacing_still_moves() {
        let space = RealSpace::uniform(1, -1e20, 1e20).unwrap();
        let op = BoundedStep::new(&space, 1.0).unwrap();
        let mut rng = create_rng(0);
        let x = vec![1e19];
        for _ in 0..20 {
            let child = op.perturb(&x, &mut rng);
            assert_ne!(child, x);
            assert!(space.is_valid(&child));
            assert!((child[0] - x[0]).abs() <= 1e19 * f64::EPSILON * 2.0);
        }
    }

    #[test]
    fn test_tiny_step_at_the_upper_bound() {
        let space = RealSpace::uniform(2, 0.0, 1.0).unwrap();
        let op = BoundedStep::new(&space, 1e-300).unwrap();
        let mut rng = create_rng(3);
        let x = vec![1.0, 1.0];
        for _ in 0..20 {
            let child = op.perturb(&x, &mut rng);
            assert_ne!(child, x);
            assert!(space.is_valid(&child));
        }
    }

    #[test]
    fn test_adjacent_values() {
        assert_eq!(adjacent(1.0, 2.0), 1.0 + f64::EPSILON);
        assert!(adjacent(1.0, 0.0) < 1.0);
        assert!(adjacent(-1.0, 0.0) > -1.0);
        assert!(adjacent(-1.0, -2.0) < -1.0);
        assert_eq!(adjacent(0.0, 1.0), f64::from_bits(1));
        assert_eq!(adjacent(0.0, -1.0), -f64::from_bits(1));
        assert_eq!(adjacent(3.0, 3.0), 3.0);
    }

    #[test]
    fn test_operators_report_dimension() {
        let space = RealSpace::uniform(3, -1.0, 1.0).unwrap();
        let step = BoundedStep::new(&space, 0.1).unwrap();
        assert_eq!(Neighborhood::<Vec<f64>>::dimension(&step), Some(3));
        assert_eq!(Neighborhood::<Vec<f64>>::step_size(&step), Some(0.1));
        assert_eq!(UniformSample::new(&space).dimension(), Some(3));
    }

    #[test]
    fn test_explicit_step_overrides_configured() {
        let space = RealSpace::uniform(2, -10.0, 10.0).unwrap();
        let op = BoundedStep::new(&space, 0.01).unwrap();
        let mut rng = create_rng(8);
        let x = vec![0.0, 0.0];
        let mut widest: f64 = 0.0;
        for _ in 0..200 {
            let child = op.propose_with_step(&x, 2.0, &mut rng).solution;
            for v in &child {
                assert!(v.abs() <= 2.0);
                widest = widest.max(v.abs());
            }
        }
        assert!(widest > 0.5, "step 2.0 was not used: widest move {widest}");
    }

    proptest! {
        #[test]
        fn prop_step_within_bounds(seed in any::<u64>(), step in 0.01f64..20.0) {
            let space = RealSpace::uniform(4, -5.0, 5.0).unwrap();
            let op = BoundedStep::new(&space, step).unwrap();
            let mut rng = create_rng(seed);
            let x = space.random_solution(&mut rng);
            let child = op.perturb(&x, &mut rng);
            prop_assert!(space.is_valid(&child));
            prop_assert_ne!(child, x);
        }

        #[test]
        fn prop_uniform_sample_within_bounds(seed in any::<u64>()) {
            let space = RealSpace::uniform(3, -5.0, 5.0).unwrap();
            let op = UniformSample::new(&space);
            let mut rng = create_rng(seed);
            let x = space.random_solution(&mut rng);
            prop_assert!(space.is_valid(&op.perturb(&x, &mut rng)));
        }
    }
}
