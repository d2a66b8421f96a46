//! Bounded real-vector space.

use std::hash::Hasher;

use rand::Rng;
use rustc_hash::FxHasher;

use super::SearchSpace;
use crate::error::{Result, SearchError};

/// Closed interval `[min, max]` for one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Uniform draw in `[min, max)`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        self.min + self.width() * rng.random::<f64>()
    }

    fn is_usable(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// Real-valued search space: one [`Bounds`] per dimension.
///
/// # Examples
///
/// ```
/// use u_localsearch::space::{RealSpace, SearchSpace};
///
/// let space = RealSpace::uniform(3, -5.0, 5.0).unwrap();
/// assert_eq!(space.dimension(), 3);
/// assert!(space.is_valid(&vec![0.0, 5.0, -5.0]));
/// assert!(!space.is_valid(&vec![0.0, 5.1, 0.0]));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealSpace {
    bounds: Vec<Bounds>,
}

impl RealSpace {
    /// Builds a space from explicit bounds.
    ///
    /// Fails on an empty list or on any dimension whose bounds are
    /// non-finite or not strictly increasing.
    pub fn new(bounds: Vec<Bounds>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(SearchError::EmptySpace);
        }
        if let Some((dimension, b)) = bounds.iter().enumerate().find(|(_, b)| !b.is_usable()) {
            return Err(SearchError::InvalidBounds {
                dimension,
                min: b.min,
                max: b.max,
            });
        }
        Ok(Self { bounds })
    }

    /// Builds a space with the same bounds in every dimension.
    pub fn uniform(dimension: usize, min: f64, max: f64) -> Result<Self> {
        Self::new(vec![Bounds::new(min, max); dimension])
    }

    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }

    /// Clamps every component into its bounds.
    pub fn clamp(&self, x: &mut [f64]) {
        for (xi, b) in x.iter_mut().zip(&self.bounds) {
            *xi = b.clamp(*xi);
        }
    }
}

impl SearchSpace for RealSpace {
    type Solution = Vec<f64>;

    fn dimension(&self) -> usize {
        self.bounds.len()
    }

    fn random_solution<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.bounds.iter().map(|b| b.sample(rng)).collect()
    }

    fn is_valid(&self, solution: &Vec<f64>) -> bool {
        solution.len() == self.bounds.len()
            && solution
                .iter()
                .zip(&self.bounds)
                .all(|(&x, b)| b.contains(x))
    }

    fn fingerprint(&self, solution: &Vec<f64>) -> u64 {
        let mut hasher = FxHasher::default();
        for x in solution {
            hasher.write_u64(x.to_bits());
        }
        hasher.finish()
    }
}
