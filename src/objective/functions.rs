//! Real-valued benchmark functions.

use std::f64::consts::{E, PI};

use super::Objective;

/// Fixed menu of continuous test functions. All are minimized and have a
/// global minimum of 0.
///
/// # References
///
/// - Ackley (1987), *A Connectionist Machine for Genetic Hillclimbing*
/// - Rastrigin (1974), *Systems of Extremal Control*
/// - Rosenbrock (1960), "An Automatic Method for Finding the Greatest or
///   Least Value of a Function"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestFunction {
    /// `f(x) = Σ x_i²`, minimum at the origin.
    #[default]
    Sphere,
    /// Ackley's function, minimum at the origin.
    Ackley,
    /// `f(x) = 10n + Σ (x_i² - 10 cos(2π x_i))`, minimum at the origin.
    Rastrigin,
    /// `f(x) = Σ 100 (x_{i+1} - x_i²)² + (1 - x_i)²`, minimum at `(1, ..., 1)`.
    Rosenbrock,
}

impl TestFunction {
    pub fn value(&self, x: &[f64]) -> f64 {
        match self {
            TestFunction::Sphere => x.iter().map(|v| v * v).sum(),
            TestFunction::Ackley => ackley(x),
            TestFunction::Rastrigin => {
                10.0 * x.len() as f64
                    + x.iter()
                        .map(|v| v * v - 10.0 * (2.0 * PI * v).cos())
                        .sum::<f64>()
            }
            TestFunction::Rosenbrock => x
                .windows(2)
                .map(|w| {
                    let a = w[1] - w[0] * w[0];
                    let b = 1.0 - w[0];
                    100.0 * a * a + b * b
                })
                .sum(),
        }
    }
}

fn ackley(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    let squares: f64 = x.iter().map(|v| v * v).sum();
    let cosines: f64 = x.iter().map(|v| (2.0 * PI * v).cos()).sum();
    -20.0 * (-0.2 * (squares / n).sqrt()).exp() - (cosines / n).exp() + 20.0 + E
}

impl Objective<Vec<f64>> for TestFunction {
    fn evaluate(&self, solution: &Vec<f64>) -> f64 {
        self.value(solution)
    }

    fn optimum(&self) -> Option<f64> {
        Some(0.0)
    }
}
