//! Metropolis acceptance with a cooling schedule.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

use rand::Rng;

use super::{Decision, Verdict};
use crate::error::{Result, SearchError};

/// Cooling schedule for temperature reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    ///
    /// Most widely used. Typical `alpha`: 0.95–0.99.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling from `T_0` down to `T_min` over the iteration budget.
    Linear,

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// Cools fast at high T, slow at low T.
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (max_iter * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.98 }
    }
}

/// Configuration for annealed acceptance.
///
/// # Examples
///
/// ```
/// use u_localsearch::acceptance::{AnnealingConfig, CoolingSchedule};
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(1e5)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Temperature floor. `0.0` means no floor.
    ///
    /// For [`CoolingSchedule::Linear`] this is the end point.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Iterations spent at each temperature level before cooling.
    ///
    /// For `LundyMees`, this is ignored (1 iteration per temperature).
    pub iterations_per_temperature: usize,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 0.0,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 1,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(SearchError::parameter(
                "initial_temperature",
                format!("must be positive, got {}", self.initial_temperature),
            ));
        }
        if !(self.min_temperature >= 0.0) {
            return Err(SearchError::parameter(
                "min_temperature",
                format!("must be non-negative, got {}", self.min_temperature),
            ));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(SearchError::parameter(
                "min_temperature",
                "must be less than initial_temperature",
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err(SearchError::parameter(
                "iterations_per_temperature",
                "must be positive",
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(SearchError::parameter(
                        "cooling.alpha",
                        format!("must be in (0, 1), got {alpha}"),
                    ));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if !(beta > 0.0 && beta.is_finite()) {
                    return Err(SearchError::parameter(
                        "cooling.beta",
                        format!("must be positive, got {beta}"),
                    ));
                }
            }
            CoolingSchedule::Linear => {}
        }
        Ok(())
    }
}

/// Annealing state: the temperature and the cooling position.
#[derive(Debug, Clone)]
pub struct Annealing {
    config: AnnealingConfig,
    temperature: f64,
    linear_steps: usize,
    step: usize,
    since_cooling: usize,
}

impl Annealing {
    /// Starts at the initial temperature. `budget` is the iteration budget
    /// that linear cooling spreads over.
    pub fn new(config: AnnealingConfig, budget: usize) -> Self {
        let linear_steps = budget / config.iterations_per_temperature.max(1);
        Self {
            temperature: config.initial_temperature,
            config,
            linear_steps,
            step: 0,
            since_cooling: 0,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Metropolis criterion applied to the best pool entry.
    pub(crate) fn decide<A, R: Rng>(&self, decision: &Decision<'_, A>, rng: &mut R) -> Verdict {
        let Some(entry) = decision.pool.first() else {
            return Verdict::Reject;
        };
        if !entry.cost.is_finite() {
            return Verdict::Reject;
        }
        if decision.sense.no_worse(entry.cost, decision.current_cost) {
            return Verdict::Accept(0);
        }
        // gain < 0 here, so the probability is in [0, 1).
        let gain = decision.sense.gain(decision.current_cost, entry.cost);
        let probability = (gain / self.temperature).exp();
        if rng.random::<f64>() < probability {
            Verdict::Accept(0)
        } else {
            Verdict::Reject
        }
    }

    /// Called once per iteration; lowers the temperature when the current
    /// level has been held for `iterations_per_temperature` iterations.
    pub(crate) fn cool(&mut self) {
        self.since_cooling += 1;
        let hold = match self.config.cooling {
            CoolingSchedule::LundyMees { .. } => 1,
            _ => self.config.iterations_per_temperature,
        };
        if self.since_cooling < hold {
            return;
        }
        self.since_cooling = 0;
        self.temperature = next_temperature(
            self.temperature,
            &self.config,
            self.step,
            self.linear_steps,
        )
        .max(self.config.min_temperature);
        self.step += 1;
    }
}

/// Apply the cooling schedule to compute the next temperature.
fn next_temperature(
    temperature: f64,
    config: &AnnealingConfig,
    step: usize,
    linear_steps: usize,
) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if linear_steps == 0 {
                config.min_temperature
            } else {
                config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / linear_steps as f64
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptance::PoolEntry;
    use crate::candidate::Sense;
    use crate::random::create_rng;

    fn worse_by(delta: f64) -> Vec<PoolEntry<'static, ()>> {
        vec![PoolEntry {
            cost: 10.0 + delta,
            attributes: &[],
        }]
    }

    fn decision<'a>(pool: &'a [PoolEntry<'a, ()>]) -> Decision<'a, ()> {
        Decision {
            pool,
            current_cost: 10.0,
            best_cost: 10.0,
            sense: Sense::Minimize,
            iteration: 0,
        }
    }

    #[test]
    fn test_default_config() {
        let config = AnnealingConfig::default();
        assert!((config.initial_temperature - 100.0).abs() < 1e-10);
        assert_eq!(config.iterations_per_temperature, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = AnnealingConfig::default().with_initial_temperature(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = AnnealingConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(20.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_alpha() {
        let config =
            AnnealingConfig::default().with_cooling(CoolingSchedule::Geometric { alpha: 1.5 });
        assert!(config.validate().is_err());
        let config =
            AnnealingConfig::default().with_cooling(CoolingSchedule::Geometric { alpha: 0.0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_beta() {
        let config =
            AnnealingConfig::default().with_cooling(CoolingSchedule::LundyMees { beta: -1.0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_geometric_cooling_is_monotone() {
        let config = AnnealingConfig::default()
            .with_initial_temperature(1e5)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 });
        let mut state = Annealing::new(config, 2000);
        let mut last = state.temperature();
        for _ in 0..2000 {
            state.cool();
            assert!(state.temperature() < last);
            last = state.temperature();
        }
        assert!((last - 1e5 * 0.98f64.powi(2000)).abs() < 1e-20);
    }

    #[test]
    fn test_hold_temperature_levels() {
        let config = AnnealingConfig::default()
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.5 })
            .with_iterations_per_temperature(3);
        let mut state = Annealing::new(config, 100);
        state.cool();
        state.cool();
        assert!((state.temperature() - 100.0).abs() < 1e-12);
        state.cool();
        assert!((state.temperature() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_cooling_reaches_floor() {
        let config = AnnealingConfig::default()
            .with_min_temperature(1.0)
            .with_cooling(CoolingSchedule::Linear);
        let mut state = Annealing::new(config, 99);
        for _ in 0..99 {
            state.cool();
        }
        assert!((state.temperature() - 1.0).abs() < 1e-9);
        state.cool();
        assert!((state.temperature() - 1.0).abs() < 1e-9, "floor must hold");
    }

    #[test]
    fn test_lundy_mees_cooling() {
        let config = AnnealingConfig::default()
            .with_cooling(CoolingSchedule::LundyMees { beta: 0.01 })
            .with_iterations_per_temperature(10);
        let mut state = Annealing::new(config, 100);
        state.cool();
        // 100 / (1 + 0.01 * 100) = 50, one level per iteration
        assert!((state.temperature() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_metropolis_accepts_uphill_at_high_temperature() {
        let config = AnnealingConfig::default().with_initial_temperature(1e8);
        let state = Annealing::new(config, 100);
        let mut rng = create_rng(42);
        let pool = worse_by(1.0);
        let accepted = (0..1000)
            .filter(|_| state.decide(&decision(&pool), &mut rng) == Verdict::Accept(0))
            .count();
        assert!(accepted > 990, "expected near-certain acceptance, got {accepted}");
    }

    #[test]
    fn test_metropolis_rejects_uphill_when_cold() {
        let config = AnnealingConfig::default().with_initial_temperature(1e-6);
        let state = Annealing::new(config, 100);
        let mut rng = create_rng(42);
        let pool = worse_by(1.0);
        for _ in 0..100 {
            assert_eq!(state.decide(&decision(&pool), &mut rng), Verdict::Reject);
        }
    }

    #[test]
    fn test_metropolis_probability_matches() {
        // exp(-1 / 1) ~ 0.368
        let config = AnnealingConfig::default().with_initial_temperature(1.0);
        let state = Annealing::new(config, 100);
        let mut rng = create_rng(7);
        let pool = worse_by(1.0);
        let trials = 20_000;
        let accepted = (0..trials)
            .filter(|_| state.decide(&decision(&pool), &mut rng) == Verdict::Accept(0))
            .count();
        let ratio = accepted as f64 / trials as f64;
        assert!((ratio - (-1.0f64).exp()).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn test_improving_always_accepted() {
        let config = AnnealingConfig::default().with_initial_temperature(1e-9);
        let state = Annealing::new(config, 100);
        let mut rng = create_rng(0);
        let pool = worse_by(-3.0);
        assert_eq!(state.decide(&decision(&pool), &mut rng), Verdict::Accept(0));
    }
}
