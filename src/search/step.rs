//! Adaptive step size (adaptive random search).
//!
//! Each iteration proposes regular steps of the current size plus one
//! larger step. Accepting the larger step adopts its size. A run of
//! `max_no_improve` rejected iterations shrinks the step.
//!
//! # References
//!
//! Schumer & Steiglitz (1968), "Adaptive Step Size Random Search"

use crate::error::{Result, SearchError};

/// Step adaptation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepControl {
    /// Larger-step factor on ordinary iterations, and the shrink divisor.
    pub small_factor: f64,
    /// Larger-step factor every `large_every` iterations.
    pub large_factor: f64,
    pub large_every: usize,
    /// Rejected iterations in a row before the step shrinks.
    pub max_no_improve: usize,
}

impl Default for StepControl {
    fn default() -> Self {
        Self {
            small_factor: 1.3,
            large_factor: 3.0,
            large_every: 10,
            max_no_improve: 30,
        }
    }
}

impl StepControl {
    pub fn with_small_factor(mut self, factor: f64) -> Self {
        self.small_factor = factor;
        self
    }

    pub fn with_large_factor(mut self, factor: f64) -> Self {
        self.large_factor = factor;
        self
    }

    pub fn with_large_every(mut self, n: usize) -> Self {
        self.large_every = n;
        self
    }

    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.small_factor.is_finite() && self.small_factor > 1.0) {
            return Err(SearchError::parameter(
                "step_control.small_factor",
                format!("must be greater than 1, got {}", self.small_factor),
            ));
        }
        if !(self.large_factor.is_finite() && self.large_factor > 1.0) {
            return Err(SearchError::parameter(
                "step_control.large_factor",
                format!("must be greater than 1, got {}", self.large_factor),
            ));
        }
        if self.large_every == 0 {
            return Err(SearchError::parameter(
                "step_control.large_every",
                "must be positive",
            ));
        }
        if self.max_no_improve == 0 {
            return Err(SearchError::parameter(
                "step_control.max_no_improve",
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Run-time step state.
#[derive(Debug, Clone)]
pub(crate) struct StepSize {
    control: StepControl,
    step: f64,
    failures: usize,
}

impl StepSize {
    pub(crate) fn new(control: StepControl, initial: f64) -> Self {
        Self {
            control,
            step: initial,
            failures: 0,
        }
    }

    pub(crate) fn current(&self) -> f64 {
        self.step
    }

    /// Size of the larger step at 1-based `iteration`.
    pub(crate) fn large_step(&self, iteration: usize) -> f64 {
        if iteration % self.control.large_every == 0 {
            self.step * self.control.large_factor
        } else {
            self.step * self.control.small_factor
        }
    }

    /// The search moved to a proposal made with step `used`.
    pub(crate) fn accepted(&mut self, used: f64) {
        self.step = used;
        self.failures = 0;
    }

    pub(crate) fn rejected(&mut self) {
        self.failures += 1;
        if self.failures >= self.control.max_no_improve {
            self.failures = 0;
            self.step /= self.control.small_factor;
        }
    }
}
