//! Error types for search configuration.
//!
//! Every error here is raised before the first iteration. The search loop
//! itself has no failure path: unproductive iterations and non-finite
//! objective values are ordinary search behavior.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Configuration errors detected at initialization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The search space has no dimensions.
    #[error("search space must have at least one dimension")]
    EmptySpace,

    /// A real-valued dimension has unusable bounds.
    #[error("invalid bounds for dimension {dimension}: [{min}, {max}]")]
    InvalidBounds {
        /// Index of the offending dimension.
        dimension: usize,
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },

    /// The instance is too small for the chosen neighborhood.
    #[error("instance size {actual} is below the required minimum of {required}")]
    DimensionTooSmall {
        /// Minimum size the strategy needs.
        required: usize,
        /// Size of the configured space.
        actual: usize,
    },

    /// Two strategies disagree about the problem size.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Size the objective was built for.
        expected: usize,
        /// Size of the configured space.
        actual: usize,
    },

    /// The iteration budget is zero.
    #[error("max_iterations must be positive")]
    InvalidIterations,

    /// Any other out-of-range parameter.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the config struct.
        name: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

impl SearchError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        SearchError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
