//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from parameter validation, path simulation and pricing
//! - `StudyError`: Errors from the batch study driver and its persistence layer
//!
//! # Recovery Policy
//!
//! Pricing errors are raised per parameter row. A batch study records the
//! failure, skips the row and carries on. Persistence errors abort the study
//! because a dropped chunk would leave the experiment incomplete.

use std::path::PathBuf;
use thiserror::Error;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidParameter`: A supplied or sampled parameter violates a distributional
///   or stability constraint
/// - `NumericalInstability`: Characteristic-function evaluation was non-finite or
///   carried an imaginary residue above tolerance
/// - `WorkerFailure`: A parallel path worker failed
/// - `DimensionMismatch`: Matrix shapes disagree
/// - `InvalidConfig`: Simulation configuration is out of range
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::invalid_parameter("alpha", "must lie in (0, 2), got 2.5");
/// assert_eq!(
///     format!("{}", err),
///     "Invalid parameter 'alpha': must lie in (0, 2), got 2.5"
/// );
/// assert!(err.is_row_recoverable());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Parameter violates a distributional or stability constraint.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the violation
        reason: String,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// A parallel worker failed while simulating its slice of paths.
    #[error("Worker failure: {0}")]
    WorkerFailure(String),

    /// Matrix dimensions do not agree.
    #[error("Dimension mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    DimensionMismatch {
        /// Expected row count
        expected_rows: usize,
        /// Expected column count
        expected_cols: usize,
        /// Actual row count
        rows: usize,
        /// Actual column count
        cols: usize,
    },

    /// Simulation configuration is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PricingError {
    /// Creates an `InvalidParameter` error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Creates a `NumericalInstability` error.
    pub fn instability(msg: impl Into<String>) -> Self {
        Self::NumericalInstability(msg.into())
    }

    /// Creates a `WorkerFailure` error.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::WorkerFailure(msg.into())
    }

    /// Returns `true` when the error only invalidates the current parameter row.
    ///
    /// Parameter, numerical and worker failures are row-local. Configuration and
    /// shape errors indicate a programming or setup fault that would repeat on
    /// every row.
    pub fn is_row_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::NumericalInstability(_) | Self::WorkerFailure(_)
        )
    }
}

/// Batch study errors.
///
/// # Examples
/// ```
/// use pricer_core::types::{PricingError, StudyError};
///
/// let err: StudyError = PricingError::InvalidConfig("n_paths must be positive".into()).into();
/// assert!(format!("{}", err).contains("n_paths"));
/// ```
#[derive(Error, Debug)]
pub enum StudyError {
    /// A chunk could not be written to durable storage.
    #[error("Persistence error at {}: {message}", path.display())]
    Persistence {
        /// Target artefact path
        path: PathBuf,
        /// Underlying failure
        message: String,
    },

    /// A pricing error that could not be handled at row level.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Study configuration error.
    #[error("Study configuration error: {0}")]
    Config(String),
}

impl StudyError {
    /// Creates a `Persistence` error for the given path.
    pub fn persistence(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.into(),
        }
    }
}
