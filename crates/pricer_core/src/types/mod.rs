//! Core numeric and error types.
//!
//! This module provides:
//! - `error`: Structured error types for pricing and batch-study operations
//! - `matrix`: Row-major `PathMatrix` shared by innovations, volatilities and prices
//! - `schedule`: `ParamSchedule` for fixed or time-varying parameters
//! - `horizon`: Conversions between maturity in years and simulation steps
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`PricingError`], [`StudyError`] from `error`
//! - [`PathMatrix`] from `matrix`
//! - [`ParamSchedule`] from `schedule`
//! - [`STEPS_PER_YEAR`], [`steps_for_maturity`], [`maturity_for_steps`] from `horizon`

pub mod error;
pub mod horizon;
pub mod matrix;
pub mod schedule;

// Re-export commonly used types at module level
pub use error::{PricingError, StudyError};
pub use horizon::{maturity_for_steps, steps_for_maturity, STEPS_PER_YEAR};
pub use matrix::PathMatrix;
pub use schedule::ParamSchedule;
