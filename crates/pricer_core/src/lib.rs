//! # pricer_core: Foundation Types for the NTS-GARCH Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core serves as the bottom layer of the workspace, providing:
//! - Error taxonomy: `PricingError`, `StudyError` (`types::error`)
//! - Row-major path storage: `PathMatrix` (`types::matrix`)
//! - Fixed or per-step parameter values: `ParamSchedule` (`types::schedule`)
//! - Step/maturity conversion: `STEPS_PER_YEAR`, `steps_for_maturity` (`types::horizon`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{steps_for_maturity, ParamSchedule, PathMatrix};
//!
//! // 30 trading days expressed in years maps back to 30 steps
//! assert_eq!(steps_for_maturity(30.0 / 250.0), 30);
//!
//! // Constant schedules answer every step with the same value
//! let beta = ParamSchedule::constant(0.0);
//! assert_eq!(beta.at(17), 0.0);
//!
//! let mut paths = PathMatrix::zeros(2, 3);
//! paths.row_mut(1)[2] = 1.5;
//! assert_eq!(paths.get(1, 2), 1.5);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `ParamSchedule`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod types;
