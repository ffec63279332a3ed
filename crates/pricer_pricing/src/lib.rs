//! # Pricer Engine (Layer 3: Monte Carlo)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing turns model parameters into option prices:
//! - Seeded per-path random streams and Halton low-discrepancy sequences ([`rng`])
//! - Risk-neutral NTS-GARCH path simulation with characteristic-function drift
//!   correction ([`mc::RiskNeutralPathSimulator`])
//! - Deterministic parallel path fan-out ([`mc::ParallelPathDriver`])
//! - European call/put estimation ([`mc::OptionPricer`])
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_models::models::{GarchParams, ModelParameters, ShapeParams};
//! use pricer_pricing::{MonteCarloConfig, MonteCarloPricer};
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(500)
//!     .maturity_years(0.12)
//!     .n_workers(2)
//!     .build()
//!     .unwrap();
//! let pricer = MonteCarloPricer::new(config).unwrap();
//! let params = ModelParameters::new(
//!     ShapeParams::fixed(1.2, 1.0, 0.0, 1.0),
//!     GarchParams::new(0.05, 0.1, 0.3, 0.2, 0.01),
//!     100.0,
//! );
//! let quotes = pricer.price(&params, &[1.0]).unwrap();
//! assert!(quotes[0].call > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![allow(unknown_lints)]

pub mod mc;
pub mod rng;

pub use mc::{MonteCarloConfig, MonteCarloPricer, OptionQuote, OptionStyle};
