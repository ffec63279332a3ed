//! # Random Number Generation Infrastructure
//!
//! Random number sources for path simulation and parameter designs.
//!
//! - **Reproducibility**: every generator is seeded or deterministic
//! - **Stream independence**: [`PricerRng::for_stream`] gives each path its own stream
//!
//! ## Module Structure
//!
//! - [`prng`]: Pseudo-random number generator wrapper with seed management
//! - [`qmc`]: Low-discrepancy sequences (Halton)
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::{HaltonSequence, LowDiscrepancySequence, PricerRng};
//!
//! let mut rng = PricerRng::from_seed(12345);
//! assert!((0.0..1.0).contains(&rng.gen_uniform()));
//!
//! let mut halton = HaltonSequence::new(4).unwrap();
//! halton.skip(20);
//! let point = halton.next_point();
//! assert_eq!(point.len(), 4);
//! ```

pub mod prng;
pub mod qmc;

pub use prng::PricerRng;
pub use qmc::{halton_points, HaltonSequence, LowDiscrepancySequence, MAX_HALTON_DIMENSION};
