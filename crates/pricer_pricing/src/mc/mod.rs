//! Monte Carlo engine for NTS-GARCH option pricing.
//!
//! # Architecture
//!
//! ```text
//! MonteCarloPricer
//! ├── MonteCarloConfig          (paths, steps, seed, workers, per-step rates)
//! ├── ParallelPathDriver        (reused Rayon pool, ordered gather)
//! ├── RiskNeutralPathSimulator  (innovations -> GARCH vols -> drift-corrected prices)
//! └── OptionPricer              (discounted terminal payoffs per moneyness)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use pricer_models::models::{GarchParams, ModelParameters, ShapeParams};
//! use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(1_000)
//!     .n_steps(30)
//!     .rate(0.02 / 250.0)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let pricer = MonteCarloPricer::new(config).unwrap();
//!
//! let params = ModelParameters::new(
//!     ShapeParams::fixed(1.2, 1.0, 0.0, 1.0),
//!     GarchParams::new(0.05, 0.1, 0.3, 0.2, 0.01),
//!     100.0,
//! );
//! let quote = pricer.price(&params, &[1.0]).unwrap()[0];
//! println!("call {:.4} +/- {:.4}", quote.call, quote.call_std_error);
//! ```

pub mod config;
pub mod parallel;
pub mod paths;
pub mod payoff;
pub mod pricer;

pub use config::{default_workers, MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_SEED};
pub use parallel::ParallelPathDriver;
pub use paths::{PathBuffers, RiskNeutralPathSimulator, SimulatedPaths, EXPENSIVE_DRAW_COST};
pub use payoff::{OptionPricer, OptionQuote, OptionStyle};
pub use pricer::MonteCarloPricer;
