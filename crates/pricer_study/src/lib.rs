//! # Pricer Study (Layer 4: Batch)
//!
//! ## Layer 4 Role
//!
//! pricer_study runs large pricing experiments over a sampled parameter space:
//! - Halton designs over the NTS-GARCH parameters ([`ParameterSampler`])
//! - Sequential row pricing with row-level failure isolation ([`BatchStudyDriver`])
//! - Chunked, atomically written CSV output with resume support ([`CsvChunkWriter`])
//! - TOML and environment configuration ([`StudyConfig`])
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use pricer_pricing::MonteCarloPricer;
//! use pricer_study::{BatchStudyDriver, CsvChunkWriter, ParameterSampler, StudyConfig, StudyPricer};
//!
//! let config = StudyConfig::resolve(None)?;
//! let pricer = StudyPricer::new(
//!     MonteCarloPricer::new(config.monte_carlo_config()?)?,
//!     config.sigma0,
//!     config.spot,
//!     config.y0,
//! );
//! let mut sink = CsvChunkWriter::new(&config.output_dir)?;
//! let driver = BatchStudyDriver::new(ParameterSampler::new(config.skew_mode), config.chunk_size)?
//!     .with_start_row(sink.completed_rows()?);
//! let summary = driver.run(config.n_sim, |row| pricer.price_row(row), &mut sink)?;
//! println!("{} rows priced", summary.rows_priced);
//! # Ok::<(), pricer_core::types::StudyError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![allow(unknown_lints)]

pub mod config;
pub mod driver;
pub mod pricing;
pub mod sampler;
pub mod sink;

pub use config::StudyConfig;
pub use driver::{BatchStudyDriver, BatchSummary, RowFailure};
pub use pricing::StudyPricer;
pub use sampler::{ParameterSampler, StudyRow};
pub use sink::{ChunkSink, CsvChunkWriter, ResultRow, WrittenChunk, CSV_HEADER};
