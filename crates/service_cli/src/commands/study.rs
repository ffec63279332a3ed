//! Study command implementation
//!
//! Samples a Halton parameter design, prices every row and persists results in
//! CSV chunks. Re-running into the same output directory resumes after the
//! last complete chunk unless `--fresh` is given.

use std::path::PathBuf;

use clap::Args;
use pricer_pricing::mc::MonteCarloPricer;
use pricer_study::{BatchStudyDriver, CsvChunkWriter, ParameterSampler, StudyConfig, StudyPricer};
use tracing::{info, warn};

use crate::Result;

/// Arguments of `ntsgarch study`
#[derive(Args, Debug, Clone, Default)]
pub struct StudyArgs {
    /// Number of design rows
    #[arg(short = 's', long)]
    pub n_sim: Option<usize>,

    /// Rows per output chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Output directory for chunk files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Sample the skew column
    #[arg(long)]
    pub skew: bool,

    /// Number of Monte Carlo paths per row
    #[arg(short, long)]
    pub num_paths: Option<usize>,

    /// Master seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Delete chunks already present in the output directory and start over
    #[arg(long)]
    pub fresh: bool,
}

impl StudyArgs {
    /// Applies command-line overrides to the resolved configuration
    pub fn apply(&self, config: &mut StudyConfig) {
        if let Some(n) = self.n_sim {
            config.n_sim = n;
        }
        if let Some(n) = self.chunk_size {
            config.chunk_size = n;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.skew {
            config.skew_mode = true;
        }
        if let Some(n) = self.num_paths {
            config.n_paths = n;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(n) = self.workers {
            config.n_workers = Some(n);
        }
    }
}

/// Run the study command
pub fn run(mut config: StudyConfig, args: &StudyArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let pricer = StudyPricer::new(
        MonteCarloPricer::new(config.monte_carlo_config()?)?,
        config.sigma0,
        config.spot,
        config.y0,
    );
    let mut sink = CsvChunkWriter::new(&config.output_dir)?;
    let completed = if args.fresh {
        sink.clear_chunks()?;
        0
    } else {
        sink.completed_rows()?
    };
    if completed > 0 {
        info!(completed, "resuming after existing chunks");
    }

    let sampler = ParameterSampler::new(config.skew_mode).with_seed(config.seed);
    let driver = BatchStudyDriver::new(sampler, config.chunk_size)?.with_start_row(completed);

    info!(
        n_sim = config.n_sim,
        chunk_size = config.chunk_size,
        n_paths = config.n_paths,
        n_workers = pricer.engine().driver().n_workers(),
        output_dir = %config.output_dir.display(),
        "Starting study..."
    );
    let summary = driver.run(config.n_sim, |row| pricer.price_row(row), &mut sink)?;

    for failure in &summary.failures {
        warn!(row = failure.row, error = %failure.error, "row failed");
    }
    println!(
        "{} rows priced, {} failed, {} skipped, {} chunks written to {} in {:.1}s",
        summary.rows_priced,
        summary.failures.len(),
        summary.rows_skipped,
        summary.chunks_written,
        config.output_dir.display(),
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}
