//! Check command implementation
//!
//! Prints the resolved configuration and verifies that the worker pool and
//! Monte Carlo configuration can be built.

use pricer_core::types::STEPS_PER_YEAR;
use pricer_pricing::mc::{default_workers, ParallelPathDriver};
use pricer_study::StudyConfig;
use tracing::info;

use crate::Result;

/// Run the check command
pub fn run(config: &StudyConfig) -> Result<()> {
    info!("Checking configuration...");

    let mc_config = config.monte_carlo_config()?;
    let driver = ParallelPathDriver::new(mc_config.n_workers())?;

    println!("ntsgarch {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Runtime:");
    println!("  default workers:  {}", default_workers());
    println!("  pool workers:     {}", driver.n_workers());
    println!("  steps per year:   {}", STEPS_PER_YEAR);
    println!();
    println!("Pricing:");
    println!("  n_paths:          {}", mc_config.n_paths());
    println!("  n_steps:          {}", mc_config.n_steps());
    println!("  rate (per step):  {}", mc_config.rate());
    println!("  dividend:         {}", mc_config.dividend());
    println!("  seed:             {}", mc_config.seed());
    println!("  sigma0:           {}", config.sigma0);
    println!("  spot:             {}", config.spot);
    println!("  y0:               {}", config.y0);
    println!();
    println!("Study:");
    println!("  n_sim:            {}", config.n_sim);
    println!("  chunk_size:       {}", config.chunk_size);
    println!("  skew_mode:        {}", config.skew_mode);
    println!("  output_dir:       {}", config.output_dir.display());
    println!("  log_level:        {}", config.log_level);

    info!("Configuration OK");
    Ok(())
}
