//! Price command implementation
//!
//! Prices European calls and puts for a single NTS-GARCH parameter set using
//! the pricer_pricing engine.

use std::io::Write;

use clap::Args;
use pricer_models::models::{GarchParams, ModelParameters, ShapeParams};
use pricer_pricing::mc::{MonteCarloPricer, OptionQuote, OptionStyle};
use pricer_study::StudyConfig;
use serde::Serialize;
use tracing::info;

use crate::{CliError, Result};

/// Arguments of `ntsgarch price`
#[derive(Args, Debug, Clone)]
pub struct PriceArgs {
    /// Stability index, in (0, 2)
    #[arg(long, default_value_t = 1.2)]
    pub alpha: f64,

    /// Tempering parameter, > 0
    #[arg(long, default_value_t = 1.0)]
    pub theta: f64,

    /// Skewness loading
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub beta: f64,

    /// Diffusive loading, >= 0
    #[arg(long, default_value_t = 1.0)]
    pub gamma: f64,

    /// GARCH base-level scale
    #[arg(long, default_value_t = 0.05)]
    pub kappa: f64,

    /// GARCH shock weight
    #[arg(long, default_value_t = 0.1)]
    pub xi: f64,

    /// GARCH leverage shift
    #[arg(long, default_value_t = 0.3, allow_hyphen_values = true)]
    pub lambda: f64,

    /// GARCH persistence weight
    #[arg(long, default_value_t = 0.2)]
    pub zeta: f64,

    /// Strike levels as multiples of spot (comma separated)
    #[arg(short, long, value_delimiter = ',', default_value = "0.9,0.95,1.0,1.05,1.1")]
    pub moneyness: Vec<f64>,

    /// Maturity in years (rounded up to whole steps)
    #[arg(short = 'T', long, conflicts_with = "steps")]
    pub maturity: Option<f64>,

    /// Number of time steps to maturity
    #[arg(long)]
    pub steps: Option<usize>,

    /// Number of Monte Carlo paths
    #[arg(short, long)]
    pub num_paths: Option<usize>,

    /// Master seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Exercise style
    #[arg(long, default_value = "european")]
    pub style: String,

    /// Report prices as fractions of spot
    #[arg(long)]
    pub normalise: bool,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

impl PriceArgs {
    /// Applies command-line overrides to the resolved configuration
    pub fn apply(&self, config: &mut StudyConfig) {
        if let Some(m) = self.maturity {
            config.maturity_years = Some(m);
            config.n_steps = None;
        }
        if let Some(n) = self.steps {
            config.n_steps = Some(n);
            config.maturity_years = None;
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

    /// Builds model parameters around the configured initial state
    pub fn model_parameters(&self, config: &StudyConfig) -> ModelParameters {
        ModelParameters::new(
            ShapeParams::fixed(self.alpha, self.theta, self.beta, self.gamma),
            GarchParams::new(self.kappa, self.xi, self.lambda, self.zeta, config.sigma0),
            config.spot,
        )
        .with_y0(config.y0)
    }
}

#[derive(Serialize)]
struct PriceReport<'a> {
    style: OptionStyle,
    n_paths: usize,
    n_steps: usize,
    seed: u64,
    spot: f64,
    normalised: bool,
    quotes: &'a [OptionQuote],
}

/// Run the price command
pub fn run(mut config: StudyConfig, args: &PriceArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let style: OptionStyle = args.style.parse()?;
    let mc_config = config.monte_carlo_config()?;
    let params = args.model_parameters(&config);

    info!("Starting pricing...");
    info!(
        n_paths = mc_config.n_paths(),
        n_steps = mc_config.n_steps(),
        n_workers = mc_config.n_workers(),
        seed = mc_config.seed(),
        %style,
        "pricing configuration"
    );

    let pricer = MonteCarloPricer::new(mc_config.clone())?.with_style(style);
    let mut quotes = pricer.price(&params, &args.moneyness)?;
    if args.normalise {
        quotes = quotes
            .iter()
            .map(|q| q.as_percent_of_spot(config.spot))
            .collect();
    }

    let report = PriceReport {
        style,
        n_paths: mc_config.n_paths(),
        n_steps: mc_config.n_steps(),
        seed: mc_config.seed(),
        spot: config.spot,
        normalised: args.normalise,
        quotes: &quotes,
    };
    let stdout = std::io::stdout();
    write_report(&report, &args.format, stdout.lock())?;

    info!("Pricing complete");
    Ok(())
}

fn write_report<W: Write>(report: &PriceReport<'_>, format: &str, mut out: W) -> Result<()> {
    match format {
        "json" => {
            serde_json::to_writer_pretty(&mut out, report)?;
            writeln!(out)?;
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(out);
            for quote in report.quotes {
                writer.serialize(quote)?;
            }
            writer.flush()?;
        }
        "table" => {
            writeln!(
                out,
                "{} paths, {} steps, seed {}",
                report.n_paths, report.n_steps, report.seed
            )?;
            writeln!(out, "┌───────────┬────────────┬────────────┬────────────┬────────────┬────────────┐")?;
            writeln!(out, "│ Moneyness │ Strike     │ Call       │ Call s.e.  │ Put        │ Put s.e.   │")?;
            writeln!(out, "├───────────┼────────────┼────────────┼────────────┼────────────┼────────────┤")?;
            for q in report.quotes {
                writeln!(
                    out,
                    "│ {:>9.4} │ {:>10.4} │ {:>10.6} │ {:>10.6} │ {:>10.6} │ {:>10.6} │",
                    q.moneyness, q.strike, q.call, q.call_std_error, q.put, q.put_std_error
                )?;
            }
            writeln!(out, "└───────────┴────────────┴────────────┴────────────┴────────────┴────────────┘")?;
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: PriceArgs,
    }

    fn parse(argv: &[&str]) -> PriceArgs {
        Harness::parse_from(std::iter::once("price").chain(argv.iter().copied())).args
    }

    fn quote() -> OptionQuote {
        OptionQuote {
            moneyness: 1.0,
            strike: 100.0,
            call: 2.5,
            put: 2.1,
            call_std_error: 0.03,
            put_std_error: 0.02,
        }
    }

    #[test]
    fn test_defaults_and_moneyness_list() {
        let args = parse(&["--moneyness", "0.8,1.2", "--beta", "-0.1"]);
        assert_eq!(args.moneyness, vec![0.8, 1.2]);
        assert_eq!(args.beta, -0.1);
        assert_eq!(args.alpha, 1.2);
        assert_eq!(args.format, "table");
    }

    #[test]
    fn test_apply_overrides_horizon() {
        let mut config = StudyConfig {
            n_steps: Some(10),
            ..StudyConfig::default()
        };
        parse(&["-T", "0.5", "-n", "200", "-w", "2"]).apply(&mut config);
        assert_eq!(config.n_steps, None);
        assert_eq!(config.maturity_years, Some(0.5));
        assert_eq!(config.n_paths, 200);
        assert_eq!(config.n_workers, Some(2));
        config.validate().unwrap();
    }

    #[test]
    fn test_table_and_csv_output() {
        let quotes = [quote()];
        let report = PriceReport {
            style: OptionStyle::European,
            n_paths: 100,
            n_steps: 30,
            seed: 42,
            spot: 100.0,
            normalised: false,
            quotes: &quotes,
        };

        let mut table = Vec::new();
        write_report(&report, "table", &mut table).unwrap();
        let table = String::from_utf8(table).unwrap();
        assert!(table.contains("100 paths, 30 steps, seed 42"));
        assert!(table.contains("2.500000"));

        let mut csv_out = Vec::new();
        write_report(&report, "csv", &mut csv_out).unwrap();
        let csv_out = String::from_utf8(csv_out).unwrap();
        assert!(csv_out.starts_with("moneyness,strike,call,put,call_std_error,put_std_error"));

        let mut json = Vec::new();
        write_report(&report, "json", &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["style"], "european");
        assert_eq!(value["quotes"][0]["call"], 2.5);
    }

    #[test]
    fn test_unknown_format() {
        let report = PriceReport {
            style: OptionStyle::European,
            n_paths: 1,
            n_steps: 1,
            seed: 0,
            spot: 1.0,
            normalised: false,
            quotes: &[],
        };
        assert!(matches!(
            write_report(&report, "xml", Vec::new()),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
