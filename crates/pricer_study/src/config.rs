//! Study configuration.
//!
//! Values are resolved in order of increasing priority:
//! 1. Defaults
//! 2. TOML file
//! 3. `NTS_*` environment variables
//! 4. Command-line flags (applied by the caller)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pricer_core::types::{steps_for_maturity, StudyError};
use pricer_pricing::mc::{MonteCarloConfig, DEFAULT_SEED};
use serde::Deserialize;
use tracing::debug;

/// Horizon used when neither `n_steps` nor `maturity_years` is set.
pub const DEFAULT_STEPS: usize = 30;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Study and pricing configuration.
///
/// # Examples
///
/// ```rust
/// use pricer_study::StudyConfig;
///
/// let config: StudyConfig = toml::from_str("n_paths = 5000\nchunk_size = 50").unwrap();
/// assert_eq!(config.n_paths, 5000);
/// assert_eq!(config.chunk_size, 50);
/// assert_eq!(config.n_sim, 1000);
/// config.validate().unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudyConfig {
    /// Paths per pricing call.
    pub n_paths: usize,
    /// Steps to maturity for single pricing; excludes `maturity_years`.
    pub n_steps: Option<usize>,
    /// Maturity in years for single pricing; excludes `n_steps`.
    pub maturity_years: Option<f64>,
    /// Risk-free rate per step.
    pub rate: f64,
    /// Dividend yield per step.
    pub dividend: f64,
    /// Worker threads; defaults to available cores minus one.
    pub n_workers: Option<usize>,
    /// Rows per persisted chunk.
    pub chunk_size: usize,
    /// Directory receiving chunk files.
    pub output_dir: PathBuf,
    /// Initial volatility.
    pub sigma0: f64,
    /// Initial spot.
    pub spot: f64,
    /// Initial log-price offset.
    pub y0: f64,
    /// Sample the skew column.
    pub skew_mode: bool,
    /// Number of design rows.
    pub n_sim: usize,
    /// Master seed.
    pub seed: u64,
    /// Default tracing level.
    pub log_level: String,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            n_paths: 10_000,
            n_steps: None,
            maturity_years: None,
            rate: 0.02 / 250.0,
            dividend: 0.0,
            n_workers: None,
            chunk_size: 100,
            output_dir: PathBuf::from("output/study"),
            sigma0: 0.01,
            spot: 100.0,
            y0: 0.0,
            skew_mode: false,
            n_sim: 1000,
            seed: DEFAULT_SEED,
            log_level: "info".to_string(),
        }
    }
}

impl StudyConfig {
    /// Loads a TOML file; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Config` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StudyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StudyError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            StudyError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Loads `path` (or defaults), applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Config` on read, parse, override or validation failure.
    pub fn resolve(path: Option<&Path>) -> Result<Self, StudyError> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `NTS_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Config` if a variable cannot be parsed.
    pub fn with_env_overrides(self) -> Result<Self, StudyError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `NTS_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Config` if a value cannot be parsed.
    pub fn with_overrides<F>(self, lookup: F) -> Result<Self, StudyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, StudyError>
        where
            T::Err: std::fmt::Display,
        {
            raw.trim()
                .parse()
                .map_err(|e| StudyError::Config(format!("{}='{}': {}", key, raw, e)))
        }

        let mut config = self;
        macro_rules! apply {
            ($key:literal, $field:ident) => {
                if let Some(raw) = lookup($key) {
                    config.$field = parse($key, &raw)?;
                    debug!(key = $key, value = %raw, "environment override");
                }
            };
            ($key:literal, $field:ident, optional) => {
                if let Some(raw) = lookup($key) {
                    config.$field = Some(parse($key, &raw)?);
                    debug!(key = $key, value = %raw, "environment override");
                }
            };
        }

        apply!("NTS_N_PATHS", n_paths);
        apply!("NTS_N_STEPS", n_steps, optional);
        apply!("NTS_MATURITY_YEARS", maturity_years, optional);
        apply!("NTS_RATE", rate);
        apply!("NTS_DIVIDEND", dividend);
        apply!("NTS_N_WORKERS", n_workers, optional);
        apply!("NTS_CHUNK_SIZE", chunk_size);
        apply!("NTS_OUTPUT_DIR", output_dir);
        apply!("NTS_SIGMA0", sigma0);
        apply!("NTS_SPOT", spot);
        apply!("NTS_Y0", y0);
        apply!("NTS_SKEW_MODE", skew_mode);
        apply!("NTS_N_SIM", n_sim);
        apply!("NTS_SEED", seed);
        apply!("NTS_LOG_LEVEL", log_level);
        Ok(config)
    }

    /// Checks every option and reports all violations at once.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Config` listing each invalid option.
    pub fn validate(&self) -> Result<(), StudyError> {
        let mut errors = Vec::new();

        if self.n_paths == 0 {
            errors.push("n_paths must be positive".to_string());
        }
        if self.n_steps.is_some() && self.maturity_years.is_some() {
            errors.push("set either n_steps or maturity_years, not both".to_string());
        }
        if self.n_steps == Some(0) {
            errors.push("n_steps must be positive".to_string());
        }
        if let Some(m) = self.maturity_years {
            if !(m.is_finite() && m > 0.0) {
                errors.push(format!("maturity_years must be positive, got {}", m));
            }
        }
        if !self.rate.is_finite() || !self.dividend.is_finite() {
            errors.push("rate and dividend must be finite".to_string());
        }
        if self.n_workers == Some(0) {
            errors.push("n_workers must be positive".to_string());
        }
        if self.chunk_size == 0 {
            errors.push("chunk_size must be positive".to_string());
        }
        if !(self.sigma0.is_finite() && self.sigma0 >= 0.0) {
            errors.push(format!("sigma0 must be non-negative, got {}", self.sigma0));
        }
        if !(self.spot.is_finite() && self.spot > 0.0) {
            errors.push(format!("spot must be positive, got {}", self.spot));
        }
        if !self.y0.is_finite() {
            errors.push("y0 must be finite".to_string());
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(StudyError::Config(errors.join("; ")))
        }
    }

    /// Steps to the pricing horizon.
    pub fn horizon_steps(&self) -> usize {
        match (self.n_steps, self.maturity_years) {
            (Some(n), _) => n,
            (None, Some(m)) => steps_for_maturity(m),
            (None, None) => DEFAULT_STEPS,
        }
    }

    /// Builds the Monte Carlo configuration.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Pricing` if the engine rejects a value.
    pub fn monte_carlo_config(&self) -> Result<MonteCarloConfig, StudyError> {
        let mut builder = MonteCarloConfig::builder()
            .n_paths(self.n_paths)
            .n_steps(self.horizon_steps())
            .seed(self.seed)
            .rate(self.rate)
            .dividend(self.dividend);
        if let Some(n) = self.n_workers {
            builder = builder.n_workers(n);
        }
        Ok(builder.build()?)
    }
}
