//! Monte Carlo simulation configuration.
//!
//! Rates are per time step, matching the daily-step convention of
//! [`STEPS_PER_YEAR`](pricer_core::types::STEPS_PER_YEAR).

use pricer_core::types::{maturity_for_steps, steps_for_maturity, PricingError};

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Seed used when none is supplied.
pub const DEFAULT_SEED: u64 = 42;

/// Default worker count: available hardware concurrency minus one, at least one.
pub fn default_workers() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// Monte Carlo simulation configuration.
///
/// Immutable; use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .maturity_years(30.0 / 250.0)
///     .rate(0.02 / 250.0)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_steps(), 30);
/// assert_eq!(config.n_cols(), 31);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloConfig {
    n_paths: usize,
    n_steps: usize,
    seed: u64,
    n_workers: usize,
    rate: f64,
    dividend: f64,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps to maturity.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the number of matrix columns, `n_steps + 1` (column 0 is t = 0).
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_steps + 1
    }

    /// Returns the realised maturity in years.
    #[inline]
    pub fn maturity_years(&self) -> f64 {
        maturity_for_steps(self.n_steps)
    }

    /// Returns the master seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the worker pool size.
    #[inline]
    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    /// Returns the risk-free rate per step.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the dividend yield per step.
    #[inline]
    pub fn dividend(&self) -> f64 {
        self.dividend
    }

    /// Returns the discount factor to maturity, `exp(-rate * n_steps)`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.n_steps as f64).exp()
    }

    /// Returns a copy with a different step count.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` if `n_steps` is out of range.
    pub fn with_n_steps(&self, n_steps: usize) -> Result<Self, PricingError> {
        let config = Self {
            n_steps,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` if:
    /// - `n_paths` is 0 or greater than 10,000,000
    /// - `n_steps` is 0 or greater than 10,000
    /// - `n_workers` is 0
    /// - `rate` or `dividend` is not finite
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(PricingError::InvalidConfig(format!(
                "path count {} must be in range [1, {}]",
                self.n_paths, MAX_PATHS
            )));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(PricingError::InvalidConfig(format!(
                "step count {} must be in range [1, {}]",
                self.n_steps, MAX_STEPS
            )));
        }
        if self.n_workers == 0 {
            return Err(PricingError::InvalidConfig(
                "worker count must be positive".to_string(),
            ));
        }
        if !self.rate.is_finite() || !self.dividend.is_finite() {
            return Err(PricingError::InvalidConfig(format!(
                "rate ({}) and dividend ({}) must be finite",
                self.rate, self.dividend
            )));
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// `n_steps` and `maturity_years` are alternatives; the one set last wins.
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    seed: Option<u64>,
    n_workers: Option<usize>,
    rate: f64,
    dividend: f64,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulation paths.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps to maturity.
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the maturity in years, rounded up to whole steps.
    #[inline]
    pub fn maturity_years(mut self, maturity: f64) -> Self {
        self.n_steps = Some(steps_for_maturity(maturity));
        self
    }

    /// Sets the master seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the worker pool size.
    #[inline]
    pub fn n_workers(mut self, n_workers: usize) -> Self {
        self.n_workers = Some(n_workers);
        self
    }

    /// Sets the risk-free rate per step.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the dividend yield per step.
    #[inline]
    pub fn dividend(mut self, dividend: f64) -> Self {
        self.dividend = dividend;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` if `n_paths` or the horizon is
    /// missing, or any value is out of range.
    pub fn build(self) -> Result<MonteCarloConfig, PricingError> {
        let n_paths = self
            .n_paths
            .ok_or_else(|| PricingError::InvalidConfig("n_paths must be specified".to_string()))?;
        let n_steps = self.n_steps.ok_or_else(|| {
            PricingError::InvalidConfig("n_steps or maturity_years must be specified".to_string())
        })?;

        let config = MonteCarloConfig {
            n_paths,
            n_steps,
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            n_workers: self.n_workers.unwrap_or_else(default_workers),
            rate: self.rate,
            dividend: self.dividend,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_builder_valid() {
        let config = MonteCarloConfig::builder()
            .n_paths(10_000)
            .n_steps(252)
            .build()
            .unwrap();

        assert_eq!(config.n_paths(), 10_000);
        assert_eq!(config.n_steps(), 252);
        assert_eq!(config.seed(), DEFAULT_SEED);
        assert!(config.n_workers() >= 1);
        assert_eq!(config.rate(), 0.0);
    }

    #[test]
    fn test_maturity_rounds_up_to_whole_steps() {
        let config = MonteCarloConfig::builder()
            .n_paths(10)
            .maturity_years(0.401)
            .build()
            .unwrap();
        // 0.401 * 250 = 100.25 -> 101 steps, realised maturity 0.404
        assert_eq!(config.n_steps(), 101);
        assert_relative_eq!(config.maturity_years(), 0.404, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_maturity_is_not_bumped() {
        let config = MonteCarloConfig::builder()
            .n_paths(10)
            .maturity_years(30.0 / 250.0)
            .build()
            .unwrap();
        assert_eq!(config.n_steps(), 30);
    }

    #[test]
    fn test_discount_factor() {
        let config = MonteCarloConfig::builder()
            .n_paths(10)
            .n_steps(30)
            .rate(0.02 / 250.0)
            .build()
            .unwrap();
        assert_relative_eq!(config.discount_factor(), (-0.0024_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_config_invalid_zero_paths() {
        let result = MonteCarloConfig::builder().n_paths(0).n_steps(100).build();
        assert!(matches!(result, Err(PricingError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_invalid_too_many_steps() {
        let result = MonteCarloConfig::builder()
            .n_paths(1000)
            .n_steps(MAX_STEPS + 1)
            .build();
        assert!(matches!(result, Err(PricingError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_invalid_zero_workers() {
        let result = MonteCarloConfig::builder()
            .n_paths(1000)
            .n_steps(10)
            .n_workers(0)
            .build();
        assert!(matches!(result, Err(PricingError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_missing_horizon() {
        let err = MonteCarloConfig::builder().n_paths(1000).build().unwrap_err();
        assert!(err.to_string().contains("maturity_years"));
    }

    #[test]
    fn test_with_n_steps() {
        let config = MonteCarloConfig::builder()
            .n_paths(100)
            .n_steps(10)
            .seed(7)
            .build()
            .unwrap();
        let longer = config.with_n_steps(125).unwrap();
        assert_eq!(longer.n_steps(), 125);
        assert_eq!(longer.seed(), 7);
        assert!(config.with_n_steps(0).is_err());
    }

    #[test]
    fn test_default_workers_positive() {
        assert!(default_workers() >= 1);
    }
}
