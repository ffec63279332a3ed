//! Monte Carlo option pricing engine.
//!
//! [`MonteCarloPricer`] ties together the configuration, the parallel path
//! driver, the path simulator and the payoff evaluator. The worker pool is
//! built once and reused for every pricing call.

use pricer_core::types::{steps_for_maturity, PricingError};
use pricer_models::models::{InnovationLaw, ModelParameters, StdNts};
use tracing::debug;

use super::config::MonteCarloConfig;
use super::parallel::ParallelPathDriver;
use super::paths::RiskNeutralPathSimulator;
use super::payoff::{OptionPricer, OptionQuote, OptionStyle};

/// Monte Carlo pricing engine.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::{GarchParams, ModelParameters, ShapeParams};
/// use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(2_000)
///     .maturity_years(30.0 / 250.0)
///     .rate(0.02 / 250.0)
///     .n_workers(2)
///     .build()
///     .unwrap();
/// let pricer = MonteCarloPricer::new(config).unwrap();
///
/// let params = ModelParameters::new(
///     ShapeParams::fixed(1.2, 1.0, 0.0, 1.0),
///     GarchParams::new(0.05, 0.1, 0.3, 0.2, 0.01),
///     100.0,
/// );
/// let quotes = pricer.price(&params, &[0.95, 1.0, 1.05]).unwrap();
/// assert_eq!(quotes.len(), 3);
/// assert!(quotes.iter().all(|q| q.call >= 0.0 && q.put >= 0.0));
/// ```
#[derive(Debug)]
pub struct MonteCarloPricer<L = StdNts> {
    config: MonteCarloConfig,
    driver: ParallelPathDriver,
    simulator: RiskNeutralPathSimulator<L>,
    style: OptionStyle,
}

impl MonteCarloPricer<StdNts> {
    /// Creates a European stdNTS pricer.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` if the worker pool cannot be built.
    pub fn new(config: MonteCarloConfig) -> Result<Self, PricingError> {
        Self::with_law(config, StdNts)
    }
}

impl<L: InnovationLaw> MonteCarloPricer<L> {
    /// Creates a European pricer driven by `law`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` if the configuration is invalid
    /// or the worker pool cannot be built.
    pub fn with_law(config: MonteCarloConfig, law: L) -> Result<Self, PricingError> {
        config.validate()?;
        let driver = ParallelPathDriver::new(config.n_workers())?;
        Ok(Self {
            config,
            driver,
            simulator: RiskNeutralPathSimulator::new(law),
            style: OptionStyle::European,
        })
    }

    /// Sets the exercise style.
    pub fn with_style(mut self, style: OptionStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Returns the path driver.
    #[inline]
    pub fn driver(&self) -> &ParallelPathDriver {
        &self.driver
    }

    /// Returns the path simulator.
    #[inline]
    pub fn simulator(&self) -> &RiskNeutralPathSimulator<L> {
        &self.simulator
    }

    /// Prices calls and puts at the configured horizon.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` from validation, simulation or payoff evaluation.
    pub fn price(
        &self,
        params: &ModelParameters,
        moneyness: &[f64],
    ) -> Result<Vec<OptionQuote>, PricingError> {
        self.price_with_config(params, &self.config, moneyness)
    }

    /// Prices at a maturity given in years, rounded up to whole steps.
    ///
    /// # Errors
    ///
    /// As for [`price`](Self::price).
    pub fn price_at_maturity(
        &self,
        params: &ModelParameters,
        maturity_years: f64,
        moneyness: &[f64],
    ) -> Result<Vec<OptionQuote>, PricingError> {
        if !(maturity_years.is_finite() && maturity_years > 0.0) {
            return Err(PricingError::invalid_parameter(
                "maturity",
                format!("must be positive and finite, got {}", maturity_years),
            ));
        }
        let config = self
            .config
            .with_n_steps(steps_for_maturity(maturity_years))?;
        self.price_with_config(params, &config, moneyness)
    }

    fn price_with_config(
        &self,
        params: &ModelParameters,
        config: &MonteCarloConfig,
        moneyness: &[f64],
    ) -> Result<Vec<OptionQuote>, PricingError> {
        let prices = self.simulator.simulate_prices(params, config, &self.driver)?;
        debug!(
            n_paths = config.n_paths(),
            n_steps = config.n_steps(),
            "paths simulated"
        );
        OptionPricer::new(config.rate(), self.style).price(&prices, params.spot, moneyness)
    }
}
