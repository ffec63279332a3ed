//! Row pricing for the study.

use pricer_core::types::PricingError;
use pricer_pricing::mc::MonteCarloPricer;

use crate::sampler::StudyRow;

/// Prices one study row per call with a shared Monte Carlo engine.
///
/// The sampled `tao` is the maturity in years and `moneyness` the single
/// strike level. Prices are returned as fractions of spot.
#[derive(Debug)]
pub struct StudyPricer {
    pricer: MonteCarloPricer,
    sigma0: f64,
    spot: f64,
    y0: f64,
}

impl StudyPricer {
    /// Creates a row pricer with the fixed initial state of every path.
    pub fn new(pricer: MonteCarloPricer, sigma0: f64, spot: f64, y0: f64) -> Self {
        Self {
            pricer,
            sigma0,
            spot,
            y0,
        }
    }

    /// Returns the underlying engine.
    pub fn engine(&self) -> &MonteCarloPricer {
        &self.pricer
    }

    /// Returns `(call, put)` for `row`, normalised by spot.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` if the row violates a constraint or the
    /// simulation fails.
    pub fn price_row(&self, row: &StudyRow) -> Result<(f64, f64), PricingError> {
        row.validate()?;
        let params = row.model_parameters(self.sigma0, self.spot, self.y0);
        let quotes = self
            .pricer
            .price_at_maturity(&params, row.tao, &[row.moneyness])?;
        let quote = quotes
            .first()
            .ok_or_else(|| PricingError::instability("pricer returned no quote"))?
            .as_percent_of_spot(self.spot);
        Ok((quote.call, quote.put))
    }
}
