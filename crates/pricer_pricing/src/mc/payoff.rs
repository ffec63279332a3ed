//! Option payoffs on simulated price matrices.
//!
//! [`OptionPricer`] reads the terminal column of a price matrix and returns,
//! for each moneyness level `m`, the discounted mean call and put payoffs at
//! strike `K = m × S0` with their Monte Carlo standard errors. It consumes no
//! randomness.

use std::fmt;
use std::str::FromStr;

use pricer_core::types::{PathMatrix, PricingError};

/// Exercise style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionStyle {
    /// Exercise at maturity only.
    #[default]
    European,
}

impl fmt::Display for OptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::European => write!(f, "european"),
        }
    }
}

impl FromStr for OptionStyle {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "european" | "eu" => Ok(Self::European),
            other => Err(PricingError::invalid_parameter(
                "style",
                format!("unsupported option style '{}'", other),
            )),
        }
    }
}

/// Call and put estimates at one moneyness level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionQuote {
    /// Strike as a multiple of spot.
    pub moneyness: f64,
    /// Absolute strike.
    pub strike: f64,
    /// Discounted call price.
    pub call: f64,
    /// Discounted put price.
    pub put: f64,
    /// Standard error of the call estimate.
    pub call_std_error: f64,
    /// Standard error of the put estimate.
    pub put_std_error: f64,
}

impl OptionQuote {
    /// Returns the quote with prices, strike and errors divided by `spot`.
    pub fn as_percent_of_spot(&self, spot: f64) -> Self {
        Self {
            moneyness: self.moneyness,
            strike: self.strike / spot,
            call: self.call / spot,
            put: self.put / spot,
            call_std_error: self.call_std_error / spot,
            put_std_error: self.put_std_error / spot,
        }
    }

    /// Put-call parity residual `C - P - df (F - K)` against a forward `forward`.
    #[inline]
    pub fn parity_residual(&self, forward: f64, discount_factor: f64) -> f64 {
        self.call - self.put - discount_factor * (forward - self.strike)
    }
}

/// Discounted payoff evaluator.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PathMatrix;
/// use pricer_pricing::mc::{OptionPricer, OptionStyle};
///
/// let prices = PathMatrix::from_rows(vec![vec![100.0, 110.0], vec![100.0, 90.0]]).unwrap();
/// let pricer = OptionPricer::new(0.0, OptionStyle::European);
/// let quotes = pricer.price(&prices, 100.0, &[1.0]).unwrap();
/// assert_eq!(quotes[0].call, 5.0);
/// assert_eq!(quotes[0].put, 5.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptionPricer {
    rate: f64,
    style: OptionStyle,
}

impl OptionPricer {
    /// Creates a pricer discounting at `rate` per step.
    pub fn new(rate: f64, style: OptionStyle) -> Self {
        Self { rate, style }
    }

    /// Returns the exercise style.
    #[inline]
    pub fn style(&self) -> OptionStyle {
        self.style
    }

    /// Discount factor over `n_steps`, `exp(-rate * n_steps)`.
    #[inline]
    pub fn discount_factor(&self, n_steps: usize) -> f64 {
        (-self.rate * n_steps as f64).exp()
    }

    /// Prices calls and puts for every moneyness level.
    ///
    /// The terminal column is the last one; a matrix with `n_cols` columns
    /// spans `n_cols - 1` steps.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` for an empty matrix, a
    /// non-positive spot or a non-positive or non-finite moneyness.
    pub fn price(
        &self,
        prices: &PathMatrix,
        spot: f64,
        moneyness: &[f64],
    ) -> Result<Vec<OptionQuote>, PricingError> {
        let (n_paths, n_cols) = prices.shape();
        if n_paths == 0 || n_cols == 0 {
            return Err(PricingError::invalid_parameter(
                "prices",
                "price matrix is empty",
            ));
        }
        if !(spot.is_finite() && spot > 0.0) {
            return Err(PricingError::invalid_parameter(
                "spot",
                format!("must be positive and finite, got {}", spot),
            ));
        }
        if let Some(&m) = moneyness.iter().find(|m| !(m.is_finite() && **m > 0.0)) {
            return Err(PricingError::invalid_parameter(
                "moneyness",
                format!("must be positive and finite, got {}", m),
            ));
        }

        let df = self.discount_factor(n_cols - 1);
        let terminal = prices.last_column();

        let quotes = moneyness
            .iter()
            .map(|&m| {
                let strike = m * spot;
                let (call, call_se) =
                    discounted_mean(terminal.iter().map(|&s| (s - strike).max(0.0)), df);
                let (put, put_se) =
                    discounted_mean(terminal.iter().map(|&s| (strike - s).max(0.0)), df);
                OptionQuote {
                    moneyness: m,
                    strike,
                    call,
                    put,
                    call_std_error: call_se,
                    put_std_error: put_se,
                }
            })
            .collect();
        Ok(quotes)
    }
}

/// Mean and standard error of `df × payoff`.
fn discounted_mean(payoffs: impl Iterator<Item = f64>, df: f64) -> (f64, f64) {
    // Welford
    let mut n = 0.0;
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for x in payoffs {
        n += 1.0;
        let delta = x - mean;
        mean += delta / n;
        m2 += delta * (x - mean);
    }
    let std_error = if n > 1.0 {
        (m2 / (n - 1.0) / n).sqrt()
    } else {
        0.0
    };
    (df * mean, df * std_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_flat_terminal_at_the_money_is_zero() {
        let prices = PathMatrix::from_vec(50, 3, vec![100.0; 150]).unwrap();
        let pricer = OptionPricer::new(0.001, OptionStyle::European);
        let q = pricer.price(&prices, 100.0, &[1.0]).unwrap()[0];
        assert_eq!(q.call, 0.0);
        assert_eq!(q.put, 0.0);
        assert_eq!(q.call_std_error, 0.0);
    }

    #[test]
    fn test_discounting_uses_step_count() {
        let prices = PathMatrix::from_rows(vec![vec![100.0, 100.0, 100.0, 120.0]]).unwrap();
        let pricer = OptionPricer::new(0.01, OptionStyle::European);
        let q = pricer.price(&prices, 100.0, &[1.0]).unwrap()[0];
        assert_relative_eq!(q.call, 20.0 * (-0.03_f64).exp(), epsilon = 1e-12);
        assert_eq!(q.put, 0.0);
    }

    #[test]
    fn test_multiple_moneyness_levels() {
        let prices = PathMatrix::from_rows(vec![vec![100.0, 80.0], vec![100.0, 120.0]]).unwrap();
        let pricer = OptionPricer::new(0.0, OptionStyle::European);
        let quotes = pricer.price(&prices, 100.0, &[0.9, 1.1]).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_relative_eq!(quotes[0].strike, 90.0, epsilon = 1e-12);
        assert_relative_eq!(quotes[0].call, 15.0, epsilon = 1e-12);
        assert_relative_eq!(quotes[0].put, 5.0, epsilon = 1e-12);
        assert_relative_eq!(quotes[1].call, 5.0, epsilon = 1e-12);
        assert_relative_eq!(quotes[1].put, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_percent_of_spot() {
        let q = OptionQuote {
            moneyness: 1.0,
            strike: 100.0,
            call: 2.0,
            put: 1.5,
            call_std_error: 0.1,
            put_std_error: 0.05,
        };
        let pct = q.as_percent_of_spot(100.0);
        assert_relative_eq!(pct.call, 0.02, epsilon = 1e-15);
        assert_relative_eq!(pct.strike, 1.0, epsilon = 1e-15);
        assert_relative_eq!(pct.put_std_error, 0.0005, epsilon = 1e-15);
    }

    #[test]
    fn test_standard_error() {
        let prices = PathMatrix::from_rows(vec![vec![0.0, 110.0], vec![0.0, 90.0]]).unwrap();
        let pricer = OptionPricer::new(0.0, OptionStyle::European);
        let q = pricer.price(&prices, 100.0, &[1.0]).unwrap()[0];
        // payoffs {10, 0}: sample sd = sqrt(50), se = sqrt(50 / 2) = 5
        assert_relative_eq!(q.call_std_error, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let prices = PathMatrix::from_vec(2, 2, vec![100.0; 4]).unwrap();
        let pricer = OptionPricer::new(0.0, OptionStyle::European);
        assert!(pricer.price(&PathMatrix::zeros(0, 2), 100.0, &[1.0]).is_err());
        assert!(pricer.price(&prices, 0.0, &[1.0]).is_err());
        assert!(pricer.price(&prices, 100.0, &[0.0]).is_err());
        assert!(pricer.price(&prices, 100.0, &[f64::NAN]).is_err());
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("European".parse::<OptionStyle>().unwrap(), OptionStyle::European);
        assert!(matches!(
            "american".parse::<OptionStyle>(),
            Err(PricingError::InvalidParameter { name: "style", .. })
        ));
        assert_eq!(OptionStyle::European.to_string(), "european");
    }

    proptest! {
        #[test]
        fn prop_prices_non_negative(
            terminal in proptest::collection::vec(0.0f64..300.0, 1..40),
            m in 0.1f64..3.0,
            rate in -0.001f64..0.001,
        ) {
            let n = terminal.len();
            let mut data = Vec::with_capacity(2 * n);
            for s in &terminal {
                data.push(100.0);
                data.push(*s);
            }
            let prices = PathMatrix::from_vec(n, 2, data).unwrap();
            let q = OptionPricer::new(rate, OptionStyle::European)
                .price(&prices, 100.0, &[m])
                .unwrap()[0];
            prop_assert!(q.call >= 0.0);
            prop_assert!(q.put >= 0.0);
            prop_assert!(q.call_std_error >= 0.0);
        }
    }
}
