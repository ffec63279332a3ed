//! Conditional volatility paths under an asymmetric GARCH(1,1) recursion.
//!
//! For every path `i` the recursion runs along the time axis only:
//!
//! ```text
//! sigma[i, 0] = sigma0
//! sigma²[i, t] = (1 - xi - zeta) kappa sigma0²
//!              + xi sigma²[i, t-1] (eps[i, t-1] - lambda)²
//!              + zeta sigma²[i, t-1]
//! ```
//!
//! Entry `(i, t)` depends on `(i, t-1)` and the innovation at `(i, t-1)`
//! only. Paths never interact.

use pricer_core::types::{PathMatrix, PricingError};

use super::params::GarchParams;

/// GARCH volatility path generator.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PathMatrix;
/// use pricer_models::models::{GarchParams, GarchVolatility};
///
/// let garch = GarchVolatility::new(GarchParams::new(0.05, 0.1, 0.3, 0.2, 0.01)).unwrap();
/// let innovations = PathMatrix::zeros(4, 10);
/// let vols = garch.generate(&innovations).unwrap();
/// assert_eq!(vols.shape(), (4, 10));
/// assert!(vols.column(0).iter().all(|&s| s == 0.01));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct GarchVolatility {
    params: GarchParams,
    base_variance: f64,
}

impl GarchVolatility {
    /// Creates a generator after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` for a negative `sigma0` or a
    /// non-positive persistence gap `1 - xi - zeta`.
    pub fn new(params: GarchParams) -> Result<Self, PricingError> {
        params.validate()?;
        Ok(Self {
            params,
            base_variance: params.base_variance(),
        })
    }

    /// Returns the recursion parameters.
    #[inline]
    pub fn params(&self) -> &GarchParams {
        &self.params
    }

    /// One step of the recursion: next volatility from the previous one.
    #[inline]
    pub fn next_volatility(&self, sigma_prev: f64, innovation_prev: f64) -> f64 {
        let var_prev = sigma_prev * sigma_prev;
        let shock = innovation_prev - self.params.lambda;
        (self.base_variance + self.params.xi * var_prev * shock * shock + self.params.zeta * var_prev)
            .sqrt()
    }

    /// Fills `out` with the volatility path driven by `innovations`.
    ///
    /// `out[0] = sigma0`; `out[t]` uses `out[t-1]` and `innovations[t-1]`.
    pub fn generate_row(&self, innovations: &[f64], out: &mut [f64]) {
        debug_assert_eq!(innovations.len(), out.len());
        let Some(first) = out.first_mut() else {
            return;
        };
        *first = self.params.sigma0;
        for t in 1..out.len() {
            out[t] = self.next_volatility(out[t - 1], innovations[t - 1]);
        }
    }

    /// Generates a volatility matrix with the same shape as `innovations`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::NumericalInstability` if a volatility is not finite.
    pub fn generate(&self, innovations: &PathMatrix) -> Result<PathMatrix, PricingError> {
        let (n_rows, n_cols) = innovations.shape();
        let mut vols = PathMatrix::zeros(n_rows, n_cols);
        for i in 0..n_rows {
            let row = vols.row_mut(i);
            self.generate_row(innovations.row(i), row);
            if let Some(t) = row.iter().position(|s| !s.is_finite()) {
                return Err(PricingError::instability(format!(
                    "volatility not finite at path {}, step {}",
                    i, t
                )));
            }
        }
        Ok(vols)
    }
}
