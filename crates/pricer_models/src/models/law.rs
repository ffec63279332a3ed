//! Innovation law traits.
//!
//! Path simulation consumes a law through two seams:
//! - [`InnovationSampler`]: i.i.d. random variates under given shape parameters
//! - [`CharacteristicExponent`]: `log E[exp(iuX)]` at complex arguments
//!
//! The risk-neutral drift correction for a step with conditional volatility
//! `sigma` is `w = log E[exp(sigma X)] = log φ(-i sigma)`, which makes
//! `exp(r - d - w + sigma X)` a martingale increment. Laws without a
//! closed-form drift (stdNTS) recover it from their characteristic exponent.

use num_complex::Complex64;
use pricer_core::types::PricingError;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use super::params::NtsShape;

/// Tolerance on the imaginary part of `log φ(-i sigma)`, relative to `max(1, |re|)`.
pub const IMAGINARY_TOLERANCE: f64 = 1e-10;

/// Draws i.i.d. innovations under fixed shape parameters.
pub trait InnovationSampler: Sync {
    /// Draws a single variate.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` if the shape is invalid or sampling cannot complete.
    fn sample<R: Rng + ?Sized>(&self, shape: &NtsShape, rng: &mut R) -> Result<f64, PricingError>;

    /// Approximate cost of one draw under `shape`, in units of a single
    /// normal draw.
    #[inline]
    fn sampling_cost(&self, _shape: &NtsShape) -> usize {
        1
    }

    /// Draws `n` variates.
    fn draw<R: Rng + ?Sized>(
        &self,
        n: usize,
        shape: &NtsShape,
        rng: &mut R,
    ) -> Result<Vec<f64>, PricingError> {
        (0..n).map(|_| self.sample(shape, rng)).collect()
    }
}

/// Evaluates the log characteristic function of an innovation law.
pub trait CharacteristicExponent: Sync {
    /// Returns `log φ(u)` for complex `u`.
    fn log_chf(&self, u: Complex64, shape: &NtsShape) -> Complex64;

    /// Returns `φ(u) = E[exp(iuX)]`.
    fn chf(&self, u: Complex64, shape: &NtsShape) -> Complex64 {
        self.log_chf(u, shape).exp()
    }

    /// Returns the risk-neutral drift correction `log φ(-i sigma)`.
    ///
    /// The value is real by construction whenever the exponential moment
    /// `E[exp(sigma X)]` exists.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::NumericalInstability` if the evaluation is not
    /// finite or its imaginary part exceeds [`IMAGINARY_TOLERANCE`], which
    /// happens when `sigma` lies outside the moment-generating domain.
    fn drift_correction(&self, sigma: f64, shape: &NtsShape) -> Result<f64, PricingError> {
        let w = self.log_chf(Complex64::new(0.0, -sigma), shape);
        if !(w.re.is_finite() && w.im.is_finite()) {
            return Err(PricingError::instability(format!(
                "log characteristic function not finite at -i*{}: {}",
                sigma, w
            )));
        }
        if w.im.abs() > IMAGINARY_TOLERANCE * w.re.abs().max(1.0) {
            return Err(PricingError::instability(format!(
                "imaginary residue {:e} in drift correction at sigma = {} \
                 (alpha = {}, theta = {}, beta = {}, gamma = {})",
                w.im, sigma, shape.alpha, shape.theta, shape.beta, shape.gamma
            )));
        }
        Ok(w.re)
    }
}

/// A law usable for risk-neutral path simulation.
pub trait InnovationLaw: InnovationSampler + CharacteristicExponent {}

impl<T: InnovationSampler + CharacteristicExponent> InnovationLaw for T {}

/// Standard normal innovations, ignoring the NTS shape.
///
/// Serves as the Gaussian reference: its drift correction is `sigma² / 2`,
/// the familiar GBM convexity term.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardNormalLaw;

impl InnovationSampler for StandardNormalLaw {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, _shape: &NtsShape, rng: &mut R) -> Result<f64, PricingError> {
        Ok(StandardNormal.sample(rng))
    }
}

impl CharacteristicExponent for StandardNormalLaw {
    #[inline]
    fn log_chf(&self, u: Complex64, _shape: &NtsShape) -> Complex64 {
        -0.5 * u * u
    }
}
