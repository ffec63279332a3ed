//! Standard normal tempered stable (stdNTS) law.
//!
//! # Model
//!
//! ```text
//! X = mu + beta (T - 1) + gamma sqrt(T) Z,    Z ~ N(0, 1)
//! ```
//!
//! `T` is a tempered stable subordinator with index `a = alpha / 2`,
//! tempering `theta` and `E[T] = 1`. Its Laplace exponent is
//!
//! ```text
//! -log E[exp(-sT)] = c ((theta + s)^a - theta^a),   c = 2 theta^(1-a) / alpha
//! ```
//!
//! which yields the characteristic exponent
//!
//! ```text
//! log φ(u) = iu (mu - beta) - c ((theta - i beta u + gamma² u² / 2)^a - theta^a)
//! ```
//!
//! # Sampling
//!
//! `T` is drawn exactly. It is split into `m = ceil(2 theta / alpha)`
//! independent pieces, each a positive `a`-stable variate (Kanter's
//! representation) accepted with probability `exp(-theta S)`. Splitting keeps
//! the acceptance rate of every piece above `1/e`.
//!
//! The cost of one draw therefore grows linearly in `theta / alpha`: a shape
//! with `alpha = 0.01` and `theta = 10` needs 2000 stable pieces per draw.
//! [`StdNts::subordinator_pieces`] reports the count so callers can flag
//! such shapes before simulating.

use num_complex::Complex64;
use pricer_core::types::PricingError;
use rand::Rng;
use rand_distr::{Distribution, Exp1, StandardNormal};
use std::f64::consts::PI;

use super::law::{CharacteristicExponent, InnovationSampler};
use super::params::NtsShape;

/// Attempts per subordinator piece before sampling is abandoned.
const MAX_REJECTIONS: usize = 10_000;

/// stdNTS innovation law.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::{CharacteristicExponent, InnovationSampler, NtsShape, StdNts};
/// use rand::SeedableRng;
///
/// let shape = NtsShape::standard(1.2, 1.0, 0.0);
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let draws = StdNts.draw(100, &shape, &mut rng).unwrap();
/// assert_eq!(draws.len(), 100);
///
/// // Drift correction for a 1% daily volatility
/// let w = StdNts.drift_correction(0.01, &shape).unwrap();
/// assert!(w > 0.0 && w < 1e-4);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StdNts;

impl StdNts {
    /// Scale `c = 2 theta^(1 - alpha/2) / alpha` of the subordinator's Laplace exponent.
    #[inline]
    fn laplace_scale(shape: &NtsShape) -> f64 {
        2.0 * shape.theta.powf(1.0 - 0.5 * shape.alpha) / shape.alpha
    }

    /// Number of stable pieces summed per subordinator draw, `ceil(2 theta / alpha)`.
    ///
    /// Sampling time is proportional to this count.
    #[inline]
    pub fn subordinator_pieces(shape: &NtsShape) -> usize {
        (2.0 * shape.theta / shape.alpha).ceil().max(1.0) as usize
    }

    /// Draws the unit-mean tempered stable subordinator `T`.
    ///
    /// Runs [`subordinator_pieces`](Self::subordinator_pieces) rejection
    /// loops.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::NumericalInstability` if a piece is rejected
    /// `MAX_REJECTIONS` times in a row.
    pub fn sample_subordinator<R: Rng + ?Sized>(
        shape: &NtsShape,
        rng: &mut R,
    ) -> Result<f64, PricingError> {
        let index = 0.5 * shape.alpha;
        let pieces = Self::subordinator_pieces(shape);
        let piece_scale = Self::laplace_scale(shape) / pieces as f64;
        // (c/m)^(1/a) in log space
        let log_scale = piece_scale.ln() / index;

        let mut total = 0.0;
        for _ in 0..pieces {
            total += Self::sample_tempered_piece(index, log_scale, shape.theta, rng)?;
        }
        Ok(total)
    }

    fn sample_tempered_piece<R: Rng + ?Sized>(
        index: f64,
        log_scale: f64,
        theta: f64,
        rng: &mut R,
    ) -> Result<f64, PricingError> {
        for _ in 0..MAX_REJECTIONS {
            let s = (log_scale + log_positive_stable(index, rng)).exp();
            let u: f64 = rng.gen();
            if u <= (-theta * s).exp() {
                return Ok(s);
            }
        }
        Err(PricingError::instability(format!(
            "tempered stable rejection did not accept within {} attempts (index = {}, theta = {})",
            MAX_REJECTIONS, index, theta
        )))
    }
}

/// Log of a positive `index`-stable variate with Laplace transform `exp(-s^index)`.
///
/// Kanter's representation:
/// `S = sin(aU) / sin(U)^(1/a) · (sin((1-a)U) / E)^((1-a)/a)`
/// with `U ~ Uniform(0, π)` and `E ~ Exp(1)`.
fn log_positive_stable<R: Rng + ?Sized>(index: f64, rng: &mut R) -> f64 {
    let u = PI * open_unit(rng);
    let e: f64 = Exp1.sample(rng);
    let a = index;
    (a * u).sin().ln() - (u.sin().ln()) / a
        + ((1.0 - a) / a) * (((1.0 - a) * u).sin().ln() - e.ln())
}

/// Uniform variate on the open interval (0, 1).
#[inline]
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u > 0.0 {
            return u;
        }
    }
}

impl InnovationSampler for StdNts {
    fn sample<R: Rng + ?Sized>(&self, shape: &NtsShape, rng: &mut R) -> Result<f64, PricingError> {
        let t = Self::sample_subordinator(shape, rng)?;
        let z: f64 = StandardNormal.sample(rng);
        Ok(shape.mu + shape.beta * (t - 1.0) + shape.gamma * t.sqrt() * z)
    }

    #[inline]
    fn sampling_cost(&self, shape: &NtsShape) -> usize {
        Self::subordinator_pieces(shape)
    }
}

impl CharacteristicExponent for StdNts {
    fn log_chf(&self, u: Complex64, shape: &NtsShape) -> Complex64 {
        let i = Complex64::i();
        let a = 0.5 * shape.alpha;
        let c = Self::laplace_scale(shape);
        let inner = shape.theta - i * shape.beta * u + 0.5 * shape.gamma * shape.gamma * u * u;
        i * u * (shape.mu - shape.beta) - c * (inner.powf(a) - shape.theta.powf(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mean_and_variance(xs: &[f64]) -> (f64, f64) {
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var)
    }

    #[test]
    fn test_chf_at_zero_is_one() {
        let shape = NtsShape::standard(1.2, 1.0, 0.4);
        let phi = StdNts.chf(Complex64::new(0.0, 0.0), &shape);
        assert_relative_eq!(phi.re, 1.0, epsilon = 1e-14);
        assert_relative_eq!(phi.im, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_chf_is_hermitian() {
        let shape = NtsShape::standard(0.8, 2.0, -0.5);
        let u = Complex64::new(0.7, 0.0);
        let a = StdNts.chf(u, &shape);
        let b = StdNts.chf(-u, &shape);
        assert_relative_eq!(a.re, b.re, epsilon = 1e-14);
        assert_relative_eq!(a.im, -b.im, epsilon = 1e-14);
    }

    #[test]
    fn test_symmetric_drift_correction_close_to_gaussian() {
        // beta = 0, gamma = 1: w ≈ sigma²/2 for small sigma
        let shape = NtsShape::new(1.2, 1.0, 0.0, 1.0);
        let sigma = 0.01;
        let w = StdNts.drift_correction(sigma, &shape).unwrap();
        assert_relative_eq!(w, 0.5 * sigma * sigma, max_relative = 1e-3);
    }

    #[test]
    fn test_drift_correction_outside_mgf_domain_is_flagged() {
        // theta - gamma² sigma² / 2 < 0 puts the power on the branch cut
        let shape = NtsShape::new(1.2, 0.1, 0.0, 1.0);
        let err = StdNts.drift_correction(1.0, &shape).unwrap_err();
        assert!(matches!(err, PricingError::NumericalInstability(_)));
    }

    #[test]
    fn test_piece_count_scales_with_theta_over_alpha() {
        assert_eq!(StdNts::subordinator_pieces(&NtsShape::standard(1.2, 1.0, 0.0)), 2);
        assert_eq!(StdNts::subordinator_pieces(&NtsShape::standard(1.8, 0.1, 0.0)), 1);
        assert_eq!(StdNts::subordinator_pieces(&NtsShape::standard(0.5, 500.0, 0.0)), 2000);
        let shape = NtsShape::standard(0.5, 3.0, 0.0);
        assert_eq!(StdNts.sampling_cost(&shape), StdNts::subordinator_pieces(&shape));
    }

    #[test]
    fn test_subordinator_has_unit_mean() {
        let shape = NtsShape::standard(1.2, 1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(2024);
        let draws: Vec<f64> = (0..40_000)
            .map(|_| StdNts::sample_subordinator(&shape, &mut rng).unwrap())
            .collect();
        let (mean, var) = mean_and_variance(&draws);
        assert!(draws.iter().all(|&t| t >= 0.0));
        assert_relative_eq!(mean, 1.0, epsilon = 0.03);
        assert_relative_eq!(var, shape.subordinator_variance(), max_relative = 0.15);
    }

    #[test]
    fn test_standard_draws_have_unit_variance() {
        let shape = NtsShape::standard(1.5, 0.8, 0.3);
        let mut rng = StdRng::seed_from_u64(99);
        let draws = StdNts.draw(40_000, &shape, &mut rng).unwrap();
        let (mean, var) = mean_and_variance(&draws);
        assert_relative_eq!(mean, 0.0, epsilon = 0.03);
        assert_relative_eq!(var, 1.0, max_relative = 0.1);
    }

    #[test]
    fn test_sampler_matches_exponential_moment() {
        // E[exp(sigma X)] = exp(w): the sampler and the chf describe the same law
        let shape = NtsShape::standard(1.2, 1.0, -0.4);
        let sigma = 0.2;
        let w = StdNts.drift_correction(sigma, &shape).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let draws = StdNts.draw(60_000, &shape, &mut rng).unwrap();
        let mc = draws.iter().map(|x| (sigma * x).exp()).sum::<f64>() / draws.len() as f64;
        assert_relative_eq!(mc, w.exp(), max_relative = 5e-3);
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let shape = NtsShape::standard(0.6, 3.0, 0.2);
        let a = StdNts.draw(50, &shape, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = StdNts.draw(50, &shape, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }
}
