//! Low-discrepancy parameter designs.
//!
//! Each design row is one Halton point mapped through per-column marginal
//! transforms:
//!
//! | Dim | Column        | Transform                                   |
//! |-----|---------------|---------------------------------------------|
//! | 0   | `alpha`       | `2u`                                        |
//! | 1   | `theta`       | `-1.2544 ln(1 - u)` (exponential, mean 1.2544) |
//! | 2   | `a1`          | `2u - 1`, never exactly 0                   |
//! | 3   | `moneyness`   | `0.5 + 0.5u`, jittered if exactly 1         |
//! | 4   | `tao`         | `0.4 + 0.6u`                                |
//! | 5   | `kappa`       | `-ln(1 - u)` (exponential, mean 1)          |
//! | 6   | `xi`          | `u`                                         |
//! | 7   | `zeta`        | `u (1 - xi)`                                |
//! | 8   | `sigma_error` | `(2u - 1) 0.05406`, never exactly 0         |
//! | 9   | `lambda`      | `0.8u`                                      |
//! | 10  | `b`           | `2u - 1`, never exactly 0 (skew mode only)  |
//!
//! In skew mode `beta = b sqrt(2 theta / (2 - alpha))` and `gamma = 1 - b²`;
//! otherwise `beta = 0` and `gamma = 1`. The first [`BURN_IN`] points are
//! discarded.

use pricer_core::types::PricingError;
use pricer_models::models::{GarchParams, ModelParameters, ShapeParams};
use pricer_pricing::rng::{HaltonSequence, LowDiscrepancySequence, PricerRng};
use serde::Serialize;

/// Halton points discarded before the first design row.
pub const BURN_IN: usize = 20;

/// Mean of the exponential `theta` marginal.
pub const THETA_MEAN: f64 = 1.2544;

/// Half-width of the uniform `sigma_error` marginal.
pub const SIGMA_ERROR_BOUND: f64 = 0.05406;

/// Design dimension without the skew column.
pub const BASE_DIMENSION: usize = 10;

/// One sampled parameter row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StudyRow {
    /// Stability index.
    pub alpha: f64,
    /// Tempering parameter.
    pub theta: f64,
    /// Skewness loading.
    pub beta: f64,
    /// Diffusive loading.
    pub gamma: f64,
    /// Autoregressive covariate.
    pub a1: f64,
    /// Strike as a multiple of spot.
    pub moneyness: f64,
    /// Maturity in years.
    pub tao: f64,
    /// GARCH base-level scale.
    pub kappa: f64,
    /// GARCH shock weight.
    pub xi: f64,
    /// GARCH persistence weight.
    pub zeta: f64,
    /// Observation-error covariate.
    pub sigma_error: f64,
    /// GARCH leverage shift.
    pub lambda: f64,
    /// Skew driver; `None` outside skew mode.
    pub b: Option<f64>,
}

impl StudyRow {
    /// Builds simulation parameters for this row.
    pub fn model_parameters(&self, sigma0: f64, spot: f64, y0: f64) -> ModelParameters {
        ModelParameters::new(
            ShapeParams::fixed(self.alpha, self.theta, self.beta, self.gamma),
            GarchParams::new(self.kappa, self.xi, self.lambda, self.zeta, sigma0),
            spot,
        )
        .with_y0(y0)
    }

    /// Checks the sampling ranges and cross-column constraints.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` naming the first violated column.
    pub fn validate(&self) -> Result<(), PricingError> {
        fn check(name: &'static str, ok: bool, value: f64) -> Result<(), PricingError> {
            if ok {
                Ok(())
            } else {
                Err(PricingError::invalid_parameter(
                    name,
                    format!("sampled value {} outside its design range", value),
                ))
            }
        }
        check("alpha", self.alpha > 0.0 && self.alpha < 2.0, self.alpha)?;
        check("theta", self.theta > 0.0 && self.theta.is_finite(), self.theta)?;
        check("a1", self.a1 != 0.0 && self.a1.abs() <= 1.0, self.a1)?;
        check("moneyness", self.moneyness >= 0.5 && self.moneyness < 1.0, self.moneyness)?;
        check("tao", self.tao >= 0.4 && self.tao < 1.0, self.tao)?;
        check("kappa", self.kappa >= 0.0 && self.kappa.is_finite(), self.kappa)?;
        check("xi", (0.0..1.0).contains(&self.xi), self.xi)?;
        check("zeta", self.zeta >= 0.0 && self.zeta < 1.0 - self.xi, self.zeta)?;
        check(
            "sigma_error",
            self.sigma_error != 0.0 && self.sigma_error.abs() <= SIGMA_ERROR_BOUND,
            self.sigma_error,
        )?;
        check("lambda", (0.0..0.8).contains(&self.lambda), self.lambda)?;
        if let Some(b) = self.b {
            check("b", b != 0.0 && b.abs() < 1.0, b)?;
        }
        check("gamma", self.gamma >= 0.0, self.gamma)
    }
}

/// Halton parameter sampler.
///
/// # Examples
///
/// ```rust
/// use pricer_study::ParameterSampler;
///
/// let design = ParameterSampler::new(true).sample(5).unwrap();
/// assert_eq!(design.len(), 5);
/// assert!(design.iter().all(|row| row.zeta < 1.0 - row.xi));
/// assert!(design.iter().all(|row| row.b.is_some()));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ParameterSampler {
    skew_mode: bool,
    seed: u64,
}

impl ParameterSampler {
    /// Creates a sampler; `skew_mode` adds the `b` column.
    pub fn new(skew_mode: bool) -> Self {
        Self {
            skew_mode,
            seed: pricer_pricing::mc::DEFAULT_SEED,
        }
    }

    /// Sets the seed of the moneyness jitter stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns `true` when the skew column is sampled.
    #[inline]
    pub fn skew_mode(&self) -> bool {
        self.skew_mode
    }

    /// Number of Halton dimensions consumed per row.
    #[inline]
    pub fn dimension(&self) -> usize {
        BASE_DIMENSION + usize::from(self.skew_mode)
    }

    /// Draws `n` design rows after the burn-in.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` if the Halton sequence cannot be
    /// built for the design dimension.
    pub fn sample(&self, n: usize) -> Result<Vec<StudyRow>, PricingError> {
        let mut halton = HaltonSequence::new(self.dimension())?;
        halton.skip(BURN_IN);
        let mut jitter = PricerRng::from_seed(self.seed);
        (0..n)
            .map(|_| self.row_from_point(halton.next_point(), &mut jitter))
            .collect()
    }

    /// Maps one unit-cube point to a design row.
    ///
    /// Entries past [`dimension`](Self::dimension) are ignored.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::DimensionMismatch` if `point` has fewer than
    /// [`dimension`](Self::dimension) entries.
    pub fn row_from_point(
        &self,
        point: &[f64],
        jitter: &mut PricerRng,
    ) -> Result<StudyRow, PricingError> {
        if point.len() < self.dimension() {
            return Err(PricingError::DimensionMismatch {
                expected_rows: 1,
                expected_cols: self.dimension(),
                rows: 1,
                cols: point.len(),
            });
        }
        let alpha = 2.0 * point[0];
        let theta = -THETA_MEAN * (1.0 - point[1]).ln();
        let a1 = non_zero(2.0 * point[2] - 1.0);
        let mut moneyness = 0.5 + 0.5 * point[3];
        if moneyness == 1.0 {
            moneyness = 0.75 + 0.5 * jitter.gen_range_f64(-0.5, 0.5);
        }
        let tao = 0.4 + 0.6 * point[4];
        let kappa = -(1.0 - point[5]).ln();
        let xi = point[6];
        let zeta = point[7] * (1.0 - xi);
        let sigma_error = non_zero((2.0 * point[8] - 1.0) * SIGMA_ERROR_BOUND);
        let lambda = 0.8 * point[9];

        let (beta, gamma, b) = if self.skew_mode {
            let b = non_zero(2.0 * point[10] - 1.0);
            let beta = b * (2.0 * theta / (2.0 - alpha)).sqrt();
            (beta, 1.0 - b * b, Some(b))
        } else {
            (0.0, 1.0, None)
        };

        Ok(StudyRow {
            alpha,
            theta,
            beta,
            gamma,
            a1,
            moneyness,
            tao,
            kappa,
            xi,
            zeta,
            sigma_error,
            lambda,
            b,
        })
    }
}

/// Replaces an exact zero with the smallest positive normal `f64`.
#[inline]
fn non_zero(x: f64) -> f64 {
    if x == 0.0 {
        f64::MIN_POSITIVE
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_returns_exactly_n_rows() {
        for n in [0, 1, 25, 200] {
            assert_eq!(ParameterSampler::new(false).sample(n).unwrap().len(), n);
        }
    }

    #[test]
    fn test_burn_in_is_hidden() {
        let design = ParameterSampler::new(false).sample(1).unwrap();
        // Halton index 21 in base 2 is 0.10101b = 0.65625
        assert_relative_eq!(design[0].alpha, 2.0 * 0.65625, epsilon = 1e-15);
    }

    #[test]
    fn test_rows_satisfy_constraints() {
        for skew in [false, true] {
            let design = ParameterSampler::new(skew).sample(500).unwrap();
            for row in &design {
                row.validate().unwrap();
            }
        }
    }

    #[test]
    fn test_symmetric_mode_fixes_beta_gamma() {
        let design = ParameterSampler::new(false).sample(50).unwrap();
        assert!(design
            .iter()
            .all(|r| r.beta == 0.0 && r.gamma == 1.0 && r.b.is_none()));
    }

    #[test]
    fn test_skew_mode_derives_beta_gamma() {
        let design = ParameterSampler::new(true).sample(50).unwrap();
        for r in design {
            let b = r.b.unwrap();
            assert_relative_eq!(r.gamma, 1.0 - b * b, epsilon = 1e-15);
            assert_relative_eq!(
                r.beta,
                b * (2.0 * r.theta / (2.0 - r.alpha)).sqrt(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_zero_is_replaced() {
        let sampler = ParameterSampler::new(true);
        let mut jitter = PricerRng::from_seed(1);
        let point = [0.5; 11];
        let row = sampler.row_from_point(&point, &mut jitter).unwrap();
        assert_eq!(row.a1, f64::MIN_POSITIVE);
        assert_eq!(row.sigma_error, f64::MIN_POSITIVE);
        assert_eq!(row.b, Some(f64::MIN_POSITIVE));
        row.validate().unwrap();
    }

    #[test]
    fn test_moneyness_of_one_is_jittered() {
        let sampler = ParameterSampler::new(false);
        let mut jitter = PricerRng::from_seed(3);
        let mut point = [0.3; 10];
        point[3] = 1.0;
        let row = sampler.row_from_point(&point, &mut jitter).unwrap();
        assert_ne!(row.moneyness, 1.0);
        assert!((0.5..1.0).contains(&row.moneyness));
    }

    #[test]
    fn test_short_point_is_rejected() {
        let mut jitter = PricerRng::from_seed(1);
        let err = ParameterSampler::new(true)
            .row_from_point(&[0.5; 10], &mut jitter)
            .unwrap_err();
        assert!(matches!(
            err,
            PricingError::DimensionMismatch {
                expected_cols: 11,
                cols: 10,
                ..
            }
        ));
        assert!(ParameterSampler::new(false)
            .row_from_point(&[], &mut jitter)
            .is_err());
        assert!(ParameterSampler::new(false)
            .row_from_point(&[0.5; 10], &mut jitter)
            .is_ok());
    }

    #[test]
    fn test_design_is_deterministic() {
        let a = ParameterSampler::new(true).with_seed(9).sample(30).unwrap();
        let b = ParameterSampler::new(true).with_seed(9).sample(30).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_model_parameters_mapping() {
        let row = ParameterSampler::new(false).sample(1).unwrap()[0];
        let params = row.model_parameters(0.01, 100.0, 0.0);
        assert_eq!(params.garch.sigma0, 0.01);
        assert_eq!(params.garch.kappa, row.kappa);
        assert_eq!(params.shape.alpha, row.alpha);
        assert_eq!(params.spot, 100.0);
    }

    proptest! {
        #[test]
        fn prop_any_point_gives_valid_row(
            point in proptest::collection::vec(0.0f64..1.0, 11),
            skew in any::<bool>(),
        ) {
            let mut jitter = PricerRng::from_seed(0);
            let row = ParameterSampler::new(skew)
                .row_from_point(&point, &mut jitter)
                .unwrap();
            prop_assert!(row.zeta < 1.0 - row.xi || row.zeta == 0.0);
            prop_assert!(row.a1 != 0.0);
            prop_assert!(row.sigma_error != 0.0);
            prop_assert!(row.moneyness < 1.0);
        }
    }
}
