//! Model parameter types.
//!
//! A simulation is fully described by:
//! - the innovation shape (`alpha`, `theta`, `beta`, `gamma`), where `beta`
//!   and `gamma` may vary by step,
//! - the GARCH recursion (`kappa`, `xi`, `lambda`, `zeta`, `sigma0`),
//! - the initial price `spot` and initial log-return `y0`.

use pricer_core::types::{ParamSchedule, PricingError};

/// NTS shape parameters in force at a single time step.
///
/// The law is `X = mu + beta (T - 1) + gamma sqrt(T) Z` where `T` is a
/// tempered stable subordinator with index `alpha / 2`, tempering `theta`
/// and unit mean.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::NtsShape;
///
/// let shape = NtsShape::standard(1.2, 1.0, 0.0);
/// assert_eq!(shape.gamma, 1.0);
/// assert!(shape.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NtsShape {
    /// Stability index, in (0, 2).
    pub alpha: f64,
    /// Tempering parameter, positive.
    pub theta: f64,
    /// Skewness loading on the subordinator.
    pub beta: f64,
    /// Diffusive loading, non-negative.
    pub gamma: f64,
    /// Location.
    pub mu: f64,
}

impl NtsShape {
    /// Creates a shape with zero location.
    pub fn new(alpha: f64, theta: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha,
            theta,
            beta,
            gamma,
            mu: 0.0,
        }
    }

    /// Creates the unit-variance shape for a given skewness `beta`.
    ///
    /// `gamma = sqrt(1 - beta^2 (2 - alpha) / (2 theta))`. When `beta` is too
    /// large for unit variance, `gamma` is NaN and validation fails.
    pub fn standard(alpha: f64, theta: f64, beta: f64) -> Self {
        let gamma = (1.0 - beta * beta * (2.0 - alpha) / (2.0 * theta)).sqrt();
        Self::new(alpha, theta, beta, gamma)
    }

    /// Variance of the subordinator, `(2 - alpha) / (2 theta)`.
    #[inline]
    pub fn subordinator_variance(&self) -> f64 {
        (2.0 - self.alpha) / (2.0 * self.theta)
    }

    /// Variance of the innovation, `gamma^2 + beta^2 Var(T)`.
    #[inline]
    pub fn variance(&self) -> f64 {
        self.gamma * self.gamma + self.beta * self.beta * self.subordinator_variance()
    }

    /// Validates the shape.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` unless `alpha ∈ (0, 2)`,
    /// `theta > 0`, `gamma ≥ 0` and every field is finite.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !(self.alpha.is_finite() && self.alpha > 0.0 && self.alpha < 2.0) {
            return Err(PricingError::invalid_parameter(
                "alpha",
                format!("must lie in (0, 2), got {}", self.alpha),
            ));
        }
        if !(self.theta.is_finite() && self.theta > 0.0) {
            return Err(PricingError::invalid_parameter(
                "theta",
                format!("must be positive and finite, got {}", self.theta),
            ));
        }
        if !self.beta.is_finite() {
            return Err(PricingError::invalid_parameter(
                "beta",
                format!("must be finite, got {}", self.beta),
            ));
        }
        if !(self.gamma.is_finite() && self.gamma >= 0.0) {
            return Err(PricingError::invalid_parameter(
                "gamma",
                format!("must be non-negative and finite, got {}", self.gamma),
            ));
        }
        if !self.mu.is_finite() {
            return Err(PricingError::invalid_parameter(
                "mu",
                format!("must be finite, got {}", self.mu),
            ));
        }
        Ok(())
    }
}

/// Shape parameters over the simulation horizon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeParams {
    /// Stability index, in (0, 2).
    pub alpha: f64,
    /// Tempering parameter, positive.
    pub theta: f64,
    /// Skewness, fixed or per step.
    pub beta: ParamSchedule,
    /// Diffusive loading, fixed or per step.
    pub gamma: ParamSchedule,
}

impl ShapeParams {
    /// Creates fixed shape parameters.
    pub fn fixed(alpha: f64, theta: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha,
            theta,
            beta: ParamSchedule::constant(beta),
            gamma: ParamSchedule::constant(gamma),
        }
    }

    /// Returns the shape in force at `step`.
    #[inline]
    pub fn at(&self, step: usize) -> NtsShape {
        NtsShape::new(self.alpha, self.theta, self.beta.at(step), self.gamma.at(step))
    }

    /// Returns `true` if neither `beta` nor `gamma` varies over time.
    #[inline]
    pub fn is_time_homogeneous(&self) -> bool {
        self.beta.is_constant() && self.gamma.is_constant()
    }

    /// Validates every step of an `n_cols`-column simulation.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if a per-step schedule is
    /// shorter than `n_cols` or any step has an invalid shape.
    pub fn validate(&self, n_cols: usize) -> Result<(), PricingError> {
        if !self.beta.covers(n_cols) {
            return Err(PricingError::invalid_parameter(
                "beta",
                format!("per-step schedule shorter than {} steps", n_cols),
            ));
        }
        if !self.gamma.covers(n_cols) {
            return Err(PricingError::invalid_parameter(
                "gamma",
                format!("per-step schedule shorter than {} steps", n_cols),
            ));
        }
        if self.is_time_homogeneous() {
            return self.at(0).validate();
        }
        (0..n_cols).try_for_each(|t| self.at(t).validate())
    }
}

/// GARCH(1,1) volatility recursion parameters.
///
/// ```text
/// sigma²[t] = (1 - xi - zeta) kappa sigma0²
///           + xi sigma²[t-1] (eps[t-1] - lambda)²
///           + zeta sigma²[t-1]
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GarchParams {
    /// Scale of the long-run base variance, `kappa sigma0²`.
    pub kappa: f64,
    /// Weight on the previous shock.
    pub xi: f64,
    /// Leverage shift applied to the previous innovation.
    pub lambda: f64,
    /// Weight on the previous variance.
    pub zeta: f64,
    /// Initial conditional volatility.
    pub sigma0: f64,
}

impl GarchParams {
    /// Creates GARCH parameters.
    pub fn new(kappa: f64, xi: f64, lambda: f64, zeta: f64, sigma0: f64) -> Self {
        Self {
            kappa,
            xi,
            lambda,
            zeta,
            sigma0,
        }
    }

    /// Weight of the long-run base level, `1 - xi - zeta`.
    #[inline]
    pub fn persistence_gap(&self) -> f64 {
        1.0 - self.xi - self.zeta
    }

    /// Constant term of the variance recursion, `(1 - xi - zeta) kappa sigma0²`.
    #[inline]
    pub fn base_variance(&self) -> f64 {
        self.persistence_gap() * self.kappa * self.sigma0 * self.sigma0
    }

    /// Validates the recursion parameters.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` for non-finite values, a negative
    /// `sigma0`, `kappa`, `xi` or `zeta`, or `xi + zeta ≥ 1`.
    pub fn validate(&self) -> Result<(), PricingError> {
        let fields = [
            ("kappa", self.kappa),
            ("xi", self.xi),
            ("lambda", self.lambda),
            ("zeta", self.zeta),
            ("sigma0", self.sigma0),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(PricingError::invalid_parameter(
                    name,
                    format!("must be finite, got {}", value),
                ));
            }
        }
        for (name, value) in [
            ("sigma0", self.sigma0),
            ("kappa", self.kappa),
            ("xi", self.xi),
            ("zeta", self.zeta),
        ] {
            if value < 0.0 {
                return Err(PricingError::invalid_parameter(
                    name,
                    format!("must be non-negative, got {}", value),
                ));
            }
        }
        if self.persistence_gap() <= 0.0 {
            return Err(PricingError::invalid_parameter(
                "xi+zeta",
                format!(
                    "stationarity requires xi + zeta < 1, got {}",
                    self.xi + self.zeta
                ),
            ));
        }
        Ok(())
    }
}

/// Full parameter set for one simulation.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::{GarchParams, ModelParameters, ShapeParams};
///
/// let params = ModelParameters::new(
///     ShapeParams::fixed(1.2, 1.0, 0.0, 1.0),
///     GarchParams::new(0.05, 0.1, 0.3, 0.2, 0.01),
///     100.0,
/// );
/// assert_eq!(params.y0, 0.0);
/// assert!(params.validate(31).is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelParameters {
    /// Innovation shape.
    pub shape: ShapeParams,
    /// Volatility recursion.
    pub garch: GarchParams,
    /// Initial asset price `S0`.
    pub spot: f64,
    /// Initial log-return `y0`.
    pub y0: f64,
}

impl ModelParameters {
    /// Creates parameters with `y0 = 0`.
    pub fn new(shape: ShapeParams, garch: GarchParams, spot: f64) -> Self {
        Self {
            shape,
            garch,
            spot,
            y0: 0.0,
        }
    }

    /// Returns a copy with initial log-return `y0`.
    pub fn with_y0(mut self, y0: f64) -> Self {
        self.y0 = y0;
        self
    }

    /// Validates the parameters for an `n_cols`-column simulation.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` on the first violated constraint.
    pub fn validate(&self, n_cols: usize) -> Result<(), PricingError> {
        if !(self.spot.is_finite() && self.spot > 0.0) {
            return Err(PricingError::invalid_parameter(
                "spot",
                format!("must be positive and finite, got {}", self.spot),
            ));
        }
        if !self.y0.is_finite() {
            return Err(PricingError::invalid_parameter(
                "y0",
                format!("must be finite, got {}", self.y0),
            ));
        }
        self.garch.validate()?;
        self.shape.validate(n_cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn valid_garch() -> GarchParams {
        GarchParams::new(0.05, 0.1, 0.3, 0.2, 0.01)
    }

    #[test]
    fn test_standard_shape_has_unit_variance() {
        let shape = NtsShape::standard(1.2, 1.0, 0.3);
        assert_relative_eq!(shape.variance(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shape_rejects_alpha_outside_range() {
        for alpha in [0.0, 2.0, -0.5, f64::NAN] {
            let err = NtsShape::new(alpha, 1.0, 0.0, 1.0).validate().unwrap_err();
            assert!(matches!(
                err,
                PricingError::InvalidParameter { name: "alpha", .. }
            ));
        }
    }

    #[test]
    fn test_shape_rejects_non_positive_theta() {
        let err = NtsShape::new(1.0, 0.0, 0.0, 1.0).validate().unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidParameter { name: "theta", .. }
        ));
    }

    #[test]
    fn test_garch_rejects_non_stationary() {
        let garch = GarchParams::new(0.05, 0.6, 0.0, 0.4, 0.01);
        let err = garch.validate().unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidParameter {
                name: "xi+zeta",
                ..
            }
        ));
    }

    #[test]
    fn test_garch_rejects_negative_sigma0() {
        let mut garch = valid_garch();
        garch.sigma0 = -0.01;
        assert!(matches!(
            garch.validate(),
            Err(PricingError::InvalidParameter { name: "sigma0", .. })
        ));
    }

    #[test]
    fn test_base_variance() {
        let garch = valid_garch();
        assert_relative_eq!(garch.persistence_gap(), 0.7, epsilon = 1e-15);
        assert_relative_eq!(garch.base_variance(), 0.7 * 0.05 * 1e-4, epsilon = 1e-18);
    }

    #[test]
    fn test_time_varying_schedule_must_cover_horizon() {
        let shape = ShapeParams {
            alpha: 1.2,
            theta: 1.0,
            beta: ParamSchedule::per_step(vec![0.0; 5]),
            gamma: ParamSchedule::constant(1.0),
        };
        assert!(shape.validate(5).is_ok());
        assert!(matches!(
            shape.validate(6),
            Err(PricingError::InvalidParameter { name: "beta", .. })
        ));
    }

    #[test]
    fn test_time_varying_step_is_validated() {
        let shape = ShapeParams {
            alpha: 1.2,
            theta: 1.0,
            beta: ParamSchedule::constant(0.0),
            gamma: ParamSchedule::per_step(vec![1.0, 1.0, -1.0]),
        };
        assert!(matches!(
            shape.validate(3),
            Err(PricingError::InvalidParameter { name: "gamma", .. })
        ));
    }

    #[test]
    fn test_model_parameters_reject_bad_spot() {
        let params = ModelParameters::new(ShapeParams::fixed(1.2, 1.0, 0.0, 1.0), valid_garch(), 0.0);
        assert!(matches!(
            params.validate(10),
            Err(PricingError::InvalidParameter { name: "spot", .. })
        ));
    }
}
