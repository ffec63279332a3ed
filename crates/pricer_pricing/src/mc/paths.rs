//! Risk-neutral NTS-GARCH path simulation.
//!
//! For path `i` with `n_cols = n_steps + 1` columns:
//!
//! ```text
//! eps[i, t]        ~ innovation law under the step-t shape
//! sigma[i, ·]      = GARCH recursion over eps[i, ·], sigma[i, 0] = sigma0
//! logret[i, 0]     = y0
//! logret[i, t]     = r - d - w(sigma[i, t]) + sigma[i, t] eps[i, t],   t >= 1
//! price[i, t]      = S0 exp(sum_{s <= t} logret[i, s])
//! ```
//!
//! `w(sigma) = log φ(-i sigma)` is the drift correction recovered from the
//! law's characteristic exponent, re-evaluated at every path and step because
//! `sigma` is path dependent. Rates are per step (`dt = 1`).
//!
//! # Reproducibility
//!
//! Path `i` draws only from `PricerRng::for_stream(seed, i)`. Per-path output
//! is therefore identical whatever `n_paths` or the worker count.
//!
//! # Memory Layout
//!
//! All matrices are row-major [`PathMatrix`] values; column 0 is `t = 0`.

use pricer_core::types::{PathMatrix, PricingError};
use pricer_models::models::{GarchVolatility, InnovationLaw, ModelParameters, NtsShape, StdNts};

use tracing::warn;

use super::config::MonteCarloConfig;
use super::parallel::ParallelPathDriver;
use crate::rng::PricerRng;

/// Per-draw sampling cost above which a simulation is logged as expensive.
pub const EXPENSIVE_DRAW_COST: usize = 1_000;

/// Innovation, volatility and price matrices of one simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedPaths {
    /// Innovation draws.
    pub innovations: PathMatrix,
    /// Conditional volatilities.
    pub volatilities: PathMatrix,
    /// Asset prices.
    pub prices: PathMatrix,
}

/// Per-path scratch buffers.
#[derive(Clone, Debug)]
pub struct PathBuffers {
    innovations: Vec<f64>,
    volatilities: Vec<f64>,
}

impl PathBuffers {
    /// Allocates buffers for `n_cols` columns.
    pub fn new(n_cols: usize) -> Self {
        Self {
            innovations: vec![0.0; n_cols],
            volatilities: vec![0.0; n_cols],
        }
    }

    /// Innovations of the last simulated path.
    #[inline]
    pub fn innovations(&self) -> &[f64] {
        &self.innovations
    }

    /// Volatilities of the last simulated path.
    #[inline]
    pub fn volatilities(&self) -> &[f64] {
        &self.volatilities
    }
}

/// Shape parameters resolved for every column of one simulation.
enum ResolvedShape {
    Constant(NtsShape),
    PerStep(Vec<NtsShape>),
}

impl ResolvedShape {
    fn new(params: &ModelParameters, n_cols: usize) -> Self {
        if params.shape.is_time_homogeneous() {
            Self::Constant(params.shape.at(0))
        } else {
            Self::PerStep((0..n_cols).map(|t| params.shape.at(t)).collect())
        }
    }

    #[inline]
    fn at(&self, step: usize) -> &NtsShape {
        match self {
            Self::Constant(shape) => shape,
            Self::PerStep(shapes) => &shapes[step],
        }
    }

    /// Largest per-draw cost of `law` over the resolved steps.
    fn max_sampling_cost<L: InnovationLaw>(&self, law: &L) -> usize {
        match self {
            Self::Constant(shape) => law.sampling_cost(shape),
            Self::PerStep(shapes) => shapes
                .iter()
                .map(|shape| law.sampling_cost(shape))
                .max()
                .unwrap_or(1),
        }
    }
}

/// Validated inputs shared read-only by all path workers.
struct PathContext<'a, L> {
    law: &'a L,
    shapes: ResolvedShape,
    garch: GarchVolatility,
    spot: f64,
    y0: f64,
    carry: f64,
    seed: u64,
}

impl<L: InnovationLaw> PathContext<'_, L> {
    /// Simulates path `row` into `buffers`, writing prices to `prices`.
    fn simulate_row(
        &self,
        row: usize,
        buffers: &mut PathBuffers,
        prices: &mut [f64],
    ) -> Result<(), PricingError> {
        let n_cols = prices.len();
        buffers.innovations.resize(n_cols, 0.0);
        buffers.volatilities.resize(n_cols, 0.0);

        let mut rng = PricerRng::for_stream(self.seed, row as u64);
        for (t, eps) in buffers.innovations.iter_mut().enumerate() {
            *eps = self.law.sample(self.shapes.at(t), &mut rng)?;
        }
        self.garch
            .generate_row(&buffers.innovations, &mut buffers.volatilities);

        let mut cumulative = 0.0;
        for t in 0..n_cols {
            let log_return = if t == 0 {
                self.y0
            } else {
                let sigma = buffers.volatilities[t];
                let w = self
                    .law
                    .drift_correction(sigma, self.shapes.at(t))
                    .map_err(|e| annotate(e, row, t))?;
                self.carry - w + sigma * buffers.innovations[t]
            };
            cumulative += log_return;
            let price = self.spot * cumulative.exp();
            if !price.is_finite() {
                return Err(PricingError::instability(format!(
                    "price not finite at path {}, step {}",
                    row, t
                )));
            }
            prices[t] = price;
        }
        Ok(())
    }
}

fn annotate(err: PricingError, row: usize, step: usize) -> PricingError {
    match err {
        PricingError::NumericalInstability(msg) => PricingError::instability(format!(
            "{} (path {}, step {})",
            msg, row, step
        )),
        other => other,
    }
}

/// Risk-neutral path simulator, generic over the innovation law.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::{GarchParams, ModelParameters, ShapeParams};
/// use pricer_pricing::mc::{MonteCarloConfig, ParallelPathDriver, RiskNeutralPathSimulator};
///
/// let params = ModelParameters::new(
///     ShapeParams::fixed(1.2, 1.0, 0.0, 1.0),
///     GarchParams::new(0.05, 0.1, 0.3, 0.2, 0.01),
///     100.0,
/// );
/// let config = MonteCarloConfig::builder().n_paths(100).n_steps(10).build().unwrap();
/// let driver = ParallelPathDriver::new(2).unwrap();
///
/// let prices = RiskNeutralPathSimulator::nts()
///     .simulate_prices(&params, &config, &driver)
///     .unwrap();
/// assert_eq!(prices.shape(), (100, 11));
/// assert!(prices.column(0).iter().all(|&s| s == 100.0));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RiskNeutralPathSimulator<L = StdNts> {
    law: L,
}

impl RiskNeutralPathSimulator<StdNts> {
    /// Simulator driven by stdNTS innovations.
    pub fn nts() -> Self {
        Self { law: StdNts }
    }
}

impl<L: InnovationLaw> RiskNeutralPathSimulator<L> {
    /// Simulator driven by `law`.
    pub fn new(law: L) -> Self {
        Self { law }
    }

    /// Returns the innovation law.
    #[inline]
    pub fn law(&self) -> &L {
        &self.law
    }

    fn context(
        &self,
        params: &ModelParameters,
        config: &MonteCarloConfig,
    ) -> Result<PathContext<'_, L>, PricingError> {
        config.validate()?;
        params.validate(config.n_cols())?;
        let shapes = ResolvedShape::new(params, config.n_cols());
        let cost = shapes.max_sampling_cost(&self.law);
        if cost > EXPENSIVE_DRAW_COST {
            warn!(
                cost,
                n_paths = config.n_paths(),
                n_cols = config.n_cols(),
                "innovation draws are expensive for this shape (small alpha or large theta)"
            );
        }
        Ok(PathContext {
            law: &self.law,
            shapes,
            garch: GarchVolatility::new(params.garch)?,
            spot: params.spot,
            y0: params.y0,
            carry: config.rate() - config.dividend(),
            seed: config.seed(),
        })
    }

    /// Simulates a single path, returning its prices.
    ///
    /// `buffers` receive the path's innovations and volatilities.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` for invalid parameters, a failed draw or a
    /// drift correction outside tolerance.
    pub fn simulate_path(
        &self,
        params: &ModelParameters,
        config: &MonteCarloConfig,
        row: usize,
        buffers: &mut PathBuffers,
    ) -> Result<Vec<f64>, PricingError> {
        let ctx = self.context(params, config)?;
        let mut prices = vec![0.0; config.n_cols()];
        ctx.simulate_row(row, buffers, &mut prices)?;
        Ok(prices)
    }

    /// Simulates the price matrix only.
    ///
    /// # Errors
    ///
    /// Returns the first failing path's error; no partial matrix is returned.
    pub fn simulate_prices(
        &self,
        params: &ModelParameters,
        config: &MonteCarloConfig,
        driver: &ParallelPathDriver,
    ) -> Result<PathMatrix, PricingError> {
        let ctx = self.context(params, config)?;
        let n_cols = config.n_cols();
        driver.run_with(
            config.n_paths(),
            n_cols,
            || PathBuffers::new(n_cols),
            |buffers, row, out| ctx.simulate_row(row, buffers, out),
        )
    }

    /// Simulates innovation, volatility and price matrices.
    ///
    /// # Errors
    ///
    /// As for [`simulate_prices`](Self::simulate_prices).
    pub fn simulate(
        &self,
        params: &ModelParameters,
        config: &MonteCarloConfig,
        driver: &ParallelPathDriver,
    ) -> Result<SimulatedPaths, PricingError> {
        let ctx = self.context(params, config)?;
        let n_paths = config.n_paths();
        let n_cols = config.n_cols();

        let rows = driver.map_rows(n_paths, |row| {
            let mut buffers = PathBuffers::new(n_cols);
            let mut prices = vec![0.0; n_cols];
            ctx.simulate_row(row, &mut buffers, &mut prices)?;
            Ok((buffers, prices))
        })?;

        let mut innovations = Vec::with_capacity(n_paths * n_cols);
        let mut volatilities = Vec::with_capacity(n_paths * n_cols);
        let mut prices = Vec::with_capacity(n_paths * n_cols);
        for (buffers, row_prices) in rows {
            innovations.extend_from_slice(&buffers.innovations);
            volatilities.extend_from_slice(&buffers.volatilities);
            prices.extend_from_slice(&row_prices);
        }

        Ok(SimulatedPaths {
            innovations: PathMatrix::from_vec(n_paths, n_cols, innovations)?,
            volatilities: PathMatrix::from_vec(n_paths, n_cols, volatilities)?,
            prices: PathMatrix::from_vec(n_paths, n_cols, prices)?,
        })
    }
}
