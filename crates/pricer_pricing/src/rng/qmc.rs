//! Quasi-Monte Carlo low-discrepancy sequences.
//!
//! [`HaltonSequence`] is the radical-inverse sequence in the first `d` prime
//! bases. Enumeration starts at index 1, so the all-zero point is never
//! produced.

use pricer_core::types::{PathMatrix, PricingError};

/// Prime bases, one per dimension.
const PRIMES: [u64; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Maximum supported dimension of a [`HaltonSequence`].
pub const MAX_HALTON_DIMENSION: usize = PRIMES.len();

/// Trait for low-discrepancy sequences used in quasi-Monte Carlo methods.
///
/// Points cover the unit hypercube more evenly than pseudo-random draws,
/// which makes them suitable for parameter designs.
pub trait LowDiscrepancySequence {
    /// Returns the dimensionality of the sequence.
    fn dimension(&self) -> usize;

    /// Advances the sequence and returns the next point.
    ///
    /// The slice has `dimension()` values, each in the interval [0, 1).
    fn next_point(&mut self) -> &[f64];

    /// Resets the sequence to its initial state.
    fn reset(&mut self);

    /// Skips ahead by `n` points.
    fn skip(&mut self, n: usize);
}

/// Halton sequence generator.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::{HaltonSequence, LowDiscrepancySequence};
///
/// let mut halton = HaltonSequence::new(2).unwrap();
/// assert_eq!(halton.next_point(), &[0.5, 1.0 / 3.0]);
/// assert_eq!(halton.next_point(), &[0.25, 2.0 / 3.0]);
/// ```
#[derive(Clone, Debug)]
pub struct HaltonSequence {
    /// Index of the last emitted point (0 before the first call).
    index: u64,
    bases: Vec<u64>,
    point: Vec<f64>,
}

impl HaltonSequence {
    /// Creates a sequence of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` if `dimension` is zero or
    /// exceeds [`MAX_HALTON_DIMENSION`].
    pub fn new(dimension: usize) -> Result<Self, PricingError> {
        if dimension == 0 || dimension > MAX_HALTON_DIMENSION {
            return Err(PricingError::InvalidConfig(format!(
                "Halton dimension must be in [1, {}], got {}",
                MAX_HALTON_DIMENSION, dimension
            )));
        }
        Ok(Self {
            index: 0,
            bases: PRIMES[..dimension].to_vec(),
            point: vec![0.0; dimension],
        })
    }

    /// Returns the index of the last emitted point.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Radical inverse of `index` in `base`.
    fn radical_inverse(mut index: u64, base: u64) -> f64 {
        let inv_base = 1.0 / base as f64;
        let mut f = inv_base;
        let mut result = 0.0;
        while index > 0 {
            result += f * (index % base) as f64;
            index /= base;
            f *= inv_base;
        }
        result
    }
}

impl LowDiscrepancySequence for HaltonSequence {
    #[inline]
    fn dimension(&self) -> usize {
        self.bases.len()
    }

    fn next_point(&mut self) -> &[f64] {
        self.index += 1;
        for (value, &base) in self.point.iter_mut().zip(&self.bases) {
            *value = Self::radical_inverse(self.index, base);
        }
        &self.point
    }

    fn reset(&mut self) {
        self.index = 0;
        self.point.iter_mut().for_each(|v| *v = 0.0);
    }

    #[inline]
    fn skip(&mut self, n: usize) {
        self.index += n as u64;
    }
}

/// Returns the first `n` Halton points in `dim` dimensions as an `n × dim` matrix.
///
/// # Errors
///
/// Returns `PricingError::InvalidConfig` for an unsupported dimension.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::halton_points;
///
/// let pts = halton_points(4, 3).unwrap();
/// assert_eq!(pts.shape(), (4, 3));
/// assert_eq!(pts.get(0, 0), 0.5);
/// ```
pub fn halton_points(n: usize, dim: usize) -> Result<PathMatrix, PricingError> {
    let mut seq = HaltonSequence::new(dim)?;
    let mut data = Vec::with_capacity(n * dim);
    for _ in 0..n {
        data.extend_from_slice(seq.next_point());
    }
    PathMatrix::from_vec(n, dim, data)
}
