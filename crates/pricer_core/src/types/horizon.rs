//! Conversion between maturity in years and simulation steps.
//!
//! Simulations run on a daily grid with a fixed number of trading days per
//! year. A maturity that does not fall on the grid is rounded **up** to the
//! next step, so the realised maturity may be slightly later than requested.

/// Trading days per year used to convert maturities to step counts.
pub const STEPS_PER_YEAR: f64 = 250.0;

/// Absolute tolerance below which `maturity × STEPS_PER_YEAR` is treated as integral.
const GRID_SNAP_TOLERANCE: f64 = 1e-9;

/// Returns the number of steps covering `maturity_years`.
///
/// Computes `ceil(maturity_years × STEPS_PER_YEAR)`. Products within
/// `1e-9` of an integer snap to that integer so `30.0 / 250.0` maps to
/// exactly 30 steps instead of 31.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::steps_for_maturity;
///
/// assert_eq!(steps_for_maturity(30.0 / 250.0), 30);
/// assert_eq!(steps_for_maturity(0.4), 100);
/// // 0.401 years = 100.25 days, realised on day 101
/// assert_eq!(steps_for_maturity(0.401), 101);
/// ```
pub fn steps_for_maturity(maturity_years: f64) -> usize {
    let days = maturity_years * STEPS_PER_YEAR;
    let nearest = days.round();
    if (days - nearest).abs() < GRID_SNAP_TOLERANCE {
        nearest.max(0.0) as usize
    } else {
        days.ceil().max(0.0) as usize
    }
}

/// Returns the maturity in years realised by `n_steps` daily steps.
#[inline]
pub fn maturity_for_steps(n_steps: usize) -> f64 {
    n_steps as f64 / STEPS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_grid_points() {
        assert_eq!(steps_for_maturity(1.0), 250);
        assert_eq!(steps_for_maturity(0.12), 30);
        assert_eq!(steps_for_maturity(0.0), 0);
    }

    #[test]
    fn test_off_grid_rounds_up() {
        // 0.4 + 0.6 * 0.5 = 0.7 years = 175 days exactly
        assert_eq!(steps_for_maturity(0.7), 175);
        // 0.7013 years = 175.325 days -> 176
        assert_eq!(steps_for_maturity(0.7013), 176);
        // just past a grid point still moves to the next day
        assert_eq!(steps_for_maturity(0.4 + 1e-6), 101);
    }

    #[test]
    fn test_round_trip() {
        for n in [1usize, 30, 100, 175, 250] {
            assert_eq!(steps_for_maturity(maturity_for_steps(n)), n);
        }
        assert_relative_eq!(maturity_for_steps(125), 0.5, epsilon = 1e-15);
    }
}
