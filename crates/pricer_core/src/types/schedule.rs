//! Fixed or per-step parameter values.
//!
//! Distribution shape parameters such as skewness may either stay fixed over
//! the simulation horizon or follow a deterministic per-step sequence.

/// A model parameter that is either constant or indexed by time step.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::ParamSchedule;
///
/// let fixed = ParamSchedule::constant(0.25);
/// assert_eq!(fixed.at(0), 0.25);
/// assert_eq!(fixed.at(99), 0.25);
///
/// let varying = ParamSchedule::per_step(vec![0.1, 0.2, 0.3]);
/// assert_eq!(varying.at(1), 0.2);
/// assert!(varying.covers(3));
/// assert!(!varying.covers(4));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamSchedule {
    /// Same value at every step.
    Constant(f64),
    /// One value per step, indexed from step 0.
    PerStep(Vec<f64>),
}

impl ParamSchedule {
    /// Creates a constant schedule.
    #[inline]
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// Creates a per-step schedule.
    #[inline]
    pub fn per_step(values: Vec<f64>) -> Self {
        Self::PerStep(values)
    }

    /// Returns the value in force at `step`.
    ///
    /// Steps past the end of a per-step sequence hold its last value; callers
    /// that need strict coverage check [`covers`](Self::covers) first.
    #[inline]
    pub fn at(&self, step: usize) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::PerStep(values) => match values.get(step) {
                Some(v) => *v,
                None => values.last().copied().unwrap_or(f64::NAN),
            },
        }
    }

    /// Returns `true` if the schedule defines a value for each of `n_steps` steps.
    #[inline]
    pub fn covers(&self, n_steps: usize) -> bool {
        match self {
            Self::Constant(_) => true,
            Self::PerStep(values) => values.len() >= n_steps,
        }
    }

    /// Returns `true` for a constant schedule.
    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

impl From<f64> for ParamSchedule {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<Vec<f64>> for ParamSchedule {
    fn from(values: Vec<f64>) -> Self {
        Self::PerStep(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_step_holds_last_value() {
        let s = ParamSchedule::per_step(vec![1.0, 2.0]);
        assert_eq!(s.at(5), 2.0);
    }

    #[test]
    fn test_empty_per_step_is_nan() {
        let s = ParamSchedule::per_step(vec![]);
        assert!(s.at(0).is_nan());
        assert!(!s.covers(1));
        assert!(s.covers(0));
    }

    #[test]
    fn test_conversions() {
        assert!(ParamSchedule::from(0.5).is_constant());
        assert!(!ParamSchedule::from(vec![0.5]).is_constant());
    }
}
