//! Row-major matrix for simulated paths.
//!
//! Innovations, conditional volatilities and prices share the same layout:
//! one row per independent simulation path, one column per time step.
//!
//! # Memory Layout
//!
//! Values are stored contiguously in row-major order:
//! `data[path_idx * n_cols + step_idx]`. Whole paths are therefore
//! contiguous slices, which lets workers own disjoint rows without copying.

use super::error::PricingError;

/// Row-major `n_rows × n_cols` matrix of `f64` path values.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PathMatrix;
///
/// let m = PathMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(m.n_rows(), 2);
/// assert_eq!(m.column(1), vec![2.0, 4.0]);
/// assert_eq!(m.last_column(), vec![2.0, 4.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PathMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl PathMatrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![0.0; n_rows * n_cols],
        }
    }

    /// Wraps a row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::DimensionMismatch` if `data.len() != n_rows * n_cols`.
    pub fn from_vec(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self, PricingError> {
        if data.len() != n_rows * n_cols {
            return Err(PricingError::DimensionMismatch {
                expected_rows: n_rows,
                expected_cols: n_cols,
                rows: if n_cols == 0 { 0 } else { data.len() / n_cols },
                cols: n_cols,
            });
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    /// Builds a matrix from equally sized rows.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::DimensionMismatch` if rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, PricingError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(PricingError::DimensionMismatch {
                    expected_rows: n_rows,
                    expected_cols: n_cols,
                    rows: n_rows,
                    cols: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    /// Number of rows (paths).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns (time steps).
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns `(n_rows, n_cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Returns the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.n_rows && col < self.n_cols);
        self.data[row * self.n_cols + col]
    }

    /// Sets the value at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n_rows && col < self.n_cols);
        self.data[row * self.n_cols + col] = value;
    }

    /// Returns path `row` as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.n_cols;
        &self.data[start..start + self.n_cols]
    }

    /// Returns path `row` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.n_cols;
        &mut self.data[start..start + self.n_cols]
    }

    /// Iterates over rows in path order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics, so an empty-column matrix yields no rows
        self.data.chunks_exact(self.n_cols.max(1)).take(self.n_rows)
    }

    /// Copies column `col` into a new vector.
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.rows().map(|r| r[col]).collect()
    }

    /// Copies the last column into a new vector.
    ///
    /// Returns an empty vector for a matrix without columns.
    pub fn last_column(&self) -> Vec<f64> {
        match self.n_cols {
            0 => Vec::new(),
            n => self.column(n - 1),
        }
    }

    /// Returns the first `n_rows` paths as a new matrix.
    pub fn head_rows(&self, n_rows: usize) -> Self {
        let n_rows = n_rows.min(self.n_rows);
        Self {
            n_rows,
            n_cols: self.n_cols,
            data: self.data[..n_rows * self.n_cols].to_vec(),
        }
    }

    /// Returns the underlying row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the underlying row-major buffer mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the matrix and returns its buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let m = PathMatrix::zeros(3, 4);
        assert_eq!(m.shape(), (3, 4));
        assert!(m.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_row_major_layout() {
        let m = PathMatrix::from_vec(2, 3, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap();
        assert_eq!(m.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(m.get(0, 2), 2.0);
        assert_eq!(m.column(0), vec![0.0, 10.0]);
    }

    #[test]
    fn test_from_vec_rejects_bad_length() {
        let err = PathMatrix::from_vec(2, 3, vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, PricingError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = PathMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, PricingError::DimensionMismatch { cols: 1, .. }));
    }

    #[test]
    fn test_head_rows() {
        let m = PathMatrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let head = m.head_rows(2);
        assert_eq!(head.shape(), (2, 1));
        assert_eq!(head.column(0), vec![1.0, 2.0]);
        assert_eq!(m.head_rows(10).n_rows(), 3);
    }

    #[test]
    fn test_set_and_row_mut() {
        let mut m = PathMatrix::zeros(2, 2);
        m.set(0, 1, 4.0);
        m.row_mut(1).copy_from_slice(&[7.0, 8.0]);
        assert_eq!(m.as_slice(), &[0.0, 4.0, 7.0, 8.0]);
        assert_eq!(m.last_column(), vec![4.0, 8.0]);
    }
}
