//! Parallel fan-out of independent path computations.
//!
//! [`ParallelPathDriver`] owns a Rayon thread pool sized at construction and
//! reused for every call. Rows are statically partitioned into one contiguous
//! block per worker; each block writes into its own disjoint slice of the
//! output buffer, so results land in original row order whatever the
//! completion order.
//!
//! A worker error, or a panic inside a worker, becomes
//! [`PricingError::WorkerFailure`] (or the worker's own error) for the whole
//! call. Partial output is dropped. The pool stays usable afterwards.

use std::panic::{catch_unwind, AssertUnwindSafe};

use pricer_core::types::{PathMatrix, PricingError};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

/// Deterministic parallel driver over independent rows.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::ParallelPathDriver;
///
/// let driver = ParallelPathDriver::new(2).unwrap();
/// let m = driver
///     .run(5, 3, |row, out| {
///         out.iter_mut().enumerate().for_each(|(t, v)| *v = (row * 10 + t) as f64);
///         Ok(())
///     })
///     .unwrap();
/// assert_eq!(m.row(4), &[40.0, 41.0, 42.0]);
/// ```
pub struct ParallelPathDriver {
    pool: ThreadPool,
    n_workers: usize,
}

impl std::fmt::Debug for ParallelPathDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelPathDriver")
            .field("n_workers", &self.n_workers)
            .finish()
    }
}

impl ParallelPathDriver {
    /// Builds a driver with `n_workers` threads.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` if `n_workers` is zero or the
    /// pool cannot be built.
    pub fn new(n_workers: usize) -> Result<Self, PricingError> {
        if n_workers == 0 {
            return Err(PricingError::InvalidConfig(
                "worker count must be positive".to_string(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .thread_name(|i| format!("nts-path-{}", i))
            .build()
            .map_err(|e| PricingError::InvalidConfig(format!("thread pool: {}", e)))?;
        debug!(n_workers, "path worker pool initialised");
        Ok(Self { pool, n_workers })
    }

    /// Returns the pool size.
    #[inline]
    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    /// Rows per block for a static partition of `n_rows`.
    #[inline]
    fn block_rows(&self, n_rows: usize) -> usize {
        n_rows.div_ceil(self.n_workers).max(1)
    }

    /// Fills an `n_rows × n_cols` matrix, one row per `worker(row, out)` call.
    ///
    /// # Errors
    ///
    /// Returns the first worker error in row order, or
    /// `PricingError::WorkerFailure` if a worker panicked.
    pub fn run<F>(&self, n_rows: usize, n_cols: usize, worker: F) -> Result<PathMatrix, PricingError>
    where
        F: Fn(usize, &mut [f64]) -> Result<(), PricingError> + Sync,
    {
        self.run_with(n_rows, n_cols, || (), |_, row, out| worker(row, out))
    }

    /// Like [`run`](Self::run), with a scratch value created once per block.
    ///
    /// `init` builds the scratch (e.g. per-path buffers) so rows in the same
    /// block reuse it without allocating.
    ///
    /// # Errors
    ///
    /// As for [`run`](Self::run).
    pub fn run_with<W, I, F>(
        &self,
        n_rows: usize,
        n_cols: usize,
        init: I,
        worker: F,
    ) -> Result<PathMatrix, PricingError>
    where
        I: Fn() -> W + Sync,
        F: Fn(&mut W, usize, &mut [f64]) -> Result<(), PricingError> + Sync,
    {
        let mut matrix = PathMatrix::zeros(n_rows, n_cols);
        if n_rows == 0 || n_cols == 0 {
            return Ok(matrix);
        }
        let block_rows = self.block_rows(n_rows);

        let outcomes: Vec<Result<(), PricingError>> = self.pool.install(|| {
            matrix
                .as_mut_slice()
                .par_chunks_mut(block_rows * n_cols)
                .enumerate()
                .map(|(block, slice)| {
                    guarded(|| {
                        let mut scratch = init();
                        for (k, out) in slice.chunks_mut(n_cols).enumerate() {
                            worker(&mut scratch, block * block_rows + k, out)?;
                        }
                        Ok(())
                    })
                })
                .collect()
        });

        outcomes.into_iter().collect::<Result<(), _>>()?;
        Ok(matrix)
    }

    /// Maps every row index through `f`, returning results in row order.
    ///
    /// # Errors
    ///
    /// As for [`run`](Self::run).
    pub fn map_rows<T, F>(&self, n_rows: usize, f: F) -> Result<Vec<T>, PricingError>
    where
        T: Send,
        F: Fn(usize) -> Result<T, PricingError> + Sync,
    {
        let block_rows = self.block_rows(n_rows);
        let n_blocks = n_rows.div_ceil(block_rows);

        let blocks: Vec<Result<Vec<T>, PricingError>> = self.pool.install(|| {
            (0..n_blocks)
                .into_par_iter()
                .map(|block| {
                    guarded(|| {
                        let start = block * block_rows;
                        let end = (start + block_rows).min(n_rows);
                        (start..end).map(&f).collect()
                    })
                })
                .collect()
        });

        let mut rows = Vec::with_capacity(n_rows);
        for block in blocks {
            rows.extend(block?);
        }
        Ok(rows)
    }
}

/// Runs `task`, turning a panic into `PricingError::WorkerFailure`.
fn guarded<T>(task: impl FnOnce() -> Result<T, PricingError>) -> Result<T, PricingError> {
    match catch_unwind(AssertUnwindSafe(task)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(PricingError::worker(msg))
        }
    }
}
