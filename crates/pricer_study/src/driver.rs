//! Batch study driver.
//!
//! The driver walks the design rows in order, prices each one and hands a
//! chunk to the [`ChunkSink`] whenever the 1-based row index reaches a multiple
//! of the chunk size or the last row. Chunks are aligned on global row
//! indices, so a resumed study writes the same files as an uninterrupted one.
//!
//! Row-level pricing failures are logged, recorded in the [`BatchSummary`] and
//! skipped. Configuration faults and persistence failures abort the run.

use std::time::{Duration, Instant};

use pricer_core::types::{PricingError, StudyError};
use tracing::{debug, info, warn};

use crate::sampler::{ParameterSampler, StudyRow};
use crate::sink::{ChunkSink, ResultRow};

/// A design row that could not be priced.
#[derive(Clone, Debug, PartialEq)]
pub struct RowFailure {
    /// 1-based design row index.
    pub row: usize,
    /// Error raised while pricing the row.
    pub error: PricingError,
}

/// Outcome of a study run.
#[derive(Clone, Debug, Default)]
pub struct BatchSummary {
    /// Rows skipped because they were already persisted.
    pub rows_skipped: usize,
    /// Rows priced and persisted.
    pub rows_priced: usize,
    /// Rows that failed to price.
    pub failures: Vec<RowFailure>,
    /// Chunks handed to the sink.
    pub chunks_written: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Number of rows attempted in this run.
    pub fn rows_attempted(&self) -> usize {
        self.rows_priced + self.failures.len()
    }
}

/// Sequential driver over a sampled design.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::StudyError;
/// use pricer_study::{BatchStudyDriver, ChunkSink, ParameterSampler, ResultRow};
///
/// #[derive(Default)]
/// struct Ranges(Vec<(usize, usize, usize)>);
///
/// impl ChunkSink for Ranges {
///     fn write_chunk(&mut self, first: usize, last: usize, rows: &[ResultRow]) -> Result<(), StudyError> {
///         self.0.push((first, last, rows.len()));
///         Ok(())
///     }
/// }
///
/// let driver = BatchStudyDriver::new(ParameterSampler::new(false), 10).unwrap();
/// let mut sink = Ranges::default();
/// let summary = driver.run(25, |_| Ok((0.1, 0.2)), &mut sink).unwrap();
/// assert_eq!(sink.0, vec![(1, 10, 10), (11, 20, 10), (21, 25, 5)]);
/// assert_eq!(summary.rows_priced, 25);
/// ```
#[derive(Clone, Debug)]
pub struct BatchStudyDriver {
    sampler: ParameterSampler,
    chunk_size: usize,
    start_row: usize,
}

impl BatchStudyDriver {
    /// Creates a driver persisting every `chunk_size` rows.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Config` if `chunk_size` is zero.
    pub fn new(sampler: ParameterSampler, chunk_size: usize) -> Result<Self, StudyError> {
        if chunk_size == 0 {
            return Err(StudyError::Config("chunk_size must be positive".into()));
        }
        Ok(Self {
            sampler,
            chunk_size,
            start_row: 0,
        })
    }

    /// Skips the first `completed` rows, e.g. those already on disk.
    pub fn with_start_row(mut self, completed: usize) -> Self {
        self.start_row = completed;
        self
    }

    /// Returns the chunk size.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the sampler.
    #[inline]
    pub fn sampler(&self) -> &ParameterSampler {
        &self.sampler
    }

    /// Runs the study over `n_sim` design rows.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Persistence` from the sink and `StudyError::Pricing`
    /// for pricing errors that are not row-local.
    pub fn run<F, S>(
        &self,
        n_sim: usize,
        mut price_row: F,
        sink: &mut S,
    ) -> Result<BatchSummary, StudyError>
    where
        F: FnMut(&StudyRow) -> Result<(f64, f64), PricingError>,
        S: ChunkSink + ?Sized,
    {
        let started = Instant::now();
        let design = self.sampler.sample(n_sim)?;
        let first = self.start_row.min(n_sim);
        let mut summary = BatchSummary {
            rows_skipped: first,
            ..BatchSummary::default()
        };

        info!(
            n_sim,
            chunk_size = self.chunk_size,
            skew_mode = self.sampler.skew_mode(),
            resume_after = first,
            "starting study"
        );

        let mut chunk: Vec<ResultRow> = Vec::with_capacity(self.chunk_size);
        let mut chunk_first = first + 1;

        for (offset, params) in design.iter().enumerate().skip(first) {
            let row = offset + 1;
            match price_row(params) {
                Ok((call_price, put_price)) => {
                    debug!(row, call_price, put_price, "row priced");
                    chunk.push(ResultRow {
                        row,
                        params: *params,
                        call_price,
                        put_price,
                    });
                    summary.rows_priced += 1;
                }
                Err(error) if error.is_row_recoverable() => {
                    warn!(row, %error, "row skipped");
                    summary.failures.push(RowFailure { row, error });
                }
                Err(error) => return Err(error.into()),
            }

            if row % self.chunk_size == 0 || row == n_sim {
                sink.write_chunk(chunk_first, row, &chunk)?;
                summary.chunks_written += 1;
                chunk.clear();
                chunk_first = row + 1;
            }
        }

        summary.elapsed = started.elapsed();
        info!(
            rows_priced = summary.rows_priced,
            rows_failed = summary.failures.len(),
            chunks = summary.chunks_written,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "study finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(usize, usize, Vec<usize>)>);

    impl ChunkSink for Recorder {
        fn write_chunk(
            &mut self,
            first_row: usize,
            last_row: usize,
            rows: &[ResultRow],
        ) -> Result<(), StudyError> {
            self.0
                .push((first_row, last_row, rows.iter().map(|r| r.row).collect()));
            Ok(())
        }
    }

    fn driver(chunk: usize) -> BatchStudyDriver {
        BatchStudyDriver::new(ParameterSampler::new(false), chunk).unwrap()
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(
            BatchStudyDriver::new(ParameterSampler::new(false), 0),
            Err(StudyError::Config(_))
        ));
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_chunk() {
        let mut sink = Recorder::default();
        let summary = driver(5).run(10, |_| Ok((0.0, 0.0)), &mut sink).unwrap();
        assert_eq!(sink.0.len(), 2);
        assert_eq!(summary.chunks_written, 2);
        assert_eq!(sink.0[1].0, 6);
        assert_eq!(sink.0[1].1, 10);
    }

    #[test]
    fn test_zero_rows() {
        let mut sink = Recorder::default();
        let summary = driver(5).run(0, |_| Ok((0.0, 0.0)), &mut sink).unwrap();
        assert!(sink.0.is_empty());
        assert_eq!(summary.rows_attempted(), 0);
    }

    #[test]
    fn test_recoverable_failure_is_skipped() {
        let mut sink = Recorder::default();
        let mut calls = 0;
        let summary = driver(4)
            .run(
                6,
                |_| {
                    calls += 1;
                    if calls == 3 {
                        Err(PricingError::instability("branch cut"))
                    } else {
                        Ok((0.1, 0.1))
                    }
                },
                &mut sink,
            )
            .unwrap();
        assert_eq!(summary.rows_priced, 5);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].row, 3);
        assert_eq!(sink.0[0], (1, 4, vec![1, 2, 4]));
        assert_eq!(sink.0[1], (5, 6, vec![5, 6]));
    }

    #[test]
    fn test_config_error_aborts() {
        let mut sink = Recorder::default();
        let err = driver(4)
            .run(
                6,
                |_| Err(PricingError::InvalidConfig("no workers".into())),
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, StudyError::Pricing(_)));
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_resume_keeps_chunk_alignment() {
        let mut full = Recorder::default();
        driver(10).run(25, |_| Ok((0.0, 0.0)), &mut full).unwrap();

        let mut resumed = Recorder::default();
        let summary = driver(10)
            .with_start_row(10)
            .run(25, |_| Ok((0.0, 0.0)), &mut resumed)
            .unwrap();
        assert_eq!(summary.rows_skipped, 10);
        assert_eq!(resumed.0, full.0[1..].to_vec());
    }

    #[test]
    fn test_resume_past_end_is_noop() {
        let mut sink = Recorder::default();
        let summary = driver(10)
            .with_start_row(40)
            .run(25, |_| Ok((0.0, 0.0)), &mut sink)
            .unwrap();
        assert!(sink.0.is_empty());
        assert_eq!(summary.rows_skipped, 25);
    }
}
