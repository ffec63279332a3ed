//! Durable chunk output.
//!
//! A chunk is the set of result rows covering one contiguous range of design
//! rows. [`CsvChunkWriter`] writes each chunk to its own CSV file named after
//! the range, e.g. `study_rows_000011_000020.csv` for rows 11 to 20 (1-based,
//! inclusive). Files are written to a temporary name and renamed into place,
//! so a file under the final name is always complete.

use std::fs;
use std::path::{Path, PathBuf};

use pricer_core::types::StudyError;
use tracing::{debug, info};

use crate::sampler::StudyRow;

/// CSV header of every chunk file.
pub const CSV_HEADER: [&str; 16] = [
    "row",
    "alpha",
    "theta",
    "beta",
    "gamma",
    "a1",
    "moneyness",
    "tao",
    "kappa",
    "xi",
    "zeta",
    "sigma_error",
    "lambda",
    "b",
    "call_price",
    "put_price",
];

const FILE_PREFIX: &str = "study_rows_";
const FILE_SUFFIX: &str = ".csv";

/// A priced design row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResultRow {
    /// 1-based design row index.
    pub row: usize,
    /// Sampled parameters.
    pub params: StudyRow,
    /// Call price as a fraction of spot.
    pub call_price: f64,
    /// Put price as a fraction of spot.
    pub put_price: f64,
}

impl ResultRow {
    /// Returns the CSV fields in [`CSV_HEADER`] order.
    pub fn to_record(&self) -> Vec<String> {
        let p = &self.params;
        vec![
            self.row.to_string(),
            p.alpha.to_string(),
            p.theta.to_string(),
            p.beta.to_string(),
            p.gamma.to_string(),
            p.a1.to_string(),
            p.moneyness.to_string(),
            p.tao.to_string(),
            p.kappa.to_string(),
            p.xi.to_string(),
            p.zeta.to_string(),
            p.sigma_error.to_string(),
            p.lambda.to_string(),
            p.b.map(|b| b.to_string()).unwrap_or_default(),
            self.call_price.to_string(),
            self.put_price.to_string(),
        ]
    }
}

/// Append-only destination for completed chunks.
pub trait ChunkSink {
    /// Persists the rows of design range `first_row..=last_row` (1-based).
    ///
    /// `rows` may hold fewer entries than the range when some rows failed.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Persistence` if the chunk cannot be stored.
    fn write_chunk(
        &mut self,
        first_row: usize,
        last_row: usize,
        rows: &[ResultRow],
    ) -> Result<(), StudyError>;
}

/// Record of a written chunk file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenChunk {
    /// File path.
    pub path: PathBuf,
    /// First design row covered.
    pub first_row: usize,
    /// Last design row covered.
    pub last_row: usize,
    /// Number of result rows in the file.
    pub n_rows: usize,
}

/// Writes one CSV file per chunk into an output directory.
///
/// # Examples
///
/// ```rust
/// use pricer_study::CsvChunkWriter;
///
/// let dir = std::env::temp_dir().join("ntsgarch_doc_chunks");
/// let writer = CsvChunkWriter::new(&dir).unwrap();
/// assert!(writer
///     .chunk_path(11, 20)
///     .ends_with("study_rows_000011_000020.csv"));
/// ```
#[derive(Debug)]
pub struct CsvChunkWriter {
    output_dir: PathBuf,
    written: Vec<WrittenChunk>,
}

impl CsvChunkWriter {
    /// Creates a writer, creating `output_dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Persistence` if the directory cannot be created.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, StudyError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)
            .map_err(|e| StudyError::persistence(&output_dir, e.to_string()))?;
        Ok(Self {
            output_dir,
            written: Vec::new(),
        })
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the chunks written by this writer.
    pub fn written(&self) -> &[WrittenChunk] {
        &self.written
    }

    /// Path of the chunk covering `first_row..=last_row`.
    pub fn chunk_path(&self, first_row: usize, last_row: usize) -> PathBuf {
        self.output_dir.join(format!(
            "{}{:06}_{:06}{}",
            FILE_PREFIX, first_row, last_row, FILE_SUFFIX
        ))
    }

    /// Lists the row ranges of chunk files present in the output directory.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Persistence` if the directory cannot be read.
    pub fn existing_chunks(&self) -> Result<Vec<(usize, usize)>, StudyError> {
        let entries = fs::read_dir(&self.output_dir)
            .map_err(|e| StudyError::persistence(&self.output_dir, e.to_string()))?;
        let mut ranges: Vec<(usize, usize)> = entries
            .flatten()
            .filter_map(|entry| parse_chunk_name(&entry.file_name().to_string_lossy()))
            .collect();
        ranges.sort_unstable();
        Ok(ranges)
    }

    /// Number of leading design rows covered by contiguous chunk files.
    ///
    /// A restarted study resumes after this row.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Persistence` if the directory cannot be read, or
    /// if two chunk files cover overlapping row ranges (left behind by runs
    /// with different chunk sizes).
    pub fn completed_rows(&self) -> Result<usize, StudyError> {
        let mut next = 1;
        for (first, last) in self.existing_chunks()? {
            if first < next || last < first {
                return Err(StudyError::persistence(
                    self.chunk_path(first, last),
                    format!(
                        "chunk overlaps rows already covered up to {}; clear the directory or run fresh",
                        next - 1
                    ),
                ));
            }
            if first > next {
                break;
            }
            next = last + 1;
        }
        Ok(next - 1)
    }

    /// Removes every chunk file and leftover temporary chunk file from the
    /// output directory. Other files are left alone.
    ///
    /// Returns the number of files removed.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Persistence` if a file cannot be listed or removed.
    pub fn clear_chunks(&mut self) -> Result<usize, StudyError> {
        let entries = fs::read_dir(&self.output_dir)
            .map_err(|e| StudyError::persistence(&self.output_dir, e.to_string()))?;
        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_chunk = parse_chunk_name(&name).is_some()
                || name
                    .strip_suffix(".tmp")
                    .and_then(parse_chunk_name)
                    .is_some();
            if !is_chunk {
                continue;
            }
            let path = entry.path();
            fs::remove_file(&path).map_err(|e| StudyError::persistence(&path, e.to_string()))?;
            removed += 1;
        }
        self.written.clear();
        if removed > 0 {
            info!(removed, output_dir = %self.output_dir.display(), "cleared chunk files");
        }
        Ok(removed)
    }

    fn write_file(&self, path: &Path, rows: &[ResultRow]) -> Result<(), StudyError> {
        let tmp = path.with_extension("csv.tmp");
        let persist = |e: &dyn std::fmt::Display| StudyError::persistence(path, e.to_string());

        let mut writer = csv::Writer::from_path(&tmp).map_err(|e| persist(&e))?;
        writer.write_record(CSV_HEADER).map_err(|e| persist(&e))?;
        for row in rows {
            writer.write_record(row.to_record()).map_err(|e| persist(&e))?;
        }
        writer.flush().map_err(|e| persist(&e))?;
        drop(writer);

        fs::rename(&tmp, path).map_err(|e| persist(&e))
    }
}

impl ChunkSink for CsvChunkWriter {
    fn write_chunk(
        &mut self,
        first_row: usize,
        last_row: usize,
        rows: &[ResultRow],
    ) -> Result<(), StudyError> {
        let path = self.chunk_path(first_row, last_row);
        debug!(path = %path.display(), first_row, last_row, "writing chunk");
        self.write_file(&path, rows)?;

        info!(
            path = %path.display(),
            first_row,
            last_row,
            n_rows = rows.len(),
            "chunk written"
        );
        self.written.push(WrittenChunk {
            path,
            first_row,
            last_row,
            n_rows: rows.len(),
        });
        Ok(())
    }
}

/// Parses `study_rows_{first}_{last}.csv` into its row range.
fn parse_chunk_name(name: &str) -> Option<(usize, usize)> {
    let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    let (first, last) = stem.split_once('_')?;
    Some((first.parse().ok()?, last.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ParameterSampler;

    fn result_rows(first: usize, n: usize) -> Vec<ResultRow> {
        ParameterSampler::new(false)
            .sample(n)
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(k, params)| ResultRow {
                row: first + k,
                params,
                call_price: 0.01,
                put_price: 0.02,
            })
            .collect()
    }

    #[test]
    fn test_parse_chunk_name() {
        assert_eq!(parse_chunk_name("study_rows_000001_000010.csv"), Some((1, 10)));
        assert_eq!(parse_chunk_name("study_rows_000001_000010.csv.tmp"), None);
        assert_eq!(parse_chunk_name("notes.txt"), None);
    }

    #[test]
    fn test_write_chunk_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvChunkWriter::new(dir.path()).unwrap();
        writer.write_chunk(1, 3, &result_rows(1, 3)).unwrap();

        let mut reader = csv::Reader::from_path(writer.chunk_path(1, 3)).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, CSV_HEADER);
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[2][0], "3");
        assert_eq!(&records[0][13], "");
        assert_eq!(writer.written().len(), 1);
    }

    #[test]
    fn test_completed_rows_stops_at_gap() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvChunkWriter::new(dir.path()).unwrap();
        assert_eq!(writer.completed_rows().unwrap(), 0);

        writer.write_chunk(1, 10, &result_rows(1, 10)).unwrap();
        writer.write_chunk(11, 20, &result_rows(11, 10)).unwrap();
        writer.write_chunk(31, 40, &result_rows(31, 10)).unwrap();
        fs::write(dir.path().join("study_rows_000021_000030.csv.tmp"), "partial").unwrap();

        assert_eq!(writer.completed_rows().unwrap(), 20);
        assert_eq!(
            writer.existing_chunks().unwrap(),
            vec![(1, 10), (11, 20), (31, 40)]
        );
    }

    #[test]
    fn test_overlapping_chunks_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvChunkWriter::new(dir.path()).unwrap();
        writer.write_chunk(1, 10, &result_rows(1, 10)).unwrap();
        writer.write_chunk(11, 20, &result_rows(11, 10)).unwrap();
        writer.write_chunk(1, 5, &result_rows(1, 5)).unwrap();
        writer.write_chunk(6, 10, &result_rows(6, 5)).unwrap();

        let err = writer.completed_rows().unwrap_err();
        assert!(matches!(err, StudyError::Persistence { .. }));
    }

    #[test]
    fn test_clear_chunks_keeps_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvChunkWriter::new(dir.path()).unwrap();
        writer.write_chunk(1, 10, &result_rows(1, 10)).unwrap();
        writer.write_chunk(11, 20, &result_rows(11, 10)).unwrap();
        fs::write(dir.path().join("study_rows_000021_000030.csv.tmp"), "partial").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        assert_eq!(writer.clear_chunks().unwrap(), 3);
        assert!(writer.existing_chunks().unwrap().is_empty());
        assert!(writer.written().is_empty());
        assert_eq!(writer.completed_rows().unwrap(), 0);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_unwritable_directory_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = CsvChunkWriter::new(blocker.join("sub")).unwrap_err();
        assert!(matches!(err, StudyError::Persistence { .. }));
    }
}
