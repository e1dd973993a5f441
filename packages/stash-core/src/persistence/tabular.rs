//! Append-only CSV log.
//!
//! Rows are ordered sequences of string fields. Appending rewrites the whole
//! file (existing rows followed by the new ones) through an atomic rename, so
//! a failed append leaves the previous contents in place. There is no file
//! locking: two concurrent appends to one path can lose rows.

use std::path::Path;

use crate::config::StoreConfig;
use crate::error::{Result, StashError};

use super::io_utils::{create_empty, read_if_exists, write_atomic};

/// One CSV record.
pub type Row = Vec<String>;

/// Reads and appends rows of a CSV file.
#[derive(Debug, Clone, Default)]
pub struct TabularLog {
    config: StoreConfig,
}

impl TabularLog {
    /// Creates a tabular log with the given configuration.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Reads every row of `path`.
    ///
    /// A missing file is created empty and yields no rows. Rows may have
    /// different field counts.
    ///
    /// # Errors
    /// `TabularCorrupt` if the file exists but is not valid CSV, including a
    /// quoted field that is never closed (never treated as empty), `FileUnreadable` if it cannot be read, or an I/O
    /// error if the empty file cannot be created.
    pub fn read_all(&self, path: impl AsRef<Path>) -> Result<Vec<Row>> {
        let path = path.as_ref();

        let bytes = match read_if_exists(path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::info!("File '{}' does not exist, creating empty", path.display());
                create_empty(path, &self.config)?;
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StashError::FileUnreadable {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let rows = self.parse(path, &bytes)?;
        tracing::debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// Appends `new_rows` after the existing rows of `path` and rewrites it.
    ///
    /// Returns the number of rows now stored.
    ///
    /// # Errors
    /// Any error of [`read_all`](Self::read_all); `Encode` if the combined
    /// rows cannot be serialized; an I/O error from the rewrite. The file
    /// keeps its previous contents on every error.
    pub fn append<R, F>(&self, path: impl AsRef<Path>, new_rows: &[R]) -> Result<usize>
    where
        R: AsRef<[F]>,
        F: AsRef<str>,
    {
        let path = path.as_ref();
        let existing = self.read_all(path)?;

        let encode_error = |e: &dyn std::fmt::Display| StashError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.config.csv_delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        for row in &existing {
            writer.write_record(row).map_err(|e| encode_error(&e))?;
        }
        for row in new_rows {
            writer
                .write_record(row.as_ref().iter().map(AsRef::<str>::as_ref))
                .map_err(|e| encode_error(&e))?;
        }
        let bytes = writer.into_inner().map_err(|e| encode_error(&e))?;

        write_atomic(path, &bytes, &self.config)?;

        let total = existing.len() + new_rows.len();
        tracing::debug!(
            "Appended {} rows to {} ({} total)",
            new_rows.len(),
            path.display(),
            total
        );
        Ok(total)
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Vec<Row>> {
        let corrupt = |reason: String| StashError::TabularCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.config.csv_delimiter)
            .from_reader(bytes);

        let mut rows = Vec::new();
        let mut last_start = None;
        for record in reader.records() {
            let record = record.map_err(|e| corrupt(e.to_string()))?;
            last_start = record.position().map(|p| p.byte() as usize);
            rows.push(record.iter().map(str::to_string).collect::<Row>());
        }

        // The reader closes a quote left open at end of input; reject it instead
        if let Some(start) = last_start {
            let tail = bytes.get(start..).unwrap_or_default();
            if tail.iter().filter(|&&b| b == b'"').count() % 2 == 1 {
                return Err(corrupt(format!(
                    "unterminated quoted field in record {}",
                    rows.len()
                )));
            }
        }

        Ok(rows)
    }
}

/// Reads a CSV file with the default store configuration.
///
/// See [`TabularLog::read_all`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    TabularLog::default().read_all(path)
}

/// Appends rows to a CSV file with the default store configuration.
///
/// See [`TabularLog::append`].
pub fn append_csv<R, F>(path: impl AsRef<Path>, new_rows: &[R]) -> Result<usize>
where
    R: AsRef<[F]>,
    F: AsRef<str>,
{
    TabularLog::default().append(path, new_rows)
}
