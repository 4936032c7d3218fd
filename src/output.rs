//! CSV output.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::Result;

/// Timestamped default output file, e.g. `tmp/fans_20240131_084500.csv`.
pub fn default_output_path(started_at: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("tmp/fans_{}.csv", started_at.format("%Y%m%d_%H%M%S")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Start a fresh file, discarding any previous content.
    Truncate,
    /// Add rows after whatever the file already holds.
    Append,
}

/// Anything that accepts ordered rows of strings, headed by one header row.
pub trait RowSink {
    /// Write the header row. Calling this more than once has no effect.
    fn write_header(&mut self, columns: &[&str]) -> Result<()>;

    fn write_row(&mut self, values: &[&str]) -> Result<()>;

    /// Flush everything to the underlying storage.
    fn finish(&mut self) -> Result<()>;
}

/// A [`RowSink`] backed by a CSV file.
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    header_written: bool,
    rows: usize,
}

impl CsvSink {
    /// Open (creating parent directories as needed) the file at `path`.
    ///
    /// Appending to a file that already has content keeps its header, so
    /// [`RowSink::write_header`] becomes a no-op.
    pub fn open(path: impl AsRef<Path>, mode: WriteMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Truncate => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };
        let file = options.open(&path)?;
        let has_content = mode == WriteMode::Append && file.metadata()?.len() > 0;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        debug!("Writing CSV to {:?} ({:?})", path, mode);
        Ok(Self {
            writer,
            path,
            header_written: has_content,
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written through this sink (the header is not counted).
    pub fn rows_written(&self) -> usize {
        self.rows
    }
}

impl RowSink for CsvSink {
    fn write_header(&mut self, columns: &[&str]) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.writer.write_record(columns)?;
        self.writer.flush()?;
        self.header_written = true;
        Ok(())
    }

    fn write_row(&mut self, values: &[&str]) -> Result<()> {
        self.writer.write_record(values)?;
        // keep the file usable if the run dies halfway
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
