//! Per-operation result rows and their CSV sink.

use std::fs::OpenOptions;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use serde::Serialize;

use crate::HarnessError;

/// One CSV row. `ns_per_call` is empty unless timing was requested and
/// `max_error` is empty for operations without an accuracy model.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub operation: String,
    pub iterations: u64,
    pub ns_per_call: Option<f64>,
    pub max_error: Option<f64>,
}

pub struct CsvReport {
    writer: Writer<std::fs::File>,
}

impl CsvReport {
    /// Open `path` for appending; the header is written only for a new file.
    pub fn append(path: &Path) -> Result<Self, HarnessError> {
        let existing = path.exists() && path.metadata().map(|m| m.len() > 0).unwrap_or(false);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| HarnessError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let writer = WriterBuilder::new().has_headers(!existing).from_writer(file);
        Ok(Self { writer })
    }

    pub fn write(&mut self, row: &ResultRow) -> Result<(), HarnessError> {
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), HarnessError> {
        self.writer.flush().map_err(|source| HarnessError::Io {
            path: String::from("<csv>"),
            source,
        })
    }
}
