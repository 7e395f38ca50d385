//! Error types for reading and writing CSV files.

use std::path::PathBuf;

use thiserror::Error;

use recode_model::RecodeError;

/// Errors raised while loading or saving tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to create or write an output file.
    #[error("failed to write file {path}: {message}")]
    FileWrite { path: PathBuf, message: String },

    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    #[error("invalid table in {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: RecodeError,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    pub fn csv_parse(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::CsvParse {
            path: path.into(),
            message: error.to_string(),
        }
    }
}
