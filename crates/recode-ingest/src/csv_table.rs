//! CSV tables for dictionaries and data.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{Column, CsvWriter, DataFrame, IntoColumn, NamedFrom, SerWriter, Series};
use serde::{Deserialize, Serialize};
use tracing::debug;

use recode_model::{Cell, DictionaryTable};

use crate::error::{IngestError, Result};

/// How CSV input is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Cell texts read as missing.
    pub na_tokens: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            na_tokens: vec!["NA".to_string()],
        }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_na_tokens(mut self, tokens: Vec<String>) -> Self {
        self.na_tokens = tokens;
        self
    }

    fn is_na(&self, value: &str) -> bool {
        self.na_tokens.iter().any(|token| token == value)
    }
}

struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn read_raw(path: &Path, options: &CsvOptions) -> Result<RawTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|error| IngestError::csv_parse(path, error))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| IngestError::csv_parse(path, error))?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|error| IngestError::csv_parse(path, error))?;
        if record.len() > headers.len() {
            return Err(IngestError::csv_parse(
                path,
                format!(
                    "row {} has {} fields but the header has {}",
                    idx + 2,
                    record.len(),
                    headers.len()
                ),
            ));
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read csv"
    );
    Ok(RawTable { headers, rows })
}

/// Read a dictionary table.
///
/// NA tokens become null cells. Empty cells stay empty strings, so an empty
/// key still means "missing" while a null key is the literal text `NA`.
pub fn read_dictionary(path: &Path, options: &CsvOptions) -> Result<DictionaryTable> {
    let RawTable { headers, rows } = read_raw(path, options)?;
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|value| {
                    if options.is_na(&value) {
                        Cell::Null
                    } else {
                        Cell::Text(value)
                    }
                })
                .collect()
        })
        .collect();
    DictionaryTable::from_rows(headers, rows).map_err(|source| IngestError::Table {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a data file as a frame of String columns.
///
/// NA tokens and empty cells are both null.
pub fn read_frame(path: &Path, options: &CsvOptions) -> Result<DataFrame> {
    let RawTable { headers, rows } = read_raw(path, options)?;
    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<Option<&str>> = rows
                .iter()
                .map(|row| {
                    let value = row[idx].as_str();
                    (!value.is_empty() && !options.is_na(value)).then_some(value)
                })
                .collect();
            Series::new(name.as_str().into(), values.as_slice()).into_column()
        })
        .collect();
    DataFrame::new(columns).map_err(|error| IngestError::DataFrame {
        message: error.to_string(),
    })
}

/// Write `frame` as CSV with a header row. Nulls are written as empty cells.
pub fn write_frame(frame: &mut DataFrame, path: &Path) -> Result<()> {
    let write_error = |error: &dyn std::fmt::Display| IngestError::FileWrite {
        path: path.to_path_buf(),
        message: error.to_string(),
    };
    let file = File::create(path).map_err(|error| write_error(&error))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(frame)
        .map_err(|error| write_error(&error))?;
    debug!(path = %path.display(), rows = frame.height(), "wrote csv");
    Ok(())
}
