//! Loading dictionaries and data frames from CSV, and writing results back.

pub mod csv_table;
pub mod error;

pub use csv_table::{CsvOptions, read_dictionary, read_frame, write_frame};
pub use error::{IngestError, Result};
