//! Shared utilities for the recode crates.
//!
//! This crate holds the Polars `AnyValue` conversions used wherever a data
//! frame column or a dictionary stored in a frame is turned into text.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{any_to_cell, any_to_text, column_texts, format_numeric};
