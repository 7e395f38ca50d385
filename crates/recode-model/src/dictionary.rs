//! Raw dictionary tables.
//!
//! A dictionary arrives as a rectangular table whose cells have not yet been
//! coerced to text. Two of its columns are selected as `from` (keys) and
//! `to` (canonical values); an optional grouping column and order column are
//! used when a dictionary is applied to a whole data frame.
//!
//! ## Reserved tokens
//!
//! | Column | Token              | Meaning                                   |
//! |--------|--------------------|-------------------------------------------|
//! | key    | `.missing` / `""`  | value for missing input entries           |
//! | key    | `.default`         | value for anything no other rule matched  |
//! | key    | `.regex <pattern>` | pattern substitution applied before keys  |
//! | value  | `.na`              | turn matched entries into missing values  |
//! | group  | `.global`          | rows apply to every column of a frame     |
//! | group  | `.regex <pattern>` | rows apply to every matching column name  |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RecodeError, Result};

/// Key marking the substitute for missing values.
pub const MISSING_KEY: &str = ".missing";
/// Key marking the substitute for unmatched values.
pub const DEFAULT_KEY: &str = ".default";
/// Prefix of keys (and group names) holding a regular expression.
pub const REGEX_PREFIX: &str = ".regex ";
/// Value turning matched entries into missing values.
pub const NA_VALUE: &str = ".na";
/// Group name applying rows to every column.
pub const GLOBAL_GROUP: &str = ".global";
/// Literal text a missing dictionary key is read as.
pub const NA_TEXT: &str = "NA";

/// A dictionary cell before coercion to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// A list, struct or other non-atomic value, described by its type name.
    Nested(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Coerce the cell to text.
    ///
    /// Returns `Ok(None)` for null cells and `Err` with the type description
    /// for non-atomic cells.
    pub fn to_text(&self) -> std::result::Result<Option<String>, &str> {
        match self {
            Self::Null => Ok(None),
            Self::Text(text) => Ok(Some(text.clone())),
            Self::Integer(value) => Ok(Some(value.to_string())),
            Self::Float(value) => Ok(Some(value.to_string())),
            Self::Boolean(true) => Ok(Some("TRUE".to_string())),
            Self::Boolean(false) => Ok(Some("FALSE".to_string())),
            Self::Nested(kind) => Err(kind.as_str()),
        }
    }

    /// Read the cell as a number, used for the order column.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) if !value.is_nan() => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Selects a dictionary column by header name or 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSelector {
    Name(String),
    Position(usize),
}

impl ColumnSelector {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl FromStr for ColumnSelector {
    type Err = String;

    /// All-digit text is a position, anything else a column name.
    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("column selector must not be empty".to_string());
        }
        if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            let position = trimmed
                .parse::<usize>()
                .map_err(|error| format!("invalid column position '{trimmed}': {error}"))?;
            if position == 0 {
                return Err("column positions start at 1".to_string());
            }
            return Ok(Self::Position(position));
        }
        Ok(Self::Name(trimmed.to_string()))
    }
}

impl From<usize> for ColumnSelector {
    fn from(position: usize) -> Self {
        Self::Position(position)
    }
}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Position(position) => write!(f, "#{position}"),
        }
    }
}

/// A named dictionary column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryColumn {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl DictionaryColumn {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

/// A rectangular dictionary table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DictionaryTable {
    columns: Vec<DictionaryColumn>,
}

impl DictionaryTable {
    /// Build a table from columns, which must all have the same length.
    pub fn new(columns: Vec<DictionaryColumn>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let height = first.cells.len();
            if let Some(ragged) = columns.iter().find(|col| col.cells.len() != height) {
                return Err(RecodeError::invalid_dictionary(format!(
                    "column '{}' has {} rows, expected {height}",
                    ragged.name,
                    ragged.cells.len()
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Build a table from a header and row-major cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut columns: Vec<DictionaryColumn> = headers
            .into_iter()
            .map(|name| DictionaryColumn::new(name, Vec::with_capacity(rows.len())))
            .collect();
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(RecodeError::invalid_dictionary(format!(
                    "row {} has {} cells, expected {}",
                    idx + 1,
                    row.len(),
                    columns.len()
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.cells.push(cell);
            }
        }
        Ok(Self { columns })
    }

    /// Two-column `from`/`to` table built from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cell>,
        V: Into<Cell>,
    {
        let (keys, values): (Vec<Cell>, Vec<Cell>) = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .unzip();
        Self {
            columns: vec![
                DictionaryColumn::new("from", keys),
                DictionaryColumn::new("to", values),
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |col| col.cells.len())
    }

    pub fn columns(&self) -> &[DictionaryColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    /// Resolve a selector to a 0-based column index.
    pub fn resolve(&self, selector: &ColumnSelector) -> Result<usize> {
        match selector {
            ColumnSelector::Position(position) => {
                if *position >= 1 && *position <= self.width() {
                    Ok(position - 1)
                } else {
                    Err(RecodeError::invalid_dictionary(format!(
                        "column position {position} is out of range for a dictionary with {} columns",
                        self.width()
                    )))
                }
            }
            ColumnSelector::Name(name) => self
                .columns
                .iter()
                .position(|col| col.name == *name)
                .ok_or_else(|| {
                    RecodeError::invalid_dictionary(format!(
                        "column '{name}' not found in dictionary (columns: {})",
                        self.column_names().join(", ")
                    ))
                }),
        }
    }

    pub fn column(&self, selector: &ColumnSelector) -> Result<&DictionaryColumn> {
        let idx = self.resolve(selector)?;
        Ok(&self.columns[idx])
    }

    /// A new table holding the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let cells = rows
                    .iter()
                    .filter_map(|&row| col.cells.get(row).cloned())
                    .collect();
                DictionaryColumn::new(col.name.clone(), cells)
            })
            .collect();
        Self { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parses_positions_and_names() {
        assert_eq!("2".parse::<ColumnSelector>(), Ok(ColumnSelector::Position(2)));
        assert_eq!(
            " options ".parse::<ColumnSelector>(),
            Ok(ColumnSelector::Name("options".to_string()))
        );
        assert!("0".parse::<ColumnSelector>().is_err());
        assert!("".parse::<ColumnSelector>().is_err());
    }

    #[test]
    fn cells_coerce_to_text() {
        assert_eq!(Cell::Float(1.0).to_text(), Ok(Some("1".to_string())));
        assert_eq!(Cell::Float(2.5).to_text(), Ok(Some("2.5".to_string())));
        assert_eq!(Cell::Boolean(true).to_text(), Ok(Some("TRUE".to_string())));
        assert_eq!(Cell::Null.to_text(), Ok(None));
        assert_eq!(Cell::Nested("list".to_string()).to_text(), Err("list"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = DictionaryTable::from_rows(
            vec!["from".to_string(), "to".to_string()],
            vec![vec![Cell::from("Y")]],
        );
        assert!(matches!(result, Err(RecodeError::InvalidDictionary(_))));
    }

    #[test]
    fn select_rows_reorders() {
        let table = DictionaryTable::from_pairs([("a", "1"), ("b", "2"), ("c", "3")]);
        let subset = table.select_rows(&[2, 0]);
        assert_eq!(subset.height(), 2);
        assert_eq!(subset.columns()[0].cells, vec![Cell::from("c"), Cell::from("a")]);
    }
}
