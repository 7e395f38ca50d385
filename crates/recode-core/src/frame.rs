//! Applying a grouped dictionary to every column of a data frame.
//!
//! Each dictionary row belongs to a group named by the `by` column:
//!
//! - a column name applies the row to that column only
//! - `.regex <pattern>` applies it to every column whose name matches
//! - `.global` applies it to every column
//!
//! Rows are collected per column in tiers (named, then regex, then global) and
//! sorted by the optional order column inside each tier. Since duplicate keys
//! keep their first occurrence, a named row wins over a regex-group row, which
//! wins over a global row.

use std::cmp::Ordering;

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};
use fancy_regex::Regex;
use tracing::{debug, info_span, warn};

use recode_common::{any_to_cell, column_texts};
use recode_model::dictionary::{GLOBAL_GROUP, REGEX_PREFIX};
use recode_model::{
    Cell, Diagnostic, DictionaryColumn, DictionaryTable, FrameOptions, RecodeError, Result,
    ValueVector,
};

use crate::resolve::resolve;

/// What happened to one frame column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReport {
    pub column: String,
    /// Dictionary rows applied to the column.
    pub rules: usize,
    /// Values whose label changed.
    pub changed: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// The outcome of resolving a whole frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Resolved columns, in frame order.
    pub columns: Vec<ColumnReport>,
    /// Diagnostics about the dictionary groups themselves.
    pub diagnostics: Vec<Diagnostic>,
}

impl FrameReport {
    pub fn changed(&self) -> usize {
        self.columns.iter().map(|col| col.changed).sum()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.len()
            + self
                .columns
                .iter()
                .map(|col| col.diagnostics.len())
                .sum::<usize>()
    }
}

#[derive(Debug)]
enum GroupTarget {
    Column(String),
    Pattern(Regex),
    Global,
}

impl GroupTarget {
    fn parse(group: &str) -> Result<Self> {
        if group == GLOBAL_GROUP {
            return Ok(Self::Global);
        }
        if let Some(pattern) = group.strip_prefix(REGEX_PREFIX) {
            let pattern = pattern.trim();
            let regex = Regex::new(pattern).map_err(|error| {
                RecodeError::invalid_dictionary(format!(
                    "invalid group pattern '{pattern}': {error}"
                ))
            })?;
            return Ok(Self::Pattern(regex));
        }
        Ok(Self::Column(group.to_string()))
    }

    /// Tier of this group for `column`, `None` if it does not apply.
    fn tier(&self, column: &str) -> Result<Option<u8>> {
        let tier = match self {
            Self::Column(name) => (name == column).then_some(0),
            Self::Pattern(regex) => regex
                .is_match(column)
                .map_err(|error| {
                    RecodeError::invalid_dictionary(format!(
                        "group pattern '{}' failed on column '{column}': {error}",
                        regex.as_str()
                    ))
                })?
                .then_some(1),
            Self::Global => Some(2),
        };
        Ok(tier)
    }
}

struct GroupedRow {
    row: usize,
    target: usize,
    order: Option<f64>,
}

fn compare_rows(a: (u8, &GroupedRow), b: (u8, &GroupedRow)) -> Ordering {
    a.0.cmp(&b.0)
        .then_with(|| match (a.1.order, b.1.order) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.1.row.cmp(&b.1.row))
}

fn frame_error(column: &str, error: impl ToString) -> RecodeError {
    RecodeError::Frame {
        column: column.to_string(),
        message: error.to_string(),
    }
}

/// Resolve every column of `frame` that a dictionary group applies to.
///
/// Columns are replaced in place by String columns of the same name; columns
/// without applicable rows are left untouched.
pub fn resolve_frame(
    frame: &mut DataFrame,
    dictionary: &DictionaryTable,
    options: &FrameOptions,
) -> Result<FrameReport> {
    if dictionary.width() < 2 {
        return Err(RecodeError::invalid_dictionary(format!(
            "a dictionary needs at least two columns, found {}",
            dictionary.width()
        )));
    }
    let by = dictionary.column(&options.by)?;
    let order = match &options.order {
        Some(selector) => Some(dictionary.column(selector)?),
        None => None,
    };

    let mut targets: Vec<(String, GroupTarget)> = Vec::new();
    let mut rows: Vec<GroupedRow> = Vec::with_capacity(dictionary.height());
    for (row, cell) in by.cells.iter().enumerate() {
        let group = cell.to_text().map_err(|kind| {
            RecodeError::invalid_dictionary(format!(
                "column '{}' row {} holds a non-atomic value ({kind})",
                by.name,
                row + 1
            ))
        })?;
        let Some(group) = group.filter(|group| !group.is_empty()) else {
            continue;
        };
        let target = match targets.iter().position(|(name, _)| *name == group) {
            Some(idx) => idx,
            None => {
                targets.push((group.clone(), GroupTarget::parse(&group)?));
                targets.len() - 1
            }
        };
        let order = order.and_then(|col| col.cells.get(row)).and_then(Cell::to_f64);
        rows.push(GroupedRow { row, target, order });
    }

    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut report = FrameReport::default();
    if frame.height() == 0 {
        return Ok(report);
    }

    // tiers[column][target]
    let tiers: Vec<Vec<Option<u8>>> = names
        .iter()
        .map(|name| {
            targets
                .iter()
                .map(|(_, target)| target.tier(name))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let unmatched: Vec<String> = targets
        .iter()
        .enumerate()
        .filter(|(idx, _)| tiers.iter().all(|column| column[*idx].is_none()))
        .map(|(_, (group, _))| group.clone())
        .collect();
    if !unmatched.is_empty() {
        debug!(groups = ?unmatched, "dictionary groups without a matching column");
        if options.warn {
            let diagnostic = Diagnostic::UnmatchedGroups { groups: unmatched };
            warn!(code = diagnostic.code(), "{diagnostic}");
            report.diagnostics.push(diagnostic);
        }
    }

    for (name, column_tiers) in names.iter().zip(&tiers) {
        let mut applicable: Vec<(u8, &GroupedRow)> = rows
            .iter()
            .filter_map(|row| column_tiers[row.target].map(|tier| (tier, row)))
            .collect();
        if applicable.is_empty() {
            continue;
        }
        applicable.sort_by(|a, b| compare_rows(*a, *b));
        let selected: Vec<usize> = applicable.iter().map(|(_, row)| row.row).collect();
        let subset = dictionary.select_rows(&selected);

        let span = info_span!("column", column = %name, rules = selected.len());
        let _guard = span.enter();

        let column = frame.column(name).map_err(|error| frame_error(name, error))?;
        let texts = column_texts(column).map_err(|dtype| {
            RecodeError::invalid_input(format!("column '{name}' has non-atomic type {dtype}"))
        })?;
        let resolution = resolve(
            &ValueVector::text(texts),
            &subset,
            &options.column_options(name),
        )?;
        let labels = resolution.values.labels();
        let series = Series::new(name.as_str().into(), labels.as_slice());
        frame
            .with_column(series.into_column())
            .map_err(|error| frame_error(name, error))?;
        debug!(changed = resolution.changed, "resolved column");

        report.columns.push(ColumnReport {
            column: name.clone(),
            rules: selected.len(),
            changed: resolution.changed,
            diagnostics: resolution.diagnostics,
        });
    }
    Ok(report)
}

/// Read a dictionary stored in a data frame.
pub fn dictionary_from_frame(frame: &DataFrame) -> Result<DictionaryTable> {
    let columns = frame
        .get_columns()
        .iter()
        .map(|column: &Column| {
            let cells = (0..column.len())
                .map(|idx| any_to_cell(column.get(idx).unwrap_or(AnyValue::Null)))
                .collect();
            DictionaryColumn::new(column.name().to_string(), cells)
        })
        .collect();
    DictionaryTable::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_targets_rank_named_before_pattern_before_global() {
        let named = GroupTarget::parse("smoker").unwrap();
        let pattern = GroupTarget::parse(".regex ^sm").unwrap();
        let global = GroupTarget::parse(".global").unwrap();
        assert_eq!(named.tier("smoker").unwrap(), Some(0));
        assert_eq!(named.tier("age").unwrap(), None);
        assert_eq!(pattern.tier("smoker").unwrap(), Some(1));
        assert_eq!(global.tier("anything").unwrap(), Some(2));
    }

    #[test]
    fn group_patterns_support_look_ahead() {
        let pattern = GroupTarget::parse(".regex ^(?!id$)").unwrap();
        assert_eq!(pattern.tier("smoker").unwrap(), Some(1));
        assert_eq!(pattern.tier("id").unwrap(), None);
    }

    #[test]
    fn bad_group_pattern_is_invalid_dictionary() {
        let err = GroupTarget::parse(".regex (").unwrap_err();
        assert!(matches!(err, RecodeError::InvalidDictionary(_)));
    }

    #[test]
    fn rows_sort_by_tier_then_order_then_position() {
        let a = GroupedRow { row: 0, target: 0, order: None };
        let b = GroupedRow { row: 1, target: 0, order: Some(2.0) };
        let c = GroupedRow { row: 2, target: 0, order: Some(1.0) };
        let mut rows = vec![(1u8, &a), (1u8, &b), (0u8, &a), (1u8, &c)];
        rows.sort_by(|x, y| compare_rows(*x, *y));
        let order: Vec<(u8, usize)> = rows.iter().map(|(tier, row)| (*tier, row.row)).collect();
        assert_eq!(order, vec![(0, 0), (1, 2), (1, 1), (1, 0)]);
    }
}
