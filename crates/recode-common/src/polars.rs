//! Polars AnyValue utility functions.
//!
//! Data cells are coerced to text the same way regardless of their source
//! type, so a numeric column `1, 2` matches dictionary keys `"1"`, `"2"`.

use polars::prelude::{AnyValue, Column};
use recode_model::Cell;

/// Converts a Polars `AnyValue` to text, `None` for nulls.
///
/// Numbers are formatted without trailing zeros and booleans as
/// `TRUE`/`FALSE`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use recode_common::any_to_text;
///
/// assert_eq!(any_to_text(AnyValue::Null), None);
/// assert_eq!(any_to_text(AnyValue::Int32(42)).as_deref(), Some("42"));
/// assert_eq!(any_to_text(AnyValue::String("yes")).as_deref(), Some("yes"));
/// ```
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "TRUE" } else { "FALSE" }.to_string(),
        other => other.to_string(),
    };
    Some(text)
}

/// Converts a Polars `AnyValue` to a dictionary [`Cell`].
///
/// Nested values (lists, arrays) become [`Cell::Nested`] so the dictionary
/// compiler can reject them.
pub fn any_to_cell(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => Cell::Null,
        AnyValue::Int8(v) => Cell::Integer(i64::from(v)),
        AnyValue::Int16(v) => Cell::Integer(i64::from(v)),
        AnyValue::Int32(v) => Cell::Integer(i64::from(v)),
        AnyValue::Int64(v) => Cell::Integer(v),
        AnyValue::UInt8(v) => Cell::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Cell::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Cell::Integer(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => Cell::Integer(v),
            Err(_) => Cell::Text(v.to_string()),
        },
        AnyValue::Float32(v) => Cell::Float(f64::from(v)),
        AnyValue::Float64(v) => Cell::Float(v),
        AnyValue::Boolean(b) => Cell::Boolean(b),
        AnyValue::String(s) => Cell::Text(s.to_string()),
        AnyValue::StringOwned(s) => Cell::Text(s.to_string()),
        other if other.dtype().is_nested() => Cell::Nested(other.dtype().to_string()),
        other => Cell::Text(other.to_string()),
    }
}

/// Extract every value of a column as text.
///
/// Returns the dtype name as the error when the column is nested.
pub fn column_texts(column: &Column) -> Result<Vec<Option<String>>, String> {
    if column.dtype().is_nested() {
        return Err(column.dtype().to_string());
    }
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        values.push(any_to_text(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use recode_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use super::*;

    #[test]
    fn test_any_to_text_null() {
        assert_eq!(any_to_text(AnyValue::Null), None);
    }

    #[test]
    fn test_any_to_text_numbers() {
        assert_eq!(any_to_text(AnyValue::Int64(-100)).as_deref(), Some("-100"));
        assert_eq!(any_to_text(AnyValue::Float64(1.0)).as_deref(), Some("1"));
        assert_eq!(any_to_text(AnyValue::Float64(1.50)).as_deref(), Some("1.5"));
    }

    #[test]
    fn test_any_to_text_boolean() {
        assert_eq!(any_to_text(AnyValue::Boolean(true)).as_deref(), Some("TRUE"));
        assert_eq!(any_to_text(AnyValue::Boolean(false)).as_deref(), Some("FALSE"));
    }

    #[test]
    fn test_any_to_cell() {
        assert_eq!(any_to_cell(AnyValue::Null), Cell::Null);
        assert_eq!(any_to_cell(AnyValue::Int32(3)), Cell::Integer(3));
        assert_eq!(any_to_cell(AnyValue::String("Y")), Cell::Text("Y".to_string()));
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(2.25), "2.25");
    }

    #[test]
    fn test_column_texts_keeps_nulls() {
        let column = Series::new("x".into(), &[Some("a"), None, Some("")]).into_column();
        assert_eq!(
            column_texts(&column).unwrap(),
            vec![Some("a".to_string()), None, Some(String::new())]
        );
    }
}
