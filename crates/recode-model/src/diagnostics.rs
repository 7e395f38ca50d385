//! Non-fatal dictionary-quality diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An advisory message produced while compiling or applying a dictionary.
///
/// Diagnostics never stop resolution; callers decide whether to surface them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No input value matched a key or value and there are no regex rules.
    DictionaryMismatch { input: String, dictionary: String },
    /// Missing keys were read as the literal string `"NA"`.
    NullKeysRewritten { dictionary: String, count: usize },
    /// Later occurrences of these keys were dropped.
    DuplicateKeys {
        dictionary: String,
        keys: Vec<String>,
    },
    /// These original values were replaced by the default substitute.
    DefaultApplied {
        input: String,
        default: String,
        values: Vec<String>,
    },
    /// Dictionary groups that name no column of the data frame.
    UnmatchedGroups { groups: Vec<String> },
}

impl Diagnostic {
    /// Stable short code, used in summaries and JSON logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DictionaryMismatch { .. } => "dictionary_mismatch",
            Self::NullKeysRewritten { .. } => "null_keys_rewritten",
            Self::DuplicateKeys { .. } => "duplicate_keys",
            Self::DefaultApplied { .. } => "default_applied",
            Self::UnmatchedGroups { .. } => "unmatched_groups",
        }
    }
}

fn quoted(values: &[String]) -> String {
    values
        .iter()
        .map(|value| format!("'{value}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DictionaryMismatch { input, dictionary } => write!(
                f,
                "none of the values in {input} were found in {dictionary}; \
                 the dictionary and data may be mismatched"
            ),
            Self::NullKeysRewritten { dictionary, count } => write!(
                f,
                "{count} missing key(s) in {dictionary} were read as the literal string \"NA\""
            ),
            Self::DuplicateKeys { dictionary, keys } => write!(
                f,
                "duplicate keys found in {dictionary}: {}; only the first instance of each is used",
                quoted(keys)
            ),
            Self::DefaultApplied {
                input,
                default,
                values,
            } => write!(
                f,
                "'{default}' was used to replace the following values in {input}: {}",
                quoted(values)
            ),
            Self::UnmatchedGroups { groups } => write!(
                f,
                "dictionary groups without a matching column: {}",
                quoted(groups)
            ),
        }
    }
}
