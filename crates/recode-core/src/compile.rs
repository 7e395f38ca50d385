//! Dictionary compilation.
//!
//! Turns the `from`/`to` columns of a [`DictionaryTable`] into a
//! [`CompiledRules`] set. Compilation runs in a fixed order:
//!
//! 1. Both columns are coerced to text; non-atomic cells are rejected.
//! 2. Missing keys become the literal string `"NA"` (and are counted).
//! 3. `.missing` and empty keys become the absent-key marker.
//! 4. Duplicate keys are dropped, keeping the first occurrence.
//! 5. Each remaining row becomes one [`Rule`].

use std::collections::{HashMap, HashSet};

use fancy_regex::Regex;
use tracing::debug;

use recode_model::dictionary::{DEFAULT_KEY, MISSING_KEY, NA_TEXT, NA_VALUE, REGEX_PREFIX};
use recode_model::{DictionaryColumn, DictionaryTable, RecodeError, ResolveOptions, Result};

/// A key after null rewriting and `.missing` detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
    Absent,
    Text(String),
}

impl Key {
    fn display(&self) -> &str {
        match self {
            Self::Absent => MISSING_KEY,
            Self::Text(text) => text,
        }
    }
}

/// A `.regex` rule: a compiled pattern and its replacement.
#[derive(Debug, Clone)]
pub struct RegexRule {
    pattern: String,
    regex: Regex,
    value: String,
    replacement: String,
}

impl RegexRule {
    /// Compile a pattern taken from a `.regex <pattern>` key.
    pub fn new(pattern: &str, value: String, anchor: bool) -> Result<Self> {
        let pattern = pattern.trim().to_string();
        let source = if anchor {
            format!("^(?:{pattern})$")
        } else {
            pattern.clone()
        };
        let regex = Regex::new(&source).map_err(|error| {
            RecodeError::invalid_dictionary(format!("invalid regex rule '{pattern}': {error}"))
        })?;
        let replacement = translate_replacement(&value);
        Ok(Self {
            pattern,
            regex,
            value,
            replacement,
        })
    }

    /// The pattern as written in the dictionary, without anchors.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The canonical value as written in the dictionary.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace every match in `text`; `None` when nothing matched.
    ///
    /// Fails only when a pattern exceeds the backtracking limit on `text`.
    pub fn apply(&self, text: &str) -> Result<Option<String>> {
        let failed = |error: fancy_regex::Error| {
            RecodeError::invalid_dictionary(format!(
                "regex rule '{}' failed on '{text}': {error}",
                self.pattern
            ))
        };
        if !self.regex.is_match(text).map_err(failed)? {
            return Ok(None);
        }
        let replaced = self
            .regex
            .try_replacen(text, 0, self.replacement.as_str())
            .map_err(failed)?;
        Ok(Some(replaced.into_owned()))
    }
}

/// Translate `\1`-style back-references into `${1}` and keep `$` literal.
fn translate_replacement(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '$' => out.push_str("$$"),
            '\\' => match chars.peek().copied() {
                Some(digit @ '0'..='9') => {
                    chars.next();
                    out.push_str("${");
                    out.push(digit);
                    out.push('}');
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push('\\'),
            },
            other => out.push(other),
        }
    }
    out
}

/// One compiled dictionary row.
#[derive(Debug, Clone)]
pub enum Rule {
    Exact { key: String, value: String },
    Regex(RegexRule),
    Missing { value: String },
    Default { value: String },
}

impl Rule {
    fn classify(key: Key, value: String, anchor: bool) -> Result<Self> {
        let rule = match key {
            Key::Text(key) if key.starts_with(REGEX_PREFIX) => {
                Self::Regex(RegexRule::new(&key[REGEX_PREFIX.len()..], value, anchor)?)
            }
            Key::Absent => Self::Missing { value },
            Key::Text(key) if key == DEFAULT_KEY => Self::Default { value },
            Key::Text(key) => Self::Exact { key, value },
        };
        Ok(rule)
    }

    /// The canonical value this rule produces.
    pub fn value(&self) -> &str {
        match self {
            Self::Exact { value, .. } | Self::Missing { value } | Self::Default { value } => value,
            Self::Regex(rule) => rule.value(),
        }
    }

    /// The dictionary key this rule was built from.
    pub fn key(&self) -> String {
        match self {
            Self::Exact { key, .. } => key.clone(),
            Self::Regex(rule) => format!("{REGEX_PREFIX}{}", rule.pattern()),
            Self::Missing { .. } => MISSING_KEY.to_string(),
            Self::Default { .. } => DEFAULT_KEY.to_string(),
        }
    }
}

/// What compilation noticed about the dictionary itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Number of missing keys read as `"NA"`.
    pub null_keys_rewritten: usize,
    /// Keys whose later occurrences were dropped, in order of first duplicate.
    pub duplicate_keys: Vec<String>,
}

/// A dictionary compiled into resolvable rules.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    rules: Vec<Rule>,
    exact: HashMap<String, String>,
    report: CompileReport,
}

impl CompiledRules {
    /// Rules in dictionary row order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn report(&self) -> &CompileReport {
        &self.report
    }

    pub fn regex_rules(&self) -> impl Iterator<Item = &RegexRule> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Regex(regex) => Some(regex),
            _ => None,
        })
    }

    pub fn has_regex(&self) -> bool {
        self.regex_rules().next().is_some()
    }

    pub fn exact(&self, key: &str) -> Option<&str> {
        self.exact.get(key).map(String::as_str)
    }

    pub fn missing_substitute(&self) -> Option<&str> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Missing { value } => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn default_substitute(&self) -> Option<&str> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Default { value } => Some(value.as_str()),
            _ => None,
        })
    }

    /// Canonical values in dictionary row order, possibly repeated.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(Rule::value)
    }

    /// Whether any rule maps to the `.na` token.
    pub fn has_na_value(&self) -> bool {
        self.values().any(|value| value == NA_VALUE)
    }

    /// Whether `text` is a key or a canonical value of this dictionary.
    pub fn mentions(&self, text: &str) -> bool {
        self.exact.contains_key(text) || self.values().any(|value| value == text)
    }
}

fn column_texts(column: &DictionaryColumn) -> Result<Vec<Option<String>>> {
    column
        .cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.to_text().map_err(|kind| {
                RecodeError::invalid_dictionary(format!(
                    "column '{}' row {} holds a non-atomic value ({kind})",
                    column.name,
                    row + 1
                ))
            })
        })
        .collect()
}

/// Compile the `from`/`to` columns selected by `options`.
pub fn compile_dictionary(
    dictionary: &DictionaryTable,
    options: &ResolveOptions,
) -> Result<CompiledRules> {
    if dictionary.width() < 2 {
        return Err(RecodeError::invalid_dictionary(format!(
            "a dictionary needs at least two columns, found {}",
            dictionary.width()
        )));
    }
    let keys = column_texts(dictionary.column(&options.from)?)?;
    let values = column_texts(dictionary.column(&options.to)?)?;

    let mut report = CompileReport::default();
    let keys: Vec<Key> = keys
        .into_iter()
        .map(|key| match key {
            None => {
                report.null_keys_rewritten += 1;
                Key::Text(NA_TEXT.to_string())
            }
            Some(key) if key.is_empty() || key == MISSING_KEY => Key::Absent,
            Some(key) => Key::Text(key),
        })
        .collect();

    let mut seen: HashSet<Key> = HashSet::with_capacity(keys.len());
    let mut reported: HashSet<Key> = HashSet::new();
    let mut rules = Vec::with_capacity(keys.len());
    for (key, value) in keys.into_iter().zip(values) {
        if seen.contains(&key) {
            if reported.insert(key.clone()) {
                report.duplicate_keys.push(key.display().to_string());
            }
            continue;
        }
        seen.insert(key.clone());
        let value = value.unwrap_or_else(|| NA_VALUE.to_string());
        rules.push(Rule::classify(key, value, options.anchor_regex)?);
    }

    let exact = rules
        .iter()
        .filter_map(|rule| match rule {
            Rule::Exact { key, value } => Some((key.clone(), value.clone())),
            _ => None,
        })
        .collect();

    let compiled = CompiledRules {
        rules,
        exact,
        report,
    };
    debug!(
        rules = compiled.rules.len(),
        regex_rules = compiled.regex_rules().count(),
        duplicates = compiled.report.duplicate_keys.len(),
        "compiled dictionary"
    );
    Ok(compiled)
}
