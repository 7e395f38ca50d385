//! Resolution of a value vector against a compiled dictionary.
//!
//! Rules are applied as an explicit sequence of passes over every element:
//!
//! 1. empty strings become missing
//! 2. every `.regex` rule, in dictionary order (later rules see the output of
//!    earlier ones)
//! 3. exact keys
//! 4. the `.missing` substitute for missing elements
//! 5. `.na` values become missing
//! 6. the `.default` substitute for anything that is not a dictionary value
//!
//! Categorical input is resolved level by level and its level order is rebuilt
//! with [`CategoryOrder`].

use std::collections::HashSet;

use tracing::warn;

use recode_model::dictionary::NA_VALUE;
use recode_model::{
    Categorical, Diagnostic, DictionaryTable, RecodeError, ResolveOptions, Result, ValueVector,
    Values,
};

use crate::compile::{CompiledRules, compile_dictionary};
use crate::order::CategoryOrder;

/// The outcome of resolving one vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Resolved values, same length and names as the input.
    pub values: ValueVector,
    /// Diagnostics, empty when `quiet` was set.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of elements whose label changed.
    pub changed: usize,
}

/// Labels after the rule passes, plus the labels that were defaulted.
struct Applied {
    labels: Vec<Option<String>>,
    defaulted: Vec<String>,
}

fn apply_rules(rules: &CompiledRules, labels: Vec<Option<String>>) -> Result<Applied> {
    let mut labels: Vec<Option<String>> = labels
        .into_iter()
        .map(|label| label.filter(|text| !text.is_empty()))
        .collect();

    for rule in rules.regex_rules() {
        for label in labels.iter_mut().flatten() {
            if let Some(replaced) = rule.apply(label)? {
                *label = replaced;
            }
        }
    }

    for label in labels.iter_mut().flatten() {
        if let Some(value) = rules.exact(label) {
            *label = value.to_string();
        }
    }

    if let Some(substitute) = rules.missing_substitute() {
        for label in labels.iter_mut().filter(|label| label.is_none()) {
            *label = Some(substitute.to_string());
        }
    }

    if rules.has_na_value() {
        for label in &mut labels {
            if label.as_deref() == Some(NA_VALUE) {
                *label = None;
            }
        }
    }

    let mut defaulted = Vec::new();
    if let Some(default) = rules.default_substitute() {
        let keep: HashSet<&str> = rules.values().collect();
        let mut reported: HashSet<String> = HashSet::new();
        let replacement = (default != NA_VALUE).then(|| default.to_string());
        for label in &mut labels {
            let Some(current) = label.as_deref() else {
                continue;
            };
            if keep.contains(current) {
                continue;
            }
            if reported.insert(current.to_string()) {
                defaulted.push(current.to_string());
            }
            *label = replacement.clone();
        }
    }

    Ok(Applied { labels, defaulted })
}

fn collect_diagnostics(
    rules: &CompiledRules,
    originals: &[Option<&str>],
    defaulted: Vec<String>,
    options: &ResolveOptions,
) -> Vec<Diagnostic> {
    if options.quiet {
        return Vec::new();
    }
    let input = options.input_label().to_string();
    let dictionary = options.dictionary_label().to_string();
    let report = rules.report();
    let mut diagnostics = Vec::new();

    if report.null_keys_rewritten > 0 {
        diagnostics.push(Diagnostic::NullKeysRewritten {
            dictionary: dictionary.clone(),
            count: report.null_keys_rewritten,
        });
    }
    if !report.duplicate_keys.is_empty() {
        diagnostics.push(Diagnostic::DuplicateKeys {
            dictionary: dictionary.clone(),
            keys: report.duplicate_keys.clone(),
        });
    }
    let applicable = rules.has_regex()
        || originals.iter().any(|original| match original {
            Some(text) if !text.is_empty() => rules.mentions(text),
            _ => rules.missing_substitute().is_some(),
        });
    if !applicable {
        diagnostics.push(Diagnostic::DictionaryMismatch {
            input: input.clone(),
            dictionary,
        });
    }
    if options.warn_default
        && !defaulted.is_empty()
        && let Some(default) = rules.default_substitute()
    {
        diagnostics.push(Diagnostic::DefaultApplied {
            input,
            default: default.to_string(),
            values: defaulted,
        });
    }

    for diagnostic in &diagnostics {
        warn!(code = diagnostic.code(), "{diagnostic}");
    }
    diagnostics
}

fn count_changed(before: &[Option<&str>], after: &[Option<&str>]) -> usize {
    before
        .iter()
        .zip(after)
        .filter(|(before, after)| before != after)
        .count()
}

fn resolve_categorical(
    categorical: &Categorical,
    rules: &CompiledRules,
) -> Result<(Categorical, Vec<String>)> {
    // One trailing slot stands in for every missing element.
    let mut slots: Vec<Option<String>> = categorical.levels().iter().cloned().map(Some).collect();
    slots.push(None);
    let Applied {
        mut labels,
        defaulted,
    } = apply_rules(rules, slots)?;
    let missing_label = labels.pop().flatten();

    let order = CategoryOrder::reconcile(
        rules.values(),
        labels.iter().flatten().map(String::as_str),
    );
    let position = |label: Option<&String>| label.and_then(|label| order.position(label));
    let codes = categorical
        .codes()
        .iter()
        .map(|code| match code {
            Some(code) => position(labels[*code].as_ref()),
            None => position(missing_label.as_ref()),
        })
        .collect();
    let resolved = Categorical::new(order.into_levels(), codes, categorical.is_ordered())?;
    Ok((resolved, defaulted))
}

fn ensure_non_empty(values: &ValueVector, options: &ResolveOptions) -> Result<()> {
    if values.is_empty() {
        return Err(RecodeError::invalid_input(format!(
            "{} is empty; there is nothing to resolve",
            options.input_label()
        )));
    }
    Ok(())
}

/// Resolve `values` against rules that were already compiled.
pub fn resolve_compiled(
    values: &ValueVector,
    rules: &CompiledRules,
    options: &ResolveOptions,
) -> Result<Resolution> {
    ensure_non_empty(values, options)?;
    let names = values.names().map(<[String]>::to_vec);
    let (resolved, defaulted) = match values.values() {
        Values::Text(texts) => {
            let Applied { labels, defaulted } = apply_rules(rules, texts.clone())?;
            (Values::Text(labels), defaulted)
        }
        Values::Categorical(categorical) => {
            let (categorical, defaulted) = resolve_categorical(categorical, rules)?;
            (Values::Categorical(categorical), defaulted)
        }
    };
    let resolved = ValueVector::from_parts(resolved, names)?;

    let originals = values.labels();
    let diagnostics = collect_diagnostics(rules, &originals, defaulted, options);
    let changed = count_changed(&originals, &resolved.labels());
    Ok(Resolution {
        values: resolved,
        diagnostics,
        changed,
    })
}

/// Resolve `values` against `dictionary`.
///
/// The dictionary is compiled fresh on every call. Structural problems with
/// either argument fail before anything is rewritten; dictionary-quality
/// problems are reported as diagnostics.
///
/// # Examples
///
/// ```
/// use recode_core::resolve;
/// use recode_model::{DictionaryTable, ResolveOptions, ValueVector};
///
/// let dictionary = DictionaryTable::from_pairs([
///     ("Y", "Yes"),
///     ("N", "No"),
///     (".default", "Unknown"),
/// ]);
/// let values = ValueVector::from_strs(&["Y", "N", "maybe"]);
/// let resolution = resolve(&values, &dictionary, &ResolveOptions::default()).unwrap();
/// assert_eq!(
///     resolution.values.labels(),
///     vec![Some("Yes"), Some("No"), Some("Unknown")]
/// );
/// ```
pub fn resolve(
    values: &ValueVector,
    dictionary: &DictionaryTable,
    options: &ResolveOptions,
) -> Result<Resolution> {
    ensure_non_empty(values, options)?;
    let rules = compile_dictionary(dictionary, options)?;
    resolve_compiled(values, &rules, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(pairs: &[(&str, &str)]) -> CompiledRules {
        let table = DictionaryTable::from_pairs(pairs.iter().copied());
        compile_dictionary(&table, &ResolveOptions::default()).unwrap()
    }

    fn texts(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn regex_passes_chain_in_order() {
        let rules = rules(&[(".regex a", "b"), (".regex b", "c")]);
        let applied = apply_rules(&rules, texts(&[Some("a"), Some("b"), Some("x")])).unwrap();
        assert_eq!(applied.labels, texts(&[Some("c"), Some("c"), Some("x")]));
    }

    #[test]
    fn regex_output_feeds_exact_keys() {
        let rules = rules(&[(".regex y.*", "y"), ("y", "Yes")]);
        let applied = apply_rules(&rules, texts(&[Some("yes"), Some("yup")])).unwrap();
        assert_eq!(applied.labels, texts(&[Some("Yes"), Some("Yes")]));
    }

    #[test]
    fn empty_strings_are_missing_before_anything_else() {
        let rules = rules(&[(".missing", "Missing"), (".regex ", "Empty")]);
        let applied = apply_rules(&rules, texts(&[Some(""), None])).unwrap();
        assert_eq!(applied.labels, texts(&[Some("Missing"), Some("Missing")]));
    }

    #[test]
    fn default_keeps_values_that_are_already_canonical() {
        let rules = rules(&[("Y", "Yes"), (".default", "Other")]);
        let applied =
            apply_rules(&rules, texts(&[Some("Yes"), Some("x"), Some("x"), None])).unwrap();
        assert_eq!(
            applied.labels,
            texts(&[Some("Yes"), Some("Other"), Some("Other"), None])
        );
        assert_eq!(applied.defaulted, vec!["x".to_string()]);
    }

    #[test]
    fn na_default_makes_leftovers_missing() {
        let rules = rules(&[("Y", "Yes"), (".default", ".na")]);
        let applied = apply_rules(&rules, texts(&[Some("Y"), Some("junk")])).unwrap();
        assert_eq!(applied.labels, texts(&[Some("Yes"), None]));
    }

    #[test]
    fn count_changed_compares_positions() {
        assert_eq!(
            count_changed(&[Some("a"), None, Some("c")], &[Some("a"), Some("b"), None]),
            2
        );
    }
}
