//! Category ordering for categorical input.

use std::collections::{HashMap, HashSet};

use recode_model::dictionary::NA_VALUE;

/// The level order of a resolved categorical vector.
///
/// Dictionary values come first, in dictionary row order; categories the
/// dictionary never mentions follow in their pre-existing relative order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOrder {
    levels: Vec<String>,
    index: HashMap<String, usize>,
}

impl CategoryOrder {
    /// Reconcile dictionary value order with the resolved categories.
    ///
    /// `.na` is never a level. Duplicates keep their first position.
    pub fn reconcile<'a, D, R>(dictionary_values: D, resolved: R) -> Self
    where
        D: IntoIterator<Item = &'a str>,
        R: IntoIterator<Item = &'a str>,
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut levels = Vec::new();
        let candidates = dictionary_values
            .into_iter()
            .filter(|value| *value != NA_VALUE)
            .chain(resolved);
        for value in candidates {
            if seen.insert(value) {
                levels.push(value.to_string());
            }
        }
        let index = levels
            .iter()
            .enumerate()
            .map(|(idx, level)| (level.clone(), idx))
            .collect();
        Self { levels, index }
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn into_levels(self) -> Vec<String> {
        self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leftovers_follow_dictionary_values() {
        let order = CategoryOrder::reconcile(["Yes", "No"], ["Maybe", "No", "Yes"]);
        assert_eq!(order.levels(), ["Yes", "No", "Maybe"]);
        assert_eq!(order.position("Maybe"), Some(2));
    }

    #[test]
    fn duplicate_and_na_values_are_skipped() {
        let order = CategoryOrder::reconcile(["Yes", ".na", "Yes", "No"], ["Other"]);
        assert_eq!(order.levels(), ["Yes", "No", "Other"]);
        assert_eq!(order.position(".na"), None);
    }
}
