//! Value sequences handed to the resolver.
//!
//! A [`ValueVector`] is either plain text or categorical, optionally carrying
//! one name per element. `None` marks a missing element.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RecodeError, Result};

/// Categorical values: integer codes into an ordered set of levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCategorical")]
pub struct Categorical {
    codes: Vec<Option<usize>>,
    levels: Vec<String>,
    ordered: bool,
}

/// Unchecked wire form of [`Categorical`].
#[derive(Deserialize)]
struct RawCategorical {
    codes: Vec<Option<usize>>,
    levels: Vec<String>,
    ordered: bool,
}

impl TryFrom<RawCategorical> for Categorical {
    type Error = RecodeError;

    fn try_from(raw: RawCategorical) -> Result<Self> {
        Self::new(raw.levels, raw.codes, raw.ordered)
    }
}

impl Categorical {
    /// Build from explicit levels and codes.
    ///
    /// Levels must be unique and every code must index into them.
    pub fn new(levels: Vec<String>, codes: Vec<Option<usize>>, ordered: bool) -> Result<Self> {
        let mut seen = HashMap::with_capacity(levels.len());
        for level in &levels {
            if seen.insert(level.as_str(), ()).is_some() {
                return Err(RecodeError::invalid_input(format!(
                    "duplicate categorical level '{level}'"
                )));
            }
        }
        if let Some(bad) = codes.iter().flatten().find(|&&code| code >= levels.len()) {
            return Err(RecodeError::invalid_input(format!(
                "categorical code {bad} is out of range for {} levels",
                levels.len()
            )));
        }
        Ok(Self {
            codes,
            levels,
            ordered,
        })
    }

    /// Build from labels, with levels in order of first appearance.
    pub fn from_labels<S: AsRef<str>>(labels: &[Option<S>], ordered: bool) -> Self {
        let mut levels: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let codes = labels
            .iter()
            .map(|label| {
                label.as_ref().map(|label| {
                    let label: &str = label.as_ref();
                    *index.entry(label.to_string()).or_insert_with(|| {
                        levels.push(label.to_string());
                        levels.len() - 1
                    })
                })
            })
            .collect();
        Self {
            codes,
            levels,
            ordered,
        }
    }

    /// Build from labels against a fixed level set; unknown labels are errors.
    pub fn with_levels<S: AsRef<str>>(
        labels: &[Option<S>],
        levels: Vec<String>,
        ordered: bool,
    ) -> Result<Self> {
        let index: HashMap<&str, usize> = levels
            .iter()
            .enumerate()
            .map(|(idx, level)| (level.as_str(), idx))
            .collect();
        let codes = labels
            .iter()
            .map(|label| match label {
                None => Ok(None),
                Some(label) => {
                    let label: &str = label.as_ref();
                    index.get(label).copied().map(Some).ok_or_else(|| {
                        RecodeError::invalid_input(format!(
                            "label '{label}' is not one of the categorical levels"
                        ))
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(levels, codes, ordered)
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn codes(&self) -> &[Option<usize>] {
        &self.codes
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The label of every element.
    pub fn labels(&self) -> Vec<Option<&str>> {
        self.codes
            .iter()
            .map(|code| code.map(|code| self.levels[code].as_str()))
            .collect()
    }
}

/// The payload of a [`ValueVector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Values {
    Text(Vec<Option<String>>),
    Categorical(Categorical),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(values) => values.len(),
            Self::Categorical(categorical) => categorical.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A sequence of values with optional per-element names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawValueVector")]
pub struct ValueVector {
    values: Values,
    names: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RawValueVector {
    values: Values,
    names: Option<Vec<String>>,
}

impl TryFrom<RawValueVector> for ValueVector {
    type Error = RecodeError;

    fn try_from(raw: RawValueVector) -> Result<Self> {
        Self::from_parts(raw.values, raw.names)
    }
}

impl ValueVector {
    /// Plain text values; `None` is missing.
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            values: Values::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
            names: None,
        }
    }

    /// Plain text values with no missing elements.
    pub fn from_strs(values: &[&str]) -> Self {
        Self::text(values.iter().map(|value| Some(*value)))
    }

    pub fn categorical(categorical: Categorical) -> Self {
        Self {
            values: Values::Categorical(categorical),
            names: None,
        }
    }

    /// Attach one name per element.
    pub fn with_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.len() {
            return Err(RecodeError::invalid_input(format!(
                "{} names supplied for {} values",
                names.len(),
                self.len()
            )));
        }
        self.names = Some(names);
        Ok(self)
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.values, Values::Categorical(_))
    }

    /// The label of every element, regardless of representation.
    pub fn labels(&self) -> Vec<Option<&str>> {
        match &self.values {
            Values::Text(values) => values.iter().map(Option::as_deref).collect(),
            Values::Categorical(categorical) => categorical.labels(),
        }
    }

    pub fn into_parts(self) -> (Values, Option<Vec<String>>) {
        (self.values, self.names)
    }

    pub fn from_parts(values: Values, names: Option<Vec<String>>) -> Result<Self> {
        let vector = Self {
            values,
            names: None,
        };
        match names {
            Some(names) => vector.with_names(names),
            None => Ok(vector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_levels_follow_first_appearance() {
        let cat = Categorical::from_labels(&[Some("b"), None, Some("a"), Some("b")], true);
        assert_eq!(cat.levels(), ["b", "a"]);
        assert_eq!(cat.codes(), [Some(0), None, Some(1), Some(0)]);
        assert_eq!(cat.labels(), vec![Some("b"), None, Some("a"), Some("b")]);
    }

    #[test]
    fn categorical_rejects_bad_codes() {
        let result = Categorical::new(vec!["a".to_string()], vec![Some(1)], false);
        assert!(matches!(result, Err(RecodeError::InvalidInput(_))));
        let result = Categorical::new(vec!["a".to_string(), "a".to_string()], vec![], false);
        assert!(matches!(result, Err(RecodeError::InvalidInput(_))));
    }

    #[test]
    fn names_must_match_length() {
        let vector = ValueVector::from_strs(&["a", "b"]);
        assert!(vector.clone().with_names(vec!["x".to_string()]).is_err());
        let named = vector
            .with_names(vec!["x".to_string(), "y".to_string()])
            .unwrap();
        assert_eq!(named.names(), Some(&["x".to_string(), "y".to_string()][..]));
    }
}
