//! Configuration options for dictionary resolution.

use serde::{Deserialize, Serialize};

use crate::dictionary::ColumnSelector;

/// Options for resolving a single value vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Dictionary column holding the keys.
    pub from: ColumnSelector,

    /// Dictionary column holding the canonical values.
    pub to: ColumnSelector,

    /// Suppress all diagnostics.
    pub quiet: bool,

    /// Report the values replaced by the `.default` substitute.
    /// Default: true.
    pub warn_default: bool,

    /// Wrap `.regex` patterns as `^<pattern>$`.
    /// Default: true.
    pub anchor_regex: bool,

    /// Name of the input used in diagnostics (default: `input`).
    pub input_label: Option<String>,

    /// Name of the dictionary used in diagnostics (default: `dictionary`).
    pub dictionary_label: Option<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            from: ColumnSelector::Position(1),
            to: ColumnSelector::Position(2),
            quiet: false,
            warn_default: true,
            anchor_regex: true,
            input_label: None,
            dictionary_label: None,
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, from: ColumnSelector, to: ColumnSelector) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_warn_default(mut self, warn: bool) -> Self {
        self.warn_default = warn;
        self
    }

    pub fn with_anchor_regex(mut self, anchor: bool) -> Self {
        self.anchor_regex = anchor;
        self
    }

    pub fn with_input_label(mut self, label: impl Into<String>) -> Self {
        self.input_label = Some(label.into());
        self
    }

    pub fn with_dictionary_label(mut self, label: impl Into<String>) -> Self {
        self.dictionary_label = Some(label.into());
        self
    }

    pub fn input_label(&self) -> &str {
        self.input_label.as_deref().unwrap_or("input")
    }

    pub fn dictionary_label(&self) -> &str {
        self.dictionary_label.as_deref().unwrap_or("dictionary")
    }
}

/// Options for applying a grouped dictionary to every column of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameOptions {
    /// Dictionary column holding the keys.
    pub from: ColumnSelector,

    /// Dictionary column holding the canonical values.
    pub to: ColumnSelector,

    /// Dictionary column naming the target column of each row.
    pub by: ColumnSelector,

    /// Optional numeric column ordering rows inside a group.
    pub order: Option<ColumnSelector>,

    /// Emit diagnostics. Frames are resolved quietly by default.
    pub warn: bool,

    /// Wrap `.regex` key patterns as `^<pattern>$`.
    pub anchor_regex: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            from: ColumnSelector::Position(1),
            to: ColumnSelector::Position(2),
            by: ColumnSelector::Position(3),
            order: None,
            warn: false,
            anchor_regex: true,
        }
    }
}

impl FrameOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_by(mut self, by: ColumnSelector) -> Self {
        self.by = by;
        self
    }

    pub fn with_order(mut self, order: Option<ColumnSelector>) -> Self {
        self.order = order;
        self
    }

    pub fn with_warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    /// Resolve options for one column of the frame.
    pub fn column_options(&self, column: &str) -> ResolveOptions {
        ResolveOptions {
            from: self.from.clone(),
            to: self.to.clone(),
            quiet: !self.warn,
            warn_default: true,
            anchor_regex: self.anchor_regex,
            input_label: Some(format!("column '{column}'")),
            dictionary_label: None,
        }
    }
}
