use std::path::PathBuf;

use recode_core::{CompiledRules, FrameReport};
use recode_model::Diagnostic;

#[derive(Debug)]
pub struct ApplyResult {
    pub data: PathBuf,
    pub output: Option<PathBuf>,
    pub rows: usize,
    pub report: FrameReport,
}

#[derive(Debug)]
pub struct VectorResult {
    pub labels: Vec<Option<String>>,
    /// Category order, for categorical input only.
    pub levels: Option<Vec<String>>,
    pub diagnostics: Vec<Diagnostic>,
    pub changed: usize,
}

#[derive(Debug)]
pub struct InspectResult {
    pub dictionary: PathBuf,
    pub rules: CompiledRules,
}
