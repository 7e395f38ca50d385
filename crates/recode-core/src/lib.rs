//! Dictionary-driven recoding of categorical values.
//!
//! This crate provides the resolution engine:
//!
//! - **compile**: turns a raw dictionary table into ordered, tagged rules
//! - **resolve**: applies the rules to one value vector in a fixed precedence
//! - **order**: rebuilds the level order of categorical results
//! - **frame**: applies a grouped dictionary to the columns of a data frame

pub mod compile;
pub mod frame;
pub mod order;
pub mod resolve;

// Re-export common functions for external use
pub use compile::{CompileReport, CompiledRules, RegexRule, Rule, compile_dictionary};
pub use frame::{ColumnReport, FrameReport, dictionary_from_frame, resolve_frame};
pub use order::CategoryOrder;
pub use resolve::{Resolution, resolve, resolve_compiled};
