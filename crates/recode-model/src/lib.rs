pub mod diagnostics;
pub mod dictionary;
pub mod error;
pub mod options;
pub mod values;

pub use diagnostics::Diagnostic;
pub use dictionary::{Cell, ColumnSelector, DictionaryColumn, DictionaryTable};
pub use error::{RecodeError, Result};
pub use options::{FrameOptions, ResolveOptions};
pub use values::{Categorical, ValueVector, Values};
