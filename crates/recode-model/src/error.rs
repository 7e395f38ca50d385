use thiserror::Error;

/// Fatal errors raised before any value is rewritten.
///
/// Dictionary-quality problems (duplicate keys, unmatched values, defaulted
/// values) are never errors; they surface as [`crate::Diagnostic`]s.
#[derive(Debug, Error)]
pub enum RecodeError {
    /// The value sequence is empty, non-atomic, or inconsistently shaped.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The dictionary cannot be compiled into rules.
    #[error("invalid dictionary: {0}")]
    InvalidDictionary(String),
    /// A data frame column could not be read or replaced.
    #[error("frame error in column '{column}': {message}")]
    Frame { column: String, message: String },
}

impl RecodeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_dictionary(message: impl Into<String>) -> Self {
        Self::InvalidDictionary(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RecodeError>;
