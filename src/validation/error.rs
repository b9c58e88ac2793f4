//! Defines the error types for the validation module.
use crate::error::GroupTreeError;

/// The specific category of a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorType {
    /// A rate vector on the connection into a node is not in the summary.
    MissingConnectionSignal,
    /// A well has no status vector, so it cannot be classified.
    MissingWellStatus,
}

/// One problem found before any dataset is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub node_name: String,
    pub signal_name: String,
    pub error_type: ValidationErrorType,
    pub message: String,
}

impl From<Vec<ValidationError>> for GroupTreeError {
    fn from(errors: Vec<ValidationError>) -> Self {
        let mut signals: Vec<String> = errors.into_iter().map(|e| e.signal_name).collect();
        signals.sort();
        signals.dedup();
        GroupTreeError::MissingSignals { signals }
    }
}
