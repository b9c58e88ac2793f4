//! Crate-wide error type.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupTreeError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Missing summary vectors: {}", signals.join(", "))]
    MissingSignals { signals: Vec<String> },
    #[error("Expected exactly one topology row for node '{node}' at {date}, found {matches}")]
    AmbiguousNode { node: String, date: String, matches: usize },
    #[error("Cycle detected in the network at {date} involving node '{node}'")]
    CyclicTopology { node: String, date: String },
    #[error("No summary vector is defined for keyword {keyword} and datatype {datatype}")]
    UnsupportedCombination { keyword: String, datatype: String },
    #[error("Summary provider failed: {0}")]
    Provider(String),
    #[error("Failed to serialize dataset: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, GroupTreeError>;
