//! Error types for the selection engine.

use thiserror::Error;

/// Reasons a selection update is rejected. The prior selection is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("level {level} does not exist")]
    UnknownLevel { level: usize },

    /// More values than the level allows.
    #[error("max {max} options can be selected for {column} ({attempted} given)")]
    CapExceeded {
        column: String,
        max: usize,
        attempted: usize,
    },

    /// The parent level has nothing selected, so this level is disabled.
    #[error("{column} is disabled until {parent} has a selection")]
    ParentUnselected { column: String, parent: String },

    /// The value is not among the level's current options.
    #[error("'{value}' is not an option for {column}")]
    UnknownOption { column: String, value: String },
}

/// Errors raised while writing or reading the newline-delimited export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize combination: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("line {line}: invalid JSON record: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: record is not a JSON object")]
    NotAnObject { line: usize },

    #[error("line {line}: missing field '{field}'")]
    MissingField { line: usize, field: String },

    #[error("line {line}: field '{field}' has the wrong shape: {source}")]
    InvalidField {
        line: usize,
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = SelectionError> = std::result::Result<T, E>;
