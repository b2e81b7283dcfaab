use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("level chain must contain at least one level")]
    EmptyChain,
    #[error("level {position} has an empty column name")]
    EmptyColumn { position: usize },
    #[error("column '{0}' appears more than once in the level chain")]
    DuplicateColumn(String),
    #[error("level '{column}' must allow at least one selection")]
    ZeroCap { column: String },
    #[error("column '{0}' is reserved for the combination identifier")]
    ReservedColumn(String),
    #[error("unknown level '{0}'")]
    UnknownLevel(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
