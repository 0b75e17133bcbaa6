use thiserror::Error;

/// Fatal evaluation errors (the grammar kinds 2/4): these abort the offending
/// operation and are returned to the caller rather than being swallowed
/// into a `Value::Null` with a logged warning.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("set operation requires matching column counts: left has {left}, right has {right}")]
    ColumnCountMismatch { left: usize, right: usize },
    #[error("statement is not a query: {0}")]
    NotAQuery(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("{0}")]
    Core(#[from] cq_core::CoreError),
}
