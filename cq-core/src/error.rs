use thiserror::Error;

/// Errors shared across the crate boundary between the lexer, parser and
/// evaluator crates (the grammar's "schema errors" kind — column not found,
/// unknown table, column-count mismatch).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("column count mismatch: expected {expected}, found {found}")]
    ColumnCountMismatch { expected: usize, found: usize },
}
