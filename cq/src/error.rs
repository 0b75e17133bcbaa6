use thiserror::Error;

/// Every failure mode this crate's public entry points can return: parsing,
/// evaluation, storage, and the executor's own safety checks.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] cq_parser::ParserError),
    #[error(transparent)]
    Eval(#[from] cq_eval::EvalError),
    #[error(
        "DELETE without a WHERE clause deletes every row; pass allow_delete_without_where to permit it"
    )]
    DeleteWithoutWhereNotAllowed,
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("cannot drop the only remaining column of '{0}'")]
    CannotDropOnlyColumn(String),
    #[error("column count mismatch: {table} has {expected} columns, {got} value(s) given")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        got: usize,
    },
}
