use crate::condition::Condition;
use crate::expr::Expr;
use crate::query::QueryExpr;

/// `INSERT INTO table [(col1, col2, ...)] VALUES (val1, val2, ...)`.
/// Only a single `VALUES` tuple is supported.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Option<Vec<String>>,
    pub values: Vec<Expr>,
}

/// `UPDATE table SET col = expr [, ...] [WHERE condition]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Expr)>,
    pub filter: Option<Condition>,
}

/// `DELETE FROM table [WHERE condition]`. A `filter` of `None` deletes
/// every row and is rejected by the executor unless it was configured to
/// allow it — the parser has no notion of
/// that setting and always accepts the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filter: Option<Condition>,
}

/// Query source of a `CREATE TABLE name AS SELECT ...` (boxed so `ddl.rs`
/// doesn't need to depend on `dml.rs`).
pub type AsSelect = Box<QueryExpr>;
