//! The evaluator: turns a parsed [`cq_ast::Statement`]'s query half into a
//! [`cq_core::Table`] by walking the AST against tables supplied by a
//! [`TableSource`]. Knows nothing about physical CSV files — that's left to
//! whatever implements `TableSource`.

mod condition;
mod context;
mod error;
mod expr;
mod functions;
mod group;
mod join;
mod query;
mod result;
mod source;
mod window;

pub use condition::evaluate as evaluate_condition;
pub use context::{Context, Outer};
pub use error::EvalError;
pub use expr::evaluate as evaluate_expr;
pub use query::evaluate_query_expr;
pub use result::{except, intersect, union};
pub use source::{StaticSource, TableSource};

use cq_ast::Statement;
use cq_core::Table;

/// Evaluates the query half of a parsed statement. DML/DDL statements carry
/// their own execution (an `INSERT ... VALUES` has nothing to "evaluate"
/// beyond constructing the row, an `UPDATE`/`DELETE` needs WHERE evaluation
/// only, and an `ALTER`/`CREATE` needs none at all) and are executed by
/// `cq`'s statement runner instead, which reuses `condition`/`expr` through
/// this crate's other public items.
pub fn evaluate_query(source: &dyn TableSource, statement: &Statement) -> Result<Table, EvalError> {
    let name = match statement {
        Statement::Query(query_expr) => return evaluate_query_expr(source, query_expr, None),
        Statement::Insert(_) => "INSERT",
        Statement::Update(_) => "UPDATE",
        Statement::Delete(_) => "DELETE",
        Statement::CreateTable(_) => "CREATE TABLE",
        Statement::AlterTable(_) => "ALTER TABLE",
    };
    Err(EvalError::NotAQuery(name.to_string()))
}
