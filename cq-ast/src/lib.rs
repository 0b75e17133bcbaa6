//! Abstract syntax tree for the `cq` SQL-over-CSV dialect.
//!
//! The parser returns a single owned [`Statement`] tree; evaluators
//! (`cq-eval`) borrow it immutably and may traverse nested queries
//! (subqueries, set-operation chains) more than once.

mod condition;
mod ddl;
mod dml;
mod expr;
mod operator;
mod query;
mod statement;

pub use condition::Condition;
pub use ddl::{AlterTable, CreateTable};
pub use dml::{AsSelect, Delete, Insert, Update};
pub use expr::{Case, CaseBranches, Expr, WindowFunction, WindowOrderBy};
pub use operator::{ArithOp, CompareOp, JoinKind, SetOpKind};
pub use query::{From, FromSource, GroupBy, Join, OrderByItem, Query, QueryExpr, Select, SelectItem};
pub use statement::Statement;
