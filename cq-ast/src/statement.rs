use crate::ddl::{AlterTable, CreateTable};
use crate::dml::{Delete, Insert, Update};
use crate::query::QueryExpr;

/// Anything `cq-parser` can produce from a single SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(QueryExpr),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    CreateTable(CreateTable),
    AlterTable(AlterTable),
}
