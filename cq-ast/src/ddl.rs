use crate::query::QueryExpr;

/// `CREATE TABLE name (col1, col2, ...)` or `CREATE TABLE name AS SELECT
/// ...`.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateTable {
    Schema {
        table: String,
        columns: Vec<String>,
    },
    AsSelect {
        table: String,
        query: Box<QueryExpr>,
    },
}

/// One `ALTER TABLE` operation: rename/add/drop column.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTable {
    RenameColumn {
        table: String,
        from: String,
        to: String,
    },
    AddColumn {
        table: String,
        column: String,
    },
    DropColumn {
        table: String,
        column: String,
    },
}
