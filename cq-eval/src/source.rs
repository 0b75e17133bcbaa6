use cq_core::Table;

use crate::error::EvalError;

/// Supplies the tabular values named in a `FROM`/`JOIN` clause (the grammar:
/// "the core consumes from the reader a tabular value"). Implemented by
/// `cq::storage` over real CSV files; tests in this crate use an in-memory
/// implementation.
pub trait TableSource {
    fn load(&self, name: &str) -> Result<Table, EvalError>;
}

/// A fixed set of in-memory tables, keyed by the name a query would load
/// them under. Used by this crate's own tests and available to downstream
/// crates for theirs.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    tables: std::collections::HashMap<String, Table>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: impl Into<String>, table: Table) -> Self {
        self.tables.insert(name.into(), table);
        self
    }
}

impl TableSource for StaticSource {
    fn load(&self, name: &str) -> Result<Table, EvalError> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::TableNotFound(name.to_string()))
    }
}
