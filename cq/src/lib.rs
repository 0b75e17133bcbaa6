//! `cq`: a single-process SQL query engine that runs directly over CSV
//! files. Ties `cq-parser` (SQL text -> AST), `cq-eval` (AST ->
//! result table, storage-agnostic) and this crate's own `storage` (CSV I/O
//! via `memmap2`/`csv`) together behind one entry point.

mod error;
mod executor;
pub mod storage;

pub use error::Error;
pub use storage::CsvStorage;

use cq_core::{CsvConfig, Table};

/// Settings that outlive any single query. `csv` governs how every table
/// this engine touches is framed; `allow_delete_without_where` replaces a
/// global force flag with an explicit, caller-controlled setting.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub csv: CsvConfig,
    pub allow_delete_without_where: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            csv: CsvConfig::default(),
            allow_delete_without_where: false,
        }
    }
}

/// Parses and runs one SQL statement against CSV files on disk, per
/// `config`'s framing and safety settings.
pub fn run_sql(sql: &str, config: &EngineConfig) -> Result<Table, Error> {
    let statement = cq_parser::parse(sql)?;
    let storage = CsvStorage::new(config.csv);
    executor::execute(&storage, config, &statement)
}
