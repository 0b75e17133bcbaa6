use std::fs::File;
use std::io::Cursor;

use cq_core::{Column, ColumnType, CsvConfig, Row, Table, Value};
use cq_eval::{EvalError, TableSource};
use memmap2::Mmap;

/// Loads CSV files via `memmap2` and saves them via `csv::Writer`, both
/// honoring the engine's `CsvConfig` framing. A `FROM`/`JOIN`
/// table name is the file path itself — there is no catalog indirection.
#[derive(Debug, Clone, Copy)]
pub struct CsvStorage {
    pub config: CsvConfig,
}

impl CsvStorage {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }
}

impl TableSource for CsvStorage {
    fn load(&self, name: &str) -> Result<Table, EvalError> {
        load_csv(name, self.config)
    }
}

fn load_csv(path: &str, config: CsvConfig) -> Result<Table, EvalError> {
    let file = File::open(path).map_err(|e| EvalError::TableNotFound(format!("{path}: {e}")))?;
    // SAFETY: the file isn't expected to be concurrently truncated by
    // another process while a query runs; this mirrors the original
    // engine's own mmap-based reader.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| EvalError::Io(format!("{path}: {e}")))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .quote(config.quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(&mmap[..]));
    let mut records = reader.records();

    let mut columns = Vec::new();
    let mut rows = Vec::new();

    // The first physical line always determines the schema; if the table
    // has no header row it is also parsed a second time as the first data
    // row (matches the original reader's two-pass treatment of line one).
    if let Some(first) = records.next() {
        let first = first.map_err(|e| EvalError::Io(format!("{path}: {e}")))?;
        columns = first
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let name = if config.has_header && !field.trim().is_empty() {
                    field.trim().to_string()
                } else {
                    format!("${i}")
                };
                Column::new(name, ColumnType::String)
            })
            .collect();
        if !config.has_header {
            rows.push(row_from_record(&first, columns.len()));
        }
    }

    for record in records {
        let record = record.map_err(|e| EvalError::Io(format!("{path}: {e}")))?;
        rows.push(row_from_record(&record, columns.len()));
    }

    let mut table = Table::new(path, columns, config);
    table.rows = rows;
    Ok(table)
}

fn row_from_record(record: &csv::StringRecord, column_count: usize) -> Row {
    let mut values: Vec<Value> = record.iter().map(Value::parse_cell).collect();
    values.resize(column_count, Value::Null);
    Row::new(values)
}

/// Writes `table` back out to `path` with its own `csv` framing, through the
/// same `csv` crate used for reading: `csv::Writer`'s default quoting
/// (`QuoteStyle::Necessary`) quotes a field only when it contains the
/// delimiter, the quote character, `\n` or `\r`, and escapes an embedded
/// quote by doubling it.
pub fn save_csv(path: &str, table: &Table) -> Result<(), EvalError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(table.csv.delimiter)
        .quote(table.csv.quote)
        .has_headers(false)
        .from_path(path)
        .map_err(|e| EvalError::Io(format!("{path}: {e}")))?;

    if table.csv.has_header {
        writer
            .write_record(table.columns.iter().map(|c| c.name.as_str()))
            .map_err(|e| EvalError::Io(format!("{path}: {e}")))?;
    }

    for row in &table.rows {
        writer
            .write_record(row.iter().map(|v| v.csv_field()))
            .map_err(|e| EvalError::Io(format!("{path}: {e}")))?;
    }

    writer.flush().map_err(|e| EvalError::Io(format!("{path}: {e}")))
}
