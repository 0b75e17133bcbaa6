use cq_ast::{AlterTable, CreateTable, Delete, Insert, QueryExpr, Statement, Update};
use cq_core::{Column, ColumnType, CsvConfig, Row, Table, Value};
use cq_eval::{Context, TableSource};

use crate::error::Error;
use crate::storage::save_csv;
use crate::EngineConfig;

/// Runs one parsed statement to completion: a `Statement::Query` is handed
/// straight to `cq_eval`, everything else mutates a CSV file in place and
/// saves it. Every statement returns a result table, even DML/DDL (an
/// empty placeholder for those).
pub fn execute(source: &dyn TableSource, config: &EngineConfig, statement: &Statement) -> Result<Table, Error> {
    match statement {
        Statement::Query(query) => Ok(cq_eval::evaluate_query_expr(source, query, None)?),
        Statement::Insert(insert) => execute_insert(source, insert),
        Statement::Update(update) => execute_update(source, update),
        Statement::Delete(delete) => execute_delete(source, config, delete),
        Statement::CreateTable(create) => execute_create_table(source, create),
        Statement::AlterTable(alter) => execute_alter_table(source, alter),
    }
}

fn empty_result(label: &str) -> Table {
    Table::empty(label)
}

/// Loads the table, builds a `Null`-everywhere row, evaluates each `VALUES`
/// expression into the column it targets (the explicit list or table order),
/// appends it, and saves.
fn execute_insert(source: &dyn TableSource, insert: &Insert) -> Result<Table, Error> {
    let mut table = source.load(&insert.table)?;

    let target_indices: Vec<usize> = match &insert.columns {
        Some(names) => names
            .iter()
            .map(|name| {
                table
                    .column_index(name)
                    .ok_or_else(|| Error::ColumnNotFound(name.clone()))
            })
            .collect::<Result<_, _>>()?,
        None => (0..table.column_count()).collect(),
    };
    if target_indices.len() != insert.values.len() {
        return Err(Error::ColumnCountMismatch {
            table: insert.table.clone(),
            expected: target_indices.len(),
            got: insert.values.len(),
        });
    }

    let ctx = blank_context(source, &table);
    let placeholder = Row::nulls(table.column_count());
    let mut values = vec![Value::Null; table.column_count()];
    for (&col, expr) in target_indices.iter().zip(&insert.values) {
        values[col] = cq_eval::evaluate_expr(&ctx, expr, &placeholder);
    }
    table.rows.push(Row::new(values));

    save_csv(&insert.table, &table)?;
    Ok(empty_result("INSERT result"))
}

/// Loads the table, evaluates `WHERE` per row (rows match all when absent),
/// and for matching rows overwrites each assigned column with its `SET`
/// expression evaluated against that row. Saves.
fn execute_update(source: &dyn TableSource, update: &Update) -> Result<Table, Error> {
    let mut table = source.load(&update.table)?;

    let targets: Vec<usize> = update
        .assignments
        .iter()
        .map(|(name, _)| {
            table
                .column_index(name)
                .ok_or_else(|| Error::ColumnNotFound(name.clone()))
        })
        .collect::<Result<_, _>>()?;

    let ctx = blank_context(source, &table);
    for row_idx in 0..table.rows.len() {
        let matches = match &update.filter {
            Some(filter) => cq_eval::evaluate_condition(&ctx, filter, &table.rows[row_idx]),
            None => true,
        };
        if !matches {
            continue;
        }
        let row = table.rows[row_idx].clone();
        for (&col, (_, expr)) in targets.iter().zip(&update.assignments) {
            let value = cq_eval::evaluate_expr(&ctx, expr, &row);
            table.rows[row_idx][col] = value;
        }
    }

    save_csv(&update.table, &table)?;
    Ok(empty_result("UPDATE result"))
}

/// Loads the table, keeps every row that does *not* match `WHERE` (all rows
/// are removed when it's absent), and saves. A `WHERE`-less
/// delete is rejected unless the engine was configured to allow it.
fn execute_delete(source: &dyn TableSource, config: &EngineConfig, delete: &Delete) -> Result<Table, Error> {
    if delete.filter.is_none() && !config.allow_delete_without_where {
        return Err(Error::DeleteWithoutWhereNotAllowed);
    }

    let mut table = source.load(&delete.table)?;
    let ctx = blank_context(source, &table);
    table.rows.retain(|row| match &delete.filter {
        Some(filter) => !cq_eval::evaluate_condition(&ctx, filter, row),
        None => false,
    });

    save_csv(&delete.table, &table)?;
    Ok(empty_result("DELETE result"))
}

/// `CREATE TABLE name (cols...)` writes a header-only CSV; `CREATE TABLE
/// name AS SELECT ...` runs the inner query and writes its full result.
fn execute_create_table(source: &dyn TableSource, create: &CreateTable) -> Result<Table, Error> {
    match create {
        CreateTable::Schema { table, columns } => {
            let schema = Table::new(
                table.clone(),
                columns
                    .iter()
                    .map(|name| Column::new(name.clone(), ColumnType::String))
                    .collect(),
                CsvConfig::default(),
            );
            save_csv(table, &schema)?;
        }
        CreateTable::AsSelect { table, query } => {
            let mut result = evaluate_as_select(source, query)?;
            result.origin = table.clone();
            result.csv = CsvConfig::default();
            save_csv(table, &result)?;
        }
    }
    Ok(empty_result("CREATE TABLE result"))
}

fn evaluate_as_select(source: &dyn TableSource, query: &QueryExpr) -> Result<Table, Error> {
    Ok(cq_eval::evaluate_query_expr(source, query, None)?)
}

/// Renames, appends (default `Null`), or drops a column, rejecting a drop
/// that would leave the table with none. Saves.
fn execute_alter_table(source: &dyn TableSource, alter: &AlterTable) -> Result<Table, Error> {
    match alter {
        AlterTable::RenameColumn { table, from, to } => {
            let mut t = source.load(table)?;
            let idx = t.column_index(from).ok_or_else(|| Error::ColumnNotFound(from.clone()))?;
            t.columns[idx].name = to.clone();
            save_csv(table, &t)?;
        }
        AlterTable::AddColumn { table, column } => {
            let mut t = source.load(table)?;
            t.columns.push(Column::new(column.clone(), ColumnType::String));
            for row in &mut t.rows {
                row.0.push(Value::Null);
            }
            save_csv(table, &t)?;
        }
        AlterTable::DropColumn { table, column } => {
            let mut t = source.load(table)?;
            if t.column_count() <= 1 {
                return Err(Error::CannotDropOnlyColumn(table.clone()));
            }
            let idx = t
                .column_index(column)
                .ok_or_else(|| Error::ColumnNotFound(column.clone()))?;
            t.columns.remove(idx);
            for row in &mut t.rows {
                row.0.remove(idx);
            }
            save_csv(table, &t)?;
        }
    }
    Ok(empty_result("ALTER TABLE result"))
}

/// A context with no join aliases or enclosing `SELECT`/outer row, enough
/// to evaluate a `VALUES`/`SET` expression or a `WHERE` condition that only
/// references the table being mutated.
fn blank_context<'a>(source: &'a dyn TableSource, table: &Table) -> Context<'a> {
    Context {
        source,
        tables: std::collections::HashMap::new(),
        current: table.clone(),
        select: None,
        outer: None,
    }
}
