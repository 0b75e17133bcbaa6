use std::collections::HashMap;

use cq_ast::Select;
use cq_core::{Row, Table, Value};

use crate::source::TableSource;

/// An outer row/table pair, present only while evaluating a correlated
/// subquery (the grammar: "outer row / outer table ... null when not in
/// one").
#[derive(Clone, Copy)]
pub struct Outer<'a> {
    pub row: &'a Row,
    pub table: &'a Table,
}

/// Threads the pieces `evaluate` needs to resolve an identifier or run a
/// correlated subquery: the tables loaded for the current
/// query keyed by alias, the flattened working table rows are evaluated
/// against, the enclosing `SELECT` list (for the WHERE-references-alias
/// extension), and the outer context when nested.
pub struct Context<'a> {
    pub source: &'a dyn TableSource,
    /// Alias (lowercased) -> the table as loaded, before any join
    /// prefixing. Used for dotted `alias.column` fallback resolution.
    pub tables: HashMap<String, Table>,
    /// The table the current row belongs to: either the sole `FROM` table
    /// or the flattened post-join intermediate table.
    pub current: Table,
    pub select: Option<&'a Select>,
    pub outer: Option<Outer<'a>>,
}

/// Column resolution: a four-step fallback chain tried in
/// order. Name comparison is always case-insensitive.
pub fn resolve_column(ctx: &Context, row: &Row, ident: &str) -> Value {
    // Step 1: dotted or not, try a verbatim match against the current
    // table first — this is what makes join-prefixed names (`a.c`) work.
    if let Some(idx) = ctx.current.column_index(ident) {
        return row.get(idx).cloned().unwrap_or(Value::Null);
    }

    if let Some((alias, col)) = ident.split_once('.') {
        // Step 2: look up the table alias directly, then fall back to the
        // outer row/table for a correlated subquery.
        if let Some(table) = ctx.tables.get(&alias.to_ascii_lowercase()) {
            if let Some(idx) = table.column_index(col) {
                if idx < row.len() {
                    return row.get(idx).cloned().unwrap_or(Value::Null);
                }
            }
        }
        if let Some(outer) = &ctx.outer {
            if let Some(idx) = outer.table.column_index(col) {
                return outer.row.get(idx).cloned().unwrap_or(Value::Null);
            }
        }
    } else {
        // Step 3: bare name, not found on the current table — check the
        // outer table (also covers a non-dotted identifier inside a
        // correlated subquery).
        if let Some(outer) = &ctx.outer {
            if let Some(idx) = outer.table.column_index(ident) {
                return outer.row.get(idx).cloned().unwrap_or(Value::Null);
            }
        }
    }

    // Step 4: WHERE referencing a SELECT-list alias (the grammar's
    // non-standard extension; the grammar design note).
    if let Some(select) = ctx.select {
        if let Some(item) = select
            .items
            .iter()
            .find(|i| i.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(ident)))
        {
            return crate::expr::evaluate(ctx, &item.expr, row);
        }
    }

    log::warn!("column not found: {ident}");
    Value::Null
}
