use cq_ast::{Expr, OrderByItem, SelectItem};
use cq_core::{Column, ColumnType, CsvConfig, Row, Table, Value};

use crate::context::Context;
use crate::error::EvalError;

/// An output column's display name: the alias if given, else
/// the text form when the item is a function/window-function call (or
/// otherwise contains parentheses), else the column name with any
/// `table.` prefix stripped.
pub fn display_name(item: &SelectItem) -> String {
    if let Some(alias) = &item.alias {
        return alias.clone();
    }
    if matches!(item.expr, Expr::Function { .. } | Expr::WindowFunction(_)) || item.text.contains('(') {
        return item.text.clone();
    }
    match item.text.rsplit_once('.') {
        Some((_, col)) => col.to_string(),
        None => item.text.clone(),
    }
}

pub fn empty_projection_table(items: &[SelectItem]) -> Table {
    let columns = items
        .iter()
        .map(|item| Column::new(display_name(item), ColumnType::String))
        .collect();
    Table::new("query_result", columns, CsvConfig::default())
}

/// Expands a bare `*` item into one item per column of the current table,
/// keeping the surrounding items' positions.
pub fn expand_wildcards(items: &[SelectItem], current: &Table) -> Vec<SelectItem> {
    let mut expanded = Vec::with_capacity(items.len());
    for item in items {
        if matches!(item.expr, Expr::Wildcard) {
            for column in &current.columns {
                expanded.push(SelectItem {
                    expr: Expr::Identifier(column.name.clone()),
                    text: column.name.clone(),
                    alias: None,
                });
            }
        } else {
            expanded.push(item.clone());
        }
    }
    expanded
}

/// Projects the (non-grouped) select list over a row set.
/// Window-function columns are left `Null`; `window::apply` fills them in
/// afterwards once the skeleton exists.
pub fn project(ctx: &Context, items: &[SelectItem], rows: &[Row]) -> Table {
    let mut table = empty_projection_table(items);
    table.rows = rows
        .iter()
        .map(|row| {
            let values = items
                .iter()
                .map(|item| match &item.expr {
                    Expr::WindowFunction(_) => Value::Null,
                    expr => crate::expr::evaluate(ctx, expr, row),
                })
                .collect();
            Row::new(values)
        })
        .collect();
    table
}

/// `ORDER BY` binds against the *result*: either its display column names
/// or the original select text forms with a `table.` prefix stripped.
/// Unresolved references are logged and leave rows in place.
pub fn apply_order_by(result: &mut Table, order_by: &[OrderByItem], select_items: &[SelectItem]) {
    if order_by.is_empty() {
        return;
    }
    let mut keys = Vec::with_capacity(order_by.len());
    for item in order_by {
        let idx = resolve_order_column(result, select_items, &item.text);
        match idx {
            Some(idx) => keys.push((idx, item.descending)),
            None => log::warn!("ORDER BY reference not found: {}", item.text),
        }
    }
    let mut indices: Vec<usize> = (0..result.rows.len()).collect();
    indices.sort_by(|&a, &b| {
        for &(col, descending) in &keys {
            let ord = result.rows[a][col].compare(&result.rows[b][col]);
            let ord = if descending { ord.reverse() } else { ord };
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
    result.rows = indices.into_iter().map(|i| result.rows[i].clone()).collect();
}

fn resolve_order_column(result: &Table, select_items: &[SelectItem], text: &str) -> Option<usize> {
    if let Some(idx) = result.column_index(text) {
        return Some(idx);
    }
    let stripped = text.rsplit_once('.').map(|(_, c)| c).unwrap_or(text);
    if let Some(idx) = result.column_index(stripped) {
        return Some(idx);
    }
    select_items.iter().position(|item| {
        item.text.eq_ignore_ascii_case(text)
            || item
                .text
                .rsplit_once('.')
                .is_some_and(|(_, c)| c.eq_ignore_ascii_case(stripped))
    })
}

/// Deduplicates rows using value equality across every column, keeping
/// first-seen order.
pub fn apply_distinct(result: &mut Table) {
    let mut kept: Vec<Row> = Vec::with_capacity(result.rows.len());
    for row in result.rows.drain(..) {
        let already_present = kept.iter().any(|k| rows_equal(k, &row));
        if !already_present {
            kept.push(row);
        }
    }
    result.rows = kept;
}

fn rows_equal(a: &Row, b: &Row) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.value_eq(y))
}

/// `LIMIT`/`OFFSET` sentinels of `None` mean "no effect".
pub fn apply_limit_offset(result: &mut Table, limit: Option<i64>, offset: Option<i64>) {
    if let Some(offset) = offset {
        let skip = offset.max(0) as usize;
        if skip >= result.rows.len() {
            result.rows.clear();
        } else {
            result.rows.drain(0..skip);
        }
    }
    if let Some(limit) = limit {
        let keep = limit.max(0) as usize;
        result.rows.truncate(keep);
    }
}

fn require_matching_columns(left: &Table, right: &Table) -> Result<(), EvalError> {
    if left.column_count() != right.column_count() {
        return Err(EvalError::ColumnCountMismatch {
            left: left.column_count(),
            right: right.column_count(),
        });
    }
    Ok(())
}

/// `UNION [ALL]`: `ALL` is a multiset concatenation, the
/// default deduplicates.
pub fn union(mut left: Table, right: Table, all: bool) -> Result<Table, EvalError> {
    require_matching_columns(&left, &right)?;
    left.rows.extend(right.rows);
    if !all {
        apply_distinct(&mut left);
    }
    left.origin = "query_result".to_string();
    Ok(left)
}

/// `INTERSECT`: distinct rows present in both sides.
pub fn intersect(mut left: Table, right: Table) -> Result<Table, EvalError> {
    require_matching_columns(&left, &right)?;
    apply_distinct(&mut left);
    left.rows.retain(|row| right.rows.iter().any(|r| rows_equal(row, r)));
    left.origin = "query_result".to_string();
    Ok(left)
}

/// `EXCEPT`: distinct rows in the left side not present in the right.
pub fn except(mut left: Table, right: Table) -> Result<Table, EvalError> {
    require_matching_columns(&left, &right)?;
    apply_distinct(&mut left);
    left.rows.retain(|row| !right.rows.iter().any(|r| rows_equal(row, r)));
    left.origin = "query_result".to_string();
    Ok(left)
}
