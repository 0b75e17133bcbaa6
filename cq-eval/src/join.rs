use std::collections::HashMap;

use cq_ast::{Join, JoinKind};
use cq_core::{Column, Row, Table, Value};

use crate::context::Context;
use crate::error::EvalError;
use crate::source::TableSource;

/// Applies one join clause against the current left-hand intermediate
/// table: loads the right table, renames its columns to
/// `alias.name`, and — only for the first join in the chain, when `left`
/// is still the untouched `FROM` table — renames the left side's columns
/// too, so every join after the first sees already-prefixed names on the
/// left and doesn't re-prefix them.
pub fn apply(
    source: &dyn TableSource,
    tables: &mut HashMap<String, Table>,
    left: &Table,
    left_alias: Option<&str>,
    join: &Join,
) -> Result<Table, EvalError> {
    let right = source.load(&join.table)?;
    let right_alias = join.alias.clone().unwrap_or_else(|| join.table.clone());
    tables.insert(right_alias.to_ascii_lowercase(), right.clone());

    let mut columns = Vec::with_capacity(left.columns.len() + right.columns.len());
    match left_alias {
        Some(alias) => {
            for c in &left.columns {
                columns.push(Column::new(format!("{}.{}", alias, c.name), c.ty));
            }
        }
        None => columns.extend(left.columns.iter().cloned()),
    }
    for c in &right.columns {
        columns.push(Column::new(format!("{}.{}", right_alias, c.name), c.ty));
    }

    // A throwaway context whose only job is to let `condition::evaluate`
    // resolve the prefixed column names in `ON` against a combined row.
    let on_ctx = Context {
        source,
        tables: HashMap::new(),
        current: Table::new("joined_result", columns.clone(), left.csv),
        select: None,
        outer: None,
    };

    let left_width = left.columns.len();
    let right_width = right.columns.len();
    let mut rows = Vec::new();
    let mut right_matched = vec![false; right.rows.len()];

    for l in &left.rows {
        let mut matched_any = false;
        for (ri, r) in right.rows.iter().enumerate() {
            let combined = combine(l, r);
            if crate::condition::evaluate(&on_ctx, &join.on, &combined) {
                matched_any = true;
                right_matched[ri] = true;
                rows.push(combined);
            }
        }
        if !matched_any && matches!(join.kind, JoinKind::Left | JoinKind::Full) {
            let mut values = l.0.clone();
            values.extend(std::iter::repeat(Value::Null).take(right_width));
            rows.push(Row::new(values));
        }
    }

    if matches!(join.kind, JoinKind::Right | JoinKind::Full) {
        for (ri, r) in right.rows.iter().enumerate() {
            if !right_matched[ri] {
                let mut values = vec![Value::Null; left_width];
                values.extend(r.0.iter().cloned());
                rows.push(Row::new(values));
            }
        }
    }

    let mut result = Table::new("joined_result", columns, left.csv);
    result.rows = rows;
    Ok(result)
}

fn combine(left: &Row, right: &Row) -> Row {
    let mut values = Vec::with_capacity(left.len() + right.len());
    values.extend(left.0.iter().cloned());
    values.extend(right.0.iter().cloned());
    Row::new(values)
}
