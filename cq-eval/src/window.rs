use std::cmp::Ordering;
use std::collections::HashMap;

use cq_ast::{Expr, SelectItem, WindowFunction};
use cq_core::{Row, Table, Value};

use crate::context::Context;

/// Computes every window-function column of the result skeleton in place:
/// partition, sort within partition, then assign.
pub fn apply(ctx: &Context, items: &[SelectItem], rows: &[Row], result: &mut Table) {
    for (col_idx, item) in items.iter().enumerate() {
        if let Expr::WindowFunction(wf) = &item.expr {
            let values = evaluate_window_column(ctx, wf, rows);
            for (row_idx, value) in values.into_iter().enumerate() {
                result.rows[row_idx][col_idx] = value;
            }
        }
    }
}

fn evaluate_window_column(ctx: &Context, wf: &WindowFunction, rows: &[Row]) -> Vec<Value> {
    let mut output = vec![Value::Null; rows.len()];

    for partition in partitions(ctx, wf, rows) {
        let ordered = sort_partition(ctx, wf, rows, &partition);
        assign(ctx, wf, &ordered, rows, &mut output);
    }

    output
}

/// Groups row indices by `PARTITION BY` key in first-seen order. A query
/// without `PARTITION BY` is a single partition holding every row.
fn partitions(ctx: &Context, wf: &WindowFunction, rows: &[Row]) -> Vec<Vec<usize>> {
    if wf.partition_by.is_empty() {
        return vec![(0..rows.len()).collect()];
    }

    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut partitions: Vec<Vec<usize>> = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let key = wf
            .partition_by
            .iter()
            .map(|col| crate::context::resolve_column(ctx, row, col).partition_key_part())
            .collect::<Vec<_>>()
            .join("\t");
        let idx = *index.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            partitions.push(Vec::new());
            partitions.len() - 1
        });
        partitions[idx].push(i);
    }
    partitions
}

/// Stable-sorts a partition's row indices by `ORDER BY` (the grammar step
/// 2); without an `ORDER BY` the partition keeps physical row order.
fn sort_partition(ctx: &Context, wf: &WindowFunction, rows: &[Row], partition: &[usize]) -> Vec<usize> {
    let mut ordered = partition.to_vec();
    if let Some(order_by) = &wf.order_by {
        ordered.sort_by(|&a, &b| {
            let va = crate::context::resolve_column(ctx, &rows[a], &order_by.column);
            let vb = crate::context::resolve_column(ctx, &rows[b], &order_by.column);
            let ord = va.compare(&vb);
            if order_by.descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }
    ordered
}

fn assign(ctx: &Context, wf: &WindowFunction, ordered: &[usize], rows: &[Row], output: &mut [Value]) {
    if ordered.is_empty() {
        return;
    }
    let name = wf.name.to_ascii_uppercase();
    match name.as_str() {
        "ROW_NUMBER" => {
            for (pos, &idx) in ordered.iter().enumerate() {
                output[idx] = Value::Integer(pos as i64 + 1);
            }
        }
        "RANK" | "DENSE_RANK" => {
            if wf.order_by.is_none() {
                return; // the grammar: RANK/DENSE_RANK without ORDER BY is Null.
            }
            let order_col = &wf.order_by.as_ref().unwrap().column;
            let values: Vec<Value> = ordered
                .iter()
                .map(|&i| crate::context::resolve_column(ctx, &rows[i], order_col))
                .collect();
            let mut rank = 0i64;
            let mut last: Option<&Value> = None;
            for (pos, (&idx, value)) in ordered.iter().zip(values.iter()).enumerate() {
                let is_new = last.map_or(true, |lv| value.compare(lv) != Ordering::Equal);
                if name == "RANK" {
                    if is_new {
                        rank = pos as i64 + 1;
                    }
                } else if is_new {
                    rank += 1;
                }
                output[idx] = Value::Integer(rank);
                last = Some(value);
            }
        }
        "LAG" | "LEAD" => {
            let target = wf.args.first().cloned().unwrap_or(Expr::Wildcard);
            let offset = wf
                .args
                .get(1)
                .map(|e| crate::expr::evaluate(ctx, e, &rows[ordered[0]]))
                .and_then(|v| v.as_f64())
                .unwrap_or(1.0) as i64;
            let step = if name == "LAG" { -offset } else { offset };
            for (pos, &idx) in ordered.iter().enumerate() {
                let source_pos = pos as i64 + step;
                output[idx] = if source_pos >= 0 && (source_pos as usize) < ordered.len() {
                    let source_idx = ordered[source_pos as usize];
                    crate::expr::evaluate(ctx, &target, &rows[source_idx])
                } else {
                    Value::Null
                };
            }
        }
        "SUM" | "AVG" | "COUNT" | "MIN" | "MAX" => {
            let target = wf.args.first().cloned().unwrap_or(Expr::Wildcard);
            let mut prefix: Vec<Value> = Vec::with_capacity(ordered.len());
            for &idx in ordered {
                let value = if matches!(target, Expr::Wildcard) {
                    Value::Integer(0)
                } else {
                    crate::expr::evaluate(ctx, &target, &rows[idx])
                };
                prefix.push(value);
                output[idx] = crate::functions::call_aggregate(&name, &prefix);
            }
        }
        other => {
            log::warn!("unknown window function: {other}");
        }
    }
}
