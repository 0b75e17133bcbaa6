use std::collections::HashMap;

use cq_ast::{Condition, Expr, GroupBy, Select};
use cq_core::{Row, Table, Value};

use crate::context::Context;

const AGGREGATE_NAMES: &[&str] = &[
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "STDDEV",
    "STDDEV_POP",
    "MEDIAN",
];

pub fn is_aggregate_call(expr: &Expr) -> bool {
    matches!(expr, Expr::Function { name, .. } if AGGREGATE_NAMES.contains(&name.to_ascii_uppercase().as_str()))
}

/// True if `expr` contains a call to an aggregate function anywhere in its
/// tree (used to decide the "implicit single group" rule of the grammar).
pub fn contains_aggregate(expr: &Expr) -> bool {
    match expr {
        Expr::Function { args, .. } => is_aggregate_call(expr) || args.iter().any(contains_aggregate),
        Expr::BinaryOp { left, right, .. } => {
            left.as_deref().is_some_and(contains_aggregate) || contains_aggregate(right)
        }
        Expr::Nested(inner) => contains_aggregate(inner),
        Expr::Case(case) => {
            let branches = match &case.branches {
                cq_ast::CaseBranches::Simple(b) => b.iter().any(|(w, t)| contains_aggregate(w) || contains_aggregate(t)),
                cq_ast::CaseBranches::Searched(b) => b.iter().any(|(_, t)| contains_aggregate(t)),
            };
            branches || case.else_branch.as_deref().is_some_and(contains_aggregate)
        }
        _ => false,
    }
}

pub fn select_has_aggregate(select: &Select) -> bool {
    select.items.iter().any(|item| contains_aggregate(&item.expr))
}

/// Builds composite group keys (the grammar's general path subsumes the
/// single-column fast path — both produce the same groups, the fast path
/// is purely a performance shortcut this evaluator doesn't need).
///
/// Returns groups in first-row insertion order, each paired with the
/// (possibly aliased) expressions used to compute its key, the rows
/// themselves kept by value for aggregate/representative-row evaluation.
fn build_groups(ctx: &Context, select: &Select, group_by: Option<&GroupBy>, rows: &[Row]) -> Vec<(String, Vec<Row>)> {
    let key_exprs: Vec<Expr> = match group_by {
        Some(gb) => gb
            .items
            .iter()
            .map(|expr| resolve_group_expr(expr, select))
            .collect(),
        None => Vec::new(),
    };

    if key_exprs.is_empty() {
        // Implicit single group: the whole filtered row set,
        // keyed `"_all_"`.
        return vec![("_all_".to_string(), rows.to_vec())];
    }

    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Row>)> = Vec::new();

    for row in rows {
        let key = key_exprs
            .iter()
            .map(|e| crate::expr::evaluate(ctx, e, row).group_key_part())
            .collect::<Vec<_>>()
            .join("\t");
        let idx = *index.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(row.clone());
    }
    groups
}

/// A `GROUP BY` element naming a `SELECT`-list alias is resolved to that
/// item's underlying expression (the grammar: "A group column may be an
/// alias").
fn resolve_group_expr(expr: &Expr, select: &Select) -> Expr {
    if let Expr::Identifier(name) = expr {
        if let Some(item) = select
            .items
            .iter()
            .find(|i| i.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(name)))
        {
            return item.expr.clone();
        }
    }
    expr.clone()
}

/// Builds the aggregated result table (the grammar's "Aggregated result
/// construction"), then applies `HAVING` as a second pass over the
/// materialized rows.
pub fn evaluate(
    ctx: &Context,
    select: &Select,
    group_by: Option<&GroupBy>,
    having: Option<&Condition>,
    rows: &[Row],
) -> Table {
    let groups = build_groups(ctx, select, group_by, rows);
    let display_names: Vec<String> = select.items.iter().map(crate::result::display_name).collect();

    let mut result_rows = Vec::with_capacity(groups.len());
    for (_, group_rows) in &groups {
        let mut values = Vec::with_capacity(select.items.len());
        for item in &select.items {
            values.push(evaluate_output_item(ctx, item, group_rows));
        }
        result_rows.push(Row::new(values));
    }

    if let Some(having) = having {
        result_rows.retain(|row| evaluate_having(having, select, &display_names, row));
    }

    let mut table = crate::result::empty_projection_table(&select.items);
    table.rows = result_rows;
    table
}

fn evaluate_output_item(ctx: &Context, item: &cq_ast::SelectItem, group_rows: &[Row]) -> Value {
    if is_aggregate_call(&item.expr) {
        let Expr::Function { name, args } = &item.expr else {
            unreachable!()
        };
        if name.eq_ignore_ascii_case("COUNT") && matches!(args.first(), Some(Expr::Wildcard) | None) {
            return Value::Integer(group_rows.len() as i64);
        }
        let arg = args.first().cloned().unwrap_or(Expr::Wildcard);
        let values: Vec<Value> = group_rows
            .iter()
            .map(|row| crate::expr::evaluate(ctx, &arg, row))
            .collect();
        crate::functions::call_aggregate(name, &values)
    } else if let Some(first) = group_rows.first() {
        // Representative-row semantics for non-aggregate projections,
        // including bare column references.
        crate::expr::evaluate(ctx, &item.expr, first)
    } else {
        Value::Null
    }
}

fn resolve_having_value(expr: &Expr, select: &Select, display_names: &[String], row: &Row) -> Value {
    let text = expr.to_string();
    if let Some(idx) = select.items.iter().position(|it| {
        it.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(&text)) || it.text.eq_ignore_ascii_case(&text)
    }) {
        return row.get(idx).cloned().unwrap_or(Value::Null);
    }
    if let Some(idx) = display_names.iter().position(|n| n.eq_ignore_ascii_case(&text)) {
        return row.get(idx).cloned().unwrap_or(Value::Null);
    }
    match expr {
        Expr::Literal(s) => Value::parse_cell(s),
        Expr::Nested(inner) => resolve_having_value(inner, select, display_names, row),
        Expr::BinaryOp { left, op, right } => {
            let r = resolve_having_value(right, select, display_names, row);
            match left {
                Some(l) => {
                    let l = resolve_having_value(l, select, display_names, row);
                    crate::expr::evaluate_binary(*op, &l, &r)
                }
                None => crate::expr::evaluate_unary(*op, &r),
            }
        }
        _ => {
            log::warn!("unresolvable HAVING reference: {text}");
            Value::Null
        }
    }
}

/// Re-evaluates `HAVING` against the *materialized* aggregated rows: any
/// reference inside it is matched by its reconstructed text form against
/// the result's column names rather than re-run over raw input rows.
fn evaluate_having(condition: &Condition, select: &Select, display_names: &[String], row: &Row) -> bool {
    match condition {
        Condition::Not(c) => !evaluate_having(c, select, display_names, row),
        Condition::And(l, r) => {
            evaluate_having(l, select, display_names, row) && evaluate_having(r, select, display_names, row)
        }
        Condition::Or(l, r) => {
            evaluate_having(l, select, display_names, row) || evaluate_having(r, select, display_names, row)
        }
        Condition::Comparison { left, op, right } => {
            let l = resolve_having_value(left, select, display_names, row);
            let r = resolve_having_value(right, select, display_names, row);
            crate::condition::compare(*op, &l, &r)
        }
        Condition::InList { expr, negated, list } => {
            let v = resolve_having_value(expr, select, display_names, row);
            let found = list
                .iter()
                .any(|e| v.value_eq(&resolve_having_value(e, select, display_names, row)));
            found != *negated
        }
        Condition::Like {
            expr,
            negated,
            pattern,
            case_insensitive,
        } => {
            let v = resolve_having_value(expr, select, display_names, row);
            let p = resolve_having_value(pattern, select, display_names, row);
            let matched = match (v.as_str(), p.as_str()) {
                (Some(a), Some(b)) => crate::condition::like_match(a, b, *case_insensitive),
                _ => false,
            };
            matched != *negated
        }
        Condition::InSubquery { .. } => {
            log::warn!("IN (subquery) inside HAVING is not supported");
            false
        }
    }
}
