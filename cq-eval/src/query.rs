use std::collections::HashMap;

use cq_ast::{From, FromSource, Query, QueryExpr, SetOpKind};
use cq_core::Table;

use crate::context::{Context, Outer};
use crate::error::EvalError;
use crate::source::TableSource;

/// Evaluates any query shape — a single `SELECT` or a `UNION`/`INTERSECT`/
/// `EXCEPT` chain — against `source`.
/// `outer` carries the enclosing row/table when this call is itself a
/// correlated or scalar subquery.
pub fn evaluate_query_expr(
    source: &dyn TableSource,
    query_expr: &QueryExpr,
    outer: Option<Outer>,
) -> Result<Table, EvalError> {
    match query_expr {
        QueryExpr::Select(query) => evaluate_select(source, query, outer),
        QueryExpr::SetOp {
            op,
            all,
            left,
            right,
        } => {
            let left = evaluate_query_expr(source, left, outer)?;
            let right = evaluate_query_expr(source, right, outer)?;
            match op {
                SetOpKind::Union => crate::result::union(left, right, *all),
                SetOpKind::Intersect => crate::result::intersect(left, right),
                SetOpKind::Except => crate::result::except(left, right),
            }
        }
    }
}

fn evaluate_select(source: &dyn TableSource, query: &Query, outer: Option<Outer>) -> Result<Table, EvalError> {
    let mut tables: HashMap<String, Table> = HashMap::new();
    let mut current = load_from(source, query.from.as_ref(), &mut tables)?;

    let from_alias = query.from.as_ref().and_then(from_alias);
    let mut first_join = true;
    for join in &query.joins {
        let left_alias = if first_join { from_alias.as_deref() } else { None };
        current = crate::join::apply(source, &mut tables, &current, left_alias, join)?;
        first_join = false;
    }

    let filtered: Vec<cq_core::Row> = if let Some(filter) = &query.filter {
        let ctx = Context {
            source,
            tables: tables.clone(),
            current: current.clone(),
            select: Some(&query.select),
            outer,
        };
        current
            .rows
            .iter()
            .filter(|row| crate::condition::evaluate(&ctx, filter, row))
            .cloned()
            .collect()
    } else {
        current.rows.clone()
    };

    let ctx = Context {
        source,
        tables,
        current,
        select: Some(&query.select),
        outer,
    };

    let mut result = if crate::group::select_has_aggregate(&query.select) || query.group_by.is_some() {
        crate::group::evaluate(
            &ctx,
            &query.select,
            query.group_by.as_ref(),
            query.having.as_ref(),
            &filtered,
        )
    } else {
        let items = crate::result::expand_wildcards(&query.select.items, &ctx.current);
        let mut projected = crate::result::project(&ctx, &items, &filtered);
        crate::window::apply(&ctx, &items, &filtered, &mut projected);
        projected
    };

    crate::result::apply_order_by(&mut result, &query.order_by, &query.select.items);
    if query.select.distinct {
        crate::result::apply_distinct(&mut result);
    }
    crate::result::apply_limit_offset(&mut result, query.limit, query.offset);

    Ok(result)
}

fn load_from(
    source: &dyn TableSource,
    from: Option<&From>,
    tables: &mut HashMap<String, Table>,
) -> Result<Table, EvalError> {
    let Some(from) = from else {
        return Ok(Table::empty("query_result"));
    };
    let table = match &from.source {
        FromSource::Table(name) => source.load(name)?,
        FromSource::Subquery(query_expr) => evaluate_query_expr(source, query_expr, None)?,
    };
    let alias = from_alias(from).unwrap_or_else(|| table.origin.clone());
    tables.insert(alias.to_ascii_lowercase(), table.clone());
    Ok(table)
}

fn from_alias(from: &From) -> Option<String> {
    from.alias.clone().or_else(|| match &from.source {
        FromSource::Table(name) => Some(name.clone()),
        FromSource::Subquery(_) => None,
    })
}
