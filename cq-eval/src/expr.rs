use cq_ast::{ArithOp, Case, CaseBranches, Expr};
use cq_core::{Row, Value};

use crate::context::{Context, Outer};

/// Evaluates a scalar expression against one row of the current table.
/// Non-fatal errors (a scalar subquery with the wrong cardinality, a window
/// function used outside a window position, an unsupported operand type)
/// are logged and become `Value::Null` rather than propagated.
pub fn evaluate(ctx: &Context, expr: &Expr, row: &Row) -> Value {
    match expr {
        Expr::Literal(text) => Value::parse_cell(text),
        Expr::Identifier(ident) => crate::context::resolve_column(ctx, row, ident),
        Expr::Wildcard => Value::Null,
        Expr::Nested(inner) => evaluate(ctx, inner, row),
        Expr::BinaryOp { left, op, right } => {
            let right_val = evaluate(ctx, right, row);
            match left {
                Some(left) => {
                    let left_val = evaluate(ctx, left, row);
                    evaluate_binary(*op, &left_val, &right_val)
                }
                None => evaluate_unary(*op, &right_val),
            }
        }
        Expr::Function { name, args } => {
            let values: Vec<Value> = args.iter().map(|a| evaluate(ctx, a, row)).collect();
            crate::functions::call_scalar(name, &values)
        }
        Expr::WindowFunction(_) => {
            log::warn!("window function evaluated outside a window-function context");
            Value::Null
        }
        Expr::Case(case) => evaluate_case(ctx, case, row),
        Expr::Subquery(query) => evaluate_scalar_subquery(ctx, query, row),
        Expr::List(_) => {
            log::warn!("a literal list may only appear as the right-hand side of IN");
            Value::Null
        }
    }
}

/// `+ - * /` promote to Double when either side is Double, otherwise
/// preserve Integer exactness; `%` is integer modulo between two Integers
/// or IEEE remainder otherwise; `& | ^` require both Integer.
pub(crate) fn evaluate_binary(op: ArithOp, left: &Value, right: &Value) -> Value {
    if left.is_null() || right.is_null() {
        return Value::Null;
    }
    match op {
        ArithOp::Add | ArithOp::Sub | ArithOp::Mul | ArithOp::Div => {
            arith(op, left, right)
        }
        ArithOp::Mod => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => {
                if *b == 0 {
                    Value::Null
                } else {
                    Value::Integer(a % b)
                }
            }
            _ => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) if b != 0.0 => Value::Double(a % b),
                _ => Value::Null,
            },
        },
        ArithOp::BitAnd | ArithOp::BitOr | ArithOp::BitXor => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Value::Integer(match op {
                ArithOp::BitAnd => a & b,
                ArithOp::BitOr => a | b,
                ArithOp::BitXor => a ^ b,
                _ => unreachable!(),
            }),
            _ => Value::Null,
        },
    }
}

fn arith(op: ArithOp, left: &Value, right: &Value) -> Value {
    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Value::Null;
    };
    if op == ArithOp::Div && b == 0.0 {
        return Value::Null;
    }
    let result = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        _ => unreachable!(),
    };
    let both_integer = matches!(left, Value::Integer(_)) && matches!(right, Value::Integer(_));
    if both_integer && result.fract() == 0.0 && result.is_finite() {
        Value::Integer(result as i64)
    } else {
        Value::Double(result)
    }
}

pub(crate) fn evaluate_unary(op: ArithOp, operand: &Value) -> Value {
    if operand.is_null() {
        return Value::Null;
    }
    match op {
        ArithOp::Add => operand.clone(),
        ArithOp::Sub => match operand {
            Value::Integer(i) => Value::Integer(-i),
            Value::Double(d) => Value::Double(-d),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

fn evaluate_case(ctx: &Context, case: &Case, row: &Row) -> Value {
    match &case.branches {
        CaseBranches::Simple(branches) => {
            let subject = case
                .subject
                .as_ref()
                .map(|s| evaluate(ctx, s, row))
                .unwrap_or(Value::Null);
            for (when, then) in branches {
                let when_value = evaluate(ctx, when, row);
                if subject.value_eq(&when_value) {
                    return evaluate(ctx, then, row);
                }
            }
        }
        CaseBranches::Searched(branches) => {
            for (when, then) in branches {
                if crate::condition::evaluate(ctx, when, row) {
                    return evaluate(ctx, then, row);
                }
            }
        }
    }
    case.else_branch
        .as_ref()
        .map(|e| evaluate(ctx, e, row))
        .unwrap_or(Value::Null)
}

/// A scalar subquery inherits the current row/table as its outer context
/// (enabling correlation) and must return exactly one row and one column.
fn evaluate_scalar_subquery(ctx: &Context, query: &cq_ast::QueryExpr, row: &Row) -> Value {
    let outer = Outer {
        row,
        table: &ctx.current,
    };
    match crate::query::evaluate_query_expr(ctx.source, query, Some(outer)) {
        Ok(result) => {
            if result.row_count() != 1 || result.column_count() != 1 {
                log::warn!(
                    "scalar subquery returned {} row(s) and {} column(s), expected exactly 1x1",
                    result.row_count(),
                    result.column_count()
                );
                return Value::Null;
            }
            result.rows[0].get(0).cloned().unwrap_or(Value::Null)
        }
        Err(e) => {
            log::warn!("scalar subquery failed: {e}");
            Value::Null
        }
    }
}
