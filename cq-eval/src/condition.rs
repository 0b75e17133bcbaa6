use cq_ast::{CompareOp, Condition};
use cq_core::{Row, Value};

use crate::context::{Context, Outer};

/// Evaluates a boolean condition against one row.
pub fn evaluate(ctx: &Context, condition: &Condition, row: &Row) -> bool {
    match condition {
        Condition::Not(inner) => !evaluate(ctx, inner, row),
        Condition::And(left, right) => evaluate(ctx, left, row) && evaluate(ctx, right, row),
        Condition::Or(left, right) => evaluate(ctx, left, row) || evaluate(ctx, right, row),
        Condition::Comparison { left, op, right } => {
            let left = crate::expr::evaluate(ctx, left, row);
            let right = crate::expr::evaluate(ctx, right, row);
            compare(*op, &left, &right)
        }
        Condition::InList {
            expr,
            negated,
            list,
        } => {
            let value = crate::expr::evaluate(ctx, expr, row);
            let found = list
                .iter()
                .any(|item| value.value_eq(&crate::expr::evaluate(ctx, item, row)));
            found != *negated
        }
        Condition::InSubquery {
            expr,
            negated,
            subquery,
        } => {
            let value = crate::expr::evaluate(ctx, expr, row);
            let found = evaluate_in_subquery(ctx, &value, subquery, row);
            found != *negated
        }
        Condition::Like {
            expr,
            negated,
            pattern,
            case_insensitive,
        } => {
            let value = crate::expr::evaluate(ctx, expr, row);
            let pattern = crate::expr::evaluate(ctx, pattern, row);
            let matched = match (value.as_str(), pattern.as_str()) {
                (Some(v), Some(p)) => like_match(v, p, *case_insensitive),
                _ => false,
            };
            matched != *negated
        }
    }
}

pub(crate) fn compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    use std::cmp::Ordering::*;
    let ordering = left.compare(right);
    match op {
        CompareOp::Eq => ordering == Equal,
        CompareOp::NotEq => ordering != Equal,
        CompareOp::Lt => ordering == Less,
        CompareOp::Le => ordering != Greater,
        CompareOp::Gt => ordering == Greater,
        CompareOp::Ge => ordering != Less,
    }
}

/// `IN (subquery)` inherits the current row as outer context for
/// correlation; the subquery must return exactly one column.
fn evaluate_in_subquery(
    ctx: &Context,
    value: &Value,
    subquery: &cq_ast::QueryExpr,
    row: &Row,
) -> bool {
    let outer = Outer {
        row,
        table: &ctx.current,
    };
    let result = match crate::query::evaluate_query_expr(ctx.source, subquery, Some(outer)) {
        Ok(result) => result,
        Err(e) => {
            log::warn!("IN subquery failed: {e}");
            return false;
        }
    };
    if result.column_count() != 1 {
        log::warn!(
            "IN subquery returned {} columns, expected exactly 1",
            result.column_count()
        );
        return false;
    }
    result
        .rows
        .iter()
        .any(|r| r.get(0).is_some_and(|cell| cell.value_eq(value)))
}

/// Classic recursive-backtracking `LIKE` matcher: `%`
/// matches any run (including empty), `_` matches exactly one character.
pub(crate) fn like_match(text: &str, pattern: &str, case_insensitive: bool) -> bool {
    let text: Vec<char> = if case_insensitive {
        text.to_ascii_lowercase().chars().collect()
    } else {
        text.chars().collect()
    };
    let pattern: Vec<char> = if case_insensitive {
        pattern.to_ascii_lowercase().chars().collect()
    } else {
        pattern.chars().collect()
    };
    like_match_at(&text, &pattern)
}

fn like_match_at(text: &[char], pattern: &[char]) -> bool {
    match pattern.first() {
        None => text.is_empty(),
        Some('%') => {
            // A run of `%` absorbs like a single one; try matching the
            // rest of the pattern at every possible split point,
            // including consuming the whole remaining text.
            let rest = &pattern[1..];
            if like_match_at(text, rest) {
                return true;
            }
            for i in 0..text.len() {
                if like_match_at(&text[i + 1..], rest) {
                    return true;
                }
            }
            false
        }
        Some('_') => !text.is_empty() && like_match_at(&text[1..], &pattern[1..]),
        Some(c) => !text.is_empty() && text[0] == *c && like_match_at(&text[1..], &pattern[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_matches_any_run_including_empty() {
        assert!(like_match("Alice", "A%", false));
        assert!(like_match("A", "A%", false));
        assert!(like_match("anything", "%", false));
    }

    #[test]
    fn underscore_matches_exactly_one_character() {
        assert!(like_match("cat", "c_t", false));
        assert!(!like_match("ct", "c_t", false));
    }

    #[test]
    fn ilike_folds_case() {
        assert!(!like_match("Alice", "a%", false));
        assert!(like_match("Alice", "a%", true));
    }

    #[test]
    fn mixed_percent_and_underscore() {
        assert!(like_match("abcdef", "a%c_ef", false));
    }
}
