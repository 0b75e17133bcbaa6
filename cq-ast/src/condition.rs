use core::fmt;

use crate::expr::Expr;
use crate::operator::CompareOp;
use crate::query::QueryExpr;

/// Boolean-valued AST node (the grammar's `Condition`). Represented as a
/// tagged union of its actual shapes rather than the source's single
/// struct keyed by an operator string/enum, per the "tagged-union AST"
/// design note — `NOT`/`AND`/`OR` recurse structurally instead of storing
/// a `NOT` operator with a null right-hand side.
///
/// `BETWEEN low AND high` is desugared at parse time into
/// `And(Ge(expr, low), Le(expr, high))`, matching the grammar exactly; there
/// is no separate `Between` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Comparison {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },
    InList {
        expr: Expr,
        negated: bool,
        list: Vec<Expr>,
    },
    InSubquery {
        expr: Expr,
        negated: bool,
        subquery: Box<QueryExpr>,
    },
    Like {
        expr: Expr,
        negated: bool,
        pattern: Expr,
        case_insensitive: bool,
    },
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Not(c) => write!(f, "NOT {}", c),
            Condition::And(l, r) => write!(f, "{} AND {}", l, r),
            Condition::Or(l, r) => write!(f, "{} OR {}", l, r),
            Condition::Comparison { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Condition::InList {
                expr,
                negated,
                list,
            } => {
                write!(f, "{} {}IN (", expr, if *negated { "NOT " } else { "" })?;
                for (i, e) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, ")")
            }
            Condition::InSubquery {
                expr,
                negated,
                subquery,
            } => write!(
                f,
                "{} {}IN ({})",
                expr,
                if *negated { "NOT " } else { "" },
                subquery
            ),
            Condition::Like {
                expr,
                negated,
                pattern,
                case_insensitive,
            } => write!(
                f,
                "{} {}{} {}",
                expr,
                if *negated { "NOT " } else { "" },
                if *case_insensitive { "ILIKE" } else { "LIKE" },
                pattern
            ),
        }
    }
}
