use core::fmt;

use crate::condition::Condition;
use crate::operator::ArithOp;
use crate::query::QueryExpr;

/// A scalar expression (the grammar's expression-shaped AST nodes: `Literal`,
/// `Identifier`, `BinaryOp`, `Function`, `WindowFunction`, `Case`,
/// `Subquery`, `List`).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Raw textual payload, parsed through the same cell-inference rule as
    /// a CSV field when evaluated.
    Literal(String),
    /// Possibly dotted identifier, e.g. `age` or `u.age`.
    Identifier(String),
    /// Bare `*`, valid only inside `COUNT(*)` or as a whole select item.
    Wildcard,
    /// Arithmetic/bitwise operation. `left == None` means this is a unary
    /// `+`/`-` applied to `right` (the grammar: "left (null -> unary)").
    BinaryOp {
        left: Option<Box<Expr>>,
        op: ArithOp,
        right: Box<Expr>,
    },
    /// A parenthesized sub-expression, kept distinct from its inner
    /// expression only for text-form reconstruction.
    Nested(Box<Expr>),
    /// Scalar or aggregate function call, dispatched by case-insensitive
    /// name.
    Function { name: String, args: Vec<Expr> },
    /// `func(args) OVER (PARTITION BY ... ORDER BY ...)`.
    WindowFunction(WindowFunction),
    /// `CASE [subject] WHEN ... THEN ... [ELSE ...] END`.
    Case(Case),
    /// A parenthesized `SELECT` used where a scalar (or membership list)
    /// value is expected.
    Subquery(Box<QueryExpr>),
    /// A literal list, used only as the right-hand side of `IN (...)`.
    List(Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(s) => write!(f, "{}", s),
            Expr::Identifier(s) => write!(f, "{}", s),
            Expr::Wildcard => write!(f, "*"),
            Expr::BinaryOp { left, op, right } => match left {
                Some(l) => write!(f, "{} {} {}", l, op, right),
                None => write!(f, "{}{}", op, right),
            },
            Expr::Nested(e) => write!(f, "({})", e),
            Expr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ")")
            }
            Expr::WindowFunction(w) => write!(f, "{}", w),
            Expr::Case(c) => write!(f, "{}", c),
            Expr::Subquery(q) => write!(f, "({})", q),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, it) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", it)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// `PARTITION BY` + `ORDER BY` clause of a window function call.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOrderBy {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowFunction {
    pub name: String,
    pub args: Vec<Expr>,
    pub partition_by: Vec<String>,
    pub order_by: Option<WindowOrderBy>,
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", a)?;
        }
        write!(f, ") OVER (")?;
        if !self.partition_by.is_empty() {
            write!(f, "PARTITION BY {}", self.partition_by.join(", "))?;
        }
        if let Some(ob) = &self.order_by {
            write!(
                f,
                " ORDER BY {} {}",
                ob.column,
                if ob.descending { "DESC" } else { "ASC" }
            )?;
        }
        write!(f, ")")
    }
}

/// `CASE` branches: either simple (`CASE subject WHEN value THEN ...`) or
/// searched (`CASE WHEN condition THEN ...`) — both legal per the grammar. A single
/// `CASE` is always entirely one form or the other.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseBranches {
    Simple(Vec<(Expr, Expr)>),
    Searched(Vec<(Condition, Expr)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub subject: Option<Box<Expr>>,
    pub branches: CaseBranches,
    pub else_branch: Option<Box<Expr>>,
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CASE")?;
        if let Some(s) = &self.subject {
            write!(f, " {}", s)?;
        }
        match &self.branches {
            CaseBranches::Simple(branches) => {
                for (when, then) in branches {
                    write!(f, " WHEN {} THEN {}", when, then)?;
                }
            }
            CaseBranches::Searched(branches) => {
                for (when, then) in branches {
                    write!(f, " WHEN {} THEN {}", when, then)?;
                }
            }
        }
        if let Some(e) = &self.else_branch {
            write!(f, " ELSE {}", e)?;
        }
        write!(f, " END")
    }
}
