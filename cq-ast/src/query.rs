use core::fmt;

use crate::condition::Condition;
use crate::expr::Expr;
use crate::operator::{JoinKind, SetOpKind};

/// Top-level query shape: a single `SELECT` or a left-associative chain of
/// `UNION`/`INTERSECT`/`EXCEPT` built by the parser's post-query loop.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    Select(Box<Query>),
    SetOp {
        op: SetOpKind,
        all: bool,
        left: Box<QueryExpr>,
        right: Box<QueryExpr>,
    },
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryExpr::Select(q) => write!(f, "{}", q),
            QueryExpr::SetOp {
                op,
                all,
                left,
                right,
            } => write!(
                f,
                "{} {}{} {}",
                left,
                op,
                if *all { " ALL" } else { "" },
                right
            ),
        }
    }
}

/// A single `SELECT ... FROM ... [JOIN ...] [WHERE ...] [GROUP BY ...]
/// [HAVING ...] [ORDER BY ...] [LIMIT ...] [OFFSET ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub select: Select,
    pub from: Option<From>,
    pub joins: Vec<Join>,
    pub filter: Option<Condition>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Condition>,
    pub order_by: Vec<OrderByItem>,
    /// `None` means no `LIMIT` clause.
    pub limit: Option<i64>,
    /// `None` means no `OFFSET` clause.
    pub offset: Option<i64>,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.select.distinct {
            write!(f, "DISTINCT ")?;
        }
        for (i, item) in self.select.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item.text)?;
        }
        if let Some(from) = &self.from {
            write!(f, " FROM {}", from)?;
        }
        for join in &self.joins {
            write!(f, " {}", join)?;
        }
        if let Some(filter) = &self.filter {
            write!(f, " WHERE {}", filter)?;
        }
        if let Some(gb) = &self.group_by {
            write!(f, " GROUP BY {}", gb)?;
        }
        if let Some(h) = &self.having {
            write!(f, " HAVING {}", h)?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY ")?;
            for (i, ob) in self.order_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} {}", ob.text, if ob.descending { "DESC" } else { "ASC" })?;
            }
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        Ok(())
    }
}

/// A single projected column: its AST (for evaluation), its reconstructed
/// text form (used as display name and a GROUP BY/ORDER BY binding key)
/// and its optional `AS` alias.
///
/// The source's three parallel arrays (`column_expressions`,
/// `column_text`, implicit alias storage) are merged into one `Vec` of a
/// struct here — an idiomatic tightening, not a behavior change.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub text: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub items: Vec<SelectItem>,
    pub distinct: bool,
}

/// `FROM <table-identifier|subquery> [[AS] alias]`.
#[derive(Debug, Clone, PartialEq)]
pub enum FromSource {
    Table(String),
    Subquery(Box<QueryExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct From {
    pub source: FromSource,
    pub alias: Option<String>,
}

impl fmt::Display for From {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            FromSource::Table(t) => write!(f, "'{}'", t)?,
            FromSource::Subquery(q) => write!(f, "({})", q)?,
        }
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

/// `[INNER|LEFT|RIGHT|FULL] JOIN <table> [[AS] alias] ON <condition>`.
/// The right side of a join is always a table, never a subquery.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: Option<String>,
    pub on: Condition,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} JOIN '{}'", self.kind, self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        write!(f, " ON {}", self.on)
    }
}

/// Each element is either a bare column name or a reference to a
/// `SELECT`-list alias, resolved by text match at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub items: Vec<Expr>,
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

/// `ORDER BY` item: a text form (a simple name or a reconstructed function
/// call like `AVG(col)`) matched against result column names at
/// evaluation time, plus the sort direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub text: String,
    pub descending: bool,
}
