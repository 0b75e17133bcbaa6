//! Recursive-descent, precedence-climbing parser for the `cq` SQL-over-CSV
//! dialect. Produces a [`cq_ast::Statement`] from raw SQL text;
//! never touches the filesystem or an evaluation context.

mod condition;
mod ddl;
mod dml;
mod error;
mod expr;
mod parser;
mod query;

pub use error::ParserError;
pub use parser::Parser;

use cq_ast::Statement;
use cq_core::Keyword;

/// Parses one SQL statement: `INSERT`,
/// `UPDATE`, `DELETE`, `CREATE` and `ALTER` branch to their specialised
/// parsers; anything else is parsed as a `SELECT` query, optionally
/// followed by a chain of `UNION`/`INTERSECT`/`EXCEPT`.
pub fn parse(sql: &str) -> Result<Statement, ParserError> {
    let mut parser = Parser::new(sql)?;

    let statement = if parser.is_keyword(Keyword::INSERT) {
        Statement::Insert(dml::parse_insert(&mut parser)?)
    } else if parser.is_keyword(Keyword::UPDATE) {
        Statement::Update(dml::parse_update(&mut parser)?)
    } else if parser.is_keyword(Keyword::DELETE) {
        Statement::Delete(dml::parse_delete(&mut parser)?)
    } else if parser.is_keyword(Keyword::CREATE) {
        Statement::CreateTable(ddl::parse_create_table(&mut parser)?)
    } else if parser.is_keyword(Keyword::ALTER) {
        Statement::AlterTable(ddl::parse_alter_table(&mut parser)?)
    } else {
        Statement::Query(parser.parse_query_expr()?)
    };

    parser.eat_token(&cq_lexer::Token::SemiColon);
    if !parser.at_eof() {
        return error::expected("end of statement", Some(parser.peek()));
    }
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cq_ast::{Condition, FromSource, QueryExpr, Statement};

    #[test]
    fn parses_simple_select() {
        let stmt = parse("SELECT a, b FROM 'people' WHERE a > 1").unwrap();
        match stmt {
            Statement::Query(QueryExpr::Select(q)) => {
                assert_eq!(q.select.items.len(), 2);
                assert!(matches!(
                    q.from.unwrap().source,
                    FromSource::Table(t) if t == "people"
                ));
                assert!(q.filter.is_some());
            }
            other => panic!("expected a select query, got {:?}", other),
        }
    }

    #[test]
    fn desugars_between_into_and_of_comparisons() {
        let stmt = parse("SELECT a FROM 'x' WHERE a BETWEEN 1 AND 10").unwrap();
        match stmt {
            Statement::Query(QueryExpr::Select(q)) => {
                assert!(matches!(q.filter, Some(Condition::And(_, _))));
            }
            other => panic!("expected a select query, got {:?}", other),
        }
    }

    #[test]
    fn parses_union_chain_left_associatively() {
        let stmt = parse("SELECT a FROM 'x' UNION SELECT a FROM 'y' EXCEPT SELECT a FROM 'z'").unwrap();
        match stmt {
            Statement::Query(QueryExpr::SetOp { op, left, .. }) => {
                assert_eq!(op, cq_ast::SetOpKind::Except);
                assert!(matches!(*left, QueryExpr::SetOp { .. }));
            }
            other => panic!("expected a set-op chain, got {:?}", other),
        }
    }

    #[test]
    fn parses_insert_with_explicit_columns() {
        let stmt = parse("INSERT INTO 'people' (name, age) VALUES ('Ann', 30)").unwrap();
        assert!(matches!(stmt, Statement::Insert(_)));
    }

    #[test]
    fn parses_create_table_as_select() {
        let stmt = parse("CREATE TABLE 'copy' AS SELECT a FROM 'x'").unwrap();
        assert!(matches!(
            stmt,
            Statement::CreateTable(cq_ast::CreateTable::AsSelect { .. })
        ));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("SELECT a FROM 'x' GARBAGE").is_err());
    }
}
