use cq_ast::{
    From, FromSource, GroupBy, Join, JoinKind, OrderByItem, Query, QueryExpr, Select, SelectItem,
    SetOpKind,
};
use cq_core::Keyword;
use cq_lexer::Token;

use crate::error::ParserError;
use crate::parser::Parser;

/// Builds the left-associative `UNION`/`INTERSECT`/`EXCEPT` chain on top of
/// a single `SELECT`.
pub fn parse_query_expr(parser: &mut Parser) -> Result<QueryExpr, ParserError> {
    let mut left = QueryExpr::Select(Box::new(parse_select_query(parser)?));
    loop {
        let op = if parser.eat_keyword(Keyword::UNION) {
            SetOpKind::Union
        } else if parser.eat_keyword(Keyword::INTERSECT) {
            SetOpKind::Intersect
        } else if parser.eat_keyword(Keyword::EXCEPT) {
            SetOpKind::Except
        } else {
            break;
        };
        let all = parser.eat_keyword(Keyword::ALL);
        let right = QueryExpr::Select(Box::new(parse_select_query(parser)?));
        left = QueryExpr::SetOp {
            op,
            all,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

/// Parses a single `SELECT` statement's fixed clause order.
fn parse_select_query(parser: &mut Parser) -> Result<Query, ParserError> {
    parser.expect_keyword(Keyword::SELECT)?;
    let select = parse_select_list(parser)?;

    let from = if parser.eat_keyword(Keyword::FROM) {
        Some(parse_from(parser)?)
    } else {
        None
    };

    let mut joins = Vec::new();
    while let Some(kind) = peek_join_kind(parser) {
        joins.push(parse_join(parser, kind)?);
    }

    let filter = if parser.eat_keyword(Keyword::WHERE) {
        Some(parser.parse_condition()?)
    } else {
        None
    };

    let group_by = if parser.eat_keyword(Keyword::GROUP) {
        parser.expect_keyword(Keyword::BY)?;
        let items = parser.parse_comma_separated(Parser::parse_expr)?;
        Some(GroupBy { items })
    } else {
        None
    };

    let having = if parser.eat_keyword(Keyword::HAVING) {
        Some(parser.parse_condition()?)
    } else {
        None
    };

    let order_by = if parser.eat_keyword(Keyword::ORDER) {
        parser.expect_keyword(Keyword::BY)?;
        parser.parse_comma_separated(parse_order_by_item)?
    } else {
        Vec::new()
    };

    let limit = if parser.eat_keyword(Keyword::LIMIT) {
        Some(parse_integer(parser)?)
    } else {
        None
    };

    let offset = if parser.eat_keyword(Keyword::OFFSET) {
        Some(parse_integer(parser)?)
    } else {
        None
    };

    Ok(Query {
        select,
        from,
        joins,
        filter,
        group_by,
        having,
        order_by,
        limit,
        offset,
    })
}

/// `*`, `table.*`, or a comma-separated list of
/// `<expr> [[AS] alias]`.
fn parse_select_list(parser: &mut Parser) -> Result<Select, ParserError> {
    let distinct = parser.eat_keyword(Keyword::DISTINCT);
    let items = parser.parse_comma_separated(parse_select_item)?;
    Ok(Select { items, distinct })
}

fn parse_select_item(parser: &mut Parser) -> Result<SelectItem, ParserError> {
    let expr = parser.parse_expr()?;
    let text = Parser::expr_text(&expr);
    let alias = parse_optional_alias(parser)?;
    Ok(SelectItem { expr, text, alias })
}

fn parse_from(parser: &mut Parser) -> Result<From, ParserError> {
    let source = if parser.eat_token(&Token::LParen) {
        let inner = parser.parse_query_expr()?;
        parser.expect_token(&Token::RParen)?;
        FromSource::Subquery(Box::new(inner))
    } else {
        FromSource::Table(parse_table_name(parser)?)
    };
    let alias = parse_optional_alias(parser)?;
    Ok(From { source, alias })
}

/// Table names are string literals in this dialect (the source resolves
/// them to CSV file paths), matching the grammar's grammar.
pub(crate) fn parse_table_name(parser: &mut Parser) -> Result<String, ParserError> {
    match parser.advance() {
        Token::Str(s) => Ok(s),
        Token::Ident(s) => Ok(s),
        other => crate::error::expected("a table name", Some(&other)),
    }
}

fn parse_optional_alias(parser: &mut Parser) -> Result<Option<String>, ParserError> {
    if parser.eat_keyword(Keyword::AS) {
        Ok(Some(parser.expect_ident()?))
    } else if parser.looks_like_alias() {
        Ok(Some(parser.expect_ident()?))
    } else {
        Ok(None)
    }
}

fn peek_join_kind(parser: &Parser) -> Option<JoinKind> {
    match parser.peek() {
        Token::Keyword(Keyword::JOIN) => Some(JoinKind::Inner),
        Token::Keyword(Keyword::INNER) => Some(JoinKind::Inner),
        Token::Keyword(Keyword::LEFT) => Some(JoinKind::Left),
        Token::Keyword(Keyword::RIGHT) => Some(JoinKind::Right),
        Token::Keyword(Keyword::FULL) => Some(JoinKind::Full),
        _ => None,
    }
}

fn parse_join(parser: &mut Parser, kind: JoinKind) -> Result<Join, ParserError> {
    match kind {
        JoinKind::Inner => {
            parser.eat_keyword(Keyword::INNER);
            parser.expect_keyword(Keyword::JOIN)?;
        }
        JoinKind::Left => {
            parser.expect_keyword(Keyword::LEFT)?;
            parser.eat_keyword(Keyword::OUTER);
            parser.expect_keyword(Keyword::JOIN)?;
        }
        JoinKind::Right => {
            parser.expect_keyword(Keyword::RIGHT)?;
            parser.eat_keyword(Keyword::OUTER);
            parser.expect_keyword(Keyword::JOIN)?;
        }
        JoinKind::Full => {
            parser.expect_keyword(Keyword::FULL)?;
            parser.eat_keyword(Keyword::OUTER);
            parser.expect_keyword(Keyword::JOIN)?;
        }
    }
    let table = parse_table_name(parser)?;
    let alias = parse_optional_alias(parser)?;
    parser.expect_keyword(Keyword::ON)?;
    let on = parser.parse_condition()?;
    Ok(Join {
        kind,
        table,
        alias,
        on,
    })
}

fn parse_order_by_item(parser: &mut Parser) -> Result<OrderByItem, ParserError> {
    let expr = parser.parse_expr()?;
    let text = Parser::expr_text(&expr);
    let descending = if parser.eat_keyword(Keyword::DESC) {
        true
    } else {
        parser.eat_keyword(Keyword::ASC);
        false
    };
    Ok(OrderByItem { text, descending })
}

fn parse_integer(parser: &mut Parser) -> Result<i64, ParserError> {
    match parser.advance() {
        Token::Number(text) => text
            .parse::<i64>()
            .map_err(|_| ParserError::Syntax(format!("invalid integer literal '{}'", text))),
        other => crate::error::expected("an integer literal", Some(&other)),
    }
}
