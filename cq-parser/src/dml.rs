use cq_ast::{Delete, Insert, Update};
use cq_core::Keyword;
use cq_lexer::Token;

use crate::error::ParserError;
use crate::parser::Parser;
use crate::query::parse_table_name;

/// `INSERT INTO table [(col1, col2, ...)] VALUES (val1, val2, ...)`.
pub fn parse_insert(parser: &mut Parser) -> Result<Insert, ParserError> {
    parser.expect_keyword(Keyword::INSERT)?;
    parser.expect_keyword(Keyword::INTO)?;
    let table = parse_table_name(parser)?;

    let columns = if parser.eat_token(&Token::LParen) {
        let names = parser.parse_comma_separated(Parser::expect_ident)?;
        parser.expect_token(&Token::RParen)?;
        Some(names)
    } else {
        None
    };

    parser.expect_keyword(Keyword::VALUES)?;
    parser.expect_token(&Token::LParen)?;
    let values = parser.parse_comma_separated(Parser::parse_expr)?;
    parser.expect_token(&Token::RParen)?;

    Ok(Insert {
        table,
        columns,
        values,
    })
}

/// `UPDATE table SET col = expr [, ...] [WHERE condition]`.
pub fn parse_update(parser: &mut Parser) -> Result<Update, ParserError> {
    parser.expect_keyword(Keyword::UPDATE)?;
    let table = parse_table_name(parser)?;
    parser.expect_keyword(Keyword::SET)?;
    let assignments = parser.parse_comma_separated(parse_assignment)?;
    let filter = if parser.eat_keyword(Keyword::WHERE) {
        Some(parser.parse_condition()?)
    } else {
        None
    };
    Ok(Update {
        table,
        assignments,
        filter,
    })
}

fn parse_assignment(parser: &mut Parser) -> Result<(String, cq_ast::Expr), ParserError> {
    let column = parser.expect_ident()?;
    parser.expect_token(&Token::Eq)?;
    let value = parser.parse_expr()?;
    Ok((column, value))
}

/// `DELETE FROM table [WHERE condition]`. A missing `WHERE` is accepted at
/// parse time; the force-flag safety check belongs to the
/// executor, not the grammar.
pub fn parse_delete(parser: &mut Parser) -> Result<Delete, ParserError> {
    parser.expect_keyword(Keyword::DELETE)?;
    parser.expect_keyword(Keyword::FROM)?;
    let table = parse_table_name(parser)?;
    let filter = if parser.eat_keyword(Keyword::WHERE) {
        Some(parser.parse_condition()?)
    } else {
        None
    };
    Ok(Delete { table, filter })
}
