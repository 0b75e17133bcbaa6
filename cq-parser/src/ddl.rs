use cq_ast::{AlterTable, CreateTable};
use cq_core::Keyword;
use cq_lexer::Token;

use crate::error::{expected, ParserError};
use crate::parser::Parser;
use crate::query::parse_table_name;

/// `CREATE TABLE name (col1, col2, ...)` or
/// `CREATE TABLE name AS SELECT ...`.
pub fn parse_create_table(parser: &mut Parser) -> Result<CreateTable, ParserError> {
    parser.expect_keyword(Keyword::CREATE)?;
    parser.expect_keyword(Keyword::TABLE)?;
    let table = parse_table_name(parser)?;

    if parser.eat_keyword(Keyword::AS) {
        let query = Box::new(parser.parse_query_expr()?);
        return Ok(CreateTable::AsSelect { table, query });
    }

    parser.expect_token(&Token::LParen)?;
    let columns = parser.parse_comma_separated(Parser::expect_ident)?;
    parser.expect_token(&Token::RParen)?;
    Ok(CreateTable::Schema { table, columns })
}

/// `ALTER TABLE name RENAME COLUMN old TO new`,
/// `ALTER TABLE name ADD COLUMN col`, or
/// `ALTER TABLE name DROP COLUMN col`.
pub fn parse_alter_table(parser: &mut Parser) -> Result<AlterTable, ParserError> {
    parser.expect_keyword(Keyword::ALTER)?;
    parser.expect_keyword(Keyword::TABLE)?;
    let table = parse_table_name(parser)?;

    if parser.eat_keyword(Keyword::RENAME) {
        parser.eat_keyword(Keyword::COLUMN);
        let from = parser.expect_ident()?;
        parser.expect_keyword(Keyword::TO)?;
        let to = parser.expect_ident()?;
        return Ok(AlterTable::RenameColumn { table, from, to });
    }
    if parser.eat_keyword(Keyword::ADD) {
        parser.eat_keyword(Keyword::COLUMN);
        let column = parser.expect_ident()?;
        return Ok(AlterTable::AddColumn { table, column });
    }
    if parser.eat_keyword(Keyword::DROP) {
        parser.eat_keyword(Keyword::COLUMN);
        let column = parser.expect_ident()?;
        return Ok(AlterTable::DropColumn { table, column });
    }
    expected("RENAME, ADD or DROP", Some(parser.peek()))
}
