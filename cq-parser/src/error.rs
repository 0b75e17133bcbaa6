use core::fmt::Display;
use thiserror::Error;

use cq_lexer::{LexerError, Token};

/// Parse error: surfaced with position context, the
/// parser returns no tree and the caller aborts the query.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error("{0}")]
    Syntax(String),
}

pub fn parse_error<T>(message: impl Into<String>) -> Result<T, ParserError> {
    Err(ParserError::Syntax(message.into()))
}

pub fn expected<T>(expected: impl Display, found: Option<&Token>) -> Result<T, ParserError> {
    match found {
        Some(found) => parse_error(format!("expected {}, found {}", expected, found)),
        None => parse_error(format!("expected {}, found end of input", expected)),
    }
}
