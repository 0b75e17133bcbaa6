use cq_core::Keyword;
use cq_lexer::{Lexer, Token};

use crate::error::{expected, ParserError};

/// Recursive-descent parser over a flat token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(sql: &str) -> Result<Self, ParserError> {
        let tokens = Lexer::tokenize(sql)?;
        Ok(Self { tokens, pos: 0 })
    }

    pub fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    pub fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&Token::Eof)
    }

    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !matches!(token, Token::Eof) {
            self.pos += 1;
        }
        token
    }

    pub fn at_eof(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    /// Consumes the next token if it is the given keyword.
    pub fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a run of keywords only if *all* of them match in order;
    /// otherwise consumes nothing.
    pub fn eat_keywords(&mut self, keywords: &[Keyword]) -> bool {
        for (i, kw) in keywords.iter().enumerate() {
            if !self.peek_at(i).is_keyword(*kw) {
                return false;
            }
        }
        self.pos += keywords.len();
        true
    }

    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParserError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            expected(keyword, Some(self.peek()).filter(|t| !matches!(t, Token::Eof)))
        }
    }

    pub fn eat_token(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect_token(&mut self, token: &Token) -> Result<(), ParserError> {
        if self.eat_token(token) {
            Ok(())
        } else {
            expected(token, Some(self.peek()).filter(|t| !matches!(t, Token::Eof)))
        }
    }

    /// Consumes a bare (non-keyword) identifier, returning its text.
    pub fn expect_ident(&mut self) -> Result<String, ParserError> {
        match self.advance() {
            Token::Ident(s) => Ok(s),
            other => expected("an identifier", Some(&other)),
        }
    }

    /// Parses a comma-separated list of one or more items.
    pub fn parse_comma_separated<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> Result<T, ParserError>,
    ) -> Result<Vec<T>, ParserError> {
        let mut items = vec![f(self)?];
        while self.eat_token(&Token::Comma) {
            items.push(f(self)?);
        }
        Ok(items)
    }

    /// `WHERE`/`GROUP`/`ORDER`/`HAVING`/`LIMIT`/`OFFSET`/`UNION`/
    /// `INTERSECT`/`EXCEPT`/`ON`/`JOIN`/keyword-of-a-join-kind are not
    /// valid table/column aliases, so an unquoted identifier that matches
    /// one of them ends the alias position instead of being consumed.
    pub fn looks_like_alias(&self) -> bool {
        matches!(self.peek(), Token::Ident(_))
    }
}
