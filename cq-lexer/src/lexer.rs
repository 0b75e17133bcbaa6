use std::iter::Peekable;
use std::str::Chars;

use crate::error::{LexerError, Location};
use crate::token::Token;

/// Tokenizes a UTF-8 SQL string into a flat token stream terminated by
/// [`Token::Eof`].
pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    location: Location,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            iter: input.chars().peekable(),
            location: Location { line: 1, column: 1 },
        }
    }

    pub fn tokenize(sql: &str) -> Result<Vec<Token>, LexerError> {
        let mut lexer = Lexer::new(sql);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let is_eof = token == Token::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        if ch == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
        Some(ch)
    }

    fn peek(&mut self) -> Option<char> {
        self.iter.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        self.iter.clone().nth(1)
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, LexerError> {
        Err(LexerError::new(message, self.location))
    }

    fn next_token(&mut self) -> Result<Token, LexerError> {
        loop {
            match self.peek() {
                None => return Ok(Token::Eof),
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('-') if self.peek_second() == Some('-') => {
                    self.advance();
                    self.advance();
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.advance() {
                            None => return self.error("unterminated block comment"),
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                break;
                            }
                            _ => {}
                        }
                    }
                }
                Some('\'') | Some('"') => return self.tokenize_string(),
                Some(ch) if ch.is_ascii_digit() => return self.tokenize_number(),
                Some(ch) if is_ident_start(ch) => return Ok(self.tokenize_ident()),
                Some(_) => return self.tokenize_symbol(),
            }
        }
    }

    fn tokenize_string(&mut self) -> Result<Token, LexerError> {
        let quote = self.advance().unwrap();
        let mut s = String::new();
        loop {
            match self.advance() {
                Some(ch) if ch == quote => return Ok(Token::Str(s)),
                Some(ch) => s.push(ch),
                None => return self.error("unterminated string literal"),
            }
        }
    }

    fn tokenize_number(&mut self) -> Result<Token, LexerError> {
        let mut s = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                s.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            s.push('.');
            self.advance();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    s.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        Ok(Token::Number(s))
    }

    fn tokenize_ident(&mut self) -> Token {
        let mut s = String::new();
        while let Some(ch) = self.peek() {
            if is_ident_part(ch) {
                s.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::ident_or_keyword(s)
    }

    fn tokenize_symbol(&mut self) -> Result<Token, LexerError> {
        let ch = self.advance().unwrap();
        let token = match ch {
            '>' if self.peek() == Some('=') => {
                self.advance();
                Token::Ge
            }
            '<' if self.peek() == Some('=') => {
                self.advance();
                Token::Le
            }
            '<' if self.peek() == Some('>') => {
                self.advance();
                Token::NotEq
            }
            '!' if self.peek() == Some('=') => {
                self.advance();
                Token::NotEq
            }
            '=' => Token::Eq,
            '>' => Token::Gt,
            '<' => Token::Lt,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '&' => Token::Ampersand,
            '|' => Token::Pipe,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ';' => Token::SemiColon,
            '.' => Token::Dot,
            // Unknown characters are silently skipped.
            _ => return self.next_token(),
        };
        Ok(token)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use cq_core::Keyword;

    fn toks(sql: &str) -> Vec<Token> {
        let mut tokens = Lexer::tokenize(sql).unwrap();
        assert_eq!(tokens.pop(), Some(Token::Eof));
        tokens
    }

    #[test]
    fn tokenizes_simple_select() {
        assert_eq!(
            toks("SELECT name FROM 'users.csv'"),
            vec![
                Token::Keyword(Keyword::SELECT),
                Token::Ident("name".into()),
                Token::Keyword(Keyword::FROM),
                Token::Str("users.csv".into()),
            ]
        );
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert_eq!(toks("select"), vec![Token::Keyword(Keyword::SELECT)]);
        assert_eq!(toks("SeLeCt"), vec![Token::Keyword(Keyword::SELECT)]);
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(toks(">="), vec![Token::Ge]);
        assert_eq!(toks("<="), vec![Token::Le]);
        assert_eq!(toks("!="), vec![Token::NotEq]);
        assert_eq!(toks("<>"), vec![Token::NotEq]);
    }

    #[test]
    fn numbers_and_identifiers() {
        assert_eq!(toks("42"), vec![Token::Number("42".into())]);
        assert_eq!(toks("3.14"), vec![Token::Number("3.14".into())]);
        assert_eq!(toks("age"), vec![Token::Ident("age".into())]);
    }

    #[test]
    fn line_and_block_comments_are_skipped() {
        assert_eq!(
            toks("SELECT 1 -- trailing comment\n, /* mid */ 2"),
            vec![
                Token::Keyword(Keyword::SELECT),
                Token::Number("1".into()),
                Token::Comma,
                Token::Number("2".into()),
            ]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Lexer::tokenize("'abc").is_err());
    }

    #[test]
    fn unknown_characters_are_silently_skipped() {
        assert_eq!(toks("a @ b"), vec![Token::Ident("a".into()), Token::Ident("b".into())]);
    }
}
