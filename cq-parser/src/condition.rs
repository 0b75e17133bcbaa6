use cq_ast::{CompareOp, Condition};
use cq_core::Keyword;
use cq_lexer::Token;

use crate::error::{expected, ParserError};
use crate::parser::Parser;

impl Parser {
    /// Entry point for a boolean expression: parses a
    /// predicate, then folds consecutive `AND`/`OR` — `AND` binds tighter
    /// than `OR`, the conventional SQL precedence.
    pub fn parse_condition(&mut self) -> Result<Condition, ParserError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Condition, ParserError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword(Keyword::OR) {
            let right = self.parse_and()?;
            left = Condition::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Condition, ParserError> {
        let mut left = self.parse_not()?;
        while self.eat_keyword(Keyword::AND) {
            let right = self.parse_not()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Condition, ParserError> {
        if self.eat_keyword(Keyword::NOT) {
            Ok(Condition::Not(Box::new(self.parse_not()?)))
        } else {
            self.parse_predicate()
        }
    }

    /// Predicate layer: `BETWEEN` (desugared),
    /// `[NOT] IN`, `LIKE`/`ILIKE`, and the comparison operators.
    fn parse_predicate(&mut self) -> Result<Condition, ParserError> {
        // A parenthesized condition, e.g. `(a = 1 OR b = 2)` appearing as
        // an operand of AND/OR/NOT.
        if self.peek() == &Token::LParen && self.looks_like_nested_condition() {
            self.advance();
            let inner = self.parse_condition()?;
            self.expect_token(&Token::RParen)?;
            return Ok(inner);
        }

        let left = self.parse_expr()?;

        let negated = self.eat_keyword(Keyword::NOT);

        if self.eat_keyword(Keyword::BETWEEN) {
            return self.parse_between(left, negated);
        }
        if self.eat_keyword(Keyword::IN) {
            return self.parse_in(left, negated);
        }
        if self.eat_keyword(Keyword::LIKE) {
            let pattern = self.parse_expr()?;
            return Ok(Condition::Like {
                expr: left,
                negated,
                pattern,
                case_insensitive: false,
            });
        }
        if self.eat_keyword(Keyword::ILIKE) {
            let pattern = self.parse_expr()?;
            return Ok(Condition::Like {
                expr: left,
                negated,
                pattern,
                case_insensitive: true,
            });
        }
        if negated {
            return expected("BETWEEN, IN, LIKE or ILIKE after NOT", Some(self.peek()));
        }

        let op = match self.peek() {
            Token::Eq => CompareOp::Eq,
            Token::NotEq => CompareOp::NotEq,
            Token::Lt => CompareOp::Lt,
            Token::Le => CompareOp::Le,
            Token::Gt => CompareOp::Gt,
            Token::Ge => CompareOp::Ge,
            other => return expected("a comparison operator", Some(&other.clone())),
        };
        self.advance();
        let right = self.parse_expr()?;
        Ok(Condition::Comparison { left, op, right })
    }

    /// Desugars `[NOT] BETWEEN low AND high` into
    /// `[NOT] (expr >= low AND expr <= high)`.
    fn parse_between(&mut self, expr: cq_ast::Expr, negated: bool) -> Result<Condition, ParserError> {
        let low = self.parse_expr()?;
        self.expect_keyword(Keyword::AND)?;
        let high = self.parse_expr()?;
        let desugared = Condition::And(
            Box::new(Condition::Comparison {
                left: expr.clone(),
                op: CompareOp::Ge,
                right: low,
            }),
            Box::new(Condition::Comparison {
                left: expr,
                op: CompareOp::Le,
                right: high,
            }),
        );
        Ok(if negated {
            Condition::Not(Box::new(desugared))
        } else {
            desugared
        })
    }

    /// Parses the parens following `[NOT] IN`, handling both a literal
    /// list and a subquery.
    fn parse_in(&mut self, expr: cq_ast::Expr, negated: bool) -> Result<Condition, ParserError> {
        self.expect_token(&Token::LParen)?;
        let condition = if self.is_keyword(Keyword::SELECT) {
            let subquery = Box::new(self.parse_query_expr()?);
            Condition::InSubquery {
                expr,
                negated,
                subquery,
            }
        } else {
            let list = self.parse_comma_separated(Parser::parse_expr)?;
            Condition::InList {
                expr,
                negated,
                list,
            }
        };
        self.expect_token(&Token::RParen)?;
        Ok(condition)
    }

    /// `(` starts a nested *condition* (rather than a nested/subquery
    /// *expression*) unless its contents are a `SELECT` (a scalar subquery),
    /// determined by scanning ahead to the matching `)`: if a boolean
    /// combinator or comparison operator appears at the same nesting depth
    /// before that `)`, the parens hold a condition, e.g. `(a = 1 OR b = 2)`.
    fn looks_like_nested_condition(&self) -> bool {
        if matches!(self.peek_at(1), Token::Keyword(Keyword::SELECT)) {
            return false;
        }
        let mut depth = 1;
        let mut offset = 1;
        loop {
            match self.peek_at(offset) {
                Token::Eof => return false,
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return false;
                    }
                }
                token if depth == 1 && is_condition_marker(token) => return true,
                _ => {}
            }
            offset += 1;
        }
    }
}

fn is_condition_marker(token: &Token) -> bool {
    matches!(
        token,
        Token::Keyword(Keyword::AND)
            | Token::Keyword(Keyword::OR)
            | Token::Keyword(Keyword::NOT)
            | Token::Keyword(Keyword::BETWEEN)
            | Token::Keyword(Keyword::LIKE)
            | Token::Keyword(Keyword::ILIKE)
            | Token::Keyword(Keyword::IN)
            | Token::Eq
            | Token::NotEq
            | Token::Lt
            | Token::Le
            | Token::Gt
            | Token::Ge
    )
}
