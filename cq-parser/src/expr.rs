use cq_ast::{ArithOp, Case, CaseBranches, Expr, QueryExpr, WindowFunction, WindowOrderBy};
use cq_core::Keyword;
use cq_lexer::Token;

use crate::error::{expected, parse_error, ParserError};
use crate::parser::Parser;

impl Parser {
    /// Entry point for a scalar expression: the bitwise layer, the lowest
    /// of the purely-arithmetic precedence levels.
    pub fn parse_expr(&mut self) -> Result<Expr, ParserError> {
        self.parse_bitwise()
    }

    fn parse_bitwise(&mut self) -> Result<Expr, ParserError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Token::Ampersand => ArithOp::BitAnd,
                Token::Pipe => ArithOp::BitOr,
                Token::Caret => ArithOp::BitXor,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::BinaryOp {
                left: Some(Box::new(left)),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParserError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => ArithOp::Add,
                Token::Minus => ArithOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                left: Some(Box::new(left)),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParserError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => ArithOp::Mul,
                Token::Slash => ArithOp::Div,
                Token::Percent => ArithOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinaryOp {
                left: Some(Box::new(left)),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParserError> {
        let op = match self.peek() {
            Token::Plus => Some(ArithOp::Add),
            Token::Minus => Some(ArithOp::Sub),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::BinaryOp {
                left: None,
                op,
                right: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParserError> {
        match self.peek().clone() {
            Token::Number(text) => {
                self.advance();
                Ok(Expr::Literal(text))
            }
            Token::Str(text) => {
                self.advance();
                Ok(Expr::Literal(text))
            }
            Token::Star => {
                self.advance();
                Ok(Expr::Wildcard)
            }
            Token::LParen => {
                self.advance();
                let expr = if self.is_keyword(Keyword::SELECT) {
                    Expr::Subquery(Box::new(self.parse_query_expr()?))
                } else {
                    Expr::Nested(Box::new(self.parse_expr()?))
                };
                self.expect_token(&Token::RParen)?;
                Ok(expr)
            }
            Token::Keyword(Keyword::CASE) => self.parse_case(),
            Token::Keyword(
                kw @ (Keyword::ROW_NUMBER | Keyword::RANK | Keyword::DENSE_RANK | Keyword::LAG | Keyword::LEAD),
            ) => {
                self.advance();
                self.expect_token(&Token::LParen)?;
                self.parse_function_call(kw.to_string())
            }
            Token::Ident(name) => {
                self.advance();
                self.parse_ident_tail(name)
            }
            other => expected("an expression", Some(&other)),
        }
    }

    /// Continues parsing after a leading bare identifier: a dotted name
    /// (`a.b`), a function/window-function call (`f(...)`), or a plain
    /// column reference.
    fn parse_ident_tail(&mut self, first: String) -> Result<Expr, ParserError> {
        if self.eat_token(&Token::LParen) {
            return self.parse_function_call(first);
        }
        if self.eat_token(&Token::Dot) {
            let second = self.expect_ident()?;
            return Ok(Expr::Identifier(format!("{}.{}", first, second)));
        }
        Ok(Expr::Identifier(first))
    }

    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParserError> {
        let args = if self.eat_token(&Token::RParen) {
            Vec::new()
        } else {
            let args = self.parse_comma_separated(Parser::parse_expr)?;
            self.expect_token(&Token::RParen)?;
            args
        };
        if self.eat_keyword(Keyword::OVER) {
            let window = self.parse_window_spec(name, args)?;
            return Ok(Expr::WindowFunction(window));
        }
        Ok(Expr::Function { name, args })
    }

    /// Parses `(PARTITION BY col [, col...] [ORDER BY col [ASC|DESC]])`
    /// after `OVER` has been consumed (the grammar's window function
    /// grammar). Frame clauses are not supported.
    fn parse_window_spec(
        &mut self,
        name: String,
        args: Vec<Expr>,
    ) -> Result<WindowFunction, ParserError> {
        self.expect_token(&Token::LParen)?;
        let mut partition_by = Vec::new();
        if self.eat_keyword(Keyword::PARTITION) {
            self.expect_keyword(Keyword::BY)?;
            partition_by = self.parse_comma_separated(Parser::expect_ident)?;
        }
        let mut order_by = None;
        if self.eat_keyword(Keyword::ORDER) {
            self.expect_keyword(Keyword::BY)?;
            let column = self.expect_ident()?;
            let descending = if self.eat_keyword(Keyword::DESC) {
                true
            } else {
                self.eat_keyword(Keyword::ASC);
                false
            };
            order_by = Some(WindowOrderBy { column, descending });
        }
        self.expect_token(&Token::RParen)?;
        Ok(WindowFunction {
            name,
            args,
            partition_by,
            order_by,
        })
    }

    fn parse_case(&mut self) -> Result<Expr, ParserError> {
        self.expect_keyword(Keyword::CASE)?;
        let subject = if self.is_keyword(Keyword::WHEN) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let branches = if subject.is_some() {
            let mut branches = Vec::new();
            while self.eat_keyword(Keyword::WHEN) {
                let when_value = self.parse_expr()?;
                self.expect_keyword(Keyword::THEN)?;
                let then = self.parse_expr()?;
                branches.push((when_value, then));
            }
            if branches.is_empty() {
                return parse_error("CASE requires at least one WHEN branch");
            }
            CaseBranches::Simple(branches)
        } else {
            let mut branches = Vec::new();
            while self.eat_keyword(Keyword::WHEN) {
                let when_condition = self.parse_condition()?;
                self.expect_keyword(Keyword::THEN)?;
                let then = self.parse_expr()?;
                branches.push((when_condition, then));
            }
            if branches.is_empty() {
                return parse_error("CASE requires at least one WHEN branch");
            }
            CaseBranches::Searched(branches)
        };

        let else_branch = if self.eat_keyword(Keyword::ELSE) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::END)?;

        Ok(Expr::Case(Case {
            subject,
            branches,
            else_branch,
        }))
    }

    /// Builds a best-effort textual reconstruction of an already-parsed
    /// expression, used as the display name of a `SELECT` item with no
    /// explicit alias and as the GROUP BY/ORDER BY binding key.
    pub fn expr_text(expr: &Expr) -> String {
        expr.to_string()
    }

    // Declared here so `expr.rs` doesn't need to know about `QueryExpr`
    // parsing internals; implemented in `query.rs`.
    pub(crate) fn parse_query_expr(&mut self) -> Result<QueryExpr, ParserError> {
        crate::query::parse_query_expr(self)
    }
}
