//! Expression parsing using Pratt precedence.

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::token::is_identifier_text;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser, MAX_EXPRESSION_DEPTH};
use super::precedence::{get_precedence, Precedence};

impl Parser {
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.parse_precedence(Precedence::Term)
    }

    pub(crate) fn parse_precedence(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return Err(ParserError::general("expression nested too deeply", self.current_span()));
        }
        self.depth += 1;
        let result = self.parse_operators(min_precedence);
        self.depth -= 1;
        result
    }

    fn parse_operators(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.is_at_end() {
            let precedence = get_precedence(&self.peek().kind);
            if precedence == Precedence::None || precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        let start_span = token.span;

        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(*n), start_span))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::new(ExprKind::String(s.clone()), start_span))
            }

            TokenKind::Word(w) if w == "(" => {
                self.advance();
                let inner = self.expression()?;
                self.expect_word(")")?;
                // The group's span covers its parentheses
                let span = start_span.merge(&self.previous_span());
                Ok(Expr::new(inner.kind, span))
            }

            TokenKind::Word(w) if w == "-" => {
                self.advance();
                let operand = self.parse_precedence(Precedence::Unary)?;
                let span = start_span.merge(&operand.span);
                Ok(Expr::new(
                    ExprKind::Unary {
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }

            TokenKind::Word(w) if is_identifier_text(w) => {
                self.advance();
                let head = Expr::new(ExprKind::Identifier(w.clone()), start_span);
                self.access_chain(head)
            }

            TokenKind::Word(w) if w.chars().all(char::is_alphabetic) => Err(
                ParserError::general(format!("'{}' is a reserved word", w), start_span),
            ),

            _ => Err(self.error_here("expression")),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: Precedence) -> ParseResult<Expr> {
        let token = self.advance();
        let operator = match &token.kind {
            TokenKind::Word(w) => BinaryOp::from_word(w),
            _ => None,
        }
        .ok_or_else(|| {
            ParserError::unexpected_token("operator", token.to_string(), token.span)
        })?;

        // Left-associative: the right operand binds one level tighter
        let right = self.parse_precedence(precedence.next())?;
        let span = left.span.merge(&right.span);
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            span,
        ))
    }

    /// Parse `.name`, `[index]` and `(args)` suffixes after an identifier.
    fn access_chain(&mut self, mut expr: Expr) -> ParseResult<Expr> {
        loop {
            if self.match_word(".") {
                let (name, name_span) = self.expect_identifier()?;
                let mut right = Expr::new(ExprKind::Identifier(name), name_span);
                if self.check_word("(") {
                    right = self.finish_call(right)?;
                }
                let span = expr.span.merge(&right.span);
                expr = Expr::new(
                    ExprKind::ClassAccess {
                        left: Box::new(expr),
                        right: Box::new(right),
                    },
                    span,
                );
            } else if self.match_word("[") {
                let index = self.expression()?;
                self.expect_word("]")?;
                let span = expr.span.merge(&self.previous_span());
                expr = Expr::new(
                    ExprKind::IndexAccess {
                        left: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.check_word("(") {
                expr = self.finish_call(expr)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        self.expect_word("(")?;
        let arguments = self.parse_arguments()?;
        self.expect_word(")")?;
        let span = callee.span.merge(&self.previous_span());
        Ok(Expr::new(
            ExprKind::FunctionCall {
                callee: Box::new(callee),
                arguments,
            },
            span,
        ))
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut arguments = Vec::new();
        if !self.check_word(")") {
            loop {
                arguments.push(self.expression()?);
                if !self.match_word(",") {
                    break;
                }
            }
        }
        Ok(arguments)
    }
}
