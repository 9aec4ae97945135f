//! Statement and block parsing.

use crate::ast::*;
use crate::error::ParserError;
use crate::span::Span;

use super::core::{ParseResult, Parser};

impl Parser {
    /// `return Expr` or `Expr [= Expr]`.
    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        if self.check_word("return") {
            let start = self.advance().span;
            let value = self.expression()?;
            let span = start.merge(&value.span);
            return Ok(Stmt::new(StmtKind::Return(value), span));
        }

        let expr = self.expression()?;

        if self.match_word("=") {
            if !expr.is_assignable() {
                return Err(ParserError::invalid_assignment_target(expr.span));
            }
            let value = self.expression()?;
            let span = expr.span.merge(&value.span);
            return Ok(Stmt::new(
                StmtKind::Assign {
                    location: expr,
                    value,
                },
                span,
            ));
        }

        let span = expr.span;
        Ok(Stmt::new(StmtKind::Expression(expr), span))
    }

    /// Parse the statements indented exactly `depth` levels.
    ///
    /// The block ends at the first non-blank line indented less than `depth`.
    pub(crate) fn block(&mut self, depth: usize) -> ParseResult<Block> {
        let mut statements: Vec<Stmt> = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }

            let level = self.indentation_ahead();
            if level < depth {
                break;
            }
            if level > depth {
                return Err(ParserError::UnexpectedIndentation(
                    self.peek_nth(depth).span,
                ));
            }

            for _ in 0..depth {
                self.advance();
            }
            if self.check_word("def") || self.check_word("class") {
                return Err(ParserError::general(
                    "definitions are only allowed at the top level or directly inside a class",
                    self.current_span(),
                ));
            }

            let stmt = self.statement()?;
            self.expect_line_end()?;
            statements.push(stmt);
        }

        let span = block_span(&statements);
        Ok(Block::new(statements, span))
    }
}

pub(crate) fn block_span(statements: &[Stmt]) -> Span {
    match (statements.first(), statements.last()) {
        (Some(first), Some(last)) => first.span.merge(&last.span),
        _ => Span::default(),
    }
}
