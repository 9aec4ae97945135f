//! File, function and class declaration parsing.

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};
use super::statements::block_span;

impl Parser {
    /// Parse a complete source file.
    pub fn parse_file(&mut self, filename: &str) -> ParseResult<File> {
        let mut file = File::new(filename);
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }

            if self.check(&TokenKind::Indentation) {
                return Err(ParserError::UnexpectedIndentation(self.current_span()));
            }

            if self.check_word("def") {
                file.functions.push(self.function_definition(0)?);
            } else if self.check_word("class") {
                file.classes.push(self.class_definition()?);
            } else {
                let stmt = self.statement()?;
                self.expect_line_end()?;
                statements.push(stmt);
            }
        }

        let span = block_span(&statements);
        file.top_level = Block::new(statements, span);
        file.span = self.tokens[0].span.merge(&self.peek().span);
        Ok(file)
    }

    /// `def name(params):` with its body indented one level deeper than `depth`.
    pub(crate) fn function_definition(&mut self, depth: usize) -> ParseResult<FunctionDefinition> {
        let start = self.expect_word("def")?.span;
        let (name, _) = self.expect_identifier()?;

        self.expect_word("(")?;
        let mut params = Vec::new();
        if !self.check_word(")") {
            loop {
                let (param, span) = self.expect_identifier()?;
                params.push(Parameter { name: param, span });
                if !self.match_word(",") {
                    break;
                }
            }
        }
        self.expect_word(")")?;
        self.expect_word(":")?;
        let header_end = self.previous_span();
        self.expect_line_end()?;

        let body = self.block(depth + 1)?;
        if body.is_empty() {
            return Err(ParserError::general(
                format!("expected an indented body for '{}'", name),
                start.merge(&header_end),
            ));
        }

        let span = start.merge(&body.span);
        Ok(FunctionDefinition {
            name,
            params,
            body,
            span,
        })
    }

    /// `class Name:` followed by method definitions indented one level.
    pub(crate) fn class_definition(&mut self) -> ParseResult<ClassDefinition> {
        let start = self.expect_word("class")?.span;
        let (name, _) = self.expect_identifier()?;
        self.expect_word(":")?;
        let header = start.merge(&self.previous_span());
        self.expect_line_end()?;

        let mut methods = Vec::new();
        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }

            let level = self.indentation_ahead();
            if level == 0 {
                break;
            }
            if level > 1 {
                return Err(ParserError::UnexpectedIndentation(self.peek_nth(1).span));
            }

            self.advance();
            if !self.check_word("def") {
                return Err(self.error_here("method definition"));
            }
            methods.push(self.function_definition(1)?);
        }

        let Some(last) = methods.last() else {
            return Err(ParserError::general(
                format!("class '{}' has no methods", name),
                header,
            ));
        };

        let span = start.merge(&last.span);
        Ok(ClassDefinition {
            name,
            methods,
            span,
        })
    }
}
