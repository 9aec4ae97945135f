//! Core parser struct and helper methods.

use crate::error::ParserError;
use crate::lexer::token::is_identifier_text;
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

pub type ParseResult<T> = Result<T, ParserError>;

/// Deepest nesting of sub-expressions the parser will descend into.
pub const MAX_EXPRESSION_DEPTH: usize = 128;

/// The parser for Slate.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    /// Sub-expressions currently being parsed.
    pub(crate) depth: usize,
}

impl Parser {
    /// `tokens` must end with `Eof`, as `Scanner::scan_tokens` guarantees.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map(|t| t.span).unwrap_or_default();
            tokens.push(Token::eof(end.end, end.end_line.max(1), end.end_column + 1));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    // ===== Token manipulation =====

    pub(crate) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
            self.tokens[self.current - 1].clone()
        } else {
            self.tokens[self.current].clone()
        }
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        let index = if self.current + n < self.tokens.len() {
            self.current + n
        } else {
            self.tokens.len() - 1
        };
        &self.tokens[index]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.peek().kind.is_word(word)
    }

    pub(crate) fn match_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_word(&mut self, word: &str) -> ParseResult<Token> {
        if self.check_word(word) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("'{}'", word)))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> ParseResult<(String, Span)> {
        match &self.peek().kind {
            TokenKind::Word(name) if is_identifier_text(name) => {
                let token = self.advance();
                Ok((token.lexeme, token.span))
            }
            TokenKind::Word(name) if name.chars().all(char::is_alphabetic) => {
                Err(ParserError::general(
                    format!("'{}' is a reserved word", name),
                    self.current_span(),
                ))
            }
            _ => Err(self.error_here("identifier")),
        }
    }

    /// A statement or header line ends at a Newline or at the end of input.
    pub(crate) fn expect_line_end(&mut self) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.error_here("end of line")),
        }
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Number of Indentation tokens starting at the current position.
    pub(crate) fn indentation_ahead(&self) -> usize {
        let mut level = 0;
        while self.peek_nth(level).kind == TokenKind::Indentation {
            level += 1;
        }
        level
    }

    pub(crate) fn error_here(&self, expected: impl Into<String>) -> ParserError {
        let token = self.peek();
        match token.kind {
            TokenKind::Eof => ParserError::unexpected_eof(token.span),
            _ => ParserError::unexpected_token(expected, token.to_string(), token.span),
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.previous().span
    }
}
