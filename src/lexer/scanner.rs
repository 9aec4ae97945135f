//! Lexer/Scanner for Slate source code.

use crate::error::LexerError;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// Single-character punctuation, each scanned as its own `Word`.
const PUNCTUATION: &[char] = &['.', '(', ')', '[', ']', ',', ':', '=', '+', '-', '*', '/'];

/// The lexer transforms source code into a stream of tokens.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    tokens: Vec<Token>,
    current_pos: usize,
    line: usize,
    column: usize,
    start_pos: usize,
    start_line: usize,
    start_column: usize,
    at_line_start: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            tokens: Vec::new(),
            current_pos: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
            at_line_start: true,
        }
    }

    /// Scan all tokens from the source. The last token is always `Eof`.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, LexerError> {
        loop {
            if self.at_line_start {
                self.scan_indentation()?;
                self.at_line_start = false;
            }

            self.mark_start();
            let Some((_, c)) = self.advance() else {
                break;
            };

            match c {
                ' ' | '\t' | '\r' => {}
                '#' => {
                    while self.peek().is_some() && self.peek() != Some('\n') {
                        self.advance();
                    }
                }
                '\n' => {
                    // Indentation on a line with nothing else on it is noise
                    self.pop_indentation();
                    let token = self.make_token(TokenKind::Newline);
                    self.tokens.push(token);
                    self.line += 1;
                    self.column = 1;
                    self.at_line_start = true;
                }
                '"' | '\'' => {
                    let token = self.scan_string(c)?;
                    self.tokens.push(token);
                }
                c if c.is_ascii_digit() => {
                    let token = self.scan_number()?;
                    self.tokens.push(token);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let token = self.scan_word();
                    self.tokens.push(token);
                }
                c if PUNCTUATION.contains(&c) => {
                    let token = self.make_token(TokenKind::Word(c.to_string()));
                    self.tokens.push(token);
                }
                _ => return Err(LexerError::unexpected_char(c, self.current_span())),
            }
        }

        self.pop_indentation();
        self.tokens.push(Token::eof(self.current_pos, self.line, self.column));
        Ok(std::mem::take(&mut self.tokens))
    }

    /// Emit one `Indentation` per leading tab or pair of spaces.
    fn scan_indentation(&mut self) -> Result<(), LexerError> {
        let mut stray_space = None;

        loop {
            match self.peek() {
                Some('\t') => {
                    self.mark_start();
                    self.advance();
                    let token = self.make_token(TokenKind::Indentation);
                    self.tokens.push(token);
                }
                Some(' ') => {
                    self.mark_start();
                    self.advance();
                    if self.peek() == Some(' ') {
                        self.advance();
                        let token = self.make_token(TokenKind::Indentation);
                        self.tokens.push(token);
                    } else {
                        stray_space = Some(self.current_span());
                        break;
                    }
                }
                _ => break,
            }
        }

        match (stray_space, self.peek()) {
            (None, _) => Ok(()),
            // Blank and comment-only lines may be indented any way they like
            (Some(_), None | Some('\n' | '\r' | '#')) => Ok(()),
            (Some(span), Some(_)) => Err(LexerError::UnevenIndentation(span)),
        }
    }

    fn pop_indentation(&mut self) {
        while matches!(
            self.tokens.last().map(|t| &t.kind),
            Some(TokenKind::Indentation)
        ) {
            self.tokens.pop();
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<Token, LexerError> {
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexerError::unterminated_string(self.current_span()));
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some('\'') => value.push('\''),
                        Some(c) => {
                            return Err(LexerError::invalid_escape(c, self.current_span()));
                        }
                        None => {
                            return Err(LexerError::unterminated_string(self.current_span()));
                        }
                    }
                    self.advance();
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Ok(self.make_token(TokenKind::String(value)))
    }

    fn scan_number(&mut self) -> Result<Token, LexerError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.source[self.start_pos..self.current_pos];
        let value = text
            .parse::<f32>()
            .map_err(|_| LexerError::invalid_number(text.to_string(), self.current_span()))?;
        Ok(self.make_token(TokenKind::Number(value)))
    }

    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let text = &self.source[self.start_pos..self.current_pos];
        self.make_token(TokenKind::Word(text.to_string()))
    }

    // ===== Character helpers =====

    fn advance(&mut self) -> Option<(usize, char)> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            self.column += 1;
            Some((pos, c))
        } else {
            None
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn mark_start(&mut self) {
        self.start_pos = self.current_pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn current_span(&self) -> Span {
        Span::new(
            self.start_pos,
            self.current_pos,
            self.start_line,
            self.start_column,
        )
        .with_end(self.line, self.column.saturating_sub(1).max(1))
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme = &self.source[self.start_pos..self.current_pos];
        Token::new(kind, lexeme, self.current_span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn word(w: &str) -> TokenKind {
        TokenKind::Word(w.to_string())
    }

    #[test]
    fn test_expression_tokens() {
        assert_eq!(
            scan("a.b(1, 2.5)"),
            vec![
                word("a"),
                word("."),
                word("b"),
                word("("),
                TokenKind::Number(1.0),
                word(","),
                TokenKind::Number(2.5),
                word(")"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators_split_words() {
        assert_eq!(
            scan("x=y-1"),
            vec![
                word("x"),
                word("="),
                word("y"),
                word("-"),
                TokenKind::Number(1.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            scan(r#""ab" 'c\'d' "e\n""#),
            vec![
                TokenKind::String("ab".to_string()),
                TokenKind::String("c'd".to_string()),
                TokenKind::String("e\n".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_indentation_levels() {
        assert_eq!(
            scan("def f():\n\treturn 1\n    x\n"),
            vec![
                word("def"),
                word("f"),
                word("("),
                word(")"),
                word(":"),
                TokenKind::Newline,
                TokenKind::Indentation,
                word("return"),
                TokenKind::Number(1.0),
                TokenKind::Newline,
                TokenKind::Indentation,
                TokenKind::Indentation,
                word("x"),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_blank_indented_lines_are_suppressed() {
        assert_eq!(
            scan("a\n    \n  # note\n   \nb"),
            vec![
                word("a"),
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Newline,
                word("b"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_trailing_indentation_before_eof_is_dropped() {
        assert_eq!(
            scan("a\n  "),
            vec![word("a"), TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn test_comment_to_end_of_line() {
        assert_eq!(
            scan("x # y z\n"),
            vec![word("x"), TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn test_uneven_indentation() {
        let err = Scanner::new("a\n   b").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnevenIndentation(_)));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Scanner::new("\"abc\nx").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedString(_)));
    }

    #[test]
    fn test_invalid_escape() {
        let err = Scanner::new("'a\\qb'").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::InvalidEscape('q', _)));
    }

    #[test]
    fn test_unexpected_char() {
        let err = Scanner::new("a ? b").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnexpectedChar('?', _)));
    }

    #[test]
    fn test_spans_track_rows_and_columns() {
        let tokens = Scanner::new("ab\n  cd").scan_tokens().unwrap();
        let cd = &tokens[3];
        assert_eq!(cd.lexeme, "cd");
        assert_eq!((cd.span.line, cd.span.column), (2, 3));
        assert_eq!((cd.span.end_line, cd.span.end_column), (2, 4));
        assert_eq!(&"ab\n  cd"[cd.span.start..cd.span.end], "cd");
    }

    #[test]
    fn test_number_followed_by_dot_access() {
        assert_eq!(
            scan("1.x"),
            vec![TokenKind::Number(1.0), word("."), word("x"), TokenKind::Eof]
        );
    }
}
