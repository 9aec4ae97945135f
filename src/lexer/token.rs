//! Token definitions for the Slate lexer.

use crate::span::Span;

/// Words that can never be used as identifiers.
pub const KEYWORDS: [&str; 3] = ["def", "class", "return"];

/// All token types in Slate.
///
/// Keywords, identifiers and punctuation all share the `Word` kind; the
/// parser tells them apart by their text.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Everything between matching `'` or `"` quotes, escapes resolved.
    String(String),
    /// Integer or decimal literal.
    Number(f32),
    /// One indentation level: a tab or a pair of spaces.
    Indentation,
    Newline,
    Word(String),
    Eof,
}

impl TokenKind {
    /// Short name of the token kind, used in token dumps.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::String(_) => "string",
            TokenKind::Number(_) => "number",
            TokenKind::Indentation => "indent",
            TokenKind::Newline => "newline",
            TokenKind::Word(_) => "word",
            TokenKind::Eof => "eof",
        }
    }

    pub fn is_word(&self, text: &str) -> bool {
        matches!(self, TokenKind::Word(w) if w == text)
    }

    /// True for words that can name a variable, function or class.
    pub fn is_identifier(&self) -> bool {
        match self {
            TokenKind::Word(w) => is_identifier_text(w),
            _ => false,
        }
    }
}

pub(crate) fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_') && !KEYWORDS.contains(&text)
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Indentation => write!(f, "indentation"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Word(w) => write!(f, "{}", w),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// A token with its kind, literal text and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(position: usize, line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span: Span::new(position, position, line, column),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Indentation | TokenKind::Newline | TokenKind::Eof => {
                write!(f, "<{}>", self.kind.name())
            }
            _ => write!(f, "<{}: {:?}>", self.kind.name(), self.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_text() {
        assert!(is_identifier_text("foo"));
        assert!(is_identifier_text("_private2"));
        assert!(is_identifier_text("__init__"));
        assert!(!is_identifier_text("2fast"));
        assert!(!is_identifier_text("("));
        assert!(!is_identifier_text("return"));
        assert!(!is_identifier_text(""));
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Word("x".to_string()), "x", Span::default());
        assert_eq!(token.to_string(), "<word: \"x\">");
        let newline = Token::new(TokenKind::Newline, "\n", Span::default());
        assert_eq!(newline.to_string(), "<newline>");
    }
}
