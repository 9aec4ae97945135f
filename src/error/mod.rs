//! Error types for all compilation phases.

use crate::span::Span;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexerError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("Unterminated string at {0}")]
    UnterminatedString(Span),

    #[error("Invalid escape sequence '\\{0}' at {1}")]
    InvalidEscape(char, Span),

    #[error("Invalid number '{0}' at {1}")]
    InvalidNumber(String, Span),

    #[error("Indentation must be tabs or pairs of spaces at {0}")]
    UnevenIndentation(Span),
}

impl LexerError {
    pub fn unexpected_char(c: char, span: Span) -> Self {
        Self::UnexpectedChar(c, span)
    }

    pub fn unterminated_string(span: Span) -> Self {
        Self::UnterminatedString(span)
    }

    pub fn invalid_escape(c: char, span: Span) -> Self {
        Self::InvalidEscape(c, span)
    }

    pub fn invalid_number(s: String, span: Span) -> Self {
        Self::InvalidNumber(s, span)
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar(_, span) => *span,
            Self::UnterminatedString(span) => *span,
            Self::InvalidEscape(_, span) => *span,
            Self::InvalidNumber(_, span) => *span,
            Self::UnevenIndentation(span) => *span,
        }
    }
}

/// Parser errors (syntax faults).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserError {
    #[error("Unexpected token '{found}', expected {expected} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of file at {0}")]
    UnexpectedEof(Span),

    #[error("Invalid assignment target at {0}")]
    InvalidAssignmentTarget(Span),

    #[error("Unexpected indentation at {0}")]
    UnexpectedIndentation(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl ParserError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn unexpected_eof(span: Span) -> Self {
        Self::UnexpectedEof(span)
    }

    pub fn invalid_assignment_target(span: Span) -> Self {
        Self::InvalidAssignmentTarget(span)
    }

    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::UnexpectedEof(span) => *span,
            Self::InvalidAssignmentTarget(span) => *span,
            Self::UnexpectedIndentation(span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

impl From<LexerError> for ParserError {
    fn from(err: LexerError) -> Self {
        Self::General {
            message: err.to_string(),
            span: err.span(),
        }
    }
}

/// Bytecode compilation errors (resolution faults).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("Undefined function or class '{0}' at {1}")]
    UndefinedCallee(String, Span),

    #[error("'{name}' takes {expected} argument(s) but {got} were given at {span}")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("'{0}' is already defined at {1}")]
    Redefinition(String, Span),

    #[error("First parameter of method '{0}' must be 'self' at {1}")]
    MissingSelf(String, Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl CompileError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn undefined_callee(name: impl Into<String>, span: Span) -> Self {
        Self::UndefinedCallee(name.into(), span)
    }

    pub fn wrong_arity(name: impl Into<String>, expected: usize, got: usize, span: Span) -> Self {
        Self::WrongArity {
            name: name.into(),
            expected,
            got,
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedCallee(_, span) => *span,
            Self::WrongArity { span, .. } => *span,
            Self::Redefinition(_, span) => *span,
            Self::MissingSelf(_, span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

/// Runtime errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Type error: {message} at {span}")]
    TypeError { message: String, span: Span },

    #[error("Stack underflow at {0}")]
    StackUnderflow(Span),

    #[error("Stack overflow: call depth exceeded {depth} at {span}")]
    StackOverflow { depth: usize, span: Span },

    #[error("'{class_name}' object has no method '{method}' at {span}")]
    UndefinedMethod {
        class_name: String,
        method: String,
        span: Span,
    },

    #[error("Wrong number of arguments: expected {expected}, got {got} at {span}")]
    WrongArity {
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("Index out of bounds: {index} (length {length}) at {span}")]
    IndexOutOfBounds {
        index: i64,
        length: usize,
        span: Span,
    },

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::TypeError {
            message: message.into(),
            span,
        }
    }

    pub fn wrong_arity(expected: usize, got: usize, span: Span) -> Self {
        Self::WrongArity {
            expected,
            got,
            span,
        }
    }

    /// Type faults are the only runtime errors a permissive VM recovers from.
    pub fn is_type_fault(&self) -> bool {
        matches!(self, Self::TypeError { .. })
    }

    pub fn span(&self) -> Span {
        match self {
            Self::TypeError { span, .. } => *span,
            Self::StackUnderflow(span) => *span,
            Self::StackOverflow { span, .. } => *span,
            Self::UndefinedMethod { span, .. } => *span,
            Self::WrongArity { span, .. } => *span,
            Self::IndexOutOfBounds { span, .. } => *span,
            Self::General { span, .. } => *span,
        }
    }
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum SlateError {
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SlateError {
    /// Source location of the fault, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer(e) => Some(e.span()),
            Self::Parser(e) => Some(e.span()),
            Self::Compile(e) => Some(e.span()),
            Self::Runtime(e) => Some(e.span()),
            Self::Io(_) => None,
        }
    }
}
