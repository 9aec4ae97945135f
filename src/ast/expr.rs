//! Expression AST nodes.

use crate::span::Span;

/// An expression in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// True if the expression may appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        match &self.kind {
            ExprKind::Identifier(_) | ExprKind::IndexAccess { .. } => true,
            ExprKind::ClassAccess { right, .. } => {
                matches!(right.kind, ExprKind::Identifier(_))
            }
            _ => false,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// All expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Number literal: 42, 2.5
    Number(f32),
    /// String literal: "hello"
    String(String),
    /// Name reference: foo
    Identifier(String),

    /// Binary operation: a + b
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary negation: -x
    Unary { operand: Box<Expr> },

    /// Dotted access: obj.attr, obj.method(args)
    ClassAccess { left: Box<Expr>, right: Box<Expr> },

    /// Index access: s[i]
    IndexAccess { left: Box<Expr>, index: Box<Expr> },

    /// Call: f(a, b). Constructor calls look the same.
    FunctionCall {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Subtract),
            "*" => Some(BinaryOp::Multiply),
            "/" => Some(BinaryOp::Divide),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Subtract => "Subtract",
            BinaryOp::Multiply => "Multiply",
            BinaryOp::Divide => "Divide",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
        }
    }
}
