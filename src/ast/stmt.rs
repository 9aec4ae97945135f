//! Statement and declaration AST nodes.

use crate::ast::expr::Expr;
use crate::span::Span;

/// A statement in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement: f(x)
    Expression(Expr),

    /// Assignment: location = value
    Assign { location: Expr, value: Expr },

    /// Return statement: return expr
    Return(Expr),
}

/// An indented run of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(statements: Vec<Stmt>, span: Span) -> Self {
        Self { statements, span }
    }

    pub fn empty() -> Self {
        Self {
            statements: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub span: Span,
}

/// `def name(params): body`, either free-standing or inside a class.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Block,
    pub span: Span,
}

/// `class Name:` followed by its methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    pub name: String,
    pub methods: Vec<FunctionDefinition>,
    pub span: Span,
}

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub filename: String,
    pub functions: Vec<FunctionDefinition>,
    pub classes: Vec<ClassDefinition>,
    /// Top-level statements. Present, possibly empty, for every file.
    pub top_level: Block,
    pub span: Span,
}

impl File {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            functions: Vec::new(),
            classes: Vec::new(),
            top_level: Block::empty(),
            span: Span::default(),
        }
    }
}
