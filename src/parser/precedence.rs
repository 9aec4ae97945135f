//! Operator precedence for Pratt parsing.

use crate::ast::BinaryOp;
use crate::lexer::TokenKind;

/// Operator precedence levels (higher = tighter binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None = 0,
    Term = 1,   // + -
    Factor = 2, // * /
    Unary = 3,  // -
    Call = 4,   // . () []
    Primary = 5,
}

impl Precedence {
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call => Precedence::Primary,
            Precedence::Primary => Precedence::Primary,
        }
    }
}

/// Infix precedence of the token, `None` if it is not a binary operator.
pub fn get_precedence(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::Word(w) => match BinaryOp::from_word(w) {
            Some(op) => binary_precedence(op),
            None => Precedence::None,
        },
        _ => Precedence::None,
    }
}

pub fn binary_precedence(op: BinaryOp) -> Precedence {
    match op {
        BinaryOp::Add | BinaryOp::Subtract => Precedence::Term,
        BinaryOp::Multiply | BinaryOp::Divide => Precedence::Factor,
    }
}
