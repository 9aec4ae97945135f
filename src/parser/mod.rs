//! Parser module for Slate.

mod core;
mod declarations;
mod expressions;
pub(crate) mod precedence;
mod statements;

#[cfg(test)]
mod tests;

pub use self::core::{ParseResult, Parser, MAX_EXPRESSION_DEPTH};
pub use self::precedence::Precedence;
