//! Abstract Syntax Tree for Slate.

pub mod expr;
pub mod printer;
pub mod stmt;

pub use expr::{BinaryOp, Expr, ExprKind};
pub use printer::{to_source, AstPrinter};
pub use stmt::{Block, ClassDefinition, File, FunctionDefinition, Parameter, Stmt, StmtKind};
