//! Statement compilation.

use crate::ast::{Block, Stmt, StmtKind};

use super::compiler::{CompileContext, CompileResult, Compiler};
use super::opcode::Op;

impl Compiler {
    /// Compile a function or method body.
    pub(crate) fn compile_body(&mut self, body: &Block) -> CompileResult<()> {
        for stmt in &body.statements {
            self.compile_stmt(stmt)?;
        }
        self.emit_implicit_return(end_of(body));
        Ok(())
    }

    /// Compile the top-level block. A trailing expression statement is the
    /// script's result.
    pub(crate) fn compile_script(&mut self, block: &Block) -> CompileResult<()> {
        let Some((last, rest)) = block.statements.split_last() else {
            self.emit_implicit_return(block.span);
            return Ok(());
        };

        for stmt in rest {
            self.compile_stmt(stmt)?;
        }
        match &last.kind {
            StmtKind::Expression(expr) => {
                self.compile_expr(expr, CompileContext::rvalue())?;
                self.emit(Op::Return, last.span);
            }
            _ => self.compile_stmt(last)?,
        }
        self.emit_implicit_return(end_of(block));
        Ok(())
    }

    /// Compile one statement. The operand stack is back at its starting
    /// height afterwards.
    pub fn compile_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                self.compile_expr(expr, CompileContext::rvalue())?;
                self.emit(Op::Pop, stmt.span);
            }
            StmtKind::Assign { location, value } => {
                self.compile_expr(value, CompileContext::rvalue())?;
                self.compile_expr(location, CompileContext::lvalue())?;
                self.emit(Op::Store, stmt.span);
            }
            StmtKind::Return(value) => {
                self.compile_expr(value, CompileContext::rvalue())?;
                self.emit(Op::Return, stmt.span);
            }
        }
        Ok(())
    }
}

fn end_of(block: &Block) -> crate::span::Span {
    block
        .statements
        .last()
        .map(|s| s.span)
        .unwrap_or(block.span)
}
