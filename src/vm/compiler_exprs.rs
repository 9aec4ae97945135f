//! Expression compilation.

use crate::ast::{BinaryOp, Expr, ExprKind};
use crate::error::CompileError;
use crate::span::Span;

use super::chunk::Constant;
use super::compiler::{operand, CompileContext, CompileResult, Compiler};
use super::opcode::Op;

impl Compiler {
    /// Compile an expression under `ctx`.
    ///
    /// In rvalue position the expression leaves one value on the stack. In
    /// lvalue position it leaves one reference for a following `Store`.
    pub fn compile_expr(&mut self, expr: &Expr, ctx: CompileContext) -> CompileResult<()> {
        let span = expr.span;

        match &expr.kind {
            ExprKind::Number(n) => {
                self.reject_lvalue(ctx, "a number", span)?;
                self.emit_constant(Constant::Number(*n), span)?;
            }
            ExprKind::String(s) => {
                self.reject_lvalue(ctx, "a string", span)?;
                self.emit_constant(Constant::String(s.clone()), span)?;
            }

            ExprKind::Identifier(name) => {
                if ctx.class_access {
                    let idx = self.add_string_constant(name, span)?;
                    let op = if ctx.lvalue {
                        Op::AttributeRef(idx)
                    } else {
                        Op::GetAttribute(idx)
                    };
                    self.emit(op, span);
                } else {
                    let slot = self.resolve_slot(name, span)?;
                    let op = if ctx.lvalue {
                        Op::LocalRef(slot)
                    } else {
                        Op::GetLocal(slot)
                    };
                    self.emit(op, span);
                }
            }

            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                self.reject_lvalue(ctx, "an arithmetic result", span)?;
                self.compile_expr(left, CompileContext::rvalue())?;
                self.compile_expr(right, CompileContext::rvalue())?;
                let op = match operator {
                    BinaryOp::Add => Op::Add,
                    BinaryOp::Subtract => Op::Subtract,
                    BinaryOp::Multiply => Op::Multiply,
                    BinaryOp::Divide => Op::Divide,
                };
                self.emit(op, span);
            }

            ExprKind::Unary { operand } => {
                self.reject_lvalue(ctx, "an arithmetic result", span)?;
                self.compile_expr(operand, CompileContext::rvalue())?;
                self.emit(Op::Negate, span);
            }

            ExprKind::ClassAccess { left, right } => {
                // The object is always a value; only the attribute may be a reference
                self.compile_expr(left, CompileContext::rvalue())?;
                self.compile_expr(right, ctx.under_class_access())?;
            }

            ExprKind::IndexAccess { left, index } => {
                if ctx.lvalue {
                    return Err(CompileError::new("strings cannot be assigned into", span));
                }
                self.compile_expr(left, CompileContext::rvalue())?;
                self.compile_expr(index, CompileContext::rvalue())?;
                self.emit(Op::Index, span);
            }

            ExprKind::FunctionCall { callee, arguments } => {
                self.reject_lvalue(ctx, "a call result", span)?;
                self.compile_call(callee, arguments, ctx, span)?;
            }
        }

        Ok(())
    }

    /// Calls are resolved by name: a method when under class access, else a
    /// free function, else a class constructor.
    fn compile_call(
        &mut self,
        callee: &Expr,
        arguments: &[Expr],
        ctx: CompileContext,
        span: Span,
    ) -> CompileResult<()> {
        let Some(name) = callee.as_identifier() else {
            return Err(CompileError::new(
                "only named functions, classes and methods can be called",
                callee.span,
            ));
        };

        for arg in arguments {
            self.compile_expr(arg, CompileContext::rvalue())?;
        }
        let argc = u8::try_from(arguments.len())
            .map_err(|_| CompileError::new("too many arguments in one call", span))?;

        if ctx.class_access {
            let idx = self.add_string_constant(name, callee.span)?;
            self.emit(Op::CallMethod(idx, argc), span);
            return Ok(());
        }

        if let Some((index, _, signature)) = self.functions.get_full(name) {
            if signature.arity != arguments.len() {
                return Err(CompileError::wrong_arity(
                    name,
                    signature.arity,
                    arguments.len(),
                    span,
                ));
            }
            let index = operand(index, "functions", span)?;
            self.emit(Op::CallFunction(index, argc), span);
            return Ok(());
        }

        if let Some((index, _, signature)) = self.classes.get_full(name) {
            if signature.constructor_arity != arguments.len() {
                return Err(CompileError::wrong_arity(
                    name,
                    signature.constructor_arity,
                    arguments.len(),
                    span,
                ));
            }
            let index = operand(index, "classes", span)?;
            self.emit(Op::Construct(index, argc), span);
            return Ok(());
        }

        Err(CompileError::undefined_callee(name, callee.span))
    }

    fn reject_lvalue(&self, ctx: CompileContext, what: &str, span: Span) -> CompileResult<()> {
        if ctx.lvalue {
            Err(CompileError::new(format!("cannot assign to {}", what), span))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use crate::vm::chunk::CompiledProgram;
    use crate::vm::compiler::Compiler;
    use crate::vm::opcode::Op;
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> CompiledProgram {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let file = Parser::new(tokens).parse_file("test.sl").unwrap();
        Compiler::compile(&file).unwrap()
    }

    #[test]
    fn test_attribute_assignment() {
        let program = compile("o.val = 3\n");
        assert_eq!(
            program.main.chunk.code,
            vec![
                Op::Constant(0),
                Op::GetLocal(0),
                Op::AttributeRef(1),
                Op::Store,
                Op::Void,
                Op::Return,
            ]
        );
    }

    #[test]
    fn test_nested_attribute_read() {
        let program = compile("a.b.c");
        assert_eq!(
            program.main.chunk.code,
            vec![
                Op::GetLocal(0),
                Op::GetAttribute(0),
                Op::GetAttribute(1),
                Op::Return,
            ]
        );
    }

    #[test]
    fn test_method_call_pushes_receiver_then_args() {
        let program = compile("o.get(1, 2)");
        assert_eq!(
            program.main.chunk.code,
            vec![
                Op::GetLocal(0),
                Op::Constant(0),
                Op::Constant(1),
                Op::CallMethod(2, 2),
                Op::Return,
            ]
        );
    }

    #[test]
    fn test_constructor_call() {
        let program = compile("class P:\n  def __init__(self, v):\n    self.v = v\np = P(1)\n");
        assert_eq!(program.main.chunk.code[1], Op::Construct(0, 1));
    }

    #[test]
    fn test_class_without_init_takes_no_arguments() {
        let source = "class E:\n  def m(self):\n    return 1\nE(1)\n";
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let file = Parser::new(tokens).parse_file("test.sl").unwrap();
        assert!(Compiler::compile(&file).is_err());
    }

    #[test]
    fn test_index_and_negate() {
        let program = compile("-s[0]");
        assert_eq!(
            program.main.chunk.code,
            vec![
                Op::GetLocal(0),
                Op::Constant(0),
                Op::Index,
                Op::Negate,
                Op::Return,
            ]
        );
    }
}
