//! Human-readable AST dumps.

use std::fmt::Write;

use crate::ast::*;
use crate::parser::precedence::{binary_precedence, Precedence};
use crate::span::Span;

/// Renders a parsed file as an indented tree, one node per line.
///
/// Every line ends with the node's `row:col-row:col` source range.
#[derive(Default)]
pub struct AstPrinter {
    output: String,
    depth: usize,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(mut self, file: &File) -> String {
        self.line(format!("File {:?}", file.filename), file.span);
        self.nested(|p| {
            for function in &file.functions {
                p.function(function);
            }
            for class in &file.classes {
                p.class(class);
            }
            p.block(&file.top_level);
        });
        self.output
    }

    fn function(&mut self, function: &FunctionDefinition) {
        let params: Vec<&str> = function.params.iter().map(|p| p.name.as_str()).collect();
        self.line(
            format!("FunctionDefinition {}({})", function.name, params.join(", ")),
            function.span,
        );
        self.nested(|p| p.block(&function.body));
    }

    fn class(&mut self, class: &ClassDefinition) {
        self.line(format!("ClassDefinition {}", class.name), class.span);
        self.nested(|p| {
            for method in &class.methods {
                p.function(method);
            }
        });
    }

    fn block(&mut self, block: &Block) {
        self.line("Block", block.span);
        self.nested(|p| {
            for stmt in &block.statements {
                p.stmt(stmt);
            }
        });
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expression(expr) => self.expr(expr),
            StmtKind::Assign { location, value } => {
                self.line("Assign", stmt.span);
                self.nested(|p| {
                    p.expr(location);
                    p.expr(value);
                });
            }
            StmtKind::Return(value) => {
                self.line("Return", stmt.span);
                self.nested(|p| p.expr(value));
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Number(n) => self.line(format!("Number {}", n), expr.span),
            ExprKind::String(s) => self.line(format!("String {:?}", s), expr.span),
            ExprKind::Identifier(name) => self.line(format!("Identifier {}", name), expr.span),
            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                self.line(format!("BinaryOp {}", operator.name()), expr.span);
                self.nested(|p| {
                    p.expr(left);
                    p.expr(right);
                });
            }
            ExprKind::Unary { operand } => {
                self.line("UnaryOp", expr.span);
                self.nested(|p| p.expr(operand));
            }
            ExprKind::ClassAccess { left, right } => {
                self.line("ClassAccess", expr.span);
                self.nested(|p| {
                    p.expr(left);
                    p.expr(right);
                });
            }
            ExprKind::IndexAccess { left, index } => {
                self.line("IndexAccess", expr.span);
                self.nested(|p| {
                    p.expr(left);
                    p.expr(index);
                });
            }
            ExprKind::FunctionCall { callee, arguments } => {
                self.line(
                    format!("FunctionCall ({} args)", arguments.len()),
                    expr.span,
                );
                self.nested(|p| {
                    p.expr(callee);
                    for arg in arguments {
                        p.expr(arg);
                    }
                });
            }
        }
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn line(&mut self, label: impl std::fmt::Display, span: Span) {
        let _ = writeln!(
            self.output,
            "{:indent$}{} {}:{}-{}:{}",
            "",
            label,
            span.line,
            span.column,
            span.end_line,
            span.end_column,
            indent = self.depth * 2
        );
    }
}

/// Re-render an expression as source text with as few parentheses as
/// parsing it back requires.
pub fn to_source(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Number(n) => format!("{}", n),
        ExprKind::String(s) => format!("{:?}", s),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Binary {
            left,
            operator,
            right,
        } => {
            let precedence = binary_precedence(*operator);
            format!(
                "{} {} {}",
                operand_source(left, precedence, false),
                operator,
                operand_source(right, precedence, true)
            )
        }
        ExprKind::Unary { operand } => {
            format!("-{}", operand_source(operand, Precedence::Unary, false))
        }
        ExprKind::ClassAccess { left, right } => {
            format!(
                "{}.{}",
                operand_source(left, Precedence::Call, false),
                to_source(right)
            )
        }
        ExprKind::IndexAccess { left, index } => {
            format!(
                "{}[{}]",
                operand_source(left, Precedence::Call, false),
                to_source(index)
            )
        }
        ExprKind::FunctionCall { callee, arguments } => {
            let args: Vec<String> = arguments.iter().map(to_source).collect();
            format!(
                "{}({})",
                operand_source(callee, Precedence::Call, false),
                args.join(", ")
            )
        }
    }
}

fn precedence_of(expr: &Expr) -> Precedence {
    match &expr.kind {
        ExprKind::Binary { operator, .. } => binary_precedence(*operator),
        ExprKind::Unary { .. } => Precedence::Unary,
        _ => Precedence::Primary,
    }
}

fn operand_source(operand: &Expr, parent: Precedence, right_side: bool) -> String {
    let own = precedence_of(operand);
    // Binary levels are left-associative, so an equal-level right operand keeps its group
    if own < parent || (right_side && own == parent) {
        format!("({})", to_source(operand))
    } else {
        to_source(operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> File {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse_file("test.sl").unwrap()
    }

    fn round_trip(source: &str) -> String {
        match &parse(source).top_level.statements[0].kind {
            StmtKind::Expression(expr) => to_source(expr),
            _ => panic!("Expected expression statement"),
        }
    }

    #[test]
    fn test_to_source_drops_redundant_parens() {
        assert_eq!(round_trip("(1 - 2) + 3"), "1 - 2 + 3");
        assert_eq!(round_trip("((a)) * (b * c)"), "a * (b * c)");
    }

    #[test]
    fn test_to_source_keeps_needed_parens() {
        assert_eq!(round_trip("1 - (2 + 3) * 4"), "1 - (2 + 3) * 4");
        assert_eq!(round_trip("-(a + b)"), "-(a + b)");
    }

    #[test]
    fn test_to_source_access_chains() {
        assert_eq!(round_trip("o.m(1, s[0]).x"), "o.m(1, s[0]).x");
        assert_eq!(round_trip("f('hi')"), "f(\"hi\")");
    }

    #[test]
    fn test_tree_dump() {
        let dump = AstPrinter::new().print(&parse("def f(x):\n  return x + 1\nf(4)\n"));
        let expected = "\
File \"test.sl\" 1:1-4:1
  FunctionDefinition f(x) 1:1-2:14
    Block 2:3-2:14
      Return 2:3-2:14
        BinaryOp Add 2:10-2:14
          Identifier x 2:10-2:10
          Number 1 2:14-2:14
  Block 3:1-3:4
    FunctionCall (1 args) 3:1-3:4
      Identifier f 3:1-3:1
      Number 4 3:3-3:3
";
        assert_eq!(dump, expected);
    }
}
