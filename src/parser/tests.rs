//! Parser tests.

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::error::ParserError;
    use crate::lexer::Scanner;
    use crate::parser::{Parser, MAX_EXPRESSION_DEPTH};
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> File {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse_file("test.sl").unwrap()
    }

    fn parse_err(source: &str) -> ParserError {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse_file("test.sl").unwrap_err()
    }

    fn parse_expr(source: &str) -> Expr {
        let file = parse(source);
        match file.top_level.statements.into_iter().next().unwrap().kind {
            StmtKind::Expression(expr) => expr,
            _ => panic!("Expected expression statement"),
        }
    }

    fn ident(expr: &Expr) -> &str {
        expr.as_identifier().expect("Expected identifier")
    }

    #[test]
    fn test_subtraction_then_addition_is_left_associative() {
        // 1 - 2 + 3 must group as (1 - 2) + 3
        let expr = parse_expr("1 - 2 + 3");
        match expr.kind {
            ExprKind::Binary {
                operator: BinaryOp::Add,
                left,
                right,
            } => {
                assert!(matches!(
                    left.kind,
                    ExprKind::Binary {
                        operator: BinaryOp::Subtract,
                        ..
                    }
                ));
                assert_eq!(right.kind, ExprKind::Number(3.0));
            }
            _ => panic!("Expected add at top"),
        }
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 should parse as 1 + (2 * 3)
        let expr = parse_expr("1 + 2 * 3");
        match expr.kind {
            ExprKind::Binary {
                operator: BinaryOp::Add,
                right,
                ..
            } => assert!(matches!(
                right.kind,
                ExprKind::Binary {
                    operator: BinaryOp::Multiply,
                    ..
                }
            )),
            _ => panic!("Expected add at top"),
        }
    }

    #[test]
    fn test_division_chain() {
        // 8 / 4 / 2 is (8 / 4) / 2
        let expr = parse_expr("8 / 4 / 2");
        match expr.kind {
            ExprKind::Binary { left, right, .. } => {
                assert!(matches!(left.kind, ExprKind::Binary { .. }));
                assert_eq!(right.kind, ExprKind::Number(2.0));
            }
            _ => panic!("Expected binary expression"),
        }
    }

    #[test]
    fn test_unary_binds_tighter_than_factor() {
        let expr = parse_expr("-a * b");
        match expr.kind {
            ExprKind::Binary {
                operator: BinaryOp::Multiply,
                left,
                ..
            } => assert!(matches!(left.kind, ExprKind::Unary { .. })),
            _ => panic!("Expected multiply at top"),
        }
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let expr = parse_expr("(1 + 2) * 3");
        match expr.kind {
            ExprKind::Binary {
                operator: BinaryOp::Multiply,
                left,
                ..
            } => {
                assert!(matches!(
                    left.kind,
                    ExprKind::Binary {
                        operator: BinaryOp::Add,
                        ..
                    }
                ));
                // Parentheses are part of the group's range
                assert_eq!((left.span.start, left.span.end), (0, 7));
            }
            _ => panic!("Expected multiply at top"),
        }
    }

    #[test]
    fn test_dotted_access_nests_left() {
        let expr = parse_expr("a.b.c");
        match expr.kind {
            ExprKind::ClassAccess { left, right } => {
                assert_eq!(ident(&right), "c");
                match left.kind {
                    ExprKind::ClassAccess { left, right } => {
                        assert_eq!(ident(&left), "a");
                        assert_eq!(ident(&right), "b");
                    }
                    _ => panic!("Expected nested class access"),
                }
            }
            _ => panic!("Expected class access"),
        }
    }

    #[test]
    fn test_method_call() {
        let expr = parse_expr("o.get(1)");
        match expr.kind {
            ExprKind::ClassAccess { left, right } => {
                assert_eq!(ident(&left), "o");
                match right.kind {
                    ExprKind::FunctionCall { callee, arguments } => {
                        assert_eq!(ident(&callee), "get");
                        assert_eq!(arguments.len(), 1);
                    }
                    _ => panic!("Expected call on the right"),
                }
            }
            _ => panic!("Expected class access"),
        }
    }

    #[test]
    fn test_call() {
        let expr = parse_expr("foo(1, \"x\")");
        match expr.kind {
            ExprKind::FunctionCall { callee, arguments } => {
                assert_eq!(ident(&callee), "foo");
                assert_eq!(
                    arguments.into_iter().map(|a| a.kind).collect::<Vec<_>>(),
                    vec![ExprKind::Number(1.0), ExprKind::String("x".to_string())]
                );
            }
            _ => panic!("Expected call"),
        }
    }

    #[test]
    fn test_index_access() {
        let expr = parse_expr("s[1 + 1]");
        match expr.kind {
            ExprKind::IndexAccess { left, index } => {
                assert_eq!(ident(&left), "s");
                assert!(matches!(index.kind, ExprKind::Binary { .. }));
            }
            _ => panic!("Expected index access"),
        }
    }

    #[test]
    fn test_assignment_targets() {
        let file = parse("x = 1\no.val = 2\ns[0] = 3\n");
        let kinds: Vec<_> = file
            .top_level
            .statements
            .iter()
            .map(|s| matches!(s.kind, StmtKind::Assign { .. }))
            .collect();
        assert_eq!(kinds, vec![true, true, true]);
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert!(matches!(
            parse_err("1 + x = 2"),
            ParserError::InvalidAssignmentTarget(_)
        ));
        assert!(matches!(
            parse_err("f() = 2"),
            ParserError::InvalidAssignmentTarget(_)
        ));
        assert!(matches!(
            parse_err("o.m() = 2"),
            ParserError::InvalidAssignmentTarget(_)
        ));
    }

    #[test]
    fn test_function_definition() {
        let file = parse("def f(x, y):\n  z = x + y\n\n  return z\n\nf(1, 2)\n");
        assert_eq!(file.functions.len(), 1);
        let f = &file.functions[0];
        assert_eq!(f.name, "f");
        assert_eq!(
            f.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["x", "y"]
        );
        assert_eq!(f.body.statements.len(), 2);
        assert!(matches!(f.body.statements[1].kind, StmtKind::Return(_)));
        assert_eq!(file.top_level.statements.len(), 1);
        assert_eq!((f.span.line, f.span.end_line), (1, 4));
    }

    #[test]
    fn test_class_definition() {
        let source = "\
class Point:
\tdef __init__(self, v):
\t\tself.val = v

\tdef get(self):
\t\treturn self.val
o = Point(7)
";
        let file = parse(source);
        assert_eq!(file.classes.len(), 1);
        let class = &file.classes[0];
        assert_eq!(class.name, "Point");
        assert_eq!(
            class.methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            vec!["__init__", "get"]
        );
        assert_eq!(file.top_level.statements.len(), 1);
    }

    #[test]
    fn test_empty_file_has_top_level_block() {
        let file = parse("\n\n# nothing here\n");
        assert!(file.top_level.is_empty());
        assert!(file.functions.is_empty());
    }

    #[test]
    fn test_unexpected_indentation_at_top_level() {
        assert!(matches!(
            parse_err("x = 1\n  y = 2\n"),
            ParserError::UnexpectedIndentation(_)
        ));
    }

    #[test]
    fn test_over_indented_body_line() {
        assert!(matches!(
            parse_err("def f():\n  x = 1\n    y = 2\n"),
            ParserError::UnexpectedIndentation(_)
        ));
    }

    #[test]
    fn test_empty_function_body() {
        let err = parse_err("def f():\nx = 1\n");
        assert!(err.to_string().contains("expected an indented body"));
    }

    #[test]
    fn test_class_without_methods() {
        let err = parse_err("class A:\n\nx = 1\n");
        assert!(err.to_string().contains("has no methods"));
    }

    #[test]
    fn test_nested_def_rejected() {
        let err = parse_err("def f():\n  def g():\n    return 1\n");
        assert!(matches!(err, ParserError::General { .. }));
    }

    #[test]
    fn test_keyword_is_not_an_identifier() {
        let err = parse_err("def return(x):\n  return x\n");
        assert!(err.to_string().contains("reserved word"));
    }

    #[test]
    fn test_missing_close_paren() {
        assert!(matches!(
            parse_err("f(1, 2\n"),
            ParserError::UnexpectedToken { .. }
        ));
        assert!(matches!(parse_err("(1 + 2"), ParserError::UnexpectedEof(_)));
    }

    #[test]
    fn test_two_expressions_on_one_line() {
        assert!(matches!(
            parse_err("x y\n"),
            ParserError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_reparse_is_deterministic() {
        let source = "def f(x):\n  return x * 2 - 1\nclass A:\n  def m(self):\n    return self.v[0]\nf(3)\n";
        assert_eq!(parse(source), parse(source));
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let n = 10_000;
        let source = format!("{}1{}", "(".repeat(n), ")".repeat(n));
        match parse_err(&source) {
            ParserError::General { message, .. } => {
                assert_eq!(message, "expression nested too deeply")
            }
            other => panic!("Expected nesting error, got {:?}", other),
        }

        let negations = format!("{}1", "-".repeat(n));
        assert!(matches!(parse_err(&negations), ParserError::General { .. }));

        let calls = format!("{}x{}", "f(".repeat(n), ")".repeat(n));
        assert!(matches!(parse_err(&calls), ParserError::General { .. }));
    }

    #[test]
    fn test_nesting_below_the_limit_parses() {
        let n = MAX_EXPRESSION_DEPTH - 1;
        let expr = parse_expr(&format!("{}1{}", "(".repeat(n), ")".repeat(n)));
        assert_eq!(expr.kind, ExprKind::Number(1.0));
    }
}
