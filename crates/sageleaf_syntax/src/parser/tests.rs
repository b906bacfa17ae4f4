#[cfg(test)]
/// Parser unit tests.
///
/// These tests pin down the shape of parsed nodes, operator precedence and
/// associativity, exact span placement, and the errors produced for malformed
/// input.
mod tests {
    use super::*;
    use crate::diagnostics::ParseErrorKind;
    use crate::lexer;

    fn parse_program(source: &str) -> Program {
        let tokens = lexer::lex(source, "test.sl").unwrap();
        parse(&tokens).unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        let tokens = lexer::lex(source, "test.sl").unwrap();
        parse(&tokens).unwrap_err()
    }

    fn first_function(program: &Program) -> &FunctionDef {
        match &program.statements[0].node {
            TopLevelStmt::Function(f) => f,
            other => panic!("expected function, got {other:?}"),
        }
    }

    /// Parse `expr_src` in return position and hand back the value expression.
    fn return_expr(expr_src: &str) -> Spanned<Expr> {
        let program = parse_program(&format!("fn main() {{ return {expr_src}; }}"));
        match &first_function(&program).body[0].node {
            Statement::Return(Some(value)) => value.clone(),
            other => panic!("expected return with value, got {other:?}"),
        }
    }

    fn assert_span(span: &SourceSpan, expected: (u32, u32, u32, u32)) {
        assert_eq!(
            (span.start_line, span.start_col, span.end_line, span.end_col),
            expected,
            "span mismatch"
        );
    }

    // ========================================================================
    // Programs and declarations
    // ========================================================================

    #[test]
    fn test_empty_program() {
        let program = parse_program("");
        assert!(program.statements.is_empty());
        assert_span(&program.span, (1, 1, 1, 1));
    }

    #[test]
    fn test_program_span_covers_all_tokens() {
        let program = parse_program("fn a() { }\nfn b() { }");
        assert_eq!(program.statements.len(), 2);
        assert_span(&program.span, (1, 1, 2, 11));
    }

    #[test]
    fn test_function_def_shape() {
        let program = parse_program("fn add(a: i32, b: i32) -> i32 { return a + b; }");
        let f = first_function(&program);
        assert_eq!(f.name.node, "add");
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].node.name, "a");
        assert_eq!(f.params[0].node.ty.node, Type::I32);
        assert_eq!(f.return_type.as_ref().unwrap().node, Type::I32);
        assert_eq!(f.body.len(), 1);
    }

    #[test]
    fn test_function_return_type_colon_spelling() {
        // Both `-> i32` and `: i32` introduce the return type.
        let program = parse_program("fn f(): i32 { return 1; }");
        let f = first_function(&program);
        assert_eq!(f.return_type.as_ref().unwrap().node, Type::I32);
    }

    #[test]
    fn test_function_span_covers_fn_through_closing_brace() {
        let program = parse_program("fn f(): i32 { return 1; }");
        // `fn` at column 1; the closing `}` sits at column 25, so the
        // half-open span ends at 26.
        assert_span(&program.statements[0].span, (1, 1, 1, 26));
    }

    #[test]
    fn test_function_generic_params_recorded() {
        let program = parse_program("fn pair't'u(a: 't, b: 'u) { }");
        let f = first_function(&program);
        assert_eq!(f.type_params, vec!["t".to_string(), "u".to_string()]);
        assert_eq!(f.params[0].node.ty.node, Type::Generic("t".to_string()));
    }

    #[test]
    fn test_struct_def_commas_optional() {
        let with_commas = parse_program("struct point { x: i32, y: i32, }");
        let without = parse_program("struct point { x: i32 y: i32 }");
        for program in [with_commas, without] {
            match &program.statements[0].node {
                TopLevelStmt::Struct(s) => {
                    assert_eq!(s.name, "point");
                    assert_eq!(s.fields.len(), 2);
                    assert_eq!(s.fields[1].node.name, "y");
                }
                other => panic!("expected struct, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_union_def_variants_and_payloads() {
        let program = parse_program("union opt't { none some: 't }");
        match &program.statements[0].node {
            TopLevelStmt::Union(u) => {
                assert_eq!(u.name, "opt");
                assert_eq!(u.type_params, vec!["t".to_string()]);
                assert_eq!(u.variants.len(), 2);
                assert!(u.variants[0].node.payload.is_none());
                assert_eq!(
                    u.variants[1].node.payload.as_ref().unwrap().node,
                    Type::Generic("t".to_string())
                );
            }
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn test_import_forms() {
        let whole = parse_program("import io;");
        match &whole.statements[0].node {
            TopLevelStmt::Import(imp) => {
                assert_eq!(imp.package, "io");
                assert!(imp.items.is_none());
                assert!(imp.alias.is_none());
            }
            other => panic!("expected import, got {other:?}"),
        }

        let aliased = parse_program("import io as stdio;");
        match &aliased.statements[0].node {
            TopLevelStmt::Import(imp) => {
                assert_eq!(imp.alias.as_deref(), Some("stdio"));
            }
            other => panic!("expected import, got {other:?}"),
        }

        let items = parse_program("import read, write from io;");
        match &items.statements[0].node {
            TopLevelStmt::Import(imp) => {
                assert_eq!(imp.package, "io");
                assert_eq!(
                    imp.items.as_deref(),
                    Some(&["read".to_string(), "write".to_string()][..])
                );
            }
            other => panic!("expected import, got {other:?}"),
        }
    }

    #[test]
    fn test_import_requires_semicolon() {
        let err = parse_err("import io");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "`;`".to_string(),
                found: "end of input".to_string(),
            }
        );
    }

    #[test]
    fn test_top_level_var_and_const() {
        let program = parse_program("counter: i32 = 5;");
        match &program.statements[0].node {
            TopLevelStmt::Var(v) => {
                assert_eq!(v.name, "counter");
                assert_eq!(v.ty.as_ref().unwrap().node, Type::I32);
            }
            other => panic!("expected var declaration, got {other:?}"),
        }
        // Span runs from the name through the value; `;` is not merged.
        assert_span(&program.statements[0].span, (1, 1, 1, 17));

        let program = parse_program("const pi: f64 = 3.14;");
        match &program.statements[0].node {
            TopLevelStmt::Const(c) => {
                assert_eq!(c.name, "pi");
                assert_eq!(c.ty.as_ref().unwrap().node, Type::F64);
                assert_eq!(c.value.node, Expr::Float("3.14".to_string()));
            }
            other => panic!("expected const declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_top_level_native_block() {
        let program = parse_program("native { #include <stdio.h> }");
        match &program.statements[0].node {
            TopLevelStmt::Native(n) => {
                assert_eq!(n.content, " #include <stdio.h> ");
            }
            other => panic!("expected native block, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_token_at_top_level() {
        let err = parse_err("+");
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: "`+`".to_string(),
                context: SyntaxContext::TopLevel,
            }
        );
    }

    #[test]
    fn test_fatal_on_malformed_parameter_list() {
        // The error lands on the token following `(`.
        let err = parse_err("fn f(: i32 {}");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "identifier".to_string(),
                found: "`:`".to_string(),
            }
        );
        assert_eq!((err.span.start_line, err.span.start_col), (1, 6));
    }

    #[test]
    fn test_unterminated_body_reports_eof() {
        let err = parse_err("fn main() {");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "`}`".to_string(),
                found: "end of input".to_string(),
            }
        );
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[test]
    fn test_statement_dispatch_var_assign_expr() {
        let program = parse_program("fn main() { x: i32 = 1; x = 2; f(); }");
        let f = first_function(&program);
        assert!(matches!(f.body[0].node, Statement::Var(_)));
        assert!(matches!(f.body[1].node, Statement::Assign(_)));
        assert!(matches!(f.body[2].node, Statement::Expr(_)));
    }

    #[test]
    fn test_assignment_target_postfix_chain() {
        let program = parse_program("fn main() { a.b[0] = v; }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::Assign(assign) => match &assign.target.node {
                Expr::Index(base, _) => {
                    assert!(matches!(base.node, Expr::Field(_, _)));
                }
                other => panic!("expected index target, got {other:?}"),
            },
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_return_without_value() {
        let program = parse_program("fn main() { return; }");
        let f = first_function(&program);
        assert!(matches!(f.body[0].node, Statement::Return(None)));
        // Span covers the keyword only.
        assert_span(&f.body[0].span, (1, 13, 1, 19));
    }

    #[test]
    fn test_if_span_ends_at_else_brace() {
        let program = parse_program("fn main() { if c { x = 1; } else { y = 2; } }");
        let f = first_function(&program);
        assert_span(&f.body[0].span, (1, 13, 1, 44));
    }

    #[test]
    fn test_if_span_without_else_ends_at_last_then_statement() {
        let program = parse_program("fn main() { if c { x = 1; } }");
        let f = first_function(&program);
        assert_span(&f.body[0].span, (1, 13, 1, 25));
    }

    #[test]
    fn test_if_elif_else_structure() {
        let program =
            parse_program("fn main() { if a { } elif b { } elif c { } else { } }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::If(stmt) => {
                assert_eq!(stmt.elif_branches.len(), 2);
                assert!(stmt.else_body.is_some());
                assert!(stmt.then_body.is_empty());
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_while_and_break_spans() {
        let program = parse_program("fn main() { while true { break; } }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::While(w) => {
                assert_eq!(w.condition.node, Expr::Bool(true));
                // `break` span covers the keyword only, not the `;`.
                assert_span(&w.body[0].span, (1, 26, 1, 31));
            }
            other => panic!("expected while, got {other:?}"),
        }
    }

    #[test]
    fn test_for_targets_with_discarded_annotations() {
        let program = parse_program("fn main() { for k: str, v in m { continue; } }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::For(stmt) => {
                let names: Vec<&str> =
                    stmt.target.iter().map(|t| t.node.as_str()).collect();
                assert_eq!(names, vec!["k", "v"]);
                assert_eq!(stmt.iterable.node, Expr::Ident("m".to_string()));
                assert!(matches!(stmt.body[0].node, Statement::Continue));
            }
            other => panic!("expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_native_block_statement() {
        let program = parse_program("fn main() { native { if (x) { y(); } } }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::Native(n) => assert_eq!(n.content, " if (x) { y(); } "),
            other => panic!("expected native statement, got {other:?}"),
        }
    }

    #[test]
    fn test_match_cases_guard_and_body_forms() {
        let program = parse_program(
            "fn main() { match x { case n if n > 0: return n; case _: { return 0; } } }",
        );
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::Match(m) => {
                assert_eq!(m.cases.len(), 2);
                let first = &m.cases[0].node;
                assert_eq!(first.pattern.node, Pattern::Identifier("n".to_string()));
                assert!(first.guard.is_some());
                assert_eq!(first.body.len(), 1);
                let second = &m.cases[1].node;
                assert_eq!(second.pattern.node, Pattern::Wildcard);
                assert!(second.guard.is_none());
                assert_eq!(second.body.len(), 1);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_match_case_span_ends_at_last_body_statement() {
        let program = parse_program("fn main() { match x { case _: break; } }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::Match(m) => {
                // `case` at column 23, `break` ends at column 36.
                assert_span(&m.cases[0].span, (1, 23, 1, 36));
            }
            other => panic!("expected match, got {other:?}"),
        }
        // The match statement itself runs through its closing brace.
        assert_span(&f.body[0].span, (1, 13, 1, 39));
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    #[test]
    fn test_list_pattern_prefix_rest_suffix() {
        let program =
            parse_program("fn main() { match xs { case [a, b, ..rest, z]: break; } }");
        let f = first_function(&program);
        let m = match &f.body[0].node {
            Statement::Match(m) => m,
            other => panic!("expected match, got {other:?}"),
        };
        match &m.cases[0].node.pattern.node {
            Pattern::List(lp) => {
                assert_eq!(lp.prefix_patterns.len(), 2);
                assert_eq!(
                    lp.prefix_patterns[0].node,
                    Pattern::Identifier("a".to_string())
                );
                assert_eq!(
                    lp.prefix_patterns[1].node,
                    Pattern::Identifier("b".to_string())
                );
                assert_eq!(lp.rest_name.as_deref(), Some("rest"));
                assert_eq!(lp.suffix_patterns.len(), 1);
                assert_eq!(
                    lp.suffix_patterns[0].node,
                    Pattern::Identifier("z".to_string())
                );
            }
            other => panic!("expected list pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_list_pattern_rest_only() {
        let program = parse_program("fn main() { match xs { case [..rest]: break; } }");
        let f = first_function(&program);
        let m = match &f.body[0].node {
            Statement::Match(m) => m,
            other => panic!("expected match, got {other:?}"),
        };
        match &m.cases[0].node.pattern.node {
            Pattern::List(lp) => {
                assert!(lp.prefix_patterns.is_empty());
                assert_eq!(lp.rest_name.as_deref(), Some("rest"));
                assert!(lp.suffix_patterns.is_empty());
            }
            other => panic!("expected list pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_list_pattern_rest_requires_identifier() {
        let err = parse_err("fn main() { match xs { case [a, ..]: break; } }");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "identifier".to_string(),
                found: "`]`".to_string(),
            }
        );
    }

    #[test]
    fn test_list_pattern_rejects_second_rest() {
        // The second `..` reads as a union pattern over a dangling dot.
        let err = parse_err("fn main() { match xs { case [a, ..rest, ..more]: break; } }");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "identifier".to_string(),
                found: "`.`".to_string(),
            }
        );
    }

    #[test]
    fn test_literal_and_wildcard_patterns() {
        let program = parse_program(
            "fn main() { match x { case 42: break; case \"hi\": break; case true: break; case _: break; } }",
        );
        let f = first_function(&program);
        let m = match &f.body[0].node {
            Statement::Match(m) => m,
            other => panic!("expected match, got {other:?}"),
        };
        match &m.cases[0].node.pattern.node {
            Pattern::Literal(e) => assert_eq!(e.node, Expr::Int("42".to_string())),
            other => panic!("expected literal pattern, got {other:?}"),
        }
        match &m.cases[1].node.pattern.node {
            Pattern::Literal(e) => assert_eq!(e.node, Expr::Str("hi".to_string())),
            other => panic!("expected literal pattern, got {other:?}"),
        }
        match &m.cases[2].node.pattern.node {
            Pattern::Literal(e) => assert_eq!(e.node, Expr::Bool(true)),
            other => panic!("expected literal pattern, got {other:?}"),
        }
        assert_eq!(m.cases[3].node.pattern.node, Pattern::Wildcard);
    }

    #[test]
    fn test_union_pattern_multi_payload_synthesizes_struct() {
        let program =
            parse_program("fn main() { match x { case .Pair{a, b}: break; } }");
        let f = first_function(&program);
        let m = match &f.body[0].node {
            Statement::Match(m) => m,
            other => panic!("expected match, got {other:?}"),
        };
        match &m.cases[0].node.pattern.node {
            Pattern::Union {
                variant,
                pattern: Some(p),
            } => {
                assert_eq!(variant, "Pair");
                match &p.node {
                    Pattern::Struct(sp) => {
                        assert_eq!(sp.name, "");
                        assert_eq!(sp.fields.len(), 2);
                        assert!(sp.fields.iter().all(|field| field.node.name.is_none()));
                        assert_eq!(
                            sp.fields[0].node.pattern.node,
                            Pattern::Identifier("a".to_string())
                        );
                    }
                    other => panic!("expected synthesized struct pattern, got {other:?}"),
                }
            }
            other => panic!("expected union pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_union_pattern_bare_and_empty_payload() {
        let program = parse_program(
            "fn main() { match x { case .none: break; case .unit{}: break; } }",
        );
        let f = first_function(&program);
        let m = match &f.body[0].node {
            Statement::Match(m) => m,
            other => panic!("expected match, got {other:?}"),
        };
        assert_eq!(
            m.cases[0].node.pattern.node,
            Pattern::Union {
                variant: "none".to_string(),
                pattern: None,
            }
        );
        assert_eq!(
            m.cases[1].node.pattern.node,
            Pattern::Union {
                variant: "unit".to_string(),
                pattern: None,
            }
        );
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    #[test]
    fn test_precedence_multiplication_binds_tighter() {
        let expr = return_expr("2 + 3 * 4");
        match &expr.node {
            Expr::Binary(left, BinaryOp::Add, right) => {
                assert_eq!(left.node, Expr::Int("2".to_string()));
                match &right.node {
                    Expr::Binary(l, BinaryOp::Mul, r) => {
                        assert_eq!(l.node, Expr::Int("3".to_string()));
                        assert_eq!(r.node, Expr::Int("4".to_string()));
                    }
                    other => panic!("expected multiplication on the right, got {other:?}"),
                }
            }
            other => panic!("expected addition at the root, got {other:?}"),
        }

        let expr = return_expr("2 * 3 + 4");
        match &expr.node {
            Expr::Binary(left, BinaryOp::Add, right) => {
                assert!(matches!(left.node, Expr::Binary(_, BinaryOp::Mul, _)));
                assert_eq!(right.node, Expr::Int("4".to_string()));
            }
            other => panic!("expected addition at the root, got {other:?}"),
        }
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = return_expr("10 - 3 - 2");
        match &expr.node {
            Expr::Binary(left, BinaryOp::Sub, right) => {
                assert_eq!(right.node, Expr::Int("2".to_string()));
                match &left.node {
                    Expr::Binary(l, BinaryOp::Sub, r) => {
                        assert_eq!(l.node, Expr::Int("10".to_string()));
                        assert_eq!(r.node, Expr::Int("3".to_string()));
                    }
                    other => panic!("expected subtraction on the left, got {other:?}"),
                }
            }
            other => panic!("expected subtraction at the root, got {other:?}"),
        }
    }

    #[test]
    fn test_logical_operators_and_unary_not() {
        let expr = return_expr("not a and b");
        match &expr.node {
            Expr::Binary(left, BinaryOp::And, right) => {
                assert!(matches!(&left.node, Expr::Unary(UnaryOp::Not, _)));
                assert_eq!(right.node, Expr::Ident("b".to_string()));
            }
            other => panic!("expected and at the root, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_binds_tighter_than_multiplication() {
        let expr = return_expr("-x * 2");
        match &expr.node {
            Expr::Binary(left, BinaryOp::Mul, _) => {
                assert!(matches!(&left.node, Expr::Unary(UnaryOp::Neg, _)));
            }
            other => panic!("expected multiplication at the root, got {other:?}"),
        }
    }

    #[test]
    fn test_deref_and_addr_of() {
        let expr = return_expr("*p");
        assert!(matches!(&expr.node, Expr::Unary(UnaryOp::Deref, _)));
        let expr = return_expr("&x");
        assert!(matches!(&expr.node, Expr::Unary(UnaryOp::AddrOf, _)));
    }

    #[test]
    fn test_range_expressions() {
        let expr = return_expr("1 ..= 10");
        match &expr.node {
            Expr::Range { inclusive, .. } => assert!(inclusive),
            other => panic!("expected range, got {other:?}"),
        }
        let expr = return_expr("1 ..< 10");
        match &expr.node {
            Expr::Range { inclusive, .. } => assert!(!inclusive),
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn test_range_is_non_associative() {
        let err = parse_err("fn main() { r = 1..=2..=3; }");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "`;`".to_string(),
                found: "`..=`".to_string(),
            }
        );
    }

    #[test]
    fn test_call_span_includes_closing_paren() {
        let program = parse_program("fn main() { f(); }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::Expr(e) => {
                assert!(matches!(&e.node, Expr::Call(name, args) if name == "f" && args.is_empty()));
                assert_span(&e.span, (1, 13, 1, 16));
            }
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_method_call_span_includes_closing_paren() {
        let program = parse_program("fn main() { x.m(1); }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::Expr(e) => {
                match &e.node {
                    Expr::MethodCall(base, method, args) => {
                        assert_eq!(base.node, Expr::Ident("x".to_string()));
                        assert_eq!(method, "m");
                        assert_eq!(args.len(), 1);
                    }
                    other => panic!("expected method call, got {other:?}"),
                }
                assert_span(&e.span, (1, 13, 1, 19));
            }
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_index_span_includes_closing_bracket() {
        let program = parse_program("fn main() { x[0]; }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::Expr(e) => {
                assert!(matches!(&e.node, Expr::Index(_, _)));
                assert_span(&e.span, (1, 13, 1, 17));
            }
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_call_applies_only_to_bare_identifiers() {
        // `f(1)` is a call; the second `(` is left for the enclosing
        // context, which wants a `;`.
        let err = parse_err("fn main() { f(1)(2); }");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "`;`".to_string(),
                found: "`(`".to_string(),
            }
        );

        let err = parse_err("fn main() { 5(1); }");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "`;`".to_string(),
                found: "`(`".to_string(),
            }
        );
    }

    #[test]
    fn test_argument_list_rejects_trailing_comma() {
        let err = parse_err("fn main() { f(1,); }");
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: "`)`".to_string(),
                context: SyntaxContext::Expression,
            }
        );
    }

    #[test]
    fn test_field_access_chain() {
        let expr = return_expr("a.b.c");
        match &expr.node {
            Expr::Field(base, field) => {
                assert_eq!(field, "c");
                assert!(matches!(&base.node, Expr::Field(_, _)));
            }
            other => panic!("expected field access, got {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_expression_keeps_inner_span() {
        let program = parse_program("fn main() { return (1 + 2) * 3; }");
        let f = first_function(&program);
        match &f.body[0].node {
            Statement::Return(Some(value)) => match &value.node {
                Expr::Binary(left, BinaryOp::Mul, _) => {
                    // The grouped addition spans `1 + 2`, not the parens.
                    assert_span(&left.span, (1, 21, 1, 26));
                }
                other => panic!("expected multiplication, got {other:?}"),
            },
            other => panic!("expected return, got {other:?}"),
        }
    }

    #[test]
    fn test_list_literal_with_trailing_comma() {
        let expr = return_expr("[1, 2, 3,]");
        match &expr.node {
            Expr::List(elements) => assert_eq!(elements.len(), 3),
            other => panic!("expected list literal, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_braces_are_an_empty_map() {
        let expr = return_expr("{}");
        assert_eq!(expr.node, Expr::Map(Vec::new()));
    }

    #[test]
    fn test_map_literal_pairs() {
        let expr = return_expr("{1: 2, 3: 4,}");
        match &expr.node {
            Expr::Map(pairs) => {
                assert_eq!(pairs.len(), 2);
                assert_eq!(pairs[0].node.key.node, Expr::Int("1".to_string()));
                assert_eq!(pairs[1].node.value.node, Expr::Int("4".to_string()));
            }
            other => panic!("expected map literal, got {other:?}"),
        }
    }

    #[test]
    fn test_set_literal_elements() {
        let expr = return_expr("{1, 2, 3}");
        match &expr.node {
            Expr::Set(elements) => assert_eq!(elements.len(), 3),
            other => panic!("expected set literal, got {other:?}"),
        }
    }

    #[test]
    fn test_union_literal_forms() {
        let bare = return_expr(".none");
        assert_eq!(
            bare.node,
            Expr::UnionLiteral {
                variant: "none".to_string(),
                value: None,
            }
        );

        let empty = return_expr(".unit{}");
        assert_eq!(
            empty.node,
            Expr::UnionLiteral {
                variant: "unit".to_string(),
                value: None,
            }
        );

        let single = return_expr(".some{42}");
        match &single.node {
            Expr::UnionLiteral {
                variant,
                value: Some(v),
            } => {
                assert_eq!(variant, "some");
                assert_eq!(v.node, Expr::Int("42".to_string()));
            }
            other => panic!("expected union literal, got {other:?}"),
        }
    }

    #[test]
    fn test_union_literal_multi_payload_synthesizes_list() {
        let expr = return_expr(".Pair{1, 2}");
        match &expr.node {
            Expr::UnionLiteral {
                variant,
                value: Some(v),
            } => {
                assert_eq!(variant, "Pair");
                match &v.node {
                    Expr::List(elements) => assert_eq!(elements.len(), 2),
                    other => panic!("expected synthesized list, got {other:?}"),
                }
            }
            other => panic!("expected union literal, got {other:?}"),
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn first_param_type(source: &str) -> Type {
        let program = parse_program(source);
        first_function(&program).params[0].node.ty.node.clone()
    }

    #[test]
    fn test_pointer_type() {
        match first_param_type("fn f(p: *i32) { }") {
            Type::Pointer(target) => assert_eq!(target.node, Type::I32),
            other => panic!("expected pointer type, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_type_arguments_are_flat() {
        match first_param_type("fn f(m: map 'k 'v) { }") {
            Type::Custom(name, args) => {
                assert_eq!(name, "map");
                assert_eq!(args.len(), 2);
                assert_eq!(args[0].node, Type::Generic("k".to_string()));
                assert_eq!(args[1].node, Type::Generic("v".to_string()));
            }
            other => panic!("expected custom type, got {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_type_argument_nests() {
        match first_param_type("fn f(l: list (list i32)) { }") {
            Type::Custom(name, args) => {
                assert_eq!(name, "list");
                assert_eq!(args.len(), 1);
                match &args[0].node {
                    Type::Custom(inner, inner_args) => {
                        assert_eq!(inner, "list");
                        assert_eq!(inner_args[0].node, Type::I32);
                    }
                    other => panic!("expected nested custom type, got {other:?}"),
                }
            }
            other => panic!("expected custom type, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_identifier_argument_takes_no_arguments() {
        // `pair a b` is pair(a, b), not pair(a(b)).
        match first_param_type("fn f(p: pair a b) { }") {
            Type::Custom(name, args) => {
                assert_eq!(name, "pair");
                assert_eq!(args.len(), 2);
                assert_eq!(args[0].node, Type::Custom("a".to_string(), Vec::new()));
                assert_eq!(args[1].node, Type::Custom("b".to_string(), Vec::new()));
            }
            other => panic!("expected custom type, got {other:?}"),
        }
    }

    #[test]
    fn test_anonymous_struct_and_union_types() {
        match first_param_type("fn f(x: struct { a: i32 }) { }") {
            Type::AnonymousStruct(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].node.name, "a");
            }
            other => panic!("expected anonymous struct type, got {other:?}"),
        }
        match first_param_type("fn f(x: union { none some: i32 }) { }") {
            Type::AnonymousUnion(variants) => assert_eq!(variants.len(), 2),
            other => panic!("expected anonymous union type, got {other:?}"),
        }
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    #[test]
    fn test_program_serializes_losslessly() {
        let program = parse_program("fn main() -> i32 { return 40 + 2; }");
        let json = serde_json::to_string(&program).unwrap();
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }
}
