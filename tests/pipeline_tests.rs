//! Integration tests for the Sageleaf compiler pipeline
//!
//! Exercises the public library surface end to end: lex, parse, type check,
//! and C generation, plus the JSON serialization the `check --tokens/--ast`
//! commands expose.

use sageleaf::ast::Program;
use sageleaf::lexer::{self, Token, TokenKind};
use sageleaf::{codegen, parser, typecheck};

/// Run the full pipeline on `source`, returning the generated C.
fn compile(source: &str) -> Result<String, String> {
    let tokens = lexer::lex(source, "test.sl").map_err(|e| e.to_string())?;
    let program = parser::parse(&tokens).map_err(|e| e.to_string())?;
    typecheck::check(&program).map_err(|e| e.to_string())?;
    codegen::generate(&program).map_err(|e| e.to_string())
}

#[test]
fn test_full_pipeline_produces_runnable_c() {
    let source = "\
fn double(x: i32) -> i32 {
    return x + x;
}

fn main() -> i32 {
    print_i32(double(21));
    return 0;
}
";
    let c_code = compile(source).unwrap();

    // Runtime, then library, then the user program.
    let runtime = c_code.find("// --- Sageleaf Runtime ---").unwrap();
    let library = c_code.find("// --- Sageleaf Library ---").unwrap();
    let user = c_code.find("// --- Sageleaf User Program ---").unwrap();
    assert!(runtime < library && library < user);

    assert!(c_code.contains("int main(void)"));
    assert!(c_code.contains("int32_t sl_double(int32_t sl_x);"));
    assert!(c_code.contains("return (sl_x + sl_x);"));
    assert!(c_code.contains("sl_print_i32(sl_double(21));"));
}

#[test]
fn test_native_blocks_pass_through() {
    let source = "\
fn greet() {
    native {
        printf(\"hello\\n\");
    }
}

fn main() -> i32 {
    greet();
    return 0;
}
";
    let c_code = compile(source).unwrap();
    assert!(c_code.contains("printf(\"hello\\n\");"));
}

#[test]
fn test_syntax_error_stops_pipeline() {
    let err = compile("fn f( {").unwrap_err();
    assert!(err.contains("expected identifier"), "got: {err}");
}

#[test]
fn test_type_error_stops_pipeline() {
    let err = compile("fn f() { return 1; }").unwrap_err();
    assert!(err.contains("Return statement must not have a value"), "got: {err}");
}

#[test]
fn test_codegen_error_surfaces() {
    // The thin checker passes `if` through; the C backend rejects it.
    let err = compile("fn f() { if true { } }").unwrap_err();
    assert!(err.contains("Unknown statement if statement"), "got: {err}");
}

mod lexer_behavior {
    use super::*;

    #[test]
    fn test_hex_prefix_without_digits_falls_back() {
        let tokens = lexer::lex("0xg", "test.sl").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Int("0".to_string()));
        assert_eq!(tokens[1].kind, TokenKind::Ident("xg".to_string()));
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_tokenization_is_idempotent() {
        let source = "fn main() -> i32 { return 0x2a; }";
        let first = lexer::lex(source, "test.sl").unwrap();
        let second = lexer::lex(source, "test.sl").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_consecutive_spans_are_ordered() {
        let source = "fn main() {\n    return;\n}";
        let tokens = lexer::lex(source, "test.sl").unwrap();
        for pair in tokens.windows(2) {
            let (a, b) = (&pair[0].span, &pair[1].span);
            assert!(
                (a.end_line, a.end_col) <= (b.start_line, b.start_col),
                "overlapping spans: {a} and {b}"
            );
        }
    }
}

mod json_surface {
    use super::*;

    #[test]
    fn test_tokens_round_trip_through_json() {
        let tokens = lexer::lex("x: i32 = 5;", "test.sl").unwrap();
        let json = serde_json::to_string(&tokens).unwrap();
        let back: Vec<Token> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tokens);
    }

    #[test]
    fn test_program_round_trips_through_json() {
        let program =
            parser::parse_source("fn main() -> i32 { return 40 + 2; }", "test.sl").unwrap();
        let json = serde_json::to_string_pretty(&program).unwrap();
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }
}
