//! Parser for the Sageleaf programming language
//!
//! Converts a token stream into an AST by recursive descent, with binary
//! operators handled by a precedence-ordered cascade of parse functions.
//! The parser is fail-fast: the first grammar violation aborts the parse
//! and is returned as a [`ParseError`] carrying the offending span.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use sageleaf_syntax::{lexer, parser};
//!
//! let source = "fn main() -> i32 { return 0; }";
//! let tokens = lexer::lex(source, "main.sl").unwrap();
//! let ast = parser::parse(&tokens).unwrap();
//! assert_eq!(ast.statements.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::{ParseError, SyntaxContext, SyntaxError};
use crate::lexer::{Token, TokenKind};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/patterns.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
