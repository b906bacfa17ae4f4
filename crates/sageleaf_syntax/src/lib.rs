//! Shared syntax frontend for the Sageleaf language: lexer, parser, AST, diagnostics.
//!
//! This crate is dependency-light and intended for reuse across the compiler, the
//! `sage` CLI, and future interactive tooling.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": it does not do type checking or C
//!   code generation.
//! - Every node carries a [`ast::SourceSpan`]: 1-based line/column coordinates with
//!   a half-open end, suitable for caret rendering and editor integration.
//! - The whole frontend is fail-fast: the first lex or parse error aborts with a
//!   structured error, there is no recovery or resynchronization.
//!
//! ## Examples
//! ```rust
//! use sageleaf_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("fn main() { return; }", "main.sl").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
