#![forbid(unsafe_code)]
//! Sageleaf Programming Language Compiler
//!
//! Sageleaf is a small systems language that compiles to C99. This crate
//! provides the compiler driver on top of the `sageleaf_syntax` frontend:
//! a thin type checking pass, C code generation with an embedded runtime,
//! and the `sage` command line tool.
//!
//! ## Pipeline
//!
//! 1. `lexer` tokenizes a `.sl` source file
//! 2. `parser` builds the spanned AST
//! 3. `typecheck` validates what it understands, and passes the rest through
//! 4. `codegen` emits one C99 translation unit with the runtime embedded
//! 5. `cli` drives the system C compiler and runs the result
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod codegen;
pub mod typecheck;

pub use sageleaf_syntax::ast;
pub use sageleaf_syntax::diagnostics;
pub use sageleaf_syntax::lexer;
pub use sageleaf_syntax::parser;
