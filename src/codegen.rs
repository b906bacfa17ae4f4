//! C code generator for the Sageleaf programming language
//!
//! Emits a single C99 translation unit from a checked [`Program`]. A full
//! build concatenates three sections:
//!
//! 1. The runtime core (`runtime/core.c`): standard includes and the `main`
//!    shim that calls `sl_main`.
//! 2. The Sageleaf standard library (`runtime/lib.sl`), compiled here in
//!    library mode so its functions precede user code.
//! 3. The user program: forward declarations for every function except
//!    `main`, then the definitions.
//!
//! All Sageleaf names are prefixed `sl_` in the generated C so they cannot
//! collide with C library identifiers. Constructs outside the supported
//! subset (literals, identifiers, calls, unary/binary operators, `return`,
//! native blocks) are reported as [`CodegenError`]s rather than silently
//! mistranslated.

use thiserror::Error;

use sageleaf_syntax::ast::{
    BinaryOp, Expr, FunctionDef, NativeBlock, Program, SourceSpan, Spanned, Statement,
    TopLevelStmt, Type, UnaryOp,
};
use sageleaf_syntax::parser;

use crate::typecheck;

/// C runtime core, embedded at compile time.
const RUNTIME_CORE: &str = include_str!("../runtime/core.c");
/// Sageleaf standard library source, embedded at compile time.
const RUNTIME_LIB: &str = include_str!("../runtime/lib.sl");

/// A construct the C backend cannot translate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {span}")]
pub struct CodegenError {
    pub message: String,
    pub span: SourceSpan,
}

impl CodegenError {
    fn new(message: impl Into<String>, span: &SourceSpan) -> Self {
        Self {
            message: message.into(),
            span: span.clone(),
        }
    }
}

/// Generate a complete C translation unit: runtime, library, user program.
#[tracing::instrument(skip_all)]
pub fn generate(program: &Program) -> Result<String, CodegenError> {
    let mut generator = Generator::new(false);
    generator.program(program)?;
    Ok(generator.finish())
}

/// Generate C for `program` alone, without embedding the runtime.
///
/// Used for the standard library itself, whose output is concatenated ahead
/// of user programs by [`generate`].
pub fn generate_library(program: &Program) -> Result<String, CodegenError> {
    let mut generator = Generator::new(true);
    generator.program(program)?;
    Ok(generator.finish())
}

// ============================================================================
// Emitter
// ============================================================================

struct Generator {
    out: String,
    indent: usize,
    lib: bool,
}

impl Generator {
    fn new(lib: bool) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            lib,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    /// Write a line at the current indentation.
    fn line(&mut self, s: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn program(&mut self, program: &Program) -> Result<(), CodegenError> {
        if !self.lib {
            self.line("// --- Sageleaf Runtime ---");
            self.line(RUNTIME_CORE.trim());
            self.blank();

            self.line("// --- Sageleaf Library ---");
            let library = compile_runtime_library()?;
            self.out.push_str(&library);

            self.line("// --- Sageleaf User Program ---");
        }

        for f in functions(program) {
            if f.name.node != "main" {
                let signature = function_signature(f)?;
                self.line(&format!("{signature};"));
                self.blank();
            }
        }

        for f in functions(program) {
            self.function_definition(f)?;
            self.blank();
        }
        Ok(())
    }

    fn function_definition(&mut self, f: &FunctionDef) -> Result<(), CodegenError> {
        let signature = function_signature(f)?;
        self.line(&format!("{signature} {{"));
        self.indent += 1;
        for stmt in &f.body {
            self.statement(stmt)?;
        }
        self.indent -= 1;
        self.line("}");
        Ok(())
    }

    fn statement(&mut self, stmt: &Spanned<Statement>) -> Result<(), CodegenError> {
        match &stmt.node {
            Statement::Native(block) => {
                self.native(block);
                Ok(())
            }
            Statement::Return(value) => {
                match value {
                    None => self.line("return;"),
                    Some(value) => {
                        let code = expression(value)?;
                        self.line(&format!("return {code};"));
                    }
                }
                Ok(())
            }
            Statement::Expr(e) => {
                let code = expression(e)?;
                self.line(&format!("{code};"));
                Ok(())
            }
            other => Err(CodegenError::new(
                format!("Unknown statement {}", describe_statement(other)),
                &stmt.span,
            )),
        }
    }

    /// Emit a native block's content, re-indented to the current level.
    ///
    /// Leading and trailing blank lines are dropped, then every line is
    /// dedented by the minimal indentation of the non-blank lines so the C
    /// source keeps its internal shape regardless of how the block was
    /// indented in Sageleaf.
    fn native(&mut self, block: &NativeBlock) {
        if block.content.trim().is_empty() {
            return;
        }

        let mut lines: Vec<&str> = block.content.lines().collect();
        while lines.first().is_some_and(|l| l.trim().is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        let min_indent = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);

        for raw in lines {
            if raw.trim().is_empty() {
                self.blank();
            } else {
                let dedented = raw.get(min_indent..).unwrap_or_else(|| raw.trim_start());
                self.line(dedented);
            }
        }
    }
}

// ============================================================================
// Translation helpers
// ============================================================================

fn functions(program: &Program) -> impl Iterator<Item = &FunctionDef> {
    program.statements.iter().filter_map(|stmt| match &stmt.node {
        TopLevelStmt::Function(f) => Some(f),
        _ => None,
    })
}

fn function_signature(f: &FunctionDef) -> Result<String, CodegenError> {
    let mut params = Vec::new();
    for param in &f.params {
        params.push(format!(
            "{} sl_{}",
            c_type(Some(&param.node.ty))?,
            param.node.name
        ));
    }
    Ok(format!(
        "{} sl_{}({})",
        c_type(f.return_type.as_ref())?,
        f.name.node,
        params.join(", ")
    ))
}

/// Map a Sageleaf type to its C spelling; `None` is a missing return type.
fn c_type(ty: Option<&Spanned<Type>>) -> Result<&'static str, CodegenError> {
    let Some(ty) = ty else {
        return Ok("void");
    };
    match &ty.node {
        Type::I8 => Ok("int8_t"),
        Type::I16 => Ok("int16_t"),
        Type::I32 => Ok("int32_t"),
        Type::I64 => Ok("int64_t"),
        Type::U8 => Ok("uint8_t"),
        Type::U16 => Ok("uint16_t"),
        Type::U32 => Ok("uint32_t"),
        Type::U64 => Ok("uint64_t"),
        Type::Usize => Ok("size_t"),
        Type::F32 => Ok("float"),
        Type::F64 => Ok("double"),
        Type::Bool => Ok("bool"),
        other => Err(CodegenError::new(format!("Unknown type {other}"), &ty.span)),
    }
}

fn expression(expr: &Spanned<Expr>) -> Result<String, CodegenError> {
    match &expr.node {
        Expr::Int(value) | Expr::Float(value) => Ok(value.clone()),
        Expr::Bool(true) => Ok("true".to_string()),
        Expr::Bool(false) => Ok("false".to_string()),
        Expr::Ident(name) => Ok(format!("sl_{name}")),
        Expr::Call(name, args) => {
            let mut rendered = Vec::new();
            for arg in args {
                rendered.push(expression(arg)?);
            }
            Ok(format!("sl_{}({})", name, rendered.join(", ")))
        }
        Expr::Binary(lhs, op, rhs) => Ok(format!(
            "({} {} {})",
            expression(lhs)?,
            c_binary_op(*op),
            expression(rhs)?
        )),
        Expr::Unary(op, operand) => {
            Ok(format!("({}{})", c_unary_op(*op), expression(operand)?))
        }
        other => Err(CodegenError::new(
            format!("Unsupported expression {}", describe_expr(other)),
            &expr.span,
        )),
    }
}

fn c_binary_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Or => "||",
        BinaryOp::And => "&&",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::LtEq => "<=",
        BinaryOp::GtEq => ">=",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
    }
}

fn c_unary_op(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Not => "!",
        UnaryOp::Neg => "-",
        UnaryOp::Deref => "*",
        UnaryOp::AddrOf => "&",
    }
}

fn describe_statement(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Return(_) => "return statement",
        Statement::Var(_) => "variable declaration",
        Statement::Const(_) => "constant declaration",
        Statement::Assign(_) => "assignment",
        Statement::Expr(_) => "expression statement",
        Statement::If(_) => "if statement",
        Statement::While(_) => "while loop",
        Statement::For(_) => "for loop",
        Statement::Break => "break statement",
        Statement::Continue => "continue statement",
        Statement::Match(_) => "match statement",
        Statement::Native(_) => "native block",
    }
}

fn describe_expr(expr: &Expr) -> &'static str {
    match expr {
        Expr::Int(_) => "integer literal",
        Expr::Float(_) => "float literal",
        Expr::Str(_) => "string literal",
        Expr::Bool(_) => "bool literal",
        Expr::Ident(_) => "identifier",
        Expr::Binary(..) => "binary operator",
        Expr::Unary(..) => "unary operator",
        Expr::Call(..) => "function call",
        Expr::MethodCall(..) => "method call",
        Expr::Field(..) => "field access",
        Expr::Index(..) => "index expression",
        Expr::List(_) => "list literal",
        Expr::Map(_) => "map literal",
        Expr::Set(_) => "set literal",
        Expr::StructLiteral(..) => "struct literal",
        Expr::UnionLiteral { .. } => "union literal",
        Expr::Range { .. } => "range expression",
    }
}

/// Lex, parse, check, and generate the embedded standard library.
///
/// The library ships inside this binary, so failures here are defects in the
/// shipped `runtime/lib.sl`, not in user input; the error still points at the
/// offending library span.
fn compile_runtime_library() -> Result<String, CodegenError> {
    let program = parser::parse_source(RUNTIME_LIB.trim(), "runtime/lib.sl")
        .map_err(|e| CodegenError::new("runtime library failed to parse", e.span()))?;
    typecheck::check(&program).map_err(|e| CodegenError {
        message: format!("runtime library: {}", e.message),
        span: e.span,
    })?;
    generate_library(&program)
}
