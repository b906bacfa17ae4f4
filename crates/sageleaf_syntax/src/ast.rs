//! Abstract Syntax Tree definitions for Sageleaf
//!
//! This module defines the source span model and all AST node types for the
//! Sageleaf language. Nodes are plain data: the parser builds them once and
//! later stages (type checker, code generator) read them without mutating
//! structural fields.
//!
//! ## Notes
//! - Every node carries a [`SourceSpan`] via the [`Spanned`] wrapper.
//! - Int/float literals keep their original spelling; interpreting them needs
//!   type context the front end does not have.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ============================================================================
// Source spans
// ============================================================================

/// Source location range: 1-based line/column, with the end pointing at the
/// column just past the last character.
///
/// Spans are immutable and cheap to clone (the file name is shared). Columns
/// count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub file: Arc<str>,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceSpan {
    pub fn new(file: Arc<str>, start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            file,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(&self, other: &SourceSpan) -> SourceSpan {
        let (start_line, start_col) = std::cmp::min(
            (self.start_line, self.start_col),
            (other.start_line, other.start_col),
        );
        let (end_line, end_col) = std::cmp::max((self.end_line, self.end_col), (other.end_line, other.end_col));
        SourceSpan {
            file: self.file.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Byte range of this span within `source`.
    ///
    /// Used to attach spans to renderers that index by byte offset (e.g.
    /// `miette` labels). Positions past the end of `source` clamp to its
    /// length.
    pub fn byte_range(&self, source: &str) -> Range<usize> {
        let start = position_to_offset(source, self.start_line, self.start_col);
        let end = position_to_offset(source, self.end_line, self.end_col);
        start..end.max(start)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.start_line, self.start_col)
    }
}

/// Byte offset of a 1-based (line, column) position, counting columns in
/// characters the same way the lexer does.
fn position_to_offset(source: &str, line: u32, col: u32) -> usize {
    let mut cur_line = 1u32;
    let mut cur_col = 1u32;
    for (offset, ch) in source.char_indices() {
        if cur_line == line && cur_col == col {
            return offset;
        }
        if ch == '\n' {
            cur_line += 1;
            cur_col = 1;
        } else {
            cur_col += 1;
        }
    }
    source.len()
}

/// A node with source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: SourceSpan,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: SourceSpan) -> Self {
        Self { node, span }
    }
}

/// Identifier (plain string; Sageleaf identifiers are ASCII)
pub type Ident = String;

// ============================================================================
// Program and top-level statements
// ============================================================================

/// A program is a sequence of top-level statements covering one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Spanned<TopLevelStmt>>,
    pub span: SourceSpan,
}

/// Statements allowed at module level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopLevelStmt {
    Function(FunctionDef),
    Native(NativeBlock),
    Struct(StructDef),
    Union(UnionDef),
    Import(ImportStmt),
    Const(ConstDecl),
    Var(VarDecl),
}

/// `fn name ['a ...] ( params ) [-> type] { body }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: Spanned<Ident>,
    /// Generic parameter names: `fn pair't'u(...)`
    pub type_params: Vec<Ident>,
    pub params: Vec<Spanned<Param>>,
    pub return_type: Option<Spanned<Type>>,
    pub body: Vec<Spanned<Statement>>,
}

/// `name: type` inside a parameter list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: Ident,
    pub ty: Spanned<Type>,
}

/// `struct Name ['a ...] { fields }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub fields: Vec<Spanned<StructField>>,
}

/// `name: type` inside a struct body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: Ident,
    pub ty: Spanned<Type>,
}

/// `union Name ['a ...] { variants }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionDef {
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub variants: Vec<Spanned<UnionVariant>>,
}

/// `name` or `name: type` inside a union body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionVariant {
    pub name: Ident,
    pub payload: Option<Spanned<Type>>,
}

/// One of `import pkg;`, `import pkg as alias;`, `import a, b from pkg;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStmt {
    pub package: Ident,
    /// Items pulled out of the package (`from` form); `None` for whole-package imports.
    pub items: Option<Vec<Ident>>,
    pub alias: Option<Ident>,
}

/// Verbatim target-language code: `native { ... }`, braces balanced, content
/// uninterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeBlock {
    pub content: String,
}

/// `const name [: type] = value ;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstDecl {
    pub name: Ident,
    pub ty: Option<Spanned<Type>>,
    pub value: Spanned<Expr>,
}

/// `name [: type] = value ;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: Option<Spanned<Type>>,
    pub value: Spanned<Expr>,
}

// ============================================================================
// Types
// ============================================================================

/// Type expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    // Primitive types, one node per keyword
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    Str,
    /// Pointer: `*T`
    Pointer(Box<Spanned<Type>>),
    /// Generic parameter reference: `'t`
    Generic(Ident),
    /// Nominal type with optional type arguments: `point`, `list i32`, `map str (list i32)`
    Custom(Ident, Vec<Spanned<Type>>),
    /// Inline `union { ... }` type
    AnonymousUnion(Vec<Spanned<UnionVariant>>),
    /// Inline `struct { ... }` type
    AnonymousStruct(Vec<Spanned<StructField>>),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::I8 => write!(f, "i8"),
            Type::I16 => write!(f, "i16"),
            Type::I32 => write!(f, "i32"),
            Type::I64 => write!(f, "i64"),
            Type::U8 => write!(f, "u8"),
            Type::U16 => write!(f, "u16"),
            Type::U32 => write!(f, "u32"),
            Type::U64 => write!(f, "u64"),
            Type::Usize => write!(f, "usize"),
            Type::F32 => write!(f, "f32"),
            Type::F64 => write!(f, "f64"),
            Type::Bool => write!(f, "bool"),
            Type::Str => write!(f, "str"),
            Type::Pointer(target) => write!(f, "*{}", target.node),
            Type::Generic(name) => write!(f, "'{}", name),
            Type::Custom(name, args) => {
                write!(f, "{}", name)?;
                for arg in args {
                    write!(f, " {}", arg.node)?;
                }
                Ok(())
            }
            Type::AnonymousUnion(_) => write!(f, "union {{...}}"),
            Type::AnonymousStruct(_) => write!(f, "struct {{...}}"),
        }
    }
}

impl Type {
    /// `true` for the numeric primitives (integer and float widths).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::I8
                | Type::I16
                | Type::I32
                | Type::I64
                | Type::U8
                | Type::U16
                | Type::U32
                | Type::U64
                | Type::Usize
                | Type::F32
                | Type::F64
        )
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Statements allowed inside function bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `return [expr];`
    Return(Option<Spanned<Expr>>),
    /// `x [: type] = value;`
    Var(VarDecl),
    /// `const x [: type] = value;`
    Const(ConstDecl),
    /// Assignment to an lvalue expression: `x = v;`, `a.b[0] = v;`
    Assign(AssignStmt),
    /// Expression statement: `f();`
    Expr(Spanned<Expr>),
    /// `if cond { } [elif cond { }]* [else { }]`
    If(IfStmt),
    /// `while cond { }`
    While(WhileStmt),
    /// `for x [, y]* in expr { }`
    For(ForStmt),
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    /// `match expr { case pattern [if guard]: body }`
    Match(MatchStmt),
    /// Verbatim C block standing as a statement
    Native(NativeBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStmt {
    pub target: Spanned<Expr>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Spanned<Expr>,
    pub then_body: Vec<Spanned<Statement>>,
    pub elif_branches: Vec<Spanned<ElifBranch>>,
    pub else_body: Option<Vec<Spanned<Statement>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElifBranch {
    pub condition: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub condition: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
}

/// `for` targets are plain identifiers; type annotations on them are accepted
/// by the grammar but not recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub target: Vec<Spanned<Ident>>,
    pub iterable: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStmt {
    pub value: Spanned<Expr>,
    pub cases: Vec<Spanned<MatchCase>>,
}

/// `case pattern [if guard] : body` — the body is either a braced statement
/// list or a single statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCase {
    pub pattern: Spanned<Pattern>,
    pub guard: Option<Spanned<Expr>>,
    pub body: Vec<Spanned<Statement>>,
}

// ============================================================================
// Expressions
// ============================================================================

/// Expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal, original spelling kept: `42`, `0xff`
    Int(String),
    /// Float literal, original spelling kept: `3.14`, `1e-9`
    Float(String),
    /// String literal, escapes already decoded
    Str(String),
    /// `true` / `false`
    Bool(bool),
    /// Identifier
    Ident(Ident),
    /// Binary operation: `a + b`
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    /// Unary operation: `not x`, `-x`, `*p`, `&x`
    Unary(UnaryOp, Box<Spanned<Expr>>),
    /// Call on a bare function name: `f(a, b)`
    Call(Ident, Vec<Spanned<Expr>>),
    /// Method call: `x.method(args)`
    MethodCall(Box<Spanned<Expr>>, Ident, Vec<Spanned<Expr>>),
    /// Field access: `x.field`
    Field(Box<Spanned<Expr>>, Ident),
    /// Index: `x[i]`
    Index(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    /// List literal: `[a, b, c]`
    List(Vec<Spanned<Expr>>),
    /// Map literal: `{k: v, ...}`; `{}` is an empty map
    Map(Vec<Spanned<MapPair>>),
    /// Set literal: `{a, b, c}`
    Set(Vec<Spanned<Expr>>),
    /// Struct literal: `Point{x: 1}` — no surface production today, built by
    /// later stages
    StructLiteral(StructLiteral),
    /// Union literal: `.Some{x}`; a multi-payload body synthesizes a list value
    UnionLiteral {
        variant: Ident,
        value: Option<Box<Spanned<Expr>>>,
    },
    /// Range: `a..=b` (inclusive) or `a..<b` (exclusive)
    Range {
        start: Box<Spanned<Expr>>,
        end: Box<Spanned<Expr>>,
        inclusive: bool,
    },
}

/// One `key: value` entry of a map literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPair {
    pub key: Spanned<Expr>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructLiteral {
    pub name: Ident,
    pub fields: Vec<Spanned<StructLiteralField>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructLiteralField {
    /// `None` for positional fields.
    pub name: Option<Ident>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Or => write!(f, "or"),
            BinaryOp::And => write!(f, "and"),
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::NotEq => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::LtEq => write!(f, "<="),
            BinaryOp::GtEq => write!(f, ">="),
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Mod => write!(f, "%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `not x`
    Not,
    /// `-x`
    Neg,
    /// `*p` (pointer dereference)
    Deref,
    /// `&x` (address-of)
    AddrOf,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "not"),
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Deref => write!(f, "*"),
            UnaryOp::AddrOf => write!(f, "&"),
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// Patterns in `match` cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// `_`
    Wildcard,
    /// Binding: `x`
    Identifier(Ident),
    /// Literal: `42`, `"hello"`, `true`
    Literal(Box<Spanned<Expr>>),
    /// Struct pattern; also synthesized (anonymous, positional) from
    /// multi-payload union patterns
    Struct(StructPattern),
    /// Union pattern: `.Variant` or `.Variant{p}`
    Union {
        variant: Ident,
        pattern: Option<Box<Spanned<Pattern>>>,
    },
    /// List pattern: `[a, b, ..rest, z]`
    List(ListPattern),
    /// Range pattern — no surface production today
    Range {
        start: Box<Spanned<Expr>>,
        end: Box<Spanned<Expr>>,
        inclusive: bool,
    },
}

/// `Name{...}` pattern; `name` is empty for the anonymous positional form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructPattern {
    pub name: Ident,
    pub fields: Vec<Spanned<StructPatternField>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructPatternField {
    /// `None` for positional fields.
    pub name: Option<Ident>,
    pub pattern: Spanned<Pattern>,
}

/// Prefix/rest/suffix split of a list pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPattern {
    pub prefix_patterns: Vec<Spanned<Pattern>>,
    /// Name bound to the variable-length middle, if a `..name` binder is present.
    pub rest_name: Option<Ident>,
    pub suffix_patterns: Vec<Spanned<Pattern>>,
}

// ============================================================================
// TESTS
// ============================================================================
