//! Token types for the Sageleaf lexer.
//!
//! Tokens carry their raw source spelling where it matters:
//! - `Int`/`Float` keep the literal text as written (hex/binary/octal
//!   prefixes normalized to lowercase) so later stages can re-emit it.
//! - `String` holds the *decoded* value, escapes already applied.
//! - `CLiteral` holds the verbatim body of a `native { ... }` block.
//!
//! ## Notes
//! - There is exactly one `Eof` token per stream, always last.
//! - `Display` renders the human-readable name used in diagnostics
//!   ("expected `;`, found identifier").

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::SourceSpan;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    // ========== Punctuation ==========
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `_` (pattern wildcard)
    Underscore,
    /// `'` (introduces a generic type name)
    Apostrophe,

    // ========== Operators ==========
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `/`
    Slash,
    /// `*`
    Star,
    /// `%`
    Percent,
    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    GtEq,
    /// `<=`
    LtEq,
    /// `->`
    Arrow,
    /// `&`
    Ampersand,
    /// `..=`
    RangeInclusive,
    /// `..<`
    RangeExclusive,

    // ========== Keywords ==========
    Fn,
    Type,
    Return,
    For,
    While,
    If,
    Elif,
    Else,
    And,
    Or,
    Not,
    In,
    Break,
    Continue,
    Match,
    Case,
    Const,
    Import,
    From,
    As,
    Struct,
    Union,
    True,
    False,

    // ========== Primitive type keywords ==========
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

    // ========== Identifiers and literals ==========
    Ident(String),
    Int(String),
    Float(String),
    String(String),
    /// Verbatim C source captured from a `native { ... }` block.
    CLiteral(String),

    // ========== Special ==========
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Tokens described by category rather than spelling
            Self::Ident(_) => write!(f, "identifier"),
            Self::Int(_) => write!(f, "integer literal"),
            Self::Float(_) => write!(f, "float literal"),
            Self::String(_) => write!(f, "string literal"),
            Self::CLiteral(_) => write!(f, "native block"),
            Self::Eof => write!(f, "end of input"),
            // Fixed-text tokens
            Self::LParen => write!(f, "`(`"),
            Self::RParen => write!(f, "`)`"),
            Self::LBrace => write!(f, "`{{`"),
            Self::RBrace => write!(f, "`}}`"),
            Self::LBracket => write!(f, "`[`"),
            Self::RBracket => write!(f, "`]`"),
            Self::Semicolon => write!(f, "`;`"),
            Self::Comma => write!(f, "`,`"),
            Self::Dot => write!(f, "`.`"),
            Self::Colon => write!(f, "`:`"),
            Self::Underscore => write!(f, "`_`"),
            Self::Apostrophe => write!(f, "`'`"),
            Self::Plus => write!(f, "`+`"),
            Self::Minus => write!(f, "`-`"),
            Self::Slash => write!(f, "`/`"),
            Self::Star => write!(f, "`*`"),
            Self::Percent => write!(f, "`%`"),
            Self::Assign => write!(f, "`=`"),
            Self::EqEq => write!(f, "`==`"),
            Self::NotEq => write!(f, "`!=`"),
            Self::Gt => write!(f, "`>`"),
            Self::Lt => write!(f, "`<`"),
            Self::GtEq => write!(f, "`>=`"),
            Self::LtEq => write!(f, "`<=`"),
            Self::Arrow => write!(f, "`->`"),
            Self::Ampersand => write!(f, "`&`"),
            Self::RangeInclusive => write!(f, "`..=`"),
            Self::RangeExclusive => write!(f, "`..<`"),
            Self::Fn => write!(f, "`fn`"),
            Self::Type => write!(f, "`type`"),
            Self::Return => write!(f, "`return`"),
            Self::For => write!(f, "`for`"),
            Self::While => write!(f, "`while`"),
            Self::If => write!(f, "`if`"),
            Self::Elif => write!(f, "`elif`"),
            Self::Else => write!(f, "`else`"),
            Self::And => write!(f, "`and`"),
            Self::Or => write!(f, "`or`"),
            Self::Not => write!(f, "`not`"),
            Self::In => write!(f, "`in`"),
            Self::Break => write!(f, "`break`"),
            Self::Continue => write!(f, "`continue`"),
            Self::Match => write!(f, "`match`"),
            Self::Case => write!(f, "`case`"),
            Self::Const => write!(f, "`const`"),
            Self::Import => write!(f, "`import`"),
            Self::From => write!(f, "`from`"),
            Self::As => write!(f, "`as`"),
            Self::Struct => write!(f, "`struct`"),
            Self::Union => write!(f, "`union`"),
            Self::True => write!(f, "`true`"),
            Self::False => write!(f, "`false`"),
            Self::I8 => write!(f, "`i8`"),
            Self::I16 => write!(f, "`i16`"),
            Self::I32 => write!(f, "`i32`"),
            Self::I64 => write!(f, "`i64`"),
            Self::U8 => write!(f, "`u8`"),
            Self::U16 => write!(f, "`u16`"),
            Self::U32 => write!(f, "`u32`"),
            Self::U64 => write!(f, "`u64`"),
            Self::Usize => write!(f, "`usize`"),
            Self::F32 => write!(f, "`f32`"),
            Self::F64 => write!(f, "`f64`"),
            Self::Bool => write!(f, "`bool`"),
            Self::Str => write!(f, "`str`"),
        }
    }
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword kind, if reserved.
///
/// `native` is deliberately absent: the lexer consumes it as the head of a
/// foreign-code block and it never reaches keyword lookup.
pub fn keyword_kind(name: &str) -> Option<TokenKind> {
    let kind = match name {
        "fn" => TokenKind::Fn,
        "type" => TokenKind::Type,
        "return" => TokenKind::Return,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "if" => TokenKind::If,
        "elif" => TokenKind::Elif,
        "else" => TokenKind::Else,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "in" => TokenKind::In,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "match" => TokenKind::Match,
        "case" => TokenKind::Case,
        "const" => TokenKind::Const,
        "import" => TokenKind::Import,
        "from" => TokenKind::From,
        "as" => TokenKind::As,
        "struct" => TokenKind::Struct,
        "union" => TokenKind::Union,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "i8" => TokenKind::I8,
        "i16" => TokenKind::I16,
        "i32" => TokenKind::I32,
        "i64" => TokenKind::I64,
        "u8" => TokenKind::U8,
        "u16" => TokenKind::U16,
        "u32" => TokenKind::U32,
        "u64" => TokenKind::U64,
        "usize" => TokenKind::Usize,
        "f32" => TokenKind::F32,
        "f64" => TokenKind::F64,
        "bool" => TokenKind::Bool,
        "str" => TokenKind::Str,
        _ => return None,
    };
    Some(kind)
}
