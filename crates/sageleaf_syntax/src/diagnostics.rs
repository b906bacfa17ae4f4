//! Syntax errors and source-snippet rendering.
//!
//! Every error from the front end is structured: a closed kind enum plus the
//! [`SourceSpan`] it points at. Rendering is split in two:
//! - [`render_snippet`] is a pure span -> string caret renderer with no
//!   filesystem or terminal knowledge, usable from tests and tooling.
//! - [`SourceDiagnostic`] adapts an error to `miette` for fancy terminal
//!   output; constructing it is the caller's choice, the core never prints.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::SourceSpan;
use crate::lexer::Token;

// ============================================================================
// LEX ERRORS
// ============================================================================

/// Reason a character sequence failed to lex.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated native block")]
    UnterminatedNativeBlock,
    #[error("expected `{{` after `native`")]
    MissingNativeBrace,
}

/// A lexing failure at a specific source location.
///
/// Spans point at the most useful anchor: the offending character, the
/// opening quote of an unterminated string, the opening brace of an
/// unterminated native block, or the `native` keyword itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: SourceSpan,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }
}

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// What the parser was trying to begin when it hit an unusable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxContext {
    TopLevel,
    Expression,
    Pattern,
    Type,
}

impl fmt::Display for SyntaxContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopLevel => write!(f, "a top-level declaration"),
            Self::Expression => write!(f, "an expression"),
            Self::Pattern => write!(f, "a pattern"),
            Self::Type => write!(f, "a type"),
        }
    }
}

/// Reason a token sequence failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The grammar required one specific token and saw another.
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },
    /// A token that cannot begin the construct being parsed.
    #[error("unexpected token {found}, expected {context}")]
    UnexpectedToken { found: String, context: SyntaxContext },
    /// The token stream ran out mid-construct.
    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// A parsing failure at a specific source location.
///
/// The parser is fail-fast: the first error aborts the parse, so one of
/// these describes everything the caller gets to know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: SourceSpan,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    /// `expect`-style error: a named requirement against the token found.
    pub(crate) fn expected(expected: impl Into<String>, found: &Token) -> Self {
        Self {
            kind: ParseErrorKind::Expected {
                expected: expected.into(),
                found: found.kind.to_string(),
            },
            span: found.span.clone(),
        }
    }

    /// A token no production in `context` can start with.
    pub(crate) fn unexpected(context: SyntaxContext, found: &Token) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken {
                found: found.kind.to_string(),
                context,
            },
            span: found.span.clone(),
        }
    }

    /// Input ended where `context` still needed tokens.
    pub(crate) fn eof(at: &Token) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedEof,
            span: at.span.clone(),
        }
    }
}

// ============================================================================
// UNIFIED SYNTAX ERROR
// ============================================================================

/// Any failure producing an AST from source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    /// The source location this error points at.
    pub fn span(&self) -> &SourceSpan {
        match self {
            Self::Lex(e) => &e.span,
            Self::Parse(e) => &e.span,
        }
    }
}

// ============================================================================
// SNIPPET RENDERING
// ============================================================================

/// Render a caret-annotated source snippet for `span`.
///
/// Layout: a `file line:col` header, the start line with up to one line of
/// context on each side in a right-aligned numbered gutter, and a caret line
/// underlining the span's columns on its start line. Whitespace inside the
/// span is underlined as blanks so the carets sit under visible characters.
pub fn render_snippet(span: &SourceSpan, source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let mut out = format!("{} {}:{}\n", span.file, span.start_line, span.start_col);

    let first = (span.start_line as usize)
        .saturating_sub(2)
        .min(lines.len());
    let last = (span.start_line as usize + 1).min(lines.len());

    for (i, line) in lines[first..last].iter().enumerate() {
        let line_num = first + i + 1;
        out.push_str(&format!("{line_num:4} | {line}\n"));

        if line_num == span.start_line as usize {
            let chars: Vec<char> = line.chars().collect();
            let from = span.start_col as usize - 1;
            let to = (span.end_col as usize)
                .saturating_sub(1)
                .min(chars.len());

            let mut caret_line = " ".repeat(6 + span.start_col as usize);
            for &ch in chars.get(from..to.max(from)).unwrap_or(&[]) {
                caret_line.push(if ch == ' ' || ch == '\t' { ' ' } else { '^' });
            }
            out.push_str(caret_line.trim_end());
            out.push('\n');
        }
    }

    out.trim_end().to_string()
}

// ============================================================================
// MIETTE ADAPTER
// ============================================================================

/// A syntax error paired with the source text it points into, ready for
/// fancy terminal rendering via `miette`.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(sageleaf::syntax))]
pub struct SourceDiagnostic {
    /// Human-readable error message
    message: String,
    /// Source code for context
    #[source_code]
    src: miette::NamedSource<String>,
    /// Location of the error
    #[label("{label}")]
    at: miette::SourceSpan,
    /// Label text under the carets (interpolated by the derive macro)
    label: String,
}

impl SourceDiagnostic {
    /// Pair `error` with the source text it was produced from.
    pub fn new(error: &SyntaxError, source: &str) -> Self {
        let span = error.span();
        Self::from_parts(error.to_string(), span, source)
    }

    /// Build a diagnostic from an arbitrary message and span.
    ///
    /// Later pipeline stages (type checking, code generation) report through
    /// this without their error types living in this crate.
    pub fn from_parts(message: String, span: &SourceSpan, source: &str) -> Self {
        let range = span.byte_range(source);
        Self {
            message,
            src: miette::NamedSource::new(span.file.as_ref(), source.to_string()),
            at: (range.start, range.end - range.start).into(),
            label: "here".to_string(),
        }
    }
}
