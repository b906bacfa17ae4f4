//! Lexer for the Sageleaf programming language
//!
//! Handles tokenization including:
//! - Keywords, primitive type names, and identifiers
//! - Integer literals (decimal, `0x`/`0b`/`0o` with backtracking fallback),
//!   floats with optional exponents, and escaped string literals
//! - Operators and punctuation (`..=`, `..<`, `->`, etc.)
//! - `native { ... }` foreign-code blocks captured verbatim as one token
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, keyword table)
//! - `property_tests` - proptest invariants over arbitrary input
//!
//! Scanning is on demand: [`Lexer::next_token`] produces one token per call,
//! [`Lexer::tokenize`] drives it to the final `Eof`. The first error aborts
//! the scan.

pub mod tokens;


pub use tokens::{Token, TokenKind, keyword_kind};

use std::sync::Arc;

use crate::ast::SourceSpan;
use crate::diagnostics::{LexError, LexErrorKind};

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// The cursor is a byte offset into the source plus a 1-based line/column
// pair. Columns count characters, so multi-byte characters inside strings
// and native blocks advance the column by one. Radix-prefixed integer
// scanning is the only place that rewinds; `checkpoint`/`restore` move all
// three cursor fields together so spans stay exact across the rewind.
// ============================================================================

/// Lexer for Sageleaf source code.
///
/// Converts source text into a stream of tokens, handling:
/// - Keywords and identifiers (ASCII; `_` alone is the wildcard token)
/// - Numeric and string literals
/// - Operators and punctuation, longest spelling first
/// - Brace-balanced `native { ... }` blocks
pub struct Lexer<'a> {
    source: &'a str,
    file: Arc<str>,
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    ///
    /// `file` is an opaque identity carried into every span; callers that
    /// want relative paths in diagnostics relativize before handing it in.
    pub fn new(source: &'a str, file: impl Into<Arc<str>>) -> Self {
        Self {
            source,
            file: file.into(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Consume the lexer, producing the whole token stream.
    ///
    /// The stream is non-empty and always ends with exactly one `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Scan the next token, skipping whitespace and `//` comments.
    ///
    /// At end of input this returns (and keeps returning) the `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            let Some(c) = self.current_char() else {
                return Ok(Token::new(TokenKind::Eof, self.span_from(self.line, self.col)));
            };

            let start_line = self.line;
            let start_col = self.col;

            match c {
                ' ' | '\t' | '\r' | '\n' => self.advance(),
                '/' if self.peek_char(1) == Some('/') => self.skip_comment(),
                '"' => return self.string_literal(start_line, start_col),
                c if c.is_ascii_digit() => return Ok(self.number(start_line, start_col)),
                c if c.is_ascii_alphabetic() || c == '_' => {
                    return self.word(start_line, start_col);
                }
                c => return self.operator(c, start_line, start_col),
            }
        }
    }

    // ========================================================================
    // Token scanners
    // ========================================================================

    /// Identifier, keyword, `_` wildcard, or a `native` block head.
    fn word(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        let spelling = self.read_while(|c| c.is_ascii_alphanumeric() || c == '_');

        // `native` is not a keyword: it must head a foreign-code block.
        if spelling == "native" {
            return self.native_block(start_line, start_col);
        }

        let kind = match spelling {
            "_" => TokenKind::Underscore,
            _ => keyword_kind(spelling).unwrap_or_else(|| TokenKind::Ident(spelling.to_string())),
        };
        Ok(Token::new(kind, self.span_from(start_line, start_col)))
    }

    /// Numeric literal. Never fails: a radix prefix without digits rewinds
    /// and the `0` lexes as a plain decimal (so `0xg` is `0` then `xg`).
    fn number(&mut self, start_line: u32, start_col: u32) -> Token {
        if self.current_char() == Some('0') {
            let value = match self.peek_char(1) {
                Some('x' | 'X') => self.radix_prefixed('x', |c| c.is_ascii_hexdigit()),
                Some('b' | 'B') => self.radix_prefixed('b', |c| c == '0' || c == '1'),
                Some('o' | 'O') => self.radix_prefixed('o', |c| ('0'..='7').contains(&c)),
                _ => None,
            };
            if let Some(value) = value {
                return Token::new(TokenKind::Int(value), self.span_from(start_line, start_col));
            }
        }

        let mut value = self.read_while(|c| c.is_ascii_digit()).to_string();
        let mut is_float = false;

        // The fraction needs a digit after the dot, so `1.` stays an int
        // and leaves the dot for the next token.
        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            value.push('.');
            self.advance();
            value.push_str(self.read_while(|c| c.is_ascii_digit()));
            is_float = true;
        }

        // Scientific notation keeps the `e`/`E` as written. A dangling
        // exponent is tolerated here; range-checking digits is not the
        // lexer's job.
        if let Some(e @ ('e' | 'E')) = self.current_char() {
            value.push(e);
            self.advance();
            is_float = true;

            if let Some(sign @ ('+' | '-')) = self.current_char() {
                value.push(sign);
                self.advance();
            }
            value.push_str(self.read_while(|c| c.is_ascii_digit()));
        }

        let kind = if is_float {
            TokenKind::Float(value)
        } else {
            TokenKind::Int(value)
        };
        Token::new(kind, self.span_from(start_line, start_col))
    }

    /// Scan past `0` plus a radix marker; commit only if at least one digit
    /// of that radix follows. The value normalizes the marker to lowercase
    /// but keeps digit case as written.
    fn radix_prefixed(&mut self, marker: char, is_digit: fn(char) -> bool) -> Option<String> {
        let saved = self.checkpoint();
        self.advance();
        self.advance();
        let digits = self.read_while(is_digit);
        if digits.is_empty() {
            self.restore(saved);
            return None;
        }
        Some(format!("0{marker}{digits}"))
    }

    /// Double-quoted string. The token value is the decoded form: `\n`,
    /// `\t`, `\r`, `\\`, `\"`, and `\0` translate, any other escape keeps
    /// the character and drops the backslash. Strings may span lines.
    fn string_literal(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        // Unterminated strings report at the opening quote, not at Eof.
        let open_span = SourceSpan::new(
            self.file.clone(),
            start_line,
            start_col,
            start_line,
            start_col + 1,
        );
        self.advance();

        let mut value = String::new();
        loop {
            match self.current_char() {
                None => {
                    return Err(LexError::new(LexErrorKind::UnterminatedString, open_span));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let Some(escaped) = self.current_char() else {
                        return Err(LexError::new(LexErrorKind::UnterminatedString, open_span));
                    };
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                    self.advance();
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Ok(Token::new(
            TokenKind::String(value),
            self.span_from(start_line, start_col),
        ))
    }

    /// A `native` head: optional spaces, at most one newline, then a
    /// brace-balanced block captured verbatim (outer braces stripped).
    fn native_block(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        let keyword_span = self.span_from(start_line, start_col);

        self.skip_spaces();
        if self.current_char() == Some('\n') {
            self.advance();
            self.skip_spaces();
        }

        if self.current_char() != Some('{') {
            return Err(LexError::new(LexErrorKind::MissingNativeBrace, keyword_span));
        }

        let brace_span = SourceSpan::new(
            self.file.clone(),
            self.line,
            self.col,
            self.line,
            self.col + 1,
        );
        self.advance();

        let mut depth = 1usize;
        let mut content = String::new();
        loop {
            let Some(c) = self.current_char() else {
                return Err(LexError::new(
                    LexErrorKind::UnterminatedNativeBlock,
                    brace_span,
                ));
            };
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        break;
                    }
                }
                _ => {}
            }
            content.push(c);
            self.advance();
        }

        Ok(Token::new(
            TokenKind::CLiteral(content),
            self.span_from(start_line, start_col),
        ))
    }

    /// Operator or punctuation starting at `c`. Multi-character spellings
    /// bind before their prefixes; a bare `..` is two `.` tokens.
    fn operator(&mut self, c: char, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        const MULTI: [(&str, TokenKind); 7] = [
            ("..=", TokenKind::RangeInclusive),
            ("..<", TokenKind::RangeExclusive),
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::NotEq),
            (">=", TokenKind::GtEq),
            ("<=", TokenKind::LtEq),
            ("->", TokenKind::Arrow),
        ];
        for (text, kind) in MULTI {
            if self.source[self.pos..].starts_with(text) {
                for _ in 0..text.len() {
                    self.advance();
                }
                return Ok(Token::new(kind, self.span_from(start_line, start_col)));
            }
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '/' => TokenKind::Slash,
            '*' => TokenKind::Star,
            '%' => TokenKind::Percent,
            '=' => TokenKind::Assign,
            '>' => TokenKind::Gt,
            '<' => TokenKind::Lt,
            '&' => TokenKind::Ampersand,
            '\'' => TokenKind::Apostrophe,
            _ => {
                return Err(LexError::new(
                    LexErrorKind::UnexpectedCharacter(c),
                    SourceSpan::new(
                        self.file.clone(),
                        start_line,
                        start_col,
                        start_line,
                        start_col + 1,
                    ),
                ));
            }
        };
        self.advance();
        Ok(Token::new(kind, self.span_from(start_line, start_col)))
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.current_char() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn checkpoint(&self) -> (usize, u32, u32) {
        (self.pos, self.line, self.col)
    }

    fn restore(&mut self, (pos, line, col): (usize, u32, u32)) {
        self.pos = pos;
        self.line = line;
        self.col = col;
    }

    fn read_while(&mut self, predicate: fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
        &self.source[start..self.pos]
    }

    fn skip_spaces(&mut self) {
        while let Some(' ' | '\t' | '\r') = self.current_char() {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        // Leave the newline for the main loop so line accounting stays in
        // one place.
        while let Some(c) = self.current_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> SourceSpan {
        SourceSpan::new(self.file.clone(), start_line, start_col, self.line, self.col)
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Tokenize `source`, attributing spans to `file`.
#[tracing::instrument(skip_all, fields(file = %file, source_len = source.len()))]
pub fn lex(source: &str, file: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source, file).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================
