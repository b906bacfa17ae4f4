/// Parser state and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoint.
/// The grammar productions live in the sibling chunks (`decl`, `stmts`, `expr`,
/// `patterns`, `types`).
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single large source file.
/// - The parser is single-pass and fail-fast: it does not recover after an
///   error, so no partial AST is ever returned.
/// - Most parsing methods are implemented on `Parser` but split across
///   multiple files.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by [`crate::lexer::lex`]. The stream
    ///   must be non-empty and terminated by a [`TokenKind::Eof`] token; the
    ///   lexer guarantees both.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// Returns the first [`ParseError`] encountered. The program span covers
    /// the first token through end of input.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let start_span = self.current_span();
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.top_level_statement()?);
        }

        let span = start_span.merge(&self.current_span());
        Ok(Program { statements, span })
    }
}
