/// Parse a token stream into an AST [`Program`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by [`crate::lexer::lex`].
///
/// ## Errors
/// Returns the first [`ParseError`] encountered; the parser does not recover.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse()
}

/// Lex and parse a source file in one step.
///
/// ## Parameters
/// - `source`: Full source text.
/// - `file`: File name recorded in every span, for diagnostics.
///
/// ## Errors
/// Returns the first lexing or parsing failure as a [`SyntaxError`].
pub fn parse_source(source: &str, file: &str) -> Result<Program, SyntaxError> {
    let tokens = crate::lexer::lex(source, file)?;
    Ok(parse(&tokens)?)
}
