/// Miscellaneous parser utilities.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    fn identifier(&mut self) -> Result<Ident, ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::expected("identifier", self.peek())),
        }
    }

    fn identifier_spanned(&mut self) -> Result<Spanned<Ident>, ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                let name = name.clone();
                self.advance();
                Ok(Spanned::new(name, span))
            }
            _ => Err(ParseError::expected("identifier", self.peek())),
        }
    }

    /// A possibly-empty run of `'name` generic parameters, as written after
    /// function, struct, and union names.
    fn generic_params(&mut self) -> Result<Vec<Ident>, ParseError> {
        let mut params = Vec::new();
        while self.match_token(&TokenKind::Apostrophe) {
            params.push(self.identifier()?);
        }
        Ok(params)
    }
}
