/// Token-stream helpers.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// peeking/consuming tokens (`peek`, `peek_next`, `advance`), matching and
/// expecting token kinds, and span bookkeeping for just-consumed tokens.
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        if self.pos + 1 < self.tokens.len() {
            &self.tokens[self.pos + 1]
        } else {
            &self.tokens[self.tokens.len() - 1]
        }
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos - 1]
    }

    /// Return `true` if the current token matches `kind`.
    ///
    /// Data-bearing kinds (identifiers, literals, native blocks) compare by
    /// variant only; the payload value is ignored.
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(kind) == std::mem::discriminant(&self.peek().kind)
    }

    /// If the current token matches `kind`, consume it and return `true`.
    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it matches `kind`, or fail with an
    /// "expected X, found Y" error at the current token.
    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(ParseError::expected(kind.to_string(), self.peek()))
        }
    }

    /// Span of the current token.
    fn current_span(&self) -> SourceSpan {
        self.peek().span.clone()
    }

    /// Span of the most recently consumed token.
    ///
    /// Only called right after consuming a token, so `pos` is always past the
    /// start of the stream here.
    fn prev_span(&self) -> SourceSpan {
        self.tokens[self.pos - 1].span.clone()
    }
}
