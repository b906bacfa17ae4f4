/// Pattern parsing for `match` cases.
impl<'a> Parser<'a> {
    // ========================================================================
    // Patterns
    // ========================================================================

    fn pattern(&mut self) -> Result<Spanned<Pattern>, ParseError> {
        match &self.peek().kind {
            TokenKind::Underscore => {
                let token = self.advance().clone();
                Ok(Spanned::new(Pattern::Wildcard, token.span))
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(Pattern::Identifier(name), span))
            }
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::String(_)
            | TokenKind::True
            | TokenKind::False => {
                let expr = self.primary_expression()?;
                let span = expr.span.clone();
                Ok(Spanned::new(Pattern::Literal(Box::new(expr)), span))
            }
            TokenKind::LBracket => self.list_pattern(),
            TokenKind::Dot => self.union_pattern(),
            TokenKind::Eof => Err(ParseError::eof(self.peek())),
            _ => Err(ParseError::unexpected(SyntaxContext::Pattern, self.peek())),
        }
    }

    /// `[p1, p2, ..rest, p3]` — prefix patterns, an optional rest binder, and
    /// suffix patterns.
    ///
    /// The prefix may be empty (`[..rest]` is valid), and the binder requires
    /// an identifier after `..`. Patterns after the binder accumulate into the
    /// suffix; a second `..` fails as an expected-identifier error on the
    /// dangling `.`.
    fn list_pattern(&mut self) -> Result<Spanned<Pattern>, ParseError> {
        let start = self.expect(&TokenKind::LBracket)?;

        let mut prefix_patterns = Vec::new();
        let mut rest_name = None;
        let mut suffix_patterns = Vec::new();

        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            if rest_name.is_none()
                && self.check(&TokenKind::Dot)
                && matches!(self.peek_next().kind, TokenKind::Dot)
            {
                self.advance();
                self.advance();
                rest_name = Some(self.identifier()?);
            } else if rest_name.is_none() {
                prefix_patterns.push(self.pattern()?);
            } else {
                suffix_patterns.push(self.pattern()?);
            }

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        let end = self.expect(&TokenKind::RBracket)?;
        let span = start.span.merge(&end.span);

        Ok(Spanned::new(
            Pattern::List(ListPattern {
                prefix_patterns,
                rest_name,
                suffix_patterns,
            }),
            span,
        ))
    }

    /// `.Variant`, `.Variant{}`, `.Variant{p}`, or `.Variant{p1, p2, ...}`.
    ///
    /// A multi-pattern payload synthesizes an anonymous positional struct
    /// pattern (empty name, unnamed fields) holding the sub-patterns.
    fn union_pattern(&mut self) -> Result<Spanned<Pattern>, ParseError> {
        let start = self.expect(&TokenKind::Dot)?;
        let variant = self.identifier_spanned()?;

        let mut pattern = None;
        let mut end_span = variant.span.clone();

        if self.match_token(&TokenKind::LBrace) {
            if self.check(&TokenKind::RBrace) {
                end_span = self.advance().span.clone();
            } else {
                let mut patterns = vec![self.pattern()?];
                while self.match_token(&TokenKind::Comma) {
                    if self.check(&TokenKind::RBrace) {
                        break;
                    }
                    patterns.push(self.pattern()?);
                }
                let end = self.expect(&TokenKind::RBrace)?;
                end_span = end.span;

                let payload = if patterns.len() == 1 {
                    patterns.remove(0)
                } else {
                    let multi_span = patterns[0].span.merge(&patterns[patterns.len() - 1].span);
                    let fields = patterns
                        .into_iter()
                        .map(|p| {
                            let field_span = p.span.clone();
                            Spanned::new(
                                StructPatternField {
                                    name: None,
                                    pattern: p,
                                },
                                field_span,
                            )
                        })
                        .collect();
                    Spanned::new(
                        Pattern::Struct(StructPattern {
                            name: String::new(),
                            fields,
                        }),
                        multi_span,
                    )
                };
                pattern = Some(Box::new(payload));
            }
        }

        let span = start.span.merge(&end_span);
        Ok(Spanned::new(
            Pattern::Union {
                variant: variant.node,
                pattern,
            },
            span,
        ))
    }
}
