/// Type-expression parsing.
///
/// Pointer types, primitive keywords, nominal types with flat argument lists,
/// generic parameter references, anonymous `struct{...}`/`union{...}` forms,
/// and parenthesized grouping.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    fn type_expr(&mut self) -> Result<Spanned<Type>, ParseError> {
        self.pointer_type()
    }

    fn pointer_type(&mut self) -> Result<Spanned<Type>, ParseError> {
        if self.check(&TokenKind::Star) {
            let star = self.advance().clone();
            let target = self.primary_type()?;
            let span = star.span.merge(&target.span);
            return Ok(Spanned::new(Type::Pointer(Box::new(target)), span));
        }
        self.primary_type()
    }

    fn primary_type(&mut self) -> Result<Spanned<Type>, ParseError> {
        if let Some(prim) = primitive_type(&self.peek().kind) {
            let token = self.advance().clone();
            return Ok(Spanned::new(prim, token.span));
        }

        match &self.peek().kind {
            TokenKind::Apostrophe => {
                let tick = self.advance().clone();
                let name = self.identifier_spanned()?;
                let span = tick.span.merge(&name.span);
                Ok(Spanned::new(Type::Generic(name.node), span))
            }
            TokenKind::Ident(_) => {
                let name = self.identifier_spanned()?;
                let args = self.type_arguments()?;
                let end_span = args
                    .last()
                    .map(|arg| arg.span.clone())
                    .unwrap_or_else(|| name.span.clone());
                let span = name.span.merge(&end_span);
                Ok(Spanned::new(Type::Custom(name.node, args), span))
            }
            TokenKind::Union => self.anonymous_union_type(),
            TokenKind::Struct => self.anonymous_struct_type(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.type_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Eof => Err(ParseError::eof(self.peek())),
            _ => Err(ParseError::unexpected(SyntaxContext::Type, self.peek())),
        }
    }

    /// Greedy flat argument list after a nominal type name.
    ///
    /// Each argument is a single name: `'t` is a generic reference, a bare
    /// identifier is a nominal type with no arguments of its own, a primitive
    /// keyword is its primitive node, and parentheses admit a full nested
    /// type (`map str (list i32)`). Any other token ends the list.
    fn type_arguments(&mut self) -> Result<Vec<Spanned<Type>>, ParseError> {
        let mut args = Vec::new();
        loop {
            if let Some(prim) = primitive_type(&self.peek().kind) {
                let token = self.advance().clone();
                args.push(Spanned::new(prim, token.span));
                continue;
            }
            match &self.peek().kind {
                TokenKind::Apostrophe => {
                    let tick = self.advance().clone();
                    let name = self.identifier_spanned()?;
                    let span = tick.span.merge(&name.span);
                    args.push(Spanned::new(Type::Generic(name.node), span));
                }
                TokenKind::Ident(_) => {
                    let name = self.identifier_spanned()?;
                    let span = name.span.clone();
                    args.push(Spanned::new(Type::Custom(name.node, Vec::new()), span));
                }
                TokenKind::LParen => {
                    self.advance();
                    let inner = self.type_expr()?;
                    self.expect(&TokenKind::RParen)?;
                    args.push(inner);
                }
                _ => break,
            }
        }
        Ok(args)
    }

    /// Inline `union { variants }` type.
    fn anonymous_union_type(&mut self) -> Result<Spanned<Type>, ParseError> {
        let start = self.expect(&TokenKind::Union)?;
        self.expect(&TokenKind::LBrace)?;
        let mut variants = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            variants.push(self.union_variant()?);
            self.match_token(&TokenKind::Comma);
        }
        let end = self.expect(&TokenKind::RBrace)?;
        let span = start.span.merge(&end.span);
        Ok(Spanned::new(Type::AnonymousUnion(variants), span))
    }

    /// Inline `struct { fields }` type.
    fn anonymous_struct_type(&mut self) -> Result<Spanned<Type>, ParseError> {
        let start = self.expect(&TokenKind::Struct)?;
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            fields.push(self.struct_field()?);
            self.match_token(&TokenKind::Comma);
        }
        let end = self.expect(&TokenKind::RBrace)?;
        let span = start.span.merge(&end.span);
        Ok(Spanned::new(Type::AnonymousStruct(fields), span))
    }
}

/// Map a primitive-type keyword to its type node.
fn primitive_type(kind: &TokenKind) -> Option<Type> {
    Some(match kind {
        TokenKind::I8 => Type::I8,
        TokenKind::I16 => Type::I16,
        TokenKind::I32 => Type::I32,
        TokenKind::I64 => Type::I64,
        TokenKind::U8 => Type::U8,
        TokenKind::U16 => Type::U16,
        TokenKind::U32 => Type::U32,
        TokenKind::U64 => Type::U64,
        TokenKind::Usize => Type::Usize,
        TokenKind::F32 => Type::F32,
        TokenKind::F64 => Type::F64,
        TokenKind::Bool => Type::Bool,
        TokenKind::Str => Type::Str,
        _ => return None,
    })
}
