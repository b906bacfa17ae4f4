/// Top-level declaration parsing.
///
/// Functions, struct and union definitions, imports, constants, top-level
/// variable declarations, and free-standing native blocks.
impl<'a> Parser<'a> {
    // ========================================================================
    // Declarations
    // ========================================================================

    fn top_level_statement(&mut self) -> Result<Spanned<TopLevelStmt>, ParseError> {
        match &self.peek().kind {
            TokenKind::Fn => self.function_def(),
            TokenKind::Struct => self.struct_def(),
            TokenKind::Union => self.union_def(),
            TokenKind::Import => self.import_statement(),
            TokenKind::CLiteral(_) => {
                let native = self.native_block()?;
                let span = native.span.clone();
                Ok(Spanned::new(TopLevelStmt::Native(native.node), span))
            }
            TokenKind::Const => {
                let decl = self.const_declaration()?;
                let span = decl.span.clone();
                Ok(Spanned::new(TopLevelStmt::Const(decl.node), span))
            }
            TokenKind::Ident(_) => {
                let decl = self.var_declaration()?;
                let span = decl.span.clone();
                Ok(Spanned::new(TopLevelStmt::Var(decl.node), span))
            }
            TokenKind::Eof => Err(ParseError::eof(self.peek())),
            _ => Err(ParseError::unexpected(SyntaxContext::TopLevel, self.peek())),
        }
    }

    /// `fn name ['a ...] ( params ) [-> type] { body }`
    ///
    /// The return type may also be introduced by `:` after the parameter list;
    /// both spellings occur in existing programs.
    fn function_def(&mut self) -> Result<Spanned<TopLevelStmt>, ParseError> {
        let start = self.expect(&TokenKind::Fn)?;
        let name = self.identifier_spanned()?;
        let type_params = self.generic_params()?;

        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            params.push(self.parameter()?);
            while self.match_token(&TokenKind::Comma) {
                params.push(self.parameter()?);
            }
        }
        self.expect(&TokenKind::RParen)?;

        let return_type =
            if self.match_token(&TokenKind::Arrow) || self.match_token(&TokenKind::Colon) {
                Some(self.type_expr()?)
            } else {
                None
            };

        let (body, end) = self.braced_statements()?;
        let span = start.span.merge(&end.span);

        Ok(Spanned::new(
            TopLevelStmt::Function(FunctionDef {
                name,
                type_params,
                params,
                return_type,
                body,
            }),
            span,
        ))
    }

    fn parameter(&mut self) -> Result<Spanned<Param>, ParseError> {
        let name = self.identifier_spanned()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.type_expr()?;
        let span = name.span.merge(&ty.span);
        Ok(Spanned::new(Param { name: name.node, ty }, span))
    }

    /// `struct Name ['a ...] { fields }` — commas between fields are optional.
    fn struct_def(&mut self) -> Result<Spanned<TopLevelStmt>, ParseError> {
        let start = self.expect(&TokenKind::Struct)?;
        let name = self.identifier()?;
        let type_params = self.generic_params()?;

        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            fields.push(self.struct_field()?);
            self.match_token(&TokenKind::Comma);
        }
        let end = self.expect(&TokenKind::RBrace)?;
        let span = start.span.merge(&end.span);

        Ok(Spanned::new(
            TopLevelStmt::Struct(StructDef {
                name,
                type_params,
                fields,
            }),
            span,
        ))
    }

    fn struct_field(&mut self) -> Result<Spanned<StructField>, ParseError> {
        let name = self.identifier_spanned()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.type_expr()?;
        let span = name.span.merge(&ty.span);
        Ok(Spanned::new(StructField { name: name.node, ty }, span))
    }

    /// `union Name ['a ...] { variants }` — commas between variants are optional.
    fn union_def(&mut self) -> Result<Spanned<TopLevelStmt>, ParseError> {
        let start = self.expect(&TokenKind::Union)?;
        let name = self.identifier()?;
        let type_params = self.generic_params()?;

        self.expect(&TokenKind::LBrace)?;
        let mut variants = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            variants.push(self.union_variant()?);
            self.match_token(&TokenKind::Comma);
        }
        let end = self.expect(&TokenKind::RBrace)?;
        let span = start.span.merge(&end.span);

        Ok(Spanned::new(
            TopLevelStmt::Union(UnionDef {
                name,
                type_params,
                variants,
            }),
            span,
        ))
    }

    /// `name` (no payload) or `name: type`.
    fn union_variant(&mut self) -> Result<Spanned<UnionVariant>, ParseError> {
        let name = self.identifier_spanned()?;
        if self.match_token(&TokenKind::Colon) {
            let payload = self.type_expr()?;
            let span = name.span.merge(&payload.span);
            Ok(Spanned::new(
                UnionVariant {
                    name: name.node,
                    payload: Some(payload),
                },
                span,
            ))
        } else {
            let span = name.span.clone();
            Ok(Spanned::new(
                UnionVariant {
                    name: name.node,
                    payload: None,
                },
                span,
            ))
        }
    }

    /// `import pkg;`, `import pkg as alias;`, or `import a, b from pkg;`.
    ///
    /// The statement span ends at the package (or alias) name; the `;` is
    /// consumed but not merged, like every other declaration terminator.
    fn import_statement(&mut self) -> Result<Spanned<TopLevelStmt>, ParseError> {
        let start = self.expect(&TokenKind::Import)?;
        let first = self.identifier_spanned()?;

        let (stmt, end_span) = if self.check(&TokenKind::Comma) || self.check(&TokenKind::From) {
            let mut items = vec![first.node];
            while self.match_token(&TokenKind::Comma) {
                items.push(self.identifier()?);
            }
            self.expect(&TokenKind::From)?;
            let package = self.identifier_spanned()?;
            let end_span = package.span.clone();
            (
                ImportStmt {
                    package: package.node,
                    items: Some(items),
                    alias: None,
                },
                end_span,
            )
        } else {
            let mut end_span = first.span.clone();
            let alias = if self.match_token(&TokenKind::As) {
                let alias = self.identifier_spanned()?;
                end_span = alias.span.clone();
                Some(alias.node)
            } else {
                None
            };
            (
                ImportStmt {
                    package: first.node,
                    items: None,
                    alias,
                },
                end_span,
            )
        };

        self.expect(&TokenKind::Semicolon)?;
        let span = start.span.merge(&end_span);
        Ok(Spanned::new(TopLevelStmt::Import(stmt), span))
    }

    /// A single foreign-code token standing alone.
    fn native_block(&mut self) -> Result<Spanned<NativeBlock>, ParseError> {
        match &self.peek().kind {
            TokenKind::CLiteral(content) => {
                let content = content.clone();
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(NativeBlock { content }, span))
            }
            _ => Err(ParseError::expected("native block", self.peek())),
        }
    }

    /// `const name [: type] = value;` — valid at top level and as a statement.
    fn const_declaration(&mut self) -> Result<Spanned<ConstDecl>, ParseError> {
        let start = self.expect(&TokenKind::Const)?;
        let name = self.identifier()?;

        let ty = if self.match_token(&TokenKind::Colon) {
            Some(self.type_expr()?)
        } else {
            None
        };

        self.expect(&TokenKind::Assign)?;
        let value = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;

        let span = start.span.merge(&value.span);
        Ok(Spanned::new(ConstDecl { name, ty, value }, span))
    }

    /// `name [: type] = value;`
    fn var_declaration(&mut self) -> Result<Spanned<VarDecl>, ParseError> {
        let name = self.identifier_spanned()?;

        let ty = if self.match_token(&TokenKind::Colon) {
            Some(self.type_expr()?)
        } else {
            None
        };

        self.expect(&TokenKind::Assign)?;
        let value = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;

        let span = name.span.merge(&value.span);
        Ok(Spanned::new(
            VarDecl {
                name: name.node,
                ty,
                value,
            },
            span,
        ))
    }
}
