/// Expression parsing.
///
/// Binary operators are handled by a precedence-ordered cascade: `or` →
/// `and` → equality → comparison → range → additive → multiplicative →
/// unary → postfix → primary. All binary tiers are left-associative; the
/// range tier is non-associative (at most one `..=`/`..<` per level).
impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> Result<Spanned<Expr>, ParseError> {
        self.logical_or()
    }

    fn logical_or(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.logical_and()?;
        while self.check(&TokenKind::Or) {
            self.advance();
            let right = self.logical_and()?;
            let span = left.span.merge(&right.span);
            left = Spanned::new(
                Expr::Binary(Box::new(left), BinaryOp::Or, Box::new(right)),
                span,
            );
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.equality()?;
        while self.check(&TokenKind::And) {
            self.advance();
            let right = self.equality()?;
            let span = left.span.merge(&right.span);
            left = Spanned::new(
                Expr::Binary(Box::new(left), BinaryOp::And, Box::new(right)),
                span,
            );
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.comparison()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.comparison()?;
            let span = left.span.merge(&right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.range()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.advance();
            let right = self.range()?;
            let span = left.span.merge(&right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }
        Ok(left)
    }

    fn range(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let left = self.addition()?;

        let inclusive = match self.peek().kind {
            TokenKind::RangeInclusive => true,
            TokenKind::RangeExclusive => false,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.addition()?;

        let span = left.span.merge(&right.span);
        Ok(Spanned::new(
            Expr::Range {
                start: Box::new(left),
                end: Box::new(right),
                inclusive,
            },
            span,
        ))
    }

    fn addition(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.multiplication()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.multiplication()?;
            let span = left.span.merge(&right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }
        Ok(left)
    }

    fn multiplication(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            let span = left.span.merge(&right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }
        Ok(left)
    }

    /// Prefix operators, right-associative: `not`, `-`, `*` (deref), `&`.
    fn unary(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Star => UnaryOp::Deref,
            TokenKind::Ampersand => UnaryOp::AddrOf,
            _ => return self.postfix(),
        };
        let op_token = self.advance().clone();
        let operand = self.unary()?;
        let span = op_token.span.merge(&operand.span);
        Ok(Spanned::new(Expr::Unary(op, Box::new(operand)), span))
    }

    /// Postfix chains: field access, method calls, indexing, function calls.
    ///
    /// A `(` applies as a call only when the base expression is a bare
    /// identifier; otherwise it is left for the enclosing context. Call and
    /// method-call spans include the closing `)`; index spans include `]`.
    fn postfix(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut expr = self.primary_expression()?;

        loop {
            match &self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.identifier_spanned()?;
                    if self.check(&TokenKind::LParen) {
                        let args = self.argument_list()?;
                        let span = expr.span.merge(&self.prev_span());
                        expr = Spanned::new(
                            Expr::MethodCall(Box::new(expr), field.node, args),
                            span,
                        );
                    } else {
                        let span = expr.span.merge(&field.span);
                        expr = Spanned::new(Expr::Field(Box::new(expr), field.node), span);
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.expression()?;
                    let end = self.expect(&TokenKind::RBracket)?;
                    let span = expr.span.merge(&end.span);
                    expr = Spanned::new(Expr::Index(Box::new(expr), Box::new(index)), span);
                }
                TokenKind::LParen => {
                    let Expr::Ident(name) = &expr.node else { break };
                    let name = name.clone();
                    let args = self.argument_list()?;
                    let span = expr.span.merge(&self.prev_span());
                    expr = Spanned::new(Expr::Call(name, args), span);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// `( expr, expr, ... )` — no trailing comma.
    fn argument_list(&mut self) -> Result<Vec<Spanned<Expr>>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            args.push(self.expression()?);
            while self.match_token(&TokenKind::Comma) {
                args.push(self.expression()?);
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn primary_expression(&mut self) -> Result<Spanned<Expr>, ParseError> {
        match &self.peek().kind {
            TokenKind::Int(value) => {
                let value = value.clone();
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(Expr::Int(value), span))
            }
            TokenKind::Float(value) => {
                let value = value.clone();
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(Expr::Float(value), span))
            }
            TokenKind::String(value) => {
                let value = value.clone();
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(Expr::Str(value), span))
            }
            TokenKind::True => {
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(Expr::Bool(true), span))
            }
            TokenKind::False => {
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(Expr::Bool(false), span))
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(Expr::Ident(name), span))
            }
            TokenKind::LBracket => self.list_literal(),
            TokenKind::LBrace => self.map_or_set_literal(),
            TokenKind::LParen => {
                // Grouping only; the node keeps the inner expression's span.
                self.advance();
                let expr = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Dot => self.union_literal(),
            TokenKind::Eof => Err(ParseError::eof(self.peek())),
            _ => Err(ParseError::unexpected(SyntaxContext::Expression, self.peek())),
        }
    }

    /// `[a, b, c]` — a trailing comma before `]` is tolerated.
    fn list_literal(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let start = self.expect(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            elements.push(self.expression()?);
            while self.match_token(&TokenKind::Comma) {
                if self.check(&TokenKind::RBracket) {
                    break;
                }
                elements.push(self.expression()?);
            }
        }

        let end = self.expect(&TokenKind::RBracket)?;
        let span = start.span.merge(&end.span);
        Ok(Spanned::new(Expr::List(elements), span))
    }

    /// `{ ... }` is a map or a set.
    ///
    /// An empty body is an empty map. Otherwise one expression is parsed: a
    /// following `:` commits to map pairs, anything else commits to set
    /// elements. Both tolerate a trailing comma.
    fn map_or_set_literal(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?;

        if self.check(&TokenKind::RBrace) {
            let end = self.advance().clone();
            let span = start.span.merge(&end.span);
            return Ok(Spanned::new(Expr::Map(Vec::new()), span));
        }

        let first = self.expression()?;

        if self.match_token(&TokenKind::Colon) {
            let value = self.expression()?;
            let pair_span = first.span.merge(&value.span);
            let mut pairs = vec![Spanned::new(MapPair { key: first, value }, pair_span)];

            while self.match_token(&TokenKind::Comma) {
                if self.check(&TokenKind::RBrace) {
                    break;
                }
                let key = self.expression()?;
                self.expect(&TokenKind::Colon)?;
                let value = self.expression()?;
                let pair_span = key.span.merge(&value.span);
                pairs.push(Spanned::new(MapPair { key, value }, pair_span));
            }

            let end = self.expect(&TokenKind::RBrace)?;
            let span = start.span.merge(&end.span);
            Ok(Spanned::new(Expr::Map(pairs), span))
        } else {
            let mut elements = vec![first];
            while self.match_token(&TokenKind::Comma) {
                if self.check(&TokenKind::RBrace) {
                    break;
                }
                elements.push(self.expression()?);
            }

            let end = self.expect(&TokenKind::RBrace)?;
            let span = start.span.merge(&end.span);
            Ok(Spanned::new(Expr::Set(elements), span))
        }
    }

    /// `.Variant`, `.Variant{}`, `.Variant{x}`, or `.Variant{a, b, ...}`.
    ///
    /// A multi-element payload synthesizes a list literal spanning the
    /// elements.
    fn union_literal(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let start = self.expect(&TokenKind::Dot)?;
        let variant = self.identifier_spanned()?;

        let mut value = None;
        let mut end_span = variant.span.clone();

        if self.match_token(&TokenKind::LBrace) {
            if self.check(&TokenKind::RBrace) {
                end_span = self.advance().span.clone();
            } else {
                let mut elements = vec![self.expression()?];
                while self.match_token(&TokenKind::Comma) {
                    if self.check(&TokenKind::RBrace) {
                        break;
                    }
                    elements.push(self.expression()?);
                }
                let end = self.expect(&TokenKind::RBrace)?;
                end_span = end.span;

                let payload = if elements.len() == 1 {
                    elements.remove(0)
                } else {
                    let multi_span = elements[0].span.merge(&elements[elements.len() - 1].span);
                    Spanned::new(Expr::List(elements), multi_span)
                };
                value = Some(Box::new(payload));
            }
        }

        let span = start.span.merge(&end_span);
        Ok(Spanned::new(
            Expr::UnionLiteral {
                variant: variant.node,
                value,
            },
            span,
        ))
    }
}
