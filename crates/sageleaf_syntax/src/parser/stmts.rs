/// Statement parsing.
///
/// The statement dispatch and every statement form: return, const/var
/// declarations, assignment vs. expression statements, `if`/`elif`/`else`,
/// `while`, `for`, `break`/`continue`, `match`, and native blocks.
impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Result<Spanned<Statement>, ParseError> {
        match &self.peek().kind {
            TokenKind::Return => self.return_statement(),
            TokenKind::Const => {
                let decl = self.const_declaration()?;
                let span = decl.span.clone();
                Ok(Spanned::new(Statement::Const(decl.node), span))
            }
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Break => self.break_statement(),
            TokenKind::Continue => self.continue_statement(),
            TokenKind::Match => self.match_statement(),
            TokenKind::CLiteral(_) => {
                let native = self.native_block()?;
                let span = native.span.clone();
                Ok(Spanned::new(Statement::Native(native.node), span))
            }
            _ => self.var_declaration_or_assignment(),
        }
    }

    /// `{ statement* }` — returns the body and the closing brace token.
    fn braced_statements(&mut self) -> Result<(Vec<Spanned<Statement>>, Token), ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            body.push(self.statement()?);
        }
        let end = self.expect(&TokenKind::RBrace)?;
        Ok((body, end))
    }

    /// `return [expr];` — the span ends at the value (or the keyword).
    fn return_statement(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let start = self.expect(&TokenKind::Return)?;

        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };

        let end_span = value
            .as_ref()
            .map(|v| v.span.clone())
            .unwrap_or_else(|| start.span.clone());
        self.expect(&TokenKind::Semicolon)?;

        let span = start.span.merge(&end_span);
        Ok(Spanned::new(Statement::Return(value), span))
    }

    /// A statement beginning with an expression token.
    ///
    /// The declaration path is taken only when the token *after* the current
    /// one is `:`; everything else parses as an expression, and a following
    /// `=` turns it into an assignment (targets may be arbitrary postfix
    /// chains, `a.b[0] = v;`).
    fn var_declaration_or_assignment(&mut self) -> Result<Spanned<Statement>, ParseError> {
        if matches!(self.peek_next().kind, TokenKind::Colon) {
            let decl = self.var_declaration()?;
            let span = decl.span.clone();
            return Ok(Spanned::new(Statement::Var(decl.node), span));
        }

        let expr = self.expression()?;

        if self.match_token(&TokenKind::Assign) {
            let value = self.expression()?;
            self.expect(&TokenKind::Semicolon)?;
            let span = expr.span.merge(&value.span);
            Ok(Spanned::new(
                Statement::Assign(AssignStmt {
                    target: expr,
                    value,
                }),
                span,
            ))
        } else {
            self.expect(&TokenKind::Semicolon)?;
            let span = expr.span.clone();
            Ok(Spanned::new(Statement::Expr(expr), span))
        }
    }

    /// `if cond { } [elif cond { }]* [else { }]`
    ///
    /// The statement span ends at the else-block's `}` when present, else at
    /// the last elif branch, else at the last then-statement, else at the
    /// condition.
    fn if_statement(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let start = self.expect(&TokenKind::If)?;
        let condition = self.expression()?;
        let (then_body, _) = self.braced_statements()?;

        let mut elif_branches = Vec::new();
        while self.check(&TokenKind::Elif) {
            let elif_kw = self.advance().clone();
            let elif_condition = self.expression()?;
            let (elif_body, elif_end) = self.braced_statements()?;
            let elif_span = elif_kw.span.merge(&elif_end.span);
            elif_branches.push(Spanned::new(
                ElifBranch {
                    condition: elif_condition,
                    body: elif_body,
                },
                elif_span,
            ));
        }

        let mut end_span = then_body
            .last()
            .map(|s| s.span.clone())
            .unwrap_or_else(|| condition.span.clone());

        let else_body = if self.match_token(&TokenKind::Else) {
            let (body, end) = self.braced_statements()?;
            end_span = end.span;
            Some(body)
        } else {
            if let Some(last) = elif_branches.last() {
                end_span = last.span.clone();
            }
            None
        };

        let span = start.span.merge(&end_span);
        Ok(Spanned::new(
            Statement::If(IfStmt {
                condition,
                then_body,
                elif_branches,
                else_body,
            }),
            span,
        ))
    }

    fn while_statement(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let start = self.expect(&TokenKind::While)?;
        let condition = self.expression()?;
        let (body, end) = self.braced_statements()?;
        let span = start.span.merge(&end.span);
        Ok(Spanned::new(Statement::While(WhileStmt { condition, body }), span))
    }

    /// `for t1 [: type] [, t2 [: type]]* in expr { body }`
    ///
    /// Loop target type annotations are accepted and discarded; the node
    /// records the identifiers only.
    fn for_statement(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let start = self.expect(&TokenKind::For)?;

        let mut target = vec![self.identifier_spanned()?];
        if self.match_token(&TokenKind::Colon) {
            self.type_expr()?;
        }
        while self.match_token(&TokenKind::Comma) {
            target.push(self.identifier_spanned()?);
            if self.match_token(&TokenKind::Colon) {
                self.type_expr()?;
            }
        }

        self.expect(&TokenKind::In)?;
        let iterable = self.expression()?;
        let (body, end) = self.braced_statements()?;

        let span = start.span.merge(&end.span);
        Ok(Spanned::new(
            Statement::For(ForStmt {
                target,
                iterable,
                body,
            }),
            span,
        ))
    }

    /// `break;` — the span covers the keyword only.
    fn break_statement(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let token = self.expect(&TokenKind::Break)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Spanned::new(Statement::Break, token.span))
    }

    /// `continue;` — the span covers the keyword only.
    fn continue_statement(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let token = self.expect(&TokenKind::Continue)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Spanned::new(Statement::Continue, token.span))
    }

    fn match_statement(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let start = self.expect(&TokenKind::Match)?;
        let value = self.expression()?;

        self.expect(&TokenKind::LBrace)?;
        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            cases.push(self.match_case()?);
        }
        let end = self.expect(&TokenKind::RBrace)?;

        let span = start.span.merge(&end.span);
        Ok(Spanned::new(Statement::Match(MatchStmt { value, cases }), span))
    }

    /// `case pattern [if guard] : body` — the body is either a braced
    /// statement list or a single statement. The case span ends at the last
    /// body statement (or the pattern, for an empty braced body).
    fn match_case(&mut self) -> Result<Spanned<MatchCase>, ParseError> {
        let start = self.expect(&TokenKind::Case)?;
        let pattern = self.pattern()?;

        let guard = if self.match_token(&TokenKind::If) {
            Some(self.expression()?)
        } else {
            None
        };

        self.expect(&TokenKind::Colon)?;

        let mut body = Vec::new();
        if self.match_token(&TokenKind::LBrace) {
            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                body.push(self.statement()?);
            }
            self.expect(&TokenKind::RBrace)?;
        } else {
            body.push(self.statement()?);
        }

        let end_span = body
            .last()
            .map(|s| s.span.clone())
            .unwrap_or_else(|| pattern.span.clone());
        let span = start.span.merge(&end_span);

        Ok(Spanned::new(
            MatchCase {
                pattern,
                guard,
                body,
            },
            span,
        ))
    }
}
