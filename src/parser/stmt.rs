//! Statements and variable declarations

use crate::ast::*;
use crate::error::{ErrorKind, ParseError};
use crate::lexer::TokenKind;

use super::Parser;
use super::context::{Context, Label};
use super::cover::{CoverErrors, Site};
use super::pattern::BindingKind;
use super::scope::{BindingType, ScopeFlags};

/// Where a statement appears. Only statement lists admit declarations;
/// Annex B lets a sloppy `if` branch or label body hold a plain function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StatementContext {
    List,
    If,
    Label,
    Other,
}

impl<'a> Parser<'a> {
    // ============ DISPATCH ============

    /// Statement or declaration inside a block, function body or program
    pub(super) fn parse_statement_list_item(&mut self) -> Result<Statement, ParseError> {
        self.parse_statement(StatementContext::List)
    }

    fn parse_statement(&mut self, ctx: StatementContext) -> Result<Statement, ParseError> {
        self.enter_nesting()?;
        let result = self.parse_statement_inner(ctx);
        self.leave_nesting();
        result
    }

    fn parse_statement_inner(&mut self, ctx: StatementContext) -> Result<Statement, ParseError> {
        let start = self.site();

        if self.is_let_declaration(ctx)? {
            return self.parse_lexical_declaration(start, VariableKind::Let, ctx);
        }

        match self.current.kind {
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Statement::Empty(self.finish(start)))
            }
            TokenKind::Var => {
                let mut declaration = self.parse_variable_declaration(VariableKind::Var, false)?;
                self.expect_semicolon()?;
                declaration.span = self.finish(start);
                Ok(Statement::VariableDeclaration(declaration))
            }
            TokenKind::Const => self.parse_lexical_declaration(start, VariableKind::Const, ctx),
            TokenKind::Function => self.parse_function_statement(start, false, ctx),
            TokenKind::Class => {
                if ctx != StatementContext::List {
                    return Err(self.single_statement_error());
                }
                let class = self.parse_class(true, false)?;
                if let Some(id) = &class.id {
                    self.declare_name(id, BindingType::Lexical)?;
                }
                Ok(Statement::ClassDeclaration(Box::new(class)))
            }
            TokenKind::If => self.parse_if(start),
            TokenKind::For => self.parse_for(start),
            TokenKind::While => self.parse_while(start),
            TokenKind::Do => self.parse_do_while(start),
            TokenKind::Return => self.parse_return(start),
            TokenKind::Break => self.parse_break_continue(start, true),
            TokenKind::Continue => self.parse_break_continue(start, false),
            TokenKind::Throw => self.parse_throw(start),
            TokenKind::Try => self.parse_try(start),
            TokenKind::Switch => self.parse_switch(start),
            TokenKind::With => self.parse_with(start),
            TokenKind::Debugger => {
                self.advance()?;
                self.expect_semicolon()?;
                Ok(Statement::Debugger(self.finish(start)))
            }
            TokenKind::Import => {
                // `import(...)` and `import.meta` start expression statements
                let next = self.peek()?;
                if matches!(next.kind, TokenKind::LParen | TokenKind::Dot) {
                    return self.parse_expression_statement(start, ctx);
                }
                self.check_module_item(ctx, "import")?;
                self.parse_import_declaration(start)
            }
            TokenKind::Export => {
                self.check_module_item(ctx, "export")?;
                self.parse_export_declaration(start)
            }
            TokenKind::Identifier(_) if self.is_contextual("async") => {
                let next = self.peek()?;
                if next.kind == TokenKind::Function && !next.had_newline_before() {
                    if ctx != StatementContext::List {
                        return Err(self.error_at_current(
                            ErrorKind::UnexpectedToken,
                            "Async functions can only be declared at the top level or inside a block",
                        ));
                    }
                    self.advance()?;
                    let function = self.parse_function_declaration(start, true, true, true)?;
                    return Ok(Statement::FunctionDeclaration(Box::new(function)));
                }
                self.parse_expression_statement(start, ctx)
            }
            _ => self.parse_expression_statement(start, ctx),
        }
    }

    fn single_statement_error(&self) -> ParseError {
        self.error_at_current(
            ErrorKind::UnexpectedToken,
            "Lexical declaration cannot appear in a single-statement context",
        )
    }

    /// Whether `let` at the current token starts a declaration. Outside a
    /// statement list only `let [` is taken as one, and it is an error there.
    fn is_let_declaration(&mut self, ctx: StatementContext) -> Result<bool, ParseError> {
        if !self.is_contextual("let") {
            return Ok(false);
        }
        let next = self.peek()?;
        match &next.kind {
            TokenKind::LBracket => {
                if ctx != StatementContext::List {
                    return Err(self.single_statement_error());
                }
                Ok(true)
            }
            _ if ctx != StatementContext::List => Ok(false),
            TokenKind::LBrace | TokenKind::Identifier(_) => Ok(true),
            kind => Ok(kind.is_keyword() && !matches!(kind, TokenKind::In | TokenKind::Instanceof)),
        }
    }

    /// `function` in statement position. Outside a statement list, sloppy
    /// web-compatible code may still put a plain function in an `if` branch
    /// or a label body; that function binds nothing.
    fn parse_function_statement(
        &mut self,
        start: Site,
        is_async: bool,
        ctx: StatementContext,
    ) -> Result<Statement, ParseError> {
        if ctx != StatementContext::List {
            let hanging_allowed = !self.context.is_strict()
                && self.options.web_compat()
                && matches!(ctx, StatementContext::If | StatementContext::Label);
            if !hanging_allowed {
                return Err(self.error_at_current(
                    ErrorKind::UnexpectedToken,
                    "Functions can only be declared at the top level or inside a block",
                ));
            }
            if self.peek_is(&TokenKind::Star)? {
                return Err(self.error_at_current(
                    ErrorKind::UnexpectedToken,
                    "Generators can only be declared at the top level or inside a block",
                ));
            }
        }
        let declare = ctx == StatementContext::List;
        let function = self.parse_function_declaration(start, is_async, true, declare)?;
        Ok(Statement::FunctionDeclaration(Box::new(function)))
    }

    /// `import`/`export` declarations: module code, top level only
    fn check_module_item(&self, ctx: StatementContext, keyword: &str) -> Result<(), ParseError> {
        if !self.options.module {
            return Err(self.error_at_current(
                ErrorKind::EarlyError,
                format!("Cannot use {} statement outside a module", keyword),
            ));
        }
        if ctx != StatementContext::List || self.scopes.depth() != 1 {
            return Err(self.error_at_current(
                ErrorKind::EarlyError,
                "'import' and 'export' may only appear at the top level",
            ));
        }
        Ok(())
    }

    // ============ DECLARATIONS ============

    fn parse_lexical_declaration(
        &mut self,
        start: Site,
        kind: VariableKind,
        ctx: StatementContext,
    ) -> Result<Statement, ParseError> {
        if ctx != StatementContext::List {
            return Err(self.single_statement_error());
        }
        let mut declaration = self.parse_variable_declaration(kind, false)?;
        self.expect_semicolon()?;
        declaration.span = self.finish(start);
        Ok(Statement::VariableDeclaration(declaration))
    }

    /// `var`/`let`/`const` and its declarators, without the terminator.
    /// In a `for` head missing initializers are checked by the caller, once
    /// it knows whether this is a for-in/of.
    pub(super) fn parse_variable_declaration(
        &mut self,
        kind: VariableKind,
        in_for_head: bool,
    ) -> Result<VariableDeclaration, ParseError> {
        let start = self.site();
        self.advance()?;
        let (binding_kind, binding_type) = match kind {
            VariableKind::Var => (BindingKind::Var, BindingType::Var),
            VariableKind::Let => (BindingKind::Let, BindingType::Lexical),
            VariableKind::Const => (BindingKind::Const, BindingType::Lexical),
        };

        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.site();
            let id = self.parse_binding_target(binding_kind)?;
            for name in id.bound_names() {
                self.declare_name(name, binding_type)?;
            }
            let init = if self.match_token(&TokenKind::Eq)? {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            let declarator = VariableDeclarator {
                id,
                init,
                span: self.finish(declarator_start),
            };
            if !in_for_head {
                self.check_initializer(&declarator, kind)?;
            }
            declarations.push(declarator);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(VariableDeclaration {
            kind,
            declarations,
            span: self.finish(start),
        })
    }

    /// `const` and destructuring declarators need an initializer
    fn check_initializer(
        &self,
        declarator: &VariableDeclarator,
        kind: VariableKind,
    ) -> Result<(), ParseError> {
        if declarator.init.is_some() {
            return Ok(());
        }
        let message = if kind == VariableKind::Const {
            "Missing initializer in const declaration"
        } else if !matches!(declarator.id, Pattern::Identifier(_)) {
            "Missing initializer in destructuring declaration"
        } else {
            return Ok(());
        };
        Err(self.error(
            ErrorKind::UnexpectedToken,
            message,
            declarator.span.end,
        ))
    }

    // ============ BLOCKS ============

    pub(super) fn parse_block(&mut self) -> Result<BlockStatement, ParseError> {
        self.scopes.enter(ScopeFlags::empty());
        let block = self.parse_block_in_current_scope();
        self.scopes.exit();
        block
    }

    fn parse_block_in_current_scope(&mut self) -> Result<BlockStatement, ParseError> {
        let start = self.site();
        self.require_token(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            body.push(self.parse_statement_list_item()?);
        }
        self.advance()?;
        Ok(BlockStatement {
            body,
            span: self.finish(start),
        })
    }

    // ============ CONTROL FLOW ============

    fn parse_paren_expression(&mut self) -> Result<Expression, ParseError> {
        self.require_token(&TokenKind::LParen)?;
        let expr = self.with_in(true, |p| p.parse_expression())?;
        self.require_token(&TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement(StatementContext::If)?;
        let alternate = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_statement(StatementContext::If)?))
        } else {
            None
        };
        Ok(Statement::If(IfStatement {
            test,
            consequent: Box::new(consequent),
            alternate,
            span: self.finish(start),
        }))
    }

    /// Body of a loop: `break` and `continue` become valid
    fn parse_loop_body(&mut self) -> Result<Statement, ParseError> {
        let saved = self.context;
        self.context |= Context::ITERATION;
        let body = self.parse_statement(StatementContext::Other);
        self.context.set(Context::ITERATION, saved.contains(Context::ITERATION));
        body
    }

    fn parse_while(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        let test = self.parse_paren_expression()?;
        let body = self.parse_loop_body()?;
        Ok(Statement::While(WhileStatement {
            test,
            body: Box::new(body),
            span: self.finish(start),
        }))
    }

    fn parse_do_while(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        let body = self.parse_loop_body()?;
        self.require_token(&TokenKind::While)?;
        let test = self.parse_paren_expression()?;
        // The `;` after do-while is optional even without a line break
        self.match_token(&TokenKind::Semicolon)?;
        Ok(Statement::DoWhile(DoWhileStatement {
            body: Box::new(body),
            test,
            span: self.finish(start),
        }))
    }

    fn parse_for(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        let is_await = if self.is_contextual("await") {
            if !self.context.has_await() {
                return Err(self.error_at_current(
                    ErrorKind::UnexpectedToken,
                    "for await is only valid in async functions and modules",
                ));
            }
            self.advance()?;
            true
        } else {
            false
        };
        self.require_token(&TokenKind::LParen)?;
        self.scopes.enter(ScopeFlags::empty());
        let result = self.parse_for_head(start, is_await);
        self.scopes.exit();
        result
    }

    fn parse_for_head(&mut self, start: Site, is_await: bool) -> Result<Statement, ParseError> {
        if self.check(&TokenKind::Semicolon) {
            if is_await {
                return Err(self.unexpected());
            }
            return self.parse_for_rest(start, None);
        }

        let starts_with_let = self.is_contextual("let");
        let declaration_kind = if self.check(&TokenKind::Var) {
            Some(VariableKind::Var)
        } else if self.check(&TokenKind::Const) {
            Some(VariableKind::Const)
        } else if self.is_let_declaration(StatementContext::List)? {
            Some(VariableKind::Let)
        } else {
            None
        };

        if let Some(kind) = declaration_kind {
            let declaration = self.with_in(false, |p| p.parse_variable_declaration(kind, true))?;
            let is_of = self.is_contextual("of");
            if is_of || self.check(&TokenKind::In) {
                self.check_for_in_of_declaration(&declaration, is_of)?;
                if is_await && !is_of {
                    return Err(self.unexpected());
                }
                return self.parse_for_in_of(start, ForInOfLeft::Variable(declaration), is_of, is_await);
            }
            if is_await {
                return Err(self.unexpected());
            }
            for declarator in &declaration.declarations {
                self.check_initializer(declarator, kind)?;
            }
            return self.parse_for_rest(start, Some(ForInit::Variable(declaration)));
        }

        let init_start = self.site();
        let starts_with_async = self.is_contextual("async");
        let mut cover = CoverErrors::default();
        let init = self.with_in(false, |p| p.parse_expression_cover(&mut cover))?;

        let is_of = self.is_contextual("of");
        if is_of || self.check(&TokenKind::In) {
            if is_of && starts_with_let {
                return Err(self.error_at_site(
                    ErrorKind::UnexpectedToken,
                    "The left-hand side of a for-of loop may not be 'let'",
                    init_start,
                ));
            }
            if is_of && !is_await && starts_with_async && is_plain_async(&init) {
                return Err(self.error_at_site(
                    ErrorKind::UnexpectedToken,
                    "The left-hand side of a for-of loop may not be 'async'",
                    init_start,
                ));
            }
            if is_await && !is_of {
                return Err(self.unexpected());
            }
            if let Some(err) =
                cover.pattern_error(init_start.offset, ErrorKind::InvalidDestructuringTarget)
            {
                return Err(err);
            }
            let target = self.reinterpret(init, BindingKind::Assignment)?;
            return self.parse_for_in_of(start, ForInOfLeft::Pattern(target), is_of, is_await);
        }

        if let Some(err) = cover.expression_error(0) {
            return Err(err);
        }
        if is_await {
            return Err(self.unexpected());
        }
        self.parse_for_rest(start, Some(ForInit::Expression(init)))
    }

    /// A for-in/of declaration binds exactly one name and has no
    /// initializer, except the Annex B `for (var x = 1 in y)`.
    fn check_for_in_of_declaration(
        &self,
        declaration: &VariableDeclaration,
        is_of: bool,
    ) -> Result<(), ParseError> {
        let loop_kind = if is_of { "for-of" } else { "for-in" };
        let [declarator] = declaration.declarations.as_slice() else {
            return Err(self.error(
                ErrorKind::EarlyError,
                format!("Invalid left-hand side in {} loop: must have a single binding", loop_kind),
                declaration.span.start,
            ));
        };
        if declarator.init.is_none() {
            return Ok(());
        }
        let annex_b = !is_of
            && declaration.kind == VariableKind::Var
            && !self.context.is_strict()
            && self.options.web_compat()
            && matches!(declarator.id, Pattern::Identifier(_));
        if annex_b {
            return Ok(());
        }
        Err(self.error(
            ErrorKind::EarlyError,
            format!("{} loop variable declaration may not have an initializer", loop_kind),
            declarator.span.start,
        ))
    }

    /// `; test; update) body` of a C-style for
    fn parse_for_rest(&mut self, start: Site, init: Option<ForInit>) -> Result<Statement, ParseError> {
        self.require_token(&TokenKind::Semicolon)?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.with_in(true, |p| p.parse_expression())?)
        };
        self.require_token(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.with_in(true, |p| p.parse_expression())?)
        };
        self.require_token(&TokenKind::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(Statement::For(ForStatement {
            init,
            test,
            update,
            body: Box::new(body),
            span: self.finish(start),
        }))
    }

    /// `in right) body` or `of right) body`; the current token is `in`/`of`
    fn parse_for_in_of(
        &mut self,
        start: Site,
        left: ForInOfLeft,
        is_of: bool,
        is_await: bool,
    ) -> Result<Statement, ParseError> {
        self.advance()?;
        let right = if is_of {
            self.with_in(true, |p| p.parse_assignment())?
        } else {
            self.with_in(true, |p| p.parse_expression())?
        };
        self.require_token(&TokenKind::RParen)?;
        let body = Box::new(self.parse_loop_body()?);
        let span = self.finish(start);
        Ok(if is_of {
            Statement::ForOf(ForOfStatement {
                left,
                right,
                body,
                await_: is_await,
                span,
            })
        } else {
            Statement::ForIn(ForInStatement {
                left,
                right,
                body,
                span,
            })
        })
    }

    fn parse_return(&mut self, start: Site) -> Result<Statement, ParseError> {
        if !self.context.contains(Context::RETURN) {
            return Err(self.error_at_current(ErrorKind::EarlyError, "Illegal return statement"));
        }
        self.advance()?;
        let argument = if self.check(&TokenKind::Semicolon) || self.can_insert_semicolon() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon()?;
        Ok(Statement::Return(ReturnStatement {
            argument,
            span: self.finish(start),
        }))
    }

    fn parse_break_continue(&mut self, start: Site, is_break: bool) -> Result<Statement, ParseError> {
        self.advance()?;
        let label = if matches!(self.current.kind, TokenKind::Identifier(_))
            && !self.current.had_newline_before()
        {
            Some(self.parse_identifier_reference()?)
        } else {
            None
        };

        match &label {
            Some(id) => {
                let Some(target) = self.labels.iter().rev().find(|l| l.name == id.name) else {
                    return Err(self.error(
                        ErrorKind::EarlyError,
                        format!("Undefined label '{}'", id.name),
                        id.span.start,
                    ));
                };
                if !is_break && !target.is_loop {
                    return Err(self.error(
                        ErrorKind::EarlyError,
                        format!(
                            "Illegal continue statement: '{}' does not denote an iteration statement",
                            id.name
                        ),
                        id.span.start,
                    ));
                }
            }
            None => {
                let allowed = if is_break {
                    self.context.intersects(Context::ITERATION | Context::SWITCH)
                } else {
                    self.context.contains(Context::ITERATION)
                };
                if !allowed {
                    let message = if is_break {
                        "Illegal break statement"
                    } else {
                        "Illegal continue statement: no surrounding iteration statement"
                    };
                    return Err(self.error_at_site(ErrorKind::EarlyError, message, start));
                }
            }
        }

        self.expect_semicolon()?;
        let span = self.finish(start);
        Ok(if is_break {
            Statement::Break(BreakStatement { label, span })
        } else {
            Statement::Continue(ContinueStatement { label, span })
        })
    }

    fn parse_throw(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        if self.current.had_newline_before() {
            return Err(self.error_at_current(
                ErrorKind::RestrictedProduction,
                "Illegal newline after throw",
            ));
        }
        let argument = self.parse_expression()?;
        self.expect_semicolon()?;
        Ok(Statement::Throw(ThrowStatement {
            argument,
            span: self.finish(start),
        }))
    }

    fn parse_try(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        let block = self.parse_block()?;

        let handler = if self.check(&TokenKind::Catch) {
            let catch_start = self.site();
            self.advance()?;
            let param = if self.match_token(&TokenKind::LParen)? {
                let param = self.parse_binding_target(BindingKind::CatchParam)?;
                self.require_token(&TokenKind::RParen)?;
                Some(param)
            } else {
                None
            };

            // The catch body shares the scope of its parameter
            let simple = matches!(param, Some(Pattern::Identifier(_)));
            self.scopes.enter(if simple {
                ScopeFlags::SIMPLE_CATCH
            } else {
                ScopeFlags::empty()
            });
            let body = self.parse_catch_body(param.as_ref(), simple);
            self.scopes.exit();
            Some(CatchClause {
                param,
                body: body?,
                span: self.finish(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.match_token(&TokenKind::Finally)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error_at_current(
                ErrorKind::UnexpectedToken,
                "Missing catch or finally after try",
            ));
        }
        Ok(Statement::Try(TryStatement {
            block,
            handler,
            finalizer,
            span: self.finish(start),
        }))
    }

    fn parse_catch_body(
        &mut self,
        param: Option<&Pattern>,
        simple: bool,
    ) -> Result<BlockStatement, ParseError> {
        if let Some(param) = param {
            let binding = if simple {
                BindingType::SimpleCatch
            } else {
                BindingType::Lexical
            };
            for id in param.bound_names() {
                self.declare_name(id, binding)?;
            }
        }
        self.parse_block_in_current_scope()
    }

    fn parse_switch(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        let discriminant = self.parse_paren_expression()?;
        self.require_token(&TokenKind::LBrace)?;

        self.scopes.enter(ScopeFlags::empty());
        let saved = self.context;
        self.context |= Context::SWITCH;
        let cases = self.parse_switch_cases();
        self.context.set(Context::SWITCH, saved.contains(Context::SWITCH));
        self.scopes.exit();
        let cases = cases?;

        Ok(Statement::Switch(SwitchStatement {
            discriminant,
            cases,
            span: self.finish(start),
        }))
    }

    fn parse_switch_cases(&mut self) -> Result<Vec<SwitchCase>, ParseError> {
        let mut cases = Vec::new();
        let mut has_default = false;
        while !self.check(&TokenKind::RBrace) {
            let case_start = self.site();
            let test = if self.match_token(&TokenKind::Case)? {
                Some(self.with_in(true, |p| p.parse_expression())?)
            } else if self.check(&TokenKind::Default) {
                if has_default {
                    return Err(self.error_at_current(
                        ErrorKind::EarlyError,
                        "More than one default clause in switch statement",
                    ));
                }
                has_default = true;
                self.advance()?;
                None
            } else {
                return Err(self.unexpected());
            };
            self.require_token(&TokenKind::Colon)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.current.kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace
            ) {
                consequent.push(self.parse_statement_list_item()?);
            }
            cases.push(SwitchCase {
                test,
                consequent,
                span: self.finish(case_start),
            });
        }
        self.advance()?;
        Ok(cases)
    }

    fn parse_with(&mut self, start: Site) -> Result<Statement, ParseError> {
        if self.context.is_strict() {
            return Err(self.error_at_current(
                ErrorKind::EarlyError,
                "Strict mode code may not include a with statement",
            ));
        }
        self.advance()?;
        let object = self.parse_paren_expression()?;
        let body = self.parse_statement(StatementContext::Other)?;
        Ok(Statement::With(WithStatement {
            object,
            body: Box::new(body),
            span: self.finish(start),
        }))
    }

    // ============ EXPRESSION AND LABELED STATEMENTS ============

    fn parse_expression_statement(
        &mut self,
        start: Site,
        ctx: StatementContext,
    ) -> Result<Statement, ParseError> {
        let starts_with_identifier = matches!(self.current.kind, TokenKind::Identifier(_));
        let expression = self.parse_expression()?;

        if starts_with_identifier && self.check(&TokenKind::Colon) {
            if let Expression::Identifier(label) = expression {
                return self.parse_labeled(start, label, ctx);
            }
        }

        self.expect_semicolon()?;
        Ok(Statement::Expression(ExpressionStatement {
            expression,
            directive: None,
            span: self.finish(start),
        }))
    }

    /// `label: body`; the current token is `:`
    fn parse_labeled(
        &mut self,
        start: Site,
        label: Identifier,
        ctx: StatementContext,
    ) -> Result<Statement, ParseError> {
        self.advance()?;
        if self.labels.iter().any(|l| l.name == label.name) {
            return Err(self.error(
                ErrorKind::EarlyError,
                format!("Label '{}' has already been declared", label.name),
                label.span.start,
            ));
        }

        let is_loop = matches!(
            self.current.kind,
            TokenKind::For | TokenKind::While | TokenKind::Do
        );
        let body_start = self.current.start;
        // Chained labels (`a: b: while ...`) all refer to the same statement
        for outer in self.labels.iter_mut().rev() {
            if outer.statement_start != start.offset {
                break;
            }
            outer.statement_start = body_start;
            outer.is_loop = is_loop;
        }
        self.labels.push(Label {
            name: label.name.clone(),
            is_loop,
            statement_start: body_start,
        });

        let body_ctx = match ctx {
            StatementContext::List | StatementContext::Label => StatementContext::Label,
            _ => StatementContext::Other,
        };
        let body = self.parse_statement(body_ctx);
        self.labels.pop();
        Ok(Statement::Labeled(LabeledStatement {
            label,
            body: Box::new(body?),
            span: self.finish(start),
        }))
    }
}

/// `async` written as a plain identifier, not the start of an arrow or call
fn is_plain_async(expr: &Expression) -> bool {
    match expr {
        Expression::Identifier(id) => id.name == "async" && id.span.end - id.span.start == 5,
        _ => false,
    }
}
