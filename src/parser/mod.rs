//! Parser for ECMAScript source code
//!
//! Recursive descent for statements, precedence climbing for binary
//! operators. The parser owns its lexer and pulls one token at a time; the
//! only lookahead beyond the current token is `peek`, which scans ahead and
//! rewinds.
//!
//! The implementation is split across files by grammar area, all extending
//! the same `Parser`:
//! - `expr.rs`: expressions, literals, templates
//! - `pattern.rs`: cover-grammar reinterpretation and binding patterns
//! - `stmt.rs`: statements and variable declarations
//! - `function.rs`: functions, arrows, classes
//! - `module.rs`: imports and exports

mod context;
mod cover;
mod expr;
mod function;
mod module;
mod pattern;
mod scope;
mod stmt;

pub use context::Context;
pub use pattern::{BindingKind, to_pattern};

use std::mem;

use crate::ast::*;
use crate::error::{ErrorKind, ParseError};
use crate::lexer::{Lexer, Position, Token, TokenFlags, TokenKind, keyword, position_at};
use crate::options::ParseOptions;

use context::Label;
use cover::Site;
use module::ModuleExports;
use scope::{PrivateNames, ScopeFlags, ScopeStack};

/// Parser for one source text. Construct, then call [`Parser::parse_program`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    source: &'a str,
    options: ParseOptions,
    current: Token,
    previous: Token,
    context: Context,
    labels: Vec<Label>,
    scopes: ScopeStack,
    private_names: PrivateNames,
    exports: ModuleExports,
    depth: u32,
    /// Deepest level reached since the innermost `measured` call began
    peak: u32,
    /// First `yield` expression since the enclosing parameter list began
    yield_pos: Option<Site>,
    /// First `await` expression, same discipline as `yield_pos`
    await_pos: Option<Site>,
    /// First `await` used as an identifier; invalid if it turns out to be an
    /// async arrow parameter
    await_ident_pos: Option<Site>,
    /// Offset where an arrow function may start (beginning of an assignment
    /// expression)
    potential_arrow_at: Option<usize>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: &ParseOptions) -> Self {
        let mut lexer = Lexer::new(source);
        lexer.set_html_comments(!options.module && options.web_compat());
        Self {
            lexer,
            source,
            options: options.clone(),
            current: placeholder_token(),
            previous: placeholder_token(),
            context: Context::top_level(options.module, options.starts_strict()),
            labels: Vec::new(),
            scopes: ScopeStack::new(options.module),
            private_names: PrivateNames::default(),
            exports: ModuleExports::default(),
            depth: 0,
            peak: 0,
            yield_pos: None,
            await_pos: None,
            await_ident_pos: None,
            potential_arrow_at: None,
        }
    }

    /// Parse a complete program
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        self.advance()?;
        self.scopes.enter(ScopeFlags::TOP);

        let (body, _) = self.parse_directives_and_statements(false)?;
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected());
        }
        if self.options.module {
            self.check_local_exports()?;
        }
        self.scopes.exit();

        let span = self.make_span(
            0,
            Position::default(),
            self.source.len(),
            self.current.end_pos,
        );
        Ok(Program {
            body,
            source_type: if self.options.module {
                SourceType::Module
            } else {
                SourceType::Script
            },
            span,
        })
    }

    // ============ DIRECTIVES ============

    /// Statement list of a program or function body, with its directive
    /// prologue. Stops at `}` when `in_braces`, else at end of input.
    /// Returns the offset of a `"use strict"` directive if there is one.
    fn parse_directives_and_statements(
        &mut self,
        in_braces: bool,
    ) -> Result<(Vec<Statement>, Option<usize>), ParseError> {
        let mut body = Vec::new();
        let mut in_prologue = true;
        let mut use_strict_at = None;
        let mut octal_directive_at = None;

        while !self.check(&TokenKind::Eof) && !(in_braces && self.check(&TokenKind::RBrace)) {
            if !in_prologue || !matches!(self.current.kind, TokenKind::String(_)) {
                in_prologue = false;
                body.push(self.parse_statement_list_item()?);
                continue;
            }

            let (start, end, flags) = (self.current.start, self.current.end, self.current.flags);
            let mut statement = self.parse_statement_list_item()?;
            let Some(directive) = self.directive_text(&statement, start, end) else {
                in_prologue = false;
                body.push(statement);
                continue;
            };

            if flags.contains(TokenFlags::OCTAL_ESCAPE) {
                octal_directive_at.get_or_insert(start);
            }
            if directive == "use strict" {
                use_strict_at.get_or_insert(start);
                self.context |= Context::STRICT;
                if let Some(offset) = octal_directive_at {
                    return Err(self.error(
                        ErrorKind::Lexical,
                        "InvalidEscape: octal escape sequences are not allowed in strict mode",
                        offset,
                    ));
                }
            }
            if let Statement::Expression(expr_stmt) = &mut statement {
                expr_stmt.directive = Some(directive);
            }
            body.push(statement);
        }

        Ok((body, use_strict_at))
    }

    /// Raw contents of a directive: an expression statement that is exactly
    /// the string token spanning `start..end`.
    fn directive_text(&mut self, statement: &Statement, start: usize, end: usize) -> Option<crate::atom::Atom> {
        let Statement::Expression(ExpressionStatement {
            expression:
                Expression::Literal(Literal {
                    value: LiteralValue::String(_),
                    span,
                    ..
                }),
            ..
        }) = statement
        else {
            return None;
        };
        if span.start != start || span.end != end {
            return None;
        }
        let inner = self.source.get(start + 1..end - 1)?;
        Some(self.lexer.intern(inner))
    }

    // ============ TOKENS ============

    /// Move to the next token
    fn advance(&mut self) -> Result<(), ParseError> {
        let next = self.lexer.next_token()?;
        self.previous = mem::replace(&mut self.current, next);
        Ok(())
    }

    /// Token after the current one, without consuming anything
    fn peek(&mut self) -> Result<Token, ParseError> {
        let checkpoint = self.lexer.checkpoint();
        let next = self.lexer.next_token();
        self.lexer.restore(checkpoint);
        next
    }

    fn peek_is(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        let next = self.peek()?;
        Ok(mem::discriminant(&next.kind) == mem::discriminant(kind))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    /// Consume the current token if it is `kind`
    fn match_token(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn require_token(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.expected(kind))
        }
    }

    fn is_contextual(&self, word: &str) -> bool {
        self.current.is_contextual(word)
    }

    fn require_contextual(&mut self, word: &str) -> Result<(), ParseError> {
        if self.is_contextual(word) {
            self.advance()
        } else {
            Err(self.error_at_current(
                ErrorKind::UnexpectedToken,
                format!("Expected '{}' but found {}", word, self.current.kind.describe()),
            ))
        }
    }

    /// A semicolon may be inserted before the current token
    fn can_insert_semicolon(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof | TokenKind::RBrace)
            || self.current.had_newline_before()
    }

    /// Consume a statement-terminating `;`, or accept an inserted one.
    fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::Semicolon)? || self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Identifier name at the current token, keywords included
    /// (`a.if`, `{ class: 1 }`).
    fn current_identifier_name(&mut self) -> Option<crate::atom::Atom> {
        match &self.current.kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            kind => {
                let text = kind.keyword_text()?;
                Some(self.lexer.intern(text))
            }
        }
    }

    // ============ SPANS ============

    /// Start of the current token, for building a node span
    fn site(&self) -> Site {
        Site {
            offset: self.current.start,
            pos: self.current.start_pos,
        }
    }

    /// Span from `start` to the end of the last consumed token
    fn finish(&self, start: Site) -> Span {
        self.make_span(
            start.offset,
            start.pos,
            self.previous.end,
            self.previous.end_pos,
        )
    }

    fn make_span(&self, start: usize, start_pos: Position, end: usize, end_pos: Position) -> Span {
        if self.options.attach_loc {
            Span::with_loc(start, end, start_pos, end_pos)
        } else {
            Span::new(start, end)
        }
    }

    fn token_span(&self, token: &Token) -> Span {
        self.make_span(token.start, token.start_pos, token.end, token.end_pos)
    }

    /// Recover the start site of an already built node
    fn site_of(span: &Span) -> Site {
        Site {
            offset: span.start,
            pos: span.loc.map(|loc| loc.start).unwrap_or_default(),
        }
    }

    // ============ NESTING ============

    fn enter_nesting(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        self.peak = self.peak.max(self.depth);
        if self.depth > self.options.max_nesting_depth {
            return Err(self.nesting_error());
        }
        Ok(())
    }

    fn nesting_error(&self) -> ParseError {
        self.error_at_current(
            ErrorKind::NestingLimit,
            format!(
                "Nesting deeper than {} levels",
                self.options.max_nesting_depth
            ),
        )
    }

    fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `f` one nesting level deeper
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.enter_nesting()?;
        let result = f(self);
        self.leave_nesting();
        result
    }

    /// Start measuring the height of the tree parsed from here on
    fn start_measure(&mut self) -> u32 {
        mem::replace(&mut self.peak, self.depth)
    }

    /// Levels below the current one reached since `start_measure`
    fn end_measure(&mut self, saved_peak: u32) -> u32 {
        let height = self.peak.saturating_sub(self.depth);
        self.peak = self.peak.max(saved_peak);
        height
    }

    /// Run `f` and report how many levels deep the tree it built is
    fn measured<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<(T, u32), ParseError> {
        let saved_peak = self.start_measure();
        let result = f(self);
        let height = self.end_measure(saved_peak);
        result.map(|value| (value, height))
    }

    /// Account for an operator or member chain `height` links tall
    ///
    /// Left-associative chains are built by loops rather than recursion, but
    /// the tree they produce is as deep as the chain is long.
    fn grow_chain(&mut self, height: u32) -> Result<(), ParseError> {
        let level = self.depth.saturating_add(height);
        self.peak = self.peak.max(level);
        if level > self.options.max_nesting_depth {
            return Err(self.nesting_error());
        }
        Ok(())
    }

    // ============ ERRORS ============

    fn error(&self, kind: ErrorKind, message: impl Into<String>, offset: usize) -> ParseError {
        ParseError::new(kind, message, offset, position_at(self.source, offset))
    }

    fn error_at_current(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message, self.current.start, self.current.start_pos)
    }

    fn error_at_site(&self, kind: ErrorKind, message: impl Into<String>, site: Site) -> ParseError {
        ParseError::new(kind, message, site.offset, site.pos)
    }

    /// Errors built outside the parser (pattern conversion) only know their
    /// offset reliably; recompute line and column from the source.
    fn relocate(&self, mut err: ParseError) -> ParseError {
        let pos = position_at(self.source, err.position.offset);
        err.position.line = pos.line;
        err.position.column = pos.column;
        err
    }

    fn unexpected(&self) -> ParseError {
        let message = match &self.current.kind {
            TokenKind::Eof => "Unexpected end of input".to_string(),
            kind => format!("Unexpected token {}", kind.describe()),
        };
        self.error_at_current(ErrorKind::UnexpectedToken, message)
    }

    fn expected(&self, kind: &TokenKind) -> ParseError {
        let wanted = kind
            .punctuator_text()
            .or_else(|| kind.keyword_text())
            .map(|text| format!("'{}'", text))
            .unwrap_or_else(|| kind.describe());
        self.error_at_current(
            ErrorKind::UnexpectedToken,
            format!("Expected {} but found {}", wanted, self.current.kind.describe()),
        )
    }

    // ============ IDENTIFIERS ============

    /// Validate an identifier used as a reference or label in the current
    /// context.
    fn check_identifier_reference(&mut self, name: &str, site: Site) -> Result<(), ParseError> {
        if let Some((kind, message)) =
            identifier_error(name, self.context, self.options.web_compat())
        {
            return Err(self.error_at_site(kind, message, site));
        }
        if name == "await" {
            self.await_ident_pos.get_or_insert(site);
        }
        Ok(())
    }

    /// Parse an identifier reference (`x` in `x + 1`)
    fn parse_identifier_reference(&mut self) -> Result<Identifier, ParseError> {
        let site = self.site();
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.unexpected());
        };
        let name = name.clone();
        self.check_identifier_reference(&name, site)?;
        self.advance()?;
        Ok(Identifier {
            name,
            span: self.finish(site),
        })
    }

    /// Identifier name after `.`, in property keys and module export names;
    /// reserved words allowed.
    fn parse_identifier_name(&mut self) -> Result<Identifier, ParseError> {
        let site = self.site();
        let Some(name) = self.current_identifier_name() else {
            return Err(self.unexpected());
        };
        self.advance()?;
        Ok(Identifier {
            name,
            span: self.finish(site),
        })
    }
}

fn placeholder_token() -> Token {
    Token {
        kind: TokenKind::Eof,
        start: 0,
        end: 0,
        start_pos: Position::default(),
        end_pos: Position::default(),
        flags: TokenFlags::empty(),
    }
}

/// Words reserved only in strict mode code
pub(crate) fn is_strict_reserved(name: &str) -> bool {
    matches!(
        name,
        "implements"
            | "interface"
            | "let"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "static"
            | "yield"
    )
}

/// Why `name` cannot be an identifier reference under `ctx`, if it cannot.
/// Unescaped reserved words never reach this point: the lexer makes them
/// keyword tokens.
pub(crate) fn identifier_error(
    name: &str,
    ctx: Context,
    web_compat: bool,
) -> Option<(ErrorKind, String)> {
    if keyword(name).is_some() {
        return Some((
            ErrorKind::ReservedWord,
            format!("Keyword '{}' must not contain escaped characters", name),
        ));
    }
    match name {
        "yield" if ctx.has_yield() => Some((
            ErrorKind::ReservedWord,
            "Cannot use 'yield' as an identifier inside a generator".to_string(),
        )),
        "await" if ctx.has_await() => Some((
            ErrorKind::ReservedWord,
            "Cannot use 'await' as an identifier inside an async function".to_string(),
        )),
        "await" if ctx.is_module() => Some((
            ErrorKind::ReservedWord,
            "'await' is reserved in module code".to_string(),
        )),
        "await" if ctx.contains(Context::STATIC_BLOCK) => Some((
            ErrorKind::EarlyError,
            "Cannot use 'await' in a class static block".to_string(),
        )),
        "arguments" if ctx.intersects(Context::CLASS_FIELD_INIT | Context::STATIC_BLOCK) => {
            Some((
                ErrorKind::EarlyError,
                "'arguments' is not allowed in class field initializers or static blocks"
                    .to_string(),
            ))
        }
        _ if ctx.is_strict() && is_strict_reserved(name) => Some((
            ErrorKind::ReservedWord,
            format!("'{}' is a reserved word in strict mode", name),
        )),
        "let" if !web_compat => Some((
            ErrorKind::ReservedWord,
            "'let' cannot be used as an identifier".to_string(),
        )),
        _ => None,
    }
}
