//! Functions, arrow functions, methods and classes

use std::mem;

use rustc_hash::FxHashSet;

use crate::ast::*;
use crate::error::{ErrorKind, ParseError};
use crate::lexer::TokenKind;

use super::Parser;
use super::context::Context;
use super::cover::{CoverErrors, Site};
use super::pattern::{BindingKind, binding_name_error};
use super::scope::{BindingType, PrivateKind, ScopeFlags};

/// Which special forms a function body may use, beyond those of an
/// ordinary function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FunctionFlavor {
    Ordinary,
    /// Object or class method: `super.x`, unique parameters
    Method,
    /// Constructor of a class with `extends`: also `super()`
    DerivedConstructor,
}

/// Parser state that does not cross a function boundary
struct FunctionFrame {
    context: Context,
    labels: Vec<super::context::Label>,
    yield_pos: Option<Site>,
    await_pos: Option<Site>,
    await_ident_pos: Option<Site>,
}

impl<'a> Parser<'a> {
    fn enter_function(&mut self, context: Context, scope: ScopeFlags) -> FunctionFrame {
        let frame = FunctionFrame {
            context: self.context,
            labels: mem::take(&mut self.labels),
            yield_pos: self.yield_pos.take(),
            await_pos: self.await_pos.take(),
            await_ident_pos: self.await_ident_pos.take(),
        };
        self.context = context;
        self.scopes.enter(scope);
        frame
    }

    fn leave_function(&mut self, frame: FunctionFrame) {
        self.scopes.exit();
        self.context = frame.context;
        self.labels = frame.labels;
        self.yield_pos = frame.yield_pos;
        self.await_pos = frame.await_pos;
        self.await_ident_pos = frame.await_ident_pos;
    }

    // ============ FUNCTIONS ============

    /// `function` expression; `start` covers a preceding `async`
    pub(super) fn parse_function_expression(
        &mut self,
        start: Site,
        is_async: bool,
    ) -> Result<Function, ParseError> {
        self.require_token(&TokenKind::Function)?;
        let generator = self.match_token(&TokenKind::Star)?;

        // The name of a function expression lives in the function's own
        // grammar context
        let id = if matches!(self.current.kind, TokenKind::Identifier(_)) {
            let outer = self.context;
            self.context = outer.function_body(generator, is_async);
            let id = self.parse_binding_identifier(BindingKind::Var);
            self.context = outer;
            Some(id?)
        } else {
            None
        };
        self.parse_function_rest(start, id, generator, is_async, FunctionFlavor::Ordinary)
    }

    /// `function` declaration. The name is declared in the current scope
    /// unless `declare` is off (an Annex B function in an `if` branch has no
    /// scope of its own to live in). Without `name_required` the name may
    /// be missing (`export default function () {}`).
    pub(super) fn parse_function_declaration(
        &mut self,
        start: Site,
        is_async: bool,
        name_required: bool,
        declare: bool,
    ) -> Result<Function, ParseError> {
        self.require_token(&TokenKind::Function)?;
        let generator = self.match_token(&TokenKind::Star)?;

        let id = if matches!(self.current.kind, TokenKind::Identifier(_)) {
            Some(self.parse_binding_identifier(BindingKind::Var)?)
        } else if name_required {
            return Err(self.unexpected());
        } else {
            None
        };

        if let (Some(id), true) = (&id, declare) {
            let binding = self.function_binding_type(generator, is_async);
            self.declare_name(id, binding)?;
        }
        self.parse_function_rest(start, id, generator, is_async, FunctionFlavor::Ordinary)
    }

    /// How a function declaration binds its name in the current scope
    fn function_binding_type(&self, generator: bool, is_async: bool) -> BindingType {
        let as_var = self.scopes.current_treats_functions_as_var();
        if self.context.is_strict() || generator || is_async {
            if as_var {
                BindingType::Var
            } else {
                BindingType::Lexical
            }
        } else if as_var || self.options.web_compat() {
            BindingType::Function
        } else {
            BindingType::Lexical
        }
    }

    /// Declare `id` in the current scope, failing on a conflict
    pub(super) fn declare_name(&mut self, id: &Identifier, binding: BindingType) -> Result<(), ParseError> {
        if self.scopes.declare(&id.name, binding) {
            Ok(())
        } else {
            Err(self.error(
                ErrorKind::DuplicateBinding,
                format!("Identifier '{}' has already been declared", id.name),
                id.span.start,
            ))
        }
    }

    /// Parameters and body of a function whose name (if any) is parsed
    fn parse_function_rest(
        &mut self,
        start: Site,
        id: Option<Identifier>,
        generator: bool,
        is_async: bool,
        flavor: FunctionFlavor,
    ) -> Result<Function, ParseError> {
        let mut context = self.context.function_body(generator, is_async);
        match flavor {
            FunctionFlavor::Ordinary => {}
            FunctionFlavor::Method => context |= Context::SUPER_PROPERTY,
            FunctionFlavor::DerivedConstructor => {
                context |= Context::SUPER_PROPERTY | Context::SUPER_CALL
            }
        }
        let frame = self.enter_function(context, ScopeFlags::FUNCTION);

        let params = self.parse_formal_parameters()?;
        self.check_function_parameter_positions()?;

        let body_start = self.site();
        self.require_token(&TokenKind::LBrace)?;
        let (body, use_strict_at) = self.nested(|p| p.parse_directives_and_statements(true))?;
        let simple = params.iter().all(Pattern::is_simple_parameter);
        if let (Some(offset), false) = (use_strict_at, simple) {
            return Err(self.error(
                ErrorKind::EarlyError,
                "Illegal 'use strict' directive in function with non-simple parameter list",
                offset,
            ));
        }
        self.require_token(&TokenKind::RBrace)?;

        let unique = self.context.is_strict() || !simple || flavor != FunctionFlavor::Ordinary;
        self.check_parameter_names(&params, unique)?;
        if use_strict_at.is_some() {
            if let Some(id) = &id {
                self.check_strict_function_name(id)?;
            }
        }

        let body = FunctionBody {
            body,
            span: self.finish(body_start),
        };
        self.leave_function(frame);
        Ok(Function {
            id,
            params,
            body,
            generator,
            async_: is_async,
            span: self.finish(start),
        })
    }

    fn parse_formal_parameters(&mut self) -> Result<Vec<Pattern>, ParseError> {
        self.require_token(&TokenKind::LParen)?;
        let params = self.with_in(true, |p| {
            let mut params = Vec::new();
            while !p.check(&TokenKind::RParen) {
                if p.check(&TokenKind::DotDotDot) {
                    params.push(p.parse_rest_parameter()?);
                    if !p.check(&TokenKind::RParen) {
                        return Err(p.error_at_current(
                            ErrorKind::UnexpectedToken,
                            "Rest parameter must be last formal parameter",
                        ));
                    }
                    break;
                }
                params.push(p.parse_binding_element(BindingKind::Param)?);
                if !p.check(&TokenKind::RParen) {
                    p.require_token(&TokenKind::Comma)?;
                }
            }
            Ok(params)
        })?;
        self.require_token(&TokenKind::RParen)?;
        self.declare_parameters(&params);
        Ok(params)
    }

    /// Parameters are plain `var` bindings of the function scope; duplicates
    /// are checked separately once strictness is known.
    fn declare_parameters(&mut self, params: &[Pattern]) {
        for param in params {
            for id in param.bound_names() {
                self.scopes.declare(&id.name, BindingType::Var);
            }
        }
    }

    fn check_function_parameter_positions(&self) -> Result<(), ParseError> {
        if let Some(site) = self.yield_pos {
            return Err(self.error_at_site(
                ErrorKind::EarlyError,
                "Yield expression not allowed in formal parameters",
                site,
            ));
        }
        if let Some(site) = self.await_pos {
            return Err(self.error_at_site(
                ErrorKind::EarlyError,
                "Await expression not allowed in formal parameters",
                site,
            ));
        }
        Ok(())
    }

    /// Validate parameter names against the final context of the body,
    /// which a `"use strict"` directive may have changed.
    fn check_parameter_names(&self, params: &[Pattern], unique: bool) -> Result<(), ParseError> {
        let mut seen = FxHashSet::default();
        for id in params.iter().flat_map(Pattern::bound_names) {
            if let Some((kind, message)) = binding_name_error(
                &id.name,
                BindingKind::Param,
                self.context,
                self.options.web_compat(),
            ) {
                return Err(self.error(kind, message, id.span.start));
            }
            if unique && !seen.insert(id.name.clone()) {
                return Err(self.error(
                    ErrorKind::DuplicateBinding,
                    "Duplicate parameter name not allowed in this context",
                    id.span.start,
                ));
            }
        }
        Ok(())
    }

    fn check_strict_function_name(&self, id: &Identifier) -> Result<(), ParseError> {
        match binding_name_error(&id.name, BindingKind::Var, Context::STRICT, true) {
            Some((kind, message)) => Err(self.error(kind, message, id.span.start)),
            None => Ok(()),
        }
    }

    // ============ ARROWS ============

    /// Body of an arrow function whose parameters are already parsed; the
    /// current token is `=>`.
    pub(super) fn parse_arrow_function(
        &mut self,
        start: Site,
        params: Vec<Pattern>,
        is_async: bool,
    ) -> Result<Expression, ParseError> {
        if self.current.had_newline_before() {
            return Err(self.error_at_current(
                ErrorKind::RestrictedProduction,
                "Line terminator not permitted before arrow",
            ));
        }
        self.require_token(&TokenKind::Arrow)?;

        let outer_in = self.context.has_in();
        let context = self.context.arrow_body(is_async);
        let frame = self.enter_function(context, ScopeFlags::FUNCTION | ScopeFlags::ARROW);
        self.declare_parameters(&params);
        let simple = params.iter().all(Pattern::is_simple_parameter);

        let body = if self.check(&TokenKind::LBrace) {
            let body_start = self.site();
            self.advance()?;
            let (body, use_strict_at) = self.nested(|p| p.parse_directives_and_statements(true))?;
            if let (Some(offset), false) = (use_strict_at, simple) {
                return Err(self.error(
                    ErrorKind::EarlyError,
                    "Illegal 'use strict' directive in function with non-simple parameter list",
                    offset,
                ));
            }
            self.require_token(&TokenKind::RBrace)?;
            ArrowFunctionBody::Block(FunctionBody {
                body,
                span: self.finish(body_start),
            })
        } else {
            self.context.set(Context::IN, outer_in);
            ArrowFunctionBody::Expression(Box::new(self.parse_assignment()?))
        };

        self.check_parameter_names(&params, true)?;
        self.leave_function(frame);
        Ok(Expression::ArrowFunction(Box::new(ArrowFunctionExpression {
            params,
            body,
            async_: is_async,
            span: self.finish(start),
        })))
    }

    // ============ METHODS ============

    /// Parameters and body of an object or class method; the current token
    /// is `(`. Accessor arity is checked here.
    pub(super) fn parse_method(
        &mut self,
        is_async: bool,
        generator: bool,
        kind: MethodKind,
        derived_constructor: bool,
    ) -> Result<Box<Function>, ParseError> {
        let start = self.site();
        let flavor = if derived_constructor {
            FunctionFlavor::DerivedConstructor
        } else {
            FunctionFlavor::Method
        };
        let function = self.parse_function_rest(start, None, generator, is_async, flavor)?;
        match kind {
            MethodKind::Get if !function.params.is_empty() => {
                return Err(self.error_at_site(
                    ErrorKind::EarlyError,
                    "Getter must not have any formal parameters",
                    start,
                ));
            }
            MethodKind::Set
                if function.params.len() != 1
                    || matches!(function.params.first(), Some(Pattern::Rest(_))) =>
            {
                return Err(self.error_at_site(
                    ErrorKind::EarlyError,
                    "Setter must have exactly one formal parameter",
                    start,
                ));
            }
            _ => {}
        }
        Ok(Box::new(function))
    }

    // ============ CLASSES ============

    /// Class declaration or expression. A declaration needs a name unless
    /// `name_optional` (`export default class {}`); the caller declares it.
    pub(super) fn parse_class(
        &mut self,
        is_declaration: bool,
        name_optional: bool,
    ) -> Result<Class, ParseError> {
        let start = self.site();
        self.require_token(&TokenKind::Class)?;

        // All parts of a class are strict mode code
        let outer = self.context;
        self.context |= Context::STRICT;

        let id = if matches!(self.current.kind, TokenKind::Identifier(_)) {
            Some(self.parse_binding_identifier(BindingKind::Let)?)
        } else if is_declaration && !name_optional {
            return Err(self.unexpected());
        } else {
            None
        };

        let super_class = if self.match_token(&TokenKind::Extends)? {
            let heritage_start = self.site();
            let mut cover = CoverErrors::default();
            let heritage = self.nested(|p| p.parse_left_hand_side(&mut cover))?;
            if let Some(err) = cover.expression_error(heritage_start.offset) {
                return Err(err);
            }
            Some(Box::new(heritage))
        } else {
            None
        };

        let derived = super_class.is_some();
        let body = self.nested(|p| p.parse_class_body(derived))?;
        self.context = outer;
        Ok(Class {
            id,
            super_class,
            body,
            span: self.finish(start),
        })
    }

    fn parse_class_body(&mut self, derived: bool) -> Result<ClassBody, ParseError> {
        let start = self.site();
        self.require_token(&TokenKind::LBrace)?;
        self.private_names.enter();

        let mut body = Vec::new();
        let mut has_constructor = false;
        while !self.check(&TokenKind::RBrace) {
            if self.match_token(&TokenKind::Semicolon)? {
                continue;
            }
            let element = self.parse_class_element(derived)?;
            if let ClassElement::Method(method) = &element {
                if method.kind == MethodKind::Constructor {
                    if has_constructor {
                        return Err(self.error(
                            ErrorKind::EarlyError,
                            "A class may only have one constructor",
                            method.span.start,
                        ));
                    }
                    has_constructor = true;
                }
            }
            body.push(element);
        }
        self.require_token(&TokenKind::RBrace)?;

        if let Some((name, offset)) = self.private_names.exit() {
            return Err(self.error(
                ErrorKind::EarlyError,
                format!("Private field '#{}' must be declared in an enclosing class", name),
                offset,
            ));
        }
        Ok(ClassBody {
            body,
            span: self.finish(start),
        })
    }

    fn parse_class_element(&mut self, derived: bool) -> Result<ClassElement, ParseError> {
        let start = self.site();
        let mut is_static = false;
        let mut is_async = false;
        let mut generator = false;
        let mut kind = MethodKind::Method;

        if self.is_contextual("static") {
            let next = self.peek()?;
            if next.kind == TokenKind::LBrace {
                self.advance()?;
                return self.parse_static_block(start);
            }
            if starts_class_element_name(&next.kind) || next.kind == TokenKind::Star {
                is_static = true;
                self.advance()?;
            }
        }
        if self.is_contextual("async") {
            let next = self.peek()?;
            if (starts_class_element_name(&next.kind) || next.kind == TokenKind::Star)
                && !next.had_newline_before()
            {
                is_async = true;
                self.advance()?;
            }
        }
        if self.match_token(&TokenKind::Star)? {
            generator = true;
        }
        if !is_async && !generator && (self.is_contextual("get") || self.is_contextual("set")) {
            let next = self.peek()?;
            if starts_class_element_name(&next.kind) {
                kind = if self.is_contextual("get") {
                    MethodKind::Get
                } else {
                    MethodKind::Set
                };
                self.advance()?;
            }
        }

        let key = self.parse_property_key(true)?;
        let private_name = match &key {
            PropertyKey::PrivateIdentifier(id) => Some(id.clone()),
            _ => None,
        };
        if let Some(id) = &private_name {
            if id.name == "constructor" {
                return Err(self.error(
                    ErrorKind::EarlyError,
                    "Classes may not have a private element named '#constructor'",
                    id.span.start,
                ));
            }
        }
        let key_name = key.static_name();
        if is_static && key_name == Some("prototype") {
            return Err(self.error(
                ErrorKind::EarlyError,
                "Classes may not have a static property named 'prototype'",
                key.span().start,
            ));
        }

        let is_method =
            self.check(&TokenKind::LParen) || kind != MethodKind::Method || is_async || generator;
        if is_method {
            let is_constructor = !is_static && key_name == Some("constructor");
            if is_constructor {
                let problem = if kind != MethodKind::Method {
                    Some("Class constructor may not be an accessor")
                } else if generator {
                    Some("Class constructor may not be a generator")
                } else if is_async {
                    Some("Class constructor may not be an async method")
                } else {
                    None
                };
                if let Some(message) = problem {
                    return Err(self.error(ErrorKind::EarlyError, message, key.span().start));
                }
            }
            if let Some(id) = &private_name {
                let private_kind = match kind {
                    MethodKind::Get => PrivateKind::Getter,
                    MethodKind::Set => PrivateKind::Setter,
                    _ => PrivateKind::Method,
                };
                self.declare_private(id, private_kind, is_static)?;
            }
            let value = self.parse_method(is_async, generator, kind, is_constructor && derived)?;
            return Ok(ClassElement::Method(MethodDefinition {
                key,
                value,
                kind: if is_constructor {
                    MethodKind::Constructor
                } else {
                    kind
                },
                static_: is_static,
                span: self.finish(start),
            }));
        }

        if key_name == Some("constructor") {
            return Err(self.error(
                ErrorKind::EarlyError,
                "Classes may not have a field named 'constructor'",
                key.span().start,
            ));
        }
        if let Some(id) = &private_name {
            self.declare_private(id, PrivateKind::Field, is_static)?;
        }
        let value = if self.match_token(&TokenKind::Eq)? {
            let frame = self.enter_function(self.context.class_member(false), ScopeFlags::FUNCTION);
            let value = self.parse_assignment();
            self.leave_function(frame);
            Some(value?)
        } else {
            None
        };
        self.expect_semicolon()?;
        Ok(ClassElement::Property(PropertyDefinition {
            key,
            value,
            static_: is_static,
            span: self.finish(start),
        }))
    }

    fn declare_private(
        &mut self,
        id: &PrivateIdentifier,
        kind: PrivateKind,
        is_static: bool,
    ) -> Result<(), ParseError> {
        if self.private_names.declare(&id.name, kind, is_static) {
            Ok(())
        } else {
            Err(self.error(
                ErrorKind::EarlyError,
                format!("Identifier '#{}' has already been declared", id.name),
                id.span.start,
            ))
        }
    }

    /// `static { ... }`; `static` is consumed
    fn parse_static_block(&mut self, start: Site) -> Result<ClassElement, ParseError> {
        self.require_token(&TokenKind::LBrace)?;
        let frame = self.enter_function(self.context.class_member(true), ScopeFlags::STATIC_BLOCK);
        let body = self.nested(|p| {
            let mut body = Vec::new();
            while !p.check(&TokenKind::RBrace) {
                body.push(p.parse_statement_list_item()?);
            }
            Ok(body)
        })?;
        self.advance()?;
        self.leave_function(frame);
        Ok(ClassElement::StaticBlock(StaticBlock {
            body,
            span: self.finish(start),
        }))
    }
}

/// Tokens that can start a class element name after a modifier
fn starts_class_element_name(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::PrivateName(_)
            | TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::BigInt(_)
            | TokenKind::LBracket
    ) || kind.is_keyword()
}
