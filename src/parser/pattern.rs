//! Patterns
//!
//! Two routes lead to a [`Pattern`]. Declarations and function parameters
//! are parsed as binding patterns directly. Assignment targets and arrow
//! parameters are first parsed as expressions, then reinterpreted here once
//! the parser sees `=` or `=>`.

use crate::ast::*;
use crate::error::{ErrorKind, ParseError};
use crate::lexer::{Position, TokenKind};
use crate::options::ParseOptions;

use super::context::Context;
use super::{Parser, identifier_error};

/// What a pattern is being built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    /// Function or arrow parameter
    Param,
    CatchParam,
    /// Target of `=` or of a `for-in/of` head without a declaration
    Assignment,
}

impl BindingKind {
    fn is_binding(self) -> bool {
        self != BindingKind::Assignment
    }
}

/// Reinterpret an expression as a pattern, checked against the context the
/// options describe.
///
/// ```
/// use esparse::ast::{Expression, Pattern, Statement};
/// use esparse::{BindingKind, ParseOptions, parse_script, to_pattern};
///
/// let program = parse_script("[a, { b }]").unwrap();
/// let Statement::Expression(stmt) = &program.body[0] else { unreachable!() };
/// let pattern = to_pattern(stmt.expression.clone(), BindingKind::Let, &ParseOptions::default()).unwrap();
/// assert!(matches!(pattern, Pattern::Array(_)));
///
/// let program = parse_script("a + b").unwrap();
/// let Statement::Expression(stmt) = &program.body[0] else { unreachable!() };
/// assert!(to_pattern(stmt.expression.clone(), BindingKind::Assignment, &ParseOptions::default()).is_err());
/// ```
pub fn to_pattern(
    expr: Expression,
    kind: BindingKind,
    options: &ParseOptions,
) -> Result<Pattern, ParseError> {
    let ctx = Context::top_level(options.module, options.strict);
    expression_to_pattern(expr, kind, ctx, options.web_compat())
}

pub(crate) fn expression_to_pattern(
    expr: Expression,
    kind: BindingKind,
    ctx: Context,
    web_compat: bool,
) -> Result<Pattern, ParseError> {
    // A parameter is a binding element: `a = 1` there is a default value
    let element = kind == BindingKind::Param;
    Reinterpreter {
        kind,
        ctx,
        web_compat,
    }
    .convert(expr, element)
}

/// Why `name` cannot be bound by a declaration of `kind`, if it cannot.
pub(crate) fn binding_name_error(
    name: &str,
    kind: BindingKind,
    ctx: Context,
    web_compat: bool,
) -> Option<(ErrorKind, String)> {
    if let Some(err) = identifier_error(name, ctx, web_compat) {
        return Some(err);
    }
    if ctx.is_strict() && matches!(name, "eval" | "arguments") {
        return Some((
            ErrorKind::ReservedWord,
            format!("Binding '{}' in strict mode", name),
        ));
    }
    if matches!(kind, BindingKind::Let | BindingKind::Const) && name == "let" {
        return Some((
            ErrorKind::ReservedWord,
            "'let' is disallowed as a lexically bound name".to_string(),
        ));
    }
    None
}

fn span_error(kind: ErrorKind, message: impl Into<String>, span: Span) -> ParseError {
    let pos = span.loc.map(|loc| loc.start).unwrap_or_else(Position::default);
    ParseError::new(kind, message, span.start, pos)
}

struct Reinterpreter {
    kind: BindingKind,
    ctx: Context,
    web_compat: bool,
}

impl Reinterpreter {
    fn convert(&self, expr: Expression, nested: bool) -> Result<Pattern, ParseError> {
        match expr {
            Expression::Identifier(id) => {
                self.check_name(&id)?;
                Ok(Pattern::Identifier(id))
            }
            Expression::Member(member) if self.kind == BindingKind::Assignment => {
                Ok(Pattern::Member(member))
            }
            Expression::Array(array) => self.convert_array(array),
            Expression::Object(object) => self.convert_object(object),
            Expression::Assignment(assign) if nested => {
                if assign.operator != AssignmentOp::Assign {
                    return Err(self.invalid(assign.span, nested));
                }
                let left = if self.kind.is_binding() {
                    self.revalidate(*assign.left)?
                } else {
                    *assign.left
                };
                Ok(Pattern::Assignment(AssignmentPattern {
                    left: Box::new(left),
                    right: assign.right,
                    span: assign.span,
                }))
            }
            Expression::Parenthesized(paren) if self.kind == BindingKind::Assignment => {
                // Only simple targets may be parenthesized: `(a) = 1`, `[(a.b)] = c`
                let span = paren.span;
                let mut inner = *paren.expression;
                while let Expression::Parenthesized(p) = inner {
                    inner = *p.expression;
                }
                match inner {
                    Expression::Identifier(id) => {
                        self.check_name(&id)?;
                        Ok(Pattern::Identifier(id))
                    }
                    Expression::Member(member) => Ok(Pattern::Member(member)),
                    _ => Err(self.invalid(span, nested)),
                }
            }
            other => Err(self.invalid(other.span(), nested)),
        }
    }

    fn convert_array(&self, array: ArrayExpression) -> Result<Pattern, ParseError> {
        let count = array.elements.len();
        let mut elements = Vec::with_capacity(count);
        for (i, element) in array.elements.into_iter().enumerate() {
            let pattern = match element {
                None => None,
                Some(ArrayElement::Expression(expr)) => Some(self.convert(expr, true)?),
                Some(ArrayElement::Spread(spread)) => {
                    if i + 1 != count {
                        return Err(span_error(
                            self.nested_kind(),
                            "Rest element must be last element",
                            spread.span,
                        ));
                    }
                    Some(Pattern::Rest(self.convert_rest(spread, false)?))
                }
            };
            elements.push(pattern);
        }
        Ok(Pattern::Array(ArrayPattern {
            elements,
            span: array.span,
        }))
    }

    fn convert_object(&self, object: ObjectExpression) -> Result<Pattern, ParseError> {
        let count = object.properties.len();
        let mut properties = Vec::with_capacity(count);
        for (i, property) in object.properties.into_iter().enumerate() {
            match property {
                ObjectProperty::Spread(spread) => {
                    if i + 1 != count {
                        return Err(span_error(
                            self.nested_kind(),
                            "Rest element must be last element",
                            spread.span,
                        ));
                    }
                    properties.push(ObjectPatternProperty::Rest(self.convert_rest(spread, true)?));
                }
                ObjectProperty::Property(prop) => {
                    if prop.kind != PropertyKind::Init || prop.method {
                        return Err(self.invalid(prop.span, true));
                    }
                    let value = self.convert(prop.value, true)?;
                    properties.push(ObjectPatternProperty::Property(AssignmentProperty {
                        key: prop.key,
                        value,
                        shorthand: prop.shorthand,
                        span: prop.span,
                    }));
                }
            }
        }
        Ok(Pattern::Object(ObjectPattern {
            properties,
            span: object.span,
        }))
    }

    /// `...x`: no default, and inside an object only a simple target
    fn convert_rest(&self, spread: SpreadElement, in_object: bool) -> Result<RestElement, ParseError> {
        let argument = self.convert(*spread.argument, true)?;
        match &argument {
            Pattern::Assignment(_) => {
                return Err(span_error(
                    self.nested_kind(),
                    "Rest element may not have a default initializer",
                    argument.span(),
                ));
            }
            Pattern::Object(_) | Pattern::Array(_) if in_object => {
                return Err(span_error(
                    self.nested_kind(),
                    "`...` must be followed by an assignable reference in an object pattern",
                    argument.span(),
                ));
            }
            _ => {}
        }
        Ok(RestElement {
            argument: Box::new(argument),
            span: spread.span,
        })
    }

    /// Re-check a pattern built for assignment as a binding pattern: no
    /// member targets, and every name must be bindable.
    fn revalidate(&self, pattern: Pattern) -> Result<Pattern, ParseError> {
        if let Pattern::Member(member) = &pattern {
            return Err(self.invalid(member.span, true));
        }
        for id in pattern.bound_names() {
            self.check_name(id)?;
        }
        if has_member_target(&pattern) {
            return Err(self.invalid(pattern.span(), true));
        }
        Ok(pattern)
    }

    fn check_name(&self, id: &Identifier) -> Result<(), ParseError> {
        if self.kind.is_binding() {
            if let Some((kind, message)) =
                binding_name_error(&id.name, self.kind, self.ctx, self.web_compat)
            {
                return Err(span_error(kind, message, id.span));
            }
        } else if self.ctx.is_strict() && matches!(id.name.as_str(), "eval" | "arguments") {
            return Err(span_error(
                ErrorKind::ReservedWord,
                format!("Assigning to '{}' in strict mode", id.name),
                id.span,
            ));
        }
        Ok(())
    }

    fn nested_kind(&self) -> ErrorKind {
        match self.kind {
            BindingKind::Param => ErrorKind::InvalidArrowParameters,
            _ => ErrorKind::InvalidDestructuringTarget,
        }
    }

    fn invalid(&self, span: Span, nested: bool) -> ParseError {
        match self.kind {
            BindingKind::Param => span_error(
                ErrorKind::InvalidArrowParameters,
                "Invalid arrow function parameter",
                span,
            ),
            BindingKind::Assignment if !nested => span_error(
                ErrorKind::InvalidAssignmentTarget,
                "Invalid left-hand side in assignment",
                span,
            ),
            _ => span_error(
                ErrorKind::InvalidDestructuringTarget,
                "Invalid destructuring assignment target",
                span,
            ),
        }
    }
}

fn has_member_target(pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Identifier(_) => false,
        Pattern::Member(_) => true,
        Pattern::Object(object) => object.properties.iter().any(|prop| match prop {
            ObjectPatternProperty::Property(p) => has_member_target(&p.value),
            ObjectPatternProperty::Rest(r) => has_member_target(&r.argument),
        }),
        Pattern::Array(array) => array.elements.iter().flatten().any(has_member_target),
        Pattern::Rest(rest) => has_member_target(&rest.argument),
        Pattern::Assignment(assign) => has_member_target(&assign.left),
    }
}

impl<'a> Parser<'a> {
    // ============ REINTERPRETATION ============

    /// Turn a parsed expression into a pattern of `kind` in the current context
    pub(super) fn reinterpret(&self, expr: Expression, kind: BindingKind) -> Result<Pattern, ParseError> {
        expression_to_pattern(expr, kind, self.context, self.options.web_compat())
            .map_err(|err| self.relocate(err))
    }

    /// Target of a compound assignment (`a += 1`): identifier or member only
    pub(super) fn simple_assignment_target(&self, expr: Expression) -> Result<Pattern, ParseError> {
        self.check_simple_target(&expr, "assignment")?;
        let mut inner = expr;
        while let Expression::Parenthesized(paren) = inner {
            inner = *paren.expression;
        }
        match inner {
            Expression::Identifier(id) => Ok(Pattern::Identifier(id)),
            Expression::Member(member) => Ok(Pattern::Member(member)),
            other => Err(self.error(
                ErrorKind::InvalidAssignmentTarget,
                "Invalid left-hand side in assignment",
                other.span().start,
            )),
        }
    }

    // ============ BINDING PATTERNS ============

    /// Identifier, array pattern or object pattern, without a default
    pub(super) fn parse_binding_target(&mut self, kind: BindingKind) -> Result<Pattern, ParseError> {
        self.enter_nesting()?;
        let result = match self.current.kind {
            TokenKind::LBracket => self.parse_array_binding(kind),
            TokenKind::LBrace => self.parse_object_binding(kind),
            TokenKind::Identifier(_) => self.parse_binding_identifier(kind).map(Pattern::Identifier),
            _ => Err(self.unexpected()),
        };
        self.leave_nesting();
        result
    }

    /// Binding target with an optional `= default`
    pub(super) fn parse_binding_element(&mut self, kind: BindingKind) -> Result<Pattern, ParseError> {
        let start = self.site();
        let target = self.parse_binding_target(kind)?;
        if !self.match_token(&TokenKind::Eq)? {
            return Ok(target);
        }
        let right = self.with_in(true, |p| p.parse_assignment())?;
        Ok(Pattern::Assignment(AssignmentPattern {
            left: Box::new(target),
            right: Box::new(right),
            span: self.finish(start),
        }))
    }

    pub(super) fn parse_binding_identifier(&mut self, kind: BindingKind) -> Result<Identifier, ParseError> {
        let site = self.site();
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.unexpected());
        };
        let name = name.clone();
        if let Some((err_kind, message)) =
            binding_name_error(&name, kind, self.context, self.options.web_compat())
        {
            return Err(self.error_at_site(err_kind, message, site));
        }
        self.advance()?;
        Ok(Identifier {
            name,
            span: self.finish(site),
        })
    }

    /// `...target` in a parameter list
    pub(super) fn parse_rest_parameter(&mut self) -> Result<Pattern, ParseError> {
        let start = self.site();
        self.require_token(&TokenKind::DotDotDot)?;
        let argument = self.parse_binding_target(BindingKind::Param)?;
        if self.check(&TokenKind::Eq) {
            return Err(self.error_at_current(
                ErrorKind::UnexpectedToken,
                "Rest parameter may not have a default initializer",
            ));
        }
        Ok(Pattern::Rest(RestElement {
            argument: Box::new(argument),
            span: self.finish(start),
        }))
    }

    fn parse_array_binding(&mut self, kind: BindingKind) -> Result<Pattern, ParseError> {
        let start = self.site();
        self.advance()?;
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            if self.match_token(&TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            if self.check(&TokenKind::DotDotDot) {
                let rest_start = self.site();
                self.advance()?;
                let argument = self.parse_binding_target(kind)?;
                elements.push(Some(Pattern::Rest(RestElement {
                    argument: Box::new(argument),
                    span: self.finish(rest_start),
                })));
                if !self.check(&TokenKind::RBracket) {
                    return Err(self.error_at_current(
                        ErrorKind::InvalidDestructuringTarget,
                        "Rest element must be last element",
                    ));
                }
                break;
            }
            elements.push(Some(self.parse_binding_element(kind)?));
            if !self.check(&TokenKind::RBracket) {
                self.require_token(&TokenKind::Comma)?;
            }
        }
        self.require_token(&TokenKind::RBracket)?;
        Ok(Pattern::Array(ArrayPattern {
            elements,
            span: self.finish(start),
        }))
    }

    fn parse_object_binding(&mut self, kind: BindingKind) -> Result<Pattern, ParseError> {
        let start = self.site();
        self.advance()?;
        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::DotDotDot) {
                let rest_start = self.site();
                self.advance()?;
                if !matches!(self.current.kind, TokenKind::Identifier(_)) {
                    return Err(self.error_at_current(
                        ErrorKind::InvalidDestructuringTarget,
                        "`...` must be followed by an identifier in declaration contexts",
                    ));
                }
                let argument = self.parse_binding_identifier(kind)?;
                properties.push(ObjectPatternProperty::Rest(RestElement {
                    argument: Box::new(Pattern::Identifier(argument)),
                    span: self.finish(rest_start),
                }));
                if !self.check(&TokenKind::RBrace) {
                    return Err(self.error_at_current(
                        ErrorKind::InvalidDestructuringTarget,
                        "Rest element must be last element",
                    ));
                }
                break;
            }

            let prop_start = self.site();
            let key_is_identifier = matches!(self.current.kind, TokenKind::Identifier(_));
            let key = self.parse_property_key(false)?;
            let (value, shorthand) = if self.match_token(&TokenKind::Colon)? {
                (self.parse_binding_element(kind)?, false)
            } else {
                let PropertyKey::Identifier(id) = &key else {
                    return Err(self.unexpected());
                };
                if !key_is_identifier {
                    return Err(self.error_at_site(
                        ErrorKind::UnexpectedToken,
                        format!("Unexpected keyword '{}'", id.name),
                        prop_start,
                    ));
                }
                if let Some((err_kind, message)) =
                    binding_name_error(&id.name, kind, self.context, self.options.web_compat())
                {
                    return Err(self.error_at_site(err_kind, message, prop_start));
                }
                let target = Pattern::Identifier(id.clone());
                let value = if self.match_token(&TokenKind::Eq)? {
                    let right = self.with_in(true, |p| p.parse_assignment())?;
                    Pattern::Assignment(AssignmentPattern {
                        left: Box::new(target),
                        right: Box::new(right),
                        span: self.finish(prop_start),
                    })
                } else {
                    target
                };
                (value, true)
            };
            properties.push(ObjectPatternProperty::Property(AssignmentProperty {
                key,
                value,
                shorthand,
                span: self.finish(prop_start),
            }));
            if !self.check(&TokenKind::RBrace) {
                self.require_token(&TokenKind::Comma)?;
            }
        }
        self.require_token(&TokenKind::RBrace)?;
        Ok(Pattern::Object(ObjectPattern {
            properties,
            span: self.finish(start),
        }))
    }
}
