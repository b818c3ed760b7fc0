//! Expression parsing
//!
//! Assignment → conditional → binary (precedence climbing) → unary →
//! postfix → call/member chain → primary. Object and array literals are
//! parsed as expressions and handed to the pattern reinterpreter when an
//! `=` or `=>` reveals they were patterns.

use crate::ast::*;
use crate::atom::Atom;
use crate::error::{ErrorKind, ParseError};
use crate::lexer::{TokenFlags, TokenKind};

use super::Parser;
use super::context::Context;
use super::cover::{CoverErrors, Site};
use super::pattern::BindingKind;

/// Operator recognized by the binary loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOperator {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

const PREC_AND: u8 = 5;

impl<'a> Parser<'a> {
    // ============ ENTRY POINTS ============

    /// Expression including the comma operator
    pub(super) fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut cover = CoverErrors::default();
        let expr = self.parse_expression_cover(&mut cover)?;
        match cover.expression_error(0) {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    }

    /// Expression whose literals may still become a pattern; their
    /// expression-only errors are left in `cover`.
    pub(super) fn parse_expression_cover(
        &mut self,
        cover: &mut CoverErrors,
    ) -> Result<Expression, ParseError> {
        let start = self.site();
        let first = self.parse_assignment_cover(cover)?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.match_token(&TokenKind::Comma)? {
            expressions.push(self.parse_assignment_cover(cover)?);
        }
        Ok(Expression::Sequence(SequenceExpression {
            expressions,
            span: self.finish(start),
        }))
    }

    pub(super) fn parse_assignment(&mut self) -> Result<Expression, ParseError> {
        let mut cover = CoverErrors::default();
        let expr = self.parse_assignment_cover(&mut cover)?;
        match cover.expression_error(0) {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    }

    pub(super) fn parse_assignment_cover(
        &mut self,
        cover: &mut CoverErrors,
    ) -> Result<Expression, ParseError> {
        self.enter_nesting()?;
        let result = self.parse_assignment_inner(cover);
        self.leave_nesting();
        result
    }

    /// Run `f` with the `in` operator allowed or not
    pub(super) fn with_in<T>(
        &mut self,
        allow: bool,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.context.contains(Context::IN);
        self.context.set(Context::IN, allow);
        let result = f(self);
        self.context.set(Context::IN, saved);
        result
    }

    // ============ ASSIGNMENT ============

    fn parse_assignment_inner(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        if self.context.has_yield() && self.is_contextual("yield") {
            return self.parse_yield();
        }

        let start = self.site();
        self.potential_arrow_at = match self.current.kind {
            TokenKind::LParen | TokenKind::Identifier(_) => Some(self.current.start),
            _ => None,
        };

        let mut local = CoverErrors::default();
        let left = self.parse_conditional(&mut local)?;

        let Some(operator) = self.current_assignment_op() else {
            local.merge_into(cover);
            return Ok(left);
        };

        let target = if operator == AssignmentOp::Assign {
            if let Some(err) =
                local.pattern_error(start.offset, ErrorKind::InvalidDestructuringTarget)
            {
                return Err(err);
            }
            self.reinterpret(left, BindingKind::Assignment)?
        } else {
            if let Some(err) = local.expression_error(start.offset) {
                return Err(err);
            }
            self.simple_assignment_target(left)?
        };

        self.advance()?;
        let right = self.parse_assignment()?;
        Ok(Expression::Assignment(AssignmentExpression {
            operator,
            left: Box::new(target),
            right: Box::new(right),
            span: self.finish(start),
        }))
    }

    fn current_assignment_op(&self) -> Option<AssignmentOp> {
        let op = match self.current.kind {
            TokenKind::Eq => AssignmentOp::Assign,
            TokenKind::PlusEq => AssignmentOp::AddAssign,
            TokenKind::MinusEq => AssignmentOp::SubAssign,
            TokenKind::StarEq => AssignmentOp::MulAssign,
            TokenKind::SlashEq => AssignmentOp::DivAssign,
            TokenKind::PercentEq => AssignmentOp::ModAssign,
            TokenKind::StarStarEq => AssignmentOp::ExpAssign,
            TokenKind::AmpEq => AssignmentOp::BitAndAssign,
            TokenKind::PipeEq => AssignmentOp::BitOrAssign,
            TokenKind::CaretEq => AssignmentOp::BitXorAssign,
            TokenKind::LtLtEq => AssignmentOp::LShiftAssign,
            TokenKind::GtGtEq => AssignmentOp::RShiftAssign,
            TokenKind::GtGtGtEq => AssignmentOp::URShiftAssign,
            TokenKind::AmpAmpEq => AssignmentOp::AndAssign,
            TokenKind::PipePipeEq => AssignmentOp::OrAssign,
            TokenKind::QuestionQuestionEq => AssignmentOp::NullishAssign,
            _ => return None,
        };
        Some(op)
    }

    fn parse_yield(&mut self) -> Result<Expression, ParseError> {
        let start = self.site();
        self.yield_pos.get_or_insert(start);
        self.advance()?;

        let mut delegate = false;
        let mut argument = None;
        if !self.current.had_newline_before() {
            if self.match_token(&TokenKind::Star)? {
                delegate = true;
                argument = Some(Box::new(self.parse_assignment()?));
            } else if starts_expression(&self.current.kind) {
                argument = Some(Box::new(self.parse_assignment()?));
            }
        }
        Ok(Expression::Yield(YieldExpression {
            argument,
            delegate,
            span: self.finish(start),
        }))
    }

    // ============ CONDITIONAL AND BINARY ============

    fn parse_conditional(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let start = self.site();
        let test = self.parse_binary(cover)?;
        if is_bare_arrow(&test) || !self.check(&TokenKind::Question) {
            return Ok(test);
        }
        if let Some(err) = cover.expression_error(start.offset) {
            return Err(err);
        }
        self.advance()?;
        let consequent = self.with_in(true, |p| p.parse_assignment())?;
        self.require_token(&TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;
        Ok(Expression::Conditional(ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: self.finish(start),
        }))
    }

    fn parse_binary(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let start = self.site();
        let (left, height) = self.measured(|p| p.parse_binary_operand(cover))?;
        if is_bare_arrow(&left) || self.current_binary_op().is_none() {
            return Ok(left);
        }
        if let Some(err) = cover.expression_error(start.offset) {
            return Err(err);
        }
        self.parse_binary_rest(start, left, height, 0)
    }

    /// Fold operators binding tighter than `min_prec` onto `left`, which is
    /// `height` levels tall
    fn parse_binary_rest(
        &mut self,
        start: Site,
        mut left: Expression,
        mut height: u32,
        min_prec: u8,
    ) -> Result<Expression, ParseError> {
        loop {
            let Some((op, prec)) = self.current_binary_op() else {
                return Ok(left);
            };
            if prec <= min_prec {
                return Ok(left);
            }
            if op == BinaryOperator::Binary(BinaryOp::Exp)
                && matches!(left, Expression::Unary(_) | Expression::Await(_))
            {
                return Err(self.error(
                    ErrorKind::UnexpectedToken,
                    "Unary operator used immediately before exponentiation expression; \
                     parentheses are required",
                    left.span().start,
                ));
            }
            if let Expression::PrivateIdentifier(id) = &left {
                if op != BinaryOperator::Binary(BinaryOp::In) {
                    return Err(self.error(
                        ErrorKind::UnexpectedToken,
                        format!("Unexpected private name '#{}'", id.name),
                        id.span.start,
                    ));
                }
            }
            self.advance()?;

            let right_start = self.site();
            let mut operand_cover = CoverErrors::default();
            let (operand, operand_height) =
                self.measured(|p| p.parse_binary_operand(&mut operand_cover))?;
            if let Some(err) = operand_cover.expression_error(0) {
                return Err(err);
            }
            let next_min = match op {
                BinaryOperator::Binary(BinaryOp::Exp) => prec - 1,
                BinaryOperator::Logical(LogicalOp::NullishCoalescing) => PREC_AND,
                _ => prec,
            };
            let right_associative = matches!(op, BinaryOperator::Binary(BinaryOp::Exp));
            let (right, right_height) = if right_associative {
                // `**` is right-associative, so each operator nests
                let (right, rest_height) = self.measured(|p| {
                    p.nested(|p| {
                        p.parse_binary_rest(right_start, operand, operand_height, next_min)
                    })
                })?;
                (right, rest_height.max(operand_height.saturating_add(1)))
            } else {
                let (right, rest_height) = self.measured(|p| {
                    p.parse_binary_rest(right_start, operand, operand_height, next_min)
                })?;
                (right, rest_height.max(operand_height))
            };
            if let Expression::PrivateIdentifier(id) = &right {
                return Err(self.error(
                    ErrorKind::UnexpectedToken,
                    format!("Unexpected private name '#{}'", id.name),
                    id.span.start,
                ));
            }

            let mixed = match op {
                BinaryOperator::Logical(LogicalOp::Or | LogicalOp::And) => {
                    self.check(&TokenKind::QuestionQuestion)
                }
                BinaryOperator::Logical(LogicalOp::NullishCoalescing) => {
                    self.check(&TokenKind::PipePipe) || self.check(&TokenKind::AmpAmp)
                }
                _ => false,
            };
            if mixed {
                return Err(self.error_at_current(
                    ErrorKind::UnexpectedToken,
                    "'??' cannot be mixed with '||' or '&&' without parentheses",
                ));
            }

            let span = self.finish(start);
            left = match op {
                BinaryOperator::Binary(operator) => Expression::Binary(BinaryExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                }),
                BinaryOperator::Logical(operator) => Expression::Logical(LogicalExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                }),
            };
            // The nesting level taken by `**` already counts its own node
            height = if right_associative {
                height.saturating_add(1).max(right_height)
            } else {
                height.max(right_height).saturating_add(1)
            };
            self.grow_chain(height)?;
        }
    }

    fn current_binary_op(&self) -> Option<(BinaryOperator, u8)> {
        use BinaryOperator::{Binary, Logical};
        let op = match self.current.kind {
            TokenKind::PipePipe => (Logical(LogicalOp::Or), 4),
            TokenKind::QuestionQuestion => (Logical(LogicalOp::NullishCoalescing), 4),
            TokenKind::AmpAmp => (Logical(LogicalOp::And), PREC_AND),
            TokenKind::Pipe => (Binary(BinaryOp::BitOr), 6),
            TokenKind::Caret => (Binary(BinaryOp::BitXor), 7),
            TokenKind::Amp => (Binary(BinaryOp::BitAnd), 8),
            TokenKind::EqEq => (Binary(BinaryOp::Eq), 9),
            TokenKind::BangEq => (Binary(BinaryOp::NotEq), 9),
            TokenKind::EqEqEq => (Binary(BinaryOp::StrictEq), 9),
            TokenKind::BangEqEq => (Binary(BinaryOp::StrictNotEq), 9),
            TokenKind::Lt => (Binary(BinaryOp::Lt), 10),
            TokenKind::Gt => (Binary(BinaryOp::Gt), 10),
            TokenKind::LtEq => (Binary(BinaryOp::LtEq), 10),
            TokenKind::GtEq => (Binary(BinaryOp::GtEq), 10),
            TokenKind::Instanceof => (Binary(BinaryOp::Instanceof), 10),
            TokenKind::In if self.context.has_in() => (Binary(BinaryOp::In), 10),
            TokenKind::LtLt => (Binary(BinaryOp::LShift), 11),
            TokenKind::GtGt => (Binary(BinaryOp::RShift), 11),
            TokenKind::GtGtGt => (Binary(BinaryOp::URShift), 11),
            TokenKind::Plus => (Binary(BinaryOp::Add), 12),
            TokenKind::Minus => (Binary(BinaryOp::Sub), 12),
            TokenKind::Star => (Binary(BinaryOp::Mul), 13),
            TokenKind::Slash => (Binary(BinaryOp::Div), 13),
            TokenKind::Percent => (Binary(BinaryOp::Mod), 13),
            TokenKind::StarStar => (Binary(BinaryOp::Exp), 14), // right-associative
            _ => return None,
        };
        Some(op)
    }

    /// Unary expression, or `#x` directly before `in`
    fn parse_binary_operand(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let TokenKind::PrivateName(name) = &self.current.kind else {
            return self.parse_unary(cover);
        };
        let name = name.clone();
        let site = self.site();
        if !self.context.has_in() || !self.peek_is(&TokenKind::In)? {
            return Err(self.unexpected());
        }
        self.use_private_name(&name, site)?;
        self.advance()?;
        Ok(Expression::PrivateIdentifier(PrivateIdentifier {
            name,
            span: self.finish(site),
        }))
    }

    // ============ UNARY AND POSTFIX ============

    /// Operand of a prefix operator; a literal here is never a pattern
    fn parse_unary_operand(&mut self) -> Result<Expression, ParseError> {
        let mut cover = CoverErrors::default();
        let expr = self.nested(|p| p.parse_unary(&mut cover))?;
        match cover.expression_error(0) {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    }

    fn parse_unary(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let start = self.site();

        if self.context.has_await() && self.is_contextual("await") {
            self.await_pos.get_or_insert(start);
            self.advance()?;
            let argument = self.parse_unary_operand()?;
            return Ok(Expression::Await(AwaitExpression {
                argument: Box::new(argument),
                span: self.finish(start),
            }));
        }

        if let Some(operator) = self.current_unary_op() {
            self.advance()?;
            let argument = self.parse_unary_operand()?;
            if operator == UnaryOp::Delete {
                if self.context.is_strict()
                    && matches!(argument.unparenthesized(), Expression::Identifier(_))
                {
                    return Err(self.error(
                        ErrorKind::EarlyError,
                        "Deleting an unqualified identifier in strict mode",
                        argument.span().start,
                    ));
                }
                if is_private_member(&argument) {
                    return Err(self.error(
                        ErrorKind::EarlyError,
                        "Private fields can not be deleted",
                        argument.span().start,
                    ));
                }
            }
            return Ok(Expression::Unary(UnaryExpression {
                operator,
                argument: Box::new(argument),
                span: self.finish(start),
            }));
        }

        if let Some(operator) = self.current_update_op() {
            self.advance()?;
            let argument = self.parse_unary_operand()?;
            self.check_simple_target(&argument, "prefix operation")?;
            return Ok(Expression::Update(UpdateExpression {
                operator,
                argument: Box::new(argument),
                prefix: true,
                span: self.finish(start),
            }));
        }

        self.parse_postfix(cover)
    }

    fn current_unary_op(&self) -> Option<UnaryOp> {
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Typeof => UnaryOp::Typeof,
            TokenKind::Void => UnaryOp::Void,
            TokenKind::Delete => UnaryOp::Delete,
            _ => return None,
        };
        Some(op)
    }

    fn current_update_op(&self) -> Option<UpdateOp> {
        match self.current.kind {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        }
    }

    fn parse_postfix(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let start = self.site();
        let expr = self.parse_left_hand_side(cover)?;
        if is_bare_arrow(&expr) || self.current.had_newline_before() {
            return Ok(expr);
        }
        let Some(operator) = self.current_update_op() else {
            return Ok(expr);
        };
        if let Some(err) = cover.expression_error(start.offset) {
            return Err(err);
        }
        self.check_simple_target(&expr, "postfix operation")?;
        self.advance()?;
        Ok(Expression::Update(UpdateExpression {
            operator,
            argument: Box::new(expr),
            prefix: false,
            span: self.finish(start),
        }))
    }

    /// Operand of `++`, `--`: an identifier or member expression,
    /// possibly parenthesized.
    pub(super) fn check_simple_target(&self, expr: &Expression, what: &str) -> Result<(), ParseError> {
        match expr.unparenthesized() {
            Expression::Identifier(id) => {
                if self.context.is_strict() && matches!(id.name.as_str(), "eval" | "arguments") {
                    return Err(self.error(
                        ErrorKind::ReservedWord,
                        format!("Assigning to '{}' in strict mode", id.name),
                        id.span.start,
                    ));
                }
                Ok(())
            }
            Expression::Member(_) => Ok(()),
            other => Err(self.error(
                ErrorKind::InvalidAssignmentTarget,
                format!("Invalid left-hand side in {}", what),
                other.span().start,
            )),
        }
    }

    // ============ CALLS AND MEMBERS ============

    pub(super) fn parse_left_hand_side(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let start = self.site();
        let (base, height) = self.measured(|p| p.parse_primary(cover))?;
        if is_bare_arrow(&base) {
            return Ok(base);
        }
        self.parse_subscripts(start, base, height, false, cover)
    }

    /// Member accesses, calls, optional chains and tagged templates applied
    /// to `base`, which is `height` levels tall. With `no_calls` (the callee
    /// of `new`) calls stop the chain.
    fn parse_subscripts(
        &mut self,
        start: Site,
        base: Expression,
        mut height: u32,
        no_calls: bool,
        cover: &mut CoverErrors,
    ) -> Result<Expression, ParseError> {
        let maybe_async_arrow = !no_calls && self.is_async_arrow_callee(&base);
        let mut expr = base;
        let mut chained = false;
        let mut first = true;

        loop {
            let optional = self.check(&TokenKind::QuestionDot);
            let is_template = matches!(
                self.current.kind,
                TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_)
            );
            let continues = optional
                || is_template
                || self.check(&TokenKind::Dot)
                || self.check(&TokenKind::LBracket)
                || (!no_calls && self.check(&TokenKind::LParen));
            if !continues {
                break;
            }

            if first {
                // The base is an operand now, not a pattern
                if let Some(err) = cover.expression_error(start.offset) {
                    return Err(err);
                }
                cover.clear_from(start.offset);
            }

            // Properties, arguments and templates hang off each link
            let saved_peak = self.start_measure();
            if optional {
                if no_calls {
                    return Err(self.error_at_current(
                        ErrorKind::UnexpectedToken,
                        "Optional chaining cannot appear in the callee of new expressions",
                    ));
                }
                self.advance()?;
                chained = true;
            }

            if self.match_token(&TokenKind::LBracket)? {
                let property = self.with_in(true, |p| p.parse_expression())?;
                self.require_token(&TokenKind::RBracket)?;
                expr = Expression::Member(MemberExpression {
                    object: Box::new(expr),
                    property: MemberProperty::Computed(Box::new(property)),
                    optional,
                    span: self.finish(start),
                });
            } else if self.check(&TokenKind::LParen) {
                if no_calls {
                    return Err(self.unexpected());
                }
                if maybe_async_arrow && first {
                    match self.parse_async_arrow_or_call(start, expr)? {
                        arrow @ Expression::ArrowFunction(_) => return Ok(arrow),
                        call => expr = call,
                    }
                } else {
                    let arguments = self.parse_arguments()?;
                    expr = Expression::Call(CallExpression {
                        callee: Box::new(expr),
                        arguments,
                        optional,
                        span: self.finish(start),
                    });
                }
            } else if matches!(
                self.current.kind,
                TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_)
            ) {
                if chained {
                    return Err(self.error_at_current(
                        ErrorKind::UnexpectedToken,
                        "Tagged template cannot be used in an optional chain",
                    ));
                }
                let quasi = self.parse_template(true)?;
                expr = Expression::TaggedTemplate(TaggedTemplateExpression {
                    tag: Box::new(expr),
                    quasi,
                    span: self.finish(start),
                });
            } else {
                if !optional {
                    self.require_token(&TokenKind::Dot)?;
                }
                let property = self.parse_member_property()?;
                if matches!(expr, Expression::Super(_))
                    && matches!(property, MemberProperty::PrivateIdentifier(_))
                {
                    return Err(self.error(
                        ErrorKind::EarlyError,
                        "Private fields cannot be accessed on super",
                        self.previous.start,
                    ));
                }
                expr = Expression::Member(MemberExpression {
                    object: Box::new(expr),
                    property,
                    optional,
                    span: self.finish(start),
                });
            }
            let link_height = self.end_measure(saved_peak);
            height = height.max(link_height).saturating_add(1);
            self.grow_chain(height)?;
            first = false;
        }

        if chained {
            expr = Expression::Chain(ChainExpression {
                expression: Box::new(expr),
                span: self.finish(start),
            });
        }
        Ok(expr)
    }

    /// `async` written plainly at the start of an assignment expression and
    /// directly followed by `(` on the same line
    fn is_async_arrow_callee(&self, base: &Expression) -> bool {
        let Expression::Identifier(id) = base else {
            return false;
        };
        id.name == "async"
            && id.span.end - id.span.start == 5
            && self.previous.end == id.span.end
            && self.potential_arrow_at == Some(id.span.start)
            && !self.current.had_newline_before()
    }

    fn parse_async_arrow_or_call(
        &mut self,
        start: Site,
        callee: Expression,
    ) -> Result<Expression, ParseError> {
        let saved_yield = self.yield_pos.take();
        let saved_await = self.await_pos.take();
        let saved_await_ident = self.await_ident_pos.take();

        let mut cover = CoverErrors::default();
        let arguments = self.parse_arguments_cover(&mut cover)?;

        if self.check(&TokenKind::Arrow) && !self.current.had_newline_before() {
            if let Some(err) = cover.pattern_error(0, ErrorKind::InvalidArrowParameters) {
                return Err(err);
            }
            self.check_arrow_parameter_positions(true)?;
            self.yield_pos = saved_yield;
            self.await_pos = saved_await;
            self.await_ident_pos = saved_await_ident;

            let mut params = Vec::with_capacity(arguments.len());
            let count = arguments.len();
            for (i, argument) in arguments.into_iter().enumerate() {
                match argument {
                    Argument::Expression(expr) => {
                        params.push(self.reinterpret(expr, BindingKind::Param)?)
                    }
                    Argument::Spread(spread) => {
                        if i + 1 != count {
                            return Err(self.error(
                                ErrorKind::InvalidArrowParameters,
                                "Rest parameter must be last formal parameter",
                                spread.span.start,
                            ));
                        }
                        let argument = self.reinterpret(*spread.argument, BindingKind::Param)?;
                        if matches!(argument, Pattern::Assignment(_)) {
                            return Err(self.error(
                                ErrorKind::InvalidArrowParameters,
                                "Rest parameter may not have a default initializer",
                                spread.span.start,
                            ));
                        }
                        params.push(Pattern::Rest(RestElement {
                            argument: Box::new(argument),
                            span: spread.span,
                        }));
                    }
                }
            }
            return self.parse_arrow_function(start, params, true);
        }

        if let Some(err) = cover.expression_error(0) {
            return Err(err);
        }
        self.yield_pos = saved_yield.or(self.yield_pos);
        self.await_pos = saved_await.or(self.await_pos);
        self.await_ident_pos = saved_await_ident.or(self.await_ident_pos);
        Ok(Expression::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
            optional: false,
            span: self.finish(start),
        }))
    }

    /// Arrow parameters cannot contain `yield` or `await` expressions, and
    /// async arrow parameters cannot be named `await`.
    pub(super) fn check_arrow_parameter_positions(&self, is_async: bool) -> Result<(), ParseError> {
        if let Some(site) = self.yield_pos {
            return Err(self.error_at_site(
                ErrorKind::InvalidArrowParameters,
                "Yield expression not allowed in formal parameters",
                site,
            ));
        }
        if let Some(site) = self.await_pos {
            return Err(self.error_at_site(
                ErrorKind::InvalidArrowParameters,
                "Await expression not allowed in formal parameters",
                site,
            ));
        }
        if is_async {
            if let Some(site) = self.await_ident_pos {
                return Err(self.error_at_site(
                    ErrorKind::ReservedWord,
                    "'await' is not a valid identifier in async arrow parameters",
                    site,
                ));
            }
        }
        Ok(())
    }

    fn parse_member_property(&mut self) -> Result<MemberProperty, ParseError> {
        if let TokenKind::PrivateName(name) = &self.current.kind {
            let name = name.clone();
            let site = self.site();
            self.use_private_name(&name, site)?;
            self.advance()?;
            return Ok(MemberProperty::PrivateIdentifier(PrivateIdentifier {
                name,
                span: self.finish(site),
            }));
        }
        Ok(MemberProperty::Identifier(self.parse_identifier_name()?))
    }

    pub(super) fn use_private_name(&mut self, name: &Atom, site: Site) -> Result<(), ParseError> {
        if self.private_names.use_name(name, site.offset) {
            Ok(())
        } else {
            Err(self.error_at_site(
                ErrorKind::EarlyError,
                format!("Private field '#{}' must be declared in an enclosing class", name),
                site,
            ))
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut cover = CoverErrors::default();
        let arguments = self.parse_arguments_cover(&mut cover)?;
        match cover.expression_error(0) {
            Some(err) => Err(err),
            None => Ok(arguments),
        }
    }

    fn parse_arguments_cover(&mut self, cover: &mut CoverErrors) -> Result<Vec<Argument>, ParseError> {
        self.require_token(&TokenKind::LParen)?;
        let arguments = self.with_in(true, |p| {
            let mut arguments = Vec::new();
            while !p.check(&TokenKind::RParen) {
                if p.check(&TokenKind::DotDotDot) {
                    let start = p.site();
                    p.advance()?;
                    let argument = p.parse_assignment_cover(cover)?;
                    if p.check(&TokenKind::Comma) {
                        cover.record_trailing_comma(p.site());
                    }
                    arguments.push(Argument::Spread(SpreadElement {
                        argument: Box::new(argument),
                        span: p.finish(start),
                    }));
                } else {
                    arguments.push(Argument::Expression(p.parse_assignment_cover(cover)?));
                }
                if !p.check(&TokenKind::RParen) {
                    p.require_token(&TokenKind::Comma)?;
                }
            }
            Ok(arguments)
        })?;
        self.require_token(&TokenKind::RParen)?;
        Ok(arguments)
    }

    // ============ PRIMARY ============

    fn parse_primary(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let start = self.site();
        let can_be_arrow = self.potential_arrow_at == Some(self.current.start);

        match self.current.kind {
            TokenKind::Identifier(_) => self.parse_identifier_expression(can_be_arrow),
            TokenKind::Number(_)
            | TokenKind::BigInt(_)
            | TokenKind::String(_)
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => Ok(Expression::Literal(self.parse_literal()?)),
            TokenKind::Slash | TokenKind::SlashEq => {
                self.current = self.lexer.rescan_as_regexp(&self.current)?;
                Ok(Expression::Literal(self.parse_literal()?))
            }
            TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_) => {
                Ok(Expression::Template(self.parse_template(false)?))
            }
            TokenKind::LParen => self.parse_paren_or_arrow(can_be_arrow),
            TokenKind::LBracket => self.parse_array_literal(cover),
            TokenKind::LBrace => self.parse_object_literal(cover),
            TokenKind::Function => {
                let function = self.parse_function_expression(start, false)?;
                Ok(Expression::Function(Box::new(function)))
            }
            TokenKind::Class => {
                let class = self.parse_class(false, false)?;
                Ok(Expression::Class(Box::new(class)))
            }
            TokenKind::This => {
                self.advance()?;
                Ok(Expression::This(self.finish(start)))
            }
            TokenKind::Super => self.parse_super(),
            TokenKind::New => self.parse_new(),
            TokenKind::Import => self.parse_import_expression(),
            _ => Err(self.unexpected()),
        }
    }

    /// Identifier reference, `async function`, or the parameter of
    /// `x => ...` / `async x => ...`
    fn parse_identifier_expression(&mut self, can_be_arrow: bool) -> Result<Expression, ParseError> {
        let start = self.site();

        if self.is_contextual("async") {
            let next = self.peek()?;
            if !next.had_newline_before() {
                if next.kind == TokenKind::Function {
                    self.advance()?;
                    let function = self.parse_function_expression(start, true)?;
                    return Ok(Expression::Function(Box::new(function)));
                }
                if can_be_arrow && matches!(next.kind, TokenKind::Identifier(_)) {
                    self.advance()?;
                    let saved = self.context;
                    self.context |= Context::AWAIT;
                    let param = self.parse_identifier_reference();
                    self.context = saved;
                    let param = param?;
                    if !self.check(&TokenKind::Arrow) {
                        return Err(self.unexpected());
                    }
                    return self.parse_arrow_function(start, vec![Pattern::Identifier(param)], true);
                }
            }
        }

        let id = self.parse_identifier_reference()?;
        if can_be_arrow && self.check(&TokenKind::Arrow) {
            return self.parse_arrow_function(start, vec![Pattern::Identifier(id)], false);
        }
        Ok(Expression::Identifier(id))
    }

    pub(super) fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let token = &self.current;
        let strict = self.context.is_strict();
        let value = match &token.kind {
            TokenKind::Number(n) => {
                if strict && token.flags.contains(TokenFlags::LEGACY_OCTAL) {
                    let raw = token.raw(self.source);
                    let message = if raw.contains(['8', '9']) {
                        "InvalidNumericLiteral: decimals with leading zeros are not allowed in strict mode"
                    } else {
                        "InvalidNumericLiteral: octal literals are not allowed in strict mode"
                    };
                    return Err(self.error_at_current(ErrorKind::Lexical, message));
                }
                LiteralValue::Number(*n)
            }
            TokenKind::String(s) => {
                if strict && token.flags.contains(TokenFlags::OCTAL_ESCAPE) {
                    return Err(self.error_at_current(
                        ErrorKind::Lexical,
                        "InvalidEscape: octal escape sequences are not allowed in strict mode",
                    ));
                }
                LiteralValue::String(s.clone())
            }
            TokenKind::BigInt(digits) => LiteralValue::BigInt(digits.clone()),
            TokenKind::RegExp { pattern, flags } => LiteralValue::RegExp {
                pattern: pattern.clone(),
                flags: flags.clone(),
            },
            TokenKind::Null => LiteralValue::Null,
            TokenKind::True => LiteralValue::Boolean(true),
            TokenKind::False => LiteralValue::Boolean(false),
            _ => return Err(self.unexpected()),
        };
        let span = self.token_span(&self.current);
        let raw_text = self.current.raw(self.source);
        let raw = self.lexer.intern(raw_text);
        self.advance()?;
        Ok(Literal { value, raw, span })
    }

    pub(super) fn parse_template(&mut self, tagged: bool) -> Result<TemplateLiteral, ParseError> {
        let start = self.site();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        loop {
            let token = self.current.clone();
            let (part, tail) = match &token.kind {
                TokenKind::TemplateNoSub(part) | TokenKind::TemplateTail(part) => (part, true),
                TokenKind::TemplateHead(part) | TokenKind::TemplateMiddle(part) => (part, false),
                _ => return Err(self.unexpected()),
            };
            if !tagged {
                if let Some(err) = &part.escape_error {
                    return Err(err.as_ref().clone());
                }
            }

            // Element text excludes the delimiters: ` or } before, ` or ${ after
            let closing = if tail { 1 } else { 2 };
            let mut start_pos = token.start_pos;
            start_pos.column += 1;
            let mut end_pos = token.end_pos;
            end_pos.column = end_pos.column.saturating_sub(closing);
            quasis.push(TemplateElement {
                cooked: part.cooked.clone(),
                raw: part.raw.clone(),
                tail,
                span: self.make_span(
                    token.start + 1,
                    start_pos,
                    token.end.saturating_sub(closing as usize),
                    end_pos,
                ),
            });

            self.advance()?;
            if tail {
                break;
            }
            expressions.push(self.with_in(true, |p| p.parse_expression())?);
            if !self.check(&TokenKind::RBrace) {
                return Err(self.expected(&TokenKind::RBrace));
            }
            self.current = self.lexer.rescan_template_continuation(&self.current)?;
        }

        Ok(TemplateLiteral {
            quasis,
            expressions,
            span: self.finish(start),
        })
    }

    /// `( ... )`: a parenthesized expression, or the parameters of an arrow
    fn parse_paren_or_arrow(&mut self, can_be_arrow: bool) -> Result<Expression, ParseError> {
        let start = self.site();
        self.advance()?;

        let saved_yield = self.yield_pos.take();
        let saved_await = self.await_pos.take();
        let saved_await_ident = self.await_ident_pos.take();

        let inner_start = self.site();
        let mut cover = CoverErrors::default();
        let (items, rest, trailing_comma) = self.with_in(true, |p| {
            let mut items = Vec::new();
            let mut rest = None;
            let mut trailing_comma = None;
            while !p.check(&TokenKind::RParen) {
                if p.check(&TokenKind::DotDotDot) {
                    rest = Some(p.parse_rest_parameter()?);
                    if !p.check(&TokenKind::RParen) {
                        return Err(p.error_at_current(
                            ErrorKind::InvalidArrowParameters,
                            "Rest parameter must be last formal parameter",
                        ));
                    }
                    break;
                }
                items.push(p.parse_assignment_cover(&mut cover)?);
                if !p.check(&TokenKind::Comma) {
                    break;
                }
                let comma = p.site();
                p.advance()?;
                if p.check(&TokenKind::RParen) {
                    trailing_comma = Some(comma);
                }
            }
            Ok((items, rest, trailing_comma))
        })?;
        let inner_end = (self.previous.end, self.previous.end_pos);
        self.require_token(&TokenKind::RParen)?;

        if can_be_arrow && self.check(&TokenKind::Arrow) {
            if let Some(err) = cover.pattern_error(0, ErrorKind::InvalidArrowParameters) {
                return Err(err);
            }
            self.check_arrow_parameter_positions(false)?;
            self.yield_pos = saved_yield;
            self.await_pos = saved_await;
            self.await_ident_pos = saved_await_ident;

            let mut params = Vec::with_capacity(items.len() + 1);
            for item in items {
                params.push(self.reinterpret(item, BindingKind::Param)?);
            }
            params.extend(rest);
            return self.parse_arrow_function(start, params, false);
        }

        if let Some(rest) = &rest {
            return Err(self.error(
                ErrorKind::UnexpectedToken,
                "Unexpected token '...'",
                rest.span().start,
            ));
        }
        if let Some(comma) = trailing_comma {
            return Err(self.error_at_site(
                ErrorKind::UnexpectedToken,
                "Unexpected trailing comma in parenthesized expression",
                comma,
            ));
        }
        if items.is_empty() {
            return Err(self.error(
                ErrorKind::UnexpectedToken,
                "Unexpected token ')'",
                self.previous.start,
            ));
        }
        if let Some(err) = cover.expression_error(0) {
            return Err(err);
        }
        self.yield_pos = saved_yield.or(self.yield_pos);
        self.await_pos = saved_await.or(self.await_pos);
        self.await_ident_pos = saved_await_ident.or(self.await_ident_pos);

        let mut items = items;
        let expression = if items.len() == 1 {
            match items.pop() {
                Some(expr) => expr,
                None => return Err(self.unexpected()),
            }
        } else {
            Expression::Sequence(SequenceExpression {
                expressions: items,
                span: self.make_span(inner_start.offset, inner_start.pos, inner_end.0, inner_end.1),
            })
        };
        Ok(Expression::Parenthesized(ParenthesizedExpression {
            expression: Box::new(expression),
            span: self.finish(start),
        }))
    }

    fn parse_array_literal(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let start = self.site();
        self.advance()?;
        let elements = self.with_in(true, |p| {
            let mut elements = Vec::new();
            while !p.check(&TokenKind::RBracket) {
                if p.match_token(&TokenKind::Comma)? {
                    elements.push(None);
                    continue;
                }
                let element = if p.check(&TokenKind::DotDotDot) {
                    let spread_start = p.site();
                    p.advance()?;
                    let argument = p.parse_assignment_cover(cover)?;
                    if p.check(&TokenKind::Comma) {
                        cover.record_trailing_comma(p.site());
                    }
                    ArrayElement::Spread(SpreadElement {
                        argument: Box::new(argument),
                        span: p.finish(spread_start),
                    })
                } else {
                    ArrayElement::Expression(p.parse_assignment_cover(cover)?)
                };
                elements.push(Some(element));
                if !p.check(&TokenKind::RBracket) {
                    p.require_token(&TokenKind::Comma)?;
                }
            }
            Ok(elements)
        })?;
        self.require_token(&TokenKind::RBracket)?;
        Ok(Expression::Array(ArrayExpression {
            elements,
            span: self.finish(start),
        }))
    }

    fn parse_object_literal(&mut self, cover: &mut CoverErrors) -> Result<Expression, ParseError> {
        let start = self.site();
        self.advance()?;
        let properties = self.with_in(true, |p| {
            let mut properties = Vec::new();
            let mut has_proto = false;
            while !p.check(&TokenKind::RBrace) {
                if p.check(&TokenKind::DotDotDot) {
                    let spread_start = p.site();
                    p.advance()?;
                    let argument = p.parse_assignment_cover(cover)?;
                    if p.check(&TokenKind::Comma) {
                        cover.record_trailing_comma(p.site());
                    }
                    properties.push(ObjectProperty::Spread(SpreadElement {
                        argument: Box::new(argument),
                        span: p.finish(spread_start),
                    }));
                } else {
                    let property = p.parse_object_property(cover)?;
                    if is_proto_setter(&property) {
                        if has_proto {
                            cover.record_double_proto(Parser::site_of(&property.key.span()));
                        }
                        has_proto = true;
                    }
                    properties.push(ObjectProperty::Property(property));
                }
                if !p.check(&TokenKind::RBrace) {
                    p.require_token(&TokenKind::Comma)?;
                }
            }
            Ok(properties)
        })?;
        self.require_token(&TokenKind::RBrace)?;
        Ok(Expression::Object(ObjectExpression {
            properties,
            span: self.finish(start),
        }))
    }

    fn parse_object_property(&mut self, cover: &mut CoverErrors) -> Result<Property, ParseError> {
        let start = self.site();
        let mut is_async = false;
        let mut generator = false;
        let mut kind = PropertyKind::Init;

        if self.match_token(&TokenKind::Star)? {
            generator = true;
        } else if self.is_contextual("async") || self.is_contextual("get") || self.is_contextual("set") {
            let next = self.peek()?;
            let prefix_applies = starts_property_key(&next.kind)
                || (self.is_contextual("async") && next.kind == TokenKind::Star);
            if prefix_applies {
                if self.is_contextual("async") {
                    if next.had_newline_before() {
                        return Err(self.error(
                            ErrorKind::UnexpectedToken,
                            "Line terminator not permitted after 'async'",
                            next.start,
                        ));
                    }
                    is_async = true;
                    self.advance()?;
                    generator = self.match_token(&TokenKind::Star)?;
                } else {
                    kind = if self.is_contextual("get") {
                        PropertyKind::Get
                    } else {
                        PropertyKind::Set
                    };
                    self.advance()?;
                }
            }
        }

        let key_is_identifier = matches!(self.current.kind, TokenKind::Identifier(_));
        let key_site = self.site();
        let key = self.parse_property_key(false)?;

        if kind != PropertyKind::Init {
            let method_kind = if kind == PropertyKind::Get {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            let value = self.parse_method(false, false, method_kind, false)?;
            return Ok(Property {
                key,
                value: Expression::Function(value),
                kind,
                method: false,
                shorthand: false,
                span: self.finish(start),
            });
        }

        if self.check(&TokenKind::LParen) {
            let value = self.parse_method(is_async, generator, MethodKind::Method, false)?;
            return Ok(Property {
                key,
                value: Expression::Function(value),
                kind,
                method: true,
                shorthand: false,
                span: self.finish(start),
            });
        }
        if is_async || generator {
            return Err(self.unexpected());
        }

        if self.match_token(&TokenKind::Colon)? {
            let value = self.parse_assignment_cover(cover)?;
            return Ok(Property {
                key,
                value,
                kind,
                method: false,
                shorthand: false,
                span: self.finish(start),
            });
        }

        // Shorthand `{ x }` or cover-grammar `{ x = 1 }`
        let PropertyKey::Identifier(id) = &key else {
            return Err(self.unexpected());
        };
        if !key_is_identifier {
            return Err(self.error_at_site(
                ErrorKind::UnexpectedToken,
                format!("Unexpected keyword '{}'", id.name),
                key_site,
            ));
        }
        let id = id.clone();
        self.check_identifier_reference(&id.name, key_site)?;
        let value = if self.check(&TokenKind::Eq) {
            cover.record_shorthand_assign(self.site());
            self.advance()?;
            let right = self.parse_assignment()?;
            Expression::Assignment(AssignmentExpression {
                operator: AssignmentOp::Assign,
                left: Box::new(Pattern::Identifier(id)),
                right: Box::new(right),
                span: self.finish(start),
            })
        } else {
            Expression::Identifier(id)
        };
        Ok(Property {
            key,
            value,
            kind,
            method: false,
            shorthand: true,
            span: self.finish(start),
        })
    }

    /// Property name in an object literal, class body or object pattern
    pub(super) fn parse_property_key(&mut self, allow_private: bool) -> Result<PropertyKey, ParseError> {
        match &self.current.kind {
            TokenKind::String(_) | TokenKind::Number(_) | TokenKind::BigInt(_) => {
                Ok(PropertyKey::Literal(self.parse_literal()?))
            }
            TokenKind::LBracket => {
                self.advance()?;
                let expr = self.with_in(true, |p| p.parse_assignment())?;
                self.require_token(&TokenKind::RBracket)?;
                Ok(PropertyKey::Computed(Box::new(expr)))
            }
            TokenKind::PrivateName(name) if allow_private => {
                let name = name.clone();
                let site = self.site();
                self.advance()?;
                Ok(PropertyKey::PrivateIdentifier(PrivateIdentifier {
                    name,
                    span: self.finish(site),
                }))
            }
            _ => Ok(PropertyKey::Identifier(self.parse_identifier_name()?)),
        }
    }

    fn parse_super(&mut self) -> Result<Expression, ParseError> {
        let start = self.site();
        self.advance()?;
        let allowed = match self.current.kind {
            TokenKind::LParen => self.context.contains(Context::SUPER_CALL),
            TokenKind::Dot | TokenKind::LBracket => self.context.contains(Context::SUPER_PROPERTY),
            _ => false,
        };
        if !allowed {
            return Err(self.error_at_site(
                ErrorKind::EarlyError,
                "'super' keyword unexpected here",
                start,
            ));
        }
        Ok(Expression::Super(self.finish(start)))
    }

    fn parse_new(&mut self) -> Result<Expression, ParseError> {
        let start = self.site();
        let new_span = self.token_span(&self.current);
        self.advance()?;

        if self.match_token(&TokenKind::Dot)? {
            if !self.is_contextual("target") {
                return Err(self.error_at_current(
                    ErrorKind::UnexpectedToken,
                    "The only valid meta property for new is 'new.target'",
                ));
            }
            let property = self.parse_identifier_name()?;
            if !self.context.contains(Context::NEW_TARGET) {
                return Err(self.error_at_site(
                    ErrorKind::EarlyError,
                    "'new.target' can only be used in functions and class bodies",
                    start,
                ));
            }
            let meta_name = self.lexer.intern("new");
            return Ok(Expression::MetaProperty(MetaProperty {
                meta: Identifier {
                    name: meta_name,
                    span: new_span,
                },
                property,
                span: self.finish(start),
            }));
        }

        if self.check(&TokenKind::Import) {
            return Err(self.error_at_current(
                ErrorKind::UnexpectedToken,
                "Cannot use new with import()",
            ));
        }
        let callee_start = self.site();
        let mut cover = CoverErrors::default();
        let (callee, height) = if self.check(&TokenKind::New) {
            self.measured(|p| p.nested(|p| p.parse_new()))?
        } else {
            self.measured(|p| p.parse_primary(&mut cover))?
        };
        let callee = self.parse_subscripts(callee_start, callee, height, true, &mut cover)?;
        if let Some(err) = cover.expression_error(0) {
            return Err(err);
        }
        let arguments = if self.check(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Expression::New(NewExpression {
            callee: Box::new(callee),
            arguments,
            span: self.finish(start),
        }))
    }

    /// `import(source)` or `import.meta`
    fn parse_import_expression(&mut self) -> Result<Expression, ParseError> {
        let start = self.site();
        let import_span = self.token_span(&self.current);
        self.advance()?;

        if self.match_token(&TokenKind::Dot)? {
            if !self.is_contextual("meta") {
                return Err(self.error_at_current(
                    ErrorKind::UnexpectedToken,
                    "The only valid meta property for import is 'import.meta'",
                ));
            }
            let property = self.parse_identifier_name()?;
            if !self.options.module {
                return Err(self.error_at_site(
                    ErrorKind::EarlyError,
                    "Cannot use 'import.meta' outside a module",
                    start,
                ));
            }
            let meta_name = self.lexer.intern("import");
            return Ok(Expression::MetaProperty(MetaProperty {
                meta: Identifier {
                    name: meta_name,
                    span: import_span,
                },
                property,
                span: self.finish(start),
            }));
        }

        self.require_token(&TokenKind::LParen)?;
        let source = self.with_in(true, |p| p.parse_assignment())?;
        self.require_token(&TokenKind::RParen)?;
        Ok(Expression::Import(ImportExpression {
            source: Box::new(source),
            span: self.finish(start),
        }))
    }
}

/// An arrow function not wrapped in parentheses; nothing may follow it
/// except a comma or the end of the enclosing expression.
///
/// Only the first operand of an assignment expression can be one, since
/// `parse_primary` takes the arrow path only at `potential_arrow_at`. That
/// check is what rejects `a || () => b`: the `()` there is an empty
/// parenthesized expression.
fn is_bare_arrow(expr: &Expression) -> bool {
    matches!(expr, Expression::ArrowFunction(_))
}

fn is_private_member(expr: &Expression) -> bool {
    match expr.unparenthesized() {
        Expression::Member(m) => matches!(m.property, MemberProperty::PrivateIdentifier(_)),
        Expression::Chain(c) => is_private_member(&c.expression),
        _ => false,
    }
}

/// Non-computed `__proto__: value`, which sets the prototype
fn is_proto_setter(property: &Property) -> bool {
    property.kind == PropertyKind::Init
        && !property.method
        && !property.shorthand
        && property.key.static_name() == Some("__proto__")
}

fn starts_property_key(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::BigInt(_)
            | TokenKind::LBracket
            | TokenKind::PrivateName(_)
    ) || kind.is_keyword()
}

/// Tokens that can begin an expression (the argument of `yield`)
fn starts_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::PrivateName(_)
            | TokenKind::Number(_)
            | TokenKind::BigInt(_)
            | TokenKind::String(_)
            | TokenKind::RegExp { .. }
            | TokenKind::TemplateNoSub(_)
            | TokenKind::TemplateHead(_)
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Slash
            | TokenKind::SlashEq
            | TokenKind::New
            | TokenKind::This
            | TokenKind::Super
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::Typeof
            | TokenKind::Void
            | TokenKind::Delete
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Import
    )
}
