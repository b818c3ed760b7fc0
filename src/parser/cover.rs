//! Cover-grammar bookkeeping.
//!
//! Object and array literals are parsed as expressions first and may turn
//! out to be patterns once an `=` or `=>` shows up. A few constructs are
//! only valid on one side of that decision, and the tree alone cannot tell:
//!
//! - `{ a = 1 }` is only valid as a pattern
//! - a duplicate `__proto__` is only valid in a pattern
//! - a comma after a spread (`[...a,]`) is only valid in an expression
//!
//! The parser records the first occurrence of each and raises it once the
//! decision is made.

use crate::error::{ErrorKind, ParseError};
use crate::lexer::Position;

/// A recorded source location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub offset: usize,
    pub pos: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverErrors {
    pub shorthand_assign: Option<Site>,
    pub double_proto: Option<Site>,
    pub trailing_comma: Option<Site>,
}

impl CoverErrors {
    pub fn record_shorthand_assign(&mut self, site: Site) {
        self.shorthand_assign.get_or_insert(site);
    }

    pub fn record_double_proto(&mut self, site: Site) {
        self.double_proto.get_or_insert(site);
    }

    pub fn record_trailing_comma(&mut self, site: Site) {
        self.trailing_comma.get_or_insert(site);
    }

    /// Fold the errors of a nested literal into its parent's record.
    pub fn merge_into(self, outer: &mut CoverErrors) {
        if let Some(site) = self.shorthand_assign {
            outer.record_shorthand_assign(site);
        }
        if let Some(site) = self.double_proto {
            outer.record_double_proto(site);
        }
        if let Some(site) = self.trailing_comma {
            outer.record_trailing_comma(site);
        }
    }

    /// Error for using the text from `from` on as an expression.
    pub fn expression_error(&self, from: usize) -> Option<ParseError> {
        if let Some(site) = self.shorthand_assign.filter(|s| s.offset >= from) {
            return Some(ParseError::new(
                ErrorKind::UnexpectedToken,
                "Shorthand property assignments are valid only in destructuring patterns",
                site.offset,
                site.pos,
            ));
        }
        self.double_proto.filter(|s| s.offset >= from).map(|site| {
            ParseError::new(
                ErrorKind::EarlyError,
                "Redefinition of __proto__ property",
                site.offset,
                site.pos,
            )
        })
    }

    /// Error for reinterpreting the text from `from` on as a pattern.
    pub fn pattern_error(&self, from: usize, kind: ErrorKind) -> Option<ParseError> {
        self.trailing_comma.filter(|s| s.offset >= from).map(|site| {
            ParseError::new(
                kind,
                "Comma is not permitted after the rest element",
                site.offset,
                site.pos,
            )
        })
    }

    /// Forget everything recorded at or after `from`; that text is now a
    /// pattern and its expression-only errors no longer apply.
    pub fn clear_from(&mut self, from: usize) {
        for slot in [
            &mut self.shorthand_assign,
            &mut self.double_proto,
            &mut self.trailing_comma,
        ] {
            if slot.is_some_and(|site| site.offset >= from) {
                *slot = None;
            }
        }
    }
}
