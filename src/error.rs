//! Error types for the parser

use std::fmt;
use thiserror::Error;

use crate::lexer::Position;

/// Where a syntax error was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// Byte offset into the source text
    pub offset: usize,
    /// 1-based line
    pub line: u32,
    /// 0-based column, counted in code points
    pub column: u32,
}

impl SourcePosition {
    pub fn new(offset: usize, pos: Position) -> Self {
        SourcePosition {
            offset,
            line: pos.line,
            column: pos.column,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Error categories. Every parse failure falls in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// Malformed token: bad number, unterminated string/template/regex, bad escape
    #[error("LexicalError")]
    Lexical,
    #[error("UnexpectedToken")]
    UnexpectedToken,
    #[error("InvalidAssignmentTarget")]
    InvalidAssignmentTarget,
    #[error("InvalidDestructuringTarget")]
    InvalidDestructuringTarget,
    #[error("InvalidArrowParameters")]
    InvalidArrowParameters,
    #[error("DuplicateBinding")]
    DuplicateBinding,
    /// Reserved word, or `let`/`eval`/`arguments` where strict mode forbids them
    #[error("ReservedWord")]
    ReservedWord,
    /// Line terminator where the grammar forbids one
    #[error("RestrictedProduction")]
    RestrictedProduction,
    /// Any other static-semantics violation (labels, `return`, classes, modules)
    #[error("EarlyError")]
    EarlyError,
    /// Input nested deeper than `ParseOptions::max_nesting_depth`
    #[error("NestingLimit")]
    NestingLimit,
}

/// A syntax error. Parsing stops at the first one; no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SyntaxError: {message} ({position})")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: SourcePosition,
}

impl ParseError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        offset: usize,
        pos: Position,
    ) -> Self {
        ParseError {
            kind,
            message: message.into(),
            position: SourcePosition::new(offset, pos),
        }
    }

    /// Lexer failure tagged with one of the `InvalidNumericLiteral`,
    /// `UnterminatedString`, ... message tags.
    pub fn lexical(tag: &str, detail: &str, offset: usize, pos: Position) -> Self {
        let message = if detail.is_empty() {
            tag.to_string()
        } else {
            format!("{}: {}", tag, detail)
        };
        ParseError::new(ErrorKind::Lexical, message, offset, pos)
    }

    pub fn offset(&self) -> usize {
        self.position.offset
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }
}
