//! Lexer for ECMAScript source code
//!
//! Converts source text into a stream of tokens. The lexer is pull-based: the
//! parser asks for one token at a time and, where only the grammar knows how
//! to read the next character, asks for a re-scan (`/` as a regular
//! expression, `}` as the continuation of a template literal).

use bitflags::bitflags;

use crate::atom::{Atom, AtomTable};
use crate::error::ParseError;
use crate::unicode::{is_id_continue, is_id_start, is_line_terminator, is_whitespace};

/// Line/column pair. Lines are 1-based, columns 0-based and counted in code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

bitflags! {
    /// Facts about a token the parser needs beyond its kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u8 {
        /// A line terminator appeared between the previous token and this one
        const NEWLINE_BEFORE = 1;
        /// Identifier spelled with at least one `\u` escape
        const ESCAPED = 1 << 1;
        /// Legacy octal (`017`) or non-octal decimal (`08`) integer literal
        const LEGACY_OCTAL = 1 << 2;
        /// String containing a legacy octal escape (`\01`) or `\8`/`\9`
        const OCTAL_ESCAPE = 1 << 3;
    }
}

/// One chunk of a template literal between delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePart {
    /// Escape-processed value; `None` when the text holds an invalid escape
    pub cooked: Option<Atom>,
    /// Source text with CR and CRLF normalized to LF
    pub raw: Atom,
    /// Why `cooked` is missing. Only an error for untagged templates.
    pub escape_error: Option<Box<ParseError>>,
}

/// Token types for ECMAScript
///
/// Reserved words get their own kinds. Contextual words such as `let`,
/// `async` or `of` are plain identifiers and are recognized by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    /// Decimal digits of the value, without the `n` suffix
    BigInt(Atom),
    String(Atom),
    RegExp { pattern: Atom, flags: Atom },
    TemplateNoSub(TemplatePart),  // `...`
    TemplateHead(TemplatePart),   // `...${
    TemplateMiddle(TemplatePart), // }...${
    TemplateTail(TemplatePart),   // }...`

    Identifier(Atom),
    PrivateName(Atom), // #name

    // Reserved words
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,

    // Operators
    Plus,             // +
    Minus,            // -
    Star,             // *
    Slash,            // /
    Percent,          // %
    StarStar,         // **
    PlusPlus,         // ++
    MinusMinus,       // --
    Eq,               // =
    EqEq,             // ==
    EqEqEq,           // ===
    BangEq,           // !=
    BangEqEq,         // !==
    Lt,               // <
    LtEq,             // <=
    Gt,               // >
    GtEq,             // >=
    LtLt,             // <<
    GtGt,             // >>
    GtGtGt,           // >>>
    Amp,              // &
    AmpAmp,           // &&
    Pipe,             // |
    PipePipe,         // ||
    Caret,            // ^
    Tilde,            // ~
    Bang,             // !
    Question,         // ?
    QuestionQuestion, // ??
    QuestionDot,      // ?.

    // Assignment operators
    PlusEq,             // +=
    MinusEq,            // -=
    StarEq,             // *=
    SlashEq,            // /=
    PercentEq,          // %=
    StarStarEq,         // **=
    AmpEq,              // &=
    PipeEq,             // |=
    CaretEq,            // ^=
    LtLtEq,             // <<=
    GtGtEq,             // >>=
    GtGtGtEq,           // >>>=
    AmpAmpEq,           // &&=
    PipePipeEq,         // ||=
    QuestionQuestionEq, // ??=

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Dot,       // .
    DotDotDot, // ...
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    Arrow,     // =>

    Eof,
}

impl TokenKind {
    /// Source spelling of a reserved word
    pub fn keyword_text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Catch => "catch",
            TokenKind::Class => "class",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Debugger => "debugger",
            TokenKind::Default => "default",
            TokenKind::Delete => "delete",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::Export => "export",
            TokenKind::Extends => "extends",
            TokenKind::False => "false",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::In => "in",
            TokenKind::Instanceof => "instanceof",
            TokenKind::New => "new",
            TokenKind::Null => "null",
            TokenKind::Return => "return",
            TokenKind::Super => "super",
            TokenKind::Switch => "switch",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::True => "true",
            TokenKind::Try => "try",
            TokenKind::Typeof => "typeof",
            TokenKind::Var => "var",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::With => "with",
            _ => return None,
        };
        Some(text)
    }

    /// Source spelling of a punctuator
    pub fn punctuator_text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::StarStar => "**",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::EqEqEq => "===",
            TokenKind::BangEq => "!=",
            TokenKind::BangEqEq => "!==",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::LtLt => "<<",
            TokenKind::GtGt => ">>",
            TokenKind::GtGtGt => ">>>",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Bang => "!",
            TokenKind::Question => "?",
            TokenKind::QuestionQuestion => "??",
            TokenKind::QuestionDot => "?.",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::StarStarEq => "**=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::LtLtEq => "<<=",
            TokenKind::GtGtEq => ">>=",
            TokenKind::GtGtGtEq => ">>>=",
            TokenKind::AmpAmpEq => "&&=",
            TokenKind::PipePipeEq => "||=",
            TokenKind::QuestionQuestionEq => "??=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::DotDotDot => "...",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Arrow => "=>",
            _ => return None,
        };
        Some(text)
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword_text().is_some()
    }

    /// Short human description used in error messages
    pub fn describe(&self) -> String {
        if let Some(text) = self.keyword_text().or_else(|| self.punctuator_text()) {
            return format!("'{}'", text);
        }
        match self {
            TokenKind::Number(_) | TokenKind::BigInt(_) => "number".to_string(),
            TokenKind::String(_) => "string".to_string(),
            TokenKind::RegExp { .. } => "regular expression".to_string(),
            TokenKind::TemplateNoSub(_)
            | TokenKind::TemplateHead(_)
            | TokenKind::TemplateMiddle(_)
            | TokenKind::TemplateTail(_) => "template".to_string(),
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::PrivateName(name) => format!("'#{}'", name),
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("{:?}", self),
        }
    }
}

/// Reserved word spelled `name`, if any
pub fn keyword(name: &str) -> Option<TokenKind> {
    let kind = match name {
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "catch" => TokenKind::Catch,
        "class" => TokenKind::Class,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "debugger" => TokenKind::Debugger,
        "default" => TokenKind::Default,
        "delete" => TokenKind::Delete,
        "do" => TokenKind::Do,
        "else" => TokenKind::Else,
        "enum" => TokenKind::Enum,
        "export" => TokenKind::Export,
        "extends" => TokenKind::Extends,
        "false" => TokenKind::False,
        "finally" => TokenKind::Finally,
        "for" => TokenKind::For,
        "function" => TokenKind::Function,
        "if" => TokenKind::If,
        "import" => TokenKind::Import,
        "in" => TokenKind::In,
        "instanceof" => TokenKind::Instanceof,
        "new" => TokenKind::New,
        "null" => TokenKind::Null,
        "return" => TokenKind::Return,
        "super" => TokenKind::Super,
        "switch" => TokenKind::Switch,
        "this" => TokenKind::This,
        "throw" => TokenKind::Throw,
        "true" => TokenKind::True,
        "try" => TokenKind::Try,
        "typeof" => TokenKind::Typeof,
        "var" => TokenKind::Var,
        "void" => TokenKind::Void,
        "while" => TokenKind::While,
        "with" => TokenKind::With,
        _ => return None,
    };
    Some(kind)
}

/// A token with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub start_pos: Position,
    pub end_pos: Position,
    pub flags: TokenFlags,
}

impl Token {
    pub fn had_newline_before(&self) -> bool {
        self.flags.contains(TokenFlags::NEWLINE_BEFORE)
    }

    pub fn is_escaped(&self) -> bool {
        self.flags.contains(TokenFlags::ESCAPED)
    }

    /// The token's source text
    pub fn raw<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start..self.end).unwrap_or("")
    }

    /// Identifier name, if this is an identifier.
    pub fn identifier(&self) -> Option<&Atom> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// True for the unescaped identifier `word` (contextual keywords).
    pub fn is_contextual(&self, word: &str) -> bool {
        match &self.kind {
            TokenKind::Identifier(name) => !self.is_escaped() && name.as_str() == word,
            _ => false,
        }
    }
}

/// Lexer state checkpoint for backtracking
#[derive(Debug, Clone)]
pub struct LexerCheckpoint {
    pos: usize,
    line: u32,
    column: u32,
    tokens_started: bool,
}

/// Lexer for tokenizing ECMAScript source code
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    token_start: usize,
    token_start_pos: Position,
    flags: TokenFlags,
    /// False until the first token has been produced
    tokens_started: bool,
    /// Annex B `<!--` and `-->` comments (script goal only)
    html_comments: bool,
    atoms: AtomTable,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 0,
            token_start: 0,
            token_start_pos: Position::default(),
            flags: TokenFlags::empty(),
            tokens_started: false,
            html_comments: true,
            atoms: AtomTable::with_common_names(),
        }
    }

    /// Enable or disable HTML-like comments. Off for modules.
    pub fn set_html_comments(&mut self, enabled: bool) {
        self.html_comments = enabled;
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn intern(&mut self, s: &str) -> Atom {
        self.atoms.intern(s)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Create a checkpoint of the current lexer state for backtracking
    pub fn checkpoint(&self) -> LexerCheckpoint {
        LexerCheckpoint {
            pos: self.pos,
            line: self.line,
            column: self.column,
            tokens_started: self.tokens_started,
        }
    }

    /// Restore the lexer state from a checkpoint
    pub fn restore(&mut self, checkpoint: LexerCheckpoint) {
        self.pos = checkpoint.pos;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
        self.tokens_started = checkpoint.tokens_started;
    }

    /// Re-read a `/` or `/=` token as the start of a regular expression.
    /// Used when the parser is at a position where an expression begins.
    pub fn rescan_as_regexp(&mut self, token: &Token) -> Result<Token, ParseError> {
        self.reset_to(token);
        let body_end = self.scan_regexp()?;
        Ok(self.finish_regexp(body_end))
    }

    /// Re-read a `}` token as the continuation of a template literal.
    pub fn rescan_template_continuation(&mut self, rbrace: &Token) -> Result<Token, ParseError> {
        self.reset_to(rbrace);
        self.advance(); // }
        let (part, tail) = self.scan_template_chars()?;
        let kind = if tail {
            TokenKind::TemplateTail(part)
        } else {
            TokenKind::TemplateMiddle(part)
        };
        Ok(self.finish(kind))
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        let newline = self.skip_whitespace_and_comments()?;
        self.flags = if newline {
            TokenFlags::NEWLINE_BEFORE
        } else {
            TokenFlags::empty()
        };
        self.token_start = self.pos;
        self.token_start_pos = self.position();

        let Some(ch) = self.peek() else {
            return Ok(self.finish(TokenKind::Eof));
        };
        self.tokens_started = true;

        let kind = match ch {
            // Single character tokens
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            '~' => self.single(TokenKind::Tilde),

            // Potentially multi-character tokens
            '.' => self.scan_dot()?,
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_star(),
            '/' => self.scan_slash(),
            '%' => self.scan_percent(),
            '=' => self.scan_equals(),
            '!' => self.scan_bang(),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),
            '^' => self.scan_caret(),
            '?' => self.scan_question(),
            '#' => self.scan_private_name()?,

            '"' | '\'' => self.scan_string(ch)?,
            '`' => {
                self.advance();
                let (part, tail) = self.scan_template_chars()?;
                if tail {
                    TokenKind::TemplateNoSub(part)
                } else {
                    TokenKind::TemplateHead(part)
                }
            }

            '0'..='9' => self.scan_number()?,

            c if is_id_start(c) || c == '\\' => self.scan_identifier_or_keyword()?,

            c => {
                return Err(self.error_here(
                    "InvalidCharacter",
                    &format!("unexpected character '{}'", c.escape_default()),
                ));
            }
        };

        Ok(self.finish(kind))
    }

    // ============ CURSOR ============

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos..)?.chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source.get(self.pos..)?.chars().nth(n)
    }

    fn rest_starts_with(&self, s: &str) -> bool {
        self.source.get(self.pos..).is_some_and(|rest| rest.starts_with(s))
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        match ch {
            // CRLF is a single line terminator; the LF does the line bump
            '\r' if self.peek() == Some('\n') => self.column += 1,
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
        Some(ch)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn reset_to(&mut self, token: &Token) {
        self.pos = token.start;
        self.line = token.start_pos.line;
        self.column = token.start_pos.column;
        self.token_start = token.start;
        self.token_start_pos = token.start_pos;
        self.flags = token.flags & TokenFlags::NEWLINE_BEFORE;
    }

    fn finish(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            start: self.token_start,
            end: self.pos,
            start_pos: self.token_start_pos,
            end_pos: self.position(),
            flags: self.flags,
        }
    }

    fn finish_regexp(&mut self, body_end: usize) -> Token {
        let pattern = self
            .source
            .get(self.token_start + 1..body_end)
            .unwrap_or("")
            .to_string();
        let flags = self.source.get(body_end + 1..self.pos).unwrap_or("").to_string();
        let kind = TokenKind::RegExp {
            pattern: self.atoms.intern(&pattern),
            flags: self.atoms.intern(&flags),
        };
        self.finish(kind)
    }

    fn error_here(&self, tag: &str, detail: &str) -> ParseError {
        ParseError::lexical(tag, detail, self.pos, self.position())
    }

    fn error_at_token_start(&self, tag: &str, detail: &str) -> ParseError {
        ParseError::lexical(tag, detail, self.token_start, self.token_start_pos)
    }

    // ============ TRIVIA ============

    /// Skip whitespace and comments. Returns whether a line terminator was crossed.
    fn skip_whitespace_and_comments(&mut self) -> Result<bool, ParseError> {
        let mut newline = false;

        if self.pos == 0 && self.rest_starts_with("#!") {
            self.skip_line_comment();
        }

        while let Some(ch) = self.peek() {
            match ch {
                c if is_line_terminator(c) => {
                    newline = true;
                    self.advance();
                }
                c if is_whitespace(c) => {
                    self.advance();
                }
                '/' => match self.peek_at(1) {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => {
                        if self.skip_block_comment()? {
                            newline = true;
                        }
                    }
                    _ => break,
                },
                '<' if self.html_comments && self.rest_starts_with("<!--") => {
                    self.skip_line_comment();
                }
                '-' if self.html_comments
                    && (newline || !self.tokens_started)
                    && self.rest_starts_with("-->") =>
                {
                    self.skip_line_comment();
                }
                _ => break,
            }
        }

        Ok(newline)
    }

    /// Skip to (not past) the next line terminator
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if is_line_terminator(ch) {
                break;
            }
            self.advance();
        }
    }

    /// Returns whether the comment spans a line terminator
    fn skip_block_comment(&mut self) -> Result<bool, ParseError> {
        let start = self.pos;
        let start_pos = self.position();
        self.advance(); // /
        self.advance(); // *
        let mut newline = false;
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(newline);
                }
                Some(c) if is_line_terminator(c) => newline = true,
                Some(_) => {}
                None => {
                    return Err(ParseError::lexical(
                        "UnterminatedComment",
                        "",
                        start,
                        start_pos,
                    ));
                }
            }
        }
    }

    // ============ PUNCTUATORS ============

    fn scan_dot(&mut self) -> Result<TokenKind, ParseError> {
        if matches!(self.peek_at(1), Some('0'..='9')) {
            // .123 style number
            return self.scan_number();
        }
        self.advance();
        if self.peek() == Some('.') && self.peek_at(1) == Some('.') {
            self.advance();
            self.advance();
            Ok(TokenKind::DotDotDot)
        } else {
            Ok(TokenKind::Dot)
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('+') {
            TokenKind::PlusPlus
        } else if self.match_char('=') {
            TokenKind::PlusEq
        } else {
            TokenKind::Plus
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('-') {
            TokenKind::MinusMinus
        } else if self.match_char('=') {
            TokenKind::MinusEq
        } else {
            TokenKind::Minus
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('*') {
            if self.match_char('=') {
                TokenKind::StarStarEq
            } else {
                TokenKind::StarStar
            }
        } else if self.match_char('=') {
            TokenKind::StarEq
        } else {
            TokenKind::Star
        }
    }

    /// Always read as division; the parser re-scans as a regex where needed.
    fn scan_slash(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('=') {
            TokenKind::SlashEq
        } else {
            TokenKind::Slash
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('=') {
            TokenKind::PercentEq
        } else {
            TokenKind::Percent
        }
    }

    fn scan_equals(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('=') {
            if self.match_char('=') {
                TokenKind::EqEqEq
            } else {
                TokenKind::EqEq
            }
        } else if self.match_char('>') {
            TokenKind::Arrow
        } else {
            TokenKind::Eq
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('=') {
            if self.match_char('=') {
                TokenKind::BangEqEq
            } else {
                TokenKind::BangEq
            }
        } else {
            TokenKind::Bang
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('<') {
            if self.match_char('=') {
                TokenKind::LtLtEq
            } else {
                TokenKind::LtLt
            }
        } else if self.match_char('=') {
            TokenKind::LtEq
        } else {
            TokenKind::Lt
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('>') {
            if self.match_char('>') {
                if self.match_char('=') {
                    TokenKind::GtGtGtEq
                } else {
                    TokenKind::GtGtGt
                }
            } else if self.match_char('=') {
                TokenKind::GtGtEq
            } else {
                TokenKind::GtGt
            }
        } else if self.match_char('=') {
            TokenKind::GtEq
        } else {
            TokenKind::Gt
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('&') {
            if self.match_char('=') {
                TokenKind::AmpAmpEq
            } else {
                TokenKind::AmpAmp
            }
        } else if self.match_char('=') {
            TokenKind::AmpEq
        } else {
            TokenKind::Amp
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('|') {
            if self.match_char('=') {
                TokenKind::PipePipeEq
            } else {
                TokenKind::PipePipe
            }
        } else if self.match_char('=') {
            TokenKind::PipeEq
        } else {
            TokenKind::Pipe
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('=') {
            TokenKind::CaretEq
        } else {
            TokenKind::Caret
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        self.advance();
        if self.match_char('?') {
            if self.match_char('=') {
                TokenKind::QuestionQuestionEq
            } else {
                TokenKind::QuestionQuestion
            }
        } else if self.peek() == Some('.') && !matches!(self.peek_at(1), Some('0'..='9')) {
            // `a?.5:b` is a conditional, not optional chaining
            self.advance();
            TokenKind::QuestionDot
        } else {
            TokenKind::Question
        }
    }

    // ============ REGULAR EXPRESSIONS ============

    /// Scan a regular expression literal starting at the current `/`.
    /// Returns the offset of the closing `/`.
    fn scan_regexp(&mut self) -> Result<usize, ParseError> {
        self.advance(); // opening /
        let mut in_class = false;

        loop {
            match self.peek() {
                None => return Err(self.error_at_token_start("UnterminatedRegExp", "")),
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error_at_token_start("UnterminatedRegExp", ""));
                }
                Some('/') if !in_class => break,
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(c) if !is_line_terminator(c) => {}
                        _ => return Err(self.error_at_token_start("UnterminatedRegExp", "")),
                    }
                }
                Some(_) => {}
            }
            self.advance();
        }

        let body_end = self.pos;
        self.advance(); // closing /

        let mut seen = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                return Err(self.error_here("RegexSyntaxError", "invalid regular expression flags"));
            }
            if !is_id_continue(ch) {
                break;
            }
            if !"dgimsuyv".contains(ch) || seen.contains(ch) {
                return Err(self.error_here(
                    "RegexSyntaxError",
                    &format!("invalid regular expression flag '{}'", ch),
                ));
            }
            seen.push(ch);
            self.advance();
        }
        if seen.contains('u') && seen.contains('v') {
            return Err(self.error_at_token_start(
                "RegexSyntaxError",
                "flags 'u' and 'v' are mutually exclusive",
            ));
        }
        Ok(body_end)
    }

    // ============ STRINGS AND TEMPLATES ============

    fn scan_string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                None => return Err(self.error_at_token_start("UnterminatedString", "")),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                // LS and PS are allowed raw; LF and CR are not
                Some('\n' | '\r') => {
                    return Err(self.error_at_token_start("UnterminatedString", ""));
                }
                Some('\\') => {
                    let esc_start = self.pos;
                    let esc_pos = self.position();
                    self.advance();
                    self.scan_string_escape(&mut value, esc_start, esc_pos)?;
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Ok(TokenKind::String(self.atoms.intern(&value)))
    }

    /// Escape sequence in a string literal, after the backslash
    fn scan_string_escape(
        &mut self,
        value: &mut String,
        esc_start: usize,
        esc_pos: Position,
    ) -> Result<(), ParseError> {
        let Some(ch) = self.advance() else {
            return Err(self.error_at_token_start("UnterminatedString", ""));
        };
        match ch {
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'b' => value.push('\x08'),
            'f' => value.push('\x0C'),
            'v' => value.push('\x0B'),
            // line continuation; CRLF is consumed as one unit
            '\r' => {
                self.match_char('\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '0' if !matches!(self.peek(), Some('0'..='9')) => value.push('\0'),
            '0'..='7' => {
                // LegacyOctalEscapeSequence: up to three digits, value <= 0o377
                self.flags |= TokenFlags::OCTAL_ESCAPE;
                let mut code = ch.to_digit(8).unwrap_or(0);
                let max_len = if ch <= '3' { 3 } else { 2 };
                for _ in 1..max_len {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.advance();
                        }
                        None => break,
                    }
                }
                value.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            '8' | '9' => {
                self.flags |= TokenFlags::OCTAL_ESCAPE;
                value.push(ch);
            }
            'x' => {
                let code = self.scan_hex_digits(2).ok_or_else(|| {
                    ParseError::lexical("InvalidEscape", "invalid hexadecimal escape", esc_start, esc_pos)
                })?;
                value.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let c = self.scan_string_unicode_escape(esc_start, esc_pos)?;
                value.push(c);
            }
            c => value.push(c),
        }
        Ok(())
    }

    /// `\u` escape in a string, combining an escaped surrogate pair into one char.
    fn scan_string_unicode_escape(
        &mut self,
        esc_start: usize,
        esc_pos: Position,
    ) -> Result<char, ParseError> {
        let code = self.scan_unicode_escape_body(esc_start, esc_pos)?;
        if (0xD800..0xDC00).contains(&code)
            && self.peek() == Some('\\')
            && self.peek_at(1) == Some('u')
        {
            let checkpoint = self.checkpoint();
            self.advance();
            self.advance();
            if let Ok(low) = self.scan_unicode_escape_body(esc_start, esc_pos) {
                if (0xDC00..0xE000).contains(&low) {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                }
            }
            self.restore(checkpoint);
        }
        // Lone surrogates cannot live in a Rust string
        Ok(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    /// Body of a `\u` escape (after the `u`): `XXXX` or `{X...}`.
    fn scan_unicode_escape_body(
        &mut self,
        esc_start: usize,
        esc_pos: Position,
    ) -> Result<u32, ParseError> {
        let invalid =
            || ParseError::lexical("InvalidEscape", "invalid Unicode escape sequence", esc_start, esc_pos);
        if self.match_char('{') {
            let mut code: u32 = 0;
            let mut digits = 0;
            while let Some(d) = self.peek().and_then(|c| c.to_digit(16)) {
                code = code.saturating_mul(16).saturating_add(d);
                digits += 1;
                self.advance();
            }
            if digits == 0 || code > 0x10FFFF || !self.match_char('}') {
                return Err(invalid());
            }
            Ok(code)
        } else {
            self.scan_hex_digits(4).ok_or_else(invalid)
        }
    }

    /// Exactly `count` hex digits
    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut code = 0;
        for _ in 0..count {
            let d = self.peek().and_then(|c| c.to_digit(16))?;
            code = code * 16 + d;
            self.advance();
        }
        Some(code)
    }

    /// Template characters after the opening `` ` `` or `}`, through the
    /// closing `` ` `` (tail) or `${` (not tail).
    fn scan_template_chars(&mut self) -> Result<(TemplatePart, bool), ParseError> {
        let mut cooked = String::new();
        let mut raw = String::new();
        let mut escape_error: Option<Box<ParseError>> = None;

        let tail = loop {
            match self.peek() {
                None => return Err(self.error_at_token_start("UnterminatedTemplate", "")),
                Some('`') => {
                    self.advance();
                    break true;
                }
                Some('$') if self.peek_at(1) == Some('{') => {
                    self.advance();
                    self.advance();
                    break false;
                }
                Some('\\') => {
                    let esc_start = self.pos;
                    let esc_pos = self.position();
                    self.advance();
                    if let Err(err) = self.scan_template_escape(&mut cooked, esc_start, esc_pos) {
                        if err.message.starts_with("Unterminated") {
                            return Err(err);
                        }
                        escape_error.get_or_insert(Box::new(err));
                    }
                    let text = self.source.get(esc_start..self.pos).unwrap_or("");
                    push_normalized(&mut raw, text);
                }
                Some('\r') => {
                    self.advance();
                    self.match_char('\n');
                    cooked.push('\n');
                    raw.push('\n');
                }
                Some(c) => {
                    self.advance();
                    cooked.push(c);
                    raw.push(c);
                }
            }
        };

        let part = TemplatePart {
            cooked: if escape_error.is_none() {
                Some(self.atoms.intern(&cooked))
            } else {
                None
            },
            raw: self.atoms.intern(&raw),
            escape_error,
        };
        Ok((part, tail))
    }

    /// Escape sequence inside a template, after the backslash. Errors are
    /// recorded by the caller; scanning resumes right after the bad escape.
    fn scan_template_escape(
        &mut self,
        cooked: &mut String,
        esc_start: usize,
        esc_pos: Position,
    ) -> Result<(), ParseError> {
        let Some(ch) = self.advance() else {
            return Err(self.error_at_token_start("UnterminatedTemplate", ""));
        };
        match ch {
            'n' => cooked.push('\n'),
            'r' => cooked.push('\r'),
            't' => cooked.push('\t'),
            'b' => cooked.push('\x08'),
            'f' => cooked.push('\x0C'),
            'v' => cooked.push('\x0B'),
            '\r' => {
                self.match_char('\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '0' if !matches!(self.peek(), Some('0'..='9')) => cooked.push('\0'),
            '0'..='9' => {
                return Err(ParseError::lexical(
                    "TemplateOctalEscape",
                    "octal escape sequences are not allowed in template strings",
                    esc_start,
                    esc_pos,
                ));
            }
            'x' => {
                let code = self.scan_hex_digits(2).ok_or_else(|| {
                    ParseError::lexical("InvalidEscape", "invalid hexadecimal escape", esc_start, esc_pos)
                })?;
                cooked.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let c = self.scan_string_unicode_escape(esc_start, esc_pos)?;
                cooked.push(c);
            }
            c => cooked.push(c),
        }
        Ok(())
    }

    // ============ NUMBERS ============

    fn scan_number(&mut self) -> Result<TokenKind, ParseError> {
        let first = self.peek();

        if first == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                self.advance();
                let digits = self.scan_digits(radix)?;
                if digits.is_empty() {
                    return Err(self.error_at_token_start("InvalidNumericLiteral", "missing digits"));
                }
                let kind = if self.match_char('n') {
                    TokenKind::BigInt(self.atoms.intern(&bigint_to_decimal(&digits, radix)))
                } else {
                    TokenKind::Number(digits_value(&digits, radix))
                };
                return self.check_after_number(kind);
            }
            if matches!(self.peek_at(1), Some('0'..='9')) {
                return self.scan_legacy_octal();
            }
            if self.peek_at(1) == Some('_') {
                self.advance();
                return Err(self.error_here(
                    "InvalidNumericLiteral",
                    "numeric separator not allowed after leading 0",
                ));
            }
        }

        let mut text = String::new();
        let mut is_integer = true;
        if first != Some('.') {
            text.push_str(&self.scan_digits(10)?);
        }
        if self.peek() == Some('.') {
            self.advance();
            is_integer = false;
            text.push('.');
            text.push_str(&self.scan_digits(10)?);
        }
        self.scan_exponent(&mut text, &mut is_integer)?;

        if is_integer && self.match_char('n') {
            let digits = self.atoms.intern(&text);
            return self.check_after_number(TokenKind::BigInt(digits));
        }
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        self.check_after_number(TokenKind::Number(value))
    }

    /// `0` followed by digits: legacy octal, or decimal when an 8 or 9 appears
    fn scan_legacy_octal(&mut self) -> Result<TokenKind, ParseError> {
        self.flags |= TokenFlags::LEGACY_OCTAL;
        let start = self.pos;
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }
        let digits = self.source.get(start..self.pos).unwrap_or("0").to_string();
        if self.peek() == Some('_') || self.peek() == Some('n') {
            return Err(self.error_here(
                "InvalidNumericLiteral",
                "legacy octal literals cannot have separators or a BigInt suffix",
            ));
        }
        if digits.contains(['8', '9']) {
            // NonOctalDecimalIntegerLiteral: may still have a fraction and exponent
            let mut text = digits;
            let mut is_integer = true;
            if self.peek() == Some('.') {
                self.advance();
                is_integer = false;
                text.push('.');
                text.push_str(&self.scan_digits(10)?);
            }
            self.scan_exponent(&mut text, &mut is_integer)?;
            let value = text.parse::<f64>().unwrap_or(f64::NAN);
            return self.check_after_number(TokenKind::Number(value));
        }
        self.check_after_number(TokenKind::Number(digits_value(&digits, 8)))
    }

    fn scan_exponent(&mut self, text: &mut String, is_integer: &mut bool) -> Result<(), ParseError> {
        if !matches!(self.peek(), Some('e' | 'E')) {
            return Ok(());
        }
        self.advance();
        *is_integer = false;
        text.push('e');
        if let Some(sign @ ('+' | '-')) = self.peek() {
            self.advance();
            text.push(sign);
        }
        let digits = self.scan_digits(10)?;
        if digits.is_empty() {
            return Err(self.error_here("InvalidNumericLiteral", "missing exponent"));
        }
        text.push_str(&digits);
        Ok(())
    }

    /// Digits of `radix` with `_` separators; returns the digits without separators.
    fn scan_digits(&mut self, radix: u32) -> Result<String, ParseError> {
        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if ch == '_' {
                let next_is_digit = self.peek_at(1).is_some_and(|c| c.is_digit(radix));
                if digits.is_empty() || !next_is_digit {
                    return Err(self.error_here(
                        "InvalidNumericLiteral",
                        "numeric separators must appear between digits",
                    ));
                }
                self.advance();
            } else if ch.is_digit(radix) {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Ok(digits)
    }

    /// A numeric literal must not run straight into an identifier or digit (`3in`, `0b12`).
    fn check_after_number(&self, kind: TokenKind) -> Result<TokenKind, ParseError> {
        match self.peek() {
            Some(c) if is_id_start(c) || c.is_ascii_digit() || c == '\\' => Err(self.error_here(
                "InvalidNumericLiteral",
                "identifier starts immediately after numeric literal",
            )),
            _ => Ok(kind),
        }
    }

    // ============ IDENTIFIERS ============

    fn scan_private_name(&mut self) -> Result<TokenKind, ParseError> {
        self.advance(); // #
        match self.peek() {
            Some(c) if is_id_start(c) || c == '\\' => {
                let name = self.scan_identifier_name()?;
                Ok(TokenKind::PrivateName(name))
            }
            _ => Err(self.error_at_token_start("InvalidCharacter", "unexpected character '#'")),
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> Result<TokenKind, ParseError> {
        let name = self.scan_identifier_name()?;
        if !self.flags.contains(TokenFlags::ESCAPED) {
            if let Some(kind) = keyword(&name) {
                return Ok(kind);
            }
        }
        Ok(TokenKind::Identifier(name))
    }

    /// IdentifierName, decoding `\u` escapes. Sets `ESCAPED` if any were used.
    fn scan_identifier_name(&mut self) -> Result<Atom, ParseError> {
        let source = self.source;
        let start = self.pos;
        let mut decoded: Option<String> = None;
        let mut first = true;

        while let Some(ch) = self.peek() {
            if ch == '\\' {
                let esc_start = self.pos;
                let esc_pos = self.position();
                self.advance();
                if !self.match_char('u') {
                    return Err(ParseError::lexical(
                        "InvalidEscape",
                        "expected \\u escape in identifier",
                        esc_start,
                        esc_pos,
                    ));
                }
                let code = self.scan_unicode_escape_body(esc_start, esc_pos)?;
                let valid = char::from_u32(code)
                    .filter(|&c| if first { is_id_start(c) } else { is_id_continue(c) });
                let Some(c) = valid else {
                    return Err(ParseError::lexical(
                        "InvalidEscape",
                        "escape is not a valid identifier character",
                        esc_start,
                        esc_pos,
                    ));
                };
                let buf = decoded
                    .get_or_insert_with(|| source.get(start..esc_start).unwrap_or("").to_string());
                buf.push(c);
                self.flags |= TokenFlags::ESCAPED;
            } else if (first && is_id_start(ch)) || (!first && is_id_continue(ch)) {
                self.advance();
                if let Some(buf) = decoded.as_mut() {
                    buf.push(ch);
                }
            } else {
                break;
            }
            first = false;
        }

        Ok(match decoded {
            Some(name) => self.atoms.intern(&name),
            None => self.atoms.intern(source.get(start..self.pos).unwrap_or("")),
        })
    }
}

/// Line and column of a byte offset, counted the same way the lexer counts.
pub fn position_at(source: &str, offset: usize) -> Position {
    let mut pos = Position::default();
    let mut chars = source.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if i >= offset {
            break;
        }
        match ch {
            '\r' if chars.peek().is_some_and(|&(_, next)| next == '\n') => pos.column += 1,
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                pos.line += 1;
                pos.column = 0;
            }
            _ => pos.column += 1,
        }
    }
    pos
}

fn push_normalized(out: &mut String, text: &str) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
}

fn digits_value(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

/// Base-10 spelling of an integer written in `radix`, at any size.
fn bigint_to_decimal(digits: &str, radix: u32) -> String {
    if radix == 10 {
        return digits.to_string();
    }
    const LIMB: u64 = 1_000_000_000;
    // little-endian base-1e9 limbs
    let mut limbs: Vec<u64> = vec![0];
    for d in digits.chars().filter_map(|c| c.to_digit(radix)) {
        let mut carry = u64::from(d);
        for limb in limbs.iter_mut() {
            let v = *limb * u64::from(radix) + carry;
            *limb = v % LIMB;
            carry = v / LIMB;
        }
        while carry > 0 {
            limbs.push(carry % LIMB);
            carry /= LIMB;
        }
    }
    let mut out = String::new();
    let mut iter = limbs.iter().rev();
    if let Some(most) = iter.next() {
        out.push_str(&most.to_string());
    }
    for limb in iter {
        out.push_str(&format!("{:09}", limb));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut tokens = vec![];
        loop {
            match lexer.next_token() {
                Ok(token) if token.kind == TokenKind::Eof => break,
                Ok(token) => tokens.push(token.kind),
                Err(err) => panic!("lex error in {:?}: {}", source, err),
            }
        }
        tokens
    }

    fn lex_err(source: &str) -> ParseError {
        let mut lexer = Lexer::new(source);
        loop {
            match lexer.next_token() {
                Ok(token) if token.kind == TokenKind::Eof => {
                    panic!("expected lex error for {:?}", source)
                }
                Ok(_) => {}
                Err(err) => return err,
            }
        }
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(Atom::from(name))
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("42"), vec![TokenKind::Number(42.0)]);
        assert_eq!(lex("3.25"), vec![TokenKind::Number(3.25)]);
        assert_eq!(lex("1e10"), vec![TokenKind::Number(1e10)]);
        assert_eq!(lex(".5"), vec![TokenKind::Number(0.5)]);
        assert_eq!(lex("5."), vec![TokenKind::Number(5.0)]);
        assert_eq!(lex("0xff"), vec![TokenKind::Number(255.0)]);
        assert_eq!(lex("0b1010"), vec![TokenKind::Number(10.0)]);
        assert_eq!(lex("0o17"), vec![TokenKind::Number(15.0)]);
        assert_eq!(lex("1_000_000"), vec![TokenKind::Number(1_000_000.0)]);
    }

    #[test]
    fn test_legacy_octal() {
        let mut lexer = Lexer::new("017 08");
        let a = lexer.next_token().unwrap();
        assert_eq!(a.kind, TokenKind::Number(15.0));
        assert!(a.flags.contains(TokenFlags::LEGACY_OCTAL));
        let b = lexer.next_token().unwrap();
        assert_eq!(b.kind, TokenKind::Number(8.0));
        assert!(b.flags.contains(TokenFlags::LEGACY_OCTAL));
    }

    #[test]
    fn test_bad_numbers() {
        for src in ["3in", "0b12", "1__0", "1_", "0_1", "0x", "1e", "01n", "1.5n", "0x_1"] {
            let err = lex_err(src);
            assert!(
                err.message.starts_with("InvalidNumericLiteral"),
                "{}: {}",
                src,
                err
            );
        }
    }

    #[test]
    fn test_bigint() {
        assert_eq!(lex("123n"), vec![TokenKind::BigInt(Atom::from("123"))]);
        assert_eq!(lex("0x1Fn"), vec![TokenKind::BigInt(Atom::from("31"))]);
        assert_eq!(lex("1_0n"), vec![TokenKind::BigInt(Atom::from("10"))]);
        assert_eq!(
            bigint_to_decimal("ffffffffffffffffffff", 16),
            "1208925819614629174706175"
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex(r#""hello""#), vec![TokenKind::String(Atom::from("hello"))]);
        assert_eq!(lex("'world'"), vec![TokenKind::String(Atom::from("world"))]);
        assert_eq!(
            lex(r#""line\nbreak""#),
            vec![TokenKind::String(Atom::from("line\nbreak"))]
        );
        assert_eq!(
            lex(r#""\x41B\u{43}😀""#),
            vec![TokenKind::String(Atom::from("ABC😀"))]
        );
        assert_eq!(lex("'a\\\r\nb'"), vec![TokenKind::String(Atom::from("ab"))]);
        assert_eq!(
            lex("'\u{2028}'"),
            vec![TokenKind::String(Atom::from("\u{2028}"))]
        );
    }

    #[test]
    fn test_octal_escapes_flagged() {
        let mut lexer = Lexer::new(r#""\101" "\8" "\0""#);
        let a = lexer.next_token().unwrap();
        assert_eq!(a.kind, TokenKind::String(Atom::from("A")));
        assert!(a.flags.contains(TokenFlags::OCTAL_ESCAPE));
        let b = lexer.next_token().unwrap();
        assert!(b.flags.contains(TokenFlags::OCTAL_ESCAPE));
        let c = lexer.next_token().unwrap();
        assert!(!c.flags.contains(TokenFlags::OCTAL_ESCAPE));
    }

    #[test]
    fn test_unterminated() {
        assert!(lex_err("'abc").message.starts_with("UnterminatedString"));
        assert!(lex_err("'ab\nc'").message.starts_with("UnterminatedString"));
        assert!(lex_err("`abc").message.starts_with("UnterminatedTemplate"));
        assert!(lex_err("/* abc").message.starts_with("UnterminatedComment"));
        assert!(lex_err(r#""\x4""#).message.starts_with("InvalidEscape"));
        assert!(lex_err(r#""\u{110000}""#).message.starts_with("InvalidEscape"));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex("+ - * /"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash
            ]
        );
        assert_eq!(lex("=== !== "), vec![TokenKind::EqEqEq, TokenKind::BangEqEq]);
        assert_eq!(lex(">>>="), vec![TokenKind::GtGtGtEq]);
        assert_eq!(lex(">>= >>"), vec![TokenKind::GtGtEq, TokenKind::GtGt]);
        assert_eq!(lex("&&="), vec![TokenKind::AmpAmpEq]);
        assert_eq!(lex("??="), vec![TokenKind::QuestionQuestionEq]);
        assert_eq!(lex("**="), vec![TokenKind::StarStarEq]);
        assert_eq!(lex("=> ..."), vec![TokenKind::Arrow, TokenKind::DotDotDot]);
    }

    #[test]
    fn test_optional_chain_vs_conditional() {
        assert_eq!(lex("a?.b"), vec![ident("a"), TokenKind::QuestionDot, ident("b")]);
        assert_eq!(
            lex("a?.5:1"),
            vec![
                ident("a"),
                TokenKind::Question,
                TokenKind::Number(0.5),
                TokenKind::Colon,
                TokenKind::Number(1.0)
            ]
        );
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        assert_eq!(
            lex("var const let"),
            vec![TokenKind::Var, TokenKind::Const, ident("let")]
        );
        assert_eq!(
            lex("function return yield async"),
            vec![
                TokenKind::Function,
                TokenKind::Return,
                ident("yield"),
                ident("async")
            ]
        );
    }

    #[test]
    fn test_escaped_identifiers() {
        let mut lexer = Lexer::new(r"l\u{65}t v\u{61}r");
        let a = lexer.next_token().unwrap();
        assert_eq!(a.kind, ident("let"));
        assert!(a.is_escaped());
        assert!(!a.is_contextual("let"));
        let b = lexer.next_token().unwrap();
        // escaped reserved words never become keywords
        assert_eq!(b.kind, ident("var"));
        assert!(b.is_escaped());

        assert!(lex_err(r"\u0031abc").message.starts_with("InvalidEscape"));
        assert!(lex_err(r"a\x41").message.starts_with("InvalidEscape"));
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            lex("foo bar_baz $test ünïcode"),
            vec![ident("foo"), ident("bar_baz"), ident("$test"), ident("ünïcode")]
        );
        assert_eq!(
            lex("#priv"),
            vec![TokenKind::PrivateName(Atom::from("priv"))]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            lex("1 // comment\n2"),
            vec![TokenKind::Number(1.0), TokenKind::Number(2.0)]
        );
        assert_eq!(
            lex("1 /* comment */ 2"),
            vec![TokenKind::Number(1.0), TokenKind::Number(2.0)]
        );
        // block comments do not nest
        assert_eq!(
            lex("/* /* */ 1"),
            vec![TokenKind::Number(1.0)]
        );
        assert_eq!(lex("#!/usr/bin/env node\n1"), vec![TokenKind::Number(1.0)]);
    }

    #[test]
    fn test_html_comments() {
        assert_eq!(lex("1 <!-- x\n2"), vec![TokenKind::Number(1.0), TokenKind::Number(2.0)]);
        assert_eq!(lex("1\n--> x\n2"), vec![TokenKind::Number(1.0), TokenKind::Number(2.0)]);

        let mut lexer = Lexer::new("a <!-- b");
        lexer.set_html_comments(false);
        let mut kinds = vec![];
        while let Ok(token) = lexer.next_token() {
            if token.kind == TokenKind::Eof {
                break;
            }
            kinds.push(token.kind);
        }
        assert_eq!(
            kinds,
            vec![
                ident("a"),
                TokenKind::Lt,
                TokenKind::Bang,
                TokenKind::MinusMinus,
                ident("b")
            ]
        );
    }

    #[test]
    fn test_newline_before() {
        let mut lexer = Lexer::new("a\nb /*\n*/ c\r\nd e");
        let flags: Vec<bool> = (0..5)
            .map(|_| lexer.next_token().unwrap().had_newline_before())
            .collect();
        assert_eq!(flags, vec![false, true, true, true, false]);
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new("a\r\n  bb\u{2028}c");
        let a = lexer.next_token().unwrap();
        assert_eq!(a.start_pos, Position::new(1, 0));
        let b = lexer.next_token().unwrap();
        assert_eq!(b.start_pos, Position::new(2, 2));
        assert_eq!(b.end_pos, Position::new(2, 4));
        assert_eq!((b.start, b.end), (5, 7));
        let c = lexer.next_token().unwrap();
        assert_eq!(c.start_pos, Position::new(3, 0));
    }

    #[test]
    fn test_template_parts() {
        let mut lexer = Lexer::new("`a${x}b\r\nc`");
        let head = lexer.next_token().unwrap();
        match &head.kind {
            TokenKind::TemplateHead(part) => assert_eq!(part.raw, "a"),
            other => panic!("expected template head, got {:?}", other),
        }
        lexer.next_token().unwrap(); // x
        let rbrace = lexer.next_token().unwrap();
        assert_eq!(rbrace.kind, TokenKind::RBrace);
        let tail = lexer.rescan_template_continuation(&rbrace).unwrap();
        match &tail.kind {
            TokenKind::TemplateTail(part) => {
                assert_eq!(part.raw, "b\nc");
                assert_eq!(part.cooked.as_ref().map(|c| c.as_str()), Some("b\nc"));
            }
            other => panic!("expected template tail, got {:?}", other),
        }
    }

    #[test]
    fn test_template_invalid_escape_keeps_raw() {
        let mut lexer = Lexer::new(r"`\unicode and \01`");
        let token = lexer.next_token().unwrap();
        match token.kind {
            TokenKind::TemplateNoSub(part) => {
                assert!(part.cooked.is_none());
                assert_eq!(part.raw, r"\unicode and \01");
                assert!(part.escape_error.is_some());
            }
            other => panic!("expected template, got {:?}", other),
        }
    }

    #[test]
    fn test_regexp_rescan() {
        let mut lexer = Lexer::new("/[/]a\\/b/gimsuyd;");
        let slash = lexer.next_token().unwrap();
        assert_eq!(slash.kind, TokenKind::Slash);
        let re = lexer.rescan_as_regexp(&slash).unwrap();
        assert_eq!(
            re.kind,
            TokenKind::RegExp {
                pattern: Atom::from("[/]a\\/b"),
                flags: Atom::from("gimsuyd"),
            }
        );
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_regexp_errors() {
        for (src, tag) in [
            ("/abc", "UnterminatedRegExp"),
            ("/a\nb/", "UnterminatedRegExp"),
            ("/a/gg", "RegexSyntaxError"),
            ("/a/x", "RegexSyntaxError"),
            ("/a/uv", "RegexSyntaxError"),
        ] {
            let mut lexer = Lexer::new(src);
            let slash = lexer.next_token().unwrap();
            let err = lexer.rescan_as_regexp(&slash).unwrap_err();
            assert!(err.message.starts_with(tag), "{}: {}", src, err);
        }
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut lexer = Lexer::new("a b c");
        lexer.next_token().unwrap();
        let checkpoint = lexer.checkpoint();
        assert_eq!(lexer.next_token().unwrap().kind, ident("b"));
        lexer.restore(checkpoint);
        assert_eq!(lexer.next_token().unwrap().kind, ident("b"));
        assert_eq!(lexer.next_token().unwrap().kind, ident("c"));
    }

    #[test]
    fn test_position_at_matches_tokens() {
        let source = "a\r\nbb\u{2028}ccc";
        let mut lexer = Lexer::new(source);
        loop {
            let token = lexer.next_token().unwrap();
            assert_eq!(position_at(source, token.start), token.start_pos);
            if token.kind == TokenKind::Eof {
                break;
            }
        }
    }
}
