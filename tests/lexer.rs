//! Tests for the lexer
//!
//! These tests drive the public lexer directly, and check the lexical errors
//! that only surface once the parser supplies the context (strict mode,
//! tagged templates, regular expression positions).

use esparse::atom::Atom;
use esparse::lexer::{Lexer, Position, TokenKind, position_at};
use esparse::{ErrorKind, ParseOptions};

#[allow(clippy::unwrap_used)]
fn lex(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];
    loop {
        let token = lexer.next_token().unwrap();
        if token.kind == TokenKind::Eof {
            break;
        }
        tokens.push(token.kind);
    }
    tokens
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(Atom::from(name))
}

#[allow(clippy::unwrap_used)]
fn script_error(source: &str) -> esparse::ParseError {
    esparse::parse_script(source).unwrap_err()
}

#[test]
fn test_statement_tokens() {
    assert_eq!(
        lex("let x = a?.b ?? 1;"),
        vec![
            ident("let"),
            ident("x"),
            TokenKind::Eq,
            ident("a"),
            TokenKind::QuestionDot,
            ident("b"),
            TokenKind::QuestionQuestion,
            TokenKind::Number(1.0),
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_reserved_and_contextual_words() {
    assert_eq!(
        lex("if of async await yield static"),
        vec![
            TokenKind::If,
            ident("of"),
            ident("async"),
            ident("await"),
            ident("yield"),
            ident("static"),
        ]
    );
    assert_eq!(lex("#priv"), vec![TokenKind::PrivateName(Atom::from("priv"))]);
}

#[test]
fn test_numeric_forms() {
    assert_eq!(
        lex("0.1e2 0X10 1_0 9007199254740993n"),
        vec![
            TokenKind::Number(10.0),
            TokenKind::Number(16.0),
            TokenKind::Number(10.0),
            TokenKind::BigInt(Atom::from("9007199254740993")),
        ]
    );
}

#[test]
fn test_slash_is_division_to_the_lexer() {
    // The lexer never guesses; the parser asks for a regex rescan
    assert_eq!(
        lex("/a/g"),
        vec![TokenKind::Slash, ident("a"), TokenKind::Slash, ident("g")]
    );
}

#[test]
fn test_positions_across_line_terminators() {
    let source = "a\r\nb\rc\u{2028}d\ne";
    let mut lexer = Lexer::new(source);
    let mut positions = vec![];
    loop {
        let Ok(token) = lexer.next_token() else {
            panic!("unexpected lex error");
        };
        if token.kind == TokenKind::Eof {
            break;
        }
        assert_eq!(position_at(source, token.start), token.start_pos);
        positions.push((token.start_pos.line, token.start_pos.column));
    }
    assert_eq!(positions, vec![(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);
}

#[test]
fn test_columns_count_code_points() {
    let mut lexer = Lexer::new("'😀é' x");
    let Ok(_) = lexer.next_token() else {
        panic!("unexpected lex error");
    };
    let Ok(x) = lexer.next_token() else {
        panic!("unexpected lex error");
    };
    assert_eq!(x.start_pos, Position::new(1, 5));
    // Offsets stay in bytes
    assert_eq!(x.start, "'😀é' ".len());
}

#[test]
fn test_error_positions() {
    let err = script_error("let a = 1;\nlet b = 'open");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert!(err.message.starts_with("UnterminatedString"));
    assert_eq!(err.line(), 2);
    assert_eq!(err.column(), 8);

    let err = script_error("/* never closed");
    assert!(err.message.starts_with("UnterminatedComment"));
    assert_eq!(err.offset(), 0);
}

#[test]
fn test_strict_mode_numbers_and_escapes() {
    assert!(esparse::parse_script("017 + 08").is_ok());
    assert!(esparse::parse_script("'\\07'").is_ok());

    let err = script_error("'use strict'; 017");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert!(err.message.starts_with("InvalidNumericLiteral"));

    let err = script_error("'use strict'; 08");
    assert!(err.message.contains("leading zeros"));

    let err = script_error("function f() { 'use strict'; return '\\01'; }");
    assert!(err.message.starts_with("InvalidEscape"));

    // An octal escape earlier in the prologue is caught once "use strict" appears
    let err = script_error("'\\01'; 'use strict';");
    assert!(err.message.starts_with("InvalidEscape"));
    assert_eq!(err.offset(), 0);

    let err = esparse::parse_module("0755").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lexical);
}

#[test]
fn test_template_escapes() {
    // Tagged templates may hold invalid escapes; the cooked value is absent
    assert!(esparse::parse_script("tag`\\xZ ${a} \\u{110000}`").is_ok());

    let err = script_error("`\\xZ`");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert!(err.message.starts_with("InvalidEscape"));

    let err = script_error("`ok ${a} \\07`");
    assert!(err.message.starts_with("TemplateOctalEscape"));

    let err = script_error("`open ${a}");
    assert_eq!(err.kind, ErrorKind::Lexical);
}

#[test]
fn test_regular_expression_literals() {
    assert!(esparse::parse_script("x = /[/]+\\//dgimsy").is_ok());
    assert!(esparse::parse_script("x = /a/v").is_ok());
    assert!(esparse::parse_script("if (a) /re/.test(b)").is_ok());
    assert!(esparse::parse_script("a = b\n/c/d").is_ok());

    for source in ["x = /a/gg", "x = /a/x", "x = /a/uv", "x = /a/\\u0067"] {
        let err = script_error(source);
        assert_eq!(err.kind, ErrorKind::Lexical, "{}", source);
        assert!(err.message.starts_with("RegexSyntaxError"), "{}", source);
    }

    let err = script_error("x = /open\n/");
    assert!(err.message.starts_with("UnterminatedRegExp"));
}

#[test]
fn test_html_comments_follow_the_goal() {
    assert!(esparse::parse_script("x = 1 <!-- trailing\n--> whole line\n").is_ok());
    let options = ParseOptions::script().with_web_compat(false);
    assert!(esparse::parse("<!-- x", &options).is_err());
    assert!(esparse::parse_module("--> x").is_err());
}

#[test]
fn test_escaped_keywords() {
    assert_eq!(lex("\\u0061bc"), vec![ident("abc")]);
    let err = script_error("v\\u0061r x = 1");
    assert_eq!(err.kind, ErrorKind::ReservedWord);
    assert!(err.message.contains("escaped"));
    // Escapes that spell a contextual word keep it an identifier
    assert!(esparse::parse_script("var l\\u0065t = 1").is_ok());
}

#[test]
fn test_invalid_characters() {
    let err = script_error("a @ b");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert!(err.message.starts_with("InvalidCharacter"));
    assert_eq!(err.offset(), 2);
}

#[test]
fn test_identifiers_use_id_start() {
    // U+309B is ID_Start but not XID_Start
    assert_eq!(lex("\u{309B}a"), vec![ident("\u{309B}a")]);
    assert!(esparse::parse_script("var \u{309B} = 1, \\u309C = 2;").is_ok());
}
