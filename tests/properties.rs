//! Whole-program properties of the parser
//!
//! Checked over a corpus of varied programs rather than one construct at
//! a time.

use std::sync::mpsc;
use std::thread;

use esparse::ast::*;
use esparse::{ErrorKind, ParseOptions, Program, parse, parse_module, parse_script};
use serde_json::Value;

/// Parses deep enough trees to need more than the default test thread stack
const BIG_STACK: usize = 64 * 1024 * 1024;

const CORPUS: &[&str] = &[
    "var a = 1, b = a + 2 * 3;",
    "let [x, , ...rest] = list; const { p, q: [r = 1] } = obj;",
    "function f(a, b = 1, ...c) { return a ? b : c; } function g(a) { 'use strict'; return a; }",
    "async function* g() { for await (const x of y) yield* x; }",
    "class A extends B { #x = 1; static s; constructor() { super(); } get x() { return this.#x; } static {} }",
    "x = { a, b: 1, [c]: 2, d() {}, get e() { return 1; }, ...f };",
    "label: for (let i = 0; i < 10; i++) { if (i) continue label; else break; }",
    "switch (v) { case 1: case 2: f(); break; default: g(); }",
    "try { risky(); } catch ({ message }) { log(message); } finally { done(); }",
    "const t = tag`a${b}c${d}` + `plain`;",
    "a?.b?.[c]?.(d) ?? e;",
    "new Foo.Bar(...args); new.target;",
    "([a, { b }] = [1, { b: 2 }]); (x) => x; async (y) => { await y; };",
    "re = /ab+c/gi; n = 1_000.5e3 + 0x1f + 10n;",
    "do x++; while (x < 10)\nwith (obj) { prop; }",
    "(function () { 'use strict'; var o = { __proto__: null }; })();",
    "if (a) function decl() {} else b();",
    "let\nfoo; yield = await + 1;",
];

const MODULE_CORPUS: &[&str] = &[
    "import d, { a as b, 'c-d' as e } from 'm'; export { b, e as 'f-g' };",
    "export default function () {} export const x = await import('y');",
    "export * as ns from 'm'; export * from 'n'; import.meta.url;",
    "import * as all from 'm'; export class K extends all.Base {}",
];

/// Run `f` on a thread with a large stack
fn with_big_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    let handle = thread::Builder::new()
        .stack_size(BIG_STACK)
        .spawn(f)
        .unwrap();
    handle.join().unwrap()
}

/// Check every ESTree node lies within `parent` and covers valid source text
fn check_spans(source: &str, node: &Value, parent: (u64, u64), path: &str) {
    match node {
        Value::Object(map) => {
            let mut bounds = parent;
            if let (Some(start), Some(end)) = (
                map.get("start").and_then(Value::as_u64),
                map.get("end").and_then(Value::as_u64),
            ) {
                assert!(start <= end, "{}: start {} > end {}", path, start, end);
                assert!(
                    parent.0 <= start && end <= parent.1,
                    "{}: {}..{} escapes parent {}..{} in {:?}",
                    path,
                    start,
                    end,
                    parent.0,
                    parent.1,
                    source
                );
                assert!(
                    source.get(start as usize..end as usize).is_some(),
                    "{}: {}..{} is not a char boundary range",
                    path,
                    start,
                    end
                );
                bounds = (start, end);
            }
            for (key, child) in map {
                if key != "loc" {
                    check_spans(source, child, bounds, &format!("{}.{}", path, key));
                }
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                check_spans(source, child, parent, &format!("{}[{}]", path, i));
            }
        }
        _ => {}
    }
}

#[test]
fn test_child_spans_stay_inside_parents() {
    with_big_stack(|| {
        let sources = CORPUS
            .iter()
            .map(|s| (*s, ParseOptions::script()))
            .chain(MODULE_CORPUS.iter().map(|s| (*s, ParseOptions::module())));
        for (source, options) in sources {
            let program = parse(source, &options).unwrap();
            let json = program.to_estree();
            let len = source.len() as u64;
            assert_eq!(json["start"], 0);
            assert_eq!(json["end"], len);
            check_spans(source, &json, (0, len), "Program");
        }
    });
}

#[test]
fn test_spans_with_multibyte_text() {
    let source = "const café = '😀'; /* ü */ f(café, `é${'😀'}`);";
    let program = parse_script(source).unwrap();
    check_spans(source, &program.to_estree(), (0, source.len() as u64), "Program");
}

#[test]
fn test_statement_text_matches_span() {
    let source = "let a = 1;\nfoo(a)\n\nclass K {}";
    let program = parse_script(source).unwrap();
    let texts: Vec<&str> = program
        .body
        .iter()
        .map(|stmt| {
            let span = stmt.span();
            source.get(span.start..span.end).unwrap_or("")
        })
        .collect();
    assert_eq!(texts, vec!["let a = 1;", "foo(a)", "class K {}"]);
}

#[test]
fn test_parsing_is_idempotent() {
    for source in CORPUS {
        let first = parse_script(source).unwrap();
        // Unrelated work in between must not leak into the next parse
        let _ = parse_module(MODULE_CORPUS.first().copied().unwrap_or_default());
        let _ = parse_script("let a; let a;");
        let second = parse_script(source).unwrap();
        assert_eq!(first, second, "{}", source);
        assert_eq!(first.to_estree(), second.to_estree());
    }
    for source in ["let [...a, b] = [];", "(a, (b, c)) => 0", "'use strict'; 017"] {
        assert_eq!(parse_script(source), parse_script(source));
    }
}

#[test]
fn test_loc_does_not_change_the_shape() {
    let with_loc = ParseOptions::default().with_loc(true);
    for source in CORPUS {
        let plain = parse_script(source).unwrap();
        let located = parse(source, &with_loc).unwrap();
        assert_eq!(plain.body.len(), located.body.len());
        assert_eq!(plain.span.start, located.span.start);
        assert_eq!(plain.span.end, located.span.end);
        assert!(located.span.loc.is_some());
    }
}

#[test]
fn test_reserved_binding_invariant() {
    let names = ["let", "eval", "arguments", "yield", "static", "implements", "interface"];
    let forms = [
        "let {} = 1;",
        "const {} = 1;",
        "class {} {}",
        "function f({}) {}",
        "({}) => 0;",
        "let [{}] = [];",
        "try {} catch ({}) {}",
    ];
    let strict = ParseOptions::script().with_strict(true);
    let module = ParseOptions::module();
    for name in names {
        for form in forms {
            let source = form.replace("{}", name);
            for options in [&strict, &module] {
                let err = parse(&source, options).unwrap_err();
                assert!(
                    matches!(
                        err.kind,
                        ErrorKind::ReservedWord | ErrorKind::UnexpectedToken
                    ),
                    "{} (module: {}): {}",
                    source,
                    options.module,
                    err
                );
            }
        }
    }
    // Lexical declarations may never bind `let`, not even in sloppy scripts
    for form in ["let let = 1;", "const let = 1;", "let [let] = [];", "class let {}"] {
        assert!(parse_script(form).is_err(), "{}", form);
    }
    // `let` as a plain identifier stays available to sloppy scripts
    for source in ["let = 1;", "let + 1;", "let.x;", "let(1);", "var let;", "let;"] {
        assert!(parse_script(source).is_ok(), "{}", source);
    }
}

#[test]
fn test_duplicate_lexical_bindings() {
    assert_eq!(
        parse_script("let a; let a;").unwrap_err().kind,
        ErrorKind::DuplicateBinding
    );
    assert_eq!(
        parse_script("let a; var a;").unwrap_err().kind,
        ErrorKind::DuplicateBinding
    );
    assert!(parse_script("var a; var a;").is_ok());
}

#[test]
fn test_let_as_identifier() {
    let program = parse_script("let = 1;").unwrap();
    let Some(Statement::Expression(stmt)) = program.body.first() else {
        panic!("expected an expression statement");
    };
    let Expression::Assignment(assign) = &stmt.expression else {
        panic!("expected an assignment");
    };
    assert!(matches!(&*assign.left, Pattern::Identifier(id) if id.name.as_str() == "let"));

    for options in [ParseOptions::module(), ParseOptions::script().with_strict(true)] {
        let err = parse("let = 1;", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReservedWord);
    }
    let no_web_compat = ParseOptions::script().with_web_compat(false);
    assert!(parse("let = 1;", &no_web_compat).is_err());
}

#[test]
fn test_deep_nesting_fails_cleanly() {
    let results = with_big_stack(|| {
        let depth = 100_000;
        let sources = [
            "[".repeat(depth),
            "(".repeat(depth),
            "{".repeat(depth),
            "- ".repeat(depth),
            "a = ".repeat(depth),
            "function f() {".repeat(depth),
            "class A { m() { ".repeat(depth),
            "class A extends B { static { ".repeat(depth),
            "x => ".repeat(depth),
            format!("{}X", "new ".repeat(depth)),
            format!("{}a", "a ** ".repeat(depth)),
            format!("{}a", "a + ".repeat(depth)),
            format!("a{}", ".b".repeat(depth)),
            format!("f{}", "(x)".repeat(depth)),
            format!("{}a", "a || ".repeat(depth)),
        ];
        sources
            .iter()
            .map(|source| parse_script(source).map(|_| ()).map_err(|err| err.kind))
            .collect::<Vec<_>>()
    });
    for result in results {
        assert_eq!(result, Err(ErrorKind::NestingLimit));
    }
}

#[test]
fn test_nesting_below_the_limit_parses() {
    with_big_stack(|| {
        let depth = 100;
        let source = format!("{}x{}", "[".repeat(depth), "]".repeat(depth));
        let program = parse_script(&source).unwrap();
        check_spans(&source, &program.to_estree(), (0, source.len() as u64), "Program");

        // Each parenthesis counts once
        let source = format!("{}x{}", "(".repeat(250), ")".repeat(250));
        assert!(parse_script(&source).is_ok());

        let options = ParseOptions::default().with_max_nesting_depth(2_000);
        let source = format!("{}x{}", "(".repeat(1_000), ")".repeat(1_000));
        assert!(parse(&source, &options).is_ok());
    });
}

#[test]
fn test_operator_chains_below_the_limit() {
    let depth = 200;
    let sources = [
        format!("{}X", "new ".repeat(depth)),
        format!("{}a", "a ** ".repeat(depth)),
        format!("{}a", "a + ".repeat(depth)),
        format!("a{}", ".b".repeat(depth)),
        format!("f{}", "(x)".repeat(depth)),
        format!("{}a", "a ?? ".repeat(depth)),
    ];
    for source in sources {
        let program = with_big_stack({
            let source = source.clone();
            move || parse_script(&source).unwrap()
        });
        // Serialising and dropping run on the default test thread
        let json = program.to_estree();
        check_spans(&source, &json, (0, source.len() as u64), "Program");
        drop(json);
        drop(program);
    }
}

#[test]
fn test_chain_height_counts_toward_the_limit() {
    let options = ParseOptions::default().with_max_nesting_depth(64);
    let within = format!("{}a", "a + ".repeat(40));
    assert!(parse(&within, &options).is_ok());

    for source in [
        format!("{}a", "a + ".repeat(80)),
        format!("a{}", "[0]".repeat(80)),
        format!("{}x", "a.b(".repeat(40)) + &")".repeat(40),
    ] {
        let err = parse(&source, &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NestingLimit, "{}", source);
    }
}

#[test]
fn test_arrow_parameter_defaults() {
    for source in [
        "(a = 1) => 0",
        "(a, b = a) => 0",
        "(a = 1, ...b) => 0",
        "async (a = 1) => 0",
        "({ a } = {}) => 0",
        "([a] = [1], { b } = {}) => a + b",
    ] {
        assert!(parse_script(source).is_ok(), "{}", source);
    }

    let program = parse_script("(a = 1) => a").unwrap();
    let json = program.to_estree();
    let param = &json["body"][0]["expression"]["params"][0];
    assert_eq!(param["type"], "AssignmentPattern");
    assert_eq!(param["left"]["name"], "a");
    assert_eq!(param["right"]["value"], 1.0);

    // A rest parameter never takes a default
    for source in ["(...a = 1) => 0", "async (...a = 1) => 0", "(a, ...[b] = c) => 0"] {
        assert!(parse_script(source).is_err(), "{}", source);
    }
    let err = parse_script("(a += 1) => 0").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArrowParameters);
}

#[test]
fn test_parallel_parses_are_independent() {
    let expected: Vec<Program> = CORPUS.iter().map(|s| parse_script(s).unwrap()).collect();

    let (tx, rx) = mpsc::channel::<(usize, Program)>();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let tx = tx.clone();
            thread::spawn(move || {
                for (i, source) in CORPUS.iter().enumerate() {
                    if i % 4 == worker {
                        let program = parse_script(source).unwrap();
                        tx.send((i, program)).unwrap();
                    }
                }
            })
        })
        .collect();
    drop(tx);

    let mut received = 0;
    for (i, program) in rx {
        assert_eq!(Some(&program), expected.get(i), "{:?}", CORPUS.get(i));
        received += 1;
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(received, CORPUS.len());
}
