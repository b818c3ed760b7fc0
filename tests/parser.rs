//! Tests for the parser
//!
//! These tests verify that the parser turns JavaScript source into the
//! expected syntax tree shapes.

use esparse::ast::*;
use esparse::{ParseOptions, Parser};

#[allow(clippy::unwrap_used)]
fn parse(source: &str) -> Program {
    Parser::new(source, &ParseOptions::default())
        .parse_program()
        .unwrap()
}

#[allow(clippy::unwrap_used)]
fn parse_module(source: &str) -> Program {
    Parser::new(source, &ParseOptions::module())
        .parse_program()
        .unwrap()
}

/// Expression of the only statement of `source`
#[allow(clippy::panic)]
fn expr(source: &str) -> Expression {
    let prog = parse(source);
    match prog.body.into_iter().next() {
        Some(Statement::Expression(stmt)) => stmt.expression.unparenthesized().clone(),
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_variable_declarations() {
    let prog = parse("var a = 1, b; let c = 2; const d = 3;");
    let kinds: Vec<VariableKind> = prog
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::VariableDeclaration(decl) => Some(decl.kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![VariableKind::Var, VariableKind::Let, VariableKind::Const]
    );
    let Some(Statement::VariableDeclaration(first)) = prog.body.first() else {
        panic!("expected declaration");
    };
    assert_eq!(first.declarations.len(), 2);
    assert!(first.declarations.get(1).is_some_and(|d| d.init.is_none()));
    // The terminating semicolon belongs to the declaration
    assert_eq!(first.span, Span::new(0, 13));
}

#[test]
fn test_binary_precedence() {
    let Expression::Binary(add) = expr("1 + 2 * 3") else {
        panic!("expected binary");
    };
    assert_eq!(add.operator, BinaryOp::Add);
    assert!(matches!(
        *add.right,
        Expression::Binary(BinaryExpression {
            operator: BinaryOp::Mul,
            ..
        })
    ));
}

#[test]
fn test_exponent_is_right_associative() {
    let Expression::Binary(outer) = expr("a ** b ** c") else {
        panic!("expected binary");
    };
    assert!(matches!(*outer.left, Expression::Identifier(_)));
    assert!(matches!(
        *outer.right,
        Expression::Binary(BinaryExpression {
            operator: BinaryOp::Exp,
            ..
        })
    ));
    assert!(Parser::new("(-a) ** b", &ParseOptions::default()).parse_program().is_ok());
}

#[test]
fn test_logical_operators() {
    let Expression::Logical(or) = expr("a || b && c") else {
        panic!("expected logical");
    };
    assert_eq!(or.operator, LogicalOp::Or);
    let Expression::Logical(nullish) = expr("a ?? (b || c)") else {
        panic!("expected logical");
    };
    assert_eq!(nullish.operator, LogicalOp::NullishCoalescing);
}

#[test]
fn test_conditional_and_sequence() {
    assert!(matches!(expr("a ? b : c ? d : e"), Expression::Conditional(_)));
    let Expression::Sequence(seq) = expr("a, b, c") else {
        panic!("expected sequence");
    };
    assert_eq!(seq.expressions.len(), 3);
}

#[test]
fn test_assignment_targets() {
    let Expression::Assignment(assign) = expr("a.b = c") else {
        panic!("expected assignment");
    };
    assert!(matches!(*assign.left, Pattern::Member(_)));

    let Expression::Assignment(assign) = expr("[a, b] = [b, a]") else {
        panic!("expected assignment");
    };
    assert!(matches!(*assign.left, Pattern::Array(_)));

    let Expression::Assignment(assign) = expr("x ??= 1") else {
        panic!("expected assignment");
    };
    assert_eq!(assign.operator, AssignmentOp::NullishAssign);
}

#[test]
fn test_update_and_unary() {
    let Expression::Update(update) = expr("x++") else {
        panic!("expected update");
    };
    assert!(!update.prefix);
    let Expression::Update(update) = expr("--x") else {
        panic!("expected update");
    };
    assert!(update.prefix);
    assert!(matches!(
        expr("typeof void !x"),
        Expression::Unary(UnaryExpression {
            operator: UnaryOp::Typeof,
            ..
        })
    ));
}

#[test]
fn test_arrow_functions() {
    let Expression::ArrowFunction(arrow) = expr("(a, b = 1, ...c) => a") else {
        panic!("expected arrow");
    };
    assert_eq!(arrow.params.len(), 3);
    assert!(matches!(arrow.params.get(1), Some(Pattern::Assignment(_))));
    assert!(matches!(arrow.params.get(2), Some(Pattern::Rest(_))));
    assert!(matches!(arrow.body, ArrowFunctionBody::Expression(_)));

    let Expression::ArrowFunction(arrow) = expr("async x => { await x; }") else {
        panic!("expected arrow");
    };
    assert!(arrow.async_);
    assert!(matches!(arrow.body, ArrowFunctionBody::Block(_)));

    let Expression::ArrowFunction(arrow) = expr("async ({ a }, [b]) => a + b") else {
        panic!("expected arrow");
    };
    assert!(arrow.async_);
    assert_eq!(arrow.params.len(), 2);
}

#[test]
fn test_async_is_still_an_identifier() {
    assert!(matches!(expr("async(1, 2)"), Expression::Call(_)));
    assert!(matches!(expr("async"), Expression::Identifier(_)));
    // A line break after `async` ends the arrow head
    let prog = parse("async\nfunction f() {}");
    assert_eq!(prog.body.len(), 2);
}

#[test]
fn test_function_declarations() {
    let prog = parse("function* gen(a, b) { yield a; yield* b; } async function run() {}");
    let Some(Statement::FunctionDeclaration(gen_fn)) = prog.body.first() else {
        panic!("expected function");
    };
    assert!(gen_fn.generator);
    assert_eq!(gen_fn.params.len(), 2);
    let Some(Statement::FunctionDeclaration(run)) = prog.body.get(1) else {
        panic!("expected function");
    };
    assert!(run.async_);
    assert_eq!(run.id.as_ref().map(|id| id.name.as_str()), Some("run"));
}

#[test]
fn test_yield_is_identifier_outside_generators() {
    assert!(matches!(expr("yield"), Expression::Identifier(_)));
    let prog = parse("function* g() { yield\n1 }");
    let Some(Statement::FunctionDeclaration(g)) = prog.body.first() else {
        panic!("expected function");
    };
    // `yield` without an argument before the line break
    assert_eq!(g.body.body.len(), 2);
}

#[test]
fn test_class_members() {
    let prog = parse(
        "class A extends B {
            static #count = 0;
            name;
            constructor() { super(); }
            get value() { return this.#count; }
            set value(v) {}
            static async *items() {}
            #secret() {}
            static { A.ready = true; }
        }",
    );
    let Some(Statement::ClassDeclaration(class)) = prog.body.first() else {
        panic!("expected class");
    };
    assert!(class.super_class.is_some());
    let kinds: Vec<&str> = class
        .body
        .body
        .iter()
        .map(|element| match element {
            ClassElement::Method(m) => m.kind.as_str(),
            ClassElement::Property(_) => "field",
            ClassElement::StaticBlock(_) => "static-block",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["field", "field", "constructor", "get", "set", "method", "method", "static-block"]
    );
}

#[test]
fn test_object_literal_forms() {
    let Expression::Object(object) = expr("({ a, b: 1, [c]: 2, d() {}, get e() { return 1; }, ...f, 'g': 3, 4: 5 })")
    else {
        panic!("expected object");
    };
    assert_eq!(object.properties.len(), 8);
    let Some(ObjectProperty::Property(shorthand)) = object.properties.first() else {
        panic!("expected property");
    };
    assert!(shorthand.shorthand);
    let Some(ObjectProperty::Property(computed)) = object.properties.get(2) else {
        panic!("expected property");
    };
    assert!(computed.key.is_computed());
    let Some(ObjectProperty::Property(method)) = object.properties.get(3) else {
        panic!("expected property");
    };
    assert!(method.method);
    assert!(matches!(object.properties.get(5), Some(ObjectProperty::Spread(_))));
}

#[test]
fn test_array_holes_and_spread() {
    let Expression::Array(array) = expr("[, a, , ...b]") else {
        panic!("expected array");
    };
    assert_eq!(array.elements.len(), 4);
    assert!(array.elements.first().is_some_and(|e| e.is_none()));
    assert!(matches!(array.elements.get(3), Some(Some(ArrayElement::Spread(_)))));
}

#[test]
fn test_member_and_calls() {
    let Expression::Call(call) = expr("a.b[c](d, ...e)") else {
        panic!("expected call");
    };
    assert_eq!(call.arguments.len(), 2);
    assert!(matches!(*call.callee, Expression::Member(_)));

    let Expression::New(new) = expr("new Foo.Bar(1)") else {
        panic!("expected new");
    };
    assert_eq!(new.arguments.len(), 1);
    assert!(matches!(expr("new Foo"), Expression::New(_)));
    assert!(matches!(expr("new new X()()"), Expression::New(_)));
}

#[test]
fn test_optional_chaining() {
    let Expression::Chain(chain) = expr("a?.b.c()") else {
        panic!("expected chain");
    };
    let Expression::Call(call) = &*chain.expression else {
        panic!("expected call inside chain");
    };
    assert!(!call.optional);
    assert!(matches!(expr("a?.[0]"), Expression::Chain(_)));
    assert!(matches!(expr("a?.()"), Expression::Chain(_)));
    // `?.5` is a conditional with a number
    assert!(matches!(expr("a?.5:1"), Expression::Conditional(_)));
}

#[test]
fn test_templates() {
    let Expression::Template(template) = expr("`a${b}c${d}e`") else {
        panic!("expected template");
    };
    assert_eq!(template.quasis.len(), 3);
    assert_eq!(template.expressions.len(), 2);
    assert!(template.quasis.last().is_some_and(|q| q.tail));

    let Expression::TaggedTemplate(tagged) = expr(r"tag`\unicode`") else {
        panic!("expected tagged template");
    };
    assert!(tagged.quasi.quasis.first().is_some_and(|q| q.cooked.is_none()));
}

#[test]
fn test_regex_versus_division() {
    let Expression::Literal(Literal {
        value: LiteralValue::RegExp { pattern, flags },
        ..
    }) = expr("/a[/]b/gi")
    else {
        panic!("expected regex");
    };
    assert_eq!(pattern.as_str(), "a[/]b");
    assert_eq!(flags.as_str(), "gi");
    assert!(matches!(expr("a / b / c"), Expression::Binary(_)));
    assert!(matches!(expr("(a) / 2"), Expression::Binary(_)));
    let prog = parse("x = a\n/b/g");
    // No ASI: the slash continues the expression as division
    assert_eq!(prog.body.len(), 1);
}

#[test]
fn test_meta_properties() {
    let prog = parse("function f() { return new.target; }");
    assert_eq!(prog.body.len(), 1);
    let prog = parse_module("import.meta.url; await import('./x.js');");
    assert_eq!(prog.body.len(), 2);
}

#[test]
fn test_control_flow_statements() {
    let prog = parse(
        "if (a) b; else c;
         for (;;) break;
         for (var i = 0; i < 1; i++) continue;
         for (const k in o);
         for (const [k, v] of m);
         while (x) x--;
         do x++; while (x < 10)
         switch (x) { case 1: default: }
         try { f(); } catch { } finally { }
         label: for (;;) { break label; }
         throw new Error('x');
         debugger;
         ;",
    );
    let names: Vec<&str> = prog
        .body
        .iter()
        .map(|stmt| match stmt {
            Statement::If(_) => "if",
            Statement::For(_) => "for",
            Statement::ForIn(_) => "for-in",
            Statement::ForOf(_) => "for-of",
            Statement::While(_) => "while",
            Statement::DoWhile(_) => "do-while",
            Statement::Switch(_) => "switch",
            Statement::Try(_) => "try",
            Statement::Labeled(_) => "labeled",
            Statement::Throw(_) => "throw",
            Statement::Debugger(_) => "debugger",
            Statement::Empty(_) => "empty",
            _ => "other",
        })
        .collect();
    assert_eq!(
        names,
        vec![
            "if", "for", "for", "for-in", "for-of", "while", "do-while", "switch", "try",
            "labeled", "throw", "debugger", "empty"
        ]
    );
}

#[test]
fn test_for_await() {
    let prog = parse("async function f() { for await (const x of y) {} }");
    let Some(Statement::FunctionDeclaration(f)) = prog.body.first() else {
        panic!("expected function");
    };
    assert!(matches!(
        f.body.body.first(),
        Some(Statement::ForOf(ForOfStatement { await_: true, .. }))
    ));
}

#[test]
fn test_asi() {
    let prog = parse("a\nb\n++c\nreturn_ = 1");
    assert_eq!(prog.body.len(), 4);
    let prog = parse("let x = 1\nlet y = 2");
    assert_eq!(prog.body.len(), 2);
    assert!(Parser::new("a b", &ParseOptions::default()).parse_program().is_err());
}

#[test]
fn test_directives() {
    let prog = parse("'use strict'; function f() { \"use asm\"; return 1; }");
    let Some(Statement::Expression(first)) = prog.body.first() else {
        panic!("expected directive");
    };
    assert_eq!(first.directive.as_ref().map(|d| d.as_str()), Some("use strict"));
    let Some(Statement::FunctionDeclaration(f)) = prog.body.get(1) else {
        panic!("expected function");
    };
    let Some(Statement::Expression(inner)) = f.body.body.first() else {
        panic!("expected directive");
    };
    assert_eq!(inner.directive.as_ref().map(|d| d.as_str()), Some("use asm"));
    // Parenthesized strings are not directives
    let prog = parse("('use strict'); with (a) {}");
    assert_eq!(prog.body.len(), 2);
}

#[test]
fn test_module_declarations() {
    let prog = parse_module(
        "import a, { b as c } from 'm';
         export const d = 1;
         export { c as e };
         export default function () {}
         export * as ns from 'n';",
    );
    assert!(matches!(prog.body.first(), Some(Statement::Import(_))));
    assert!(matches!(prog.body.get(1), Some(Statement::ExportNamed(_))));
    assert!(matches!(prog.body.get(3), Some(Statement::ExportDefault(_))));
    let Some(Statement::ExportAll(all)) = prog.body.get(4) else {
        panic!("expected export all");
    };
    assert_eq!(all.exported.as_ref().map(|e| e.name()), Some("ns"));
    assert_eq!(prog.source_type, SourceType::Module);
}

#[test]
fn test_top_level_await() {
    let prog = parse_module("await x;");
    let Some(Statement::Expression(stmt)) = prog.body.first() else {
        panic!("expected expression");
    };
    assert!(matches!(stmt.expression, Expression::Await(_)));
    // In a script `await` is an ordinary identifier
    assert!(matches!(expr("await"), Expression::Identifier(_)));
}

#[test]
fn test_hashbang_and_html_comments() {
    let prog = parse("#!/usr/bin/env node\nx <!-- comment\n--> also comment\ny");
    assert_eq!(prog.body.len(), 2);
    let err = Parser::new("<!-- comment", &ParseOptions::module())
        .parse_program()
        .unwrap_err();
    assert_eq!(err.kind, esparse::ErrorKind::UnexpectedToken);
}

#[test]
fn test_loc_attachment() {
    let options = ParseOptions::default().with_loc(true);
    let prog = Parser::new("a;\n  b;", &options).parse_program().unwrap();
    let Some(stmt) = prog.body.get(1) else {
        panic!("expected two statements");
    };
    let loc = stmt.span().loc.unwrap();
    assert_eq!((loc.start.line, loc.start.column), (2, 2));
    assert_eq!((loc.end.line, loc.end.column), (2, 4));
    assert!(parse("a").body.first().unwrap().span().loc.is_none());
}

#[test]
fn test_arrows_only_start_assignment_expressions() {
    let options = ParseOptions::default();
    for source in ["a || () => b", "a + x => x", "a ?? async () => b"] {
        assert!(
            Parser::new(source, &options).parse_program().is_err(),
            "{}",
            source
        );
    }
    let Expression::Logical(logical) = expr("a || (() => b)") else {
        panic!("expected a logical expression");
    };
    assert!(matches!(
        logical.right.unparenthesized(),
        Expression::ArrowFunction(_)
    ));
}
