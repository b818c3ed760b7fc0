//! Tests for destructuring patterns
//!
//! Covers binding patterns in declarations and parameters, and the
//! reinterpretation of object/array literals as assignment patterns.

use esparse::ast::*;
use esparse::{BindingKind, ErrorKind, ParseOptions, parse_script, to_pattern};

#[allow(clippy::unwrap_used)]
fn parse(source: &str) -> Program {
    parse_script(source).unwrap()
}

fn error_kind(source: &str) -> Option<ErrorKind> {
    parse_script(source).err().map(|err| err.kind)
}

/// The expression of a one-statement script, without parentheses
#[allow(clippy::unwrap_used, clippy::panic)]
fn literal(source: &str) -> Expression {
    let program = parse(source);
    match program.body.into_iter().next() {
        Some(Statement::Expression(stmt)) => stmt.expression.unparenthesized().clone(),
        other => panic!("expected expression statement, got {:?}", other),
    }
}

fn names(pattern: &Pattern) -> Vec<&str> {
    pattern.bound_names().iter().map(|id| id.name.as_str()).collect()
}

#[test]
fn test_array_destructuring_declaration() {
    let prog = parse("let [a, b, ...rest] = [1, 2, 3, 4];");
    assert_eq!(prog.body.len(), 1);
    let Some(Statement::VariableDeclaration(decl)) = prog.body.first() else {
        panic!("expected declaration");
    };
    assert_eq!(decl.kind, VariableKind::Let);
    assert_eq!(decl.declarations.len(), 1);
    let declarator = decl.declarations.first().unwrap();

    let Pattern::Array(array) = &declarator.id else {
        panic!("expected array pattern");
    };
    assert_eq!(array.elements.len(), 3);
    assert!(matches!(array.elements.first(), Some(Some(Pattern::Identifier(id))) if id.name.as_str() == "a"));
    assert!(matches!(array.elements.get(1), Some(Some(Pattern::Identifier(id))) if id.name.as_str() == "b"));
    let Some(Some(Pattern::Rest(rest))) = array.elements.get(2) else {
        panic!("expected rest element");
    };
    assert!(matches!(&*rest.argument, Pattern::Identifier(id) if id.name.as_str() == "rest"));

    let Some(Expression::Array(init)) = &declarator.init else {
        panic!("expected array initializer");
    };
    let values: Vec<f64> = init
        .elements
        .iter()
        .filter_map(|element| match element {
            Some(ArrayElement::Expression(Expression::Literal(Literal {
                value: LiteralValue::Number(n),
                ..
            }))) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_rest_must_be_last() {
    assert_eq!(
        error_kind("let [...a, b] = [];"),
        Some(ErrorKind::InvalidDestructuringTarget)
    );
    assert_eq!(
        error_kind("[...a, b] = [];"),
        Some(ErrorKind::InvalidDestructuringTarget)
    );
    assert_eq!(
        error_kind("({ ...a, b } = {});"),
        Some(ErrorKind::InvalidDestructuringTarget)
    );
    assert_eq!(
        error_kind("let { ...a, b } = {};"),
        Some(ErrorKind::InvalidDestructuringTarget)
    );
}

#[test]
fn test_rest_restrictions() {
    for source in [
        "[...a = 1] = x",
        "[...a,] = x",
        "({ ...{ a, b } } = x)",
        "({ ...[a, b] } = x)",
        "({ ...obj1, } = x)",
    ] {
        assert_eq!(
            error_kind(source),
            Some(ErrorKind::InvalidDestructuringTarget),
            "{}",
            source
        );
    }
    // Nested patterns are fine behind an array rest
    assert!(parse_script("[...[a, b]] = x").is_ok());
    assert!(parse_script("({ ...a.b } = x)").is_ok());
    // A trailing comma after a spread is only a problem for patterns
    assert!(parse_script("x = [...a,]; y = { ...b, }").is_ok());
}

#[test]
fn test_non_assignable_elements() {
    for source in ["[x()] = y", "[a + 1] = y", "[a--] = y", "[1, a] = y", "[++a] = y", "({ a: 1 } = y)"] {
        assert_eq!(
            error_kind(source),
            Some(ErrorKind::InvalidDestructuringTarget),
            "{}",
            source
        );
    }
    for source in ["a + 1 = y", "f() = 1", "a++ = 1", "1 = a"] {
        assert_eq!(
            error_kind(source),
            Some(ErrorKind::InvalidAssignmentTarget),
            "{}",
            source
        );
    }
}

#[test]
fn test_object_pattern_shapes() {
    let prog = parse("var { a, b: { c = 1 }, [k]: d, 'e': f, ...g } = src;");
    let Some(Statement::VariableDeclaration(decl)) = prog.body.first() else {
        panic!("expected declaration");
    };
    let id = &decl.declarations.first().unwrap().id;
    assert_eq!(names(id), vec!["a", "c", "d", "f", "g"]);
    let Pattern::Object(object) = id else {
        panic!("expected object pattern");
    };
    let Some(ObjectPatternProperty::Property(shorthand)) = object.properties.first() else {
        panic!("expected property");
    };
    assert!(shorthand.shorthand);
    let Some(ObjectPatternProperty::Property(computed)) = object.properties.get(2) else {
        panic!("expected property");
    };
    assert!(computed.key.is_computed());
    assert!(matches!(object.properties.last(), Some(ObjectPatternProperty::Rest(_))));
}

#[test]
fn test_shorthand_defaults_only_in_patterns() {
    assert!(parse_script("({ a = 1, b: [c = 2] } = obj)").is_ok());
    assert!(parse_script("for ({ a = 1 } of list);").is_ok());
    assert!(parse_script("({ a = 1 }) => a").is_ok());
    assert_eq!(error_kind("({ a = 1 })"), Some(ErrorKind::UnexpectedToken));
    assert_eq!(error_kind("f({ a = 1 })"), Some(ErrorKind::UnexpectedToken));
}

#[test]
fn test_parenthesized_targets() {
    assert!(parse_script("(a) = 1; (a.b) = 2; [(a)] = [1]; ({ x: (y) } = z)").is_ok());
    assert!(parse_script("((a)) += 1").is_ok());
    assert!(parse_script("let [(x)] = x").is_err());
    assert!(parse_script("let (x) = 1").is_err());
    assert_eq!(
        error_kind("([a]) = 1"),
        Some(ErrorKind::InvalidAssignmentTarget)
    );
    assert_eq!(
        error_kind("[(a = 1)] = x"),
        Some(ErrorKind::InvalidDestructuringTarget)
    );
}

#[test]
fn test_compound_assignment_needs_simple_target() {
    assert!(parse_script("a.b += 1; c[d] **= 2; e ||= f").is_ok());
    assert_eq!(
        error_kind("[a] += 1"),
        Some(ErrorKind::InvalidAssignmentTarget)
    );
    assert_eq!(
        error_kind("({ a } &&= 1)"),
        Some(ErrorKind::InvalidAssignmentTarget)
    );
}

#[test]
fn test_arrow_cover_grammar() {
    let Expression::ArrowFunction(arrow) = literal("(a, b) => a + b") else {
        panic!("expected arrow function");
    };
    assert_eq!(arrow.params.len(), 2);
    assert!(arrow.params.iter().all(|p| matches!(p, Pattern::Identifier(_))));
    assert!(matches!(&arrow.body, ArrowFunctionBody::Expression(body) if matches!(**body, Expression::Binary(_))));

    assert_eq!(
        error_kind("(a, (b, c)) => 0"),
        Some(ErrorKind::InvalidArrowParameters)
    );
    for source in ["(a + b) => 0", "(f()) => 0", "([a.b]) => 0", "((a)) => 0", "(...a, b) => 0"] {
        assert!(parse_script(source).is_err(), "{}", source);
    }
    assert_eq!(error_kind("([a.b]) => 0"), Some(ErrorKind::InvalidArrowParameters));
}

#[test]
fn test_arrow_parameter_forms() {
    let Expression::ArrowFunction(arrow) = literal("([a, b] = [], { c, ...d }, ...[e]) => 0") else {
        panic!("expected arrow function");
    };
    assert_eq!(arrow.params.len(), 3);
    assert!(matches!(arrow.params.first(), Some(Pattern::Assignment(_))));
    assert!(matches!(arrow.params.get(1), Some(Pattern::Object(_))));
    assert!(matches!(arrow.params.get(2), Some(Pattern::Rest(_))));
    assert!(parse_script("() => {}; async () => {}; (a,) => a").is_ok());
    assert!(parse_script("(a, ...b,) => 0").is_err());
}

#[test]
fn test_pattern_conversion_is_total() {
    let options = ParseOptions::default();
    let sources = [
        "[a, , b]",
        "[a = 1, [b], { c }]",
        "({ a, b: [c], ...d })",
        "[a.b, c[0]]",
        "[...a, b]",
        "[a + 1]",
        "({ a() {} })",
        "({ get a() { return 1; } })",
        "[(a, b)]",
    ];
    for source in sources {
        let expr = literal(source);
        for kind in [BindingKind::Let, BindingKind::Var, BindingKind::Param, BindingKind::Assignment] {
            match to_pattern(expr.clone(), kind, &options) {
                Ok(pattern) => {
                    assert!(matches!(pattern, Pattern::Array(_) | Pattern::Object(_)));
                    assert_eq!(pattern.span(), expr.span(), "{}", source);
                }
                Err(err) => assert!(
                    matches!(
                        err.kind,
                        ErrorKind::InvalidDestructuringTarget
                            | ErrorKind::InvalidArrowParameters
                            | ErrorKind::InvalidAssignmentTarget
                    ),
                    "{}: {}",
                    source,
                    err
                ),
            }
        }
    }
}

#[test]
fn test_pattern_conversion_is_deterministic() {
    let options = ParseOptions::default();
    let expr = literal("[a, { b: [c = 1] }, ...d]");
    let first = to_pattern(expr.clone(), BindingKind::Const, &options);
    let second = to_pattern(expr, BindingKind::Const, &options);
    assert_eq!(first, second);
    let Ok(pattern) = first else {
        panic!("expected a pattern");
    };
    assert_eq!(names(&pattern), vec!["a", "c", "d"]);
}

#[test]
fn test_member_targets_only_in_assignments() {
    let options = ParseOptions::default();
    let expr = literal("[a.b, c]");
    assert!(to_pattern(expr.clone(), BindingKind::Assignment, &options).is_ok());
    let err = to_pattern(expr.clone(), BindingKind::Let, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidDestructuringTarget);
    let err = to_pattern(expr, BindingKind::Param, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArrowParameters);
}

#[test]
fn test_binding_names_follow_the_context() {
    let sloppy = ParseOptions::default();
    let strict = ParseOptions::default().with_strict(true);
    let expr = literal("[eval, let]");
    assert!(to_pattern(expr.clone(), BindingKind::Var, &sloppy).is_ok());
    assert_eq!(
        to_pattern(expr.clone(), BindingKind::Let, &sloppy).unwrap_err().kind,
        ErrorKind::ReservedWord
    );
    assert_eq!(
        to_pattern(expr, BindingKind::Var, &strict).unwrap_err().kind,
        ErrorKind::ReservedWord
    );
}

#[test]
fn test_duplicate_names_in_patterns() {
    assert_eq!(
        error_kind("let { x, x } = obj;"),
        Some(ErrorKind::DuplicateBinding)
    );
    assert_eq!(
        error_kind("const [a, [a]] = b;"),
        Some(ErrorKind::DuplicateBinding)
    );
    assert!(parse_script("var { x, x } = obj;").is_ok());
    assert!(parse_script("function f({ a }, [b]) {}").is_ok());
    assert_eq!(
        error_kind("function f({ a }, a) {}"),
        Some(ErrorKind::DuplicateBinding)
    );
    assert_eq!(
        error_kind("(a, { b: a }) => 0"),
        Some(ErrorKind::DuplicateBinding)
    );
}

#[test]
fn test_catch_and_for_patterns() {
    assert!(parse_script("try {} catch ({ message, stack: [top] }) {}").is_ok());
    assert!(parse_script("for (const { a, b } of list);").is_ok());
    assert!(parse_script("for ([a, b] of list);").is_ok());
    assert!(parse_script("for ({ a: x.y } in obj);").is_ok());
    assert_eq!(
        error_kind("for ([a + 1] of list);"),
        Some(ErrorKind::InvalidDestructuringTarget)
    );
    assert_eq!(
        error_kind("try {} catch ([e, e]) {}"),
        Some(ErrorKind::DuplicateBinding)
    );
}
