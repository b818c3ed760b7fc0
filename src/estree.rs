//! ESTree JSON output
//!
//! Every node becomes an object `{ "type", "start", "end", "loc"?, ... }`
//! with ESTree field names. `loc` is present only
//! when the tree was parsed with `attach_loc`. Parenthesized expressions
//! are emitted as their inner expression.
//!
//! ```
//! let program = esparse::parse_script("x = 1").unwrap();
//! let json = program.to_estree();
//! assert_eq!(json["body"][0]["expression"]["operator"], "=");
//! ```

use serde_json::{Map, Value, json};

use crate::ast::*;
use crate::lexer::Position;

/// Conversion of a syntax tree node to its ESTree JSON form
pub trait ToEstree {
    fn to_estree(&self) -> Value;
}

impl Program {
    /// The whole program as an ESTree `Program` node
    pub fn to_estree(&self) -> Value {
        <Program as ToEstree>::to_estree(self)
    }
}

/// Object under construction for one node
struct Node(Map<String, Value>);

impl Node {
    fn new(kind: &str, span: Span) -> Self {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::from(kind));
        map.insert("start".to_string(), Value::from(span.start));
        map.insert("end".to_string(), Value::from(span.end));
        if let Some(loc) = span.loc {
            map.insert(
                "loc".to_string(),
                json!({ "start": position(loc.start), "end": position(loc.end) }),
            );
        }
        Node(map)
    }

    fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    fn build(self) -> Value {
        Value::Object(self.0)
    }
}

fn position(pos: Position) -> Value {
    json!({ "line": pos.line, "column": pos.column })
}

fn list<T: ToEstree>(items: &[T]) -> Value {
    Value::Array(items.iter().map(ToEstree::to_estree).collect())
}

fn optional<T: ToEstree>(item: Option<&T>) -> Value {
    item.map_or(Value::Null, ToEstree::to_estree)
}

/// Integral values print without a fraction, as JavaScript would
fn number(n: f64) -> Value {
    let integral = n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15;
    if integral && !(n == 0.0 && n.is_sign_negative()) {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl<T: ToEstree> ToEstree for Box<T> {
    fn to_estree(&self) -> Value {
        (**self).to_estree()
    }
}

impl ToEstree for Program {
    fn to_estree(&self) -> Value {
        Node::new("Program", self.span)
            .field("body", list(&self.body))
            .field("sourceType", self.source_type.as_str())
            .build()
    }
}

// ============ STATEMENTS ============

impl ToEstree for Statement {
    fn to_estree(&self) -> Value {
        match self {
            Statement::VariableDeclaration(decl) => decl.to_estree(),
            Statement::FunctionDeclaration(function) => function_node("FunctionDeclaration", function),
            Statement::ClassDeclaration(class) => class_node("ClassDeclaration", class),
            Statement::Block(block) => block.to_estree(),
            Statement::If(s) => Node::new("IfStatement", s.span)
                .field("test", s.test.to_estree())
                .field("consequent", s.consequent.to_estree())
                .field("alternate", optional(s.alternate.as_ref()))
                .build(),
            Statement::Switch(s) => Node::new("SwitchStatement", s.span)
                .field("discriminant", s.discriminant.to_estree())
                .field("cases", list(&s.cases))
                .build(),
            Statement::For(s) => Node::new("ForStatement", s.span)
                .field("init", optional(s.init.as_ref()))
                .field("test", optional(s.test.as_ref()))
                .field("update", optional(s.update.as_ref()))
                .field("body", s.body.to_estree())
                .build(),
            Statement::ForIn(s) => Node::new("ForInStatement", s.span)
                .field("left", s.left.to_estree())
                .field("right", s.right.to_estree())
                .field("body", s.body.to_estree())
                .build(),
            Statement::ForOf(s) => Node::new("ForOfStatement", s.span)
                .field("await", s.await_)
                .field("left", s.left.to_estree())
                .field("right", s.right.to_estree())
                .field("body", s.body.to_estree())
                .build(),
            Statement::While(s) => Node::new("WhileStatement", s.span)
                .field("test", s.test.to_estree())
                .field("body", s.body.to_estree())
                .build(),
            Statement::DoWhile(s) => Node::new("DoWhileStatement", s.span)
                .field("body", s.body.to_estree())
                .field("test", s.test.to_estree())
                .build(),
            Statement::Try(s) => Node::new("TryStatement", s.span)
                .field("block", s.block.to_estree())
                .field("handler", optional(s.handler.as_ref()))
                .field("finalizer", optional(s.finalizer.as_ref()))
                .build(),
            Statement::With(s) => Node::new("WithStatement", s.span)
                .field("object", s.object.to_estree())
                .field("body", s.body.to_estree())
                .build(),
            Statement::Return(s) => Node::new("ReturnStatement", s.span)
                .field("argument", optional(s.argument.as_ref()))
                .build(),
            Statement::Break(s) => Node::new("BreakStatement", s.span)
                .field("label", optional(s.label.as_ref()))
                .build(),
            Statement::Continue(s) => Node::new("ContinueStatement", s.span)
                .field("label", optional(s.label.as_ref()))
                .build(),
            Statement::Throw(s) => Node::new("ThrowStatement", s.span)
                .field("argument", s.argument.to_estree())
                .build(),
            Statement::Import(decl) => Node::new("ImportDeclaration", decl.span)
                .field("specifiers", list(&decl.specifiers))
                .field("source", decl.source.to_estree())
                .build(),
            Statement::ExportNamed(decl) => Node::new("ExportNamedDeclaration", decl.span)
                .field("declaration", optional(decl.declaration.as_ref()))
                .field("specifiers", list(&decl.specifiers))
                .field("source", optional(decl.source.as_ref()))
                .build(),
            Statement::ExportDefault(decl) => {
                let declaration = match &decl.declaration {
                    ExportDefaultKind::Function(function) => {
                        function_node("FunctionDeclaration", function)
                    }
                    ExportDefaultKind::Class(class) => class_node("ClassDeclaration", class),
                    ExportDefaultKind::Expression(expr) => expr.to_estree(),
                };
                Node::new("ExportDefaultDeclaration", decl.span)
                    .field("declaration", declaration)
                    .build()
            }
            Statement::ExportAll(decl) => Node::new("ExportAllDeclaration", decl.span)
                .field("exported", optional(decl.exported.as_ref()))
                .field("source", decl.source.to_estree())
                .build(),
            Statement::Expression(s) => {
                let node = Node::new("ExpressionStatement", s.span)
                    .field("expression", s.expression.to_estree());
                match &s.directive {
                    Some(directive) => node.field("directive", directive.as_str()).build(),
                    None => node.build(),
                }
            }
            Statement::Empty(span) => Node::new("EmptyStatement", *span).build(),
            Statement::Debugger(span) => Node::new("DebuggerStatement", *span).build(),
            Statement::Labeled(s) => Node::new("LabeledStatement", s.span)
                .field("label", s.label.to_estree())
                .field("body", s.body.to_estree())
                .build(),
        }
    }
}

impl ToEstree for BlockStatement {
    fn to_estree(&self) -> Value {
        Node::new("BlockStatement", self.span)
            .field("body", list(&self.body))
            .build()
    }
}

impl ToEstree for VariableDeclaration {
    fn to_estree(&self) -> Value {
        Node::new("VariableDeclaration", self.span)
            .field("declarations", list(&self.declarations))
            .field("kind", self.kind.as_str())
            .build()
    }
}

impl ToEstree for VariableDeclarator {
    fn to_estree(&self) -> Value {
        Node::new("VariableDeclarator", self.span)
            .field("id", self.id.to_estree())
            .field("init", optional(self.init.as_ref()))
            .build()
    }
}

impl ToEstree for SwitchCase {
    fn to_estree(&self) -> Value {
        Node::new("SwitchCase", self.span)
            .field("test", optional(self.test.as_ref()))
            .field("consequent", list(&self.consequent))
            .build()
    }
}

impl ToEstree for ForInit {
    fn to_estree(&self) -> Value {
        match self {
            ForInit::Variable(decl) => decl.to_estree(),
            ForInit::Expression(expr) => expr.to_estree(),
        }
    }
}

impl ToEstree for ForInOfLeft {
    fn to_estree(&self) -> Value {
        match self {
            ForInOfLeft::Variable(decl) => decl.to_estree(),
            ForInOfLeft::Pattern(pattern) => pattern.to_estree(),
        }
    }
}

impl ToEstree for CatchClause {
    fn to_estree(&self) -> Value {
        Node::new("CatchClause", self.span)
            .field("param", optional(self.param.as_ref()))
            .field("body", self.body.to_estree())
            .build()
    }
}

// ============ MODULES ============

impl ToEstree for ImportSpecifier {
    fn to_estree(&self) -> Value {
        match self {
            ImportSpecifier::Named {
                imported,
                local,
                span,
            } => Node::new("ImportSpecifier", *span)
                .field("imported", imported.to_estree())
                .field("local", local.to_estree())
                .build(),
            ImportSpecifier::Default { local, span } => {
                Node::new("ImportDefaultSpecifier", *span)
                    .field("local", local.to_estree())
                    .build()
            }
            ImportSpecifier::Namespace { local, span } => {
                Node::new("ImportNamespaceSpecifier", *span)
                    .field("local", local.to_estree())
                    .build()
            }
        }
    }
}

impl ToEstree for ExportSpecifier {
    fn to_estree(&self) -> Value {
        Node::new("ExportSpecifier", self.span)
            .field("local", self.local.to_estree())
            .field("exported", self.exported.to_estree())
            .build()
    }
}

impl ToEstree for ModuleExportName {
    fn to_estree(&self) -> Value {
        match self {
            ModuleExportName::Identifier(id) => id.to_estree(),
            ModuleExportName::String(lit) => lit.to_estree(),
        }
    }
}

// ============ FUNCTIONS AND CLASSES ============

fn function_node(kind: &str, function: &Function) -> Value {
    Node::new(kind, function.span)
        .field("id", optional(function.id.as_ref()))
        .field("expression", false)
        .field("generator", function.generator)
        .field("async", function.async_)
        .field("params", list(&function.params))
        .field("body", function.body.to_estree())
        .build()
}

impl ToEstree for FunctionBody {
    fn to_estree(&self) -> Value {
        Node::new("BlockStatement", self.span)
            .field("body", list(&self.body))
            .build()
    }
}

fn class_node(kind: &str, class: &Class) -> Value {
    Node::new(kind, class.span)
        .field("id", optional(class.id.as_ref()))
        .field("superClass", optional(class.super_class.as_ref()))
        .field(
            "body",
            Node::new("ClassBody", class.body.span)
                .field("body", list(&class.body.body))
                .build(),
        )
        .build()
}

impl ToEstree for ClassElement {
    fn to_estree(&self) -> Value {
        match self {
            ClassElement::Method(method) => Node::new("MethodDefinition", method.span)
                .field("static", method.static_)
                .field("computed", method.key.is_computed())
                .field("key", method.key.to_estree())
                .field("kind", method.kind.as_str())
                .field("value", function_node("FunctionExpression", &method.value))
                .build(),
            ClassElement::Property(property) => Node::new("PropertyDefinition", property.span)
                .field("static", property.static_)
                .field("computed", property.key.is_computed())
                .field("key", property.key.to_estree())
                .field("value", optional(property.value.as_ref()))
                .build(),
            ClassElement::StaticBlock(block) => Node::new("StaticBlock", block.span)
                .field("body", list(&block.body))
                .build(),
        }
    }
}

impl ToEstree for PropertyKey {
    fn to_estree(&self) -> Value {
        match self {
            PropertyKey::Identifier(id) => id.to_estree(),
            PropertyKey::Literal(lit) => lit.to_estree(),
            PropertyKey::PrivateIdentifier(id) => id.to_estree(),
            PropertyKey::Computed(expr) => expr.to_estree(),
        }
    }
}

// ============ EXPRESSIONS ============

impl ToEstree for Expression {
    fn to_estree(&self) -> Value {
        match self {
            Expression::Literal(lit) => lit.to_estree(),
            Expression::Array(array) => Node::new("ArrayExpression", array.span)
                .field("elements", holes(&array.elements))
                .build(),
            Expression::Object(object) => Node::new("ObjectExpression", object.span)
                .field("properties", list(&object.properties))
                .build(),
            Expression::Function(function) => function_node("FunctionExpression", function),
            Expression::ArrowFunction(arrow) => arrow.to_estree(),
            Expression::Class(class) => class_node("ClassExpression", class),
            Expression::Template(template) => template.to_estree(),
            Expression::TaggedTemplate(tagged) => Node::new("TaggedTemplateExpression", tagged.span)
                .field("tag", tagged.tag.to_estree())
                .field("quasi", tagged.quasi.to_estree())
                .build(),
            Expression::Identifier(id) => id.to_estree(),
            Expression::PrivateIdentifier(id) => id.to_estree(),
            Expression::This(span) => Node::new("ThisExpression", *span).build(),
            Expression::Super(span) => Node::new("Super", *span).build(),
            Expression::MetaProperty(meta) => Node::new("MetaProperty", meta.span)
                .field("meta", meta.meta.to_estree())
                .field("property", meta.property.to_estree())
                .build(),
            Expression::Unary(unary) => Node::new("UnaryExpression", unary.span)
                .field("operator", unary.operator.as_str())
                .field("prefix", true)
                .field("argument", unary.argument.to_estree())
                .build(),
            Expression::Binary(binary) => Node::new("BinaryExpression", binary.span)
                .field("left", binary.left.to_estree())
                .field("operator", binary.operator.as_str())
                .field("right", binary.right.to_estree())
                .build(),
            Expression::Logical(logical) => Node::new("LogicalExpression", logical.span)
                .field("left", logical.left.to_estree())
                .field("operator", logical.operator.as_str())
                .field("right", logical.right.to_estree())
                .build(),
            Expression::Conditional(cond) => Node::new("ConditionalExpression", cond.span)
                .field("test", cond.test.to_estree())
                .field("consequent", cond.consequent.to_estree())
                .field("alternate", cond.alternate.to_estree())
                .build(),
            Expression::Assignment(assign) => Node::new("AssignmentExpression", assign.span)
                .field("operator", assign.operator.as_str())
                .field("left", assign.left.to_estree())
                .field("right", assign.right.to_estree())
                .build(),
            Expression::Update(update) => Node::new("UpdateExpression", update.span)
                .field("operator", update.operator.as_str())
                .field("prefix", update.prefix)
                .field("argument", update.argument.to_estree())
                .build(),
            Expression::Sequence(seq) => Node::new("SequenceExpression", seq.span)
                .field("expressions", list(&seq.expressions))
                .build(),
            Expression::Member(member) => member.to_estree(),
            Expression::Chain(chain) => Node::new("ChainExpression", chain.span)
                .field("expression", chain.expression.to_estree())
                .build(),
            Expression::Call(call) => Node::new("CallExpression", call.span)
                .field("callee", call.callee.to_estree())
                .field("arguments", list(&call.arguments))
                .field("optional", call.optional)
                .build(),
            Expression::New(new) => Node::new("NewExpression", new.span)
                .field("callee", new.callee.to_estree())
                .field("arguments", list(&new.arguments))
                .build(),
            Expression::Import(import) => Node::new("ImportExpression", import.span)
                .field("source", import.source.to_estree())
                .build(),
            Expression::Yield(y) => Node::new("YieldExpression", y.span)
                .field("delegate", y.delegate)
                .field("argument", optional(y.argument.as_ref()))
                .build(),
            Expression::Await(a) => Node::new("AwaitExpression", a.span)
                .field("argument", a.argument.to_estree())
                .build(),
            Expression::Parenthesized(paren) => paren.expression.to_estree(),
        }
    }
}

fn holes<T: ToEstree>(elements: &[Option<T>]) -> Value {
    Value::Array(
        elements
            .iter()
            .map(|element| optional(element.as_ref()))
            .collect(),
    )
}

impl ToEstree for Literal {
    fn to_estree(&self) -> Value {
        let node = Node::new("Literal", self.span);
        let node = match &self.value {
            LiteralValue::Null => node.field("value", Value::Null),
            LiteralValue::Boolean(b) => node.field("value", *b),
            LiteralValue::Number(n) => node.field("value", number(*n)),
            LiteralValue::String(s) => node.field("value", s.as_str()),
            LiteralValue::BigInt(digits) => node
                .field("value", Value::Null)
                .field("bigint", digits.as_str()),
            LiteralValue::RegExp { pattern, flags } => node.field("value", Value::Null).field(
                "regex",
                json!({ "pattern": pattern.as_str(), "flags": flags.as_str() }),
            ),
        };
        node.field("raw", self.raw.as_str()).build()
    }
}

impl ToEstree for Identifier {
    fn to_estree(&self) -> Value {
        Node::new("Identifier", self.span)
            .field("name", self.name.as_str())
            .build()
    }
}

impl ToEstree for PrivateIdentifier {
    fn to_estree(&self) -> Value {
        Node::new("PrivateIdentifier", self.span)
            .field("name", self.name.as_str())
            .build()
    }
}

impl ToEstree for ArrayElement {
    fn to_estree(&self) -> Value {
        match self {
            ArrayElement::Expression(expr) => expr.to_estree(),
            ArrayElement::Spread(spread) => spread.to_estree(),
        }
    }
}

impl ToEstree for Argument {
    fn to_estree(&self) -> Value {
        match self {
            Argument::Expression(expr) => expr.to_estree(),
            Argument::Spread(spread) => spread.to_estree(),
        }
    }
}

impl ToEstree for SpreadElement {
    fn to_estree(&self) -> Value {
        Node::new("SpreadElement", self.span)
            .field("argument", self.argument.to_estree())
            .build()
    }
}

impl ToEstree for ObjectProperty {
    fn to_estree(&self) -> Value {
        match self {
            ObjectProperty::Property(property) => Node::new("Property", property.span)
                .field("method", property.method)
                .field("shorthand", property.shorthand)
                .field("computed", property.key.is_computed())
                .field("key", property.key.to_estree())
                .field("value", property.value.to_estree())
                .field("kind", property.kind.as_str())
                .build(),
            ObjectProperty::Spread(spread) => spread.to_estree(),
        }
    }
}

impl ToEstree for ArrowFunctionExpression {
    fn to_estree(&self) -> Value {
        let (expression, body) = match &self.body {
            ArrowFunctionBody::Expression(expr) => (true, expr.to_estree()),
            ArrowFunctionBody::Block(block) => (false, block.to_estree()),
        };
        Node::new("ArrowFunctionExpression", self.span)
            .field("id", Value::Null)
            .field("expression", expression)
            .field("generator", false)
            .field("async", self.async_)
            .field("params", list(&self.params))
            .field("body", body)
            .build()
    }
}

impl ToEstree for TemplateLiteral {
    fn to_estree(&self) -> Value {
        Node::new("TemplateLiteral", self.span)
            .field("expressions", list(&self.expressions))
            .field("quasis", list(&self.quasis))
            .build()
    }
}

impl ToEstree for TemplateElement {
    fn to_estree(&self) -> Value {
        let cooked = self.cooked.as_ref().map_or(Value::Null, |c| Value::from(c.as_str()));
        Node::new("TemplateElement", self.span)
            .field("value", json!({ "raw": self.raw.as_str(), "cooked": cooked }))
            .field("tail", self.tail)
            .build()
    }
}

impl ToEstree for MemberExpression {
    fn to_estree(&self) -> Value {
        let (property, computed) = match &self.property {
            MemberProperty::Identifier(id) => (id.to_estree(), false),
            MemberProperty::PrivateIdentifier(id) => (id.to_estree(), false),
            MemberProperty::Computed(expr) => (expr.to_estree(), true),
        };
        Node::new("MemberExpression", self.span)
            .field("object", self.object.to_estree())
            .field("property", property)
            .field("computed", computed)
            .field("optional", self.optional)
            .build()
    }
}

// ============ PATTERNS ============

impl ToEstree for Pattern {
    fn to_estree(&self) -> Value {
        match self {
            Pattern::Identifier(id) => id.to_estree(),
            Pattern::Member(member) => member.to_estree(),
            Pattern::Object(object) => Node::new("ObjectPattern", object.span)
                .field("properties", list(&object.properties))
                .build(),
            Pattern::Array(array) => Node::new("ArrayPattern", array.span)
                .field("elements", holes(&array.elements))
                .build(),
            Pattern::Rest(rest) => rest.to_estree(),
            Pattern::Assignment(assign) => Node::new("AssignmentPattern", assign.span)
                .field("left", assign.left.to_estree())
                .field("right", assign.right.to_estree())
                .build(),
        }
    }
}

impl ToEstree for ObjectPatternProperty {
    fn to_estree(&self) -> Value {
        match self {
            ObjectPatternProperty::Property(property) => Node::new("Property", property.span)
                .field("method", false)
                .field("shorthand", property.shorthand)
                .field("computed", property.key.is_computed())
                .field("key", property.key.to_estree())
                .field("value", property.value.to_estree())
                .field("kind", "init")
                .build(),
            ObjectPatternProperty::Rest(rest) => rest.to_estree(),
        }
    }
}

impl ToEstree for RestElement {
    fn to_estree(&self) -> Value {
        Node::new("RestElement", self.span)
            .field("argument", self.argument.to_estree())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::parser::Parser;

    fn estree(source: &str) -> Value {
        Parser::new(source, &ParseOptions::default())
            .parse_program()
            .unwrap()
            .to_estree()
    }

    #[test]
    fn numbers_print_like_javascript() {
        assert_eq!(number(1.0), json!(1));
        assert_eq!(number(0.5), json!(0.5));
        assert_eq!(number(1e21), json!(1e21));
        assert!(number(-0.0).as_f64().is_some_and(|n| n.is_sign_negative()));
        assert_eq!(number(f64::INFINITY), Value::Null);
    }

    #[test]
    fn parentheses_are_transparent() {
        let json = estree("(a)");
        assert_eq!(
            json["body"][0]["expression"],
            json!({ "type": "Identifier", "start": 1, "end": 2, "name": "a" })
        );
    }

    #[test]
    fn literal_forms() {
        let json = estree("/a+/g; 10n; 'x'");
        let regex = &json["body"][0]["expression"];
        assert_eq!(regex["regex"], json!({ "pattern": "a+", "flags": "g" }));
        assert_eq!(regex["value"], Value::Null);
        assert_eq!(json["body"][1]["expression"]["bigint"], "10");
        assert_eq!(json["body"][2]["expression"]["raw"], "'x'");
        assert!(json["body"][2].get("directive").is_none());
        assert_eq!(estree("'use strict'; x")["body"][0]["directive"], "use strict");
    }

    #[test]
    fn loc_only_when_requested() {
        assert!(estree("a").get("loc").is_none());
        let options = ParseOptions::default().with_loc(true);
        let json = Parser::new("a\n b", &options)
            .parse_program()
            .unwrap()
            .to_estree();
        assert_eq!(
            json["body"][1]["loc"],
            json!({ "start": { "line": 2, "column": 1 }, "end": { "line": 2, "column": 2 } })
        );
    }

    #[test]
    fn arrow_expression_flag() {
        let json = estree("x => x; y => {}");
        assert_eq!(json["body"][0]["expression"]["expression"], true);
        assert_eq!(json["body"][1]["expression"]["expression"], false);
        assert_eq!(json["body"][1]["expression"]["body"]["type"], "BlockStatement");
    }
}
