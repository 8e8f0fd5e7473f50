//! Traversal order of the visitor protocol.

mod common;

use common::{function, init, parse_ok};
use pretzel::Visitor;
use pretzel::ast::{
    BinaryExpression, Expression, Function, Literal, Statement, VariableReference,
};
use pretzel::visit::{NodeRef, traverse, walk_expression, walk_root};

/// Records callbacks as short strings; exits are prefixed with `/`.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Recorder {
    fn log(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }
}

impl Visitor for Recorder {
    fn enter_node(&mut self, node: NodeRef<'_>) {
        self.log(format!("node:{}", node.kind_name()));
    }
    fn exit_node(&mut self, node: NodeRef<'_>) {
        self.log(format!("/node:{}", node.kind_name()));
    }
    fn enter_expression(&mut self, _: &Expression) {
        self.log("expr");
    }
    fn exit_expression(&mut self, _: &Expression) {
        self.log("/expr");
    }
    fn enter_literal(&mut self, _: &Literal) {
        self.log("lit");
    }
    fn exit_literal(&mut self, _: &Literal) {
        self.log("/lit");
    }
    fn enter_decimal_literal(&mut self, literal: &Literal) {
        self.log(format!("dec:{}", literal.text));
    }
    fn exit_decimal_literal(&mut self, literal: &Literal) {
        self.log(format!("/dec:{}", literal.text));
    }
    fn enter_binary_expression(&mut self, e: &BinaryExpression) {
        self.log(format!("bin:{}", e.op));
    }
    fn exit_binary_expression(&mut self, e: &BinaryExpression) {
        self.log(format!("/bin:{}", e.op));
    }
    fn enter_variable_reference(&mut self, e: &VariableReference) {
        self.log(format!("var:{}", e.name));
    }
    fn exit_variable_reference(&mut self, e: &VariableReference) {
        self.log(format!("/var:{}", e.name));
    }
}

#[test]
fn binary_expression_event_order() {
    let parsed = parse_ok("let x = 1 + y;");
    let mut recorder = Recorder::default();
    walk_expression(&mut recorder, init(&parsed));
    assert_eq!(
        recorder.events,
        [
            "node:binary",
            "expr",
            "bin:+",
            "node:literal",
            "expr",
            "lit",
            "dec:1",
            "/dec:1",
            "/lit",
            "/expr",
            "/node:literal",
            "node:variable",
            "expr",
            "var:y",
            "node:qualified-name",
            "node:name",
            "/node:name",
            "/node:qualified-name",
            "/var:y",
            "/expr",
            "/node:variable",
            "/bin:+",
            "/expr",
            "/node:binary",
        ]
    );
}

/// Records only generic node enters, skipping names.
#[derive(Default)]
struct Shape {
    kinds: Vec<&'static str>,
    depth: usize,
    max_depth: usize,
}

impl Visitor for Shape {
    fn enter_node(&mut self, node: NodeRef<'_>) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        if !matches!(node, NodeRef::Name(_) | NodeRef::QualifiedName(_)) {
            self.kinds.push(node.kind_name());
        }
    }
    fn exit_node(&mut self, _: NodeRef<'_>) {
        self.depth -= 1;
    }
}

#[test]
fn function_children_in_source_order() {
    let parsed = parse_ok("func f(a int) int { a; }");
    let mut shape = Shape::default();
    walk_root(&mut shape, &parsed.root);
    assert_eq!(
        shape.kinds,
        [
            "root",
            "function",
            "function-arg",
            "atom-type",
            "atom-type",
            "block",
            "expression-statement",
            "variable",
        ]
    );
    assert_eq!(shape.depth, 0);
    // root, function, block, statement, variable, qualified name, name
    assert_eq!(shape.max_depth, 7);
}

#[test]
fn missing_return_type_is_still_visited() {
    let parsed = parse_ok("func f() {}");
    let mut shape = Shape::default();
    walk_root(&mut shape, &parsed.root);
    assert_eq!(shape.kinds, ["root", "function", "none-type", "block"]);
}

#[test]
fn data_types_walk_inner_types() {
    let parsed = parse_ok("let m map[str, [int]]?;");
    let mut shape = Shape::default();
    walk_root(&mut shape, &parsed.root);
    assert_eq!(
        shape.kinds,
        [
            "root",
            "let",
            "nullable-type",
            "generic-type",
            "atom-type",
            "array-type",
            "atom-type",
        ]
    );
}

#[test]
fn traverse_dispatches_any_node() {
    let parsed = parse_ok("func f() { g(1, 2); }");
    let f = function(&parsed, 0);
    let mut shape = Shape::default();
    traverse(&mut shape, NodeRef::Block(&f.body));
    assert_eq!(
        shape.kinds,
        [
            "block",
            "expression-statement",
            "call",
            "variable",
            "literal",
            "literal",
        ]
    );
}

/// Counts category and specific callbacks separately.
#[derive(Default)]
struct Categories {
    statements: usize,
    functions: usize,
    enters: usize,
    exits: usize,
}

impl Visitor for Categories {
    fn enter_node(&mut self, _: NodeRef<'_>) {
        self.enters += 1;
    }
    fn exit_node(&mut self, _: NodeRef<'_>) {
        self.exits += 1;
    }
    fn enter_statement(&mut self, _: &Statement) {
        self.statements += 1;
    }
    fn enter_function(&mut self, _: &Function) {
        self.functions += 1;
    }
}

#[test]
fn functions_are_not_statements() {
    let parsed = parse_ok("use a;\nlet b = 1;\nfunc f() { b; let c; }\nfunc g() {}");
    let mut categories = Categories::default();
    walk_root(&mut categories, &parsed.root);
    assert_eq!(categories.statements, 4);
    assert_eq!(categories.functions, 2);
    assert_eq!(categories.enters, categories.exits);
}

#[test]
fn traversal_is_deterministic() {
    let parsed = parse_ok("func f(a int) { a = a * 2 + (a - 1); a++; }");
    let mut first = Recorder::default();
    let mut second = Recorder::default();
    walk_root(&mut first, &parsed.root);
    walk_root(&mut second, &parsed.root);
    assert_eq!(first.events, second.events);
}
