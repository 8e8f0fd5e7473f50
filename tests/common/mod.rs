#![allow(dead_code)]

use pretzel::ast::{Expression, Function, Item, Statement, VariableDeclaration};
use pretzel::{Diagnostic, DiagnosticKind, ErrorLimit, Parsed, parse, tokenize};

pub const FILE: &str = "test.pz";

/// Lex (which must succeed) and parse `input`, keeping parse diagnostics.
pub fn parse_str(input: &str) -> Parsed {
    let lexed = tokenize(input, FILE, ErrorLimit::default());
    assert!(
        lexed.succeeded(),
        "lex failed for {input:?}: {:?}",
        lexed.diagnostics
    );
    parse(&lexed.tokens, &lexed.report)
}

/// Parse `input` and assert no diagnostics were produced.
pub fn parse_ok(input: &str) -> Parsed {
    let parsed = parse_str(input);
    assert!(
        parsed.succeeded(),
        "unexpected diagnostics for {input:?}: {:?}",
        parsed.diagnostics
    );
    parsed
}

pub fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
    diagnostics.iter().map(|d| d.kind).collect()
}

pub fn function(parsed: &Parsed, index: usize) -> &Function {
    match &parsed.root.items[index] {
        Item::Function(f) => f,
        other => panic!("item {index} is not a function: {other:?}"),
    }
}

pub fn declaration(parsed: &Parsed, index: usize) -> &VariableDeclaration {
    match &parsed.root.items[index] {
        Item::Statement(Statement::VariableDeclaration(v)) => v,
        other => panic!("item {index} is not a let: {other:?}"),
    }
}

/// Initializer of the first top-level `let`.
pub fn init(parsed: &Parsed) -> &Expression {
    declaration(parsed, 0)
        .init
        .as_ref()
        .expect("let has no initializer")
}

/// Render the initializer of `let x = <source>;`.
pub fn render_init(source: &str) -> String {
    let parsed = parse_ok(&format!("let x = {source};"));
    pretzel::printer::render_expression(init(&parsed))
}
