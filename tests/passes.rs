//! Analysis passes run through the library entry points.

mod common;

use common::{kinds, parse_ok};
use pretzel::ast::{Function, RootNode};
use pretzel::{
    ComboPass, Diagnostic, DiagnosticKind, Node, Options, Pass, ScopeApplyPass, ScopeId, Severity,
    Visitor, analyze, check_source,
};

fn check(source: &str) -> Vec<DiagnosticKind> {
    let diagnostics = check_source(source, "test.pz", &Options::default())
        .unwrap_or_else(|e| panic!("front end failed for {source:?}: {e}"));
    kinds(&diagnostics)
}

// -----------------------------------------------------------
// Resolution.
// -----------------------------------------------------------

#[test]
fn clean_program_has_no_findings() {
    let source = "use std.io;\n\
                  let limit = 10;\n\
                  func twice(n int) int { n = n * 2; io.print(n); }\n\
                  func main() { let x = 1; x += limit; twice(x); }";
    assert!(check(source).is_empty());
}

#[test]
fn forward_references_resolve() {
    assert!(check("func main() { helper(); }\nfunc helper() {}").is_empty());
}

#[test]
fn recursive_call_resolves() {
    assert!(check("func f(n int) { f(n); }").is_empty());
}

#[test]
fn locals_do_not_leak_between_functions() {
    let diagnostics =
        check_source("func a() { let x = 1; }\nfunc b() { x = 2; }", "test.pz", &Options::default())
            .unwrap();
    assert_eq!(kinds(&diagnostics), [DiagnosticKind::NoSuchVariable]);
    assert_eq!(diagnostics[0].message(), "symbol x not found in scope");
    assert_eq!(diagnostics[0].begin.start.line, 1);
}

#[test]
fn arguments_are_local_to_their_function() {
    assert_eq!(
        check("func a(n int) {}\nfunc b() { n = 1; }"),
        [DiagnosticKind::NoSuchVariable]
    );
}

#[test]
fn top_level_initializer_is_resolved() {
    assert_eq!(check("let a = b;"), [DiagnosticKind::NoSuchVariable]);
}

#[test]
fn function_used_as_value() {
    let diagnostics =
        check_source("func g() {}\nlet h = g;", "test.pz", &Options::default()).unwrap();
    assert_eq!(
        kinds(&diagnostics),
        [DiagnosticKind::ReferencedEntityNotVariable]
    );
    assert_eq!(diagnostics[0].message(), "symbol g is not a variable");
}

#[test]
fn parenthesized_callee_is_a_call() {
    let options = Options {
        lint: false,
        ..Options::default()
    };
    let source = "func g() {}\nfunc f() { (g)(); ((g))(); }";
    let diagnostics = check_source(source, "test.pz", &options).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(
        check("func g() {}\nfunc f() { (g)(); }"),
        [DiagnosticKind::RedundantParentheses]
    );
}

#[test]
fn member_names_are_not_resolved() {
    assert!(check("func f() { let p = 0; p.x = p.y[0]; }").is_empty());
}

// -----------------------------------------------------------
// Lints.
// -----------------------------------------------------------

#[test]
fn statement_like_expressions_are_accepted() {
    let source = "func g() {}\n\
                  func f() { let i = 0; i++; --i; i = 1; g(); }";
    assert!(check(source).is_empty());
}

#[test]
fn ineffective_statements_are_reported() {
    assert_eq!(
        check("func f() { let i = 0; i; i + 1; -i; }"),
        [
            DiagnosticKind::IneffectiveExpressionStatement,
            DiagnosticKind::IneffectiveExpressionStatement,
            DiagnosticKind::IneffectiveExpressionStatement,
        ]
    );
}

#[test]
fn nested_redundant_parentheses() {
    assert_eq!(
        check("let a = ((1));"),
        [
            DiagnosticKind::RedundantParentheses,
            DiagnosticKind::RedundantParentheses,
        ]
    );
}

#[test]
fn useful_parentheses_are_quiet() {
    assert!(check("let a = (1 + 2) * 3;").is_empty());
}

#[test]
fn parenthesised_assignment_statement() {
    assert_eq!(
        check("func f() { let a; (a = 1); }"),
        [DiagnosticKind::RedundantParenthesesInExpressionStatement]
    );
}

#[test]
fn lint_findings_are_warnings() {
    let diagnostics = check_source("func f() { 1; }", "test.pz", &Options::default()).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity(), Severity::Warning);
    assert!(!diagnostics[0].is_error());
}

#[test]
fn lints_can_be_disabled() {
    let options = Options {
        lint: false,
        ..Options::default()
    };
    let diagnostics = check_source("func f() { 1; (2); }", "test.pz", &options).unwrap();
    assert!(diagnostics.is_empty());
}

// -----------------------------------------------------------
// Combining passes.
// -----------------------------------------------------------

#[test]
fn analyze_fills_scopes() {
    let parsed = parse_ok("let g = 1;\nfunc f(a int) {}");
    assert!(analyze(&parsed, &Options::default()).is_empty());
    let root = parsed.scopes.get(ScopeId::ROOT).entries();
    let names: Vec<String> = root.iter().map(|(n, _)| n.to_string()).collect();
    assert_eq!(names, ["g", "f"]);
}

/// Reports every function declared without arguments.
#[derive(Default)]
struct NoArgs {
    diagnostics: Vec<Diagnostic>,
    roots: usize,
}

impl Visitor for NoArgs {
    fn enter_root(&mut self, _: &RootNode) {
        self.roots += 1;
    }

    fn enter_function(&mut self, function: &Function) {
        if function.args.is_empty() {
            self.diagnostics.push(Diagnostic::at(
                DiagnosticKind::ExpectedArgumentList,
                function.span(),
                function.report_context(),
                vec![function.name.to_string()],
            ));
        }
    }
}

impl Pass for NoArgs {
    fn name(&self) -> &'static str {
        "no-args"
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[test]
fn custom_pass_runs_after_builtin_ones() {
    let parsed = parse_ok("func f() {}\nfunc g(a int) {}");
    let mut combo = ComboPass::new().with(ScopeApplyPass::new(&parsed.scopes));
    combo.push(Box::new(NoArgs::default()));
    assert_eq!(combo.len(), 2);
    combo.run(&parsed.root);
    assert_eq!(combo.diagnostics().len(), 1);
    assert_eq!(combo.diagnostics()[0].args, ["f"]);
}

#[test]
fn empty_combo_reports_nothing() {
    let parsed = parse_ok("func f() { 1; }");
    let mut combo = ComboPass::new();
    assert!(combo.is_empty());
    combo.run(&parsed.root);
    assert!(combo.into_diagnostics().is_empty());
}

#[test]
fn a_walk_enters_the_root_once() {
    let parsed = parse_ok("func f() {}\nfunc g() {}");
    let mut pass = NoArgs::default();
    pretzel::visit::walk_root(&mut pass, &parsed.root);
    assert_eq!(pass.roots, 1);
    assert_eq!(pass.diagnostics().len(), 2);
}
