//! Analysis passes over a parsed file.
//!
//! A [`Pass`] is a [`Visitor`] that also exposes the diagnostics it
//! collected. [`ComboPass`] runs several passes over the same tree, one full
//! traversal each, in the order they were added.

use std::collections::HashSet;

use crate::ast::{
    BinaryExpression, BinaryOperator, CallExpression, Expression, ExpressionStatement, Function,
    Item, Node, ParenExpression, RootNode, Statement, VariableDeclaration, VariableReference,
};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::scope::{RefKind, ScopeTree};
use crate::token::Span;
use crate::visit::{Visitor, walk_root};

pub trait Pass: Visitor {
    fn name(&self) -> &'static str;

    /// Diagnostics found so far.
    fn diagnostics(&self) -> &[Diagnostic];
}

/// Report `kind` over the whole extent of `node`.
fn error_node(node: &impl Node, kind: DiagnosticKind, args: Vec<String>) -> Diagnostic {
    Diagnostic::at(kind, node.span(), node.report_context(), args)
}

/// Runs passes in sequence and concatenates their diagnostics.
#[derive(Default)]
pub struct ComboPass<'a> {
    passes: Vec<Box<dyn Pass + 'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ComboPass<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, pass: impl Pass + 'a) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn push(&mut self, pass: Box<dyn Pass + 'a>) {
        self.passes.push(pass);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn run(&mut self, root: &RootNode) {
        for pass in &mut self.passes {
            walk_root(pass.as_mut(), root);
            tracing::debug!(
                pass = pass.name(),
                diagnostics = pass.diagnostics().len(),
                "pass finished"
            );
            self.diagnostics.extend_from_slice(pass.diagnostics());
        }
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Registers declared names in the scope active at each declaration.
///
/// A declaration is added when it is entered, before its children are
/// walked. Function arguments go into the scope of the function body.
pub struct ScopeApplyPass<'s> {
    scopes: &'s ScopeTree,
}

impl<'s> ScopeApplyPass<'s> {
    #[must_use]
    pub const fn new(scopes: &'s ScopeTree) -> Self {
        Self { scopes }
    }
}

impl Visitor for ScopeApplyPass<'_> {
    fn enter_function(&mut self, function: &Function) {
        self.scopes
            .add(function.scope(), function.name.clone(), RefKind::Function);
        for arg in &function.args {
            self.scopes
                .add(function.body.scope(), arg.name.clone(), RefKind::Variable);
        }
    }

    fn enter_variable_declaration(&mut self, declaration: &VariableDeclaration) {
        self.scopes.add(
            declaration.scope(),
            declaration.name.clone(),
            RefKind::Variable,
        );
    }
}

impl Pass for ScopeApplyPass<'_> {
    fn name(&self) -> &'static str {
        "scope-apply"
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &[]
    }
}

/// Checks that every variable reference names something in scope.
///
/// Run after [`ScopeApplyPass`]. Member names on the right of `.` and `..`
/// are not resolved, nor are names brought in by `use` (matched on their
/// last segment). A function may only be referenced as a callee.
pub struct ResolvePass<'s> {
    scopes: &'s ScopeTree,
    imports: Vec<String>,
    callees: HashSet<Span>,
    members: HashSet<Span>,
    diagnostics: Vec<Diagnostic>,
}

impl<'s> ResolvePass<'s> {
    #[must_use]
    pub fn new(scopes: &'s ScopeTree) -> Self {
        Self {
            scopes,
            imports: Vec::new(),
            callees: HashSet::new(),
            members: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }
}

/// The name a member operand starts with: `b` in `a.b` and `a.b[0]`.
fn member_name(expression: &Expression) -> Option<&VariableReference> {
    match expression {
        Expression::VariableRef(v) => Some(v),
        Expression::Subscript(s) => member_name(&s.source),
        _ => None,
    }
}

/// The name a call goes through: `g` in `g()` and `(g)()`.
fn callee_name(expression: &Expression) -> Option<&VariableReference> {
    match expression {
        Expression::VariableRef(v) => Some(v),
        Expression::Paren(p) => callee_name(&p.inner),
        _ => None,
    }
}

impl Visitor for ResolvePass<'_> {
    fn enter_root(&mut self, root: &RootNode) {
        self.imports = root
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Statement(Statement::Use(u)) => u.path.last().map(|n| n.text.clone()),
                _ => None,
            })
            .collect();
    }

    fn enter_binary_expression(&mut self, expression: &BinaryExpression) {
        let access = matches!(
            expression.op,
            BinaryOperator::Access | BinaryOperator::ChainAccess
        );
        if !access {
            return;
        }
        if let Some(member) = member_name(&expression.right) {
            self.members.insert(member.span().clone());
        }
    }

    fn enter_call_expression(&mut self, expression: &CallExpression) {
        if let Some(callee) = callee_name(&expression.callee) {
            self.callees.insert(callee.span().clone());
        }
    }

    fn enter_variable_reference(&mut self, reference: &VariableReference) {
        if self.members.contains(reference.span()) {
            return;
        }
        let imported = reference
            .name
            .names
            .first()
            .is_some_and(|first| self.imports.contains(&first.text));
        if imported {
            return;
        }

        match self.scopes.resolve(reference.scope(), &reference.name) {
            None => self.diagnostics.push(error_node(
                reference,
                DiagnosticKind::NoSuchVariable,
                vec![reference.name.to_string()],
            )),
            Some(RefKind::Function) if !self.callees.contains(reference.span()) => {
                self.diagnostics.push(error_node(
                    reference,
                    DiagnosticKind::ReferencedEntityNotVariable,
                    vec![reference.name.to_string()],
                ));
            }
            Some(_) => {}
        }
    }
}

impl Pass for ResolvePass<'_> {
    fn name(&self) -> &'static str {
        "resolve"
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Warns about expression statements that do nothing and about parentheses
/// that change nothing.
#[derive(Default)]
pub struct StatementLintPass {
    /// Parens already reported by the statement-level check.
    reported: HashSet<Span>,
    diagnostics: Vec<Diagnostic>,
}

impl StatementLintPass {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for StatementLintPass {
    fn enter_expression_statement(&mut self, statement: &ExpressionStatement) {
        let inner = &statement.inner;
        if let Expression::Paren(paren) = inner {
            self.reported.insert(paren.span().clone());
            self.diagnostics.push(error_node(
                paren,
                DiagnosticKind::RedundantParenthesesInExpressionStatement,
                Vec::new(),
            ));
        }
        if !inner.is_statement_like() && !inner.is_invalid() {
            self.diagnostics.push(error_node(
                statement,
                DiagnosticKind::IneffectiveExpressionStatement,
                Vec::new(),
            ));
        }
    }

    fn enter_paren_expression(&mut self, expression: &ParenExpression) {
        if self.reported.contains(expression.span()) {
            return;
        }
        if matches!(
            expression.inner.as_ref(),
            Expression::Literal(_) | Expression::VariableRef(_) | Expression::Paren(_)
        ) {
            self.diagnostics.push(error_node(
                expression,
                DiagnosticKind::RedundantParentheses,
                Vec::new(),
            ));
        }
    }
}

impl Pass for StatementLintPass {
    fn name(&self) -> &'static str {
        "statement-lint"
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
