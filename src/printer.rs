//! Compact S-expression dump of a syntax tree.
//!
//! Expressions print in prefix form (`(+ 1 (* 2 3))`), types in source-like
//! form (`[int]`, `map[str, int]?`), one top-level item per line.

use crate::ast::{
    Block, DataType, Expression, Function, Item, QualifiedName, RootNode, Statement,
};

/// Render every top-level item of `root`, one per line.
#[must_use]
pub fn render(root: &RootNode) -> String {
    let mut out = String::new();
    for item in &root.items {
        match item {
            Item::Function(f) => render_function_into(&mut out, f),
            Item::Statement(s) => render_statement_into(&mut out, s),
        }
        out.push('\n');
    }
    out
}

#[must_use]
pub fn render_expression(expression: &Expression) -> String {
    let mut out = String::new();
    render_expression_into(&mut out, expression);
    out
}

#[must_use]
pub fn render_data_type(data_type: &DataType) -> String {
    let mut out = String::new();
    render_data_type_into(&mut out, data_type);
    out
}

#[must_use]
pub fn render_statement(statement: &Statement) -> String {
    let mut out = String::new();
    render_statement_into(&mut out, statement);
    out
}

fn render_name(out: &mut String, name: &QualifiedName) {
    out.push_str(&name.to_string());
}

fn render_function_into(out: &mut String, function: &Function) {
    out.push_str("(func ");
    render_name(out, &function.name);
    out.push_str(" (");
    for (i, arg) in function.args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push('(');
        render_name(out, &arg.name);
        out.push(' ');
        render_data_type_into(out, &arg.arg_type);
        out.push(')');
    }
    out.push_str(") ");
    render_data_type_into(out, &function.return_type);
    out.push(' ');
    render_block(out, &function.body);
    out.push(')');
}

fn render_block(out: &mut String, block: &Block) {
    out.push_str("(block");
    for statement in &block.statements {
        out.push(' ');
        render_statement_into(out, statement);
    }
    out.push(')');
}

fn render_statement_into(out: &mut String, statement: &Statement) {
    match statement {
        Statement::Use(s) => {
            out.push_str("(use ");
            render_name(out, &s.path);
            out.push(')');
        }
        Statement::VariableDeclaration(s) => {
            out.push_str("(let ");
            render_name(out, &s.name);
            if let Some(declared) = &s.declared_type {
                out.push(' ');
                render_data_type_into(out, declared);
            }
            if let Some(init) = &s.init {
                out.push_str(" = ");
                render_expression_into(out, init);
            }
            out.push(')');
        }
        Statement::Expression(s) => {
            out.push_str("(do ");
            render_expression_into(out, &s.inner);
            out.push(')');
        }
    }
}

fn render_data_type_into(out: &mut String, data_type: &DataType) {
    match data_type {
        DataType::Atom(t) => render_name(out, &t.name),
        DataType::Array(t) => {
            out.push('[');
            render_data_type_into(out, &t.inner);
            out.push(']');
        }
        DataType::Generic(t) => {
            render_name(out, &t.name);
            out.push('[');
            for (i, arg) in t.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_data_type_into(out, arg);
            }
            out.push(']');
        }
        DataType::Nullable(t) => {
            render_data_type_into(out, &t.inner);
            out.push('?');
        }
        DataType::None(_) => out.push_str("none"),
    }
}

fn render_expression_into(out: &mut String, expression: &Expression) {
    match expression {
        Expression::Literal(l) => out.push_str(&l.text),
        Expression::VariableRef(v) => render_name(out, &v.name),
        Expression::Binary(b) => {
            out.push('(');
            out.push_str(b.op.symbol());
            out.push(' ');
            render_expression_into(out, &b.left);
            out.push(' ');
            render_expression_into(out, &b.right);
            out.push(')');
        }
        Expression::Paren(p) => {
            out.push_str("(paren ");
            render_expression_into(out, &p.inner);
            out.push(')');
        }
        Expression::Prefix(p) => {
            out.push('(');
            out.push_str(p.op.symbol());
            out.push(' ');
            render_expression_into(out, &p.inner);
            out.push(')');
        }
        Expression::Postfix(p) => {
            out.push_str("(post");
            out.push_str(p.op.symbol());
            out.push(' ');
            render_expression_into(out, &p.inner);
            out.push(')');
        }
        Expression::Call(c) => {
            out.push_str("(call ");
            render_expression_into(out, &c.callee);
            for arg in &c.args {
                out.push(' ');
                render_expression_into(out, arg);
            }
            out.push(')');
        }
        Expression::Subscript(s) => {
            out.push_str("(index ");
            render_expression_into(out, &s.source);
            out.push(' ');
            render_expression_into(out, &s.index);
            out.push(')');
        }
        Expression::Return(r) => {
            out.push_str("(return");
            if let Some(value) = &r.value {
                out.push(' ');
                render_expression_into(out, value);
            }
            out.push(')');
        }
        Expression::Invalid(_) => out.push_str("<invalid>"),
    }
}
