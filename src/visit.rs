//! Double-dispatch tree traversal.
//!
//! [`Visitor`] has one enter/exit pair per concrete node kind plus generic
//! pairs for any node, statement, expression, data type and literal. Every
//! method defaults to a no-op, so implementors override only what they need.
//!
//! For each node the walk fires, in order: `enter_node`, the category
//! callback (`enter_statement`, `enter_expression` or `enter_data_type`),
//! `enter_literal` for literals, then the specific callback. Children follow
//! in source order, then the exit callbacks fire in the exact reverse order.

use crate::ast::{
    ArrayType, AtomType, BinaryExpression, Block, CallExpression, DataType, Expression,
    ExpressionStatement, Function, FunctionArg, GenericType, InvalidExpression, Item, Literal,
    LiteralKind, Name, Node, NoneType, NullableType, ParenExpression, PostfixExpression,
    PrefixExpression, QualifiedName, ReturnExpression, RootNode, Statement, SubscriptExpression,
    UseStatement, VariableDeclaration, VariableReference,
};
use crate::token::Span;

/// A borrowed reference to any node, passed to the generic callbacks.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Root(&'a RootNode),
    Name(&'a Name),
    QualifiedName(&'a QualifiedName),
    Statement(&'a Statement),
    Expression(&'a Expression),
    DataType(&'a DataType),
    FunctionArg(&'a FunctionArg),
    Function(&'a Function),
    Block(&'a Block),
}

impl NodeRef<'_> {
    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::Root(n) => n.span(),
            Self::Name(n) => n.span(),
            Self::QualifiedName(n) => n.span(),
            Self::Statement(n) => n.span(),
            Self::Expression(n) => n.span(),
            Self::DataType(n) => n.span(),
            Self::FunctionArg(n) => n.span(),
            Self::Function(n) => n.span(),
            Self::Block(n) => n.span(),
        }
    }

    /// Short name of the node's concrete kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Root(_) => "root",
            Self::Name(_) => "name",
            Self::QualifiedName(_) => "qualified-name",
            Self::Statement(s) => match s {
                Statement::Use(_) => "use",
                Statement::VariableDeclaration(_) => "let",
                Statement::Expression(_) => "expression-statement",
            },
            Self::Expression(e) => match e {
                Expression::Literal(_) => "literal",
                Expression::Binary(_) => "binary",
                Expression::Paren(_) => "paren",
                Expression::Prefix(_) => "prefix",
                Expression::Postfix(_) => "postfix",
                Expression::Call(_) => "call",
                Expression::Subscript(_) => "subscript",
                Expression::VariableRef(_) => "variable",
                Expression::Return(_) => "return",
                Expression::Invalid(_) => "invalid",
            },
            Self::DataType(t) => match t {
                DataType::Atom(_) => "atom-type",
                DataType::Array(_) => "array-type",
                DataType::Generic(_) => "generic-type",
                DataType::Nullable(_) => "nullable-type",
                DataType::None(_) => "none-type",
            },
            Self::FunctionArg(_) => "function-arg",
            Self::Function(_) => "function",
            Self::Block(_) => "block",
        }
    }
}

/// Observer of a tree walk.
#[allow(unused_variables)]
pub trait Visitor {
    fn enter_node(&mut self, node: NodeRef<'_>) {}
    fn exit_node(&mut self, node: NodeRef<'_>) {}
    fn enter_statement(&mut self, statement: &Statement) {}
    fn exit_statement(&mut self, statement: &Statement) {}
    fn enter_expression(&mut self, expression: &Expression) {}
    fn exit_expression(&mut self, expression: &Expression) {}
    fn enter_data_type(&mut self, data_type: &DataType) {}
    fn exit_data_type(&mut self, data_type: &DataType) {}
    fn enter_literal(&mut self, literal: &Literal) {}
    fn exit_literal(&mut self, literal: &Literal) {}

    fn enter_root(&mut self, root: &RootNode) {}
    fn exit_root(&mut self, root: &RootNode) {}
    fn enter_name(&mut self, name: &Name) {}
    fn exit_name(&mut self, name: &Name) {}
    fn enter_qualified_name(&mut self, name: &QualifiedName) {}
    fn exit_qualified_name(&mut self, name: &QualifiedName) {}
    fn enter_function(&mut self, function: &Function) {}
    fn exit_function(&mut self, function: &Function) {}
    fn enter_function_arg(&mut self, arg: &FunctionArg) {}
    fn exit_function_arg(&mut self, arg: &FunctionArg) {}
    fn enter_block(&mut self, block: &Block) {}
    fn exit_block(&mut self, block: &Block) {}

    fn enter_use_statement(&mut self, statement: &UseStatement) {}
    fn exit_use_statement(&mut self, statement: &UseStatement) {}
    fn enter_variable_declaration(&mut self, declaration: &VariableDeclaration) {}
    fn exit_variable_declaration(&mut self, declaration: &VariableDeclaration) {}
    fn enter_expression_statement(&mut self, statement: &ExpressionStatement) {}
    fn exit_expression_statement(&mut self, statement: &ExpressionStatement) {}

    fn enter_atom_type(&mut self, data_type: &AtomType) {}
    fn exit_atom_type(&mut self, data_type: &AtomType) {}
    fn enter_array_type(&mut self, data_type: &ArrayType) {}
    fn exit_array_type(&mut self, data_type: &ArrayType) {}
    fn enter_generic_type(&mut self, data_type: &GenericType) {}
    fn exit_generic_type(&mut self, data_type: &GenericType) {}
    fn enter_nullable_type(&mut self, data_type: &NullableType) {}
    fn exit_nullable_type(&mut self, data_type: &NullableType) {}
    fn enter_none_type(&mut self, data_type: &NoneType) {}
    fn exit_none_type(&mut self, data_type: &NoneType) {}

    fn enter_decimal_literal(&mut self, literal: &Literal) {}
    fn exit_decimal_literal(&mut self, literal: &Literal) {}
    fn enter_hexadecimal_literal(&mut self, literal: &Literal) {}
    fn exit_hexadecimal_literal(&mut self, literal: &Literal) {}
    fn enter_binary_literal(&mut self, literal: &Literal) {}
    fn exit_binary_literal(&mut self, literal: &Literal) {}
    fn enter_octal_literal(&mut self, literal: &Literal) {}
    fn exit_octal_literal(&mut self, literal: &Literal) {}
    fn enter_roman_literal(&mut self, literal: &Literal) {}
    fn exit_roman_literal(&mut self, literal: &Literal) {}
    fn enter_string_literal(&mut self, literal: &Literal) {}
    fn exit_string_literal(&mut self, literal: &Literal) {}
    fn enter_template_string_literal(&mut self, literal: &Literal) {}
    fn exit_template_string_literal(&mut self, literal: &Literal) {}
    fn enter_boolean_literal(&mut self, literal: &Literal) {}
    fn exit_boolean_literal(&mut self, literal: &Literal) {}

    fn enter_binary_expression(&mut self, expression: &BinaryExpression) {}
    fn exit_binary_expression(&mut self, expression: &BinaryExpression) {}
    fn enter_paren_expression(&mut self, expression: &ParenExpression) {}
    fn exit_paren_expression(&mut self, expression: &ParenExpression) {}
    fn enter_prefix_expression(&mut self, expression: &PrefixExpression) {}
    fn exit_prefix_expression(&mut self, expression: &PrefixExpression) {}
    fn enter_postfix_expression(&mut self, expression: &PostfixExpression) {}
    fn exit_postfix_expression(&mut self, expression: &PostfixExpression) {}
    fn enter_call_expression(&mut self, expression: &CallExpression) {}
    fn exit_call_expression(&mut self, expression: &CallExpression) {}
    fn enter_subscript_expression(&mut self, expression: &SubscriptExpression) {}
    fn exit_subscript_expression(&mut self, expression: &SubscriptExpression) {}
    fn enter_variable_reference(&mut self, expression: &VariableReference) {}
    fn exit_variable_reference(&mut self, expression: &VariableReference) {}
    fn enter_return_expression(&mut self, expression: &ReturnExpression) {}
    fn exit_return_expression(&mut self, expression: &ReturnExpression) {}
    fn enter_invalid_expression(&mut self, expression: &InvalidExpression) {}
    fn exit_invalid_expression(&mut self, expression: &InvalidExpression) {}
}

/// Walk any node with `visitor`.
pub fn traverse<V: Visitor + ?Sized>(visitor: &mut V, node: NodeRef<'_>) {
    match node {
        NodeRef::Root(n) => walk_root(visitor, n),
        NodeRef::Name(n) => walk_name(visitor, n),
        NodeRef::QualifiedName(n) => walk_qualified_name(visitor, n),
        NodeRef::Statement(n) => walk_statement(visitor, n),
        NodeRef::Expression(n) => walk_expression(visitor, n),
        NodeRef::DataType(n) => walk_data_type(visitor, n),
        NodeRef::FunctionArg(n) => walk_function_arg(visitor, n),
        NodeRef::Function(n) => walk_function(visitor, n),
        NodeRef::Block(n) => walk_block(visitor, n),
    }
}

pub fn walk_root<V: Visitor + ?Sized>(visitor: &mut V, root: &RootNode) {
    visitor.enter_node(NodeRef::Root(root));
    visitor.enter_root(root);
    for item in &root.items {
        match item {
            Item::Function(f) => walk_function(visitor, f),
            Item::Statement(s) => walk_statement(visitor, s),
        }
    }
    visitor.exit_root(root);
    visitor.exit_node(NodeRef::Root(root));
}

pub fn walk_name<V: Visitor + ?Sized>(visitor: &mut V, name: &Name) {
    visitor.enter_node(NodeRef::Name(name));
    visitor.enter_name(name);
    visitor.exit_name(name);
    visitor.exit_node(NodeRef::Name(name));
}

pub fn walk_qualified_name<V: Visitor + ?Sized>(visitor: &mut V, name: &QualifiedName) {
    visitor.enter_node(NodeRef::QualifiedName(name));
    visitor.enter_qualified_name(name);
    for segment in &name.names {
        walk_name(visitor, segment);
    }
    visitor.exit_qualified_name(name);
    visitor.exit_node(NodeRef::QualifiedName(name));
}

/// Children: name, arguments, return type, body.
pub fn walk_function<V: Visitor + ?Sized>(visitor: &mut V, function: &Function) {
    visitor.enter_node(NodeRef::Function(function));
    visitor.enter_function(function);
    walk_qualified_name(visitor, &function.name);
    for arg in &function.args {
        walk_function_arg(visitor, arg);
    }
    walk_data_type(visitor, &function.return_type);
    walk_block(visitor, &function.body);
    visitor.exit_function(function);
    visitor.exit_node(NodeRef::Function(function));
}

pub fn walk_function_arg<V: Visitor + ?Sized>(visitor: &mut V, arg: &FunctionArg) {
    visitor.enter_node(NodeRef::FunctionArg(arg));
    visitor.enter_function_arg(arg);
    walk_qualified_name(visitor, &arg.name);
    walk_data_type(visitor, &arg.arg_type);
    visitor.exit_function_arg(arg);
    visitor.exit_node(NodeRef::FunctionArg(arg));
}

pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &Block) {
    visitor.enter_node(NodeRef::Block(block));
    visitor.enter_block(block);
    for statement in &block.statements {
        walk_statement(visitor, statement);
    }
    visitor.exit_block(block);
    visitor.exit_node(NodeRef::Block(block));
}

pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    visitor.enter_node(NodeRef::Statement(statement));
    visitor.enter_statement(statement);
    match statement {
        Statement::Use(s) => {
            visitor.enter_use_statement(s);
            walk_qualified_name(visitor, &s.path);
            visitor.exit_use_statement(s);
        }
        Statement::VariableDeclaration(s) => {
            visitor.enter_variable_declaration(s);
            walk_qualified_name(visitor, &s.name);
            if let Some(declared) = &s.declared_type {
                walk_data_type(visitor, declared);
            }
            if let Some(init) = &s.init {
                walk_expression(visitor, init);
            }
            visitor.exit_variable_declaration(s);
        }
        Statement::Expression(s) => {
            visitor.enter_expression_statement(s);
            walk_expression(visitor, &s.inner);
            visitor.exit_expression_statement(s);
        }
    }
    visitor.exit_statement(statement);
    visitor.exit_node(NodeRef::Statement(statement));
}

pub fn walk_data_type<V: Visitor + ?Sized>(visitor: &mut V, data_type: &DataType) {
    visitor.enter_node(NodeRef::DataType(data_type));
    visitor.enter_data_type(data_type);
    match data_type {
        DataType::Atom(t) => {
            visitor.enter_atom_type(t);
            walk_qualified_name(visitor, &t.name);
            visitor.exit_atom_type(t);
        }
        DataType::Array(t) => {
            visitor.enter_array_type(t);
            walk_data_type(visitor, &t.inner);
            visitor.exit_array_type(t);
        }
        DataType::Generic(t) => {
            visitor.enter_generic_type(t);
            walk_qualified_name(visitor, &t.name);
            for arg in &t.args {
                walk_data_type(visitor, arg);
            }
            visitor.exit_generic_type(t);
        }
        DataType::Nullable(t) => {
            visitor.enter_nullable_type(t);
            walk_data_type(visitor, &t.inner);
            visitor.exit_nullable_type(t);
        }
        DataType::None(t) => {
            visitor.enter_none_type(t);
            visitor.exit_none_type(t);
        }
    }
    visitor.exit_data_type(data_type);
    visitor.exit_node(NodeRef::DataType(data_type));
}

pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    // Parser nesting limits keep trees shallow; this covers hand-built ones.
    stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
        visitor.enter_node(NodeRef::Expression(expression));
        visitor.enter_expression(expression);
        match expression {
            Expression::Literal(l) => walk_literal(visitor, l),
            Expression::Binary(e) => {
                visitor.enter_binary_expression(e);
                walk_expression(visitor, &e.left);
                walk_expression(visitor, &e.right);
                visitor.exit_binary_expression(e);
            }
            Expression::Paren(e) => {
                visitor.enter_paren_expression(e);
                walk_expression(visitor, &e.inner);
                visitor.exit_paren_expression(e);
            }
            Expression::Prefix(e) => {
                visitor.enter_prefix_expression(e);
                walk_expression(visitor, &e.inner);
                visitor.exit_prefix_expression(e);
            }
            Expression::Postfix(e) => {
                visitor.enter_postfix_expression(e);
                walk_expression(visitor, &e.inner);
                visitor.exit_postfix_expression(e);
            }
            Expression::Call(e) => {
                visitor.enter_call_expression(e);
                walk_expression(visitor, &e.callee);
                for arg in &e.args {
                    walk_expression(visitor, arg);
                }
                visitor.exit_call_expression(e);
            }
            Expression::Subscript(e) => {
                visitor.enter_subscript_expression(e);
                walk_expression(visitor, &e.source);
                walk_expression(visitor, &e.index);
                visitor.exit_subscript_expression(e);
            }
            Expression::VariableRef(e) => {
                visitor.enter_variable_reference(e);
                walk_qualified_name(visitor, &e.name);
                visitor.exit_variable_reference(e);
            }
            Expression::Return(e) => {
                visitor.enter_return_expression(e);
                if let Some(value) = &e.value {
                    walk_expression(visitor, value);
                }
                visitor.exit_return_expression(e);
            }
            Expression::Invalid(e) => {
                visitor.enter_invalid_expression(e);
                visitor.exit_invalid_expression(e);
            }
        }
        visitor.exit_expression(expression);
        visitor.exit_node(NodeRef::Expression(expression));
    });
}

fn walk_literal<V: Visitor + ?Sized>(visitor: &mut V, literal: &Literal) {
    visitor.enter_literal(literal);
    match literal.kind {
        LiteralKind::Decimal => {
            visitor.enter_decimal_literal(literal);
            visitor.exit_decimal_literal(literal);
        }
        LiteralKind::Hexadecimal => {
            visitor.enter_hexadecimal_literal(literal);
            visitor.exit_hexadecimal_literal(literal);
        }
        LiteralKind::Binary => {
            visitor.enter_binary_literal(literal);
            visitor.exit_binary_literal(literal);
        }
        LiteralKind::Octal => {
            visitor.enter_octal_literal(literal);
            visitor.exit_octal_literal(literal);
        }
        LiteralKind::Roman => {
            visitor.enter_roman_literal(literal);
            visitor.exit_roman_literal(literal);
        }
        LiteralKind::String => {
            visitor.enter_string_literal(literal);
            visitor.exit_string_literal(literal);
        }
        LiteralKind::TemplateString => {
            visitor.enter_template_string_literal(literal);
            visitor.exit_template_string_literal(literal);
        }
        LiteralKind::Boolean => {
            visitor.enter_boolean_literal(literal);
            visitor.exit_boolean_literal(literal);
        }
    }
    visitor.exit_literal(literal);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ast::NodeMeta;
    use crate::diagnostic::ReportContext;
    use crate::scope::ScopeId;
    use crate::token::Position;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Visitor for Recorder {
        fn enter_node(&mut self, node: NodeRef<'_>) {
            self.events.push(format!("node+{}", node.kind_name()));
        }
        fn exit_node(&mut self, node: NodeRef<'_>) {
            self.events.push(format!("node-{}", node.kind_name()));
        }
        fn enter_expression(&mut self, _: &Expression) {
            self.events.push("expr+".into());
        }
        fn exit_expression(&mut self, _: &Expression) {
            self.events.push("expr-".into());
        }
        fn enter_literal(&mut self, _: &Literal) {
            self.events.push("lit+".into());
        }
        fn exit_literal(&mut self, _: &Literal) {
            self.events.push("lit-".into());
        }
        fn enter_decimal_literal(&mut self, l: &Literal) {
            self.events.push(format!("dec+{}", l.text));
        }
        fn exit_decimal_literal(&mut self, l: &Literal) {
            self.events.push(format!("dec-{}", l.text));
        }
    }

    #[test]
    fn literal_events_nest_symmetrically() {
        let meta = NodeMeta::new(
            Span::empty(Arc::from("t.pz"), Position::default()),
            ScopeId::ROOT,
            Arc::new(ReportContext::new("7".into())),
        );
        let expr = Expression::Literal(Literal {
            meta,
            kind: LiteralKind::Decimal,
            text: "7".into(),
            value: "7".into(),
        });
        let mut rec = Recorder::default();
        traverse(&mut rec, NodeRef::Expression(&expr));
        assert_eq!(
            rec.events,
            [
                "node+literal",
                "expr+",
                "lit+",
                "dec+7",
                "dec-7",
                "lit-",
                "expr-",
                "node-literal"
            ]
        );
    }
}
