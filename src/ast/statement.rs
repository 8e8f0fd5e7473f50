use super::{DataType, Expression, Node, NodeMeta, QualifiedName, impl_node};

/// Statements allowed at top level and inside blocks.
#[derive(Debug, Clone)]
pub enum Statement {
    Use(UseStatement),
    VariableDeclaration(VariableDeclaration),
    Expression(ExpressionStatement),
}

impl Node for Statement {
    fn meta(&self) -> &NodeMeta {
        match self {
            Self::Use(s) => &s.meta,
            Self::VariableDeclaration(s) => &s.meta,
            Self::Expression(s) => &s.meta,
        }
    }
}

impl Statement {
    /// None of the current statement forms alter control flow.
    #[must_use]
    pub const fn is_control_flow(&self) -> bool {
        match self {
            Self::Use(_) | Self::VariableDeclaration(_) | Self::Expression(_) => false,
        }
    }
}

/// `use a.b.c;`
#[derive(Debug, Clone)]
pub struct UseStatement {
    pub meta: NodeMeta,
    pub path: QualifiedName,
}

/// `let name [type] [= init];`
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub meta: NodeMeta,
    pub name: QualifiedName,
    pub declared_type: Option<DataType>,
    pub init: Option<Expression>,
}

/// An expression evaluated for its effect.
#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub meta: NodeMeta,
    pub inner: Expression,
}

impl_node!(UseStatement, VariableDeclaration, ExpressionStatement);
