//! Syntax tree for Pretzel source files.
//!
//! Node categories are closed sum types: [`Statement`], [`Expression`] and
//! [`DataType`] enumerate every variant the parser can build. Each node
//! carries a [`NodeMeta`] with its span, the scope active where it was
//! parsed, and the report context of its file.

mod data_type;
mod expression;
mod statement;

use std::fmt;
use std::sync::Arc;

pub use data_type::{ArrayType, AtomType, DataType, GenericType, NoneType, NullableType};
pub use expression::{
    BinaryExpression, BinaryOperator, CallExpression, Expression, InvalidExpression, Literal,
    LiteralKind, ParenExpression, PostfixExpression, PostfixOperator, PrefixExpression,
    PrefixOperator, ReturnExpression, SubscriptExpression, VariableReference,
};
pub use statement::{ExpressionStatement, Statement, UseStatement, VariableDeclaration};

use crate::diagnostic::ReportContext;
use crate::scope::ScopeId;
use crate::token::{Position, Span};

/// Data every node carries.
#[derive(Debug, Clone)]
pub struct NodeMeta {
    pub span: Span,
    /// Scope active at the node's position.
    pub scope: ScopeId,
    /// Shared by every node of the same file.
    pub report: Arc<ReportContext>,
}

impl NodeMeta {
    #[must_use]
    pub const fn new(span: Span, scope: ScopeId, report: Arc<ReportContext>) -> Self {
        Self {
            span,
            scope,
            report,
        }
    }

    /// Same scope and report context, different span.
    #[must_use]
    pub fn with_span(&self, span: Span) -> Self {
        Self {
            span,
            scope: self.scope,
            report: Arc::clone(&self.report),
        }
    }

    fn synthetic() -> Self {
        Self {
            span: Span::empty(Arc::from("<synthetic>"), Position::default()),
            scope: ScopeId::ROOT,
            report: Arc::new(ReportContext::new(String::new())),
        }
    }
}

/// Common accessors for every node.
pub trait Node {
    fn meta(&self) -> &NodeMeta;

    fn span(&self) -> &Span {
        &self.meta().span
    }

    fn scope(&self) -> ScopeId {
        self.meta().scope
    }

    fn report_context(&self) -> &Arc<ReportContext> {
        &self.meta().report
    }
}

macro_rules! impl_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::ast::Node for $ty {
                fn meta(&self) -> &$crate::ast::NodeMeta {
                    &self.meta
                }
            }
        )*
    };
}

pub(crate) use impl_node;

impl_node!(Name, QualifiedName, FunctionArg, Function, Block, RootNode);

/// Node kinds named in parser diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Name,
    QualifiedName,
    Root,
    UseStatement,
    DataType,
    FunctionArg,
    Function,
    Block,
    Expression,
    ExpressionStatement,
    VariableDeclaration,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::QualifiedName => "qualified name",
            Self::Root => "root",
            Self::UseStatement => "use statement",
            Self::DataType => "data type",
            Self::FunctionArg => "function argument",
            Self::Function => "function declaration",
            Self::Block => "block",
            Self::Expression => "expression",
            Self::ExpressionStatement => "expression statement",
            Self::VariableDeclaration => "variable declaration",
        };
        f.write_str(name)
    }
}

/// A single identifier segment.
#[derive(Debug, Clone)]
pub struct Name {
    pub meta: NodeMeta,
    pub text: String,
}

/// A dotted name such as `a.b.c`; never empty.
#[derive(Debug, Clone)]
pub struct QualifiedName {
    pub meta: NodeMeta,
    pub names: Vec<Name>,
}

impl QualifiedName {
    /// Structural equality: same number of segments with identical text.
    ///
    /// This is the only name comparison in the system; spans and scopes are
    /// ignored.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.names.len() == other.names.len()
            && self
                .names
                .iter()
                .zip(&other.names)
                .all(|(a, b)| a.text == b.text)
    }

    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.names.iter().map(|n| n.text.as_str()).collect()
    }

    /// The last segment, e.g. `c` for `a.b.c`.
    #[must_use]
    pub fn last(&self) -> Option<&Name> {
        self.names.last()
    }

    /// Build a name that does not come from any source file.
    #[must_use]
    pub fn synthetic(segments: &[&str]) -> Self {
        let meta = NodeMeta::synthetic();
        let names = segments
            .iter()
            .map(|text| Name {
                meta: meta.clone(),
                text: (*text).to_string(),
            })
            .collect();
        Self { meta, names }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&name.text)?;
        }
        Ok(())
    }
}

/// One argument in a function declaration: a name and a required type.
#[derive(Debug, Clone)]
pub struct FunctionArg {
    pub meta: NodeMeta,
    pub name: QualifiedName,
    pub arg_type: DataType,
}

/// `func name(args) return_type { body }`
#[derive(Debug, Clone)]
pub struct Function {
    pub meta: NodeMeta,
    pub name: QualifiedName,
    pub args: Vec<FunctionArg>,
    /// [`DataType::None`] when no return type was written.
    pub return_type: DataType,
    pub body: Block,
}

/// `{ statement; ... }`. Its `meta.scope` is the scope the block opens.
#[derive(Debug, Clone)]
pub struct Block {
    pub meta: NodeMeta,
    pub statements: Vec<Statement>,
}

/// A top-level element of a file.
#[derive(Debug, Clone)]
pub enum Item {
    Function(Function),
    Statement(Statement),
}

impl Node for Item {
    fn meta(&self) -> &NodeMeta {
        match self {
            Self::Function(f) => &f.meta,
            Self::Statement(s) => s.meta(),
        }
    }
}

/// One per source file; owns the file's outermost scope.
#[derive(Debug, Clone)]
pub struct RootNode {
    pub meta: NodeMeta,
    pub items: Vec<Item>,
}
