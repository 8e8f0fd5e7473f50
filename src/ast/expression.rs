use std::fmt;

use super::{Node, NodeMeta, QualifiedName, impl_node};
use crate::token::TokenKind;

/// Every expression form.
#[derive(Debug, Clone)]
pub enum Expression {
    Literal(Literal),
    Binary(BinaryExpression),
    Paren(ParenExpression),
    Prefix(PrefixExpression),
    Postfix(PostfixExpression),
    Call(CallExpression),
    Subscript(SubscriptExpression),
    VariableRef(VariableReference),
    Return(ReturnExpression),
    /// Placeholder left where an expression failed to parse.
    Invalid(InvalidExpression),
}

impl Node for Expression {
    fn meta(&self) -> &NodeMeta {
        match self {
            Self::Literal(e) => &e.meta,
            Self::Binary(e) => &e.meta,
            Self::Paren(e) => &e.meta,
            Self::Prefix(e) => &e.meta,
            Self::Postfix(e) => &e.meta,
            Self::Call(e) => &e.meta,
            Self::Subscript(e) => &e.meta,
            Self::VariableRef(e) => &e.meta,
            Self::Return(e) => &e.meta,
            Self::Invalid(e) => &e.meta,
        }
    }
}

impl Expression {
    /// Number of operand slots.
    #[must_use]
    pub fn operands(&self) -> usize {
        match self {
            Self::Literal(_)
            | Self::Paren(_)
            | Self::Prefix(_)
            | Self::Postfix(_)
            | Self::VariableRef(_)
            | Self::Return(_) => 1,
            Self::Binary(_) | Self::Subscript(_) => 2,
            Self::Call(c) => c.args.len() + 1,
            Self::Invalid(_) => 0,
        }
    }

    /// Whether the expression has a surface operator token.
    #[must_use]
    pub fn has_operator(&self) -> bool {
        match self {
            Self::Binary(_) | Self::Prefix(_) | Self::Postfix(_) => true,
            Self::Literal(_)
            | Self::Paren(_)
            | Self::Call(_)
            | Self::Subscript(_)
            | Self::VariableRef(_)
            | Self::Return(_)
            | Self::Invalid(_) => false,
        }
    }

    /// Whether the value is known at compile time.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Literal(l) => l.kind != LiteralKind::TemplateString,
            Self::Binary(b) => b.left.is_constant() && b.right.is_constant(),
            Self::Paren(p) => p.inner.is_constant(),
            Self::Prefix(p) => p.inner.is_constant(),
            Self::Postfix(p) => p.inner.is_constant(),
            Self::Call(_) | Self::Subscript(_) | Self::VariableRef(_) => false,
            Self::Return(_) | Self::Invalid(_) => true,
        }
    }

    /// Whether evaluating the expression has no side effects.
    #[must_use]
    pub fn is_pure(&self) -> bool {
        match self {
            Self::Literal(_) | Self::VariableRef(_) | Self::Invalid(_) => true,
            Self::Binary(b) => !b.op.is_assignment() && b.left.is_pure() && b.right.is_pure(),
            Self::Paren(p) => p.inner.is_pure(),
            Self::Prefix(p) => p.op.is_pure() && p.inner.is_pure(),
            Self::Postfix(_) | Self::Call(_) => false,
            Self::Subscript(s) => s.source.is_pure() && s.index.is_pure(),
            Self::Return(r) => r.value.as_deref().is_none_or(Self::is_pure),
        }
    }

    /// Whether the expression may stand alone as a statement.
    #[must_use]
    pub fn is_statement_like(&self) -> bool {
        match self {
            Self::Binary(b) => b.op.is_assignment(),
            Self::Paren(p) => p.inner.is_statement_like(),
            Self::Prefix(p) => matches!(p.op, PrefixOperator::Inc | PrefixOperator::Dec),
            Self::Postfix(_) | Self::Call(_) | Self::Return(_) => true,
            Self::Literal(_) | Self::Subscript(_) | Self::VariableRef(_) | Self::Invalid(_) => {
                false
            }
        }
    }

    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// Literal forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Decimal,
    Hexadecimal,
    Binary,
    Octal,
    Roman,
    String,
    TemplateString,
    Boolean,
}

impl LiteralKind {
    /// The literal kind a token starts, if any.
    #[must_use]
    pub const fn from_token(kind: &TokenKind) -> Option<Self> {
        let lit = match kind {
            TokenKind::Number => Self::Decimal,
            TokenKind::HexNumber => Self::Hexadecimal,
            TokenKind::BinNumber => Self::Binary,
            TokenKind::OctNumber => Self::Octal,
            TokenKind::RomanNumber => Self::Roman,
            TokenKind::String { .. } => Self::String,
            TokenKind::Yes | TokenKind::No => Self::Boolean,
            _ => return None,
        };
        Some(lit)
    }
}

#[derive(Debug, Clone)]
pub struct Literal {
    pub meta: NodeMeta,
    pub kind: LiteralKind,
    /// Exact source text.
    pub text: String,
    /// Unescaped value for strings; the source text otherwise.
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub meta: NodeMeta,
    pub left: Box<Expression>,
    pub op: BinaryOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct ParenExpression {
    pub meta: NodeMeta,
    pub inner: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct PrefixExpression {
    pub meta: NodeMeta,
    pub op: PrefixOperator,
    pub inner: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct PostfixExpression {
    pub meta: NodeMeta,
    pub inner: Box<Expression>,
    pub op: PostfixOperator,
}

/// `callee(args...)`
#[derive(Debug, Clone)]
pub struct CallExpression {
    pub meta: NodeMeta,
    pub callee: Box<Expression>,
    pub args: Vec<Expression>,
}

/// `source[index]`
#[derive(Debug, Clone)]
pub struct SubscriptExpression {
    pub meta: NodeMeta,
    pub source: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct VariableReference {
    pub meta: NodeMeta,
    pub name: QualifiedName,
}

/// `return value?`. Not produced by the current grammar.
#[derive(Debug, Clone)]
pub struct ReturnExpression {
    pub meta: NodeMeta,
    pub value: Option<Box<Expression>>,
}

impl ReturnExpression {
    #[must_use]
    pub fn new(meta: NodeMeta, value: Option<Expression>) -> Self {
        Self {
            meta,
            value: value.map(Box::new),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvalidExpression {
    pub meta: NodeMeta,
}

impl_node!(
    Literal,
    BinaryExpression,
    ParenExpression,
    PrefixExpression,
    PostfixExpression,
    CallExpression,
    SubscriptExpression,
    VariableReference,
    ReturnExpression,
    InvalidExpression,
);

/// Binary operators. Assignment forms come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    LessThanOrEqual,
    MoreThanOrEqual,
    Or,
    Pow,
    And,
    Xor,
    ChainAccess,
    LessThan,
    MoreThan,
    BitOr,
    Mod,
    BitXor,
    BitAnd,
    Minus,
    Plus,
    Mul,
    Div,
    Access,
    As,
    Is,
    To,
    In,
    LeftShift,
    RightShift,

    Assign,
    DivAssign,
    MulAssign,
    PlusAssign,
    MinusAssign,
    BitAndAssign,
    BitXorAssign,
    ModAssign,
    BitOrAssign,
    XorAssign,
    AndAssign,
    PowAssign,
    OrAssign,
    LeftShiftAssign,
    RightShiftAssign,

    Invalid,
}

impl BinaryOperator {
    #[must_use]
    pub fn is_assignment(self) -> bool {
        (Self::Assign..=Self::RightShiftAssign).contains(&self)
    }

    /// Map an operator token to its binary operator.
    #[must_use]
    pub const fn from_token(kind: &TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::EqEq => Self::Equals,
            TokenKind::BangEq => Self::NotEquals,
            TokenKind::LessEq => Self::LessThanOrEqual,
            TokenKind::GreaterEq => Self::MoreThanOrEqual,
            TokenKind::PipePipe => Self::Or,
            TokenKind::StarStar => Self::Pow,
            TokenKind::AmpAmp => Self::And,
            TokenKind::CaretCaret => Self::Xor,
            TokenKind::DotDot => Self::ChainAccess,
            TokenKind::Less => Self::LessThan,
            TokenKind::Greater => Self::MoreThan,
            TokenKind::Pipe => Self::BitOr,
            TokenKind::Percent => Self::Mod,
            TokenKind::Caret => Self::BitXor,
            TokenKind::Amp => Self::BitAnd,
            TokenKind::Minus => Self::Minus,
            TokenKind::Plus => Self::Plus,
            TokenKind::Star => Self::Mul,
            TokenKind::Slash => Self::Div,
            TokenKind::Dot => Self::Access,
            TokenKind::As => Self::As,
            TokenKind::Is => Self::Is,
            TokenKind::To => Self::To,
            TokenKind::In => Self::In,
            TokenKind::Shl => Self::LeftShift,
            TokenKind::Shr => Self::RightShift,
            TokenKind::Eq => Self::Assign,
            TokenKind::SlashEq => Self::DivAssign,
            TokenKind::StarEq => Self::MulAssign,
            TokenKind::PlusEq => Self::PlusAssign,
            TokenKind::MinusEq => Self::MinusAssign,
            TokenKind::AmpEq => Self::BitAndAssign,
            TokenKind::CaretEq => Self::BitXorAssign,
            TokenKind::PercentEq => Self::ModAssign,
            TokenKind::PipeEq => Self::BitOrAssign,
            TokenKind::CaretCaretEq => Self::XorAssign,
            TokenKind::AmpAmpEq => Self::AndAssign,
            TokenKind::StarStarEq => Self::PowAssign,
            TokenKind::PipePipeEq => Self::OrAssign,
            TokenKind::ShlEq => Self::LeftShiftAssign,
            TokenKind::ShrEq => Self::RightShiftAssign,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::LessThanOrEqual => "<=",
            Self::MoreThanOrEqual => ">=",
            Self::Or => "||",
            Self::Pow => "**",
            Self::And => "&&",
            Self::Xor => "^^",
            Self::ChainAccess => "..",
            Self::LessThan => "<",
            Self::MoreThan => ">",
            Self::BitOr => "|",
            Self::Mod => "%",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Access => ".",
            Self::As => "as",
            Self::Is => "is",
            Self::To => "to",
            Self::In => "in",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Assign => "=",
            Self::DivAssign => "/=",
            Self::MulAssign => "*=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::BitAndAssign => "&=",
            Self::BitXorAssign => "^=",
            Self::ModAssign => "%=",
            Self::BitOrAssign => "|=",
            Self::XorAssign => "^^=",
            Self::AndAssign => "&&=",
            Self::PowAssign => "**=",
            Self::OrAssign => "||=",
            Self::LeftShiftAssign => "<<=",
            Self::RightShiftAssign => ">>=",
            Self::Invalid => "<invalid>",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Plus,
    Minus,
    Not,
    Negate,
    Inc,
    Dec,
    Invalid,
}

impl PrefixOperator {
    #[must_use]
    pub const fn from_token(kind: &TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => Self::Plus,
            TokenKind::Minus => Self::Minus,
            TokenKind::Bang => Self::Not,
            TokenKind::Tilde => Self::Negate,
            TokenKind::PlusPlus => Self::Inc,
            TokenKind::MinusMinus => Self::Dec,
            _ => return None,
        };
        Some(op)
    }

    /// Increment and decrement write to their operand.
    #[must_use]
    pub const fn is_pure(self) -> bool {
        !matches!(self, Self::Inc | Self::Dec)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
            Self::Negate => "~",
            Self::Inc => "++",
            Self::Dec => "--",
            Self::Invalid => "<invalid>",
        }
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOperator {
    Inc,
    Dec,
    Invalid,
}

impl PostfixOperator {
    #[must_use]
    pub const fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::PlusPlus => Some(Self::Inc),
            TokenKind::MinusMinus => Some(Self::Dec),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Inc => "++",
            Self::Dec => "--",
            Self::Invalid => "<invalid>",
        }
    }
}

impl fmt::Display for PostfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
