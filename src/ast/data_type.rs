use super::{Node, NodeMeta, QualifiedName, impl_node};

/// A written type.
#[derive(Debug, Clone)]
pub enum DataType {
    /// A named type: `int`, `std.io.File`.
    Atom(AtomType),
    /// `[inner]`. Arrays of arrays are not collapsed.
    Array(ArrayType),
    /// `name[args, ...]`; the argument list may be empty.
    Generic(GenericType),
    /// `inner?`
    Nullable(NullableType),
    /// No type was written.
    None(NoneType),
}

impl Node for DataType {
    fn meta(&self) -> &NodeMeta {
        match self {
            Self::Atom(t) => &t.meta,
            Self::Array(t) => &t.meta,
            Self::Generic(t) => &t.meta,
            Self::Nullable(t) => &t.meta,
            Self::None(t) => &t.meta,
        }
    }
}

impl DataType {
    #[must_use]
    pub const fn none(meta: NodeMeta) -> Self {
        Self::None(NoneType { meta })
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None(_))
    }

    /// Whether the type carries other types inside it.
    #[must_use]
    pub const fn has_other_types(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Generic(_))
    }
}

#[derive(Debug, Clone)]
pub struct AtomType {
    pub meta: NodeMeta,
    pub name: QualifiedName,
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub meta: NodeMeta,
    pub inner: Box<DataType>,
}

#[derive(Debug, Clone)]
pub struct GenericType {
    pub meta: NodeMeta,
    pub name: QualifiedName,
    pub args: Vec<DataType>,
}

#[derive(Debug, Clone)]
pub struct NullableType {
    pub meta: NodeMeta,
    pub inner: Box<DataType>,
}

#[derive(Debug, Clone)]
pub struct NoneType {
    pub meta: NodeMeta,
}

impl_node!(AtomType, ArrayType, GenericType, NullableType, NoneType);
