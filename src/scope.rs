//! Lexical scope chain.
//!
//! Scopes live in a per-file arena ([`ScopeTree`]) and refer to their parent
//! by index, so a child never owns its parent and nodes can point at the
//! scope they were parsed in with a plain [`ScopeId`].
//!
//! The shape of the tree is fixed once parsing finishes, but entries are
//! still added afterwards by passes that only hold a shared reference, so
//! each level keeps its entries in a [`RefCell`].

use std::cell::{Ref, RefCell};
use std::fmt;

use crate::ast::QualifiedName;

/// Index of a scope inside its [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The outermost scope of every tree.
    pub const ROOT: Self = Self(0);

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a name in a scope refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Variable,
    Function,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable => write!(f, "variable"),
            Self::Function => write!(f, "function"),
        }
    }
}

/// One level of the chain.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    parent: Option<ScopeId>,
    entries: RefCell<Vec<(QualifiedName, RefKind)>>,
}

impl Scope {
    #[must_use]
    pub const fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Entries in insertion order. Structurally equal names may repeat.
    #[must_use]
    pub fn entries(&self) -> Ref<'_, [(QualifiedName, RefKind)]> {
        Ref::map(self.entries.borrow(), Vec::as_slice)
    }

    /// Look a name up in this level only; the earliest matching entry wins.
    #[must_use]
    pub fn find(&self, name: &QualifiedName) -> Option<RefKind> {
        self.entries
            .borrow()
            .iter()
            .find(|(key, _)| key.matches(name))
            .map(|(_, kind)| *kind)
    }
}

/// Arena holding every scope of one file. Index 0 is the root scope.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    #[must_use]
    pub const fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Open a new scope nested in `parent`.
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            entries: RefCell::new(Vec::new()),
        });
        id
    }

    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    #[must_use]
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    #[must_use]
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Insert `name` into `scope` unconditionally.
    ///
    /// No shadowing check and no duplicate rejection: a structurally equal
    /// name already present stays, and resolution keeps finding it first.
    pub fn add(&self, scope: ScopeId, name: QualifiedName, kind: RefKind) {
        tracing::trace!(scope = scope.0, %name, %kind, "scope insert");
        self.get(scope).entries.borrow_mut().push((name, kind));
    }

    /// Resolve `name` starting at `scope` and walking outwards to the root.
    #[must_use]
    pub fn resolve(&self, scope: ScopeId, name: &QualifiedName) -> Option<RefKind> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let level = self.get(id);
            if let Some(kind) = level.find(name) {
                return Some(kind);
            }
            current = level.parent;
        }
        None
    }

    /// Number of levels between `scope` and the root (the root has depth 0).
    #[must_use]
    pub fn depth(&self, scope: ScopeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(scope);
        while let Some(id) = current {
            depth += 1;
            current = self.parent(id);
        }
        depth
    }
}
