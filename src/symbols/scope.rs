//! The scope arena.
//!
//! A `ScopeTree` owns every scope and every symbol created by pass 1. Scopes
//! form a tree through `parent`/`children` links; lookups walk outward from
//! a scope to the root. Passes 2 and 3 only read the tree.

use std::collections::{HashMap, HashSet};

use crate::{
    ast::types::{BuiltInFunction, BuiltInType},
    errors::errors::ErrorImpl,
};

use super::symbol::{FunctionRole, Symbol, SymbolId, SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// The class or function this scope belongs to, if any.
    pub owner: Option<SymbolId>,
    symbols: HashMap<String, SymbolId>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>, owner: Option<SymbolId>) -> Self {
        Scope {
            id,
            parent,
            children: vec![],
            owner,
            symbols: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        ScopeTree::new()
    }
}

impl ScopeTree {
    /// Creates the tree with its root scope and the built-ins bound in it.
    pub fn new() -> Self {
        let mut tree = ScopeTree {
            scopes: vec![Scope::new(ScopeId(0), None, None)],
            symbols: vec![],
        };

        let root = tree.root();
        for builtin in BuiltInType::ALL {
            tree.insert(root, Symbol::builtin_type(builtin.name()));
        }
        for function in BuiltInFunction::ALL {
            tree.insert(root, Symbol::builtin_function(function.name()));
        }

        tree
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    /// Opens a child scope of `parent`.
    pub fn push_scope(&mut self, parent: ScopeId, owner: Option<SymbolId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(id, Some(parent), owner));
        self.scopes[parent.0].children.push(id);
        tracing::trace!(scope = id.0, parent = parent.0, "scope opened");
        id
    }

    pub fn set_owner(&mut self, scope: ScopeId, owner: SymbolId) {
        self.scopes[scope.0].owner = Some(owner);
    }

    fn insert(&mut self, scope: ScopeId, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.scopes[scope.0].symbols.insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        id
    }

    /// Binds `symbol` in `scope`. Names are unique per scope; outer bindings may be shadowed.
    pub fn bind(&mut self, scope: ScopeId, symbol: Symbol) -> Result<SymbolId, ErrorImpl> {
        if self.lookup_local(scope, &symbol.name).is_some() {
            return Err(ErrorImpl::AlreadyDeclared { name: symbol.name });
        }

        Ok(self.insert(scope, symbol))
    }

    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scope(scope).symbols.get(name).copied()
    }

    /// Sorted names bound directly in `scope`.
    pub fn names(&self, scope: ScopeId) -> Vec<&str> {
        let mut names = self
            .scope(scope)
            .symbols
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |current| self.scope(*current).parent)
    }

    /// Resolves `name` from `scope` outward. Class member scopes also see inherited members.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.ancestors(scope)
            .find_map(|current| match self.scope(current).owner {
                Some(owner) if self.symbol(owner).is_class() => self.lookup_member(owner, name),
                _ => self.lookup_local(current, name),
            })
    }

    /// The scope `resolve` finds `name` in.
    pub fn resolving_scope(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        self.ancestors(scope)
            .find(|current| match self.scope(*current).owner {
                Some(owner) if self.symbol(owner).is_class() => self.lookup_member(owner, name).is_some(),
                _ => self.lookup_local(*current, name).is_some(),
            })
    }

    /// Resolves `name` to a class, skipping non-class symbols that shadow it.
    pub fn resolve_class(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.ancestors(scope).find_map(|current| {
            self.lookup_local(current, name)
                .filter(|id| self.symbol(*id).is_class())
        })
    }

    pub fn is_builtin_type(&self, scope: ScopeId, name: &str) -> bool {
        self.resolve(scope, name)
            .is_some_and(|id| self.symbol(id).is_builtin_type())
    }

    /// Built-in (not `void`) or a resolvable class.
    pub fn is_valid_type(&self, scope: ScopeId, name: &str) -> bool {
        (name != BuiltInType::Void.name() && self.is_builtin_type(scope, name))
            || self.resolve_class(scope, name).is_some()
    }

    /// The class whose member scope encloses `scope`.
    pub fn enclosing_class(&self, scope: ScopeId) -> Option<SymbolId> {
        self.ancestors(scope).find_map(|current| {
            self.scope(current)
                .owner
                .filter(|owner| self.symbol(*owner).is_class())
        })
    }

    /// `class` followed by its superclasses, nearest first.
    ///
    /// Stops at the first repeated class so a cyclic hierarchy cannot loop.
    pub fn class_chain(&self, class: SymbolId) -> Vec<SymbolId> {
        let mut chain = vec![];
        let mut visited = HashSet::new();
        let mut current = Some(class);

        while let Some(id) = current {
            if !visited.insert(id) {
                tracing::warn!(class = %self.symbol(class).name, "cyclic class hierarchy");
                break;
            }
            chain.push(id);
            current = self.symbol(id).superclass();
        }

        chain
    }

    /// The ultimate base class of `type_name`, or `type_name` itself when it is not a class.
    pub fn root_type(&self, scope: ScopeId, type_name: &str) -> String {
        match self.resolve_class(scope, type_name) {
            Some(class) => self
                .class_chain(class)
                .last()
                .map(|root| self.symbol(*root).name.clone())
                .unwrap_or_else(|| type_name.to_string()),
            None => type_name.to_string(),
        }
    }

    /// Looks `name` up in the member scope of `class` and then its superclasses.
    pub fn lookup_member(&self, class: SymbolId, name: &str) -> Option<SymbolId> {
        self.class_chain(class).into_iter().find_map(|id| {
            self.symbol(id)
                .class_scope()
                .and_then(|scope| self.lookup_local(scope, name))
        })
    }

    /// The special member of `class` with the given role, without looking at superclasses.
    pub fn special_member(&self, class: SymbolId, role: FunctionRole) -> Option<SymbolId> {
        let symbol = self.symbol(class);
        let key = role.member_key(&symbol.name)?;
        self.lookup_local(symbol.class_scope()?, &key)
    }

    /// Follows reference links to the symbol that owns the storage.
    pub fn follow_references(&self, symbol: SymbolId) -> SymbolId {
        let mut visited = HashSet::new();
        let mut current = symbol;

        while let SymbolKind::Reference { origin: Some(origin) } = self.symbol(current).kind {
            if !visited.insert(current) {
                break;
            }
            current = origin;
        }

        current
    }
}
