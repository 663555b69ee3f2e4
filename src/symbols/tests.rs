//! Unit tests for the scope arena and symbols.

use crate::errors::errors::ErrorImpl;

use super::{
    scope::ScopeTree,
    symbol::{FunctionRole, Symbol, SymbolKind},
};

#[test]
fn test_builtins_are_bound_in_root() {
    let tree = ScopeTree::new();
    let root = tree.root();

    for name in ["int", "bool", "char", "void"] {
        let id = tree.resolve(root, name).unwrap();
        assert!(tree.symbol(id).is_builtin_type());
    }
    for name in ["print_int", "print_bool", "print_char"] {
        let id = tree.resolve(root, name).unwrap();
        assert!(tree.symbol(id).is_builtin_function());
        assert_eq!(tree.symbol(id).declared_type, "void");
    }
}

#[test]
fn test_redeclaration_in_same_scope() {
    let mut tree = ScopeTree::new();
    let root = tree.root();

    tree.bind(root, Symbol::variable("x", "int")).unwrap();
    let result = tree.bind(root, Symbol::variable("x", "bool"));

    assert_eq!(
        result,
        Err(ErrorImpl::AlreadyDeclared {
            name: String::from("x")
        })
    );
}

#[test]
fn test_shadowing_across_scopes() {
    let mut tree = ScopeTree::new();
    let root = tree.root();
    let outer = tree.bind(root, Symbol::variable("x", "int")).unwrap();

    let block = tree.push_scope(root, None);
    let inner = tree.bind(block, Symbol::variable("x", "char")).unwrap();

    assert_eq!(tree.resolve(block, "x"), Some(inner));
    assert_eq!(tree.resolve(root, "x"), Some(outer));
    assert_eq!(tree.scope(root).children, vec![block]);
    assert_eq!(tree.scope(block).parent, Some(root));
}

#[test]
fn test_resolve_class_skips_shadowing_symbols() {
    let mut tree = ScopeTree::new();
    let root = tree.root();
    let members = tree.push_scope(root, None);
    let class = tree.bind(root, Symbol::class("A", members, None)).unwrap();

    let inner = tree.push_scope(root, None);
    tree.bind(inner, Symbol::variable("A", "int")).unwrap();

    assert_eq!(tree.resolve_class(inner, "A"), Some(class));
    assert!(!tree.symbol(tree.resolve(inner, "A").unwrap()).is_class());
}

#[test]
fn test_root_type_walks_superclasses() {
    let mut tree = ScopeTree::new();
    let root = tree.root();

    let base_scope = tree.push_scope(root, None);
    let base = tree.bind(root, Symbol::class("Base", base_scope, None)).unwrap();
    let mid_scope = tree.push_scope(root, None);
    let mid = tree.bind(root, Symbol::class("Mid", mid_scope, Some(base))).unwrap();
    let leaf_scope = tree.push_scope(root, None);
    tree.bind(root, Symbol::class("Leaf", leaf_scope, Some(mid))).unwrap();

    assert_eq!(tree.root_type(root, "Leaf"), "Base");
    assert_eq!(tree.root_type(root, "Base"), "Base");
    assert_eq!(tree.root_type(root, "int"), "int");
}

#[test]
fn test_class_chain_stops_on_cycle() {
    let mut tree = ScopeTree::new();
    let root = tree.root();

    let a_scope = tree.push_scope(root, None);
    let a = tree.bind(root, Symbol::class("A", a_scope, None)).unwrap();
    let b_scope = tree.push_scope(root, None);
    let b = tree.bind(root, Symbol::class("B", b_scope, Some(a))).unwrap();

    if let SymbolKind::Class { superclass, .. } = &mut tree.symbol_mut(a).kind {
        *superclass = Some(b);
    }

    assert_eq!(tree.class_chain(b), vec![b, a]);
    assert_eq!(tree.root_type(root, "B"), "A");
}

#[test]
fn test_member_lookup_through_superclass() {
    let mut tree = ScopeTree::new();
    let root = tree.root();

    let base_scope = tree.push_scope(root, None);
    let base = tree.bind(root, Symbol::class("Base", base_scope, None)).unwrap();
    tree.set_owner(base_scope, base);
    let field = tree.bind(base_scope, Symbol::variable("x", "int")).unwrap();

    let derived_scope = tree.push_scope(root, None);
    let derived = tree
        .bind(root, Symbol::class("Derived", derived_scope, Some(base)))
        .unwrap();
    tree.set_owner(derived_scope, derived);

    assert_eq!(tree.lookup_member(derived, "x"), Some(field));
    assert_eq!(tree.lookup_member(derived, "y"), None);

    let method = tree.push_scope(derived_scope, None);
    assert_eq!(tree.enclosing_class(method), Some(derived));
}

#[test]
fn test_special_member_keys() {
    let mut tree = ScopeTree::new();
    let root = tree.root();
    let members = tree.push_scope(root, None);
    let class = tree.bind(root, Symbol::class("C", members, None)).unwrap();

    let key = FunctionRole::CopyConstructor.member_key("C").unwrap();
    assert_eq!(key, "C(C&)");
    let copy = tree
        .bind(
            members,
            Symbol::function(key, "void", vec![], FunctionRole::CopyConstructor, true),
        )
        .unwrap();

    assert_eq!(
        tree.special_member(class, FunctionRole::CopyConstructor),
        Some(copy)
    );
    assert_eq!(tree.special_member(class, FunctionRole::Destructor), None);
    assert_eq!(FunctionRole::Method.member_key("C"), None);
}

#[test]
fn test_follow_references() {
    let mut tree = ScopeTree::new();
    let root = tree.root();
    let origin = tree
        .bind(root, Symbol::array("a", "int", vec![Some(3)]))
        .unwrap();
    let first = tree
        .bind(root, Symbol::reference("r", "int", Some(origin)))
        .unwrap();
    let second = tree
        .bind(root, Symbol::reference("s", "int", Some(first)))
        .unwrap();

    assert_eq!(tree.follow_references(second), origin);
    assert_eq!(tree.symbol(origin).dimensions(), Some(&[Some(3)][..]));
}
