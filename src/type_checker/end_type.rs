//! End types.
//!
//! The end type of a node is the type name its value has once every name,
//! call and member access in it is resolved, normalized to the root of the
//! class hierarchy so that derived and base classes compare equal.

use crate::{
    ast::{
        ast::{Node, NodeKind},
        types::BuiltInType,
    },
    resolver::resolver::resolve_member,
    symbols::{
        scope::ScopeTree,
        symbol::{BuiltInKind, SymbolKind},
    },
};

/// End type of `null`; compatible with every class type.
pub const NULL_TYPE: &str = "null";

/// Declared type name of `node` before root normalization, or `None` when it cannot be resolved.
fn declared_end_type(tree: &ScopeTree, node: &Node) -> Option<String> {
    let scope = node.scope.unwrap_or_else(|| tree.root());

    match node.kind {
        NodeKind::Id | NodeKind::ArrayItem => tree
            .resolve(scope, node.value())
            .map(|symbol| tree.symbol(symbol).declared_type.clone()),
        NodeKind::This => tree
            .enclosing_class(scope)
            .map(|class| tree.symbol(class).name.clone()),
        NodeKind::Int | NodeKind::Bool | NodeKind::Char | NodeKind::Void => {
            BuiltInType::from_kind(node.kind).map(|builtin| builtin.name().to_string())
        }
        NodeKind::Null => Some(String::from(NULL_TYPE)),
        NodeKind::ClassType => Some(node.value().to_string()),
        NodeKind::FnCall => {
            let callee = tree.follow_references(tree.resolve(scope, node.value())?);
            let symbol = tree.symbol(callee);
            match symbol.kind {
                SymbolKind::BuiltIn(BuiltInKind::Function) => {
                    Some(BuiltInType::Void.name().to_string())
                }
                SymbolKind::Class { .. } | SymbolKind::Function { .. } => {
                    Some(symbol.declared_type.clone())
                }
                _ => None,
            }
        }
        NodeKind::ObjUsage => resolve_member(tree, node)
            .ok()
            .map(|member| tree.symbol(member).declared_type.clone()),
        kind if kind.is_arithmetic() => Some(BuiltInType::Int.name().to_string()),
        kind if kind.is_comparison() || kind.is_logical() => {
            Some(BuiltInType::Bool.name().to_string())
        }
        NodeKind::DecInc => node
            .children
            .iter()
            .find(|child| !matches!(child.kind, NodeKind::Inc | NodeKind::Dec))
            .and_then(|target| declared_end_type(tree, target)),
        NodeKind::Assign => declared_end_type(tree, node.first()?),
        // Declarations report their declared type, so references are checked structurally
        NodeKind::VarDecl
        | NodeKind::VarRef
        | NodeKind::ArrayDecl
        | NodeKind::ArrayInit
        | NodeKind::ArrayRef
        | NodeKind::Param => node.type_node().map(Node::type_name),
        _ => None,
    }
}

/// The root-normalized end type of `node`.
pub fn end_type(tree: &ScopeTree, node: &Node) -> Option<String> {
    let scope = node.scope.unwrap_or_else(|| tree.root());
    declared_end_type(tree, node).map(|type_name| tree.root_type(scope, &type_name))
}

/// Root-normalizes a type name written in a declaration.
pub fn normalize(tree: &ScopeTree, node: &Node, type_name: &str) -> String {
    tree.root_type(node.scope.unwrap_or_else(|| tree.root()), type_name)
}
