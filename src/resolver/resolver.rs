use std::collections::HashSet;

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, ErrorImpl},
    output::Output,
    symbols::{
        scope::{ScopeId, ScopeTree},
        symbol::{BuiltInKind, FunctionRole, SymbolId, SymbolKind},
    },
    type_checker::end_type::end_type,
};

/// Runs pass 2 over `program`: checks every name use against the complete
/// scope tree, including call arity and member access chains.
///
/// # Arguments
///
/// * `program` - Program annotated by `build_scopes`
/// * `tree` - Scope tree produced by `build_scopes`
/// * `out` - Receives pass 2 diagnostics
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve_references(program: &Node, tree: &ScopeTree, out: &mut Output) {
    let mut resolver = Resolver {
        tree,
        out,
        visited: HashSet::new(),
    };

    resolver.visit(program);

    tracing::debug!(scopes = resolver.visited.len(), "references resolved");
}

fn scope_of(tree: &ScopeTree, node: &Node) -> ScopeId {
    node.scope.unwrap_or_else(|| tree.root())
}

/// The class of the object an `ObjUsage` is applied to.
pub fn object_class(tree: &ScopeTree, object: &Node) -> Result<SymbolId, ErrorImpl> {
    let scope = scope_of(tree, object);

    let type_name = match object.kind {
        NodeKind::This => {
            return tree.enclosing_class(scope).ok_or(ErrorImpl::NotAnObject {
                name: String::from("this"),
            })
        }
        NodeKind::Id | NodeKind::ArrayItem => {
            let symbol = tree
                .resolve(scope, object.value())
                .ok_or_else(|| ErrorImpl::VariableNotDeclared {
                    name: object.value().to_string(),
                })?;
            tree.symbol(symbol).declared_type.clone()
        }
        NodeKind::ObjUsage => {
            let member = resolve_member(tree, object)?;
            tree.symbol(member).declared_type.clone()
        }
        NodeKind::FnCall => {
            let callee = tree
                .resolve(scope, object.value())
                .ok_or_else(|| ErrorImpl::FunctionNotDeclared {
                    function: object.value().to_string(),
                })?;
            tree.symbol(callee).declared_type.clone()
        }
        _ => String::new(),
    };

    tree.resolve_class(scope, &type_name)
        .ok_or_else(|| ErrorImpl::NotAnObject {
            name: match object.kind {
                NodeKind::ObjUsage => object
                    .child(1)
                    .map(Node::value)
                    .unwrap_or_default()
                    .to_string(),
                _ => object.value().to_string(),
            },
        })
}

/// Resolves the member an `ObjUsage` node names, walking nested chains left to right.
pub fn resolve_member(tree: &ScopeTree, node: &Node) -> Result<SymbolId, ErrorImpl> {
    let (Some(object), Some(member)) = (node.child(0), node.child(1)) else {
        return Err(ErrorImpl::NotAnObject {
            name: node.value().to_string(),
        });
    };

    let class = object_class(tree, object)?;

    tree.lookup_member(class, member.value())
        .ok_or_else(|| ErrorImpl::UnknownMember {
            member: member.value().to_string(),
            class: tree.symbol(class).name.clone(),
        })
}

struct Resolver<'a, 'o> {
    tree: &'a ScopeTree,
    out: &'o mut Output,
    visited: HashSet<ScopeId>,
}

impl<'a, 'o> Resolver<'a, 'o> {
    fn report(&mut self, error: ErrorImpl) {
        self.out.report(&Error::semantic(error));
    }

    fn scope(&self, node: &Node) -> ScopeId {
        scope_of(self.tree, node)
    }

    fn visit_children(&mut self, node: &Node) {
        for child in node.children.iter() {
            self.visit(child);
        }
    }

    fn visit(&mut self, node: &Node) {
        if node.kind.opens_scope() && !self.visited.insert(self.scope(node)) {
            return;
        }

        match node.kind {
            NodeKind::Id => self.check_variable(node),
            NodeKind::FnCall => {
                self.check_call(node);
                self.visit_children(node);
            }
            NodeKind::ObjUsage => {
                self.check_member_access(node);
            }
            NodeKind::ArrayItem => {
                self.check_array(node, node.value());
                self.visit_children(node);
            }
            NodeKind::ArrayRef => {
                for dim in node.dims() {
                    self.visit(dim);
                }
                if let Some(origin) = node.last() {
                    self.check_array(node, origin.value());
                }
            }
            NodeKind::VarDecl => {
                if node.child(1).is_none() {
                    self.check_default_construction(node);
                }
                self.visit_children(node);
            }
            NodeKind::BaseInit => {
                self.check_base_init(node);
                self.visit_children(node);
            }
            _ => self.visit_children(node),
        }
    }

    fn check_variable(&mut self, node: &Node) {
        if self.tree.resolve(self.scope(node), node.value()).is_none() {
            self.report(ErrorImpl::VariableNotDeclared {
                name: node.value().to_string(),
            });
        }
    }

    fn check_arity(&mut self, function: &str, expected: usize, received: usize) -> bool {
        if expected != received {
            self.report(ErrorImpl::ArgumentCountMismatch {
                function: function.to_string(),
                expected,
                received,
            });
            return false;
        }
        true
    }

    /// A single argument from the class's own hierarchy selects the copy constructor.
    fn is_copy(&self, class: SymbolId, args: &[Node]) -> bool {
        let tree = self.tree;
        let [arg] = args else {
            return false;
        };
        if tree.special_member(class, FunctionRole::CopyConstructor).is_none() {
            return false;
        }

        let root = tree
            .class_chain(class)
            .last()
            .map(|root| tree.symbol(*root).name.clone());
        root.is_some() && end_type(tree, arg) == root
    }

    /// Construction matches the copy constructor for a copy, the constructor otherwise.
    fn check_construction(&mut self, class: SymbolId, args: &[Node]) -> bool {
        if self.is_copy(class, args) {
            return true;
        }

        let tree = self.tree;
        let expected = tree
            .special_member(class, FunctionRole::Constructor)
            .and_then(|constructor| tree.symbol(constructor).param_count())
            .unwrap_or(0);

        self.check_arity(&tree.symbol(class).name, expected, args.len())
    }

    /// Checks arity of a call to `symbol`; returns false when the call cannot succeed.
    fn check_callee(&mut self, name: &str, symbol: SymbolId, args: &[Node]) -> bool {
        let tree = self.tree;
        let symbol = tree.follow_references(symbol);

        match &tree.symbol(symbol).kind {
            SymbolKind::Class { .. } => self.check_construction(symbol, args),
            SymbolKind::BuiltIn(BuiltInKind::Function) => self.check_arity(name, 1, args.len()),
            SymbolKind::Function { params, .. } => self.check_arity(name, params.len(), args.len()),
            _ => {
                self.report(ErrorImpl::NotAFunction {
                    name: name.to_string(),
                });
                false
            }
        }
    }

    fn check_call(&mut self, node: &Node) -> bool {
        let name = node.value();

        match self.tree.resolve(self.scope(node), name) {
            Some(symbol) => self.check_callee(name, symbol, node.args()),
            None => {
                self.report(ErrorImpl::FunctionNotDeclared {
                    function: name.to_string(),
                });
                false
            }
        }
    }

    /// Walks an access chain inside out; returns false once a link fails so each failure is reported once.
    fn check_member_access(&mut self, node: &Node) -> bool {
        let (Some(object), Some(member)) = (node.child(0), node.child(1)) else {
            return false;
        };

        let object_ok = match object.kind {
            NodeKind::ObjUsage => self.check_member_access(object),
            NodeKind::FnCall => {
                let ok = self.check_call(object);
                self.visit_children(object);
                ok
            }
            _ => {
                self.visit_children(object);
                true
            }
        };

        // Arguments and indices are ordinary expressions
        self.visit_children(member);

        if !object_ok {
            return false;
        }

        match resolve_member(self.tree, node) {
            Ok(symbol) if member.kind == NodeKind::FnCall => {
                self.check_callee(member.value(), symbol, member.args())
            }
            Ok(_) => true,
            Err(error) => {
                self.report(error);
                false
            }
        }
    }

    fn check_array(&mut self, node: &Node, name: &str) {
        let tree = self.tree;

        let Some(symbol) = tree.resolve(self.scope(node), name) else {
            self.report(ErrorImpl::VariableNotDeclared {
                name: name.to_string(),
            });
            return;
        };

        // Reference parameters alias storage only known at runtime
        let is_array = match &tree.symbol(tree.follow_references(symbol)).kind {
            SymbolKind::Array { .. } => true,
            SymbolKind::Reference { origin } => origin.is_none(),
            _ => false,
        };

        if !is_array {
            self.report(ErrorImpl::NotAnArray {
                name: name.to_string(),
            });
        }
    }

    fn check_default_construction(&mut self, node: &Node) {
        let Some(type_node) = node.type_node() else {
            return;
        };
        if type_node.kind != NodeKind::ClassType {
            return;
        }

        if let Some(class) = self.tree.resolve_class(self.scope(node), type_node.value()) {
            self.check_construction(class, &[]);
        }
    }

    fn check_base_init(&mut self, node: &Node) {
        if let Some(class) = self.tree.resolve_class(self.scope(node), node.value()) {
            self.check_construction(class, node.args());
        }
    }
}
