use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, ErrorImpl},
    output::Output,
    symbols::{
        scope::{ScopeId, ScopeTree},
        symbol::{FunctionRole, Parameter, Symbol, SymbolId, SymbolValue},
    },
};

use super::{
    const_eval::ConstEvaluator,
    synthesis::{synthesize_missing_members, BaseClass},
};

/// Runs pass 1 over `program`: creates every scope, binds every declaration
/// and completes classes with their missing special members.
///
/// Each node gets the scope active at it; scope-opening nodes get the scope they open.
///
/// # Arguments
///
/// * `program` - Parsed program, annotated with scopes and completed in place
/// * `out` - Receives pass 1 diagnostics
///
/// # Returns
///
/// The finished scope tree that the later passes read.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_scopes(program: &mut Node, out: &mut Output) -> ScopeTree {
    let mut builder = ScopeBuilder {
        tree: ScopeTree::new(),
        out,
        unresolved_reads: vec![],
    };

    let root = builder.tree.root();
    builder.visit(program, root);
    builder.check_early_reads();

    tracing::debug!(scopes = builder.tree.scope_count(), "scopes built");
    builder.tree
}

struct ScopeBuilder<'o> {
    tree: ScopeTree,
    out: &'o mut Output,
    /// Names read before anything visible was bound to them, with the scope of the read.
    unresolved_reads: Vec<(ScopeId, String)>,
}

fn parameters(node: &Node) -> Vec<Parameter> {
    node.params()
        .iter()
        .map(|param| {
            let type_node = param.type_node();
            Parameter {
                name: param.value().to_string(),
                type_name: type_node.map(Node::type_name).unwrap_or_default(),
                is_reference: type_node.is_some_and(Node::is_reference),
            }
        })
        .collect()
}

fn declared_type(node: &Node) -> String {
    node.type_node().map(Node::type_name).unwrap_or_default()
}

impl<'o> ScopeBuilder<'o> {
    fn report(&mut self, error: ErrorImpl) {
        self.out.report(&Error::semantic(error));
    }

    fn bind(&mut self, scope: ScopeId, symbol: Symbol) -> Option<SymbolId> {
        match self.tree.bind(scope, symbol) {
            Ok(id) => Some(id),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    /// Reports unknown types; `void` is accepted only where `allow_void` is set.
    fn check_type(&mut self, scope: ScopeId, type_name: &str, allow_void: bool) {
        let known = self.tree.is_valid_type(scope, type_name)
            || (allow_void && self.tree.is_builtin_type(scope, type_name));

        if !known {
            self.report(ErrorImpl::UnknownType {
                type_: type_name.to_string(),
            });
        }
    }

    fn visit_children(&mut self, node: &mut Node, scope: ScopeId) {
        for child in node.children.iter_mut() {
            self.visit(child, scope);
        }
    }

    fn visit(&mut self, node: &mut Node, scope: ScopeId) {
        match node.kind {
            NodeKind::Program => {
                node.scope = Some(scope);
                self.visit_children(node, scope);
            }
            NodeKind::VarDecl => self.declare_variable(node, scope),
            NodeKind::VarRef => self.declare_reference(node, scope),
            NodeKind::ArrayDecl | NodeKind::ArrayInit => self.declare_array(node, scope),
            NodeKind::ArrayRef => self.declare_array_reference(node, scope),
            NodeKind::FnDecl => self.declare_function(node, scope, FunctionRole::Function),
            NodeKind::AbstractFn => self.declare_abstract(node, scope),
            NodeKind::Class => self.declare_class(node, scope),
            NodeKind::Block => {
                let block = self.tree.push_scope(scope, None);
                node.scope = Some(block);
                self.visit_children(node, block);
            }
            NodeKind::Id | NodeKind::ArrayItem => {
                node.scope = Some(scope);
                self.note_read(node.value(), scope);
                self.visit_children(node, scope);
            }
            NodeKind::ObjUsage => {
                node.scope = Some(scope);
                if let Some((object, members)) = node.children.split_first_mut() {
                    self.visit(object, scope);
                    for member in members {
                        self.visit_member(member, scope);
                    }
                }
            }
            _ => {
                node.scope = Some(scope);
                self.visit_children(node, scope);
            }
        }
    }

    /// Member names after `.` are looked up in the object's class, not in `scope`.
    fn visit_member(&mut self, member: &mut Node, scope: ScopeId) {
        match member.kind {
            NodeKind::Id | NodeKind::ArrayItem => {
                member.scope = Some(scope);
                self.visit_children(member, scope);
            }
            _ => self.visit(member, scope),
        }
    }

    fn note_read(&mut self, name: &str, scope: ScopeId) {
        if self.tree.resolve(scope, name).is_none() {
            self.unresolved_reads.push((scope, name.to_string()));
        }
    }

    /// A read that only resolves once the tree is complete, to a variable of a
    /// function or block, happened before that variable was declared.
    fn check_early_reads(&mut self) {
        for (scope, name) in std::mem::take(&mut self.unresolved_reads) {
            let Some(found_in) = self.tree.resolving_scope(scope, &name) else {
                continue;
            };
            let in_class = matches!(
                self.tree.scope(found_in).owner,
                Some(owner) if self.tree.symbol(owner).is_class()
            );
            let is_local = found_in != self.tree.root() && !in_class;

            if is_local {
                self.report(ErrorImpl::UsedBeforeDeclaration { name });
            }
        }
    }

    fn declare_variable(&mut self, node: &mut Node, scope: ScopeId) {
        node.scope = Some(scope);
        self.visit_children(node, scope);

        let type_name = declared_type(node);
        self.check_type(scope, &type_name, false);

        let value = node
            .child(1)
            .filter(|init| init.is_literal())
            .and_then(SymbolValue::from_literal);

        self.bind(
            scope,
            Symbol::variable(node.value(), type_name).with_value(value),
        );
    }

    /// Resolves the storage a reference aliases, if it is already declared.
    fn reference_origin(&mut self, name: &str, origin: Option<&Node>, scope: ScopeId) -> Option<SymbolId> {
        let origin = origin?;

        if !origin.is_lvalue() {
            self.report(ErrorImpl::ReferenceToValue {
                name: name.to_string(),
            });
            return None;
        }

        match origin.kind {
            NodeKind::Id | NodeKind::ArrayItem => self.tree.resolve(scope, origin.value()),
            _ => None,
        }
    }

    fn declare_reference(&mut self, node: &mut Node, scope: ScopeId) {
        node.scope = Some(scope);
        self.visit_children(node, scope);

        let type_name = declared_type(node);
        self.check_type(scope, &type_name, false);

        let origin = self.reference_origin(node.value(), node.child(1), scope);
        self.bind(scope, Symbol::reference(node.value(), type_name, origin));
    }

    fn fold_dims(&self, node: &Node, scope: ScopeId) -> Vec<Option<usize>> {
        let evaluator = ConstEvaluator::new(&self.tree, scope);
        node.dims().iter().map(|dim| evaluator.eval_size(dim)).collect()
    }

    fn declare_array(&mut self, node: &mut Node, scope: ScopeId) {
        node.scope = Some(scope);
        self.visit_children(node, scope);

        let element_type = declared_type(node);
        self.check_type(scope, &element_type, false);

        let mut dimensions = self.fold_dims(node, scope);

        if let Some(literal) = node.find(NodeKind::Array) {
            let shape = literal.literal_shape();

            if dimensions.is_empty() {
                dimensions = shape.into_iter().map(Some).collect();
            } else if dimensions.len() != shape.len() {
                self.report(ErrorImpl::DimensionMismatch {
                    array: node.value().to_string(),
                    declared: dimensions.len(),
                    initialised: shape.len(),
                });
            } else {
                for (dimension, size) in dimensions.iter_mut().zip(shape) {
                    dimension.get_or_insert(size);
                }
            }
        }

        self.bind(scope, Symbol::array(node.value(), element_type, dimensions));
    }

    fn declare_array_reference(&mut self, node: &mut Node, scope: ScopeId) {
        node.scope = Some(scope);
        self.visit_children(node, scope);

        let element_type = declared_type(node);
        self.check_type(scope, &element_type, false);

        let origin = self.reference_origin(node.value(), node.last(), scope);
        self.bind(scope, Symbol::reference(node.value(), element_type, origin));
    }

    /// Binds a function, or completes the prototype it defines.
    fn bind_function(&mut self, scope: ScopeId, symbol: Symbol) -> Option<SymbolId> {
        let defined = symbol.is_defined();

        if let Some(existing) = self.tree.lookup_local(scope, &symbol.name) {
            let previous = self.tree.symbol(existing);
            let is_prototype = previous.role() == symbol.role() && !previous.is_defined();

            if is_prototype && defined && previous.param_count() == symbol.param_count() {
                tracing::trace!(function = %symbol.name, "prototype defined");
                *self.tree.symbol_mut(existing) = symbol;
                return Some(existing);
            }
        }

        self.bind(scope, symbol)
    }

    /// Opens the parameter scope of a function-like node and walks its children.
    fn open_function(&mut self, node: &mut Node, scope: ScopeId, owner: Option<SymbolId>) {
        let function_scope = self.tree.push_scope(scope, owner);
        node.scope = Some(function_scope);

        for param in parameters(node) {
            let symbol = if param.is_reference {
                Symbol::reference(param.name, param.type_name, None)
            } else {
                Symbol::variable(param.name, param.type_name)
            };
            self.bind(function_scope, symbol);
        }

        self.visit_children(node, function_scope);
    }

    fn declare_function(&mut self, node: &mut Node, scope: ScopeId, role: FunctionRole) {
        let return_type = declared_type(node);
        self.check_type(scope, &return_type, true);

        let symbol = Symbol::function(
            node.value(),
            return_type,
            parameters(node),
            role,
            node.body().is_some(),
        );
        let owner = self.bind_function(scope, symbol);

        self.open_function(node, scope, owner);
    }

    fn declare_abstract(&mut self, node: &mut Node, scope: ScopeId) {
        node.scope = Some(scope);
        self.visit_children(node, scope);

        let marker = node.last().map(Node::value).unwrap_or_default();
        if marker != "0" {
            self.report(ErrorImpl::InvalidAbstractMarker {
                function: node.value().to_string(),
                marker: marker.to_string(),
            });
        }

        let return_type = declared_type(node);
        self.check_type(scope, &return_type, true);

        let symbol = Symbol::function(
            node.value(),
            return_type,
            parameters(node),
            FunctionRole::Abstract,
            false,
        );
        self.bind(scope, symbol);
    }

    fn declare_class(&mut self, node: &mut Node, scope: ScopeId) {
        let name = node.value().to_string();

        // Resolved before the class is bound, so a class cannot extend itself
        let superclass = node.find(NodeKind::Extends).and_then(|extends| {
            let found = self.tree.resolve_class(scope, extends.value());
            if found.is_none() {
                self.report(ErrorImpl::UnknownType {
                    type_: extends.value().to_string(),
                });
            }
            found
        });

        let members = self.tree.push_scope(scope, None);
        node.scope = Some(members);

        let class = self.bind(scope, Symbol::class(&name, members, superclass));
        if let Some(class) = class {
            self.tree.set_owner(members, class);
        }

        let base_name = superclass.map(|id| self.tree.symbol(id).name.clone());
        let base = base_name.as_deref().map(|base_name| BaseClass {
            name: base_name,
            constructor_arity: superclass
                .and_then(|id| self.tree.special_member(id, FunctionRole::Constructor))
                .and_then(|ctor| self.tree.symbol(ctor).param_count()),
        });
        synthesize_missing_members(node, base.as_ref());

        for member in node.children.iter_mut() {
            match member.kind {
                NodeKind::FnDecl => self.declare_function(member, members, FunctionRole::Method),
                kind if FunctionRole::from_kind(kind).is_some() => {
                    self.declare_special_member(member, members, &name, base.as_ref())
                }
                _ => {
                    if let Some(class) = class {
                        self.check_complete(member, members, class);
                    }
                    self.visit(member, members)
                }
            }
        }
    }

    /// An attribute cannot hold an object of the enclosing class's hierarchy by value.
    fn check_complete(&mut self, member: &Node, members: ScopeId, class: SymbolId) {
        if !matches!(
            member.kind,
            NodeKind::VarDecl | NodeKind::ArrayDecl | NodeKind::ArrayInit
        ) {
            return;
        }

        let Some(type_node) = member
            .type_node()
            .filter(|type_node| type_node.kind == NodeKind::ClassType)
        else {
            return;
        };

        let contains = self
            .tree
            .resolve_class(members, type_node.value())
            .is_some_and(|attribute_class| self.tree.class_chain(attribute_class).contains(&class));

        if contains {
            self.report(ErrorImpl::IncompleteType {
                attribute: member.value().to_string(),
                type_: type_node.value().to_string(),
            });
        }
    }

    fn declare_special_member(
        &mut self,
        node: &mut Node,
        scope: ScopeId,
        class: &str,
        base: Option<&BaseClass>,
    ) {
        let Some(role) = FunctionRole::from_kind(node.kind) else {
            return;
        };

        match role {
            FunctionRole::Constructor | FunctionRole::CopyConstructor if node.value() != class => {
                self.report(ErrorImpl::ConstructorNameMismatch {
                    name: node.value().to_string(),
                    class: class.to_string(),
                })
            }
            FunctionRole::Destructor if node.value() != class => {
                self.report(ErrorImpl::DestructorNameMismatch {
                    name: node.value().to_string(),
                    class: class.to_string(),
                })
            }
            _ => {}
        }

        let params = parameters(node);

        if matches!(role, FunctionRole::CopyConstructor | FunctionRole::AssignOperator) {
            let takes_class_reference = matches!(
                params.as_slice(),
                [param] if param.type_name == class && param.is_reference
            );
            if !takes_class_reference {
                self.report(ErrorImpl::SpecialMemberSignature {
                    member: role.describe().to_string(),
                    class: class.to_string(),
                });
            }
        }

        match (node.find(NodeKind::BaseInit), base) {
            (Some(base_init), Some(base)) if base_init.value() != base.name => {
                self.report(ErrorImpl::NotASuperclass {
                    name: base_init.value().to_string(),
                    class: class.to_string(),
                })
            }
            (Some(base_init), None) => self.report(ErrorImpl::NotASuperclass {
                name: base_init.value().to_string(),
                class: class.to_string(),
            }),
            (None, Some(base))
                if role == FunctionRole::Constructor && base.constructor_arity.unwrap_or(0) > 0 =>
            {
                self.report(ErrorImpl::MissingBaseConstructor {
                    class: class.to_string(),
                    superclass: base.name.to_string(),
                })
            }
            _ => {}
        }

        let return_type = match role {
            FunctionRole::Destructor => String::from("void"),
            FunctionRole::AssignOperator => {
                let return_type = declared_type(node);
                self.check_type(scope, &return_type, true);
                return_type
            }
            _ => class.to_string(),
        };

        let owner = role.member_key(class).and_then(|key| {
            self.bind(scope, Symbol::function(key, return_type, params, role, true))
        });

        self.open_function(node, scope, owner);
    }
}

