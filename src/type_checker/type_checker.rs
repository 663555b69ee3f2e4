use std::collections::HashSet;

use crate::{
    ast::{
        ast::{Node, NodeKind},
        types::{is_value_type, BuiltInFunction, BuiltInType},
    },
    errors::errors::{Error, ErrorImpl},
    output::Output,
    resolver::resolver::resolve_member,
    symbols::{
        scope::{ScopeId, ScopeTree},
        symbol::{FunctionRole, Parameter, SymbolId, SymbolKind},
    },
};

use super::end_type::{end_type, normalize, NULL_TYPE};

/// Runs pass 3 over `program`: computes end types and reports incompatible combinations.
///
/// # Arguments
///
/// * `program` - Program annotated by `build_scopes`
/// * `tree` - Scope tree produced by `build_scopes`
/// * `out` - Receives pass 3 diagnostics
#[tracing::instrument(level = "debug", skip_all)]
pub fn type_check(program: &Node, tree: &ScopeTree, out: &mut Output) {
    let mut checker = TypeChecker {
        tree,
        out,
        visited: HashSet::new(),
    };

    checker.visit(program);
}

/// `received` may be stored where `expected` is declared.
fn compatible(expected: &str, received: &str) -> bool {
    expected == received || (received == NULL_TYPE && !is_value_type(expected))
}

/// The first `return` along every branch of `node`.
fn first_returns<'n>(node: &'n Node, found: &mut Vec<&'n Node>) {
    match node.kind {
        NodeKind::Return => found.push(node),
        NodeKind::Block => {
            for child in node.children.iter() {
                first_returns(child, found);
                if child.kind == NodeKind::Return {
                    break;
                }
            }
        }
        NodeKind::If | NodeKind::While => {
            for child in node.children.iter().filter(|child| child.kind == NodeKind::Block) {
                first_returns(child, found);
            }
        }
        _ => {}
    }
}

struct TypeChecker<'a, 'o> {
    tree: &'a ScopeTree,
    out: &'o mut Output,
    visited: HashSet<ScopeId>,
}

impl<'a, 'o> TypeChecker<'a, 'o> {
    fn report(&mut self, error: ErrorImpl) {
        self.out.report(&Error::semantic(error));
    }

    fn scope(&self, node: &Node) -> ScopeId {
        node.scope.unwrap_or_else(|| self.tree.root())
    }

    fn end_type(&self, node: &Node) -> Option<String> {
        end_type(self.tree, node)
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
            NodeKind::VarDecl | NodeKind::VarRef => self.check_declaration(node),
            NodeKind::ArrayDecl | NodeKind::ArrayInit | NodeKind::ArrayRef => self.check_array(node),
            NodeKind::Assign => self.check_assignment(node),
            NodeKind::DecInc => {
                if let Some(target) = node
                    .children
                    .iter()
                    .find(|child| !matches!(child.kind, NodeKind::Inc | NodeKind::Dec))
                {
                    self.check_operand(NodeKind::DecInc.operation(), target);
                }
            }
            NodeKind::Not => {
                if let Some(operand) = node.first() {
                    self.check_operand(node.kind.operation(), operand);
                }
            }
            kind if kind.is_arithmetic() || kind.is_comparison() || kind.is_logical() => {
                for operand in node.children.iter() {
                    self.check_operand(kind.operation(), operand);
                }
            }
            NodeKind::If | NodeKind::While => {
                for condition in node.children.iter().filter(|child| child.kind != NodeKind::Block) {
                    self.check_operand("condition", condition);
                }
            }
            NodeKind::FnCall => self.check_call(node),
            NodeKind::ObjUsage => {
                // The member is looked up in the object's class, never as a free name
                self.check_method_call(node);
                if let Some(object) = node.first() {
                    self.visit(object);
                }
                if let Some(member) = node.child(1) {
                    self.visit_children(member);
                }
                return;
            }
            NodeKind::BaseInit => self.check_base_init(node),
            kind if kind.is_function_like() => self.check_function(node),
            _ => {}
        }

        self.visit_children(node);
    }

    /// Operands must be `int`, `bool` or `char`.
    fn check_operand(&mut self, operation: &str, operand: &Node) {
        if let Some(type_) = self.end_type(operand) {
            if !is_value_type(&type_) {
                self.report(ErrorImpl::InvalidOperand {
                    operation: operation.to_string(),
                    type_,
                });
            }
        }
    }

    fn check_declaration(&mut self, node: &Node) {
        let Some(init) = node.child(1) else {
            return;
        };

        if let (Some(expected), Some(received)) = (self.end_type(node), self.end_type(init)) {
            if !compatible(&expected, &received) {
                self.report(ErrorImpl::DeclarationTypeMismatch {
                    name: node.value().to_string(),
                    expected,
                    received,
                });
            }
        }
    }

    fn check_array(&mut self, node: &Node) {
        for dim in node.dims() {
            if let Some(type_) = self.end_type(dim) {
                if !is_value_type(&type_) {
                    self.report(ErrorImpl::InvalidArrayLength { type_ });
                }
            }
        }

        let Some(element_type) = self.end_type(node) else {
            return;
        };

        match node.kind {
            NodeKind::ArrayInit => {
                if let Some(literal) = node.find(NodeKind::Array) {
                    self.check_elements(node.value(), &element_type, literal);
                }
            }
            NodeKind::ArrayRef => {
                let Some(origin) = node.last() else {
                    return;
                };
                if let Some(received) = self.end_type(origin) {
                    if received != element_type {
                        self.report(ErrorImpl::DeclarationTypeMismatch {
                            name: node.value().to_string(),
                            expected: element_type,
                            received,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    fn check_elements(&mut self, array: &str, expected: &str, literal: &Node) {
        for element in literal.children.iter() {
            if element.kind == NodeKind::Array {
                self.check_elements(array, expected, element);
                continue;
            }

            if let Some(received) = self.end_type(element) {
                if received != expected {
                    self.report(ErrorImpl::ArrayElementMismatch {
                        array: array.to_string(),
                        expected: expected.to_string(),
                        received,
                    });
                }
            }
        }
    }

    /// `=` needs equal types or two built-ins; compound assignment needs two built-ins.
    fn check_assignment(&mut self, node: &Node) {
        let (Some(target), Some(value)) = (node.child(0), node.child(1)) else {
            return;
        };
        let (Some(expected), Some(received)) = (self.end_type(target), self.end_type(value)) else {
            return;
        };

        let both_builtin = is_value_type(&expected) && is_value_type(&received);
        let valid = if node.value() == "=" {
            both_builtin || compatible(&expected, &received)
        } else {
            both_builtin
        };

        if !valid {
            self.report(ErrorImpl::AssignmentTypeMismatch { expected, received });
        }
    }

    /// Arguments against parameters: equal root types, or two built-ins; reference parameters need lvalues.
    fn check_arguments(&mut self, function: &str, params: &[Parameter], args: &[Node], scope: ScopeId) {
        // The count itself is a pass 2 diagnostic; the arguments present are still checked
        if params.len() != args.len() {
            tracing::trace!(function, expected = params.len(), received = args.len(), "argument count differs");
        }

        for (param, arg) in params.iter().zip(args) {
            let expected = self.tree.root_type(scope, &param.type_name);

            if let Some(received) = self.end_type(arg) {
                let both_builtin = is_value_type(&expected) && is_value_type(&received);
                if !both_builtin && !compatible(&expected, &received) {
                    self.report(ErrorImpl::ArgumentTypeMismatch {
                        function: function.to_string(),
                        expected,
                        received,
                    });
                    continue;
                }
            }

            if param.is_reference && !arg.is_lvalue() {
                self.report(ErrorImpl::ReferenceArgument {
                    function: function.to_string(),
                    parameter: param.name.clone(),
                });
            }
        }
    }

    fn check_callee(&mut self, name: &str, callee: SymbolId, args: &[Node], scope: ScopeId) {
        let tree = self.tree;
        let callee = tree.follow_references(callee);
        let symbol = tree.symbol(callee);

        match &symbol.kind {
            SymbolKind::Class { .. } => {
                // A single argument of the same class hierarchy selects the copy constructor
                let class_type = tree.root_type(scope, &symbol.name);
                let copies = args.len() == 1
                    && args.first().and_then(|arg| self.end_type(arg)) == Some(class_type);
                let role = if copies {
                    FunctionRole::CopyConstructor
                } else {
                    FunctionRole::Constructor
                };

                if let Some(params) = tree
                    .special_member(callee, role)
                    .and_then(|constructor| tree.symbol(constructor).params())
                {
                    self.check_arguments(name, params, args, scope);
                }
            }
            SymbolKind::Function { params, .. } => self.check_arguments(name, params, args, scope),
            _ if symbol.is_builtin_function() => {
                let expected = BuiltInFunction::from_name(name)
                    .map(|function| function.parameter())
                    .unwrap_or(BuiltInType::Int);
                for arg in args {
                    self.check_builtin_argument(name, expected, arg);
                }
            }
            _ => {}
        }
    }

    /// Print functions accept any value type and convert it.
    fn check_builtin_argument(&mut self, function: &str, expected: BuiltInType, arg: &Node) {
        if let Some(received) = self.end_type(arg) {
            if !is_value_type(&received) {
                self.report(ErrorImpl::ArgumentTypeMismatch {
                    function: function.to_string(),
                    expected: expected.name().to_string(),
                    received,
                });
            }
        }
    }

    fn check_call(&mut self, node: &Node) {
        let scope = self.scope(node);
        if let Some(callee) = self.tree.resolve(scope, node.value()) {
            self.check_callee(node.value(), callee, node.args(), scope);
        }
    }

    fn check_method_call(&mut self, node: &Node) {
        let Some(member) = node.child(1).filter(|member| member.kind == NodeKind::FnCall) else {
            return;
        };

        if let Ok(method) = resolve_member(self.tree, node) {
            self.check_callee(member.value(), method, member.args(), self.scope(member));
        }
    }

    fn check_base_init(&mut self, node: &Node) {
        let scope = self.scope(node);
        if let Some(class) = self.tree.resolve_class(scope, node.value()) {
            self.check_callee(node.value(), class, node.args(), scope);
        }
    }

    fn check_function(&mut self, node: &Node) {
        let scope = self.scope(node);
        let function = node.value();

        for param in node.params() {
            let type_name = param.type_node().map(Node::type_name).unwrap_or_default();
            if !self.tree.is_valid_type(scope, &type_name) {
                self.report(ErrorImpl::InvalidParameterType {
                    function: function.to_string(),
                    parameter: param.value().to_string(),
                    type_: type_name,
                });
            }
        }

        // Constructors and destructors return nothing; generated members are stand-ins
        if !matches!(node.kind, NodeKind::FnDecl | NodeKind::Operator) || node.is_synthesized() {
            return;
        }
        let Some(body) = node.body() else {
            return;
        };

        let expected = node
            .type_node()
            .map(|type_node| normalize(self.tree, node, &type_node.type_name()))
            .unwrap_or_default();
        let is_void = expected == BuiltInType::Void.name();

        let mut returns = vec![];
        first_returns(body, &mut returns);

        // `main` may fall off its end
        if returns.is_empty() && !is_void && function != "main" {
            self.report(ErrorImpl::MissingReturn {
                function: function.to_string(),
                expected: expected.clone(),
            });
        }

        for ret in returns {
            match ret.first() {
                Some(value) => {
                    let Some(received) = self.end_type(value) else {
                        continue;
                    };
                    if is_void || !compatible(&expected, &received) {
                        self.report(ErrorImpl::ReturnTypeMismatch {
                            function: function.to_string(),
                            expected: expected.clone(),
                            received,
                        });
                    }
                }
                None if !is_void => self.report(ErrorImpl::MissingReturn {
                    function: function.to_string(),
                    expected: expected.clone(),
                }),
                None => {}
            }
        }
    }
}
