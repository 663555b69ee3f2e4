use crate::symbols::scope::ScopeId;

use super::types::BuiltInType;

/// Node Kinds
///
/// The closed set of tree shapes. Which children each kind carries is
/// fixed by the parser and relied upon by every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,

    // Declarations
    VarDecl,
    VarRef,
    ArrayDecl,
    ArrayInit,
    ArrayRef,
    FnDecl,
    AbstractFn,
    Params,
    Param,
    Dims,

    // Classes
    Class,
    Extends,
    Constructor,
    CopyConstructor,
    Destructor,
    Operator,
    BaseInit,

    // Statements
    Block,
    If,
    While,
    Return,
    Assign,
    DecInc,
    Inc,
    Dec,

    // Expressions
    FnCall,
    Args,
    ObjUsage,
    This,
    ArrayItem,
    Array,
    Id,

    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Not,

    // Literals and type nodes
    Int,
    Bool,
    Char,
    Void,
    Null,
    ClassType,
    Ref,
}

impl NodeKind {
    pub fn is_builtin_type(self) -> bool {
        BuiltInType::from_kind(self).is_some()
    }

    pub fn is_type(self) -> bool {
        self.is_builtin_type() || self == NodeKind::ClassType
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            NodeKind::Add | NodeKind::Sub | NodeKind::Mul | NodeKind::Div | NodeKind::Mod
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            NodeKind::Equal
                | NodeKind::NotEqual
                | NodeKind::Less
                | NodeKind::LessEqual
                | NodeKind::Greater
                | NodeKind::GreaterEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, NodeKind::And | NodeKind::Or | NodeKind::Not)
    }

    /// Name of the operation family, as used in operand diagnostics.
    pub fn operation(self) -> &'static str {
        if self.is_arithmetic() {
            "calculation"
        } else if self.is_comparison() {
            "comparison"
        } else if self.is_logical() {
            "logical"
        } else if self == NodeKind::DecInc {
            "increment"
        } else {
            "unknown"
        }
    }

    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            NodeKind::FnDecl
                | NodeKind::Constructor
                | NodeKind::CopyConstructor
                | NodeKind::Destructor
                | NodeKind::Operator
        )
    }

    /// Kinds that open a scope during pass 1. Their `scope` is the scope they open.
    pub fn opens_scope(self) -> bool {
        self.is_function_like() || matches!(self, NodeKind::Program | NodeKind::Class | NodeKind::Block)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeOrigin {
    #[default]
    Source,
    Synthesized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub value: Option<String>,
    pub children: Vec<Node>,
    /// Set once by the scope builder, read by every later pass.
    pub scope: Option<ScopeId>,
    pub origin: NodeOrigin,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            value: None,
            children: vec![],
            scope: None,
            origin: NodeOrigin::Source,
        }
    }

    pub fn with_value(kind: NodeKind, value: impl Into<String>) -> Self {
        Node {
            value: Some(value.into()),
            ..Node::new(kind)
        }
    }

    /// Marks this node and all of its descendants as generated.
    pub fn synthesized(mut self) -> Self {
        self.origin = NodeOrigin::Synthesized;
        self.children = self
            .children
            .into_iter()
            .map(Node::synthesized)
            .collect();
        self
    }

    pub fn is_synthesized(&self) -> bool {
        self.origin == NodeOrigin::Synthesized
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// The node's value, or the empty string.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn first(&self) -> Option<&Node> {
        self.children.first()
    }

    pub fn last(&self) -> Option<&Node> {
        self.children.last()
    }

    pub fn find(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|child| child.kind == kind)
    }

    pub fn has_child(&self, kind: NodeKind) -> bool {
        self.find(kind).is_some()
    }

    /// For a type node: does it carry the `&` marker.
    pub fn is_reference(&self) -> bool {
        self.has_child(NodeKind::Ref)
    }

    /// The declared type node of a declaration, parameter or function.
    pub fn type_node(&self) -> Option<&Node> {
        self.children.iter().find(|child| child.kind.is_type())
    }

    /// The type name a type node spells: `int`, `bool`, `char`, `void` or the class name.
    pub fn type_name(&self) -> String {
        match BuiltInType::from_kind(self.kind) {
            Some(builtin) => builtin.name().to_string(),
            None => self.value().to_string(),
        }
    }

    /// The body of a function-like node.
    pub fn body(&self) -> Option<&Node> {
        self.find(NodeKind::Block)
    }

    pub fn params(&self) -> &[Node] {
        self.find(NodeKind::Params)
            .map(|params| params.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn args(&self) -> &[Node] {
        self.find(NodeKind::Args)
            .map(|args| args.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn dims(&self) -> &[Node] {
        self.find(NodeKind::Dims)
            .map(|dims| dims.children.as_slice())
            .unwrap_or(&[])
    }

    /// Nodes that name storage and may be assigned to or aliased.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Id | NodeKind::ArrayItem | NodeKind::ObjUsage | NodeKind::This
        )
    }

    /// Dimensions of an `Array` literal, read along its first elements.
    pub fn literal_shape(&self) -> Vec<usize> {
        let mut shape = vec![self.children.len()];
        if let Some(first) = self.first().filter(|first| first.kind == NodeKind::Array) {
            shape.extend(first.literal_shape());
        }
        shape
    }

    pub fn is_literal(&self) -> bool {
        match self.kind {
            NodeKind::Int | NodeKind::Bool | NodeKind::Char => self.value.is_some(),
            NodeKind::Null => true,
            _ => false,
        }
    }
}
