use crate::ast::ast::{Node, NodeKind};

use super::scope::ScopeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) usize);

/// Value recorded for a scalar declared with a literal initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolValue {
    Int(i32),
    Bool(bool),
    Char(char),
}

impl SymbolValue {
    pub fn from_literal(node: &Node) -> Option<Self> {
        match node.kind {
            NodeKind::Int => node.value().parse().ok().map(SymbolValue::Int),
            NodeKind::Bool => Some(SymbolValue::Bool(node.value() == "true")),
            NodeKind::Char => node.value().chars().next().map(SymbolValue::Char),
            _ => None,
        }
    }

    pub fn as_int(self) -> i32 {
        match self {
            SymbolValue::Int(value) => value,
            SymbolValue::Bool(value) => value as i32,
            SymbolValue::Char(value) => value as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionRole {
    Function,
    Method,
    Abstract,
    Constructor,
    CopyConstructor,
    Destructor,
    AssignOperator,
}

impl FunctionRole {
    /// The members every class ends up with after pass 1.
    pub const SPECIAL: [FunctionRole; 4] = [
        FunctionRole::Constructor,
        FunctionRole::CopyConstructor,
        FunctionRole::Destructor,
        FunctionRole::AssignOperator,
    ];

    pub fn from_kind(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Constructor => Some(FunctionRole::Constructor),
            NodeKind::CopyConstructor => Some(FunctionRole::CopyConstructor),
            NodeKind::Destructor => Some(FunctionRole::Destructor),
            NodeKind::Operator => Some(FunctionRole::AssignOperator),
            _ => None,
        }
    }

    pub fn kind(self) -> Option<NodeKind> {
        match self {
            FunctionRole::Constructor => Some(NodeKind::Constructor),
            FunctionRole::CopyConstructor => Some(NodeKind::CopyConstructor),
            FunctionRole::Destructor => Some(NodeKind::Destructor),
            FunctionRole::AssignOperator => Some(NodeKind::Operator),
            _ => None,
        }
    }

    pub fn is_special(self) -> bool {
        self.kind().is_some()
    }

    /// Name a special member is bound under in its class scope.
    ///
    /// The keys are not valid identifiers, so they never collide with user members.
    pub fn member_key(self, class: &str) -> Option<String> {
        match self {
            FunctionRole::Constructor => Some(format!("{}()", class)),
            FunctionRole::CopyConstructor => Some(format!("{}({}&)", class, class)),
            FunctionRole::Destructor => Some(format!("~{}", class)),
            FunctionRole::AssignOperator => Some(String::from("operator=")),
            _ => None,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            FunctionRole::Function => "function",
            FunctionRole::Method => "method",
            FunctionRole::Abstract => "abstract method",
            FunctionRole::Constructor => "constructor",
            FunctionRole::CopyConstructor => "copy constructor",
            FunctionRole::Destructor => "destructor",
            FunctionRole::AssignOperator => "operator=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub is_reference: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInKind {
    Type,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    BuiltIn(BuiltInKind),
    Variable,
    Function {
        params: Vec<Parameter>,
        role: FunctionRole,
        /// False for prototypes and abstract methods.
        defined: bool,
    },
    Class {
        scope: ScopeId,
        superclass: Option<SymbolId>,
    },
    Array {
        dimensions: Vec<Option<usize>>,
    },
    Reference {
        origin: Option<SymbolId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub declared_type: String,
    pub value: Option<SymbolValue>,
    pub kind: SymbolKind,
}

impl Symbol {
    fn new(name: impl Into<String>, declared_type: impl Into<String>, kind: SymbolKind) -> Self {
        Symbol {
            name: name.into(),
            declared_type: declared_type.into(),
            value: None,
            kind,
        }
    }

    pub fn builtin_type(name: &str) -> Self {
        Symbol::new(name, name, SymbolKind::BuiltIn(BuiltInKind::Type))
    }

    pub fn builtin_function(name: &str) -> Self {
        Symbol::new(name, "void", SymbolKind::BuiltIn(BuiltInKind::Function))
    }

    pub fn variable(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Symbol::new(name, declared_type, SymbolKind::Variable)
    }

    pub fn function(
        name: impl Into<String>,
        return_type: impl Into<String>,
        params: Vec<Parameter>,
        role: FunctionRole,
        defined: bool,
    ) -> Self {
        Symbol::new(
            name,
            return_type,
            SymbolKind::Function {
                params,
                role,
                defined,
            },
        )
    }

    pub fn class(name: impl Into<String>, scope: ScopeId, superclass: Option<SymbolId>) -> Self {
        let name = name.into();
        Symbol::new(name.clone(), name, SymbolKind::Class { scope, superclass })
    }

    pub fn array(
        name: impl Into<String>,
        element_type: impl Into<String>,
        dimensions: Vec<Option<usize>>,
    ) -> Self {
        Symbol::new(name, element_type, SymbolKind::Array { dimensions })
    }

    pub fn reference(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        origin: Option<SymbolId>,
    ) -> Self {
        Symbol::new(name, declared_type, SymbolKind::Reference { origin })
    }

    pub fn with_value(mut self, value: Option<SymbolValue>) -> Self {
        self.value = value;
        self
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class { .. })
    }

    pub fn is_builtin_type(&self) -> bool {
        self.kind == SymbolKind::BuiltIn(BuiltInKind::Type)
    }

    pub fn is_builtin_function(&self) -> bool {
        self.kind == SymbolKind::BuiltIn(BuiltInKind::Function)
    }

    pub fn params(&self) -> Option<&[Parameter]> {
        match &self.kind {
            SymbolKind::Function { params, .. } => Some(params),
            _ => None,
        }
    }

    pub fn param_count(&self) -> Option<usize> {
        self.params().map(<[Parameter]>::len)
    }

    pub fn role(&self) -> Option<FunctionRole> {
        match &self.kind {
            SymbolKind::Function { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { defined: true, .. })
    }

    pub fn class_scope(&self) -> Option<ScopeId> {
        match &self.kind {
            SymbolKind::Class { scope, .. } => Some(*scope),
            _ => None,
        }
    }

    pub fn superclass(&self) -> Option<SymbolId> {
        match &self.kind {
            SymbolKind::Class { superclass, .. } => *superclass,
            _ => None,
        }
    }

    pub fn origin(&self) -> Option<SymbolId> {
        match &self.kind {
            SymbolKind::Reference { origin } => *origin,
            _ => None,
        }
    }

    pub fn dimensions(&self) -> Option<&[Option<usize>]> {
        match &self.kind {
            SymbolKind::Array { dimensions } => Some(dimensions),
            _ => None,
        }
    }
}
