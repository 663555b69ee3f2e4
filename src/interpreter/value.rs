//! Runtime values.
//!
//! Scalars are stored inline; arrays, instances, closures and classes are
//! shared handles. Every named piece of storage is a `Slot`, so a reference
//! and the variable it aliases are the same `Rc`.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{
    ast::{
        ast::{Node, NodeKind},
        types::{BuiltInFunction, BuiltInType},
    },
    errors::errors::ErrorImpl,
    symbols::symbol::FunctionRole,
};

use super::environment::Env;

pub type Slot<'p> = Rc<RefCell<Value<'p>>>;

pub fn slot(value: Value<'_>) -> Slot<'_> {
    Rc::new(RefCell::new(value))
}

pub fn read_slot<'p>(slot: &Slot<'p>) -> Value<'p> {
    slot.borrow().clone()
}

#[derive(Debug, Clone, Default)]
pub enum Value<'p> {
    #[default]
    Null,
    Int(i32),
    Bool(bool),
    Char(char),
    Array(Rc<RefCell<ArrayValue<'p>>>),
    Instance(Rc<Instance<'p>>),
    Function(Rc<Closure<'p>>),
    Class(Rc<ClassValue<'p>>),
    BuiltIn(BuiltInFunction),
}

impl<'p> Value<'p> {
    /// Zero value of a built-in type; class and unknown types start as null.
    pub fn zero(type_name: &str) -> Self {
        match BuiltInType::from_name(type_name) {
            Some(BuiltInType::Int) => Value::Int(0),
            Some(BuiltInType::Bool) => Value::Bool(false),
            Some(BuiltInType::Char) => Value::Char('\0'),
            _ => Value::Null,
        }
    }

    pub fn from_literal(node: &Node) -> Self {
        match node.kind {
            NodeKind::Int => Value::Int(node.value().parse().unwrap_or_default()),
            NodeKind::Bool => Value::Bool(node.value() == "true"),
            NodeKind::Char => Value::Char(node.value().chars().next().unwrap_or('\0')),
            _ => Value::Null,
        }
    }

    pub fn as_int(&self) -> i32 {
        match self {
            Value::Int(value) => *value,
            Value::Bool(value) => *value as i32,
            Value::Char(value) => *value as i32,
            _ => 0,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Int(value) => *value != 0,
            Value::Bool(value) => *value,
            Value::Char(value) => *value != '\0',
            _ => true,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Value::Char(value) => *value,
            _ => char::from_u32(self.as_int() as u32).unwrap_or('\0'),
        }
    }

    /// Converts `value` to the scalar kind of `self`, used when storing into an existing slot.
    pub fn coerce(&self, value: Value<'p>) -> Value<'p> {
        match self {
            Value::Int(_) => Value::Int(value.as_int()),
            Value::Bool(_) => Value::Bool(value.as_bool()),
            Value::Char(_) => Value::Char(value.as_char()),
            _ => value,
        }
    }

    /// Converts `value` to a declared built-in type; other types are kept as is.
    pub fn convert(type_name: &str, value: Value<'p>) -> Value<'p> {
        match BuiltInType::from_name(type_name) {
            Some(BuiltInType::Int | BuiltInType::Bool | BuiltInType::Char) => {
                Value::zero(type_name).coerce(value)
            }
            _ => value,
        }
    }

    /// Name used for the value in runtime diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => String::from("null"),
            Value::Int(_) => BuiltInType::Int.name().to_string(),
            Value::Bool(_) => BuiltInType::Bool.name().to_string(),
            Value::Char(_) => BuiltInType::Char.name().to_string(),
            Value::Array(array) => format!("array {}", array.borrow().name),
            Value::Instance(instance) => instance.class.name.clone(),
            Value::Function(closure) => closure.name().to_string(),
            Value::Class(class) => class.name.clone(),
            Value::BuiltIn(function) => function.name().to_string(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Int(_) | Value::Bool(_) | Value::Char(_)
        )
    }

    /// Equality of non-scalars is identity.
    pub fn same(&self, other: &Value<'p>) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Instance(left), Value::Instance(right)) => Rc::ptr_eq(left, right),
            (Value::Array(left), Value::Array(right)) => Rc::ptr_eq(left, right),
            (left, right) if left.is_scalar() && right.is_scalar() => left.as_int() == right.as_int(),
            _ => false,
        }
    }
}

/// Upper bound on the element count of one array.
pub const MAX_ARRAY_ELEMENTS: usize = 1 << 24;

/// Row-major storage of a multi-dimensional array.
#[derive(Debug)]
pub struct ArrayValue<'p> {
    pub name: String,
    pub dimensions: Vec<usize>,
    pub elements: Vec<Slot<'p>>,
}

impl<'p> ArrayValue<'p> {
    /// Allocates `dimensions` elements filled by `fill`; sizes past `MAX_ARRAY_ELEMENTS` are refused.
    pub fn new(
        name: impl Into<String>,
        dimensions: Vec<usize>,
        mut fill: impl FnMut() -> Value<'p>,
    ) -> Result<Self, ErrorImpl> {
        let name = name.into();
        let len = dimensions
            .iter()
            .try_fold(1usize, |len, &size| len.checked_mul(size))
            .filter(|&len| len <= MAX_ARRAY_ELEMENTS);

        let Some(len) = len else {
            return Err(ErrorImpl::ArrayTooLarge { array: name });
        };

        Ok(ArrayValue {
            name,
            dimensions,
            elements: (0..len).map(|_| slot(fill())).collect(),
        })
    }

    /// Number of elements one step of dimension `level` spans.
    pub fn stride(&self, level: usize) -> usize {
        self.dimensions
            .iter()
            .skip(level + 1)
            .fold(1, |stride: usize, &size| stride.saturating_mul(size))
    }

    /// Flat position of `indices`, bounds checked per dimension.
    pub fn offset(&self, indices: &[i32]) -> Result<usize, ErrorImpl> {
        if indices.len() != self.dimensions.len() {
            return Err(ErrorImpl::IndexCountMismatch {
                array: self.name.clone(),
                expected: self.dimensions.len(),
                received: indices.len(),
            });
        }

        let mut offset = 0;
        for (dimension, (&index, &size)) in indices.iter().zip(&self.dimensions).enumerate() {
            if index < 0 || index as usize >= size {
                return Err(ErrorImpl::IndexOutOfBounds {
                    index,
                    dimension,
                    array: self.name.clone(),
                    size,
                });
            }
            offset += index as usize * self.stride(dimension);
        }

        Ok(offset)
    }

    pub fn element(&self, indices: &[i32]) -> Result<Slot<'p>, ErrorImpl> {
        let offset = self.offset(indices)?;
        Ok(self.elements[offset].clone())
    }
}

/// A class as a runtime value: its declaration, superclass and defining environment.
pub struct ClassValue<'p> {
    pub name: String,
    pub node: &'p Node,
    pub superclass: Option<Rc<ClassValue<'p>>>,
    pub env: Env<'p>,
}

impl<'p> ClassValue<'p> {
    /// This class followed by its superclasses, nearest first.
    pub fn chain(self: &Rc<Self>) -> Vec<Rc<ClassValue<'p>>> {
        std::iter::successors(Some(self.clone()), |class| class.superclass.clone()).collect()
    }

    pub fn is_a(self: &Rc<Self>, name: &str) -> bool {
        self.chain().iter().any(|class| class.name == name)
    }

    /// The special member with `role` declared in this class itself.
    pub fn special(&self, role: FunctionRole) -> Option<&'p Node> {
        let kind = role.kind()?;
        let node: &'p Node = self.node;
        node.children.iter().find(|member| member.kind == kind)
    }

    /// Attribute declarations, in source order.
    pub fn attributes(&self) -> impl Iterator<Item = &'p Node> {
        let node: &'p Node = self.node;
        node.children.iter().filter(|member| {
            matches!(
                member.kind,
                NodeKind::VarDecl | NodeKind::VarRef | NodeKind::ArrayDecl | NodeKind::ArrayInit | NodeKind::ArrayRef
            )
        })
    }

    /// Methods declared in this class itself, abstract ones included.
    pub fn methods(&self) -> impl Iterator<Item = &'p Node> {
        let node: &'p Node = self.node;
        node.children
            .iter()
            .filter(|member| matches!(member.kind, NodeKind::FnDecl | NodeKind::AbstractFn))
    }

    /// The most derived declaration of method `name`, preferring one with a body.
    pub fn method(self: &Rc<Self>, name: &str) -> Option<&'p Node> {
        let mut candidates = self
            .chain()
            .into_iter()
            .flat_map(|class| class.methods().filter(|method| method.value() == name).collect::<Vec<_>>());

        let first = candidates.next()?;
        if first.body().is_some() {
            return Some(first);
        }
        Some(candidates.find(|method| method.body().is_some()).unwrap_or(first))
    }
}

impl fmt::Debug for ClassValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassValue")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|class| &class.name))
            .finish()
    }
}

/// An object: its dynamic class and one slot per attribute of the whole chain.
#[derive(Debug)]
pub struct Instance<'p> {
    pub class: Rc<ClassValue<'p>>,
    pub attributes: HashMap<String, Slot<'p>>,
}

impl<'p> Instance<'p> {
    pub fn attribute(&self, name: &str) -> Result<Slot<'p>, ErrorImpl> {
        self.attributes
            .get(name)
            .cloned()
            .ok_or_else(|| ErrorImpl::MissingMember {
                member: name.to_string(),
                class: self.class.name.clone(),
            })
    }
}

/// A function or method paired with the environment it was declared in.
///
/// Methods carry the receiver they were looked up on.
pub struct Closure<'p> {
    pub node: &'p Node,
    pub env: Env<'p>,
    pub receiver: Option<Rc<Instance<'p>>>,
}

impl<'p> Closure<'p> {
    pub fn name(&self) -> &'p str {
        self.node.value()
    }
}

impl fmt::Debug for Closure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name())
            .field("bound", &self.receiver.is_some())
            .finish()
    }
}
