//! Built-in names known to every program.
//!
//! - `BuiltInType`: the scalar types `int`, `bool`, `char` and `void`
//! - `BuiltInFunction`: `print_int`, `print_bool` and `print_char`
//!
//! Both are bound in the root scope before pass 1 starts.

use super::ast::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInType {
    Int,
    Bool,
    Char,
    Void,
}

impl BuiltInType {
    pub const ALL: [BuiltInType; 4] = [
        BuiltInType::Int,
        BuiltInType::Bool,
        BuiltInType::Char,
        BuiltInType::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltInType::Int => "int",
            BuiltInType::Bool => "bool",
            BuiltInType::Char => "char",
            BuiltInType::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BuiltInType::ALL
            .into_iter()
            .find(|builtin| builtin.name() == name)
    }

    pub fn from_kind(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Int => Some(BuiltInType::Int),
            NodeKind::Bool => Some(BuiltInType::Bool),
            NodeKind::Char => Some(BuiltInType::Char),
            NodeKind::Void => Some(BuiltInType::Void),
            _ => None,
        }
    }

    pub fn kind(self) -> NodeKind {
        match self {
            BuiltInType::Int => NodeKind::Int,
            BuiltInType::Bool => NodeKind::Bool,
            BuiltInType::Char => NodeKind::Char,
            BuiltInType::Void => NodeKind::Void,
        }
    }
}

/// Value-carrying built-in type names; `void` describes no value.
pub fn is_value_type(name: &str) -> bool {
    matches!(
        BuiltInType::from_name(name),
        Some(BuiltInType::Int | BuiltInType::Bool | BuiltInType::Char)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInFunction {
    PrintInt,
    PrintBool,
    PrintChar,
}

impl BuiltInFunction {
    pub const ALL: [BuiltInFunction; 3] = [
        BuiltInFunction::PrintInt,
        BuiltInFunction::PrintBool,
        BuiltInFunction::PrintChar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltInFunction::PrintInt => "print_int",
            BuiltInFunction::PrintBool => "print_bool",
            BuiltInFunction::PrintChar => "print_char",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BuiltInFunction::ALL
            .into_iter()
            .find(|function| function.name() == name)
    }

    /// The type of the single argument each print function formats.
    pub fn parameter(self) -> BuiltInType {
        match self {
            BuiltInFunction::PrintInt => BuiltInType::Int,
            BuiltInFunction::PrintBool => BuiltInType::Bool,
            BuiltInFunction::PrintChar => BuiltInType::Char,
        }
    }
}
