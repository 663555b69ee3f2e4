use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Errors raised by the semantic passes carry no source position.
    pub fn semantic(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::ConstructorNameMismatch { .. } => "ConstructorNameMismatch",
            ErrorImpl::DestructorNameMismatch { .. } => "DestructorNameMismatch",
            ErrorImpl::InvalidAbstractMarker { .. } => "InvalidAbstractMarker",
            ErrorImpl::SpecialMemberSignature { .. } => "SpecialMemberSignature",
            ErrorImpl::NotASuperclass { .. } => "NotASuperclass",
            ErrorImpl::MissingBaseConstructor { .. } => "MissingBaseConstructor",
            ErrorImpl::DimensionMismatch { .. } => "DimensionMismatch",
            ErrorImpl::ReferenceToValue { .. } => "ReferenceToValue",
            ErrorImpl::IncompleteType { .. } => "IncompleteType",
            ErrorImpl::UsedBeforeDeclaration { .. } => "UsedBeforeDeclaration",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::NotAnArray { .. } => "NotAnArray",
            ErrorImpl::NotAnObject { .. } => "NotAnObject",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::UnknownMember { .. } => "UnknownMember",
            ErrorImpl::NotImplemented { .. } => "NotImplemented",
            ErrorImpl::DeclarationTypeMismatch { .. } => "DeclarationTypeMismatch",
            ErrorImpl::AssignmentTypeMismatch { .. } => "AssignmentTypeMismatch",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::InvalidParameterType { .. } => "InvalidParameterType",
            ErrorImpl::InvalidArrayLength { .. } => "InvalidArrayLength",
            ErrorImpl::ArrayElementMismatch { .. } => "ArrayElementMismatch",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::ReferenceArgument { .. } => "ReferenceArgument",
            ErrorImpl::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            ErrorImpl::IndexCountMismatch { .. } => "IndexCountMismatch",
            ErrorImpl::MissingMember { .. } => "MissingMember",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::ArrayTooLarge { .. } => "ArrayTooLarge",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::AlreadyDeclared { name } => ErrorTip::Suggestion(format!(
                "`{}` is already bound in this scope, pick another name or use a nested block",
                name
            )),
            ErrorImpl::UnknownType { type_ } => ErrorTip::Suggestion(format!(
                "Declare class `{}` before using it as a type",
                type_
            )),
            ErrorImpl::MissingBaseConstructor { superclass, .. } => ErrorTip::Suggestion(format!(
                "Add a constructor with an initializer `: {}(...)`",
                superclass
            )),
            ErrorImpl::ArgumentCountMismatch {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ReferenceToValue { .. } | ErrorImpl::ReferenceArgument { .. } => {
                ErrorTip::Suggestion(String::from("References can only alias named storage"))
            }
            ErrorImpl::IncompleteType { type_, .. } => ErrorTip::Suggestion(format!(
                "Hold a `{}&` instead of a `{}` by value",
                type_, type_
            )),
            ErrorImpl::UsedBeforeDeclaration { name } => ErrorTip::Suggestion(format!(
                "Move the declaration of `{}` above its first use",
                name
            )),
            ErrorImpl::NotImplemented { function } => ErrorTip::Suggestion(format!(
                "Add a body to the declaration of `{}`",
                function
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    // Front end
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Declarations
    #[error("such symbol {name} already exists")]
    AlreadyDeclared { name: String },
    #[error("unknown type {type_}")]
    UnknownType { type_: String },
    #[error("constructor {name} does not match class {class}")]
    ConstructorNameMismatch { name: String, class: String },
    #[error("destructor ~{name} does not match class {class}")]
    DestructorNameMismatch { name: String, class: String },
    #[error("abstract function {function} must be marked with 0, found {marker}")]
    InvalidAbstractMarker { function: String, marker: String },
    #[error("{member} of class {class} must take a single {class}& parameter")]
    SpecialMemberSignature { member: String, class: String },
    #[error("{name} is not the superclass of {class}")]
    NotASuperclass { name: String, class: String },
    #[error("constructor of {class} must call the constructor of {superclass} explicitly")]
    MissingBaseConstructor { class: String, superclass: String },
    #[error("array {array} declares {declared} dimensions but its initializer has {initialised}")]
    DimensionMismatch {
        array: String,
        declared: usize,
        initialised: usize,
    },
    #[error("reference {name} must be bound to a variable")]
    ReferenceToValue { name: String },
    #[error("field {attribute} has incomplete type {type_}")]
    IncompleteType { attribute: String, type_: String },
    #[error("variable {name} is used before its declaration")]
    UsedBeforeDeclaration { name: String },

    // Resolution
    #[error("no such variable: {name}")]
    VariableNotDeclared { name: String },
    #[error("no such function: {function}")]
    FunctionNotDeclared { function: String },
    #[error("{name} is not a function")]
    NotAFunction { name: String },
    #[error("{name} is not an array")]
    NotAnArray { name: String },
    #[error("{name} is not an object")]
    NotAnObject { name: String },
    #[error("arg and param count mismatch at function {function}: expected {expected}, received {received}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("class {class} has no member {member}")]
    UnknownMember { member: String, class: String },
    #[error("function {function} is not implemented")]
    NotImplemented { function: String },

    // Types
    #[error("type mismatch in declaration of {name}: type {expected} cannot be {received}")]
    DeclarationTypeMismatch {
        name: String,
        expected: String,
        received: String,
    },
    #[error("types {expected} and {received} do not match in assignment")]
    AssignmentTypeMismatch { expected: String, received: String },
    #[error("invalid type {type_} for {operation} operation")]
    InvalidOperand { operation: String, type_: String },
    #[error("return type mismatch in {function}: expected {expected}, but got {received}")]
    ReturnTypeMismatch {
        function: String,
        expected: String,
        received: String,
    },
    #[error("function {function} expects return type {expected}, but got void")]
    MissingReturn { function: String, expected: String },
    #[error("invalid type {type_} for parameter {parameter} of {function}")]
    InvalidParameterType {
        function: String,
        parameter: String,
        type_: String,
    },
    #[error("type {type_} cannot describe array length")]
    InvalidArrayLength { type_: String },
    #[error("type mismatch in initializer of array {array}: expected {expected}, but got {received}")]
    ArrayElementMismatch {
        array: String,
        expected: String,
        received: String,
    },
    #[error("argument type mismatch at function {function}: expected {expected}, but got {received}")]
    ArgumentTypeMismatch {
        function: String,
        expected: String,
        received: String,
    },
    #[error("reference parameter {parameter} of {function} must be bound to a variable")]
    ReferenceArgument { function: String, parameter: String },

    // Runtime
    #[error("index {index} is out of bounds for dimension {dimension} of array {array} (size: {size})")]
    IndexOutOfBounds {
        index: i32,
        dimension: usize,
        array: String,
        size: usize,
    },
    #[error("array {array} has {expected} dimensions but was indexed with {received}")]
    IndexCountMismatch {
        array: String,
        expected: usize,
        received: usize,
    },
    #[error("instance of {class} has no member {member}")]
    MissingMember { member: String, class: String },
    #[error("{name} cannot be called")]
    NotCallable { name: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("array {array} is too large")]
    ArrayTooLarge { array: String },
}
