//! Unit tests for error handling.
//!
//! Covers error names, tips and the message text that ends up after
//! `Error: ` on the output stream.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(10, Rc::new("test.cpp".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_semantic_error_has_null_position() {
    let error = Error::semantic(ErrorImpl::VariableNotDeclared {
        name: "x".to_string(),
    });

    assert_eq!(error.get_position().0, 0);
    assert_eq!(error.get_position().1.as_str(), "<null>");
}

#[test]
fn test_display_uses_message() {
    let error = Error::semantic(ErrorImpl::ArgumentCountMismatch {
        function: "f".to_string(),
        expected: 2,
        received: 1,
    });

    assert_eq!(
        error.to_string(),
        "arg and param count mismatch at function f: expected 2, received 1"
    );
}

#[test]
fn test_declaration_mismatch_message() {
    let error = Error::semantic(ErrorImpl::DeclarationTypeMismatch {
        name: "b".to_string(),
        expected: "bool".to_string(),
        received: "int".to_string(),
    });

    assert_eq!(
        error.to_string(),
        "type mismatch in declaration of b: type bool cannot be int"
    );
}

#[test]
fn test_out_of_bounds_message() {
    let error = Error::semantic(ErrorImpl::IndexOutOfBounds {
        index: 3,
        dimension: 0,
        array: "a".to_string(),
        size: 3,
    });

    assert_eq!(
        error.to_string(),
        "index 3 is out of bounds for dimension 0 of array a (size: 3)"
    );
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(0, Rc::new("test.cpp".to_string())),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        Position(0, Rc::new("test.cpp".to_string())),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_kind_is_comparable() {
    let error = Error::semantic(ErrorImpl::DivisionByZero);
    assert_eq!(error.kind(), &ErrorImpl::DivisionByZero);
    assert_eq!(error.get_error_name(), "DivisionByZero");
}
