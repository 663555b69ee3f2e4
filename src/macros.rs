//! Utility macros for the interpreter.
//!
//! This module defines helper macros used throughout the crate:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for simple tokens
//! - `MK_NODE!` - Builds a syntax tree node with an optional value and children
//!
//! These macros reduce boilerplate in the lexer, the parser, member
//! synthesis and tests.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for simple single-token patterns.
///
/// Generates a handler function that creates a token with the given kind
/// and advances the lexer position by the token's length.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut $crate::lexer::lexer::Lexer, _regex: &regex::Regex| {
            let span = lexer.span_of($value.len());
            lexer.push($crate::MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
        }
    };
}

/// Builds a syntax tree [`Node`](crate::ast::ast::Node).
///
/// # Example
///
/// ```ignore
/// let call = MK_NODE!(NodeKind::FnCall, "print_int", [
///     MK_NODE!(NodeKind::Args, [MK_NODE!(NodeKind::Int, "5")])
/// ]);
/// ```
#[macro_export]
macro_rules! MK_NODE {
    ($kind:expr) => {
        $crate::ast::ast::Node::new($kind)
    };
    ($kind:expr, [$($child:expr),* $(,)?]) => {{
        #[allow(unused_mut)]
        let mut node = $crate::ast::ast::Node::new($kind);
        $( node.children.push($child); )*
        node
    }};
    ($kind:expr, $value:expr, [$($child:expr),* $(,)?]) => {{
        #[allow(unused_mut)]
        let mut node = $crate::ast::ast::Node::with_value($kind, $value);
        $( node.children.push($child); )*
        node
    }};
    ($kind:expr, $value:expr) => {
        $crate::ast::ast::Node::with_value($kind, $value)
    };
}
