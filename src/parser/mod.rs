//! Parser module for building the syntax tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into the `Node` tree consumed by the semantic passes. It uses a Pratt
//! parser for expressions with C operator precedence and handles:
//!
//! - Top-level declarations (classes, functions, prototypes, globals)
//! - Class members (constructors, destructors, `operator=`, methods, attributes)
//! - Statement parsing (declarations, blocks, control flow, returns)
//! - Expression parsing (operators, calls, member access, indexing, literals)
//! - Type parsing, including the `&` reference marker
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
