//! Lexical analysis module for the interpreter front end.
//!
//! This module contains the lexer (tokenizer) that converts C++ subset
//! source code into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, integer and character literals
//! - Token position tracking for error reporting
//! - Comments, preprocessor lines and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
